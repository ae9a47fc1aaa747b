//! Statement parsing.

use brioc_lex::Token;

use crate::ast::*;
use crate::{ParseError, Parser};

impl Parser {
    /// Dispatch on the leading token of a statement.
    pub(crate) fn parse_statement(&mut self) -> Result<Stmt, ParseError> {
        match self.peek() {
            Token::Let => Ok(Stmt::VarDecl(self.parse_var_decl()?)),
            Token::Const => Ok(Stmt::ConstDecl(self.parse_const_decl()?)),
            Token::Function => Ok(Stmt::FnDecl(self.parse_fn_decl()?)),
            Token::Class => self.parse_class_decl(),
            Token::If => self.parse_if(),
            Token::While => self.parse_while(),
            Token::Do => self.parse_do_while(),
            Token::For => self.parse_for(),
            Token::Foreach => self.parse_foreach(),
            Token::Switch => self.parse_switch(),
            Token::Try => self.parse_try_catch(),
            Token::Break => {
                let (_, span) = self.advance();
                self.expect(&Token::Semicolon, "';'")?;
                Ok(Stmt::Break(span))
            }
            Token::Continue => {
                let (_, span) = self.advance();
                self.expect(&Token::Semicolon, "';'")?;
                Ok(Stmt::Continue(span))
            }
            Token::Return => {
                let (_, span) = self.advance();
                let value = if self.check(&Token::Semicolon) {
                    None
                } else {
                    Some(self.parse_expression()?)
                };
                self.expect(&Token::Semicolon, "';'")?;
                Ok(Stmt::Return(ReturnStmt { value, span }))
            }
            Token::LBrace => Ok(Stmt::Block(self.parse_block()?)),
            _ => {
                let span = self.current_span();
                let expr = self.parse_expression()?;
                self.expect(&Token::Semicolon, "';'")?;
                Ok(Stmt::Expr(ExprStmt { expr, span }))
            }
        }
    }

    /// `"let" Ident [":" type] ["=" expression] ";"`
    fn parse_var_decl(&mut self) -> Result<VarDecl, ParseError> {
        let span = self.expect(&Token::Let, "'let'")?;
        let name = self.expect_ident("un identificador")?;
        let ty = if self.eat(&Token::Colon) {
            Some(self.parse_type()?)
        } else {
            None
        };
        let init = if self.eat(&Token::Assign) {
            Some(self.parse_expression()?)
        } else {
            None
        };
        self.expect(&Token::Semicolon, "';'")?;
        Ok(VarDecl {
            name,
            ty,
            init,
            span,
        })
    }

    /// `"const" Ident [":" type] "=" expression ";"`
    fn parse_const_decl(&mut self) -> Result<ConstDecl, ParseError> {
        let span = self.expect(&Token::Const, "'const'")?;
        let name = self.expect_ident("un identificador")?;
        let ty = if self.eat(&Token::Colon) {
            Some(self.parse_type()?)
        } else {
            None
        };
        self.expect(&Token::Assign, "'='")?;
        let init = self.parse_expression()?;
        self.expect(&Token::Semicolon, "';'")?;
        Ok(ConstDecl {
            name,
            ty,
            init,
            span,
        })
    }

    /// `"function" Ident "(" [params] ")" [":" type] block`
    pub(crate) fn parse_fn_decl(&mut self) -> Result<FnDecl, ParseError> {
        let span = self.expect(&Token::Function, "'function'")?;
        let name = self.expect_ident("un identificador")?;
        self.expect(&Token::LParen, "'('")?;
        let mut params = Vec::new();
        if !self.check(&Token::RParen) {
            loop {
                let pname = self.expect_ident("un parámetro")?;
                let pty = if self.eat(&Token::Colon) {
                    Some(self.parse_type()?)
                } else {
                    None
                };
                params.push(Param {
                    span: pname.span,
                    name: pname,
                    ty: pty,
                });
                if !self.eat(&Token::Comma) {
                    break;
                }
            }
        }
        self.expect(&Token::RParen, "')'")?;
        let ret = if self.eat(&Token::Colon) {
            Some(self.parse_type()?)
        } else {
            None
        };
        let body = self.parse_block()?;
        Ok(FnDecl {
            name,
            params,
            ret,
            body,
            span,
        })
    }

    /// `"class" Ident [":" Ident] "{" { member } "}"`
    fn parse_class_decl(&mut self) -> Result<Stmt, ParseError> {
        let span = self.expect(&Token::Class, "'class'")?;
        let name = self.expect_ident("un identificador")?;
        let base = if self.eat(&Token::Colon) {
            Some(self.expect_ident("una clase base")?)
        } else {
            None
        };
        self.expect(&Token::LBrace, "'{'")?;
        let mut members = Vec::new();
        while !self.check(&Token::RBrace) && !self.at_end() {
            match self.peek() {
                Token::Function => members.push(ClassMember::Method(self.parse_fn_decl()?)),
                Token::Let => members.push(ClassMember::Field(self.parse_var_decl()?)),
                Token::Const => members.push(ClassMember::Const(self.parse_const_decl()?)),
                _ => return Err(self.unexpected("un miembro de clase")),
            }
        }
        self.expect(&Token::RBrace, "'}'")?;
        Ok(Stmt::ClassDecl(ClassDecl {
            name,
            base,
            members,
            span,
        }))
    }

    /// `"{" { statement } "}"`
    pub(crate) fn parse_block(&mut self) -> Result<Block, ParseError> {
        let span = self.expect(&Token::LBrace, "'{'")?;
        let mut stmts = Vec::new();
        while !self.check(&Token::RBrace) && !self.at_end() {
            stmts.push(self.parse_statement()?);
        }
        self.expect(&Token::RBrace, "'}'")?;
        Ok(Block { stmts, span })
    }

    fn parse_if(&mut self) -> Result<Stmt, ParseError> {
        let span = self.expect(&Token::If, "'if'")?;
        self.expect(&Token::LParen, "'('")?;
        let cond = self.parse_expression()?;
        self.expect(&Token::RParen, "')'")?;
        let then_block = self.parse_block()?;
        let else_block = if self.eat(&Token::Else) {
            Some(self.parse_block()?)
        } else {
            None
        };
        Ok(Stmt::If(IfStmt {
            cond,
            then_block,
            else_block,
            span,
        }))
    }

    fn parse_while(&mut self) -> Result<Stmt, ParseError> {
        let span = self.expect(&Token::While, "'while'")?;
        self.expect(&Token::LParen, "'('")?;
        let cond = self.parse_expression()?;
        self.expect(&Token::RParen, "')'")?;
        let body = self.parse_block()?;
        Ok(Stmt::While(WhileStmt { cond, body, span }))
    }

    fn parse_do_while(&mut self) -> Result<Stmt, ParseError> {
        let span = self.expect(&Token::Do, "'do'")?;
        let body = self.parse_block()?;
        self.expect(&Token::While, "'while'")?;
        self.expect(&Token::LParen, "'('")?;
        let cond = self.parse_expression()?;
        self.expect(&Token::RParen, "')'")?;
        self.expect(&Token::Semicolon, "';'")?;
        Ok(Stmt::DoWhile(DoWhileStmt { body, cond, span }))
    }

    /// `"for" "(" (varDecl | exprStmt | ";") [cond] ";" [step] ")" block`
    fn parse_for(&mut self) -> Result<Stmt, ParseError> {
        let span = self.expect(&Token::For, "'for'")?;
        self.expect(&Token::LParen, "'('")?;

        let init = match self.peek() {
            Token::Semicolon => {
                self.advance();
                None
            }
            Token::Let => Some(Box::new(Stmt::VarDecl(self.parse_var_decl()?))),
            _ => {
                let stmt_span = self.current_span();
                let expr = self.parse_expression()?;
                self.expect(&Token::Semicolon, "';'")?;
                Some(Box::new(Stmt::Expr(ExprStmt {
                    expr,
                    span: stmt_span,
                })))
            }
        };

        let cond = if self.check(&Token::Semicolon) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect(&Token::Semicolon, "';'")?;

        let step = if self.check(&Token::RParen) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect(&Token::RParen, "')'")?;

        let body = self.parse_block()?;
        Ok(Stmt::For(ForStmt {
            init,
            cond,
            step,
            body,
            span,
        }))
    }

    fn parse_foreach(&mut self) -> Result<Stmt, ParseError> {
        let span = self.expect(&Token::Foreach, "'foreach'")?;
        self.expect(&Token::LParen, "'('")?;
        let var = self.expect_ident("un identificador")?;
        self.expect(&Token::In, "'in'")?;
        let iter = self.parse_expression()?;
        self.expect(&Token::RParen, "')'")?;
        let body = self.parse_block()?;
        Ok(Stmt::Foreach(ForeachStmt {
            var,
            iter,
            body,
            span,
        }))
    }

    /// Case bodies run until the next `case`, `default`, or the closing brace.
    fn parse_switch(&mut self) -> Result<Stmt, ParseError> {
        let span = self.expect(&Token::Switch, "'switch'")?;
        self.expect(&Token::LParen, "'('")?;
        let control = self.parse_expression()?;
        self.expect(&Token::RParen, "')'")?;
        self.expect(&Token::LBrace, "'{'")?;

        let mut cases = Vec::new();
        let mut default = None;
        while !self.check(&Token::RBrace) && !self.at_end() {
            if self.check(&Token::Case) {
                let case_span = self.advance().1;
                let value = self.parse_expression()?;
                self.expect(&Token::Colon, "':'")?;
                let body = self.parse_case_body()?;
                cases.push(SwitchCase {
                    value,
                    body,
                    span: case_span,
                });
            } else if self.check(&Token::Default) {
                self.advance();
                self.expect(&Token::Colon, "':'")?;
                default = Some(self.parse_case_body()?);
            } else {
                return Err(self.unexpected("'case', 'default' o '}'"));
            }
        }
        self.expect(&Token::RBrace, "'}'")?;
        Ok(Stmt::Switch(SwitchStmt {
            control,
            cases,
            default,
            span,
        }))
    }

    fn parse_case_body(&mut self) -> Result<Vec<Stmt>, ParseError> {
        let mut stmts = Vec::new();
        while !matches!(self.peek(), Token::Case | Token::Default | Token::RBrace)
            && !self.at_end()
        {
            stmts.push(self.parse_statement()?);
        }
        Ok(stmts)
    }

    fn parse_try_catch(&mut self) -> Result<Stmt, ParseError> {
        let span = self.expect(&Token::Try, "'try'")?;
        let try_block = self.parse_block()?;
        self.expect(&Token::Catch, "'catch'")?;
        self.expect(&Token::LParen, "'('")?;
        let err_name = self.expect_ident("un identificador")?;
        self.expect(&Token::RParen, "')'")?;
        let catch_block = self.parse_block()?;
        Ok(Stmt::TryCatch(TryCatchStmt {
            try_block,
            err_name,
            catch_block,
            span,
        }))
    }
}
