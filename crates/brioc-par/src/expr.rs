//! Expression parsing using precedence climbing.
//!
//! # Operator precedence (lowest to highest)
//!
//! | Level | Operators | Associativity |
//! |-------|-----------|---------------|
//! | 1 | `=` | Right |
//! | 2 | `?:` | Right |
//! | 3 | `\|\|` | Left |
//! | 4 | `&&` | Left |
//! | 5 | `==`, `!=` | Left |
//! | 6 | `<`, `<=`, `>`, `>=` | Left |
//! | 7 | `+`, `-` | Left |
//! | 8 | `*`, `/`, `%` | Left |
//! | 9 | `-`, `!` (prefix) | — |
//! | 10 | `.`, `[]`, `()` (suffix) | Left |

use brioc_lex::Token;

use crate::ast::*;
use crate::{ParseError, Parser};

/// Binding power levels for binary operators.
/// Higher numbers = tighter binding.
mod bp {
    pub const MIN: u8 = 0;
    pub const LOGICAL_OR: u8 = 2;
    pub const LOGICAL_AND: u8 = 4;
    pub const EQUALITY: u8 = 6;
    pub const RELATIONAL: u8 = 8;
    pub const ADDITIVE: u8 = 10;
    pub const MULTIPLICATIVE: u8 = 12;
}

/// Map a token to its binary operator and left binding power.
fn binary_op(token: &Token) -> Option<(BinOp, u8)> {
    Some(match token {
        Token::OrOr => (BinOp::Or, bp::LOGICAL_OR),
        Token::AndAnd => (BinOp::And, bp::LOGICAL_AND),
        Token::EqEq => (BinOp::Eq, bp::EQUALITY),
        Token::NotEq => (BinOp::Ne, bp::EQUALITY),
        Token::Lt => (BinOp::Lt, bp::RELATIONAL),
        Token::Le => (BinOp::Le, bp::RELATIONAL),
        Token::Gt => (BinOp::Gt, bp::RELATIONAL),
        Token::Ge => (BinOp::Ge, bp::RELATIONAL),
        Token::Plus => (BinOp::Add, bp::ADDITIVE),
        Token::Minus => (BinOp::Sub, bp::ADDITIVE),
        Token::Star => (BinOp::Mul, bp::MULTIPLICATIVE),
        Token::Slash => (BinOp::Div, bp::MULTIPLICATIVE),
        Token::Percent => (BinOp::Mod, bp::MULTIPLICATIVE),
        _ => return None,
    })
}

impl Parser {
    /// Main expression entry point: `expression = assignment`.
    pub(crate) fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        self.parse_assignment()
    }

    /// `assignment = conditional [ "=" assignment ]` (right-associative).
    ///
    /// Any expression is accepted as an assignment target; the semantic
    /// analyzer types the target and rejects what it must.
    fn parse_assignment(&mut self) -> Result<Expr, ParseError> {
        let target = self.parse_conditional()?;
        if self.eat(&Token::Assign) {
            let value = self.parse_assignment()?;
            let span = target.span();
            return Ok(Expr::Assign {
                target: Box::new(target),
                value: Box::new(value),
                span,
            });
        }
        Ok(target)
    }

    /// `conditional = binary [ "?" expression ":" expression ]`
    fn parse_conditional(&mut self) -> Result<Expr, ParseError> {
        let cond = self.parse_binary(bp::MIN)?;
        if self.eat(&Token::Question) {
            let then_expr = self.parse_expression()?;
            self.expect(&Token::Colon, "':'")?;
            let else_expr = self.parse_expression()?;
            let span = cond.span();
            return Ok(Expr::Ternary {
                cond: Box::new(cond),
                then_expr: Box::new(then_expr),
                else_expr: Box::new(else_expr),
                span,
            });
        }
        Ok(cond)
    }

    /// Precedence-climbing loop over the binary operator table.
    fn parse_binary(&mut self, min_bp: u8) -> Result<Expr, ParseError> {
        let mut lhs = self.parse_unary()?;
        while let Some((op, l_bp)) = binary_op(self.peek()) {
            if l_bp < min_bp {
                break;
            }
            self.advance();
            // All binary operators are left-associative.
            let rhs = self.parse_binary(l_bp + 1)?;
            let span = lhs.span();
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
                span,
            };
        }
        Ok(lhs)
    }

    /// `unary = ("-" | "!") unary | postfix`
    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        let op = match self.peek() {
            Token::Minus => Some(UnOp::Neg),
            Token::Bang => Some(UnOp::Not),
            _ => None,
        };
        if let Some(op) = op {
            let (_, span) = self.advance();
            let operand = self.parse_unary()?;
            return Ok(Expr::Unary {
                op,
                operand: Box::new(operand),
                span,
            });
        }
        self.parse_postfix()
    }

    /// `postfix = primary { "." Ident | "[" expression "]" | "(" [args] ")" }`
    ///
    /// Suffixes are folded left-to-right into nested nodes.
    fn parse_postfix(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_primary()?;
        loop {
            match self.peek() {
                Token::Dot => {
                    let (_, span) = self.advance();
                    let name = self.expect_ident("un nombre de propiedad")?;
                    expr = Expr::Property {
                        object: Box::new(expr),
                        name,
                        span,
                    };
                }
                Token::LBracket => {
                    let (_, span) = self.advance();
                    let index = self.parse_expression()?;
                    self.expect(&Token::RBracket, "']'")?;
                    expr = Expr::Index {
                        object: Box::new(expr),
                        index: Box::new(index),
                        span,
                    };
                }
                Token::LParen => {
                    let (_, span) = self.advance();
                    let args = self.parse_args()?;
                    expr = Expr::Call {
                        callee: Box::new(expr),
                        args,
                        span,
                    };
                }
                _ => return Ok(expr),
            }
        }
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        match self.peek() {
            Token::Int(_) => {
                let (token, span) = self.advance();
                let Token::Int(value) = token else {
                    unreachable!()
                };
                Ok(Expr::Literal {
                    value: Literal::Int(value),
                    span,
                })
            }
            Token::Str(_) => {
                let (token, span) = self.advance();
                let Token::Str(value) = token else {
                    unreachable!()
                };
                Ok(Expr::Literal {
                    value: Literal::Str(value),
                    span,
                })
            }
            Token::True => {
                let (_, span) = self.advance();
                Ok(Expr::Literal {
                    value: Literal::Bool(true),
                    span,
                })
            }
            Token::False => {
                let (_, span) = self.advance();
                Ok(Expr::Literal {
                    value: Literal::Bool(false),
                    span,
                })
            }
            Token::Null => {
                let (_, span) = self.advance();
                Ok(Expr::Literal {
                    value: Literal::Null,
                    span,
                })
            }
            Token::LBracket => {
                let (_, span) = self.advance();
                let mut elems = Vec::new();
                if !self.check(&Token::RBracket) {
                    loop {
                        elems.push(self.parse_expression()?);
                        if !self.eat(&Token::Comma) {
                            break;
                        }
                    }
                }
                self.expect(&Token::RBracket, "']'")?;
                Ok(Expr::Array { elems, span })
            }
            Token::This => {
                let (_, span) = self.advance();
                Ok(Expr::This { span })
            }
            Token::New => {
                let (_, span) = self.advance();
                let class = self.expect_ident("un nombre de clase")?;
                self.expect(&Token::LParen, "'('")?;
                let args = self.parse_args()?;
                Ok(Expr::New { class, args, span })
            }
            Token::Ident(_) => Ok(Expr::Ident(self.expect_ident("un identificador")?)),
            Token::LParen => {
                self.advance();
                let expr = self.parse_expression()?;
                self.expect(&Token::RParen, "')'")?;
                Ok(expr)
            }
            _ => Err(self.unexpected("una expresión")),
        }
    }

    /// Comma-separated arguments up to the closing parenthesis.
    fn parse_args(&mut self) -> Result<Vec<Expr>, ParseError> {
        let mut args = Vec::new();
        if !self.check(&Token::RParen) {
            loop {
                args.push(self.parse_expression()?);
                if !self.eat(&Token::Comma) {
                    break;
                }
            }
        }
        self.expect(&Token::RParen, "')'")?;
        Ok(args)
    }
}
