//! brioc-par - Parser (Syntactic Analyzer)
//!
//! Recursive-descent parser for the Brio language. Each grammar rule has a
//! corresponding `parse_*` method; expressions are parsed with precedence
//! climbing (see [`expr`]). The output is the AST defined in [`ast`], with
//! every node carrying the span of its first token.
//!
//! The parser is strict: the first syntax error aborts with a
//! [`ParseError`]. The semantic analyzer downstream only ever sees
//! well-formed trees; *it* is the phase that recovers and keeps going.
//!
//! # Examples
//!
//! ```
//! use brioc_par::parse;
//!
//! let program = parse("let x: integer = 5;").unwrap();
//! assert_eq!(program.stmts.len(), 1);
//! ```

pub mod ast;
mod expr;
mod stmt;

use brioc_lex::{LexError, Lexer, Token};
use brioc_util::Span;
use thiserror::Error;

pub use ast::*;

/// A syntax error, positioned at the offending token.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The lexer rejected the input before parsing started.
    #[error(transparent)]
    Lex(#[from] LexError),

    /// The token stream did not match the grammar.
    #[error("[{line}:{col}] se esperaba {expected}, se encontró '{found}'")]
    Unexpected {
        expected: String,
        found: String,
        line: u32,
        col: u32,
    },
}

/// Parse a complete Brio source buffer into a [`Program`].
pub fn parse(source: &str) -> Result<Program, ParseError> {
    Parser::new(source)?.parse_program()
}

/// Recursive-descent parser over the full token vector.
pub struct Parser {
    tokens: Vec<(Token, Span)>,
    pos: usize,
    eof_span: Span,
}

impl Parser {
    /// Lex `source` and set up a parser over the resulting tokens.
    pub fn new(source: &str) -> Result<Self, ParseError> {
        let tokens = Lexer::new(source).tokenize()?;
        let eof_span = tokens
            .last()
            .map(|(_, span)| Span::point(span.line, span.column + span.len() as u32))
            .unwrap_or(Span::point(1, 1));
        Ok(Self {
            tokens,
            pos: 0,
            eof_span,
        })
    }

    /// Parse the whole program: `statement* EOF`.
    pub fn parse_program(mut self) -> Result<Program, ParseError> {
        let mut stmts = Vec::new();
        while !self.at_end() {
            stmts.push(self.parse_statement()?);
        }
        Ok(Program { stmts })
    }

    // =========================================================================
    // TYPE ANNOTATIONS
    // =========================================================================

    /// `type = baseType { "[" "]" }` — the bracket-pair count becomes `dims`.
    pub(crate) fn parse_type(&mut self) -> Result<TypeNode, ParseError> {
        let ident = self.expect_ident("un tipo")?;
        let base = match ident.name.as_str() {
            "integer" => TypeBase::Integer,
            "string" => TypeBase::String,
            "boolean" => TypeBase::Boolean,
            "void" => TypeBase::Void,
            _ => TypeBase::Named(ident.name),
        };
        let mut dims = 0u32;
        while self.check(&Token::LBracket) {
            self.advance();
            self.expect(&Token::RBracket, "']'")?;
            dims += 1;
        }
        Ok(TypeNode {
            base,
            dims,
            span: ident.span,
        })
    }

    // =========================================================================
    // TOKEN STREAM HELPERS
    // =========================================================================

    pub(crate) fn peek(&self) -> &Token {
        self.tokens
            .get(self.pos)
            .map(|(tok, _)| tok)
            .unwrap_or(&Token::Eof)
    }

    pub(crate) fn peek_at(&self, offset: usize) -> &Token {
        self.tokens
            .get(self.pos + offset)
            .map(|(tok, _)| tok)
            .unwrap_or(&Token::Eof)
    }

    pub(crate) fn current_span(&self) -> Span {
        self.tokens
            .get(self.pos)
            .map(|(_, span)| *span)
            .unwrap_or(self.eof_span)
    }

    pub(crate) fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    pub(crate) fn advance(&mut self) -> (Token, Span) {
        let item = self
            .tokens
            .get(self.pos)
            .cloned()
            .unwrap_or((Token::Eof, self.eof_span));
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        item
    }

    pub(crate) fn check(&self, token: &Token) -> bool {
        self.peek() == token
    }

    /// Consume the token if it matches; report whether it did.
    pub(crate) fn eat(&mut self, token: &Token) -> bool {
        if self.check(token) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consume the expected token or fail with its description.
    pub(crate) fn expect(&mut self, token: &Token, expected: &str) -> Result<Span, ParseError> {
        if self.check(token) {
            Ok(self.advance().1)
        } else {
            Err(self.unexpected(expected))
        }
    }

    /// Consume an identifier token or fail.
    pub(crate) fn expect_ident(&mut self, expected: &str) -> Result<Ident, ParseError> {
        match self.peek() {
            Token::Ident(_) => {
                let (token, span) = self.advance();
                let Token::Ident(name) = token else {
                    unreachable!()
                };
                Ok(Ident { name, span })
            }
            _ => Err(self.unexpected(expected)),
        }
    }

    pub(crate) fn unexpected(&self, expected: &str) -> ParseError {
        let span = self.current_span();
        ParseError::Unexpected {
            expected: expected.to_string(),
            found: self.peek().to_string(),
            line: span.line,
            col: span.column,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_program() {
        let program = parse("").unwrap();
        assert!(program.stmts.is_empty());
    }

    #[test]
    fn test_parse_type_annotation_dims() {
        let program = parse("let m: integer[][] = [[1],[2]];").unwrap();
        let Stmt::VarDecl(decl) = &program.stmts[0] else {
            panic!("expected variable declaration");
        };
        let ty = decl.ty.as_ref().unwrap();
        assert_eq!(ty.base, TypeBase::Integer);
        assert_eq!(ty.dims, 2);
    }

    #[test]
    fn test_parse_class_type_annotation() {
        let program = parse("let p: Point;").unwrap();
        let Stmt::VarDecl(decl) = &program.stmts[0] else {
            panic!("expected variable declaration");
        };
        assert_eq!(
            decl.ty.as_ref().unwrap().base,
            TypeBase::Named("Point".into())
        );
    }

    #[test]
    fn test_syntax_error_has_position() {
        let err = parse("let = 5;").unwrap_err();
        match err {
            ParseError::Unexpected { line, col, .. } => {
                assert_eq!(line, 1);
                assert_eq!(col, 5);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_lex_error_propagates() {
        assert!(matches!(parse("let x = @;"), Err(ParseError::Lex(_))));
    }
}
