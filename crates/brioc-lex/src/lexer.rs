//! Core lexer implementation.

use brioc_util::Span;
use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::token::Token;

/// A lexical error, positioned at the offending character.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LexError {
    /// A character outside the language alphabet
    #[error("[{line}:{col}] carácter inesperado '{ch}'")]
    UnexpectedChar { ch: char, line: u32, col: u32 },

    /// A string literal missing its closing quote
    #[error("[{line}:{col}] cadena sin terminar")]
    UnterminatedString { line: u32, col: u32 },

    /// A block comment missing its closing delimiter
    #[error("[{line}:{col}] comentario de bloque sin terminar")]
    UnterminatedComment { line: u32, col: u32 },

    /// An integer literal that does not fit the numeric range
    #[error("[{line}:{col}] literal numérico fuera de rango")]
    IntOutOfRange { line: u32, col: u32 },
}

/// Lexer for the Brio language.
///
/// Holds its own cursor state (byte position plus 1-based line/column) and
/// produces one token per [`Lexer::next_token`] call.
pub struct Lexer<'a> {
    source: &'a str,
    position: usize,
    line: u32,
    column: u32,
    /// Position of the current token start, captured before dispatch.
    token_start: usize,
    token_start_line: u32,
    token_start_column: u32,
    keywords: FxHashMap<&'static str, Token>,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given source code.
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            position: 0,
            line: 1,
            column: 1,
            token_start: 0,
            token_start_line: 1,
            token_start_column: 1,
            keywords: keyword_table(),
        }
    }

    /// Lexes the entire source, pairing each token with its span.
    ///
    /// The terminating [`Token::Eof`] is not included in the result.
    pub fn tokenize(mut self) -> Result<Vec<(Token, Span)>, LexError> {
        let mut tokens = Vec::new();
        loop {
            let (token, span) = self.next_token()?;
            if token == Token::Eof {
                return Ok(tokens);
            }
            tokens.push((token, span));
        }
    }

    /// Returns the next token and its span.
    pub fn next_token(&mut self) -> Result<(Token, Span), LexError> {
        self.skip_whitespace_and_comments()?;

        self.token_start = self.position;
        self.token_start_line = self.line;
        self.token_start_column = self.column;

        let Some(c) = self.current_char() else {
            return Ok((Token::Eof, self.token_span()));
        };

        let token = match c {
            '(' => self.single(Token::LParen),
            ')' => self.single(Token::RParen),
            '{' => self.single(Token::LBrace),
            '}' => self.single(Token::RBrace),
            '[' => self.single(Token::LBracket),
            ']' => self.single(Token::RBracket),
            ',' => self.single(Token::Comma),
            ';' => self.single(Token::Semicolon),
            ':' => self.single(Token::Colon),
            '.' => self.single(Token::Dot),
            '?' => self.single(Token::Question),
            '+' => self.single(Token::Plus),
            '-' => self.single(Token::Minus),
            '*' => self.single(Token::Star),
            '/' => self.single(Token::Slash),
            '%' => self.single(Token::Percent),
            '=' => {
                self.advance();
                if self.match_char('=') {
                    Token::EqEq
                } else {
                    Token::Assign
                }
            }
            '!' => {
                self.advance();
                if self.match_char('=') {
                    Token::NotEq
                } else {
                    Token::Bang
                }
            }
            '<' => {
                self.advance();
                if self.match_char('=') {
                    Token::Le
                } else {
                    Token::Lt
                }
            }
            '>' => {
                self.advance();
                if self.match_char('=') {
                    Token::Ge
                } else {
                    Token::Gt
                }
            }
            '&' => {
                self.advance();
                if self.match_char('&') {
                    Token::AndAnd
                } else {
                    return Err(self.unexpected('&'));
                }
            }
            '|' => {
                self.advance();
                if self.match_char('|') {
                    Token::OrOr
                } else {
                    return Err(self.unexpected('|'));
                }
            }
            '"' => self.lex_string()?,
            c if c.is_ascii_digit() => self.lex_number()?,
            c if is_ident_start(c) => self.lex_identifier(),
            c => return Err(self.unexpected(c)),
        };

        Ok((token, self.token_span()))
    }

    fn single(&mut self, token: Token) -> Token {
        self.advance();
        token
    }

    fn lex_identifier(&mut self) -> Token {
        while let Some(c) = self.current_char() {
            if is_ident_continue(c) {
                self.advance();
            } else {
                break;
            }
        }
        let text = &self.source[self.token_start..self.position];
        match self.keywords.get(text) {
            Some(keyword) => keyword.clone(),
            None => Token::Ident(text.to_string()),
        }
    }

    fn lex_number(&mut self) -> Result<Token, LexError> {
        while let Some(c) = self.current_char() {
            if c.is_ascii_digit() {
                self.advance();
            } else {
                break;
            }
        }
        let text = &self.source[self.token_start..self.position];
        text.parse::<i64>()
            .map(Token::Int)
            .map_err(|_| LexError::IntOutOfRange {
                line: self.token_start_line,
                col: self.token_start_column,
            })
    }

    fn lex_string(&mut self) -> Result<Token, LexError> {
        self.advance(); // opening quote
        let mut value = String::new();
        loop {
            match self.current_char() {
                None | Some('\n') => {
                    return Err(LexError::UnterminatedString {
                        line: self.token_start_line,
                        col: self.token_start_column,
                    });
                }
                Some('"') => {
                    self.advance();
                    return Ok(Token::Str(value));
                }
                Some('\\') => {
                    self.advance();
                    match self.current_char() {
                        Some('n') => value.push('\n'),
                        Some('t') => value.push('\t'),
                        Some('r') => value.push('\r'),
                        Some('\\') => value.push('\\'),
                        Some('"') => value.push('"'),
                        Some(other) => {
                            // Unknown escape: keep the character as written.
                            value.push(other);
                        }
                        None => {
                            return Err(LexError::UnterminatedString {
                                line: self.token_start_line,
                                col: self.token_start_column,
                            });
                        }
                    }
                    self.advance();
                }
                Some(c) => {
                    value.push(c);
                    self.advance();
                }
            }
        }
    }

    fn skip_whitespace_and_comments(&mut self) -> Result<(), LexError> {
        loop {
            match self.current_char() {
                Some(c) if c.is_whitespace() => self.advance(),
                Some('/') if self.peek_char(1) == Some('/') => {
                    while let Some(c) = self.current_char() {
                        if c == '\n' {
                            break;
                        }
                        self.advance();
                    }
                }
                Some('/') if self.peek_char(1) == Some('*') => {
                    let (line, col) = (self.line, self.column);
                    self.advance();
                    self.advance();
                    loop {
                        match self.current_char() {
                            None => return Err(LexError::UnterminatedComment { line, col }),
                            Some('*') if self.peek_char(1) == Some('/') => {
                                self.advance();
                                self.advance();
                                break;
                            }
                            Some(_) => self.advance(),
                        }
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    fn token_span(&self) -> Span {
        Span::new(
            self.token_start,
            self.position,
            self.token_start_line,
            self.token_start_column,
        )
    }

    fn unexpected(&self, ch: char) -> LexError {
        LexError::UnexpectedChar {
            ch,
            line: self.token_start_line,
            col: self.token_start_column,
        }
    }

    fn current_char(&self) -> Option<char> {
        self.source[self.position..].chars().next()
    }

    fn peek_char(&self, offset: usize) -> Option<char> {
        self.source[self.position..].chars().nth(offset)
    }

    fn advance(&mut self) {
        if let Some(c) = self.current_char() {
            self.position += c.len_utf8();
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
    }

    fn match_char(&mut self, expected: char) -> bool {
        if self.current_char() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn keyword_table() -> FxHashMap<&'static str, Token> {
    let mut table = FxHashMap::default();
    table.insert("let", Token::Let);
    table.insert("const", Token::Const);
    table.insert("function", Token::Function);
    table.insert("class", Token::Class);
    table.insert("if", Token::If);
    table.insert("else", Token::Else);
    table.insert("while", Token::While);
    table.insert("do", Token::Do);
    table.insert("for", Token::For);
    table.insert("foreach", Token::Foreach);
    table.insert("in", Token::In);
    table.insert("switch", Token::Switch);
    table.insert("case", Token::Case);
    table.insert("default", Token::Default);
    table.insert("break", Token::Break);
    table.insert("continue", Token::Continue);
    table.insert("return", Token::Return);
    table.insert("try", Token::Try);
    table.insert("catch", Token::Catch);
    table.insert("new", Token::New);
    table.insert("this", Token::This);
    table.insert("true", Token::True);
    table.insert("false", Token::False);
    table.insert("null", Token::Null);
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(source: &str) -> Vec<Token> {
        Lexer::new(source)
            .tokenize()
            .expect("lexing failed")
            .into_iter()
            .map(|(tok, _)| tok)
            .collect()
    }

    #[test]
    fn test_keywords_and_identifiers() {
        assert_eq!(
            tokens("let foo function clase"),
            vec![
                Token::Let,
                Token::Ident("foo".into()),
                Token::Function,
                Token::Ident("clase".into()),
            ]
        );
    }

    #[test]
    fn test_type_words_are_identifiers() {
        assert_eq!(
            tokens("integer string boolean void"),
            vec![
                Token::Ident("integer".into()),
                Token::Ident("string".into()),
                Token::Ident("boolean".into()),
                Token::Ident("void".into()),
            ]
        );
    }

    #[test]
    fn test_operators() {
        assert_eq!(
            tokens("== != <= >= && || = < > ! ?"),
            vec![
                Token::EqEq,
                Token::NotEq,
                Token::Le,
                Token::Ge,
                Token::AndAnd,
                Token::OrOr,
                Token::Assign,
                Token::Lt,
                Token::Gt,
                Token::Bang,
                Token::Question,
            ]
        );
    }

    #[test]
    fn test_literals() {
        assert_eq!(
            tokens(r#"42 "hola" true false null"#),
            vec![
                Token::Int(42),
                Token::Str("hola".into()),
                Token::True,
                Token::False,
                Token::Null,
            ]
        );
    }

    #[test]
    fn test_string_escapes() {
        assert_eq!(
            tokens(r#""a\nb\"c""#),
            vec![Token::Str("a\nb\"c".into())]
        );
    }

    #[test]
    fn test_comments_are_skipped() {
        let src = "let x; // comentario\n/* bloque\n de varias líneas */ let y;";
        assert_eq!(
            tokens(src),
            vec![
                Token::Let,
                Token::Ident("x".into()),
                Token::Semicolon,
                Token::Let,
                Token::Ident("y".into()),
                Token::Semicolon,
            ]
        );
    }

    #[test]
    fn test_spans_track_lines_and_columns() {
        let spanned = Lexer::new("let x;\n  x = 1;").tokenize().unwrap();
        let (_, let_span) = &spanned[0];
        assert_eq!((let_span.line, let_span.column), (1, 1));
        let (tok, x_span) = &spanned[3];
        assert_eq!(tok, &Token::Ident("x".into()));
        assert_eq!((x_span.line, x_span.column), (2, 3));
    }

    #[test]
    fn test_unterminated_string() {
        let err = Lexer::new("\"abierta").tokenize().unwrap_err();
        assert!(matches!(err, LexError::UnterminatedString { line: 1, col: 1 }));
    }

    #[test]
    fn test_unexpected_char() {
        let err = Lexer::new("let @").tokenize().unwrap_err();
        assert!(matches!(err, LexError::UnexpectedChar { ch: '@', .. }));
    }

    #[test]
    fn test_lone_ampersand_is_rejected() {
        let err = Lexer::new("a & b").tokenize().unwrap_err();
        assert!(matches!(err, LexError::UnexpectedChar { ch: '&', .. }));
    }
}
