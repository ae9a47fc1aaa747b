//! brioc-lex - Lexical Analyzer
//!
//! Transforms Brio source text into a stream of tokens. The lexer is
//! direct-coded: [`Lexer::next_token`] dispatches on the current character
//! and each token category has its own scanning method. Whitespace and
//! comments (`//` line, `/* */` block) are skipped between tokens.
//!
//! Every token is paired with the [`Span`](brioc_util::Span) of its lexeme,
//! which the parser threads into the AST so the semantic analyzer can
//! position its diagnostics.
//!
//! One deliberate quirk of the token set: the type words `integer`,
//! `string`, `boolean`, and `void` are *not* keywords. They lex as ordinary
//! identifiers so the same word works in a type annotation and in
//! expression position, where the analyzer resolves it to the primitive
//! type instead of reporting an undefined symbol.
//!
//! # Examples
//!
//! ```
//! use brioc_lex::{Lexer, Token};
//!
//! let tokens = Lexer::new("let x = 42;").tokenize().unwrap();
//! let kinds: Vec<_> = tokens.into_iter().map(|(tok, _)| tok).collect();
//! assert_eq!(
//!     kinds,
//!     vec![
//!         Token::Let,
//!         Token::Ident("x".into()),
//!         Token::Assign,
//!         Token::Int(42),
//!         Token::Semicolon,
//!     ]
//! );
//! ```

mod lexer;
mod token;

pub use lexer::{LexError, Lexer};
pub use token::Token;
