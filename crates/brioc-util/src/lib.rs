//! brioc-util - Foundation Types
//!
//! Shared infrastructure for the brioc front-end: source location tracking
//! ([`Span`]) and semantic diagnostics ([`Diagnostic`], [`ErrorCode`],
//! [`ErrorReporter`]).
//!
//! Every later phase builds on these types: the lexer stamps each token with
//! a `Span`, the parser threads spans into AST nodes, and the semantic
//! analyzer turns rule violations into positioned `Diagnostic` records that
//! the driver renders for the user.

pub mod diagnostic;
pub mod span;

pub use diagnostic::{Diagnostic, ErrorCode, ErrorReporter};
pub use span::Span;
