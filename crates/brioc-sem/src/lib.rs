//! brioc-sem - Semantic Analyzer & Type Checker
//!
//! ============================================================================
//! OVERVIEW
//! ============================================================================
//!
//! This crate is the semantic phase of the Brio front-end. It consumes the
//! parse tree produced by `brioc-par` and produces two things:
//!
//! 1. A structured symbol table organized by lexical scope, and
//! 2. An ordered list of semantic diagnostics.
//!
//! The phase answers the questions syntax alone cannot:
//! - Is this name defined, and what does it refer to here?
//! - Are these types compatible?
//! - Is this statement reachable?
//! - Is `break`/`continue`/`this`/`return` legal in this context?
//!
//! PIPELINE (leaves first):
//! ------------------------
//!
//! ```text
//!   [types]    closed set of type terms + compatibility relations
//!      │
//!   [symbols]  tagged records: variable, const, param, function, class
//!      │
//!   [scope]    arena of lexical scopes + the active stack
//!      │
//!   [checker]  tree walker: defines symbols, types expressions,
//!              enforces rules, emits diagnostics
//! ```
//!
//! The checker owns the scope stack and the diagnostic collector, and it
//! queries the type system for every compatibility decision.
//!
//! ERROR PHILOSOPHY:
//! -----------------
//! No semantic error is fatal. Every violation is reported locally and the
//! walk continues, so a single run reports everything wrong with the tree.
//! Failed expression checks recover with the `void` type.
//!
//! SCOPES AND OWNERSHIP:
//! ---------------------
//! Scopes form a tree with parent back-pointers, and functions keep a
//! reference to their declaration scope (the closure scope). Both are
//! represented as indices into an arena rather than owned edges: a nested
//! function whose closure scope owned it back would form a cycle. See
//! [`scope`] for the arena, and [`checker`] for how call checking re-enters
//! a closure scope.
//!
//! CONCURRENCY:
//! ------------
//! The analyzer is single-threaded and synchronous. One [`TypeChecker`]
//! processes one tree; independent checkers share no mutable state, so a
//! driver may run any number of them concurrently.
//!
//! # Examples
//!
//! ```
//! use brioc_par::parse;
//! use brioc_sem::analyze;
//!
//! let program = parse("let x: integer = 5; x = \"hola\";").unwrap();
//! let analysis = analyze(&program);
//!
//! assert!(analysis.reporter.has_errors());
//! let diag = analysis.reporter.iter().next().unwrap();
//! assert_eq!(diag.code.to_string(), "E_ASSIGN");
//! ```

pub mod checker;
pub mod scope;
pub mod symbols;
pub mod types;

#[cfg(test)]
mod edge_cases;

pub use checker::{analyze, Analysis, TypeChecker};
pub use scope::{Scope, ScopeId, ScopeKind, ScopeStack};
pub use symbols::{ClassSymbol, FuncSymbol, ParamSymbol, Symbol, VarSymbol};
pub use types::Type;
