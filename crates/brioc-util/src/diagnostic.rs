//! Diagnostic module - Semantic error reporting infrastructure.
//!
//! The analyzer never aborts on a rule violation: every violation becomes a
//! [`Diagnostic`] appended to an [`ErrorReporter`], and traversal continues.
//! The driver decides what to do with the collected list (exit code, display
//! order). Records are kept in insertion order and never deduplicated.
//!
//! # Examples
//!
//! ```
//! use brioc_util::{ErrorCode, ErrorReporter};
//!
//! let mut reporter = ErrorReporter::new();
//! reporter.report(3, 5, ErrorCode::Undef, "Símbolo no definido: x");
//!
//! assert!(reporter.has_errors());
//! assert_eq!(reporter.count(), 1);
//! assert_eq!(
//!     reporter.iter().next().unwrap().to_string(),
//!     "[3:5] E_UNDEF: Símbolo no definido: x"
//! );
//! ```

use std::fmt;

/// A code identifying the semantic rule a diagnostic was produced by.
///
/// The set is closed: each variant corresponds to exactly one rule of the
/// analyzer. `Display` renders the canonical spelling (`E_REDECL`, …) used
/// in driver output.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// Duplicate name in the same scope
    Redecl,
    /// Identifier unresolved in the scope chain
    Undef,
    /// Assignment or initializer type mismatch
    Assign,
    /// Return type mismatch or missing return in non-void function
    Return,
    /// Additive rule miss
    Add,
    /// Multiplicative rule miss
    Mul,
    /// Relational rule miss
    Rel,
    /// Equality rule miss
    Eq,
    /// Logical-and rule miss
    And,
    /// Logical-or rule miss
    Or,
    /// Unary rule miss
    Unary,
    /// Non-callee, arity, or argument type mismatch
    Call,
    /// Unknown class or constructor mismatch
    New,
    /// `this` outside a class
    This,
    /// Non-array indexed or non-integer index
    Index,
    /// Heterogeneous array literal
    ArrayElem,
    /// Non-boolean `if` condition
    If,
    /// Non-boolean `while` condition
    While,
    /// Non-boolean `do-while` condition
    DoWhile,
    /// Non-boolean `for` condition
    For,
    /// Iterated value not an array
    Foreach,
    /// Case expression incompatible with control type
    Switch,
    /// `break` outside loop or switch
    Break,
    /// `continue` outside loop
    Continue,
    /// Non-boolean ternary condition
    Ternary,
    /// Unreachable statement after return/break/continue
    DeadCode,
}

impl ErrorCode {
    /// The canonical spelling of the code.
    pub const fn as_str(self) -> &'static str {
        match self {
            ErrorCode::Redecl => "E_REDECL",
            ErrorCode::Undef => "E_UNDEF",
            ErrorCode::Assign => "E_ASSIGN",
            ErrorCode::Return => "E_RETURN",
            ErrorCode::Add => "E_ADD",
            ErrorCode::Mul => "E_MUL",
            ErrorCode::Rel => "E_REL",
            ErrorCode::Eq => "E_EQ",
            ErrorCode::And => "E_AND",
            ErrorCode::Or => "E_OR",
            ErrorCode::Unary => "E_UNARY",
            ErrorCode::Call => "E_CALL",
            ErrorCode::New => "E_NEW",
            ErrorCode::This => "E_THIS",
            ErrorCode::Index => "E_INDEX",
            ErrorCode::ArrayElem => "E_ARRAY_ELEM",
            ErrorCode::If => "E_IF",
            ErrorCode::While => "E_WHILE",
            ErrorCode::DoWhile => "E_DOWHILE",
            ErrorCode::For => "E_FOR",
            ErrorCode::Foreach => "E_FOREACH",
            ErrorCode::Switch => "E_SWITCH",
            ErrorCode::Break => "E_BREAK",
            ErrorCode::Continue => "E_CONTINUE",
            ErrorCode::Ternary => "E_TERNARY",
            ErrorCode::DeadCode => "E_DEADCODE",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A positioned semantic error record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    /// Line of the offending node (1-based)
    pub line: u32,
    /// Column of the offending node (1-based)
    pub col: u32,
    /// Rule code
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}:{}] {}: {}", self.line, self.col, self.code, self.message)
    }
}

/// Ordered, append-only collector of semantic diagnostics.
///
/// The type checker owns one reporter per analysis run; nothing else writes
/// to it. Insertion order is traversal order.
#[derive(Debug, Default)]
pub struct ErrorReporter {
    diagnostics: Vec<Diagnostic>,
}

impl ErrorReporter {
    /// Create an empty reporter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic at the given position.
    pub fn report(&mut self, line: u32, col: u32, code: ErrorCode, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic {
            line,
            col,
            code,
            message: message.into(),
        });
    }

    /// True if at least one diagnostic was recorded.
    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    /// Number of recorded diagnostics.
    pub fn count(&self) -> usize {
        self.diagnostics.len()
    }

    /// True if no diagnostics were recorded.
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Iterate over the diagnostics in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    /// Drop all recorded diagnostics.
    pub fn clear(&mut self) {
        self.diagnostics.clear();
    }
}

impl fmt::Display for ErrorReporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.diagnostics.is_empty() {
            return f.write_str("No hay errores.");
        }
        for (i, diag) in self.diagnostics.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{diag}")?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a ErrorReporter {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.diagnostics.iter()
    }
}
