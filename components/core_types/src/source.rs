//! Source position tracking for tokens, AST nodes, diagnostics and instructions.

use serde::Serialize;
use std::fmt;

/// Represents a position in MiniJava source code.
///
/// Lines and columns are 1-based. Every token, AST node and diagnostic carries
/// one of these so that errors can point at the offending construct.
///
/// # Examples
///
/// ```
/// use core_types::SourcePosition;
///
/// let pos = SourcePosition::new(10, 5);
///
/// assert_eq!(pos.line, 10);
/// assert_eq!(pos.to_string(), "10:5");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SourcePosition {
    /// Line (row) number, 1-based
    pub line: u32,
    /// Column number, 1-based
    pub column: u32,
}

impl SourcePosition {
    /// Create a new source position
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }

    /// Position of the first character of a source file
    pub fn start() -> Self {
        Self { line: 1, column: 1 }
    }
}

impl Default for SourcePosition {
    fn default() -> Self {
        Self::start()
    }
}

impl fmt::Display for SourcePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}
