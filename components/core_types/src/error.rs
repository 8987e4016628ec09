//! Compiler diagnostics and pipeline errors.
//!
//! Diagnostics are accumulated by the parser and the resolver instead of being
//! raised one at a time; a phase that finishes with a non-empty list surfaces
//! the whole batch as a single [`CompileError::Rejected`].

use crate::SourcePosition;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// The kind of a compiler diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DiagnosticKind {
    /// Malformed token reported by the token source
    Lexical,
    /// Grammar mismatch found by the parser
    Syntax,
    /// Duplicate definition, unresolved name or ill-formed use found by resolution
    Semantic,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DiagnosticKind::Lexical => "lexical",
            DiagnosticKind::Syntax => "syntax",
            DiagnosticKind::Semantic => "semantic",
        };
        f.write_str(name)
    }
}

/// A single compiler diagnostic with message and source position.
///
/// # Examples
///
/// ```
/// use core_types::{Diagnostic, DiagnosticKind, SourcePosition};
///
/// let diagnostic = Diagnostic::syntax("expected `;`", SourcePosition::new(3, 14));
///
/// assert_eq!(diagnostic.kind, DiagnosticKind::Syntax);
/// assert_eq!(diagnostic.to_string(), "3:14: syntax error: expected `;`");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// The kind of diagnostic
    pub kind: DiagnosticKind,
    /// Human-readable message
    pub message: String,
    /// Source position the diagnostic refers to
    pub position: Option<SourcePosition>,
}

impl Diagnostic {
    /// Create a diagnostic of the given kind
    pub fn new(
        kind: DiagnosticKind,
        message: impl Into<String>,
        position: Option<SourcePosition>,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            position,
        }
    }

    /// Create a lexical diagnostic
    pub fn lexical(message: impl Into<String>, position: SourcePosition) -> Self {
        Self::new(DiagnosticKind::Lexical, message, Some(position))
    }

    /// Create a syntax diagnostic
    pub fn syntax(message: impl Into<String>, position: SourcePosition) -> Self {
        Self::new(DiagnosticKind::Syntax, message, Some(position))
    }

    /// Create a semantic diagnostic
    pub fn semantic(message: impl Into<String>, position: SourcePosition) -> Self {
        Self::new(DiagnosticKind::Semantic, message, Some(position))
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.position {
            Some(position) => write!(f, "{}: {} error: {}", position, self.kind, self.message),
            None => write!(f, "{} error: {}", self.kind, self.message),
        }
    }
}

/// Failure value of a compiler phase.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// The program was rejected; carries every diagnostic in the order recorded
    #[error("compilation failed with {} error(s)", .0.len())]
    Rejected(Vec<Diagnostic>),
    /// An internal consistency violation (e.g. a missing environment entry)
    #[error("internal compiler error: {0}")]
    Internal(String),
}

impl CompileError {
    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        CompileError::Internal(message.into())
    }

    /// The diagnostics carried by a rejection, empty for internal errors
    pub fn diagnostics(&self) -> &[Diagnostic] {
        match self {
            CompileError::Rejected(diagnostics) => diagnostics,
            CompileError::Internal(_) => &[],
        }
    }
}
