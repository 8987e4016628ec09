//! Shared vocabulary for the MiniJava compiler pipeline.
//!
//! This crate provides the types every phase agrees on: source positions and
//! the diagnostic/error values that phases report.
//!
//! # Overview
//!
//! - [`SourcePosition`] - Line/column location in a source file
//! - [`Diagnostic`] - A lexical, syntax or semantic error message
//! - [`DiagnosticKind`] - Which phase produced a diagnostic
//! - [`CompileError`] - Failure value returned by a phase
//!
//! # Examples
//!
//! ```
//! use core_types::{CompileError, Diagnostic, SourcePosition};
//!
//! let diagnostics = vec![Diagnostic::syntax(
//!     "expected `)` but found `;`",
//!     SourcePosition::new(4, 17),
//! )];
//! let error = CompileError::Rejected(diagnostics);
//!
//! assert_eq!(error.diagnostics().len(), 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

mod error;
mod source;

pub use error::{CompileError, Diagnostic, DiagnosticKind};
pub use source::SourcePosition;
