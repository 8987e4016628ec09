//! Parser and resolver diagnostic helpers

use crate::token::Token;
use core_types::{Diagnostic, SourcePosition};

/// Why a construct could not be parsed.
///
/// Lexical failures carry no diagnostic: the error token's message was
/// already recorded when the token was consumed.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ParseFailure {
    /// Grammar mismatch, to be recorded by the construct that recovers
    Syntax(Diagnostic),
    /// An error token was consumed in place of the expected token
    Lexical,
}

pub(crate) type ParseResult<T> = Result<T, ParseFailure>;

/// Create a syntax failure at a given position
pub(crate) fn syntax_error(message: impl Into<String>, position: SourcePosition) -> ParseFailure {
    ParseFailure::Syntax(Diagnostic::syntax(message, position))
}

/// Create an unexpected token failure
pub(crate) fn unexpected_token(expected: &str, got: &Token) -> ParseFailure {
    syntax_error(
        format!("expected {} but found {}", expected, got.kind),
        got.position,
    )
}

/// A name defined twice in the same scope and namespace
pub(crate) fn duplicate_definition(
    namespace: &str,
    name: &str,
    position: SourcePosition,
) -> Diagnostic {
    Diagnostic::semantic(
        format!("duplicate definition of {} `{}`", namespace, name),
        position,
    )
}

/// A name that does not resolve in its namespace
pub(crate) fn unresolved(namespace: &str, name: &str, position: SourcePosition) -> Diagnostic {
    Diagnostic::semantic(format!("cannot find {} `{}`", namespace, name), position)
}

/// A method needing more argument or local slots than an instruction can address
pub(crate) fn slots_exhausted(what: &str, position: SourcePosition) -> Diagnostic {
    Diagnostic::semantic(
        format!("too many {} in one method (at most {})", what, u16::MAX),
        position,
    )
}
