//! Unit tests for Diagnostic, DiagnosticKind and CompileError

use core_types::{CompileError, Diagnostic, DiagnosticKind, SourcePosition};

#[cfg(test)]
mod diagnostic_tests {
    use super::*;

    #[test]
    fn test_diagnostic_constructors_set_kind() {
        let pos = SourcePosition::new(1, 1);

        assert_eq!(Diagnostic::lexical("x", pos).kind, DiagnosticKind::Lexical);
        assert_eq!(Diagnostic::syntax("x", pos).kind, DiagnosticKind::Syntax);
        assert_eq!(Diagnostic::semantic("x", pos).kind, DiagnosticKind::Semantic);
    }

    #[test]
    fn test_diagnostic_display_with_position() {
        let diagnostic = Diagnostic::lexical("invalid character `#`", SourcePosition::new(7, 2));

        assert_eq!(
            diagnostic.to_string(),
            "7:2: lexical error: invalid character `#`"
        );
    }

    #[test]
    fn test_diagnostic_equality() {
        let a = Diagnostic::semantic("duplicate definition of `x`", SourcePosition::new(3, 9));
        let b = Diagnostic::semantic("duplicate definition of `x`", SourcePosition::new(3, 9));
        let c = Diagnostic::semantic("duplicate definition of `x`", SourcePosition::new(4, 9));

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_diagnostic_serializes_to_json() {
        let diagnostic = Diagnostic::syntax("expected `;`", SourcePosition::new(2, 5));
        let json = serde_json::to_value(&diagnostic).unwrap();

        assert_eq!(json["kind"], "Syntax");
        assert_eq!(json["message"], "expected `;`");
        assert_eq!(json["position"]["line"], 2);
        assert_eq!(json["position"]["column"], 5);
    }
}

#[cfg(test)]
mod compile_error_tests {
    use super::*;

    #[test]
    fn test_rejected_preserves_order() {
        let first = Diagnostic::syntax("first", SourcePosition::new(1, 1));
        let second = Diagnostic::semantic("second", SourcePosition::new(9, 1));
        let error = CompileError::Rejected(vec![first.clone(), second.clone()]);

        assert_eq!(error.diagnostics(), &[first, second]);
    }

    #[test]
    fn test_compile_error_is_std_error() {
        let error: Box<dyn std::error::Error> = Box::new(CompileError::internal("boom"));

        assert_eq!(error.to_string(), "internal compiler error: boom");
    }
}
