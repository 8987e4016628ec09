//! Full Pipeline Integration Tests
//!
//! Runs every stage over complete programs and checks the invariants that
//! hold across component boundaries.

use core_types::{CompileError, DiagnosticKind};
use integration_tests::{assert_well_formed, compile, programs};
use parser::{Parser, ScopeAnalyzer, SequentialLayout};

#[test]
fn test_sample_programs_are_well_formed() {
    for source in [programs::FACTORIAL, programs::BUBBLE_SORT, programs::SHAPES] {
        let pipeline = compile(source).expect("Failed to compile");
        for method in pipeline.code.methods.values() {
            assert_well_formed(&method.name, &method.chunk);
        }
    }
}

#[test]
fn test_one_chunk_per_method() {
    let pipeline = compile(programs::BUBBLE_SORT).expect("Failed to compile");
    let names: Vec<_> = pipeline
        .code
        .methods
        .values()
        .map(|method| method.name.as_str())
        .collect();
    assert_eq!(
        names,
        vec!["BubbleSort.main", "BBS.start", "BBS.sort", "BBS.print", "BBS.init"]
    );
}

#[test]
fn test_layout_covers_every_symbol() {
    let pipeline = compile(programs::SHAPES).expect("Failed to compile");
    let environment = SequentialLayout::build(&pipeline.table);

    for name in ["int", "boolean", "void", "Shapes", "Shape", "Square"] {
        assert!(pipeline.table.resolve_type(name).is_some(), "{}", name);
        assert!(environment.type_handle(name).is_ok(), "{}", name);
    }
}

#[test]
fn test_every_expression_is_typed() {
    let pipeline = compile(programs::FACTORIAL).expect("Failed to compile");
    let main = pipeline.program.main_class.as_ref().expect("main class");
    let parser::Statement::Print { expression, .. } = &main.statements[0] else {
        panic!("Expected print statement");
    };
    let id = expression.id().expect("invocation has an id");
    assert_eq!(
        pipeline.table.expression_type(id),
        Some(&parser::StaticType::Int)
    );
}

#[test]
fn test_syntax_errors_stop_before_resolution() {
    let source = "class Main { public static void main() { int x x; } }
        class A { public int m() { return 1 +; } }";
    let Err(CompileError::Rejected(diagnostics)) = compile(source) else {
        panic!("Expected syntax errors");
    };
    assert_eq!(diagnostics.len(), 2);
    assert!(diagnostics
        .iter()
        .all(|diagnostic| diagnostic.kind == DiagnosticKind::Syntax));
    assert!(diagnostics[0].position < diagnostics[1].position);
}

#[test]
fn test_semantic_errors_stop_before_generation() {
    let source = "class Main { public static void main() { System.out.println(new A().missing()); } }
        class A { }";
    let Err(CompileError::Rejected(diagnostics)) = compile(source) else {
        panic!("Expected semantic errors");
    };
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].kind, DiagnosticKind::Semantic);
    assert_eq!(diagnostics[0].message, "cannot find method `missing`");
}

#[test]
fn test_recovered_tree_still_resolves() {
    // The broken operand becomes an error node inside an otherwise valid tree.
    let source = "class Main { public static void main() { int x; x = ; System.out.println(x); } }";
    let (program, diagnostics) = Parser::new(source).parse_with_diagnostics();
    assert_eq!(diagnostics.len(), 1);

    let (_, semantic) = ScopeAnalyzer::new().analyze_with_diagnostics(&program);
    assert!(semantic.is_empty(), "{:?}", semantic);
}
