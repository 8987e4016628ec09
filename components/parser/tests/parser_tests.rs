//! Parser behaviour tests: precedence, lookahead disambiguation and recovery

use core_types::{Diagnostic, DiagnosticKind};
use parser::ast::{BinaryOperator, Declaration, VariableKind};
use parser::{Expression, Parser, Program, Statement};

fn wrap_main(body: &str) -> String {
    format!("class Main {{ public static void main() {{ {} }} }}", body)
}

fn parse(source: &str) -> (Program, Vec<Diagnostic>) {
    Parser::new(source).parse_with_diagnostics()
}

fn main_statements(body: &str) -> Vec<Statement> {
    let (program, diagnostics) = parse(&wrap_main(body));
    assert!(diagnostics.is_empty(), "unexpected diagnostics: {:?}", diagnostics);
    program.main_class.expect("main class").statements
}

fn printed(body: &str) -> Expression {
    match main_statements(body).remove(0) {
        Statement::Print { expression, .. } => expression,
        other => panic!("Expected print statement, got {:?}", other),
    }
}

fn binary(expression: &Expression) -> (BinaryOperator, &Expression, &Expression) {
    match expression {
        Expression::BinaryOperator {
            operator,
            left,
            right,
            ..
        } => (*operator, left, right),
        other => panic!("Expected binary operator, got {:?}", other),
    }
}

// =============================================================================
// Expressions
// =============================================================================

#[test]
fn test_multiplication_binds_tighter_than_addition() {
    let expression = printed("System.out.println(1 + 2 * 3);");
    let (root, left, right) = binary(&expression);
    assert_eq!(root, BinaryOperator::Add);
    assert!(matches!(left, Expression::IntegerLiteral { value: 1, .. }));
    assert_eq!(binary(right).0, BinaryOperator::Mul);
}

#[test]
fn test_subtraction_is_left_associative() {
    let expression = printed("System.out.println(1 - 2 - 3);");
    let (root, left, right) = binary(&expression);
    assert_eq!(root, BinaryOperator::Sub);
    assert!(matches!(right, Expression::IntegerLiteral { value: 3, .. }));

    let (inner, inner_left, inner_right) = binary(left);
    assert_eq!(inner, BinaryOperator::Sub);
    assert!(matches!(inner_left, Expression::IntegerLiteral { value: 1, .. }));
    assert!(matches!(inner_right, Expression::IntegerLiteral { value: 2, .. }));
}

#[test]
fn test_precedence_ladder() {
    // || < && < == < relational < additive < multiplicative
    let expression = printed("System.out.println(a || b && c == d < e + f * g);");
    let (or, _, rest) = binary(&expression);
    let (and, _, rest) = binary(rest);
    let (eq, _, rest) = binary(rest);
    let (lt, _, rest) = binary(rest);
    let (add, _, rest) = binary(rest);
    let (mul, _, _) = binary(rest);
    assert_eq!(
        [or, and, eq, lt, add, mul],
        [
            BinaryOperator::Or,
            BinaryOperator::And,
            BinaryOperator::Equal,
            BinaryOperator::Less,
            BinaryOperator::Add,
            BinaryOperator::Mul,
        ]
    );
}

#[test]
fn test_parentheses_override_precedence() {
    let expression = printed("System.out.println((1 + 2) * 3);");
    let (root, left, _) = binary(&expression);
    assert_eq!(root, BinaryOperator::Mul);
    assert_eq!(binary(left).0, BinaryOperator::Add);
}

#[test]
fn test_unary_not_binds_to_term() {
    let expression = printed("System.out.println(!a && b);");
    let (root, left, _) = binary(&expression);
    assert_eq!(root, BinaryOperator::And);
    assert!(matches!(left, Expression::UnaryNot { .. }));
}

#[test]
fn test_postfix_chain() {
    let expression = printed("System.out.println(a[i].m().length);");
    let Expression::MethodInvocation(length) = expression else {
        panic!("Expected `.length` invocation");
    };
    assert_eq!(length.method_name, "length");
    let Expression::MethodInvocation(call) = *length.receiver else {
        panic!("Expected `.m()` invocation");
    };
    assert_eq!(call.method_name, "m");
    assert!(matches!(*call.receiver, Expression::ArrayIndex { .. }));
}

#[test]
fn test_new_disambiguation() {
    let statements = main_statements("a = new int[5]; b = new Foo(); c = new Foo[2];");
    let sizes: Vec<bool> = statements
        .iter()
        .map(|statement| match statement {
            Statement::Assignment {
                value: Expression::InstanceCreation { array_size, .. },
                ..
            } => array_size.is_some(),
            other => panic!("Expected creation assignment, got {:?}", other),
        })
        .collect();
    assert_eq!(sizes, vec![true, false, true]);
}

// =============================================================================
// Statements
// =============================================================================

#[test]
fn test_array_declaration_vs_index_assignment() {
    let statements = main_statements("int[] a; a[0] = 1; Foo[] f; Foo g;");
    match &statements[0] {
        Statement::VariableDeclaration(declaration) => {
            assert_eq!(declaration.type_name, "int");
            assert!(declaration.is_array);
            assert_eq!(declaration.kind, VariableKind::Local);
        }
        other => panic!("Expected declaration, got {:?}", other),
    }
    assert!(matches!(
        &statements[1],
        Statement::Assignment {
            target: Expression::ArrayIndex { .. },
            ..
        }
    ));
    assert!(matches!(
        &statements[2],
        Statement::VariableDeclaration(d) if d.type_name == "Foo" && d.is_array
    ));
    assert!(matches!(
        &statements[3],
        Statement::VariableDeclaration(d) if d.type_name == "Foo" && !d.is_array
    ));
}

#[test]
fn test_if_else_and_while() {
    let statements = main_statements(
        "if (a < b) System.out.println(1); else { System.out.println(2); }
         while (true) a = a + 1;",
    );
    assert!(matches!(
        &statements[0],
        Statement::If {
            else_branch: Some(_),
            ..
        }
    ));
    assert!(matches!(&statements[1], Statement::While { .. }));
}

#[test]
fn test_assert_requires_terminator() {
    let statements = main_statements("assert(true);");
    assert!(matches!(&statements[0], Statement::Assert { .. }));

    let (_, diagnostics) = parse(&wrap_main("assert(true) System.out.println(1);"));
    assert_eq!(diagnostics.len(), 1);
}

#[test]
fn test_invocation_statement() {
    let statements = main_statements("a.run(1, 2); a.f().g();");
    let Statement::MethodInvocation(call) = &statements[0] else {
        panic!("Expected invocation statement");
    };
    assert_eq!(call.arguments.len(), 2);
    assert!(matches!(&statements[1], Statement::MethodInvocation(call) if call.method_name == "g"));
}

#[test]
fn test_keyword_other_than_statement_keywords_rejected() {
    let (_, diagnostics) = parse(&wrap_main("this.run();"));
    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics[0].message.contains("`this`"));
}

#[test]
fn test_non_invocation_expression_statement_rejected() {
    let (program, diagnostics) = parse(&wrap_main("a + 1; System.out.println(2);"));
    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics[0].message.contains("cannot form a statement"));

    let statements = program.main_class.expect("main class").statements;
    assert!(matches!(&statements[0], Statement::Error { .. }));
    assert!(matches!(&statements[1], Statement::Print { .. }));
}

#[test]
fn test_class_declarations() {
    let source = "class Main { public static void main() { } }
        class A { int x; public int get(int n, boolean[] flags) { return x; } }
        class B extends A { }";
    let (program, diagnostics) = parse(source);
    assert!(diagnostics.is_empty());
    assert_eq!(program.classes.len(), 2);

    let a = &program.classes[0];
    assert!(matches!(&a.declarations[0], Declaration::Variable(field) if field.kind == VariableKind::Class));
    let Declaration::Method(method) = &a.declarations[1] else {
        panic!("Expected method declaration");
    };
    assert_eq!(method.return_type, "int");
    assert_eq!(method.parameters.len(), 2);
    assert!(method.parameters[1].is_array);
    assert!(method
        .parameters
        .iter()
        .all(|p| p.kind == VariableKind::Formal));

    assert_eq!(program.classes[1].superclass.as_deref(), Some("A"));
}

// =============================================================================
// Recovery
// =============================================================================

#[test]
fn test_single_bad_statement_yields_one_diagnostic() {
    let (program, diagnostics) = parse(&wrap_main("int x; x = 1; x x x; x = 2;"));
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].kind, DiagnosticKind::Syntax);

    let statements = program.main_class.expect("main class").statements;
    assert_eq!(statements.len(), 4);
    assert!(matches!(&statements[0], Statement::VariableDeclaration(_)));
    assert!(matches!(&statements[1], Statement::Assignment { .. }));
    assert!(matches!(&statements[2], Statement::Error { .. }));
    assert!(matches!(&statements[3], Statement::Assignment { .. }));
}

#[test]
fn test_errors_in_separate_statements_all_reported() {
    let (_, diagnostics) = parse(&wrap_main(
        "x = ; System.out.println(1 +); while true x = 1;",
    ));
    assert!(diagnostics.len() >= 3, "{:?}", diagnostics);
}

#[test]
fn test_lexical_errors_are_recorded() {
    let (_, diagnostics) = parse(&wrap_main("x = 1 & 2; y = 3 # 4;"));
    let lexical = diagnostics
        .iter()
        .filter(|d| d.kind == DiagnosticKind::Lexical)
        .count();
    assert_eq!(lexical, 2);
}

#[test]
fn test_bad_class_does_not_hide_later_classes() {
    let source = "class Main { public static void main() { } }
        class { }
        class B { int y; }";
    let (program, diagnostics) = parse(source);
    assert!(!diagnostics.is_empty());
    assert!(program.classes.iter().any(|class| class.name == "B"));
}

#[test]
fn test_bad_field_becomes_error_declaration() {
    let source = "class Main { public static void main() { } }
        class A { int[ x; }";
    let (program, diagnostics) = parse(source);
    assert_eq!(diagnostics.len(), 1);
    assert!(matches!(
        program.classes[0].declarations[..],
        [Declaration::Error { .. }]
    ));
}

fn methods(program: &Program, class: usize) -> Vec<(&str, usize)> {
    program.classes[class]
        .declarations
        .iter()
        .filter_map(|declaration| match declaration {
            Declaration::Method(method) => Some((method.name.as_str(), method.parameters.len())),
            _ => None,
        })
        .collect()
}

#[test]
fn test_bad_formal_resumes_at_parameter_list_end() {
    let source = "class Main { public static void main() { } }
        class A { public int f(int , int b) { return b; } public int g() { return 1; } }";
    let (program, diagnostics) = parse(source);

    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].message, "expected an identifier but found `,`");
    // The mismatched `,` is consumed, so the rest of the list is skipped up to `)`.
    assert_eq!(methods(&program, 0), vec![("f", 0), ("g", 0)]);
}

#[test]
fn test_bad_method_header_resumes_after_brace() {
    let source = "class Main { public static void main() { } }
        class A { public int (int a) { int b; } }
        class B { public int g() { return 1; } }";
    let (program, diagnostics) = parse(source);

    assert!(diagnostics[0].message.starts_with("expected an identifier"));
    // Skipping through `{` resumes inside the broken method: its local is
    // read as a field, and its closing brace closes the class.
    assert!(matches!(
        &program.classes[0].declarations[..],
        [Declaration::Error { .. }, Declaration::Variable(field)] if field.name == "b"
    ));
    // The stray class brace is dropped at class level.
    assert_eq!(diagnostics.len(), 2);
    assert_eq!(program.classes[1].name, "B");
    assert_eq!(methods(&program, 1), vec![("g", 0)]);
}

#[test]
fn test_diagnostics_in_source_order() {
    let (_, diagnostics) = parse(&wrap_main("a a a;\n b b b;\n c c c;"));
    let lines: Vec<u32> = diagnostics
        .iter()
        .filter_map(|d| d.position.map(|p| p.line))
        .collect();
    let mut sorted = lines.clone();
    sorted.sort();
    assert_eq!(lines, sorted);
    assert_eq!(lines.len(), 3);
}

#[test]
fn test_truncated_input_terminates() {
    let (program, diagnostics) = parse("class Main { public static void main() { System.out.println(");
    assert!(!diagnostics.is_empty());
    assert!(program.classes.is_empty());
}
