//! Parser to Bytecode Integration Tests
//!
//! Tests the integration between the parser and bytecode_system components.
//! Verifies that MiniJava source is parsed, resolved and lowered into the
//! expected instruction sequences.

use bytecode_system::{ConstructorHandle, FieldHandle, Label, MethodHandle, Opcode};
use integration_tests::{assert_well_formed, compile, programs};

fn opcodes(pipeline: &integration_tests::Pipeline, method: &str) -> Vec<Opcode> {
    pipeline
        .code
        .method(method)
        .expect("method should be generated")
        .chunk
        .opcodes()
        .copied()
        .collect()
}

/// Test: recursive factorial lowers to a diamond with one recursive call
#[test]
fn test_factorial_compute_sequence() {
    let pipeline = compile(programs::FACTORIAL).expect("Failed to compile");
    let exit = Label(0);
    let otherwise = Label(1);
    // main, Fac.compute
    let compute = MethodHandle(1);

    assert_eq!(
        opcodes(&pipeline, "Fac.compute"),
        vec![
            Opcode::LoadArg(1),
            Opcode::PushInt(1),
            Opcode::LessThan,
            Opcode::BranchIfFalse(otherwise),
            Opcode::PushInt(1),
            Opcode::StoreLocal(0),
            Opcode::Branch(exit),
            Opcode::LoadArg(1),
            Opcode::LoadArg(0),
            Opcode::LoadArg(1),
            Opcode::PushInt(1),
            Opcode::Sub,
            Opcode::Call(compute),
            Opcode::Mul,
            Opcode::StoreLocal(0),
            Opcode::LoadLocal(0),
            Opcode::Return,
        ]
    );

    let chunk = &pipeline.code.method("Fac.compute").unwrap().chunk;
    assert_eq!(chunk.label_target(otherwise), Some(7));
    assert_eq!(chunk.label_target(exit), Some(15));
}

/// Test: main constructs the receiver, calls and prints
#[test]
fn test_factorial_main_sequence() {
    let pipeline = compile(programs::FACTORIAL).expect("Failed to compile");
    // int, boolean, void, Factorial, Fac
    assert_eq!(
        opcodes(&pipeline, "Factorial.main"),
        vec![
            Opcode::NewObject(ConstructorHandle(4)),
            Opcode::PushInt(10),
            Opcode::Call(MethodHandle(1)),
            Opcode::CallPrintInt,
            Opcode::Return,
        ]
    );
}

/// Test: field arrays are stored through the receiver
#[test]
fn test_bubble_sort_init_uses_fields() {
    let pipeline = compile(programs::BUBBLE_SORT).expect("Failed to compile");
    let number = FieldHandle(0);
    let size = FieldHandle(1);
    let ops = opcodes(&pipeline, "BBS.init");

    assert_eq!(
        &ops[..3],
        &[Opcode::LoadArg(0), Opcode::LoadArg(1), Opcode::StoreField(size)]
    );
    assert!(ops.contains(&Opcode::StoreField(number)));
    assert!(ops.contains(&Opcode::LoadField(number)));
}

/// Test: helper calls on `this` store their result into locals
#[test]
fn test_bubble_sort_start_calls_helpers() {
    let pipeline = compile(programs::BUBBLE_SORT).expect("Failed to compile");
    // main, start, sort, print, init
    let (sort, print, init) = (MethodHandle(2), MethodHandle(3), MethodHandle(4));

    assert_eq!(
        opcodes(&pipeline, "BBS.start"),
        vec![
            Opcode::LoadArg(0),
            Opcode::LoadArg(1),
            Opcode::Call(init),
            Opcode::StoreLocal(0),
            Opcode::LoadArg(0),
            Opcode::Call(sort),
            Opcode::StoreLocal(0),
            Opcode::LoadArg(0),
            Opcode::Call(print),
            Opcode::StoreLocal(0),
            Opcode::PushInt(0),
            Opcode::Return,
        ]
    );
}

/// Test: nested loops allocate two labels per loop and one pair per if
#[test]
fn test_bubble_sort_nested_loops() {
    let pipeline = compile(programs::BUBBLE_SORT).expect("Failed to compile");
    let chunk = &pipeline.code.method("BBS.sort").unwrap().chunk;

    assert_eq!(chunk.label_count(), 6);
    let backward = chunk
        .opcodes()
        .filter(|op| matches!(op, Opcode::BranchIfTrue(_)))
        .count();
    assert_eq!(backward, 2);
    assert_well_formed("BBS.sort", chunk);
}

/// Test: calls dispatch on the declared type of the receiver
#[test]
fn test_shapes_static_method_selection() {
    let pipeline = compile(programs::SHAPES).expect("Failed to compile");
    // main, Shape.area, Shape.isValid, Square.setSide, Square.area
    let shape_area = MethodHandle(1);
    let square_area = MethodHandle(4);

    let main = opcodes(&pipeline, "Shapes.main");
    assert!(main.contains(&Opcode::Call(shape_area)));
    assert!(!main.contains(&Opcode::Call(square_area)));

    let set_side = opcodes(&pipeline, "Square.setSide");
    assert!(set_side.contains(&Opcode::Call(square_area)));
}

/// Test: inherited fields keep the handle of the declaring class
#[test]
fn test_shapes_inherited_fields() {
    let pipeline = compile(programs::SHAPES).expect("Failed to compile");
    // Shape.cachedArea, Shape.valid, Square.side
    let cached_area = FieldHandle(0);
    let valid = FieldHandle(1);
    let side = FieldHandle(2);

    let set_side = opcodes(&pipeline, "Square.setSide");
    for field in [cached_area, valid, side] {
        assert!(set_side.contains(&Opcode::StoreField(field)), "{}", field);
    }
}
