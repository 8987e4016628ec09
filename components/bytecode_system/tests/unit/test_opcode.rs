//! Tests for Opcode enum

use bytecode_system::{ElementKind, FieldHandle, Label, MethodHandle, Opcode, TypeHandle};

#[test]
fn test_push_int_opcode() {
    let op = Opcode::PushInt(-7);
    match op {
        Opcode::PushInt(value) => assert_eq!(value, -7),
        _ => panic!("Expected PushInt"),
    }
}

#[test]
fn test_element_kinds_are_distinct() {
    assert_ne!(
        Opcode::LoadElement(ElementKind::Int),
        Opcode::LoadElement(ElementKind::Reference)
    );
}

#[test]
fn test_opcode_display() {
    assert_eq!(Opcode::PushInt(3).to_string(), "push_int 3");
    assert_eq!(Opcode::LoadArg(0).to_string(), "load_arg 0");
    assert_eq!(Opcode::LoadField(FieldHandle(2)).to_string(), "load_field field#2");
    assert_eq!(Opcode::Call(MethodHandle(5)).to_string(), "call method#5");
    assert_eq!(Opcode::NewArray(TypeHandle(0)).to_string(), "new_array type#0");
    assert_eq!(
        Opcode::StoreElement(ElementKind::Reference).to_string(),
        "store_elem.ref"
    );
    assert_eq!(Opcode::BranchIfTrue(Label(1)).to_string(), "brtrue L1");
}

#[test]
fn test_opcode_serializes_with_payload() {
    let json = serde_json::to_value(Opcode::Call(MethodHandle(9))).unwrap();
    assert_eq!(json, serde_json::json!({ "Call": 9 }));

    let json = serde_json::to_value(Opcode::Return).unwrap();
    assert_eq!(json, serde_json::json!("Return"));
}
