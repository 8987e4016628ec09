//! Tests for Instruction struct

use bytecode_system::{Instruction, Opcode};
use core_types::SourcePosition;

#[test]
fn test_instruction_creation() {
    let inst = Instruction::new(Opcode::Add);
    assert!(matches!(inst.opcode, Opcode::Add));
    assert!(inst.source_position.is_none());
}

#[test]
fn test_instruction_with_source_position() {
    let inst = Instruction::with_position(Opcode::Sub, SourcePosition::new(10, 5));
    assert!(matches!(inst.opcode, Opcode::Sub));
    match inst.source_position {
        Some(sp) => {
            assert_eq!(sp.line, 10);
            assert_eq!(sp.column, 5);
        }
        None => panic!("Expected source position"),
    }
}
