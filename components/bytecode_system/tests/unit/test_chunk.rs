//! Tests for BytecodeChunk struct

use bytecode_system::{BytecodeChunk, Label, Opcode};
use core_types::SourcePosition;

#[test]
fn test_chunk_creation() {
    let chunk = BytecodeChunk::new();
    assert_eq!(chunk.instruction_count(), 0);
    assert_eq!(chunk.label_count(), 0);
    assert!(chunk.last_opcode().is_none());
}

#[test]
fn test_chunk_emit_multiple_instructions() {
    let mut chunk = BytecodeChunk::new();
    chunk.emit(Opcode::PushInt(1));
    chunk.emit(Opcode::PushInt(2));
    chunk.emit(Opcode::Add);
    assert_eq!(chunk.instruction_count(), 3);
    assert_eq!(chunk.last_opcode(), Some(&Opcode::Add));
}

#[test]
fn test_chunk_emit_with_position() {
    let mut chunk = BytecodeChunk::new();
    chunk.emit_with_position(Opcode::Return, SourcePosition::new(4, 9));
    assert_eq!(
        chunk.instructions[0].source_position,
        Some(SourcePosition::new(4, 9))
    );
}

#[test]
fn test_forward_branch_is_back_patched_by_marking() {
    let mut chunk = BytecodeChunk::new();
    let exit = chunk.define_label();

    chunk.emit(Opcode::PushInt(0));
    chunk.emit(Opcode::BranchIfFalse(exit));
    assert_eq!(chunk.label_target(exit), None);

    chunk.emit(Opcode::PushInt(1));
    chunk.emit(Opcode::CallPrintInt);
    chunk.mark_label(exit);
    chunk.emit(Opcode::Return);

    assert_eq!(chunk.label_target(exit), Some(4));
    assert_eq!(chunk.instructions[4].opcode, Opcode::Return);
}

#[test]
fn test_backward_branch_target() {
    let mut chunk = BytecodeChunk::new();
    let top = chunk.define_label();
    chunk.mark_label(top);
    chunk.emit(Opcode::PushInt(1));
    chunk.emit(Opcode::BranchIfTrue(top));

    assert_eq!(chunk.label_target(top), Some(0));
}

#[test]
fn test_label_bound_at_end_of_chunk() {
    let mut chunk = BytecodeChunk::new();
    let end = chunk.define_label();
    chunk.emit(Opcode::Branch(end));
    chunk.mark_label(end);

    assert_eq!(chunk.label_target(end), Some(1));
    assert!(chunk.to_string().ends_with("L0:\n"));
}

#[test]
fn test_unknown_label_has_no_target() {
    let chunk = BytecodeChunk::new();
    assert_eq!(chunk.label_target(Label(3)), None);
}

#[test]
fn test_opcodes_iterator() {
    let mut chunk = BytecodeChunk::new();
    chunk.emit(Opcode::PushInt(1));
    chunk.emit(Opcode::Pop);
    let opcodes: Vec<_> = chunk.opcodes().copied().collect();
    assert_eq!(opcodes, vec![Opcode::PushInt(1), Opcode::Pop]);
}
