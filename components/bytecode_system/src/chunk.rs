//! Bytecode chunk - the instruction stream of one method
//!
//! Besides the instructions a chunk owns a label table. Labels are allocated
//! up front and bound to an instruction index later, which is how forward
//! branches are back-patched without rewriting emitted instructions.

use crate::instruction::Instruction;
use crate::label::Label;
use crate::opcode::Opcode;
use core_types::SourcePosition;
use serde::Serialize;
use std::fmt;

/// Instructions and label bindings for a single method body
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BytecodeChunk {
    /// Sequence of bytecode instructions
    pub instructions: Vec<Instruction>,
    /// Instruction index each label is bound to, `None` until marked
    labels: Vec<Option<usize>>,
}

impl BytecodeChunk {
    /// Create a new empty bytecode chunk
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit an instruction without source position
    pub fn emit(&mut self, opcode: Opcode) {
        self.instructions.push(Instruction::new(opcode));
    }

    /// Emit an instruction with source position
    pub fn emit_with_position(&mut self, opcode: Opcode, position: SourcePosition) {
        self.instructions
            .push(Instruction::with_position(opcode, position));
    }

    /// Allocate a fresh, unbound label
    pub fn define_label(&mut self) -> Label {
        let label = Label(self.labels.len() as u32);
        self.labels.push(None);
        label
    }

    /// Bind `label` to the index of the next instruction to be emitted.
    ///
    /// Marking the same label again rebinds it.
    pub fn mark_label(&mut self, label: Label) {
        let target = self.instructions.len();
        if let Some(slot) = self.labels.get_mut(label.index()) {
            *slot = Some(target);
        }
    }

    /// Instruction index `label` is bound to, if it has been marked
    pub fn label_target(&self, label: Label) -> Option<usize> {
        self.labels.get(label.index()).copied().flatten()
    }

    /// Labels that were allocated but never marked
    pub fn unmarked_labels(&self) -> Vec<Label> {
        self.labels
            .iter()
            .enumerate()
            .filter(|(_, target)| target.is_none())
            .map(|(index, _)| Label(index as u32))
            .collect()
    }

    /// Number of labels allocated in this chunk
    pub fn label_count(&self) -> usize {
        self.labels.len()
    }

    /// Get the number of instructions
    pub fn instruction_count(&self) -> usize {
        self.instructions.len()
    }

    /// Opcode of the last emitted instruction
    pub fn last_opcode(&self) -> Option<&Opcode> {
        self.instructions.last().map(|inst| &inst.opcode)
    }

    /// Opcodes in emission order
    pub fn opcodes(&self) -> impl Iterator<Item = &Opcode> + '_ {
        self.instructions.iter().map(|inst| &inst.opcode)
    }

    fn labels_at(&self, index: usize) -> impl Iterator<Item = Label> + '_ {
        self.labels
            .iter()
            .enumerate()
            .filter(move |(_, target)| **target == Some(index))
            .map(|(label, _)| Label(label as u32))
    }
}

impl fmt::Display for BytecodeChunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, inst) in self.instructions.iter().enumerate() {
            for label in self.labels_at(index) {
                writeln!(f, "{}:", label)?;
            }
            writeln!(f, "    {:04} {}", index, inst.opcode)?;
        }
        for label in self.labels_at(self.instructions.len()) {
            writeln!(f, "{}:", label)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_define_label_allocates_sequentially() {
        let mut chunk = BytecodeChunk::new();
        assert_eq!(chunk.define_label(), Label(0));
        assert_eq!(chunk.define_label(), Label(1));
        assert_eq!(chunk.label_count(), 2);
    }

    #[test]
    fn test_mark_label_binds_next_instruction() {
        let mut chunk = BytecodeChunk::new();
        let label = chunk.define_label();
        chunk.emit(Opcode::PushInt(1));
        chunk.mark_label(label);
        chunk.emit(Opcode::Return);

        assert_eq!(chunk.label_target(label), Some(1));
        assert!(chunk.unmarked_labels().is_empty());
    }

    #[test]
    fn test_unmarked_labels_reported() {
        let mut chunk = BytecodeChunk::new();
        let marked = chunk.define_label();
        let dangling = chunk.define_label();
        chunk.mark_label(marked);

        assert_eq!(chunk.unmarked_labels(), vec![dangling]);
    }

    #[test]
    fn test_listing_shows_labels() {
        let mut chunk = BytecodeChunk::new();
        let exit = chunk.define_label();
        chunk.emit(Opcode::Branch(exit));
        chunk.mark_label(exit);
        chunk.emit(Opcode::Return);

        let listing = chunk.to_string();
        assert_eq!(listing, "    0000 br L0\nL0:\n    0001 ret\n");
    }
}
