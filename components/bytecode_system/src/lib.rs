//! Stack-machine instruction set for the MiniJava compiler
//!
//! This crate provides the opcodes, opaque runtime handles, branch labels and
//! per-method instruction chunks that the code generator emits into.
//!
//! # Features
//!
//! - Stack-based instruction architecture
//! - Forward-referenceable labels bound after emission
//! - Human-readable listings and serde serialization for inspection
//!
//! # Example
//!
//! ```
//! use bytecode_system::{BytecodeChunk, Opcode};
//!
//! let mut chunk = BytecodeChunk::new();
//! let exit = chunk.define_label();
//!
//! chunk.emit(Opcode::PushInt(0));
//! chunk.emit(Opcode::BranchIfFalse(exit));
//! chunk.emit(Opcode::PushInt(42));
//! chunk.emit(Opcode::CallPrintInt);
//! chunk.mark_label(exit);
//! chunk.emit(Opcode::Return);
//!
//! assert_eq!(chunk.label_target(exit), Some(4));
//! assert!(chunk.unmarked_labels().is_empty());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod chunk;
pub mod handle;
pub mod instruction;
pub mod label;
pub mod opcode;

// Re-export main types at crate root
pub use chunk::BytecodeChunk;
pub use handle::{ConstructorHandle, FieldHandle, MethodHandle, TypeHandle};
pub use instruction::Instruction;
pub use label::Label;
pub use opcode::{ElementKind, Opcode};
