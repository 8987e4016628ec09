//! Stack-machine opcodes
//!
//! Every opcode pops its operands from the evaluation stack and pushes its
//! result (if any). Receivers and arguments of calls are pushed left to right.

use crate::handle::{ConstructorHandle, FieldHandle, MethodHandle, TypeHandle};
use crate::label::Label;
use serde::Serialize;
use std::fmt;

/// Element type selector for array loads and stores
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ElementKind {
    /// 32-bit integer elements (`int[]`, also used for `boolean[]`)
    Int,
    /// Object reference elements
    Reference,
}

/// Instruction opcodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Opcode {
    // Constants
    /// Push a 32-bit integer constant
    PushInt(i32),

    // Variables
    /// Push method argument (0 is `this` for instance methods)
    LoadArg(u16),
    /// Pop into method argument
    StoreArg(u16),
    /// Push local variable slot
    LoadLocal(u16),
    /// Pop into local variable slot
    StoreLocal(u16),
    /// Pop object, push its field
    LoadField(FieldHandle),
    /// Pop value and object, store the field
    StoreField(FieldHandle),

    // Arrays
    /// Pop index and array, push element
    LoadElement(ElementKind),
    /// Pop value, index and array, store element
    StoreElement(ElementKind),
    /// Pop array, push its length
    ArrayLength,
    /// Pop size, push a new array with the given element type
    NewArray(TypeHandle),

    // Objects and calls
    /// Push a new instance built by the given constructor
    NewObject(ConstructorHandle),
    /// Call a method; pops receiver and arguments
    Call(MethodHandle),
    /// Pop an integer and print it on its own line
    CallPrintInt,
    /// Pop a boolean and abort execution if it is false
    CallAssert,

    // Arithmetic and comparison
    /// Integer addition
    Add,
    /// Integer subtraction
    Sub,
    /// Integer multiplication
    Mul,
    /// Integer division
    Div,
    /// Integer remainder
    Rem,
    /// Push 1 if second-top < top, else 0
    LessThan,
    /// Push 1 if second-top > top, else 0
    GreaterThan,
    /// Push 1 if the two top values are equal, else 0
    Equal,
    /// Bitwise and of the two top values
    And,
    /// Bitwise or of the two top values
    Or,

    // Stack
    /// Discard the top value
    Pop,

    // Control flow
    /// Unconditional branch
    Branch(Label),
    /// Pop value, branch if it is zero
    BranchIfFalse(Label),
    /// Pop value, branch if it is non-zero
    BranchIfTrue(Label),
    /// Return from the current method (with the top value for non-void methods)
    Return,
}

impl Opcode {
    /// The label this opcode branches to, if any
    pub fn branch_target(&self) -> Option<Label> {
        match self {
            Opcode::Branch(label) | Opcode::BranchIfFalse(label) | Opcode::BranchIfTrue(label) => {
                Some(*label)
            }
            _ => None,
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Opcode::PushInt(value) => write!(f, "push_int {}", value),
            Opcode::LoadArg(index) => write!(f, "load_arg {}", index),
            Opcode::StoreArg(index) => write!(f, "store_arg {}", index),
            Opcode::LoadLocal(slot) => write!(f, "load_local {}", slot),
            Opcode::StoreLocal(slot) => write!(f, "store_local {}", slot),
            Opcode::LoadField(field) => write!(f, "load_field {}", field),
            Opcode::StoreField(field) => write!(f, "store_field {}", field),
            Opcode::LoadElement(ElementKind::Int) => f.write_str("load_elem.i4"),
            Opcode::LoadElement(ElementKind::Reference) => f.write_str("load_elem.ref"),
            Opcode::StoreElement(ElementKind::Int) => f.write_str("store_elem.i4"),
            Opcode::StoreElement(ElementKind::Reference) => f.write_str("store_elem.ref"),
            Opcode::ArrayLength => f.write_str("array_length"),
            Opcode::NewArray(ty) => write!(f, "new_array {}", ty),
            Opcode::NewObject(ctor) => write!(f, "new_object {}", ctor),
            Opcode::Call(method) => write!(f, "call {}", method),
            Opcode::CallPrintInt => f.write_str("call_print_int"),
            Opcode::CallAssert => f.write_str("call_assert"),
            Opcode::Add => f.write_str("add"),
            Opcode::Sub => f.write_str("sub"),
            Opcode::Mul => f.write_str("mul"),
            Opcode::Div => f.write_str("div"),
            Opcode::Rem => f.write_str("rem"),
            Opcode::LessThan => f.write_str("clt"),
            Opcode::GreaterThan => f.write_str("cgt"),
            Opcode::Equal => f.write_str("ceq"),
            Opcode::And => f.write_str("and"),
            Opcode::Or => f.write_str("or"),
            Opcode::Pop => f.write_str("pop"),
            Opcode::Branch(label) => write!(f, "br {}", label),
            Opcode::BranchIfFalse(label) => write!(f, "brfalse {}", label),
            Opcode::BranchIfTrue(label) => write!(f, "brtrue {}", label),
            Opcode::Return => f.write_str("ret"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_branch_target() {
        assert_eq!(Opcode::BranchIfFalse(Label(4)).branch_target(), Some(Label(4)));
        assert_eq!(Opcode::Pop.branch_target(), None);
    }
}
