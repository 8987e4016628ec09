//! Forward-referenceable branch targets.

use serde::Serialize;
use std::fmt;

/// A branch target allocated by [`BytecodeChunk::define_label`].
///
/// A label may be referenced by branch instructions before it is bound to an
/// instruction index with [`BytecodeChunk::mark_label`]; the binding is
/// resolved when the chunk is finalized by the consumer.
///
/// [`BytecodeChunk::define_label`]: crate::BytecodeChunk::define_label
/// [`BytecodeChunk::mark_label`]: crate::BytecodeChunk::mark_label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Label(pub u32);

impl Label {
    /// Index of this label in its chunk's label table
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{}", self.0)
    }
}
