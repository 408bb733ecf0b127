//! Program source: an immutable, seekable byte sequence.
//!
//! The program counter is a byte offset into this source. Offsets are
//! stable for the life of a run, so labels, return addresses and
//! breakpoints are all plain `usize` positions.

use crate::decoder::Decoder;
use crate::instruction::Instruction;

/// A Whitespace program.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Program {
    source: Vec<u8>,
}

impl Program {
    /// Wrap raw source bytes. Any bytes are accepted; only space, tab and
    /// line feed are significant.
    pub fn new(source: impl Into<Vec<u8>>) -> Self {
        Self {
            source: source.into(),
        }
    }

    /// Build a program from the canonical encodings of `instructions`.
    pub fn from_instructions(instructions: &[Instruction]) -> Self {
        let text: String = instructions.iter().map(Instruction::encode).collect();
        Self::new(text)
    }

    /// The source bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.source
    }

    /// Source length in bytes. Valid offsets are `0..=len()`.
    pub fn len(&self) -> usize {
        self.source.len()
    }

    /// Returns true if the source is empty.
    pub fn is_empty(&self) -> bool {
        self.source.is_empty()
    }

    /// A decoder positioned at offset 0.
    pub fn decoder(&self) -> Decoder<'_> {
        Decoder::new(&self.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_program() {
        let program = Program::default();
        assert!(program.is_empty());
        assert_eq!(program.len(), 0);
    }

    #[test]
    fn from_instructions_concatenates_encodings() {
        let program = Program::from_instructions(&[Instruction::Push(1), Instruction::End]);
        assert_eq!(program.as_bytes(), b"   \t\n\n\n\n");
    }

    #[test]
    fn comments_are_kept_in_source() {
        let program = Program::new("push: \t\n");
        assert_eq!(program.len(), 8);
    }
}
