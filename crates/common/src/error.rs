//! Errors shared by the decoder and the command sinks.
//!
//! [`FormatError`] covers malformed programs and unresolvable labels.
//! [`RuntimeError`] covers operations that are well-formed but cannot be
//! carried out against the current machine state.

use std::io;

use thiserror::Error;

/// The program text does not follow the instruction grammar, or names a
/// label that cannot be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// The stream ended inside an instruction or literal.
    #[error("unexpected end of program at offset {at}")]
    UnexpectedEof { at: usize },

    /// A token sequence that selects no command.
    #[error("invalid instruction '{sequence}' at offset {at}")]
    InvalidInstruction { at: usize, sequence: String },

    /// A number literal that does not fit in a signed 64-bit integer.
    #[error("number literal out of range at offset {at}")]
    LiteralOverflow { at: usize },

    /// The same label is defined twice.
    #[error("duplicate label {label} at offset {at}")]
    DuplicateLabel { label: String, at: usize },

    /// A jump or call names a label that is never defined.
    #[error("undefined label {label} at offset {at}")]
    UndefinedLabel { label: String, at: usize },
}

/// An operation that cannot be performed on the current state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// Return with no pending call.
    #[error("return with empty call stack")]
    EmptyCallStack,

    /// Retrieve from a heap address that was never written.
    #[error("heap address {address} is unset")]
    UnsetHeapAddress { address: i64 },

    /// Pop or peek on an empty (or too shallow) stack.
    #[error("stack underflow")]
    StackUnderflow,

    /// Push beyond the configured stack depth.
    #[error("stack overflow (limit {limit})")]
    StackOverflow { limit: usize },

    /// Copy with an index outside the stack.
    #[error("copy index {index} out of range (depth {depth})")]
    CopyOutOfRange { index: i64, depth: usize },

    /// Slide with a negative count.
    #[error("slide count {count} is negative")]
    NegativeSlide { count: i64 },

    #[error("division by zero")]
    DivisionByZero,

    /// Output of a value that is not a Unicode scalar.
    #[error("value {value} is not a character")]
    InvalidCharacter { value: i64 },

    /// Read-number input that does not parse as an integer.
    #[error("invalid number input '{input}'")]
    InvalidNumberInput { input: String },

    /// Read-number with no input left.
    #[error("end of input")]
    EndOfInput,

    #[error("i/o error: {0}")]
    Io(String),
}

impl From<io::Error> for RuntimeError {
    fn from(err: io::Error) -> Self {
        RuntimeError::Io(err.to_string())
    }
}
