//! Whitespace common types and instruction decoding.
//!
//! This crate provides the pieces every backend and the interpreter share:
//!
//! - [`Token`]: the three significant source characters
//! - [`Imp`]: the five instruction groups
//! - [`Instruction`] and [`Label`]: decoded instructions and their encoding
//! - [`Program`]: the seekable program source
//! - [`Decoder`]: the cursor that turns source into instructions
//! - [`Console`]: the shared input/output channel
//! - [`CommandSink`]: the capability interface implemented by backends
//! - [`FormatError`] and [`RuntimeError`]
//!
//! # Usage
//!
//! ```
//! use wspace_common::{Instruction, Program};
//!
//! let program = Program::from_instructions(&[Instruction::Push(42), Instruction::End]);
//! let decoded: Vec<_> = program.decoder().map(|r| r.unwrap().1).collect();
//! assert_eq!(decoded, vec![Instruction::Push(42), Instruction::End]);
//! ```

pub mod console;
pub mod decoder;
pub mod error;
pub mod imp;
pub mod instruction;
pub mod program;
pub mod sink;
pub mod token;

// Re-export commonly used types at the crate root.
pub use console::Console;
pub use decoder::Decoder;
pub use error::{FormatError, RuntimeError};
pub use imp::Imp;
pub use instruction::{Instruction, Label};
pub use program::Program;
pub use sink::{CommandSink, Condition, SinkResult, Verdict};
pub use token::Token;
