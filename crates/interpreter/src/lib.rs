//! Whitespace interpreter: label resolution, execution, and debugging.
//!
//! A run has two passes over the program source:
//!
//! 1. **Resolve** ([`resolve`]): decode every instruction, validating the
//!    grammar and recording where each label points.
//! 2. **Execute** ([`Interpreter::execute`]): decode again from offset 0,
//!    forwarding instructions to a [`CommandSink`] and carrying out jumps,
//!    calls and returns by seeking the program counter.
//!
//! The interactive debugger hooks into the second pass before each
//! instruction. It reads commands from the same [`Console`] the program
//! reads its input from.
//!
//! # Usage
//!
//! ```
//! use wspace_common::{Console, Instruction, Program};
//! use wspace_interpreter::{run, Completion, RunOptions};
//! use wspace_vm::Machine;
//!
//! let program = Program::from_instructions(&[
//!     Instruction::Push(5),
//!     Instruction::Push(3),
//!     Instruction::Sub,
//!     Instruction::OutputNumber,
//!     Instruction::End,
//! ]);
//!
//! let mut out = Vec::new();
//! let mut console = Console::new(&b""[..], &mut out);
//! let mut vm = Machine::new();
//! let completion = run(&program, &mut vm, &mut console, &RunOptions::default()).unwrap();
//! drop(console);
//!
//! assert_eq!(completion, Completion::Aborted);
//! assert_eq!(out, b"-2");
//! ```

pub mod debugger;
pub mod engine;
pub mod error;
pub mod options;
pub mod resolver;

pub use debugger::{CommandError, DebugCommand, Debugger};
pub use engine::{Completion, Interpreter};
pub use error::InterpretError;
pub use options::RunOptions;
pub use resolver::{resolve, LabelTable};

use wspace_common::{CommandSink, Console, Program};

/// Interpret `program` against `sink`.
///
/// Returns how the run completed, or the first format or runtime error.
pub fn run(
    program: &Program,
    sink: &mut dyn CommandSink,
    console: &mut Console<'_>,
    options: &RunOptions,
) -> Result<Completion, InterpretError> {
    Interpreter::new(program, sink, console, options).execute()
}
