//! Whitespace virtual machine: the executing command sink.
//!
//! The machine owns:
//! - An operand stack of signed 64-bit integers
//! - A sparse heap mapping integer addresses to integer values
//!
//! Control flow is not handled here. The interpreter decodes the program,
//! resolves labels, and forwards every stack, arithmetic, heap and I/O
//! instruction to a [`Machine`] through the
//! [`CommandSink`](wspace_common::CommandSink) trait.
//!
//! # Usage
//!
//! ```
//! use wspace_common::{CommandSink, Console};
//! use wspace_vm::Machine;
//!
//! let mut out = Vec::new();
//! let mut console = Console::new(&b""[..], &mut out);
//! let mut vm = Machine::new();
//! vm.push(&mut console, 5).unwrap();
//! vm.push(&mut console, 3).unwrap();
//! vm.sub(&mut console).unwrap();
//! assert_eq!(vm.stack(), &[-2]);
//! ```

pub mod execute;
pub mod machine;

pub use machine::{Machine, MachineConfig, OperandOrder};
