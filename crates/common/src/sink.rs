//! The command sink: the capability interface every execution backend
//! implements.
//!
//! The interpreter decodes instructions and forwards each non-control
//! instruction to a sink. Flow control (labels, jumps, calls, returns) is
//! handled by the interpreter itself; the sink only answers conditional
//! tests and may observe transfers through [`CommandSink::control`].

use std::fmt;

use crate::console::Console;
use crate::error::RuntimeError;
use crate::instruction::Instruction;

/// Result of a sink operation.
pub type SinkResult = Result<(), RuntimeError>;

/// The predicate a conditional branch applies to the top of the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    /// Top of stack equals zero.
    Zero,
    /// Top of stack is less than zero.
    Negative,
}

impl Condition {
    /// Evaluate against a concrete value.
    pub fn holds(self, value: i64) -> bool {
        match self {
            Condition::Zero => value == 0,
            Condition::Negative => value < 0,
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Condition::Zero => "ZERO",
            Condition::Negative => "NEG",
        })
    }
}

/// Three-valued outcome of a conditional test.
///
/// Backends that do not track values (the disassembler) answer
/// `Indeterminate`, and the interpreter only branches on `True`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    True,
    False,
    Indeterminate,
}

impl Verdict {
    /// Returns true only for a definite `True`.
    pub fn is_true(self) -> bool {
        self == Verdict::True
    }
}

impl From<bool> for Verdict {
    fn from(b: bool) -> Self {
        if b {
            Verdict::True
        } else {
            Verdict::False
        }
    }
}

/// An execution backend.
///
/// Operand order for binary arithmetic, the heap, and I/O is defined by
/// each implementation's documentation; the interpreter only guarantees
/// that operations arrive in program order.
pub trait CommandSink {
    // Stack manipulation
    fn push(&mut self, console: &mut Console<'_>, value: i64) -> SinkResult;
    fn duplicate(&mut self, console: &mut Console<'_>) -> SinkResult;
    fn copy(&mut self, console: &mut Console<'_>, index: i64) -> SinkResult;
    fn swap(&mut self, console: &mut Console<'_>) -> SinkResult;
    fn discard(&mut self, console: &mut Console<'_>) -> SinkResult;
    fn slide(&mut self, console: &mut Console<'_>, count: i64) -> SinkResult;

    // Arithmetic
    fn add(&mut self, console: &mut Console<'_>) -> SinkResult;
    fn sub(&mut self, console: &mut Console<'_>) -> SinkResult;
    fn mul(&mut self, console: &mut Console<'_>) -> SinkResult;
    fn div(&mut self, console: &mut Console<'_>) -> SinkResult;
    fn modulo(&mut self, console: &mut Console<'_>) -> SinkResult;

    // Heap access
    fn store(&mut self, console: &mut Console<'_>) -> SinkResult;
    fn retrieve(&mut self, console: &mut Console<'_>) -> SinkResult;

    // Flow control
    /// Inspect, without popping, the top of the stack.
    fn test(&mut self, console: &mut Console<'_>, condition: Condition)
        -> Result<Verdict, RuntimeError>;
    /// Called once when the program executes its end instruction.
    fn end(&mut self, console: &mut Console<'_>) -> SinkResult;

    // I/O
    fn output_char(&mut self, console: &mut Console<'_>) -> SinkResult;
    fn output_number(&mut self, console: &mut Console<'_>) -> SinkResult;
    fn read_char(&mut self, console: &mut Console<'_>) -> SinkResult;
    fn read_number(&mut self, console: &mut Console<'_>) -> SinkResult;

    // Inspection
    /// Write the stack as `index: value` lines, top first.
    fn dump_stack(&mut self, console: &mut Console<'_>) -> SinkResult;
    /// Write the heap as `address: value` lines.
    fn dump_heap(&mut self, console: &mut Console<'_>) -> SinkResult;

    /// Observe a flow control instruction the interpreter is about to carry
    /// out. Does nothing by default.
    fn control(&mut self, _console: &mut Console<'_>, _instruction: &Instruction) -> SinkResult {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conditions() {
        assert!(Condition::Zero.holds(0));
        assert!(!Condition::Zero.holds(-1));
        assert!(Condition::Negative.holds(-1));
        assert!(!Condition::Negative.holds(0));
    }

    #[test]
    fn only_true_branches() {
        assert!(Verdict::True.is_true());
        assert!(!Verdict::False.is_true());
        assert!(!Verdict::Indeterminate.is_true());
        assert_eq!(Verdict::from(false), Verdict::False);
    }
}
