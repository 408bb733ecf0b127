//! VM state management: operand stack, heap, configuration.

use std::collections::BTreeMap;

use wspace_common::RuntimeError;

/// Which popped value is the left operand of a binary arithmetic op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OperandOrder {
    /// The first-popped (top) value is the left operand: push 5, push 3,
    /// sub gives -2.
    #[default]
    TopFirst,
    /// The deeper value is the left operand: push 5, push 3, sub gives 2.
    Conventional,
}

/// Tunable limits and semantics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MachineConfig {
    /// Pushing beyond this depth is a stack overflow. Unbounded if `None`.
    pub max_stack_depth: Option<usize>,
    pub operand_order: OperandOrder,
}

/// The Whitespace virtual machine.
#[derive(Debug, Clone, Default)]
pub struct Machine {
    /// Operand stack, bottom first.
    pub(crate) stack: Vec<i64>,
    /// Heap. Unset addresses are an error to read.
    pub(crate) heap: BTreeMap<i64, i64>,
    pub(crate) config: MachineConfig,
}

impl Machine {
    /// Create a machine with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: MachineConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// The operand stack, bottom first.
    pub fn stack(&self) -> &[i64] {
        &self.stack
    }

    /// The heap, ordered by address.
    pub fn heap(&self) -> &BTreeMap<i64, i64> {
        &self.heap
    }

    /// Push a value onto the stack, checking for overflow.
    pub(crate) fn push_value(&mut self, value: i64) -> Result<(), RuntimeError> {
        if let Some(limit) = self.config.max_stack_depth {
            if self.stack.len() >= limit {
                return Err(RuntimeError::StackOverflow { limit });
            }
        }
        self.stack.push(value);
        Ok(())
    }

    /// Pop a value from the stack.
    pub(crate) fn pop(&mut self) -> Result<i64, RuntimeError> {
        self.stack.pop().ok_or(RuntimeError::StackUnderflow)
    }

    /// The top value, without popping.
    pub(crate) fn peek(&self) -> Result<i64, RuntimeError> {
        self.stack.last().copied().ok_or(RuntimeError::StackUnderflow)
    }

    /// Pop two values and return them as `(left, right)` operands.
    ///
    /// The stack is left untouched if it holds fewer than two values.
    pub(crate) fn pop_operands(&mut self) -> Result<(i64, i64), RuntimeError> {
        if self.stack.len() < 2 {
            return Err(RuntimeError::StackUnderflow);
        }
        let first = self.pop()?;
        let second = self.pop()?;
        Ok(match self.config.operand_order {
            OperandOrder::Conventional => (second, first),
            OperandOrder::TopFirst => (first, second),
        })
    }
}
