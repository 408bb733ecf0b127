//! Instruction semantics for the Whitespace VM.
//!
//! Operand order:
//! - Binary arithmetic pops two values; which one is the left operand is
//!   set by [`OperandOrder`](crate::OperandOrder).
//! - `store` pops the value, then the address.
//! - `retrieve`, `read_char` and `read_number` pop an address.
//! - `test` peeks at the top value and leaves the stack unchanged.

use tracing::trace;
use wspace_common::{CommandSink, Condition, Console, RuntimeError, SinkResult, Verdict};

use crate::machine::Machine;

impl Machine {
    fn exec_binary_arith(&mut self, op: fn(i64, i64) -> i64) -> SinkResult {
        let (left, right) = self.pop_operands()?;
        self.push_value(op(left, right))
    }

    fn exec_division(&mut self, op: fn(i64, i64) -> i64) -> SinkResult {
        let (left, right) = self.pop_operands()?;
        if right == 0 {
            return Err(RuntimeError::DivisionByZero);
        }
        self.push_value(op(left, right))
    }
}

impl CommandSink for Machine {
    // ---- Stack manipulation ----

    fn push(&mut self, _console: &mut Console<'_>, value: i64) -> SinkResult {
        self.push_value(value)
    }

    fn duplicate(&mut self, _console: &mut Console<'_>) -> SinkResult {
        let top = self.peek()?;
        self.push_value(top)
    }

    fn copy(&mut self, _console: &mut Console<'_>, index: i64) -> SinkResult {
        let depth = self.stack.len();
        let value = usize::try_from(index)
            .ok()
            .filter(|&i| i < depth)
            .map(|i| self.stack[depth - 1 - i])
            .ok_or(RuntimeError::CopyOutOfRange { index, depth })?;
        self.push_value(value)
    }

    fn swap(&mut self, _console: &mut Console<'_>) -> SinkResult {
        let len = self.stack.len();
        if len < 2 {
            return Err(RuntimeError::StackUnderflow);
        }
        self.stack.swap(len - 1, len - 2);
        Ok(())
    }

    fn discard(&mut self, _console: &mut Console<'_>) -> SinkResult {
        self.pop().map(|_| ())
    }

    /// Remove `count` values below the top, keeping the top.
    fn slide(&mut self, _console: &mut Console<'_>, count: i64) -> SinkResult {
        let count = usize::try_from(count).map_err(|_| RuntimeError::NegativeSlide { count })?;
        let len = self.stack.len();
        if len == 0 || count > len - 1 {
            return Err(RuntimeError::StackUnderflow);
        }
        let top = self.pop()?;
        self.stack.truncate(len - 1 - count);
        self.stack.push(top);
        Ok(())
    }

    // ---- Arithmetic ----

    fn add(&mut self, _console: &mut Console<'_>) -> SinkResult {
        self.exec_binary_arith(i64::wrapping_add)
    }

    fn sub(&mut self, _console: &mut Console<'_>) -> SinkResult {
        self.exec_binary_arith(i64::wrapping_sub)
    }

    fn mul(&mut self, _console: &mut Console<'_>) -> SinkResult {
        self.exec_binary_arith(i64::wrapping_mul)
    }

    fn div(&mut self, _console: &mut Console<'_>) -> SinkResult {
        self.exec_division(i64::wrapping_div)
    }

    fn modulo(&mut self, _console: &mut Console<'_>) -> SinkResult {
        self.exec_division(i64::wrapping_rem)
    }

    // ---- Heap access ----

    fn store(&mut self, _console: &mut Console<'_>) -> SinkResult {
        if self.stack.len() < 2 {
            return Err(RuntimeError::StackUnderflow);
        }
        let value = self.pop()?;
        let address = self.pop()?;
        trace!(address, value, "heap store");
        self.heap.insert(address, value);
        Ok(())
    }

    fn retrieve(&mut self, _console: &mut Console<'_>) -> SinkResult {
        let address = self.peek()?;
        let value = *self
            .heap
            .get(&address)
            .ok_or(RuntimeError::UnsetHeapAddress { address })?;
        self.pop()?;
        self.push_value(value)
    }

    // ---- Flow control ----

    fn test(
        &mut self,
        _console: &mut Console<'_>,
        condition: Condition,
    ) -> Result<Verdict, RuntimeError> {
        Ok(Verdict::from(condition.holds(self.peek()?)))
    }

    fn end(&mut self, _console: &mut Console<'_>) -> SinkResult {
        trace!(depth = self.stack.len(), heap = self.heap.len(), "machine stopped");
        Ok(())
    }

    // ---- I/O ----

    fn output_char(&mut self, console: &mut Console<'_>) -> SinkResult {
        let value = self.peek()?;
        let c = u32::try_from(value)
            .ok()
            .and_then(char::from_u32)
            .ok_or(RuntimeError::InvalidCharacter { value })?;
        self.pop()?;
        write!(console.output(), "{c}")?;
        Ok(())
    }

    fn output_number(&mut self, console: &mut Console<'_>) -> SinkResult {
        let value = self.pop()?;
        write!(console.output(), "{value}")?;
        Ok(())
    }

    /// Read one character into the heap. End of input stores -1.
    fn read_char(&mut self, console: &mut Console<'_>) -> SinkResult {
        let address = self.pop()?;
        let value = console.read_char()?.map_or(-1, |c| i64::from(u32::from(c)));
        self.heap.insert(address, value);
        Ok(())
    }

    /// Read one line, parsed as a decimal integer, into the heap.
    fn read_number(&mut self, console: &mut Console<'_>) -> SinkResult {
        let address = self.pop()?;
        let line = console.read_line()?.ok_or(RuntimeError::EndOfInput)?;
        let value = line
            .trim()
            .parse::<i64>()
            .map_err(|_| RuntimeError::InvalidNumberInput {
                input: line.clone(),
            })?;
        self.heap.insert(address, value);
        Ok(())
    }

    // ---- Inspection ----

    fn dump_stack(&mut self, console: &mut Console<'_>) -> SinkResult {
        let out = console.output();
        for (index, value) in self.stack.iter().rev().enumerate() {
            writeln!(out, "{index}: {value}")?;
        }
        Ok(())
    }

    fn dump_heap(&mut self, console: &mut Console<'_>) -> SinkResult {
        let out = console.output();
        for (address, value) in &self.heap {
            writeln!(out, "{address}: {value}")?;
        }
        Ok(())
    }
}
