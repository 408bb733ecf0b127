//! Whitespace translator: a disassembling command sink.
//!
//! [`Translator`] implements [`CommandSink`] by printing one mnemonic line
//! per operation instead of executing it. Run under the interpreter, it
//! traces the path a program takes: jumps and calls are followed, but
//! conditional tests are indeterminate so conditional branches are never
//! taken.
//!
//! [`listing`] is the static counterpart: a linear decode of the whole
//! program without running it.
//!
//! # Usage
//!
//! ```
//! use wspace_common::{Instruction, Program};
//! use wspace_translator::listing;
//!
//! let program = Program::from_instructions(&[Instruction::Push(1), Instruction::End]);
//! assert_eq!(listing(&program).unwrap(), "0: PUSH 1\n5: END\n");
//! ```

mod listing;

pub use listing::listing;

use wspace_common::{CommandSink, Condition, Console, Instruction, RuntimeError, SinkResult, Verdict};

/// The disassembling backend. Holds no machine state.
#[derive(Debug, Clone, Copy, Default)]
pub struct Translator;

impl Translator {
    pub fn new() -> Self {
        Self
    }
}

fn emit(console: &mut Console<'_>, line: std::fmt::Arguments<'_>) -> SinkResult {
    writeln!(console.output(), "{line}")?;
    Ok(())
}

impl CommandSink for Translator {
    fn push(&mut self, console: &mut Console<'_>, value: i64) -> SinkResult {
        emit(console, format_args!("PUSH {value}"))
    }

    fn duplicate(&mut self, console: &mut Console<'_>) -> SinkResult {
        emit(console, format_args!("DUP"))
    }

    fn copy(&mut self, console: &mut Console<'_>, index: i64) -> SinkResult {
        emit(console, format_args!("COPY {index}"))
    }

    fn swap(&mut self, console: &mut Console<'_>) -> SinkResult {
        emit(console, format_args!("SWAP"))
    }

    fn discard(&mut self, console: &mut Console<'_>) -> SinkResult {
        emit(console, format_args!("POP"))
    }

    fn slide(&mut self, console: &mut Console<'_>, count: i64) -> SinkResult {
        emit(console, format_args!("SLIDE {count}"))
    }

    fn add(&mut self, console: &mut Console<'_>) -> SinkResult {
        emit(console, format_args!("ADD"))
    }

    fn sub(&mut self, console: &mut Console<'_>) -> SinkResult {
        emit(console, format_args!("SUB"))
    }

    fn mul(&mut self, console: &mut Console<'_>) -> SinkResult {
        emit(console, format_args!("MUL"))
    }

    fn div(&mut self, console: &mut Console<'_>) -> SinkResult {
        emit(console, format_args!("DIV"))
    }

    fn modulo(&mut self, console: &mut Console<'_>) -> SinkResult {
        emit(console, format_args!("MOD"))
    }

    fn store(&mut self, console: &mut Console<'_>) -> SinkResult {
        emit(console, format_args!("STORE"))
    }

    fn retrieve(&mut self, console: &mut Console<'_>) -> SinkResult {
        emit(console, format_args!("LOAD"))
    }

    /// Always indeterminate: no values are tracked.
    fn test(
        &mut self,
        console: &mut Console<'_>,
        condition: Condition,
    ) -> Result<Verdict, RuntimeError> {
        emit(console, format_args!("TEST {condition}"))?;
        Ok(Verdict::Indeterminate)
    }

    fn end(&mut self, console: &mut Console<'_>) -> SinkResult {
        emit(console, format_args!("END"))
    }

    fn output_char(&mut self, console: &mut Console<'_>) -> SinkResult {
        emit(console, format_args!("OUTCHR"))
    }

    fn output_number(&mut self, console: &mut Console<'_>) -> SinkResult {
        emit(console, format_args!("OUTNUM"))
    }

    fn read_char(&mut self, console: &mut Console<'_>) -> SinkResult {
        emit(console, format_args!("READCHR"))
    }

    fn read_number(&mut self, console: &mut Console<'_>) -> SinkResult {
        emit(console, format_args!("READNUM"))
    }

    fn dump_stack(&mut self, _console: &mut Console<'_>) -> SinkResult {
        Ok(())
    }

    fn dump_heap(&mut self, _console: &mut Console<'_>) -> SinkResult {
        Ok(())
    }

    fn control(&mut self, console: &mut Console<'_>, instruction: &Instruction) -> SinkResult {
        emit(console, format_args!("{instruction}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wspace_common::Label;

    fn translate(f: impl FnOnce(&mut Translator, &mut Console<'_>)) -> String {
        let mut out = Vec::new();
        {
            let mut console = Console::new(&b""[..], &mut out);
            f(&mut Translator::new(), &mut console);
        }
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn one_line_per_operation() {
        let text = translate(|t, c| {
            t.push(c, -4).unwrap();
            t.copy(c, 2).unwrap();
            t.slide(c, 1).unwrap();
            t.modulo(c).unwrap();
            t.retrieve(c).unwrap();
            t.read_number(c).unwrap();
            t.end(c).unwrap();
        });
        assert_eq!(text, "PUSH -4\nCOPY 2\nSLIDE 1\nMOD\nLOAD\nREADNUM\nEND\n");
    }

    #[test]
    fn test_is_indeterminate_on_empty_state() {
        let text = translate(|t, c| {
            assert_eq!(t.test(c, Condition::Zero), Ok(Verdict::Indeterminate));
            assert_eq!(t.test(c, Condition::Negative), Ok(Verdict::Indeterminate));
        });
        assert_eq!(text, "TEST ZERO\nTEST NEG\n");
    }

    #[test]
    fn operations_never_fail_without_state() {
        translate(|t, c| {
            t.discard(c).unwrap();
            t.swap(c).unwrap();
            t.div(c).unwrap();
            t.output_char(c).unwrap();
        });
    }

    #[test]
    fn dumps_are_silent() {
        let text = translate(|t, c| {
            t.dump_stack(c).unwrap();
            t.dump_heap(c).unwrap();
        });
        assert_eq!(text, "");
    }

    #[test]
    fn control_prints_flow_instruction() {
        let text = translate(|t, c| {
            t.control(c, &Instruction::Call(Label::parse("101").unwrap()))
                .unwrap();
            t.control(c, &Instruction::Return).unwrap();
        });
        assert_eq!(text, "CALL 101\nRET\n");
    }
}
