//! Execution engine: the second pass.
//!
//! The engine replays the program from offset 0. Each iteration skips to
//! the next instruction, gives the debugger a chance to intercept, decodes
//! one instruction and dispatches it. Stack, arithmetic, heap and I/O
//! instructions go to the command sink; flow control is handled here by
//! seeking the decoder to a resolved label offset.

use tracing::{debug, info, trace};
use wspace_common::{
    CommandSink, Condition, Console, Decoder, FormatError, Instruction, Label, Program,
    RuntimeError,
};

use crate::debugger::Debugger;
use crate::error::InterpretError;
use crate::options::RunOptions;
use crate::resolver::{resolve, LabelTable};

/// How a run ended without error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The decoder ran out of instructions.
    Finished,
    /// The program executed its end instruction.
    Aborted,
}

/// Whether the loop continues after an instruction.
enum Flow {
    Continue,
    Abort,
}

/// One interpretation run over a program.
pub struct Interpreter<'a, 'io> {
    /// The program being executed.
    pub(crate) program: &'a Program,
    /// Cursor over the program; its position is the program counter.
    pub(crate) decoder: Decoder<'a>,
    /// The backend receiving non-control instructions.
    pub(crate) sink: &'a mut dyn CommandSink,
    pub(crate) console: &'a mut Console<'io>,
    pub(crate) labels: LabelTable,
    /// Return offsets, most recent last.
    pub(crate) call_stack: Vec<usize>,
    pub(crate) debugger: Debugger,
    max_steps: Option<u64>,
    steps: u64,
}

impl<'a, 'io> Interpreter<'a, 'io> {
    pub fn new(
        program: &'a Program,
        sink: &'a mut dyn CommandSink,
        console: &'a mut Console<'io>,
        options: &RunOptions,
    ) -> Self {
        Self {
            program,
            decoder: program.decoder(),
            sink,
            console,
            labels: LabelTable::default(),
            call_stack: Vec::new(),
            debugger: Debugger::new(options.debug, options.breakpoints.iter().copied()),
            max_steps: options.max_steps,
            steps: 0,
        }
    }

    /// The label table. Empty until `execute` has resolved labels.
    pub fn labels(&self) -> &LabelTable {
        &self.labels
    }

    /// Pending return offsets, most recent last.
    pub fn call_stack(&self) -> &[usize] {
        &self.call_stack
    }

    pub fn debugger(&self) -> &Debugger {
        &self.debugger
    }

    /// Number of instructions executed so far.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Resolve labels, then run until the end instruction, the end of the
    /// program, or an error.
    pub fn execute(&mut self) -> Result<Completion, InterpretError> {
        self.labels = resolve(self.program)?;
        self.decoder.seek(0);
        info!(labels = self.labels.len(), "running");

        let completion = loop {
            if !self.decoder.has_next() {
                break Completion::Finished;
            }
            let at = self.decoder.position();
            self.intercept(at)?;

            if let Some(limit) = self.max_steps {
                if self.steps >= limit {
                    return Err(InterpretError::StepLimitExceeded { limit });
                }
            }
            self.steps += 1;

            let Some(instr) = self.decoder.decode_next()? else {
                break Completion::Finished;
            };
            trace!(at, %instr, "execute");

            if let Flow::Abort = self.dispatch(at, &instr)? {
                break Completion::Aborted;
            }
        };

        info!(steps = self.steps, ?completion, "run complete");
        self.console
            .flush()
            .map_err(InterpretError::io(self.decoder.position()))?;
        Ok(completion)
    }

    fn dispatch(&mut self, at: usize, instr: &Instruction) -> Result<Flow, InterpretError> {
        let runtime = InterpretError::runtime(at);
        let sink = &mut *self.sink;
        let console = &mut *self.console;

        match instr {
            Instruction::Push(n) => sink.push(console, *n).map_err(runtime)?,
            Instruction::Duplicate => sink.duplicate(console).map_err(runtime)?,
            Instruction::Copy(n) => sink.copy(console, *n).map_err(runtime)?,
            Instruction::Swap => sink.swap(console).map_err(runtime)?,
            Instruction::Discard => sink.discard(console).map_err(runtime)?,
            Instruction::Slide(n) => sink.slide(console, *n).map_err(runtime)?,
            Instruction::Add => sink.add(console).map_err(runtime)?,
            Instruction::Sub => sink.sub(console).map_err(runtime)?,
            Instruction::Mul => sink.mul(console).map_err(runtime)?,
            Instruction::Div => sink.div(console).map_err(runtime)?,
            Instruction::Mod => sink.modulo(console).map_err(runtime)?,
            Instruction::Store => sink.store(console).map_err(runtime)?,
            Instruction::Retrieve => sink.retrieve(console).map_err(runtime)?,
            Instruction::OutputChar => sink.output_char(console).map_err(runtime)?,
            Instruction::OutputNumber => sink.output_number(console).map_err(runtime)?,
            Instruction::ReadChar => sink.read_char(console).map_err(runtime)?,
            Instruction::ReadNumber => sink.read_number(console).map_err(runtime)?,

            // labels were recorded by the resolver
            Instruction::Mark(_) => sink.control(console, instr).map_err(runtime)?,
            Instruction::Call(label) => {
                sink.control(console, instr).map_err(runtime)?;
                let target = self.target(at, label)?;
                let return_to = self.decoder.position();
                debug!(label = %label, from = at, to = target, return_to, "call");
                self.call_stack.push(return_to);
                self.decoder.seek(target);
            }
            Instruction::Jump(label) => {
                sink.control(console, instr).map_err(runtime)?;
                let target = self.target(at, label)?;
                debug!(label = %label, from = at, to = target, "jump");
                self.decoder.seek(target);
            }
            Instruction::JumpIfZero(label) => self.branch(at, instr, label, Condition::Zero)?,
            Instruction::JumpIfNegative(label) => {
                self.branch(at, instr, label, Condition::Negative)?
            }
            Instruction::Return => {
                sink.control(console, instr).map_err(runtime)?;
                let target = self
                    .call_stack
                    .pop()
                    .ok_or(RuntimeError::EmptyCallStack)
                    .map_err(runtime)?;
                debug!(from = at, to = target, "return");
                self.decoder.seek(target);
            }
            Instruction::End => {
                sink.end(console).map_err(runtime)?;
                info!(at, "end instruction");
                return Ok(Flow::Abort);
            }
        }

        Ok(Flow::Continue)
    }

    /// Conditional jump. Only a definite `True` verdict transfers control.
    fn branch(
        &mut self,
        at: usize,
        instr: &Instruction,
        label: &Label,
        condition: Condition,
    ) -> Result<(), InterpretError> {
        let runtime = InterpretError::runtime(at);
        let verdict = self
            .sink
            .test(self.console, condition)
            .map_err(runtime)?;
        self.sink.control(self.console, instr).map_err(runtime)?;

        if verdict.is_true() {
            let target = self.target(at, label)?;
            debug!(label = %label, %condition, from = at, to = target, "branch taken");
            self.decoder.seek(target);
        } else {
            trace!(label = %label, %condition, ?verdict, "branch not taken");
        }
        Ok(())
    }

    fn target(&self, at: usize, label: &Label) -> Result<usize, FormatError> {
        self.labels
            .get(label)
            .ok_or_else(|| FormatError::UndefinedLabel {
                label: label.to_string(),
                at,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wspace_common::{SinkResult, Verdict};

    /// Records every sink call by name; tests are answered from a queue.
    #[derive(Default)]
    struct Recorder {
        calls: Vec<String>,
        verdicts: Vec<Verdict>,
    }

    impl Recorder {
        fn log(&mut self, name: impl Into<String>) -> SinkResult {
            self.calls.push(name.into());
            Ok(())
        }
    }

    impl CommandSink for Recorder {
        fn push(&mut self, _: &mut Console<'_>, value: i64) -> SinkResult {
            self.log(format!("push {value}"))
        }
        fn duplicate(&mut self, _: &mut Console<'_>) -> SinkResult {
            self.log("duplicate")
        }
        fn copy(&mut self, _: &mut Console<'_>, index: i64) -> SinkResult {
            self.log(format!("copy {index}"))
        }
        fn swap(&mut self, _: &mut Console<'_>) -> SinkResult {
            self.log("swap")
        }
        fn discard(&mut self, _: &mut Console<'_>) -> SinkResult {
            self.log("discard")
        }
        fn slide(&mut self, _: &mut Console<'_>, count: i64) -> SinkResult {
            self.log(format!("slide {count}"))
        }
        fn add(&mut self, _: &mut Console<'_>) -> SinkResult {
            self.log("add")
        }
        fn sub(&mut self, _: &mut Console<'_>) -> SinkResult {
            self.log("sub")
        }
        fn mul(&mut self, _: &mut Console<'_>) -> SinkResult {
            self.log("mul")
        }
        fn div(&mut self, _: &mut Console<'_>) -> SinkResult {
            self.log("div")
        }
        fn modulo(&mut self, _: &mut Console<'_>) -> SinkResult {
            self.log("mod")
        }
        fn store(&mut self, _: &mut Console<'_>) -> SinkResult {
            self.log("store")
        }
        fn retrieve(&mut self, _: &mut Console<'_>) -> SinkResult {
            self.log("retrieve")
        }
        fn test(&mut self, _: &mut Console<'_>, condition: Condition) -> Result<Verdict, RuntimeError> {
            self.log(format!("test {condition}"))?;
            Ok(if self.verdicts.is_empty() {
                Verdict::Indeterminate
            } else {
                self.verdicts.remove(0)
            })
        }
        fn end(&mut self, _: &mut Console<'_>) -> SinkResult {
            self.log("end")
        }
        fn output_char(&mut self, _: &mut Console<'_>) -> SinkResult {
            self.log("output_char")
        }
        fn output_number(&mut self, _: &mut Console<'_>) -> SinkResult {
            self.log("output_number")
        }
        fn read_char(&mut self, _: &mut Console<'_>) -> SinkResult {
            self.log("read_char")
        }
        fn read_number(&mut self, _: &mut Console<'_>) -> SinkResult {
            self.log("read_number")
        }
        fn dump_stack(&mut self, _: &mut Console<'_>) -> SinkResult {
            self.log("dump_stack")
        }
        fn dump_heap(&mut self, _: &mut Console<'_>) -> SinkResult {
            self.log("dump_heap")
        }
    }

    fn label(bits: &str) -> Label {
        Label::parse(bits).unwrap()
    }

    fn record(
        instrs: &[Instruction],
        verdicts: Vec<Verdict>,
        options: &RunOptions,
    ) -> (Result<Completion, InterpretError>, Vec<String>) {
        let program = Program::from_instructions(instrs);
        let mut sink = Recorder {
            verdicts,
            ..Recorder::default()
        };
        let mut out = Vec::new();
        let mut console = Console::new(&b""[..], &mut out);
        let result = Interpreter::new(&program, &mut sink, &mut console, options).execute();
        (result, sink.calls)
    }

    #[test]
    fn forwards_instructions_in_order() {
        let (result, calls) = record(
            &[
                Instruction::Push(2),
                Instruction::Copy(0),
                Instruction::Mul,
                Instruction::OutputNumber,
            ],
            vec![],
            &RunOptions::default(),
        );
        assert_eq!(result, Ok(Completion::Finished));
        assert_eq!(calls, vec!["push 2", "copy 0", "mul", "output_number"]);
    }

    #[test]
    fn end_aborts_and_skips_the_rest() {
        let (result, calls) = record(
            &[Instruction::End, Instruction::Push(1)],
            vec![],
            &RunOptions::default(),
        );
        assert_eq!(result, Ok(Completion::Aborted));
        assert_eq!(calls, vec!["end"]);
    }

    #[test]
    fn forward_jump_skips_code() {
        let (result, calls) = record(
            &[
                Instruction::Jump(label("1")),
                Instruction::Push(1),
                Instruction::Mark(label("1")),
                Instruction::Push(2),
            ],
            vec![],
            &RunOptions::default(),
        );
        assert_eq!(result, Ok(Completion::Finished));
        assert_eq!(calls, vec!["push 2"]);
    }

    #[test]
    fn branch_follows_verdicts() {
        let instrs = [
            Instruction::JumpIfZero(label("0")),
            Instruction::Push(1),
            Instruction::Mark(label("0")),
            Instruction::Push(2),
        ];
        let (_, taken) = record(&instrs, vec![Verdict::True], &RunOptions::default());
        assert_eq!(taken, vec!["test ZERO", "push 2"]);

        let (_, not_taken) = record(&instrs, vec![Verdict::False], &RunOptions::default());
        assert_eq!(not_taken, vec!["test ZERO", "push 1", "push 2"]);

        let (_, unknown) = record(&instrs, vec![], &RunOptions::default());
        assert_eq!(unknown, vec!["test ZERO", "push 1", "push 2"]);
    }

    #[test]
    fn step_limit_stops_infinite_loops() {
        let (result, calls) = record(
            &[Instruction::Mark(label("")), Instruction::Push(0), Instruction::Jump(label(""))],
            vec![],
            &RunOptions::default().with_max_steps(7),
        );
        assert_eq!(result, Err(InterpretError::StepLimitExceeded { limit: 7 }));
        // mark, push, jump, then (push, jump) twice
        assert_eq!(calls, vec!["push 0", "push 0", "push 0"]);
    }

    #[test]
    fn run_state_is_observable_after_execute() {
        // call 1: 0..5, end: 5..8, label 1: 8..13, push 1: 13..18
        let program = Program::from_instructions(&[
            Instruction::Call(label("1")),
            Instruction::End,
            Instruction::Mark(label("1")),
            Instruction::Push(1),
        ]);
        let mut sink = Recorder::default();
        let mut out = Vec::new();
        let mut console = Console::new(&b""[..], &mut out);
        let options = RunOptions::default().with_breakpoint(5);
        let mut interpreter = Interpreter::new(&program, &mut sink, &mut console, &options);

        assert_eq!(interpreter.execute(), Ok(Completion::Finished));
        assert_eq!(interpreter.call_stack(), &[5]);
        assert_eq!(interpreter.steps(), 2);
        assert_eq!(interpreter.labels().get(&label("1")), Some(13));
        assert!(!interpreter.debugger().is_stepping());
        assert_eq!(interpreter.debugger().breakpoints(), &[5]);
    }

    #[test]
    fn undefined_label_fails_only_when_taken() {
        let (result, _) = record(
            &[Instruction::JumpIfNegative(label("111")), Instruction::End],
            vec![Verdict::False],
            &RunOptions::default(),
        );
        assert_eq!(result, Ok(Completion::Aborted));

        let (result, _) = record(
            &[Instruction::Call(label("111"))],
            vec![],
            &RunOptions::default(),
        );
        assert_eq!(
            result,
            Err(InterpretError::Format(FormatError::UndefinedLabel {
                label: "111".to_string(),
                at: 0
            }))
        );
    }
}
