//! Interactive debugger.
//!
//! When stepping is active the engine stops before each instruction,
//! prints a `{offset} > ` prompt and reads commands from the console until
//! one of them (`continue` or `step`) hands control back. Stepping starts
//! at offset 0 in debug mode, or when the program counter reaches a
//! breakpoint.

use thiserror::Error;
use tracing::debug;

use crate::engine::Interpreter;
use crate::error::InterpretError;

/// One operator command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebugCommand {
    /// Leave stepping mode and run freely.
    Continue,
    /// Execute one instruction and stop again.
    Step,
    Stack,
    Heap,
    /// List the call stack, most recent first.
    Calls,
    Labels,
    /// Register a breakpoint at an offset.
    Break(usize),
    Breaks,
}

/// A rejected command line. The prompt repeats.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command '{0}'")]
    Unknown(String),
    #[error("break: missing offset")]
    MissingOffset,
    #[error("break: '{0}' is not an offset")]
    InvalidOffset(String),
    #[error("break: offset {offset} outside program of {len} bytes")]
    OutOfRange { offset: i64, len: usize },
}

impl DebugCommand {
    /// Parse a command line for a program of `program_len` bytes.
    pub fn parse(line: &str, program_len: usize) -> Result<Self, CommandError> {
        let mut words = line.split_whitespace();
        let command = match words.next().unwrap_or_default() {
            "continue" | "cont" => DebugCommand::Continue,
            "step" => DebugCommand::Step,
            "stack" => DebugCommand::Stack,
            "heap" => DebugCommand::Heap,
            "call" => DebugCommand::Calls,
            "label" => DebugCommand::Labels,
            "breaks" => DebugCommand::Breaks,
            "break" => {
                let arg = words.next().ok_or(CommandError::MissingOffset)?;
                let offset: i64 = arg
                    .parse()
                    .map_err(|_| CommandError::InvalidOffset(arg.to_string()))?;
                match usize::try_from(offset) {
                    Ok(o) if o < program_len => DebugCommand::Break(o),
                    _ => {
                        return Err(CommandError::OutOfRange {
                            offset,
                            len: program_len,
                        })
                    }
                }
            }
            _ => return Err(CommandError::Unknown(line.trim().to_string())),
        };
        Ok(command)
    }
}

/// Stepping state and the breakpoint set.
#[derive(Debug, Clone, Default)]
pub struct Debugger {
    stepping: bool,
    breakpoints: Vec<usize>,
    /// The last accepted command line, repeated on empty input.
    last_command: Option<String>,
}

impl Debugger {
    pub fn new(stepping: bool, breakpoints: impl IntoIterator<Item = usize>) -> Self {
        let mut debugger = Self {
            stepping,
            ..Self::default()
        };
        for offset in breakpoints {
            debugger.add_breakpoint(offset);
        }
        debugger
    }

    pub fn is_stepping(&self) -> bool {
        self.stepping
    }

    /// Registered breakpoints in ascending order.
    pub fn breakpoints(&self) -> &[usize] {
        &self.breakpoints
    }

    pub fn add_breakpoint(&mut self, offset: usize) {
        if let Err(slot) = self.breakpoints.binary_search(&offset) {
            self.breakpoints.insert(slot, offset);
        }
    }

    /// Whether the engine must stop before the instruction at `at`.
    /// Reaching a breakpoint turns stepping on.
    pub fn should_stop(&mut self, at: usize) -> bool {
        if !self.stepping && self.breakpoints.binary_search(&at).is_ok() {
            debug!(at, "breakpoint hit");
            self.stepping = true;
        }
        self.stepping
    }
}

impl Interpreter<'_, '_> {
    /// Run the command session for the instruction at `at`, if stepping.
    pub(crate) fn intercept(&mut self, at: usize) -> Result<(), InterpretError> {
        if !self.debugger.should_stop(at) {
            return Ok(());
        }
        let io = InterpretError::io(at);
        let runtime = InterpretError::runtime(at);

        loop {
            write!(self.console.output(), "{at} > ").map_err(io)?;
            let Some(line) = self.console.read_line().map_err(io)? else {
                debug!(at, "command input closed, detaching");
                self.debugger.stepping = false;
                return Ok(());
            };

            let line = if line.trim().is_empty() {
                match &self.debugger.last_command {
                    Some(previous) => previous.clone(),
                    None => continue,
                }
            } else {
                line
            };

            let command = match DebugCommand::parse(&line, self.program.len()) {
                Ok(command) => command,
                Err(e) => {
                    writeln!(self.console.output(), "!!! {e}").map_err(io)?;
                    continue;
                }
            };
            self.debugger.last_command = Some(line);

            match command {
                DebugCommand::Continue => {
                    self.debugger.stepping = false;
                    return Ok(());
                }
                DebugCommand::Step => return Ok(()),
                DebugCommand::Stack => self.sink.dump_stack(self.console).map_err(runtime)?,
                DebugCommand::Heap => self.sink.dump_heap(self.console).map_err(runtime)?,
                DebugCommand::Calls => {
                    let out = self.console.output();
                    for (i, offset) in self.call_stack.iter().rev().enumerate() {
                        writeln!(out, "{i}: {offset}").map_err(io)?;
                    }
                }
                DebugCommand::Labels => {
                    let out = self.console.output();
                    for (label, offset) in self.labels.entries() {
                        writeln!(out, "{label}: {offset}").map_err(io)?;
                    }
                }
                DebugCommand::Break(offset) => self.debugger.add_breakpoint(offset),
                DebugCommand::Breaks => {
                    let out = self.console.output();
                    for (i, offset) in self.debugger.breakpoints.iter().enumerate() {
                        writeln!(out, "{i}: {offset}").map_err(io)?;
                    }
                }
            }
        }
    }
}
