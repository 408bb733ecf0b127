//! CLI command implementations.

use std::fs;

use tracing::warn;
use wspace_common::{CommandSink, Console, Program};
use wspace_interpreter::{Completion, InterpretError, RunOptions};
use wspace_translator::Translator;
use wspace_vm::Machine;

const RUN_USAGE: &str =
    "Usage: wspace run <program> [Machine|Translator] [debug] [--break OFFSET]... [--max-steps N]";

/// Which command sink executes the program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Backend {
    Machine,
    Translator,
}

/// Interpret a program on the chosen backend.
pub fn run(args: &[String]) -> Result<(), i32> {
    if args.is_empty() {
        eprintln!("error: run requires a program file");
        eprintln!("{RUN_USAGE}");
        return Err(1);
    }

    let input = &args[0];
    let (backend, options) = parse_run_args(&args[1..])?;
    let program = read_program(input)?;

    let mut sink: Box<dyn CommandSink> = match backend {
        Backend::Machine => Box::new(Machine::new()),
        Backend::Translator => Box::new(Translator::new()),
    };
    let mut console = Console::stdio();
    let result = wspace_interpreter::run(&program, sink.as_mut(), &mut console, &options);
    // partial output from a failed run
    if let Err(e) = console.flush() {
        warn!(error = %e, "flushing program output failed");
    }

    match result {
        Ok(Completion::Aborted) => {
            eprintln!("ok: end instruction reached");
            Ok(())
        }
        Ok(Completion::Finished) => {
            eprintln!("ok: end of program reached");
            Ok(())
        }
        Err(InterpretError::Format(e)) => {
            eprintln!("error: {e}");
            Err(1)
        }
        Err(e) => {
            eprintln!("runtime error: {e}");
            Err(3)
        }
    }
}

/// Print a static listing of every instruction.
pub fn disassemble(args: &[String]) -> Result<(), i32> {
    if args.is_empty() {
        eprintln!("error: disassemble requires a program file");
        eprintln!("Usage: wspace disassemble <program>");
        return Err(1);
    }

    let program = read_program(&args[0])?;
    let text = wspace_translator::listing(&program).map_err(|e| {
        eprintln!("error: {e}");
        1
    })?;
    print!("{text}");
    Ok(())
}

/// Run label resolution only and print the label table.
pub fn labels(args: &[String]) -> Result<(), i32> {
    if args.is_empty() {
        eprintln!("error: labels requires a program file");
        eprintln!("Usage: wspace labels <program>");
        return Err(1);
    }

    let program = read_program(&args[0])?;
    let table = wspace_interpreter::resolve(&program).map_err(|e| {
        eprintln!("error: {e}");
        1
    })?;
    for (label, offset) in table.entries() {
        println!("{label}: {offset}");
    }
    Ok(())
}

fn parse_run_args(args: &[String]) -> Result<(Backend, RunOptions), i32> {
    let mut backend = Backend::Machine;
    let mut options = RunOptions::default();

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "debug" => options.debug = true,
            "Machine" => backend = Backend::Machine,
            "Translator" => backend = Backend::Translator,
            "--break" => {
                let offset = flag_value(iter.next(), "--break")?;
                options = options.with_breakpoint(offset);
            }
            "--max-steps" => {
                let limit = flag_value(iter.next(), "--max-steps")?;
                options = options.with_max_steps(limit);
            }
            flag if flag.starts_with("--") => {
                eprintln!("error: unknown flag '{flag}'");
                eprintln!("{RUN_USAGE}");
                return Err(1);
            }
            other => {
                warn!(backend = other, "unknown backend, using Machine");
                backend = Backend::Machine;
            }
        }
    }

    Ok((backend, options))
}

fn flag_value<T: std::str::FromStr>(value: Option<&String>, flag: &str) -> Result<T, i32> {
    let Some(value) = value else {
        eprintln!("error: {flag} requires a value");
        return Err(1);
    };
    value.parse().map_err(|_| {
        eprintln!("error: invalid value '{value}' for {flag}");
        1
    })
}

fn read_program(path: &str) -> Result<Program, i32> {
    let source = fs::read(path).map_err(|e| {
        eprintln!("error: cannot read '{path}': {e}");
        1
    })?;
    Ok(Program::new(source))
}
