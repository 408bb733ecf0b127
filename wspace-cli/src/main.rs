//! Whitespace CLI: run, disassemble, and debug programs.
//!
//! Exit codes:
//! - 0: Success (end instruction or end of program)
//! - 1: Usage, input, or format error
//! - 3: Runtime error

mod commands;

use std::process;

use tracing_subscriber::{fmt, EnvFilter};

fn main() {
    init_logging();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let result = match args[1].as_str() {
        "run" => commands::run(&args[2..]),
        "disassemble" => commands::disassemble(&args[2..]),
        "labels" => commands::labels(&args[2..]),
        "--help" | "-h" | "help" => {
            print_usage();
            process::exit(0);
        }
        other => {
            eprintln!("error: unknown command '{other}'");
            eprintln!();
            print_usage();
            process::exit(1);
        }
    };

    if let Err(code) = result {
        process::exit(code);
    }
}

/// Log to stderr so program output on stdout stays clean.
///
/// `RUST_LOG` overrides the default `warn` filter.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn print_usage() {
    eprintln!("Usage: wspace <command> [args]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  run <program> [Machine|Translator] [debug]   Interpret a program");
    eprintln!("      [--break OFFSET]... [--max-steps N]");
    eprintln!("  disassemble <program>                        List every instruction with its offset");
    eprintln!("  labels <program>                             Resolve and list label offsets");
}
