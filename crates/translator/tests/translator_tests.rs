//! Integration tests for the Whitespace translator.
//!
//! Tests cover:
//! - Static listings of whole programs, comments included
//! - Dynamic translation through the interpreter (executed path only)
//! - Error propagation from the decoder

use wspace_common::{Console, FormatError, Instruction, Label, Program};
use wspace_interpreter::{run, Completion, InterpretError, RunOptions};
use wspace_translator::{listing, Translator};

// ---- Test helpers ----

fn l(bits: &str) -> Label {
    Label::parse(bits).unwrap()
}

fn translate(program: &Program) -> (Result<Completion, InterpretError>, String) {
    let mut out = Vec::new();
    let result = {
        let mut console = Console::new(&b""[..], &mut out);
        run(program, &mut Translator::new(), &mut console, &RunOptions::default())
    };
    (result, String::from_utf8(out).unwrap())
}

/// A program that reads a number and prints its double if positive.
fn double_positive() -> Program {
    Program::from_instructions(&[
        Instruction::Push(0),
        Instruction::ReadNumber,
        Instruction::Push(0),
        Instruction::Retrieve,
        Instruction::Duplicate,
        Instruction::JumpIfNegative(l("0")),
        Instruction::Push(2),
        Instruction::Mul,
        Instruction::OutputNumber,
        Instruction::Mark(l("0")),
        Instruction::End,
    ])
}

// ---- Static listing ----

#[test]
fn listing_covers_every_instruction_once() {
    let text = listing(&double_positive()).unwrap();
    let mnemonics: Vec<_> = text
        .lines()
        .map(|line| line.split_once(": ").unwrap().1)
        .collect();
    assert_eq!(
        mnemonics,
        vec![
            "PUSH 0", "READNUM", "PUSH 0", "LOAD", "DUP", "JN 0", "PUSH 2", "MUL", "OUTNUM",
            "LABEL 0", "END",
        ]
    );
}

#[test]
fn listing_offsets_skip_comments() {
    let program = Program::new("push:   \t \t\nthen-print:\t\n \tdone");
    assert_eq!(listing(&program).unwrap(), "5: PUSH 5\n23: OUTNUM\n");
}

#[test]
fn listing_reports_truncated_program() {
    let program = Program::new("  \t");
    assert_eq!(listing(&program), Err(FormatError::UnexpectedEof { at: 3 }));
}

// ---- Dynamic translation ----

#[test]
fn translation_never_takes_conditional_branches() {
    let (result, out) = translate(&double_positive());
    assert_eq!(result, Ok(Completion::Aborted));
    assert_eq!(
        out,
        "PUSH 0\nREADNUM\nPUSH 0\nLOAD\nDUP\nTEST NEG\nJN 0\nPUSH 2\nMUL\nOUTNUM\nLABEL 0\nEND\n"
    );
}

#[test]
fn translation_prints_unconditional_transfers() {
    let program = Program::from_instructions(&[
        Instruction::Jump(l("1")),
        Instruction::Push(9),
        Instruction::Mark(l("1")),
        Instruction::Slide(3),
    ]);
    let (result, out) = translate(&program);
    assert_eq!(result, Ok(Completion::Finished));
    assert_eq!(out, "JUMP 1\nSLIDE 3\n");
}

#[test]
fn translation_stops_at_format_errors() {
    let (result, out) = translate(&Program::new("\n\n\t"));
    assert!(matches!(
        result,
        Err(InterpretError::Format(FormatError::InvalidInstruction { at: 0, .. }))
    ));
    assert_eq!(out, "");
}
