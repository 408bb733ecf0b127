//! Decoded instructions and their canonical whitespace encoding.
//!
//! Every instruction is an IMP prefix, a command, and at most one operand:
//!
//! ```text
//! Stack        SS n   push         STS n  copy        STL n  slide
//!              SLS    duplicate    SLT    swap        SLL    discard
//! Arithmetic   TSSS   add          TSST   sub         TSSL   mul
//!              TSTS   div          TSTT   mod
//! Heap         TTS    store        TTT    retrieve
//! Flow         LSS l  mark         LST l  call        LSL l  jump
//!              LTS l  jump if zero LTT l  jump if neg LTL    return
//!              LLL    end
//! I/O          TLSS   output char  TLST   output num
//!              TLTS   read char    TLTT   read num
//! ```
//!
//! Numbers (`n`) are a sign bit (`S` positive, `T` negative) followed by the
//! magnitude, most significant bit first, terminated by `L`. Labels (`l`) use
//! the same bits but are kept as an opaque key.

use std::fmt;

use crate::imp::Imp;
use crate::token::Token;

/// A label name: the raw bit string of a label operand, e.g. `"0110"`.
///
/// Labels are compared bit for bit, so `"01"` and `"1"` are distinct.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Label(String);

impl Label {
    /// Build a label from a string of `0` and `1` characters.
    ///
    /// Returns `None` if any other character is present.
    pub fn parse(bits: &str) -> Option<Self> {
        if bits.bytes().all(|b| b == b'0' || b == b'1') {
            Some(Self(bits.to_string()))
        } else {
            None
        }
    }

    pub(crate) fn from_bits(bits: String) -> Self {
        Self(bits)
    }

    /// The bit string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn encode_into(&self, out: &mut String) {
        for bit in self.0.chars() {
            out.push(if bit == '0' { ' ' } else { '\t' });
        }
        out.push('\n');
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            f.write_str("\"\"")
        } else {
            f.write_str(&self.0)
        }
    }
}

/// A single decoded instruction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Instruction {
    // Stack manipulation
    /// Push a number onto the stack.
    Push(i64),
    /// Push a copy of the top value.
    Duplicate,
    /// Push a copy of the value at the given 0-based depth.
    Copy(i64),
    /// Exchange the top two values.
    Swap,
    /// Drop the top value.
    Discard,
    /// Drop `n` values below the top, keeping the top.
    Slide(i64),

    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,

    // Heap access
    /// Pop value, then address; write the value to the heap.
    Store,
    /// Pop address; push the heap value stored there.
    Retrieve,

    // Flow control
    /// Define a label at the position after this instruction.
    Mark(Label),
    /// Save the return position and jump.
    Call(Label),
    Jump(Label),
    JumpIfZero(Label),
    JumpIfNegative(Label),
    /// Resume after the most recent call.
    Return,
    /// Stop the program.
    End,

    // I/O
    OutputChar,
    OutputNumber,
    ReadChar,
    ReadNumber,
}

impl Instruction {
    /// The instruction group.
    pub fn imp(&self) -> Imp {
        use Instruction::*;
        match self {
            Push(_) | Duplicate | Copy(_) | Swap | Discard | Slide(_) => Imp::StackManipulation,
            Add | Sub | Mul | Div | Mod => Imp::Arithmetic,
            Store | Retrieve => Imp::HeapAccess,
            Mark(_) | Call(_) | Jump(_) | JumpIfZero(_) | JumpIfNegative(_) | Return | End => {
                Imp::FlowControl
            }
            OutputChar | OutputNumber | ReadChar | ReadNumber => Imp::Io,
        }
    }

    /// Assembly mnemonic.
    pub fn mnemonic(&self) -> &'static str {
        use Instruction::*;
        match self {
            Push(_) => "PUSH",
            Duplicate => "DUP",
            Copy(_) => "COPY",
            Swap => "SWAP",
            Discard => "POP",
            Slide(_) => "SLIDE",
            Add => "ADD",
            Sub => "SUB",
            Mul => "MUL",
            Div => "DIV",
            Mod => "MOD",
            Store => "STORE",
            Retrieve => "LOAD",
            Mark(_) => "LABEL",
            Call(_) => "CALL",
            Jump(_) => "JUMP",
            JumpIfZero(_) => "JZ",
            JumpIfNegative(_) => "JN",
            Return => "RET",
            End => "END",
            OutputChar => "OUTCHR",
            OutputNumber => "OUTNUM",
            ReadChar => "READCHR",
            ReadNumber => "READNUM",
        }
    }

    /// The label operand, for flow control instructions that carry one.
    pub fn label(&self) -> Option<&Label> {
        match self {
            Instruction::Mark(l)
            | Instruction::Call(l)
            | Instruction::Jump(l)
            | Instruction::JumpIfZero(l)
            | Instruction::JumpIfNegative(l) => Some(l),
            _ => None,
        }
    }

    /// Canonical whitespace spelling of this instruction.
    pub fn encode(&self) -> String {
        use Instruction::*;
        use Token::{LineFeed as L, Space as S, Tab as T};

        // the command tokens that follow the IMP prefix
        let (command, number, label): (&[Token], Option<i64>, Option<&Label>) = match self {
            Push(n) => (&[S], Some(*n), None),
            Duplicate => (&[L, S], None, None),
            Copy(n) => (&[T, S], Some(*n), None),
            Swap => (&[L, T], None, None),
            Discard => (&[L, L], None, None),
            Slide(n) => (&[T, L], Some(*n), None),
            Add => (&[S, S], None, None),
            Sub => (&[S, T], None, None),
            Mul => (&[S, L], None, None),
            Div => (&[T, S], None, None),
            Mod => (&[T, T], None, None),
            Store => (&[S], None, None),
            Retrieve => (&[T], None, None),
            Mark(l) => (&[S, S], None, Some(l)),
            Call(l) => (&[S, T], None, Some(l)),
            Jump(l) => (&[S, L], None, Some(l)),
            JumpIfZero(l) => (&[T, S], None, Some(l)),
            JumpIfNegative(l) => (&[T, T], None, Some(l)),
            Return => (&[T, L], None, None),
            End => (&[L, L], None, None),
            OutputChar => (&[S, S], None, None),
            OutputNumber => (&[S, T], None, None),
            ReadChar => (&[T, S], None, None),
            ReadNumber => (&[T, T], None, None),
        };

        let mut out: String = self
            .imp()
            .prefix()
            .iter()
            .chain(command)
            .map(|t| t.as_char())
            .collect();
        if let Some(n) = number {
            encode_number(n, &mut out);
        }
        if let Some(l) = label {
            l.encode_into(&mut out);
        }
        out
    }
}

/// Append the literal encoding of `n`: sign, magnitude bits, terminator.
fn encode_number(n: i64, out: &mut String) {
    out.push(if n < 0 { '\t' } else { ' ' });
    let magnitude = n.unsigned_abs();
    if magnitude != 0 {
        let width = u64::BITS - magnitude.leading_zeros();
        for shift in (0..width).rev() {
            out.push(if (magnitude >> shift) & 1 == 1 { '\t' } else { ' ' });
        }
    }
    out.push('\n');
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Push(n) | Instruction::Copy(n) | Instruction::Slide(n) => {
                write!(f, "{} {n}", self.mnemonic())
            }
            _ => match self.label() {
                Some(label) => write!(f, "{} {label}", self.mnemonic()),
                None => f.write_str(self.mnemonic()),
            },
        }
    }
}
