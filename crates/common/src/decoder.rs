//! Instruction decoder: source bytes to [`Instruction`]s.
//!
//! The decoder is a cursor over the program. `decode_next` reads exactly one
//! instruction starting at the cursor, skipping insignificant bytes
//! anywhere between tokens. Callers move the cursor with `seek` to perform
//! jumps, calls and returns.

use crate::error::FormatError;
use crate::instruction::{Instruction, Label};
use crate::token::{visible, Token};

/// A seekable instruction reader.
#[derive(Debug, Clone)]
pub struct Decoder<'a> {
    source: &'a [u8],
    pos: usize,
}

impl<'a> Decoder<'a> {
    /// Create a decoder at offset 0.
    pub fn new(source: &'a [u8]) -> Self {
        Self { source, pos: 0 }
    }

    /// Current byte offset (the program counter).
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Move the cursor. Offsets past the end are clamped to the end.
    pub fn seek(&mut self, pos: usize) {
        self.pos = pos.min(self.source.len());
    }

    /// Skip insignificant bytes. Returns true if a significant token remains,
    /// leaving the cursor on it.
    pub fn has_next(&mut self) -> bool {
        while let Some(&byte) = self.source.get(self.pos) {
            if Token::from_byte(byte).is_some() {
                return true;
            }
            self.pos += 1;
        }
        false
    }

    /// Decode one instruction, or `None` at end of program.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError`] for token sequences outside the grammar, for
    /// a stream that ends mid-instruction, and for oversized literals.
    pub fn decode_next(&mut self) -> Result<Option<Instruction>, FormatError> {
        use Token::{LineFeed as L, Space as S, Tab as T};

        let Some(first) = self.next_token() else {
            return Ok(None);
        };
        // has_next left the cursor on the first token; next_token consumed it
        let at = self.pos - 1;

        let instr = match first {
            S => match self.expect()? {
                S => Instruction::Push(self.number()?),
                T => match self.expect()? {
                    S => Instruction::Copy(self.number()?),
                    L => Instruction::Slide(self.number()?),
                    t => return Err(invalid(at, &[S, T, t])),
                },
                L => match self.expect()? {
                    S => Instruction::Duplicate,
                    T => Instruction::Swap,
                    L => Instruction::Discard,
                },
            },
            T => match self.expect()? {
                S => match self.expect()? {
                    S => match self.expect()? {
                        S => Instruction::Add,
                        T => Instruction::Sub,
                        L => Instruction::Mul,
                    },
                    T => match self.expect()? {
                        S => Instruction::Div,
                        T => Instruction::Mod,
                        t => return Err(invalid(at, &[T, S, T, t])),
                    },
                    L => return Err(invalid(at, &[T, S, L])),
                },
                T => match self.expect()? {
                    S => Instruction::Store,
                    T => Instruction::Retrieve,
                    L => return Err(invalid(at, &[T, T, L])),
                },
                L => match self.expect()? {
                    S => match self.expect()? {
                        S => Instruction::OutputChar,
                        T => Instruction::OutputNumber,
                        t => return Err(invalid(at, &[T, L, S, t])),
                    },
                    T => match self.expect()? {
                        S => Instruction::ReadChar,
                        T => Instruction::ReadNumber,
                        t => return Err(invalid(at, &[T, L, T, t])),
                    },
                    L => return Err(invalid(at, &[T, L, L])),
                },
            },
            L => match self.expect()? {
                S => match self.expect()? {
                    S => Instruction::Mark(self.label()?),
                    T => Instruction::Call(self.label()?),
                    L => Instruction::Jump(self.label()?),
                },
                T => match self.expect()? {
                    S => Instruction::JumpIfZero(self.label()?),
                    T => Instruction::JumpIfNegative(self.label()?),
                    L => Instruction::Return,
                },
                L => match self.expect()? {
                    L => Instruction::End,
                    t => return Err(invalid(at, &[L, L, t])),
                },
            },
        };

        Ok(Some(instr))
    }

    /// Consume the next significant token.
    fn next_token(&mut self) -> Option<Token> {
        if !self.has_next() {
            return None;
        }
        let token = Token::from_byte(self.source[self.pos]);
        self.pos += 1;
        token
    }

    /// Consume a continuation token; end of stream is a format error.
    fn expect(&mut self) -> Result<Token, FormatError> {
        self.next_token()
            .ok_or(FormatError::UnexpectedEof { at: self.pos })
    }

    /// Read a literal's bits up to and including the terminator.
    fn bits(&mut self) -> Result<String, FormatError> {
        let mut bits = String::new();
        loop {
            match self.next_token() {
                Some(Token::Space) => bits.push('0'),
                Some(Token::Tab) => bits.push('1'),
                Some(Token::LineFeed) => return Ok(bits),
                None => return Err(FormatError::UnexpectedEof { at: self.pos }),
            }
        }
    }

    fn label(&mut self) -> Result<Label, FormatError> {
        Ok(Label::from_bits(self.bits()?))
    }

    /// Sign-magnitude number literal. An empty literal or a lone sign bit
    /// decodes to zero.
    fn number(&mut self) -> Result<i64, FormatError> {
        let at = self.pos;
        let bits = self.bits()?;
        let mut chars = bits.chars();
        let negative = chars.next() == Some('1');

        let mut magnitude: u64 = 0;
        for bit in chars {
            magnitude = magnitude
                .checked_mul(2)
                .and_then(|m| m.checked_add(u64::from(bit == '1')))
                .ok_or(FormatError::LiteralOverflow { at })?;
        }

        if negative {
            0i64.checked_sub_unsigned(magnitude)
                .ok_or(FormatError::LiteralOverflow { at })
        } else {
            i64::try_from(magnitude).map_err(|_| FormatError::LiteralOverflow { at })
        }
    }
}

fn invalid(at: usize, tokens: &[Token]) -> FormatError {
    FormatError::InvalidInstruction {
        at,
        sequence: visible(tokens),
    }
}

impl Iterator for Decoder<'_> {
    type Item = Result<(usize, Instruction), FormatError>;

    /// Yields each instruction with its start offset. Stops after the first
    /// error.
    fn next(&mut self) -> Option<Self::Item> {
        if !self.has_next() {
            return None;
        }
        let at = self.pos;
        match self.decode_next() {
            Ok(Some(instr)) => Some(Ok((at, instr))),
            Ok(None) => None,
            Err(e) => {
                self.pos = self.source.len();
                Some(Err(e))
            }
        }
    }
}
