//! The significant characters of a Whitespace program.
//!
//! Only space, tab, and line feed carry meaning. Every other byte in the
//! source is a comment and is skipped by the decoder.

use std::fmt;

/// One significant source character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Token {
    /// `' '`: the first bit marker. Reads as `0` inside a literal.
    Space,
    /// `'\t'`: the second bit marker. Reads as `1` inside a literal.
    Tab,
    /// `'\n'`: the terminator.
    LineFeed,
}

/// All tokens, in grammar order.
pub const ALL_TOKENS: [Token; 3] = [Token::Space, Token::Tab, Token::LineFeed];

impl Token {
    /// Classify a source byte. Returns `None` for insignificant bytes.
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            b' ' => Some(Token::Space),
            b'\t' => Some(Token::Tab),
            b'\n' => Some(Token::LineFeed),
            _ => None,
        }
    }

    /// The source character for this token.
    pub fn as_char(self) -> char {
        match self {
            Token::Space => ' ',
            Token::Tab => '\t',
            Token::LineFeed => '\n',
        }
    }

    /// Single-letter visible name (`S`, `T`, `L`), used in diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            Token::Space => "S",
            Token::Tab => "T",
            Token::LineFeed => "L",
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Render a token sequence in visible form, e.g. `"TTL"`.
pub fn visible(tokens: &[Token]) -> String {
    tokens.iter().map(|t| t.name()).collect()
}
