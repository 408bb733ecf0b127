//! Instruction modification parameters (IMPs): the five instruction groups.
//!
//! The IMP is selected by the first one or two tokens of an instruction:
//!
//! ```text
//! S    Stack Manipulation
//! TS   Arithmetic
//! TT   Heap Access
//! L    Flow Control
//! TL   I/O
//! ```

use std::fmt;

use crate::token::Token;

/// The instruction group an instruction belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Imp {
    StackManipulation,
    Arithmetic,
    HeapAccess,
    FlowControl,
    Io,
}

/// All IMPs, in grammar order.
pub const ALL_IMPS: [Imp; 5] = [
    Imp::StackManipulation,
    Imp::Arithmetic,
    Imp::HeapAccess,
    Imp::FlowControl,
    Imp::Io,
];

impl Imp {
    /// The token prefix that selects this group.
    pub fn prefix(self) -> &'static [Token] {
        match self {
            Imp::StackManipulation => &[Token::Space],
            Imp::Arithmetic => &[Token::Tab, Token::Space],
            Imp::HeapAccess => &[Token::Tab, Token::Tab],
            Imp::FlowControl => &[Token::LineFeed],
            Imp::Io => &[Token::Tab, Token::LineFeed],
        }
    }

    /// Human-readable group name.
    pub fn name(self) -> &'static str {
        match self {
            Imp::StackManipulation => "stack manipulation",
            Imp::Arithmetic => "arithmetic",
            Imp::HeapAccess => "heap access",
            Imp::FlowControl => "flow control",
            Imp::Io => "i/o",
        }
    }
}

impl fmt::Display for Imp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixes_are_prefix_free() {
        for &a in &ALL_IMPS {
            for &b in &ALL_IMPS {
                if a == b {
                    continue;
                }
                let (pa, pb) = (a.prefix(), b.prefix());
                assert!(!pb.starts_with(pa), "{a} is a prefix of {b}");
            }
        }
    }
}
