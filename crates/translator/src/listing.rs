//! Static listing: program source → one line per instruction.
//!
//! Unlike the [`Translator`](crate::Translator) sink, the listing never
//! executes anything. It decodes the program front to back, so every
//! instruction appears exactly once, in source order, with its offset.

use wspace_common::{FormatError, Program};

/// Render `offset: MNEMONIC [operand]` lines for the whole program.
///
/// # Errors
///
/// Returns the first [`FormatError`] the decoder reports.
pub fn listing(program: &Program) -> Result<String, FormatError> {
    let mut text = String::new();
    for item in program.decoder() {
        let (at, instr) = item?;
        text.push_str(&format!("{at}: {instr}\n"));
    }
    Ok(text)
}
