//! Label resolution: the first pass over a program.
//!
//! The resolver decodes every instruction once, front to back. Decoding
//! validates the whole program's grammar before anything runs, and each
//! label definition records the offset just past its own instruction.
//! Because the table is complete before execution starts, labels may be
//! used before or after they are defined.

use std::collections::HashMap;

use tracing::{debug, info, trace};
use wspace_common::{FormatError, Instruction, Label, Program};

/// Label name → offset of the instruction following its definition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelTable {
    offsets: HashMap<Label, usize>,
}

impl LabelTable {
    /// The jump target for `label`.
    pub fn get(&self, label: &Label) -> Option<usize> {
        self.offsets.get(label).copied()
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// All entries, ordered by offset (definition order).
    pub fn entries(&self) -> Vec<(&Label, usize)> {
        let mut entries: Vec<_> = self.offsets.iter().map(|(l, &o)| (l, o)).collect();
        entries.sort_by_key(|&(_, offset)| offset);
        entries
    }

    fn define(&mut self, label: Label, target: usize, at: usize) -> Result<(), FormatError> {
        if self.offsets.contains_key(&label) {
            return Err(FormatError::DuplicateLabel {
                label: label.to_string(),
                at,
            });
        }
        debug!(label = %label, target, "label defined");
        self.offsets.insert(label, target);
        Ok(())
    }
}

/// Build the label table for `program`.
///
/// # Errors
///
/// Returns the first [`FormatError`]: a decoding failure anywhere in the
/// program, or a label defined twice.
pub fn resolve(program: &Program) -> Result<LabelTable, FormatError> {
    info!(bytes = program.len(), "resolving labels");

    let mut table = LabelTable::default();
    let mut decoder = program.decoder();
    let mut count = 0usize;

    while let Some(item) = decoder.next() {
        let (at, instr) = item?;
        trace!(at, %instr, "scanned");
        count += 1;
        if let Instruction::Mark(label) = instr {
            table.define(label, decoder.position(), at)?;
        }
    }

    info!(instructions = count, labels = table.len(), "labels resolved");
    Ok(table)
}
