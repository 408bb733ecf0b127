//! Run configuration.

/// Options for one interpretation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Start in interactive stepping mode at offset 0.
    pub debug: bool,
    /// Offsets at which stepping activates.
    pub breakpoints: Vec<usize>,
    /// Stop with an error after this many executed instructions.
    pub max_steps: Option<u64>,
}

impl RunOptions {
    /// Options that start stepping at the first instruction.
    pub fn debug() -> Self {
        Self {
            debug: true,
            ..Self::default()
        }
    }

    pub fn with_breakpoint(mut self, offset: usize) -> Self {
        self.breakpoints.push(offset);
        self
    }

    pub fn with_max_steps(mut self, limit: u64) -> Self {
        self.max_steps = Some(limit);
        self
    }
}
