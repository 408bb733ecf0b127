//! Errors that stop an interpretation run.
//!
//! Format errors come from decoding and label resolution. Runtime errors
//! come from the command sink or from the call stack and carry the offset
//! of the instruction that failed. Reaching the program's end instruction
//! is not an error; see [`Completion`](crate::Completion).

use thiserror::Error;
use wspace_common::{FormatError, RuntimeError};

/// A fatal interpretation error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InterpretError {
    /// Malformed program, duplicate label, or jump to an undefined label.
    #[error(transparent)]
    Format(#[from] FormatError),

    /// An instruction that could not be carried out.
    #[error("{source} at offset {at}")]
    Runtime {
        at: usize,
        #[source]
        source: RuntimeError,
    },

    /// More instructions executed than the configured limit allows.
    #[error("step limit of {limit} instructions exceeded")]
    StepLimitExceeded { limit: u64 },
}

impl InterpretError {
    /// Attach an offset to a runtime error.
    pub(crate) fn runtime(at: usize) -> impl Fn(RuntimeError) -> Self + Copy {
        move |source| InterpretError::Runtime { at, source }
    }

    /// Attach an offset to a console failure.
    pub(crate) fn io(at: usize) -> impl Fn(std::io::Error) -> Self + Copy {
        move |err| InterpretError::Runtime {
            at,
            source: err.into(),
        }
    }
}
