//! Error types for the environment adapter.

use alphagen_core::CodecError;
use thiserror::Error;

use crate::env::Phase;

/// Errors that can occur while stepping the environment.
///
/// None of these are retried: each one means the caller or the grammar
/// broke its contract.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EnvError {
    /// The action id does not decode to a token.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// `step()` called before `reset()` or after the episode ended.
    #[error("environment is {0:?}, call reset() first")]
    NotActive(Phase),

    /// The grammar kept the episode open past the buffer capacity.
    #[error("observation buffer full ({0} entries)")]
    CapacityExceeded(usize),
}
