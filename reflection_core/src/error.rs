//! Engine error taxonomy.

use thiserror::Error;
use thought_store::{StoreError, ThoughtId};

/// Errors surfaced by engine operations.
///
/// All of these are deterministic functions of input and corpus state; none
/// is fatal to the process, and a failed call never corrupts the corpus.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Required text input was empty or whitespace.
    #[error("thought text must not be empty")]
    EmptyText,

    /// Edge creation referenced a thought unknown to the store.
    #[error("unknown thought reference {0}")]
    InvalidReference(ThoughtId),

    /// Store-level failure during an engine operation.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Configuration could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(String),
}
