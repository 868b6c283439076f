//! Store-level error definitions.

use crate::thought::ThoughtId;
use thiserror::Error;

/// Errors surfaced by thought store implementations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    /// The requested thought does not exist in the corpus.
    #[error("thought {0} not found")]
    NotFound(ThoughtId),

    /// A thought with this id already exists.
    #[error("thought {0} already exists")]
    DuplicateId(ThoughtId),

    /// A stage update attempted to lower an already assigned stage.
    #[error("stage of thought {id} cannot decrease from {current} to {requested}")]
    StageRegression {
        id: ThoughtId,
        current: u32,
        requested: u32,
    },
}
