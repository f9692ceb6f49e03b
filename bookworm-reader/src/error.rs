//! Reasons the reducer rejects an action

use bookworm::DecodeError;
use thiserror::Error;

/// A rejected transition. The store keeps its previous snapshot.
///
/// Nothing is published for a rejection, so flags set by earlier actions
/// stay as they were: `Loading` followed by a rejected `FetchMockData`
/// leaves `is_loading` set until a valid payload is dispatched.
#[derive(Debug, Error)]
pub enum ReduceError {
    /// Payload JSON did not match the model
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// Selection index outside the collection
    #[error("{collection} index {index} out of range (len {len})")]
    Index {
        collection: &'static str,
        index: usize,
        len: usize,
    },

    /// Chapter selection needs a current book
    #[error("no book selected")]
    NoBookSelected,
}
