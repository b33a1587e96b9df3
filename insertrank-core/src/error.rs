use std::error::Error as StdError;

use thiserror::Error;

/// Boxed failure raised by a collaborator (store, source, comparator).
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Error type for ranking sessions.
#[derive(Debug, Error)]
pub enum RankError {
    #[error("item source is empty; nothing to rank")]
    NoItems,
    #[error("ranked store holds {ranked} items but the item source only has {total}")]
    StoreAheadOfSource { ranked: usize, total: usize },
    #[error("comparator returned '{winner}', which is neither '{incumbent}' nor '{candidate}'")]
    ForeignWinner {
        winner: String,
        incumbent: String,
        candidate: String,
    },
    #[error("no comparison is pending")]
    NoPendingComparison,
    #[error("failed to load items: {0}")]
    Source(#[source] BoxError),
    #[error("ranked store failure: {0}")]
    Store(#[source] BoxError),
    #[error("comparator failure: {0}")]
    Comparator(#[source] BoxError),
}

impl RankError {
    pub fn source_failure(err: impl Into<BoxError>) -> Self {
        RankError::Source(err.into())
    }

    pub fn store_failure(err: impl Into<BoxError>) -> Self {
        RankError::Store(err.into())
    }

    pub fn comparator_failure(err: impl Into<BoxError>) -> Self {
        RankError::Comparator(err.into())
    }
}
