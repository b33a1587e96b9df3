/// Collaborator contracts: where items come from, where the ranking is kept,
/// who answers the questions, and who hears about progress.
use std::convert::Infallible;

use crate::error::{BoxError, RankError};
use crate::types::{Comparison, Insertion, Item, Side};

/// Supplies the ordered items to rank. Read once per session.
pub trait ItemSource {
    type Error: Into<BoxError>;

    fn load_items(&self) -> Result<Vec<Item>, Self::Error>;
}

impl ItemSource for [Item] {
    type Error = Infallible;

    fn load_items(&self) -> Result<Vec<Item>, Infallible> {
        Ok(self.to_vec())
    }
}

impl ItemSource for Vec<Item> {
    type Error = Infallible;

    fn load_items(&self) -> Result<Vec<Item>, Infallible> {
        Ok(self.clone())
    }
}

/// Durable home of the ranked list.
///
/// `save` is a full overwrite and is called after every insertion.
pub trait RankedStore {
    type Error: Into<BoxError>;

    fn exists(&self) -> bool;

    /// Only called when `exists()` is true. A store that exists but cannot be
    /// parsed must fail here rather than return an empty list.
    fn load(&self) -> Result<Vec<Item>, Self::Error>;

    fn save(&mut self, ranked: &[Item]) -> Result<(), Self::Error>;
}

/// Answers one pairwise question. Blocks until the judge has decided.
pub trait Comparator {
    type Error: Into<BoxError>;

    fn ask(&mut self, incumbent: &str, candidate: &str) -> Result<Side, Self::Error>;
}

/// Comparator for judges that answer with the winning label.
///
/// A label other than the two offered items is a `RankError::ForeignWinner`.
pub struct LabelComparator<F>(pub F);

impl<F> Comparator for LabelComparator<F>
where
    F: FnMut(&str, &str) -> Item,
{
    type Error = RankError;

    fn ask(&mut self, incumbent: &str, candidate: &str) -> Result<Side, RankError> {
        let winner = (self.0)(incumbent, candidate);
        Side::from_label(&winner, incumbent, candidate).ok_or_else(|| RankError::ForeignWinner {
            winner,
            incumbent: incumbent.to_string(),
            candidate: candidate.to_string(),
        })
    }
}

/// Progress notifications from `run_ranking`. Every method defaults to a no-op.
pub trait RankingObserver {
    /// A question is about to be asked.
    fn on_comparison(&mut self, _comparison: &Comparison) {}

    /// An item was inserted and the store was saved.
    fn on_inserted(&mut self, _insertion: &Insertion, _ranked: &[Item]) {}

    /// Fired exactly once, after the last insertion has been persisted.
    fn on_ranking_complete(&mut self, _ranked: &[Item]) {}
}

impl RankingObserver for () {}

/// In-memory store. Keeps every saved snapshot for inspection.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    current: Option<Vec<Item>>,
    history: Vec<Vec<Item>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds `ranked`, as if from an earlier session.
    pub fn with_ranked(ranked: Vec<Item>) -> Self {
        MemoryStore {
            current: Some(ranked),
            history: Vec::new(),
        }
    }

    pub fn current(&self) -> Option<&[Item]> {
        self.current.as_deref()
    }

    /// Every list passed to `save`, oldest first.
    pub fn history(&self) -> &[Vec<Item>] {
        &self.history
    }
}

impl RankedStore for MemoryStore {
    type Error = Infallible;

    fn exists(&self) -> bool {
        self.current.is_some()
    }

    fn load(&self) -> Result<Vec<Item>, Infallible> {
        Ok(self.current.clone().unwrap_or_default())
    }

    fn save(&mut self, ranked: &[Item]) -> Result<(), Infallible> {
        self.current = Some(ranked.to_vec());
        self.history.push(ranked.to_vec());
        Ok(())
    }
}
