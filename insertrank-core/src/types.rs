/// An item being ranked: an opaque label. Equality is exact string equality.
pub type Item = String;

/// Which side of a comparison the judge preferred.
///
/// Comparisons are always posed as `(incumbent, candidate)`: the incumbent is
/// the already-ranked item at the search midpoint, the candidate is the item
/// being inserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Side {
    Incumbent,
    Candidate,
}

impl Side {
    /// Resolve a winner given by label into a side.
    ///
    /// Returns `None` when the label matches neither offered item. A label equal
    /// to both (identical items) resolves to the incumbent.
    pub fn from_label(label: &str, incumbent: &str, candidate: &str) -> Option<Side> {
        if label == incumbent {
            Some(Side::Incumbent)
        } else if label == candidate {
            Some(Side::Candidate)
        } else {
            None
        }
    }
}

/// A pending question: which of the two is preferred?
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Comparison {
    /// Already-ranked item at the current search midpoint.
    pub incumbent: Item,
    /// Item currently being inserted.
    pub candidate: Item,
    /// Index of the incumbent in the ranked list.
    pub incumbent_rank: usize,
    /// Index of the candidate in the item source.
    pub candidate_index: usize,
}

/// A completed insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Insertion {
    /// Index of the inserted item in the item source.
    pub candidate_index: usize,
    /// Position the item now holds in the ranked list (0 = most preferred).
    pub position: usize,
    /// Ranked list length after the insertion.
    pub ranked_len: usize,
    /// Human answers spent on this item.
    pub comparisons: usize,
}

/// Summary returned once every item has been ranked.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RankingOutcome {
    /// Final order, most preferred first.
    pub ranked: Vec<Item>,
    /// Ranked list length found in the store at startup (1 after a bootstrap).
    pub resumed_from: usize,
    /// Items inserted during this session.
    pub inserted: usize,
    /// Human answers given during this session.
    pub comparisons: usize,
}
