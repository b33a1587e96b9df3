/// Binary search state for inserting one candidate into a ranked list.
///
/// Lives for one candidate and is never persisted. An interrupted search is
/// started over from the saved ranked list.
use crate::types::Side;

/// Search bounds for a single insertion.
///
/// `high` is exclusive, so the inclusive upper bound of the textbook loop is
/// `high - 1` and the loop condition `low <= high_inclusive` becomes
/// `low < high` without any signed arithmetic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertionSearch {
    low: usize,
    high: usize,
    position: Option<usize>,
    probes: usize,
}

impl InsertionSearch {
    pub fn new(ranked_len: usize) -> Self {
        InsertionSearch {
            low: 0,
            high: ranked_len,
            position: None,
            probes: 0,
        }
    }

    /// Index of the ranked item to compare against next, or `None` once the
    /// bounds have crossed and the position is settled.
    pub fn probe(&self) -> Option<usize> {
        if self.low < self.high {
            // floor((low + high_inclusive) / 2)
            Some(self.low + (self.high - 1 - self.low) / 2)
        } else {
            None
        }
    }

    /// Apply one answer for the current probe. Returns `false` if the search
    /// had already finished and the answer was ignored.
    pub fn record(&mut self, winner: Side) -> bool {
        let Some(mid) = self.probe() else {
            return false;
        };

        match winner {
            Side::Incumbent => {
                self.low = mid + 1;
                self.position = Some(self.low);
            }
            Side::Candidate => {
                self.high = mid;
                self.position = Some(mid);
            }
        }
        self.probes += 1;
        true
    }

    pub fn is_finished(&self) -> bool {
        self.probe().is_none()
    }

    /// Final insertion index. `None` while answers are still needed.
    ///
    /// The last assignment always coincides with `low`; an empty ranked list
    /// never assigns and inserts at 0.
    pub fn position(&self) -> Option<usize> {
        if !self.is_finished() {
            return None;
        }
        debug_assert!(self.position.map_or(true, |p| p == self.low));
        Some(self.position.unwrap_or(self.low))
    }

    /// Answers recorded so far.
    pub fn probes(&self) -> usize {
        self.probes
    }
}

/// Upper bound on answers needed to insert one item into a list of `ranked_len`
/// items: `ceil(log2(ranked_len + 1))`.
pub fn worst_case_comparisons(ranked_len: usize) -> usize {
    (usize::BITS - ranked_len.leading_zeros()) as usize
}
