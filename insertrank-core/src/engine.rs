/// Ranking engine: resumable binary insertion driven by pairwise answers.
///
/// Pure computation: no IO, no blocking. The caller asks `advance()` what to
/// do next, gets the comparison answered however it likes, and feeds the
/// answer back with `submit()`. The length of the ranked list is the resume
/// cursor: the candidate being inserted is always `items[ranked.len()]`.
use std::collections::HashMap;

use crate::error::RankError;
use crate::gateway::{ItemSource, RankedStore};
use crate::search::{worst_case_comparisons, InsertionSearch};
use crate::types::{Comparison, Insertion, Item, RankingOutcome, Side};

/// What the caller has to do next.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Step {
    /// A judgment is needed. Answer it with `submit` / `submit_label`.
    Ask(Comparison),
    /// An item was inserted. Persist `ranked()` before advancing again.
    Inserted(Insertion),
    /// Every item is ranked.
    Complete,
}

pub struct RankingEngine {
    /// Full item source, read once.
    items: Vec<Item>,
    /// Current best-known order, most preferred first.
    ranked: Vec<Item>,

    /// Search state for `items[ranked.len()]`. `None` once complete.
    search: Option<InsertionSearch>,
    /// Human answers given for the current candidate.
    current_answers: usize,

    resumed_from: usize,
    bootstrapped: bool,
    comparisons: usize,
    inserted: usize,
}

impl RankingEngine {
    /// Build an engine from the item source and whatever the store held.
    ///
    /// `stored` is `None` (or empty) when no store exists yet; the ranked list
    /// then starts as the first source item, with zero comparisons.
    pub fn resume(items: Vec<Item>, stored: Option<Vec<Item>>) -> Result<Self, RankError> {
        if items.is_empty() {
            return Err(RankError::NoItems);
        }

        let (ranked, bootstrapped) = match stored {
            Some(list) if !list.is_empty() => (list, false),
            _ => (vec![items[0].clone()], true),
        };

        if ranked.len() > items.len() {
            return Err(RankError::StoreAheadOfSource {
                ranked: ranked.len(),
                total: items.len(),
            });
        }

        let resumed_from = ranked.len();
        let mut engine = RankingEngine {
            items,
            ranked,
            search: None,
            current_answers: 0,
            resumed_from,
            bootstrapped,
            comparisons: 0,
            inserted: 0,
        };
        engine.begin_next_candidate();
        Ok(engine)
    }

    /// Read the item source once and the store once, then resume.
    ///
    /// The store is only loaded when it reports that it exists. A load failure
    /// is fatal: nothing is ever written over a store that could not be read.
    pub fn open<I, S>(source: &I, store: &S) -> Result<Self, RankError>
    where
        I: ItemSource + ?Sized,
        S: RankedStore + ?Sized,
    {
        let items = source.load_items().map_err(RankError::source_failure)?;
        if items.is_empty() {
            return Err(RankError::NoItems);
        }
        let stored = if store.exists() {
            Some(store.load().map_err(RankError::store_failure)?)
        } else {
            None
        };
        Self::resume(items, stored)
    }

    fn begin_next_candidate(&mut self) {
        self.current_answers = 0;
        self.search = if self.ranked.len() < self.items.len() {
            Some(InsertionSearch::new(self.ranked.len()))
        } else {
            None
        };
        self.settle_identical();
    }

    /// Answer, as incumbent-preferred, every midpoint whose item has the
    /// candidate's label. Afterwards the pending question (if any) compares two
    /// different labels.
    fn settle_identical(&mut self) {
        let Some(search) = self.search.as_mut() else {
            return;
        };
        let candidate = &self.items[self.ranked.len()];
        while let Some(mid) = search.probe() {
            if self.ranked[mid] != *candidate {
                break;
            }
            search.record(Side::Incumbent);
        }
    }

    /// Work out the next step.
    ///
    /// Probes where the incumbent has the same label as the candidate are
    /// settled without asking: the incumbent is treated as preferred, so equal
    /// labels stay adjacent in source order. Calling `advance` again while a
    /// question is pending returns the same question.
    pub fn advance(&mut self) -> Step {
        let cursor = self.ranked.len();
        let Some(search) = self.search.as_ref() else {
            return Step::Complete;
        };
        let candidate = &self.items[cursor];

        if let Some(mid) = search.probe() {
            return Step::Ask(Comparison {
                incumbent: self.ranked[mid].clone(),
                candidate: candidate.clone(),
                incumbent_rank: mid,
                candidate_index: cursor,
            });
        }

        let position = search.position().unwrap_or(self.ranked.len());
        self.ranked.insert(position, candidate.clone());
        self.inserted += 1;

        let insertion = Insertion {
            candidate_index: cursor,
            position,
            ranked_len: self.ranked.len(),
            comparisons: self.current_answers,
        };
        self.begin_next_candidate();
        Step::Inserted(insertion)
    }

    /// Record the answer to the pending comparison.
    pub fn submit(&mut self, winner: Side) -> Result<(), RankError> {
        let search = self.search.as_mut().ok_or(RankError::NoPendingComparison)?;
        if !search.record(winner) {
            return Err(RankError::NoPendingComparison);
        }
        self.current_answers += 1;
        self.comparisons += 1;
        self.settle_identical();
        Ok(())
    }

    /// Record an answer given as the winning item's label.
    ///
    /// A label that is neither of the two offered items is a contract
    /// violation by the comparator and is reported as `ForeignWinner`.
    pub fn submit_label(&mut self, winner: &str) -> Result<Side, RankError> {
        let pending = self.pending().ok_or(RankError::NoPendingComparison)?;
        let side = Side::from_label(winner, &pending.incumbent, &pending.candidate)
            .ok_or_else(|| RankError::ForeignWinner {
                winner: winner.to_string(),
                incumbent: pending.incumbent.clone(),
                candidate: pending.candidate.clone(),
            })?;
        self.submit(side)?;
        Ok(side)
    }

    /// The comparison currently awaiting an answer, without advancing. Never
    /// pairs an item with an identical label.
    pub fn pending(&self) -> Option<Comparison> {
        let search = self.search.as_ref()?;
        let mid = search.probe()?;
        let cursor = self.ranked.len();
        Some(Comparison {
            incumbent: self.ranked[mid].clone(),
            candidate: self.items[cursor].clone(),
            incumbent_rank: mid,
            candidate_index: cursor,
        })
    }

    pub fn ranked(&self) -> &[Item] {
        &self.ranked
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn total_items(&self) -> usize {
        self.items.len()
    }

    /// Ranked list length at startup.
    pub fn resumed_from(&self) -> usize {
        self.resumed_from
    }

    /// True when the ranked list was created from the first source item
    /// rather than loaded. The caller should persist it right away.
    pub fn bootstrapped(&self) -> bool {
        self.bootstrapped
    }

    pub fn is_complete(&self) -> bool {
        self.search.is_none()
    }

    /// Human answers recorded this session.
    pub fn comparisons(&self) -> usize {
        self.comparisons
    }

    /// Worst-case answers still needed, including the item in progress.
    pub fn remaining_comparisons_upper_bound(&self) -> usize {
        remaining_comparisons_upper_bound(self.ranked.len(), self.items.len())
    }

    /// Ranked labels that do not appear in the source prefix they should come
    /// from. Non-empty means the input changed since the store was written.
    pub fn unexpected_ranked_items(&self) -> Vec<&str> {
        let mut expected: HashMap<&str, usize> = HashMap::new();
        for item in &self.items[..self.ranked.len()] {
            *expected.entry(item.as_str()).or_insert(0) += 1;
        }

        let mut unexpected = Vec::new();
        for item in &self.ranked {
            match expected.get_mut(item.as_str()) {
                Some(count) if *count > 0 => *count -= 1,
                _ => unexpected.push(item.as_str()),
            }
        }
        unexpected
    }

    pub fn into_outcome(self) -> RankingOutcome {
        RankingOutcome {
            ranked: self.ranked,
            resumed_from: self.resumed_from,
            inserted: self.inserted,
            comparisons: self.comparisons,
        }
    }
}

/// Worst-case answers needed to grow a ranked list from `ranked_len` to
/// `total_len` items.
pub fn remaining_comparisons_upper_bound(ranked_len: usize, total_len: usize) -> usize {
    (ranked_len..total_len).map(worst_case_comparisons).sum()
}
