/// insertrank-core: resumable binary-insertion ranking.
///
/// Items are inserted one at a time into a growing ranked list, each by binary
/// search with a human (or any other judge) answering "which of these two?".
/// The ranked list is saved after every insertion and its length is the resume
/// cursor, so a session can stop at any point and pick up where it left off.
///
/// No IO here: storage, item loading and the judge are traits the caller
/// implements.
///
/// # Quick start
///
/// ```rust
/// use insertrank_core::{run_ranking, LabelComparator, MemoryStore, RankingEngine};
///
/// let items: Vec<String> = ["pear", "apple", "fig"].iter().map(|s| s.to_string()).collect();
/// let mut store = MemoryStore::new();
///
/// // A judge that prefers the alphabetically earlier item.
/// let mut judge = LabelComparator(|a: &str, b: &str| a.min(b).to_string());
///
/// let engine = RankingEngine::open(&items, &store).unwrap();
/// let outcome = run_ranking(engine, &mut store, &mut judge, &mut ()).unwrap();
///
/// assert_eq!(outcome.ranked, vec!["apple", "fig", "pear"]);
/// ```

pub mod engine;
pub mod error;
pub mod gateway;
pub mod search;
pub mod session;
pub mod types;

// Re-export primary public API at crate root.
pub use engine::{remaining_comparisons_upper_bound, RankingEngine, Step};
pub use error::{BoxError, RankError};
pub use gateway::{Comparator, ItemSource, LabelComparator, MemoryStore, RankedStore, RankingObserver};
pub use search::{worst_case_comparisons, InsertionSearch};
pub use session::run_ranking;
pub use types::{Comparison, Insertion, Item, RankingOutcome, Side};
