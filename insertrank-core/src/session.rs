/// Blocking driver: runs an engine to completion against real collaborators.
use crate::engine::{RankingEngine, Step};
use crate::error::{BoxError, RankError};
use crate::gateway::{Comparator, RankedStore, RankingObserver};
use crate::types::RankingOutcome;

/// Run (or resume) a ranking session until every item is placed.
///
/// The store is saved after every insertion, before the next question is
/// asked, and once up front when the engine bootstrapped a fresh list. Any
/// collaborator failure stops the session; everything saved so far stays
/// valid and the next session resumes from it.
pub fn run_ranking<S, C, O>(
    mut engine: RankingEngine,
    store: &mut S,
    comparator: &mut C,
    observer: &mut O,
) -> Result<RankingOutcome, RankError>
where
    S: RankedStore + ?Sized,
    C: Comparator + ?Sized,
    O: RankingObserver + ?Sized,
{
    if engine.bootstrapped() {
        store.save(engine.ranked()).map_err(RankError::store_failure)?;
    }

    loop {
        match engine.advance() {
            Step::Ask(comparison) => {
                observer.on_comparison(&comparison);
                let winner = comparator
                    .ask(&comparison.incumbent, &comparison.candidate)
                    .map_err(comparator_error)?;
                engine.submit(winner)?;
            }
            Step::Inserted(insertion) => {
                store.save(engine.ranked()).map_err(RankError::store_failure)?;
                observer.on_inserted(&insertion, engine.ranked());
            }
            Step::Complete => break,
        }
    }

    observer.on_ranking_complete(engine.ranked());
    Ok(engine.into_outcome())
}

/// Keep engine errors raised inside a comparator (e.g. `ForeignWinner`) as they
/// are instead of wrapping them twice.
fn comparator_error(err: impl Into<BoxError>) -> RankError {
    let boxed: BoxError = err.into();
    match boxed.downcast::<RankError>() {
        Ok(rank) => *rank,
        Err(other) => RankError::Comparator(other),
    }
}
