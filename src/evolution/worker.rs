//! Parallel evaluation of one population slice.
//!
//! Each worker scores a contiguous range of the population into a local
//! selector and local statistics, then takes the shared round lock exactly
//! once to merge both. Workers never see each other's individuals.

use std::cmp::Ordering;
use std::ops::Range;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::Mutex;

use tracing::debug;

use super::evaluator::Evaluator;
use crate::{
    error::{GeneticError, Result},
    individual::Individual,
    selection::{BoundedSelector, RankedCandidate, Score},
    stats::RunningStats,
};

/// Splits `[0, population_size)` into `num_threads` contiguous ranges.
///
/// Range `j` starts at `j * population_size / num_threads`; the last range
/// runs to `population_size` so every index is covered exactly once. A
/// thread count of zero is treated as one.
pub fn partition(population_size: usize, num_threads: usize) -> Vec<Range<usize>> {
    let num_threads = num_threads.max(1);
    (0..num_threads)
        .map(|j| {
            let start = j * population_size / num_threads;
            let stop = if j == num_threads - 1 {
                population_size
            } else {
                (j + 1) * population_size / num_threads
            };
            start..stop
        })
        .collect()
}

/// State shared by all workers of a round, guarded by a single mutex.
pub struct RoundState<C>
where
    C: Fn(&RankedCandidate, &RankedCandidate) -> Ordering,
{
    pub selector: BoundedSelector<RankedCandidate, C>,
    pub stats: RunningStats,
}

impl<C> RoundState<C>
where
    C: Fn(&RankedCandidate, &RankedCandidate) -> Ordering,
{
    pub fn new(successor_size: usize, order: C) -> Self {
        Self {
            selector: BoundedSelector::new(successor_size, order),
            stats: RunningStats::new(),
        }
    }

    /// Flushes the selector and empties the statistics.
    pub fn reset(&mut self) {
        self.selector.flush();
        self.stats = RunningStats::new();
    }
}

/// Evaluates the individuals in one index range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Worker {
    range: Range<usize>,
    successor_size: usize,
}

impl Worker {
    pub fn new(range: Range<usize>, successor_size: usize) -> Self {
        Self {
            range,
            successor_size,
        }
    }

    pub fn range(&self) -> &Range<usize> {
        &self.range
    }

    /// Scores `slice`, which must be the population's `self.range()`, and
    /// merges the results into `shared`.
    ///
    /// If `abort` is raised by another worker, this one stops evaluating and
    /// returns without merging. If this worker's evaluation fails, it raises
    /// `abort` and returns the error.
    pub fn run<I, E, C>(
        &self,
        slice: &[I],
        evaluator: &E,
        order: C,
        shared: &Mutex<RoundState<C>>,
        abort: &AtomicBool,
    ) -> Result<()>
    where
        I: Individual,
        E: Evaluator<I>,
        C: Fn(&RankedCandidate, &RankedCandidate) -> Ordering + Copy,
    {
        if slice.len() != self.range.len() {
            return Err(GeneticError::Evolution(format!(
                "Worker for {:?} received a slice of {} individuals",
                self.range,
                slice.len()
            )));
        }

        let mut local = BoundedSelector::new(self.successor_size, order);
        let mut stats = RunningStats::new();

        for (offset, individual) in slice.iter().enumerate() {
            if abort.load(AtomicOrdering::Relaxed) {
                debug!(start = self.range.start, stop = self.range.end, "worker aborted");
                return Ok(());
            }

            let score = match Self::score(evaluator, individual) {
                Ok(score) => score,
                Err(e) => {
                    abort.store(true, AtomicOrdering::Relaxed);
                    return Err(e);
                }
            };

            local.insert(RankedCandidate::new(self.range.start + offset, score));
            stats.push(score.value);
        }

        let mut state = shared
            .lock()
            .map_err(|_| GeneticError::Evolution("Round state lock poisoned".to_string()))?;
        state.stats.merge(&stats);
        for candidate in local.drain_ordered() {
            state.selector.insert(candidate);
        }

        debug!(
            start = self.range.start,
            stop = self.range.end,
            mean = stats.mean(),
            "worker merged"
        );
        Ok(())
    }

    fn score<I, E>(evaluator: &E, individual: &I) -> Result<Score>
    where
        I: Individual,
        E: Evaluator<I>,
    {
        let score = evaluator.evaluate(individual)?;
        if !score.value.is_finite() {
            return Err(GeneticError::Evaluation(format!(
                "Non-finite score value encountered: {}",
                score.value
            )));
        }
        Ok(score)
    }
}
