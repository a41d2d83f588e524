//! The per-round steps of the engine: seeding, parallel evaluation, ranking
//! and reproduction.
//!
//! Each step takes the population by value or by exclusive reference, so the
//! ownership of every individual is explicit at each state transition. The
//! engine composes these steps; they are public so a caller can drive rounds
//! one step at a time.

use std::cmp::Ordering;
use std::sync::atomic::AtomicBool;
use std::sync::Mutex;

use rayon::ThreadPool;
use tracing::debug;

use super::{
    evaluator::Evaluator,
    worker::{RoundState, Worker},
};
use crate::{
    error::{GeneticError, Result},
    individual::Individual,
    selection::RankedCandidate,
};

/// Fills a population of `population_size` by asking the seeds for successors
/// in round-robin order. The seeds are consumed.
///
/// # Errors
///
/// Returns [`GeneticError::Configuration`] if `seeds` is empty.
pub fn seed_population<I: Individual>(seeds: Vec<I>, population_size: usize) -> Result<Vec<I>> {
    if seeds.is_empty() {
        return Err(GeneticError::Configuration(
            "Seed list cannot be empty".to_string(),
        ));
    }

    let population = (0..population_size)
        .map(|j| seeds[j % seeds.len()].produce_successor())
        .collect();
    drop(seeds);
    Ok(population)
}

/// Runs every worker over its slice of `population` on `pool` and waits for
/// all of them.
///
/// The shared round state is reset first. On return it holds the merged
/// selector and statistics of the whole population.
///
/// # Errors
///
/// Returns the first worker error, in worker order, if any evaluation failed.
pub fn evaluate_population<I, E, C>(
    pool: &ThreadPool,
    workers: &[Worker],
    population: &mut [I],
    evaluator: &E,
    order: C,
    shared: &mut Mutex<RoundState<C>>,
) -> Result<()>
where
    I: Individual,
    E: Evaluator<I>,
    C: Fn(&RankedCandidate, &RankedCandidate) -> Ordering + Copy + Send + Sync,
{
    lock_exclusive(shared)?.reset();

    let slices = split_for_workers(population, workers)?;
    let mut outcomes: Vec<Result<()>> = workers.iter().map(|_| Ok(())).collect();
    let abort_flag = AtomicBool::new(false);
    let abort = &abort_flag;
    let shared: &Mutex<RoundState<C>> = shared;
    let jobs: Vec<_> = workers
        .iter()
        .zip(slices)
        .zip(outcomes.iter_mut())
        .collect();

    debug!(workers = workers.len(), "evaluating population");
    pool.scope(|scope| {
        for ((worker, slice), outcome) in jobs {
            scope.spawn(move |_| {
                *outcome = worker.run(slice, evaluator, order, shared, abort);
            });
        }
    });

    outcomes.into_iter().collect()
}

/// Pops exactly `successor_size` candidates, most preferred first.
///
/// # Errors
///
/// Returns [`GeneticError::SelectorUnderflow`] if fewer candidates were retained.
pub fn rank_survivors<C>(
    state: &mut RoundState<C>,
    successor_size: usize,
) -> Result<Vec<RankedCandidate>>
where
    C: Fn(&RankedCandidate, &RankedCandidate) -> Ordering,
{
    (0..successor_size).map(|_| state.selector.pop()).collect()
}

/// Builds the next generation from `population` and its ranked `survivors`.
///
/// Slot 0 receives the elite (`survivors[0]`) itself, moved rather than
/// cloned. Slot `j` receives a successor of `survivors[j % survivors.len()]`.
/// The rest of the old population is dropped only after the new one is
/// complete.
///
/// # Errors
///
/// Returns [`GeneticError::EmptyPopulation`] if there are no survivors, or
/// [`GeneticError::Evolution`] if a survivor index is out of range.
pub fn reproduce<I: Individual>(
    mut population: Vec<I>,
    survivors: &[RankedCandidate],
) -> Result<Vec<I>> {
    let elite = survivors
        .first()
        .ok_or(GeneticError::EmptyPopulation)?
        .index;
    let size = population.len();
    if let Some(stray) = survivors.iter().find(|s| s.index >= size) {
        return Err(GeneticError::Evolution(format!(
            "Survivor index {} outside population of {}",
            stray.index, size
        )));
    }

    let mut next = Vec::with_capacity(size);
    let offspring: Vec<I> = (1..size)
        .map(|j| population[survivors[j % survivors.len()].index].produce_successor())
        .collect();

    next.push(population.swap_remove(elite));
    next.extend(offspring);
    drop(population);
    Ok(next)
}

/// Takes the individual at `index` out of `population`, dropping the rest.
pub fn take_winner<I: Individual>(mut population: Vec<I>, index: usize) -> Result<I> {
    if index >= population.len() {
        return Err(GeneticError::Evolution(format!(
            "Winner index {} outside population of {}",
            index,
            population.len()
        )));
    }
    Ok(population.swap_remove(index))
}

/// Exclusive access to the round state outside of a round.
pub fn lock_exclusive<C>(shared: &mut Mutex<RoundState<C>>) -> Result<&mut RoundState<C>>
where
    C: Fn(&RankedCandidate, &RankedCandidate) -> Ordering,
{
    shared
        .get_mut()
        .map_err(|_| GeneticError::Evolution("Round state lock poisoned".to_string()))
}

fn split_for_workers<'a, I>(
    population: &'a mut [I],
    workers: &[Worker],
) -> Result<Vec<&'a mut [I]>> {
    let covered: usize = workers.iter().map(|w| w.range().len()).sum();
    if covered != population.len() {
        return Err(GeneticError::Evolution(format!(
            "Workers cover {} individuals, population has {}",
            covered,
            population.len()
        )));
    }

    let mut rest = population;
    let mut slices = Vec::with_capacity(workers.len());
    for worker in workers {
        let (head, tail) = std::mem::take(&mut rest).split_at_mut(worker.range().len());
        slices.push(head);
        rest = tail;
    }
    Ok(slices)
}
