use std::sync::Mutex;

use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::{debug, debug_span};

use super::{
    evaluator::Evaluator,
    generation::{
        evaluate_population, lock_exclusive, rank_survivors, reproduce, seed_population,
        take_winner,
    },
    options::EngineOptions,
    report::{RoundReport, RoundReporter, TracingReporter},
    stop::StopCondition,
    worker::{partition, RoundState, Worker},
};
use crate::{
    error::{GeneticError, OptionExt, Result},
    individual::Individual,
    selection::Score,
};

/// The winner of a run: the owned individual, its score and how many rounds ran.
#[derive(Debug, Clone, PartialEq)]
pub struct EvolutionResult<I> {
    pub individual: I,
    pub score: Score,
    pub rounds: usize,
}

/// Runs the generational loop: evaluate, rank, report, stop or reproduce.
///
/// Evaluation is spread over a dedicated thread pool; everything else runs
/// on the thread that calls [`run`](Engine::run).
pub struct Engine<I, E>
where
    I: Individual,
    E: Evaluator<I>,
{
    options: EngineOptions,
    seeds: Vec<I>,
    evaluator: E,
    stop_condition: Box<dyn StopCondition>,
    reporter: Box<dyn RoundReporter>,
    workers: Vec<Worker>,
    pool: ThreadPool,
}

impl<I, E> Engine<I, E>
where
    I: Individual,
    E: Evaluator<I>,
{
    /// Creates an engine, validating the configuration and building the worker pool.
    ///
    /// If `reporter` is `None`, rounds are reported through a
    /// [`TracingReporter`] at the options' log level.
    ///
    /// # Errors
    ///
    /// Returns [`GeneticError::Configuration`] for invalid options or an empty
    /// seed list, and [`GeneticError::ThreadPool`] if the pool cannot be built.
    pub fn new(
        options: EngineOptions,
        seeds: Vec<I>,
        evaluator: E,
        stop_condition: Box<dyn StopCondition>,
        reporter: Option<Box<dyn RoundReporter>>,
    ) -> Result<Self> {
        options.validate()?;
        if seeds.is_empty() {
            return Err(GeneticError::Configuration(
                "Seed list cannot be empty".to_string(),
            ));
        }

        let num_threads = options.get_num_threads();
        debug!(
            population_size = options.get_population_size(),
            min_thread_workload_size = options.get_min_thread_workload_size(),
            max_num_threads = options.get_max_num_threads(),
            num_threads,
            "building worker pool"
        );
        let workers = partition(options.get_population_size(), num_threads)
            .into_iter()
            .map(|range| Worker::new(range, options.get_successor_size()))
            .collect();
        let pool = ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .thread_name(|i| format!("godsel-worker-{}", i))
            .build()
            .map_err(|e| GeneticError::ThreadPool(e.to_string()))?;
        let reporter = reporter
            .unwrap_or_else(|| Box::new(TracingReporter::new(options.get_log_level())));

        Ok(Self {
            options,
            seeds,
            evaluator,
            stop_condition,
            reporter,
            workers,
            pool,
        })
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    pub fn num_threads(&self) -> usize {
        self.workers.len()
    }

    /// Runs rounds until the stop condition holds or the round budget is
    /// spent, and returns the best individual of the final round.
    ///
    /// Every other individual created during the run has been dropped by the
    /// time this returns.
    ///
    /// # Errors
    ///
    /// Any evaluation error aborts the run and is returned as is.
    pub fn run(self) -> Result<EvolutionResult<I>> {
        let Engine {
            options,
            seeds,
            evaluator,
            mut stop_condition,
            mut reporter,
            workers,
            pool,
        } = self;

        let direction = options.get_direction();
        let num_cycles = options.get_num_cycles();
        let successor_size = options.get_successor_size();
        let order = direction.candidate_order();
        let mut shared = Mutex::new(RoundState::new(successor_size, order));

        let mut population = seed_population(seeds, options.get_population_size())?;
        let mut previous: Option<RoundReport> = None;
        let mut round = 1;

        loop {
            let span = debug_span!("round", round, num_cycles);
            let _enter = span.enter();

            evaluate_population(&pool, &workers, &mut population, &evaluator, order, &mut shared)?;

            let state = lock_exclusive(&mut shared)?;
            let survivors = rank_survivors(state, successor_size)?;
            let best = *survivors
                .first()
                .ok_or_else_genetic(|| GeneticError::EmptyPopulation)?;
            let champion = &population[best.index];

            let report = RoundReport::new(
                round,
                num_cycles,
                population.len(),
                direction,
                &state.stats,
                best.score,
                champion.describe(),
                previous.as_ref(),
            );
            reporter.report(&report);
            evaluator.evaluate_to(champion, &format!("{}.log", round))?;

            if stop_condition.should_stop(&survivors, round) || round >= num_cycles {
                debug!(round, best_score = best.score.value, "run finished");
                return Ok(EvolutionResult {
                    individual: take_winner(population, best.index)?,
                    score: best.score,
                    rounds: round,
                });
            }

            population = reproduce(population, &survivors)?;
            previous = Some(report);
            round += 1;
        }
    }
}
