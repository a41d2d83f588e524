use crate::{
    error::{GeneticError, Result},
    individual::Individual,
};

use super::{
    engine::Engine, evaluator::Evaluator, options::EngineOptions, report::RoundReporter,
    stop::StopCondition,
};

/// Fluent construction of an [`Engine`].
///
/// Options, seeds, evaluator and stop condition are required. The reporter is
/// optional and defaults to a tracing reporter at the options' log level.
///
/// # Example
///
/// ```rust
/// use godsel::error::Result;
/// use godsel::evolution::{EngineBuilder, EngineOptions, LogLevel, NeverStopEarly};
/// use godsel::individual::Individual;
/// use godsel::selection::{Direction, Score};
///
/// struct Counter(u32);
///
/// impl Individual for Counter {
///     fn produce_successor(&self) -> Self {
///         Counter(self.0 + 1)
///     }
///
///     fn describe(&self) -> String {
///         self.0.to_string()
///     }
/// }
///
/// fn main() -> Result<()> {
///     let options = EngineOptions::new(8, 2, 4, 2, 5, Direction::Maximize, LogLevel::None);
///     let evaluator = |c: &Counter| -> Result<Score> { Ok(Score::failed(c.0 as f64)) };
///
///     let engine = EngineBuilder::new()
///         .with_options(options)
///         .with_seeds(vec![Counter(0)])
///         .with_evaluator(evaluator)
///         .with_stop_condition(NeverStopEarly)
///         .build()?;
///
///     let winner = engine.run()?;
///     assert_eq!(winner.rounds, 5);
///     assert_eq!(winner.individual.0, 5);
///     Ok(())
/// }
/// ```
pub struct EngineBuilder<I, E>
where
    I: Individual,
    E: Evaluator<I>,
{
    options: Option<EngineOptions>,
    seeds: Vec<I>,
    evaluator: Option<E>,
    stop_condition: Option<Box<dyn StopCondition>>,
    reporter: Option<Box<dyn RoundReporter>>,
}

impl<I, E> EngineBuilder<I, E>
where
    I: Individual,
    E: Evaluator<I>,
{
    pub fn new() -> Self {
        Self {
            options: None,
            seeds: Vec::new(),
            evaluator: None,
            stop_condition: None,
            reporter: None,
        }
    }

    pub fn with_options(mut self, options: EngineOptions) -> Self {
        self.options = Some(options);
        self
    }

    pub fn with_seeds(mut self, seeds: Vec<I>) -> Self {
        self.seeds = seeds;
        self
    }

    pub fn with_seed(mut self, seed: I) -> Self {
        self.seeds.push(seed);
        self
    }

    pub fn with_evaluator(mut self, evaluator: E) -> Self {
        self.evaluator = Some(evaluator);
        self
    }

    pub fn with_stop_condition<S>(mut self, stop_condition: S) -> Self
    where
        S: StopCondition + 'static,
    {
        self.stop_condition = Some(Box::new(stop_condition));
        self
    }

    pub fn with_reporter<R>(mut self, reporter: R) -> Self
    where
        R: RoundReporter + 'static,
    {
        self.reporter = Some(Box::new(reporter));
        self
    }

    pub fn build(self) -> Result<Engine<I, E>> {
        let options = self
            .options
            .ok_or_else(|| GeneticError::Configuration("Options not specified".to_string()))?;
        let evaluator = self
            .evaluator
            .ok_or_else(|| GeneticError::Configuration("Evaluator not specified".to_string()))?;
        let stop_condition = self.stop_condition.ok_or_else(|| {
            GeneticError::Configuration("Stop condition not specified".to_string())
        })?;

        Engine::new(options, self.seeds, evaluator, stop_condition, self.reporter)
    }
}

impl<I, E> Default for EngineBuilder<I, E>
where
    I: Individual,
    E: Evaluator<I>,
{
    fn default() -> Self {
        Self::new()
    }
}
