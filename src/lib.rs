pub mod error;
pub mod evolution;
pub mod individual;
pub mod selection;
pub mod stats;

// Re-export commonly used types for convenience
pub use error::{GeneticError, OptionExt, Result, ResultExt};
pub use evolution::{
    Engine, EngineBuilder, EngineOptions, Evaluator, EvolutionResult, LogLevel, NeverStopEarly,
    RoundReport, RoundReporter, StopAtFirstSuccess, StopCondition,
};
pub use individual::Individual;
pub use selection::{BoundedSelector, Direction, RankedCandidate, Score};
pub use stats::RunningStats;
