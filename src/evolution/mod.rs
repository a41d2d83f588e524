pub mod builder;
pub mod engine;
pub mod evaluator;
pub mod generation;
pub mod options;
pub mod report;
pub mod stop;
pub mod worker;

pub use builder::EngineBuilder;
pub use engine::{Engine, EvolutionResult};
pub use evaluator::Evaluator;
pub use options::{EngineOptions, EngineOptionsBuilder, LogLevel};
pub use report::{RoundReport, RoundReporter, TracingReporter};
pub use stop::{NeverStopEarly, StopAtFirstSuccess, StopCondition};
pub use worker::{partition, RoundState, Worker};
