//! # EngineOptions
//!
//! The `EngineOptions` struct holds the construction-time parameters of the
//! engine: population and survivor sizes, how the population is split across
//! worker threads, the round budget, the ranking direction and how much the
//! default reporter logs.
//!
//! There are no hidden defaults for the numeric parameters or the direction.
//! Either pass them all to [`EngineOptions::new`] or set them all on the
//! builder; a missing builder field is a configuration error.
//!
//! ## Example
//!
//! ```rust
//! use godsel::evolution::options::{EngineOptions, LogLevel};
//! use godsel::selection::Direction;
//!
//! let options = EngineOptions::builder()
//!     .population_size(200)
//!     .successor_size(20)
//!     .min_thread_workload_size(50)
//!     .max_num_threads(4)
//!     .num_cycles(100)
//!     .direction(Direction::Minimize)
//!     .log_level(LogLevel::Minimal)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(options.get_num_threads(), 4);
//! ```

use crate::error::{GeneticError, Result};
use crate::selection::Direction;

/// How much the default tracing reporter emits per round.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Round statistics, the best individual's description and round-over-round changes.
    Verbose,
    /// Round number, mean, sigma and best score.
    Minimal,
    /// Nothing.
    None,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone)]
pub struct EngineOptions {
    population_size: usize,
    successor_size: usize,
    min_thread_workload_size: usize,
    max_num_threads: usize,
    num_cycles: usize,
    direction: Direction,
    log_level: LogLevel,
}

impl EngineOptions {
    pub fn new(
        population_size: usize,
        successor_size: usize,
        min_thread_workload_size: usize,
        max_num_threads: usize,
        num_cycles: usize,
        direction: Direction,
        log_level: LogLevel,
    ) -> Self {
        Self {
            population_size,
            successor_size,
            min_thread_workload_size,
            max_num_threads,
            num_cycles,
            direction,
            log_level,
        }
    }

    pub fn get_population_size(&self) -> usize {
        self.population_size
    }

    pub fn get_successor_size(&self) -> usize {
        self.successor_size
    }

    pub fn get_min_thread_workload_size(&self) -> usize {
        self.min_thread_workload_size
    }

    pub fn get_max_num_threads(&self) -> usize {
        self.max_num_threads
    }

    pub fn get_num_cycles(&self) -> usize {
        self.num_cycles
    }

    pub fn get_direction(&self) -> Direction {
        self.direction
    }

    pub fn get_log_level(&self) -> LogLevel {
        self.log_level
    }

    /// Number of worker threads per round.
    ///
    /// `population_size / min_thread_workload_size`, capped at
    /// `max_num_threads` and never less than one.
    pub fn get_num_threads(&self) -> usize {
        let by_workload = self
            .population_size
            .checked_div(self.min_thread_workload_size)
            .unwrap_or(0);
        by_workload.min(self.max_num_threads).max(1)
    }

    /// Checks the options for values the engine cannot run with.
    ///
    /// # Errors
    ///
    /// Returns [`GeneticError::Configuration`] naming the first offending parameter.
    pub fn validate(&self) -> Result<()> {
        if self.population_size == 0 {
            return Err(GeneticError::Configuration(
                "Population size cannot be zero".to_string(),
            ));
        }
        if self.successor_size == 0 {
            return Err(GeneticError::Configuration(
                "Successor size cannot be zero".to_string(),
            ));
        }
        if self.successor_size > self.population_size {
            return Err(GeneticError::Configuration(format!(
                "Successor size ({}) cannot exceed population size ({})",
                self.successor_size, self.population_size
            )));
        }
        if self.min_thread_workload_size == 0 {
            return Err(GeneticError::Configuration(
                "Minimum thread workload size cannot be zero".to_string(),
            ));
        }
        if self.max_num_threads == 0 {
            return Err(GeneticError::Configuration(
                "Maximum number of threads cannot be zero".to_string(),
            ));
        }
        if self.num_cycles == 0 {
            return Err(GeneticError::Configuration(
                "Number of cycles cannot be zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Returns a builder for creating an `EngineOptions` instance.
    pub fn builder() -> EngineOptionsBuilder {
        EngineOptionsBuilder::default()
    }
}

/// Builder for `EngineOptions`.
///
/// Every field except the log level must be set before [`build`](Self::build).
#[derive(Debug, Clone, Default)]
pub struct EngineOptionsBuilder {
    population_size: Option<usize>,
    successor_size: Option<usize>,
    min_thread_workload_size: Option<usize>,
    max_num_threads: Option<usize>,
    num_cycles: Option<usize>,
    direction: Option<Direction>,
    log_level: Option<LogLevel>,
}

impl EngineOptionsBuilder {
    pub fn population_size(mut self, value: usize) -> Self {
        self.population_size = Some(value);
        self
    }

    pub fn successor_size(mut self, value: usize) -> Self {
        self.successor_size = Some(value);
        self
    }

    pub fn min_thread_workload_size(mut self, value: usize) -> Self {
        self.min_thread_workload_size = Some(value);
        self
    }

    pub fn max_num_threads(mut self, value: usize) -> Self {
        self.max_num_threads = Some(value);
        self
    }

    pub fn num_cycles(mut self, value: usize) -> Self {
        self.num_cycles = Some(value);
        self
    }

    pub fn direction(mut self, value: Direction) -> Self {
        self.direction = Some(value);
        self
    }

    /// Sets the log level. Defaults to [`LogLevel::None`].
    pub fn log_level(mut self, value: LogLevel) -> Self {
        self.log_level = Some(value);
        self
    }

    /// Builds and validates the options.
    pub fn build(self) -> Result<EngineOptions> {
        fn required<T>(value: Option<T>, name: &str) -> Result<T> {
            value.ok_or_else(|| GeneticError::Configuration(format!("{} not specified", name)))
        }

        let options = EngineOptions {
            population_size: required(self.population_size, "Population size")?,
            successor_size: required(self.successor_size, "Successor size")?,
            min_thread_workload_size: required(
                self.min_thread_workload_size,
                "Minimum thread workload size",
            )?,
            max_num_threads: required(self.max_num_threads, "Maximum number of threads")?,
            num_cycles: required(self.num_cycles, "Number of cycles")?,
            direction: required(self.direction, "Direction")?,
            log_level: self.log_level.unwrap_or(LogLevel::None),
        };
        options.validate()?;
        Ok(options)
    }
}
