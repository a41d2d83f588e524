//! # Error Types
//!
//! This module defines the error type shared by every part of the engine.
//! Configuration problems are caught when the engine is built, evaluation
//! failures abort the round they occur in, and selector underflow signals a
//! broken internal invariant.
//!
//! ## Examples
//!
//! Using the `Result` type:
//!
//! ```rust
//! use godsel::error::{GeneticError, Result};
//!
//! fn check_sizes(population: usize, successors: usize) -> Result<()> {
//!     if successors > population {
//!         return Err(GeneticError::Configuration(
//!             "successor size exceeds population size".to_string(),
//!         ));
//!     }
//!     Ok(())
//! }
//!
//! assert!(check_sizes(10, 2).is_ok());
//! assert!(check_sizes(2, 10).is_err());
//! ```
//!
//! Using the `ResultExt` trait to add context to errors:
//!
//! ```rust
//! use godsel::error::{Result, ResultExt};
//!
//! fn parse_round(text: &str) -> Result<usize> {
//!     text.parse::<usize>().context("Invalid round number")
//! }
//!
//! assert!(parse_round("12").is_ok());
//! assert!(parse_round("twelve").is_err());
//! ```
//!
//! Using the `OptionExt` trait to convert `Option` to `Result`:
//!
//! ```rust
//! use godsel::error::{GeneticError, OptionExt};
//!
//! fn first_seed(seeds: &[u32]) -> godsel::error::Result<u32> {
//!     seeds.first().copied().ok_or_else_genetic(|| GeneticError::EmptyPopulation)
//! }
//! ```

use std::error::Error as StdError;
use std::fmt;
use thiserror::Error;

/// Represents errors that can occur while running the engine.
#[derive(Error, Debug)]
pub enum GeneticError {
    /// Error that occurs when an invalid configuration is provided.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Error signaled by the fitness evaluator, or a score it produced that cannot be ranked.
    #[error("Evaluation error: {0}")]
    Evaluation(String),

    /// A pop was attempted on an empty bounded selector.
    #[error("Selector underflow: cannot pop from an empty selector")]
    SelectorUnderflow,

    /// Error that occurs when an empty population is encountered.
    #[error("Empty population error: Cannot operate on an empty population")]
    EmptyPopulation,

    /// Error that occurs when the round loop reaches an inconsistent state.
    #[error("Evolution error: {0}")]
    Evolution(String),

    /// The worker thread pool could not be created.
    #[error("Thread pool error: {0}")]
    ThreadPool(String),

    /// Error that occurs when an I/O operation fails.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A generic error with a custom message.
    #[error("{0}")]
    Other(String),
}

/// A specialized Result type for engine operations.
///
/// This type is a convenience wrapper around `std::result::Result` with the error type
/// fixed to `GeneticError`.
pub type Result<T> = std::result::Result<T, GeneticError>;

/// Extension trait for Result to add context to errors.
///
/// This trait provides a convenient way to add context to errors when
/// converting from one error type to `GeneticError`.
pub trait ResultExt<T, E> {
    /// Adds context to an error.
    ///
    /// This method converts the error to a `GeneticError` with the provided context.
    fn context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static;
}

impl<T, E> ResultExt<T, E> for std::result::Result<T, E>
where
    E: StdError + Send + Sync + 'static,
{
    fn context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static,
    {
        self.map_err(|e| GeneticError::Other(format!("{}: {}", context, e)))
    }
}

/// Extension trait for Option to convert to Result with a custom error.
pub trait OptionExt<T> {
    /// Converts an Option to a Result using a closure to generate the error.
    fn ok_or_else_genetic<F>(self, err_fn: F) -> Result<T>
    where
        F: FnOnce() -> GeneticError;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_else_genetic<F>(self, err_fn: F) -> Result<T>
    where
        F: FnOnce() -> GeneticError,
    {
        self.ok_or_else(err_fn)
    }
}
