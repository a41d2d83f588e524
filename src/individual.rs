//! # Individual Trait
//!
//! The `Individual` trait defines the capability set the engine needs from a
//! candidate solution: producing a successor and describing itself. How the
//! solution is encoded, and how a successor differs from its parent, is up to
//! the implementor.
//!
//! ## Example
//!
//! ```rust
//! use godsel::individual::Individual;
//! use rand::Rng;
//!
//! #[derive(Debug)]
//! struct Point {
//!     x: f64,
//! }
//!
//! impl Individual for Point {
//!     fn produce_successor(&self) -> Self {
//!         Point {
//!             x: self.x + rand::thread_rng().gen_range(-1.0..1.0),
//!         }
//!     }
//!
//!     fn describe(&self) -> String {
//!         format!("x = {:.4}", self.x)
//!     }
//! }
//!
//! let parent = Point { x: 0.0 };
//! let child = parent.produce_successor();
//! assert!(child.x.abs() < 1.0);
//! ```
//!
//! ## Ownership
//!
//! Every individual lives in exactly one population slot. The engine never
//! clones individuals: the elite of a round is moved into the next population,
//! every other slot is filled by `produce_successor`, and the previous
//! generation is dropped once the new one is complete.

/// A candidate solution managed by the engine.
///
/// Implementors must be `Send` because disjoint slices of the population are
/// handed to worker threads for evaluation. They do not need to be `Sync`:
/// no individual is ever visible to two workers at once.
pub trait Individual: Send {
    /// Returns a new, independently owned individual derived from this one.
    ///
    /// Must not alter `self`. Whether the successor is a mutated copy, a
    /// fresh random sample, or something else is the implementor's choice.
    fn produce_successor(&self) -> Self
    where
        Self: Sized;

    /// Returns a human-readable summary, used in round reports.
    fn describe(&self) -> String;
}
