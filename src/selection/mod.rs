//! Ranking of scored candidates: the score ordering and the bounded top-K selector.
pub mod bounded;
pub mod score;

pub use bounded::BoundedSelector;
pub use score::{Direction, RankedCandidate, Score};
