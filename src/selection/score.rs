use std::cmp::Ordering;

/// The outcome of evaluating one individual.
///
/// `success` takes precedence over `value`: any successful score outranks any
/// failed one, whatever the numbers say.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Score {
    pub success: bool,
    pub value: f64,
}

impl Score {
    pub fn new(success: bool, value: f64) -> Self {
        Self { success, value }
    }

    /// A score that did not reach the goal.
    pub fn failed(value: f64) -> Self {
        Self::new(false, value)
    }

    /// A score that reached the goal.
    pub fn succeeded(value: f64) -> Self {
        Self::new(true, value)
    }
}

/// Which end of the value range is preferred.
///
/// The same direction is used for every selector the engine builds and for
/// picking the final winner.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Smaller values rank first.
    Minimize,
    /// Larger values rank first.
    Maximize,
}

impl Direction {
    /// Three-way ranking of two scores.
    ///
    /// `Less` means `a` ranks before (is preferred over) `b`, `Greater` means
    /// it ranks after, `Equal` is a tie.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::cmp::Ordering;
    /// use godsel::selection::{Direction, Score};
    ///
    /// let low = Score::failed(1.0);
    /// let high = Score::failed(5.0);
    /// assert_eq!(Direction::Minimize.compare(&low, &high), Ordering::Less);
    /// assert_eq!(Direction::Maximize.compare(&low, &high), Ordering::Greater);
    ///
    /// // Success beats any value.
    /// let solved = Score::succeeded(100.0);
    /// assert_eq!(Direction::Minimize.compare(&solved, &low), Ordering::Less);
    /// ```
    pub fn compare(&self, a: &Score, b: &Score) -> Ordering {
        match (a.success, b.success) {
            (true, false) => return Ordering::Less,
            (false, true) => return Ordering::Greater,
            _ => {}
        }

        let cmp = a.value.partial_cmp(&b.value).unwrap_or_else(|| {
            // NaN ranks after everything else.
            if a.value.is_nan() && !b.value.is_nan() {
                Ordering::Greater
            } else if b.value.is_nan() && !a.value.is_nan() {
                Ordering::Less
            } else {
                Ordering::Equal
            }
        });

        match self {
            Direction::Minimize => cmp,
            Direction::Maximize if a.value.is_nan() || b.value.is_nan() => cmp,
            Direction::Maximize => cmp.reverse(),
        }
    }

    /// Comparator over ranked candidates, for building a [`BoundedSelector`](super::BoundedSelector).
    pub fn candidate_order(
        self,
    ) -> impl Fn(&RankedCandidate, &RankedCandidate) -> Ordering + Copy + Send + Sync {
        move |a: &RankedCandidate, b: &RankedCandidate| self.compare(&a.score, &b.score)
    }

    /// How much better `candidate` is than `reference`; positive means better.
    pub fn improvement(&self, candidate: f64, reference: f64) -> f64 {
        match self {
            Direction::Minimize => reference - candidate,
            Direction::Maximize => candidate - reference,
        }
    }
}

/// A scored reference to one population slot.
///
/// The candidate does not own the individual; `index` points back into the
/// population the score was produced from and is only meaningful for that
/// round.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedCandidate {
    pub index: usize,
    pub score: Score,
}

impl RankedCandidate {
    pub fn new(index: usize, score: Score) -> Self {
        Self { index, score }
    }
}
