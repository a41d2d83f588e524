//! # RunningStats
//!
//! Single-pass mean and variance over a stream of score values, with a merge
//! that combines two independently accumulated partials into the statistics of
//! their union. Workers accumulate locally and merge once, in whatever order
//! they finish.
//!
//! Updates use Welford's method; merges use the pairwise combination from
//! Chan, Golub and LeVeque (1979).
//!
//! ## Example
//!
//! ```rust
//! use godsel::stats::RunningStats;
//!
//! let mut left = RunningStats::new();
//! let mut right = RunningStats::new();
//! [1.0, 2.0, 3.0].iter().for_each(|&x| left.push(x));
//! [4.0, 5.0].iter().for_each(|&x| right.push(x));
//!
//! left.merge(&right);
//! assert_eq!(left.count(), 5);
//! assert!((left.mean() - 3.0).abs() < 1e-12);
//! assert!((left.population_std_dev() - 2.0_f64.sqrt()).abs() < 1e-12);
//! ```

/// Online accumulator of count, mean and sum of squared deviations.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunningStats {
    count: usize,
    mean: f64,
    sum_squared_deviation: f64,
}

impl RunningStats {
    /// An empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    pub fn sum_squared_deviation(&self) -> f64 {
        self.sum_squared_deviation
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Folds one value into the accumulator.
    pub fn push(&mut self, x: f64) {
        self.count += 1;
        let delta = x - self.mean;
        self.mean += delta / self.count as f64;
        self.sum_squared_deviation += delta * (x - self.mean);
    }

    /// Combines `other` into `self`, yielding the statistics of both samples.
    ///
    /// Merging with an empty accumulator, on either side, is the identity.
    pub fn merge(&mut self, other: &RunningStats) {
        if other.count == 0 {
            return;
        }
        if self.count == 0 {
            *self = *other;
            return;
        }

        let n1 = self.count as f64;
        let n2 = other.count as f64;
        let n = n1 + n2;
        let delta = other.mean - self.mean;

        self.mean = (n1 * self.mean + n2 * other.mean) / n;
        self.sum_squared_deviation += other.sum_squared_deviation + delta * delta * n1 * n2 / n;
        self.count += other.count;
    }

    /// Variance with `count` as the divisor. Zero for an empty accumulator.
    pub fn population_variance(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum_squared_deviation / self.count as f64
        }
    }

    /// `sqrt(sum_squared_deviation / count)`.
    pub fn population_std_dev(&self) -> f64 {
        self.population_variance().sqrt()
    }
}

impl Extend<f64> for RunningStats {
    fn extend<I: IntoIterator<Item = f64>>(&mut self, iter: I) {
        iter.into_iter().for_each(|x| self.push(x));
    }
}

impl FromIterator<f64> for RunningStats {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        let mut stats = RunningStats::new();
        stats.extend(iter);
        stats
    }
}
