//! # Round reports
//!
//! After each round the engine builds a [`RoundReport`] and hands it to the
//! configured [`RoundReporter`]. Reporting is observational: nothing a
//! reporter does affects the run.
//!
//! Relative figures are signed so that a positive number always means
//! "better" under the configured [`Direction`]. Figures that would divide by
//! zero, and the round-over-round changes of the first round, are `None`.

use tracing::info;

use super::options::LogLevel;
use crate::{
    selection::{Direction, Score},
    stats::RunningStats,
};

/// Summary of one completed round.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct RoundReport {
    /// 1-based round number.
    pub round: usize,
    pub num_cycles: usize,
    pub population_size: usize,
    pub mean: f64,
    /// `sqrt(sum_squared_deviation / population_size)`.
    pub sigma: f64,
    pub best: Score,
    pub best_description: String,
    /// How far the best value is ahead of the mean, in percent of the mean.
    pub percent_better_than_mean: Option<f64>,
    /// How far the best value is ahead of the mean, in standard deviations.
    pub sigmas_better_than_mean: Option<f64>,
    /// Improvement of the mean over the previous round, in percent.
    pub mean_change_percent: Option<f64>,
    /// Improvement of the best value over the previous round, in percent.
    pub best_change_percent: Option<f64>,
}

impl RoundReport {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        round: usize,
        num_cycles: usize,
        population_size: usize,
        direction: Direction,
        stats: &RunningStats,
        best: Score,
        best_description: String,
        previous: Option<&RoundReport>,
    ) -> Self {
        let mean = stats.mean();
        let sigma = if population_size == 0 {
            0.0
        } else {
            (stats.sum_squared_deviation() / population_size as f64).sqrt()
        };
        let lead = direction.improvement(best.value, mean);

        Self {
            round,
            num_cycles,
            population_size,
            mean,
            sigma,
            best,
            best_description,
            percent_better_than_mean: percent_of(lead, mean),
            sigmas_better_than_mean: (sigma > 0.0).then(|| lead / sigma),
            mean_change_percent: previous
                .and_then(|p| percent_of(direction.improvement(mean, p.mean), p.mean)),
            best_change_percent: previous.and_then(|p| {
                percent_of(direction.improvement(best.value, p.best.value), p.best.value)
            }),
        }
    }
}

fn percent_of(delta: f64, base: f64) -> Option<f64> {
    if base == 0.0 || !base.is_finite() {
        return None;
    }
    Some(delta / base.abs() * 100.0)
}

/// Receives one report per round, on the orchestrating thread.
pub trait RoundReporter: Send {
    fn report(&mut self, report: &RoundReport);
}

impl<F> RoundReporter for F
where
    F: FnMut(&RoundReport) + Send,
{
    fn report(&mut self, report: &RoundReport) {
        self(report)
    }
}

/// Emits round reports as `tracing` events at `INFO` level.
#[derive(Debug, Clone)]
pub struct TracingReporter {
    level: LogLevel,
}

impl TracingReporter {
    pub fn new(level: LogLevel) -> Self {
        Self { level }
    }
}

impl RoundReporter for TracingReporter {
    fn report(&mut self, report: &RoundReport) {
        match self.level {
            LogLevel::None => {}
            LogLevel::Minimal => info!(
                round = report.round,
                num_cycles = report.num_cycles,
                mean = report.mean,
                sigma = report.sigma,
                best_success = report.best.success,
                best_score = report.best.value,
                "round complete"
            ),
            LogLevel::Verbose => info!(
                round = report.round,
                num_cycles = report.num_cycles,
                population_size = report.population_size,
                mean = report.mean,
                sigma = report.sigma,
                best_success = report.best.success,
                best_score = report.best.value,
                best = %report.best_description,
                percent_better_than_mean = ?report.percent_better_than_mean,
                sigmas_better_than_mean = ?report.sigmas_better_than_mean,
                mean_change_percent = ?report.mean_change_percent,
                best_change_percent = ?report.best_change_percent,
                "round complete"
            ),
        }
    }
}
