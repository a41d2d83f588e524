use crate::selection::RankedCandidate;

/// Decides, after each round has been reported, whether the run ends early.
///
/// `survivors` are the round's ranked survivors, most preferred first, and
/// `round` is the 1-based round number. The round budget applies regardless
/// of what the condition returns.
pub trait StopCondition: Send {
    fn should_stop(&mut self, survivors: &[RankedCandidate], round: usize) -> bool;
}

impl<F> StopCondition for F
where
    F: FnMut(&[RankedCandidate], usize) -> bool + Send,
{
    fn should_stop(&mut self, survivors: &[RankedCandidate], round: usize) -> bool {
        self(survivors, round)
    }
}

/// Stops as soon as any survivor has a successful score.
#[derive(Debug, Clone, Copy, Default)]
pub struct StopAtFirstSuccess;

impl StopCondition for StopAtFirstSuccess {
    fn should_stop(&mut self, survivors: &[RankedCandidate], _round: usize) -> bool {
        survivors.iter().any(|candidate| candidate.score.success)
    }
}

/// Never stops early; the run always uses its whole round budget.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverStopEarly;

impl StopCondition for NeverStopEarly {
    fn should_stop(&mut self, _survivors: &[RankedCandidate], _round: usize) -> bool {
        false
    }
}
