use crate::{error::Result, individual::Individual, selection::Score};

/// Computes the fitness of individuals.
///
/// Workers call [`evaluate`](Evaluator::evaluate) concurrently from several
/// threads, each on its own slice of the population, hence the `Sync` bound.
/// A returned error aborts the round.
pub trait Evaluator<I: Individual>: Sync {
    fn evaluate(&self, individual: &I) -> Result<Score>;

    /// Evaluates `individual` and persists a representation of it to the sink
    /// named by `destination`.
    ///
    /// The engine calls this once per round for the round's best individual,
    /// with a destination derived from the round number. Persisting must not
    /// change the score. The default implementation persists nothing.
    fn evaluate_to(&self, individual: &I, destination: &str) -> Result<Score> {
        let _ = destination;
        self.evaluate(individual)
    }
}

impl<I, F> Evaluator<I> for F
where
    I: Individual,
    F: Fn(&I) -> Result<Score> + Sync,
{
    fn evaluate(&self, individual: &I) -> Result<Score> {
        self(individual)
    }
}
