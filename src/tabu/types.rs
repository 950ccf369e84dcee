//! Core trait for local-search problems.

use rand::Rng;

/// A problem the [`TabuRunner`](super::TabuRunner) can search.
///
/// Methods take `&mut self` where a problem typically keeps state across
/// iterations: the iteration counter, the rolling memory of recent
/// solutions.
pub trait TabuProblem {
    /// The solution type.
    type Solution: Clone;

    /// The starting solution.
    fn initial(&mut self) -> Self::Solution;

    /// Whether `a` is strictly better than `b`.
    fn is_better(&self, a: &Self::Solution, b: &Self::Solution) -> bool;

    /// Candidate successors of `current`. May be empty.
    fn neighborhood<R: Rng>(
        &mut self,
        current: &Self::Solution,
        rng: &mut R,
    ) -> Vec<Self::Solution>;

    /// Whether to stop after the iteration that produced `best`.
    fn stop(&self, best: &Self::Solution) -> bool;

    /// Called once at the end of every iteration.
    fn update(&mut self, current: &Self::Solution, best: &Self::Solution);
}
