//! Local-search execution engine.
//!
//! # Algorithm
//!
//! 1. `current = best = initial()`
//! 2. At each iteration:
//!    a. Generate the neighborhood of `current`
//!    b. Move to the neighbor no other neighbor beats (first on ties), or
//!       stay put if the neighborhood is empty
//!    c. Promote `current` to `best` if strictly better
//!    d. Let the problem update its memory
//! 3. Repeat until the problem says stop (checked after each iteration)

use rand::Rng;
use tracing::trace;

use super::types::TabuProblem;

/// Result of a local-search run.
#[derive(Debug, Clone)]
pub struct TabuResult<S: Clone> {
    /// Best solution found.
    pub best: S,
    /// Total iterations executed.
    pub iterations: usize,
    /// Iteration (1-based) at which `best` was found; 0 if the initial
    /// solution was never beaten.
    pub best_iteration: usize,
    /// Iterations whose neighborhood came back empty.
    pub empty_neighborhoods: usize,
}

/// Local-search runner.
pub struct TabuRunner;

impl TabuRunner {
    /// Executes the search on `problem`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rand::Rng;
    /// use vnf_placer::random::create_rng;
    /// use vnf_placer::tabu::{TabuProblem, TabuRunner};
    ///
    /// struct Countdown { left: usize }
    ///
    /// impl TabuProblem for Countdown {
    ///     type Solution = i32;
    ///     fn initial(&mut self) -> i32 { 0 }
    ///     fn is_better(&self, a: &i32, b: &i32) -> bool { a > b }
    ///     fn neighborhood<R: Rng>(&mut self, x: &i32, _rng: &mut R) -> Vec<i32> { vec![x + 1] }
    ///     fn stop(&self, _best: &i32) -> bool { self.left == 0 }
    ///     fn update(&mut self, _current: &i32, _best: &i32) { self.left -= 1; }
    /// }
    ///
    /// let result = TabuRunner::run(&mut Countdown { left: 3 }, &mut create_rng(0));
    /// assert_eq!(result.best, 3);
    /// assert_eq!(result.iterations, 3);
    /// ```
    pub fn run<P: TabuProblem, R: Rng>(problem: &mut P, rng: &mut R) -> TabuResult<P::Solution> {
        let mut current = problem.initial();
        let mut best = current.clone();
        let mut iterations = 0;
        let mut best_iteration = 0;
        let mut empty_neighborhoods = 0;

        loop {
            iterations += 1;

            let neighbors = problem.neighborhood(&current, rng);
            let mut chosen = None;
            for n in neighbors {
                if chosen.as_ref().map_or(true, |c| problem.is_better(&n, c)) {
                    chosen = Some(n);
                }
            }

            match chosen {
                Some(next) => current = next,
                None => empty_neighborhoods += 1,
            }

            if problem.is_better(&current, &best) {
                best = current.clone();
                best_iteration = iterations;
                trace!(iteration = iterations, "new local best");
            }

            problem.update(&current, &best);
            if problem.stop(&best) {
                break;
            }
        }

        TabuResult {
            best,
            iterations,
            best_iteration,
            empty_neighborhoods,
        }
    }
}
