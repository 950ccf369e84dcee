//! A solution with its fitness computed once.

use std::hash::{Hash, Hasher};

use crate::evaluator::Evaluator;
use crate::solution::Solution;

/// A feasible [`Solution`] together with its fitness.
///
/// Equality and hashing look at the solution only.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoutingSolution {
    solution: Solution,
    fitness: f64,
}

impl RoutingSolution {
    pub fn new(evaluator: &Evaluator<'_>, solution: Solution) -> Self {
        let fitness = evaluator.fitness(&solution);
        Self { solution, fitness }
    }

    pub fn solution(&self) -> &Solution {
        &self.solution
    }

    pub fn into_solution(self) -> Solution {
        self.solution
    }

    /// Negated total power. Higher is better.
    pub fn fitness(&self) -> f64 {
        self.fitness
    }

    pub fn power(&self) -> f64 {
        -self.fitness
    }

    pub fn is_better_than(&self, other: &Self) -> bool {
        self.fitness > other.fitness
    }
}

impl PartialEq for RoutingSolution {
    fn eq(&self, other: &Self) -> bool {
        self.solution == other.solution
    }
}

impl Eq for RoutingSolution {}

impl Hash for RoutingSolution {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.solution.hash(state);
    }
}
