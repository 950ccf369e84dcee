//! The placement-and-routing problem as a [`TabuProblem`](crate::tabu::TabuProblem).
//!
//! [`RoutingProblem`] starts from a feasible solution and explores
//! placements that differ from the current one on a few components. Every
//! candidate is rerouted from scratch, so each neighbor is a complete
//! feasible solution scored by the evaluator.

mod config;
mod routing_problem;
mod solution;

pub use config::SearchConfig;
pub use routing_problem::RoutingProblem;
pub use solution::RoutingSolution;
