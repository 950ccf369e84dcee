//! Best-of-neighborhood local search.
//!
//! A single-trajectory search that always moves to the best neighbor of
//! the current solution, even when that neighbor is worse, and keeps the
//! best solution seen. Cycling is the problem's concern: a problem keeps
//! its own short-term memory and filters recently produced solutions out
//! of the neighborhoods it returns, updating that memory in
//! [`TabuProblem::update`].
//!
//! # References
//!
//! - Glover, F. (1989). "Tabu Search, Part I", *ORSA Journal on Computing* 1(3), 190-206.

mod runner;
mod types;

pub use runner::{TabuResult, TabuRunner};
pub use types::TabuProblem;
