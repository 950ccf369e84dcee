//! Concurrent multi-start search.
//!
//! Runs many independent construct-then-improve pipelines on a rayon pool
//! and reduces their results through a shared [`BestSolution`].

mod best;
mod config;
mod runner;

pub use best::BestSolution;
pub use config::MultiStartConfig;
pub use runner::{MultiStartResult, MultiStartRunner};
