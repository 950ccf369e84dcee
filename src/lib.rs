//! Power-aware placement of virtual network functions and routing of the
//! service chains that connect them.
//!
//! Components are placed on servers subject to per-resource capacities.
//! Traffic between consecutive components of every service chain is routed
//! over the physical network subject to link bandwidth and per-chain
//! latency budgets. The objective is total power: active servers, used
//! nodes and used links.
//!
//! - **Model**: [`topology`] holds the validated instance, built through
//!   [`topology::TopologyBuilder`] or parsed from text by [`instance`].
//! - **Evaluation**: [`evaluator`] checks feasibility and computes power.
//! - **Construction**: [`placer`] proposes capacity-feasible placements and
//!   [`router`] routes them, greedily or with an ant colony.
//! - **Improvement**: [`tabu`] is a generic local-search engine;
//!   [`problem`] plugs placements and routings into it.
//! - **Orchestration**: [`multistart`] runs many independent starts on a
//!   rayon pool and keeps the best result; [`checkpoint`] snapshots it on
//!   a schedule.
//!
//! # Architecture
//!
//! Search-local infeasibility is `None`, never an error. Errors in
//! [`error`] cover malformed instances, invariant violations in supposedly
//! valid solutions, and an orchestrator that cannot start.

pub mod checkpoint;
pub mod error;
pub mod evaluator;
pub mod instance;
pub mod multistart;
pub mod placer;
pub mod problem;
pub mod random;
pub mod router;
pub mod solution;
pub mod tabu;
pub mod topology;

#[cfg(test)]
mod testing;
