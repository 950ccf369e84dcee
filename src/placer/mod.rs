//! Placement construction.
//!
//! A placer proposes capacity-feasible [`Placement`]s from scratch. Both
//! strategies bound their work by [`PlacerConfig::max_attempts`] and return
//! `None` when no feasible placement turned up, which on structurally
//! infeasible instances is the only possible answer.

mod config;
mod greedy;
mod random;

use rand::Rng;

pub use config::{PlacementStrategy, PlacerConfig};
pub use greedy::GreedyPlacer;
pub use random::RandomPlacer;

use crate::solution::Placement;
use crate::topology::Topology;

/// Proposes capacity-feasible placements.
pub trait Placer {
    /// A new placement, or `None` once the attempt bound is exhausted.
    fn next<R: Rng>(&self, rng: &mut R) -> Option<Placement>;
}

/// A placer chosen at run time from a [`PlacementStrategy`].
#[derive(Debug, Clone)]
pub enum AnyPlacer<'a> {
    Random(RandomPlacer<'a>),
    Greedy(GreedyPlacer<'a>),
}

impl<'a> AnyPlacer<'a> {
    pub fn new(strategy: PlacementStrategy, topology: &'a Topology, config: PlacerConfig) -> Self {
        match strategy {
            PlacementStrategy::Random => Self::Random(RandomPlacer::new(topology, config)),
            PlacementStrategy::Greedy => Self::Greedy(GreedyPlacer::new(topology, config)),
        }
    }
}

impl Placer for AnyPlacer<'_> {
    fn next<R: Rng>(&self, rng: &mut R) -> Option<Placement> {
        match self {
            Self::Random(p) => p.next(rng),
            Self::Greedy(p) => p.next(rng),
        }
    }
}
