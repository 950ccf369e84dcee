//! Rejection-sampling placer.

use rand::Rng;

use super::config::PlacerConfig;
use super::Placer;
use crate::evaluator::Evaluator;
use crate::solution::Placement;
use crate::topology::Topology;

/// Draws a uniformly random server for every component and rejects the
/// whole assignment until it fits.
#[derive(Debug, Clone)]
pub struct RandomPlacer<'a> {
    topology: &'a Topology,
    config: PlacerConfig,
}

impl<'a> RandomPlacer<'a> {
    pub fn new(topology: &'a Topology, config: PlacerConfig) -> Self {
        Self { topology, config }
    }
}

impl Placer for RandomPlacer<'_> {
    fn next<R: Rng>(&self, rng: &mut R) -> Option<Placement> {
        let evaluator = Evaluator::new(self.topology);
        let num_servers = self.topology.network().num_servers();
        let num_components = self.topology.num_components();

        for _ in 0..self.config.max_attempts {
            let servers = (0..num_components)
                .map(|_| rng.random_range(0..num_servers))
                .collect();
            let placement = Placement::new(servers);
            if evaluator.is_valid_placement(&placement) {
                return Some(placement);
            }
        }
        None
    }
}
