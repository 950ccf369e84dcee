//! Cheapest-first placer.
//!
//! Components are visited in a fresh random order. Each one goes to a
//! server sampled from the cheapest few that can still host it, the
//! cheapest being the most likely. The randomness keeps repeated calls
//! from producing the same start.

use rand::seq::SliceRandom;
use rand::Rng;

use super::config::PlacerConfig;
use super::Placer;
use crate::evaluator::ResourceLedger;
use crate::solution::Placement;
use crate::topology::Topology;

/// Cumulative probability of picking rank 0, 1 and 2 among the sorted
/// candidates; rank 3 takes the rest.
const RANK_THRESHOLDS: [f64; 3] = [0.5, 0.8, 0.95];

/// Places each component on a low-cost server.
///
/// The cost of a candidate server is the power switching it on would add:
/// its node's static power if that node hosts nothing yet, its `pmin` if
/// the server is idle, and the component's processor-proportional share.
#[derive(Debug, Clone)]
pub struct GreedyPlacer<'a> {
    topology: &'a Topology,
    config: PlacerConfig,
}

impl<'a> GreedyPlacer<'a> {
    pub fn new(topology: &'a Topology, config: PlacerConfig) -> Self {
        Self { topology, config }
    }

    fn attempt<R: Rng>(&self, rng: &mut R) -> Option<Placement> {
        let network = self.topology.network();
        let mut ledger = ResourceLedger::new(self.topology);
        let mut node_used = vec![false; network.num_nodes()];
        let mut servers = vec![0; self.topology.num_components()];

        let mut order: Vec<usize> = (0..self.topology.num_components()).collect();
        order.shuffle(rng);

        for c in order {
            let component = self.topology.component(c);
            let mut candidates: Vec<(f64, usize)> = network
                .servers()
                .iter()
                .filter(|s| ledger.fits(s.index, component))
                .map(|s| {
                    let mut cost = s.marginal_power(component);
                    if ledger.is_idle(s.index) {
                        cost += s.pmin;
                    }
                    if !node_used[s.node] {
                        cost += network.node(s.node).power;
                    }
                    (cost, s.index)
                })
                .collect();
            if candidates.is_empty() {
                return None;
            }
            candidates.sort_by(|a, b| a.0.total_cmp(&b.0));

            let (_, server) = candidates[pick_rank(candidates.len(), rng)];
            ledger.place(server, component);
            node_used[network.server(server).node] = true;
            servers[c] = server;
        }

        Some(Placement::new(servers))
    }
}

impl Placer for GreedyPlacer<'_> {
    fn next<R: Rng>(&self, rng: &mut R) -> Option<Placement> {
        (0..self.config.max_attempts).find_map(|_| self.attempt(rng))
    }
}

/// Samples a rank in `0..count` (`count >= 1`), weighted 0.5 / 0.3 / 0.15
/// / 0.05 and clamped to the last candidate.
fn pick_rank<R: Rng>(count: usize, rng: &mut R) -> usize {
    let r: f64 = rng.random();
    let rank = RANK_THRESHOLDS
        .iter()
        .position(|&t| r < t)
        .unwrap_or(RANK_THRESHOLDS.len());
    rank.min(count - 1)
}
