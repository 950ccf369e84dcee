//! Routing of demand pairs over the network.
//!
//! Given a placement, a router finds one path per demand pair. Pairs are
//! routed one after another in a random order against a per-call
//! [`RoutingState`]: nodes and links used by earlier pairs are free for
//! later ones, and bandwidth is deducted cumulatively. Each pair's path
//! must fit the tightest latency budget among the chains containing it,
//! and the finished routing must pass the chain latency check.
//!
//! Routing failure is `None`, never an error.

mod ant_colony;
mod greedy;
mod state;

use rand::Rng;

pub use ant_colony::{AntColonyConfig, AntColonyRouter, Pheromones, MIN_HEURISTIC_POWER};
pub use greedy::GreedyRouter;
pub use state::{shuffled_jobs, DemandJob, Path, RoutingState};

use crate::solution::{Placement, Routing};
use crate::topology::Topology;

/// Finds a routing for a placement.
pub trait Router {
    /// A routing covering every demand pair, or `None` if some pair could
    /// not be routed within its constraints.
    fn find_routing<R: Rng>(&self, placement: &Placement, rng: &mut R) -> Option<Routing>;
}

/// Which routing strategy a search start uses.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RoutingStrategy {
    Greedy { lookahead: bool },
    AntColony(AntColonyConfig),
}

impl Default for RoutingStrategy {
    fn default() -> Self {
        Self::Greedy { lookahead: false }
    }
}

impl RoutingStrategy {
    pub fn validate(&self) -> Result<(), String> {
        match self {
            Self::Greedy { .. } => Ok(()),
            Self::AntColony(config) => config.validate(),
        }
    }
}

/// A router chosen at run time from a [`RoutingStrategy`].
#[derive(Debug, Clone)]
pub enum AnyRouter<'a> {
    Greedy(GreedyRouter<'a>),
    AntColony(AntColonyRouter<'a>),
}

impl<'a> AnyRouter<'a> {
    pub fn new(strategy: &RoutingStrategy, topology: &'a Topology) -> Self {
        match strategy {
            RoutingStrategy::Greedy { lookahead } => {
                Self::Greedy(GreedyRouter::new(topology, *lookahead))
            }
            RoutingStrategy::AntColony(config) => {
                Self::AntColony(AntColonyRouter::new(topology, config.clone()))
            }
        }
    }
}

impl Router for AnyRouter<'_> {
    fn find_routing<R: Rng>(&self, placement: &Placement, rng: &mut R) -> Option<Routing> {
        match self {
            Self::Greedy(r) => r.find_routing(placement, rng),
            Self::AntColony(r) => r.find_routing(placement, rng),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::Evaluator;
    use crate::random::create_rng;
    use crate::solution::Solution;
    use crate::testing::shared_pair_topology;

    #[test]
    fn test_every_strategy_routes_shared_pairs() {
        let t = shared_pair_topology();
        let eval = Evaluator::new(&t);
        let placement = Placement::new(vec![0, 1, 1, 1]);
        let strategies = [
            RoutingStrategy::Greedy { lookahead: false },
            RoutingStrategy::Greedy { lookahead: true },
            RoutingStrategy::AntColony(AntColonyConfig::default().with_generations(10)),
        ];
        for strategy in &strategies {
            let router = AnyRouter::new(strategy, &t);
            let routing = router.find_routing(&placement, &mut create_rng(2)).unwrap();
            assert_eq!(routing.len(), t.demand_pairs().len());
            let s = Solution::new(placement.clone(), routing);
            assert!(eval.assert_solution(&s).is_ok(), "{strategy:?}");
        }
    }

    #[test]
    fn test_strategy_validation() {
        assert!(RoutingStrategy::default().validate().is_ok());
        let bad = RoutingStrategy::AntColony(AntColonyConfig::default().with_generations(0));
        assert!(bad.validate().is_err());
    }
}
