//! Immutable problem model.
//!
//! A [`Topology`] aggregates the physical [`Network`], the components to
//! place, the service chains and the bandwidth demand table. It is built
//! once through [`TopologyBuilder`], which validates every index and value,
//! and is then shared read-only by every search worker.

mod builder;
mod network;
mod vnf;

use std::collections::HashMap;

pub use builder::TopologyBuilder;
pub use network::{Hop, Link, Network, Node, Server};
pub use vnf::{Component, ServiceChain};

/// The complete, validated problem instance.
#[derive(Debug, Clone)]
pub struct Topology {
    network: Network,
    components: Vec<Component>,
    chains: Vec<ServiceChain>,
    demands: HashMap<(usize, usize), f64>,
    demand_pairs: Vec<(usize, usize)>,
    pair_budgets: HashMap<(usize, usize), f64>,
    num_resources: usize,
}

impl Topology {
    pub fn network(&self) -> &Network {
        &self.network
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn component(&self, index: usize) -> &Component {
        &self.components[index]
    }

    pub fn chains(&self) -> &[ServiceChain] {
        &self.chains
    }

    pub fn num_components(&self) -> usize {
        self.components.len()
    }

    pub fn num_resources(&self) -> usize {
        self.num_resources
    }

    /// Bandwidth demanded from `from` to `to`; zero when absent.
    pub fn demand(&self, from: usize, to: usize) -> f64 {
        self.demands.get(&(from, to)).copied().unwrap_or(0.0)
    }

    /// Distinct consecutive component pairs over all chains, first-seen order.
    pub fn demand_pairs(&self) -> &[(usize, usize)] {
        &self.demand_pairs
    }

    /// Tightest latency budget among the chains containing `(from, to)`.
    ///
    /// Infinite for pairs that no chain contains.
    pub fn pair_delay_budget(&self, from: usize, to: usize) -> f64 {
        self.pair_budgets
            .get(&(from, to))
            .copied()
            .unwrap_or(f64::INFINITY)
    }

    /// Node hosting server `server`.
    pub fn server_node(&self, server: usize) -> usize {
        self.network.server(server).node
    }
}

#[cfg(test)]
mod tests {
    use crate::testing::{line_topology, shared_pair_topology};

    #[test]
    fn test_demand_absent_is_zero() {
        let t = line_topology(3, 10.0, 100.0);
        assert_eq!(t.demand(1, 0), 0.0);
        assert!(t.demand(0, 1) > 0.0);
    }

    #[test]
    fn test_demand_pairs_deduplicated() {
        let t = shared_pair_topology();
        // chains [0,1,2] and [0,1,3] share (0,1)
        assert_eq!(t.demand_pairs(), &[(0, 1), (1, 2), (1, 3)]);
    }

    #[test]
    fn test_pair_budget_takes_tightest_chain() {
        let t = shared_pair_topology();
        assert_eq!(t.pair_delay_budget(0, 1), 5.0);
        assert_eq!(t.pair_delay_budget(1, 3), 5.0);
        assert_eq!(t.pair_delay_budget(1, 2), 8.0);
        assert!(t.pair_delay_budget(3, 0).is_infinite());
    }

    #[test]
    fn test_links_usable_both_directions() {
        let t = line_topology(3, 10.0, 100.0);
        let net = t.network();
        assert_eq!(net.link_id_between(0, 1), net.link_id_between(1, 0));
        assert!(net.link_between(0, 2).is_none());
        assert_eq!(net.hops(1).len(), 2);
    }
}
