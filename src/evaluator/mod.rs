//! Feasibility checks and the power objective.
//!
//! Everything here is a pure function of a [`Topology`] and a candidate
//! [`Solution`]. The boolean checks are what the search uses to filter
//! candidates; [`Evaluator::assert_solution`] is the strict form, naming
//! the first invariant a supposedly valid solution breaks.
//!
//! # Power model
//!
//! Total power is the sum of
//!
//! 1. per component, the processor-proportional share of `pmax - pmin` on
//!    its server;
//! 2. `pmin` of every server hosting at least one component;
//! 3. the static power of every node hosting such a server or lying on a
//!    route;
//! 4. the power of every link crossed by a route.
//!
//! Each server, node and link is charged at most once. Fitness is the
//! negated power, so higher fitness is better.

mod ledger;

pub use ledger::ResourceLedger;

use crate::error::SolutionError;
use crate::solution::{Placement, Routing, Solution};
use crate::topology::Topology;

/// Absolute tolerance for capacity, bandwidth and latency comparisons.
pub const EPSILON: f64 = 1e-9;

/// Scores and validates solutions against one topology.
#[derive(Debug, Clone, Copy)]
pub struct Evaluator<'a> {
    topology: &'a Topology,
}

impl<'a> Evaluator<'a> {
    pub fn new(topology: &'a Topology) -> Self {
        Self { topology }
    }

    pub fn topology(&self) -> &'a Topology {
        self.topology
    }

    /// Whether every server can host the components assigned to it.
    pub fn is_valid_placement(&self, placement: &Placement) -> bool {
        self.check_placement(placement).is_ok()
    }

    /// Latency and bandwidth feasibility of a routed solution.
    pub fn is_valid_solution(&self, solution: &Solution) -> bool {
        self.check_latency(&solution.routing).is_ok()
            && self.check_bandwidth(&solution.routing).is_ok()
    }

    /// Higher is better.
    pub fn fitness(&self, solution: &Solution) -> f64 {
        -self.power(solution)
    }

    /// Total power drawn by `solution`.
    ///
    /// # Panics
    /// Panics if the placement names a server or a route names a node that
    /// does not exist.
    pub fn power(&self, solution: &Solution) -> f64 {
        let network = self.topology.network();
        let mut server_used = vec![false; network.num_servers()];
        let mut node_used = vec![false; network.num_nodes()];
        let mut link_used = vec![false; network.num_links()];

        let mut total = 0.0;
        for (c, &s) in solution.placement.servers().iter().enumerate() {
            let server = network.server(s);
            total += server.marginal_power(self.topology.component(c));
            server_used[s] = true;
            node_used[server.node] = true;
        }

        for route in solution.routing.routes() {
            for &n in route.nodes() {
                node_used[n] = true;
            }
            for (a, b) in route.hops() {
                if let Some(id) = network.link_id_between(a, b) {
                    link_used[id] = true;
                }
            }
        }

        total += network
            .servers()
            .iter()
            .filter(|s| server_used[s.index])
            .map(|s| s.pmin)
            .sum::<f64>();
        total += network
            .nodes()
            .iter()
            .filter(|n| node_used[n.index])
            .map(|n| n.power)
            .sum::<f64>();
        total += network
            .links()
            .iter()
            .filter(|l| link_used[l.index])
            .map(|l| l.power)
            .sum::<f64>();

        total
    }

    /// Strict validation of a solution that is expected to be valid.
    ///
    /// Checks, in order: placement capacity, route structure, chain
    /// latency, link bandwidth.
    pub fn assert_solution(&self, solution: &Solution) -> Result<(), SolutionError> {
        self.check_placement(&solution.placement)?;
        self.check_structure(solution)?;
        self.check_latency(&solution.routing)?;
        self.check_bandwidth(&solution.routing)
    }

    /// Simulates placing every component in order, failing on the first
    /// overdrawn resource.
    pub fn check_placement(&self, placement: &Placement) -> Result<(), SolutionError> {
        let expected = self.topology.num_components();
        if placement.len() != expected {
            return Err(SolutionError::PlacementSize {
                expected,
                found: placement.len(),
            });
        }

        let num_servers = self.topology.network().num_servers();
        let mut ledger = ResourceLedger::new(self.topology);
        for (c, &s) in placement.servers().iter().enumerate() {
            if s >= num_servers {
                return Err(SolutionError::UnknownServer {
                    component: c,
                    server: s,
                });
            }
            ledger.place(s, self.topology.component(c));
            if let Some((resource, remaining)) = ledger.overdrawn(s) {
                return Err(SolutionError::Capacity {
                    server: s,
                    resource,
                    remaining,
                });
            }
        }
        Ok(())
    }

    /// Every demand pair is routed exactly once, between the nodes its
    /// placement implies, over existing links.
    pub fn check_structure(&self, solution: &Solution) -> Result<(), SolutionError> {
        let network = self.topology.network();
        let placement = &solution.placement;

        for &(from, to) in self.topology.demand_pairs() {
            let route = solution
                .routing
                .get(from, to)
                .ok_or(SolutionError::MissingRoute { from, to })?;

            let expected_start = self.topology.server_node(placement.server_of(from));
            let expected_end = self.topology.server_node(placement.server_of(to));
            if route.start() != expected_start || route.end() != expected_end {
                return Err(SolutionError::Endpoints {
                    from,
                    to,
                    expected_start,
                    expected_end,
                    start: route.start(),
                    end: route.end(),
                });
            }

            for (a, b) in route.hops() {
                if network.link_id_between(a, b).is_none() {
                    return Err(SolutionError::MissingLink { from, to, a, b });
                }
            }
        }

        if solution.routing.len() != self.topology.demand_pairs().len() {
            if let Some(extra) = solution
                .routing
                .routes()
                .find(|r| !self.topology.demand_pairs().contains(&(r.from, r.to)))
            {
                return Err(SolutionError::UnexpectedRoute {
                    from: extra.from,
                    to: extra.to,
                });
            }
        }
        Ok(())
    }

    /// Walks every chain, accumulating link delays, and fails as soon as
    /// the running total exceeds the chain's budget.
    pub fn check_latency(&self, routing: &Routing) -> Result<(), SolutionError> {
        let network = self.topology.network();

        for chain in self.topology.chains() {
            let mut delay = 0.0;
            for (from, to) in chain.pairs() {
                let route = routing
                    .get(from, to)
                    .ok_or(SolutionError::MissingRoute { from, to })?;
                for (a, b) in route.hops() {
                    let link = network
                        .link_between(a, b)
                        .ok_or(SolutionError::MissingLink { from, to, a, b })?;
                    delay += link.delay;
                }
                if delay > chain.latency + EPSILON {
                    return Err(SolutionError::Latency {
                        chain: chain.index,
                        delay,
                        budget: chain.latency,
                    });
                }
            }
        }
        Ok(())
    }

    /// Deducts every distinct demand pair's bandwidth from the links on
    /// its route, once per pair however many chains share it.
    pub fn check_bandwidth(&self, routing: &Routing) -> Result<(), SolutionError> {
        let network = self.topology.network();
        let mut residual: Vec<f64> = network.links().iter().map(|l| l.bandwidth).collect();

        for &(from, to) in self.topology.demand_pairs() {
            let route = routing
                .get(from, to)
                .ok_or(SolutionError::MissingRoute { from, to })?;
            let demand = self.topology.demand(from, to);
            for (a, b) in route.hops() {
                let link = network
                    .link_id_between(a, b)
                    .ok_or(SolutionError::MissingLink { from, to, a, b })?;
                residual[link] -= demand;
                if residual[link] < -EPSILON {
                    return Err(SolutionError::Bandwidth {
                        link,
                        remaining: residual[link],
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solution::Route;
    use crate::testing::{
        mesh_solution, mesh_solution_relabelled, mesh_topology, mesh_topology_relabelled,
        shared_pair_topology, two_node_topology,
    };
    use crate::topology::TopologyBuilder;

    fn routed(placement: Vec<usize>, routes: &[(usize, usize, &[usize])]) -> Solution {
        let mut routing = Routing::new();
        for &(from, to, nodes) in routes {
            routing.insert(Route::new(from, to, nodes.to_vec()));
        }
        Solution::new(Placement::new(placement), routing)
    }

    #[test]
    fn test_two_nodes_split_placement_power() {
        let t = two_node_topology(10.0);
        let eval = Evaluator::new(&t);
        let s = routed(vec![0, 1], &[(0, 1, &[0, 1])]);

        assert!(eval.assert_solution(&s).is_ok());
        // pmin 10 + 11, nodes 3 + 4, link 7
        assert!((eval.fitness(&s) + 35.0).abs() < 1e-9);
    }

    #[test]
    fn test_two_nodes_colocated_power() {
        let t = two_node_topology(10.0);
        let eval = Evaluator::new(&t);
        let s = routed(vec![1, 1], &[(0, 1, &[1])]);

        assert!(eval.assert_solution(&s).is_ok());
        // pmin 11, node 4, no link
        assert!((eval.fitness(&s) + 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_processor_overload_rejected() {
        for excess in [1e-3, 0.5, 4.0] {
            let t = TopologyBuilder::new(2)
                .node(1.0)
                .server(0, 1.0, 2.0, vec![10.0, 100.0])
                .component(vec![6.0, 1.0])
                .component(vec![4.0 + excess, 1.0])
                .build()
                .unwrap();
            let eval = Evaluator::new(&t);
            assert!(!eval.is_valid_placement(&Placement::new(vec![0, 0])));
            assert!(matches!(
                eval.check_placement(&Placement::new(vec![0, 0])),
                Err(SolutionError::Capacity {
                    server: 0,
                    resource: 0,
                    ..
                })
            ));
        }
    }

    #[test]
    fn test_exact_capacity_accepted() {
        let t = TopologyBuilder::new(1)
            .node(1.0)
            .server(0, 1.0, 2.0, vec![10.0])
            .component(vec![6.0])
            .component(vec![4.0])
            .build()
            .unwrap();
        assert!(Evaluator::new(&t).is_valid_placement(&Placement::new(vec![0, 0])));
    }

    #[test]
    fn test_placement_shape_errors() {
        let t = two_node_topology(10.0);
        let eval = Evaluator::new(&t);
        assert!(!eval.is_valid_placement(&Placement::new(vec![0])));
        assert_eq!(
            eval.check_placement(&Placement::new(vec![0, 9])),
            Err(SolutionError::UnknownServer {
                component: 1,
                server: 9
            })
        );
    }

    #[test]
    fn test_latency_exceeded_by_epsilon() {
        let t = two_node_topology(1.0 - 1e-6);
        let eval = Evaluator::new(&t);
        let s = routed(vec![0, 1], &[(0, 1, &[0, 1])]);

        assert!(!eval.is_valid_solution(&s));
        assert!(eval.check_bandwidth(&s.routing).is_ok());
        assert!(matches!(
            eval.assert_solution(&s),
            Err(SolutionError::Latency { chain: 0, .. })
        ));
    }

    #[test]
    fn test_latency_accumulates_across_pairs() {
        // each pair fits the budget alone, the chain does not
        let t = TopologyBuilder::new(1)
            .node(1.0)
            .node(1.0)
            .node(1.0)
            .link(0, 1, 10.0, 1.0, 2.0)
            .link(1, 2, 10.0, 1.0, 2.0)
            .server(0, 1.0, 2.0, vec![10.0])
            .server(1, 1.0, 2.0, vec![10.0])
            .server(2, 1.0, 2.0, vec![10.0])
            .component(vec![1.0])
            .component(vec![1.0])
            .component(vec![1.0])
            .chain(vec![0, 1, 2], 3.0)
            .build()
            .unwrap();
        let eval = Evaluator::new(&t);
        let s = routed(vec![0, 1, 2], &[(0, 1, &[0, 1]), (1, 2, &[1, 2])]);
        assert!(!eval.is_valid_solution(&s));
    }

    #[test]
    fn test_shared_pair_bandwidth_counted_once() {
        let t = shared_pair_topology();
        let eval = Evaluator::new(&t);
        // (0, 1) takes the whole 0-1 link; the other pairs stay on node 1
        let s = routed(
            vec![0, 1, 1, 1],
            &[(0, 1, &[0, 1]), (1, 2, &[1]), (1, 3, &[1])],
        );
        assert!(eval.check_bandwidth(&s.routing).is_ok());
        assert!(eval.is_valid_solution(&s));
        assert!(eval.assert_solution(&s).is_ok());
    }

    #[test]
    fn test_bandwidth_overflow_between_pairs() {
        let t = shared_pair_topology();
        let eval = Evaluator::new(&t);
        // (1,2) and (1,3) both cross 1-2: 2 + 2 > 3
        let s = routed(
            vec![1, 1, 2, 3],
            &[(0, 1, &[1]), (1, 2, &[1, 2]), (1, 3, &[1, 2, 3])],
        );
        assert!(matches!(
            eval.check_bandwidth(&s.routing),
            Err(SolutionError::Bandwidth { link: 1, .. })
        ));
        assert!(!eval.is_valid_solution(&s));
    }

    #[test]
    fn test_structural_errors() {
        let t = two_node_topology(10.0);
        let eval = Evaluator::new(&t);

        let missing = routed(vec![0, 1], &[]);
        assert_eq!(
            eval.assert_solution(&missing),
            Err(SolutionError::MissingRoute { from: 0, to: 1 })
        );

        let wrong_end = routed(vec![0, 1], &[(0, 1, &[0])]);
        assert!(matches!(
            eval.assert_solution(&wrong_end),
            Err(SolutionError::Endpoints {
                expected_end: 1,
                end: 0,
                ..
            })
        ));

        let extra = routed(vec![0, 1], &[(0, 1, &[0, 1]), (1, 0, &[1, 0])]);
        assert_eq!(
            eval.assert_solution(&extra),
            Err(SolutionError::UnexpectedRoute { from: 1, to: 0 })
        );
    }

    #[test]
    fn test_unlinked_hop_rejected() {
        let t = shared_pair_topology();
        let eval = Evaluator::new(&t);
        let s = routed(
            vec![0, 2, 2, 2],
            &[(0, 1, &[0, 2]), (1, 2, &[2]), (1, 3, &[2])],
        );
        assert_eq!(
            eval.assert_solution(&s),
            Err(SolutionError::MissingLink {
                from: 0,
                to: 1,
                a: 0,
                b: 2
            })
        );
        assert!(!eval.is_valid_solution(&s));
    }

    #[test]
    fn test_mesh_power() {
        let t = mesh_topology();
        let eval = Evaluator::new(&t);
        let s = mesh_solution();
        assert!(eval.assert_solution(&s).is_ok());
        assert!((eval.power(&s) - 110.4).abs() < 1e-9);
    }

    #[test]
    fn test_fitness_invariant_under_node_relabelling() {
        let base = Evaluator::new(&mesh_topology()).fitness(&mesh_solution());
        for perm in [[5, 4, 3, 2, 1, 0], [2, 0, 1, 5, 3, 4], [1, 2, 3, 4, 5, 0]] {
            let t = mesh_topology_relabelled(&perm);
            let s = mesh_solution_relabelled(&perm);
            let eval = Evaluator::new(&t);
            assert!(eval.assert_solution(&s).is_ok());
            assert!((eval.fitness(&s) - base).abs() < 1e-9);
            // deterministic
            assert_eq!(eval.fitness(&s), eval.fitness(&s));
        }
    }
}
