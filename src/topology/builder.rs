//! Validating construction of a [`Topology`].

use std::collections::{HashMap, HashSet};

use super::network::{Link, Network, Node, Server};
use super::vnf::{Component, ServiceChain};
use super::Topology;
use crate::error::ConfigError;

/// Collects raw instance data and validates it into a [`Topology`].
///
/// Nodes, servers, components and chains are indexed in insertion order.
///
/// # Examples
///
/// ```
/// use vnf_placer::topology::TopologyBuilder;
///
/// let topology = TopologyBuilder::new(1)
///     .node(5.0)
///     .node(5.0)
///     .link(0, 1, 100.0, 2.0, 1.0)
///     .server(0, 10.0, 50.0, vec![8.0])
///     .server(1, 10.0, 50.0, vec![8.0])
///     .component(vec![2.0])
///     .component(vec![3.0])
///     .chain(vec![0, 1], 10.0)
///     .demand(0, 1, 4.0)
///     .build()
///     .unwrap();
/// assert_eq!(topology.demand_pairs(), &[(0, 1)]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct TopologyBuilder {
    num_resources: usize,
    nodes: Vec<f64>,
    links: Vec<(usize, usize, f64, f64, f64)>,
    servers: Vec<(usize, f64, f64, Vec<f64>)>,
    components: Vec<Vec<f64>>,
    chains: Vec<(Vec<usize>, f64)>,
    demands: Vec<(usize, usize, f64)>,
}

impl TopologyBuilder {
    /// Starts a builder whose servers and components carry `num_resources`
    /// resource kinds (index 0 is the processor).
    pub fn new(num_resources: usize) -> Self {
        Self {
            num_resources,
            ..Self::default()
        }
    }

    /// Adds a node with the given static power.
    pub fn node(mut self, power: f64) -> Self {
        self.nodes.push(power);
        self
    }

    /// Adds a bidirectional link.
    pub fn link(mut self, from: usize, to: usize, bandwidth: f64, power: f64, delay: f64) -> Self {
        self.links.push((from, to, bandwidth, power, delay));
        self
    }

    /// Adds a server attached to `node`.
    pub fn server(mut self, node: usize, pmin: f64, pmax: f64, resources: Vec<f64>) -> Self {
        self.servers.push((node, pmin, pmax, resources));
        self
    }

    /// Adds a component with one demand per resource.
    pub fn component(mut self, demands: Vec<f64>) -> Self {
        self.components.push(demands);
        self
    }

    /// Adds a service chain.
    pub fn chain(mut self, components: Vec<usize>, latency: f64) -> Self {
        self.chains.push((components, latency));
        self
    }

    /// Sets the bandwidth demanded from component `from` to `to`.
    pub fn demand(mut self, from: usize, to: usize, bandwidth: f64) -> Self {
        self.demands.push((from, to, bandwidth));
        self
    }

    /// Validates everything and assembles the topology.
    pub fn build(self) -> Result<Topology, ConfigError> {
        if self.num_resources == 0 {
            return Err(ConfigError::Empty("resources"));
        }
        if self.nodes.is_empty() {
            return Err(ConfigError::Empty("nodes"));
        }
        if self.servers.is_empty() {
            return Err(ConfigError::Empty("servers"));
        }
        if self.components.is_empty() {
            return Err(ConfigError::Empty("components"));
        }

        let num_nodes = self.nodes.len();
        let num_components = self.components.len();

        let mut nodes = Vec::with_capacity(num_nodes);
        for (index, &power) in self.nodes.iter().enumerate() {
            non_negative("node power", index, power)?;
            nodes.push(Node { index, power });
        }

        let mut links = Vec::with_capacity(self.links.len());
        let mut seen = HashSet::new();
        for (index, &(from, to, bandwidth, power, delay)) in self.links.iter().enumerate() {
            in_range("link endpoint", from, num_nodes)?;
            in_range("link endpoint", to, num_nodes)?;
            if from == to {
                return Err(ConfigError::SelfLoop(index, from));
            }
            if !seen.insert((from.min(to), from.max(to))) {
                return Err(ConfigError::DuplicateLink(from, to));
            }
            non_negative("link bandwidth", index, bandwidth)?;
            non_negative("link power", index, power)?;
            non_negative("link delay", index, delay)?;
            links.push(Link {
                index,
                from,
                to,
                bandwidth,
                power,
                delay,
            });
        }

        let mut servers = Vec::with_capacity(self.servers.len());
        for (index, (node, pmin, pmax, resources)) in self.servers.into_iter().enumerate() {
            in_range("server node", node, num_nodes)?;
            non_negative("server pmin", index, pmin)?;
            non_negative("server pmax", index, pmax)?;
            if pmax < pmin {
                return Err(ConfigError::PowerRange {
                    server: index,
                    pmin,
                    pmax,
                });
            }
            same_len(format!("server {index} resources"), self.num_resources, &resources)?;
            for &r in &resources {
                non_negative("server resource", index, r)?;
            }
            servers.push(Server {
                index,
                node,
                pmin,
                pmax,
                resources,
            });
        }

        let mut components = Vec::with_capacity(num_components);
        for (index, demands) in self.components.into_iter().enumerate() {
            same_len(
                format!("component {index} demands"),
                self.num_resources,
                &demands,
            )?;
            for &d in &demands {
                non_negative("component demand", index, d)?;
            }
            components.push(Component { index, demands });
        }

        let mut chains = Vec::with_capacity(self.chains.len());
        for (index, (members, latency)) in self.chains.into_iter().enumerate() {
            if latency.is_nan() || latency < 0.0 {
                return Err(ConfigError::InvalidValue {
                    what: "chain latency",
                    index,
                    value: latency,
                });
            }
            for &c in &members {
                in_range("chain component", c, num_components)?;
            }
            if let Some(w) = members.windows(2).find(|w| w[0] == w[1]) {
                return Err(ConfigError::RepeatedComponent {
                    chain: index,
                    component: w[0],
                });
            }
            chains.push(ServiceChain {
                index,
                components: members,
                latency,
            });
        }

        let mut demands = HashMap::with_capacity(self.demands.len());
        for (index, &(from, to, bandwidth)) in self.demands.iter().enumerate() {
            in_range("demand component", from, num_components)?;
            in_range("demand component", to, num_components)?;
            non_negative("demand bandwidth", index, bandwidth)?;
            demands.insert((from, to), bandwidth);
        }

        let mut demand_pairs = Vec::new();
        let mut pair_budgets: HashMap<(usize, usize), f64> = HashMap::new();
        for chain in &chains {
            for pair in chain.pairs() {
                match pair_budgets.get_mut(&pair) {
                    Some(budget) => *budget = budget.min(chain.latency),
                    None => {
                        pair_budgets.insert(pair, chain.latency);
                        demand_pairs.push(pair);
                    }
                }
            }
        }

        Ok(Topology {
            network: Network::new(nodes, links, servers),
            components,
            chains,
            demands,
            demand_pairs,
            pair_budgets,
            num_resources: self.num_resources,
        })
    }
}

fn in_range(what: &'static str, index: usize, len: usize) -> Result<(), ConfigError> {
    if index < len {
        Ok(())
    } else {
        Err(ConfigError::IndexOutOfRange { what, index, len })
    }
}

fn non_negative(what: &'static str, index: usize, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue { what, index, value })
    }
}

fn same_len(what: String, expected: usize, values: &[f64]) -> Result<(), ConfigError> {
    if values.len() == expected {
        Ok(())
    } else {
        Err(ConfigError::ShapeMismatch {
            what,
            expected,
            found: values.len(),
        })
    }
}
