//! Physical network: nodes, links and servers.

use std::collections::HashMap;

use super::vnf::Component;

/// A switching node.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Node {
    pub index: usize,
    /// Static power, charged once if the node is used at all.
    pub power: f64,
}

/// A physical edge between two nodes, usable in both directions.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Link {
    pub index: usize,
    pub from: usize,
    pub to: usize,
    /// Bandwidth capacity shared by every route that crosses the link.
    pub bandwidth: f64,
    /// Power, charged once if the link carries any route.
    pub power: f64,
    /// Propagation delay.
    pub delay: f64,
}

impl Link {
    /// The endpoint opposite to `node`.
    pub fn other_end(&self, node: usize) -> usize {
        if node == self.from {
            self.to
        } else {
            self.from
        }
    }
}

/// A server attached to one node.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Server {
    pub index: usize,
    pub node: usize,
    /// Power at 0% processor load.
    pub pmin: f64,
    /// Power at 100% processor load.
    pub pmax: f64,
    /// Resource capacities. Index 0 is the processor.
    pub resources: Vec<f64>,
}

impl Server {
    pub fn processor_capacity(&self) -> f64 {
        self.resources[0]
    }

    /// Power added on top of `pmin` by hosting `component`.
    ///
    /// Interpolates linearly between `pmin` and `pmax` on the processor
    /// share the component takes.
    pub fn marginal_power(&self, component: &Component) -> f64 {
        let capacity = self.processor_capacity();
        if capacity <= 0.0 {
            return 0.0;
        }
        (self.pmax - self.pmin) * component.demands[0] / capacity
    }
}

/// One direction of a link, seen from its source node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hop {
    pub to: usize,
    pub link: usize,
}

/// Nodes, links and servers with adjacency precomputed.
#[derive(Debug, Clone)]
pub struct Network {
    nodes: Vec<Node>,
    links: Vec<Link>,
    servers: Vec<Server>,
    adjacency: Vec<Vec<Hop>>,
    link_index: HashMap<(usize, usize), usize>,
}

impl Network {
    /// Assembles a network from already validated parts.
    pub(crate) fn new(nodes: Vec<Node>, links: Vec<Link>, servers: Vec<Server>) -> Self {
        let mut adjacency = vec![Vec::new(); nodes.len()];
        let mut link_index = HashMap::with_capacity(links.len() * 2);

        for link in &links {
            adjacency[link.from].push(Hop {
                to: link.to,
                link: link.index,
            });
            adjacency[link.to].push(Hop {
                to: link.from,
                link: link.index,
            });
            link_index.insert((link.from, link.to), link.index);
            link_index.insert((link.to, link.from), link.index);
        }

        Self {
            nodes,
            links,
            servers,
            adjacency,
            link_index,
        }
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn num_links(&self) -> usize {
        self.links.len()
    }

    pub fn num_servers(&self) -> usize {
        self.servers.len()
    }

    pub fn node(&self, index: usize) -> &Node {
        &self.nodes[index]
    }

    pub fn link(&self, index: usize) -> &Link {
        &self.links[index]
    }

    pub fn server(&self, index: usize) -> &Server {
        &self.servers[index]
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn servers(&self) -> &[Server] {
        &self.servers
    }

    /// Outgoing hops of `node`, one per incident link.
    pub fn hops(&self, node: usize) -> &[Hop] {
        &self.adjacency[node]
    }

    /// Link id joining `a` and `b`, in either direction.
    pub fn link_id_between(&self, a: usize, b: usize) -> Option<usize> {
        self.link_index.get(&(a, b)).copied()
    }

    /// Link joining `a` and `b`, in either direction.
    pub fn link_between(&self, a: usize, b: usize) -> Option<&Link> {
        self.link_id_between(a, b).map(|id| &self.links[id])
    }
}
