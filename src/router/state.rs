//! Per-call routing state and the sequential pair-by-pair driver.
//!
//! Every `find_routing` call builds a fresh [`RoutingState`], routes the
//! demand pairs one at a time in shuffled order, and commits each path
//! before the next pair is routed. Nothing survives the call.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::evaluator::{Evaluator, EPSILON};
use crate::solution::{Placement, Route, Routing};
use crate::topology::{Hop, Topology};

/// Node and link bookkeeping for one routing attempt, indexed by id.
#[derive(Debug, Clone)]
pub struct RoutingState<'a> {
    topology: &'a Topology,
    node_used: Vec<bool>,
    link_used: Vec<bool>,
    residual: Vec<f64>,
}

impl<'a> RoutingState<'a> {
    /// Fresh state for `placement`: every node hosting a component is
    /// already used, no link is, and all bandwidth is available.
    pub fn new(topology: &'a Topology, placement: &Placement) -> Self {
        let network = topology.network();
        let mut node_used = vec![false; network.num_nodes()];
        for &s in placement.servers() {
            node_used[topology.server_node(s)] = true;
        }
        Self {
            topology,
            node_used,
            link_used: vec![false; network.num_links()],
            residual: network.links().iter().map(|l| l.bandwidth).collect(),
        }
    }

    pub fn topology(&self) -> &'a Topology {
        self.topology
    }

    pub fn node_used(&self, node: usize) -> bool {
        self.node_used[node]
    }

    pub fn link_used(&self, link: usize) -> bool {
        self.link_used[link]
    }

    pub fn residual(&self, link: usize) -> f64 {
        self.residual[link]
    }

    /// Power that taking `hop` would add: the link's power if no earlier
    /// path crossed it, plus the far node's power if it is not yet used.
    pub fn marginal_power(&self, hop: &Hop) -> f64 {
        let network = self.topology.network();
        let mut power = 0.0;
        if !self.link_used[hop.link] {
            power += network.link(hop.link).power;
        }
        if !self.node_used[hop.to] {
            power += network.node(hop.to).power;
        }
        power
    }

    /// Whether `hop` fits the remaining delay budget and still carries
    /// `bandwidth`.
    pub fn admits(&self, hop: &Hop, remaining_delay: f64, bandwidth: f64) -> bool {
        let link = self.topology.network().link(hop.link);
        link.delay <= remaining_delay + EPSILON && self.residual[hop.link] + EPSILON >= bandwidth
    }

    /// Marks a finished path as used and deducts its bandwidth.
    pub fn commit(&mut self, path: &Path, bandwidth: f64) {
        for &n in &path.nodes {
            self.node_used[n] = true;
        }
        for &l in &path.links {
            self.link_used[l] = true;
            self.residual[l] -= bandwidth;
        }
    }
}

/// A node path with the links joining consecutive nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    pub nodes: Vec<usize>,
    pub links: Vec<usize>,
}

impl Path {
    pub fn start(node: usize) -> Self {
        Self {
            nodes: vec![node],
            links: Vec::new(),
        }
    }

    pub fn push(&mut self, hop: &Hop) {
        self.nodes.push(hop.to);
        self.links.push(hop.link);
    }

    pub fn last(&self) -> usize {
        self.nodes[self.nodes.len() - 1]
    }
}

/// One demand pair to route.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DemandJob {
    pub from: usize,
    pub to: usize,
    /// Node hosting `from`.
    pub start: usize,
    /// Node hosting `to`.
    pub goal: usize,
    pub bandwidth: f64,
    /// Tightest latency among the chains containing the pair.
    pub budget: f64,
}

/// The demand pairs of `topology` resolved against `placement`, in a
/// random order.
pub fn shuffled_jobs<R: Rng>(
    topology: &Topology,
    placement: &Placement,
    rng: &mut R,
) -> Vec<DemandJob> {
    let mut jobs: Vec<DemandJob> = topology
        .demand_pairs()
        .iter()
        .map(|&(from, to)| DemandJob {
            from,
            to,
            start: topology.server_node(placement.server_of(from)),
            goal: topology.server_node(placement.server_of(to)),
            bandwidth: topology.demand(from, to),
            budget: topology.pair_delay_budget(from, to),
        })
        .collect();
    jobs.shuffle(rng);
    jobs
}

/// Routes every demand pair with `find_path`, committing each path before
/// the next pair.
///
/// Same-node pairs get a single-node route without calling `find_path`.
/// Returns `None` as soon as one pair cannot be routed, or if the finished
/// routing breaks a chain's latency budget.
pub fn route_all<'a, R, F>(
    topology: &'a Topology,
    placement: &Placement,
    rng: &mut R,
    mut find_path: F,
) -> Option<Routing>
where
    R: Rng,
    F: FnMut(&RoutingState<'a>, &DemandJob, &mut R) -> Option<Path>,
{
    let mut state = RoutingState::new(topology, placement);
    let mut routing = Routing::new();

    for job in shuffled_jobs(topology, placement, rng) {
        if job.start == job.goal {
            routing.insert(Route::new(job.from, job.to, vec![job.start]));
            continue;
        }
        let path = find_path(&state, &job, rng)?;
        state.commit(&path, job.bandwidth);
        routing.insert(Route::new(job.from, job.to, path.nodes));
    }

    Evaluator::new(topology).check_latency(&routing).ok()?;
    Some(routing)
}
