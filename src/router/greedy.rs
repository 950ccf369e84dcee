//! Greedy depth-first router.

use std::cmp::Ordering;

use rand::Rng;

use super::state::{route_all, DemandJob, Path, RoutingState};
use super::Router;
use crate::solution::{Placement, Routing};
use crate::topology::{Hop, Topology};

/// Walks from source to goal one hop at a time, always taking the
/// cheapest compliant hop and never backtracking.
///
/// A hop is compliant if it reaches a node not yet on the path, fits the
/// remaining delay budget, and has enough residual bandwidth. A compliant
/// hop straight into the goal always wins. Otherwise hops are ranked by
/// marginal power, then links already carrying traffic, then lower delay,
/// then higher residual bandwidth.
///
/// With `lookahead`, a hop's score also includes the cheapest compliant
/// hop out of the node it reaches, and hops into dead ends are skipped.
#[derive(Debug, Clone)]
pub struct GreedyRouter<'a> {
    topology: &'a Topology,
    lookahead: bool,
}

impl<'a> GreedyRouter<'a> {
    pub fn new(topology: &'a Topology, lookahead: bool) -> Self {
        Self {
            topology,
            lookahead,
        }
    }

    fn path(&self, state: &RoutingState<'_>, job: &DemandJob) -> Option<Path> {
        let network = self.topology.network();
        let mut visited = vec![false; network.num_nodes()];
        let mut path = Path::start(job.start);
        let mut remaining = job.budget;
        visited[job.start] = true;

        while path.last() != job.goal {
            let at = path.last();
            let compliant = |h: &&Hop| !visited[h.to] && state.admits(h, remaining, job.bandwidth);

            let next = match network
                .hops(at)
                .iter()
                .filter(compliant)
                .find(|h| h.to == job.goal)
            {
                Some(hop) => *hop,
                None => {
                    let (hop, _) = network
                        .hops(at)
                        .iter()
                        .filter(compliant)
                        .filter_map(|h| Some((*h, self.score(state, h, &visited, remaining, job)?)))
                        .min_by(|a, b| compare(state, a, b))?;
                    hop
                }
            };

            remaining -= network.link(next.link).delay;
            visited[next.to] = true;
            path.push(&next);
        }

        Some(path)
    }

    /// Marginal power of `hop`, plus the cheapest onward hop under
    /// lookahead. `None` marks a dead end.
    fn score(
        &self,
        state: &RoutingState<'_>,
        hop: &Hop,
        visited: &[bool],
        remaining: f64,
        job: &DemandJob,
    ) -> Option<f64> {
        let power = state.marginal_power(hop);
        if !self.lookahead {
            return Some(power);
        }

        let network = self.topology.network();
        let left = remaining - network.link(hop.link).delay;
        let onward = network
            .hops(hop.to)
            .iter()
            .filter(|h| !visited[h.to] && state.admits(h, left, job.bandwidth))
            .map(|h| state.marginal_power(h))
            .min_by(f64::total_cmp)?;
        Some(power + onward)
    }
}

fn compare(state: &RoutingState<'_>, a: &(Hop, f64), b: &(Hop, f64)) -> Ordering {
    let links = state.topology().network();
    let (la, lb) = (links.link(a.0.link), links.link(b.0.link));
    a.1.total_cmp(&b.1)
        .then_with(|| state.link_used(b.0.link).cmp(&state.link_used(a.0.link)))
        .then_with(|| la.delay.total_cmp(&lb.delay))
        .then_with(|| state.residual(b.0.link).total_cmp(&state.residual(a.0.link)))
}

impl Router for GreedyRouter<'_> {
    fn find_routing<R: Rng>(&self, placement: &Placement, rng: &mut R) -> Option<Routing> {
        route_all(self.topology, placement, rng, |state, job, _| {
            self.path(state, job)
        })
    }
}
