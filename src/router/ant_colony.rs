//! Ant colony router.
//!
//! Each demand pair gets its own colony. Ants walk from source to goal
//! choosing hops by roulette over `tau^alpha * (1 / marginal)^beta`, where
//! `tau` is the pheromone on the directed hop and `marginal` the power the
//! hop would add given everything committed so far in this call. After
//! every generation the pheromones evaporate and the generation's cheapest
//! path is reinforced. The cheapest path over all generations is kept.
//!
//! Ants of one generation only read the pheromones and the routing state;
//! both change only between generations.

use rand::Rng;

use super::state::{route_all, DemandJob, Path, RoutingState};
use super::Router;
use crate::random::roulette;
use crate::solution::{Placement, Routing};
use crate::topology::{Network, Topology};

/// Floor for a hop's marginal power in the heuristic term, so that free
/// hops get a large but finite weight.
pub const MIN_HEURISTIC_POWER: f64 = 1e-3;

/// Colony parameters.
///
/// # Examples
///
/// ```
/// use vnf_placer::router::AntColonyConfig;
///
/// let config = AntColonyConfig::default()
///     .with_ants(8)
///     .with_generations(50);
/// assert_eq!(config.ants, 8);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AntColonyConfig {
    /// Ants per generation.
    pub ants: usize,
    /// Generations per demand pair.
    pub generations: usize,
    /// Pheromone exponent.
    pub alpha: f64,
    /// Heuristic exponent.
    pub beta: f64,
    /// Evaporation rate in `(0, 1]`.
    pub rho: f64,
}

impl Default for AntColonyConfig {
    fn default() -> Self {
        Self {
            ants: 4,
            generations: 100,
            alpha: 1.0,
            beta: 1.0,
            rho: 0.1,
        }
    }
}

impl AntColonyConfig {
    /// Sets the number of ants per generation.
    pub fn with_ants(mut self, n: usize) -> Self {
        self.ants = n;
        self
    }

    /// Sets the number of generations.
    pub fn with_generations(mut self, n: usize) -> Self {
        self.generations = n;
        self
    }

    /// Sets the pheromone exponent.
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Sets the heuristic exponent.
    pub fn with_beta(mut self, beta: f64) -> Self {
        self.beta = beta;
        self
    }

    /// Sets the evaporation rate.
    pub fn with_rho(mut self, rho: f64) -> Self {
        self.rho = rho;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.ants == 0 {
            return Err("ants must be at least 1".into());
        }
        if self.generations == 0 {
            return Err("generations must be at least 1".into());
        }
        if !(self.alpha.is_finite() && self.alpha >= 0.0) {
            return Err("alpha must be finite and non-negative".into());
        }
        if !(self.beta.is_finite() && self.beta >= 0.0) {
            return Err("beta must be finite and non-negative".into());
        }
        if !(self.rho > 0.0 && self.rho <= 1.0) {
            return Err("rho must be in (0, 1]".into());
        }
        Ok(())
    }
}

/// Pheromone per directed hop.
///
/// Hop `i` out of node `n` is stored at `offsets[n] + i`, matching the
/// order of [`Network::hops`]. Values always stay within `[0, 1]`.
#[derive(Debug, Clone)]
pub struct Pheromones {
    offsets: Vec<usize>,
    values: Vec<f64>,
}

impl Pheromones {
    /// Every hop out of a node starts at `1 / out_degree`.
    pub fn new(network: &Network) -> Self {
        let mut offsets = Vec::with_capacity(network.num_nodes() + 1);
        let mut values = Vec::new();
        offsets.push(0);
        for n in 0..network.num_nodes() {
            let degree = network.hops(n).len();
            values.extend(std::iter::repeat(1.0 / degree as f64).take(degree));
            offsets.push(values.len());
        }
        Self { offsets, values }
    }

    /// Pheromone on hop `slot` out of `node`.
    pub fn get(&self, node: usize, slot: usize) -> f64 {
        self.values[self.offsets[node] + slot]
    }

    /// Global id of hop `slot` out of `node`.
    pub fn arc(&self, node: usize, slot: usize) -> usize {
        self.offsets[node] + slot
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Scales every value by `1 - rho`.
    pub fn evaporate(&mut self, rho: f64) {
        let keep = (1.0 - rho).clamp(0.0, 1.0);
        for v in &mut self.values {
            *v *= keep;
        }
    }

    /// Adds `delta` to each of `arcs`, capped at 1.
    pub fn reinforce(&mut self, arcs: &[usize], delta: f64) {
        let delta = delta.clamp(0.0, 1.0);
        for &a in arcs {
            self.values[a] = (self.values[a] + delta).min(1.0);
        }
    }
}

/// A finished ant walk.
#[derive(Debug, Clone)]
struct Tour {
    path: Path,
    arcs: Vec<usize>,
    power: f64,
}

/// Routes each demand pair with a fresh ant colony.
#[derive(Debug, Clone)]
pub struct AntColonyRouter<'a> {
    topology: &'a Topology,
    config: AntColonyConfig,
}

impl<'a> AntColonyRouter<'a> {
    pub fn new(topology: &'a Topology, config: AntColonyConfig) -> Self {
        Self { topology, config }
    }

    pub fn config(&self) -> &AntColonyConfig {
        &self.config
    }

    fn path<R: Rng>(&self, state: &RoutingState<'_>, job: &DemandJob, rng: &mut R) -> Option<Path> {
        let mut pheromones = Pheromones::new(self.topology.network());
        let mut best: Option<Tour> = None;

        for _ in 0..self.config.generations {
            let mut generation_best: Option<Tour> = None;
            for _ in 0..self.config.ants {
                if let Some(tour) = self.walk(state, &pheromones, job, rng) {
                    if generation_best.as_ref().map_or(true, |b| tour.power < b.power) {
                        generation_best = Some(tour);
                    }
                }
            }

            pheromones.evaporate(self.config.rho);
            if let Some(tour) = generation_best {
                let delta = if tour.power > 0.0 {
                    (1.0 / tour.power).min(1.0)
                } else {
                    1.0
                };
                pheromones.reinforce(&tour.arcs, delta);
                if best.as_ref().map_or(true, |b| tour.power < b.power) {
                    best = Some(tour);
                }
            }
        }

        best.map(|t| t.path)
    }

    /// One ant. `None` if it got stuck before the goal.
    fn walk<R: Rng>(
        &self,
        state: &RoutingState<'_>,
        pheromones: &Pheromones,
        job: &DemandJob,
        rng: &mut R,
    ) -> Option<Tour> {
        let network = self.topology.network();
        let mut visited = vec![false; network.num_nodes()];
        let mut path = Path::start(job.start);
        let mut arcs = Vec::new();
        let mut remaining = job.budget;
        let mut power = 0.0;
        visited[job.start] = true;

        let mut slots = Vec::new();
        let mut weights = Vec::new();
        while path.last() != job.goal {
            let at = path.last();
            slots.clear();
            weights.clear();
            for (slot, hop) in network.hops(at).iter().enumerate() {
                if visited[hop.to] || !state.admits(hop, remaining, job.bandwidth) {
                    continue;
                }
                let tau = pheromones.get(at, slot);
                let eta = 1.0 / state.marginal_power(hop).max(MIN_HEURISTIC_POWER);
                slots.push(slot);
                weights.push(tau.powf(self.config.alpha) * eta.powf(self.config.beta));
            }

            let slot = slots[roulette(&weights, rng)?];
            let hop = network.hops(at)[slot];
            power += state.marginal_power(&hop);
            remaining -= network.link(hop.link).delay;
            visited[hop.to] = true;
            arcs.push(pheromones.arc(at, slot));
            path.push(&hop);
        }

        Some(Tour { path, arcs, power })
    }
}

impl Router for AntColonyRouter<'_> {
    fn find_routing<R: Rng>(&self, placement: &Placement, rng: &mut R) -> Option<Routing> {
        route_all(self.topology, placement, rng, |state, job, rng| {
            self.path(state, job, rng)
        })
    }
}
