//! Local search over placements, rerouting every candidate.

use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use rand::seq::{index, SliceRandom};
use rand::Rng;

use super::config::SearchConfig;
use super::solution::RoutingSolution;
use crate::evaluator::Evaluator;
use crate::router::Router;
use crate::solution::{Placement, Solution};
use crate::tabu::TabuProblem;

/// How one neighbor placement is derived from the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Perturbation {
    /// Two sampled components exchange servers.
    Swap,
    /// One sampled component moves to a random server.
    Relocate,
    /// The sampled components' servers are shuffled among them.
    Permute,
}

/// Searches placements around a starting solution.
///
/// Each neighborhood perturbs a small random subset of components, keeps
/// the capacity-feasible placements, routes them, and drops any solution
/// already produced in the last [`SearchConfig::memory_depth`] iterations.
pub struct RoutingProblem<'a, Ro> {
    evaluator: Evaluator<'a>,
    router: &'a Ro,
    config: SearchConfig,
    initial: RoutingSolution,
    iteration: usize,
    memory: VecDeque<HashSet<RoutingSolution>>,
    produced: HashSet<RoutingSolution>,
    best_history: Vec<f64>,
    cancel: Option<Arc<AtomicBool>>,
    deadline: Option<Instant>,
}

impl<'a, Ro: Router> RoutingProblem<'a, Ro> {
    /// `initial` must be a feasible solution for the evaluator's topology.
    pub fn new(
        evaluator: Evaluator<'a>,
        router: &'a Ro,
        initial: Solution,
        config: SearchConfig,
    ) -> Self {
        let initial = RoutingSolution::new(&evaluator, initial);
        Self {
            evaluator,
            router,
            config,
            initial,
            iteration: 0,
            memory: VecDeque::new(),
            produced: HashSet::new(),
            best_history: Vec::new(),
            cancel: None,
            deadline: None,
        }
    }

    /// Stops the search once `cancel` is set.
    pub fn with_cancel(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Stops the search once `deadline` has passed.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn iteration(&self) -> usize {
        self.iteration
    }

    /// Best fitness after each completed iteration.
    pub fn best_history(&self) -> &[f64] {
        &self.best_history
    }

    /// Whether the search was stopped from outside.
    pub fn interrupted(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
            || self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    fn perturb<R: Rng>(&self, placement: &Placement, sampled: &[usize], rng: &mut R) -> Placement {
        let num_servers = self.evaluator.topology().network().num_servers();
        let mut next = placement.clone();

        let kind = match rng.random_range(0..3) {
            0 if sampled.len() >= 2 => Perturbation::Swap,
            2 if sampled.len() >= 2 => Perturbation::Permute,
            _ => Perturbation::Relocate,
        };
        match kind {
            Perturbation::Swap => {
                let picked = index::sample(rng, sampled.len(), 2);
                next.swap(sampled[picked.index(0)], sampled[picked.index(1)]);
            }
            Perturbation::Relocate => {
                let c = sampled[rng.random_range(0..sampled.len())];
                next.assign(c, rng.random_range(0..num_servers));
            }
            Perturbation::Permute => {
                let mut servers: Vec<usize> =
                    sampled.iter().map(|&c| placement.server_of(c)).collect();
                servers.shuffle(rng);
                for (&c, s) in sampled.iter().zip(servers) {
                    next.assign(c, s);
                }
            }
        }
        next
    }

    fn recently_produced(&self, candidate: &RoutingSolution) -> bool {
        self.memory.iter().any(|seen| seen.contains(candidate))
    }
}

impl<Ro: Router> TabuProblem for RoutingProblem<'_, Ro> {
    type Solution = RoutingSolution;

    fn initial(&mut self) -> RoutingSolution {
        self.initial.clone()
    }

    fn is_better(&self, a: &RoutingSolution, b: &RoutingSolution) -> bool {
        a.is_better_than(b)
    }

    fn neighborhood<R: Rng>(
        &mut self,
        current: &RoutingSolution,
        rng: &mut R,
    ) -> Vec<RoutingSolution> {
        let placement = &current.solution().placement;
        let n = placement.len();
        if n == 0 {
            return Vec::new();
        }
        let amount = ((self.config.perturbation_ratio * n as f64).ceil() as usize).clamp(1, n);
        let sampled = index::sample(rng, n, amount).into_vec();

        let mut candidates: Vec<Placement> = Vec::with_capacity(self.config.neighborhood_size);
        for _ in 0..self.config.neighborhood_size {
            let next = self.perturb(placement, &sampled, rng);
            if &next != placement
                && !candidates.contains(&next)
                && self.evaluator.is_valid_placement(&next)
            {
                candidates.push(next);
            }
        }

        let mut neighbors = Vec::with_capacity(candidates.len());
        for p in candidates {
            let Some(routing) = self.router.find_routing(&p, rng) else {
                continue;
            };
            let candidate = RoutingSolution::new(&self.evaluator, Solution::new(p, routing));
            if !self.recently_produced(&candidate) {
                neighbors.push(candidate.clone());
            }
            self.produced.insert(candidate);
        }
        neighbors
    }

    fn stop(&self, _best: &RoutingSolution) -> bool {
        self.iteration >= self.config.max_iterations || self.interrupted()
    }

    fn update(&mut self, _current: &RoutingSolution, best: &RoutingSolution) {
        self.iteration += 1;
        self.best_history.push(best.fitness());

        let produced = std::mem::take(&mut self.produced);
        if self.config.memory_depth > 0 {
            self.memory.push_back(produced);
            while self.memory.len() > self.config.memory_depth {
                self.memory.pop_front();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;
    use crate::router::GreedyRouter;
    use crate::tabu::TabuRunner;
    use crate::testing::{mesh_solution, mesh_topology};
    use proptest::prelude::*;

    #[test]
    fn test_neighbors_are_valid_and_distinct() {
        let t = mesh_topology();
        let eval = Evaluator::new(&t);
        let router = GreedyRouter::new(&t, false);
        let mut problem = RoutingProblem::new(
            eval,
            &router,
            mesh_solution(),
            SearchConfig::default().with_neighborhood_size(30),
        );
        let mut rng = create_rng(5);
        let current = problem.initial();

        let neighbors = problem.neighborhood(&current, &mut rng);
        assert!(!neighbors.is_empty());
        let distinct: HashSet<_> = neighbors.iter().collect();
        assert_eq!(distinct.len(), neighbors.len());
        for s in &neighbors {
            assert_ne!(s.solution().placement, current.solution().placement);
            assert!(eval.assert_solution(s.solution()).is_ok());
            assert!((s.fitness() - eval.fitness(s.solution())).abs() < 1e-12);
        }
    }

    #[test]
    fn test_memory_excludes_recent_solutions() {
        let t = mesh_topology();
        let eval = Evaluator::new(&t);
        let router = GreedyRouter::new(&t, false);
        let config = SearchConfig::default()
            .with_neighborhood_size(30)
            .with_perturbation_ratio(0.4);
        let mut problem = RoutingProblem::new(eval, &router, mesh_solution(), config);
        let mut rng = create_rng(11);
        let current = problem.initial();

        let first: HashSet<_> = problem.neighborhood(&current, &mut rng).into_iter().collect();
        problem.update(&current, &current);
        let second: HashSet<_> = problem.neighborhood(&current, &mut rng).into_iter().collect();
        problem.update(&current, &current);
        let third: HashSet<_> = problem.neighborhood(&current, &mut rng).into_iter().collect();
        problem.update(&current, &current);

        assert!(first.is_disjoint(&second));
        assert!(first.is_disjoint(&third));
        assert!(second.is_disjoint(&third));
        assert_eq!(problem.memory.len(), 2);
    }

    #[test]
    fn test_stops_at_iteration_cap() {
        let t = mesh_topology();
        let router = GreedyRouter::new(&t, false);
        let mut problem = RoutingProblem::new(
            Evaluator::new(&t),
            &router,
            mesh_solution(),
            SearchConfig::default().with_max_iterations(7),
        );
        let result = TabuRunner::run(&mut problem, &mut create_rng(3));
        assert_eq!(result.iterations, 7);
        assert_eq!(problem.iteration(), 7);
        assert_eq!(problem.best_history().len(), 7);
    }

    #[test]
    fn test_cancel_stops_after_one_iteration() {
        let t = mesh_topology();
        let router = GreedyRouter::new(&t, false);
        let cancel = Arc::new(AtomicBool::new(true));
        let mut problem =
            RoutingProblem::new(Evaluator::new(&t), &router, mesh_solution(), SearchConfig::default())
                .with_cancel(cancel);
        let result = TabuRunner::run(&mut problem, &mut create_rng(3));
        assert_eq!(result.iterations, 1);
        assert!(problem.interrupted());
    }

    #[test]
    fn test_expired_deadline_stops() {
        let t = mesh_topology();
        let router = GreedyRouter::new(&t, false);
        let mut problem =
            RoutingProblem::new(Evaluator::new(&t), &router, mesh_solution(), SearchConfig::default())
                .with_deadline(Instant::now());
        let result = TabuRunner::run(&mut problem, &mut create_rng(3));
        assert_eq!(result.iterations, 1);
    }

    #[test]
    fn test_config_validation() {
        assert!(SearchConfig::default().validate().is_ok());
        assert!(SearchConfig::default().with_max_iterations(0).validate().is_err());
        assert!(SearchConfig::default().with_neighborhood_size(0).validate().is_err());
        assert!(SearchConfig::default().with_perturbation_ratio(0.0).validate().is_err());
        assert!(SearchConfig::default().with_perturbation_ratio(1.0).validate().is_ok());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(8))]

        #[test]
        fn prop_search_is_monotone(seed in any::<u64>()) {
            let t = mesh_topology();
            let eval = Evaluator::new(&t);
            let router = GreedyRouter::new(&t, true);
            let config = SearchConfig::default().with_max_iterations(25);
            let mut problem = RoutingProblem::new(eval, &router, mesh_solution(), config);
            let initial = eval.fitness(&mesh_solution());

            let result = TabuRunner::run(&mut problem, &mut create_rng(seed));

            prop_assert!(result.best.fitness() >= initial);
            prop_assert!(eval.assert_solution(result.best.solution()).is_ok());
            for w in problem.best_history().windows(2) {
                prop_assert!(w[1] >= w[0]);
            }
        }
    }
}
