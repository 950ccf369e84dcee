//! Multi-start execution engine.
//!
//! # Algorithm
//!
//! Each start, independently and in parallel:
//!
//! 1. Place and route until a feasible solution turns up, at most
//!    `construction_attempts` times
//! 2. Check it strictly; a violation aborts the start
//! 3. Improve it by local search
//! 4. Offer the result to the shared best cell
//!
//! Starts share only the topology and the best cell.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::Rng;
use rayon::prelude::*;
use tracing::{debug, error, info, warn};

use super::best::BestSolution;
use super::config::MultiStartConfig;
use crate::error::SearchError;
use crate::evaluator::Evaluator;
use crate::placer::{AnyPlacer, Placer};
use crate::problem::{RoutingProblem, RoutingSolution};
use crate::random::create_rng;
use crate::router::{AnyRouter, Router};
use crate::solution::Solution;
use crate::tabu::TabuRunner;
use crate::topology::Topology;

/// Result of a multi-start run.
#[derive(Debug, Clone)]
pub struct MultiStartResult {
    /// Best solution found, `None` if no start produced one.
    pub best: Option<RoutingSolution>,
    /// Starts that finished their local search.
    pub completed: usize,
    /// Starts that found no feasible initial solution.
    pub infeasible: usize,
    /// Starts stopped by an invariant violation.
    pub aborted: usize,
    /// Whether cancellation or the time limit cut the run short.
    pub cancelled: bool,
}

/// How one start ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StartOutcome {
    Completed { interrupted: bool },
    Infeasible,
    Aborted,
    Skipped,
}

/// Everything a start reads.
struct Shared<'a> {
    topology: &'a Topology,
    config: &'a MultiStartConfig,
    placer: AnyPlacer<'a>,
    router: AnyRouter<'a>,
    best: &'a BestSolution,
    cancel: Option<Arc<AtomicBool>>,
    deadline: Option<Instant>,
}

impl Shared<'_> {
    fn stopped(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
            || self.deadline.is_some_and(|d| Instant::now() >= d)
    }
}

/// Multi-start runner.
pub struct MultiStartRunner;

impl MultiStartRunner {
    /// Runs every start and returns the best solution found.
    ///
    /// # Examples
    ///
    /// ```
    /// use vnf_placer::multistart::{MultiStartConfig, MultiStartRunner};
    /// use vnf_placer::problem::SearchConfig;
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
    /// let config = MultiStartConfig::default()
    ///     .with_starts(2)
    ///     .with_threads(1)
    ///     .with_search(SearchConfig::default().with_max_iterations(5));
    ///
    /// let result = MultiStartRunner::run(&topology, &config).unwrap();
    /// let best = result.best.expect("feasible instance");
    /// // both components on one server: pmin 10, node 5, 40 * 5 / 8
    /// assert!((best.power() - 40.0).abs() < 1e-9);
    /// ```
    pub fn run(
        topology: &Topology,
        config: &MultiStartConfig,
    ) -> Result<MultiStartResult, SearchError> {
        Self::run_shared(topology, config, &BestSolution::new(), None)
    }

    /// Runs every start, offering results to `best`.
    ///
    /// `best` may already hold a solution and may be read concurrently,
    /// e.g. by a [`Checkpointer`](crate::checkpoint::Checkpointer). Starts
    /// not yet begun when `cancel` is set or the time limit passes are
    /// skipped; running local searches stop at their next iteration.
    pub fn run_shared(
        topology: &Topology,
        config: &MultiStartConfig,
        best: &BestSolution,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<MultiStartResult, SearchError> {
        config.validate().map_err(SearchError::InvalidConfig)?;

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.threads)
            .build()?;

        let shared = Shared {
            topology,
            config,
            placer: AnyPlacer::new(config.placer, topology, config.placer_config.clone()),
            router: AnyRouter::new(&config.router, topology),
            best,
            cancel,
            deadline: config
                .time_limit_ms
                .map(|ms| Instant::now() + Duration::from_millis(ms)),
        };

        info!(
            starts = config.starts,
            threads = pool.current_num_threads(),
            "starting multi-start search"
        );

        let outcomes: Vec<StartOutcome> = pool.install(|| {
            (0..config.starts)
                .into_par_iter()
                .map(|i| Self::start(i, &shared))
                .collect()
        });

        let mut result = MultiStartResult {
            best: None,
            completed: 0,
            infeasible: 0,
            aborted: 0,
            cancelled: false,
        };
        for outcome in outcomes {
            match outcome {
                StartOutcome::Completed { interrupted } => {
                    result.completed += 1;
                    result.cancelled |= interrupted;
                }
                StartOutcome::Infeasible => result.infeasible += 1,
                StartOutcome::Aborted => result.aborted += 1,
                StartOutcome::Skipped => result.cancelled = true,
            }
        }
        result.best = best.snapshot();

        match &result.best {
            Some(b) => info!(
                power = b.power(),
                completed = result.completed,
                infeasible = result.infeasible,
                aborted = result.aborted,
                "multi-start search finished"
            ),
            None => warn!(
                infeasible = result.infeasible,
                aborted = result.aborted,
                "multi-start search found no solution"
            ),
        }
        Ok(result)
    }

    fn start(index: usize, shared: &Shared<'_>) -> StartOutcome {
        if shared.stopped() {
            return StartOutcome::Skipped;
        }

        let config = shared.config;
        let mut rng = create_rng(config.seed.wrapping_add(index as u64));
        let evaluator = Evaluator::new(shared.topology);

        let Some(initial) = Self::construct(index, shared, &mut rng) else {
            warn!(
                start = index,
                attempts = config.construction_attempts,
                "no feasible initial solution"
            );
            return StartOutcome::Infeasible;
        };

        if let Err(e) = evaluator.assert_solution(&initial) {
            error!(start = index, error = %e, "constructed solution violates an invariant");
            return StartOutcome::Aborted;
        }

        let mut problem =
            RoutingProblem::new(evaluator, &shared.router, initial, config.search.clone());
        if let Some(cancel) = &shared.cancel {
            problem = problem.with_cancel(Arc::clone(cancel));
        }
        if let Some(deadline) = shared.deadline {
            problem = problem.with_deadline(deadline);
        }

        let result = TabuRunner::run(&mut problem, &mut rng);
        let power = result.best.power();
        debug!(
            start = index,
            iterations = result.iterations,
            best_iteration = result.best_iteration,
            empty_neighborhoods = result.empty_neighborhoods,
            power,
            "local search finished"
        );

        if shared.best.offer(result.best) {
            info!(start = index, power, "new global best");
        }
        StartOutcome::Completed {
            interrupted: problem.interrupted(),
        }
    }

    fn construct<R: Rng>(index: usize, shared: &Shared<'_>, rng: &mut R) -> Option<Solution> {
        for attempt in 1..=shared.config.construction_attempts {
            let Some(placement) = shared.placer.next(rng) else {
                continue;
            };
            if let Some(routing) = shared.router.find_routing(&placement, rng) {
                debug!(start = index, attempt, "constructed initial solution");
                return Some(Solution::new(placement, routing));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placer::PlacementStrategy;
    use crate::problem::SearchConfig;
    use crate::router::{AntColonyConfig, RoutingStrategy};
    use crate::testing::{mesh_solution, mesh_topology, overloaded_topology};
    use crate::topology::TopologyBuilder;

    fn small() -> MultiStartConfig {
        MultiStartConfig::default()
            .with_starts(4)
            .with_threads(2)
            .with_search(SearchConfig::default().with_max_iterations(15))
    }

    #[test]
    fn test_finds_valid_solution() {
        let t = mesh_topology();
        let result = MultiStartRunner::run(&t, &small()).unwrap();

        assert_eq!(result.completed, 4);
        assert_eq!(result.infeasible, 0);
        assert_eq!(result.aborted, 0);
        assert!(!result.cancelled);
        let best = result.best.unwrap();
        let eval = Evaluator::new(&t);
        assert!(eval.assert_solution(best.solution()).is_ok());
        assert!((best.fitness() - eval.fitness(best.solution())).abs() < 1e-12);
    }

    #[test]
    fn test_every_strategy_combination() {
        let t = mesh_topology();
        let routers = [
            RoutingStrategy::Greedy { lookahead: false },
            RoutingStrategy::Greedy { lookahead: true },
            RoutingStrategy::AntColony(AntColonyConfig::default().with_generations(5)),
        ];
        for placer in [PlacementStrategy::Random, PlacementStrategy::Greedy] {
            for router in &routers {
                let config = small()
                    .with_starts(2)
                    .with_placer(placer)
                    .with_router(router.clone())
                    .with_search(SearchConfig::default().with_max_iterations(3));
                let result = MultiStartRunner::run(&t, &config).unwrap();
                assert_eq!(result.completed, 2, "{placer:?} / {router:?}");
                assert!(result.best.is_some());
            }
        }
    }

    #[test]
    fn test_single_thread_reproducible() {
        let t = mesh_topology();
        let config = small().with_threads(1).with_seed(99);
        let a = MultiStartRunner::run(&t, &config).unwrap().best.unwrap();
        let b = MultiStartRunner::run(&t, &config).unwrap().best.unwrap();
        assert_eq!(a, b);
        assert_eq!(a.fitness(), b.fitness());
    }

    #[test]
    fn test_infeasible_instance_reports_none() {
        let t = overloaded_topology();
        let config = small().with_construction_attempts(3);
        let result = MultiStartRunner::run(&t, &config).unwrap();
        assert!(result.best.is_none());
        assert_eq!(result.infeasible, 4);
        assert_eq!(result.completed, 0);
    }

    #[test]
    fn test_unroutable_instance_reports_none() {
        // together the components overload a server, apart they need more
        // bandwidth than the link has
        let t = TopologyBuilder::new(1)
            .node(1.0)
            .node(1.0)
            .link(0, 1, 1.0, 1.0, 1.0)
            .server(0, 1.0, 2.0, vec![2.0])
            .server(1, 1.0, 2.0, vec![2.0])
            .component(vec![2.0])
            .component(vec![2.0])
            .chain(vec![0, 1], 10.0)
            .demand(0, 1, 4.0)
            .build()
            .unwrap();
        let config = small().with_construction_attempts(5);
        let result = MultiStartRunner::run(&t, &config).unwrap();
        assert!(result.best.is_none());
        assert_eq!(result.infeasible, 4);
    }

    #[test]
    fn test_cancelled_before_start() {
        let t = mesh_topology();
        let cancel = Arc::new(AtomicBool::new(true));
        let best = BestSolution::new();
        let result = MultiStartRunner::run_shared(&t, &small(), &best, Some(cancel)).unwrap();
        assert!(result.cancelled);
        assert_eq!(result.completed, 0);
        assert!(result.best.is_none());
    }

    #[test]
    fn test_zero_time_limit_skips_starts() {
        let t = mesh_topology();
        let config = small().with_time_limit_ms(0);
        let result = MultiStartRunner::run(&t, &config).unwrap();
        assert!(result.cancelled);
        assert!(result.best.is_none());
    }

    #[test]
    fn test_shared_cell_never_gets_worse() {
        let t = mesh_topology();
        let eval = Evaluator::new(&t);
        let seeded = RoutingSolution::new(&eval, mesh_solution());
        let best = BestSolution::new();
        best.offer(seeded.clone());

        let result = MultiStartRunner::run_shared(&t, &small(), &best, None).unwrap();
        assert!(result.best.unwrap().fitness() >= seeded.fitness());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let t = mesh_topology();
        let err = MultiStartRunner::run(&t, &small().with_starts(0)).unwrap_err();
        assert!(matches!(err, SearchError::InvalidConfig(_)));
    }
}
