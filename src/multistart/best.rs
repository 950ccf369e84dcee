//! Shared best-solution cell.

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::problem::RoutingSolution;

/// The best solution found so far by any worker.
///
/// Comparison and replacement happen under one lock, so concurrent offers
/// never lose an improvement. The lock is held only for the comparison
/// and the move or clone.
#[derive(Debug, Default)]
pub struct BestSolution {
    cell: Mutex<Option<RoutingSolution>>,
}

impl BestSolution {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the stored solution if `candidate` is strictly better.
    ///
    /// Returns whether it was replaced.
    pub fn offer(&self, candidate: RoutingSolution) -> bool {
        let mut best = self.lock();
        match best.as_ref() {
            Some(current) if !candidate.is_better_than(current) => false,
            _ => {
                *best = Some(candidate);
                true
            }
        }
    }

    /// A copy of the stored solution.
    pub fn snapshot(&self) -> Option<RoutingSolution> {
        self.lock().clone()
    }

    pub fn into_inner(self) -> Option<RoutingSolution> {
        self.cell.into_inner().unwrap_or_else(PoisonError::into_inner)
    }

    // The cell is only ever assigned whole, so a poisoned lock still
    // holds a consistent value.
    fn lock(&self) -> MutexGuard<'_, Option<RoutingSolution>> {
        self.cell.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::Evaluator;
    use crate::placer::{Placer, PlacerConfig, RandomPlacer};
    use crate::random::create_rng;
    use crate::router::{GreedyRouter, Router};
    use crate::solution::{Placement, Solution};
    use crate::testing::{mesh_solution, mesh_topology, two_node_topology};
    use rayon::prelude::*;

    #[test]
    fn test_offer_keeps_strictly_better() {
        let t = two_node_topology(10.0);
        let eval = Evaluator::new(&t);
        let router = GreedyRouter::new(&t, false);
        let mut rng = create_rng(0);
        let mut solve = |servers: Vec<usize>| {
            let p = Placement::new(servers);
            let r = router.find_routing(&p, &mut rng).unwrap();
            RoutingSolution::new(&eval, Solution::new(p, r))
        };
        let split = solve(vec![0, 1]); // power 35
        let low = solve(vec![0, 0]); // power 13
        let high = solve(vec![1, 1]); // power 15

        let best = BestSolution::new();
        assert!(best.snapshot().is_none());
        assert!(best.offer(split));
        assert!(best.offer(high.clone()));
        assert!(best.offer(low.clone()));
        assert!(!best.offer(high));
        assert!(!best.offer(low.clone()));
        assert_eq!(best.into_inner(), Some(low));
    }

    #[test]
    fn test_concurrent_offers_keep_maximum() {
        let t = mesh_topology();
        let eval = Evaluator::new(&t);
        let placer = RandomPlacer::new(&t, PlacerConfig::default());
        let router = GreedyRouter::new(&t, false);
        let mut rng = create_rng(9);

        let mut candidates = vec![RoutingSolution::new(&eval, mesh_solution())];
        while candidates.len() < 64 {
            let p = placer.next(&mut rng).unwrap();
            if let Some(r) = router.find_routing(&p, &mut rng) {
                candidates.push(RoutingSolution::new(&eval, Solution::new(p, r)));
            }
        }
        let top = candidates
            .iter()
            .map(RoutingSolution::fitness)
            .fold(f64::NEG_INFINITY, f64::max);

        let best = BestSolution::new();
        candidates.into_par_iter().for_each(|s| {
            best.offer(s);
        });

        assert_eq!(best.snapshot().unwrap().fitness(), top);
    }
}
