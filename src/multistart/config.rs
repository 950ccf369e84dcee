//! Multi-start configuration.

use crate::placer::{PlacementStrategy, PlacerConfig};
use crate::problem::SearchConfig;
use crate::router::RoutingStrategy;

/// Configuration for a multi-start run.
///
/// # Examples
///
/// ```
/// use vnf_placer::multistart::MultiStartConfig;
/// use vnf_placer::router::RoutingStrategy;
///
/// let config = MultiStartConfig::default()
///     .with_starts(16)
///     .with_threads(4)
///     .with_router(RoutingStrategy::Greedy { lookahead: true })
///     .with_seed(7);
/// assert_eq!(config.starts, 16);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MultiStartConfig {
    /// Independent search pipelines to run.
    pub starts: usize,
    /// Worker threads (0 lets rayon choose).
    pub threads: usize,
    /// Placement strategy for initial solutions.
    pub placer: PlacementStrategy,
    /// Placer attempt bound.
    pub placer_config: PlacerConfig,
    /// Routing strategy, for construction and for every neighbor.
    pub router: RoutingStrategy,
    /// Local-search parameters.
    pub search: SearchConfig,
    /// Place-then-route rounds a start tries before giving up.
    pub construction_attempts: usize,
    /// Wall-clock limit for the whole run, in milliseconds.
    pub time_limit_ms: Option<u64>,
    /// Base seed; start `i` uses `seed + i`.
    pub seed: u64,
}

impl Default for MultiStartConfig {
    fn default() -> Self {
        Self {
            starts: 8,
            threads: 0,
            placer: PlacementStrategy::default(),
            placer_config: PlacerConfig::default(),
            router: RoutingStrategy::default(),
            search: SearchConfig::default(),
            construction_attempts: 100,
            time_limit_ms: None,
            seed: 42,
        }
    }
}

impl MultiStartConfig {
    /// Sets the number of starts.
    pub fn with_starts(mut self, n: usize) -> Self {
        self.starts = n;
        self
    }

    /// Sets the number of worker threads.
    pub fn with_threads(mut self, n: usize) -> Self {
        self.threads = n;
        self
    }

    /// Sets the placement strategy.
    pub fn with_placer(mut self, placer: PlacementStrategy) -> Self {
        self.placer = placer;
        self
    }

    /// Sets the placer configuration.
    pub fn with_placer_config(mut self, config: PlacerConfig) -> Self {
        self.placer_config = config;
        self
    }

    /// Sets the routing strategy.
    pub fn with_router(mut self, router: RoutingStrategy) -> Self {
        self.router = router;
        self
    }

    /// Sets the local-search configuration.
    pub fn with_search(mut self, search: SearchConfig) -> Self {
        self.search = search;
        self
    }

    /// Sets the construction attempt bound.
    pub fn with_construction_attempts(mut self, n: usize) -> Self {
        self.construction_attempts = n;
        self
    }

    /// Sets the wall-clock limit.
    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = Some(ms);
        self
    }

    /// Sets the base seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Validates this configuration and the nested ones.
    pub fn validate(&self) -> Result<(), String> {
        if self.starts == 0 {
            return Err("starts must be at least 1".into());
        }
        if self.construction_attempts == 0 {
            return Err("construction_attempts must be at least 1".into());
        }
        self.placer_config.validate()?;
        self.router.validate()?;
        self.search.validate()
    }
}
