//! Placer configuration.

/// Which placement strategy a search start uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PlacementStrategy {
    /// Uniformly random servers, rejected until capacity-feasible.
    Random,
    /// Cheapest-first assignment with randomized rank selection.
    #[default]
    Greedy,
}

/// Configuration shared by all placers.
///
/// # Examples
///
/// ```
/// use vnf_placer::placer::PlacerConfig;
///
/// let config = PlacerConfig::default().with_max_attempts(50);
/// assert_eq!(config.max_attempts, 50);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlacerConfig {
    /// Whole-placement attempts before a placer gives up and returns `None`.
    pub max_attempts: usize,
}

impl Default for PlacerConfig {
    fn default() -> Self {
        Self { max_attempts: 1000 }
    }
}

impl PlacerConfig {
    /// Sets the attempt bound.
    pub fn with_max_attempts(mut self, n: usize) -> Self {
        self.max_attempts = n;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_attempts == 0 {
            return Err("max_attempts must be at least 1".into());
        }
        Ok(())
    }
}
