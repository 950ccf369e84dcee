//! Local-search configuration.

/// Configuration for one local-search run over placements and routings.
///
/// # Examples
///
/// ```
/// use vnf_placer::problem::SearchConfig;
///
/// let config = SearchConfig::default()
///     .with_max_iterations(500)
///     .with_neighborhood_size(20);
/// assert_eq!(config.max_iterations, 500);
/// assert_eq!(config.memory_depth, 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchConfig {
    /// Iterations before the search stops.
    pub max_iterations: usize,
    /// Perturbed placements drawn per iteration.
    pub neighborhood_size: usize,
    /// Share of components a perturbation may touch, in `(0, 1]`.
    pub perturbation_ratio: f64,
    /// Iterations a produced solution stays excluded from neighborhoods.
    pub memory_depth: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_iterations: 200,
            neighborhood_size: 10,
            perturbation_ratio: 0.2,
            memory_depth: 2,
        }
    }
}

impl SearchConfig {
    /// Sets the iteration cap.
    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    /// Sets the number of perturbed placements per iteration.
    pub fn with_neighborhood_size(mut self, n: usize) -> Self {
        self.neighborhood_size = n;
        self
    }

    /// Sets the perturbation ratio.
    pub fn with_perturbation_ratio(mut self, ratio: f64) -> Self {
        self.perturbation_ratio = ratio;
        self
    }

    /// Sets the rolling-memory depth.
    pub fn with_memory_depth(mut self, depth: usize) -> Self {
        self.memory_depth = depth;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_iterations == 0 {
            return Err("max_iterations must be at least 1".into());
        }
        if self.neighborhood_size == 0 {
            return Err("neighborhood_size must be at least 1".into());
        }
        if !(self.perturbation_ratio > 0.0 && self.perturbation_ratio <= 1.0) {
            return Err(format!(
                "perturbation_ratio must be in (0, 1], got {}",
                self.perturbation_ratio
            ));
        }
        Ok(())
    }
}
