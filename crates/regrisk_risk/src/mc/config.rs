//! Monte Carlo simulation configuration.

use super::error::SimulationError;
use crate::parallel::ParallelConfig;

/// Maximum number of trials allowed.
pub const MAX_TRIALS: usize = 10_000_000;

/// Default number of NPV histogram bins.
pub const DEFAULT_HISTOGRAM_BINS: usize = 20;

/// Monte Carlo simulation configuration.
///
/// Immutable; use [`SimulationConfigBuilder`] to construct instances. The
/// seed is mandatory so every simulation is reproducible.
///
/// # Examples
///
/// ```rust
/// use regrisk_risk::SimulationConfig;
///
/// let config = SimulationConfig::builder()
///     .n_trials(10_000)
///     .seed(42)
///     .build()
///     .expect("valid configuration");
///
/// assert_eq!(config.n_trials(), 10_000);
/// assert_eq!(config.histogram_bins(), 20);
///
/// assert!(SimulationConfig::builder().n_trials(10).build().is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimulationConfig {
    n_trials: usize,
    seed: u64,
    histogram_bins: usize,
    parallel: ParallelConfig,
}

impl SimulationConfig {
    /// Creates a new configuration builder.
    #[inline]
    pub fn builder() -> SimulationConfigBuilder {
        SimulationConfigBuilder::default()
    }

    /// Number of trials.
    #[inline]
    pub fn n_trials(&self) -> usize {
        self.n_trials
    }

    /// Simulation seed.
    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// NPV histogram bins.
    #[inline]
    pub fn histogram_bins(&self) -> usize {
        self.histogram_bins
    }

    /// Parallel execution settings.
    #[inline]
    pub fn parallel(&self) -> &ParallelConfig {
        &self.parallel
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// - `InvalidTrialCount` if `n_trials` is 0 or above 10,000,000
    /// - `InvalidParameter` if `histogram_bins` is 0
    pub fn validate(&self) -> Result<(), SimulationError> {
        if self.n_trials == 0 || self.n_trials > MAX_TRIALS {
            return Err(SimulationError::InvalidTrialCount(self.n_trials));
        }
        if self.histogram_bins == 0 {
            return Err(SimulationError::InvalidParameter {
                name: "histogram_bins",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

/// Builder for [`SimulationConfig`].
#[derive(Clone, Debug, Default)]
pub struct SimulationConfigBuilder {
    n_trials: Option<usize>,
    seed: Option<u64>,
    histogram_bins: Option<usize>,
    parallel: Option<ParallelConfig>,
}

impl SimulationConfigBuilder {
    /// Sets the number of trials, in [1, 10_000_000].
    #[inline]
    pub fn n_trials(mut self, n_trials: usize) -> Self {
        self.n_trials = Some(n_trials);
        self
    }

    /// Sets the seed.
    #[inline]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the NPV histogram bin count.
    #[inline]
    pub fn histogram_bins(mut self, bins: usize) -> Self {
        self.histogram_bins = Some(bins);
        self
    }

    /// Sets the parallel execution settings.
    #[inline]
    pub fn parallel(mut self, parallel: ParallelConfig) -> Self {
        self.parallel = Some(parallel);
        self
    }

    /// Builds and validates the configuration.
    ///
    /// # Errors
    ///
    /// - `InvalidTrialCount` if `n_trials` is missing or out of range
    /// - `InvalidParameter` if the seed is missing or the bin count is 0
    pub fn build(self) -> Result<SimulationConfig, SimulationError> {
        let seed = self.seed.ok_or_else(|| SimulationError::InvalidParameter {
            name: "seed",
            reason: "an explicit seed is required".to_string(),
        })?;
        let config = SimulationConfig {
            n_trials: self.n_trials.unwrap_or(0),
            seed,
            histogram_bins: self.histogram_bins.unwrap_or(DEFAULT_HISTOGRAM_BINS),
            parallel: self.parallel.unwrap_or_default(),
        };
        config.validate()?;
        Ok(config)
    }
}
