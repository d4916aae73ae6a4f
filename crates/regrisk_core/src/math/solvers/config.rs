//! Stopping rules shared by the bracketing solvers.

use crate::types::EngineError;
use num_traits::Float;

/// When a bracketing solver may stop.
///
/// The solver returns once `|f(x)|` or half the bracket width drops below
/// `tolerance`, and gives up after `max_iterations` refinement steps. The
/// defaults (1e-10 and 100) locate an IRR to well under a hundredth of a
/// basis point.
///
/// ```
/// use regrisk_core::math::solvers::SolverConfig;
///
/// let config: SolverConfig<f64> = SolverConfig::default();
/// assert_eq!(config.max_iterations, 100);
///
/// let tight = SolverConfig::new(1e-13, 250).unwrap();
/// assert!(tight.tolerance < config.tolerance);
/// assert!(SolverConfig::<f64>::new(0.0, 10).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig<T: Float> {
    /// Residual and bracket-width threshold.
    pub tolerance: T,
    /// Refinement budget.
    pub max_iterations: usize,
}

impl<T: Float> Default for SolverConfig<T> {
    fn default() -> Self {
        Self {
            tolerance: T::from(1e-10).unwrap_or_else(T::epsilon),
            max_iterations: 100,
        }
    }
}

impl<T: Float> SolverConfig<T> {
    /// Validated configuration.
    ///
    /// # Errors
    ///
    /// `InvalidInput` unless `tolerance` is finite and positive and
    /// `max_iterations` is at least one.
    pub fn new(tolerance: T, max_iterations: usize) -> Result<Self, EngineError> {
        if !tolerance.is_finite() || tolerance <= T::zero() {
            return Err(EngineError::invalid_input(
                "solver tolerance must be finite and positive",
            ));
        }
        if max_iterations == 0 {
            return Err(EngineError::invalid_input(
                "solver max_iterations must be at least 1",
            ));
        }
        Ok(Self {
            tolerance,
            max_iterations,
        })
    }
}
