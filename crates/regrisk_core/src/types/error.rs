//! Error types for structured error handling.
//!
//! This module provides:
//! - `EngineError`: configuration-level failures surfaced to callers
//! - `SolverError`: failures from the bracketing root solvers

use thiserror::Error;

/// Engine-level errors.
///
/// Every variant is raised at call or configuration time, before any
/// computation starts. Unrecognised enumeration values are surfaced rather
/// than defaulted, since a silent default could understate statutory
/// exposure.
///
/// # Variants
/// - `InvalidInput`: non-positive revenue, non-positive horizon, a discount
///   rate at or below -1, malformed distribution parameters, ...
/// - `UnknownCategory`: violation category not in the taxonomy
/// - `UnknownTier`: severity tier not registered in the schedule
///
/// # Examples
/// ```
/// use regrisk_core::types::EngineError;
///
/// let err = EngineError::InvalidInput("annual_revenue must be positive".to_string());
/// assert_eq!(format!("{}", err), "Invalid input: annual_revenue must be positive");
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Invalid input data or parameters.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Violation category not present in the taxonomy.
    #[error("Unknown violation category: {0}")]
    UnknownCategory(String),

    /// Severity tier not registered in the penalty schedule.
    #[error("Unknown severity tier: {0}")]
    UnknownTier(String),
}

impl EngineError {
    /// Create an invalid input error.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}

/// Root-finding solver errors.
///
/// # Examples
/// ```
/// use regrisk_core::types::SolverError;
///
/// let err = SolverError::MaxIterationsExceeded { iterations: 100 };
/// assert_eq!(format!("{}", err), "Maximum iterations (100) exceeded");
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    /// The function has the same sign at both bracket endpoints.
    #[error("No sign change in bracket [{a}, {b}]")]
    NoBracket {
        /// Left bracket endpoint
        a: f64,
        /// Right bracket endpoint
        b: f64,
    },

    /// The solver did not converge within the iteration limit.
    #[error("Maximum iterations ({iterations}) exceeded")]
    MaxIterationsExceeded {
        /// Iteration limit that was hit
        iterations: usize,
    },

    /// The objective produced a non-finite value.
    #[error("Numerical instability: {0}")]
    NumericalInstability(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_error_display() {
        assert_eq!(
            EngineError::UnknownCategory("tax_evasion".to_string()).to_string(),
            "Unknown violation category: tax_evasion"
        );
        assert_eq!(
            EngineError::UnknownTier("catastrophic".to_string()).to_string(),
            "Unknown severity tier: catastrophic"
        );
        assert_eq!(
            EngineError::invalid_input("horizon_periods must be >= 1").to_string(),
            "Invalid input: horizon_periods must be >= 1"
        );
    }

    #[test]
    fn test_solver_error_display() {
        let err = SolverError::NoBracket { a: -0.99, b: 10.0 };
        assert_eq!(err.to_string(), "No sign change in bracket [-0.99, 10]");

        let err = SolverError::NumericalInstability("NaN objective".to_string());
        assert!(err.to_string().contains("NaN objective"));
    }

    #[test]
    fn test_engine_error_equality() {
        let a = EngineError::invalid_input("x");
        let b = EngineError::InvalidInput("x".to_string());
        assert_eq!(a, b);
    }
}
