//! Error types for the Monte Carlo simulator.
//!
//! Every variant except `Cancelled` is a configuration error raised before
//! the first trial runs.

use regrisk_core::types::EngineError;
use thiserror::Error;

/// Simulation failure.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimulationError {
    /// Trial count outside `[1, 10_000_000]`.
    #[error("Invalid trial count {0}: must be in range [1, 10_000_000]")]
    InvalidTrialCount(usize),

    /// Invalid configuration parameter.
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter {
        /// Parameter name
        name: &'static str,
        /// Description of the problem
        reason: String,
    },

    /// Malformed or out-of-support distribution.
    #[error("Invalid distribution for {variable}: {reason}")]
    InvalidDistribution {
        /// Uncertain variable name
        variable: String,
        /// Description of the problem
        reason: String,
    },

    /// Invalid investment case or cash flow.
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// Cancelled before any trial completed.
    #[error("Simulation cancelled before any trial completed")]
    Cancelled,
}
