//! API error type.

use crate::config::ConfigError;
use regrisk_core::types::EngineError;
use regrisk_risk::SimulationError;
use thiserror::Error;

/// Failure of a [`RiskEngine`](crate::RiskEngine) call.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Invalid input, unknown category or unknown tier.
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// Invalid simulation setup or cancellation.
    #[error(transparent)]
    Simulation(#[from] SimulationError),

    /// Invalid engine configuration.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Malformed JSON record.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ApiError {
    /// Stable snake_case code for reports and exit statuses.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Engine(EngineError::InvalidInput(_))
            | Self::Simulation(SimulationError::Engine(EngineError::InvalidInput(_))) => {
                "invalid_input"
            }
            Self::Engine(EngineError::UnknownCategory(_))
            | Self::Simulation(SimulationError::Engine(EngineError::UnknownCategory(_))) => {
                "unknown_category"
            }
            Self::Engine(EngineError::UnknownTier(_))
            | Self::Simulation(SimulationError::Engine(EngineError::UnknownTier(_))) => {
                "unknown_tier"
            }
            Self::Simulation(SimulationError::Cancelled) => "cancelled",
            Self::Simulation(_) => "invalid_simulation",
            Self::Config(_) => "invalid_config",
            Self::Json(_) => "invalid_json",
        }
    }
}
