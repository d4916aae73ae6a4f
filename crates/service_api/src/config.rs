//! Engine configuration management
//!
//! Loaded from a TOML file, then overridden by `REGRISK_*` environment
//! variables, then validated. Every key is optional; missing keys take the
//! documented defaults.
//!
//! ```toml
//! max_cumulative_fraction = 0.02
//! benefits_at_period_zero = false
//! sensitivity_delta = 0.20
//! log_level = "info"
//!
//! [monte_carlo]
//! n_trials = 10000
//! seed = 42
//!
//! [scenarios.pessimistic]
//! benefit_multiplier = 0.7
//! cost_multiplier = 1.3
//!
//! [schedule.critical]
//! base_fine = 2000000
//! revenue_fraction = 0.02
//! min_fine = 100000
//! max_fine = 10000000
//! ```

use regrisk_penalty::{
    PenaltyParameters, PenaltyScheduleRegistry, SeverityTier, DEFAULT_MAX_CUMULATIVE_FRACTION,
};
use regrisk_penalty::schedule::{DEFAULT_REPEAT_MULTIPLIER, DEFAULT_WILLFUL_MULTIPLIER};
use regrisk_risk::mc::MAX_TRIALS;
use regrisk_risk::parallel::DEFAULT_PARALLEL_THRESHOLD;
use regrisk_risk::sensitivity::DEFAULT_DELTA;
use regrisk_risk::ScenarioSet;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "REGRISK_";

/// Configuration error types
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    /// Configuration file could not be read.
    #[error("Configuration file error: {0}")]
    FileError(String),

    /// Configuration file is not valid TOML for this schema.
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// Environment override could not be parsed.
    #[error("Environment variable {var}: {reason}")]
    EnvError {
        /// Variable name
        var: String,
        /// Description of the problem
        reason: String,
    },

    /// Unknown log level.
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    /// A value is outside its allowed range.
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Log levels supported by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Everything
    Trace,
    /// Per-violation and per-scenario detail
    Debug,
    /// Aggregation and simulation summaries
    #[default]
    Info,
    /// Cancellations
    Warn,
    /// Errors only
    Error,
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(ConfigError::InvalidLogLevel(s.to_string())),
        }
    }
}

impl LogLevel {
    /// Convert log level to tracing filter string
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_filter_str())
    }
}

fn deserialize_log_level<'de, D>(deserializer: D) -> Result<LogLevel, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    LogLevel::from_str(&s).map_err(serde::de::Error::custom)
}

/// Monte Carlo settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MonteCarloSettings {
    /// Trials per simulation
    pub n_trials: usize,
    /// Seed used unless a case supplies one
    pub seed: u64,
    /// Trial count from which trials run on the Rayon pool
    pub parallel_threshold: usize,
    /// NPV histogram bins
    pub histogram_bins: usize,
}

impl Default for MonteCarloSettings {
    fn default() -> Self {
        Self {
            n_trials: 10_000,
            seed: 42,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
            histogram_bins: regrisk_risk::mc::DEFAULT_HISTOGRAM_BINS,
        }
    }
}

/// Benefit and cost multiplier of one scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioMultipliers {
    /// Factor on every benefit
    pub benefit_multiplier: Decimal,
    /// Factor on every cost
    pub cost_multiplier: Decimal,
}

/// The three scenario presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScenarioSettings {
    /// Pessimistic preset
    pub pessimistic: ScenarioMultipliers,
    /// Most likely preset
    pub most_likely: ScenarioMultipliers,
    /// Optimistic preset
    pub optimistic: ScenarioMultipliers,
}

impl Default for ScenarioSettings {
    fn default() -> Self {
        Self {
            pessimistic: ScenarioMultipliers {
                benefit_multiplier: dec!(0.7),
                cost_multiplier: dec!(1.3),
            },
            most_likely: ScenarioMultipliers {
                benefit_multiplier: dec!(1.0),
                cost_multiplier: dec!(1.0),
            },
            optimistic: ScenarioMultipliers {
                benefit_multiplier: dec!(1.3),
                cost_multiplier: dec!(0.8),
            },
        }
    }
}

impl ScenarioSettings {
    /// Validated scenario set.
    ///
    /// # Errors
    ///
    /// `ConfigError::Invalid` if the presets are not ordered.
    pub fn scenario_set(&self) -> Result<ScenarioSet, ConfigError> {
        let presets = [self.pessimistic, self.most_likely, self.optimistic];
        ScenarioSet::new(
            presets.map(|p| p.benefit_multiplier),
            presets.map(|p| p.cost_multiplier),
        )
        .map_err(|e| ConfigError::Invalid(e.to_string()))
    }
}

/// One row of a custom penalty schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScheduleEntry {
    /// Flat fine floor
    pub base_fine: Decimal,
    /// Fraction of annual revenue
    pub revenue_fraction: Decimal,
    /// Lower clamp
    pub min_fine: Decimal,
    /// Upper clamp
    pub max_fine: Decimal,
    /// Repeat-offence factor
    #[serde(default = "default_repeat_multiplier")]
    pub repeat_multiplier: Decimal,
    /// Willful-violation factor
    #[serde(default = "default_willful_multiplier")]
    pub willful_multiplier: Decimal,
}

fn default_repeat_multiplier() -> Decimal {
    DEFAULT_REPEAT_MULTIPLIER
}

fn default_willful_multiplier() -> Decimal {
    DEFAULT_WILLFUL_MULTIPLIER
}

/// Engine configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Statutory cap as a fraction of annual revenue, in (0, 1]
    pub max_cumulative_fraction: Decimal,
    /// Recognise one-off benefits in period 0 instead of period 1
    pub benefits_at_period_zero: bool,
    /// Relative sensitivity perturbation, in (0, 1)
    pub sensitivity_delta: Decimal,
    /// Log level
    #[serde(deserialize_with = "deserialize_log_level")]
    pub log_level: LogLevel,
    /// Monte Carlo settings
    pub monte_carlo: MonteCarloSettings,
    /// Scenario presets
    pub scenarios: ScenarioSettings,
    /// Custom penalty schedule keyed by tier name; must list every tier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule: Option<BTreeMap<String, ScheduleEntry>>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_cumulative_fraction: DEFAULT_MAX_CUMULATIVE_FRACTION,
            benefits_at_period_zero: false,
            sensitivity_delta: DEFAULT_DELTA,
            log_level: LogLevel::Info,
            monte_carlo: MonteCarloSettings::default(),
            scenarios: ScenarioSettings::default(),
            schedule: None,
        }
    }
}

impl EngineConfig {
    /// Create a new EngineConfig with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a TOML document and validates it.
    ///
    /// # Errors
    ///
    /// `ParseError` for malformed TOML or unknown keys, otherwise any
    /// [`validate`](Self::validate) error.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig =
            toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ConfigError::FileError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Builds configuration from all sources
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables
    /// 2. Config file
    /// 3. Default values
    ///
    /// A missing file is an error only when `required` is set.
    pub fn load(path: &Path, required: bool) -> Result<Self, ConfigError> {
        let config = if required || path.exists() {
            Self::from_file(path)?
        } else {
            Self::default()
        };
        let config = config.with_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Applies `REGRISK_*` overrides looked up through `lookup`.
    ///
    /// # Errors
    ///
    /// `EnvError` if a set variable does not parse.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        fn parse<T: FromStr>(var: &str, value: &str) -> Result<T, ConfigError>
        where
            T::Err: fmt::Display,
        {
            value.trim().parse().map_err(|e: T::Err| ConfigError::EnvError {
                var: var.to_string(),
                reason: e.to_string(),
            })
        }

        let var = |name: &str| {
            let key = format!("{}{}", ENV_PREFIX, name);
            lookup(&key).map(|value| (key, value))
        };

        if let Some((key, value)) = var("MAX_CUMULATIVE_FRACTION") {
            self.max_cumulative_fraction = parse(&key, &value)?;
        }
        if let Some((key, value)) = var("SENSITIVITY_DELTA") {
            self.sensitivity_delta = parse(&key, &value)?;
        }
        if let Some((key, value)) = var("MC_TRIALS") {
            self.monte_carlo.n_trials = parse(&key, &value)?;
        }
        if let Some((key, value)) = var("MC_SEED") {
            self.monte_carlo.seed = parse(&key, &value)?;
        }
        if let Some((key, value)) = var("BENEFITS_AT_PERIOD_ZERO") {
            self.benefits_at_period_zero = parse(&key, &value.to_lowercase())?;
        }
        if let Some((_, value)) = var("LOG_LEVEL") {
            self.log_level = LogLevel::from_str(&value)?;
        }
        Ok(self)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_cumulative_fraction <= Decimal::ZERO
            || self.max_cumulative_fraction > Decimal::ONE
        {
            return Err(ConfigError::Invalid(format!(
                "max_cumulative_fraction must be in (0, 1], got {}",
                self.max_cumulative_fraction
            )));
        }
        if self.sensitivity_delta <= Decimal::ZERO || self.sensitivity_delta >= Decimal::ONE {
            return Err(ConfigError::Invalid(format!(
                "sensitivity_delta must be in (0, 1), got {}",
                self.sensitivity_delta
            )));
        }
        let mc = &self.monte_carlo;
        if mc.n_trials == 0 || mc.n_trials > MAX_TRIALS {
            return Err(ConfigError::Invalid(format!(
                "monte_carlo.n_trials must be in 1..={}, got {}",
                MAX_TRIALS, mc.n_trials
            )));
        }
        if mc.histogram_bins == 0 {
            return Err(ConfigError::Invalid(
                "monte_carlo.histogram_bins must be at least 1".to_string(),
            ));
        }
        self.scenarios.scenario_set()?;
        self.registry()?;
        Ok(())
    }

    /// The penalty schedule: the configured one, or the standard table.
    ///
    /// # Errors
    ///
    /// `ConfigError::Invalid` for an unknown tier name, a missing or
    /// duplicated tier, or parameters breaking the schedule invariants.
    pub fn registry(&self) -> Result<PenaltyScheduleRegistry, ConfigError> {
        let Some(schedule) = &self.schedule else {
            return Ok(PenaltyScheduleRegistry::standard());
        };
        let invalid = |e: regrisk_core::types::EngineError| ConfigError::Invalid(e.to_string());
        let rows = schedule
            .iter()
            .map(|(name, entry)| {
                let tier = SeverityTier::from_str(name).map_err(invalid)?;
                let params = PenaltyParameters::with_multipliers(
                    entry.base_fine,
                    entry.revenue_fraction,
                    entry.min_fine,
                    entry.max_fine,
                    entry.repeat_multiplier,
                    entry.willful_multiplier,
                )
                .map_err(invalid)?;
                Ok((tier, params))
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;
        PenaltyScheduleRegistry::from_entries(rows).map_err(invalid)
    }

    /// Renders the configuration as TOML.
    ///
    /// # Errors
    ///
    /// `ConfigError::ParseError` if serialisation fails.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}
