//! Input records accepted from upstream producers.
//!
//! Records are plain serde structures. Amounts may be JSON numbers or
//! decimal strings; categories and tiers are snake_case names parsed
//! case-insensitively. Conversion into engine types validates every field.

use crate::error::ApiError;
use regrisk_core::types::{EngineError, Money, Rate};
use regrisk_finance::InvestmentCase;
use regrisk_penalty::{SeverityTier, ViolationCategory, ViolationInstance};
use regrisk_risk::{VariableDistribution, VariableDistributions};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Named factor applied after the repeat and willful multipliers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CustomFactorRecord {
    /// Label reported back in the multiplier trail
    pub name: String,
    /// Factor, must be positive
    pub factor: Decimal,
}

/// One violation: `{category, severity?, revenue, is_repeat, is_willful, custom_factors?}`.
///
/// # Examples
///
/// ```
/// use service_api::ViolationRecord;
///
/// let record: ViolationRecord = serde_json::from_str(
///     r#"{"category": "incident_non_reporting", "revenue": 100000000, "is_repeat": true}"#,
/// )
/// .unwrap();
/// let violation = record.to_instance().unwrap();
/// assert!(violation.is_repeat());
/// assert!(!violation.is_willful());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ViolationRecord {
    /// Violation category name
    pub category: String,
    /// Severity tier name; the category default when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
    /// Annual revenue of the offending entity
    pub revenue: Money,
    /// Repeat offence
    #[serde(default)]
    pub is_repeat: bool,
    /// Willful violation
    #[serde(default)]
    pub is_willful: bool,
    /// Extra multipliers, applied in list order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub custom_factors: Vec<CustomFactorRecord>,
}

impl ViolationRecord {
    /// Validated engine instance.
    ///
    /// # Errors
    ///
    /// - `EngineError::UnknownCategory` / `UnknownTier` for unrecognised names
    /// - `EngineError::InvalidInput` for non-positive revenue or factors
    pub fn to_instance(&self) -> Result<ViolationInstance, EngineError> {
        let category = ViolationCategory::from_str(&self.category)?;
        let severity = self
            .severity
            .as_deref()
            .map(SeverityTier::from_str)
            .transpose()?;
        self.custom_factors
            .iter()
            .fold(
                ViolationInstance::builder(category, self.revenue)
                    .severity_override(severity)
                    .repeat(self.is_repeat)
                    .willful(self.is_willful),
                |builder, f| builder.multiplier(f.name.clone(), f.factor),
            )
            .build()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    Many(Vec<ViolationRecord>),
    One(ViolationRecord),
}

/// Parses a JSON array of violation records, or a single record.
///
/// # Errors
///
/// `ApiError::Json` if the document matches neither shape.
pub fn parse_violation_records(json: &str) -> Result<Vec<ViolationRecord>, ApiError> {
    Ok(match serde_json::from_str(json)? {
        OneOrMany::Many(records) => records,
        OneOrMany::One(record) => vec![record],
    })
}

/// One-off and recurring amounts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AmountsRecord {
    /// One-off amounts
    pub one_time: Vec<Money>,
    /// Per-period amounts; the last value repeats to the horizon
    pub recurring: Vec<Money>,
}

/// Expected penalty avoided by the investment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AvoidedPenaltyRecord {
    /// Penalty amount, typically a capped cumulative total
    pub amount: Money,
    /// Probability of the penalty in any one period
    pub annual_probability: Decimal,
}

/// Probability distribution of one uncertain input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DistributionRecord {
    /// Constant
    Fixed {
        /// The value
        value: Decimal,
    },
    /// Triangular
    Triangular {
        /// Lower bound
        min: Decimal,
        /// Mode
        mode: Decimal,
        /// Upper bound
        max: Decimal,
    },
    /// Uniform
    Uniform {
        /// Lower bound
        min: Decimal,
        /// Upper bound
        max: Decimal,
    },
    /// Normal
    Normal {
        /// Mean
        mean: Decimal,
        /// Standard deviation
        std_dev: Decimal,
    },
}

impl From<DistributionRecord> for VariableDistribution {
    fn from(record: DistributionRecord) -> Self {
        match record {
            DistributionRecord::Fixed { value } => Self::Fixed { value },
            DistributionRecord::Triangular { min, mode, max } => Self::Triangular { min, mode, max },
            DistributionRecord::Uniform { min, max } => Self::Uniform { min, max },
            DistributionRecord::Normal { mean, std_dev } => Self::Normal { mean, std_dev },
        }
    }
}

/// Distributions of the simulated inputs; absent entries take the defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DistributionsRecord {
    /// Multiplier on all benefits
    #[serde(skip_serializing_if = "Option::is_none")]
    pub benefit_multiplier: Option<DistributionRecord>,
    /// Multiplier on all costs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost_multiplier: Option<DistributionRecord>,
    /// Discount rate; the case rate when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_rate: Option<DistributionRecord>,
}

impl DistributionsRecord {
    /// Engine distributions with defaults filled in. Validation happens in
    /// the simulator, before any trial runs.
    pub fn to_distributions(&self) -> VariableDistributions {
        let defaults = VariableDistributions::default();
        VariableDistributions {
            benefit_multiplier: self
                .benefit_multiplier
                .map_or(defaults.benefit_multiplier, Into::into),
            cost_multiplier: self
                .cost_multiplier
                .map_or(defaults.cost_multiplier, Into::into),
            discount_rate: self.discount_rate.map(Into::into),
        }
    }
}

/// Per-case Monte Carlo overrides.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MonteCarloRecord {
    /// Trial count; the configured default when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n_trials: Option<usize>,
    /// Seed; the configured default when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

/// Investment case: `{discount_rate, horizon, costs, benefits, distributions}`.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use service_api::InvestmentCaseRecord;
///
/// let record: InvestmentCaseRecord = serde_json::from_str(r#"{
///     "discount_rate": 0.08,
///     "horizon": 5,
///     "costs": {"one_time": [1200000], "recurring": [150000]},
///     "benefits": {"recurring": [200000]},
///     "avoided_penalty": {"amount": 2000000, "annual_probability": 0.3}
/// }"#).unwrap();
///
/// let case = record.to_case().unwrap();
/// assert_eq!(case.horizon_periods(), 5);
/// // 200,000 + 2,000,000 × 0.3
/// assert_eq!(case.recurring_benefits()[4], dec!(800_000));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InvestmentCaseRecord {
    /// Per-period discount rate
    pub discount_rate: Rate,
    /// Number of periods after period 0
    pub horizon: u32,
    /// Cost profile
    #[serde(default)]
    pub costs: AmountsRecord,
    /// Benefit profile
    #[serde(default)]
    pub benefits: AmountsRecord,
    /// Expected avoided penalty added to recurring benefits
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avoided_penalty: Option<AvoidedPenaltyRecord>,
    /// Simulation distributions
    #[serde(default)]
    pub distributions: DistributionsRecord,
    /// Simulation overrides
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monte_carlo: Option<MonteCarloRecord>,
}

impl InvestmentCaseRecord {
    /// Validated engine case, including any avoided penalty.
    ///
    /// # Errors
    ///
    /// `EngineError::InvalidInput` for an out-of-range rate or horizon, a
    /// negative amount or a probability outside `[0, 1]`.
    pub fn to_case(&self) -> Result<InvestmentCase, EngineError> {
        let case = InvestmentCase::builder(self.discount_rate, self.horizon)
            .one_time_costs(self.costs.one_time.clone())
            .recurring_costs(self.costs.recurring.clone())
            .one_time_benefits(self.benefits.one_time.clone())
            .recurring_benefits(self.benefits.recurring.clone())
            .build()?;
        match self.avoided_penalty {
            Some(p) => case.with_avoided_penalty(p.amount, p.annual_probability),
            None => Ok(case),
        }
    }
}
