//! Input-uncertainty distributions.
//!
//! Three inputs of an investment case may be uncertain:
//!
//! | Variable | Meaning | Support |
//! |---|---|---|
//! | `benefit_multiplier` | scales every benefit | `>= 0` (normal draws truncated at 0) |
//! | `cost_multiplier` | scales every cost | `>= 0` (normal draws truncated at 0) |
//! | `discount_rate` | replaces the case rate | bounded, inside `(-1, ∞)` |
//!
//! Triangular is the default shape. Parameters are validated when a
//! simulation is prepared, never mid-batch.

use crate::mc::SimulationError;
use crate::rng::RiskRng;
use regrisk_core::types::to_f64;
use rand_distr::{Normal, Triangular, Uniform};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An investment input that may be drawn at random.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UncertainVariable {
    /// Scales all benefits
    BenefitMultiplier,
    /// Scales all costs
    CostMultiplier,
    /// Per-period discount rate
    DiscountRate,
}

impl UncertainVariable {
    /// Every variable.
    pub const ALL: [UncertainVariable; 3] = [
        UncertainVariable::BenefitMultiplier,
        UncertainVariable::CostMultiplier,
        UncertainVariable::DiscountRate,
    ];

    /// Canonical snake_case name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::BenefitMultiplier => "benefit_multiplier",
            Self::CostMultiplier => "cost_multiplier",
            Self::DiscountRate => "discount_rate",
        }
    }
}

impl fmt::Display for UncertainVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for UncertainVariable {
    type Err = SimulationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalised = s.trim().to_lowercase().replace(['-', ' '], "_");
        Self::ALL
            .iter()
            .copied()
            .find(|v| v.name() == normalised)
            .ok_or_else(|| SimulationError::InvalidDistribution {
                variable: s.to_string(),
                reason: "unknown uncertain variable".to_string(),
            })
    }
}

/// Distribution of one uncertain input.
///
/// # Examples
///
/// ```
/// use regrisk_risk::{UncertainVariable, VariableDistribution};
/// use rust_decimal_macros::dec;
///
/// let ok = VariableDistribution::Triangular { min: dec!(0.8), mode: dec!(1.0), max: dec!(1.3) };
/// assert!(ok.validate(UncertainVariable::CostMultiplier).is_ok());
///
/// let bad = VariableDistribution::Triangular { min: dec!(1.2), mode: dec!(1.0), max: dec!(1.3) };
/// assert!(bad.validate(UncertainVariable::CostMultiplier).is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum VariableDistribution {
    /// Constant value
    Fixed {
        /// The value
        value: Decimal,
    },
    /// Triangular on `[min, max]` peaking at `mode`
    Triangular {
        /// Lower bound
        min: Decimal,
        /// Most likely value
        mode: Decimal,
        /// Upper bound
        max: Decimal,
    },
    /// Uniform on `[min, max]`
    Uniform {
        /// Lower bound
        min: Decimal,
        /// Upper bound
        max: Decimal,
    },
    /// Normal with the given mean and standard deviation
    Normal {
        /// Mean
        mean: Decimal,
        /// Standard deviation
        std_dev: Decimal,
    },
}

impl VariableDistribution {
    /// Triangular distribution.
    pub fn triangular(min: Decimal, mode: Decimal, max: Decimal) -> Self {
        Self::Triangular { min, mode, max }
    }

    /// Point estimate: the value, the mode, the midpoint or the mean.
    pub fn point_estimate(&self) -> Decimal {
        match *self {
            Self::Fixed { value } => value,
            Self::Triangular { mode, .. } => mode,
            Self::Uniform { min, max } => (min + max) / dec!(2),
            Self::Normal { mean, .. } => mean,
        }
    }

    /// Lower and upper bound of the support; `None` for unbounded shapes.
    pub fn support(&self) -> Option<(Decimal, Decimal)> {
        match *self {
            Self::Fixed { value } => Some((value, value)),
            Self::Triangular { min, max, .. } | Self::Uniform { min, max } => Some((min, max)),
            Self::Normal { .. } => None,
        }
    }

    /// Checks parameter ordering and the support required by `variable`.
    ///
    /// # Errors
    ///
    /// `SimulationError::InvalidDistribution` describing the first problem.
    pub fn validate(&self, variable: UncertainVariable) -> Result<(), SimulationError> {
        let invalid = |reason: String| SimulationError::InvalidDistribution {
            variable: variable.name().to_string(),
            reason,
        };

        match *self {
            Self::Triangular { min, mode, max } => {
                if min > mode || mode > max {
                    return Err(invalid(format!(
                        "triangular requires min <= mode <= max, got ({}, {}, {})",
                        min, mode, max
                    )));
                }
            }
            Self::Uniform { min, max } => {
                if min > max {
                    return Err(invalid(format!(
                        "uniform requires min <= max, got ({}, {})",
                        min, max
                    )));
                }
            }
            Self::Normal { std_dev, .. } => {
                if std_dev < Decimal::ZERO {
                    return Err(invalid(format!(
                        "normal requires std_dev >= 0, got {}",
                        std_dev
                    )));
                }
            }
            Self::Fixed { .. } => {}
        }

        match (variable, self.support()) {
            (UncertainVariable::DiscountRate, None) => Err(invalid(
                "discount rate requires a bounded distribution".to_string(),
            )),
            (UncertainVariable::DiscountRate, Some((lower, _))) if lower <= Decimal::NEGATIVE_ONE => {
                Err(invalid(format!("support must lie above -1, lower bound is {}", lower)))
            }
            (
                UncertainVariable::BenefitMultiplier | UncertainVariable::CostMultiplier,
                Some((lower, _)),
            ) if lower < Decimal::ZERO => Err(invalid(format!(
                "multiplier support must be non-negative, lower bound is {}",
                lower
            ))),
            _ => Ok(()),
        }
    }

    /// Validates and prepares a sampler.
    pub(crate) fn sampler(
        &self,
        variable: UncertainVariable,
    ) -> Result<Sampler, SimulationError> {
        self.validate(variable)?;
        let invalid = |reason: String| SimulationError::InvalidDistribution {
            variable: variable.name().to_string(),
            reason,
        };
        let kind = match *self {
            Self::Fixed { value } => SamplerKind::Fixed(to_f64(value)),
            Self::Triangular { min, mode, max } => SamplerKind::Triangular(
                Triangular::new(to_f64(min), to_f64(max), to_f64(mode))
                    .map_err(|e| invalid(e.to_string()))?,
            ),
            Self::Uniform { min, max } => {
                SamplerKind::Uniform(Uniform::new_inclusive(to_f64(min), to_f64(max)))
            }
            Self::Normal { mean, std_dev } => SamplerKind::Normal(
                Normal::new(to_f64(mean), to_f64(std_dev)).map_err(|e| invalid(e.to_string()))?,
            ),
        };
        let (lower, upper) = self.sampling_bounds().ok_or_else(|| {
            invalid("truncation bounds overflow the decimal range".to_string())
        })?;
        let lower = match variable {
            UncertainVariable::DiscountRate => lower,
            _ => lower.max(Decimal::ZERO),
        };
        Ok(Sampler {
            kind,
            lower,
            upper: upper.max(lower),
        })
    }

    /// Support, with normal shapes truncated at eight standard deviations.
    fn sampling_bounds(&self) -> Option<(Decimal, Decimal)> {
        match *self {
            Self::Normal { mean, std_dev } => {
                let width = std_dev.checked_mul(NORMAL_TRUNCATION)?;
                Some((mean.checked_sub(width)?, mean.checked_add(width)?))
            }
            _ => self.support(),
        }
    }
}

/// Normal draws are truncated at this many standard deviations.
const NORMAL_TRUNCATION: Decimal = dec!(8);

/// Prepared sampler for one variable.
///
/// Draws are taken in `f64` and converted back into the decimal range
/// `[lower, upper]`.
#[derive(Clone, Debug)]
pub(crate) struct Sampler {
    kind: SamplerKind,
    lower: Decimal,
    upper: Decimal,
}

#[derive(Clone, Debug)]
enum SamplerKind {
    Fixed(f64),
    Triangular(Triangular<f64>),
    Uniform(Uniform<f64>),
    Normal(Normal<f64>),
}

impl Sampler {
    pub(crate) fn sample(&self, rng: &mut RiskRng) -> Decimal {
        let x = match &self.kind {
            SamplerKind::Fixed(v) => *v,
            SamplerKind::Triangular(d) => rng.sample(d),
            SamplerKind::Uniform(d) => rng.sample(d),
            SamplerKind::Normal(d) => rng.sample(d),
        };
        Decimal::from_f64(x).map_or(self.lower, |v| v.clamp(self.lower, self.upper))
    }

    /// Smallest value a draw can take.
    pub(crate) fn lower(&self) -> Decimal {
        self.lower
    }

    /// Largest value a draw can take.
    pub(crate) fn upper(&self) -> Decimal {
        self.upper
    }
}

/// Distributions for every uncertain variable of a simulation.
///
/// Defaults: benefits triangular(0.7, 1.0, 1.3), costs
/// triangular(0.8, 1.0, 1.3), discount rate fixed at the case rate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VariableDistributions {
    /// Multiplier on all benefits
    pub benefit_multiplier: VariableDistribution,
    /// Multiplier on all costs
    pub cost_multiplier: VariableDistribution,
    /// Discount rate; `None` keeps the case rate
    pub discount_rate: Option<VariableDistribution>,
}

impl Default for VariableDistributions {
    fn default() -> Self {
        Self {
            benefit_multiplier: VariableDistribution::triangular(dec!(0.7), dec!(1.0), dec!(1.3)),
            cost_multiplier: VariableDistribution::triangular(dec!(0.8), dec!(1.0), dec!(1.3)),
            discount_rate: None,
        }
    }
}

impl VariableDistributions {
    /// No uncertainty: both multipliers fixed at 1, case discount rate.
    pub fn deterministic() -> Self {
        Self {
            benefit_multiplier: VariableDistribution::Fixed { value: Decimal::ONE },
            cost_multiplier: VariableDistribution::Fixed { value: Decimal::ONE },
            discount_rate: None,
        }
    }

    /// Replaces the distribution of `variable`.
    pub fn with(mut self, variable: UncertainVariable, distribution: VariableDistribution) -> Self {
        match variable {
            UncertainVariable::BenefitMultiplier => self.benefit_multiplier = distribution,
            UncertainVariable::CostMultiplier => self.cost_multiplier = distribution,
            UncertainVariable::DiscountRate => self.discount_rate = Some(distribution),
        }
        self
    }

    /// Validates every configured distribution.
    ///
    /// # Errors
    ///
    /// The first `SimulationError::InvalidDistribution` found.
    pub fn validate(&self) -> Result<(), SimulationError> {
        self.benefit_multiplier
            .validate(UncertainVariable::BenefitMultiplier)?;
        self.cost_multiplier.validate(UncertainVariable::CostMultiplier)?;
        if let Some(rate) = &self.discount_rate {
            rate.validate(UncertainVariable::DiscountRate)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_triangular_ordering() {
        let d = VariableDistribution::triangular(dec!(1), dec!(0.5), dec!(2));
        let err = d.validate(UncertainVariable::BenefitMultiplier).unwrap_err();
        assert!(err.to_string().contains("min <= mode <= max"));

        let d = VariableDistribution::triangular(dec!(0.5), dec!(2.5), dec!(2));
        assert!(d.validate(UncertainVariable::BenefitMultiplier).is_err());
    }

    #[test]
    fn test_degenerate_triangular_is_allowed() {
        let d = VariableDistribution::triangular(dec!(1), dec!(1), dec!(1));
        assert!(d.validate(UncertainVariable::CostMultiplier).is_ok());
        let mut rng = RiskRng::from_seed(1);
        let s = d.sampler(UncertainVariable::CostMultiplier).unwrap();
        assert_eq!(s.sample(&mut rng), dec!(1));
    }

    #[test]
    fn test_uniform_and_normal_validation() {
        let u = VariableDistribution::Uniform { min: dec!(2), max: dec!(1) };
        assert!(u.validate(UncertainVariable::CostMultiplier).is_err());

        let n = VariableDistribution::Normal { mean: dec!(1), std_dev: dec!(-0.1) };
        assert!(n.validate(UncertainVariable::CostMultiplier).is_err());

        let n = VariableDistribution::Normal { mean: dec!(1), std_dev: dec!(0.1) };
        assert!(n.validate(UncertainVariable::CostMultiplier).is_ok());
    }

    #[test]
    fn test_discount_rate_support() {
        let normal = VariableDistribution::Normal { mean: dec!(0.08), std_dev: dec!(0.01) };
        assert!(normal.validate(UncertainVariable::DiscountRate).is_err());

        let below = VariableDistribution::Uniform { min: dec!(-1), max: dec!(0.1) };
        assert!(below.validate(UncertainVariable::DiscountRate).is_err());

        // Negative rates above -1 are legitimate
        let negative = VariableDistribution::triangular(dec!(-0.02), dec!(0.03), dec!(0.1));
        assert!(negative.validate(UncertainVariable::DiscountRate).is_ok());
    }

    #[test]
    fn test_multiplier_support_non_negative() {
        let d = VariableDistribution::Uniform { min: dec!(-0.1), max: dec!(1) };
        let err = d.validate(UncertainVariable::BenefitMultiplier).unwrap_err();
        assert!(err.to_string().contains("benefit_multiplier"));
    }

    #[test]
    fn test_normal_multiplier_is_truncated_at_zero() {
        let d = VariableDistribution::Normal { mean: dec!(-5), std_dev: dec!(0.1) };
        let s = d.sampler(UncertainVariable::BenefitMultiplier).unwrap();
        let mut rng = RiskRng::from_seed(11);
        for _ in 0..100 {
            assert_eq!(s.sample(&mut rng), Decimal::ZERO);
        }
    }

    #[test]
    fn test_samples_stay_in_support() {
        let d = VariableDistribution::triangular(dec!(0.7), dec!(1.0), dec!(1.3));
        let s = d.sampler(UncertainVariable::BenefitMultiplier).unwrap();
        let mut rng = RiskRng::from_seed(5);
        for _ in 0..1000 {
            let x = s.sample(&mut rng);
            assert!(x >= dec!(0.7) && x <= dec!(1.3));
        }
    }

    #[test]
    fn test_normal_is_truncated_at_eight_sigma() {
        let d = VariableDistribution::Normal { mean: dec!(1), std_dev: dec!(0.1) };
        let s = d.sampler(UncertainVariable::CostMultiplier).unwrap();
        assert_eq!(s.lower(), dec!(0.2));
        assert_eq!(s.upper(), dec!(1.8));
    }

    #[test]
    fn test_point_estimates() {
        assert_eq!(VariableDistribution::Fixed { value: dec!(3) }.point_estimate(), dec!(3));
        assert_eq!(
            VariableDistribution::triangular(dec!(0), dec!(0.4), dec!(1)).point_estimate(),
            dec!(0.4)
        );
        assert_eq!(
            VariableDistribution::Uniform { min: dec!(1), max: dec!(2) }.point_estimate(),
            dec!(1.5)
        );
    }

    #[test]
    fn test_with_and_defaults() {
        let d = VariableDistributions::default();
        assert!(d.validate().is_ok());
        assert_eq!(d.discount_rate, None);

        let d = d.with(
            UncertainVariable::DiscountRate,
            VariableDistribution::triangular(dec!(0.05), dec!(0.08), dec!(0.12)),
        );
        assert!(d.discount_rate.is_some());
        assert!(d.validate().is_ok());
    }

    #[test]
    fn test_parse_variable() {
        assert_eq!(
            "Discount-Rate".parse::<UncertainVariable>().unwrap(),
            UncertainVariable::DiscountRate
        );
        assert!("volatility".parse::<UncertainVariable>().is_err());
    }
}
