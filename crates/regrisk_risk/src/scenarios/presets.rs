//! Scenario presets.

use crate::mc::SimulationError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// The three named scenarios.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioKind {
    /// Low benefits, high costs
    Pessimistic,
    /// Point estimates
    MostLikely,
    /// High benefits, low costs
    Optimistic,
}

impl ScenarioKind {
    /// All kinds, pessimistic first.
    pub fn all() -> Vec<Self> {
        vec![Self::Pessimistic, Self::MostLikely, Self::Optimistic]
    }

    /// Get name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Pessimistic => "pessimistic",
            Self::MostLikely => "most_likely",
            Self::Optimistic => "optimistic",
        }
    }

    /// Get description.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Pessimistic => "Benefits fall short and costs overrun",
            Self::MostLikely => "Benefits and costs as estimated",
            Self::Optimistic => "Benefits exceed and costs undershoot the estimate",
        }
    }
}

/// Fixed benefit and cost multipliers for one scenario.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioPreset {
    /// Scenario kind
    pub kind: ScenarioKind,
    /// Factor on every benefit
    pub benefit_multiplier: Decimal,
    /// Factor on every cost
    pub cost_multiplier: Decimal,
}

impl ScenarioPreset {
    /// Creates a preset.
    pub fn new(kind: ScenarioKind, benefit_multiplier: Decimal, cost_multiplier: Decimal) -> Self {
        Self {
            kind,
            benefit_multiplier,
            cost_multiplier,
        }
    }
}

/// Pessimistic, most-likely and optimistic presets, validated for ordering.
///
/// # Examples
///
/// ```
/// use regrisk_risk::ScenarioSet;
/// use rust_decimal_macros::dec;
///
/// let set = ScenarioSet::default();
/// assert_eq!(set.presets()[0].benefit_multiplier, dec!(0.7));
/// assert_eq!(set.presets()[0].cost_multiplier, dec!(1.3));
///
/// // Optimistic benefits below pessimistic ones break the ordering
/// assert!(ScenarioSet::new(
///     [dec!(1.3), dec!(1.0), dec!(0.7)],
///     [dec!(1.3), dec!(1.0), dec!(0.8)],
/// )
/// .is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ScenarioSet {
    presets: [ScenarioPreset; 3],
}

impl Default for ScenarioSet {
    fn default() -> Self {
        Self::from_validated(
            [dec!(0.7), dec!(1.0), dec!(1.3)],
            [dec!(1.3), dec!(1.0), dec!(0.8)],
        )
    }
}

impl ScenarioSet {
    /// Creates a set from multipliers listed pessimistic, most likely,
    /// optimistic.
    ///
    /// # Errors
    ///
    /// `SimulationError::InvalidParameter` if a multiplier is negative,
    /// benefit multipliers decrease or cost multipliers increase.
    pub fn new(
        benefit_multipliers: [Decimal; 3],
        cost_multipliers: [Decimal; 3],
    ) -> Result<Self, SimulationError> {
        let invalid = |reason: String| SimulationError::InvalidParameter {
            name: "scenarios",
            reason,
        };
        if let Some(m) = benefit_multipliers
            .iter()
            .chain(cost_multipliers.iter())
            .find(|m| **m < Decimal::ZERO)
        {
            return Err(invalid(format!("multipliers must be non-negative, got {}", m)));
        }
        if benefit_multipliers.windows(2).any(|w| w[0] > w[1]) {
            return Err(invalid(format!(
                "benefit multipliers must be non-decreasing from pessimistic to optimistic, got {:?}",
                benefit_multipliers
            )));
        }
        if cost_multipliers.windows(2).any(|w| w[0] < w[1]) {
            return Err(invalid(format!(
                "cost multipliers must be non-increasing from pessimistic to optimistic, got {:?}",
                cost_multipliers
            )));
        }
        Ok(Self::from_validated(benefit_multipliers, cost_multipliers))
    }

    fn from_validated(benefit_multipliers: [Decimal; 3], cost_multipliers: [Decimal; 3]) -> Self {
        let kinds = [
            ScenarioKind::Pessimistic,
            ScenarioKind::MostLikely,
            ScenarioKind::Optimistic,
        ];
        let presets = [0, 1, 2]
            .map(|i| ScenarioPreset::new(kinds[i], benefit_multipliers[i], cost_multipliers[i]));
        Self { presets }
    }

    /// Presets, pessimistic first.
    #[inline]
    pub fn presets(&self) -> &[ScenarioPreset; 3] {
        &self.presets
    }

    /// The preset for `kind`.
    pub fn get(&self, kind: ScenarioKind) -> &ScenarioPreset {
        match kind {
            ScenarioKind::Pessimistic => &self.presets[0],
            ScenarioKind::MostLikely => &self.presets[1],
            ScenarioKind::Optimistic => &self.presets[2],
        }
    }
}
