//! Severity tiers.

use regrisk_core::types::EngineError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Ordinal classification of violation seriousness.
///
/// Ordering follows seriousness: `Minor < Moderate < Major < Critical`.
/// `Critical` is the only tier whose fine is re-clamped to the statutory
/// ceiling after aggravating multipliers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeverityTier {
    /// Administrative lapse with limited impact
    Minor,
    /// Material gap in a required control
    Moderate,
    /// Systemic failure of a required control
    Major,
    /// Failure with direct harm to resilience or supervision
    Critical,
}

impl SeverityTier {
    /// Every tier, in ascending seriousness.
    pub const ALL: [SeverityTier; 4] = [
        SeverityTier::Minor,
        SeverityTier::Moderate,
        SeverityTier::Major,
        SeverityTier::Critical,
    ];

    /// Canonical lower-case name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Minor => "minor",
            Self::Moderate => "moderate",
            Self::Major => "major",
            Self::Critical => "critical",
        }
    }

    /// Whether aggravated fines in this tier are re-clamped to `max_fine`.
    #[inline]
    pub fn has_hard_ceiling(&self) -> bool {
        matches!(self, Self::Critical)
    }
}

impl fmt::Display for SeverityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SeverityTier {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "minor" => Ok(Self::Minor),
            "moderate" => Ok(Self::Moderate),
            "major" => Ok(Self::Major),
            "critical" => Ok(Self::Critical),
            _ => Err(EngineError::UnknownTier(s.to_string())),
        }
    }
}
