//! Penalty schedule registry.

use super::{PenaltyParameters, SeverityTier};
use regrisk_core::types::EngineError;
use rust_decimal_macros::dec;
use std::collections::BTreeMap;

/// Validated total map from [`SeverityTier`] to [`PenaltyParameters`].
///
/// The registry is an ordinary value: construct it once (from the standard
/// table or from configuration) and pass it into the
/// [`PenaltyCalculator`](crate::PenaltyCalculator). Construction fails if
/// any tier is missing or duplicated, so lookups on a built registry cannot
/// miss for the closed tier enum.
///
/// # Standard schedule
///
/// | Tier | base_fine | revenue_fraction | min_fine | max_fine |
/// |---|---|---|---|---|
/// | minor | 10,000 | 0.001 | 5,000 | 500,000 |
/// | moderate | 50,000 | 0.005 | 25,000 | 2,000,000 |
/// | major | 200,000 | 0.010 | 50,000 | 5,000,000 |
/// | critical | 1,000,000 | 0.020 | 100,000 | 10,000,000 |
///
/// # Examples
///
/// ```
/// use regrisk_penalty::{PenaltyScheduleRegistry, SeverityTier};
/// use rust_decimal_macros::dec;
///
/// let registry = PenaltyScheduleRegistry::standard();
/// let params = registry.parameters(SeverityTier::Critical).unwrap();
/// assert_eq!(params.max_fine(), dec!(10_000_000));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PenaltyScheduleRegistry {
    entries: BTreeMap<SeverityTier, PenaltyParameters>,
}

impl Default for PenaltyScheduleRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

impl PenaltyScheduleRegistry {
    /// The standard schedule shown in the type-level documentation.
    pub fn standard() -> Self {
        let rows = [
            (SeverityTier::Minor, standard_row(dec!(10_000), dec!(0.001), dec!(5_000), dec!(500_000))),
            (SeverityTier::Moderate, standard_row(dec!(50_000), dec!(0.005), dec!(25_000), dec!(2_000_000))),
            (SeverityTier::Major, standard_row(dec!(200_000), dec!(0.010), dec!(50_000), dec!(5_000_000))),
            (SeverityTier::Critical, standard_row(dec!(1_000_000), dec!(0.020), dec!(100_000), dec!(10_000_000))),
        ];
        Self {
            entries: rows.into_iter().collect(),
        }
    }

    /// Builds a registry from explicit rows.
    ///
    /// # Errors
    ///
    /// `EngineError::InvalidInput` if a tier appears twice or is missing.
    pub fn from_entries(
        entries: impl IntoIterator<Item = (SeverityTier, PenaltyParameters)>,
    ) -> Result<Self, EngineError> {
        let mut map = BTreeMap::new();
        for (tier, params) in entries {
            if map.insert(tier, params).is_some() {
                return Err(EngineError::InvalidInput(format!(
                    "penalty schedule lists tier '{}' more than once",
                    tier
                )));
            }
        }
        if let Some(missing) = SeverityTier::ALL.iter().find(|t| !map.contains_key(*t)) {
            return Err(EngineError::InvalidInput(format!(
                "penalty schedule has no entry for tier '{}'",
                missing
            )));
        }
        Ok(Self { entries: map })
    }

    /// Looks up the parameters for a tier.
    ///
    /// # Errors
    ///
    /// `EngineError::UnknownTier` if the tier is not registered.
    pub fn parameters(&self, tier: SeverityTier) -> Result<&PenaltyParameters, EngineError> {
        self.entries
            .get(&tier)
            .ok_or_else(|| EngineError::UnknownTier(tier.to_string()))
    }

    /// Iterates rows in ascending tier order.
    pub fn iter(&self) -> impl Iterator<Item = (SeverityTier, &PenaltyParameters)> {
        self.entries.iter().map(|(tier, params)| (*tier, params))
    }
}

/// Rows of the standard table satisfy the parameter invariants by inspection.
fn standard_row(
    base_fine: rust_decimal::Decimal,
    revenue_fraction: rust_decimal::Decimal,
    min_fine: rust_decimal::Decimal,
    max_fine: rust_decimal::Decimal,
) -> PenaltyParameters {
    match PenaltyParameters::new(base_fine, revenue_fraction, min_fine, max_fine) {
        Ok(params) => params,
        Err(err) => unreachable!("standard penalty schedule is invalid: {}", err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_covers_every_tier() {
        let registry = PenaltyScheduleRegistry::standard();
        for tier in SeverityTier::ALL {
            assert!(registry.parameters(tier).is_ok(), "missing {}", tier);
        }
        assert_eq!(registry.iter().count(), 4);
    }

    #[test]
    fn test_standard_values() {
        let registry = PenaltyScheduleRegistry::default();
        let minor = registry.parameters(SeverityTier::Minor).unwrap();
        assert_eq!(minor.base_fine(), dec!(10_000));
        assert_eq!(minor.revenue_fraction(), dec!(0.001));
        assert_eq!(minor.min_fine(), dec!(5_000));
        assert_eq!(minor.max_fine(), dec!(500_000));

        let major = registry.parameters(SeverityTier::Major).unwrap();
        assert_eq!(major.revenue_fraction(), dec!(0.01));
        assert_eq!(major.min_fine(), dec!(50_000));
    }

    #[test]
    fn test_schedule_is_monotone_in_tier() {
        let registry = PenaltyScheduleRegistry::standard();
        let rows: Vec<_> = registry.iter().collect();
        for pair in rows.windows(2) {
            assert!(pair[0].1.max_fine() < pair[1].1.max_fine());
            assert!(pair[0].1.base_fine() < pair[1].1.base_fine());
        }
    }

    #[test]
    fn test_from_entries_requires_every_tier() {
        let standard = PenaltyScheduleRegistry::standard();
        let partial: Vec<_> = standard
            .iter()
            .filter(|(t, _)| *t != SeverityTier::Major)
            .map(|(t, p)| (t, p.clone()))
            .collect();
        let err = PenaltyScheduleRegistry::from_entries(partial).unwrap_err();
        assert!(err.to_string().contains("major"));
    }

    #[test]
    fn test_from_entries_rejects_duplicates() {
        let standard = PenaltyScheduleRegistry::standard();
        let mut rows: Vec<_> = standard.iter().map(|(t, p)| (t, p.clone())).collect();
        rows.push(rows[0].clone());
        assert!(PenaltyScheduleRegistry::from_entries(rows).is_err());
    }

    #[test]
    fn test_from_entries_round_trip() {
        let standard = PenaltyScheduleRegistry::standard();
        let rebuilt = PenaltyScheduleRegistry::from_entries(
            standard.iter().map(|(t, p)| (t, p.clone())),
        )
        .unwrap();
        assert_eq!(rebuilt, standard);
    }
}
