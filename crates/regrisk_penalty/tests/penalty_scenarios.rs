//! Penalty scenarios and properties for regrisk_penalty
//!
//! Pins the published worked examples (single critical violation, repeat,
//! repeat + willful, cumulative cap) and checks the clamping and cap
//! properties over random inputs.

use proptest::prelude::*;
use regrisk_penalty::{
    CumulativePenaltyAggregator, PenaltyCalculator, PenaltyScheduleRegistry, SeverityTier,
    ViolationCategory, ViolationInstance,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

const REVENUE: Decimal = dec!(100_000_000);

fn critical() -> regrisk_penalty::ViolationInstanceBuilder {
    ViolationInstance::builder(ViolationCategory::IncidentNonReporting, REVENUE)
}

// =============================================================================
// Worked examples
// =============================================================================

#[test]
fn test_critical_first_offence() {
    let result = PenaltyCalculator::standard()
        .calculate(&critical().build().unwrap())
        .unwrap();

    assert_eq!(result.revenue_based_fine, dec!(2_000_000));
    assert_eq!(result.pre_multiplier_fine, dec!(2_000_000));
    assert_eq!(result.final_fine, dec!(2_000_000));
    assert_eq!(result.fine_as_pct_of_revenue, dec!(2.0));
}

#[test]
fn test_critical_repeat_offence() {
    let result = PenaltyCalculator::standard()
        .calculate(&critical().repeat(true).build().unwrap())
        .unwrap();

    assert_eq!(result.final_fine, dec!(4_000_000));
    assert!(!result.ceiling_applied);
}

#[test]
fn test_critical_repeat_and_willful_hits_ceiling() {
    let result = PenaltyCalculator::standard()
        .calculate(&critical().repeat(true).willful(true).build().unwrap())
        .unwrap();

    let factors: Vec<_> = result.multipliers_applied.iter().map(|m| m.factor).collect();
    assert_eq!(factors, vec![dec!(2.0), dec!(3.0)]);
    assert_eq!(result.multipliers_applied[1].fine_after, dec!(12_000_000));
    assert_eq!(result.final_fine, dec!(10_000_000));
    assert!(result.ceiling_applied);
}

#[test]
fn test_cumulative_cap() {
    // 2,000,000 (critical) + 1,500,000 (major × 1.5) + 1,000,000 (major)
    let violations = vec![
        critical().build().unwrap(),
        ViolationInstance::builder(ViolationCategory::ThirdPartyRiskFailure, REVENUE)
            .multiplier("concentration_risk", dec!(1.5))
            .build()
            .unwrap(),
        ViolationInstance::new(ViolationCategory::GovernanceFailure, REVENUE).unwrap(),
    ];

    let result = CumulativePenaltyAggregator::standard()
        .aggregate(&violations, REVENUE)
        .unwrap();

    let fines: Vec<_> = result.individual_results.iter().map(|r| r.final_fine).collect();
    assert_eq!(fines, vec![dec!(2_000_000), dec!(1_500_000), dec!(1_000_000)]);
    assert_eq!(result.uncapped_total, dec!(4_500_000));
    assert_eq!(result.statutory_cap, dec!(2_000_000));
    assert_eq!(result.capped_total, dec!(2_000_000));
    assert!(result.cap_applied);
    assert_eq!(result.amount_saved_by_cap, dec!(2_500_000));
}

#[test]
fn test_every_category_prices_at_its_default_tier() {
    let calculator = PenaltyCalculator::standard();
    for category in ViolationCategory::ALL {
        let result = calculator
            .calculate(&ViolationInstance::new(category, REVENUE).unwrap())
            .unwrap();
        assert_eq!(
            result.severity,
            calculator.classifier().default_severity(category)
        );
    }
}

// =============================================================================
// Properties
// =============================================================================

fn revenue_strategy() -> impl Strategy<Value = Decimal> {
    // 1.00 .. 1e12 with cent precision
    (100i64..100_000_000_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

fn tier_strategy() -> impl Strategy<Value = SeverityTier> {
    prop::sample::select(SeverityTier::ALL.to_vec())
}

fn category_strategy() -> impl Strategy<Value = ViolationCategory> {
    prop::sample::select(ViolationCategory::ALL.to_vec())
}

fn violation_strategy(revenue: Decimal) -> impl Strategy<Value = ViolationInstance> {
    (
        category_strategy(),
        prop::option::of(tier_strategy()),
        any::<bool>(),
        any::<bool>(),
        prop::collection::vec(1i64..500i64, 0..3),
    )
        .prop_map(move |(category, tier, repeat, willful, factors)| {
            let mut builder = ViolationInstance::builder(category, revenue)
                .severity_override(tier)
                .repeat(repeat)
                .willful(willful);
            for (i, f) in factors.into_iter().enumerate() {
                builder = builder.multiplier(format!("factor_{}", i), Decimal::new(f, 2));
            }
            builder.build().unwrap()
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn test_unaggravated_fine_within_tier_bounds(
        revenue in revenue_strategy(),
        tier in tier_strategy(),
        category in category_strategy(),
    ) {
        let registry = PenaltyScheduleRegistry::standard();
        let params = registry.parameters(tier).unwrap();
        let violation = ViolationInstance::builder(category, revenue)
            .severity(tier)
            .build()
            .unwrap();

        let result = PenaltyCalculator::standard().calculate(&violation).unwrap();

        prop_assert!(result.final_fine >= params.min_fine());
        prop_assert!(result.final_fine <= params.max_fine());
        prop_assert_eq!(result.final_fine, result.pre_multiplier_fine);
    }

    #[test]
    fn test_aggravated_critical_never_exceeds_ceiling(
        revenue in revenue_strategy(),
        willful in any::<bool>(),
    ) {
        let violation = ViolationInstance::builder(ViolationCategory::IncidentNonReporting, revenue)
            .repeat(true)
            .willful(willful)
            .build()
            .unwrap();

        let result = PenaltyCalculator::standard().calculate(&violation).unwrap();
        prop_assert!(result.final_fine <= dec!(10_000_000));
    }

    #[test]
    fn test_capped_total_never_exceeds_cap(
        (revenue, violations) in revenue_strategy().prop_flat_map(|revenue| {
            (Just(revenue), prop::collection::vec(violation_strategy(revenue), 0..8))
        }),
        fraction_bp in 1i64..=10_000i64,
    ) {
        let fraction = Decimal::new(fraction_bp, 4);
        let result = CumulativePenaltyAggregator::standard()
            .with_max_cumulative_fraction(fraction)
            .unwrap()
            .aggregate(&violations, revenue)
            .unwrap();

        prop_assert!(result.capped_total <= revenue * fraction);
        prop_assert!(result.capped_total <= result.uncapped_total);
        prop_assert!(result.amount_saved_by_cap >= Decimal::ZERO);
        prop_assert_eq!(
            result.capped_total + result.amount_saved_by_cap,
            result.uncapped_total
        );
    }
}
