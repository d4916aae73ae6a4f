//! Properties of the cash-flow builder and DCF metrics
//!
//! - every built series has `horizon + 1` periods
//! - IRR of a conventional investment exists and zeroes the NPV
//! - any reported IRR zeroes the NPV, whatever the sign pattern
//! - payback, when defined, lies inside the horizon
//! - NPV is non-decreasing in the benefit scale factor

use proptest::prelude::*;
use regrisk_core::types::to_f64;
use regrisk_finance::{
    CaseAdjustment, CashFlow, CashFlowBuilder, FinancialMetrics, InvestmentCase,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn amount() -> impl Strategy<Value = Decimal> {
    (0i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

fn case_strategy() -> impl Strategy<Value = InvestmentCase> {
    (
        1i64..99i64,
        1u32..25u32,
        prop::collection::vec(amount(), 0..3),
        prop::collection::vec(amount(), 0..6),
        prop::collection::vec(amount(), 0..2),
        prop::collection::vec(amount(), 0..6),
    )
        .prop_map(|(rate_pct, horizon, otc, rc, otb, rb)| {
            InvestmentCase::builder(Decimal::new(rate_pct, 2), horizon)
                .one_time_costs(otc)
                .recurring_costs(rc)
                .one_time_benefits(otb)
                .recurring_benefits(rb)
                .build()
                .unwrap()
        })
}

/// One outlay recovered at least once over the horizon: IRR is non-negative.
fn conventional_case_strategy() -> impl Strategy<Value = InvestmentCase> {
    (1_000i64..10_000_000i64, 1u32..20u32, 100i64..300i64, 1i64..99i64).prop_map(
        |(outlay, horizon, recovery_pct, rate_pct)| {
            let per_period = Decimal::from(outlay) * Decimal::new(recovery_pct, 2)
                / Decimal::from(horizon);
            InvestmentCase::builder(Decimal::new(rate_pct, 2), horizon)
                .one_time_cost(Decimal::from(outlay))
                .recurring_benefits(vec![per_period])
                .build()
                .unwrap()
        },
    )
}

/// Arbitrary series with at least one inflow and one outflow.
fn sign_changing_flows() -> impl Strategy<Value = Vec<Decimal>> {
    prop::collection::vec(-1_000_000i64..1_000_000i64, 2..8)
        .prop_filter("needs an inflow and an outflow", |v| {
            v.iter().any(|x| *x > 0) && v.iter().any(|x| *x < 0)
        })
        .prop_map(|v| v.into_iter().map(Decimal::from).collect())
}

fn assert_irr_zeroes_npv(
    metrics: &FinancialMetrics,
    cf: &CashFlow,
    irr: Decimal,
) -> Result<(), TestCaseError> {
    let npv = metrics.npv(cf, irr).unwrap();
    let scale: Decimal = cf.net_amounts().map(|a| a.abs()).sum();
    prop_assert!(
        npv.abs() <= scale * dec!(0.000001),
        "npv {} at irr {}",
        npv,
        irr
    );
    Ok(())
}

// =============================================================================
// Worked example
// =============================================================================

#[test]
fn test_compliance_programme_case() {
    // 1.2m implementation, 150k/yr running cost, 2m capped exposure at 30%
    // enforcement probability plus 200k/yr operational savings
    let case = InvestmentCase::builder(dec!(0.08), 5)
        .one_time_cost(dec!(1_200_000))
        .recurring_costs(vec![dec!(150_000)])
        .recurring_benefits(vec![dec!(200_000)])
        .build()
        .unwrap()
        .with_avoided_penalty(dec!(2_000_000), dec!(0.30))
        .unwrap();

    let cash_flow = CashFlowBuilder::new().build(&case);
    let net: Vec<_> = cash_flow.net_amounts().collect();
    assert_eq!(net[0], dec!(-1_200_000));
    assert!(net[1..].iter().all(|n| *n == dec!(650_000)));

    let result = FinancialMetrics::default()
        .evaluate(&cash_flow, case.discount_rate())
        .unwrap();

    // 650k × annuity(8%, 5) = 2,595,261.52...
    assert!((result.npv - dec!(1_395_261.52)).abs() < dec!(0.01));
    // 1 + 550k / 650k
    assert_eq!(result.payback_period, Some(dec!(1) + dec!(550_000) / dec!(650_000)));
    let irr = to_f64(result.irr.unwrap());
    assert!((irr - 0.46002).abs() < 1e-4, "irr = {}", irr);
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn test_length_is_horizon_plus_one(case in case_strategy(), at_zero in any::<bool>()) {
        let cf = CashFlowBuilder::new().with_benefits_at_period_zero(at_zero).build(&case);
        prop_assert_eq!(cf.len(), case.horizon_periods() as usize + 1);
    }

    #[test]
    fn test_timing_flag_preserves_undiscounted_total(case in case_strategy()) {
        let later = CashFlowBuilder::new().build(&case);
        let sooner = CashFlowBuilder::new().with_benefits_at_period_zero(true).build(&case);
        let sum = |cf: &regrisk_finance::CashFlow| cf.net_amounts().sum::<Decimal>();
        prop_assert_eq!(sum(&later), sum(&sooner));
    }

    #[test]
    fn test_irr_zeroes_npv(case in conventional_case_strategy()) {
        let metrics = FinancialMetrics::default();
        let cf = CashFlowBuilder::new().build(&case);
        let irr = metrics.irr(&cf);
        prop_assert!(irr.is_some());
        assert_irr_zeroes_npv(&metrics, &cf, irr.unwrap())?;
    }

    #[test]
    fn test_any_reported_irr_zeroes_npv(flows in sign_changing_flows()) {
        let metrics = FinancialMetrics::default();
        let cf = CashFlow::from_net_amounts(flows).unwrap();
        if let Some(irr) = metrics.irr(&cf) {
            prop_assert!(irr > dec!(-1));
            assert_irr_zeroes_npv(&metrics, &cf, irr)?;
        }
    }

    #[test]
    fn test_payback_within_horizon(case in case_strategy()) {
        let metrics = FinancialMetrics::default();
        let cf = CashFlowBuilder::new().build(&case);
        if let Some(p) = metrics.payback_period(&cf) {
            prop_assert!(p >= Decimal::ZERO);
            prop_assert!(p <= Decimal::from(case.horizon_periods()));
        }
    }

    #[test]
    fn test_npv_monotone_in_benefit_scaling(
        case in case_strategy(),
        low in 0i64..100i64,
        bump in 0i64..100i64,
    ) {
        let metrics = FinancialMetrics::default();
        let npv_at = |factor: Decimal| {
            let scaled = case.adjusted(&CaseAdjustment::uniform(factor, Decimal::ONE)).unwrap();
            metrics
                .npv(&CashFlowBuilder::new().build(&scaled), case.discount_rate())
                .unwrap()
        };
        let lo = Decimal::new(low, 2);
        let hi = Decimal::new(low + bump, 2);
        prop_assert!(npv_at(lo) <= npv_at(hi));
    }
}
