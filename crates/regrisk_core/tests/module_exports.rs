//! Integration tests for module exports.
//!
//! Verify that public modules and types are reachable via absolute paths.

use rust_decimal_macros::dec;

/// Money helpers are accessible via the types module.
#[test]
fn test_types_module_exports() {
    use regrisk_core::types::{
        discount_factor, ensure_positive, percentage_of, EngineError, Money, Rate,
    };

    let revenue: Money = dec!(100_000_000);
    let rate: Rate = dec!(0.02);
    assert_eq!(revenue * rate, dec!(2_000_000));
    assert_eq!(percentage_of(dec!(2_000_000), revenue).unwrap(), dec!(2));
    assert_eq!(discount_factor(dec!(0.1), 1).unwrap(), dec!(1.1));
    assert!(matches!(
        ensure_positive(dec!(0), "annual_revenue"),
        Err(EngineError::InvalidInput(_))
    ));
}

/// Solvers are accessible via the math module.
#[test]
fn test_solver_module_exports() {
    use regrisk_core::math::solvers::{find_sign_change, BrentSolver, SolverConfig};
    use regrisk_core::types::SolverError;

    let solver: BrentSolver<f64> = BrentSolver::new(SolverConfig::default());
    let root = solver.find_root(|x| x - 0.25, 0.0, 1.0).unwrap();
    assert!((root - 0.25).abs() < 1e-10);

    let grid = [0.0, 1.0];
    assert!(find_sign_change(|x: f64| x + 1.0, &grid).is_none());

    let err = solver.find_root(|x: f64| x + 1.0, 0.0, 1.0).unwrap_err();
    assert!(matches!(err, SolverError::NoBracket { .. }));
}

/// Statistics are accessible via the math module.
#[test]
fn test_statistics_module_exports() {
    use regrisk_core::math::statistics::{histogram, mean, std_dev, Percentiles};

    let sorted = vec![dec!(1), dec!(2), dec!(3)];
    let p = Percentiles::from_sorted(&sorted).unwrap();
    assert_eq!(p.p50, dec!(2));
    assert_eq!(mean(&sorted), Some(dec!(2)));
    assert!((std_dev(&sorted).unwrap() - dec!(1)).abs() < dec!(0.0000001));
    assert_eq!(histogram(&sorted, 2).unwrap().total(), 3);
}
