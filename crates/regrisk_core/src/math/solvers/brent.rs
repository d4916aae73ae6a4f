//! Brent's method root-finding solver and bracket discovery.

use super::SolverConfig;
use crate::types::SolverError;
use num_traits::Float;

/// Returns `true` when `x` and `y` are strictly on the same side of zero.
#[inline]
fn same_sign<T: Float>(x: T, y: T) -> bool {
    (x > T::zero() && y > T::zero()) || (x < T::zero() && y < T::zero())
}

/// Scans `grid` (ascending) for the first adjacent pair where `f` changes sign.
///
/// An exact zero at a grid point counts as a sign change. Non-finite
/// evaluations are skipped, so a grid that crosses a pole of `f` does not
/// produce a spurious bracket.
///
/// Returns `None` if no sign change exists on the grid.
///
/// # Example
///
/// ```
/// use regrisk_core::math::solvers::find_sign_change;
///
/// let grid = [0.0, 1.0, 2.0, 3.0];
/// let bracket = find_sign_change(|x: f64| x - 1.5, &grid);
/// assert_eq!(bracket, Some((1.0, 2.0)));
/// ```
pub fn find_sign_change<T, F>(f: F, grid: &[T]) -> Option<(T, T)>
where
    T: Float,
    F: Fn(T) -> T,
{
    let mut previous: Option<(T, T)> = None;
    for &x in grid {
        let fx = f(x);
        if !fx.is_finite() {
            previous = None;
            continue;
        }
        if let Some((px, pfx)) = previous {
            if !same_sign(pfx, fx) {
                return Some((px, x));
            }
        }
        previous = Some((x, fx));
    }
    None
}

/// Brent's method root finder.
///
/// Combines bisection, secant steps and inverse quadratic interpolation.
/// Convergence is guaranteed for a continuous function on a valid bracket.
///
/// # Type Parameters
///
/// * `T` - Floating-point type (e.g., `f64`)
///
/// # Example
///
/// ```
/// use regrisk_core::math::solvers::{BrentSolver, SolverConfig};
///
/// let solver = BrentSolver::new(SolverConfig::default());
///
/// // Solve x³ - x - 2 = 0 in bracket [1, 2]
/// let f = |x: f64| x * x * x - x - 2.0;
///
/// let root = solver.find_root(f, 1.0, 2.0).unwrap();
/// assert!((f(root)).abs() < 1e-10);
/// ```
#[derive(Debug, Clone)]
pub struct BrentSolver<T: Float> {
    config: SolverConfig<T>,
}

impl<T: Float> BrentSolver<T> {
    /// Create a new Brent solver with the given configuration.
    pub fn new(config: SolverConfig<T>) -> Self {
        Self { config }
    }

    /// Create a solver with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(SolverConfig::default())
    }

    /// Find a root of `f` in the bracket `[a, b]`.
    ///
    /// # Returns
    ///
    /// * `Ok(x)` - Root where `|f(x)| < tolerance` or the bracket has
    ///   collapsed below tolerance
    /// * `Err(SolverError::NoBracket)` - `f(a)` and `f(b)` have the same sign
    /// * `Err(SolverError::NumericalInstability)` - `f` returned NaN/∞
    /// * `Err(SolverError::MaxIterationsExceeded)` - Failed to converge
    pub fn find_root<F>(&self, f: F, a: T, b: T) -> Result<T, SolverError>
    where
        F: Fn(T) -> T,
    {
        let two = T::one() + T::one();
        let three = two + T::one();
        let half = T::one() / two;
        let tol = self.config.tolerance;

        let mut a = a;
        let mut b = b;
        let mut fa = f(a);
        let mut fb = f(b);

        if !fa.is_finite() || !fb.is_finite() {
            return Err(SolverError::NumericalInstability(
                "objective is not finite at a bracket endpoint".to_string(),
            ));
        }
        if same_sign(fa, fb) {
            return Err(SolverError::NoBracket {
                a: a.to_f64().unwrap_or(f64::NAN),
                b: b.to_f64().unwrap_or(f64::NAN),
            });
        }

        let mut c = b;
        let mut fc = fb;
        let mut d = b - a;
        let mut e = d;

        for _ in 0..self.config.max_iterations {
            // Keep the root between b and c.
            if same_sign(fb, fc) {
                c = a;
                fc = fa;
                d = b - a;
                e = d;
            }
            // b is always the best estimate.
            if fc.abs() < fb.abs() {
                a = b;
                b = c;
                c = a;
                fa = fb;
                fb = fc;
                fc = fa;
            }

            let tol1 = two * T::epsilon() * b.abs() + half * tol;
            let xm = half * (c - b);
            if fb.abs() < tol || xm.abs() <= tol1 {
                return Ok(b);
            }

            if e.abs() >= tol1 && fa.abs() > fb.abs() {
                let s = fb / fa;
                let (mut p, mut q) = if a == c {
                    // Secant step
                    (two * xm * s, T::one() - s)
                } else {
                    // Inverse quadratic interpolation
                    let q = fa / fc;
                    let r = fb / fc;
                    (
                        s * (two * xm * q * (q - r) - (b - a) * (r - T::one())),
                        (q - T::one()) * (r - T::one()) * (s - T::one()),
                    )
                };
                if p > T::zero() {
                    q = -q;
                }
                p = p.abs();
                let min1 = three * xm * q - (tol1 * q).abs();
                let min2 = (e * q).abs();
                if two * p < min1.min(min2) {
                    e = d;
                    d = p / q;
                } else {
                    d = xm;
                    e = d;
                }
            } else {
                d = xm;
                e = d;
            }

            a = b;
            fa = fb;
            b = if d.abs() > tol1 {
                b + d
            } else if xm > T::zero() {
                b + tol1
            } else {
                b - tol1
            };
            fb = f(b);
            if !fb.is_finite() {
                return Err(SolverError::NumericalInstability(format!(
                    "objective is not finite at x = {}",
                    b.to_f64().unwrap_or(f64::NAN)
                )));
            }
        }

        Err(SolverError::MaxIterationsExceeded {
            iterations: self.config.max_iterations,
        })
    }

    /// Returns a reference to the solver configuration.
    pub fn config(&self) -> &SolverConfig<T> {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_sqrt_2() {
        let solver = BrentSolver::new(SolverConfig::default());
        let root = solver.find_root(|x: f64| x * x - 2.0, 0.0, 2.0).unwrap();
        assert!(
            (root - std::f64::consts::SQRT_2).abs() < 1e-9,
            "Expected √2, got {}",
            root
        );
    }

    #[test]
    fn test_single_period_irr() {
        let solver = BrentSolver::new(SolverConfig::default());
        let npv = |r: f64| -1000.0 + 1150.0 / (1.0 + r);
        let root = solver.find_root(npv, -0.5, 2.0).unwrap();
        assert!((root - 0.15).abs() < 1e-9);
    }

    #[test]
    fn test_annuity_irr() {
        // -1000 then 5 × 300: IRR ≈ 15.238%
        let npv = |r: f64| {
            (1..=5).fold(-1000.0, |acc, t| acc + 300.0 / (1.0 + r).powi(t))
        };
        let solver = BrentSolver::new(SolverConfig::default());
        let root = solver.find_root(npv, 0.0, 1.0).unwrap();
        assert!(npv(root).abs() < 1e-6);
        assert!((root - 0.15238).abs() < 1e-4);
    }

    #[test]
    fn test_bracket_reversed() {
        let solver = BrentSolver::new(SolverConfig::default());
        let root = solver.find_root(|x: f64| x * x - 2.0, 2.0, 0.0).unwrap();
        assert!((root - std::f64::consts::SQRT_2).abs() < 1e-9);
    }

    #[test]
    fn test_root_at_bracket_endpoint() {
        let solver = BrentSolver::new(SolverConfig::default());
        let root = solver.find_root(|x: f64| x - 1.0, 0.0, 1.0).unwrap();
        assert!((root - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_no_bracket() {
        let solver = BrentSolver::new(SolverConfig::default());
        match solver.find_root(|x: f64| x * x + 1.0, -1.0, 1.0) {
            Err(SolverError::NoBracket { a, b }) => {
                assert_eq!(a, -1.0);
                assert_eq!(b, 1.0);
            }
            other => panic!("Expected NoBracket error, got {:?}", other),
        }
    }

    #[test]
    fn test_max_iterations_exceeded() {
        let solver = BrentSolver::new(SolverConfig::new(1e-300, 2).unwrap());
        match solver.find_root(|x: f64| x.exp() - 2.0, -10.0, 10.0) {
            Err(SolverError::MaxIterationsExceeded { iterations }) => assert_eq!(iterations, 2),
            other => panic!("Expected MaxIterationsExceeded error, got {:?}", other),
        }
    }

    #[test]
    fn test_non_finite_endpoint() {
        let solver = BrentSolver::new(SolverConfig::default());
        let result = solver.find_root(|x: f64| 1.0 / x, 0.0, 1.0);
        assert!(matches!(result, Err(SolverError::NumericalInstability(_))));
    }

    #[test]
    fn test_with_f32() {
        let solver: BrentSolver<f32> = BrentSolver::with_defaults();
        let root = solver.find_root(|x: f32| x * x - 2.0, 0.0, 2.0).unwrap();
        assert!((root - std::f32::consts::SQRT_2).abs() < 1e-5);
    }

    #[test]
    fn test_find_sign_change_first_interval() {
        // Roots at 1 and 3; the first bracket wins.
        let f = |x: f64| (x - 1.0) * (x - 3.0);
        let grid: Vec<f64> = (0..=8).map(|i| i as f64 * 0.5).collect();
        let (lo, hi) = find_sign_change(f, &grid).unwrap();
        assert!(lo <= 1.0 && 1.0 <= hi);
        assert!(hi - lo <= 0.5 + 1e-12);
    }

    #[test]
    fn test_find_sign_change_none() {
        let grid = [0.0, 1.0, 2.0];
        assert_eq!(find_sign_change(|x: f64| x * x + 1.0, &grid), None);
    }

    #[test]
    fn test_find_sign_change_skips_poles() {
        // 1/(x - 1) flips sign across the pole but has no root.
        let grid = [0.0, 0.5, 1.0, 1.5, 2.0];
        assert_eq!(find_sign_change(|x: f64| 1.0 / (x - 1.0), &grid), None);
    }
}
