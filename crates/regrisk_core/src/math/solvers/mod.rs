//! Root-finding solvers for numerical computation.
//!
//! The engine needs exactly one root-finding capability: locating the
//! internal rate of return, i.e. the discount rate at which a cash-flow
//! series has zero present value. NPV is not monotone in the rate for
//! non-conventional cash flows, so the solver works on explicit brackets:
//!
//! 1. [`find_sign_change`] scans a grid and returns the first sub-interval
//!    whose endpoints have opposite signs.
//! 2. [`BrentSolver`] refines that bracket to the configured tolerance.
//!
//! ## Configuration
//!
//! [`SolverConfig`] holds the stopping rule: a residual/bracket tolerance
//! (default 1e-10) and an iteration budget (default 100).
//!
//! ## Examples
//!
//! ```
//! use regrisk_core::math::solvers::{find_sign_change, BrentSolver, SolverConfig};
//!
//! // -100 today, +110 in one period: IRR = 10%
//! let npv = |r: f64| -100.0 + 110.0 / (1.0 + r);
//! let grid: Vec<f64> = (0..=20).map(|i| -0.5 + i as f64 * 0.1).collect();
//!
//! let (lo, hi) = find_sign_change(npv, &grid).unwrap();
//! let solver = BrentSolver::new(SolverConfig::default());
//! let irr = solver.find_root(npv, lo, hi).unwrap();
//! assert!((irr - 0.10).abs() < 1e-10);
//! ```

mod brent;
mod config;

pub use brent::{find_sign_change, BrentSolver};
pub use config::SolverConfig;
