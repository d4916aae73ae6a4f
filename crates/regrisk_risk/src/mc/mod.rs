//! Monte Carlo simulation of investment outcomes.
//!
//! Each trial draws the uncertain inputs, rebuilds the cash flow and
//! evaluates NPV and IRR. Trials share nothing, so the run is a
//! parallel map over trial indices followed by one sort-and-summarise
//! reduce.
//!
//! # Components
//!
//! - [`SimulationConfig`]: trial count, mandatory seed, histogram bins
//! - [`MonteCarloSimulator`]: validation, trial map, summary reduce
//! - [`CancellationToken`]: cooperative early exit
//! - [`SimulationError`]: configuration errors, raised before any trial

mod cancel;
mod config;
mod error;
mod simulator;

pub use cancel::CancellationToken;
pub use config::{SimulationConfig, SimulationConfigBuilder, DEFAULT_HISTOGRAM_BINS, MAX_TRIALS};
pub use error::SimulationError;
pub use simulator::{MonteCarloSimulator, SimulationResult};
