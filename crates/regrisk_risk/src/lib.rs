//! # regrisk_risk: Investment Risk Analytics (L4)
//!
//! Stochastic and deterministic stress of an [`InvestmentCase`]:
//!
//! - Monte Carlo re-evaluation under uncertain benefit/cost multipliers and
//!   discount rate, with a success probability (`P[NPV > 0]`)
//! - One-at-a-time sensitivity (tornado ranking)
//! - Named pessimistic / most-likely / optimistic scenarios
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                    regrisk_risk (L4)                     │
//! ├──────────────────────────────────────────────────────────┤
//! │  rng           - RiskRng, per-trial seeded streams       │
//! │  distributions - VariableDistribution, UncertainVariable │
//! │  mc/           - SimulationConfig, MonteCarloSimulator,  │
//! │                  CancellationToken, SimulationError      │
//! │  parallel      - Rayon map over trial indices            │
//! │  sensitivity   - SensitivityAnalyzer (±δ tornado)        │
//! │  scenarios/    - ScenarioSet presets, ScenarioAnalyzer   │
//! └──────────────────────────────────────────────────────────┘
//!          ↓
//! ┌──────────────────────────────────────────────────────────┐
//! │  regrisk_finance (L3): CashFlowBuilder, FinancialMetrics │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism
//!
//! Trial `i` draws from its own generator seeded from `(seed, i)`, so a
//! simulation is bit-identical across runs and independent of how Rayon
//! schedules trials onto threads.
//!
//! ## Example
//!
//! ```
//! use regrisk_finance::InvestmentCase;
//! use regrisk_risk::{MonteCarloSimulator, SimulationConfig, VariableDistributions};
//! use rust_decimal_macros::dec;
//!
//! let case = InvestmentCase::builder(dec!(0.08), 5)
//!     .one_time_cost(dec!(1_000_000))
//!     .recurring_benefits(vec![dec!(400_000)])
//!     .build()
//!     .unwrap();
//!
//! let config = SimulationConfig::builder().n_trials(500).seed(7).build().unwrap();
//! let result = MonteCarloSimulator::new(config)
//!     .simulate(&case, &VariableDistributions::default())
//!     .unwrap();
//!
//! assert_eq!(result.completed_trials, 500);
//! assert!(result.probability_npv_positive > 0.5);
//! ```
//!
//! [`InvestmentCase`]: regrisk_finance::InvestmentCase

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod distributions;
pub mod mc;
pub mod parallel;
pub mod rng;
pub mod scenarios;
pub mod sensitivity;

pub use distributions::{UncertainVariable, VariableDistribution, VariableDistributions};
pub use mc::{
    CancellationToken, MonteCarloSimulator, SimulationConfig, SimulationConfigBuilder,
    SimulationError, SimulationResult,
};
pub use parallel::ParallelConfig;
pub use rng::RiskRng;
pub use scenarios::{ScenarioAnalyzer, ScenarioKind, ScenarioPreset, ScenarioResult, ScenarioSet};
pub use sensitivity::{SensitivityAnalyzer, SensitivityEntry, SensitivityVariable};
