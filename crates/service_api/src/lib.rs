//! # service_api: Record Contracts and Engine Facade
//!
//! Boundary between the regrisk engine crates and their callers. Upstream
//! producers hand in JSON-like records; downstream reporting receives plain
//! DTOs that never expose engine types.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │ ViolationRecord / InvestmentCaseRecord  (serde, JSON)    │
//! └────────────────────────────┬─────────────────────────────┘
//!                              │ to_instance / to_case
//! ┌────────────────────────────▼─────────────────────────────┐
//! │ RiskEngine  (built from EngineConfig: TOML + REGRISK_*)  │
//! │   calculate_penalty · aggregate_penalties                │
//! │   analyze_investment[_with_cancellation]                 │
//! └────────────────────────────┬─────────────────────────────┘
//!                              │ From<&EngineResult>
//! ┌────────────────────────────▼─────────────────────────────┐
//! │ PenaltyReport · CumulativeReport · InvestmentAnalysis…   │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```
//! use service_api::{EngineConfig, RiskEngine, parse_violation_records};
//! use rust_decimal_macros::dec;
//!
//! let engine = RiskEngine::new(EngineConfig::default()).unwrap();
//! let records = parse_violation_records(r#"[
//!     {"category": "incident_non_reporting", "revenue": 100000000},
//!     {"category": "incident_non_reporting", "revenue": 100000000, "is_repeat": true}
//! ]"#).unwrap();
//!
//! let report = engine.aggregate_penalties(&records, dec!(100_000_000)).unwrap();
//! assert_eq!(report.uncapped_total, dec!(6_000_000));
//! assert_eq!(report.capped_total, dec!(2_000_000));
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod config;
pub mod engine;
pub mod error;
pub mod records;
pub mod reports;

pub use config::{ConfigError, EngineConfig, LogLevel};
pub use engine::RiskEngine;
pub use error::ApiError;
pub use records::{
    parse_violation_records, AmountsRecord, AvoidedPenaltyRecord, CustomFactorRecord,
    DistributionRecord, DistributionsRecord, InvestmentCaseRecord, MonteCarloRecord,
    ViolationRecord,
};
pub use reports::{
    CashFlowPoint, CumulativeReport, FinancialReport, HistogramBin, InvestmentAnalysisReport,
    MonteCarloReport, MultiplierReport, PenaltyReport, ScenarioReport, SensitivityReport,
};
pub use regrisk_risk::CancellationToken;
