//! Analyze command implementation
//!
//! Runs the deterministic, Monte Carlo, sensitivity and scenario analyses
//! for one investment case.

use std::io::Write;
use std::path::Path;

use service_api::{InvestmentCaseRecord, MonteCarloRecord, RiskEngine};
use tracing::info;

use super::read_input;
use crate::output::{render_analysis, OutputFormat};
use crate::Result;

/// Run the analyze command
///
/// `trials` and `seed` take precedence over the case file and the
/// configuration.
pub fn run<W: Write>(
    engine: &RiskEngine,
    input: &Path,
    trials: Option<usize>,
    seed: Option<u64>,
    format: OutputFormat,
    out: &mut W,
) -> Result<()> {
    let mut record: InvestmentCaseRecord = serde_json::from_str(&read_input(input)?)?;
    let from_file = record.monte_carlo.unwrap_or_default();
    record.monte_carlo = Some(MonteCarloRecord {
        n_trials: trials.or(from_file.n_trials),
        seed: seed.or(from_file.seed),
    });
    info!(input = %input.display(), horizon = record.horizon, "analysing investment case");

    let report = engine.analyze_investment(&record)?;
    render_analysis(out, format, &report)
}
