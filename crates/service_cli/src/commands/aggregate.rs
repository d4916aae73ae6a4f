//! Aggregate command implementation
//!
//! Prices a set of violations of one entity and applies the statutory cap.

use std::io::Write;
use std::path::Path;

use rust_decimal::Decimal;
use service_api::{parse_violation_records, EngineConfig, RiskEngine};
use tracing::info;

use super::read_input;
use crate::output::{render_cumulative, OutputFormat};
use crate::Result;

/// Run the aggregate command
///
/// `max_fraction` overrides the configured cap fraction for this run.
pub fn run<W: Write>(
    config: &EngineConfig,
    input: &Path,
    revenue: Decimal,
    max_fraction: Option<Decimal>,
    format: OutputFormat,
    out: &mut W,
) -> Result<()> {
    let mut config = config.clone();
    if let Some(fraction) = max_fraction {
        config.max_cumulative_fraction = fraction;
    }
    let engine = RiskEngine::new(config)?;

    let records = parse_violation_records(&read_input(input)?)?;
    info!(
        input = %input.display(),
        violations = records.len(),
        revenue = %revenue,
        "aggregating violations"
    );
    let report = engine.aggregate_penalties(&records, revenue)?;
    render_cumulative(out, format, &report)
}
