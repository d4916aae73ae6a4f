//! Penalty command implementation
//!
//! Prices each violation record on its own, without the statutory cap.

use std::io::Write;
use std::path::Path;

use service_api::{parse_violation_records, RiskEngine};
use tracing::info;

use super::read_input;
use crate::output::{render_penalties, OutputFormat};
use crate::Result;

/// Run the penalty command
pub fn run<W: Write>(
    engine: &RiskEngine,
    input: &Path,
    format: OutputFormat,
    out: &mut W,
) -> Result<()> {
    let records = parse_violation_records(&read_input(input)?)?;
    info!(input = %input.display(), violations = records.len(), "pricing violations");

    let reports = records
        .iter()
        .map(|record| engine.calculate_penalty(record))
        .collect::<std::result::Result<Vec<_>, _>>()?;
    render_penalties(out, format, &reports)
}
