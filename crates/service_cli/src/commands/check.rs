//! Check command implementation
//!
//! Prints the effective configuration, the penalty schedule and the
//! category defaults, after validation.

use std::io::Write;

use regrisk_penalty::{ViolationCategory, ViolationClassifier};
use service_api::EngineConfig;
use tracing::info;

use crate::output::write_table;
use crate::Result;

/// Run the check command
pub fn run<W: Write>(config: &EngineConfig, out: &mut W) -> Result<()> {
    config.validate()?;
    let registry = config.registry()?;
    info!("configuration valid");

    writeln!(out, "effective configuration")?;
    writeln!(out, "{}", config.to_toml_string()?)?;

    writeln!(out, "penalty schedule")?;
    let rows: Vec<Vec<String>> = registry
        .iter()
        .map(|(tier, params)| {
            vec![
                tier.to_string(),
                params.base_fine().to_string(),
                params.revenue_fraction().to_string(),
                params.min_fine().to_string(),
                params.max_fine().to_string(),
                params.repeat_multiplier().to_string(),
                params.willful_multiplier().to_string(),
            ]
        })
        .collect();
    write_table(
        out,
        &[
            "tier",
            "base_fine",
            "revenue_fraction",
            "min_fine",
            "max_fine",
            "repeat",
            "willful",
        ],
        &rows,
    )?;

    writeln!(out, "violation categories")?;
    let classifier = ViolationClassifier::standard();
    let rows: Vec<Vec<String>> = ViolationCategory::ALL
        .iter()
        .map(|category| {
            vec![
                category.to_string(),
                classifier.default_severity(*category).to_string(),
                category.description().to_string(),
            ]
        })
        .collect();
    write_table(out, &["category", "default_tier", "description"], &rows)?;

    writeln!(out, "configuration OK")?;
    Ok(())
}
