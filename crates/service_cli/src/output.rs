//! Report rendering: JSON, box-drawn tables and CSV.

use clap::ValueEnum;
use rust_decimal::Decimal;
use serde::Serialize;
use service_api::{CumulativeReport, InvestmentAnalysisReport, PenaltyReport};
use std::io::Write;

use crate::Result;

/// Output format shared by every command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON report
    Json,
    /// Human-readable tables
    Table,
    /// Comma-separated sections
    Csv,
}

fn money(value: Decimal) -> String {
    format!("{:.2}", value)
}

fn ratio(value: Option<Decimal>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{:.4}", v))
}

fn write_json<W: Write, T: Serialize>(out: &mut W, report: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, report)?;
    writeln!(out)?;
    Ok(())
}

fn rule(widths: &[usize], left: &str, mid: &str, right: &str) -> String {
    let segments: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
    format!("{}{}{}", left, segments.join(mid), right)
}

fn table_line(widths: &[usize], cells: &[&str]) -> String {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(c, w)| format!(" {:<width$} ", c, width = *w))
        .collect();
    format!("│{}│", padded.join("│"))
}

/// Writes a box-drawn table.
pub(crate) fn write_table<W: Write>(out: &mut W, headers: &[&str], rows: &[Vec<String>]) -> Result<()> {
    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            rows.iter()
                .filter_map(|r| r.get(i))
                .map(|c| c.chars().count())
                .fold(h.chars().count(), usize::max)
        })
        .collect();

    writeln!(out, "{}", rule(&widths, "┌", "┬", "┐"))?;
    writeln!(out, "{}", table_line(&widths, headers))?;
    writeln!(out, "{}", rule(&widths, "├", "┼", "┤"))?;
    for row in rows {
        let cells: Vec<&str> = row.iter().map(String::as_str).collect();
        writeln!(out, "{}", table_line(&widths, &cells))?;
    }
    writeln!(out, "{}", rule(&widths, "└", "┴", "┘"))?;
    Ok(())
}

const PENALTY_HEADERS: [&str; 8] = [
    "category",
    "severity",
    "base_fine",
    "revenue_based_fine",
    "pre_multiplier_fine",
    "multipliers",
    "final_fine",
    "pct_of_revenue",
];

fn penalty_row(report: &PenaltyReport) -> Vec<String> {
    let multipliers: Vec<String> = report
        .multipliers_applied
        .iter()
        .map(|m| format!("{}×{}", m.name, m.factor))
        .collect();
    let final_fine = if report.ceiling_applied {
        format!("{} (ceiling)", money(report.final_fine))
    } else {
        money(report.final_fine)
    };
    vec![
        report.category.clone(),
        report.severity.clone(),
        money(report.base_fine),
        money(report.revenue_based_fine),
        money(report.pre_multiplier_fine),
        multipliers.join("; "),
        final_fine,
        format!("{:.4}", report.fine_as_pct_of_revenue),
    ]
}

fn csv_writer<W: Write>(out: W) -> csv::Writer<W> {
    csv::WriterBuilder::new().flexible(true).from_writer(out)
}

/// Renders individual penalties.
pub fn render_penalties<W: Write>(
    out: &mut W,
    format: OutputFormat,
    reports: &[PenaltyReport],
) -> Result<()> {
    match format {
        OutputFormat::Json => write_json(out, &reports),
        OutputFormat::Table => {
            let rows: Vec<_> = reports.iter().map(penalty_row).collect();
            write_table(out, &PENALTY_HEADERS, &rows)
        }
        OutputFormat::Csv => {
            let mut writer = csv_writer(&mut *out);
            writer.write_record(PENALTY_HEADERS)?;
            for report in reports {
                writer.write_record(penalty_row(report))?;
            }
            writer.flush()?;
            Ok(())
        }
    }
}

/// Renders a capped cumulative penalty.
pub fn render_cumulative<W: Write>(
    out: &mut W,
    format: OutputFormat,
    report: &CumulativeReport,
) -> Result<()> {
    let summary_headers = [
        "uncapped_total",
        "statutory_cap",
        "capped_total",
        "cap_applied",
        "amount_saved_by_cap",
    ];
    let summary = vec![
        money(report.uncapped_total),
        money(report.statutory_cap),
        money(report.capped_total),
        report.cap_applied.to_string(),
        money(report.amount_saved_by_cap),
    ];
    match format {
        OutputFormat::Json => write_json(out, report),
        OutputFormat::Table => {
            let rows: Vec<_> = report.violations.iter().map(penalty_row).collect();
            write_table(out, &PENALTY_HEADERS, &rows)?;
            write_table(out, &summary_headers, &[summary])
        }
        OutputFormat::Csv => {
            let mut writer = csv_writer(&mut *out);
            writer.write_record(PENALTY_HEADERS)?;
            for violation in &report.violations {
                writer.write_record(penalty_row(violation))?;
            }
            writer.write_record(summary_headers)?;
            writer.write_record(&summary)?;
            writer.flush()?;
            Ok(())
        }
    }
}

struct AnalysisSections {
    summary: Vec<Vec<String>>,
    cash_flow: Vec<Vec<String>>,
    sensitivity: Vec<Vec<String>>,
    scenarios: Vec<Vec<String>>,
}

const SUMMARY_HEADERS: [&str; 2] = ["metric", "value"];
const CASH_FLOW_HEADERS: [&str; 5] = ["period", "benefits", "costs", "net_amount", "cumulative"];
const SENSITIVITY_HEADERS: [&str; 3] = ["variable", "low_impact_on_npv", "high_impact_on_npv"];
const SCENARIO_HEADERS: [&str; 6] = [
    "scenario",
    "benefit_multiplier",
    "cost_multiplier",
    "total_benefits",
    "total_costs",
    "npv",
];

fn analysis_sections(report: &InvestmentAnalysisReport) -> AnalysisSections {
    let f = &report.financial;
    let mc = &report.monte_carlo;
    let money_opt = |v: Option<Decimal>| v.map_or_else(|| "n/a".to_string(), money);
    let metric = |name: &str, value: String| vec![name.to_string(), value];

    let mut summary = vec![
        metric("npv", money(f.npv)),
        metric("irr", ratio(f.irr)),
        metric("payback_period", ratio(f.payback_period)),
        metric("discounted_payback_period", ratio(f.discounted_payback_period)),
        metric("roi", ratio(f.roi)),
        metric("benefit_cost_ratio", ratio(f.benefit_cost_ratio)),
        metric(
            "mc_trials",
            format!("{}/{}", mc.completed_trials, mc.n_trials),
        ),
        metric("mc_seed", mc.seed.to_string()),
        metric(
            "probability_npv_positive",
            format!("{:.4}", mc.probability_npv_positive),
        ),
        metric("npv_p5", money(mc.npv_p5)),
        metric("npv_p50", money(mc.npv_p50)),
        metric("npv_p95", money(mc.npv_p95)),
        metric("npv_mean", money_opt(mc.npv_mean)),
        metric("npv_std_dev", money_opt(mc.npv_std_dev)),
        metric("irr_p50", ratio(mc.irr_p50)),
    ];
    if mc.cancelled {
        summary.push(metric("cancelled", "true".to_string()));
    }

    AnalysisSections {
        summary,
        cash_flow: f
            .cash_flow
            .iter()
            .map(|p| {
                vec![
                    p.period.to_string(),
                    money(p.benefits),
                    money(p.costs),
                    money(p.net_amount),
                    money(p.cumulative),
                ]
            })
            .collect(),
        sensitivity: report
            .sensitivity
            .iter()
            .map(|s| {
                vec![
                    s.variable.clone(),
                    money(s.low_impact_on_npv),
                    money(s.high_impact_on_npv),
                ]
            })
            .collect(),
        scenarios: report
            .scenarios
            .iter()
            .map(|s| {
                vec![
                    s.scenario.clone(),
                    s.benefit_multiplier.to_string(),
                    s.cost_multiplier.to_string(),
                    money(s.total_benefits),
                    money(s.total_costs),
                    money(s.npv),
                ]
            })
            .collect(),
    }
}

/// Renders a full investment analysis.
pub fn render_analysis<W: Write>(
    out: &mut W,
    format: OutputFormat,
    report: &InvestmentAnalysisReport,
) -> Result<()> {
    if format == OutputFormat::Json {
        return write_json(out, report);
    }
    let sections = analysis_sections(report);
    let ordered: [(&str, &[&str], &Vec<Vec<String>>); 4] = [
        ("summary", &SUMMARY_HEADERS, &sections.summary),
        ("cash_flow", &CASH_FLOW_HEADERS, &sections.cash_flow),
        ("sensitivity", &SENSITIVITY_HEADERS, &sections.sensitivity),
        ("scenarios", &SCENARIO_HEADERS, &sections.scenarios),
    ];

    if format == OutputFormat::Table {
        for (title, headers, rows) in ordered {
            writeln!(out, "\n{}", title)?;
            write_table(out, headers, rows)?;
        }
        return Ok(());
    }

    let mut writer = csv_writer(&mut *out);
    for (_, headers, rows) in ordered {
        writer.write_record(headers)?;
        for row in rows {
            writer.write_record(row)?;
        }
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use service_api::MultiplierReport;

    fn penalty() -> PenaltyReport {
        PenaltyReport {
            category: "incident_non_reporting".to_string(),
            severity: "critical".to_string(),
            base_fine: dec!(2_000_000),
            revenue_based_fine: dec!(2_000_000),
            pre_multiplier_fine: dec!(2_000_000),
            multipliers_applied: vec![MultiplierReport {
                name: "repeat_offence".to_string(),
                factor: dec!(2),
                fine_after: dec!(4_000_000),
            }],
            final_fine: dec!(4_000_000),
            fine_as_pct_of_revenue: dec!(4),
            ceiling_applied: false,
        }
    }

    fn render(format: OutputFormat) -> String {
        let mut out = Vec::new();
        render_penalties(&mut out, format, &[penalty()]).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_table_is_aligned() {
        let table = render(OutputFormat::Table);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 5);
        let width = lines[0].chars().count();
        assert!(lines.iter().all(|l| l.chars().count() == width));
        assert!(lines[3].contains("repeat_offence×2"));
    }

    #[test]
    fn test_csv_rows() {
        let csv = render(OutputFormat::Csv);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], PENALTY_HEADERS.join(","));
        assert!(lines[1].starts_with("incident_non_reporting,critical,2000000.00,"));
        assert!(lines[1].ends_with(",4000000.00,4.0000"));
    }

    #[test]
    fn test_json_is_parseable() {
        let json = render(OutputFormat::Json);
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["final_fine"], "4000000");
    }

    #[test]
    fn test_cumulative_csv_has_summary_section() {
        let report = CumulativeReport {
            violations: vec![penalty()],
            uncapped_total: dec!(4_000_000),
            statutory_cap: dec!(2_000_000),
            capped_total: dec!(2_000_000),
            cap_applied: true,
            amount_saved_by_cap: dec!(2_000_000),
        };
        let mut out = Vec::new();
        render_cumulative(&mut out, OutputFormat::Csv, &report).unwrap();
        let csv = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[2].starts_with("uncapped_total,statutory_cap"));
        assert_eq!(lines[3], "4000000.00,2000000.00,2000000.00,true,2000000.00");
    }
}
