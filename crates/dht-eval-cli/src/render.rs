// crates/dht-eval-cli/src/render.rs
// ============================================================================
// Module: Markdown Rendering
// Description: Markdown tables for evaluation reports.
// Purpose: Human-readable `aggregate --format markdown` output.
// Dependencies: dht-eval-core
// ============================================================================

//! ## Overview
//! Renders the client-level result table and the optional detail snapshot as
//! Markdown. Values are milliseconds with three decimals.

use std::fmt::Write;

use dht_eval_core::AggregatedRow;
use dht_eval_core::EvaluationReport;

/// Renders a full report as Markdown.
pub fn report_markdown(report: &EvaluationReport) -> String {
    let mut out = String::new();
    out.push_str("# DHT benchmark results\n\n");
    let _ = writeln!(out, "Row window: {}", report.window);
    out.push_str("\nSources:\n");
    for source in &report.sources {
        let _ = writeln!(out, "- `{}`", source.display());
    }

    out.push_str("\n## Client latency [ms]\n\n");
    match report.table.rows().first() {
        Some(first) => {
            let upper = format!("p{}", first.percentile);
            out.push_str("| nodes | rtt [ms] |");
            for label in first.column_labels() {
                let _ = write!(out, " median {label} |");
            }
            for label in first.column_labels() {
                let _ = write!(out, " {upper} {label} |");
            }
            out.push('\n');
            out.push_str("|---:|---:|");
            out.push_str(&"---:|".repeat(first.column_labels().len() * 2));
            out.push('\n');
            for row in report.table.rows() {
                let _ = write!(out, "| {} | {} |", row.key.num_nodes, row.key.latency);
                push_values(&mut out, &row.median);
                push_values(&mut out, &row.upper);
                out.push('\n');
            }
        }
        None => out.push_str("No benchmark runs found.\n"),
    }

    if let Some(detail) = &report.detail {
        let _ = writeln!(out, "\n## Detail snapshot ({})", detail.key);
        push_breakdown(&mut out, "Store breakdown", &detail.store);
        push_breakdown(&mut out, "Query breakdown", &detail.query);
    }
    out
}

/// Appends a per-column breakdown table.
fn push_breakdown(out: &mut String, title: &str, row: &AggregatedRow) {
    let _ = writeln!(out, "\n### {title}\n");
    let _ = writeln!(out, "| phase | median | p{} |", row.percentile);
    out.push_str("|---|---:|---:|\n");
    for (index, label) in row.column_labels().iter().enumerate() {
        let median = row.median.get(index).copied().unwrap_or(f64::NAN);
        let upper = row.upper.get(index).copied().unwrap_or(f64::NAN);
        let _ = writeln!(out, "| {label} | {median:.3} | {upper:.3} |");
    }
}

/// Appends table cells for a value list.
fn push_values(out: &mut String, values: &[f64]) {
    for value in values {
        let _ = write!(out, " {value:.3} |");
    }
}
