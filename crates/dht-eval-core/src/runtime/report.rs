// crates/dht-eval-core/src/runtime/report.rs
// ============================================================================
// Module: DHT Eval Report Facets
// Description: Faceted series derived from a client-level result table.
// Purpose: Shape comparison data for chart renderers.
// Dependencies: crate::core, serde
// ============================================================================

//! ## Overview
//! Comparison charts hold one variable fixed per panel. A latency-fixed layout
//! draws one panel per RTT latency with node count on the x-axis; a
//! nodes-fixed layout draws one panel per node count with RTT latency on the
//! x-axis. Every panel carries four series: median and high-percentile store
//! and get latency. Rendering is left to external tools.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;

use crate::core::AggregatedRow;
use crate::core::ResultTable;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Layout name for panels with fixed latency.
pub const LATENCY_FIXED_LAYOUT: &str = "local_latency_fixed";
/// Layout name for panels with fixed node count.
pub const NODES_FIXED_LAYOUT: &str = "local_nodes_fixed";
/// Shared y-axis label.
const Y_LABEL: &str = "time in milliseconds [ms]";
/// X-axis label when node count varies.
const NODES_AXIS_LABEL: &str = "number of nodes";
/// X-axis label when latency varies.
const LATENCY_AXIS_LABEL: &str = "RTT-latency [ms]";

// ============================================================================
// SECTION: Facet Types
// ============================================================================

/// One plotted line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FacetSeries {
    /// Legend label.
    pub label: String,
    /// Y values, aligned with the panel's x values.
    pub values: Vec<f64>,
}

/// One chart panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FacetPanel {
    /// Panel title.
    pub title: String,
    /// Value of the variable held fixed in this panel.
    pub fixed_value: u32,
    /// X-axis label.
    pub x_label: String,
    /// X values in ascending order.
    pub x: Vec<u32>,
    /// Plotted series.
    pub series: Vec<FacetSeries>,
}

/// A named group of panels rendered as one document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FacetLayout {
    /// Document name (without extension).
    pub name: String,
    /// Y-axis label shared by every panel.
    pub y_label: String,
    /// Panels in layout order.
    pub panels: Vec<FacetPanel>,
}

// ============================================================================
// SECTION: Layout Builders
// ============================================================================

/// Builds one panel per latency, with node count on the x-axis.
#[must_use]
pub fn latency_fixed_layout(table: &ResultTable, latencies: &[u32]) -> FacetLayout {
    let panels = latencies
        .iter()
        .map(|&latency| {
            let rows: Vec<&AggregatedRow> =
                table.rows().iter().filter(|row| row.key.latency == latency).collect();
            build_panel(
                format!("{latency}ms-rtt-latency client times"),
                latency,
                NODES_AXIS_LABEL,
                &rows,
                |row| row.key.num_nodes,
                table,
            )
        })
        .collect();
    FacetLayout {
        name: LATENCY_FIXED_LAYOUT.to_string(),
        y_label: Y_LABEL.to_string(),
        panels,
    }
}

/// Builds one panel per node count, with latency on the x-axis.
#[must_use]
pub fn nodes_fixed_layout(table: &ResultTable, nodes: &[u32]) -> FacetLayout {
    let panels = nodes
        .iter()
        .map(|&num_nodes| {
            let rows: Vec<&AggregatedRow> =
                table.rows().iter().filter(|row| row.key.num_nodes == num_nodes).collect();
            build_panel(
                format!("{num_nodes}-nodes client times"),
                num_nodes,
                LATENCY_AXIS_LABEL,
                &rows,
                |row| row.key.latency,
                table,
            )
        })
        .collect();
    FacetLayout {
        name: NODES_FIXED_LAYOUT.to_string(),
        y_label: Y_LABEL.to_string(),
        panels,
    }
}

/// Builds a panel from rows already in ascending x order.
fn build_panel(
    title: String,
    fixed_value: u32,
    x_label: &str,
    rows: &[&AggregatedRow],
    x_of: impl Fn(&AggregatedRow) -> u32,
    table: &ResultTable,
) -> FacetPanel {
    let rank = table.rows().first().map(|row| row.percentile);
    let upper_label = rank.map_or_else(|| "upper percentile".to_string(), ordinal_percentile);
    let column = |select: &dyn Fn(&AggregatedRow) -> Option<f64>| -> Vec<f64> {
        rows.iter().map(|row| select(row).unwrap_or(f64::NAN)).collect()
    };
    let series = vec![
        FacetSeries {
            label: "median store".to_string(),
            values: column(&|row: &AggregatedRow| row.median_of("store")),
        },
        FacetSeries {
            label: "median get".to_string(),
            values: column(&|row: &AggregatedRow| row.median_of("get")),
        },
        FacetSeries {
            label: format!("{upper_label} store"),
            values: column(&|row: &AggregatedRow| row.upper_of("store")),
        },
        FacetSeries {
            label: format!("{upper_label} get"),
            values: column(&|row: &AggregatedRow| row.upper_of("get")),
        },
    ];
    FacetPanel {
        title,
        fixed_value,
        x_label: x_label.to_string(),
        x: rows.iter().map(|row| x_of(row)).collect(),
        series,
    }
}

/// Formats a percentile rank as an English ordinal ("99th percentile").
fn ordinal_percentile(rank: f64) -> String {
    if rank.fract() != 0.0 || !(0.0 ..= 100.0).contains(&rank) {
        return format!("{rank}th percentile");
    }
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "rank is a whole number within [0, 100]."
    )]
    let whole = rank as u32;
    let suffix = match (whole % 10, whole % 100) {
        (_, 11 ..= 13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{whole}{suffix} percentile")
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::ordinal_percentile;

    #[test]
    fn ordinal_percentile_uses_english_suffixes() {
        assert_eq!(ordinal_percentile(99.0), "99th percentile");
        assert_eq!(ordinal_percentile(91.0), "91st percentile");
        assert_eq!(ordinal_percentile(92.0), "92nd percentile");
        assert_eq!(ordinal_percentile(11.0), "11th percentile");
        assert_eq!(ordinal_percentile(99.5), "99.5th percentile");
    }
}
