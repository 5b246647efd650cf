// crates/dht-eval-core/src/runtime/merge.rs
// ============================================================================
// Module: DHT Eval Merger
// Description: Element-wise averaging of per-directory result tables.
// Purpose: Combine repeated experiment directories into one result table.
// Dependencies: crate::core, thiserror
// ============================================================================

//! ## Overview
//! Each experiment directory yields one [`ResultTable`]. A single table passes
//! through unchanged. Several tables are averaged row by row, which is only
//! meaningful when every table covers the same experiment keys; merging
//! verifies that and fails with [`MergeError::MisalignedInput`] otherwise.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::core::AggregatedRow;
use crate::core::DetailedSnapshot;
use crate::core::ExperimentKey;
use crate::core::ResultTable;
use crate::core::TableError;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Merge errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MergeError {
    /// No tables were supplied.
    #[error("no result tables to merge")]
    Empty,
    /// Two tables cover different experiment keys.
    #[error(
        "result table {table} does not match table 0 at row {position}: expected {expected}, found {found}"
    )]
    MisalignedInput {
        /// Index of the offending table.
        table: usize,
        /// First row position that differs.
        position: usize,
        /// Key of the first table at `position`.
        expected: String,
        /// Key of the offending table at `position`.
        found: String,
    },
    /// Rows for the same key disagree on query or column count.
    #[error("rows for {key} have incompatible shapes: {detail}")]
    ShapeMismatch {
        /// Key of the incompatible rows.
        key: ExperimentKey,
        /// What differed.
        detail: String,
    },
    /// A merged table violated the table invariants.
    #[error(transparent)]
    Table(#[from] TableError),
}

// ============================================================================
// SECTION: Merging
// ============================================================================

/// Merges per-directory tables into one table.
///
/// # Errors
///
/// Returns [`MergeError`] when no tables are supplied, key sets differ, or
/// rows for the same key have different shapes.
pub fn merge_tables(tables: Vec<ResultTable>) -> Result<ResultTable, MergeError> {
    let mut tables = tables.into_iter();
    let Some(first) = tables.next() else {
        return Err(MergeError::Empty);
    };
    let rest: Vec<ResultTable> = tables.collect();
    if rest.is_empty() {
        return Ok(first);
    }
    let expected = first.keys();
    for (offset, table) in rest.iter().enumerate() {
        check_alignment(&expected, &table.keys(), offset + 1)?;
    }
    let mut merged = Vec::with_capacity(first.len());
    for (position, row) in first.rows().iter().enumerate() {
        let mut group = Vec::with_capacity(rest.len() + 1);
        group.push(row);
        group.extend(rest.iter().map(|table| &table.rows()[position]));
        merged.push(mean_row(&group)?);
    }
    Ok(ResultTable::from_rows(merged)?)
}

/// Averages the detail snapshots captured in several directories.
///
/// Returns `None` when no directory captured a snapshot.
///
/// # Errors
///
/// Returns [`MergeError`] when snapshots disagree on key or shape.
pub fn merge_snapshots(
    snapshots: &[DetailedSnapshot],
) -> Result<Option<DetailedSnapshot>, MergeError> {
    let Some(first) = snapshots.first() else {
        return Ok(None);
    };
    let stores: Vec<&AggregatedRow> = snapshots.iter().map(|snapshot| &snapshot.store).collect();
    let queries: Vec<&AggregatedRow> = snapshots.iter().map(|snapshot| &snapshot.query).collect();
    Ok(Some(DetailedSnapshot {
        key: first.key,
        store: mean_row(&stores)?,
        query: mean_row(&queries)?,
    }))
}

/// Verifies that `found` lists the same keys as `expected`, in order.
fn check_alignment(
    expected: &[ExperimentKey],
    found: &[ExperimentKey],
    table: usize,
) -> Result<(), MergeError> {
    let longest = expected.len().max(found.len());
    for position in 0 .. longest {
        let left = expected.get(position);
        let right = found.get(position);
        if left != right {
            return Err(MergeError::MisalignedInput {
                table,
                position,
                expected: describe_key(left),
                found: describe_key(right),
            });
        }
    }
    Ok(())
}

/// Averages rows that share a key, query, and column count.
fn mean_row(rows: &[&AggregatedRow]) -> Result<AggregatedRow, MergeError> {
    let Some(first) = rows.first() else {
        return Err(MergeError::Empty);
    };
    let width = first.median.len();
    for row in rows {
        if row.key != first.key {
            return Err(MergeError::ShapeMismatch {
                key: first.key,
                detail: format!("paired with {}", row.key),
            });
        }
        if row.query != first.query {
            return Err(MergeError::ShapeMismatch {
                key: first.key,
                detail: format!("queries {} and {}", first.query, row.query),
            });
        }
        if row.median.len() != width || row.upper.len() != width {
            return Err(MergeError::ShapeMismatch {
                key: first.key,
                detail: format!("expected {width} columns"),
            });
        }
    }
    #[allow(clippy::cast_precision_loss, reason = "Directory counts are tiny.")]
    let count = rows.len() as f64;
    let mut median = vec![0.0; width];
    let mut upper = vec![0.0; width];
    for row in rows {
        for (total, value) in median.iter_mut().zip(&row.median) {
            *total += value;
        }
        for (total, value) in upper.iter_mut().zip(&row.upper) {
            *total += value;
        }
    }
    for total in median.iter_mut().chain(upper.iter_mut()) {
        *total /= count;
    }
    Ok(AggregatedRow {
        key: first.key,
        query: first.query,
        percentile: first.percentile,
        median,
        upper,
    })
}

/// Formats an optional key for alignment diagnostics.
fn describe_key(key: Option<&ExperimentKey>) -> String {
    key.map_or_else(|| "no row".to_string(), ToString::to_string)
}

// ============================================================================
// SECTION: Tests
// ============================================================================
