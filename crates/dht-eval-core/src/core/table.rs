// crates/dht-eval-core/src/core/table.rs
// ============================================================================
// Module: DHT Eval Result Tables
// Description: Aggregated rows, sorted result tables, and evaluation reports.
// Purpose: Hold per-configuration summaries in key order.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! An [`AggregatedRow`] holds the per-column median and high percentile of one
//! measurement query for one [`ExperimentKey`]. A [`ResultTable`] keeps those
//! rows strictly ordered by key; construction sorts the rows and rejects
//! duplicate keys.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::core::identifiers::ExperimentKey;
use crate::core::query::MeasurementQuery;
use crate::core::window::RowWindow;

// ============================================================================
// SECTION: Aggregated Row
// ============================================================================

/// Per-column summary of one measurement query for one experiment key.
///
/// # Invariants
/// - `median.len() == upper.len() == query.column_count()`.
/// - `percentile` is the rank used for `upper`, in `[0, 100]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedRow {
    /// Experiment key of the summarized run(s).
    pub key: ExperimentKey,
    /// Query the samples were read with.
    pub query: MeasurementQuery,
    /// Percentile rank used for `upper`.
    pub percentile: f64,
    /// Per-column medians.
    pub median: Vec<f64>,
    /// Per-column values at `percentile`.
    pub upper: Vec<f64>,
}

impl AggregatedRow {
    /// Returns the labels of the summarized columns.
    #[must_use]
    pub const fn column_labels(&self) -> &'static [&'static str] {
        self.query.column_labels()
    }

    /// Returns the median of the named column, when present.
    #[must_use]
    pub fn median_of(&self, label: &str) -> Option<f64> {
        let index = self.column_labels().iter().position(|name| *name == label)?;
        self.median.get(index).copied()
    }

    /// Returns the upper percentile of the named column, when present.
    #[must_use]
    pub fn upper_of(&self, label: &str) -> Option<f64> {
        let index = self.column_labels().iter().position(|name| *name == label)?;
        self.upper.get(index).copied()
    }
}

// ============================================================================
// SECTION: Result Table
// ============================================================================

/// Aggregated rows sorted by experiment key.
///
/// # Invariants
/// - Rows are strictly ascending by (`num_nodes`, `latency`); keys are unique.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ResultTable {
    /// Rows in ascending key order.
    rows: Vec<AggregatedRow>,
}

impl ResultTable {
    /// Builds a table from unordered rows.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::DuplicateKey`] when two rows share a key.
    pub fn from_rows(mut rows: Vec<AggregatedRow>) -> Result<Self, TableError> {
        rows.sort_by_key(|row| row.key);
        if let Some(pair) = rows.windows(2).find(|pair| pair[0].key == pair[1].key) {
            return Err(TableError::DuplicateKey {
                key: pair[0].key,
            });
        }
        Ok(Self {
            rows,
        })
    }

    /// Returns the rows in key order.
    #[must_use]
    pub fn rows(&self) -> &[AggregatedRow] {
        &self.rows
    }

    /// Returns the keys in table order.
    #[must_use]
    pub fn keys(&self) -> Vec<ExperimentKey> {
        self.rows.iter().map(|row| row.key).collect()
    }

    /// Looks up the row for a key.
    #[must_use]
    pub fn get(&self, key: ExperimentKey) -> Option<&AggregatedRow> {
        self.rows.binary_search_by_key(&key, |row| row.key).ok().map(|index| &self.rows[index])
    }

    /// Returns the number of rows.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true when the table holds no rows.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Consumes the table and returns its rows in key order.
    #[must_use]
    pub fn into_rows(self) -> Vec<AggregatedRow> {
        self.rows
    }
}

/// Result table construction errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    /// Two runs in one directory map to the same experiment key.
    #[error("duplicate experiment key {key}")]
    DuplicateKey {
        /// Key that appeared more than once.
        key: ExperimentKey,
    },
}

// ============================================================================
// SECTION: Detail Snapshot
// ============================================================================

/// Server-side breakdowns captured for one configuration of interest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailedSnapshot {
    /// Experiment key the snapshot was captured for.
    pub key: ExperimentKey,
    /// Store-path breakdown.
    pub store: AggregatedRow,
    /// Query-path breakdown.
    pub query: AggregatedRow,
}

// ============================================================================
// SECTION: Evaluation Report
// ============================================================================

/// Output of one evaluation run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationReport {
    /// Experiment directories that were evaluated, in input order.
    pub sources: Vec<PathBuf>,
    /// Row window sampled from every run.
    pub window: RowWindow,
    /// Merged client-level table.
    pub table: ResultTable,
    /// Detail snapshot, when the configured key was found.
    pub detail: Option<DetailedSnapshot>,
}

// ============================================================================
// SECTION: Tests
// ============================================================================
