// crates/dht-eval-core/src/runtime/source.rs
// ============================================================================
// Module: DHT Eval In-Memory Source
// Description: Simple in-memory sample source for tests and examples.
// Purpose: Provide a deterministic source implementation without storage deps.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! This module provides an in-memory implementation of [`SampleSource`].
//! Rows are stored per run path and query; row ids are 1-based positions in
//! the stored row list, so row windows behave like they do on a real
//! benchmark table. It is not intended for production use.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::path::Path;
use std::path::PathBuf;

use crate::core::MeasurementQuery;
use crate::core::RowWindow;
use crate::core::SampleMatrix;
use crate::interfaces::SampleSource;
use crate::interfaces::SourceError;

// ============================================================================
// SECTION: In-Memory Source
// ============================================================================

/// In-memory sample source for tests and examples.
#[derive(Debug, Default, Clone)]
pub struct InMemorySampleSource {
    /// Stored rows by run path, then query name.
    runs: BTreeMap<PathBuf, BTreeMap<&'static str, Vec<Vec<f64>>>>,
}

impl InMemorySampleSource {
    /// Creates an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `rows` for `query` on the run at `path`.
    ///
    /// The first row has row id 1.
    #[must_use]
    pub fn with_rows(
        mut self,
        path: impl Into<PathBuf>,
        query: MeasurementQuery,
        rows: Vec<Vec<f64>>,
    ) -> Self {
        self.runs.entry(path.into()).or_default().insert(query.name(), rows);
        self
    }
}

impl SampleSource for InMemorySampleSource {
    fn fetch(
        &self,
        path: &Path,
        queries: &[MeasurementQuery],
        window: RowWindow,
    ) -> Result<Vec<SampleMatrix>, SourceError> {
        let run =
            self.runs.get(path).ok_or_else(|| SourceError::NotFound(path.display().to_string()))?;
        let mut matrices = Vec::with_capacity(queries.len());
        for query in queries {
            let rows = run.get(query.name()).ok_or_else(|| {
                SourceError::DataAccess(format!(
                    "{}: no such table: {}",
                    path.display(),
                    query.table()
                ))
            })?;
            let skip = usize::try_from(window.start.saturating_sub(1)).unwrap_or(usize::MAX);
            let take = usize::try_from(window.capacity()).unwrap_or(usize::MAX);
            let matrix =
                SampleMatrix::from_rows(query.column_count(), rows.iter().skip(skip).take(take))
                    .map_err(|err| SourceError::DataAccess(format!("{}: {err}", path.display())))?;
            matrices.push(matrix);
        }
        Ok(matrices)
    }
}
