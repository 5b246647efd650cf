// crates/dht-eval-core/src/interfaces/mod.rs
// ============================================================================
// Module: DHT Eval Interfaces
// Description: Backend-agnostic seams used by the evaluation pipeline.
// Purpose: Decouple sample extraction from the storage engine.
// Dependencies: crate::core, thiserror
// ============================================================================

//! ## Overview
//! The pipeline reads raw samples through [`SampleSource`]. Implementations
//! must open the run, execute every requested query, and release the run
//! before returning, on success and failure alike.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;

use thiserror::Error;

use crate::core::MeasurementQuery;
use crate::core::RowWindow;
use crate::core::SampleMatrix;

// ============================================================================
// SECTION: Sample Source
// ============================================================================

/// Sample source errors.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The run file does not exist.
    #[error("benchmark run not found: {0}")]
    NotFound(String),
    /// The run could not be opened or queried.
    #[error("benchmark data access error: {0}")]
    DataAccess(String),
}

/// Reads raw measurement matrices from one benchmark run.
pub trait SampleSource {
    /// Executes `queries` against the run at `path`, restricted to `window`.
    ///
    /// Returns one matrix per query, in request order.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] when the run is missing or a query fails.
    fn fetch(
        &self,
        path: &Path,
        queries: &[MeasurementQuery],
        window: RowWindow,
    ) -> Result<Vec<SampleMatrix>, SourceError>;
}
