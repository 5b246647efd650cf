// crates/dht-eval-core/src/core/mod.rs
// ============================================================================
// Module: DHT Eval Core Types
// Description: Data model shared by every pipeline stage.
// Purpose: Group experiment keys, sample matrices, and result tables.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! Core types describe one benchmark sweep: the parameters encoded in a run's
//! filename, the row window sampled from each run, the raw sample matrices,
//! and the aggregated tables built from them.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod identifiers;
pub mod query;
pub mod sample;
pub mod table;
pub mod window;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use identifiers::ExperimentKey;
pub use identifiers::RunParameters;
pub use query::MeasurementQuery;
pub use sample::SampleError;
pub use sample::SampleMatrix;
pub use table::AggregatedRow;
pub use table::DetailedSnapshot;
pub use table::EvaluationReport;
pub use table::ResultTable;
pub use table::TableError;
pub use window::RowWindow;
pub use window::WindowError;
