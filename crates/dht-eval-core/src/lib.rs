// crates/dht-eval-core/src/lib.rs
// ============================================================================
// Module: DHT Eval Core Library
// Description: Public API surface for the DHT benchmark evaluation core.
// Purpose: Expose the data model, sample source interface, and pipeline stages.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! DHT Eval core turns per-run benchmark databases into per-configuration
//! summary statistics. Runs are located by filename, sampled through the
//! [`SampleSource`] interface, summarized per column (median and a high
//! percentile), and merged across repeated experiment directories into a
//! [`ResultTable`] sorted by node count and latency. Storage backends plug in
//! through [`SampleSource`] rather than being embedded here.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use crate::core::*;

pub use interfaces::SampleSource;
pub use interfaces::SourceError;
pub use runtime::AggregateError;
pub use runtime::ColumnSummary;
pub use runtime::EvaluationOptions;
pub use runtime::FacetLayout;
pub use runtime::FacetPanel;
pub use runtime::FacetSeries;
pub use runtime::InMemorySampleSource;
pub use runtime::LocatedRun;
pub use runtime::LocatorError;
pub use runtime::MergeError;
pub use runtime::PipelineError;
pub use runtime::RunFilePattern;
pub use runtime::evaluate;
pub use runtime::latency_fixed_layout;
pub use runtime::locate_runs;
pub use runtime::merge_snapshots;
pub use runtime::merge_tables;
pub use runtime::nodes_fixed_layout;
pub use runtime::percentile;
pub use runtime::summarize;
