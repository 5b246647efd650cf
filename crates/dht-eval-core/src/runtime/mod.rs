// crates/dht-eval-core/src/runtime/mod.rs
// ============================================================================
// Module: DHT Eval Runtime
// Description: Pipeline stages that turn benchmark runs into result tables.
// Purpose: Locate runs, summarize samples, merge tables, and shape reports.
// Dependencies: crate::{core, interfaces}, regex, tracing
// ============================================================================

//! ## Overview
//! Runtime modules implement the evaluation stages in pipeline order:
//! [`locator`], [`aggregate`], [`merge`], and [`report`], driven end to end by
//! [`pipeline::evaluate`]. [`source`] holds an in-memory sample source for
//! tests and demos.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod aggregate;
pub mod locator;
pub mod merge;
pub mod pipeline;
pub mod report;
pub mod source;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use aggregate::AggregateError;
pub use aggregate::ColumnSummary;
pub use aggregate::percentile;
pub use aggregate::summarize;
pub use locator::LocatedRun;
pub use locator::LocatorError;
pub use locator::RunFilePattern;
pub use locator::locate_runs;
pub use merge::MergeError;
pub use merge::merge_snapshots;
pub use merge::merge_tables;
pub use pipeline::EvaluationOptions;
pub use pipeline::PipelineError;
pub use pipeline::evaluate;
pub use report::FacetLayout;
pub use report::FacetPanel;
pub use report::FacetSeries;
pub use report::latency_fixed_layout;
pub use report::nodes_fixed_layout;
pub use source::InMemorySampleSource;
