// crates/dht-eval-core/src/runtime/pipeline.rs
// ============================================================================
// Module: DHT Eval Pipeline
// Description: Locate, extract, aggregate, and merge benchmark runs.
// Purpose: Drive one evaluation from experiment directories to a report.
// Dependencies: crate::{core, interfaces, runtime}, thiserror, tracing
// ============================================================================

//! ## Overview
//! [`evaluate`] runs the whole pipeline once. For every experiment directory
//! it locates the benchmark runs, reads the client-level samples of each run
//! through a [`SampleSource`], summarizes them, and sorts the rows into a
//! [`ResultTable`]. The run matching the configured detail key additionally
//! yields the server-side breakdowns. Directory tables are then merged. Any
//! failure aborts the evaluation; no partial report is produced.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::PathBuf;

use thiserror::Error;
use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::core::AggregatedRow;
use crate::core::DetailedSnapshot;
use crate::core::EvaluationReport;
use crate::core::ExperimentKey;
use crate::core::MeasurementQuery;
use crate::core::ResultTable;
use crate::core::RowWindow;
use crate::core::SampleMatrix;
use crate::core::TableError;
use crate::interfaces::SampleSource;
use crate::interfaces::SourceError;
use crate::runtime::aggregate::AggregateError;
use crate::runtime::aggregate::DEFAULT_CLIENT_PERCENTILE;
use crate::runtime::aggregate::DEFAULT_DETAIL_PERCENTILE;
use crate::runtime::aggregate::summarize;
use crate::runtime::locator::LocatedRun;
use crate::runtime::locator::LocatorError;
use crate::runtime::locator::RunFilePattern;
use crate::runtime::locator::locate_runs;
use crate::runtime::merge::MergeError;
use crate::runtime::merge::merge_snapshots;
use crate::runtime::merge::merge_tables;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Queries executed for an ordinary run.
const CLIENT_QUERIES: [MeasurementQuery; 1] = [MeasurementQuery::Client];
/// Queries executed for the run matching the detail key.
const DETAIL_QUERIES: [MeasurementQuery; 3] = [
    MeasurementQuery::Client,
    MeasurementQuery::StoreBreakdown,
    MeasurementQuery::QueryBreakdown,
];

// ============================================================================
// SECTION: Options
// ============================================================================

/// Inputs of one evaluation.
#[derive(Debug, Clone)]
pub struct EvaluationOptions {
    /// Experiment directories, each holding one full sweep.
    pub directories: Vec<PathBuf>,
    /// Run filename convention.
    pub pattern: RunFilePattern,
    /// Row window sampled from every query.
    pub window: RowWindow,
    /// High percentile for client-level rows.
    pub percentile_client: f64,
    /// High percentile for detail breakdowns.
    pub percentile_detail: f64,
    /// Configuration whose server-side breakdowns are captured.
    pub detail_key: Option<ExperimentKey>,
}

impl EvaluationOptions {
    /// Creates options with the default window, percentiles, and pattern.
    ///
    /// # Errors
    ///
    /// Returns [`LocatorError::Pattern`] when the default pattern cannot be
    /// built.
    pub fn new(directories: Vec<PathBuf>) -> Result<Self, LocatorError> {
        Ok(Self {
            directories,
            pattern: RunFilePattern::standard()?,
            window: RowWindow::default(),
            percentile_client: DEFAULT_CLIENT_PERCENTILE,
            percentile_detail: DEFAULT_DETAIL_PERCENTILE,
            detail_key: None,
        })
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Evaluation errors. Every variant names the offending input.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The options are unusable.
    #[error("invalid evaluation options: {0}")]
    Invalid(String),
    /// Listing an experiment directory failed.
    #[error(transparent)]
    Locate(#[from] LocatorError),
    /// Reading a run failed.
    #[error("failed to read {path}: {source}")]
    Source {
        /// Run database path.
        path: String,
        /// Underlying source error.
        source: SourceError,
    },
    /// Summarizing a run failed.
    #[error("failed to aggregate {query} samples from {path}: {source}")]
    Aggregate {
        /// Run database path.
        path: String,
        /// Query whose samples were summarized.
        query: MeasurementQuery,
        /// Underlying aggregation error.
        source: AggregateError,
    },
    /// Building a directory table failed.
    #[error("failed to build result table for {directory}: {source}")]
    Table {
        /// Experiment directory.
        directory: String,
        /// Underlying table error.
        source: TableError,
    },
    /// Merging directory tables failed.
    #[error("failed to merge experiment directories: {0}")]
    Merge(#[from] MergeError),
}

// ============================================================================
// SECTION: Pipeline
// ============================================================================

/// Evaluates every configured experiment directory and merges the results.
///
/// # Errors
///
/// Returns [`PipelineError`] on the first failure.
pub fn evaluate<S>(
    source: &S,
    options: &EvaluationOptions,
) -> Result<EvaluationReport, PipelineError>
where
    S: SampleSource + ?Sized,
{
    validate_options(options)?;
    let mut tables = Vec::with_capacity(options.directories.len());
    let mut snapshots = Vec::new();
    for directory in &options.directories {
        let runs = locate_runs(directory, &options.pattern)?;
        info!(directory = %directory.display(), runs = runs.len(), "located benchmark runs");
        let mut rows = Vec::with_capacity(runs.len());
        for run in &runs {
            let (row, snapshot) = evaluate_run(source, run, options)?;
            rows.push(row);
            snapshots.extend(snapshot);
        }
        let table = ResultTable::from_rows(rows).map_err(|source| PipelineError::Table {
            directory: directory.display().to_string(),
            source,
        })?;
        tables.push(table);
    }
    let table = merge_tables(tables)?;
    let detail = merge_snapshots(&snapshots)?;
    if let Some(key) = options.detail_key
        && detail.is_none()
    {
        warn!(%key, "no run matched the detail snapshot key");
    }
    info!(rows = table.len(), directories = options.directories.len(), "evaluation complete");
    Ok(EvaluationReport {
        sources: options.directories.clone(),
        window: options.window,
        table,
        detail,
    })
}

/// Reads and summarizes one run.
fn evaluate_run<S>(
    source: &S,
    run: &LocatedRun,
    options: &EvaluationOptions,
) -> Result<(AggregatedRow, Option<DetailedSnapshot>), PipelineError>
where
    S: SampleSource + ?Sized,
{
    let detailed = options.detail_key == Some(run.key);
    let queries: &[MeasurementQuery] = if detailed { &DETAIL_QUERIES } else { &CLIENT_QUERIES };
    let path = run.path.display().to_string();
    let matrices = source.fetch(&run.path, queries, options.window).map_err(|source| {
        PipelineError::Source {
            path: path.clone(),
            source,
        }
    })?;
    if matrices.len() != queries.len() {
        return Err(PipelineError::Source {
            path,
            source: SourceError::DataAccess(format!(
                "expected {} result sets, got {}",
                queries.len(),
                matrices.len()
            )),
        });
    }
    debug!(path = %path, key = %run.key, queries = queries.len(), "fetched run samples");
    let client = aggregate_row(
        &path,
        run.key,
        MeasurementQuery::Client,
        &matrices[0],
        options.percentile_client,
    )?;
    if !detailed {
        return Ok((client, None));
    }
    let store = aggregate_row(
        &path,
        run.key,
        MeasurementQuery::StoreBreakdown,
        &matrices[1],
        options.percentile_detail,
    )?;
    let query = aggregate_row(
        &path,
        run.key,
        MeasurementQuery::QueryBreakdown,
        &matrices[2],
        options.percentile_detail,
    )?;
    Ok((
        client,
        Some(DetailedSnapshot {
            key: run.key,
            store,
            query,
        }),
    ))
}

/// Summarizes one sample matrix into an aggregated row.
fn aggregate_row(
    path: &str,
    key: ExperimentKey,
    query: MeasurementQuery,
    matrix: &SampleMatrix,
    percentile: f64,
) -> Result<AggregatedRow, PipelineError> {
    let summary = summarize(matrix, percentile).map_err(|source| PipelineError::Aggregate {
        path: path.to_string(),
        query,
        source,
    })?;
    Ok(AggregatedRow {
        key,
        query,
        percentile,
        median: summary.median,
        upper: summary.upper,
    })
}

/// Rejects options that cannot produce a report.
fn validate_options(options: &EvaluationOptions) -> Result<(), PipelineError> {
    if options.directories.is_empty() {
        return Err(PipelineError::Invalid(
            "at least one experiment directory is required".to_string(),
        ));
    }
    options.window.validate().map_err(|err| PipelineError::Invalid(err.to_string()))?;
    let percentiles = [
        ("percentile_client", options.percentile_client),
        ("percentile_detail", options.percentile_detail),
    ];
    for (name, value) in percentiles {
        if !(0.0 ..= 100.0).contains(&value) {
            return Err(PipelineError::Invalid(format!("{name} must be within [0, 100]")));
        }
    }
    Ok(())
}
