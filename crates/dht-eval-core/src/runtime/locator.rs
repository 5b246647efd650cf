// crates/dht-eval-core/src/runtime/locator.rs
// ============================================================================
// Module: DHT Eval Run Locator
// Description: Finds benchmark databases in an experiment directory.
// Purpose: Map parameterized filenames to run parameters and experiment keys.
// Dependencies: crate::core, regex, thiserror, tracing
// ============================================================================

//! ## Overview
//! Benchmark runs are stored as `<prefix>_k<K>_a<A>_n<NODES>_l<LAT>.<ext>`.
//! [`locate_runs`] lists one directory, keeps the files whose name matches a
//! [`RunFilePattern`], and derives the [`ExperimentKey`] of each run. Files
//! that do not match are skipped silently; a missing directory fails.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::Path;
use std::path::PathBuf;

use regex::Regex;
use thiserror::Error;
use tracing::debug;

use crate::core::ExperimentKey;
use crate::core::RunParameters;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default filename prefix written by the DHT benchmark.
pub const DEFAULT_FILE_PREFIX: &str = "local_dht_benchmark";
/// Default database file extension.
pub const DEFAULT_FILE_EXTENSION: &str = "db";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Run locator errors.
#[derive(Debug, Error)]
pub enum LocatorError {
    /// The experiment directory does not exist.
    #[error("experiment directory not found: {0}")]
    NotFound(String),
    /// Listing the directory failed.
    #[error("experiment directory io error: {0}")]
    Io(String),
    /// The filename pattern could not be compiled.
    #[error("invalid run file pattern: {0}")]
    Pattern(String),
}

// ============================================================================
// SECTION: File Pattern
// ============================================================================

/// Filename convention for benchmark run databases.
#[derive(Debug, Clone)]
pub struct RunFilePattern {
    /// Compiled, anchored filename expression.
    regex: Regex,
}

impl RunFilePattern {
    /// Builds a pattern for `<prefix>_k<K>_a<A>_n<NODES>_l<LAT>.<extension>`.
    ///
    /// # Errors
    ///
    /// Returns [`LocatorError::Pattern`] when the expression cannot be built.
    pub fn new(prefix: &str, extension: &str) -> Result<Self, LocatorError> {
        let expression = format!(
            r"^{}_k(\d+)_a(\d+)_n(\d+)_l(\d+)\.{}$",
            regex::escape(prefix),
            regex::escape(extension)
        );
        let regex = Regex::new(&expression).map_err(|err| LocatorError::Pattern(err.to_string()))?;
        Ok(Self {
            regex,
        })
    }

    /// Builds the pattern used by the DHT benchmark by default.
    ///
    /// # Errors
    ///
    /// Returns [`LocatorError::Pattern`] when the expression cannot be built.
    pub fn standard() -> Result<Self, LocatorError> {
        Self::new(DEFAULT_FILE_PREFIX, DEFAULT_FILE_EXTENSION)
    }

    /// Parses run parameters from a filename.
    ///
    /// Returns `None` when the name does not match or a number overflows.
    #[must_use]
    pub fn parse(&self, file_name: &str) -> Option<RunParameters> {
        let captures = self.regex.captures(file_name)?;
        let number = |index: usize| captures.get(index)?.as_str().parse::<u32>().ok();
        Some(RunParameters {
            k: number(1)?,
            a: number(2)?,
            num_nodes: number(3)?,
            latency_one_way: number(4)?,
        })
    }
}

// ============================================================================
// SECTION: Locator
// ============================================================================

/// Benchmark run found in an experiment directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedRun {
    /// Full path of the run database.
    pub path: PathBuf,
    /// Parameters parsed from the filename.
    pub params: RunParameters,
    /// Experiment key derived from the parameters.
    pub key: ExperimentKey,
}

/// Lists the benchmark runs in `dir`, ordered by key then path.
///
/// # Errors
///
/// Returns [`LocatorError::NotFound`] when `dir` is not an existing directory
/// and [`LocatorError::Io`] when listing fails.
pub fn locate_runs(dir: &Path, pattern: &RunFilePattern) -> Result<Vec<LocatedRun>, LocatorError> {
    if !dir.is_dir() {
        return Err(LocatorError::NotFound(dir.display().to_string()));
    }
    let entries =
        fs::read_dir(dir).map_err(|err| LocatorError::Io(format!("{}: {err}", dir.display())))?;
    let mut runs = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|err| LocatorError::Io(format!("{}: {err}", dir.display())))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(file_name) = entry.file_name().to_str().map(str::to_owned) else {
            debug!(path = %path.display(), "skipping non-utf8 file name");
            continue;
        };
        let Some(params) = pattern.parse(&file_name) else {
            debug!(file = %file_name, "skipping file outside run naming convention");
            continue;
        };
        let Some(key) = params.experiment_key() else {
            debug!(file = %file_name, "skipping run with out-of-range latency");
            continue;
        };
        debug!(file = %file_name, %key, "located benchmark run");
        runs.push(LocatedRun {
            path,
            params,
            key,
        });
    }
    runs.sort_by(|left, right| left.key.cmp(&right.key).then_with(|| left.path.cmp(&right.path)));
    Ok(runs)
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, reason = "Test-only assertions are permitted.")]

    use super::RunFilePattern;
    use crate::core::ExperimentKey;

    #[test]
    fn standard_pattern_parses_all_parameters() {
        let pattern = RunFilePattern::standard().expect("pattern");
        let params = pattern.parse("local_dht_benchmark_k10_a3_n512_l15.db").expect("params");
        assert_eq!((params.k, params.a, params.num_nodes, params.latency_one_way), (10, 3, 512, 15));
        assert_eq!(params.experiment_key(), Some(ExperimentKey::new(512, 30)));
    }

    #[test]
    fn pattern_rejects_non_matching_names() {
        let pattern = RunFilePattern::standard().expect("pattern");
        for name in [
            "readme.txt",
            "local_dht_benchmark_bad.db",
            "local_dht_benchmark_k10_a3_n512_l15.db-journal",
            "local_dht_benchmark_k10_a3_n512_l15xdb",
            "other_k10_a3_n512_l15.db",
            "local_dht_benchmark_k10_a3_n-1_l15.db",
        ] {
            assert!(pattern.parse(name).is_none(), "{name} should not match");
        }
    }

    #[test]
    fn pattern_rejects_overflowing_numbers() {
        let pattern = RunFilePattern::standard().expect("pattern");
        assert!(pattern.parse("local_dht_benchmark_k1_a1_n99999999999_l0.db").is_none());
    }

    #[test]
    fn custom_prefix_is_escaped() {
        let pattern = RunFilePattern::new("bench.v2", "sqlite").expect("pattern");
        assert!(pattern.parse("bench.v2_k1_a2_n3_l4.sqlite").is_some());
        assert!(pattern.parse("benchxv2_k1_a2_n3_l4.sqlite").is_none());
    }
}
