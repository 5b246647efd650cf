// crates/dht-eval-core/src/runtime/aggregate.rs
// ============================================================================
// Module: DHT Eval Aggregator
// Description: Per-column median and high-percentile summaries.
// Purpose: Reduce a sample matrix to two equal-length summary vectors.
// Dependencies: crate::core, thiserror
// ============================================================================

//! ## Overview
//! Percentiles use linear interpolation between order statistics: for `n`
//! sorted values the rank of percentile `p` is `p / 100 * (n - 1)`, and a
//! fractional rank blends the two neighboring values proportionally. This is
//! the same rule as numpy's default `linear` method, so results are
//! reproducible across tools.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::core::SampleMatrix;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Percentile rank of the median.
pub const MEDIAN_PERCENTILE: f64 = 50.0;
/// Default high percentile for client-level rows.
pub const DEFAULT_CLIENT_PERCENTILE: f64 = 99.0;
/// Default high percentile for detail breakdowns.
pub const DEFAULT_DETAIL_PERCENTILE: f64 = 90.0;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Aggregation errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AggregateError {
    /// The sample matrix holds no rows.
    #[error("no samples to aggregate")]
    InsufficientData,
    /// The requested percentile is not in `[0, 100]`.
    #[error("percentile must be within [0, 100] (got {0})")]
    InvalidPercentile(f64),
}

// ============================================================================
// SECTION: Percentiles
// ============================================================================

/// Per-column median and high percentile of a sample matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSummary {
    /// Per-column medians.
    pub median: Vec<f64>,
    /// Per-column values at the requested percentile.
    pub upper: Vec<f64>,
}

/// Returns the `p`-th percentile of ascending `sorted` values.
///
/// # Errors
///
/// Returns [`AggregateError`] when `sorted` is empty or `p` is out of range.
pub fn percentile(sorted: &[f64], p: f64) -> Result<f64, AggregateError> {
    validate_percentile(p)?;
    let Some(last) = sorted.last() else {
        return Err(AggregateError::InsufficientData);
    };
    let max_rank = sorted.len() - 1;
    #[allow(clippy::cast_precision_loss, reason = "Sample counts stay far below 2^52.")]
    let rank = p / 100.0 * max_rank as f64;
    let lower = rank.floor();
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "rank is finite and within [0, len - 1]."
    )]
    let index = lower as usize;
    if index >= max_rank {
        return Ok(*last);
    }
    if rank == lower {
        return Ok(sorted[index]);
    }
    let fraction = rank - lower;
    let below = sorted[index];
    let above = sorted[index + 1];
    Ok((above - below).mul_add(fraction, below))
}

/// Computes the per-column median and `p`-th percentile of `matrix`.
///
/// # Errors
///
/// Returns [`AggregateError`] when the matrix is empty or `p` is out of range.
pub fn summarize(matrix: &SampleMatrix, p: f64) -> Result<ColumnSummary, AggregateError> {
    validate_percentile(p)?;
    if matrix.is_empty() {
        return Err(AggregateError::InsufficientData);
    }
    let mut median = Vec::with_capacity(matrix.column_count());
    let mut upper = Vec::with_capacity(matrix.column_count());
    for index in 0 .. matrix.column_count() {
        let mut column = matrix.column(index).unwrap_or_default();
        column.sort_by(f64::total_cmp);
        median.push(percentile(&column, MEDIAN_PERCENTILE)?);
        upper.push(percentile(&column, p)?);
    }
    Ok(ColumnSummary {
        median,
        upper,
    })
}

/// Rejects percentiles outside `[0, 100]`.
fn validate_percentile(p: f64) -> Result<(), AggregateError> {
    if (0.0 ..= 100.0).contains(&p) {
        Ok(())
    } else {
        Err(AggregateError::InvalidPercentile(p))
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::float_cmp, reason = "Test-only assertions are permitted.")]

    use super::AggregateError;
    use super::percentile;
    use super::summarize;
    use crate::core::SampleMatrix;

    #[test]
    fn percentile_interpolates_fractional_ranks() {
        let values = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(percentile(&values, 50.0).expect("p50"), 2.5);
        assert_eq!(percentile(&values, 0.0).expect("p0"), 1.0);
        assert_eq!(percentile(&values, 100.0).expect("p100"), 4.0);
        assert!((percentile(&values, 90.0).expect("p90") - 3.7).abs() < 1e-12);
    }

    #[test]
    fn percentile_of_single_value_is_that_value() {
        assert_eq!(percentile(&[7.5], 99.0).expect("p99"), 7.5);
    }

    #[test]
    fn percentile_rejects_empty_input() {
        assert_eq!(percentile(&[], 50.0), Err(AggregateError::InsufficientData));
    }

    #[test]
    fn percentile_rejects_out_of_range_rank() {
        assert_eq!(percentile(&[1.0], 101.0), Err(AggregateError::InvalidPercentile(101.0)));
        assert!(matches!(percentile(&[1.0], f64::NAN), Err(AggregateError::InvalidPercentile(_))));
    }

    #[test]
    fn summarize_works_per_column() {
        let matrix =
            SampleMatrix::from_rows(2, [[5.0, 6.0], [1.0, 2.0], [3.0, 4.0]]).expect("matrix");
        let summary = summarize(&matrix, 99.0).expect("summary");
        assert_eq!(summary.median, vec![3.0, 4.0]);
        assert!((summary.upper[0] - 4.96).abs() < 1e-12);
        assert!((summary.upper[1] - 5.96).abs() < 1e-12);
    }

    #[test]
    fn summarize_rejects_empty_matrix() {
        let matrix = SampleMatrix::new(3).expect("matrix");
        assert_eq!(summarize(&matrix, 90.0), Err(AggregateError::InsufficientData));
    }
}
