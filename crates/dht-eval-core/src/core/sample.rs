// crates/dht-eval-core/src/core/sample.rs
// ============================================================================
// Module: DHT Eval Sample Matrix
// Description: Raw numeric rows read from one benchmark operation log.
// Purpose: Hold a rectangular rows x columns matrix of measurements.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! A [`SampleMatrix`] stores the rows returned by one measurement query in
//! row-major order. Every row has exactly [`SampleMatrix::column_count`]
//! values; ragged input is rejected when rows are pushed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

// ============================================================================
// SECTION: Sample Matrix
// ============================================================================

/// Rectangular matrix of raw measurements (rows x columns).
///
/// # Invariants
/// - `column_count > 0`.
/// - `values.len()` is a multiple of `column_count`.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleMatrix {
    /// Number of values per row.
    column_count: usize,
    /// Row-major measurement values.
    values: Vec<f64>,
}

impl SampleMatrix {
    /// Creates an empty matrix with a fixed column count.
    ///
    /// # Errors
    ///
    /// Returns [`SampleError::NoColumns`] when `column_count` is zero.
    pub const fn new(column_count: usize) -> Result<Self, SampleError> {
        if column_count == 0 {
            return Err(SampleError::NoColumns);
        }
        Ok(Self {
            column_count,
            values: Vec::new(),
        })
    }

    /// Builds a matrix from a list of rows.
    ///
    /// # Errors
    ///
    /// Returns [`SampleError`] when the column count is zero or a row has the
    /// wrong width.
    pub fn from_rows<R>(column_count: usize, rows: impl IntoIterator<Item = R>) -> Result<Self, SampleError>
    where
        R: AsRef<[f64]>,
    {
        let mut matrix = Self::new(column_count)?;
        for row in rows {
            matrix.push_row(row.as_ref())?;
        }
        Ok(matrix)
    }

    /// Appends one row.
    ///
    /// # Errors
    ///
    /// Returns [`SampleError::RowWidth`] when the row width differs from the
    /// column count.
    pub fn push_row(&mut self, row: &[f64]) -> Result<(), SampleError> {
        if row.len() != self.column_count {
            return Err(SampleError::RowWidth {
                expected: self.column_count,
                actual: row.len(),
            });
        }
        self.values.extend_from_slice(row);
        Ok(())
    }

    /// Returns the number of values per row.
    #[must_use]
    pub const fn column_count(&self) -> usize {
        self.column_count
    }

    /// Returns the number of rows.
    #[must_use]
    pub const fn row_count(&self) -> usize {
        self.values.len() / self.column_count
    }

    /// Returns true when the matrix holds no rows.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns an iterator over rows.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.values.chunks_exact(self.column_count)
    }

    /// Returns a copy of one column, or `None` when out of range.
    #[must_use]
    pub fn column(&self, index: usize) -> Option<Vec<f64>> {
        if index >= self.column_count {
            return None;
        }
        Some(self.rows().map(|row| row[index]).collect())
    }
}

/// Sample matrix construction errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SampleError {
    /// A matrix needs at least one column.
    #[error("sample matrix must have at least one column")]
    NoColumns,
    /// A row did not match the matrix width.
    #[error("sample row has {actual} values (expected {expected})")]
    RowWidth {
        /// Matrix column count.
        expected: usize,
        /// Width of the rejected row.
        actual: usize,
    },
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, reason = "Test-only assertions are permitted.")]

    use super::SampleError;
    use super::SampleMatrix;

    #[test]
    fn matrix_exposes_columns() {
        let matrix =
            SampleMatrix::from_rows(2, [[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]]).expect("matrix");
        assert_eq!(matrix.row_count(), 3);
        assert_eq!(matrix.column(0), Some(vec![1.0, 3.0, 5.0]));
        assert_eq!(matrix.column(1), Some(vec![2.0, 4.0, 6.0]));
        assert_eq!(matrix.column(2), None);
    }

    #[test]
    fn matrix_rejects_ragged_rows() {
        let err = SampleMatrix::from_rows(2, [vec![1.0, 2.0], vec![3.0]]).expect_err("ragged");
        assert_eq!(
            err,
            SampleError::RowWidth {
                expected: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn matrix_rejects_zero_columns() {
        assert_eq!(SampleMatrix::new(0), Err(SampleError::NoColumns));
    }
}
