// crates/dht-eval-core/src/core/window.rs
// ============================================================================
// Module: DHT Eval Row Window
// Description: Half-open row-id range sampled from each benchmark table.
// Purpose: Skip warm-up rows and bound the number of sampled operations.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! Benchmark tables log one row per operation. The first rows of every run are
//! warm-up noise, so each query reads the half-open row-id range
//! `[start, end)` described by [`RowWindow`]. Row ids are 1-based.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default first sampled row id (skips 24 warm-up rows).
pub const DEFAULT_WINDOW_START: i64 = 25;
/// Default exclusive upper row id (samples 1000 rows).
pub const DEFAULT_WINDOW_END: i64 = 1_025;

// ============================================================================
// SECTION: Row Window
// ============================================================================

/// Half-open row-id window `[start, end)`.
///
/// # Invariants
/// - `start >= 1` (row ids are 1-based).
/// - `end > start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RowWindow {
    /// Inclusive lower row id.
    pub start: i64,
    /// Exclusive upper row id.
    pub end: i64,
}

impl RowWindow {
    /// Creates a validated row window.
    ///
    /// # Errors
    ///
    /// Returns [`WindowError`] when the bounds violate the window invariants.
    pub fn new(start: i64, end: i64) -> Result<Self, WindowError> {
        let window = Self {
            start,
            end,
        };
        window.validate()?;
        Ok(window)
    }

    /// Validates the window bounds.
    ///
    /// # Errors
    ///
    /// Returns [`WindowError`] when the bounds violate the window invariants.
    pub const fn validate(&self) -> Result<(), WindowError> {
        if self.start < 1 {
            return Err(WindowError::StartBelowOne {
                start: self.start,
            });
        }
        if self.end <= self.start {
            return Err(WindowError::Empty {
                start: self.start,
                end: self.end,
            });
        }
        Ok(())
    }

    /// Returns the maximum number of rows the window can select.
    #[must_use]
    pub const fn capacity(&self) -> u64 {
        self.end.abs_diff(self.start)
    }
}

impl Default for RowWindow {
    fn default() -> Self {
        Self {
            start: DEFAULT_WINDOW_START,
            end: DEFAULT_WINDOW_END,
        }
    }
}

impl fmt::Display for RowWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// Row window validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WindowError {
    /// Row ids start at one.
    #[error("row window start must be at least 1 (got {start})")]
    StartBelowOne {
        /// Rejected start bound.
        start: i64,
    },
    /// The window selects no rows.
    #[error("row window [{start}, {end}) is empty")]
    Empty {
        /// Rejected start bound.
        start: i64,
        /// Rejected end bound.
        end: i64,
    },
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::RowWindow;
    use super::WindowError;

    #[test]
    fn default_window_skips_warm_up_rows() {
        let window = RowWindow::default();
        assert_eq!(window.start, 25);
        assert_eq!(window.capacity(), 1_000);
        assert!(window.validate().is_ok());
    }

    #[test]
    fn window_rejects_zero_start() {
        assert_eq!(
            RowWindow::new(0, 10),
            Err(WindowError::StartBelowOne {
                start: 0
            })
        );
    }

    #[test]
    fn window_rejects_empty_range() {
        assert!(matches!(RowWindow::new(5, 5), Err(WindowError::Empty { .. })));
        assert!(matches!(RowWindow::new(9, 5), Err(WindowError::Empty { .. })));
    }
}
