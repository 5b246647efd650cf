// crates/dht-eval-store-sqlite/src/fixture.rs
// ============================================================================
// Module: Benchmark Database Fixture Writer
// Description: Writes benchmark run databases with the measurement schema.
// Purpose: Produce deterministic run databases for tests and demos.
// Dependencies: rusqlite, thiserror
// ============================================================================

//! ## Overview
//! [`BenchmarkDbWriter`] creates the three measurement tables read by
//! [`crate::SqliteSampleSource`] and appends rows to them. Row ids are
//! assigned by `SQLite` in insertion order, starting at 1, which is what the
//! row window selects on. Synthetic rows are a deterministic function of the
//! row index so repeated runs produce identical files.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;
use std::path::PathBuf;

use rusqlite::Connection;
use rusqlite::params;
use thiserror::Error;

// ============================================================================
// SECTION: Schema
// ============================================================================

/// Measurement tables, one row per benchmark operation.
const SCHEMA_SQL: &str = "
CREATE TABLE IF NOT EXISTS CLIENT_STORE_GET (
    time_store_chunk REAL NOT NULL,
    time_fetch_addr REAL NOT NULL,
    time_fetch_nonce REAL NOT NULL,
    time_fetch_chunk REAL NOT NULL
);
CREATE TABLE IF NOT EXISTS STORE_CHUNK (
    time_total_rpc_store REAL NOT NULL,
    time_fetch_policy REAL NOT NULL,
    time_check_chunk_valid REAL NOT NULL,
    time_db_store_chunk REAL NOT NULL
);
CREATE TABLE IF NOT EXISTS QUERY_CHUNK_LOCAL (
    time_total_local_query REAL NOT NULL,
    time_check_token_valid REAL NOT NULL,
    time_fetch_policy REAL NOT NULL,
    time_check_access_valid REAL NOT NULL,
    time_db_get_chunk REAL NOT NULL
);";

/// Appends one client row.
const INSERT_CLIENT_SQL: &str = "INSERT INTO CLIENT_STORE_GET (time_store_chunk, \
                                 time_fetch_addr, time_fetch_nonce, time_fetch_chunk) VALUES \
                                 (?1, ?2, ?3, ?4)";
/// Appends one store breakdown row.
const INSERT_STORE_SQL: &str = "INSERT INTO STORE_CHUNK (time_total_rpc_store, \
                                time_fetch_policy, time_check_chunk_valid, time_db_store_chunk) \
                                VALUES (?1, ?2, ?3, ?4)";
/// Appends one local query breakdown row.
const INSERT_QUERY_SQL: &str = "INSERT INTO QUERY_CHUNK_LOCAL (time_total_local_query, \
                                time_check_token_valid, time_fetch_policy, \
                                time_check_access_valid, time_db_get_chunk) VALUES (?1, ?2, ?3, \
                                ?4, ?5)";

/// Spread of synthetic values is divided into this many steps.
const SYNTHETIC_STEPS: u32 = 1_000;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Fixture writer errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FixtureError {
    /// Filesystem error.
    #[error("fixture io error: {0}")]
    Io(String),
    /// `SQLite` engine error.
    #[error("fixture db error: {0}")]
    Db(String),
}

// ============================================================================
// SECTION: Synthetic Rows
// ============================================================================

/// Shape of synthetic latency values.
///
/// Row `i` gets `base_ms + spread_ms * step(i) / 1000`, where `step` walks a
/// fixed permutation of `0 .. 1000`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyntheticProfile {
    /// Smallest generated latency in milliseconds.
    pub base_ms: f64,
    /// Width of the generated latency range in milliseconds.
    pub spread_ms: f64,
}

impl SyntheticProfile {
    /// Derives a profile that grows with node count and latency.
    #[must_use]
    pub fn for_run(num_nodes: u32, latency: u32) -> Self {
        Self {
            base_ms: f64::from(latency).mul_add(2.0, f64::from(num_nodes.max(1)).log2()),
            spread_ms: f64::from(latency).max(1.0) * 4.0,
        }
    }

    /// Returns the synthetic latency of row `index`.
    #[must_use]
    pub fn value(&self, index: u32) -> f64 {
        let step = index.wrapping_mul(37) % SYNTHETIC_STEPS;
        self.spread_ms.mul_add(f64::from(step) / f64::from(SYNTHETIC_STEPS), self.base_ms)
    }
}

impl Default for SyntheticProfile {
    fn default() -> Self {
        Self {
            base_ms: 1.0,
            spread_ms: 10.0,
        }
    }
}

// ============================================================================
// SECTION: Writer
// ============================================================================

/// Writes benchmark run databases.
#[derive(Debug)]
pub struct BenchmarkDbWriter {
    /// Open read-write connection.
    connection: Connection,
    /// Database file path.
    path: PathBuf,
}

impl BenchmarkDbWriter {
    /// Opens or creates the database at `path` and ensures the schema exists.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError`] when the file cannot be created or the schema
    /// cannot be applied.
    pub fn create(path: &Path) -> Result<Self, FixtureError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|err| FixtureError::Io(err.to_string()))?;
        }
        let connection = Connection::open(path).map_err(|err| FixtureError::Db(err.to_string()))?;
        connection.execute_batch(SCHEMA_SQL).map_err(|err| FixtureError::Db(err.to_string()))?;
        Ok(Self {
            connection,
            path: path.to_path_buf(),
        })
    }

    /// Returns the database file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends a client row: store time, then the three get phases.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::Db`] when the insert fails.
    pub fn insert_client(&self, row: [f64; 4]) -> Result<(), FixtureError> {
        self.connection
            .execute(INSERT_CLIENT_SQL, params![row[0], row[1], row[2], row[3]])
            .map_err(|err| FixtureError::Db(err.to_string()))?;
        Ok(())
    }

    /// Appends a server-side store breakdown row.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::Db`] when the insert fails.
    pub fn insert_store(&self, row: [f64; 4]) -> Result<(), FixtureError> {
        self.connection
            .execute(INSERT_STORE_SQL, params![row[0], row[1], row[2], row[3]])
            .map_err(|err| FixtureError::Db(err.to_string()))?;
        Ok(())
    }

    /// Appends a server-side local query breakdown row.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::Db`] when the insert fails.
    pub fn insert_query(&self, row: [f64; 5]) -> Result<(), FixtureError> {
        self.connection
            .execute(INSERT_QUERY_SQL, params![row[0], row[1], row[2], row[3], row[4]])
            .map_err(|err| FixtureError::Db(err.to_string()))?;
        Ok(())
    }

    /// Appends `rows` synthetic rows to every table in one transaction.
    ///
    /// Client get phases split the synthetic value into thirds, so the summed
    /// get latency equals the store latency of the same row. Breakdown phases
    /// are fixed fractions of the total.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::Db`] when any insert fails; no rows are kept.
    pub fn write_synthetic(&mut self, rows: u32, profile: SyntheticProfile) -> Result<(), FixtureError> {
        let tx = self.connection.transaction().map_err(|err| FixtureError::Db(err.to_string()))?;
        for index in 0 .. rows {
            let total = profile.value(index);
            let third = total / 3.0;
            tx.execute(INSERT_CLIENT_SQL, params![total, third, third, total - 2.0 * third])
                .map_err(|err| FixtureError::Db(err.to_string()))?;
            tx.execute(INSERT_STORE_SQL, params![total, total * 0.25, total * 0.25, total * 0.5])
                .map_err(|err| FixtureError::Db(err.to_string()))?;
            tx.execute(
                INSERT_QUERY_SQL,
                params![total, total * 0.2, total * 0.2, total * 0.2, total * 0.4],
            )
            .map_err(|err| FixtureError::Db(err.to_string()))?;
        }
        tx.commit().map_err(|err| FixtureError::Db(err.to_string()))
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::SyntheticProfile;

    #[test]
    fn synthetic_values_stay_within_profile_range() {
        let profile = SyntheticProfile {
            base_ms: 5.0,
            spread_ms: 10.0,
        };
        for index in 0 .. 2_000 {
            let value = profile.value(index);
            assert!((5.0 ..= 15.0).contains(&value));
        }
        assert_eq!(profile.value(0).to_bits(), 5.0_f64.to_bits());
    }

    #[test]
    fn run_profiles_grow_with_latency() {
        let fast = SyntheticProfile::for_run(64, 0);
        let slow = SyntheticProfile::for_run(64, 30);
        assert!(slow.base_ms > fast.base_ms);
        assert!(slow.spread_ms > fast.spread_ms);
    }
}
