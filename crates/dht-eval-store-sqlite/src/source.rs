// crates/dht-eval-store-sqlite/src/source.rs
// ============================================================================
// Module: SQLite Sample Source
// Description: Windowed measurement extraction from benchmark run databases.
// Purpose: Implement SampleSource over read-only SQLite connections.
// Dependencies: dht-eval-core, rusqlite, serde, tracing
// ============================================================================

//! ## Overview
//! [`SqliteSampleSource`] opens a benchmark run database read-only, executes
//! the fixed SQL statement of every requested [`MeasurementQuery`] on that one
//! connection, and closes it before returning. Each statement selects a row-id
//! window bound as `?1` (inclusive start) and `?2` (exclusive end). Database
//! contents are untrusted: non-numeric cells surface as data access errors.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;
use std::time::Duration;

use dht_eval_core::MeasurementQuery;
use dht_eval_core::RowWindow;
use dht_eval_core::SampleMatrix;
use dht_eval_core::SampleSource;
use dht_eval_core::SourceError;
use rusqlite::Connection;
use rusqlite::OpenFlags;
use rusqlite::params;
use serde::Deserialize;
use tracing::debug;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default busy timeout for read connections (milliseconds).
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// Client-level store latency and summed get latency.
const CLIENT_SQL: &str = "SELECT time_store_chunk, time_fetch_addr + time_fetch_nonce + \
                          time_fetch_chunk FROM CLIENT_STORE_GET WHERE _rowid_ >= ?1 AND \
                          _rowid_ < ?2";

/// Server-side store-path breakdown.
const STORE_BREAKDOWN_SQL: &str = "SELECT time_total_rpc_store, time_fetch_policy, \
                                   time_check_chunk_valid, time_db_store_chunk FROM STORE_CHUNK \
                                   WHERE _rowid_ >= ?1 AND _rowid_ < ?2";

/// Server-side local-query breakdown.
const QUERY_BREAKDOWN_SQL: &str = "SELECT time_total_local_query, time_check_token_valid, \
                                   time_fetch_policy, time_check_access_valid, \
                                   time_db_get_chunk FROM QUERY_CHUNK_LOCAL WHERE _rowid_ >= ?1 \
                                   AND _rowid_ < ?2";

/// Returns the SQL statement executed for `query`.
#[must_use]
pub const fn query_sql(query: MeasurementQuery) -> &'static str {
    match query {
        MeasurementQuery::Client => CLIENT_SQL,
        MeasurementQuery::StoreBreakdown => STORE_BREAKDOWN_SQL,
        MeasurementQuery::QueryBreakdown => QUERY_BREAKDOWN_SQL,
    }
}

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Connection settings for [`SqliteSampleSource`].
///
/// # Invariants
/// - `busy_timeout_ms` is interpreted as milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SqliteSourceConfig {
    /// Busy timeout in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
}

impl Default for SqliteSourceConfig {
    fn default() -> Self {
        Self {
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
        }
    }
}

/// Returns the default busy timeout for `SQLite` connections.
const fn default_busy_timeout_ms() -> u64 {
    DEFAULT_BUSY_TIMEOUT_MS
}

// ============================================================================
// SECTION: Source
// ============================================================================

/// Read-only [`SampleSource`] over benchmark run databases.
#[derive(Debug, Clone, Default)]
pub struct SqliteSampleSource {
    /// Connection settings.
    config: SqliteSourceConfig,
}

impl SqliteSampleSource {
    /// Creates a source with the given connection settings.
    #[must_use]
    pub const fn new(config: SqliteSourceConfig) -> Self {
        Self {
            config,
        }
    }
}

impl SampleSource for SqliteSampleSource {
    fn fetch(
        &self,
        path: &Path,
        queries: &[MeasurementQuery],
        window: RowWindow,
    ) -> Result<Vec<SampleMatrix>, SourceError> {
        if !path.is_file() {
            return Err(SourceError::NotFound(path.display().to_string()));
        }
        let connection = open_read_only(path, self.config)?;
        let mut matrices = Vec::with_capacity(queries.len());
        for &query in queries {
            let matrix = run_query(&connection, path, query, window)?;
            debug!(
                path = %path.display(),
                query = query.name(),
                rows = matrix.row_count(),
                "extracted benchmark rows"
            );
            matrices.push(matrix);
        }
        Ok(matrices)
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Opens a read-only connection to a run database.
fn open_read_only(path: &Path, config: SqliteSourceConfig) -> Result<Connection, SourceError> {
    let flags = OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX;
    let connection =
        Connection::open_with_flags(path, flags).map_err(|err| data_access(path, &err))?;
    connection
        .busy_timeout(Duration::from_millis(config.busy_timeout_ms))
        .map_err(|err| data_access(path, &err))?;
    Ok(connection)
}

/// Executes one measurement query over the row window.
fn run_query(
    connection: &Connection,
    path: &Path,
    query: MeasurementQuery,
    window: RowWindow,
) -> Result<SampleMatrix, SourceError> {
    let width = query.column_count();
    let mut matrix = SampleMatrix::new(width).map_err(|err| data_access(path, &err))?;
    let mut statement = connection.prepare(query_sql(query)).map_err(|err| data_access(path, &err))?;
    let mut rows =
        statement.query(params![window.start, window.end]).map_err(|err| data_access(path, &err))?;
    let mut values = Vec::with_capacity(width);
    while let Some(row) = rows.next().map_err(|err| data_access(path, &err))? {
        values.clear();
        for index in 0 .. width {
            let value: f64 = row.get(index).map_err(|err| data_access(path, &err))?;
            values.push(value);
        }
        matrix.push_row(&values).map_err(|err| data_access(path, &err))?;
    }
    Ok(matrix)
}

/// Maps a failure to a data access error naming the database.
fn data_access(path: &Path, err: &dyn std::fmt::Display) -> SourceError {
    SourceError::DataAccess(format!("{}: {err}", path.display()))
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use dht_eval_core::MeasurementQuery;

    use super::query_sql;

    #[test]
    fn every_statement_binds_the_row_window() {
        for query in
            [MeasurementQuery::Client, MeasurementQuery::StoreBreakdown, MeasurementQuery::QueryBreakdown]
        {
            let sql = query_sql(query);
            assert!(sql.contains(query.table()));
            assert!(sql.ends_with("WHERE _rowid_ >= ?1 AND _rowid_ < ?2"));
        }
    }
}
