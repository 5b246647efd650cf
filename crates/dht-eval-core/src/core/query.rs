// crates/dht-eval-core/src/core/query.rs
// ============================================================================
// Module: DHT Eval Measurement Queries
// Description: The fixed projections sampled from each benchmark database.
// Purpose: Name each projection and describe the columns it returns.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Every benchmark database records three operation logs. A
//! [`MeasurementQuery`] selects one of them and fixes the list of numeric
//! columns projected from it, so aggregated rows can be labeled without
//! knowing how a [`crate::SampleSource`] reads them.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Column Labels
// ============================================================================

/// Columns of the client-level projection.
const CLIENT_COLUMNS: [&str; 2] = ["store", "get"];
/// Columns of the server-side store breakdown.
const STORE_BREAKDOWN_COLUMNS: [&str; 4] =
    ["total_rpc_store", "fetch_policy", "check_chunk_valid", "db_store_chunk"];
/// Columns of the server-side query breakdown.
const QUERY_BREAKDOWN_COLUMNS: [&str; 5] =
    ["total_local_query", "check_token_valid", "fetch_policy", "check_access_valid", "db_get_chunk"];

// ============================================================================
// SECTION: Measurement Query
// ============================================================================

/// Fixed projection over one benchmark operation log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasurementQuery {
    /// Client-visible store latency and total fetch latency.
    Client,
    /// Server-side breakdown of a chunk store.
    StoreBreakdown,
    /// Server-side breakdown of a local chunk query.
    QueryBreakdown,
}

impl MeasurementQuery {
    /// Returns the stable name of the query.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::StoreBreakdown => "store_breakdown",
            Self::QueryBreakdown => "query_breakdown",
        }
    }

    /// Returns the benchmark table the query reads.
    #[must_use]
    pub const fn table(self) -> &'static str {
        match self {
            Self::Client => "CLIENT_STORE_GET",
            Self::StoreBreakdown => "STORE_CHUNK",
            Self::QueryBreakdown => "QUERY_CHUNK_LOCAL",
        }
    }

    /// Returns the labels of the projected columns, in projection order.
    #[must_use]
    pub const fn column_labels(self) -> &'static [&'static str] {
        match self {
            Self::Client => &CLIENT_COLUMNS,
            Self::StoreBreakdown => &STORE_BREAKDOWN_COLUMNS,
            Self::QueryBreakdown => &QUERY_BREAKDOWN_COLUMNS,
        }
    }

    /// Returns the number of projected columns.
    #[must_use]
    pub const fn column_count(self) -> usize {
        self.column_labels().len()
    }
}

impl fmt::Display for MeasurementQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
