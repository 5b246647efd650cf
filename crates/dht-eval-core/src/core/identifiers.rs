// crates/dht-eval-core/src/core/identifiers.rs
// ============================================================================
// Module: DHT Eval Identifiers
// Description: Run parameters and experiment keys derived from run filenames.
// Purpose: Provide strongly typed, ordered keys for aggregated rows.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! A benchmark run is identified by the parameters encoded in its database
//! filename. [`RunParameters`] carries all four of them; [`ExperimentKey`]
//! keeps the two that select an aggregated row and orders rows by node count,
//! then latency.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Run Parameters
// ============================================================================

/// Parameters encoded in a benchmark database filename.
///
/// # Invariants
/// - `latency_one_way` is the simulated one-way delay in milliseconds as
///   written in the filename.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunParameters {
    /// Replication constant `k` of the benchmarked DHT.
    pub k: u32,
    /// Branching factor `a` of the benchmarked DHT.
    pub a: u32,
    /// Number of nodes in the benchmarked network.
    pub num_nodes: u32,
    /// Simulated one-way latency in milliseconds.
    pub latency_one_way: u32,
}

impl RunParameters {
    /// Returns the experiment key for these parameters.
    ///
    /// The key latency approximates the round-trip time by doubling the
    /// one-way delay. Returns `None` when doubling overflows.
    #[must_use]
    pub fn experiment_key(&self) -> Option<ExperimentKey> {
        let latency = self.latency_one_way.checked_mul(2)?;
        Some(ExperimentKey::new(self.num_nodes, latency))
    }
}

// ============================================================================
// SECTION: Experiment Key
// ============================================================================

/// Key of one aggregated row: node count and round-trip latency.
///
/// # Invariants
/// - Ordering is lexicographic on (`num_nodes`, `latency`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ExperimentKey {
    /// Number of nodes in the benchmarked network.
    pub num_nodes: u32,
    /// Round-trip latency in milliseconds.
    pub latency: u32,
}

impl ExperimentKey {
    /// Creates a new experiment key.
    #[must_use]
    pub const fn new(num_nodes: u32, latency: u32) -> Self {
        Self {
            num_nodes,
            latency,
        }
    }
}

impl fmt::Display for ExperimentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n={} rtt={}ms", self.num_nodes, self.latency)
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
