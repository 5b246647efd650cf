// crates/dht-eval-store-sqlite/src/lib.rs
// ============================================================================
// Module: DHT Eval SQLite Source
// Description: SampleSource backed by per-run SQLite benchmark databases.
// Purpose: Extract windowed measurement rows from benchmark output files.
// Dependencies: dht-eval-core, rusqlite
// ============================================================================

//! ## Overview
//! This crate provides the SQLite-backed [`SampleSource`] used to read the
//! per-run benchmark databases, and [`BenchmarkDbWriter`], which produces
//! databases with the same schema for tests and demos. Databases are opened
//! read-only and every connection is closed before a fetch returns.
//!
//! [`SampleSource`]: dht_eval_core::SampleSource

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod fixture;
pub mod source;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use fixture::BenchmarkDbWriter;
pub use fixture::FixtureError;
pub use fixture::SyntheticProfile;
pub use source::DEFAULT_BUSY_TIMEOUT_MS;
pub use source::SqliteSampleSource;
pub use source::SqliteSourceConfig;
pub use source::query_sql;
