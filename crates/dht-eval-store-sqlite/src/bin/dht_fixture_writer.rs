//! Benchmark database writer for tests and demos.
// crates/dht-eval-store-sqlite/src/bin/dht_fixture_writer.rs
// ============================================================================
// Binary: DHT Fixture Writer
// Description: Writes a synthetic benchmark run database.
// Purpose: Produce run databases without running the DHT benchmark.
// Dependencies: dht-eval-core, dht-eval-store-sqlite
// ============================================================================

use std::env;
use std::path::PathBuf;

use dht_eval_core::RunFilePattern;
use dht_eval_store_sqlite::BenchmarkDbWriter;
use dht_eval_store_sqlite::SyntheticProfile;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = env::args().skip(1);
    let path = args.next().ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "usage: dht_fixture_writer <path> <rows>",
        )
    })?;
    let rows: u32 = args.next().as_deref().unwrap_or("1025").parse()?;
    let path = PathBuf::from(path);
    let profile = profile_for(&path)?;
    let mut writer = BenchmarkDbWriter::create(&path)?;
    writer.write_synthetic(rows, profile)?;
    Ok(())
}

/// Derives the synthetic profile from a run filename when it follows the
/// benchmark naming convention.
fn profile_for(path: &std::path::Path) -> Result<SyntheticProfile, Box<dyn std::error::Error>> {
    let pattern = RunFilePattern::standard()?;
    let params = path.file_name().and_then(|name| name.to_str()).and_then(|name| pattern.parse(name));
    Ok(params.map_or_else(SyntheticProfile::default, |params| {
        SyntheticProfile::for_run(params.num_nodes, params.latency_one_way.saturating_mul(2))
    }))
}
