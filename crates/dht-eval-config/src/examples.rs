// crates/dht-eval-config/src/examples.rs
// ============================================================================
// Module: Config Examples
// Description: Canonical example configuration payload.
// Purpose: Deterministic example for docs and the `config example` command.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Canonical example for `dht-eval.toml`. Every key is shown with its
//! built-in default except `input_directories`, which has none.

/// Returns a canonical example `dht-eval.toml` configuration.
#[must_use]
pub fn config_toml_example() -> String {
    String::from(
        r#"# Experiment directories; repeated experiments are averaged.
input_directories = ["../data/local_dht_benchmark_k10_a3"]
output_directory = "plots"
percentile_client = 99.0
percentile_detail = 90.0

[row_window]
start = 25
end = 1025

[detail_snapshot_key]
num_nodes = 512
latency = 30

[locator]
file_prefix = "local_dht_benchmark"
file_extension = "db"

[report]
latency_panels = [0, 10, 20, 30]
node_panels = [16, 64, 256, 512]

[sqlite]
busy_timeout_ms = 5000
"#,
    )
}
