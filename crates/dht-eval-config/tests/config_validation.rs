//! Config loading and validation tests for dht-eval-config.
// crates/dht-eval-config/tests/config_validation.rs
// =============================================================================
// Module: Config Loading and Validation Tests
// Description: Validate defaults, file limits, and field invariants.
// Purpose: Ensure config loading fails closed on every invalid input.
// =============================================================================

#![allow(
    clippy::use_debug,
    clippy::float_cmp,
    reason = "Test-only diagnostics and exact default comparisons are permitted."
)]

use std::fs;
use std::path::PathBuf;

use dht_eval_config::ConfigError;
use dht_eval_config::EvalConfig;
use dht_eval_config::config_toml_example;
use dht_eval_core::ExperimentKey;
use dht_eval_core::RowWindow;
use tempfile::TempDir;

type TestResult = Result<(), String>;

fn write_config(dir: &TempDir, content: &[u8]) -> Result<PathBuf, String> {
    let path = dir.path().join("dht-eval.toml");
    fs::write(&path, content).map_err(|err| err.to_string())?;
    Ok(path)
}

fn config_from_toml(toml_str: &str) -> Result<EvalConfig, String> {
    toml::from_str(toml_str).map_err(|err| err.to_string())
}

fn assert_invalid(result: Result<(), ConfigError>, needle: &str) -> TestResult {
    match result {
        Err(ConfigError::Invalid(message)) => {
            if message.contains(needle) {
                Ok(())
            } else {
                Err(format!("error {message} did not contain {needle}"))
            }
        }
        Err(other) => Err(format!("expected invalid config, got {other}")),
        Ok(()) => Err("expected invalid config".to_string()),
    }
}

fn with_input(mut config: EvalConfig) -> EvalConfig {
    config.input_directories = vec![PathBuf::from("data/run-1")];
    config
}

// ============================================================================
// SECTION: Loading
// ============================================================================

#[test]
fn example_config_loads_and_matches_defaults() -> TestResult {
    let dir = TempDir::new().map_err(|err| err.to_string())?;
    let path = write_config(&dir, config_toml_example().as_bytes())?;
    let loaded = EvalConfig::load(Some(&path)).map_err(|err| err.to_string())?;
    if loaded.source_path.as_deref() != Some(path.as_path()) {
        return Err("source_path should record the loaded file".to_string());
    }
    let mut expected = EvalConfig {
        input_directories: vec![PathBuf::from("../data/local_dht_benchmark_k10_a3")],
        ..EvalConfig::default()
    };
    expected.source_path = Some(path);
    if loaded != expected {
        return Err(format!("example diverges from defaults: {loaded:?}"));
    }
    Ok(())
}

#[test]
fn empty_file_uses_defaults_with_input_override() -> TestResult {
    let dir = TempDir::new().map_err(|err| err.to_string())?;
    let path = write_config(&dir, b"")?;
    let inputs = vec![PathBuf::from("a"), PathBuf::from("b")];
    let config = EvalConfig::load_with_inputs(Some(&path), &inputs).map_err(|err| err.to_string())?;
    if config.input_directories != inputs {
        return Err("inputs should replace input_directories".to_string());
    }
    if config.row_window != RowWindow::default() || config.percentile_client != 99.0 {
        return Err("defaults should apply to an empty file".to_string());
    }
    Ok(())
}

#[test]
fn empty_file_without_inputs_is_rejected() -> TestResult {
    let dir = TempDir::new().map_err(|err| err.to_string())?;
    let path = write_config(&dir, b"")?;
    match EvalConfig::load(Some(&path)) {
        Err(ConfigError::Invalid(message)) if message.contains("input_directories") => Ok(()),
        other => Err(format!("expected missing inputs error, got {other:?}")),
    }
}

#[test]
fn explicit_missing_file_is_io_error() -> TestResult {
    let dir = TempDir::new().map_err(|err| err.to_string())?;
    let path = dir.path().join("absent.toml");
    match EvalConfig::load_with_inputs(Some(&path), &[PathBuf::from("a")]) {
        Err(ConfigError::Io(_)) => Ok(()),
        other => Err(format!("expected io error, got {other:?}")),
    }
}

#[test]
fn unknown_keys_are_rejected() -> TestResult {
    let dir = TempDir::new().map_err(|err| err.to_string())?;
    let path = write_config(&dir, b"input_directories = [\"a\"]\nplot_format = \"pdf\"\n")?;
    match EvalConfig::load(Some(&path)) {
        Err(ConfigError::Parse(_)) => Ok(()),
        other => Err(format!("expected parse error, got {other:?}")),
    }
}

#[test]
fn oversized_file_is_rejected() -> TestResult {
    let dir = TempDir::new().map_err(|err| err.to_string())?;
    let mut content = b"input_directories = [\"a\"]\n".to_vec();
    content.extend(std::iter::repeat_n(b'#', 1024 * 1024));
    let path = write_config(&dir, &content)?;
    assert_invalid(EvalConfig::load(Some(&path)).map(|_| ()), "size limit")
}

#[test]
fn non_utf8_file_is_rejected() -> TestResult {
    let dir = TempDir::new().map_err(|err| err.to_string())?;
    let path = write_config(&dir, &[0xff, 0xfe, 0x00])?;
    assert_invalid(EvalConfig::load(Some(&path)).map(|_| ()), "utf-8")
}

// ============================================================================
// SECTION: Field Validation
// ============================================================================

#[test]
fn percentiles_must_be_within_range() -> TestResult {
    let mut config = with_input(config_from_toml("percentile_client = 100.5")?);
    assert_invalid(config.validate(), "percentile_client")?;
    config.percentile_client = 99.0;
    config.percentile_detail = -1.0;
    assert_invalid(config.validate(), "percentile_detail")
}

#[test]
fn row_window_must_be_valid() -> TestResult {
    let config = with_input(config_from_toml("[row_window]\nstart = 0\nend = 10\n")?);
    assert_invalid(config.validate(), "row_window")?;
    let config = with_input(config_from_toml("[row_window]\nstart = 50\nend = 50\n")?);
    assert_invalid(config.validate(), "row_window")
}

#[test]
fn locator_extension_must_not_contain_dot() -> TestResult {
    let config = with_input(config_from_toml("[locator]\nfile_extension = \".db\"\n")?);
    assert_invalid(config.validate(), "locator.file_extension")
}

#[test]
fn locator_prefix_must_not_be_empty() -> TestResult {
    let config = with_input(config_from_toml("[locator]\nfile_prefix = \"\"\n")?);
    assert_invalid(config.validate(), "locator.file_prefix")
}

#[test]
fn report_panels_are_bounded() -> TestResult {
    let mut config = with_input(EvalConfig::default());
    config.report.node_panels = (0 .. 17).collect();
    assert_invalid(config.validate(), "report.node_panels")
}

#[test]
fn input_directories_are_bounded() -> TestResult {
    let mut config = EvalConfig::default();
    config.input_directories = (0 .. 65).map(|index| PathBuf::from(format!("dir-{index}"))).collect();
    assert_invalid(config.validate(), "input_directories")
}

#[test]
fn busy_timeout_must_be_positive() -> TestResult {
    let config = with_input(config_from_toml("[sqlite]\nbusy_timeout_ms = 0\n")?);
    assert_invalid(config.validate(), "busy_timeout_ms")
}

// ============================================================================
// SECTION: Options
// ============================================================================

#[test]
fn options_carry_config_values() -> TestResult {
    let config = with_input(config_from_toml(
        "percentile_client = 95.0\n[detail_snapshot_key]\nnum_nodes = 64\nlatency = 10\n\
         [locator]\nfile_prefix = \"bench\"\nfile_extension = \"sqlite\"\n",
    )?);
    config.validate().map_err(|err| err.to_string())?;
    let options = config.to_options().map_err(|err| err.to_string())?;
    if options.percentile_client != 95.0 || options.percentile_detail != 90.0 {
        return Err("percentiles not carried over".to_string());
    }
    if options.detail_key != Some(ExperimentKey::new(64, 10)) {
        return Err("detail key not carried over".to_string());
    }
    let parsed = options.pattern.parse("bench_k1_a2_n64_l5.sqlite");
    if parsed.map(|params| params.num_nodes) != Some(64) {
        return Err("pattern should follow locator settings".to_string());
    }
    if options.pattern.parse("local_dht_benchmark_k1_a2_n64_l5.db").is_some() {
        return Err("default pattern should no longer match".to_string());
    }
    Ok(())
}
