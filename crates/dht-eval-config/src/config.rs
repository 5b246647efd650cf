// crates/dht-eval-config/src/config.rs
// ============================================================================
// Module: DHT Eval Configuration
// Description: Configuration loading and validation for dht-eval.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: dht-eval-core, dht-eval-store-sqlite, serde, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! The path comes from the caller, then the `DHT_EVAL_CONFIG` environment
//! variable, then `dht-eval.toml` in the working directory. Only the last of
//! these may be absent, in which case built-in defaults apply. Unknown keys
//! and invalid values fail closed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use dht_eval_core::EvaluationOptions;
use dht_eval_core::ExperimentKey;
use dht_eval_core::RowWindow;
use dht_eval_core::RunFilePattern;
use dht_eval_core::runtime::aggregate::DEFAULT_CLIENT_PERCENTILE;
use dht_eval_core::runtime::aggregate::DEFAULT_DETAIL_PERCENTILE;
use dht_eval_core::runtime::locator::DEFAULT_FILE_EXTENSION;
use dht_eval_core::runtime::locator::DEFAULT_FILE_PREFIX;
use dht_eval_store_sqlite::SqliteSourceConfig;
use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
pub const DEFAULT_CONFIG_NAME: &str = "dht-eval.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "DHT_EVAL_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum number of input directories.
pub(crate) const MAX_INPUT_DIRECTORIES: usize = 64;
/// Maximum number of panels per report layout.
pub(crate) const MAX_REPORT_PANELS: usize = 16;
/// Default report output directory.
const DEFAULT_OUTPUT_DIRECTORY: &str = "plots";
/// Default node count of the detail snapshot.
const DEFAULT_DETAIL_NODES: u32 = 512;
/// Default round-trip latency of the detail snapshot.
const DEFAULT_DETAIL_LATENCY: u32 = 30;

// ============================================================================
// SECTION: Config Model
// ============================================================================

/// Top-level `dht-eval.toml` configuration.
///
/// # Invariants
/// - Every field has a built-in default; an empty file is a valid source.
/// - Validation requires at least one input directory.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EvalConfig {
    /// Experiment directories; repeated experiments are averaged.
    #[serde(default)]
    pub input_directories: Vec<PathBuf>,
    /// Directory receiving report documents.
    #[serde(default = "default_output_directory")]
    pub output_directory: PathBuf,
    /// High percentile for client-level rows.
    #[serde(default = "default_percentile_client")]
    pub percentile_client: f64,
    /// High percentile for the detail breakdowns.
    #[serde(default = "default_percentile_detail")]
    pub percentile_detail: f64,
    /// Row-id window sampled from every table.
    #[serde(default)]
    pub row_window: RowWindow,
    /// Configuration whose server-side breakdowns are captured.
    #[serde(default = "default_detail_snapshot_key")]
    pub detail_snapshot_key: ExperimentKey,
    /// Run filename convention.
    #[serde(default)]
    pub locator: LocatorConfig,
    /// Report facet selection.
    #[serde(default)]
    pub report: ReportConfig,
    /// `SQLite` connection settings.
    #[serde(default)]
    pub sqlite: SqliteSourceConfig,
    /// File the configuration was read from (not serialized).
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            input_directories: Vec::new(),
            output_directory: default_output_directory(),
            percentile_client: DEFAULT_CLIENT_PERCENTILE,
            percentile_detail: DEFAULT_DETAIL_PERCENTILE,
            row_window: RowWindow::default(),
            detail_snapshot_key: default_detail_snapshot_key(),
            locator: LocatorConfig::default(),
            report: ReportConfig::default(),
            sqlite: SqliteSourceConfig::default(),
            source_path: None,
        }
    }
}

impl EvalConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with_inputs(path, &[])
    }

    /// Loads configuration, replacing `input_directories` when `inputs` is
    /// non-empty, then validates the result.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load_with_inputs(path: Option<&Path>, inputs: &[PathBuf]) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        validate_path(&resolved.path)?;
        let mut config = if !resolved.required && !resolved.path.exists() {
            Self::default()
        } else {
            Self::read(&resolved.path)?
        };
        if !inputs.is_empty() {
            config.input_directories = inputs.to_vec();
        }
        config.validate()?;
        Ok(config)
    }

    /// Parses a config file without validating it.
    fn read(path: &Path) -> Result<Self, ConfigError> {
        let bytes = fs::read(path)
            .map_err(|err| ConfigError::Io(format!("{}: {err}", path.display())))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        let mut config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.source_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.input_directories.is_empty() {
            return Err(ConfigError::Invalid(
                "input_directories must list at least one directory".to_string(),
            ));
        }
        if self.input_directories.len() > MAX_INPUT_DIRECTORIES {
            return Err(ConfigError::Invalid(format!(
                "input_directories exceeds {MAX_INPUT_DIRECTORIES} entries"
            )));
        }
        for directory in &self.input_directories {
            validate_path_string("input_directories", &directory.to_string_lossy())?;
        }
        validate_path_string("output_directory", &self.output_directory.to_string_lossy())?;
        self.row_window
            .validate()
            .map_err(|err| ConfigError::Invalid(format!("row_window: {err}")))?;
        validate_percentile("percentile_client", self.percentile_client)?;
        validate_percentile("percentile_detail", self.percentile_detail)?;
        self.locator.validate()?;
        self.report.validate()?;
        if self.sqlite.busy_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "sqlite.busy_timeout_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Converts the configuration into pipeline options.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when the run filename pattern cannot
    /// be built.
    pub fn to_options(&self) -> Result<EvaluationOptions, ConfigError> {
        let pattern = RunFilePattern::new(&self.locator.file_prefix, &self.locator.file_extension)
            .map_err(|err| ConfigError::Invalid(err.to_string()))?;
        Ok(EvaluationOptions {
            directories: self.input_directories.clone(),
            pattern,
            window: self.row_window,
            percentile_client: self.percentile_client,
            percentile_detail: self.percentile_detail,
            detail_key: Some(self.detail_snapshot_key),
        })
    }
}

/// Run filename convention: `<prefix>_k<K>_a<A>_n<N>_l<L>.<extension>`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LocatorConfig {
    /// Filename prefix.
    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,
    /// Filename extension without the leading dot.
    #[serde(default = "default_file_extension")]
    pub file_extension: String,
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self {
            file_prefix: default_file_prefix(),
            file_extension: default_file_extension(),
        }
    }
}

impl LocatorConfig {
    /// Validates the filename convention.
    fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("locator.file_prefix", self.file_prefix.as_str()),
            ("locator.file_extension", self.file_extension.as_str()),
        ];
        for (field, value) in fields {
            if value.is_empty() {
                return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
            }
            if value.contains(['/', '\\']) {
                return Err(ConfigError::Invalid(format!(
                    "{field} must not contain path separators"
                )));
            }
            if value.len() > MAX_PATH_COMPONENT_LENGTH {
                return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
            }
        }
        if self.file_extension.contains('.') {
            return Err(ConfigError::Invalid(
                "locator.file_extension must not contain '.'".to_string(),
            ));
        }
        Ok(())
    }
}

/// Panels drawn by the report layouts.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReportConfig {
    /// Round-trip latencies, one latency-fixed panel each.
    #[serde(default = "default_latency_panels")]
    pub latency_panels: Vec<u32>,
    /// Node counts, one nodes-fixed panel each.
    #[serde(default = "default_node_panels")]
    pub node_panels: Vec<u32>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            latency_panels: default_latency_panels(),
            node_panels: default_node_panels(),
        }
    }
}

impl ReportConfig {
    /// Validates panel list sizes.
    fn validate(&self) -> Result<(), ConfigError> {
        let lists = [
            ("report.latency_panels", self.latency_panels.len()),
            ("report.node_panels", self.node_panels.len()),
        ];
        for (field, len) in lists {
            if len > MAX_REPORT_PANELS {
                return Err(ConfigError::Invalid(format!(
                    "{field} exceeds {MAX_REPORT_PANELS} entries"
                )));
            }
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Defaults
// ============================================================================

/// Returns the default report output directory.
fn default_output_directory() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_DIRECTORY)
}

/// Returns the default client percentile.
const fn default_percentile_client() -> f64 {
    DEFAULT_CLIENT_PERCENTILE
}

/// Returns the default detail percentile.
const fn default_percentile_detail() -> f64 {
    DEFAULT_DETAIL_PERCENTILE
}

/// Returns the default detail snapshot key.
const fn default_detail_snapshot_key() -> ExperimentKey {
    ExperimentKey::new(DEFAULT_DETAIL_NODES, DEFAULT_DETAIL_LATENCY)
}

/// Returns the default run filename prefix.
fn default_file_prefix() -> String {
    DEFAULT_FILE_PREFIX.to_string()
}

/// Returns the default run filename extension.
fn default_file_extension() -> String {
    DEFAULT_FILE_EXTENSION.to_string()
}

/// Returns the default latency-fixed panels.
fn default_latency_panels() -> Vec<u32> {
    vec![0, 10, 20, 30]
}

/// Returns the default nodes-fixed panels.
fn default_node_panels() -> Vec<u32> {
    vec![16, 64, 256, 512]
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading or validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Config path chosen by the resolution rules.
struct ResolvedPath {
    /// Path to read.
    path: PathBuf,
    /// Whether a missing file is an error.
    required: bool,
}

/// Resolves the config path from CLI or environment defaults.
fn resolve_path(path: Option<&Path>) -> Result<ResolvedPath, ConfigError> {
    if let Some(path) = path {
        return Ok(ResolvedPath {
            path: path.to_path_buf(),
            required: true,
        });
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(ResolvedPath {
            path: PathBuf::from(env_path),
            required: true,
        });
    }
    Ok(ResolvedPath {
        path: PathBuf::from(DEFAULT_CONFIG_NAME),
        required: false,
    })
}

/// Validates the resolved path against length limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a path string against length constraints.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    for component in Path::new(trimmed).components() {
        let component_value = component.as_os_str().to_string_lossy();
        if component_value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}

/// Validates a percentile rank.
fn validate_percentile(field: &str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() || !(0.0 ..= 100.0).contains(&value) {
        return Err(ConfigError::Invalid(format!("{field} must be within [0, 100]")));
    }
    Ok(())
}

// ============================================================================
// SECTION: Tests
// ============================================================================
