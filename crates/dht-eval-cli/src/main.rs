// crates/dht-eval-cli/src/main.rs
// ============================================================================
// Module: DHT Eval CLI Entry Point
// Description: Command dispatcher for DHT benchmark aggregation and reports.
// Purpose: Run the evaluation pipeline over benchmark run databases.
// Dependencies: clap, dht-eval-config, dht-eval-core, dht-eval-store-sqlite,
//               serde_json, thiserror, tracing-subscriber.
// ============================================================================

//! ## Overview
//! `dht-eval` loads `dht-eval.toml`, evaluates every configured experiment
//! directory through the `SQLite` sample source, and either prints the
//! aggregated report or writes the report documents consumed by chart
//! renderers. Diagnostics go to stderr and are filtered by `RUST_LOG`.

// ============================================================================
// SECTION: Modules
// ============================================================================

mod render;

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::ArgAction;
use clap::Args;
use clap::CommandFactory;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use dht_eval_config::EvalConfig;
use dht_eval_config::config_toml_example;
use dht_eval_core::EvaluationReport;
use dht_eval_core::evaluate;
use dht_eval_core::latency_fixed_layout;
use dht_eval_core::nodes_fixed_layout;
use dht_eval_store_sqlite::SqliteSampleSource;
use serde::Serialize;
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Filter applied when `RUST_LOG` is unset or invalid.
const DEFAULT_LOG_FILTER: &str = "warn";
/// Filename of the full evaluation report.
const RESULTS_FILE_NAME: &str = "results.json";

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "dht-eval", disable_help_subcommand = true, disable_version_flag = true)]
struct Cli {
    /// Print version information and exit.
    #[arg(long = "version", action = ArgAction::SetTrue, global = true)]
    show_version: bool,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Aggregate benchmark runs and print the result table.
    Aggregate(AggregateCommand),
    /// Aggregate benchmark runs and write the report documents.
    Report(ReportCommand),
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Inputs shared by every evaluating command.
#[derive(Args, Debug)]
struct InputArgs {
    /// Optional config file path (defaults to dht-eval.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Experiment directory; repeat to average experiments (overrides config).
    #[arg(long = "input", value_name = "DIR")]
    inputs: Vec<PathBuf>,
}

/// Configuration for the `aggregate` command.
#[derive(Args, Debug)]
struct AggregateCommand {
    /// Config and input selection.
    #[command(flatten)]
    input: InputArgs,
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,
}

/// Configuration for the `report` command.
#[derive(Args, Debug)]
struct ReportCommand {
    /// Config and input selection.
    #[command(flatten)]
    input: InputArgs,
    /// Output directory (overrides `output_directory`).
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Validate a dht-eval configuration file.
    Validate(ConfigValidateCommand),
    /// Print the canonical example configuration.
    Example,
}

/// Configuration for the `config validate` command.
#[derive(Args, Debug)]
struct ConfigValidateCommand {
    /// Optional config file path (defaults to dht-eval.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Output formats for `aggregate`.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    /// Pretty-printed JSON report.
    Json,
    /// Markdown tables.
    Markdown,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for user-facing error messages.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`] from a message.
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
fn main() -> ExitCode {
    init_tracing();
    match run() {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Installs the stderr log subscriber.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).try_init();
}

/// Executes the CLI command dispatcher.
fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();

    if cli.show_version {
        let version = env!("CARGO_PKG_VERSION");
        write_stdout_line(&format!("dht-eval {version}"))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(ExitCode::SUCCESS);
    }

    let Some(command) = cli.command else {
        show_help()?;
        return Ok(ExitCode::SUCCESS);
    };

    match command {
        Commands::Aggregate(command) => command_aggregate(&command),
        Commands::Report(command) => command_report(&command),
        Commands::Config {
            command,
        } => command_config(&command),
    }
}

/// Prints top-level help.
fn show_help() -> CliResult<()> {
    let help = Cli::command().render_help().to_string();
    write_stdout_line(help.trim_end()).map_err(|err| CliError::new(output_error("stdout", &err)))
}

// ============================================================================
// SECTION: Evaluation Commands
// ============================================================================

/// Executes the `aggregate` command.
fn command_aggregate(command: &AggregateCommand) -> CliResult<ExitCode> {
    let config = load_config(&command.input)?;
    let report = run_evaluation(&config)?;
    let output = match command.format {
        OutputFormat::Json => to_json(&report)?,
        OutputFormat::Markdown => render::report_markdown(&report),
    };
    write_stdout_line(output.trim_end()).map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Executes the `report` command.
fn command_report(command: &ReportCommand) -> CliResult<ExitCode> {
    let config = load_config(&command.input)?;
    let report = run_evaluation(&config)?;
    let output_dir = command.output_dir.clone().unwrap_or_else(|| config.output_directory.clone());
    fs::create_dir_all(&output_dir).map_err(|err| {
        CliError::new(format!("failed to create {}: {err}", output_dir.display()))
    })?;

    let by_latency = latency_fixed_layout(&report.table, &config.report.latency_panels);
    let by_nodes = nodes_fixed_layout(&report.table, &config.report.node_panels);
    let written = [
        write_json_file(&output_dir.join(format!("{}.json", by_latency.name)), &by_latency)?,
        write_json_file(&output_dir.join(format!("{}.json", by_nodes.name)), &by_nodes)?,
        write_json_file(&output_dir.join(RESULTS_FILE_NAME), &report)?,
    ];
    for path in &written {
        write_stdout_line(&format!("wrote {}", path.display()))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    }
    Ok(ExitCode::SUCCESS)
}

/// Loads configuration with CLI input overrides.
fn load_config(input: &InputArgs) -> CliResult<EvalConfig> {
    EvalConfig::load_with_inputs(input.config.as_deref(), &input.inputs)
        .map_err(|err| CliError::new(format!("failed to load config: {err}")))
}

/// Runs the pipeline over the `SQLite` sample source.
fn run_evaluation(config: &EvalConfig) -> CliResult<EvaluationReport> {
    let options = config
        .to_options()
        .map_err(|err| CliError::new(format!("failed to load config: {err}")))?;
    let source = SqliteSampleSource::new(config.sqlite);
    let report = evaluate(&source, &options)
        .map_err(|err| CliError::new(format!("evaluation failed: {err}")))?;
    info!(rows = report.table.len(), detail = report.detail.is_some(), "report ready");
    Ok(report)
}

// ============================================================================
// SECTION: Config Commands
// ============================================================================

/// Dispatches config subcommands.
fn command_config(command: &ConfigCommand) -> CliResult<ExitCode> {
    match command {
        ConfigCommand::Validate(command) => command_config_validate(command),
        ConfigCommand::Example => {
            write_stdout_line(config_toml_example().trim_end())
                .map_err(|err| CliError::new(output_error("stdout", &err)))?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Executes the config validation command.
fn command_config_validate(command: &ConfigValidateCommand) -> CliResult<ExitCode> {
    let config = EvalConfig::load(command.config.as_deref())
        .map_err(|err| CliError::new(format!("failed to load config: {err}")))?;
    let source = config
        .source_path
        .as_ref()
        .map_or_else(|| "built-in defaults".to_string(), |path| path.display().to_string());
    write_stdout_line(&format!("config ok: {source}"))
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Serializes a value as pretty JSON.
fn to_json<T: Serialize>(value: &T) -> CliResult<String> {
    serde_json::to_string_pretty(value)
        .map_err(|err| CliError::new(format!("failed to serialize report: {err}")))
}

/// Writes a value as pretty JSON to `path` and returns the path.
fn write_json_file<T: Serialize>(path: &Path, value: &T) -> CliResult<PathBuf> {
    let mut json = to_json(value)?;
    json.push('\n');
    fs::write(path, json)
        .map_err(|err| CliError::new(format!("failed to write {}: {err}", path.display())))?;
    info!(path = %path.display(), "wrote report document");
    Ok(path.to_path_buf())
}

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats an output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    format!("failed to write to {stream}: {error}")
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
