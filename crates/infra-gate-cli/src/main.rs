// crates/infra-gate-cli/src/main.rs
// ============================================================================
// Module: Infra Gate CLI Entry Point
// Description: Command dispatcher for infrastructure conformance checks.
// Purpose: Run artifact and live suites, list the catalog, and manage config.
// Dependencies: clap, infra-gate-artifacts, infra-gate-aws, infra-gate-config,
//               infra-gate-core, thiserror, tokio.
// ============================================================================

//! ## Overview
//! The Infra Gate CLI loads `infra-gate.toml`, registers the artifact suites
//! (and the live AWS suites unless `--offline`), runs the selection, and
//! prints a report. The exit code is non-zero when any check failed or the
//! run could not start. All user-facing strings are routed through the i18n
//! catalog.

// ============================================================================
// SECTION: Modules
// ============================================================================

#[cfg(test)]
mod main_tests;

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::ArgAction;
use clap::Args;
use clap::CommandFactory;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use infra_gate_artifacts::ARTIFACT_SUITE_IDS;
use infra_gate_artifacts::artifact_catalog;
use infra_gate_artifacts::register_artifact_suites;
use infra_gate_aws::AwsInventory;
use infra_gate_aws::AwsOptions;
use infra_gate_aws::CloudInventory;
use infra_gate_aws::LIVE_SUITE_IDS;
use infra_gate_aws::live_catalog;
use infra_gate_aws::register_live_suites;
use infra_gate_cli::i18n::Locale;
use infra_gate_cli::i18n::set_locale;
use infra_gate_cli::render::render_catalog_json;
use infra_gate_cli::render::render_catalog_text;
use infra_gate_cli::render::render_report_json;
use infra_gate_cli::render::render_report_markdown;
use infra_gate_cli::render::render_report_text;
use infra_gate_cli::t;
use infra_gate_config::InfraGateConfig;
use infra_gate_config::LoggingConfig;
use infra_gate_config::config_toml_example;
use infra_gate_core::CheckEventSink;
use infra_gate_core::CheckFilter;
use infra_gate_core::FileEventSink;
use infra_gate_core::NoopEventSink;
use infra_gate_core::StderrEventSink;
use infra_gate_core::SuiteDescriptor;
use infra_gate_core::SuiteRegistry;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Environment variable selecting the output language.
const LANG_ENV: &str = "INFRA_GATE_LANG";

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// `infra-gate` arguments.
#[derive(Parser, Debug)]
#[command(name = "infra-gate", disable_help_subcommand = true, disable_version_flag = true)]
struct Cli {
    /// Print the version and exit.
    #[arg(long = "version", action = ArgAction::SetTrue, global = true)]
    show_version: bool,
    /// Preferred output language (overrides `INFRA_GATE_LANG`).
    #[arg(long, value_enum, value_name = "LANG", global = true)]
    lang: Option<LangArg>,
    /// Subcommand to run; help is printed when absent.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run conformance checks and print a report.
    Check(CheckCommand),
    /// Suite catalog utilities.
    Suites {
        /// Selected suites subcommand.
        #[command(subcommand)]
        command: SuitesCommand,
    },
    /// Inspect or validate `infra-gate.toml`.
    Config {
        /// Config action.
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Arguments for `check`.
#[derive(Args, Debug)]
struct CheckCommand {
    /// Optional config file path (defaults to infra-gate.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Suite to run; repeat to run several (defaults to every allowed suite).
    #[arg(long = "suite", value_name = "ID")]
    suites: Vec<String>,
    /// Check to run, bare or as `suite.check`; repeat to run several.
    #[arg(long = "check", value_name = "ID")]
    checks: Vec<String>,
    /// Report format.
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    format: ReportFormat,
    /// Run only artifact suites; never contact AWS.
    #[arg(long, action = ArgAction::SetTrue)]
    offline: bool,
    /// Repository root overriding `artifacts.root`.
    #[arg(long, value_name = "DIR")]
    root: Option<PathBuf>,
}

/// Suites subcommands.
#[derive(Subcommand, Debug)]
enum SuitesCommand {
    /// List every suite and its checks.
    List(SuitesListCommand),
}

/// Arguments for `suites list`.
#[derive(Args, Debug)]
struct SuitesListCommand {
    /// Output format.
    #[arg(long, value_enum, default_value_t = CatalogFormat::Text)]
    format: CatalogFormat,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Validate an Infra Gate configuration file.
    Validate(ConfigValidateCommand),
    /// Print an example configuration holding every default.
    Example,
}

/// Arguments for config validation.
#[derive(Args, Debug)]
struct ConfigValidateCommand {
    /// Optional config file path (defaults to infra-gate.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Run report formats.
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
enum ReportFormat {
    /// Human-readable text output.
    Text,
    /// Pretty-printed JSON output.
    Json,
    /// Markdown document output.
    Markdown,
}

/// Catalog output formats.
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
enum CatalogFormat {
    /// Human-readable text output.
    Text,
    /// Pretty-printed JSON output.
    Json,
}

/// `--lang` values.
#[derive(ValueEnum, Copy, Clone, Debug)]
enum LangArg {
    /// English.
    En,
    /// Catalan.
    Ca,
}

impl From<LangArg> for Locale {
    fn from(value: LangArg) -> Self {
        match value {
            LangArg::En => Self::En,
            LangArg::Ca => Self::Ca,
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Fatal CLI error carrying an already localized message.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Localized text printed to stderr.
    message: String,
}

impl CliError {
    /// Wraps a localized message.
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// Result of a CLI step.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// Runs the CLI and maps fatal errors to a failing exit code.
#[tokio::main(flavor = "multi_thread")]
async fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Parses arguments, fixes the locale, and dispatches.
fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    let env_lang = std::env::var(LANG_ENV).ok();
    let locale = resolve_locale(cli.lang, env_lang.as_deref())?;
    set_locale(locale);
    if locale != Locale::En {
        write_stderr_line(&t!("i18n.disclaimer.machine_translated"))
            .map_err(|err| CliError::new(output_error("stderr", &err)))?;
    }

    if cli.show_version {
        let version = env!("CARGO_PKG_VERSION");
        write_stdout_line(&t!("main.version", version = version))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(ExitCode::SUCCESS);
    }

    let Some(command) = cli.command else {
        show_help()?;
        return Ok(ExitCode::SUCCESS);
    };

    match command {
        Commands::Check(command) => command_check(command),
        Commands::Suites {
            command,
        } => command_suites(&command),
        Commands::Config {
            command,
        } => command_config(&command),
    }
}

/// Prints clap help for the root command.
fn show_help() -> CliResult<()> {
    let mut command = Cli::command();
    command.print_help().map_err(|err| CliError::new(output_error("stdout", &err)))?;
    write_stdout_line("").map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(())
}

// ============================================================================
// SECTION: Check Command
// ============================================================================

/// Executes the `check` command.
fn command_check(command: CheckCommand) -> CliResult<ExitCode> {
    let mut config = InfraGateConfig::load(command.config.as_deref())
        .map_err(|err| CliError::new(t!("config.load_failed", error = err)))?;
    if let Some(root) = command.root {
        if !root.is_dir() {
            return Err(CliError::new(t!("check.root_missing", path = root.display())));
        }
        config.artifacts.root = root;
    }
    let sink = open_event_sink(&config.logging)?;

    let mut registry = SuiteRegistry::new(config.selection.clone());
    register_artifact_suites(&mut registry, &config.artifacts, &config.fixture, &config.expectations)
        .map_err(|err| CliError::new(t!("check.register_failed", error = err)))?;
    if !command.offline {
        let inventory = AwsInventory::new(aws_options(&config))
            .map_err(|err| CliError::new(t!("check.inventory_failed", error = err)))?;
        let inventory: Arc<dyn CloudInventory> = Arc::new(inventory);
        register_live_suites(&mut registry, &inventory, &config.fixture, &config.expectations)
            .map_err(|err| CliError::new(t!("check.register_failed", error = err)))?;
    }

    let filter = CheckFilter::only(command.checks);
    let report = registry
        .run(&config.fixture, &command.suites, &filter, sink.as_ref())
        .map_err(|err| CliError::new(t!("check.run_failed", error = err)))?;

    let output = match command.format {
        ReportFormat::Text => render_report_text(&report),
        ReportFormat::Markdown => render_report_markdown(&report),
        ReportFormat::Json => {
            let mut json = render_report_json(&report)
                .map_err(|err| CliError::new(t!("check.serialize_failed", error = err)))?;
            json.push('\n');
            json
        }
    };
    write_stdout_bytes(output.as_bytes())
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;

    if report.is_success() { Ok(ExitCode::SUCCESS) } else { Ok(ExitCode::FAILURE) }
}

/// Builds AWS connection options from the loaded configuration.
///
/// Endpoint and profile are trimmed the same way validation reads them.
fn aws_options(config: &InfraGateConfig) -> AwsOptions {
    AwsOptions {
        region: config.fixture.region.clone(),
        endpoint: config.aws.endpoint.as_deref().map(|endpoint| endpoint.trim().to_string()),
        profile: config.aws.profile.as_deref().map(|profile| profile.trim().to_string()),
    }
}

/// Opens the event sink selected by the logging configuration.
fn open_event_sink(logging: &LoggingConfig) -> CliResult<Box<dyn CheckEventSink>> {
    if !logging.enabled {
        return Ok(Box::new(NoopEventSink));
    }
    let Some(path) = &logging.path else {
        return Ok(Box::new(StderrEventSink));
    };
    let sink = FileEventSink::new(Path::new(path))
        .map_err(|err| CliError::new(t!("check.log_open_failed", path = path, error = err)))?;
    Ok(Box::new(sink))
}

// ============================================================================
// SECTION: Suites Commands
// ============================================================================

/// Dispatches suites subcommands.
fn command_suites(command: &SuitesCommand) -> CliResult<ExitCode> {
    match command {
        SuitesCommand::List(command) => command_suites_list(command),
    }
}

/// Executes `suites list`.
fn command_suites_list(command: &SuitesListCommand) -> CliResult<ExitCode> {
    let catalog = full_catalog();
    let output = match command.format {
        CatalogFormat::Text => render_catalog_text(&catalog),
        CatalogFormat::Json => {
            let mut json = render_catalog_json(&catalog)
                .map_err(|err| CliError::new(t!("suites.serialize_failed", error = err)))?;
            json.push('\n');
            json
        }
    };
    write_stdout_bytes(output.as_bytes())
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Returns artifact then live suite descriptors.
fn full_catalog() -> Vec<SuiteDescriptor> {
    let mut catalog = artifact_catalog();
    catalog.extend(live_catalog());
    catalog
}

/// Returns every suite id the CLI can register.
fn known_suite_ids() -> Vec<&'static str> {
    ARTIFACT_SUITE_IDS.iter().chain(LIVE_SUITE_IDS).copied().collect()
}

// ============================================================================
// SECTION: Config Commands
// ============================================================================

/// Dispatches `config` actions.
fn command_config(command: &ConfigCommand) -> CliResult<ExitCode> {
    match command {
        ConfigCommand::Validate(command) => command_config_validate(command),
        ConfigCommand::Example => command_config_example(),
    }
}

/// Executes `config validate`.
fn command_config_validate(command: &ConfigValidateCommand) -> CliResult<ExitCode> {
    let config = InfraGateConfig::load(command.config.as_deref())
        .map_err(|err| CliError::new(t!("config.load_failed", error = err)))?;
    ensure_known_selection(&config)?;
    write_stdout_line(&t!("config.validate.ok"))
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Rejects selection lists naming suites the CLI does not provide.
fn ensure_known_selection(config: &InfraGateConfig) -> CliResult<()> {
    let unknown = config.unknown_selection_ids(&known_suite_ids());
    if unknown.is_empty() {
        return Ok(());
    }
    Err(CliError::new(t!("config.validate.unknown_suites", ids = unknown.join(", "))))
}

/// Prints the example configuration.
fn command_config_example() -> CliResult<ExitCode> {
    write_stdout_bytes(config_toml_example().as_bytes())
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Locale
// ============================================================================

/// Picks the locale: `--lang`, then `INFRA_GATE_LANG`, then English.
fn resolve_locale(lang: Option<LangArg>, env_lang: Option<&str>) -> CliResult<Locale> {
    if let Some(lang) = lang {
        return Ok(lang.into());
    }
    if let Some(value) = env_lang {
        return Locale::parse(value).ok_or_else(|| {
            CliError::new(t!("i18n.lang.invalid_env", env = LANG_ENV, value = value))
        });
    }
    Ok(Locale::En)
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Prints one line on stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Prints rendered output on stdout as is.
fn write_stdout_bytes(bytes: &[u8]) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    stdout.write_all(bytes)
}

/// Prints one line on stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Describes a failed write to `stream`.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    let stream_label = match stream {
        "stdout" => t!("output.stream.stdout"),
        "stderr" => t!("output.stream.stderr"),
        _ => t!("output.stream.unknown"),
    };
    t!("output.write_failed", stream = stream_label, error = error)
}

/// Reports a fatal error and returns the failing exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
