// crates/infra-gate-cli/src/main_tests.rs
// ============================================================================
// Module: CLI Main Helpers Tests
// Description: Unit tests for argument parsing and run setup in the entry point.
// Purpose: Ensure locale, event sink, and selection handling fail closed.
// Dependencies: infra-gate-cli main helpers, tempfile
// ============================================================================

//! ## Overview
//! Exercises the helpers `run` composes: locale resolution, event sink
//! selection, AWS option mapping, and selection validation.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use clap::Parser;
use infra_gate_cli::i18n::Locale;
use infra_gate_config::InfraGateConfig;
use infra_gate_config::LoggingConfig;

use super::CatalogFormat;
use super::Cli;
use super::Commands;
use super::LangArg;
use super::ReportFormat;
use super::SuitesCommand;
use super::aws_options;
use super::ensure_known_selection;
use super::full_catalog;
use super::known_suite_ids;
use super::open_event_sink;
use super::resolve_locale;

// ============================================================================
// SECTION: Locale
// ============================================================================

#[test]
fn flag_overrides_environment_locale() {
    let locale = resolve_locale(Some(LangArg::En), Some("ca")).unwrap();
    assert_eq!(locale, Locale::En);
}

#[test]
fn environment_locale_applies_without_flag() {
    assert_eq!(resolve_locale(None, Some("ca-ES")).unwrap(), Locale::Ca);
    assert_eq!(resolve_locale(None, None).unwrap(), Locale::En);
}

#[test]
fn invalid_environment_locale_is_rejected() {
    let err = resolve_locale(None, Some("klingon")).unwrap_err();
    assert!(err.to_string().contains("INFRA_GATE_LANG"));
    assert!(err.to_string().contains("klingon"));
}

// ============================================================================
// SECTION: Arguments
// ============================================================================

#[test]
fn check_arguments_collect_repeated_ids() {
    let cli = Cli::try_parse_from([
        "infra-gate",
        "check",
        "--suite",
        "readme",
        "--suite",
        "bootstrap",
        "--check",
        "readme.readme_exists",
        "--format",
        "markdown",
        "--offline",
    ])
    .unwrap();
    let Some(Commands::Check(command)) = cli.command else {
        panic!("expected check command");
    };
    assert_eq!(command.suites, vec!["readme".to_string(), "bootstrap".to_string()]);
    assert_eq!(command.checks, vec!["readme.readme_exists".to_string()]);
    assert_eq!(command.format, ReportFormat::Markdown);
    assert!(command.offline);
    assert!(command.root.is_none());
}

#[test]
fn suites_list_defaults_to_text() {
    let cli = Cli::try_parse_from(["infra-gate", "suites", "list"]).unwrap();
    let Some(Commands::Suites {
        command: SuitesCommand::List(command),
    }) = cli.command
    else {
        panic!("expected suites list command");
    };
    assert_eq!(command.format, CatalogFormat::Text);
}

#[test]
fn unknown_report_format_is_rejected() {
    assert!(Cli::try_parse_from(["infra-gate", "check", "--format", "html"]).is_err());
}

// ============================================================================
// SECTION: Run Setup
// ============================================================================

#[test]
fn aws_options_follow_fixture_region() {
    let config = InfraGateConfig::from_toml(
        "[fixture]\nregion = \"eu-west-1\"\n[aws]\nendpoint = \"https://aws.internal\"\nprofile = \"audit\"\n",
    )
    .unwrap();
    let options = aws_options(&config);
    assert_eq!(options.region, "eu-west-1");
    assert_eq!(options.endpoint.as_deref(), Some("https://aws.internal"));
    assert_eq!(options.profile.as_deref(), Some("audit"));
}

#[test]
fn aws_options_trim_validated_values() {
    let config = InfraGateConfig::from_toml(
        "[aws]\nendpoint = \"  https://aws.internal \"\nprofile = \" audit\"\n",
    )
    .unwrap();
    let options = aws_options(&config);
    assert_eq!(options.endpoint.as_deref(), Some("https://aws.internal"));
    assert_eq!(options.profile.as_deref(), Some("audit"));
}

#[test]
fn file_event_sink_creates_log() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("events.jsonl");
    let logging = LoggingConfig {
        enabled: true,
        path: Some(path.to_string_lossy().into_owned()),
    };
    open_event_sink(&logging).unwrap();
    assert!(path.exists());
}

#[test]
fn disabled_logging_never_opens_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("events.jsonl");
    let logging = LoggingConfig {
        enabled: false,
        path: Some(path.to_string_lossy().into_owned()),
    };
    open_event_sink(&logging).unwrap();
    assert!(!path.exists());
}

#[test]
fn unopenable_event_log_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("events.jsonl");
    let logging = LoggingConfig {
        enabled: true,
        path: Some(path.to_string_lossy().into_owned()),
    };
    let Err(err) = open_event_sink(&logging) else {
        panic!("expected open failure");
    };
    assert!(err.to_string().contains("events.jsonl"));
}

// ============================================================================
// SECTION: Catalog
// ============================================================================

#[test]
fn catalog_covers_every_known_suite() {
    let catalog_ids: Vec<String> =
        full_catalog().iter().map(|suite| suite.suite_id.to_string()).collect();
    let known: Vec<String> = known_suite_ids().into_iter().map(str::to_string).collect();
    assert_eq!(catalog_ids, known);
}

#[test]
fn unknown_selection_is_rejected() {
    let config =
        InfraGateConfig::from_toml("[selection]\ndenylist = [\"cost\", \"lint\"]\n").unwrap();
    let err = ensure_known_selection(&config).unwrap_err();
    assert!(err.to_string().contains("lint"));
    assert!(!err.to_string().contains("cost"));
}

#[test]
fn known_selection_is_accepted() {
    let config = InfraGateConfig::from_toml(
        "[selection]\nallowlist = [\"readme\", \"network\"]\ndenylist = [\"cost\"]\n",
    )
    .unwrap();
    ensure_known_selection(&config).unwrap();
}
