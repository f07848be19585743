// crates/infra-gate-cli/src/render.rs
// ============================================================================
// Module: CLI Renderers
// Description: Text, Markdown, and JSON rendering of reports and catalogs.
// Purpose: Keep output formatting out of the command dispatcher.
// Dependencies: infra-gate-core, serde_json
// ============================================================================

//! ## Overview
//! Text and Markdown renderers route every label through the message catalog.
//! JSON output is the serde form of the core types, so it is stable across
//! locales.

// ============================================================================
// SECTION: Imports
// ============================================================================

use infra_gate_core::CheckStatus;
use infra_gate_core::RunReport;
use infra_gate_core::RunSummary;
use infra_gate_core::SuiteDescriptor;
use infra_gate_core::SuiteKind;

use crate::i18n::MessageArg;
use crate::i18n::translate;
use crate::t;

// ============================================================================
// SECTION: Labels
// ============================================================================

/// Returns the localized label for a check status.
#[must_use]
pub fn status_label(status: CheckStatus) -> String {
    match status {
        CheckStatus::Passed => t!("report.status.passed"),
        CheckStatus::Failed => t!("report.status.failed"),
        CheckStatus::Skipped => t!("report.status.skipped"),
    }
}

/// Returns the localized label for a suite kind.
#[must_use]
pub fn kind_label(kind: SuiteKind) -> String {
    match kind {
        SuiteKind::Artifact => t!("suites.kind.artifact"),
        SuiteKind::Live => t!("suites.kind.live"),
    }
}

// ============================================================================
// SECTION: Run Reports
// ============================================================================

/// Renders a run report as indented text, one line per check.
#[must_use]
pub fn render_report_text(report: &RunReport) -> String {
    let mut output = String::new();
    push_line(
        &mut output,
        &t!(
            "report.text.header",
            prefix = report.fixture.resource_prefix(),
            region = report.fixture.region
        ),
    );
    for suite in &report.suites {
        output.push('\n');
        push_line(&mut output, &t!("report.text.suite", title = suite.title, suite = suite.suite_id));
        for outcome in &suite.outcomes {
            push_line(
                &mut output,
                &t!(
                    "report.text.check",
                    status = status_label(outcome.status),
                    check = outcome.check_id,
                    description = outcome.description
                ),
            );
            if let Some(message) = &outcome.message {
                push_line(&mut output, &t!("report.text.message", message = message));
            }
        }
    }
    output.push('\n');
    push_line(&mut output, &summary_line("report.text.summary", report.summary));
    output
}

/// Renders a run report as a Markdown document with one table per suite.
#[must_use]
pub fn render_report_markdown(report: &RunReport) -> String {
    let mut output = String::new();
    push_line(&mut output, &t!("report.md.header"));
    output.push('\n');
    push_line(
        &mut output,
        &t!(
            "report.md.fixture",
            prefix = report.fixture.resource_prefix(),
            region = report.fixture.region
        ),
    );
    push_line(&mut output, &summary_line("report.md.summary", report.summary));
    for suite in &report.suites {
        output.push('\n');
        push_line(&mut output, &t!("report.md.suite", title = suite.title, suite = suite.suite_id));
        output.push('\n');
        push_line(&mut output, &t!("report.md.table_header"));
        push_line(&mut output, "|---|---|---|");
        for outcome in &suite.outcomes {
            let message = outcome.message.as_deref().map_or_else(String::new, markdown_cell);
            push_line(
                &mut output,
                &t!(
                    "report.md.row",
                    check = outcome.check_id,
                    status = status_label(outcome.status),
                    message = message
                ),
            );
        }
    }
    output
}

/// Renders a run report as pretty-printed JSON.
///
/// # Errors
///
/// Returns [`serde_json::Error`] when serialization fails.
pub fn render_report_json(report: &RunReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

// ============================================================================
// SECTION: Catalog
// ============================================================================

/// Renders the suite catalog as text.
#[must_use]
pub fn render_catalog_text(catalog: &[SuiteDescriptor]) -> String {
    let mut output = String::new();
    for suite in catalog {
        push_line(
            &mut output,
            &t!(
                "suites.list.suite",
                suite = suite.suite_id,
                kind = kind_label(suite.kind),
                title = suite.title
            ),
        );
        for check in &suite.checks {
            push_line(
                &mut output,
                &t!("suites.list.check", check = check.check_id, description = check.description),
            );
        }
    }
    output
}

/// Renders the suite catalog as pretty-printed JSON.
///
/// # Errors
///
/// Returns [`serde_json::Error`] when serialization fails.
pub fn render_catalog_json(catalog: &[SuiteDescriptor]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(catalog)
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Appends `line` and a newline.
fn push_line(output: &mut String, line: &str) {
    output.push_str(line);
    output.push('\n');
}

/// Formats a summary with the given catalog key.
fn summary_line(key: &'static str, summary: RunSummary) -> String {
    translate(
        key,
        vec![
            MessageArg::new("passed", summary.passed.to_string()),
            MessageArg::new("failed", summary.failed.to_string()),
            MessageArg::new("skipped", summary.skipped.to_string()),
            MessageArg::new("total", summary.total.to_string()),
        ],
    )
}

/// Escapes a message for a single Markdown table cell.
fn markdown_cell(message: &str) -> String {
    message.replace('|', "\\|").replace(['\r', '\n'], " ")
}
