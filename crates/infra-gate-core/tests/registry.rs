// crates/infra-gate-core/tests/registry.rs
// ============================================================================
// Module: Suite Registry Tests
// Description: Suite selection, check filtering, and report aggregation.
// Purpose: Ensure runs select, order, and summarize suites deterministically.
// Dependencies: infra-gate-core
// ============================================================================

//! Registry and runner behavior tests.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

use std::collections::BTreeSet;
use std::sync::Mutex;

use infra_gate_core::CheckCase;
use infra_gate_core::CheckEvent;
use infra_gate_core::CheckEventSink;
use infra_gate_core::CheckFilter;
use infra_gate_core::CheckResult;
use infra_gate_core::CheckStatus;
use infra_gate_core::CheckSuite;
use infra_gate_core::Fixture;
use infra_gate_core::NoopEventSink;
use infra_gate_core::RegistryError;
use infra_gate_core::RunEvent;
use infra_gate_core::SuiteDescriptor;
use infra_gate_core::SuiteEvent;
use infra_gate_core::SuiteHeader;
use infra_gate_core::SuiteKind;
use infra_gate_core::SuiteRegistry;
use infra_gate_core::SuiteReport;
use infra_gate_core::SuiteSelection;
use infra_gate_core::runtime::assert::ensure_contains;
use infra_gate_core::runtime::assert::ensure_count;
use infra_gate_core::runtime::assert::skip;
use infra_gate_core::runtime::runner::describe_cases;
use infra_gate_core::runtime::runner::run_cases;

// ============================================================================
// SECTION: Test Suites
// ============================================================================

/// Text-backed suite used to exercise the registry.
struct TextSuite {
    /// Static suite identity.
    header: SuiteHeader,
    /// Subject under check.
    subject: Subject,
}

/// Text inspected by [`TEXT_CASES`].
struct Subject {
    /// Raw text.
    text: String,
}

/// Checks shared by every [`TextSuite`].
const TEXT_CASES: &[CheckCase<Subject>] = &[
    CheckCase {
        id: "has_greeting",
        description: "text contains a greeting",
        run: has_greeting,
    },
    CheckCase {
        id: "single_line",
        description: "text is one line",
        run: single_line,
    },
    CheckCase {
        id: "optional",
        description: "never applicable here",
        run: optional,
    },
];

/// Requires `hello`.
fn has_greeting(subject: &Subject) -> CheckResult {
    ensure_contains(&subject.text, "hello", "text")
}

/// Requires exactly one line.
fn single_line(subject: &Subject) -> CheckResult {
    ensure_count(subject.text.lines().count(), 1, "line count")
}

/// Always skips.
fn optional(_subject: &Subject) -> CheckResult {
    skip("not applicable")
}

impl TextSuite {
    /// Builds a suite with the given id and subject text.
    fn new(suite_id: &'static str, text: &str) -> Self {
        Self {
            header: SuiteHeader {
                suite_id,
                title: "Text checks",
                kind: SuiteKind::Artifact,
            },
            subject: Subject {
                text: text.to_string(),
            },
        }
    }
}

impl CheckSuite for TextSuite {
    fn descriptor(&self) -> SuiteDescriptor {
        describe_cases(&self.header, TEXT_CASES)
    }

    fn run(&self, filter: &CheckFilter, sink: &dyn CheckEventSink) -> SuiteReport {
        run_cases(&self.header, TEXT_CASES, &self.subject, filter, sink)
    }
}

/// Sink that keeps every event in memory.
#[derive(Default)]
struct RecordingSink {
    /// Check events in emission order.
    checks: Mutex<Vec<CheckEvent>>,
    /// Suite start events in emission order.
    suites: Mutex<Vec<SuiteEvent>>,
    /// Run completion events.
    runs: Mutex<Vec<RunEvent>>,
}

impl CheckEventSink for RecordingSink {
    fn record(&self, event: &CheckEvent) {
        self.checks.lock().unwrap().push(event.clone());
    }

    fn record_suite(&self, event: &SuiteEvent) {
        self.suites.lock().unwrap().push(event.clone());
    }

    fn record_run(&self, event: &RunEvent) {
        self.runs.lock().unwrap().push(event.clone());
    }
}

/// Registry with a passing suite `alpha` and a failing suite `beta`.
fn sample_registry(selection: SuiteSelection) -> SuiteRegistry {
    let mut registry = SuiteRegistry::new(selection);
    registry.register(TextSuite::new("alpha", "hello world")).unwrap();
    registry.register(TextSuite::new("beta", "goodbye\nworld")).unwrap();
    registry
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[test]
fn run_aggregates_suites_in_registration_order() {
    let registry = sample_registry(SuiteSelection::allow_all());
    let sink = RecordingSink::default();
    let report = registry.run(&Fixture::default(), &[], &CheckFilter::all(), &sink).unwrap();

    let ids: Vec<&str> = report.suites.iter().map(|suite| suite.suite_id.as_str()).collect();
    assert_eq!(ids, vec!["alpha", "beta"]);
    assert_eq!(report.summary.total, 6);
    assert_eq!(report.summary.passed, 2);
    assert_eq!(report.summary.failed, 2);
    assert_eq!(report.summary.skipped, 2);
    assert!(!report.is_success());

    let beta = &report.suites[1];
    let greeting = beta.outcome("has_greeting").unwrap();
    assert_eq!(greeting.status, CheckStatus::Failed);
    assert_eq!(greeting.message.as_deref(), Some("text must contain `hello`"));
    let lines = beta.outcome("single_line").unwrap();
    assert_eq!(lines.message.as_deref(), Some("line count: expected exactly 1, found 2"));

    assert_eq!(sink.checks.lock().unwrap().len(), 6);
    assert_eq!(sink.suites.lock().unwrap().len(), 2);
    let runs = sink.runs.lock().unwrap();
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].resource_prefix, "dealfinder-dev");
    assert_eq!(runs[0].summary.failed, 2);
}

#[test]
fn skipped_checks_do_not_fail_a_run() {
    let registry = sample_registry(SuiteSelection::allow_all());
    let report = registry
        .run(&Fixture::default(), &["alpha".to_string()], &CheckFilter::all(), &NoopEventSink)
        .unwrap();
    assert_eq!(report.summary.skipped, 1);
    assert!(report.is_success());
    assert_eq!(report.failures().count(), 0);
}

#[test]
fn failures_iterates_failed_outcomes_with_suite_ids() {
    let registry = sample_registry(SuiteSelection::allow_all());
    let report =
        registry.run(&Fixture::default(), &[], &CheckFilter::all(), &NoopEventSink).unwrap();
    let failures: Vec<String> = report
        .failures()
        .map(|(suite_id, outcome)| outcome.check_id.qualified(suite_id))
        .collect();
    assert_eq!(failures, vec!["beta.has_greeting", "beta.single_line"]);
}

#[test]
fn filter_accepts_bare_and_qualified_names() {
    let registry = sample_registry(SuiteSelection::allow_all());
    let filter = CheckFilter::only(["single_line", "beta.has_greeting"]);
    let sink = RecordingSink::default();
    let report = registry.run(&Fixture::default(), &[], &filter, &sink).unwrap();

    assert_eq!(report.suites[0].outcomes.len(), 1);
    assert_eq!(report.suites[1].outcomes.len(), 2);
    assert_eq!(report.summary.total, 3);
    let suites = sink.suites.lock().unwrap();
    assert_eq!(suites[0].selected_checks, 1);
    assert_eq!(suites[1].selected_checks, 2);
}

#[test]
fn empty_filter_admits_everything() {
    let filter = CheckFilter::only(Vec::<String>::new());
    assert_eq!(filter, CheckFilter::all());
    assert!(filter.allows("alpha", "anything"));
}

#[test]
fn unknown_suite_and_check_fail_before_running() {
    let registry = sample_registry(SuiteSelection::allow_all());
    let sink = RecordingSink::default();

    let unknown_suite =
        registry.run(&Fixture::default(), &["gamma".to_string()], &CheckFilter::all(), &sink);
    assert_eq!(unknown_suite.unwrap_err(), RegistryError::UnknownSuite("gamma".to_string()));

    let unknown_check =
        registry.run(&Fixture::default(), &[], &CheckFilter::only(["alpha.missing"]), &sink);
    assert_eq!(unknown_check.unwrap_err(), RegistryError::UnknownCheck("alpha.missing".to_string()));

    assert!(sink.checks.lock().unwrap().is_empty());
}

#[test]
fn selection_policy_limits_and_denies_suites() {
    let deny_beta = SuiteSelection {
        allowlist: None,
        denylist: BTreeSet::from(["beta".to_string()]),
    };
    let registry = sample_registry(deny_beta);
    let report =
        registry.run(&Fixture::default(), &[], &CheckFilter::all(), &NoopEventSink).unwrap();
    assert_eq!(report.suites.len(), 1);
    assert_eq!(report.suites[0].suite_id.as_str(), "alpha");

    let denied =
        registry.run(&Fixture::default(), &["beta".to_string()], &CheckFilter::all(), &NoopEventSink);
    assert_eq!(denied.unwrap_err(), RegistryError::SuiteNotAllowed("beta".to_string()));

    let allow_nothing = SuiteSelection {
        allowlist: Some(BTreeSet::new()),
        denylist: BTreeSet::new(),
    };
    let registry = sample_registry(allow_nothing);
    let empty = registry.run(&Fixture::default(), &[], &CheckFilter::all(), &NoopEventSink);
    assert_eq!(empty.unwrap_err(), RegistryError::EmptySelection);
}

#[test]
fn duplicate_registration_is_rejected() {
    let mut registry = SuiteRegistry::new(SuiteSelection::default());
    registry.register(TextSuite::new("alpha", "hello")).unwrap();
    let duplicate = registry.register(TextSuite::new("alpha", "hello"));
    assert_eq!(duplicate.unwrap_err(), RegistryError::DuplicateSuite("alpha".to_string()));
    assert_eq!(registry.descriptors().len(), 1);
    assert_eq!(registry.descriptors()[0].checks.len(), 3);
}
