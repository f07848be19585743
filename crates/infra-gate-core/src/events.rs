// crates/infra-gate-core/src/events.rs
// ============================================================================
// Module: Check Event Logging
// Description: Structured events emitted while suites run.
// Purpose: Emit JSON-line check logs without hard dependencies.
// Dependencies: crate::core, serde, serde_json
// ============================================================================

//! ## Overview
//! Every executed check produces a [`CheckEvent`]; suites announce themselves
//! with a [`SuiteEvent`] and the registry closes a run with a [`RunEvent`].
//! Sinks serialize events as one JSON object per line so they can be routed
//! to any log pipeline.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;

use crate::core::outcome::CheckStatus;
use crate::core::outcome::RunSummary;
use crate::interfaces::SuiteKind;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Result event for one executed check.
#[derive(Debug, Clone, Serialize)]
pub struct CheckEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Suite identifier.
    pub suite_id: String,
    /// Check identifier.
    pub check_id: String,
    /// Final status.
    pub status: CheckStatus,
    /// Failure or skip message.
    pub message: Option<String>,
    /// Wall-clock duration of the check in milliseconds.
    pub duration_ms: u128,
}

/// Event emitted when a suite starts.
#[derive(Debug, Clone, Serialize)]
pub struct SuiteEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Suite identifier.
    pub suite_id: String,
    /// Evidence source.
    pub kind: SuiteKind,
    /// Number of checks selected to run.
    pub selected_checks: usize,
}

/// Event emitted when a run finishes.
#[derive(Debug, Clone, Serialize)]
pub struct RunEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// `{project}-{environment}` prefix of the run.
    pub resource_prefix: String,
    /// Region of the run.
    pub region: String,
    /// Aggregate counts.
    pub summary: RunSummary,
}

impl CheckEvent {
    /// Creates a check event with a consistent timestamp.
    #[must_use]
    pub fn new(
        suite_id: &str,
        check_id: &str,
        status: CheckStatus,
        message: Option<String>,
        duration_ms: u128,
    ) -> Self {
        Self {
            event: "check_result",
            timestamp_ms: now_ms(),
            suite_id: suite_id.to_string(),
            check_id: check_id.to_string(),
            status,
            message,
            duration_ms,
        }
    }
}

impl SuiteEvent {
    /// Creates a suite start event with a consistent timestamp.
    #[must_use]
    pub fn new(suite_id: &str, kind: SuiteKind, selected_checks: usize) -> Self {
        Self {
            event: "suite_started",
            timestamp_ms: now_ms(),
            suite_id: suite_id.to_string(),
            kind,
            selected_checks,
        }
    }
}

impl RunEvent {
    /// Creates a run completion event with a consistent timestamp.
    #[must_use]
    pub fn new(resource_prefix: String, region: String, summary: RunSummary) -> Self {
        Self {
            event: "run_finished",
            timestamp_ms: now_ms(),
            resource_prefix,
            region,
            summary,
        }
    }
}

/// Milliseconds since the Unix epoch (zero if the clock is before it).
fn now_ms() -> u128 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis()
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Sink for check events.
pub trait CheckEventSink: Send + Sync {
    /// Record a check result event.
    fn record(&self, event: &CheckEvent);

    /// Record a suite start event.
    fn record_suite(&self, _event: &SuiteEvent) {}

    /// Record a run completion event.
    fn record_run(&self, _event: &RunEvent) {}
}

/// Event sink that logs JSON lines to stderr.
pub struct StderrEventSink;

impl CheckEventSink for StderrEventSink {
    fn record(&self, event: &CheckEvent) {
        write_stderr_json(event);
    }

    fn record_suite(&self, event: &SuiteEvent) {
        write_stderr_json(event);
    }

    fn record_run(&self, event: &RunEvent) {
        write_stderr_json(event);
    }
}

/// Serializes an event as one line on stderr.
fn write_stderr_json<T: Serialize>(event: &T) {
    if let Ok(payload) = serde_json::to_string(event) {
        let _ = writeln!(std::io::stderr(), "{payload}");
    }
}

/// Event sink that logs JSON lines to a file.
pub struct FileEventSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileEventSink {
    /// Opens the event log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }

    /// Serializes an event as one appended line.
    fn append<T: Serialize>(&self, event: &T) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

impl CheckEventSink for FileEventSink {
    fn record(&self, event: &CheckEvent) {
        self.append(event);
    }

    fn record_suite(&self, event: &SuiteEvent) {
        self.append(event);
    }

    fn record_run(&self, event: &RunEvent) {
        self.append(event);
    }
}

/// No-op event sink.
pub struct NoopEventSink;

impl CheckEventSink for NoopEventSink {
    fn record(&self, _event: &CheckEvent) {}
}
