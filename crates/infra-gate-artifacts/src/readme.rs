// crates/infra-gate-artifacts/src/readme.rs
// ============================================================================
// Module: README Suite
// Description: Checks over the project README's structure and content.
// Purpose: Require the sections and details project documentation must carry.
// Dependencies: infra-gate-core, regex
// ============================================================================

//! ## Overview
//! Section checks look for a Markdown heading line (`#`, optional whitespace,
//! then any text) containing one of a few terms; the first letter of each term
//! matches either case. Content checks count lowercase keywords anywhere in the
//! document.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::PathBuf;

use infra_gate_core::CheckCase;
use infra_gate_core::CheckEventSink;
use infra_gate_core::CheckFailure;
use infra_gate_core::CheckFilter;
use infra_gate_core::CheckResult;
use infra_gate_core::CheckSuite;
use infra_gate_core::SuiteDescriptor;
use infra_gate_core::SuiteHeader;
use infra_gate_core::SuiteKind;
use infra_gate_core::SuiteReport;
use infra_gate_core::runtime::assert::ensure;
use infra_gate_core::runtime::assert::ensure_at_least;
use infra_gate_core::runtime::assert::fail;
use infra_gate_core::runtime::runner::describe_cases;
use infra_gate_core::runtime::runner::run_cases;
use infra_gate_core::runtime::text::char_prefix;
use infra_gate_core::runtime::text::count_present_terms;
use infra_gate_core::runtime::text::first_non_blank_line;
use regex::Regex;
use regex::RegexBuilder;

use crate::source::Artifact;
use crate::source::ArtifactLayout;
use crate::source::load_text;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Suite identity.
const HEADER: SuiteHeader = SuiteHeader {
    suite_id: "readme",
    title: "Project README",
    kind: SuiteKind::Artifact,
};

/// Markdown table row.
const TABLE_ROW: &str = r"\|.*\|.*\|";

/// Characters of the description window.
const DESCRIPTION_WINDOW: usize = 500;
/// Minimum words in the description window.
const MIN_DESCRIPTION_WORDS: usize = 10;

/// Performance keywords.
const PERFORMANCE_TERMS: &[&str] =
    &["latency", "throughput", "availability", "uptime", "response time"];
/// Infrastructure cost components.
const COST_TERMS: &[&str] = &[
    "aws",
    "database",
    "storage",
    "compute",
    "kafka",
    "msk",
    "opensearch",
    "lambda",
    "fargate",
    "rds",
    "dynamodb",
    "s3",
];
/// Architecture component keywords.
const COMPONENT_TERMS: &[&str] =
    &["agent", "service", "component", "module", "layer", "microservice"];
/// Core technologies.
const TECHNOLOGY_TERMS: &[&str] = &["python", "kafka", "aws", "spark"];

// ============================================================================
// SECTION: Suite
// ============================================================================

/// README suite.
pub struct ReadmeSuite {
    /// Resolved README path.
    path: PathBuf,
    /// Read limit.
    max_bytes: usize,
}

impl ReadmeSuite {
    /// Creates the suite for the layout's README.
    #[must_use]
    pub fn new(layout: &ArtifactLayout) -> Self {
        Self {
            path: layout.resolve(&layout.readme),
            max_bytes: layout.max_bytes,
        }
    }
}

/// Returns the static suite descriptor.
#[must_use]
pub fn descriptor() -> SuiteDescriptor {
    describe_cases(&HEADER, CASES)
}

impl CheckSuite for ReadmeSuite {
    fn descriptor(&self) -> SuiteDescriptor {
        descriptor()
    }

    fn run(&self, filter: &CheckFilter, sink: &dyn CheckEventSink) -> SuiteReport {
        let subject = Readme {
            exists: self.path.exists(),
            is_file: self.path.is_file(),
            content: load_text(self.path.clone(), self.max_bytes),
        };
        run_cases(&HEADER, CASES, &subject, filter, sink)
    }
}

/// README path state and text.
struct Readme {
    /// The path exists.
    exists: bool,
    /// The path is a regular file.
    is_file: bool,
    /// README text.
    content: Artifact<String>,
}

impl Readme {
    /// Returns the text or fails with "artifact unavailable".
    fn text(&self) -> Result<&str, CheckFailure> {
        self.content.content().map(String::as_str)
    }
}

// ============================================================================
// SECTION: Checks
// ============================================================================

/// Declared checks in report order.
const CASES: &[CheckCase<Readme>] = &[
    CheckCase {
        id: "readme_exists",
        description: "README.md exists",
        run: readme_exists,
    },
    CheckCase {
        id: "readme_is_file",
        description: "README.md is a file",
        run: readme_is_file,
    },
    CheckCase {
        id: "readme_not_empty",
        description: "README.md has content",
        run: readme_not_empty,
    },
    CheckCase {
        id: "project_title",
        description: "README starts with an h1 title",
        run: project_title,
    },
    CheckCase {
        id: "architecture_section",
        description: "README has an architecture section",
        run: architecture_section,
    },
    CheckCase {
        id: "technology_stack_section",
        description: "README has a technology stack section",
        run: technology_stack_section,
    },
    CheckCase {
        id: "roadmap_section",
        description: "README has a roadmap section",
        run: roadmap_section,
    },
    CheckCase {
        id: "contact_section",
        description: "README has a contact section",
        run: contact_section,
    },
    CheckCase {
        id: "performance_section",
        description: "README has a performance targets section",
        run: performance_section,
    },
    CheckCase {
        id: "cost_section",
        description: "README has a cost estimation section",
        run: cost_section,
    },
    CheckCase {
        id: "performance_table",
        description: "performance targets are tabulated",
        run: performance_table,
    },
    CheckCase {
        id: "performance_key_metrics",
        description: "performance targets name key metrics",
        run: performance_key_metrics,
    },
    CheckCase {
        id: "cost_monetary_values",
        description: "cost estimate carries monetary values",
        run: cost_monetary_values,
    },
    CheckCase {
        id: "cost_table_or_list",
        description: "cost estimate is a table or priced list",
        run: cost_table_or_list,
    },
    CheckCase {
        id: "cost_components",
        description: "cost breakdown names infrastructure components",
        run: cost_components,
    },
    CheckCase {
        id: "project_description",
        description: "README opens with a meaningful description",
        run: project_description,
    },
    CheckCase {
        id: "architecture_components",
        description: "architecture describes system components",
        run: architecture_components,
    },
    CheckCase {
        id: "technology_stack_lists_technologies",
        description: "technology stack names core technologies",
        run: technology_stack_lists_technologies,
    },
    CheckCase {
        id: "roadmap_structure",
        description: "roadmap has phases, milestones, or task lists",
        run: roadmap_structure,
    },
];

/// Compiles a pattern, reporting a compile error as a failed check.
fn compile(pattern: &str, multi_line: bool, case_insensitive: bool) -> Result<Regex, CheckFailure> {
    RegexBuilder::new(pattern)
        .multi_line(multi_line)
        .case_insensitive(case_insensitive)
        .build()
        .map_err(|err| CheckFailure::Assertion(format!("invalid pattern `{pattern}`: {err}")))
}

/// Returns true when `pattern` matches `text`.
fn is_match(text: &str, pattern: &str, multi_line: bool, case_insensitive: bool) -> Result<bool, CheckFailure> {
    Ok(compile(pattern, multi_line, case_insensitive)?.is_match(text))
}

/// Requires a heading containing one of `terms`.
fn ensure_section(subject: &Readme, terms: &str, example: &str) -> CheckResult {
    let pattern = format!(r"#+\s*.*(?:{terms})");
    ensure(
        is_match(subject.text()?, &pattern, true, false)?,
        format!("README.md must contain a {example} section"),
    )
}

/// Requires at least `minimum` of `terms` in the lowercased text.
fn ensure_terms(subject: &Readme, terms: &[&str], minimum: usize, what: &str) -> CheckResult {
    let lowered = subject.text()?.to_lowercase();
    ensure_at_least(count_present_terms(&lowered, terms), minimum, what)
}

/// Path exists.
fn readme_exists(subject: &Readme) -> CheckResult {
    ensure(subject.exists, "README.md must exist in the repository root")
}

/// Path is a file.
fn readme_is_file(subject: &Readme) -> CheckResult {
    ensure(subject.is_file, "README.md must be a file")
}

/// Non-blank content.
fn readme_not_empty(subject: &Readme) -> CheckResult {
    subject.content.require_loaded()?;
    ensure(!subject.text()?.trim().is_empty(), "README.md must not be empty")
}

/// h1 title first.
fn project_title(subject: &Readme) -> CheckResult {
    match first_non_blank_line(subject.text()?) {
        Some(line) => ensure(line.starts_with("# "), "README.md must start with an h1 heading"),
        None => fail("README.md must have content"),
    }
}

/// Architecture heading.
fn architecture_section(subject: &Readme) -> CheckResult {
    ensure_section(subject, r"[Aa]rchitecture|[Ss]ystem\s+[Dd]esign|[Cc]omponents?", "architecture")
}

/// Technology stack heading.
fn technology_stack_section(subject: &Readme) -> CheckResult {
    ensure_section(
        subject,
        r"[Tt]echnology\s+[Ss]tack|[Tt]ech\s+[Ss]tack|[Tt]echnologies",
        "technology stack",
    )
}

/// Roadmap heading.
fn roadmap_section(subject: &Readme) -> CheckResult {
    ensure_section(subject, r"[Rr]oadmap|[Mm]ilestones?|[Pp]hases?", "roadmap")
}

/// Contact heading.
fn contact_section(subject: &Readme) -> CheckResult {
    ensure_section(subject, r"[Cc]ontact|[Ss]upport|[Cc]ontributors?|[Aa]uthors?", "contact")
}

/// Performance heading.
fn performance_section(subject: &Readme) -> CheckResult {
    ensure_section(
        subject,
        r"[Pp]erformance|[Mm]etrics?|[Tt]argets?|[Ss][Ll][Aa]",
        "performance targets",
    )
}

/// Cost heading.
fn cost_section(subject: &Readme) -> CheckResult {
    ensure_section(subject, r"[Cc]ost|[Pp]ricing|[Bb]udget", "cost estimation")
}

/// Any table row.
fn performance_table(subject: &Readme) -> CheckResult {
    ensure(
        is_match(subject.text()?, TABLE_ROW, false, false)?,
        "README.md must include a table for performance targets",
    )
}

/// Performance keywords.
fn performance_key_metrics(subject: &Readme) -> CheckResult {
    ensure_terms(subject, PERFORMANCE_TERMS, 2, "performance metrics mentioned")
}

/// Currency amounts.
fn cost_monetary_values(subject: &Readme) -> CheckResult {
    ensure(
        is_match(subject.text()?, r"\$\d+|\d+\s*USD|\d+\s*dollars?", false, true)?,
        "cost estimate must include monetary values such as $100, USD, or dollars",
    )
}

/// Table row or priced list item.
fn cost_table_or_list(subject: &Readme) -> CheckResult {
    let text = subject.text()?;
    let table = is_match(text, TABLE_ROW, false, false)?;
    let list = is_match(text, r"^\s*[-*]\s+.*\$", true, false)?;
    ensure(table || list, "cost estimate must be presented as a table or list")
}

/// Cost components.
fn cost_components(subject: &Readme) -> CheckResult {
    ensure_terms(subject, COST_TERMS, 3, "infrastructure cost components mentioned")
}

/// Word count of the opening window with Markdown punctuation removed.
fn project_description(subject: &Readme) -> CheckResult {
    let window = char_prefix(subject.text()?, DESCRIPTION_WINDOW);
    let cleaned: String = window
        .chars()
        .filter(|ch| !matches!(ch, '#' | '*' | '`' | '-' | '[' | ']' | '(' | ')'))
        .collect();
    ensure_at_least(
        cleaned.split_whitespace().count(),
        MIN_DESCRIPTION_WORDS,
        "words in the opening project description",
    )
}

/// Component keywords.
fn architecture_components(subject: &Readme) -> CheckResult {
    ensure_terms(subject, COMPONENT_TERMS, 1, "architecture component terms mentioned")
}

/// Technology keywords.
fn technology_stack_lists_technologies(subject: &Readme) -> CheckResult {
    ensure_terms(subject, TECHNOLOGY_TERMS, 3, "core technologies mentioned")
}

/// Checkboxes, numbered phases or milestones, or a numbered list.
fn roadmap_structure(subject: &Readme) -> CheckResult {
    let text = subject.text()?;
    let structured = is_match(text, r"[-*]\s*\[[ x]\]", false, false)?
        || is_match(text, r"[Pp]hase\s+\d+", false, false)?
        || is_match(text, r"[Mm]ilestone\s+\d+", false, false)?
        || is_match(text, r"^\d+\.", true, false)?;
    ensure(structured, "roadmap must include phases, milestones, or task lists")
}
