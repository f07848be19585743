// crates/infra-gate-artifacts/src/terraform.rs
// ============================================================================
// Module: Terraform Monitoring Module Suite
// Description: Checks over the CloudWatch monitoring module's `.tf` files.
// Purpose: Pin variables, log groups, alarms, SNS wiring, and the dashboard.
// Dependencies: infra-gate-core
// ============================================================================

//! ## Overview
//! The monitoring module is matched as text. Variable and resource blocks are
//! cut out with [`extract_block`], which stops at the first closing brace, so
//! block checks only see the block's top-level attributes.
//! Attribute checks accept both single-space and column-aligned spacing
//! (`type = number` and `type        = number`).

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
use infra_gate_core::Fixture;
use infra_gate_core::MonitoringExpectations;
use infra_gate_core::SuiteDescriptor;
use infra_gate_core::SuiteHeader;
use infra_gate_core::SuiteKind;
use infra_gate_core::SuiteReport;
use infra_gate_core::runtime::assert::ensure;
use infra_gate_core::runtime::assert::ensure_at_least;
use infra_gate_core::runtime::assert::ensure_contains;
use infra_gate_core::runtime::assert::ensure_contains_all;
use infra_gate_core::runtime::assert::ensure_contains_any;
use infra_gate_core::runtime::assert::fail;
use infra_gate_core::runtime::runner::describe_cases;
use infra_gate_core::runtime::runner::run_cases;
use infra_gate_core::runtime::text::count_occurrences;
use infra_gate_core::runtime::text::extract_block;

use crate::source::Artifact;
use crate::source::ArtifactLayout;
use crate::source::load_text;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Suite identity.
const HEADER: SuiteHeader = SuiteHeader {
    suite_id: "terraform_monitoring",
    title: "Terraform monitoring module",
    kind: SuiteKind::Artifact,
};

/// Variables file name inside the module directory.
const VARIABLES_FILE: &str = "variables.tf";
/// Main file name inside the module directory.
const MAIN_FILE: &str = "main.tf";

/// Variables every caller of the module must be able to set.
const REQUIRED_VARIABLES: &[&str] =
    &["project_name", "environment", "aws_region", "log_retention_days", "alarm_email", "tags"];

/// Minimum number of metric alarms and SNS topic references in `main.tf`.
const MIN_ALARM_RESOURCES: usize = 5;

// ============================================================================
// SECTION: Suite
// ============================================================================

/// Terraform monitoring module suite.
pub struct TerraformMonitoringSuite {
    /// Resolved module directory.
    module_dir: PathBuf,
    /// Read limit.
    max_bytes: usize,
    /// Fixture supplying the project name.
    fixture: Fixture,
    /// Monitoring expectations.
    expectations: MonitoringExpectations,
}

impl TerraformMonitoringSuite {
    /// Creates the suite for the layout's monitoring module.
    #[must_use]
    pub fn new(
        layout: &ArtifactLayout,
        fixture: Fixture,
        expectations: MonitoringExpectations,
    ) -> Self {
        Self {
            module_dir: layout.resolve(&layout.monitoring_module),
            max_bytes: layout.max_bytes,
            fixture,
            expectations,
        }
    }
}

/// Returns the static suite descriptor.
#[must_use]
pub fn descriptor() -> SuiteDescriptor {
    describe_cases(&HEADER, CASES)
}

impl CheckSuite for TerraformMonitoringSuite {
    fn descriptor(&self) -> SuiteDescriptor {
        descriptor()
    }

    fn run(&self, filter: &CheckFilter, sink: &dyn CheckEventSink) -> SuiteReport {
        let subject = Module {
            variables: load_text(self.module_dir.join(VARIABLES_FILE), self.max_bytes),
            main: load_text(self.module_dir.join(MAIN_FILE), self.max_bytes),
            fixture: self.fixture.clone(),
            expectations: self.expectations.clone(),
        };
        run_cases(&HEADER, CASES, &subject, filter, sink)
    }
}

/// Loaded module files.
struct Module {
    /// `variables.tf`.
    variables: Artifact<String>,
    /// `main.tf`.
    main: Artifact<String>,
    /// Fixture values.
    fixture: Fixture,
    /// Monitoring expectations.
    expectations: MonitoringExpectations,
}

impl Module {
    /// Returns `variables.tf` or fails with "artifact unavailable".
    fn variables(&self) -> Result<&str, CheckFailure> {
        self.variables.content().map(String::as_str)
    }

    /// Returns `main.tf` or fails with "artifact unavailable".
    fn main(&self) -> Result<&str, CheckFailure> {
        self.main.content().map(String::as_str)
    }
}

// ============================================================================
// SECTION: Checks
// ============================================================================

/// Declared checks in report order.
const CASES: &[CheckCase<Module>] = &[
    CheckCase {
        id: "variables_file_exists",
        description: "variables.tf exists in the monitoring module",
        run: variables_file_exists,
    },
    CheckCase {
        id: "main_file_exists",
        description: "main.tf exists in the monitoring module",
        run: main_file_exists,
    },
    CheckCase {
        id: "log_retention_variable",
        description: "log_retention_days is a documented number with the expected default",
        run: log_retention_variable,
    },
    CheckCase {
        id: "alarm_email_variable",
        description: "alarm_email is a documented string defaulting to empty",
        run: alarm_email_variable,
    },
    CheckCase {
        id: "required_variables",
        description: "every module input variable is declared",
        run: required_variables,
    },
    CheckCase {
        id: "log_groups_use_retention_variable",
        description: "log groups take retention from log_retention_days",
        run: log_groups_use_retention_variable,
    },
    CheckCase {
        id: "sns_subscription_uses_alarm_email",
        description: "email subscription is conditional on and targets alarm_email",
        run: sns_subscription_uses_alarm_email,
    },
    CheckCase {
        id: "sns_topic_defined",
        description: "alarms SNS topic is defined",
        run: sns_topic_defined,
    },
    CheckCase {
        id: "alarms_use_sns_topic",
        description: "metric alarms notify the alarms topic",
        run: alarms_use_sns_topic,
    },
    CheckCase {
        id: "cost_anomaly_subscription_uses_alarm_email",
        description: "cost anomaly subscription notifies alarm_email",
        run: cost_anomaly_subscription_uses_alarm_email,
    },
    CheckCase {
        id: "log_group_naming",
        description: "log groups follow the /aws/ naming convention",
        run: log_group_naming,
    },
    CheckCase {
        id: "dashboard_defined",
        description: "CloudWatch dashboard is defined with jsonencode",
        run: dashboard_defined,
    },
    CheckCase {
        id: "tags_variable",
        description: "tags is a map(string) defaulting to empty",
        run: tags_variable,
    },
];

/// `variables.tf` loaded.
fn variables_file_exists(subject: &Module) -> CheckResult {
    subject.variables.require_loaded()
}

/// `main.tf` loaded.
fn main_file_exists(subject: &Module) -> CheckResult {
    subject.main.require_loaded()
}

/// Returns the first `header { ... }` block or fails.
fn require_block<'a>(content: &'a str, header: &str) -> Result<&'a str, CheckFailure> {
    match extract_block(content, header) {
        Ok(Some(block)) => Ok(block),
        Ok(None) => Err(CheckFailure::Assertion(format!("block `{header}` must be complete"))),
        Err(err) => Err(CheckFailure::Assertion(format!("block pattern for `{header}`: {err}"))),
    }
}

/// Requires `attribute = value` with single or aligned spacing.
fn ensure_attribute(block: &str, attribute: &str, value: &str, what: &str) -> CheckResult {
    let single = format!("{attribute} = {value}");
    if block.contains(&single) {
        return Ok(());
    }
    let aligned = format!("{attribute:<12}= {value}");
    ensure_contains_any(block, &[single.as_str(), aligned.as_str()], what)
}

/// `log_retention_days` block.
fn log_retention_variable(subject: &Module) -> CheckResult {
    let text = subject.variables()?;
    ensure_contains(text, "variable \"log_retention_days\"", VARIABLES_FILE)?;
    let block = require_block(text, "variable \"log_retention_days\"")?;
    let what = "variable \"log_retention_days\"";
    ensure_attribute(block, "type", "number", what)?;
    ensure_contains_all(block, &["description", "default"], what)?;
    ensure_contains(block, &subject.expectations.log_retention_days.to_string(), what)
}

/// `alarm_email` block.
fn alarm_email_variable(subject: &Module) -> CheckResult {
    let text = subject.variables()?;
    ensure_contains(text, "variable \"alarm_email\"", VARIABLES_FILE)?;
    let block = require_block(text, "variable \"alarm_email\"")?;
    let what = "variable \"alarm_email\"";
    ensure_attribute(block, "type", "string", what)?;
    ensure_contains_all(block, &["description", "default", "\"\""], what)
}

/// Every input variable declared.
fn required_variables(subject: &Module) -> CheckResult {
    let text = subject.variables()?;
    for name in REQUIRED_VARIABLES {
        ensure_contains(text, &format!("variable \"{name}\""), VARIABLES_FILE)?;
    }
    Ok(())
}

/// Retention wired to the variable.
fn log_groups_use_retention_variable(subject: &Module) -> CheckResult {
    let uses = count_occurrences(subject.main()?, "retention_in_days = var.log_retention_days");
    ensure_at_least(
        uses,
        subject.expectations.min_log_groups_with_retention,
        "log groups using var.log_retention_days",
    )
}

/// Conditional email subscription.
fn sns_subscription_uses_alarm_email(subject: &Module) -> CheckResult {
    let text = subject.main()?;
    let header = "resource \"aws_sns_topic_subscription\" \"alarms_email\"";
    ensure_contains(text, header, MAIN_FILE)?;
    let block = require_block(text, header)?;
    ensure_contains_any(
        block,
        &["count     = var.alarm_email != \"\" ? 1 : 0", "count = var.alarm_email != \"\" ? 1 : 0"],
        header,
    )?;
    ensure_contains_any(
        block,
        &["endpoint  = var.alarm_email", "endpoint = var.alarm_email"],
        header,
    )
}

/// Alarms topic resource.
fn sns_topic_defined(subject: &Module) -> CheckResult {
    ensure_contains(subject.main()?, "resource \"aws_sns_topic\" \"alarms\"", MAIN_FILE)
}

/// Alarm count and topic references.
fn alarms_use_sns_topic(subject: &Module) -> CheckResult {
    let text = subject.main()?;
    ensure_at_least(
        count_occurrences(text, "resource \"aws_cloudwatch_metric_alarm\""),
        MIN_ALARM_RESOURCES,
        "CloudWatch metric alarms",
    )?;
    ensure_at_least(
        count_occurrences(text, "aws_sns_topic.alarms.arn"),
        MIN_ALARM_RESOURCES,
        "aws_sns_topic.alarms.arn references",
    )
}

/// Cost anomaly subscriber address.
fn cost_anomaly_subscription_uses_alarm_email(subject: &Module) -> CheckResult {
    let text = subject.main()?;
    let header =
        format!("resource \"aws_ce_anomaly_subscription\" \"{}\"", subject.fixture.project);
    ensure_contains(text, &header, MAIN_FILE)?;
    let direct = text.contains("address = var.alarm_email");
    let quoted = text.contains("address = \"") && text.contains("var.alarm_email");
    ensure(direct || quoted, "cost anomaly subscription address must use var.alarm_email")
}

/// Log group name templates.
fn log_group_naming(subject: &Module) -> CheckResult {
    let text = subject.main()?;
    let templates = [
        format!("\"/aws/{}/${{var.environment}}/application\"", subject.fixture.project),
        "\"/aws/lambda/${var.project_name}-${var.environment}\"".to_string(),
        "\"/aws/ecs/${var.project_name}-${var.environment}\"".to_string(),
    ];
    for template in &templates {
        ensure_contains(text, template, MAIN_FILE)?;
    }
    Ok(())
}

/// Dashboard resource.
fn dashboard_defined(subject: &Module) -> CheckResult {
    ensure_contains_all(
        subject.main()?,
        &["resource \"aws_cloudwatch_dashboard\" \"main\"", "dashboard_body = jsonencode"],
        MAIN_FILE,
    )
}

/// `tags` block.
fn tags_variable(subject: &Module) -> CheckResult {
    let text = subject.variables()?;
    let block = match extract_block(text, "variable \"tags\"") {
        Ok(Some(block)) => block,
        Ok(None) => return fail("variable \"tags\" must be defined"),
        Err(err) => return fail(format!("block pattern for `variable \"tags\"`: {err}")),
    };
    ensure_attribute(block, "type", "map(string)", "variable \"tags\"")?;
    ensure_attribute(block, "default", "{}", "variable \"tags\"")
}
