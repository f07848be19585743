// crates/infra-gate-artifacts/src/bootstrap.rs
// ============================================================================
// Module: Bootstrap Script Suite
// Description: Checks over the Terraform state bootstrap shell script.
// Purpose: Pin the script's S3/DynamoDB backend setup literal by literal.
// Dependencies: infra-gate-core
// ============================================================================

//! ## Overview
//! The bootstrap script creates the versioned, encrypted state bucket and the
//! lock table Terraform's S3 backend needs, then prints the backend block.
//! Every check is a required substring (or a small set of alternatives); the
//! script is never executed or parsed as shell.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::PathBuf;

use infra_gate_core::BootstrapExpectations;
use infra_gate_core::CheckCase;
use infra_gate_core::CheckEventSink;
use infra_gate_core::CheckFailure;
use infra_gate_core::CheckFilter;
use infra_gate_core::CheckResult;
use infra_gate_core::CheckSuite;
use infra_gate_core::Fixture;
use infra_gate_core::SuiteDescriptor;
use infra_gate_core::SuiteHeader;
use infra_gate_core::SuiteKind;
use infra_gate_core::SuiteReport;
use infra_gate_core::runtime::assert::ensure;
use infra_gate_core::runtime::assert::ensure_absent;
use infra_gate_core::runtime::assert::ensure_contains;
use infra_gate_core::runtime::assert::ensure_contains_all;
use infra_gate_core::runtime::assert::ensure_contains_any;
use infra_gate_core::runtime::runner::describe_cases;
use infra_gate_core::runtime::runner::run_cases;
use infra_gate_core::runtime::text::count_occurrences;
use infra_gate_core::runtime::text::first_lines;
use infra_gate_core::runtime::text::section_between;

use crate::source::Artifact;
use crate::source::ArtifactLayout;
use crate::source::load_text;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Suite identity.
const HEADER: SuiteHeader = SuiteHeader {
    suite_id: "bootstrap",
    title: "Terraform state bootstrap script",
    kind: SuiteKind::Artifact,
};

/// Label used in assertion messages.
const SCRIPT: &str = "bootstrap.sh";

/// Region where S3 bucket creation must omit a location constraint.
const S3_DEFAULT_REGION: &str = "us-east-1";

// ============================================================================
// SECTION: Suite
// ============================================================================

/// Bootstrap script suite.
pub struct BootstrapSuite {
    /// Resolved script path.
    path: PathBuf,
    /// Read limit.
    max_bytes: usize,
    /// Fixture supplying project, environment, and region defaults.
    fixture: Fixture,
    /// Script expectations.
    expectations: BootstrapExpectations,
}

impl BootstrapSuite {
    /// Creates the suite for the layout's bootstrap script.
    #[must_use]
    pub fn new(layout: &ArtifactLayout, fixture: Fixture, expectations: BootstrapExpectations) -> Self {
        Self {
            path: layout.resolve(&layout.bootstrap_script),
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

impl CheckSuite for BootstrapSuite {
    fn descriptor(&self) -> SuiteDescriptor {
        descriptor()
    }

    fn run(&self, filter: &CheckFilter, sink: &dyn CheckEventSink) -> SuiteReport {
        let subject = Script {
            script: load_text(self.path.clone(), self.max_bytes),
            fixture: self.fixture.clone(),
            expectations: self.expectations.clone(),
        };
        run_cases(&HEADER, CASES, &subject, filter, sink)
    }
}

/// Loaded script plus the values its literals are built from.
struct Script {
    /// Script text.
    script: Artifact<String>,
    /// Fixture values.
    fixture: Fixture,
    /// Script expectations.
    expectations: BootstrapExpectations,
}

impl Script {
    /// Returns the script text or fails with "artifact unavailable".
    fn text(&self) -> Result<&str, CheckFailure> {
        self.script.content().map(String::as_str)
    }
}

// ============================================================================
// SECTION: Checks
// ============================================================================

/// Declared checks in report order.
const CASES: &[CheckCase<Script>] = &[
    CheckCase {
        id: "script_exists",
        description: "bootstrap script exists",
        run: script_exists,
    },
    CheckCase {
        id: "shebang_present",
        description: "script starts with a bash shebang",
        run: shebang_present,
    },
    CheckCase {
        id: "error_handling",
        description: "script uses set -e",
        run: error_handling,
    },
    CheckCase {
        id: "script_parameters",
        description: "script accepts region and environment parameters with defaults",
        run: script_parameters,
    },
    CheckCase {
        id: "project_name_variable",
        description: "project name is set",
        run: project_name_variable,
    },
    CheckCase {
        id: "bucket_naming",
        description: "state bucket is named project-terraform-state-environment",
        run: bucket_naming,
    },
    CheckCase {
        id: "dynamodb_table_naming",
        description: "lock table is named project-terraform-locks",
        run: dynamodb_table_naming,
    },
    CheckCase {
        id: "aws_credentials_check",
        description: "script validates AWS credentials quietly",
        run: aws_credentials_check,
    },
    CheckCase {
        id: "s3_bucket_creation",
        description: "state bucket is created with name and region",
        run: s3_bucket_creation,
    },
    CheckCase {
        id: "s3_bucket_existence_check",
        description: "an existing state bucket is handled",
        run: s3_bucket_existence_check,
    },
    CheckCase {
        id: "s3_versioning_enabled",
        description: "bucket versioning is enabled",
        run: s3_versioning_enabled,
    },
    CheckCase {
        id: "s3_encryption_enabled",
        description: "bucket encryption uses AES256 with a bucket key",
        run: s3_encryption_enabled,
    },
    CheckCase {
        id: "s3_public_access_block",
        description: "public access is blocked",
        run: s3_public_access_block,
    },
    CheckCase {
        id: "s3_lifecycle_configuration",
        description: "bucket lifecycle configuration is set",
        run: s3_lifecycle_configuration,
    },
    CheckCase {
        id: "lifecycle_id_casing",
        description: "lifecycle rules use the ID key, not Id",
        run: lifecycle_id_casing,
    },
    CheckCase {
        id: "lifecycle_delete_old_versions",
        description: "noncurrent versions expire after the configured days",
        run: lifecycle_delete_old_versions,
    },
    CheckCase {
        id: "s3_tagging",
        description: "state bucket is tagged",
        run: s3_tagging,
    },
    CheckCase {
        id: "dynamodb_table_creation",
        description: "lock table is created",
        run: dynamodb_table_creation,
    },
    CheckCase {
        id: "dynamodb_table_existence_check",
        description: "an existing lock table is handled",
        run: dynamodb_table_existence_check,
    },
    CheckCase {
        id: "dynamodb_lock_id_attribute",
        description: "lock table is keyed by the LockID string",
        run: dynamodb_lock_id_attribute,
    },
    CheckCase {
        id: "dynamodb_billing_mode",
        description: "lock table uses pay-per-request billing",
        run: dynamodb_billing_mode,
    },
    CheckCase {
        id: "dynamodb_tagging",
        description: "lock table is tagged",
        run: dynamodb_tagging,
    },
    CheckCase {
        id: "dynamodb_wait_for_active",
        description: "script waits for the lock table to exist",
        run: dynamodb_wait_for_active,
    },
    CheckCase {
        id: "backend_configuration_output",
        description: "script prints the S3 backend block",
        run: backend_configuration_output,
    },
    CheckCase {
        id: "no_cli_pager_flag",
        description: "AWS CLI calls disable the pager",
        run: no_cli_pager_flag,
    },
    CheckCase {
        id: "success_message",
        description: "script reports completion",
        run: success_message,
    },
    CheckCase {
        id: "informational_output",
        description: "script prints the resources it manages",
        run: informational_output,
    },
    CheckCase {
        id: "usage_documentation",
        description: "script header documents usage",
        run: usage_documentation,
    },
    CheckCase {
        id: "region_conditional_logic",
        description: "bucket creation special-cases us-east-1",
        run: region_conditional_logic,
    },
];

/// The script loaded.
fn script_exists(subject: &Script) -> CheckResult {
    subject.script.require_loaded()
}

/// `#!/bin/bash` first.
fn shebang_present(subject: &Script) -> CheckResult {
    ensure(
        subject.text()?.starts_with("#!/bin/bash"),
        "bootstrap.sh must start with `#!/bin/bash`",
    )
}

/// `set -e` present.
fn error_handling(subject: &Script) -> CheckResult {
    ensure_contains(subject.text()?, "set -e", SCRIPT)
}

/// Positional parameters default to the fixture's region and environment.
fn script_parameters(subject: &Script) -> CheckResult {
    let text = subject.text()?;
    ensure_contains(text, &format!("REGION=\"${{1:-{}}}\"", subject.fixture.region), SCRIPT)?;
    ensure_contains(text, &format!("ENVIRONMENT=\"${{2:-{}}}\"", subject.fixture.environment), SCRIPT)
}

/// Project name matches the fixture.
fn project_name_variable(subject: &Script) -> CheckResult {
    ensure_contains(
        subject.text()?,
        &format!("PROJECT_NAME=\"{}\"", subject.fixture.project),
        SCRIPT,
    )
}

/// State bucket naming.
fn bucket_naming(subject: &Script) -> CheckResult {
    ensure_contains(
        subject.text()?,
        "BUCKET_NAME=\"${PROJECT_NAME}-terraform-state-${ENVIRONMENT}\"",
        SCRIPT,
    )
}

/// Lock table naming.
fn dynamodb_table_naming(subject: &Script) -> CheckResult {
    ensure_contains(subject.text()?, "DYNAMODB_TABLE=\"${PROJECT_NAME}-terraform-locks\"", SCRIPT)
}

/// STS identity probe with output suppressed.
fn aws_credentials_check(subject: &Script) -> CheckResult {
    ensure_contains_all(subject.text()?, &["aws sts get-caller-identity", "&>/dev/null"], SCRIPT)
}

/// Bucket creation.
fn s3_bucket_creation(subject: &Script) -> CheckResult {
    ensure_contains_all(
        subject.text()?,
        &["aws s3api create-bucket", "--bucket \"${BUCKET_NAME}\"", "--region \"${REGION}\""],
        SCRIPT,
    )
}

/// Existing bucket handling.
fn s3_bucket_existence_check(subject: &Script) -> CheckResult {
    ensure_contains_all(subject.text()?, &["aws s3api head-bucket", "already exists"], SCRIPT)
}

/// Versioning enabled in either CLI shorthand or JSON form.
fn s3_versioning_enabled(subject: &Script) -> CheckResult {
    let text = subject.text()?;
    ensure_contains(text, "aws s3api put-bucket-versioning", SCRIPT)?;
    ensure_contains_any(text, &["\"Status\": \"Enabled\"", "Status=Enabled"], SCRIPT)
}

/// Default encryption.
fn s3_encryption_enabled(subject: &Script) -> CheckResult {
    ensure_contains_all(
        subject.text()?,
        &["aws s3api put-bucket-encryption", "AES256", "BucketKeyEnabled"],
        SCRIPT,
    )
}

/// Public access block flags.
fn s3_public_access_block(subject: &Script) -> CheckResult {
    ensure_contains_all(
        subject.text()?,
        &[
            "aws s3api put-public-access-block",
            "BlockPublicAcls=true",
            "IgnorePublicAcls=true",
            "BlockPublicPolicy=true",
            "RestrictPublicBuckets=true",
        ],
        SCRIPT,
    )
}

/// Lifecycle configuration call.
fn s3_lifecycle_configuration(subject: &Script) -> CheckResult {
    ensure_contains_all(
        subject.text()?,
        &["aws s3api put-bucket-lifecycle-configuration", "\"Rules\""],
        SCRIPT,
    )
}

/// The lifecycle JSON uses `"ID"`; the API rejects `"Id"`.
fn lifecycle_id_casing(subject: &Script) -> CheckResult {
    let text = subject.text()?;
    ensure_contains(text, "\"ID\":", SCRIPT)?;
    let section = section_between(text, "put-bucket-lifecycle-configuration", "--no-cli-pager");
    ensure_contains(section, "\"ID\"", "lifecycle configuration")?;
    ensure_absent(section, "\"Id\"", "lifecycle configuration")
}

/// Noncurrent version expiry.
fn lifecycle_delete_old_versions(subject: &Script) -> CheckResult {
    let days = subject.expectations.lifecycle_noncurrent_days.to_string();
    ensure_contains_all(
        subject.text()?,
        &["DeleteOldVersions", "NoncurrentVersionExpiration", "NoncurrentDays", &days],
        SCRIPT,
    )
}

/// Bucket tags.
fn s3_tagging(subject: &Script) -> CheckResult {
    ensure_contains_all(
        subject.text()?,
        &[
            "aws s3api put-bucket-tagging",
            "Key=Project,Value=${PROJECT_NAME}",
            "Key=Environment,Value=${ENVIRONMENT}",
            "Key=ManagedBy,Value=terraform",
            "Key=Purpose,Value=terraform-state",
        ],
        SCRIPT,
    )
}

/// Lock table creation.
fn dynamodb_table_creation(subject: &Script) -> CheckResult {
    ensure_contains_all(
        subject.text()?,
        &["aws dynamodb create-table", "--table-name \"${DYNAMODB_TABLE}\""],
        SCRIPT,
    )
}

/// Existing lock table handling.
fn dynamodb_table_existence_check(subject: &Script) -> CheckResult {
    ensure_contains_all(subject.text()?, &["aws dynamodb describe-table", "already exists"], SCRIPT)
}

/// `LockID` hash key.
fn dynamodb_lock_id_attribute(subject: &Script) -> CheckResult {
    ensure_contains_all(
        subject.text()?,
        &["AttributeName=LockID,AttributeType=S", "AttributeName=LockID,KeyType=HASH"],
        SCRIPT,
    )
}

/// On-demand billing.
fn dynamodb_billing_mode(subject: &Script) -> CheckResult {
    ensure_contains(subject.text()?, "--billing-mode PAY_PER_REQUEST", SCRIPT)
}

/// Lock table tags.
fn dynamodb_tagging(subject: &Script) -> CheckResult {
    ensure_contains_all(
        subject.text()?,
        &[
            "Key=Project,Value=\"${PROJECT_NAME}\"",
            "Key=Environment,Value=\"${ENVIRONMENT}\"",
            "Key=ManagedBy,Value=terraform",
            "Key=Purpose,Value=terraform-state-lock",
        ],
        SCRIPT,
    )
}

/// Waiter on the lock table.
fn dynamodb_wait_for_active(subject: &Script) -> CheckResult {
    ensure_contains(subject.text()?, "aws dynamodb wait table-exists", SCRIPT)
}

/// Printed backend block, with Terraform's aligned spacing.
fn backend_configuration_output(subject: &Script) -> CheckResult {
    ensure_contains_all(
        subject.text()?,
        &[
            "terraform {",
            "backend \"s3\"",
            "bucket         = \"${BUCKET_NAME}\"",
            "key            = \"terraform.tfstate\"",
            "region         = \"${REGION}\"",
            "encrypt        = true",
            "dynamodb_table = \"${DYNAMODB_TABLE}\"",
        ],
        SCRIPT,
    )
}

/// At least one `--no-cli-pager`.
fn no_cli_pager_flag(subject: &Script) -> CheckResult {
    ensure(
        count_occurrences(subject.text()?, "--no-cli-pager") > 0,
        "bootstrap.sh must pass `--no-cli-pager` to AWS CLI calls",
    )
}

/// Completion banner.
fn success_message(subject: &Script) -> CheckResult {
    ensure_contains_all(subject.text()?, &["Bootstrap Complete", "\u{2713}"], SCRIPT)
}

/// Summary labels.
fn informational_output(subject: &Script) -> CheckResult {
    ensure_contains_all(
        subject.text()?,
        &["Project:", "Region:", "Environment:", "S3 Bucket:", "DynamoDB Table:"],
        SCRIPT,
    )
}

/// Usage block in the header lines.
fn usage_documentation(subject: &Script) -> CheckResult {
    let header = first_lines(subject.text()?, subject.expectations.usage_header_lines);
    let what = format!("first {} lines of bootstrap.sh", subject.expectations.usage_header_lines);
    ensure_contains(&header, "Usage:", &what)?;
    ensure_contains_any(&header, &["Example:", "bootstrap.sh"], &what)
}

/// `LocationConstraint` outside us-east-1.
fn region_conditional_logic(subject: &Script) -> CheckResult {
    ensure_contains_all(subject.text()?, &[S3_DEFAULT_REGION, "LocationConstraint"], SCRIPT)
}
