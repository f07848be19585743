// crates/infra-gate-core/src/core/expectations.rs
// ============================================================================
// Module: Infra Gate Expectations
// Description: Externally supplied constants asserted by the suites.
// Purpose: Keep every deployment-specific literal in one overridable model.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! Counts, names, and flags such as the 90-day lifecycle expiry or the
//! `PAY_PER_REQUEST` billing mode come from the deployed infrastructure, not
//! from any rule in this crate. They are modelled as configuration with the
//! deployment's current values as defaults.
//!
//! Invariants:
//! - Counts are strictly positive.
//! - Name lists are non-empty and contain no empty entries.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Expectation validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpectationsError {
    /// A count expectation is zero.
    #[error("expectations.{field} must be greater than zero")]
    ZeroCount {
        /// Dotted field path.
        field: &'static str,
    },
    /// A list expectation is empty.
    #[error("expectations.{field} must not be empty")]
    EmptyList {
        /// Dotted field path.
        field: &'static str,
    },
    /// A string expectation (or list entry) is blank.
    #[error("expectations.{field} must not contain blank values")]
    BlankValue {
        /// Dotted field path.
        field: &'static str,
    },
}

// ============================================================================
// SECTION: Network
// ============================================================================

/// Expectations for the VPC and networking resources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NetworkExpectations {
    /// Expected VPC CIDR block.
    pub vpc_cidr: String,
    /// Expected number of tagged subnets.
    pub subnet_count: usize,
    /// Expected number of distinct availability zones across subnets.
    pub availability_zones: usize,
    /// Service name fragments that must each match some VPC endpoint.
    pub endpoint_services: Vec<String>,
}

impl Default for NetworkExpectations {
    fn default() -> Self {
        Self {
            vpc_cidr: "10.0.0.0/16".to_string(),
            subnet_count: 6,
            availability_zones: 3,
            endpoint_services: strings(&["s3", "dynamodb"]),
        }
    }
}

// ============================================================================
// SECTION: Storage
// ============================================================================

/// Expectations for the S3 buckets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageExpectations {
    /// Bucket purposes; bucket names are `{project}-{environment}-{purpose}`.
    pub bucket_purposes: Vec<String>,
    /// Required default server-side encryption algorithm.
    pub sse_algorithm: String,
    /// Required versioning status.
    pub versioning_status: String,
}

impl Default for StorageExpectations {
    fn default() -> Self {
        Self {
            bucket_purposes: strings(&["data-lake", "models", "backups"]),
            sse_algorithm: "AES256".to_string(),
            versioning_status: "Enabled".to_string(),
        }
    }
}

// ============================================================================
// SECTION: Tables
// ============================================================================

/// Expectations for the DynamoDB tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TableExpectations {
    /// Table purposes; table names are `{project}-{environment}-{purpose}`.
    pub table_purposes: Vec<String>,
    /// Required billing mode.
    pub billing_mode: String,
    /// Required table status.
    pub table_status: String,
    /// Accepted server-side encryption statuses.
    pub sse_statuses: Vec<String>,
}

impl Default for TableExpectations {
    fn default() -> Self {
        Self {
            table_purposes: strings(&["deal-state", "agent-state", "user-sessions"]),
            billing_mode: "PAY_PER_REQUEST".to_string(),
            table_status: "ACTIVE".to_string(),
            sse_statuses: strings(&["ENABLED", "ENABLING"]),
        }
    }
}

// ============================================================================
// SECTION: Monitoring
// ============================================================================

/// Expectations for CloudWatch, SNS, and the Terraform monitoring module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MonitoringExpectations {
    /// Minimum number of alarms under the `{project}-{environment}` prefix.
    pub min_alarms: usize,
    /// Substrings that must each appear in some alarm name.
    pub alarm_markers: Vec<String>,
    /// Default log retention declared by the Terraform module.
    pub log_retention_days: u32,
    /// Minimum log groups wired to `var.log_retention_days`.
    pub min_log_groups_with_retention: usize,
    /// SNS topic purpose; the topic name is `{project}-{environment}-{purpose}`.
    pub alarm_topic_purpose: String,
    /// Dashboard purpose; the dashboard name is `{project}-{environment}-{purpose}`.
    pub dashboard_purpose: String,
}

impl Default for MonitoringExpectations {
    fn default() -> Self {
        Self {
            min_alarms: 5,
            alarm_markers: strings(&[
                "dynamodb-high-read-capacity",
                "dynamodb-high-write-capacity",
                "lambda-errors",
                "lambda-throttles",
                "s3-storage-size",
            ]),
            log_retention_days: 30,
            min_log_groups_with_retention: 3,
            alarm_topic_purpose: "alarms".to_string(),
            dashboard_purpose: "dashboard".to_string(),
        }
    }
}

// ============================================================================
// SECTION: Bootstrap
// ============================================================================

/// Expectations for the Terraform state bootstrap script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BootstrapExpectations {
    /// Days after which noncurrent state object versions expire.
    pub lifecycle_noncurrent_days: u32,
    /// Number of leading lines that must carry usage documentation.
    pub usage_header_lines: usize,
}

impl Default for BootstrapExpectations {
    fn default() -> Self {
        Self {
            lifecycle_noncurrent_days: 90,
            usage_header_lines: 20,
        }
    }
}

// ============================================================================
// SECTION: Pipelines
// ============================================================================

/// Expectations for the CI and CD workflows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineExpectations {
    /// Python version pinned by the CI setup step.
    pub python_version: String,
    /// Terraform version fragment pinned by the CD setup step.
    pub terraform_version: String,
    /// Working directory of the Terraform steps.
    pub terraform_working_directory: String,
    /// Branches that must trigger CI on push.
    pub ci_branches: Vec<String>,
    /// Branches that must trigger CD on push.
    pub cd_branches: Vec<String>,
}

impl Default for PipelineExpectations {
    fn default() -> Self {
        Self {
            python_version: "3.12".to_string(),
            terraform_version: "1.14".to_string(),
            terraform_working_directory: "infrastructure/environments/dev".to_string(),
            ci_branches: strings(&["main", "develop"]),
            cd_branches: strings(&["main"]),
        }
    }
}

// ============================================================================
// SECTION: Aggregate
// ============================================================================

/// All expectations for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Expectations {
    /// Networking expectations.
    pub network: NetworkExpectations,
    /// Storage expectations.
    pub storage: StorageExpectations,
    /// Table expectations.
    pub tables: TableExpectations,
    /// Monitoring expectations.
    pub monitoring: MonitoringExpectations,
    /// Bootstrap script expectations.
    pub bootstrap: BootstrapExpectations,
    /// Pipeline expectations.
    pub pipelines: PipelineExpectations,
}

impl Expectations {
    /// Validates counts and lists.
    ///
    /// # Errors
    ///
    /// Returns [`ExpectationsError`] for the first invalid field.
    pub fn validate(&self) -> Result<(), ExpectationsError> {
        non_blank("network.vpc_cidr", &self.network.vpc_cidr)?;
        positive("network.subnet_count", self.network.subnet_count)?;
        positive("network.availability_zones", self.network.availability_zones)?;
        non_empty_list("network.endpoint_services", &self.network.endpoint_services)?;

        non_empty_list("storage.bucket_purposes", &self.storage.bucket_purposes)?;
        non_blank("storage.sse_algorithm", &self.storage.sse_algorithm)?;
        non_blank("storage.versioning_status", &self.storage.versioning_status)?;

        non_empty_list("tables.table_purposes", &self.tables.table_purposes)?;
        non_blank("tables.billing_mode", &self.tables.billing_mode)?;
        non_blank("tables.table_status", &self.tables.table_status)?;
        non_empty_list("tables.sse_statuses", &self.tables.sse_statuses)?;

        positive("monitoring.min_alarms", self.monitoring.min_alarms)?;
        non_empty_list("monitoring.alarm_markers", &self.monitoring.alarm_markers)?;
        positive_days("monitoring.log_retention_days", self.monitoring.log_retention_days)?;
        positive(
            "monitoring.min_log_groups_with_retention",
            self.monitoring.min_log_groups_with_retention,
        )?;
        non_blank("monitoring.alarm_topic_purpose", &self.monitoring.alarm_topic_purpose)?;
        non_blank("monitoring.dashboard_purpose", &self.monitoring.dashboard_purpose)?;

        positive_days(
            "bootstrap.lifecycle_noncurrent_days",
            self.bootstrap.lifecycle_noncurrent_days,
        )?;
        positive("bootstrap.usage_header_lines", self.bootstrap.usage_header_lines)?;

        non_blank("pipelines.python_version", &self.pipelines.python_version)?;
        non_blank("pipelines.terraform_version", &self.pipelines.terraform_version)?;
        non_blank(
            "pipelines.terraform_working_directory",
            &self.pipelines.terraform_working_directory,
        )?;
        non_empty_list("pipelines.ci_branches", &self.pipelines.ci_branches)?;
        non_empty_list("pipelines.cd_branches", &self.pipelines.cd_branches)
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Builds an owned string list from literals.
fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| (*value).to_string()).collect()
}

/// Rejects zero counts.
const fn positive(field: &'static str, value: usize) -> Result<(), ExpectationsError> {
    if value == 0 {
        return Err(ExpectationsError::ZeroCount {
            field,
        });
    }
    Ok(())
}

/// Rejects zero day counts.
const fn positive_days(field: &'static str, value: u32) -> Result<(), ExpectationsError> {
    if value == 0 {
        return Err(ExpectationsError::ZeroCount {
            field,
        });
    }
    Ok(())
}

/// Rejects blank strings.
fn non_blank(field: &'static str, value: &str) -> Result<(), ExpectationsError> {
    if value.trim().is_empty() {
        return Err(ExpectationsError::BlankValue {
            field,
        });
    }
    Ok(())
}

/// Rejects empty lists and lists with blank entries.
fn non_empty_list(field: &'static str, values: &[String]) -> Result<(), ExpectationsError> {
    if values.is_empty() {
        return Err(ExpectationsError::EmptyList {
            field,
        });
    }
    if values.iter().any(|value| value.trim().is_empty()) {
        return Err(ExpectationsError::BlankValue {
            field,
        });
    }
    Ok(())
}
