// crates/infra-gate-aws/src/inventory.rs
// ============================================================================
// Module: Cloud Inventory
// Description: Read-only view of deployed AWS resources.
// Purpose: Decouple live checks from the AWS SDK so they run against fakes.
// Dependencies: infra-gate-core, thiserror
// ============================================================================

//! ## Overview
//! [`CloudInventory`] is the seam between live suites and AWS. Each method
//! maps to one read-only description call (paginated to completion) and
//! returns only the fields the checks assert. Implementations must never
//! create, modify, or delete resources.

// ============================================================================
// SECTION: Imports
// ============================================================================

use infra_gate_core::CheckFailure;
use thiserror::Error;

// ============================================================================
// SECTION: Records
// ============================================================================

/// Tag filter scoping tagged resources to one deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagScope {
    /// Value of the `Project` tag.
    pub project: String,
    /// Value of the `Environment` tag.
    pub environment: String,
}

/// A VPC.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VpcRecord {
    /// VPC id.
    pub vpc_id: String,
    /// Primary IPv4 CIDR block.
    pub cidr_block: Option<String>,
}

/// A subnet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubnetRecord {
    /// Subnet id.
    pub subnet_id: String,
    /// Availability zone name.
    pub availability_zone: Option<String>,
}

/// A VPC endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VpcEndpointRecord {
    /// Endpoint id.
    pub endpoint_id: String,
    /// Service name, e.g. `com.amazonaws.us-east-1.s3`.
    pub service_name: Option<String>,
}

/// A DynamoDB table description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRecord {
    /// Table name.
    pub name: String,
    /// Table status, e.g. `ACTIVE`.
    pub status: Option<String>,
    /// Billing mode from the billing mode summary.
    pub billing_mode: Option<String>,
    /// Server-side encryption status.
    pub sse_status: Option<String>,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Inventory errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InventoryError {
    /// An AWS API call failed.
    #[error("{operation} failed: {message}")]
    Api {
        /// API operation name.
        operation: &'static str,
        /// Service error message.
        message: String,
    },
    /// The API returned a response without a required field.
    #[error("{operation} response is missing {field}")]
    Incomplete {
        /// API operation name.
        operation: &'static str,
        /// Missing field.
        field: &'static str,
    },
    /// The SDK runtime or client could not be initialized.
    #[error("aws runtime error: {0}")]
    Runtime(String),
}

impl From<InventoryError> for CheckFailure {
    fn from(err: InventoryError) -> Self {
        Self::Assertion(err.to_string())
    }
}

// ============================================================================
// SECTION: Inventory Interface
// ============================================================================

/// Read-only access to deployed AWS resources.
pub trait CloudInventory: Send + Sync {
    /// Lists VPCs carrying the scope's tags.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError`] when the description call fails.
    fn vpcs(&self, scope: &TagScope) -> Result<Vec<VpcRecord>, InventoryError>;

    /// Lists subnets carrying the scope's tags.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError`] when the description call fails.
    fn subnets(&self, scope: &TagScope) -> Result<Vec<SubnetRecord>, InventoryError>;

    /// Lists ids of internet gateways carrying the scope's tags.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError`] when the description call fails.
    fn internet_gateways(&self, scope: &TagScope) -> Result<Vec<String>, InventoryError>;

    /// Lists every VPC endpoint in the region.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError`] when the description call fails.
    fn vpc_endpoints(&self) -> Result<Vec<VpcEndpointRecord>, InventoryError>;

    /// Succeeds when the bucket exists and is accessible.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError`] when the head call fails.
    fn head_bucket(&self, bucket: &str) -> Result<(), InventoryError>;

    /// Returns the default algorithm of each bucket encryption rule, in order.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError`] when the bucket has no encryption
    /// configuration or the call fails.
    fn bucket_encryption(&self, bucket: &str) -> Result<Vec<Option<String>>, InventoryError>;

    /// Returns the bucket versioning status (`None` when never configured).
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError`] when the call fails.
    fn bucket_versioning(&self, bucket: &str) -> Result<Option<String>, InventoryError>;

    /// Describes a table.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError`] when the table does not exist or the call
    /// fails.
    fn describe_table(&self, name: &str) -> Result<TableRecord, InventoryError>;

    /// Lists log group names starting with `prefix`.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError`] when the description call fails.
    fn log_groups(&self, prefix: &str) -> Result<Vec<String>, InventoryError>;

    /// Lists metric alarm names starting with `prefix`.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError`] when the description call fails.
    fn alarm_names(&self, prefix: &str) -> Result<Vec<String>, InventoryError>;

    /// Lists every SNS topic ARN.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError`] when the list call fails.
    fn topic_arns(&self) -> Result<Vec<String>, InventoryError>;

    /// Fetches a dashboard and returns the name the service reports.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError`] when the dashboard does not exist or the
    /// call fails.
    fn dashboard(&self, name: &str) -> Result<String, InventoryError>;

    /// Lists cost anomaly monitor names.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError`] when Cost Explorer is unavailable or the
    /// call fails.
    fn anomaly_monitors(&self) -> Result<Vec<String>, InventoryError>;
}
