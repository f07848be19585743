// crates/infra-gate-aws/src/sdk.rs
// ============================================================================
// Module: AWS SDK Inventory
// Description: CloudInventory backed by the AWS SDK for Rust.
// Purpose: Answer live checks with read-only, fully paginated API calls.
// Dependencies: aws-config, aws-sdk-*, tokio
// ============================================================================

//! ## Overview
//! [`AwsInventory`] owns a private tokio runtime and blocks on each SDK call,
//! so live suites stay synchronous. Clients are built on first use from one
//! shared `aws_config` load; constructing the inventory never touches the
//! network or the credential chain. Cost Explorer is always addressed in
//! `us-east-1`, the only region that serves it.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::future::Future;
use std::sync::Arc;
use std::sync::OnceLock;

use aws_config::BehaviorVersion;
use aws_config::Region;
use aws_sdk_ec2::types::Filter;
use aws_sdk_s3::error::DisplayErrorContext;
use tokio::runtime::Handle;
use tokio::runtime::Runtime;
use tokio::runtime::RuntimeFlavor;

use crate::inventory::CloudInventory;
use crate::inventory::InventoryError;
use crate::inventory::SubnetRecord;
use crate::inventory::TableRecord;
use crate::inventory::TagScope;
use crate::inventory::VpcEndpointRecord;
use crate::inventory::VpcRecord;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Region serving the Cost Explorer API.
const COST_EXPLORER_REGION: &str = "us-east-1";

// ============================================================================
// SECTION: Runtime Helpers
// ============================================================================

/// Blocks on an SDK future using a compatible runtime.
fn block_on_with_runtime<F, T>(runtime: &Runtime, future: F) -> Result<T, InventoryError>
where
    F: Future<Output = Result<T, InventoryError>> + Send + 'static,
    T: Send + 'static,
{
    if let Ok(handle) = Handle::try_current() {
        if matches!(handle.runtime_flavor(), RuntimeFlavor::MultiThread) {
            return tokio::task::block_in_place(|| handle.block_on(future));
        }
        let (tx, rx) = std::sync::mpsc::sync_channel(1);
        std::thread::spawn(move || {
            let result = Runtime::new()
                .map_err(|err| InventoryError::Runtime(err.to_string()))
                .and_then(|runtime| runtime.block_on(future));
            let _ = tx.send(result);
        });
        return rx
            .recv()
            .unwrap_or_else(|_| Err(InventoryError::Runtime("aws thread join failed".to_string())));
    }

    runtime.block_on(future)
}

/// Maps an SDK error to [`InventoryError::Api`] with its full context.
fn api_error<E: std::error::Error>(operation: &'static str) -> impl FnOnce(E) -> InventoryError {
    move |err| InventoryError::Api {
        operation,
        message: DisplayErrorContext(&err).to_string(),
    }
}

/// Builds the `tag:Project` and `tag:Environment` filters.
fn tag_filters(scope: &TagScope) -> Vec<Filter> {
    vec![
        Filter::builder().name("tag:Project").values(scope.project.clone()).build(),
        Filter::builder().name("tag:Environment").values(scope.environment.clone()).build(),
    ]
}

// ============================================================================
// SECTION: Options
// ============================================================================

/// Connection options for [`AwsInventory`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AwsOptions {
    /// Region hosting the deployment.
    pub region: String,
    /// Optional endpoint override for AWS-compatible APIs.
    pub endpoint: Option<String>,
    /// Optional named profile.
    pub profile: Option<String>,
}

// ============================================================================
// SECTION: Clients
// ============================================================================

/// Service clients sharing one loaded configuration.
#[derive(Clone)]
struct Clients {
    /// EC2 (VPC networking).
    ec2: aws_sdk_ec2::Client,
    /// S3.
    s3: aws_sdk_s3::Client,
    /// DynamoDB.
    dynamodb: aws_sdk_dynamodb::Client,
    /// CloudWatch metrics, alarms, and dashboards.
    cloudwatch: aws_sdk_cloudwatch::Client,
    /// CloudWatch Logs.
    logs: aws_sdk_cloudwatchlogs::Client,
    /// SNS.
    sns: aws_sdk_sns::Client,
    /// Cost Explorer, pinned to its serving region.
    cost: aws_sdk_costexplorer::Client,
}

// ============================================================================
// SECTION: Inventory
// ============================================================================

/// AWS SDK backed inventory.
pub struct AwsInventory {
    /// Connection options.
    options: AwsOptions,
    /// Clients, built on first use.
    clients: OnceLock<Result<Clients, InventoryError>>,
    /// Tokio runtime for blocking SDK calls.
    runtime: Option<Arc<Runtime>>,
}

impl Drop for AwsInventory {
    fn drop(&mut self) {
        if let Some(runtime) = self.runtime.take() {
            let _ = std::thread::spawn(move || drop(runtime));
        }
    }
}

impl AwsInventory {
    /// Creates an inventory; clients connect lazily on the first call.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError::Runtime`] when the tokio runtime cannot be
    /// created.
    pub fn new(options: AwsOptions) -> Result<Self, InventoryError> {
        let runtime = Runtime::new().map_err(|err| InventoryError::Runtime(err.to_string()))?;
        Ok(Self {
            options,
            clients: OnceLock::new(),
            runtime: Some(Arc::new(runtime)),
        })
    }

    /// Returns the connection options.
    #[must_use]
    pub const fn options(&self) -> &AwsOptions {
        &self.options
    }

    /// Returns the runtime or an error if shut down.
    fn runtime(&self) -> Result<&Runtime, InventoryError> {
        self.runtime
            .as_ref()
            .map(AsRef::as_ref)
            .ok_or_else(|| InventoryError::Runtime("aws runtime closed".to_string()))
    }

    /// Blocks on an SDK future.
    fn block_on<F, T>(&self, future: F) -> Result<T, InventoryError>
    where
        F: Future<Output = Result<T, InventoryError>> + Send + 'static,
        T: Send + 'static,
    {
        block_on_with_runtime(self.runtime()?, future)
    }

    /// Returns the clients, loading configuration on first use.
    fn clients(&self) -> Result<&Clients, InventoryError> {
        self.clients.get_or_init(|| self.connect()).as_ref().map_err(Clone::clone)
    }

    /// Loads shared configuration and builds every client.
    fn connect(&self) -> Result<Clients, InventoryError> {
        let region = self.options.region.clone();
        let endpoint = self.options.endpoint.clone();
        let profile = self.options.profile.clone();
        let shared_config = self.block_on(async move {
            let mut loader =
                aws_config::defaults(BehaviorVersion::latest()).region(Region::new(region));
            if let Some(endpoint) = endpoint {
                loader = loader.endpoint_url(endpoint);
            }
            if let Some(profile) = profile {
                loader = loader.profile_name(profile);
            }
            Ok(loader.load().await)
        })?;
        let mut s3_builder = aws_sdk_s3::config::Builder::from(&shared_config);
        if self.options.endpoint.is_some() {
            s3_builder = s3_builder.force_path_style(true);
        }
        let cost_config = aws_sdk_costexplorer::config::Builder::from(&shared_config)
            .region(Region::new(COST_EXPLORER_REGION))
            .build();
        Ok(Clients {
            ec2: aws_sdk_ec2::Client::new(&shared_config),
            s3: aws_sdk_s3::Client::from_conf(s3_builder.build()),
            dynamodb: aws_sdk_dynamodb::Client::new(&shared_config),
            cloudwatch: aws_sdk_cloudwatch::Client::new(&shared_config),
            logs: aws_sdk_cloudwatchlogs::Client::new(&shared_config),
            sns: aws_sdk_sns::Client::new(&shared_config),
            cost: aws_sdk_costexplorer::Client::from_conf(cost_config),
        })
    }
}

impl CloudInventory for AwsInventory {
    fn vpcs(&self, scope: &TagScope) -> Result<Vec<VpcRecord>, InventoryError> {
        let client = self.clients()?.ec2.clone();
        let filters = tag_filters(scope);
        self.block_on(async move {
            let mut records = Vec::new();
            let mut token: Option<String> = None;
            loop {
                let output = client
                    .describe_vpcs()
                    .set_filters(Some(filters.clone()))
                    .set_next_token(token.take())
                    .send()
                    .await
                    .map_err(api_error("DescribeVpcs"))?;
                records.extend(output.vpcs().iter().map(|vpc| VpcRecord {
                    vpc_id: vpc.vpc_id().unwrap_or_default().to_string(),
                    cidr_block: vpc.cidr_block().map(str::to_string),
                }));
                token = output.next_token().map(str::to_string);
                if token.is_none() {
                    return Ok(records);
                }
            }
        })
    }

    fn subnets(&self, scope: &TagScope) -> Result<Vec<SubnetRecord>, InventoryError> {
        let client = self.clients()?.ec2.clone();
        let filters = tag_filters(scope);
        self.block_on(async move {
            let mut records = Vec::new();
            let mut token: Option<String> = None;
            loop {
                let output = client
                    .describe_subnets()
                    .set_filters(Some(filters.clone()))
                    .set_next_token(token.take())
                    .send()
                    .await
                    .map_err(api_error("DescribeSubnets"))?;
                records.extend(output.subnets().iter().map(|subnet| SubnetRecord {
                    subnet_id: subnet.subnet_id().unwrap_or_default().to_string(),
                    availability_zone: subnet.availability_zone().map(str::to_string),
                }));
                token = output.next_token().map(str::to_string);
                if token.is_none() {
                    return Ok(records);
                }
            }
        })
    }

    fn internet_gateways(&self, scope: &TagScope) -> Result<Vec<String>, InventoryError> {
        let client = self.clients()?.ec2.clone();
        let filters = tag_filters(scope);
        self.block_on(async move {
            let mut ids = Vec::new();
            let mut token: Option<String> = None;
            loop {
                let output = client
                    .describe_internet_gateways()
                    .set_filters(Some(filters.clone()))
                    .set_next_token(token.take())
                    .send()
                    .await
                    .map_err(api_error("DescribeInternetGateways"))?;
                ids.extend(
                    output
                        .internet_gateways()
                        .iter()
                        .map(|gateway| gateway.internet_gateway_id().unwrap_or_default().to_string()),
                );
                token = output.next_token().map(str::to_string);
                if token.is_none() {
                    return Ok(ids);
                }
            }
        })
    }

    fn vpc_endpoints(&self) -> Result<Vec<VpcEndpointRecord>, InventoryError> {
        let client = self.clients()?.ec2.clone();
        self.block_on(async move {
            let mut records = Vec::new();
            let mut token: Option<String> = None;
            loop {
                let output = client
                    .describe_vpc_endpoints()
                    .set_next_token(token.take())
                    .send()
                    .await
                    .map_err(api_error("DescribeVpcEndpoints"))?;
                records.extend(output.vpc_endpoints().iter().map(|endpoint| VpcEndpointRecord {
                    endpoint_id: endpoint.vpc_endpoint_id().unwrap_or_default().to_string(),
                    service_name: endpoint.service_name().map(str::to_string),
                }));
                token = output.next_token().map(str::to_string);
                if token.is_none() {
                    return Ok(records);
                }
            }
        })
    }

    fn head_bucket(&self, bucket: &str) -> Result<(), InventoryError> {
        let client = self.clients()?.s3.clone();
        let bucket = bucket.to_string();
        self.block_on(async move {
            client.head_bucket().bucket(bucket).send().await.map_err(api_error("HeadBucket"))?;
            Ok(())
        })
    }

    fn bucket_encryption(&self, bucket: &str) -> Result<Vec<Option<String>>, InventoryError> {
        let client = self.clients()?.s3.clone();
        let bucket = bucket.to_string();
        self.block_on(async move {
            let output = client
                .get_bucket_encryption()
                .bucket(bucket)
                .send()
                .await
                .map_err(api_error("GetBucketEncryption"))?;
            let configuration = output.server_side_encryption_configuration().ok_or(
                InventoryError::Incomplete {
                    operation: "GetBucketEncryption",
                    field: "ServerSideEncryptionConfiguration",
                },
            )?;
            Ok(configuration
                .rules()
                .iter()
                .map(|rule| {
                    rule.apply_server_side_encryption_by_default()
                        .map(|default| default.sse_algorithm().as_str().to_string())
                })
                .collect())
        })
    }

    fn bucket_versioning(&self, bucket: &str) -> Result<Option<String>, InventoryError> {
        let client = self.clients()?.s3.clone();
        let bucket = bucket.to_string();
        self.block_on(async move {
            let output = client
                .get_bucket_versioning()
                .bucket(bucket)
                .send()
                .await
                .map_err(api_error("GetBucketVersioning"))?;
            Ok(output.status().map(|status| status.as_str().to_string()))
        })
    }

    fn describe_table(&self, name: &str) -> Result<TableRecord, InventoryError> {
        let client = self.clients()?.dynamodb.clone();
        let name = name.to_string();
        self.block_on(async move {
            let output = client
                .describe_table()
                .table_name(name.clone())
                .send()
                .await
                .map_err(api_error("DescribeTable"))?;
            let table = output.table().ok_or(InventoryError::Incomplete {
                operation: "DescribeTable",
                field: "Table",
            })?;
            Ok(TableRecord {
                name: table.table_name().map_or(name, str::to_string),
                status: table.table_status().map(|status| status.as_str().to_string()),
                billing_mode: table
                    .billing_mode_summary()
                    .and_then(|summary| summary.billing_mode())
                    .map(|mode| mode.as_str().to_string()),
                sse_status: table
                    .sse_description()
                    .and_then(|sse| sse.status())
                    .map(|status| status.as_str().to_string()),
            })
        })
    }

    fn log_groups(&self, prefix: &str) -> Result<Vec<String>, InventoryError> {
        let client = self.clients()?.logs.clone();
        let prefix = prefix.to_string();
        self.block_on(async move {
            let mut names = Vec::new();
            let mut token: Option<String> = None;
            loop {
                let output = client
                    .describe_log_groups()
                    .log_group_name_prefix(prefix.clone())
                    .set_next_token(token.take())
                    .send()
                    .await
                    .map_err(api_error("DescribeLogGroups"))?;
                names.extend(
                    output
                        .log_groups()
                        .iter()
                        .filter_map(|group| group.log_group_name().map(str::to_string)),
                );
                token = output.next_token().map(str::to_string);
                if token.is_none() {
                    return Ok(names);
                }
            }
        })
    }

    fn alarm_names(&self, prefix: &str) -> Result<Vec<String>, InventoryError> {
        let client = self.clients()?.cloudwatch.clone();
        let prefix = prefix.to_string();
        self.block_on(async move {
            let mut names = Vec::new();
            let mut token: Option<String> = None;
            loop {
                let output = client
                    .describe_alarms()
                    .alarm_name_prefix(prefix.clone())
                    .set_next_token(token.take())
                    .send()
                    .await
                    .map_err(api_error("DescribeAlarms"))?;
                names.extend(
                    output
                        .metric_alarms()
                        .iter()
                        .filter_map(|alarm| alarm.alarm_name().map(str::to_string)),
                );
                token = output.next_token().map(str::to_string);
                if token.is_none() {
                    return Ok(names);
                }
            }
        })
    }

    fn topic_arns(&self) -> Result<Vec<String>, InventoryError> {
        let client = self.clients()?.sns.clone();
        self.block_on(async move {
            let mut arns = Vec::new();
            let mut token: Option<String> = None;
            loop {
                let output = client
                    .list_topics()
                    .set_next_token(token.take())
                    .send()
                    .await
                    .map_err(api_error("ListTopics"))?;
                arns.extend(
                    output.topics().iter().filter_map(|topic| topic.topic_arn().map(str::to_string)),
                );
                token = output.next_token().map(str::to_string);
                if token.is_none() {
                    return Ok(arns);
                }
            }
        })
    }

    fn dashboard(&self, name: &str) -> Result<String, InventoryError> {
        let client = self.clients()?.cloudwatch.clone();
        let name = name.to_string();
        self.block_on(async move {
            let output = client
                .get_dashboard()
                .dashboard_name(name)
                .send()
                .await
                .map_err(api_error("GetDashboard"))?;
            output.dashboard_name().map(str::to_string).ok_or(InventoryError::Incomplete {
                operation: "GetDashboard",
                field: "DashboardName",
            })
        })
    }

    fn anomaly_monitors(&self) -> Result<Vec<String>, InventoryError> {
        let client = self.clients()?.cost.clone();
        self.block_on(async move {
            let mut names = Vec::new();
            let mut token: Option<String> = None;
            loop {
                let output = client
                    .get_anomaly_monitors()
                    .set_next_page_token(token.take())
                    .send()
                    .await
                    .map_err(api_error("GetAnomalyMonitors"))?;
                names.extend(
                    output.anomaly_monitors().iter().map(|monitor| monitor.monitor_name().to_string()),
                );
                token = output.next_page_token().map(str::to_string);
                if token.is_none() {
                    return Ok(names);
                }
            }
        })
    }
}
