// crates/infra-gate-config/src/examples.rs
// ============================================================================
// Module: Config Examples
// Description: Canonical example configuration payload.
// Purpose: Deterministic example for docs and the `config example` command.
// Dependencies: std
// ============================================================================

//! ## Overview
//! The example spells out every default, so loading it is equivalent to
//! running with no configuration file at all.

/// Returns a canonical example `infra-gate.toml` configuration.
#[must_use]
pub fn config_toml_example() -> String {
    String::from(
        r#"[fixture]
project = "dealfinder"
environment = "dev"
region = "us-east-1"

[artifacts]
root = "."
bootstrap_script = "infrastructure/bootstrap.sh"
monitoring_module = "infrastructure/modules/monitoring/cloudwatch"
ci_workflow = ".github/workflows/ci.yml"
cd_workflow = ".github/workflows/cd.yml"
readme = "README.md"
max_bytes = 1048576

[aws]
# endpoint = "http://localhost:4566"
# allow_http = true
# profile = "dealfinder-dev"

[expectations.network]
vpc_cidr = "10.0.0.0/16"
subnet_count = 6
availability_zones = 3
endpoint_services = ["s3", "dynamodb"]

[expectations.storage]
bucket_purposes = ["data-lake", "models", "backups"]
sse_algorithm = "AES256"
versioning_status = "Enabled"

[expectations.tables]
table_purposes = ["deal-state", "agent-state", "user-sessions"]
billing_mode = "PAY_PER_REQUEST"
table_status = "ACTIVE"
sse_statuses = ["ENABLED", "ENABLING"]

[expectations.monitoring]
min_alarms = 5
alarm_markers = [
    "dynamodb-high-read-capacity",
    "dynamodb-high-write-capacity",
    "lambda-errors",
    "lambda-throttles",
    "s3-storage-size",
]
log_retention_days = 30
min_log_groups_with_retention = 3
alarm_topic_purpose = "alarms"
dashboard_purpose = "dashboard"

[expectations.bootstrap]
lifecycle_noncurrent_days = 90
usage_header_lines = 20

[expectations.pipelines]
python_version = "3.12"
terraform_version = "1.14"
terraform_working_directory = "infrastructure/environments/dev"
ci_branches = ["main", "develop"]
cd_branches = ["main"]

[selection]
# allowlist = ["bootstrap", "readme"]
denylist = []

[logging]
enabled = true
# path = "infra-gate-events.jsonl"
"#,
    )
}
