// crates/infra-gate-artifacts/src/pipeline.rs
// ============================================================================
// Module: Pipeline Suites
// Description: Checks over the CI and CD GitHub Actions workflows.
// Purpose: Pin triggers, jobs, steps, and Terraform commands of both pipelines.
// Dependencies: infra-gate-core, serde_yaml
// ============================================================================

//! ## Overview
//! Workflows are parsed as untyped YAML and navigated by key; the Actions
//! schema is not modelled. Steps are located by exact `name`, or by a
//! lowercase name fragment for the lint steps. Scalar comparisons are strict
//! string equality, so an unquoted `3.12` (a YAML float) does not match.
//!
//! Invariants:
//! - The trigger map is read from the `on` key, or from the boolean `true` key
//!   a YAML 1.1 loader produces for an unquoted `on`.

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
use infra_gate_core::PipelineExpectations;
use infra_gate_core::SuiteDescriptor;
use infra_gate_core::SuiteHeader;
use infra_gate_core::SuiteKind;
use infra_gate_core::SuiteReport;
use infra_gate_core::runtime::assert::ensure;
use infra_gate_core::runtime::assert::ensure_contains;
use infra_gate_core::runtime::assert::ensure_contains_all;
use infra_gate_core::runtime::assert::ensure_eq;
use infra_gate_core::runtime::runner::describe_cases;
use infra_gate_core::runtime::runner::run_cases;
use serde_yaml::Value;

use crate::source::Artifact;
use crate::source::ArtifactLayout;
use crate::source::load_yaml;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// CI suite identity.
const CI_HEADER: SuiteHeader = SuiteHeader {
    suite_id: "ci_pipeline",
    title: "CI pipeline",
    kind: SuiteKind::Artifact,
};

/// CD suite identity.
const CD_HEADER: SuiteHeader = SuiteHeader {
    suite_id: "cd_pipeline",
    title: "CD pipeline",
    kind: SuiteKind::Artifact,
};

/// CI lint and test job.
const LINT_AND_TEST_JOB: &str = "lint-and-test";
/// CD infrastructure job.
const DEPLOY_INFRASTRUCTURE_JOB: &str = "deploy-infrastructure";
/// AWS credentials step name shared by CD jobs.
const AWS_CREDENTIALS_STEP: &str = "Configure AWS credentials";

// ============================================================================
// SECTION: Suites
// ============================================================================

/// Which workflow a [`PipelineSuite`] checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineKind {
    /// Continuous integration workflow.
    Ci,
    /// Continuous deployment workflow.
    Cd,
}

impl PipelineKind {
    /// Returns the suite identity.
    const fn header(self) -> &'static SuiteHeader {
        match self {
            Self::Ci => &CI_HEADER,
            Self::Cd => &CD_HEADER,
        }
    }

    /// Returns the declared checks.
    const fn cases(self) -> &'static [CheckCase<Workflow>] {
        match self {
            Self::Ci => CI_CASES,
            Self::Cd => CD_CASES,
        }
    }
}

/// CI or CD workflow suite.
pub struct PipelineSuite {
    /// Workflow checked by this suite.
    kind: PipelineKind,
    /// Resolved workflow path.
    path: PathBuf,
    /// Read limit.
    max_bytes: usize,
    /// Fixture supplying region and project.
    fixture: Fixture,
    /// Pipeline expectations.
    expectations: PipelineExpectations,
}

impl PipelineSuite {
    /// Creates the suite for the layout's workflow of the given kind.
    #[must_use]
    pub fn new(
        kind: PipelineKind,
        layout: &ArtifactLayout,
        fixture: Fixture,
        expectations: PipelineExpectations,
    ) -> Self {
        let relative = match kind {
            PipelineKind::Ci => &layout.ci_workflow,
            PipelineKind::Cd => &layout.cd_workflow,
        };
        Self {
            kind,
            path: layout.resolve(relative),
            max_bytes: layout.max_bytes,
            fixture,
            expectations,
        }
    }
}

/// Returns the static descriptor of the given pipeline suite.
#[must_use]
pub fn descriptor(kind: PipelineKind) -> SuiteDescriptor {
    describe_cases(kind.header(), kind.cases())
}

impl CheckSuite for PipelineSuite {
    fn descriptor(&self) -> SuiteDescriptor {
        descriptor(self.kind)
    }

    fn run(&self, filter: &CheckFilter, sink: &dyn CheckEventSink) -> SuiteReport {
        let subject = Workflow {
            document: load_yaml(self.path.clone(), self.max_bytes),
            label: match self.kind {
                PipelineKind::Ci => "ci.yml",
                PipelineKind::Cd => "cd.yml",
            },
            fixture: self.fixture.clone(),
            expectations: self.expectations.clone(),
        };
        run_cases(self.kind.header(), self.kind.cases(), &subject, filter, sink)
    }
}

/// Loaded workflow document.
struct Workflow {
    /// Parsed YAML.
    document: Artifact<Value>,
    /// File label used in messages.
    label: &'static str,
    /// Fixture values.
    fixture: Fixture,
    /// Pipeline expectations.
    expectations: PipelineExpectations,
}

impl Workflow {
    /// Returns the document or fails with "artifact unavailable".
    fn document(&self) -> Result<&Value, CheckFailure> {
        self.document.content()
    }

    /// Returns the named job.
    fn job(&self, name: &str) -> Result<&Value, CheckFailure> {
        self.document()?
            .get("jobs")
            .and_then(|jobs| jobs.get(name))
            .ok_or_else(|| assertion(format!("{} jobs must contain `{name}`", self.label)))
    }

    /// Returns the trigger map.
    fn triggers(&self) -> Result<&Value, CheckFailure> {
        let document = self.document()?;
        document
            .get("on")
            .or_else(|| document.get(Value::Bool(true)))
            .ok_or_else(|| assertion(format!("{} must declare triggers under `on`", self.label)))
    }
}

// ============================================================================
// SECTION: YAML Helpers
// ============================================================================

/// Builds an assertion failure.
const fn assertion(message: String) -> CheckFailure {
    CheckFailure::Assertion(message)
}

/// Iterates over a job's steps.
fn steps(job: &Value) -> impl Iterator<Item = &Value> {
    job.get("steps").and_then(Value::as_sequence).into_iter().flatten()
}

/// Returns a step's `name`, if it is a string.
fn step_name(step: &Value) -> Option<&str> {
    step.get("name").and_then(Value::as_str)
}

/// Returns the first step whose name equals `name`.
fn step_named<'a>(job: &'a Value, job_name: &str, name: &str) -> Result<&'a Value, CheckFailure> {
    steps(job)
        .find(|step| step_name(step) == Some(name))
        .ok_or_else(|| assertion(format!("job `{job_name}` must have a step named `{name}`")))
}

/// Returns the first step whose lowercased name contains `fragment`.
fn step_mentioning<'a>(
    job: &'a Value,
    job_name: &str,
    fragment: &str,
) -> Result<&'a Value, CheckFailure> {
    steps(job)
        .find(|step| step_name(step).is_some_and(|name| name.to_lowercase().contains(fragment)))
        .ok_or_else(|| assertion(format!("job `{job_name}` must have a `{fragment}` step")))
}

/// Returns a string field of `value` reached by `path`.
fn string_at<'a>(value: &'a Value, path: &[&str], what: &str) -> Result<&'a str, CheckFailure> {
    let mut current = value;
    for key in path {
        current = current
            .get(*key)
            .ok_or_else(|| assertion(format!("{what} must set `{}`", path.join("."))))?;
    }
    current
        .as_str()
        .ok_or_else(|| assertion(format!("{what} `{}` must be a string", path.join("."))))
}

/// Returns true when a branch list (or single branch) contains `branch`.
///
/// A single-string `branches` must equal `branch`; a substring such as
/// `main` inside `maintenance` does not count.
fn branches_contain(branches: &Value, branch: &str) -> bool {
    match branches {
        Value::Sequence(items) => items.iter().any(|item| item.as_str() == Some(branch)),
        Value::String(single) => single == branch,
        _ => false,
    }
}

/// Requires `push.branches` to contain every branch.
fn ensure_push_branches(triggers: &Value, branches: &[String], label: &str) -> CheckResult {
    let push = triggers
        .get("push")
        .ok_or_else(|| assertion(format!("{label} must trigger on `push`")))?;
    let configured = push
        .get("branches")
        .ok_or_else(|| assertion(format!("{label} push trigger must list branches")))?;
    for branch in branches {
        ensure(
            branches_contain(configured, branch),
            format!("{label} must trigger on push to `{branch}`"),
        )?;
    }
    Ok(())
}

/// Requires a named job to depend on exactly `dependency`.
fn ensure_needs(workflow: &Workflow, job_name: &str, dependency: &str) -> CheckResult {
    let job = workflow.job(job_name)?;
    let needs = string_at(job, &["needs"], &format!("job `{job_name}`"))?;
    ensure_eq(needs, dependency, &format!("job `{job_name}` needs"))
}

// ============================================================================
// SECTION: CI Checks
// ============================================================================

/// Declared CI checks in report order.
const CI_CASES: &[CheckCase<Workflow>] = &[
    CheckCase {
        id: "file_exists",
        description: "CI workflow exists and parses",
        run: file_exists,
    },
    CheckCase {
        id: "name",
        description: "CI workflow is named CI Pipeline",
        run: ci_name,
    },
    CheckCase {
        id: "triggers",
        description: "CI runs on push to the CI branches and on pull requests",
        run: ci_triggers,
    },
    CheckCase {
        id: "lint_and_test_job",
        description: "lint-and-test job exists",
        run: lint_and_test_job,
    },
    CheckCase {
        id: "python_version",
        description: "Python setup pins the expected version",
        run: python_version,
    },
    CheckCase {
        id: "uv_installation",
        description: "uv is installed with the official installer",
        run: uv_installation,
    },
    CheckCase {
        id: "dependencies_installation",
        description: "package and dev tools are installed",
        run: dependencies_installation,
    },
    CheckCase {
        id: "black_step",
        description: "black checks src/ and tests/",
        run: black_step,
    },
    CheckCase {
        id: "ruff_step",
        description: "ruff checks src/ and tests/",
        run: ruff_step,
    },
    CheckCase {
        id: "mypy_step",
        description: "mypy checks src/",
        run: mypy_step,
    },
    CheckCase {
        id: "pytest_step",
        description: "pytest runs verbosely over tests/",
        run: pytest_step,
    },
    CheckCase {
        id: "security_scan_job",
        description: "security-scan job exists",
        run: security_scan_job,
    },
];

/// Workflow loaded.
fn file_exists(subject: &Workflow) -> CheckResult {
    subject.document.require_loaded()
}

/// Workflow name.
fn ci_name(subject: &Workflow) -> CheckResult {
    let name = string_at(subject.document()?, &["name"], subject.label)?;
    ensure_eq(name, "CI Pipeline", "ci.yml name")
}

/// Push branches and pull requests.
fn ci_triggers(subject: &Workflow) -> CheckResult {
    let triggers = subject.triggers()?;
    ensure_push_branches(triggers, &subject.expectations.ci_branches, subject.label)?;
    ensure(triggers.get("pull_request").is_some(), "ci.yml must trigger on `pull_request`")
}

/// Lint job present.
fn lint_and_test_job(subject: &Workflow) -> CheckResult {
    subject.job(LINT_AND_TEST_JOB).map(|_| ())
}

/// `actions/setup-python` version.
fn python_version(subject: &Workflow) -> CheckResult {
    let job = subject.job(LINT_AND_TEST_JOB)?;
    let step = step_named(job, LINT_AND_TEST_JOB, "Set up Python")?;
    let version = string_at(step, &["with", "python-version"], "step `Set up Python`")?;
    ensure_eq(version, subject.expectations.python_version.as_str(), "python-version")
}

/// uv installer.
fn uv_installation(subject: &Workflow) -> CheckResult {
    let job = subject.job(LINT_AND_TEST_JOB)?;
    let step = step_named(job, LINT_AND_TEST_JOB, "Install uv")?;
    let run = string_at(step, &["run"], "step `Install uv`")?;
    ensure_contains(run, "curl -LsSf https://astral.sh/uv/install.sh", "step `Install uv`")
}

/// Package and tool installation.
fn dependencies_installation(subject: &Workflow) -> CheckResult {
    let job = subject.job(LINT_AND_TEST_JOB)?;
    let step = step_named(job, LINT_AND_TEST_JOB, "Install dependencies")?;
    let run = string_at(step, &["run"], "step `Install dependencies`")?;
    ensure_contains_all(
        run,
        &["uv pip install --system -e .", "pytest", "pytest-asyncio", "black", "ruff", "mypy"],
        "step `Install dependencies`",
    )
}

/// Runs the lint step matching `fragment` and checks its command.
fn lint_step(subject: &Workflow, fragment: &str, required: &[&str]) -> CheckResult {
    let job = subject.job(LINT_AND_TEST_JOB)?;
    let step = step_mentioning(job, LINT_AND_TEST_JOB, fragment)?;
    let what = format!("`{fragment}` step");
    let run = string_at(step, &["run"], &what)?;
    ensure_contains_all(run, required, &what)
}

/// black in check mode.
fn black_step(subject: &Workflow) -> CheckResult {
    lint_step(subject, "black", &["black --check", "src/", "tests/"])
}

/// ruff check.
fn ruff_step(subject: &Workflow) -> CheckResult {
    lint_step(subject, "ruff", &["ruff check", "src/", "tests/"])
}

/// mypy over sources.
fn mypy_step(subject: &Workflow) -> CheckResult {
    lint_step(subject, "mypy", &["mypy src/"])
}

/// pytest invocation.
fn pytest_step(subject: &Workflow) -> CheckResult {
    let job = subject.job(LINT_AND_TEST_JOB)?;
    let step = step_named(job, LINT_AND_TEST_JOB, "Run tests")?;
    let run = string_at(step, &["run"], "step `Run tests`")?;
    ensure_contains(run, "pytest tests/ -v", "step `Run tests`")
}

/// Security job present.
fn security_scan_job(subject: &Workflow) -> CheckResult {
    subject.job("security-scan").map(|_| ())
}

// ============================================================================
// SECTION: CD Checks
// ============================================================================

/// Declared CD checks in report order.
const CD_CASES: &[CheckCase<Workflow>] = &[
    CheckCase {
        id: "file_exists",
        description: "CD workflow exists and parses",
        run: file_exists,
    },
    CheckCase {
        id: "name",
        description: "CD workflow is named CD Pipeline",
        run: cd_name,
    },
    CheckCase {
        id: "triggers",
        description: "CD runs on push to the CD branches and manually",
        run: cd_triggers,
    },
    CheckCase {
        id: "environment_variables",
        description: "workflow env pins region and ECR repository",
        run: environment_variables,
    },
    CheckCase {
        id: "deploy_infrastructure_job",
        description: "deploy-infrastructure job exists",
        run: deploy_infrastructure_job,
    },
    CheckCase {
        id: "deploy_infrastructure_permissions",
        description: "deploy-infrastructure can request OIDC tokens and read contents",
        run: deploy_infrastructure_permissions,
    },
    CheckCase {
        id: "aws_credentials_configuration",
        description: "AWS credentials come from the role secret and region env",
        run: aws_credentials_configuration,
    },
    CheckCase {
        id: "terraform_setup",
        description: "Terraform is set up at the expected version",
        run: terraform_setup,
    },
    CheckCase {
        id: "terraform_init",
        description: "terraform init runs in the environment directory",
        run: terraform_init,
    },
    CheckCase {
        id: "terraform_plan",
        description: "terraform plan writes tfplan",
        run: terraform_plan,
    },
    CheckCase {
        id: "terraform_apply",
        description: "terraform apply auto-approves tfplan",
        run: terraform_apply,
    },
    CheckCase {
        id: "job_dependencies",
        description: "deployment jobs run in order",
        run: job_dependencies,
    },
    CheckCase {
        id: "post_deployment_tests_job",
        description: "post-deployment tests run after Lambda deployment with AWS credentials",
        run: post_deployment_tests_job,
    },
];

/// Workflow name.
fn cd_name(subject: &Workflow) -> CheckResult {
    let name = string_at(subject.document()?, &["name"], subject.label)?;
    ensure_eq(name, "CD Pipeline", "cd.yml name")
}

/// Push branches and manual dispatch.
fn cd_triggers(subject: &Workflow) -> CheckResult {
    let triggers = subject.triggers()?;
    ensure_push_branches(triggers, &subject.expectations.cd_branches, subject.label)?;
    ensure(
        triggers.get("workflow_dispatch").is_some(),
        "cd.yml must trigger on `workflow_dispatch`",
    )
}

/// Workflow-level env.
fn environment_variables(subject: &Workflow) -> CheckResult {
    let document = subject.document()?;
    let region = string_at(document, &["env", "AWS_REGION"], subject.label)?;
    ensure_eq(region, subject.fixture.region.as_str(), "env.AWS_REGION")?;
    let repository = string_at(document, &["env", "ECR_REPOSITORY"], subject.label)?;
    ensure_eq(repository, subject.fixture.project.as_str(), "env.ECR_REPOSITORY")
}

/// Infrastructure job present.
fn deploy_infrastructure_job(subject: &Workflow) -> CheckResult {
    subject.job(DEPLOY_INFRASTRUCTURE_JOB).map(|_| ())
}

/// OIDC permissions.
fn deploy_infrastructure_permissions(subject: &Workflow) -> CheckResult {
    let job = subject.job(DEPLOY_INFRASTRUCTURE_JOB)?;
    let what = "job `deploy-infrastructure`";
    let id_token = string_at(job, &["permissions", "id-token"], what)?;
    ensure_eq(id_token, "write", "permissions.id-token")?;
    let contents = string_at(job, &["permissions", "contents"], what)?;
    ensure_eq(contents, "read", "permissions.contents")
}

/// Credentials action inputs.
fn aws_credentials_configuration(subject: &Workflow) -> CheckResult {
    let job = subject.job(DEPLOY_INFRASTRUCTURE_JOB)?;
    let step = step_named(job, DEPLOY_INFRASTRUCTURE_JOB, AWS_CREDENTIALS_STEP)?;
    let what = "step `Configure AWS credentials`";
    let uses = string_at(step, &["uses"], what)?;
    ensure_eq(uses, "aws-actions/configure-aws-credentials@v4", "credentials action")?;
    let role = string_at(step, &["with", "role-to-assume"], what)?;
    ensure_contains(role, "${{ secrets.AWS_ROLE_ARN }}", "role-to-assume")?;
    let region = string_at(step, &["with", "aws-region"], what)?;
    ensure_contains(region, "${{ env.AWS_REGION }}", "aws-region")
}

/// Terraform setup action.
fn terraform_setup(subject: &Workflow) -> CheckResult {
    let job = subject.job(DEPLOY_INFRASTRUCTURE_JOB)?;
    let step = step_named(job, DEPLOY_INFRASTRUCTURE_JOB, "Setup Terraform")?;
    let what = "step `Setup Terraform`";
    let uses = string_at(step, &["uses"], what)?;
    ensure_eq(uses, "hashicorp/setup-terraform@v3", "Terraform setup action")?;
    let version = string_at(step, &["with", "terraform_version"], what)?;
    ensure_contains(version, &subject.expectations.terraform_version, "terraform_version")
}

/// Returns a Terraform step's `run` after checking its working directory.
fn terraform_step<'a>(subject: &'a Workflow, name: &str) -> Result<&'a str, CheckFailure> {
    let job = subject.job(DEPLOY_INFRASTRUCTURE_JOB)?;
    let step = step_named(job, DEPLOY_INFRASTRUCTURE_JOB, name)?;
    let what = format!("step `{name}`");
    let directory = string_at(step, &["working-directory"], &what)?;
    ensure_eq(
        directory,
        subject.expectations.terraform_working_directory.as_str(),
        &format!("{what} working-directory"),
    )?;
    string_at(step, &["run"], &what)
}

/// `terraform init`, exactly.
fn terraform_init(subject: &Workflow) -> CheckResult {
    let run = terraform_step(subject, "Terraform Init")?;
    ensure_eq(run, "terraform init", "step `Terraform Init` run")
}

/// `terraform plan -out=tfplan`.
fn terraform_plan(subject: &Workflow) -> CheckResult {
    let run = terraform_step(subject, "Terraform Plan")?;
    ensure_contains_all(run, &["terraform plan", "-out=tfplan"], "step `Terraform Plan`")
}

/// `terraform apply -auto-approve tfplan`.
fn terraform_apply(subject: &Workflow) -> CheckResult {
    let run = terraform_step(subject, "Terraform Apply")?;
    ensure_contains_all(
        run,
        &["terraform apply", "-auto-approve", "tfplan"],
        "step `Terraform Apply`",
    )
}

/// Job ordering.
fn job_dependencies(subject: &Workflow) -> CheckResult {
    ensure_needs(subject, DEPLOY_INFRASTRUCTURE_JOB, "build-and-push")?;
    ensure_needs(subject, "deploy-lambda-functions", DEPLOY_INFRASTRUCTURE_JOB)
}

/// Post-deployment test job.
fn post_deployment_tests_job(subject: &Workflow) -> CheckResult {
    ensure_needs(subject, "post-deployment-tests", "deploy-lambda-functions")?;
    let job = subject.job("post-deployment-tests")?;
    step_named(job, "post-deployment-tests", AWS_CREDENTIALS_STEP).map(|_| ())
}
