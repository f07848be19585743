// crates/infra-gate-artifacts/src/source.rs
// ============================================================================
// Module: Artifact Sources
// Description: Artifact layout, bounded reads, and load results.
// Purpose: Load repository artifacts fail-closed and expose them to checks.
// Dependencies: infra-gate-core, serde, serde_yaml, thiserror
// ============================================================================

//! ## Overview
//! Every artifact suite reads its files through [`load_text`] or
//! [`load_yaml`]. A load never aborts a suite: the result is kept in an
//! [`Artifact`] so the suite's existence check can report the load error and
//! every other check can fail with "artifact unavailable".
//!
//! Invariants:
//! - Reads are bounded by [`ArtifactLayout::max_bytes`].
//! - Artifacts must be regular UTF-8 files.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::path::PathBuf;

use infra_gate_core::CheckFailure;
use infra_gate_core::CheckResult;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default maximum artifact size in bytes.
pub const DEFAULT_MAX_ARTIFACT_BYTES: usize = 1024 * 1024;
/// Upper bound accepted for [`ArtifactLayout::max_bytes`].
pub const MAX_ARTIFACT_BYTES_LIMIT: usize = 16 * 1024 * 1024;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Artifact loading errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArtifactError {
    /// The artifact path does not exist.
    #[error("{path} does not exist")]
    Missing {
        /// Artifact path.
        path: String,
    },
    /// The artifact path is not a regular file.
    #[error("{path} is not a file")]
    NotAFile {
        /// Artifact path.
        path: String,
    },
    /// The artifact could not be read.
    #[error("unable to read {path}: {message}")]
    Io {
        /// Artifact path.
        path: String,
        /// Underlying error.
        message: String,
    },
    /// The artifact exceeds the size limit.
    #[error("{path} exceeds size limit of {limit} bytes")]
    TooLarge {
        /// Artifact path.
        path: String,
        /// Configured limit.
        limit: usize,
    },
    /// The artifact is not UTF-8.
    #[error("{path} must be utf-8")]
    NotUtf8 {
        /// Artifact path.
        path: String,
    },
    /// The artifact is not valid YAML.
    #[error("{path} is not valid yaml: {message}")]
    Yaml {
        /// Artifact path.
        path: String,
        /// Parser message.
        message: String,
    },
    /// The layout itself is invalid.
    #[error("invalid artifact layout: {0}")]
    InvalidLayout(String),
}

// ============================================================================
// SECTION: Layout
// ============================================================================

/// Location of every artifact relative to a repository root.
///
/// # Invariants
/// - Relative paths are joined onto `root`; absolute paths are used as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ArtifactLayout {
    /// Repository root.
    pub root: PathBuf,
    /// Terraform state bootstrap script.
    pub bootstrap_script: PathBuf,
    /// Directory holding the monitoring module's `variables.tf` and `main.tf`.
    pub monitoring_module: PathBuf,
    /// CI workflow.
    pub ci_workflow: PathBuf,
    /// CD workflow.
    pub cd_workflow: PathBuf,
    /// Project README.
    pub readme: PathBuf,
    /// Maximum size of any single artifact in bytes.
    pub max_bytes: usize,
}

impl Default for ArtifactLayout {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            bootstrap_script: PathBuf::from("infrastructure/bootstrap.sh"),
            monitoring_module: PathBuf::from("infrastructure/modules/monitoring/cloudwatch"),
            ci_workflow: PathBuf::from(".github/workflows/ci.yml"),
            cd_workflow: PathBuf::from(".github/workflows/cd.yml"),
            readme: PathBuf::from("README.md"),
            max_bytes: DEFAULT_MAX_ARTIFACT_BYTES,
        }
    }
}

impl ArtifactLayout {
    /// Returns the default layout anchored at `root`.
    #[must_use]
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    /// Resolves an artifact path against the root.
    #[must_use]
    pub fn resolve(&self, relative: &Path) -> PathBuf {
        self.root.join(relative)
    }

    /// Validates the layout.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactError::InvalidLayout`] for empty paths or an
    /// out-of-range size limit.
    pub fn validate(&self) -> Result<(), ArtifactError> {
        let paths = [
            ("root", &self.root),
            ("bootstrap_script", &self.bootstrap_script),
            ("monitoring_module", &self.monitoring_module),
            ("ci_workflow", &self.ci_workflow),
            ("cd_workflow", &self.cd_workflow),
            ("readme", &self.readme),
        ];
        for (field, path) in paths {
            if path.as_os_str().is_empty() {
                return Err(ArtifactError::InvalidLayout(format!("artifacts.{field} must be set")));
            }
        }
        if self.max_bytes == 0 || self.max_bytes > MAX_ARTIFACT_BYTES_LIMIT {
            return Err(ArtifactError::InvalidLayout(format!(
                "artifacts.max_bytes must be between 1 and {MAX_ARTIFACT_BYTES_LIMIT}"
            )));
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Loaded Artifacts
// ============================================================================

/// Outcome of loading one artifact.
#[derive(Debug, Clone)]
pub struct Artifact<T> {
    /// Resolved path.
    path: PathBuf,
    /// Parsed content or the load error.
    content: Result<T, ArtifactError>,
}

impl<T> Artifact<T> {
    /// Wraps a load result.
    #[must_use]
    pub const fn new(path: PathBuf, content: Result<T, ArtifactError>) -> Self {
        Self {
            path,
            content,
        }
    }

    /// Returns the resolved path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Passes when the artifact loaded.
    ///
    /// # Errors
    ///
    /// Returns [`CheckFailure::Assertion`] carrying the load error.
    pub fn require_loaded(&self) -> CheckResult {
        match &self.content {
            Ok(_) => Ok(()),
            Err(error) => Err(CheckFailure::Assertion(error.to_string())),
        }
    }

    /// Returns the loaded content.
    ///
    /// # Errors
    ///
    /// Returns [`CheckFailure::Assertion`] when the artifact did not load.
    pub fn content(&self) -> Result<&T, CheckFailure> {
        self.content.as_ref().map_err(|_| {
            CheckFailure::Assertion(format!("artifact unavailable: {}", self.path.display()))
        })
    }
}

/// Loads a UTF-8 text artifact.
#[must_use]
pub fn load_text(path: PathBuf, max_bytes: usize) -> Artifact<String> {
    let content = read_text(&path, max_bytes);
    Artifact::new(path, content)
}

/// Loads and parses a YAML artifact.
#[must_use]
pub fn load_yaml(path: PathBuf, max_bytes: usize) -> Artifact<serde_yaml::Value> {
    let content = read_text(&path, max_bytes).and_then(|text| {
        serde_yaml::from_str(&text).map_err(|err| ArtifactError::Yaml {
            path: path.display().to_string(),
            message: err.to_string(),
        })
    });
    Artifact::new(path, content)
}

/// Reads a UTF-8 file while enforcing a maximum byte limit.
///
/// # Errors
///
/// Returns [`ArtifactError`] when the path is missing, not a file, unreadable,
/// too large, or not UTF-8.
pub fn read_text(path: &Path, max_bytes: usize) -> Result<String, ArtifactError> {
    let display = path.display().to_string();
    let metadata = std::fs::metadata(path).map_err(|err| {
        if err.kind() == std::io::ErrorKind::NotFound {
            ArtifactError::Missing {
                path: display.clone(),
            }
        } else {
            ArtifactError::Io {
                path: display.clone(),
                message: err.to_string(),
            }
        }
    })?;
    if !metadata.is_file() {
        return Err(ArtifactError::NotAFile {
            path: display,
        });
    }
    let file = File::open(path).map_err(|err| ArtifactError::Io {
        path: display.clone(),
        message: err.to_string(),
    })?;
    let limit = u64::try_from(max_bytes.saturating_add(1)).map_err(|_| ArtifactError::TooLarge {
        path: display.clone(),
        limit: max_bytes,
    })?;
    let mut buf = Vec::new();
    file.take(limit).read_to_end(&mut buf).map_err(|err| ArtifactError::Io {
        path: display.clone(),
        message: err.to_string(),
    })?;
    if buf.len() > max_bytes {
        return Err(ArtifactError::TooLarge {
            path: display,
            limit: max_bytes,
        });
    }
    String::from_utf8(buf).map_err(|_| ArtifactError::NotUtf8 {
        path: display,
    })
}
