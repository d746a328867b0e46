//! Error types and handling for memsetup
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! Only hard failures propagate as errors: a provisioning step nothing
//! downstream can survive without (environment creation, dependency install).
//! Soft failures are printed at the point they occur and the sequence
//! continues, so they never appear in this enum.

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for memsetup operations
#[derive(Error, Diagnostic, Debug)]
pub enum SetupError {
    #[error("{description} failed")]
    #[diagnostic(
        code(memsetup::step::failed),
        help("Fix the underlying problem and re-run memsetup; completed steps are skipped")
    )]
    StepFailed {
        description: String,
        /// Captured error text from the child, already shown to the operator
        detail: Option<String>,
    },

    #[error("Project root not found: {path}")]
    #[diagnostic(
        code(memsetup::project::not_found),
        help("Pass the memory system checkout with --project-root")
    )]
    ProjectRootNotFound { path: String },

    #[error("Could not determine home directory")]
    #[diagnostic(
        code(memsetup::home::not_found),
        help("Set MEMSETUP_HOME to the directory that should receive the integration")
    )]
    HomeDirNotFound,

    #[error("Failed to read {path}: {reason}")]
    #[diagnostic(code(memsetup::fs::read_failed))]
    FileReadFailed { path: String, reason: String },

    #[error("Failed to write {path}: {reason}")]
    #[diagnostic(code(memsetup::fs::write_failed))]
    FileWriteFailed { path: String, reason: String },

    #[error("Failed to read confirmation: {reason}")]
    #[diagnostic(
        code(memsetup::prompt::failed),
        help("Re-run with --yes to skip interactive prompts")
    )]
    PromptFailed { reason: String },
}

/// Result type alias for memsetup operations
pub type Result<T> = std::result::Result<T, SetupError>;

impl SetupError {
    /// Hard failure for an aborting provisioning step, carrying the child's
    /// captured error text when there is any.
    pub fn step_failed(description: &str, stderr: &str) -> Self {
        let detail = if stderr.trim().is_empty() {
            None
        } else {
            Some(stderr.trim().to_string())
        };
        SetupError::StepFailed {
            description: description.to_string(),
            detail,
        }
    }

    pub fn read_failed(path: &std::path::Path, err: &std::io::Error) -> Self {
        SetupError::FileReadFailed {
            path: path.display().to_string(),
            reason: err.to_string(),
        }
    }

    pub fn write_failed(path: &std::path::Path, err: &std::io::Error) -> Self {
        SetupError::FileWriteFailed {
            path: path.display().to_string(),
            reason: err.to_string(),
        }
    }
}
