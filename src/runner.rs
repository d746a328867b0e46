//! External command execution with captured output
//!
//! Commands are built as structured argument vectors, never interpolated
//! shell strings, so paths with spaces or shell metacharacters cannot break
//! quoting. The working directory is always passed explicitly; the process's
//! ambient current directory is never changed.
//!
//! Execution is synchronous and has no timeout: a hanging child blocks the
//! whole tool. That is an accepted limitation of a one-shot setup pass.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::error::{Result, SetupError};
use crate::ui;

/// What a step failure means for the rest of the sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Hard failure: halt the remaining steps
    Abort,
    /// Soft failure: log and continue with the next step
    Continue,
}

/// A command line as program path plus explicit argument vector
#[derive(Debug, Clone)]
pub struct Invocation {
    program: PathBuf,
    args: Vec<OsString>,
}

impl Invocation {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    #[must_use]
    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }
}

/// Outcome of one external command, produced once per invocation
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    pub succeeded: bool,
    pub stdout: String,
    pub stderr: String,
    pub exit_status: i32,
}

impl ExecutionResult {
    /// Error text worth showing the operator: stderr when present,
    /// stdout otherwise (pip writes some failures to stdout only)
    pub fn error_text(&self) -> &str {
        if self.stderr.trim().is_empty() {
            &self.stdout
        } else {
            &self.stderr
        }
    }
}

/// Runs external commands from a fixed working directory
pub struct CommandRunner {
    working_dir: PathBuf,
    verbose: bool,
}

impl CommandRunner {
    pub fn new(working_dir: &Path, verbose: bool) -> Self {
        Self {
            working_dir: working_dir.to_path_buf(),
            verbose,
        }
    }

    /// Run a command to completion, draining both output streams.
    ///
    /// Never panics and never returns an error: a command that cannot be
    /// spawned at all is reported as a failed `ExecutionResult` with the
    /// spawn error in stderr. The description is printed before execution.
    pub fn run(&self, invocation: &Invocation, description: &str) -> ExecutionResult {
        ui::stage(&format!("{description}..."));

        let spinner = spawn_spinner(description);
        let output = Command::new(&invocation.program)
            .args(&invocation.args)
            .current_dir(&self.working_dir)
            .output();
        spinner.finish_and_clear();

        match output {
            Ok(output) => ExecutionResult {
                succeeded: output.status.success(),
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                exit_status: output.status.code().unwrap_or(-1),
            },
            Err(e) => ExecutionResult {
                succeeded: false,
                stdout: String::new(),
                stderr: format!(
                    "failed to start {}: {e}",
                    invocation.program.display()
                ),
                exit_status: -1,
            },
        }
    }

    /// Run a command and apply the caller's failure policy.
    ///
    /// `Abort` turns a failed result into a hard error the orchestrator
    /// propagates; `Continue` prints the captured error text and hands the
    /// failed result back so the caller can react (e.g. trigger a fallback
    /// download). No failure path is silent.
    pub fn run_checked(
        &self,
        invocation: &Invocation,
        description: &str,
        policy: FailurePolicy,
    ) -> Result<ExecutionResult> {
        let result = self.run(invocation, description);

        if result.succeeded {
            if self.verbose && !result.stdout.trim().is_empty() {
                ui::child_output(&result.stdout);
            }
        } else {
            match policy {
                FailurePolicy::Abort => {
                    if !result.error_text().trim().is_empty() {
                        ui::child_output(result.error_text());
                    }
                    return Err(SetupError::step_failed(description, result.error_text()));
                }
                FailurePolicy::Continue => {
                    ui::warn(&format!("{description} failed, continuing"));
                    if !result.error_text().trim().is_empty() {
                        ui::child_output(result.error_text());
                    }
                }
            }
        }

        Ok(result)
    }
}

fn spawn_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn runner(dir: &Path) -> CommandRunner {
        CommandRunner::new(dir, false)
    }

    #[test]
    fn test_run_captures_missing_program_as_failure() {
        let temp = TempDir::new().unwrap();
        let invocation = Invocation::new("definitely-not-a-real-program-4471");
        let result = runner(temp.path()).run(&invocation, "Probing nothing");

        assert!(!result.succeeded);
        assert_eq!(result.exit_status, -1);
        assert!(result.stderr.contains("failed to start"));
    }

    #[test]
    fn test_run_checked_abort_policy_returns_error() {
        let temp = TempDir::new().unwrap();
        let invocation = Invocation::new("definitely-not-a-real-program-4471");
        let result = runner(temp.path()).run_checked(
            &invocation,
            "Installing requirements",
            FailurePolicy::Abort,
        );

        assert!(result.is_err());
        assert_eq!(
            result.unwrap_err().to_string(),
            "Installing requirements failed"
        );
    }

    #[test]
    fn test_run_checked_continue_policy_returns_failed_result() {
        let temp = TempDir::new().unwrap();
        let invocation = Invocation::new("definitely-not-a-real-program-4471");
        let result = runner(temp.path())
            .run_checked(&invocation, "Checking model", FailurePolicy::Continue)
            .unwrap();

        assert!(!result.succeeded);
    }

    #[test]
    #[cfg(unix)]
    fn test_run_tolerates_silent_child() {
        let temp = TempDir::new().unwrap();
        let invocation = Invocation::new("true");
        let result = runner(temp.path()).run(&invocation, "Running true");

        assert!(result.succeeded);
        assert_eq!(result.exit_status, 0);
        assert!(result.stdout.is_empty());
        assert!(result.stderr.is_empty());
    }

    #[test]
    #[cfg(unix)]
    fn test_run_uses_explicit_working_directory() {
        let temp = TempDir::new().unwrap();
        let invocation = Invocation::new("pwd");
        let result = runner(temp.path()).run(&invocation, "Printing working directory");

        assert!(result.succeeded);
        let reported = std::fs::canonicalize(result.stdout.trim()).unwrap();
        let expected = std::fs::canonicalize(temp.path()).unwrap();
        assert_eq!(reported, expected);
    }

    #[test]
    #[cfg(unix)]
    fn test_arguments_with_spaces_survive() {
        let temp = TempDir::new().unwrap();
        let invocation = Invocation::new("echo").arg("two words");
        let result = runner(temp.path()).run(&invocation, "Echoing");

        assert!(result.succeeded);
        assert_eq!(result.stdout.trim(), "two words");
    }
}
