//! The six-stage provisioning sequence
//!
//! Stages run strictly in order, each gated by its own idempotency
//! pre-check. Environment creation and dependency installation are hard
//! failures (nothing downstream can succeed without them); everything else
//! is soft and the sequence keeps going. There is no rollback: re-running
//! the tool is the recovery path, because every stage re-checks its own
//! condition before acting.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::installer::{IntegrationInstaller, IntegrationPaths, LAUNCHER_NAME};
use crate::patcher::Confirmation;
use crate::platform::{self, PlatformKind, PlatformPaths};
use crate::runner::{CommandRunner, FailurePolicy, Invocation};
use crate::ui;

/// spaCy model the search pipeline depends on
const MODEL_NAME: &str = "en_core_web_sm";

/// Index storage directory, relative to the project root
const INDEX_DIR: &str = "chroma_db";

pub struct Orchestrator<'a> {
    project_root: PathBuf,
    platform: PlatformPaths,
    runner: CommandRunner,
    confirmation: &'a dyn Confirmation,
}

impl<'a> Orchestrator<'a> {
    pub fn new(
        project_root: &Path,
        kind: PlatformKind,
        verbose: bool,
        confirmation: &'a dyn Confirmation,
    ) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            platform: PlatformPaths::resolve(kind, project_root),
            runner: CommandRunner::new(project_root, verbose),
            confirmation,
        }
    }

    /// Run the full provisioning pass front to back
    pub fn run(&self) -> Result<()> {
        ui::banner("Claude Code Vector Memory - Setup");

        self.create_environment()?;
        self.install_dependencies()?;
        self.ensure_model();
        self.build_index();
        self.install_integration();
        self.health_check();

        self.print_next_steps();
        Ok(())
    }

    /// Stage 1: create the virtual environment, unless it already exists
    fn create_environment(&self) -> Result<()> {
        if self.platform.env_root.exists() {
            ui::ok("Virtual environment already exists");
            return Ok(());
        }

        let bootstrap = platform::bootstrap_python(self.platform.kind);
        let invocation = Invocation::new(bootstrap).arg("-m").arg("venv").arg("venv");
        self.runner.run_checked(
            &invocation,
            "Creating virtual environment",
            FailurePolicy::Abort,
        )?;
        ui::ok("Virtual environment created");
        Ok(())
    }

    /// Stage 2: upgrade pip, then bulk-install from the manifest
    fn install_dependencies(&self) -> Result<()> {
        let pip = self.platform.executable("pip");

        let upgrade = Invocation::new(&pip)
            .arg("install")
            .arg("--upgrade")
            .arg("pip");
        self.runner
            .run_checked(&upgrade, "Upgrading pip", FailurePolicy::Abort)?;

        let install = Invocation::new(&pip)
            .arg("install")
            .arg("-r")
            .arg("requirements.txt");
        self.runner
            .run_checked(&install, "Installing requirements", FailurePolicy::Abort)?;

        ui::ok("Dependencies installed");
        Ok(())
    }

    /// Stage 3: probe for the spaCy model, downloading it only on a failed
    /// probe. A failed download leaves the system degraded but usable.
    fn ensure_model(&self) {
        let python = self.platform.executable("python");

        let probe = Invocation::new(&python)
            .arg("-c")
            .arg(format!("import spacy; spacy.load('{MODEL_NAME}')"));
        let probed = self.runner.run(&probe, "Checking spaCy model");

        if probed.succeeded {
            ui::ok("spaCy model already installed");
            return;
        }

        let download = Invocation::new(&python)
            .arg("-m")
            .arg("spacy")
            .arg("download")
            .arg(MODEL_NAME);
        match self
            .runner
            .run_checked(&download, "Downloading spaCy model", FailurePolicy::Continue)
        {
            Ok(result) if result.succeeded => ui::ok("spaCy model downloaded"),
            _ => {}
        }
    }

    /// Stage 4: ensure the index directory exists and run the index builder
    fn build_index(&self) {
        let index_dir = self.project_root.join(INDEX_DIR);
        if index_dir.exists() {
            ui::ok("Index directory already exists");
        } else {
            match fs::create_dir_all(&index_dir) {
                Ok(()) => ui::ok("Index directory created"),
                Err(e) => {
                    ui::warn(&format!("Could not create {INDEX_DIR}: {e}"));
                    return;
                }
            }
        }

        let builder = Invocation::new(self.platform.executable("python"))
            .arg(self.project_root.join("scripts").join("index_summaries.py"));
        match self
            .runner
            .run_checked(&builder, "Building initial index", FailurePolicy::Continue)
        {
            Ok(result) if result.succeeded => ui::ok("Initial index built"),
            _ => ui::warn("You can rebuild the index later by re-running setup"),
        }
    }

    /// Stage 5: wire up the Claude Code integration; failures are soft
    fn install_integration(&self) {
        ui::stage("Setting up Claude Code integration...");

        let paths = match IntegrationPaths::resolve() {
            Ok(paths) => paths,
            Err(e) => {
                ui::warn(&format!("Integration install skipped: {e}"));
                return;
            }
        };

        let installer = IntegrationInstaller::new(&self.project_root, &self.platform, paths);
        if let Err(e) = installer.install(self.confirmation) {
            ui::warn(&format!("Integration install failed: {e}"));
        }
    }

    /// Stage 6: run the health checker and surface its output verbatim,
    /// whatever the outcome
    fn health_check(&self) {
        let checker = Invocation::new(self.platform.executable("python"))
            .arg(self.project_root.join("scripts").join("health_check.py"));
        let result = self.runner.run(&checker, "Running health check");

        if !result.stdout.trim().is_empty() {
            ui::child_output(&result.stdout);
        }
        if !result.stderr.trim().is_empty() {
            ui::child_output(&result.stderr);
        }
        if !result.succeeded {
            ui::warn("Health check reported problems");
        }
    }

    fn print_next_steps(&self) {
        println!();
        ui::ok("Setup complete!");
        ui::stage("Next steps:");
        println!("1. Activate the virtual environment:");
        println!("   {}", self.platform.activate_hint());
        println!("2. Search your memories:");
        println!("   python search.py 'your query'");
        println!("3. Global search:");
        println!(
            "   {} 'your query'",
            self.platform.launcher_file_name(LAUNCHER_NAME)
        );
        if self.platform.kind == PlatformKind::Windows {
            println!("   (Add %USERPROFILE%\\agents to PATH to use it from anywhere)");
        }
        println!("4. In Claude Code: /system:semantic-memory-search your query");
    }
}
