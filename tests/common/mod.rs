//! Common test utilities for memsetup integration tests

use std::path::PathBuf;
use tempfile::TempDir;

/// Marker for the memory-integration section, as written in the snippet
#[allow(dead_code)]
pub const MARKER: &str = "## Memory Integration (MANDATORY)";

/// A staged memory-system checkout plus an isolated fake home directory
#[allow(dead_code)]
pub struct TestWorkspace {
    /// Temporary directory holding everything
    #[allow(dead_code)]
    pub temp: TempDir,
    /// Path to the fake project checkout
    pub project: PathBuf,
    /// Path to the fake home directory (passed as MEMSETUP_HOME)
    pub home: PathBuf,
}

#[allow(dead_code)]
impl TestWorkspace {
    /// Create a workspace with a complete fake project tree
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let project = temp.path().join("project");
        let home = temp.path().join("home");

        let workspace = Self {
            temp,
            project,
            home,
        };

        workspace.write_project_file("requirements.txt", "chromadb\nspacy\n");
        workspace.write_project_file("search.py", "# fake search entry point\n");
        workspace.write_project_file("scripts/index_summaries.py", "# fake index builder\n");
        workspace.write_project_file("scripts/health_check.py", "# fake health checker\n");
        workspace.write_project_file(
            "claude-integration/commands/semantic-memory-search.md",
            "# Semantic memory search command\n",
        );
        workspace.write_project_file(
            "claude-integration/commands/session-startup.md",
            "# Session startup command\n",
        );
        workspace.write_project_file(
            "claude-integration/CLAUDE.md-snippet.md",
            &format!(
                "# Snippet preamble\n\n{MARKER}\n- Search memory before starting work\n\n## Appendix\nextra\n"
            ),
        );
        std::fs::create_dir_all(&workspace.home).expect("Failed to create home directory");

        workspace
    }

    /// Write a file under the project checkout
    pub fn write_project_file(&self, path: &str, content: &str) {
        let file_path = self.project.join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&file_path, content).expect("Failed to write file");
    }

    /// Write a file under the fake home
    pub fn write_home_file(&self, path: &str, content: &str) {
        let file_path = self.home.join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&file_path, content).expect("Failed to write file");
    }

    /// Read a file under the fake home
    pub fn read_home_file(&self, path: &str) -> String {
        std::fs::read_to_string(self.home.join(path)).expect("Failed to read file")
    }

    /// Check whether a path exists under the fake home
    pub fn home_file_exists(&self, path: &str) -> bool {
        self.home.join(path).exists()
    }

    /// Install a fake interpreter script and return its path (unix only)
    #[cfg(unix)]
    pub fn install_fake_python(&self, name: &str, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let bin_dir = self.temp.path().join("fakebin");
        std::fs::create_dir_all(&bin_dir).expect("Failed to create fakebin directory");
        let path = bin_dir.join(name);
        std::fs::write(&path, body).expect("Failed to write fake interpreter");
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
            .expect("Failed to chmod fake interpreter");
        path
    }

    /// Pre-create a fake venv so stage 1 is skipped (unix only)
    #[cfg(unix)]
    pub fn create_fake_venv(&self, pip_body: &str, python_body: &str) {
        use std::os::unix::fs::PermissionsExt;

        let bin_dir = self.project.join("venv").join("bin");
        std::fs::create_dir_all(&bin_dir).expect("Failed to create venv bin");
        for (name, body) in [("pip", pip_body), ("python", python_body)] {
            let path = bin_dir.join(name);
            std::fs::write(&path, body).expect("Failed to write venv script");
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
                .expect("Failed to chmod venv script");
        }
    }
}

/// Build a memsetup command pointed at this workspace
// Temporary fix for deprecated cargo_bin - will be updated when build-dir issues are resolved
#[allow(deprecated, dead_code)]
pub fn memsetup_cmd(workspace: &TestWorkspace) -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::cargo_bin("memsetup").unwrap();
    cmd.arg("--project-root")
        .arg(&workspace.project)
        .arg("--yes")
        .env("MEMSETUP_HOME", &workspace.home);
    cmd
}
