//! Claude Code integration install
//!
//! Copies the command payload into `~/.claude/commands/system`, merges the
//! memory-integration section into `~/.claude/CLAUDE.md`, and drops a global
//! launcher script into `~/agents`. All side effects are filesystem-only and
//! overwrite-on-conflict, so re-running converges to the same state.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, SetupError};
use crate::patcher::{self, Confirmation, MEMORY_SECTION_MARKER, PatchOutcome};
use crate::platform::{PlatformKind, PlatformPaths};
use crate::ui;

/// Base name of the global launcher script
pub const LAUNCHER_NAME: &str = "claude-memory-search";

/// Entry point the launcher forwards its arguments to
const SEARCH_ENTRY_POINT: &str = "search.py";

/// Destination paths under the operator's home directory
#[derive(Debug, Clone)]
pub struct IntegrationPaths {
    /// `~/.claude/commands/system`
    pub commands_dir: PathBuf,
    /// `~/.claude/CLAUDE.md`
    pub config_file: PathBuf,
    /// `~/agents`
    pub launcher_dir: PathBuf,
}

impl IntegrationPaths {
    /// Resolve from the real home directory, honoring the `MEMSETUP_HOME`
    /// override so tests never touch the operator's home
    pub fn resolve() -> Result<Self> {
        let home = match std::env::var_os("MEMSETUP_HOME") {
            Some(dir) => PathBuf::from(dir),
            None => dirs::home_dir().ok_or(SetupError::HomeDirNotFound)?,
        };
        Ok(Self::under(&home))
    }

    pub fn under(home: &Path) -> Self {
        let claude_dir = home.join(".claude");
        Self {
            commands_dir: claude_dir.join("commands").join("system"),
            config_file: claude_dir.join("CLAUDE.md"),
            launcher_dir: home.join("agents"),
        }
    }
}

/// Installs the integration payload for one project checkout
pub struct IntegrationInstaller<'a> {
    project_root: &'a Path,
    platform: &'a PlatformPaths,
    paths: IntegrationPaths,
}

impl<'a> IntegrationInstaller<'a> {
    pub fn new(
        project_root: &'a Path,
        platform: &'a PlatformPaths,
        paths: IntegrationPaths,
    ) -> Self {
        Self {
            project_root,
            platform,
            paths,
        }
    }

    /// Copy command files, patch the memory configuration, and generate the
    /// launcher script
    pub fn install(&self, confirmation: &dyn Confirmation) -> Result<()> {
        self.copy_command_files()?;
        self.patch_memory_config(confirmation)?;
        self.write_launcher()?;
        Ok(())
    }

    fn payload_dir(&self) -> PathBuf {
        self.project_root.join("claude-integration").join("commands")
    }

    fn snippet_file(&self) -> PathBuf {
        self.project_root
            .join("claude-integration")
            .join("CLAUDE.md-snippet.md")
    }

    fn copy_command_files(&self) -> Result<()> {
        fs::create_dir_all(&self.paths.commands_dir)
            .map_err(|e| SetupError::write_failed(&self.paths.commands_dir, &e))?;

        for source in discover_payload_files(&self.payload_dir())? {
            let file_name = match source.file_name() {
                Some(name) => name.to_os_string(),
                None => continue,
            };
            let target = self.paths.commands_dir.join(&file_name);
            fs::copy(&source, &target).map_err(|e| SetupError::write_failed(&target, &e))?;
            ui::ok(&format!("Copied {}", file_name.to_string_lossy()));
        }

        Ok(())
    }

    fn patch_memory_config(&self, confirmation: &dyn Confirmation) -> Result<()> {
        let outcome = patcher::ensure_section(
            &self.paths.config_file,
            &self.snippet_file(),
            MEMORY_SECTION_MARKER,
            confirmation,
        )?;

        match outcome {
            PatchOutcome::Created => ui::ok("Created CLAUDE.md with Memory Integration"),
            PatchOutcome::AlreadyPresent => {
                ui::ok("Memory Integration already configured in CLAUDE.md");
            }
            PatchOutcome::Appended => ui::ok("Memory Integration added to CLAUDE.md"),
            PatchOutcome::Declined | PatchOutcome::NothingToInstall => {
                ui::warn("Memory Integration not installed");
                println!(
                    "  Add the section manually from {}",
                    self.snippet_file().display()
                );
            }
        }

        Ok(())
    }

    fn write_launcher(&self) -> Result<()> {
        fs::create_dir_all(&self.paths.launcher_dir)
            .map_err(|e| SetupError::write_failed(&self.paths.launcher_dir, &e))?;

        let script_path = self
            .paths
            .launcher_dir
            .join(self.platform.launcher_file_name(LAUNCHER_NAME));
        let content = self.launcher_script();

        fs::write(&script_path, content)
            .map_err(|e| SetupError::write_failed(&script_path, &e))?;
        mark_executable(&script_path, self.platform.kind)?;

        ui::ok(&format!(
            "Global search command created ({})",
            script_path.display()
        ));
        if self.platform.kind == PlatformKind::Windows {
            println!("  Add %USERPROFILE%\\agents to your PATH to use it globally");
        }

        Ok(())
    }

    /// Launcher text: validate at least one argument, then forward everything
    /// to the search entry point using the environment's interpreter
    fn launcher_script(&self) -> String {
        let project = self.project_root.display();
        let python = self.platform.executable("python");
        let python = python.display();

        match self.platform.kind {
            PlatformKind::Windows => format!(
                "@echo off\r\n\
                 if \"%~1\"==\"\" (\r\n\
                 \x20   echo Usage: {LAUNCHER_NAME} \"search query\"\r\n\
                 \x20   echo Example: {LAUNCHER_NAME} \"vue component implementation\"\r\n\
                 \x20   exit /b 1\r\n\
                 )\r\n\
                 \r\n\
                 cd /d \"{project}\"\r\n\
                 \"{python}\" {SEARCH_ENTRY_POINT} %*\r\n"
            ),
            PlatformKind::Posix => format!(
                "#!/bin/bash\n\
                 if [ $# -eq 0 ]; then\n\
                 \x20   echo \"Usage: {LAUNCHER_NAME} <search query>\"\n\
                 \x20   exit 1\n\
                 fi\n\
                 \n\
                 cd \"{project}\" || exit 1\n\
                 exec \"{python}\" {SEARCH_ENTRY_POINT} \"$@\"\n"
            ),
        }
    }
}

/// List the `*.md` payload files, sorted by name.
///
/// Discovery is an explicit directory listing with a deterministic order, so
/// runs are reproducible and tests can stage exactly what gets copied.
pub fn discover_payload_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|e| SetupError::read_failed(dir, &e))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| SetupError::read_failed(dir, &e))?;
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "md") {
            files.push(path);
        }
    }
    files.sort();

    Ok(files)
}

#[cfg(unix)]
fn mark_executable(path: &Path, kind: PlatformKind) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    if kind == PlatformKind::Posix {
        fs::set_permissions(path, fs::Permissions::from_mode(0o755))
            .map_err(|e| SetupError::write_failed(path, &e))?;
    }
    Ok(())
}

#[cfg(not(unix))]
fn mark_executable(_path: &Path, _kind: PlatformKind) -> Result<()> {
    Ok(())
}
