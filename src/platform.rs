//! OS-specific filesystem layout for the provisioned environment
//!
//! Resolution is a pure mapping from the OS identity to a set of paths and
//! script conventions. There are exactly two layouts: Windows (`Scripts`
//! subdirectory, `.bat` launcher) and POSIX (`bin` subdirectory, executable
//! bit). Anything not recognized as Windows gets the POSIX layout; resolution
//! never fails.

use std::path::{Path, PathBuf};

/// Operating system flavor deciding the environment layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformKind {
    Windows,
    Posix,
}

impl PlatformKind {
    /// Detect the layout for the running operating system
    pub fn detect() -> Self {
        Self::from_os_name(std::env::consts::OS)
    }

    /// Map an OS identity string to a layout; unrecognized names fall back
    /// to the POSIX layout
    pub fn from_os_name(name: &str) -> Self {
        if name.eq_ignore_ascii_case("windows") {
            PlatformKind::Windows
        } else {
            PlatformKind::Posix
        }
    }
}

/// OS-specific paths, derived once at startup and read-only afterwards
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    pub kind: PlatformKind,
    /// Root of the isolated Python environment (`<project>/venv`)
    pub env_root: PathBuf,
}

impl PlatformPaths {
    pub fn resolve(kind: PlatformKind, project_root: &Path) -> Self {
        Self {
            kind,
            env_root: project_root.join("venv"),
        }
    }

    /// Subdirectory of the environment holding executables
    pub fn scripts_subdir(&self) -> &'static str {
        match self.kind {
            PlatformKind::Windows => "Scripts",
            PlatformKind::Posix => "bin",
        }
    }

    /// Full path to a named executable inside the environment
    pub fn executable(&self, name: &str) -> PathBuf {
        self.env_root.join(self.scripts_subdir()).join(name)
    }

    /// File name for a generated launcher script
    pub fn launcher_file_name(&self, base: &str) -> String {
        match self.kind {
            PlatformKind::Windows => format!("{base}.bat"),
            PlatformKind::Posix => base.to_string(),
        }
    }

    /// Shell snippet the operator runs to activate the environment
    pub fn activate_hint(&self) -> &'static str {
        match self.kind {
            PlatformKind::Windows => ".\\venv\\Scripts\\activate",
            PlatformKind::Posix => "source venv/bin/activate",
        }
    }
}

/// Interpreter used to create the virtual environment.
///
/// Can be overridden with the `MEMSETUP_PYTHON` environment variable; the
/// default is whatever the platform conventionally puts on PATH.
pub fn bootstrap_python(kind: PlatformKind) -> PathBuf {
    if let Ok(python) = std::env::var("MEMSETUP_PYTHON") {
        return PathBuf::from(python);
    }
    match kind {
        PlatformKind::Windows => PathBuf::from("python"),
        PlatformKind::Posix => PathBuf::from("python3"),
    }
}
