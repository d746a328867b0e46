//! memsetup - provisioning tool for the Claude Code vector memory system
//!
//! Prepares the local runtime environment (Python virtualenv, spaCy model,
//! vector index) and wires the Claude Code extension surface (commands
//! directory, CLAUDE.md memory section, global launcher script) to it, in
//! one idempotent front-to-back pass.

use clap::Parser;
use std::path::PathBuf;

mod cli;
mod error;
mod installer;
mod orchestrator;
mod patcher;
mod platform;
mod runner;
mod ui;

use cli::Cli;
use error::{Result, SetupError};
use orchestrator::Orchestrator;
use patcher::{Confirmation, InteractiveConfirmation, PresetConfirmation};
use platform::PlatformKind;

/// Resolve the project root to an absolute path, verifying it exists
fn resolve_project_root(requested: Option<PathBuf>) -> Result<PathBuf> {
    let requested = requested.unwrap_or_else(|| PathBuf::from("."));
    dunce::canonicalize(&requested).map_err(|_| SetupError::ProjectRootNotFound {
        path: requested.display().to_string(),
    })
}

fn main() {
    let cli = Cli::parse();

    let confirmation: Box<dyn Confirmation> = if cli.yes {
        Box::new(PresetConfirmation(true))
    } else {
        Box::new(InteractiveConfirmation)
    };

    let result = resolve_project_root(cli.project_root).and_then(|project_root| {
        Orchestrator::new(
            &project_root,
            PlatformKind::detect(),
            cli.verbose,
            confirmation.as_ref(),
        )
        .run()
    });

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_project_root_existing_dir() {
        let temp = TempDir::new().unwrap();
        let resolved = resolve_project_root(Some(temp.path().to_path_buf())).unwrap();
        assert!(resolved.is_absolute());
    }

    #[test]
    fn test_resolve_project_root_missing_dir() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("not-there");
        let result = resolve_project_root(Some(missing));
        assert!(matches!(
            result.unwrap_err(),
            SetupError::ProjectRootNotFound { .. }
        ));
    }

    #[test]
    fn test_resolve_project_root_defaults_to_current_dir() {
        let resolved = resolve_project_root(None).unwrap();
        assert_eq!(
            resolved,
            dunce::canonicalize(std::env::current_dir().unwrap()).unwrap()
        );
    }
}
