//! CLI definitions using clap derive API

use clap::Parser;
use clap::builder::{Styles, styling::AnsiColor};
use std::path::PathBuf;

/// memsetup - vector memory provisioning tool
///
/// Provisions the local semantic-memory search system and wires up the
/// Claude Code integration.
#[derive(Parser, Debug)]
#[command(
    name = "memsetup",
    author,
    version,
    color = clap::ColorChoice::Always,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Set up the vector memory system and its Claude Code integration",
    long_about = "Performs a single front-to-back provisioning pass: Python virtual \
                  environment, dependencies, spaCy model, vector index, Claude Code \
                  commands and CLAUDE.md section, global launcher script, health check. \
                  Every step checks its own state first, so re-running is always safe.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n    \
                  memsetup\n    \
                  memsetup --project-root ~/claude-code-vector-memory\n    \
                  memsetup --yes\n\n\
                  \x1b[1m\x1b[32mEnvironment:\x1b[0m\n    \
                  MEMSETUP_HOME      install integration under this directory instead of $HOME\n    \
                  MEMSETUP_PYTHON    interpreter used to create the virtual environment"
)]
pub struct Cli {
    /// Memory system checkout to provision (defaults to the current directory)
    #[arg(long, short = 'p', value_name = "DIR")]
    pub project_root: Option<PathBuf>,

    /// Apply the CLAUDE.md patch without asking
    #[arg(long, short = 'y')]
    pub yes: bool,

    /// Enable verbose output
    #[arg(long, short = 'v')]
    pub verbose: bool,
}
