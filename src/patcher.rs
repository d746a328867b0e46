//! Append-only section patching for the memory configuration file
//!
//! The target file may be hand-edited and must never lose content: the only
//! mutation this module performs is appending the marked template section,
//! and only when the marker is not already present. Detection is an exact,
//! case-sensitive substring match, which also makes a second run a no-op.

use std::fs;
use std::path::Path;

use inquire::Confirm;

use crate::error::{Result, SetupError};

/// Marker identifying the mandatory memory-integration section
pub const MEMORY_SECTION_MARKER: &str = "## Memory Integration (MANDATORY)";

/// Injected yes/no capability, so the merge algorithm is testable without
/// real standard input
pub trait Confirmation {
    fn confirm(&self, prompt: &str) -> Result<bool>;
}

/// Asks the operator on the terminal
pub struct InteractiveConfirmation;

impl Confirmation for InteractiveConfirmation {
    fn confirm(&self, prompt: &str) -> Result<bool> {
        Confirm::new(prompt)
            .with_default(true)
            .with_help_message("Press Enter to confirm, or 'n' to skip")
            .prompt()
            .map_err(|e| SetupError::PromptFailed {
                reason: e.to_string(),
            })
    }
}

/// Fixed answer, for `--yes` runs and tests
pub struct PresetConfirmation(pub bool);

impl Confirmation for PresetConfirmation {
    fn confirm(&self, _prompt: &str) -> Result<bool> {
        Ok(self.0)
    }
}

/// What `ensure_section` did to the target file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchOutcome {
    /// Target was absent; created from the template's marker suffix
    Created,
    /// Marker already present; nothing touched
    AlreadyPresent,
    /// Section appended to the existing content
    Appended,
    /// Operator declined; target untouched
    Declined,
    /// Marker not found in the template; nothing to install
    NothingToInstall,
}

/// Ensure the marked section exists in `target`, merging it from `template`
/// if needed.
///
/// When `target` does not exist it is created with everything from the
/// marker to the end of the template. When it exists without the marker,
/// the operator is asked, and on confirmation the section (marker up to the
/// first blank line, or end of template) is appended after a blank line.
/// Pre-existing content is never rewritten or truncated.
pub fn ensure_section(
    target: &Path,
    template: &Path,
    marker: &str,
    confirmation: &dyn Confirmation,
) -> Result<PatchOutcome> {
    if !target.exists() {
        let template_text = read(template)?;
        return match section_to_end(&template_text, marker) {
            Some(section) => {
                write(target, section)?;
                Ok(PatchOutcome::Created)
            }
            None => Ok(PatchOutcome::NothingToInstall),
        };
    }

    let existing = read(target)?;
    if existing.contains(marker) {
        return Ok(PatchOutcome::AlreadyPresent);
    }

    let prompt = format!("Add the '{marker}' section automatically?");
    if !confirmation.confirm(&prompt)? {
        return Ok(PatchOutcome::Declined);
    }

    let template_text = read(template)?;
    match extract_section(&template_text, marker) {
        Some(section) => {
            let patched = format!("{existing}\n\n{section}");
            write(target, &patched)?;
            Ok(PatchOutcome::Appended)
        }
        None => Ok(PatchOutcome::NothingToInstall),
    }
}

/// Template text from the marker to the first blank-line boundary, or to the
/// end of the text if no boundary follows.
///
/// The boundary is the first occurrence of two consecutive newlines at or
/// after the marker. Kept bug-for-bug compatible with the original snippet
/// format: a blank line inside the section body ends the section early.
fn extract_section<'a>(template: &'a str, marker: &str) -> Option<&'a str> {
    let start = template.find(marker)?;
    match template[start..].find("\n\n") {
        Some(offset) => Some(&template[start..start + offset]),
        None => Some(&template[start..]),
    }
}

/// Template text from the marker to the end of the template
fn section_to_end<'a>(template: &'a str, marker: &str) -> Option<&'a str> {
    template.find(marker).map(|start| &template[start..])
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| SetupError::read_failed(path, &e))
}

fn write(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| SetupError::write_failed(parent, &e))?;
    }
    fs::write(path, content).map_err(|e| SetupError::write_failed(path, &e))
}
