//! Subcommand implementations.
//!
//! Interactive questions go through the `confirm` callback so the commands
//! can run unattended in tests.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use lvcraft_codegen::{validate_guards, EmitOptions, GuardDiagnostic, Generator};
use lvcraft_core::project::{DIR_GENERATED, DIR_UI, UI_HEADER, UI_SOURCE};
use lvcraft_core::{find_project_root, Project};
use tracing::{info, warn};

use crate::output::write_atomic;

/// Answers a y/N question.
pub type Confirm<'a> = dyn FnMut(&str) -> Result<bool> + 'a;

/// Result of `lvcraft generate`.
#[derive(Debug, PartialEq, Eq)]
pub enum GenerateOutcome {
    /// Both documents are on disk; the paths that changed.
    Written(Vec<PathBuf>),
    /// The user declined; nothing was written.
    Cancelled,
}

/// Read a previous document. Invalid UTF-8 is replaced rather than rejected
/// so a stray byte in user code does not block regeneration.
fn read_previous(path: &Path) -> Result<Option<String>> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e).with_context(|| format!("Failed to read {}", path.display())),
    };
    match String::from_utf8(bytes) {
        Ok(text) => Ok(Some(text)),
        Err(e) => {
            warn!(path = %path.display(), "invalid UTF-8 replaced with U+FFFD");
            Ok(Some(String::from_utf8_lossy(e.as_bytes()).into_owned()))
        }
    }
}

/// Regenerate `ui.c` and `ui.h` for the project containing `start`.
pub fn generate(start: &Path, force: bool, confirm: &mut Confirm) -> Result<GenerateOutcome> {
    let project = Project::open(start).context("Failed to open project")?;
    let source_path = project.source_path();
    let previous = read_previous(&source_path)?;

    let generator = Generator::new(EmitOptions {
        header_name: UI_HEADER.to_string(),
        source_name: UI_SOURCE.to_string(),
        ..Default::default()
    })?;
    let output = generator.generate(&project.layout, &project.styles, previous.as_deref())?;

    if output.needs_confirmation() && !force {
        let question = format!(
            "{} has {} malformed USER CODE marker(s). Overwrite it and discard all user code?",
            source_path.display(),
            output.diagnostics.len()
        );
        if !confirm(&question)? {
            info!("generation cancelled");
            return Ok(GenerateOutcome::Cancelled);
        }
    }

    let lost: Vec<&str> = output.lost_user_code().map(|d| d.id.as_str()).collect();
    if !lost.is_empty() && project.manifest.generator.confirm_dropped_regions && !force {
        let question = format!("User code in {} will be removed. Continue?", lost.join(", "));
        if !confirm(&question)? {
            info!("generation cancelled");
            return Ok(GenerateOutcome::Cancelled);
        }
    }

    let ui_dir = project.ui_dir();
    fs::create_dir_all(&ui_dir).with_context(|| format!("Failed to create {}", ui_dir.display()))?;

    let mut written = Vec::new();
    for file in output.files() {
        let path = ui_dir.join(&file.path);
        if write_atomic(&path, &file.content)? {
            written.push(path);
        }
    }

    info!(
        root = %project.root.display(),
        written = written.len(),
        preserved = output.preserved.len(),
        "generated UI code"
    );
    Ok(GenerateOutcome::Written(written))
}

/// Validate the markers of the existing `ui.c`.
pub fn check(start: &Path) -> Result<Vec<GuardDiagnostic>> {
    let root = find_project_root(start).context("Failed to open project")?;
    let source_path = root.join(DIR_GENERATED).join(DIR_UI).join(UI_SOURCE);

    let Some(text) = read_previous(&source_path)? else {
        info!(path = %source_path.display(), "no generated source to check");
        return Ok(Vec::new());
    };

    let diagnostics = validate_guards(&text);
    for d in &diagnostics {
        warn!("{d}");
    }
    Ok(diagnostics)
}

/// Delete and recreate `generated/`. Returns `false` when there was nothing
/// to delete or the user declined.
pub fn clean(start: &Path, yes: bool, confirm: &mut Confirm) -> Result<bool> {
    let root = find_project_root(start).context("Failed to open project")?;
    let generated = root.join(DIR_GENERATED);

    if !generated.exists() {
        info!(path = %generated.display(), "nothing to clean");
        return Ok(false);
    }

    let question = format!("Delete {} including any user code?", generated.display());
    if !yes && !confirm(&question)? {
        info!("clean cancelled");
        return Ok(false);
    }

    fs::remove_dir_all(&generated)
        .with_context(|| format!("Failed to remove {}", generated.display()))?;
    fs::create_dir_all(&generated)?;
    info!(path = %generated.display(), "cleaned generated files");
    Ok(true)
}
