//! Terminal prompts and file output.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::Path;

use anyhow::{Context, Result};
use tempfile::NamedTempFile;
use tracing::debug;

/// Ask a y/N question on stderr and read the answer from stdin.
pub fn prompt_yes_no(question: &str) -> Result<bool> {
    let stdin = io::stdin();
    ask(question, &mut stdin.lock(), &mut io::stderr())
}

/// Anything but `y` or `yes` is a no.
pub fn ask(question: &str, input: &mut impl BufRead, out: &mut impl Write) -> Result<bool> {
    write!(out, "{question} [y/N] ")?;
    out.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer).context("Failed to read answer")?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

/// Replace `path` with `content` via a temporary file in the same directory.
///
/// Returns `false` without touching the file when it already holds `content`.
pub fn write_atomic(path: &Path, content: &str) -> Result<bool> {
    if fs::read_to_string(path).is_ok_and(|existing| existing == content) {
        debug!(path = %path.display(), "unchanged");
        return Ok(false);
    }

    let dir = path
        .parent()
        .with_context(|| format!("No parent directory for {}", path.display()))?;
    let mut file = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temporary file in {}", dir.display()))?;
    file.write_all(content.as_bytes())?;
    file.persist(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(true)
}
