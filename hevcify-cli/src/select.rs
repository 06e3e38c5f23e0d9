//! Directory selection and confirmation on the terminal.
//!
//! Stands in for a graphical folder picker: the directory comes from the
//! command line or, failing that, from a prompt. Empty input or a
//! non-interactive terminal mean "cancel". After a declined confirmation the
//! user may pick a different directory instead.

use anyhow::{Context, Result, bail};
use console::{Term, style};
use std::path::{Path, PathBuf};

/// Resolves the directory to convert.
///
/// Returns `Ok(None)` when the user gave no directory. Fails when the given
/// path does not exist or is not a directory.
pub fn resolve_directory(arg: Option<&Path>, term: &Term) -> Result<Option<PathBuf>> {
    let raw = match arg {
        Some(path) => path.to_path_buf(),
        None => match prompt_for_directory(term)? {
            Some(path) => path,
            None => return Ok(None),
        },
    };

    validate_directory(&raw).map(Some)
}

fn prompt_for_directory(term: &Term) -> Result<Option<PathBuf>> {
    if !term.is_term() {
        return Ok(None);
    }
    term.write_str("Directory to convert: ")
        .context("Failed to write prompt")?;
    let line = term.read_line().context("Failed to read directory")?;
    let line = line.trim();
    Ok((!line.is_empty()).then(|| PathBuf::from(line)))
}

/// Canonicalises `path` and checks it is a directory.
pub fn validate_directory(path: &Path) -> Result<PathBuf> {
    let canonical = path
        .canonicalize()
        .with_context(|| format!("Invalid input path '{}'", path.display()))?;
    if !canonical.is_dir() {
        bail!("Input path '{}' is not a directory", path.display());
    }
    Ok(canonical)
}

/// Asks the user to confirm replacing `count` files in `dir`.
///
/// A terminal that cannot be read interactively counts as declining.
pub fn confirm_conversion(term: &Term, dir: &Path, count: usize) -> Result<bool> {
    if !term.is_term() {
        return Ok(false);
    }
    term.write_line(&format!(
        "Found {} video file(s) in {}.",
        style(count).bold(),
        dir.display()
    ))?;
    term.write_line(&format!(
        "{}",
        style("The original files will be replaced by their HEVC versions.").yellow()
    ))?;
    term.write_str("Continue? [y/N] ")?;
    let answer = term.read_line().context("Failed to read confirmation")?;
    Ok(is_affirmative(&answer))
}

/// After a declined confirmation, asks whether to choose another directory.
pub fn offer_another_directory(term: &Term) -> Result<bool> {
    if !term.is_term() {
        return Ok(false);
    }
    term.write_str("Select a different directory? [y/N] ")?;
    let answer = term.read_line().context("Failed to read answer")?;
    Ok(is_affirmative(&answer))
}

fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
