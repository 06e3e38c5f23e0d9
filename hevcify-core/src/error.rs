// ============================================================================
// hevcify-core/src/error.rs
// ============================================================================
//
// ERROR HANDLING: Core error type and helpers
//
// Every fallible operation in hevcify-core returns `CoreResult<T>`. Errors
// that are recoverable per file (a failed encode, a missing output) are
// counted by the batch orchestrator. Errors that leave the user's data in
// an unexpected state (`ReplaceFailed`) carry enough context for manual
// recovery.

use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

/// Errors produced by the transcoding core.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Path error: {0}")]
    PathError(String),

    #[error("No supported video files found")]
    NoFilesFound,

    #[error("Required dependency '{0}' not found in PATH")]
    DependencyNotFound(String),

    #[error("Failed to start '{0}': {1}")]
    CommandStart(String, #[source] std::io::Error),

    #[error("Failed waiting for '{0}': {1}")]
    CommandWait(String, #[source] std::io::Error),

    #[error("'{cmd}' exited with {status}: {stderr}")]
    CommandFailed {
        cmd: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("Encoder reported success but no output was written to {0}")]
    OutputMissing(PathBuf),

    #[error("Target file already exists: {0}")]
    TargetExists(PathBuf),

    /// The original has already been deleted when this is raised.
    #[error(
        "Original deleted but converted file could not be moved: {} -> {}: {source}",
        temp_path.display(),
        final_path.display()
    )]
    ReplaceFailed {
        temp_path: PathBuf,
        final_path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Aborted by user")]
    Aborted,

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Result alias used throughout hevcify-core.
pub type CoreResult<T> = Result<T, CoreError>;

pub(crate) fn command_start_error(cmd: impl Into<String>, err: std::io::Error) -> CoreError {
    CoreError::CommandStart(cmd.into(), err)
}

pub(crate) fn command_wait_error(cmd: impl Into<String>, err: std::io::Error) -> CoreError {
    CoreError::CommandWait(cmd.into(), err)
}

pub(crate) fn command_failed_error(
    cmd: impl Into<String>,
    status: ExitStatus,
    stderr: impl Into<String>,
) -> CoreError {
    CoreError::CommandFailed {
        cmd: cmd.into(),
        status,
        stderr: stderr.into(),
    }
}

/// Truncates `text` to at most `max_chars` characters, appending an ellipsis
/// when anything was cut. Operates on chars, so multi-byte output is safe.
#[must_use]
pub fn truncate_message(text: &str, max_chars: usize) -> String {
    let trimmed = text.trim();
    if trimmed.chars().count() <= max_chars {
        return trimmed.to_string();
    }
    let mut out: String = trimmed.chars().take(max_chars).collect();
    out.push('…');
    out
}
