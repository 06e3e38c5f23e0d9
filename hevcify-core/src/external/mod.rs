// ============================================================================
// hevcify-core/src/external/mod.rs
// ============================================================================
//
// EXTERNAL TOOLS: Interactions with ffmpeg and ffprobe
//
// This module encapsulates every invocation of the external media toolkit
// apart from encoder enumeration (see encoder::capabilities):
// - dependency checks so a missing toolkit ends the run before any work
// - the per-file duration query
// - assembly of the transcode command line
//
// AI-ASSISTANT-INFO: External tool interactions for ffmpeg/ffprobe

// ---- Internal crate imports ----
use crate::error::{CoreError, CoreResult};

// ---- Standard library imports ----
use std::io;
use std::path::Path;
use std::process::{Command, Stdio};

pub mod ffmpeg;
pub mod ffprobe;

pub use ffmpeg::{TranscodeCommand, build_transcode_args};
pub use ffprobe::{parse_duration_output, probe_duration};

/// Checks that an external command exists and can be started.
///
/// Runs `<cmd> -version` with output discarded. Only a failure to start the
/// process counts; the exit status is not inspected.
///
/// # Returns
///
/// * `Ok(())` - The command could be launched
/// * `Err(CoreError::DependencyNotFound)` - The command is not on PATH
/// * `Err(CoreError::CommandStart)` - The command exists but failed to start
pub fn check_dependency(cmd: &Path) -> CoreResult<()> {
    let result = Command::new(cmd)
        .arg("-version")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();

    match result {
        Ok(_) => {
            log::debug!("Found dependency: {}", cmd.display());
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::warn!("Dependency '{}' not found.", cmd.display());
            Err(CoreError::DependencyNotFound(cmd.display().to_string()))
        }
        Err(e) => {
            log::error!(
                "Failed to start dependency check command '{}': {e}",
                cmd.display()
            );
            Err(CoreError::CommandStart(cmd.display().to_string(), e))
        }
    }
}

/// Gets the size of the file at `path` in bytes.
pub fn get_file_size(path: &Path) -> CoreResult<u64> {
    Ok(std::fs::metadata(path)?.len())
}
