//! Duration probing via ffprobe.
//!
//! Only the container duration is requested, in ffprobe's bare
//! `default=noprint_wrappers=1:nokey=1` format, which prints a single
//! number (or `N/A`).

use std::path::Path;
use std::process::{Command, Stdio};

/// Returns the total duration of `input` in seconds.
///
/// `None` when ffprobe cannot be run, exits non-zero, or reports a value
/// that is missing, unparseable, non-finite, or not strictly positive.
/// Callers treat `None` as "show elapsed time only".
pub fn probe_duration(ffprobe: &Path, input: &Path) -> Option<f64> {
    log::debug!("Running ffprobe for duration on: {}", input.display());

    let output = Command::new(ffprobe)
        .args(["-v", "error"])
        .args(["-show_entries", "format=duration"])
        .args(["-of", "default=noprint_wrappers=1:nokey=1"])
        .arg(input)
        .stdin(Stdio::null())
        .output();

    let output = match output {
        Ok(output) => output,
        Err(e) => {
            log::warn!("ffprobe could not be started for {}: {e}", input.display());
            return None;
        }
    };

    if !output.status.success() {
        log::warn!(
            "ffprobe exited with {} for {}: {}",
            output.status,
            input.display(),
            String::from_utf8_lossy(&output.stderr).trim()
        );
        return None;
    }

    let duration = parse_duration_output(&String::from_utf8_lossy(&output.stdout));
    if duration.is_none() {
        log::warn!("No usable duration reported for {}", input.display());
    }
    duration
}

/// Parses ffprobe's bare duration output.
#[must_use]
pub fn parse_duration_output(stdout: &str) -> Option<f64> {
    stdout
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())?
        .parse::<f64>()
        .ok()
        .filter(|d| d.is_finite() && *d > 0.0)
}
