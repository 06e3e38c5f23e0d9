// ============================================================================
// hevcify-cli/src/logging.rs
// ============================================================================
//
// LOGGING SETUP: Console and optional run log via fern
//
// hevcify-core formats its own terminal output and emits it through the
// `log` macros, so the console dispatch prints bare messages:
// - info and below go to stdout
// - warnings and errors go to stderr
// - progress checkpoints ("hevcify::progress") are file-only, since the
//   progress bar already shows them
//
// The optional file dispatch records everything with timestamps, with ANSI
// color codes stripped.
//
// AI-ASSISTANT-INFO: fern logger initialisation and log file naming

use anyhow::{Context, Result};
use log::LevelFilter;
use std::path::{Path, PathBuf};

/// Log target used by hevcify-core for progress checkpoints.
pub const PROGRESS_TARGET: &str = "hevcify::progress";

/// Returns the current local timestamp formatted as "YYYYMMDD_HHMMSS".
///
/// # Example
/// ```
/// let log_filename = format!("hevcify_run_{}.log", hevcify_cli::logging::get_timestamp());
/// assert!(log_filename.starts_with("hevcify_run_"));
/// ```
pub fn get_timestamp() -> String {
    chrono::Local::now().format("%Y%m%d_%H%M%S").to_string()
}

/// Path of the run log inside `log_dir`.
#[must_use]
pub fn log_file_path(log_dir: &Path) -> PathBuf {
    log_dir.join(format!("hevcify_run_{}.log", get_timestamp()))
}

/// Installs the global logger. Returns the log file path when one was opened.
pub fn init_logging(verbose: bool, log_dir: Option<&Path>) -> Result<Option<PathBuf>> {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let console = fern::Dispatch::new()
        .filter(|meta| meta.target() != PROGRESS_TARGET)
        .format(|out, message, _record| out.finish(format_args!("{message}")))
        .chain(
            fern::Dispatch::new()
                .filter(|meta| meta.level() > log::Level::Warn)
                .chain(std::io::stdout()),
        )
        .chain(
            fern::Dispatch::new()
                .level(LevelFilter::Warn)
                .chain(std::io::stderr()),
        );

    let mut dispatch = fern::Dispatch::new().level(level).chain(console);

    let log_path = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory '{}'", dir.display()))?;
            let path = log_file_path(dir);
            let file = fern::log_file(&path)
                .with_context(|| format!("Failed to open log file '{}'", path.display()))?;
            dispatch = dispatch.chain(
                fern::Dispatch::new()
                    .format(|out, message, record| {
                        let text = strip_ansi_escapes::strip_str(message.to_string());
                        out.finish(format_args!(
                            "[{} {:<5} {}] {}",
                            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                            record.level(),
                            record.target(),
                            text
                        ))
                    })
                    .chain(file),
            );
            Some(path)
        }
        None => None,
    };

    dispatch.apply().context("Failed to initialise logging")?;
    Ok(log_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_file_path_naming() {
        let path = log_file_path(Path::new("/var/log/hevcify"));
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("hevcify_run_"));
        assert!(name.ends_with(".log"));
        // hevcify_run_ + YYYYMMDD_HHMMSS + .log
        assert_eq!(name.len(), "hevcify_run_".len() + 15 + ".log".len());
        assert_eq!(path.parent(), Some(Path::new("/var/log/hevcify")));
    }
}
