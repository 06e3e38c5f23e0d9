//! Implementation of the 'convert' subcommand.
//!
//! This module handles directory selection, confirmation, configuration
//! setup, and delegation to the hevcify-core batch runner. The returned
//! value is the process exit code.

use crate::cli::{ConvertArgs, GlobalArgs};
use crate::select::{confirm_conversion, offer_another_directory, resolve_directory};
use crate::{EXIT_ABORTED, EXIT_OK, EXIT_REPLACE_FAILED};

use anyhow::{Context, Result};
use console::Term;
use hevcify_core::terminal_output::{print_section, print_status, print_warning};
use hevcify_core::{
    BatchSummary, CoreConfig, CoreError, MediaFile, check_toolkit, find_processable_files,
    process_files,
};
use log::info;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;

/// Builds the core configuration from the command line.
#[must_use]
pub fn create_core_config(input_dir: PathBuf, global: &GlobalArgs, args: &ConvertArgs) -> CoreConfig {
    let mut config = CoreConfig::new(input_dir);
    config.ffmpeg_path = global.ffmpeg.clone();
    config.ffprobe_path = global.ffprobe.clone();
    config.forced_encoder = args.encoder;
    config
}

/// Maps a finished batch to the process exit code.
#[must_use]
pub fn exit_code_for(summary: &BatchSummary) -> i32 {
    if summary.aborted {
        EXIT_ABORTED
    } else if summary.replace_failed > 0 {
        EXIT_REPLACE_FAILED
    } else {
        EXIT_OK
    }
}

/// Outcome of choosing what to convert.
enum Selection {
    Files(CoreConfig, Vec<MediaFile>),
    Cancelled,
    Empty,
}

/// Resolves the directory, checks the toolkit, scans and asks for
/// confirmation.
///
/// Declining the confirmation offers another directory, which is then
/// prompted for.
fn select_files(args: &ConvertArgs, global: &GlobalArgs, term: &Term) -> Result<Selection> {
    let mut dir_arg = args.dir.clone();
    let mut toolkit_checked = false;

    loop {
        let Some(input_dir) = resolve_directory(dir_arg.take().as_deref(), term)? else {
            return Ok(Selection::Cancelled);
        };

        let config = create_core_config(input_dir, global, args);
        config.validate().context("Invalid configuration")?;
        if !toolkit_checked {
            check_toolkit(&config).context("ffmpeg is required")?;
            toolkit_checked = true;
        }

        let files = match find_processable_files(&config.input_dir) {
            Ok(files) => files,
            Err(CoreError::NoFilesFound) => {
                print_warning(&format!(
                    "No supported video files found in {}",
                    config.input_dir.display()
                ));
                return Ok(Selection::Empty);
            }
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("Failed to scan '{}'", config.input_dir.display())
                });
            }
        };

        if args.yes || confirm_conversion(term, &config.input_dir, files.len())? {
            return Ok(Selection::Files(config, files));
        }
        if !offer_another_directory(term)? {
            return Ok(Selection::Cancelled);
        }
    }
}

/// Runs the conversion flow and returns the exit code.
pub fn run_convert(args: &ConvertArgs, global: &GlobalArgs, abort: &AtomicBool) -> Result<i32> {
    let term = Term::stderr();

    let (config, files) = match select_files(args, global, &term)? {
        Selection::Files(config, files) => (config, files),
        Selection::Cancelled => {
            info!("Operation cancelled");
            return Ok(EXIT_OK);
        }
        Selection::Empty => return Ok(EXIT_OK),
    };

    print_section("Conversion");
    print_status("Directory", &config.input_dir.display().to_string(), false);

    let summary = process_files(&config, &files, abort).context("Batch conversion failed")?;
    Ok(exit_code_for(&summary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use hevcify_core::EncoderId;

    #[test]
    fn test_exit_code_for() {
        let mut summary = BatchSummary::new(EncoderId::Libx265);
        summary.failed = 3;
        assert_eq!(exit_code_for(&summary), EXIT_OK);

        summary.replace_failed = 1;
        assert_eq!(exit_code_for(&summary), EXIT_REPLACE_FAILED);

        summary.aborted = true;
        assert_eq!(exit_code_for(&summary), EXIT_ABORTED);
    }

    #[test]
    fn test_create_core_config() {
        let global = GlobalArgs {
            ffmpeg: PathBuf::from("/opt/ff/ffmpeg"),
            ffprobe: PathBuf::from("/opt/ff/ffprobe"),
            verbose: false,
            log_dir: None,
        };
        let args = ConvertArgs {
            dir: None,
            yes: true,
            encoder: Some(EncoderId::Amf),
        };
        let config = create_core_config(PathBuf::from("/videos"), &global, &args);
        assert_eq!(config.input_dir, PathBuf::from("/videos"));
        assert_eq!(config.ffmpeg_path, PathBuf::from("/opt/ff/ffmpeg"));
        assert_eq!(config.ffprobe_path, PathBuf::from("/opt/ff/ffprobe"));
        assert_eq!(config.forced_encoder, Some(EncoderId::Amf));
        assert_eq!(config.target_extension, "mkv");
    }
}
