// ============================================================================
// hevcify-core/src/batch.rs
// ============================================================================
//
// BATCH ORCHESTRATION: Converting every video in a directory
//
// WORKFLOW:
// 1. Check that ffmpeg can be started (ffprobe is optional)
// 2. Discover the videos (sorted, top level only)
// 3. Probe hardware encoders once and choose one for the whole batch
// 4. Create the temporary workspace
// 5. For each file, strictly one at a time:
//    a. Refuse to overwrite an unrelated file at the final path
//    b. Transcode into the workspace
//    c. Replace the original with the converted file
//    d. Accumulate statistics
// 6. Remove the workspace and print the summary
//
// A file whose original was deleted but whose replacement could not be moved
// stays in the workspace, and the workspace is kept from that point on.
//
// Per-file failures never stop the batch. Only the abort flag does, and it
// is honoured between files as well as during an encode.
//
// AI-ASSISTANT-INFO: Batch orchestration, statistics and encoder choice

// ---- Internal crate imports ----
use crate::config::CoreConfig;
use crate::discovery::{MediaFile, find_processable_files};
use crate::encoder::{EncoderAvailability, EncoderId, probe_available_encoders, select_encoder};
use crate::error::{CoreError, CoreResult};
use crate::external::check_dependency;
use crate::replace::{ensure_target_free, replace_original};
use crate::temp_files::create_workspace;
use crate::terminal_output::{
    print_error, print_processing, print_status, print_success, print_summary, print_warning,
};
use crate::transcode::run_transcode;
use crate::utils::{compression_percent, format_duration};

// ---- Standard library imports ----
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Why a file did not end up converted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Encoding failed or was refused; the original is untouched.
    Conversion,
    /// The original was deleted but the converted file could not be moved
    /// into place. It must be recovered by hand.
    ReplaceFailed,
}

/// Outcome for one file of the batch.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionResult {
    pub file_name: String,
    pub success: bool,
    pub original_size: u64,
    /// Zero unless `success`.
    pub converted_size: u64,
    pub encode_time: Duration,
    pub failure: Option<FailureKind>,
    pub final_path: Option<PathBuf>,
}

impl ConversionResult {
    fn failed(file_name: String, kind: FailureKind, encode_time: Duration) -> Self {
        Self {
            file_name,
            success: false,
            original_size: 0,
            converted_size: 0,
            encode_time,
            failure: Some(kind),
            final_path: None,
        }
    }
}

/// Aggregate statistics of a batch run.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchSummary {
    pub encoder: EncoderId,
    pub succeeded: usize,
    pub failed: usize,
    pub replace_failed: usize,
    pub total_original_bytes: u64,
    pub total_converted_bytes: u64,
    pub elapsed: Duration,
    pub aborted: bool,
    pub results: Vec<ConversionResult>,
}

impl BatchSummary {
    #[must_use]
    pub fn new(encoder: EncoderId) -> Self {
        Self {
            encoder,
            succeeded: 0,
            failed: 0,
            replace_failed: 0,
            total_original_bytes: 0,
            total_converted_bytes: 0,
            elapsed: Duration::ZERO,
            aborted: false,
            results: Vec::new(),
        }
    }

    /// Adds one file's outcome to the totals.
    pub fn record(&mut self, result: ConversionResult) {
        match result.failure {
            None if result.success => {
                self.succeeded += 1;
                self.total_original_bytes += result.original_size;
                self.total_converted_bytes += result.converted_size;
            }
            Some(FailureKind::ReplaceFailed) => self.replace_failed += 1,
            _ => self.failed += 1,
        }
        self.results.push(result);
    }

    /// Overall space saved, or `None` when nothing was converted.
    #[must_use]
    pub fn compression_percent(&self) -> Option<f64> {
        (self.succeeded > 0)
            .then(|| compression_percent(self.total_original_bytes, self.total_converted_bytes))
    }

    #[must_use]
    pub fn processed(&self) -> usize {
        self.results.len()
    }
}

/// Verifies that ffmpeg can be started.
///
/// A missing ffprobe only costs the duration, so it is reported and the
/// encodes fall back to the elapsed-time display.
pub fn check_toolkit(config: &CoreConfig) -> CoreResult<()> {
    check_dependency(&config.ffmpeg_path)?;
    if let Err(e) = check_dependency(&config.ffprobe_path) {
        print_warning(&format!(
            "ffprobe is not usable ({e}); progress will show elapsed time only"
        ));
    }
    Ok(())
}

/// Chooses the encoder for the batch.
///
/// A forced encoder is honoured when the probe lists it; otherwise the
/// priority selection applies. A warning is printed when the result is the
/// software encoder.
pub fn choose_encoder(
    forced: Option<EncoderId>,
    availability: &EncoderAvailability,
) -> EncoderId {
    let encoder = match forced {
        Some(id) if availability.is_available(id) => {
            log::debug!("Using requested encoder {id}");
            id
        }
        Some(id) => {
            print_warning(&format!(
                "Requested encoder {id} is not available, selecting automatically"
            ));
            select_encoder(availability).0
        }
        None => select_encoder(availability).0,
    };

    if !encoder.is_hardware() {
        print_warning("No hardware HEVC encoder available; using software encoding (this will be slower)");
    }
    encoder
}

/// Converts every video in `config.input_dir`.
///
/// Returns `Err(CoreError::NoFilesFound)` without creating a workspace when
/// the directory holds no supported videos.
pub fn process_directory(config: &CoreConfig, abort: &AtomicBool) -> CoreResult<BatchSummary> {
    config.validate()?;
    check_toolkit(config)?;
    let files = find_processable_files(&config.input_dir)?;
    process_files(config, &files, abort)
}

/// Probes encoders, runs the batch over `files` and prints the summary.
pub fn process_files(
    config: &CoreConfig,
    files: &[MediaFile],
    abort: &AtomicBool,
) -> CoreResult<BatchSummary> {
    let availability = probe_available_encoders(&config.ffmpeg_path);
    let encoder = choose_encoder(config.forced_encoder, &availability);

    let summary = run_batch(config, files, encoder, abort)?;
    print_summary(&summary);
    Ok(summary)
}

/// Converts `files` one after another with `encoder`.
///
/// The workspace exists only for the duration of this call, unless a
/// replacement failed and it still holds a stranded converted file.
pub fn run_batch(
    config: &CoreConfig,
    files: &[MediaFile],
    encoder: EncoderId,
    abort: &AtomicBool,
) -> CoreResult<BatchSummary> {
    let started = Instant::now();
    let mut summary = BatchSummary::new(encoder);
    let mut workspace = create_workspace(config)?;
    let total = files.len();

    print_status("Encoder", encoder.display_name(), true);
    print_status("Files", &total.to_string(), false);

    for (index, file) in files.iter().enumerate() {
        if abort.load(Ordering::SeqCst) {
            summary.aborted = true;
            break;
        }

        print_processing(&format!("[{}/{}] {}", index + 1, total, file.display_name()));
        match convert_one(config, file, workspace.path(), encoder, abort) {
            Ok(result) => {
                if result.failure == Some(FailureKind::ReplaceFailed) {
                    workspace.keep();
                }
                summary.record(result);
            }
            Err(CoreError::Aborted) => {
                print_warning(&format!("Conversion of {} was interrupted", file.display_name()));
                summary.aborted = true;
                break;
            }
            Err(e) => return Err(e),
        }
    }

    workspace.close();
    summary.elapsed = started.elapsed();
    Ok(summary)
}

/// Converts and replaces a single file. Only `Aborted` is returned as an
/// error; every other problem becomes a failed `ConversionResult`.
fn convert_one(
    config: &CoreConfig,
    file: &MediaFile,
    workspace: &Path,
    encoder: EncoderId,
    abort: &AtomicBool,
) -> CoreResult<ConversionResult> {
    let file_name = file.display_name();
    let started = Instant::now();

    if let Err(e) = ensure_target_free(&file.path, &config.target_extension) {
        print_error(&format!("Skipping {file_name}: {e}"));
        return Ok(ConversionResult::failed(file_name, FailureKind::Conversion, started.elapsed()));
    }

    let outcome = match run_transcode(config, file, workspace, encoder, abort) {
        Ok(outcome) => outcome,
        Err(CoreError::Aborted) => return Err(CoreError::Aborted),
        Err(e) => {
            print_error(&format!("{file_name} failed with {encoder}: {e}"));
            return Ok(ConversionResult::failed(file_name, FailureKind::Conversion, started.elapsed()));
        }
    };

    match replace_original(&file.path, &outcome.temp_path, &config.target_extension) {
        Ok(final_path) => {
            print_success(&format!(
                "{file_name} converted in {}",
                format_duration(outcome.encode_time.as_secs_f64())
            ));
            Ok(ConversionResult {
                file_name,
                success: true,
                original_size: outcome.original_size,
                converted_size: outcome.converted_size,
                encode_time: outcome.encode_time,
                failure: None,
                final_path: Some(final_path),
            })
        }
        Err(e @ CoreError::ReplaceFailed { .. }) => {
            print_error(&e.to_string());
            Ok(ConversionResult::failed(file_name, FailureKind::ReplaceFailed, outcome.encode_time))
        }
        Err(e) => {
            print_error(&format!("Could not replace {file_name}: {e}"));
            if let Err(remove_err) = std::fs::remove_file(&outcome.temp_path) {
                log::warn!(
                    "Could not remove {}: {remove_err}",
                    outcome.temp_path.display()
                );
            }
            Ok(ConversionResult::failed(file_name, FailureKind::Conversion, outcome.encode_time))
        }
    }
}
