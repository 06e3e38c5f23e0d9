// ============================================================================
// hevcify-core/src/transcode.rs
// ============================================================================
//
// TRANSCODE RUNNER: One ffmpeg conversion, start to finish
//
// Each file moves through Preparing -> Running -> {Succeeded, Failed}.
// While Running, two helper threads keep both pipes drained:
// - stdout: `-progress pipe:1` lines parsed into ProgressEvents and sent
//   over a channel to the control thread
// - stderr: diagnostics forwarded to the "ffmpeg_log" target, with a short
//   tail kept for failure reports
//
// The control thread polls the channel with a timeout so the abort flag is
// noticed even when ffmpeg is silent. Any partial temp output is removed
// before a failure is returned.
//
// AI-ASSISTANT-INFO: ffmpeg process lifecycle and progress streaming

// ---- Internal crate imports ----
use crate::config::CoreConfig;
use crate::discovery::MediaFile;
use crate::encoder::{EncoderId, profile};
use crate::error::{
    CoreError, CoreResult, command_failed_error, command_start_error, command_wait_error,
    truncate_message,
};
use crate::external::{TranscodeCommand, get_file_size, probe_duration};
use crate::progress::{ProgressEvent, ProgressState, parse_progress_line};
use crate::terminal_output::{EncodeProgress, print_status};
use crate::utils::{compression_percent, format_bytes, format_duration};

// ---- Standard library imports ----
use std::collections::VecDeque;
use std::fmt;
use std::io::{self, BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, ExitStatus};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// How long the control thread waits for a progress event before
/// re-checking the abort flag.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Number of trailing stderr lines retained for error reports.
const STDERR_TAIL_LINES: usize = 20;

/// Lifecycle of a single conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranscodeState {
    Preparing,
    Running,
    Succeeded,
    Failed,
}

impl fmt::Display for TranscodeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Preparing => "preparing",
            Self::Running => "running",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Result of a successful conversion. The output still sits in the
/// workspace at `temp_path` until the replacer moves it.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscodeOutcome {
    pub temp_path: PathBuf,
    pub original_size: u64,
    pub converted_size: u64,
    pub encode_time: Duration,
}

impl TranscodeOutcome {
    #[must_use]
    pub fn compression_percent(&self) -> f64 {
        compression_percent(self.original_size, self.converted_size)
    }
}

/// Location of the temporary output for `input`: `<workspace>/<stem>_temp.<ext>`.
pub fn temp_output_path(workspace: &Path, input: &Path, extension: &str) -> CoreResult<PathBuf> {
    let stem = input
        .file_stem()
        .ok_or_else(|| CoreError::PathError(format!("No file stem in {}", input.display())))?;
    let mut name = stem.to_os_string();
    name.push(format!("_temp.{extension}"));
    Ok(workspace.join(name))
}

fn log_state(file_name: &str, state: TranscodeState) {
    log::debug!("{file_name}: {state}");
}

/// Converts `input` into the workspace with the given encoder.
///
/// # Returns
///
/// * `Ok(TranscodeOutcome)` - ffmpeg exited 0 and the output exists
/// * `Err(CoreError::Aborted)` - the abort flag was raised; ffmpeg was killed
/// * `Err(CoreError::CommandFailed)` - non-zero exit, with a stderr excerpt
/// * `Err(CoreError::OutputMissing)` - exit 0 but nothing was written
/// * `Err(_)` - spawn, wait, or I/O errors
///
/// No temp output is left behind on any error path.
pub fn run_transcode(
    config: &CoreConfig,
    input: &MediaFile,
    workspace: &Path,
    encoder: EncoderId,
    abort: &AtomicBool,
) -> CoreResult<TranscodeOutcome> {
    let file_name = input.display_name();
    log_state(&file_name, TranscodeState::Preparing);

    if abort.load(Ordering::SeqCst) {
        return Err(CoreError::Aborted);
    }

    let temp_path = temp_output_path(workspace, &input.path, &config.target_extension)?;
    let encoder_profile = profile(encoder);

    print_status("Encoder", encoder_profile.display_name, false);
    print_status("Original size", &format_bytes(input.size), false);

    let duration = probe_duration(&config.ffprobe_path, &input.path);
    match duration {
        Some(secs) => print_status("Duration", &format_duration(secs), false),
        None => log::warn!("Duration of {file_name} is unknown; showing elapsed time only"),
    }

    let command = TranscodeCommand::new(&config.ffmpeg_path, &input.path, &temp_path, encoder_profile);
    log::debug!(target: "ffmpeg_log", "Command: {command}");

    let started = Instant::now();
    log_state(&file_name, TranscodeState::Running);
    let result = execute(&command, duration, abort, config.stderr_excerpt_len)
        .and_then(|()| {
            if temp_path.is_file() {
                get_file_size(&temp_path)
            } else {
                Err(CoreError::OutputMissing(temp_path.clone()))
            }
        });

    match result {
        Ok(converted_size) => {
            log_state(&file_name, TranscodeState::Succeeded);
            let outcome = TranscodeOutcome {
                temp_path,
                original_size: input.size,
                converted_size,
                encode_time: started.elapsed(),
            };
            print_status("Converted size", &format_bytes(outcome.converted_size), false);
            print_status(
                "Reduction",
                &format!("{:.1}%", outcome.compression_percent()),
                true,
            );
            Ok(outcome)
        }
        Err(e) => {
            log_state(&file_name, TranscodeState::Failed);
            discard_partial_output(&temp_path);
            Err(e)
        }
    }
}

/// Removes a partial output if one exists. Failure to remove is only logged.
fn discard_partial_output(temp_path: &Path) {
    match std::fs::remove_file(temp_path) {
        Ok(()) => log::debug!("Removed partial output {}", temp_path.display()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => log::warn!(
            "Could not remove partial output {}: {e}",
            temp_path.display()
        ),
    }
}

// ============================================================================
// PROCESS EXECUTION
// ============================================================================

fn program_name(command: &TranscodeCommand) -> String {
    command.program.display().to_string()
}

/// Spawns ffmpeg and drives it to completion, returning once it has exited
/// successfully.
fn execute(
    command: &TranscodeCommand,
    duration: Option<f64>,
    abort: &AtomicBool,
    excerpt_len: usize,
) -> CoreResult<()> {
    let program = program_name(command);
    let mut child = command
        .to_command()
        .spawn()
        .map_err(|e| command_start_error(&program, e))?;

    let (progress_reader, stderr_drainer) = match attach_pipe_threads(&mut child) {
        Ok(handles) => handles,
        Err(e) => {
            kill_child(&mut child);
            let _ = child.wait();
            return Err(command_start_error(&program, e));
        }
    };
    let (events, stdout_thread) = progress_reader;

    let aborted = pump_progress(&events, &mut child, duration, abort);

    let status = child.wait();
    if stdout_thread.join().is_err() {
        log::warn!("ffmpeg progress reader thread panicked");
    }
    let stderr_tail = stderr_drainer.join().unwrap_or_default();
    let status: ExitStatus = status.map_err(|e| command_wait_error(&program, e))?;

    if aborted {
        log::warn!("ffmpeg was stopped at user request");
        return Err(CoreError::Aborted);
    }

    if !status.success() {
        let excerpt = truncate_message(&stderr_tail, excerpt_len);
        log::error!(target: "ffmpeg_log", "ffmpeg exited with {status}: {excerpt}");
        return Err(command_failed_error(program, status, excerpt));
    }

    Ok(())
}

type ProgressReader = (mpsc::Receiver<ProgressEvent>, JoinHandle<()>);

/// Starts the stdout progress reader and the stderr drainer.
fn attach_pipe_threads(child: &mut Child) -> io::Result<(ProgressReader, JoinHandle<String>)> {
    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| io::Error::other("ffmpeg stdout was not captured"))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| io::Error::other("ffmpeg stderr was not captured"))?;

    let (tx, rx) = mpsc::channel();
    let stdout_thread = thread::spawn(move || {
        for_each_line(stdout, |line| {
            match parse_progress_line(line) {
                Some(event) => tx.send(event).is_ok(),
                None => true,
            }
        });
    });

    let stderr_thread = thread::spawn(move || {
        let mut tail: VecDeque<String> = VecDeque::with_capacity(STDERR_TAIL_LINES);
        for_each_line(stderr, |line| {
            let line = line.trim_end();
            if !line.is_empty() {
                log::debug!(target: "ffmpeg_log", "{line}");
                if tail.len() == STDERR_TAIL_LINES {
                    tail.pop_front();
                }
                tail.push_back(line.to_string());
            }
            true
        });
        tail.into_iter().collect::<Vec<_>>().join("\n")
    });

    Ok(((rx, stdout_thread), stderr_thread))
}

/// Feeds each line of `reader` (lossily decoded) to `f` until EOF, a read
/// error, or `f` returns false. Invalid UTF-8 never stops the drain.
fn for_each_line<R: Read>(reader: R, mut f: impl FnMut(&str) -> bool) {
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) | Err(_) => break,
            Ok(_) => {
                // ffmpeg may use bare carriage returns inside a line
                let text = String::from_utf8_lossy(&buf);
                for segment in text.split('\r') {
                    if !f(segment) {
                        return;
                    }
                }
            }
        }
    }
}

/// Consumes progress events until the channel closes. Returns true if the
/// abort flag caused the child to be killed.
fn pump_progress(
    events: &mpsc::Receiver<ProgressEvent>,
    child: &mut Child,
    duration: Option<f64>,
    abort: &AtomicBool,
) -> bool {
    let display = EncodeProgress::new(duration);
    let mut state = ProgressState::new(duration);
    let mut speed = None;
    let mut next_checkpoint = 10.0;

    let aborted = loop {
        if abort.load(Ordering::SeqCst) {
            kill_child(child);
            break true;
        }

        match events.recv_timeout(POLL_INTERVAL) {
            Ok(ProgressEvent::OutTime(secs)) => {
                state.update(secs);
            }
            Ok(ProgressEvent::Speed(s)) => speed = Some(s),
            Ok(ProgressEvent::End) => state.finish(),
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => break false,
        }

        display.update(&state, speed);
        if let Some(percent) = state.percent() {
            if percent >= next_checkpoint {
                log::info!(
                    target: "hevcify::progress",
                    "Progress: {percent:.1}% ({} / {})",
                    format_duration(state.elapsed()),
                    format_duration(state.total().unwrap_or_default())
                );
                next_checkpoint = (percent / 10.0).floor() * 10.0 + 10.0;
            }
        }
    };

    display.finish();
    aborted
}

fn kill_child(child: &mut Child) {
    if let Err(e) = child.kill() {
        // InvalidInput means the process already exited
        if e.kind() != io::ErrorKind::InvalidInput {
            log::warn!("Failed to kill ffmpeg (pid {}): {e}", child.id());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temp_output_path() {
        let path = temp_output_path(
            Path::new("/videos/.video_conversion_temp123"),
            Path::new("/videos/Holiday Clip.MP4"),
            "mkv",
        )
        .unwrap();
        assert_eq!(
            path,
            PathBuf::from("/videos/.video_conversion_temp123/Holiday Clip_temp.mkv")
        );
    }

    #[test]
    fn test_temp_output_path_without_stem() {
        assert!(temp_output_path(Path::new("/ws"), Path::new("/"), "mkv").is_err());
    }

    #[test]
    fn test_for_each_line_survives_invalid_utf8() {
        let data: &[u8] = b"out_time_us=1000000\n\xff\xfe garbage\nprogress=end\n";
        let mut seen = Vec::new();
        for_each_line(data, |line| {
            seen.push(line.trim_end().to_string());
            true
        });
        assert_eq!(seen.len(), 3);
        assert_eq!(seen[0], "out_time_us=1000000");
        assert_eq!(seen[2], "progress=end");
    }

    #[test]
    fn test_for_each_line_stops_when_asked() {
        let data: &[u8] = b"a\nb\nc\n";
        let mut count = 0;
        for_each_line(data, |_| {
            count += 1;
            count < 2
        });
        assert_eq!(count, 2);
    }

    #[test]
    fn test_state_display() {
        assert_eq!(TranscodeState::Running.to_string(), "running");
        assert_eq!(TranscodeState::Failed.to_string(), "failed");
    }

    #[test]
    fn test_outcome_compression() {
        let outcome = TranscodeOutcome {
            temp_path: PathBuf::from("x"),
            original_size: 1_000_000,
            converted_size: 600_000,
            encode_time: Duration::from_secs(1),
        };
        assert!((outcome.compression_percent() - 40.0).abs() < 1e-9);
    }
}
