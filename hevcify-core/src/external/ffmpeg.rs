//! ffmpeg command construction for the main transcode.
//!
//! The argument list is the encoder profile plus fixed structural flags:
//! one video and one audio stream mapped explicitly, machine-readable
//! progress on stdout, and forced overwrite of a stale temp file.

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::encoder::EncoderProfile;

/// A fully assembled ffmpeg invocation.
#[derive(Debug, Clone)]
pub struct TranscodeCommand {
    pub program: PathBuf,
    pub args: Vec<OsString>,
}

impl TranscodeCommand {
    #[must_use]
    pub fn new(program: &Path, input: &Path, output: &Path, profile: &EncoderProfile) -> Self {
        Self {
            program: program.to_path_buf(),
            args: build_transcode_args(input, output, profile),
        }
    }

    /// A `Command` with stdout and stderr piped and stdin closed.
    #[must_use]
    pub fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        cmd
    }
}

impl fmt::Display for TranscodeCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            let arg = arg.to_string_lossy();
            if arg.contains(char::is_whitespace) {
                write!(f, " \"{arg}\"")?;
            } else {
                write!(f, " {arg}")?;
            }
        }
        Ok(())
    }
}

#[rustfmt::skip]
const OUTPUT_ARGS: &[&str] = &[
    "-map", "0:v:0",
    "-map", "0:a:0?",
    "-progress", "pipe:1",
    "-nostats",
    "-y",
];

/// Builds the ffmpeg arguments for transcoding `input` into `output`.
///
/// The audio map is optional (`0:a:0?`) so video-only sources still encode.
#[must_use]
pub fn build_transcode_args(input: &Path, output: &Path, profile: &EncoderProfile) -> Vec<OsString> {
    let mut args: Vec<OsString> = ["-hide_banner", "-nostdin", "-i"]
        .into_iter()
        .map(OsString::from)
        .collect();
    args.push(input.as_os_str().to_os_string());

    args.extend(profile.codec_args().map(OsString::from));

    args.extend(OUTPUT_ARGS.iter().copied().map(OsString::from));

    args.push(output.as_os_str().to_os_string());
    args
}
