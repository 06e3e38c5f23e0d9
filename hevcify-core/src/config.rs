//! Configuration structures and constants for the hevcify-core library.
//!
//! `CoreConfig` is created by the consumer of the library (hevcify-cli) and
//! passed to [`crate::batch::run_batch`]. Only the input directory is
//! required; everything else has a default that mirrors the stock behavior
//! of the tool.

use std::path::PathBuf;

use crate::encoder::EncoderId;
use crate::error::{CoreError, CoreResult};

// Default constants

/// Container extension of the converted files.
pub const DEFAULT_TARGET_EXTENSION: &str = "mkv";

/// Prefix of the scratch directory created inside the input directory.
pub const DEFAULT_TEMP_DIR_PREFIX: &str = ".video_conversion_temp";

/// Maximum number of stderr characters kept in failure reports.
pub const DEFAULT_STDERR_EXCERPT_LEN: usize = 200;

/// Default program names, resolved through `PATH`.
pub const DEFAULT_FFMPEG: &str = "ffmpeg";
pub const DEFAULT_FFPROBE: &str = "ffprobe";

/// Input extensions accepted by the directory scan (compared case-insensitively).
pub const SUPPORTED_EXTENSIONS: &[&str] = &[
    "mp4", "mkv", "avi", "mov", "flv", "wmv", "webm", "m4v", "mpg", "mpeg",
];

/// Main configuration structure for the hevcify-core library.
///
/// # Examples
///
/// ```rust
/// use hevcify_core::CoreConfig;
/// use std::path::PathBuf;
///
/// let mut config = CoreConfig::new(PathBuf::from("/videos"));
/// config.ffmpeg_path = PathBuf::from("/opt/ffmpeg/bin/ffmpeg");
/// assert_eq!(config.target_extension, "mkv");
/// ```
#[derive(Debug, Clone)]
pub struct CoreConfig {
    /// Directory whose top-level video files are converted in place
    pub input_dir: PathBuf,

    /// ffmpeg executable (name looked up in PATH, or an explicit path)
    pub ffmpeg_path: PathBuf,

    /// ffprobe executable
    pub ffprobe_path: PathBuf,

    /// Extension (without dot) of the converted output
    pub target_extension: String,

    /// Prefix of the per-run temporary workspace directory
    pub temp_dir_prefix: String,

    /// Bound on the stderr text included in failure messages
    pub stderr_excerpt_len: usize,

    /// Encoder chosen by the user, bypassing priority selection
    pub forced_encoder: Option<EncoderId>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("."),
            ffmpeg_path: PathBuf::from(DEFAULT_FFMPEG),
            ffprobe_path: PathBuf::from(DEFAULT_FFPROBE),
            target_extension: DEFAULT_TARGET_EXTENSION.to_string(),
            temp_dir_prefix: DEFAULT_TEMP_DIR_PREFIX.to_string(),
            stderr_excerpt_len: DEFAULT_STDERR_EXCERPT_LEN,
            forced_encoder: None,
        }
    }
}

impl CoreConfig {
    /// Creates a configuration for `input_dir` with default settings.
    #[must_use]
    pub fn new(input_dir: PathBuf) -> Self {
        Self {
            input_dir,
            ..Self::default()
        }
    }

    /// Checks the configuration for values that would break a run.
    pub fn validate(&self) -> CoreResult<()> {
        if !self.input_dir.is_dir() {
            return Err(CoreError::Config(format!(
                "input directory does not exist: {}",
                self.input_dir.display()
            )));
        }

        if self.target_extension.is_empty()
            || !self
                .target_extension
                .chars()
                .all(|c| c.is_ascii_alphanumeric())
        {
            return Err(CoreError::Config(format!(
                "target extension must be non-empty and alphanumeric, got '{}'",
                self.target_extension
            )));
        }

        if self.temp_dir_prefix.is_empty() || self.temp_dir_prefix.contains(['/', '\\']) {
            return Err(CoreError::Config(format!(
                "temporary directory prefix must be a plain name, got '{}'",
                self.temp_dir_prefix
            )));
        }

        if self.stderr_excerpt_len == 0 {
            return Err(CoreError::Config(
                "stderr excerpt length must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}
