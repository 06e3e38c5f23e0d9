//! Core library for batch HEVC conversion using ffmpeg and ffprobe.
//!
//! This crate discovers the videos in a directory, picks the best available
//! HEVC encoder (hardware first, libx265 as the fallback), converts each file
//! into a scratch workspace while streaming ffmpeg's progress, and replaces
//! the original with the converted file.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use hevcify_core::{CoreConfig, process_directory};
//! use std::path::PathBuf;
//! use std::sync::atomic::AtomicBool;
//!
//! let config = CoreConfig::new(PathBuf::from("/path/to/videos"));
//! let abort = AtomicBool::new(false);
//!
//! let summary = process_directory(&config, &abort).unwrap();
//! println!("{} converted, {} failed", summary.succeeded, summary.failed);
//! ```

pub mod batch;
pub mod config;
pub mod discovery;
pub mod encoder;
pub mod error;
pub mod external;
pub mod progress;
pub mod replace;
pub mod temp_files;
pub mod terminal_output;
pub mod transcode;
pub mod utils;

// Re-exports for public API
pub use batch::{
    BatchSummary, ConversionResult, FailureKind, check_toolkit, choose_encoder,
    process_directory, process_files, run_batch,
};
pub use config::CoreConfig;
pub use discovery::{MediaFile, find_processable_files};
pub use encoder::{EncoderAvailability, EncoderId, probe_available_encoders, select_encoder};
pub use error::{CoreError, CoreResult};
pub use progress::{ProgressEvent, ProgressState};
pub use transcode::{TranscodeOutcome, TranscodeState, run_transcode};
pub use utils::{format_bytes, format_duration, parse_ffmpeg_time};
