//! File discovery module for finding video files to process.
//!
//! This module handles the discovery of video files eligible for conversion.
//! Only the top level of the provided directory is searched, and files are
//! matched by extension (case-insensitive) against
//! [`SUPPORTED_EXTENSIONS`](crate::config::SUPPORTED_EXTENSIONS).

use crate::error::{CoreError, CoreResult};
use crate::utils::has_video_extension;

use std::path::{Path, PathBuf};

/// A file found by the directory scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaFile {
    pub path: PathBuf,
    /// Size in bytes at scan time.
    pub size: u64,
    pub is_video: bool,
}

impl MediaFile {
    /// Builds a `MediaFile` from filesystem metadata.
    pub fn from_path(path: &Path) -> CoreResult<Self> {
        let metadata = std::fs::metadata(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            size: metadata.len(),
            is_video: has_video_extension(path),
        })
    }

    /// The file name for display, falling back to the full path.
    #[must_use]
    pub fn display_name(&self) -> String {
        self.path
            .file_name()
            .map_or_else(|| self.path.display().to_string(), |n| n.to_string_lossy().into_owned())
    }
}

/// Finds video files eligible for conversion in the specified directory.
///
/// Regular files with a supported extension are returned sorted by file
/// name. Subdirectories (including the temporary workspace of an earlier
/// interrupted run) are never entered.
///
/// # Arguments
///
/// * `input_dir` - The directory to search for video files
///
/// # Returns
///
/// * `Ok(Vec<MediaFile>)` - The discovered video files
/// * `Err(CoreError::Io)` - If the directory cannot be read
/// * `Err(CoreError::NoFilesFound)` - If no video files are found
///
/// # Examples
///
/// ```rust,no_run
/// use hevcify_core::find_processable_files;
/// use std::path::Path;
///
/// match find_processable_files(Path::new("/path/to/videos")) {
///     Ok(files) => {
///         for file in files {
///             println!("{} ({} bytes)", file.path.display(), file.size);
///         }
///     }
///     Err(e) => println!("Error finding video files: {e}"),
/// }
/// ```
pub fn find_processable_files(input_dir: &Path) -> CoreResult<Vec<MediaFile>> {
    let read_dir = std::fs::read_dir(input_dir)?;
    let mut files: Vec<MediaFile> = read_dir
        .filter_map(|entry| {
            let path = entry.ok()?.path();
            if !path.is_file() || !has_video_extension(&path) {
                return None;
            }
            match MediaFile::from_path(&path) {
                Ok(file) => Some(file),
                Err(e) => {
                    log::warn!("Skipping {}: {e}", path.display());
                    None
                }
            }
        })
        .collect();

    if files.is_empty() {
        return Err(CoreError::NoFilesFound);
    }

    files.sort_by(|a, b| a.path.file_name().cmp(&b.path.file_name()));
    log::debug!("Discovered {} video file(s) in {}", files.len(), input_dir.display());
    Ok(files)
}
