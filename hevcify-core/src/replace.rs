//! In-place replacement of an original file by its converted output.
//!
//! The original is deleted first and the converted file is then moved to
//! `<parent>/<stem>.<target_ext>`. A rename is attempted first; when the
//! workspace and the destination are on different filesystems the move
//! falls back to copy + remove.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{CoreError, CoreResult};

/// Final location of the converted version of `original`.
pub fn final_output_path(original: &Path, target_extension: &str) -> CoreResult<PathBuf> {
    let stem = original
        .file_stem()
        .ok_or_else(|| CoreError::PathError(format!("No file stem in {}", original.display())))?;
    let parent = original.parent().unwrap_or_else(|| Path::new(""));
    let mut name = stem.to_os_string();
    name.push(format!(".{target_extension}"));
    Ok(parent.join(name))
}

/// Checks that writing the converted file will not clobber an unrelated file.
///
/// The destination may exist only when it is the original itself (e.g. an
/// `.mkv` source being re-encoded into `.mkv`).
pub fn ensure_target_free(original: &Path, target_extension: &str) -> CoreResult<PathBuf> {
    let final_path = final_output_path(original, target_extension)?;
    if final_path.exists() && !same_file(&final_path, original) {
        return Err(CoreError::TargetExists(final_path));
    }
    Ok(final_path)
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

/// Replaces `original` with the file at `temp_path`.
///
/// # Returns
///
/// * `Ok(PathBuf)` - the final path of the converted file
/// * `Err(CoreError::Io)` - the original could not be deleted (nothing changed)
/// * `Err(CoreError::ReplaceFailed)` - the original is gone but the converted
///   file is still at `temp_path`
pub fn replace_original(
    original: &Path,
    temp_path: &Path,
    target_extension: &str,
) -> CoreResult<PathBuf> {
    let final_path = final_output_path(original, target_extension)?;

    fs::remove_file(original)?;
    log::debug!("Deleted original {}", original.display());

    move_file(temp_path, &final_path).map_err(|source| {
        log::error!(
            "Original deleted but the converted file could not be moved. Recover it manually: {} -> {} ({source})",
            temp_path.display(),
            final_path.display()
        );
        CoreError::ReplaceFailed {
            temp_path: temp_path.to_path_buf(),
            final_path: final_path.clone(),
            source,
        }
    })?;

    log::debug!("Moved {} -> {}", temp_path.display(), final_path.display());
    Ok(final_path)
}

/// Renames `from` to `to`, copying across filesystems when necessary.
pub fn move_file(from: &Path, to: &Path) -> io::Result<()> {
    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            log::debug!(
                "Rename across filesystems, copying {} -> {}",
                from.display(),
                to.display()
            );
            fs::copy(from, to)?;
            fs::remove_file(from)
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_final_output_path() {
        assert_eq!(
            final_output_path(Path::new("/v/clip.MP4"), "mkv").unwrap(),
            PathBuf::from("/v/clip.mkv")
        );
        assert_eq!(
            final_output_path(Path::new("/v/archive.tar.avi"), "mkv").unwrap(),
            PathBuf::from("/v/archive.tar.mkv")
        );
    }

    #[test]
    fn test_replace_original_moves_output_into_place() {
        let dir = tempdir().unwrap();
        let ws = dir.path().join(".ws");
        fs::create_dir(&ws).unwrap();
        let original = dir.path().join("clip.mp4");
        let temp = ws.join("clip_temp.mkv");
        fs::write(&original, vec![1u8; 100]).unwrap();
        fs::write(&temp, vec![2u8; 60]).unwrap();

        let final_path = replace_original(&original, &temp, "mkv").unwrap();

        assert_eq!(final_path, dir.path().join("clip.mkv"));
        assert!(!original.exists());
        assert!(!temp.exists());
        assert_eq!(fs::metadata(&final_path).unwrap().len(), 60);
    }

    #[test]
    fn test_replace_mkv_source_in_place() {
        let dir = tempdir().unwrap();
        let original = dir.path().join("show.mkv");
        let temp = dir.path().join("show_temp.mkv");
        fs::write(&original, b"old").unwrap();
        fs::write(&temp, b"new").unwrap();

        assert_eq!(ensure_target_free(&original, "mkv").unwrap(), original);
        let final_path = replace_original(&original, &temp, "mkv").unwrap();
        assert_eq!(fs::read(final_path).unwrap(), b"new");
    }

    #[test]
    fn test_ensure_target_free_detects_collision() {
        let dir = tempdir().unwrap();
        let original = dir.path().join("clip.mp4");
        fs::write(&original, b"a").unwrap();
        fs::write(dir.path().join("clip.mkv"), b"b").unwrap();

        let err = ensure_target_free(&original, "mkv").unwrap_err();
        assert!(matches!(err, CoreError::TargetExists(_)));
    }

    #[test]
    fn test_replace_failed_after_delete() {
        let dir = tempdir().unwrap();
        let original = dir.path().join("clip.mp4");
        fs::write(&original, b"a").unwrap();
        let missing_temp = dir.path().join("nowhere_temp.mkv");

        let err = replace_original(&original, &missing_temp, "mkv").unwrap_err();
        match err {
            CoreError::ReplaceFailed {
                temp_path,
                final_path,
                ..
            } => {
                assert_eq!(temp_path, missing_temp);
                assert_eq!(final_path, dir.path().join("clip.mkv"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(!original.exists());
    }

    #[test]
    fn test_replace_keeps_original_when_delete_fails() {
        let dir = tempdir().unwrap();
        let original = dir.path().join("gone.mp4");
        let temp = dir.path().join("gone_temp.mkv");
        fs::write(&temp, b"x").unwrap();

        let err = replace_original(&original, &temp, "mkv").unwrap_err();
        assert!(matches!(err, CoreError::Io(_)));
        assert!(temp.exists());
    }
}
