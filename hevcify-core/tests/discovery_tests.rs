// hevcify-core/tests/discovery_tests.rs

use hevcify_core::discovery::find_processable_files;
use hevcify_core::error::CoreError;
use std::fs::{self, File};
use std::path::PathBuf;
use tempfile::tempdir;

#[test]
fn test_find_processable_files() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let input_dir = dir.path();

    fs::write(input_dir.join("b_video.mp4"), vec![0u8; 2048])?;
    File::create(input_dir.join("a_video.MKV"))?; // Case insensitivity
    File::create(input_dir.join("c_clip.webm"))?;
    File::create(input_dir.join("document.txt"))?;
    File::create(input_dir.join("image.jpg"))?;
    fs::create_dir(input_dir.join("subdir"))?;
    File::create(input_dir.join("subdir").join("nested_video.mp4"))?; // Not searched

    let files = find_processable_files(input_dir)?;

    let names: Vec<String> = files.iter().map(|f| f.display_name()).collect();
    assert_eq!(names, ["a_video.MKV", "b_video.mp4", "c_clip.webm"]);
    assert_eq!(files[1].size, 2048);
    assert!(files.iter().all(|f| f.is_video));

    dir.close()?;
    Ok(())
}

#[test]
fn test_find_processable_files_ignores_directories_with_video_names() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    fs::create_dir(dir.path().join("folder.mp4"))?;
    File::create(dir.path().join("real.mov"))?;

    let files = find_processable_files(dir.path())?;
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].display_name(), "real.mov");
    Ok(())
}

#[test]
fn test_find_processable_files_empty() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let input_dir = dir.path();

    File::create(input_dir.join("document.txt"))?;
    fs::create_dir(input_dir.join("subdir"))?;

    match find_processable_files(input_dir) {
        Err(CoreError::NoFilesFound) => {}
        other => panic!("Unexpected result: {other:?}"),
    }

    dir.close()?;
    Ok(())
}

#[test]
fn test_find_processable_files_nonexistent_dir() {
    let non_existent_path = PathBuf::from("surely_this_does_not_exist_42_integration");
    let result = find_processable_files(&non_existent_path);
    assert!(matches!(result, Err(CoreError::Io(_))));
}
