/*!
 * Tests for file utility functions
 */

use anyhow::Result;
use std::fs;
use std::path::Path;

use subtrans::errors::AppError;
use subtrans::file_utils::{FileManager, InputKind};
use crate::common;

/// Test that file_exists returns true for existing files
#[test]
fn test_file_exists_withExistingFile_shouldReturnTrue() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let test_file = common::create_test_file(temp_dir.path(), "present.tmp", "test content")?;

    assert!(FileManager::file_exists(&test_file));
    assert!(!FileManager::file_exists(temp_dir.path()));
    Ok(())
}

/// Test that file_exists returns false for non-existent files
#[test]
fn test_file_exists_withNonExistentFile_shouldReturnFalse() {
    assert!(!FileManager::file_exists("non_existent_file.tmp"));
}

/// Test that the output lands next to the input with the language suffix
#[test]
fn test_generate_output_path_withValidInputs_shouldCreateSiblingPath() {
    let output_path = FileManager::generate_output_path(Path::new("/tmp/input/video.mkv"), "Spanish", "srt");
    assert_eq!(output_path, Path::new("/tmp/input/video_Spanish.srt"));
}

/// Test that the language is used verbatim, spaces included
#[test]
fn test_generate_output_path_withFreeTextLanguage_shouldUseItVerbatim() {
    let output_path = FileManager::generate_output_path(Path::new("show.s01e01.mp4"), "Brazilian Portuguese", "srt");
    assert_eq!(output_path, Path::new("show.s01e01_Brazilian Portuguese.srt"));
}

/// Test that inputs are classified by extension
#[test]
fn test_detect_input_kind_withKnownExtensions_shouldClassify() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let srt = common::create_test_subtitle(temp_dir.path(), "episode.SRT")?;
    let mkv = common::create_test_file(temp_dir.path(), "episode.mkv", "")?;
    let txt = common::create_test_file(temp_dir.path(), "episode.txt", "")?;

    assert_eq!(FileManager::detect_input_kind(&srt)?, InputKind::Subtitle);
    assert_eq!(FileManager::detect_input_kind(&mkv)?, InputKind::Container);
    assert!(matches!(FileManager::detect_input_kind(&txt), Err(AppError::File(_))));
    Ok(())
}

/// Test that a missing input is reported as a file error
#[test]
fn test_detect_input_kind_withMissingFile_shouldFail() {
    let result = FileManager::detect_input_kind("does/not/exist.mkv");
    assert!(matches!(result, Err(AppError::File(_))));
}

/// Test that read_to_string returns file content correctly
#[test]
fn test_read_to_string_withValidFile_shouldReturnContent() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let test_file = common::create_test_file(temp_dir.path(), "read.txt", "hello\nworld")?;

    assert_eq!(FileManager::read_to_string(&test_file)?, "hello\nworld");
    Ok(())
}

/// Test that an atomic write replaces existing content and leaves no stray files
#[test]
fn test_write_atomically_withExistingFile_shouldReplaceContent() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let target = common::create_test_file(temp_dir.path(), "out.srt", "old")?;

    FileManager::write_atomically(&target, "new content")?;

    assert_eq!(fs::read_to_string(&target)?, "new content");
    assert_eq!(fs::read_dir(temp_dir.path())?.count(), 1);
    Ok(())
}

/// Test that missing parent directories are created
#[test]
fn test_write_atomically_withMissingParent_shouldCreateIt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let target = temp_dir.path().join("a").join("b").join("out.srt");

    FileManager::write_atomically(&target, "x")?;

    assert!(FileManager::file_exists(&target));
    Ok(())
}
