use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use crate::errors::AppError;
use crate::subtitle_processor::SUBTITLE_EXTENSION;

// @module: File and path utilities

/// Container formats ffmpeg can demux subtitle streams from
const CONTAINER_EXTENSIONS: &[&str] = &["mkv", "mp4", "m4v", "mov", "avi", "webm", "ts"];

/// Kind of input the pipeline was started with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// Plain block-format subtitle file, no extraction needed
    Subtitle,
    /// Media container holding subtitle streams
    Container,
}

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @classifies: Input by extension
    pub fn detect_input_kind<P: AsRef<Path>>(path: P) -> Result<InputKind, AppError> {
        let path = path.as_ref();
        if !Self::file_exists(path) {
            return Err(AppError::File(format!("Input file does not exist: {}", path.display())));
        }

        let extension = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        if extension == SUBTITLE_EXTENSION {
            Ok(InputKind::Subtitle)
        } else if CONTAINER_EXTENSIONS.contains(&extension.as_str()) {
            Ok(InputKind::Container)
        } else {
            Err(AppError::File(format!(
                "Unsupported input '{}': expected .{} or one of {}",
                path.display(),
                SUBTITLE_EXTENSION,
                CONTAINER_EXTENSIONS.join(", ")
            )))
        }
    }

    // @generates: Output path for translated subtitle, next to the input
    // @params: input_file, target_language, extension
    pub fn generate_output_path<P: AsRef<Path>>(
        input_file: P,
        target_language: &str,
        extension: &str,
    ) -> PathBuf {
        let input_file = input_file.as_ref();
        let stem = input_file.file_stem().unwrap_or_default().to_string_lossy();
        let output_filename = format!("{}_{}.{}", stem, target_language, extension);

        match input_file.parent() {
            Some(parent) => parent.join(output_filename),
            None => PathBuf::from(output_filename),
        }
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String, AppError> {
        fs::read_to_string(&path)
            .map_err(|e| AppError::File(format!("Failed to read file {:?}: {}", path.as_ref(), e)))
    }

    /// Write a string through a temporary sibling file, then rename it into place
    pub fn write_atomically<P: AsRef<Path>>(path: P, content: &str) -> Result<(), AppError> {
        let path = path.as_ref();
        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let write_err = |e: std::io::Error| {
            AppError::Write(format!("Failed to write {}: {}", path.display(), e))
        };

        fs::create_dir_all(&parent).map_err(write_err)?;
        let mut temp = NamedTempFile::new_in(&parent).map_err(write_err)?;
        temp.write_all(content.as_bytes()).map_err(write_err)?;
        temp.flush().map_err(write_err)?;
        temp.persist(path).map_err(|e| write_err(e.error))?;

        Ok(())
    }
}
