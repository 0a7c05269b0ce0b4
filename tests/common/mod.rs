/*!
 * Common test utilities for the subtrans test suite
 */

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use subtrans::app_config::Config;

/// Sample subtitle file with three entries
pub const SAMPLE_SRT: &str = "1
00:00:01,000 --> 00:00:04,000
This is a test subtitle.

2
00:00:05,000 --> 00:00:09,000
It contains multiple entries.

3
00:00:10,000 --> 00:00:14,000
For testing purposes.
";

/// Route library logs through env_logger, once per test binary
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Creates a sample subtitle file for testing
pub fn create_test_subtitle(dir: &Path, filename: &str) -> Result<PathBuf> {
    create_test_file(dir, filename, SAMPLE_SRT)
}

/// A valid configuration that never waits between requests
pub fn test_config(target_language: &str, batch_size: usize) -> Config {
    let mut config = Config::default();
    config.target_language = target_language.to_string();
    config.translation.api_key = "test-key".to_string();
    config.translation.rate_limit = Some(0);
    config.translation.common.batch_size = batch_size;
    config
}
