/*!
 * # subtrans - subtitle batch translation
 *
 * A Rust library for translating a subtitle track with a generative text
 * service.
 *
 * ## Features
 *
 * - Extract a text subtitle track from a media container with ffmpeg
 * - Parse block-format (SRT) subtitles without touching sequence numbers or timelines
 * - Translate entries in fixed-size batches through Gemini
 * - Pace requests with a minimum interval between calls
 * - Retry malformed or misaligned responses a bounded number of times
 * - Write the translated file atomically next to the input
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `subtitle_processor`: Subtitle parsing and serialization
 * - `translation`: Batching, rate limiting, retries and reassembly:
 *   - `translation::core`: Translation client with the retry loop
 *   - `translation::batch`: Batch splitting and sequential processing
 *   - `translation::rate_limiter`: Minimum spacing between requests
 *   - `translation::reassembly`: Merging translations back into entries
 * - `media`: ffprobe/ffmpeg track listing and extraction
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `providers`: Text service clients:
 *   - `providers::gemini`: Gemini API client
 *   - `providers::mock`: Scripted provider for tests
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod file_utils;
pub mod media;
pub mod providers;
pub mod subtitle_processor;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use subtitle_processor::{SubtitleCollection, SubtitleEntry};
pub use translation::TranslationService;
pub use errors::{AppError, ProviderError, SubtitleError, TranslationError};
