/*!
 * Error types for the subtrans application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors that can occur when working with provider APIs
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The request did not complete within the configured timeout
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),
}

/// Errors that can occur during subtitle processing
#[derive(Error, Debug)]
pub enum SubtitleError {
    /// The input did not contain a single recognizable block
    #[error("No subtitle entries found in {0}")]
    NoEntries(String),

    /// Batches must hold at least one entry
    #[error("Invalid batch size: {0} (must be at least 1)")]
    InvalidBatchSize(usize),
}

/// Errors that can occur during translation
#[derive(Error, Debug)]
pub enum TranslationError {
    /// Error from the provider API; never retried
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// The response held no parseable JSON array of strings
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// The response array did not match the batch length
    #[error("Length mismatch: expected {expected} translations, got {actual}")]
    LengthMismatch {
        /// Number of texts in the batch
        expected: usize,
        /// Number of strings in the response
        actual: usize,
    },

    /// Every attempt produced an unusable response
    #[error("Translation failed after {attempts} attempts: {last_reason}")]
    RetriesExhausted {
        /// Number of attempts made
        attempts: u32,
        /// Reason the final attempt was rejected
        last_reason: String,
    },

    /// Translated batches did not line up with the parsed entries
    #[error("Reassembly misaligned: {0}")]
    Misaligned(String),

    /// Batch texts could not be encoded into the request
    #[error("Failed to encode batch: {0}")]
    Encoding(#[from] serde_json::Error),

    /// Error with subtitle processing
    #[error("Subtitle error: {0}")]
    Subtitle(#[from] SubtitleError),
}

impl TranslationError {
    /// Whether this error may be cured by asking the provider again
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::MalformedResponse(_) | Self::LengthMismatch { .. })
    }
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Invalid or missing configuration
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The subtitle track could not be listed or extracted
    #[error("Extraction error: {0}")]
    Extraction(String),

    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// The translated output could not be written
    #[error("Write error: {0}")]
    Write(String),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from subtitle processing
    #[error("Subtitle error: {0}")]
    Subtitle(#[from] SubtitleError),

    /// Error from translation
    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
