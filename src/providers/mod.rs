/*!
 * Provider implementations for the remote text service.
 *
 * This module contains client implementations for generative-text providers:
 * - Gemini: Google Generative Language API
 * - Mock: deterministic stand-in used by tests
 */

use async_trait::async_trait;
use std::fmt::Debug;
use std::sync::Arc;

use crate::app_config::{TranslationConfig, TranslationProvider};
use crate::errors::{AppError, ProviderError};

/// Common trait for all text providers
///
/// The translation pipeline only needs a prompt in and plain text out; model
/// selection and credentials live inside each implementation.
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// Send a prompt and return the raw response text
    ///
    /// # Arguments
    /// * `prompt` - The complete prompt to send
    ///
    /// # Returns
    /// * `Result<String, ProviderError>` - The response text or an error
    async fn complete(&self, prompt: &str) -> Result<String, ProviderError>;

    /// Human readable provider and model name, used in logs
    fn describe(&self) -> String;
}

/// Build the configured provider
pub fn create_provider(config: &TranslationConfig) -> Result<Arc<dyn Provider>, AppError> {
    match config.provider {
        TranslationProvider::Gemini => {
            let client = gemini::Gemini::from_config(config)?;
            Ok(Arc::new(client))
        }
    }
}

pub mod gemini;
pub mod mock;
