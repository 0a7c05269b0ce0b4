/*!
 * Core translation service implementation.
 *
 * `TranslationService` turns one batch of subtitle texts into the same number
 * of translated strings. Each attempt waits for rate-limiter clearance, sends
 * the prompt and classifies the result as accepted, retryable or terminal.
 */

use log::{debug, error, warn};
use std::sync::Arc;

use crate::app_config::Config;
use crate::errors::TranslationError;
use crate::providers::Provider;

use super::prompts::PromptTemplate;
use super::rate_limiter::RateLimiter;
use super::response::validate_translations;

/// Result of a single request attempt
#[derive(Debug)]
pub enum AttemptOutcome {
    /// Length-matched translations
    Accepted(Vec<String>),
    /// Unusable response; the same request may be sent again
    Retryable(TranslationError),
    /// The call itself failed; the run must stop
    Terminal(TranslationError),
}

/// Translation client bound to one provider and one target language
#[derive(Debug, Clone)]
pub struct TranslationService {
    /// Remote text service
    provider: Arc<dyn Provider>,
    /// Shared request pacing
    rate_limiter: Arc<RateLimiter>,
    /// Prompt used for every batch
    prompt: PromptTemplate,
    /// Target language, verbatim
    target_language: String,
    /// Total attempts per batch
    max_attempts: u32,
}

impl TranslationService {
    /// Create a new translation service with the default prompt
    pub fn new(
        provider: Arc<dyn Provider>,
        rate_limiter: Arc<RateLimiter>,
        target_language: impl Into<String>,
        max_attempts: u32,
    ) -> Self {
        Self {
            provider,
            rate_limiter,
            prompt: PromptTemplate::default(),
            target_language: target_language.into(),
            max_attempts: max_attempts.max(1),
        }
    }

    /// Create a service from the application configuration
    pub fn from_config(config: &Config, provider: Arc<dyn Provider>) -> Self {
        let rate_limiter = Arc::new(RateLimiter::new(config.translation.min_request_interval()));
        Self::new(
            provider,
            rate_limiter,
            &config.target_language,
            config.translation.common.max_attempts,
        )
        .with_prompt_template(PromptTemplate::new(&config.translation.common.prompt_template))
    }

    /// Replace the prompt template
    pub fn with_prompt_template(mut self, prompt: PromptTemplate) -> Self {
        self.prompt = prompt;
        self
    }

    /// Target language used in prompts
    pub fn target_language(&self) -> &str {
        &self.target_language
    }

    /// Total attempts per batch
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Translate one batch, retrying malformed or mismatched responses.
    ///
    /// Returns exactly one string per input text, in input order, or an error
    /// once the provider call fails or every attempt was rejected.
    pub async fn translate_batch(&self, batch: &[String]) -> Result<Vec<String>, TranslationError> {
        if batch.is_empty() {
            return Ok(Vec::new());
        }

        let prompt = self.prompt.render(&self.target_language, batch)?;
        let mut last_reason = String::new();

        for attempt in 1..=self.max_attempts {
            debug!("Sending batch of {} texts (attempt {}/{})", batch.len(), attempt, self.max_attempts);

            match self.attempt(&prompt, batch.len()).await {
                AttemptOutcome::Accepted(translations) => return Ok(translations),
                AttemptOutcome::Retryable(reason) => {
                    warn!("Attempt {}/{} rejected: {}", attempt, self.max_attempts, reason);
                    last_reason = reason.to_string();
                }
                AttemptOutcome::Terminal(reason) => {
                    error!("Translation request failed: {}", reason);
                    return Err(reason);
                }
            }
        }

        error!("Giving up on batch after {} attempts", self.max_attempts);
        Err(TranslationError::RetriesExhausted {
            attempts: self.max_attempts,
            last_reason,
        })
    }

    /// Run one request attempt and classify its result
    pub async fn attempt(&self, prompt: &str, expected: usize) -> AttemptOutcome {
        self.rate_limiter.wait_for_clearance().await;

        let response = match self.provider.complete(prompt).await {
            Ok(response) => response,
            Err(e) => return AttemptOutcome::Terminal(TranslationError::Provider(e)),
        };

        match validate_translations(&response, expected) {
            Ok(translations) => AttemptOutcome::Accepted(translations),
            Err(e) if e.is_transient() => AttemptOutcome::Retryable(e),
            Err(e) => AttemptOutcome::Terminal(e),
        }
    }
}
