use async_trait::async_trait;
use log::{debug, error};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use url::Url;

use crate::app_config::TranslationConfig;
use crate::errors::{AppError, ProviderError};
use crate::providers::Provider;

/// Gemini client for interacting with the Generative Language API
pub struct Gemini {
    /// HTTP client for API requests
    client: Client,
    /// API key for authentication
    api_key: String,
    /// Model identifier, e.g. "gemini-2.0-flash"
    model: String,
    /// Base endpoint URL
    endpoint: Url,
}

// Keeps the API key out of logs
impl fmt::Debug for Gemini {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gemini")
            .field("model", &self.model)
            .field("endpoint", &self.endpoint.as_str())
            .finish_non_exhaustive()
    }
}

/// generateContent request
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiRequest {
    /// The conversation contents
    contents: Vec<GeminiContent>,

    /// Sampling parameters
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

/// A single turn of content
#[derive(Debug, Serialize, Deserialize)]
pub struct GeminiContent {
    /// Role of the author (user, model)
    #[serde(default)]
    pub role: String,

    /// Content parts
    #[serde(default)]
    pub parts: Vec<GeminiPart>,
}

/// Text part of a content turn
#[derive(Debug, Serialize, Deserialize)]
pub struct GeminiPart {
    /// Part text
    #[serde(default)]
    pub text: String,
}

/// Generation parameters
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    /// Temperature for generation
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

/// generateContent response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiResponse {
    /// Candidate completions
    #[serde(default)]
    pub candidates: Vec<GeminiCandidate>,

    /// Token usage information
    #[serde(default)]
    pub usage_metadata: Option<UsageMetadata>,
}

/// One candidate completion
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiCandidate {
    /// Candidate content; absent when the candidate was blocked
    #[serde(default)]
    pub content: Option<GeminiContent>,

    /// Why generation stopped
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Token usage information
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    /// Number of input tokens
    #[serde(default)]
    pub prompt_token_count: u32,
    /// Number of output tokens
    #[serde(default)]
    pub candidates_token_count: u32,
}

impl GeminiRequest {
    /// Create a single-turn user request
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            contents: vec![GeminiContent {
                role: "user".to_string(),
                parts: vec![GeminiPart { text: prompt.into() }],
            }],
            generation_config: None,
        }
    }

    /// Set the temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.generation_config = Some(GenerationConfig {
            temperature: Some(temperature),
        });
        self
    }
}

impl Gemini {
    /// Create a new Gemini client
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        endpoint: &str,
        timeout: Duration,
    ) -> Result<Self, AppError> {
        let endpoint = Url::parse(endpoint)
            .map_err(|e| AppError::Configuration(format!("Invalid Gemini endpoint '{}': {}", endpoint, e)))?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            model: model.into(),
            endpoint,
        })
    }

    /// Create a client from the translation settings
    pub fn from_config(config: &TranslationConfig) -> Result<Self, AppError> {
        Self::new(&config.api_key, &config.model, &config.endpoint, config.timeout())
    }

    fn generate_url(&self) -> Result<Url, ProviderError> {
        let path = format!("v1beta/models/{}:generateContent", self.model);
        self.endpoint
            .join(&path)
            .map_err(|e| ProviderError::RequestFailed(format!("Invalid request URL: {}", e)))
    }

    /// Send a generateContent request
    pub async fn generate(&self, request: &GeminiRequest) -> Result<GeminiResponse, ProviderError> {
        let url = self.generate_url()?;

        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout(e.to_string())
                } else if e.is_connect() {
                    ProviderError::ConnectionError(e.to_string())
                } else {
                    ProviderError::RequestFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("Gemini API error ({}): {}", status, error_text);
            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    ProviderError::AuthenticationError(error_text)
                }
                StatusCode::TOO_MANY_REQUESTS => ProviderError::RateLimitExceeded(error_text),
                _ => ProviderError::ApiError {
                    status_code: status.as_u16(),
                    message: error_text,
                },
            });
        }

        let gemini_response = response
            .json::<GeminiResponse>()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;

        if let Some(usage) = &gemini_response.usage_metadata {
            debug!(
                "Gemini usage: {} prompt tokens, {} completion tokens",
                usage.prompt_token_count, usage.candidates_token_count
            );
        }

        Ok(gemini_response)
    }

    /// Extract text from the first candidate
    pub fn extract_text_from_response(response: &GeminiResponse) -> String {
        response
            .candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| content.parts.iter().map(|p| p.text.as_str()).collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Provider for Gemini {
    async fn complete(&self, prompt: &str) -> Result<String, ProviderError> {
        let request = GeminiRequest::new(prompt);
        let response = self.generate(&request).await?;
        Ok(Self::extract_text_from_response(&response))
    }

    fn describe(&self) -> String {
        format!("Gemini ({})", self.model)
    }
}
