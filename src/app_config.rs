use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;
use url::Url;

use crate::errors::AppError;
use crate::translation::prompts::PromptTemplate;

/// Application configuration module
/// This module handles the application configuration including loading,
/// overriding and validating configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Target language, inserted verbatim into the prompt and the output filename
    #[serde(default)]
    pub target_language: String,

    /// Translation config
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Translation provider type
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranslationProvider {
    // @provider: Google Gemini
    #[default]
    Gemini,
}

impl TranslationProvider {
    // @returns: Capitalized provider name
    pub fn display_name(&self) -> &str {
        match self {
            Self::Gemini => "Gemini",
        }
    }

    // @returns: Lowercase provider identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::Gemini => "gemini".to_string(),
        }
    }
}

impl std::fmt::Display for TranslationProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

impl std::str::FromStr for TranslationProvider {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gemini" => Ok(Self::Gemini),
            _ => Err(AppError::Configuration(format!(
                "Unsupported provider '{}' (supported: gemini)",
                s
            ))),
        }
    }
}

/// Translation service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationConfig {
    /// Translation provider to use
    #[serde(default)]
    pub provider: TranslationProvider,

    /// Model name
    #[serde(default = "default_gemini_model")]
    pub model: String,

    /// API key for the service
    #[serde(default)]
    pub api_key: String,

    /// Service endpoint URL
    #[serde(default = "default_gemini_endpoint")]
    pub endpoint: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Rate limit in requests per minute
    ///
    /// The default of 15 matches the free Gemini tier. None or 0 disables
    /// client-side pacing.
    #[serde(default = "default_gemini_rate_limit")]
    pub rate_limit: Option<u32>,

    /// Common translation settings
    #[serde(default)]
    pub common: TranslationCommonConfig,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            provider: TranslationProvider::default(),
            model: default_gemini_model(),
            api_key: String::new(),
            endpoint: default_gemini_endpoint(),
            timeout_secs: default_timeout_secs(),
            rate_limit: default_gemini_rate_limit(),
            common: TranslationCommonConfig::default(),
        }
    }
}

impl TranslationConfig {
    /// Minimum wall-clock gap between two outgoing requests
    pub fn min_request_interval(&self) -> Duration {
        match self.rate_limit {
            Some(rpm) if rpm > 0 => Duration::from_millis(60_000 / rpm as u64),
            _ => Duration::ZERO,
        }
    }

    /// Request timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Settings shared by every provider
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationCommonConfig {
    /// Number of subtitle texts sent in one request
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Total attempts per batch before the run is aborted
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Prompt template
    /// Placeholders: {target_language}, {count}, {entries}
    #[serde(default = "default_prompt_template")]
    pub prompt_template: String,

    /// Remove inline override tags such as `{\an8}` before translating
    #[serde(default = "default_true")]
    pub strip_formatting_tags: bool,
}

impl Default for TranslationCommonConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            max_attempts: default_max_attempts(),
            prompt_template: default_prompt_template(),
            strip_formatting_tags: true,
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Values supplied on the command line or through the environment.
/// `None` leaves the loaded value untouched.
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    pub provider: Option<String>,
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub target_language: Option<String>,
    pub batch_size: Option<usize>,
    pub timeout_secs: Option<u64>,
    pub rate_limit: Option<u32>,
    pub max_attempts: Option<u32>,
    pub log_level: Option<LogLevel>,
}

fn default_batch_size() -> usize {
    50
}

fn default_max_attempts() -> u32 {
    3
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_true() -> bool {
    true
}

fn default_gemini_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_gemini_endpoint() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_gemini_rate_limit() -> Option<u32> {
    Some(15)
}

fn default_prompt_template() -> String {
    PromptTemplate::BATCH_TRANSLATION.to_string()
}

impl Config {
    /// Load a configuration file, falling back to defaults when it does not exist
    pub fn load(path: &Path) -> Result<Self, AppError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let file = File::open(path).map_err(|e| {
            AppError::Configuration(format!("Failed to open config file {}: {}", path.display(), e))
        })?;

        serde_json::from_reader(BufReader::new(file)).map_err(|e| {
            AppError::Configuration(format!("Failed to parse config file {}: {}", path.display(), e))
        })
    }

    /// Apply command line and environment overrides on top of the loaded values
    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) -> Result<(), AppError> {
        if let Some(provider) = overrides.provider {
            self.translation.provider = provider.parse()?;
        }
        if let Some(api_key) = overrides.api_key {
            self.translation.api_key = api_key;
        }
        if let Some(model) = overrides.model {
            self.translation.model = model;
        }
        if let Some(language) = overrides.target_language {
            self.target_language = language;
        }
        if let Some(batch_size) = overrides.batch_size {
            self.translation.common.batch_size = batch_size;
        }
        if let Some(timeout_secs) = overrides.timeout_secs {
            self.translation.timeout_secs = timeout_secs;
        }
        if let Some(rate_limit) = overrides.rate_limit {
            self.translation.rate_limit = Some(rate_limit);
        }
        if let Some(max_attempts) = overrides.max_attempts {
            self.translation.common.max_attempts = max_attempts;
        }
        if let Some(log_level) = overrides.log_level {
            self.log_level = log_level;
        }
        Ok(())
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<(), AppError> {
        if self.target_language.trim().is_empty() {
            return Err(AppError::Configuration("Target language is required".to_string()));
        }
        // The language becomes part of the output filename
        if self.target_language.contains(['/', '\\', '\0']) || matches!(self.target_language.trim(), "." | "..") {
            return Err(AppError::Configuration(format!(
                "Target language '{}' cannot be used in a file name",
                self.target_language
            )));
        }

        let translation = &self.translation;
        if translation.api_key.trim().is_empty() {
            return Err(AppError::Configuration(format!(
                "API key is required for {} provider",
                translation.provider.display_name()
            )));
        }
        if translation.model.trim().is_empty() {
            return Err(AppError::Configuration("Model name cannot be empty".to_string()));
        }
        Url::parse(&translation.endpoint).map_err(|e| {
            AppError::Configuration(format!("Invalid endpoint '{}': {}", translation.endpoint, e))
        })?;
        if translation.timeout_secs == 0 {
            return Err(AppError::Configuration("Timeout must be at least 1 second".to_string()));
        }

        let common = &translation.common;
        if common.batch_size == 0 {
            return Err(AppError::Configuration("Batch size must be at least 1".to_string()));
        }
        if common.max_attempts == 0 {
            return Err(AppError::Configuration("Max attempts must be at least 1".to_string()));
        }
        if !common.prompt_template.contains("{entries}") {
            return Err(AppError::Configuration(
                "Prompt template must contain the {entries} placeholder".to_string(),
            ));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            target_language: String::new(),
            translation: TranslationConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
