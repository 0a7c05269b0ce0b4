/*!
 * Tests for configuration loading, overrides and validation
 */

use anyhow::Result;
use std::time::Duration;

use subtrans::app_config::{Config, ConfigOverrides, LogLevel, TranslationProvider};
use subtrans::errors::AppError;
use crate::common;

/// Test that a missing file yields defaults and is not created
#[test]
fn test_load_withMissingFile_shouldUseDefaultsWithoutCreatingFile() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("conf.json");

    let config = Config::load(&path)?;

    assert!(!path.exists());
    assert_eq!(config.translation.provider, TranslationProvider::Gemini);
    assert_eq!(config.translation.model, "gemini-2.0-flash");
    assert_eq!(config.translation.common.batch_size, 50);
    assert_eq!(config.translation.common.max_attempts, 3);
    assert_eq!(config.translation.timeout(), Duration::from_secs(120));
    Ok(())
}

/// Test that a partial file keeps defaults for omitted fields
#[test]
fn test_load_withPartialFile_shouldMergeWithDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        temp_dir.path(),
        "conf.json",
        r#"{
            "target_language": "Japanese",
            "translation": { "api_key": "from-file", "common": { "batch_size": 20 } },
            "log_level": "debug"
        }"#,
    )?;

    let config = Config::load(&path)?;

    assert_eq!(config.target_language, "Japanese");
    assert_eq!(config.translation.api_key, "from-file");
    assert_eq!(config.translation.common.batch_size, 20);
    assert_eq!(config.translation.common.max_attempts, 3);
    assert_eq!(config.log_level, LogLevel::Debug);
    assert!(config.validate().is_ok());
    Ok(())
}

/// Test that invalid JSON is a configuration error
#[test]
fn test_load_withInvalidJson_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "conf.json", "{ not json")?;

    assert!(matches!(Config::load(&path), Err(AppError::Configuration(_))));
    Ok(())
}

/// Test that overrides win over file values and leave the rest alone
#[test]
fn test_apply_overrides_withSomeValues_shouldReplaceOnlyThose() -> Result<()> {
    let mut config = common::test_config("French", 10);

    config.apply_overrides(ConfigOverrides {
        provider: Some("Gemini".to_string()),
        target_language: Some("Spanish".to_string()),
        batch_size: Some(25),
        ..Default::default()
    })?;

    assert_eq!(config.target_language, "Spanish");
    assert_eq!(config.translation.common.batch_size, 25);
    assert_eq!(config.translation.api_key, "test-key");
    Ok(())
}

/// Test that only the gemini provider is accepted
#[test]
fn test_apply_overrides_withUnknownProvider_shouldFail() {
    let mut config = common::test_config("French", 10);
    let result = config.apply_overrides(ConfigOverrides {
        provider: Some("openai".to_string()),
        ..Default::default()
    });

    assert!(matches!(result, Err(AppError::Configuration(_))));
}

/// Test that the request interval follows the per-minute limit
#[test]
fn test_min_request_interval_withRateLimit_shouldDivideMinute() {
    let mut config = Config::default();
    assert_eq!(config.translation.min_request_interval(), Duration::from_secs(4));

    config.translation.rate_limit = Some(0);
    assert_eq!(config.translation.min_request_interval(), Duration::ZERO);

    config.translation.rate_limit = None;
    assert_eq!(config.translation.min_request_interval(), Duration::ZERO);
}

/// Test that each required setting is checked
#[test]
fn test_validate_withMissingOrInvalidValues_shouldFail() {
    let cases: Vec<Box<dyn Fn(&mut Config)>> = vec![
        Box::new(|c: &mut Config| c.target_language = "  ".to_string()),
        Box::new(|c: &mut Config| c.target_language = "Portuguese/Brazil".to_string()),
        Box::new(|c: &mut Config| c.target_language = "..\\French".to_string()),
        Box::new(|c: &mut Config| c.target_language = "..".to_string()),
        Box::new(|c: &mut Config| c.translation.api_key.clear()),
        Box::new(|c: &mut Config| c.translation.common.batch_size = 0),
        Box::new(|c: &mut Config| c.translation.common.max_attempts = 0),
        Box::new(|c: &mut Config| c.translation.timeout_secs = 0),
        Box::new(|c: &mut Config| c.translation.endpoint = "not a url".to_string()),
        Box::new(|c: &mut Config| c.translation.common.prompt_template = "Translate {count} lines".to_string()),
    ];

    for (case, mutate) in cases.iter().enumerate() {
        let mut config = common::test_config("French", 10);
        mutate(&mut config);
        assert!(
            matches!(config.validate(), Err(AppError::Configuration(_))),
            "case {} should be rejected",
            case
        );
    }
}

/// Test that free-text language names with spaces and parentheses are accepted
#[test]
fn test_validate_withDescriptiveLanguage_shouldPass() {
    let config = common::test_config("Portuguese (Brazil)", 10);
    assert!(config.validate().is_ok());
}
