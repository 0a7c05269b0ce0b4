/*!
 * Tests for error types and conversions
 */

use subtrans::errors::{AppError, ProviderError, SubtitleError, TranslationError};

/// Test that only response-shape problems are retryable
#[test]
fn test_is_transient_withEachVariant_shouldOnlyMarkResponseProblems() {
    assert!(TranslationError::MalformedResponse("x".to_string()).is_transient());
    assert!(TranslationError::LengthMismatch { expected: 2, actual: 3 }.is_transient());

    assert!(!TranslationError::Provider(ProviderError::Timeout("slow".to_string())).is_transient());
    assert!(!TranslationError::Misaligned("x".to_string()).is_transient());
    assert!(!TranslationError::RetriesExhausted { attempts: 3, last_reason: "x".to_string() }.is_transient());
}

/// Test that nested errors convert into the application error
#[test]
fn test_from_conversions_withNestedErrors_shouldWrap() {
    let app: AppError = TranslationError::from(SubtitleError::InvalidBatchSize(0)).into();
    assert!(matches!(app, AppError::Translation(TranslationError::Subtitle(_))));

    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
    assert!(matches!(AppError::from(io), AppError::File(_)));
}

/// Test that messages carry the details needed to diagnose a failure
#[test]
fn test_display_withDetails_shouldIncludeThem() {
    let mismatch = TranslationError::LengthMismatch { expected: 50, actual: 49 };
    assert_eq!(mismatch.to_string(), "Length mismatch: expected 50 translations, got 49");

    let api = ProviderError::ApiError { status_code: 503, message: "overloaded".to_string() };
    assert_eq!(api.to_string(), "API responded with error: 503 - overloaded");
}
