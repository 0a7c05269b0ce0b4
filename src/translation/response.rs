/*!
 * Extraction and validation of model responses.
 *
 * Models tend to wrap the requested JSON array in prose or code fences, so the
 * array is taken from the first `[` to the last `]` of the response.
 */

use crate::errors::TranslationError;

/// Parse the JSON array of strings enclosed by the first `[` and the last `]`
pub fn extract_json_array(response: &str) -> Result<Vec<String>, TranslationError> {
    let (start, end) = match (response.find('['), response.rfind(']')) {
        (Some(start), Some(end)) if start < end => (start, end),
        _ => {
            return Err(TranslationError::MalformedResponse(format!(
                "no JSON array found in response: {}",
                preview(response)
            )));
        }
    };

    serde_json::from_str::<Vec<String>>(&response[start..=end]).map_err(|e| {
        TranslationError::MalformedResponse(format!("invalid JSON array ({}): {}", e, preview(response)))
    })
}

/// Extract the array and check it has one translation per input text
pub fn validate_translations(response: &str, expected: usize) -> Result<Vec<String>, TranslationError> {
    let translations = extract_json_array(response)?;
    if translations.len() != expected {
        return Err(TranslationError::LengthMismatch {
            expected,
            actual: translations.len(),
        });
    }
    Ok(translations)
}

/// First 200 characters of a response, for error messages
fn preview(response: &str) -> String {
    const LIMIT: usize = 200;
    if response.chars().count() > LIMIT {
        format!("{}...", response.chars().take(LIMIT).collect::<String>())
    } else {
        response.to_string()
    }
}
