/*!
 * Prompt template for batch translation.
 *
 * The batch is embedded as a JSON array of strings and the model is told to
 * answer with an array of the same length.
 */

use crate::errors::TranslationError;

/// Prompt template with `{target_language}`, `{count}` and `{entries}` placeholders
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    /// The template string with placeholders
    template: String,
}

impl PromptTemplate {
    /// The default batch translation prompt.
    pub const BATCH_TRANSLATION: &'static str = "Translate each of the following {count} subtitle lines into {target_language}. \
The lines are given as a JSON array of strings. \
Respond with ONLY a JSON array of exactly {count} strings, \
where element i is the translation of input element i, in the same order. \
Keep line breaks inside an element. Do not merge, split, drop or add elements.\n\n\
{entries}";

    /// Create a new prompt template.
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    /// Render the prompt for one batch
    pub fn render(&self, target_language: &str, texts: &[String]) -> Result<String, TranslationError> {
        let entries = serde_json::to_string(texts)?;
        Ok(self
            .template
            .replace("{target_language}", target_language)
            .replace("{count}", &texts.len().to_string())
            .replace("{entries}", &entries))
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::new(Self::BATCH_TRANSLATION)
    }
}
