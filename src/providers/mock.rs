/*!
 * Mock provider implementation for testing.
 *
 * The mock reads the JSON array embedded in the prompt and answers according
 * to its behavior:
 * - `MockProvider::working()` - returns every input prefixed with `[TRANSLATED] `
 * - `MockProvider::chatty()` - same array, wrapped in conversational prose
 * - `MockProvider::length_mismatch()` - returns one element too many
 * - `MockProvider::malformed()` - returns text without any JSON array
 * - `MockProvider::failing()` - fails the call itself
 * - `MockProvider::scripted(..)` - replays a fixed list of replies
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::errors::ProviderError;
use crate::providers::Provider;

/// Prefix the working mock puts in front of each translated string
pub const MOCK_PREFIX: &str = "[TRANSLATED] ";

/// Behavior mode for the mock provider
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Always answers with a well-formed, length-matched array
    Working,
    /// Correct array surrounded by prose
    Chatty,
    /// Array with one extra element
    LengthMismatch,
    /// No JSON array at all
    Malformed,
    /// Malformed on every Nth request, working otherwise
    Intermittent { fail_every: usize },
    /// The call itself fails
    Failing,
}

/// One pre-programmed reply for `MockProvider::scripted`
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Return this response text
    Text(String),
    /// Fail the call with a connection error
    Fail(String),
}

/// Mock provider for testing translation behavior
#[derive(Debug)]
pub struct MockProvider {
    /// Behavior mode
    behavior: MockBehavior,
    /// Replies consumed before falling back to `behavior`
    script: Mutex<VecDeque<MockReply>>,
    /// Number of requests received
    request_count: Arc<AtomicUsize>,
    /// Every prompt received, in order
    prompts: Mutex<Vec<String>>,
}

impl MockProvider {
    /// Create a new mock provider with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            script: Mutex::new(VecDeque::new()),
            request_count: Arc::new(AtomicUsize::new(0)),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    pub fn chatty() -> Self {
        Self::new(MockBehavior::Chatty)
    }

    pub fn length_mismatch() -> Self {
        Self::new(MockBehavior::LengthMismatch)
    }

    pub fn malformed() -> Self {
        Self::new(MockBehavior::Malformed)
    }

    pub fn intermittent(fail_every: usize) -> Self {
        Self::new(MockBehavior::Intermittent { fail_every })
    }

    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Replay `replies` in order, then behave like `working()`
    pub fn scripted(replies: Vec<MockReply>) -> Self {
        let mock = Self::working();
        *mock.script.lock() = replies.into();
        mock
    }

    /// Number of requests received so far
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Prompts received so far
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }

    /// Pull the JSON array of texts out of a prompt
    pub fn texts_from_prompt(prompt: &str) -> Vec<String> {
        match (prompt.find('['), prompt.rfind(']')) {
            (Some(start), Some(end)) if start < end => {
                serde_json::from_str(&prompt[start..=end]).unwrap_or_default()
            }
            _ => Vec::new(),
        }
    }

    fn translated_array(texts: &[String]) -> String {
        let translated: Vec<String> = texts.iter().map(|t| format!("{}{}", MOCK_PREFIX, t)).collect();
        serde_json::to_string(&translated).unwrap_or_else(|_| "[]".to_string())
    }
}

#[async_trait]
impl Provider for MockProvider {
    async fn complete(&self, prompt: &str) -> Result<String, ProviderError> {
        let count = self.request_count.fetch_add(1, Ordering::SeqCst) + 1;
        self.prompts.lock().push(prompt.to_string());

        if let Some(reply) = self.script.lock().pop_front() {
            return match reply {
                MockReply::Text(text) => Ok(text),
                MockReply::Fail(message) => Err(ProviderError::ConnectionError(message)),
            };
        }

        let texts = Self::texts_from_prompt(prompt);
        match self.behavior {
            MockBehavior::Working => Ok(Self::translated_array(&texts)),
            MockBehavior::Chatty => Ok(format!(
                "Sure, here are the translations:\n{}\nLet me know if you need anything else.",
                Self::translated_array(&texts)
            )),
            MockBehavior::LengthMismatch => {
                let mut padded = texts;
                padded.push("extra".to_string());
                Ok(Self::translated_array(&padded))
            }
            MockBehavior::Malformed => Ok("I could not translate that.".to_string()),
            MockBehavior::Intermittent { fail_every } => {
                if fail_every > 0 && count % fail_every == 0 {
                    Ok("not json".to_string())
                } else {
                    Ok(Self::translated_array(&texts))
                }
            }
            MockBehavior::Failing => Err(ProviderError::ConnectionError(
                "Mock provider connection failed".to_string(),
            )),
        }
    }

    fn describe(&self) -> String {
        format!("Mock ({:?})", self.behavior)
    }
}
