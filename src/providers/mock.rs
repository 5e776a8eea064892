/*!
 * Mock provider for testing lookups without network access.
 *
 * - `MockProvider::working()` answers every prompt with well-formed JSON
 * - `MockProvider::failing()` always fails with an API error
 * - `MockProvider::fenced()` wraps the JSON in a markdown code fence
 * - `MockProvider::empty()` returns no content
 */

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::errors::ProviderError;
use crate::providers::Provider;

/// Prompt pair sent to the mock
#[derive(Debug, Clone)]
pub struct MockRequest {
    pub system_prompt: String,
    pub user_prompt: String,
}

#[derive(Debug, Clone)]
pub struct MockResponse {
    pub text: String,
}

/// Behavior mode for the mock provider
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Answers with JSON matching the prompt kind
    Working,
    /// Same JSON wrapped in a ```json fence
    Fenced,
    /// Always fails with an error
    Failing,
    /// Fails with an authentication error
    Unauthorized,
    /// Returns an empty response
    Empty,
    /// Returns text that is not JSON
    Garbage,
    /// Answers after a delay
    Slow { delay_ms: u64 },
}

/// Mock provider for testing lookup behavior
#[derive(Debug)]
pub struct MockProvider {
    behavior: MockBehavior,
    /// Number of requests seen, shared between clones
    request_count: Arc<AtomicUsize>,
    /// Custom response generator (optional)
    custom_response: Option<fn(&MockRequest) -> String>,
}

impl MockProvider {
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
            custom_response: None,
        }
    }

    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    pub fn fenced() -> Self {
        Self::new(MockBehavior::Fenced)
    }

    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    pub fn unauthorized() -> Self {
        Self::new(MockBehavior::Unauthorized)
    }

    pub fn empty() -> Self {
        Self::new(MockBehavior::Empty)
    }

    pub fn garbage() -> Self {
        Self::new(MockBehavior::Garbage)
    }

    pub fn slow(delay_ms: u64) -> Self {
        Self::new(MockBehavior::Slow { delay_ms })
    }

    /// Set a custom response generator
    pub fn with_custom_response(mut self, generator: fn(&MockRequest) -> String) -> Self {
        self.custom_response = Some(generator);
        self
    }

    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Canned JSON answer; word prompts mention "Target Word"
    pub fn canned_json(request: &MockRequest) -> String {
        let quoted = request
            .user_prompt
            .split('"')
            .nth(1)
            .unwrap_or_default()
            .to_string();

        if request.user_prompt.starts_with("Target Word") {
            serde_json::json!({
                "definition": format!("definition of {}", quoted),
                "translation": format!("[zh] {}", quoted),
                "usage_example": format!("I use {} every day.", quoted),
            })
            .to_string()
        } else {
            serde_json::json!({
                "translation": format!("[zh] {}", quoted),
                "grammar_analysis": "Simple present tense.",
                "idioms_and_collocations": "None",
            })
            .to_string()
        }
    }

    fn answer(&self, request: &MockRequest) -> String {
        match self.custom_response {
            Some(generator) => generator(request),
            None => Self::canned_json(request),
        }
    }
}

impl Clone for MockProvider {
    fn clone(&self) -> Self {
        Self {
            behavior: self.behavior,
            request_count: Arc::clone(&self.request_count),
            custom_response: self.custom_response,
        }
    }
}

#[async_trait]
impl Provider for MockProvider {
    type Request = MockRequest;
    type Response = MockResponse;

    async fn complete(&self, request: Self::Request) -> Result<Self::Response, ProviderError> {
        self.request_count.fetch_add(1, Ordering::SeqCst);

        match self.behavior {
            MockBehavior::Working => Ok(MockResponse {
                text: self.answer(&request),
            }),

            MockBehavior::Fenced => Ok(MockResponse {
                text: format!("```json\n{}\n```", self.answer(&request)),
            }),

            MockBehavior::Failing => Err(ProviderError::ApiError {
                status_code: 500,
                message: "Simulated provider failure".to_string(),
            }),

            MockBehavior::Unauthorized => Err(ProviderError::AuthenticationError(
                "Invalid Mock API key".to_string(),
            )),

            MockBehavior::Empty => Err(ProviderError::ParseError(
                "No content received from API".to_string(),
            )),

            MockBehavior::Garbage => Ok(MockResponse {
                text: "I am not JSON".to_string(),
            }),

            MockBehavior::Slow { delay_ms } => {
                tokio::time::sleep(tokio::time::Duration::from_millis(delay_ms)).await;
                Ok(MockResponse {
                    text: self.answer(&request),
                })
            }
        }
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        match self.behavior {
            MockBehavior::Failing => Err(ProviderError::ConnectionError(
                "Simulated connection failure".to_string(),
            )),
            MockBehavior::Unauthorized => Err(ProviderError::AuthenticationError(
                "Invalid Mock API key".to_string(),
            )),
            _ => Ok(()),
        }
    }

    fn extract_text(response: &Self::Response) -> Option<String> {
        Some(response.text.clone()).filter(|text| !text.is_empty())
    }
}
