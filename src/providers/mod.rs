/*!
 * Provider implementations for the AI lookup services.
 *
 * This module contains client implementations for the supported LLM providers:
 * - Gemini: Google Generative Language API
 * - OpenAI: any OpenAI-compatible chat completions endpoint
 * - Mock: deterministic provider for tests
 */

use async_trait::async_trait;
use log::error;
use reqwest::StatusCode;
use std::fmt::Debug;
use std::time::Duration;

use crate::errors::ProviderError;

/// Common trait for all LLM providers
///
/// This trait defines the interface that all provider implementations must follow,
/// allowing them to be used interchangeably by the lookup service.
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// The request type for this provider
    type Request: Send + Sync;

    /// The response type for this provider
    type Response: Send + Sync;

    /// Complete a request using this provider
    async fn complete(&self, request: Self::Request) -> Result<Self::Response, ProviderError>;

    /// Test the connection to the provider
    async fn test_connection(&self) -> Result<(), ProviderError>;

    /// Extract the generated text from the provider response, if any
    fn extract_text(response: &Self::Response) -> Option<String>;
}

/// Build the shared HTTP client with the configured timeout
pub(crate) fn build_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_default()
}

/// Convert a failed HTTP exchange into a provider error
pub(crate) fn map_request_error(provider: &str, err: reqwest::Error) -> ProviderError {
    if err.is_connect() || err.is_timeout() {
        ProviderError::ConnectionError(format!("{}: {}", provider, err))
    } else {
        ProviderError::RequestFailed(format!("{}: {}", provider, err))
    }
}

/// Convert a non-success HTTP status into a provider error
///
/// `body` is the raw error body; the `error.message` field is used when present.
pub(crate) fn map_status_error(provider: &str, status: StatusCode, body: &str) -> ProviderError {
    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value
                .pointer("/error/message")
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Unknown error")
                .to_string()
        });

    error!("{} API error ({}): {}", provider, status, message);

    match status.as_u16() {
        401 | 403 => ProviderError::AuthenticationError(format!("Invalid {} API key", provider)),
        404 => ProviderError::ApiError {
            status_code: 404,
            message: "Model or endpoint not found".to_string(),
        },
        429 => ProviderError::RateLimitExceeded(message),
        code => ProviderError::ApiError {
            status_code: code,
            message,
        },
    }
}

pub mod gemini;
pub mod mock;
pub mod openai;
