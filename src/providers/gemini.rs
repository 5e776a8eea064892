use async_trait::async_trait;
use log::debug;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::ProviderError;
use crate::providers::{build_client, map_request_error, map_status_error, Provider};

/// Gemini client for the Generative Language API
#[derive(Debug, Clone)]
pub struct Gemini {
    /// HTTP client for API requests
    client: reqwest::Client,
    /// API key, sent as the `key` query parameter
    api_key: String,
    /// API base URL without trailing slash
    endpoint: String,
    /// Model used for generation
    model: String,
}

/// generateContent request body
#[derive(Debug, Serialize, Clone)]
pub struct GeminiRequest {
    pub contents: Vec<GeminiContent>,

    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct GeminiContent {
    #[serde(default)]
    pub parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct GeminiPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Serialize, Clone)]
pub struct GenerationConfig {
    #[serde(rename = "responseMimeType")]
    pub response_mime_type: String,
}

/// generateContent response
#[derive(Debug, Deserialize, Clone, Default)]
pub struct GeminiResponse {
    #[serde(default)]
    pub candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct GeminiCandidate {
    #[serde(default)]
    pub content: Option<GeminiContent>,
}

impl GeminiRequest {
    /// A single-turn prompt asking for a JSON answer.
    ///
    /// Gemini has no separate system role on this endpoint, so both prompts
    /// are sent as one text part.
    pub fn json_prompt(system_prompt: &str, user_prompt: &str) -> Self {
        Self {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart {
                    text: Some(format!("{}\n\n{}", system_prompt, user_prompt)),
                }],
            }],
            generation_config: Some(GenerationConfig {
                response_mime_type: "application/json".to_string(),
            }),
        }
    }
}

impl Gemini {
    /// Create a new Gemini client
    pub fn new(
        api_key: impl Into<String>,
        endpoint: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            client: build_client(timeout),
            api_key: api_key.into(),
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn url(&self) -> Result<url::Url, ProviderError> {
        let raw = format!("{}/v1beta/models/{}:generateContent", self.endpoint, self.model);
        let mut url = url::Url::parse(&raw)
            .map_err(|e| ProviderError::RequestFailed(format!("Invalid Gemini URL {}: {}", raw, e)))?;
        url.query_pairs_mut().append_pair("key", &self.api_key);
        Ok(url)
    }
}

#[async_trait]
impl Provider for Gemini {
    type Request = GeminiRequest;
    type Response = GeminiResponse;

    async fn complete(&self, request: Self::Request) -> Result<Self::Response, ProviderError> {
        let url = self.url()?;
        debug!("Gemini request to model {}", self.model);

        let response = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| map_request_error("Gemini", e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(map_status_error("Gemini", status, &body));
        }

        let parsed = response
            .json::<GeminiResponse>()
            .await
            .map_err(|e| ProviderError::ParseError(format!("Gemini response: {}", e)))?;

        if Self::extract_text(&parsed).is_none() {
            return Err(ProviderError::ParseError(
                "No content received from Gemini".to_string(),
            ));
        }

        Ok(parsed)
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        let request = GeminiRequest::json_prompt("Reply with {\"ok\": true}.", "ping");
        self.complete(request).await.map(|_| ())
    }

    fn extract_text(response: &Self::Response) -> Option<String> {
        response
            .candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .first()?
            .text
            .clone()
            .filter(|text| !text.trim().is_empty())
    }
}
