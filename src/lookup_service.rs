/*!
 * AI-backed word and sentence lookups.
 *
 * `LookupService` turns a word (with its context sentence) or a whole
 * sentence into a structured analysis by prompting the configured provider
 * for a JSON answer. Results are delivered through a `LookupSlot`, whose
 * generation counter discards answers to requests that were superseded.
 */

use anyhow::Result;
use log::{debug, info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::app_config::{AiProvider, Settings};
use crate::errors::LookupError;
use crate::language_utils::get_language_name;
use crate::providers::gemini::{Gemini, GeminiRequest};
use crate::providers::mock::{MockProvider, MockRequest};
use crate::providers::openai::{OpenAI, OpenAIRequest};
use crate::providers::Provider;

static WORD_PUNCTUATION_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[.,!?;:()"]"#).unwrap());

static CODE_FENCE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^\s*```[a-zA-Z]*\s*(.*?)\s*```\s*$").unwrap());

/// Dictionary entry for one word in context
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordAnalysis {
    #[serde(default)]
    pub definition: String,
    #[serde(default)]
    pub translation: String,
    #[serde(default)]
    pub usage_example: String,
}

/// Translation and grammar notes for one sentence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentenceAnalysis {
    #[serde(default)]
    pub translation: String,
    #[serde(default)]
    pub grammar_analysis: String,
    #[serde(default)]
    pub idioms_and_collocations: String,
}

/// Provider implementation variants
#[derive(Debug, Clone)]
enum LookupProviderImpl {
    Gemini { client: Gemini },
    OpenAI { client: OpenAI, model: String },
    Mock { client: MockProvider },
}

/// Lookup service bound to one provider and language pair
#[derive(Debug, Clone)]
pub struct LookupService {
    provider: LookupProviderImpl,
    has_api_key: bool,
    /// Language being learned, as an English name
    primary_language: String,
    /// Learner's language, as an English name
    secondary_language: String,
}

impl LookupService {
    /// Create a service for the provider selected in `settings`
    pub fn new(settings: &Settings, timeout: Duration) -> Result<Self> {
        let base_url = settings.effective_base_url();
        let provider = match settings.provider {
            AiProvider::Gemini => LookupProviderImpl::Gemini {
                client: Gemini::new(&settings.api_key, base_url, &settings.model_name, timeout),
            },
            AiProvider::OpenAI => LookupProviderImpl::OpenAI {
                client: OpenAI::new(&settings.api_key, base_url, timeout),
                model: settings.model_name.clone(),
            },
        };
        Self::with_provider(provider, settings)
    }

    /// Create a service backed by a mock provider
    pub fn with_mock(client: MockProvider, settings: &Settings) -> Result<Self> {
        Self::with_provider(LookupProviderImpl::Mock { client }, settings)
    }

    fn with_provider(provider: LookupProviderImpl, settings: &Settings) -> Result<Self> {
        Ok(Self {
            provider,
            has_api_key: settings.has_api_key(),
            primary_language: get_language_name(&settings.primary_language)?,
            secondary_language: get_language_name(&settings.secondary_language)?,
        })
    }

    pub fn provider_name(&self) -> &'static str {
        match self.provider {
            LookupProviderImpl::Gemini { .. } => "Gemini",
            LookupProviderImpl::OpenAI { .. } => "OpenAI-Compatible",
            LookupProviderImpl::Mock { .. } => "Mock",
        }
    }

    /// Explain `word` as used in `context`
    pub async fn fetch_word_analysis(
        &self,
        word: &str,
        context: &str,
    ) -> Result<WordAnalysis, LookupError> {
        self.ensure_api_key()?;
        let (system_prompt, user_prompt) =
            word_prompts(word, context, &self.primary_language, &self.secondary_language);

        info!("Looking up word '{}' via {}", word, self.provider_name());
        let text = self.call(&system_prompt, &user_prompt).await?;
        parse_json_answer(&text)
    }

    /// Translate and analyze `sentence`
    pub async fn fetch_sentence_analysis(
        &self,
        sentence: &str,
    ) -> Result<SentenceAnalysis, LookupError> {
        self.ensure_api_key()?;
        let (system_prompt, user_prompt) =
            sentence_prompts(sentence, &self.primary_language, &self.secondary_language);

        info!("Analyzing sentence via {}", self.provider_name());
        let text = self.call(&system_prompt, &user_prompt).await?;
        parse_json_answer(&text)
    }

    /// Check that the provider is reachable with the configured key
    pub async fn test_connection(&self) -> Result<(), LookupError> {
        self.ensure_api_key()?;
        match &self.provider {
            LookupProviderImpl::Gemini { client } => client.test_connection().await?,
            LookupProviderImpl::OpenAI { client, .. } => client.test_connection().await?,
            LookupProviderImpl::Mock { client } => client.test_connection().await?,
        }
        Ok(())
    }

    fn ensure_api_key(&self) -> Result<(), LookupError> {
        if self.has_api_key {
            Ok(())
        } else {
            warn!("Lookup refused: no API key configured");
            Err(LookupError::MissingApiKey)
        }
    }

    async fn call(&self, system_prompt: &str, user_prompt: &str) -> Result<String, LookupError> {
        let text = match &self.provider {
            LookupProviderImpl::Gemini { client } => {
                let request = GeminiRequest::json_prompt(system_prompt, user_prompt);
                let response = client.complete(request).await?;
                Gemini::extract_text(&response)
            }
            LookupProviderImpl::OpenAI { client, model } => {
                let request = OpenAIRequest::json_prompt(model.as_str(), system_prompt, user_prompt);
                let response = client.complete(request).await?;
                OpenAI::extract_text(&response)
            }
            LookupProviderImpl::Mock { client } => {
                let request = MockRequest {
                    system_prompt: system_prompt.to_string(),
                    user_prompt: user_prompt.to_string(),
                };
                let response = client.complete(request).await?;
                MockProvider::extract_text(&response)
            }
        };

        text.ok_or_else(|| LookupError::MalformedResponse("empty answer".to_string()))
    }
}

/// System and user prompts for a word lookup
pub fn word_prompts(word: &str, context: &str, primary: &str, secondary: &str) -> (String, String) {
    let system_prompt = format!(
        "You are a helpful dictionary assistant for a {primary} learner.\n\
         Explain the target word within the provided context sentence.\n\
         Return strictly valid JSON with no markdown formatting.\n\
         Structure: {{ \"definition\": \"string\", \"translation\": \"string (in {secondary})\", \
         \"usage_example\": \"string (a new simple sentence using the word)\" }}"
    );
    let user_prompt = format!("Target Word: \"{}\"\nContext Sentence: \"{}\"", word, context);
    (system_prompt, user_prompt)
}

/// System and user prompts for a sentence analysis
pub fn sentence_prompts(sentence: &str, primary: &str, secondary: &str) -> (String, String) {
    let system_prompt = format!(
        "You are an expert {primary} teacher. Analyze the following sentence for a {primary} learner.\n\
         Return strictly valid JSON with no markdown formatting.\n\
         Structure: {{ \"translation\": \"string (Natural {secondary} translation)\", \
         \"grammar_analysis\": \"string (Explain key grammar points, tense, clauses briefly)\", \
         \"idioms_and_collocations\": \"string (List any fixed phrases, idioms or interesting collocations found)\" }}"
    );
    let user_prompt = format!("Target Sentence: \"{}\"", sentence);
    (system_prompt, user_prompt)
}

/// Parse the model's answer, tolerating a markdown code fence around the JSON
pub fn parse_json_answer<T: DeserializeOwned>(text: &str) -> Result<T, LookupError> {
    let body = match CODE_FENCE_REGEX.captures(text) {
        Some(caps) => caps.get(1).map_or("", |m| m.as_str()),
        None => text.trim(),
    };

    serde_json::from_str(body).map_err(|e| {
        debug!("Unparseable lookup answer: {}", text);
        LookupError::MalformedResponse(e.to_string())
    })
}

/// Strip the punctuation that clings to a clicked word
pub fn clean_word(word: &str) -> String {
    WORD_PUNCTUATION_REGEX.replace_all(word.trim(), "").into_owned()
}

// ============================================================================
// Request generations
// ============================================================================

/// What a lookup slot currently shows
#[derive(Debug, Clone, PartialEq)]
pub enum LookupState<T> {
    Idle,
    Loading,
    Ready(T),
    Failed(String),
}

/// Identifies one request issued through a slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookupTicket {
    generation: u64,
}

impl LookupTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Holder for the latest lookup result of one kind.
///
/// Only the most recent request may complete the slot; answers carrying an
/// older ticket are dropped.
#[derive(Debug, Clone)]
pub struct LookupSlot<T> {
    generation: u64,
    state: LookupState<T>,
}

impl<T> Default for LookupSlot<T> {
    fn default() -> Self {
        Self {
            generation: 0,
            state: LookupState::Idle,
        }
    }
}

impl<T> LookupSlot<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new request, superseding any in flight
    pub fn begin(&mut self) -> LookupTicket {
        self.generation = self.generation.wrapping_add(1);
        self.state = LookupState::Loading;
        LookupTicket {
            generation: self.generation,
        }
    }

    /// Apply a result. Returns false when `ticket` is stale.
    pub fn complete(&mut self, ticket: LookupTicket, result: Result<T, LookupError>) -> bool {
        if ticket.generation != self.generation {
            debug!(
                "Dropping stale lookup result #{} (current #{})",
                ticket.generation, self.generation
            );
            return false;
        }

        self.state = match result {
            Ok(value) => LookupState::Ready(value),
            Err(e) => {
                warn!("Lookup failed: {}", e);
                LookupState::Failed(e.to_string())
            }
        };
        true
    }

    /// Close the slot; in-flight answers become stale
    pub fn dismiss(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.state = LookupState::Idle;
    }

    pub fn state(&self) -> &LookupState<T> {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, LookupState::Loading)
    }
}

// ============================================================================
// Deferred execution
// ============================================================================

/// Lookup input
#[derive(Debug, Clone, PartialEq)]
pub enum LookupRequest {
    Word { word: String, context: String },
    Sentence { sentence: String },
}

/// Lookup answer, tagged with the ticket it was issued under
#[derive(Debug)]
pub enum CompletedLookup {
    Word {
        ticket: LookupTicket,
        result: Result<WordAnalysis, LookupError>,
    },
    Sentence {
        ticket: LookupTicket,
        result: Result<SentenceAnalysis, LookupError>,
    },
}

/// A lookup that has been issued but not yet executed
#[derive(Debug, Clone)]
pub struct PendingLookup {
    service: LookupService,
    ticket: LookupTicket,
    request: LookupRequest,
}

impl PendingLookup {
    pub fn new(service: LookupService, ticket: LookupTicket, request: LookupRequest) -> Self {
        Self {
            service,
            ticket,
            request,
        }
    }

    pub fn ticket(&self) -> LookupTicket {
        self.ticket
    }

    pub fn request(&self) -> &LookupRequest {
        &self.request
    }

    /// Execute the request against the provider
    pub async fn run(self) -> CompletedLookup {
        match self.request {
            LookupRequest::Word { word, context } => CompletedLookup::Word {
                ticket: self.ticket,
                result: self.service.fetch_word_analysis(&word, &context).await,
            },
            LookupRequest::Sentence { sentence } => CompletedLookup::Sentence {
                ticket: self.ticket,
                result: self.service.fetch_sentence_analysis(&sentence).await,
            },
        }
    }
}
