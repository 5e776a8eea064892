use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::{Path, PathBuf};

/// Application configuration module
/// This module handles the runtime configuration file (timing constants,
/// storage location, logging) and the user preferences persisted in the store.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Synchronization timing constants
    #[serde(default)]
    pub sync: SyncConfig,

    /// Path of the state database (defaults to the user data directory)
    #[serde(default)]
    pub database_path: Option<String>,

    /// Timeout for AI lookup requests in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Timing constants of the synchronization core.
///
/// The values are empirically tuned for a ~20Hz progress callback and may
/// need retuning for other frame rates.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SyncConfig {
    /// Delay after a sentence end before auto-pause fires, lets trailing audio finish
    #[serde(default = "default_fire_offset_secs")]
    pub fire_offset_secs: f64,

    /// How long the active sentence sticks past its end while playing
    #[serde(default = "default_sticky_playing_secs")]
    pub sticky_playing_secs: f64,

    /// How long the active sentence sticks past its end while paused
    #[serde(default = "default_sticky_paused_secs")]
    pub sticky_paused_secs: f64,

    /// Forward tolerance added to every interval end for extended matches
    #[serde(default = "default_extended_slack_secs")]
    pub extended_slack_secs: f64,

    /// Forward nudge applied to seek targets to avoid frame-boundary ties
    #[serde(default = "default_seek_epsilon_secs")]
    pub seek_epsilon_secs: f64,

    /// Settle delay before the seek lock is released
    #[serde(default = "default_seek_settle_ms")]
    pub seek_settle_ms: u64,

    /// Number of undo snapshots kept
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            fire_offset_secs: default_fire_offset_secs(),
            sticky_playing_secs: default_sticky_playing_secs(),
            sticky_paused_secs: default_sticky_paused_secs(),
            extended_slack_secs: default_extended_slack_secs(),
            seek_epsilon_secs: default_seek_epsilon_secs(),
            seek_settle_ms: default_seek_settle_ms(),
            history_limit: default_history_limit(),
        }
    }
}

impl SyncConfig {
    /// Validate the timing constants against each other
    pub fn validate(&self) -> Result<()> {
        let values = [
            ("fire_offset_secs", self.fire_offset_secs),
            ("sticky_playing_secs", self.sticky_playing_secs),
            ("sticky_paused_secs", self.sticky_paused_secs),
            ("extended_slack_secs", self.extended_slack_secs),
            ("seek_epsilon_secs", self.seek_epsilon_secs),
        ];
        for (name, value) in values {
            if !value.is_finite() || value < 0.0 {
                return Err(anyhow!("{} must be a non-negative number, got {}", name, value));
            }
        }

        // The sticky window has to outlast the auto-pause delay, otherwise the
        // index moves on before the trigger can observe the sentence end.
        if self.sticky_playing_secs <= self.fire_offset_secs {
            return Err(anyhow!(
                "sticky_playing_secs ({}) must exceed fire_offset_secs ({})",
                self.sticky_playing_secs, self.fire_offset_secs
            ));
        }

        if self.history_limit == 0 {
            return Err(anyhow!("history_limit must be at least 1"));
        }

        Ok(())
    }

    /// Settle delay as a duration
    pub fn seek_settle(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.seek_settle_ms)
    }
}

/// AI provider used for lookups
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AiProvider {
    // @provider: Google Gemini
    #[default]
    Gemini,
    // @provider: Any OpenAI-compatible chat completions endpoint
    OpenAI,
}

impl AiProvider {
    // @returns: Capitalized provider name
    pub fn display_name(&self) -> &str {
        match self {
            Self::Gemini => "Gemini",
            Self::OpenAI => "OpenAI-Compatible",
        }
    }

    // @returns: Lowercase provider identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::Gemini => "gemini".to_string(),
            Self::OpenAI => "openai".to_string(),
        }
    }

    // @returns: Base URL used when the settings leave it empty
    pub fn default_base_url(&self) -> String {
        match self {
            Self::Gemini => default_gemini_base_url(),
            Self::OpenAI => default_openai_base_url(),
        }
    }
}

impl std::fmt::Display for AiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

impl std::str::FromStr for AiProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "gemini" => Ok(Self::Gemini),
            "openai" => Ok(Self::OpenAI),
            _ => Err(anyhow!("Invalid provider type: {}", s)),
        }
    }
}

/// Transcript blur mode
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum BlurMode {
    /// Nothing is blurred
    #[default]
    None,
    /// Only the current line is blurred
    Focus,
    /// Every line is blurred
    All,
}

impl BlurMode {
    /// Next mode in the none -> focus -> all cycle
    pub fn cycle(self) -> Self {
        match self {
            Self::None => Self::Focus,
            Self::Focus => Self::All,
            Self::All => Self::None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::None => "Blur: Off",
            Self::Focus => "Blur: Focus",
            Self::All => "Blur: All",
        }
    }
}

/// User preferences, persisted in the state store
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Settings {
    /// Lookup provider
    #[serde(default)]
    pub provider: AiProvider,

    /// API key for the provider
    #[serde(default)]
    pub api_key: String,

    /// Base URL of the provider (empty means provider default)
    #[serde(default)]
    pub base_url: String,

    /// Model name
    #[serde(default = "default_model_name")]
    pub model_name: String,

    /// Pause automatically at the end of each sentence
    #[serde(default)]
    pub auto_pause: bool,

    /// Transcript blur mode
    #[serde(default)]
    pub blur_mode: BlurMode,

    /// Show the primary language line
    #[serde(default = "default_true")]
    pub show_primary: bool,

    /// Show the secondary language line
    #[serde(default = "default_true")]
    pub show_secondary: bool,

    /// Language being learned (ISO code)
    #[serde(default = "default_primary_language")]
    pub primary_language: String,

    /// Learner's own language (ISO code)
    #[serde(default = "default_secondary_language")]
    pub secondary_language: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            provider: AiProvider::default(),
            api_key: String::new(),
            base_url: String::new(),
            model_name: default_model_name(),
            auto_pause: false,
            blur_mode: BlurMode::default(),
            show_primary: true,
            show_secondary: true,
            primary_language: default_primary_language(),
            secondary_language: default_secondary_language(),
        }
    }
}

impl Settings {
    /// Whether lookups can be issued at all
    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    /// Base URL for the active provider, falling back to its default
    pub fn effective_base_url(&self) -> String {
        let trimmed = self.base_url.trim();
        if trimmed.is_empty() {
            self.provider.default_base_url()
        } else {
            trimmed.trim_end_matches('/').to_string()
        }
    }

    /// Validate the settings for consistency
    pub fn validate(&self) -> Result<()> {
        crate::language_utils::get_language_name(&self.primary_language)?;
        crate::language_utils::get_language_name(&self.secondary_language)?;

        if self.model_name.trim().is_empty() {
            return Err(anyhow!("Model name cannot be empty"));
        }

        let base_url = self.effective_base_url();
        url::Url::parse(&base_url)
            .with_context(|| format!("Invalid base URL: {}", base_url))?;

        Ok(())
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
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
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_fire_offset_secs() -> f64 {
    0.1
}

fn default_sticky_playing_secs() -> f64 {
    0.4
}

fn default_sticky_paused_secs() -> f64 {
    1.2
}

fn default_extended_slack_secs() -> f64 {
    1.5
}

fn default_seek_epsilon_secs() -> f64 {
    0.01
}

fn default_seek_settle_ms() -> u64 {
    150
}

fn default_history_limit() -> usize {
    10
}

fn default_request_timeout_secs() -> u64 {
    60
}

fn default_true() -> bool {
    true
}

fn default_model_name() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_primary_language() -> String {
    "en".to_string()
}

fn default_secondary_language() -> String {
    "zh".to_string()
}

fn default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_openai_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        self.sync.validate().context("Invalid sync configuration")?;

        if self.request_timeout_secs == 0 {
            return Err(anyhow!("request_timeout_secs must be greater than zero"));
        }

        Ok(())
    }

    /// Load the configuration file, writing a default one when it does not exist
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to open config file: {}", path.display()))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
            return Ok(config);
        }

        log::warn!("Config file not found at '{}', creating default config.", path.display());
        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;
        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write default config to file: {}", path.display()))?;

        Ok(config)
    }

    /// Database location: the configured path or the default data directory
    pub fn resolve_database_path(&self) -> Result<PathBuf> {
        match &self.database_path {
            Some(path) if !path.trim().is_empty() => Ok(PathBuf::from(path)),
            _ => crate::database::DatabaseConnection::default_database_path(),
        }
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            sync: SyncConfig::default(),
            database_path: None,
            request_timeout_secs: default_request_timeout_secs(),
            log_level: LogLevel::default(),
        }
    }
}
