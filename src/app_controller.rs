use anyhow::{Context, Result};
use log::{debug, info};
use std::path::Path;
use std::time::Duration;

use crate::app_config::{BlurMode, Config, Settings};
use crate::database::{StateStore, SETTINGS_KEY};
use crate::errors::LookupError;
use crate::lookup_service::{
    clean_word, CompletedLookup, LookupRequest, LookupService, LookupSlot, LookupState,
    PendingLookup, SentenceAnalysis, WordAnalysis,
};
use crate::notebook::Notebook;
use crate::providers::mock::MockProvider;
use crate::shortcuts::{command_for_key, KeyTarget, PlayerCommand};
use crate::subtitle_processor::{merge_dual_srt, read_srt_file};
use crate::sync::{SyncAction, SyncCore};

// @module: Application controller for the player session

/// Word currently shown in the lookup popover
#[derive(Debug, Clone, PartialEq)]
pub struct WordQuery {
    pub word: String,
    pub context: String,
}

/// Glue between the sync core, the user's settings, the notebook and lookups
#[derive(Debug)]
pub struct PlayerController {
    // @field: App configuration
    config: Config,
    core: SyncCore,
    settings: Settings,
    notebook: Notebook,
    store: StateStore,
    word_lookup: LookupSlot<WordAnalysis>,
    word_query: Option<WordQuery>,
    sentence_lookup: LookupSlot<SentenceAnalysis>,
    sentence_query: Option<String>,
    // @field: Replaces the configured provider when set (tests, offline demo)
    mock_provider: Option<MockProvider>,
}

impl PlayerController {
    // @method: Create a controller, restoring persisted settings and notebook
    pub fn new(config: Config, store: StateStore) -> Result<Self> {
        config.validate()?;

        let settings: Settings = store.load_or_default(SETTINGS_KEY);
        let notebook = Notebook::load(&store);

        let mut core = SyncCore::new(config.sync.clone());
        core.set_auto_pause(settings.auto_pause);

        info!(
            "Session restored: {} saved words, {} bookmarks",
            notebook.words().len(),
            notebook.sentences().len()
        );

        Ok(Self {
            config,
            core,
            settings,
            notebook,
            store,
            word_lookup: LookupSlot::new(),
            word_query: None,
            sentence_lookup: LookupSlot::new(),
            sentence_query: None,
            mock_provider: None,
        })
    }

    /// Controller over an in-memory store with default configuration
    pub fn new_for_test() -> Result<Self> {
        Self::new(Config::default(), StateStore::new_in_memory()?)
    }

    /// Route lookups to `provider` instead of the configured one
    pub fn use_mock_provider(&mut self, provider: MockProvider) {
        self.mock_provider = Some(provider);
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn core(&self) -> &SyncCore {
        &self.core
    }

    pub fn core_mut(&mut self) -> &mut SyncCore {
        &mut self.core
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn notebook(&self) -> &Notebook {
        &self.notebook
    }

    pub fn store(&self) -> &StateStore {
        &self.store
    }

    pub fn word_lookup(&self) -> &LookupState<WordAnalysis> {
        self.word_lookup.state()
    }

    pub fn word_query(&self) -> Option<&WordQuery> {
        self.word_query.as_ref()
    }

    pub fn sentence_lookup(&self) -> &LookupState<SentenceAnalysis> {
        self.sentence_lookup.state()
    }

    pub fn sentence_query(&self) -> Option<&str> {
        self.sentence_query.as_deref()
    }

    // =========================================================================
    // Import
    // =========================================================================

    /// Load a dual-language transcript, and optionally a new video source.
    ///
    /// Returns the number of lines imported.
    pub fn import(&mut self, primary_srt: &str, secondary_srt: &str, video_url: Option<&str>) -> usize {
        if let Some(url) = video_url.map(str::trim).filter(|url| !url.is_empty()) {
            self.core.load_source(url);
        }

        let subtitles = merge_dual_srt(primary_srt, secondary_srt);
        let count = subtitles.len();
        self.core.replace_subtitles(subtitles);
        count
    }

    /// Import from SRT files on disk; the secondary track is optional
    pub fn import_files<P: AsRef<Path>>(
        &mut self,
        primary: P,
        secondary: Option<P>,
        video_url: Option<&str>,
    ) -> Result<usize> {
        let primary_srt = read_srt_file(primary)?;
        let secondary_srt = match secondary {
            Some(path) => read_srt_file(path)?,
            None => String::new(),
        };
        Ok(self.import(&primary_srt, &secondary_srt, video_url))
    }

    // =========================================================================
    // Keyboard
    // =========================================================================

    /// Apply a key press; returns the actions for the host
    pub fn handle_key(&mut self, code: &str, target: KeyTarget) -> Result<Vec<SyncAction>> {
        let Some(command) = command_for_key(code, target) else {
            return Ok(Vec::new());
        };
        debug!("Key {} -> {:?}", code, command);

        let actions = match command {
            PlayerCommand::TogglePlay => self.core.toggle_play(),
            PlayerCommand::PreviousSentence => self.core.previous_sentence(),
            PlayerCommand::NextSentence => self.core.next_sentence(),
            PlayerCommand::ReplayCurrent => self.core.replay_current(),
            PlayerCommand::CycleBlur => {
                self.cycle_blur_mode()?;
                Vec::new()
            }
        };
        Ok(actions)
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    fn lookup_service(&self) -> Result<LookupService, LookupError> {
        let timeout = Duration::from_secs(self.config.request_timeout_secs);
        let service = match &self.mock_provider {
            Some(mock) => LookupService::with_mock(mock.clone(), &self.settings),
            None => LookupService::new(&self.settings, timeout),
        };
        service.map_err(|e| LookupError::InvalidSettings(format!("{:#}", e)))
    }

    /// Ping the configured provider with the saved key; no lookup slot changes
    pub async fn check_connection(&self) -> Result<&'static str, LookupError> {
        if !self.settings.has_api_key() {
            return Err(LookupError::MissingApiKey);
        }
        let service = self.lookup_service()?;
        service.test_connection().await?;
        info!("{} provider reachable", service.provider_name());
        Ok(service.provider_name())
    }

    /// Start a word lookup: playback pauses and the popover shows loading.
    ///
    /// Fails with `MissingApiKey` before anything changes when no key is set.
    pub fn begin_word_lookup(
        &mut self,
        word: &str,
        context: &str,
    ) -> Result<(PendingLookup, Vec<SyncAction>), LookupError> {
        if !self.settings.has_api_key() {
            return Err(LookupError::MissingApiKey);
        }
        let service = self.lookup_service()?;

        let word = clean_word(word);
        let actions = self.core.pause();
        let ticket = self.word_lookup.begin();
        self.word_query = Some(WordQuery {
            word: word.clone(),
            context: context.to_string(),
        });

        let request = LookupRequest::Word {
            word,
            context: context.to_string(),
        };
        Ok((PendingLookup::new(service, ticket, request), actions))
    }

    /// Start a sentence analysis: playback pauses and the panel shows loading
    pub fn begin_sentence_lookup(
        &mut self,
        sentence: &str,
    ) -> Result<(PendingLookup, Vec<SyncAction>), LookupError> {
        if !self.settings.has_api_key() {
            return Err(LookupError::MissingApiKey);
        }
        let service = self.lookup_service()?;

        let actions = self.core.pause();
        let ticket = self.sentence_lookup.begin();
        self.sentence_query = Some(sentence.to_string());

        let request = LookupRequest::Sentence {
            sentence: sentence.to_string(),
        };
        Ok((PendingLookup::new(service, ticket, request), actions))
    }

    /// Apply a finished lookup. Returns false if it was superseded.
    pub fn complete_lookup(&mut self, completed: CompletedLookup) -> bool {
        match completed {
            CompletedLookup::Word { ticket, result } => self.word_lookup.complete(ticket, result),
            CompletedLookup::Sentence { ticket, result } => {
                self.sentence_lookup.complete(ticket, result)
            }
        }
    }

    pub fn dismiss_word_lookup(&mut self) {
        self.word_lookup.dismiss();
        self.word_query = None;
    }

    pub fn dismiss_sentence_lookup(&mut self) {
        self.sentence_lookup.dismiss();
        self.sentence_query = None;
    }

    // =========================================================================
    // Notebook
    // =========================================================================

    /// Save the word shown in the popover. Returns false if there is no
    /// finished lookup or the word is already saved.
    pub fn save_looked_up_word(&mut self) -> Result<bool> {
        let (Some(query), LookupState::Ready(analysis)) = (&self.word_query, self.word_lookup.state())
        else {
            return Ok(false);
        };

        if !self.notebook.save_word(&query.word, analysis, &query.context) {
            return Ok(false);
        }
        self.notebook.save_words(&self.store)?;
        info!("Saved word '{}'", query.word);
        Ok(true)
    }

    pub fn is_looked_up_word_saved(&self) -> bool {
        self.word_query
            .as_ref()
            .is_some_and(|query| self.notebook.is_word_saved(&query.word))
    }

    pub fn delete_word(&mut self, id: &str) -> Result<bool> {
        if !self.notebook.delete_word(id) {
            return Ok(false);
        }
        self.notebook.save_words(&self.store)?;
        Ok(true)
    }

    /// Toggle the bookmark on a subtitle line.
    ///
    /// Returns the new bookmark state, or `None` if no line has this id.
    pub fn toggle_bookmark(&mut self, subtitle_id: &str) -> Result<Option<bool>> {
        let Some(subtitle) = self.core.subtitles().iter().find(|s| s.id == subtitle_id) else {
            return Ok(None);
        };

        let bookmarked = self.notebook.toggle_bookmark(subtitle);
        self.notebook.save_sentences(&self.store)?;
        Ok(Some(bookmarked))
    }

    pub fn delete_sentence(&mut self, id: &str) -> Result<bool> {
        if !self.notebook.delete_sentence(id) {
            return Ok(false);
        }
        self.notebook.save_sentences(&self.store)?;
        Ok(true)
    }

    pub fn set_sentence_note(&mut self, id: &str, note: &str) -> Result<bool> {
        if !self.notebook.set_note(id, note) {
            return Ok(false);
        }
        self.notebook.save_sentences(&self.store)?;
        Ok(true)
    }

    // =========================================================================
    // Settings
    // =========================================================================

    /// Replace the settings after validating them; auto-pause takes effect immediately
    pub fn update_settings(&mut self, settings: Settings) -> Result<()> {
        settings.validate().context("Invalid settings")?;

        self.store.save(SETTINGS_KEY, &settings)?;
        self.core.set_auto_pause(settings.auto_pause);
        self.settings = settings;

        info!(
            "Settings updated (provider {}, model {})",
            self.settings.provider, self.settings.model_name
        );
        Ok(())
    }

    pub fn cycle_blur_mode(&mut self) -> Result<BlurMode> {
        let mut settings = self.settings.clone();
        settings.blur_mode = settings.blur_mode.cycle();
        self.store.save(SETTINGS_KEY, &settings)?;
        self.settings = settings;
        Ok(self.settings.blur_mode)
    }

    pub fn set_auto_pause(&mut self, enabled: bool) -> Result<()> {
        let mut settings = self.settings.clone();
        settings.auto_pause = enabled;
        self.update_settings(settings)
    }
}
