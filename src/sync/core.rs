/*!
 * The synchronization core state object.
 *
 * `SyncCore` owns the subtitle list, the playback clock, the committed active
 * index, the auto-pause memory and the seek lock. The host drives it with
 * `on_tick` on every progress event and applies the returned `SyncAction`s to
 * the video component and the transcript view. Tests drive it the same way.
 */

use std::time::Duration;

use log::{debug, info, trace, warn};

use crate::app_config::SyncConfig;
use crate::subtitle_processor::Subtitle;

use super::auto_pause::{self, TriggerInput};
use super::history::SubtitleHistory;
use super::interval_index::{index_of_id, locate};
use super::resolver::{self, ResolveInput};

/// Slowest and fastest playback rate accepted
pub const MIN_PLAYBACK_RATE: f64 = 0.25;
pub const MAX_PLAYBACK_RATE: f64 = 4.0;

/// Commands for the host to apply after a state transition
#[derive(Debug, Clone, PartialEq)]
pub enum SyncAction {
    /// Set the video component's playing flag
    SetPlaying(bool),
    /// Seek the video component to the given position in seconds
    SeekTo(f64),
    /// Scroll the transcript so the given line is visible
    ScrollIntoView(usize),
    /// Call `release_seek_lock(generation)` once `delay` has elapsed
    ReleaseSeekLockAfter { generation: u64, delay: Duration },
    /// Change the video component's playback rate
    SetPlaybackRate(f64),
}

/// Lifecycle of the attached video source
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum VideoStatus {
    #[default]
    NoSource,
    Loading,
    Ready,
    Ended,
    /// Terminal until another source is loaded
    Failed { code: String },
}

/// Playback clock as last reported by the video component
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackClock {
    pub current_time: f64,
    pub playing: bool,
    pub duration: f64,
    pub playback_rate: f64,
    pub status: VideoStatus,
}

impl Default for PlaybackClock {
    fn default() -> Self {
        Self {
            current_time: 0.0,
            playing: false,
            duration: 0.0,
            playback_rate: 1.0,
            status: VideoStatus::NoSource,
        }
    }
}

impl PlaybackClock {
    /// Whether the video component accepts seeks and play commands
    pub fn ready(&self) -> bool {
        matches!(self.status, VideoStatus::Ready | VideoStatus::Ended)
    }
}

/// A seek in flight
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeekLock {
    pub generation: u64,
    pub target_time: f64,
}

/// Position of a transcript line relative to the active one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStatus {
    Past,
    Current,
    Future,
}

/// Synchronization state machine for one timeline
#[derive(Debug, Clone)]
pub struct SyncCore {
    config: SyncConfig,
    subtitles: Vec<Subtitle>,
    history: SubtitleHistory,
    clock: PlaybackClock,
    active_index: Option<usize>,
    last_auto_paused_id: Option<String>,
    seek_lock: Option<SeekLock>,
    seek_generation: u64,
    auto_pause_enabled: bool,
    source_url: Option<String>,
}

impl SyncCore {
    pub fn new(config: SyncConfig) -> Self {
        let history = SubtitleHistory::new(config.history_limit);
        Self {
            config,
            subtitles: Vec::new(),
            history,
            clock: PlaybackClock::default(),
            active_index: None,
            last_auto_paused_id: None,
            seek_lock: None,
            seek_generation: 0,
            auto_pause_enabled: false,
            source_url: None,
        }
    }

    pub fn with_subtitles(config: SyncConfig, subtitles: Vec<Subtitle>) -> Self {
        let mut core = Self::new(config);
        core.replace_subtitles(subtitles);
        core
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn subtitles(&self) -> &[Subtitle] {
        &self.subtitles
    }

    pub fn clock(&self) -> &PlaybackClock {
        &self.clock
    }

    pub fn is_playing(&self) -> bool {
        self.clock.playing
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active_index
    }

    pub fn active_subtitle(&self) -> Option<&Subtitle> {
        self.active_index.and_then(|idx| self.subtitles.get(idx))
    }

    pub fn last_auto_paused_id(&self) -> Option<&str> {
        self.last_auto_paused_id.as_deref()
    }

    pub fn seek_lock(&self) -> Option<SeekLock> {
        self.seek_lock
    }

    pub fn is_seek_locked(&self) -> bool {
        self.seek_lock.is_some()
    }

    pub fn auto_pause_enabled(&self) -> bool {
        self.auto_pause_enabled
    }

    pub fn source_url(&self) -> Option<&str> {
        self.source_url.as_deref()
    }

    pub fn can_undo(&self) -> bool {
        !self.history.is_empty()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Status of the line at `index` for rendering
    pub fn line_status(&self, index: usize) -> LineStatus {
        match self.active_index {
            Some(active) if index < active => LineStatus::Past,
            Some(active) if index == active => LineStatus::Current,
            _ => LineStatus::Future,
        }
    }

    pub fn set_auto_pause(&mut self, enabled: bool) {
        if self.auto_pause_enabled != enabled {
            debug!("Auto-pause {}", if enabled { "enabled" } else { "disabled" });
        }
        self.auto_pause_enabled = enabled;
    }

    // =========================================================================
    // Clock-driven resolution
    // =========================================================================

    /// Feed one progress notification from the video component
    pub fn on_tick(&mut self, current_time: f64, playing: bool) -> Vec<SyncAction> {
        self.clock.playing = playing;

        if let Some(lock) = self.seek_lock {
            // Pre-seek positions may still be arriving; drop them.
            trace!(
                "Ignoring progress {:.3}s while seek to {:.3}s settles",
                current_time, lock.target_time
            );
            return Vec::new();
        }

        if !current_time.is_finite() {
            warn!("Ignoring non-finite playback time");
            return Vec::new();
        }
        self.clock.current_time = current_time;

        let mut actions = Vec::new();

        let next = resolver::resolve(&ResolveInput {
            subtitles: &self.subtitles,
            current_time,
            playing: self.clock.playing,
            previous: self.active_index,
            auto_pause_enabled: self.auto_pause_enabled,
            last_auto_paused_id: self.last_auto_paused_id.as_deref(),
            seek_locked: false,
            config: &self.config,
        });
        self.commit_index(next, &mut actions);

        let fired = auto_pause::should_fire(&TriggerInput {
            subtitles: &self.subtitles,
            active: self.active_index,
            current_time,
            playing: self.clock.playing,
            enabled: self.auto_pause_enabled,
            last_auto_paused_id: self.last_auto_paused_id.as_deref(),
            config: &self.config,
        })
        .map(str::to_owned);

        if let Some(id) = fired {
            debug!("Auto-pause at {:.3}s for sentence {}", current_time, id);
            self.clock.playing = false;
            self.last_auto_paused_id = Some(id);
            actions.push(SyncAction::SetPlaying(false));
        }

        actions
    }

    fn commit_index(&mut self, next: Option<usize>, actions: &mut Vec<SyncAction>) {
        if next == self.active_index {
            return;
        }

        debug!("Active sentence {:?} -> {:?}", self.active_index, next);
        self.active_index = next;
        self.last_auto_paused_id = None;

        if let Some(idx) = next {
            actions.push(SyncAction::ScrollIntoView(idx));
        }
    }

    // =========================================================================
    // Seek coordination
    // =========================================================================

    /// Jump to `target_time`, optionally naming the sentence being jumped to.
    ///
    /// The active index is set immediately; clock ticks are ignored until the
    /// host releases the lock with the returned generation.
    pub fn seek(&mut self, target_time: f64, target_id: Option<&str>) -> Vec<SyncAction> {
        if !self.clock.ready() {
            warn!("Seek to {:.3}s ignored: no video ready", target_time);
            return Vec::new();
        }
        if !target_time.is_finite() {
            warn!("Seek to non-finite time ignored");
            return Vec::new();
        }

        let mut target_time = target_time.max(0.0);
        if self.clock.duration > 0.0 {
            target_time = target_time.min(self.clock.duration);
        }

        self.seek_generation = self.seek_generation.wrapping_add(1);
        let generation = self.seek_generation;
        self.seek_lock = Some(SeekLock { generation, target_time });
        self.last_auto_paused_id = None;

        let optimistic = target_id
            .and_then(|id| index_of_id(&self.subtitles, id))
            .or_else(|| locate(&self.subtitles, target_time, 0.0).strict);

        let mut actions = Vec::new();
        self.commit_index(optimistic, &mut actions);

        self.clock.current_time = target_time;
        self.clock.playing = true;
        if self.clock.status == VideoStatus::Ended {
            self.clock.status = VideoStatus::Ready;
        }

        debug!(
            "Seek #{} to {:.3}s (sentence {:?})",
            generation, target_time, self.active_index
        );

        actions.push(SyncAction::SeekTo(target_time + self.config.seek_epsilon_secs));
        actions.push(SyncAction::SetPlaying(true));
        actions.push(SyncAction::ReleaseSeekLockAfter {
            generation,
            delay: self.config.seek_settle(),
        });
        actions
    }

    /// Release the seek lock taken by seek `generation`.
    ///
    /// Returns false when a newer seek owns the lock (or none is held).
    pub fn release_seek_lock(&mut self, generation: u64) -> bool {
        match self.seek_lock {
            Some(lock) if lock.generation == generation => {
                trace!("Seek #{} settled", generation);
                self.seek_lock = None;
                true
            }
            _ => {
                trace!("Stale seek lock release #{} ignored", generation);
                false
            }
        }
    }

    /// Seek to the line before the active one, or to the beginning
    pub fn previous_sentence(&mut self) -> Vec<SyncAction> {
        match self.active_index {
            Some(idx) if idx > 0 => self.seek_to_line(idx - 1),
            _ => self.seek(0.0, None),
        }
    }

    /// Seek to the line after the active one (the first line when none is active)
    pub fn next_sentence(&mut self) -> Vec<SyncAction> {
        let next_idx = self.active_index.map_or(0, |idx| idx + 1);
        if next_idx < self.subtitles.len() {
            self.seek_to_line(next_idx)
        } else {
            Vec::new()
        }
    }

    /// Restart the active line
    pub fn replay_current(&mut self) -> Vec<SyncAction> {
        match self.active_index {
            Some(idx) => self.seek_to_line(idx),
            None => Vec::new(),
        }
    }

    /// Seek to the start of the line at `index`
    pub fn seek_to_line(&mut self, index: usize) -> Vec<SyncAction> {
        match self.subtitles.get(index) {
            Some(line) => {
                let (start, id) = (line.start, line.id.clone());
                self.seek(start, Some(&id))
            }
            None => Vec::new(),
        }
    }

    // =========================================================================
    // Play state and video lifecycle
    // =========================================================================

    pub fn toggle_play(&mut self) -> Vec<SyncAction> {
        if self.clock.playing {
            self.pause()
        } else {
            self.play()
        }
    }

    pub fn play(&mut self) -> Vec<SyncAction> {
        if !self.clock.ready() {
            warn!("Play ignored: no video ready");
            return Vec::new();
        }
        if self.clock.playing {
            return Vec::new();
        }
        self.clock.playing = true;
        if self.clock.status == VideoStatus::Ended {
            self.clock.status = VideoStatus::Ready;
        }
        vec![SyncAction::SetPlaying(true)]
    }

    pub fn pause(&mut self) -> Vec<SyncAction> {
        if !self.clock.playing {
            return Vec::new();
        }
        self.clock.playing = false;
        vec![SyncAction::SetPlaying(false)]
    }

    pub fn set_playback_rate(&mut self, rate: f64) -> Vec<SyncAction> {
        if !rate.is_finite() {
            warn!("Ignoring non-finite playback rate");
            return Vec::new();
        }
        let rate = rate.clamp(MIN_PLAYBACK_RATE, MAX_PLAYBACK_RATE);
        if (rate - self.clock.playback_rate).abs() < f64::EPSILON {
            return Vec::new();
        }
        debug!("Playback rate {} -> {}", self.clock.playback_rate, rate);
        self.clock.playback_rate = rate;
        vec![SyncAction::SetPlaybackRate(rate)]
    }

    /// A new video source is being loaded
    pub fn load_source(&mut self, url: impl Into<String>) {
        let url = url.into();
        info!("Loading video source {}", url);
        self.source_url = Some(url);
        self.clock = PlaybackClock {
            playback_rate: self.clock.playback_rate,
            status: VideoStatus::Loading,
            ..PlaybackClock::default()
        };
        self.seek_lock = None;
        self.last_auto_paused_id = None;
    }

    pub fn on_ready(&mut self) {
        debug!("Video ready");
        self.clock.status = VideoStatus::Ready;
    }

    pub fn on_duration(&mut self, duration: f64) {
        if duration.is_finite() && duration >= 0.0 {
            self.clock.duration = duration;
        }
    }

    pub fn on_ended(&mut self) -> Vec<SyncAction> {
        debug!("Video ended");
        self.clock.status = VideoStatus::Ended;
        self.clock.playing = false;
        vec![SyncAction::SetPlaying(false)]
    }

    /// Playback failed; subtitle state is kept for the next source
    pub fn on_error(&mut self, code: impl Into<String>) -> Vec<SyncAction> {
        let code = code.into();
        warn!("Video error: {}", code);
        self.clock.status = VideoStatus::Failed { code };
        self.clock.playing = false;
        self.seek_lock = None;
        vec![SyncAction::SetPlaying(false)]
    }

    // =========================================================================
    // Subtitle list mutation
    // =========================================================================

    /// Replace the whole list (import); history, active line, pause memory
    /// and seek lock are cleared
    pub fn replace_subtitles(&mut self, subtitles: Vec<Subtitle>) {
        info!("Loaded {} subtitle lines", subtitles.len());
        self.subtitles = subtitles;
        self.history.clear();
        self.active_index = None;
        self.last_auto_paused_id = None;
        self.seek_lock = None;
    }

    /// Merge the line `id` with its successor. No-op for unknown ids and the last line.
    pub fn merge(&mut self, id: &str) -> bool {
        let Some(idx) = index_of_id(&self.subtitles, id) else {
            debug!("Merge ignored: unknown sentence {}", id);
            return false;
        };
        if idx + 1 >= self.subtitles.len() {
            debug!("Merge ignored: sentence {} is the last line", id);
            return false;
        }

        self.history.push(self.subtitles.clone());

        let merged = self.subtitles[idx].merged_with(&self.subtitles[idx + 1]);
        self.subtitles.splice(idx..=idx + 1, std::iter::once(merged));

        // Keep pointing at the same sentence; the successor became part of idx
        if let Some(active) = self.active_index {
            if active > idx {
                self.active_index = Some(active - 1);
            }
        }
        self.last_auto_paused_id = None;

        info!("Merged sentence {} with its successor ({} lines left)", id, self.subtitles.len());
        true
    }

    /// Restore the list from before the last merge. No-op without history.
    pub fn undo(&mut self) -> bool {
        let Some(previous) = self.history.pop() else {
            debug!("Undo ignored: history is empty");
            return false;
        };

        let active_id = self.active_subtitle().map(|sub| sub.id.clone());
        self.subtitles = previous;

        let now = self.clock.current_time;
        self.active_index = match locate(&self.subtitles, now, 0.0).strict {
            Some(idx) => Some(idx),
            None => active_id.and_then(|id| index_of_id(&self.subtitles, &id)),
        };

        // A restored line the clock is already past must not trigger a late pause
        self.last_auto_paused_id = self
            .active_subtitle()
            .filter(|sub| sub.end <= now)
            .map(|sub| sub.id.clone());

        info!("Undo restored {} lines", self.subtitles.len());
        true
    }
}
