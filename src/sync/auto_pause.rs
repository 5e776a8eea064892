use crate::app_config::SyncConfig;
use crate::subtitle_processor::Subtitle;

/// Inputs the auto-pause trigger observes
#[derive(Debug, Clone, Copy)]
pub struct TriggerInput<'a> {
    pub subtitles: &'a [Subtitle],
    pub active: Option<usize>,
    pub current_time: f64,
    pub playing: bool,
    pub enabled: bool,
    pub last_auto_paused_id: Option<&'a str>,
    pub config: &'a SyncConfig,
}

/// Returns the id of the sentence to pause on, if the trigger fires this tick.
///
/// Fires once the clock passes the active line's end by the fire offset, and
/// never twice for the same id until the pause memory is cleared. A clock
/// that jumps straight past the sticky window can skip the trigger; the
/// resolver's guard is what normally prevents that.
pub fn should_fire<'a>(input: &TriggerInput<'a>) -> Option<&'a str> {
    if !input.enabled || !input.playing {
        return None;
    }

    let active = input.subtitles.get(input.active?)?;
    if input.last_auto_paused_id == Some(active.id.as_str()) {
        return None;
    }

    if input.current_time >= active.end + input.config.fire_offset_secs {
        Some(active.id.as_str())
    } else {
        None
    }
}
