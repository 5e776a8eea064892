/*!
 * Sticky resolution of the active subtitle index.
 *
 * Each clock tick the resolver decides whether the committed active line
 * should change. The current line sticks past its nominal end for a short
 * window (longer while paused), and while auto-pause is armed it is not
 * allowed to advance before the pause fired for it. Nothing is resolved
 * into a gap unless a line was active before it.
 */

use crate::app_config::SyncConfig;
use crate::subtitle_processor::Subtitle;

use super::interval_index::{extended_contains, locate};

/// Everything one resolution step looks at
#[derive(Debug, Clone, Copy)]
pub struct ResolveInput<'a> {
    pub subtitles: &'a [Subtitle],
    pub current_time: f64,
    pub playing: bool,
    /// Committed index before this tick
    pub previous: Option<usize>,
    pub auto_pause_enabled: bool,
    pub last_auto_paused_id: Option<&'a str>,
    pub seek_locked: bool,
    pub config: &'a SyncConfig,
}

/// Compute the active index for this tick
pub fn resolve(input: &ResolveInput<'_>) -> Option<usize> {
    if input.seek_locked {
        return input.previous;
    }

    let config = input.config;
    let slack = config.extended_slack_secs;
    let location = locate(input.subtitles, input.current_time, slack);

    let previous = input
        .previous
        .filter(|idx| *idx < input.subtitles.len());

    if let Some(prev) = previous {
        if extended_contains(input.subtitles, prev, input.current_time, slack) {
            let threshold = if input.playing {
                config.sticky_playing_secs
            } else {
                config.sticky_paused_secs
            };
            if input.current_time < input.subtitles[prev].end + threshold {
                return Some(prev);
            }
        }
    }

    // Extended matches only apply with a line to hold; a gap reached from
    // nothing stays empty.
    let candidate = match previous {
        Some(_) => location.strict.or(location.extended),
        None => location.strict,
    };

    match previous {
        Some(prev) if holds_for_auto_pause(input, prev, candidate) => Some(prev),
        _ => candidate,
    }
}

/// Auto-pause guard: while playing with auto-pause on, a line may only be
/// left forward once the pause has fired for it.
fn holds_for_auto_pause(input: &ResolveInput<'_>, prev: usize, candidate: Option<usize>) -> bool {
    if !input.playing || !input.auto_pause_enabled {
        return false;
    }

    let advances = match candidate {
        Some(next) => next > prev,
        // Dropping into a gap or past the end counts as moving on, unless the
        // clock went backwards past the line start.
        None => input.current_time >= input.subtitles[prev].end,
    };
    if !advances {
        return false;
    }

    input.last_auto_paused_id != Some(input.subtitles[prev].id.as_str())
}
