/*!
 * Subtitle-to-playback synchronization.
 *
 * This module contains the state machine that keeps the active subtitle line
 * in step with the playback clock:
 * - `interval_index`: containing/nearest interval lookup
 * - `resolver`: sticky resolution of the active index
 * - `auto_pause`: once-per-sentence pause trigger
 * - `history`: bounded undo history for list mutations
 * - `core`: the `SyncCore` state object driven by the host
 */

pub mod interval_index;
pub mod resolver;
pub mod auto_pause;
pub mod history;
pub mod core;

pub use self::core::{LineStatus, PlaybackClock, SeekLock, SyncAction, SyncCore, VideoStatus};
pub use history::SubtitleHistory;
pub use interval_index::{locate, Location};
