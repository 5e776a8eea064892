/*!
 * Tests for the synchronization state machine
 */

use std::time::Duration;

use lingoplay::app_config::SyncConfig;
use lingoplay::sync::{LineStatus, SyncAction, SyncCore, VideoStatus};

use crate::common::{lines, play_through, ready_core, release_generation};

const TWO_LINES: &[(&str, f64, f64)] = &[("a", 0.0, 4.0), ("b", 4.0, 8.0)];

fn pauses(actions: &[SyncAction]) -> usize {
    actions
        .iter()
        .filter(|action| **action == SyncAction::SetPlaying(false))
        .count()
}

fn seek_target(actions: &[SyncAction]) -> Option<f64> {
    actions.iter().find_map(|action| match action {
        SyncAction::SeekTo(time) => Some(*time),
        _ => None,
    })
}

// ============================================================================
// Resolution
// ============================================================================

#[test]
fn test_onTick_nearSentenceEnd_shouldStickThenRelease() {
    let mut core = ready_core(TWO_LINES);

    assert_eq!(core.on_tick(3.9, true), vec![SyncAction::ScrollIntoView(0)]);
    assert!(core.on_tick(4.3, true).is_empty());
    assert_eq!(core.active_index(), Some(0));

    assert_eq!(core.on_tick(4.6, true), vec![SyncAction::ScrollIntoView(1)]);
    assert_eq!(core.active_index(), Some(1));
}

#[test]
fn test_onTick_whilePaused_shouldUseLongerStickyWindow() {
    let mut core = ready_core(TWO_LINES);
    core.on_tick(3.9, true);

    core.on_tick(5.0, false);
    assert_eq!(core.active_index(), Some(0));

    core.on_tick(5.3, false);
    assert_eq!(core.active_index(), Some(1));
}

#[test]
fn test_onTick_withNonFiniteTime_shouldIgnore() {
    let mut core = ready_core(TWO_LINES);
    core.on_tick(1.0, true);

    assert!(core.on_tick(f64::NAN, true).is_empty());
    assert_eq!(core.active_index(), Some(0));
    assert!((core.clock().current_time - 1.0).abs() < 1e-9);
}

#[test]
fn test_onTick_pastLastLine_shouldClearActiveLine() {
    let mut core = ready_core(TWO_LINES);
    core.on_tick(7.0, true);

    assert!(core.on_tick(10.0, true).is_empty());
    assert_eq!(core.active_index(), None);
    assert_eq!(core.line_status(1), LineStatus::Future);
}

// ============================================================================
// Auto-pause
// ============================================================================

#[test]
fn test_autoPause_endToEnd_shouldPauseOnceAtFireOffset() {
    let mut core = ready_core(TWO_LINES);
    core.set_auto_pause(true);

    let before = play_through(&mut core, &[0.0, 1.0, 2.0, 3.0, 3.9, 4.05]);
    assert_eq!(pauses(&before), 0);
    assert_eq!(core.active_index(), Some(0));

    let actions = core.on_tick(4.15, true);
    assert_eq!(actions, vec![SyncAction::SetPlaying(false)]);
    assert_eq!(core.last_auto_paused_id(), Some("a"));
    assert!(!core.is_playing());

    // Paused ticks keep the sentence
    assert!(core.on_tick(4.2, false).is_empty());
    assert_eq!(core.active_index(), Some(0));

    // Resuming moves on to the next sentence and clears the memory
    assert_eq!(core.play(), vec![SyncAction::SetPlaying(true)]);
    assert_eq!(core.on_tick(4.5, true), vec![SyncAction::ScrollIntoView(1)]);
    assert_eq!(core.last_auto_paused_id(), None);
}

#[test]
fn test_autoPause_afterImmediateResume_shouldNotFireTwice() {
    let mut core = ready_core(TWO_LINES);
    core.set_auto_pause(true);
    play_through(&mut core, &[3.9, 4.15]);

    core.play();
    let actions = play_through(&mut core, &[4.2, 4.3, 4.35]);

    assert_eq!(pauses(&actions), 0);
    assert_eq!(core.last_auto_paused_id(), Some("a"));
}

#[test]
fn test_autoPause_afterReplay_shouldFireAgain() {
    let mut core = ready_core(TWO_LINES);
    core.set_auto_pause(true);
    play_through(&mut core, &[3.9, 4.15]);

    let actions = core.replay_current();
    assert_eq!(core.last_auto_paused_id(), None);
    let generation = release_generation(&actions).unwrap();
    assert!(core.release_seek_lock(generation));

    let replayed = play_through(&mut core, &[0.5, 2.0, 3.9, 4.15]);
    assert_eq!(pauses(&replayed), 1);
    assert_eq!(core.last_auto_paused_id(), Some("a"));
}

#[test]
fn test_autoPause_withClockJumpPastWindow_shouldHoldAndPause() {
    let mut core = ready_core(&[("a", 0.0, 4.0), ("b", 5.0, 8.0)]);
    core.set_auto_pause(true);
    core.on_tick(3.9, true);

    let actions = core.on_tick(5.6, true);

    assert_eq!(actions, vec![SyncAction::SetPlaying(false)]);
    assert_eq!(core.active_index(), Some(0));

    core.play();
    assert_eq!(core.on_tick(5.7, true), vec![SyncAction::ScrollIntoView(1)]);
}

#[test]
fn test_autoPause_disabled_shouldLetClockJumpAdvance() {
    let mut core = ready_core(&[("a", 0.0, 4.0), ("b", 5.0, 8.0)]);
    core.on_tick(3.9, true);

    assert_eq!(core.on_tick(5.6, true), vec![SyncAction::ScrollIntoView(1)]);
}

#[test]
fn test_autoPause_toggledOff_shouldStopPausing() {
    let mut core = ready_core(TWO_LINES);
    core.set_auto_pause(true);
    core.set_auto_pause(false);

    let actions = play_through(&mut core, &[3.9, 4.15, 4.3]);

    assert_eq!(pauses(&actions), 0);
    assert!(!core.auto_pause_enabled());
}

// ============================================================================
// Seek coordination
// ============================================================================

#[test]
fn test_nextSentence_shouldCommitOptimisticallyAndLock() {
    let mut core = ready_core(&[("a", 0.0, 4.0), ("b", 4.0, 8.0), ("c", 9.0, 12.0)]);
    core.on_tick(1.0, true);

    let actions = core.next_sentence();

    assert_eq!(actions[0], SyncAction::ScrollIntoView(1));
    assert!((seek_target(&actions).unwrap() - 4.01).abs() < 1e-9);
    assert!(actions.contains(&SyncAction::SetPlaying(true)));
    assert!(actions.contains(&SyncAction::ReleaseSeekLockAfter {
        generation: 1,
        delay: Duration::from_millis(150),
    }));
    assert_eq!(core.active_index(), Some(1));
    assert!(core.is_seek_locked());
}

#[test]
fn test_onTick_whileSeekLocked_shouldIgnoreStalePositions() {
    let mut core = ready_core(&[("a", 0.0, 4.0), ("b", 4.0, 8.0), ("c", 9.0, 12.0)]);
    core.on_tick(1.0, true);
    let actions = core.next_sentence();

    // The video still reports the pre-seek position
    assert!(core.on_tick(1.05, true).is_empty());
    assert_eq!(core.active_index(), Some(1));

    assert!(core.release_seek_lock(release_generation(&actions).unwrap()));
    assert!(core.on_tick(4.02, true).is_empty());
    assert_eq!(core.active_index(), Some(1));
}

#[test]
fn test_releaseSeekLock_withStaleGeneration_shouldKeepNewerLock() {
    let mut core = ready_core(&[("a", 0.0, 4.0), ("b", 4.0, 8.0), ("c", 9.0, 12.0)]);
    core.on_tick(1.0, true);

    let first = release_generation(&core.next_sentence()).unwrap();
    let second = release_generation(&core.next_sentence()).unwrap();

    assert!(second > first);
    assert_eq!(core.active_index(), Some(2));
    assert!(!core.release_seek_lock(first));
    assert!(core.is_seek_locked());
    assert!(core.release_seek_lock(second));
    assert!(!core.is_seek_locked());
}

#[test]
fn test_seek_withNamedLineOutsideTarget_shouldCommitNamedLine() {
    let mut core = ready_core(&[("1", 0.0, 2.0), ("2", 2.0, 4.0), ("3", 6.0, 8.0)]);
    core.on_tick(1.0, true);

    let actions = core.seek(5.2, Some("3"));

    assert_eq!(core.active_index(), Some(2));
    assert_eq!(actions[0], SyncAction::ScrollIntoView(2));
    assert!((seek_target(&actions).unwrap() - 5.21).abs() < 1e-9);
    assert_eq!(core.last_auto_paused_id(), None);
    assert!(core.is_seek_locked());

    // Pre-seek positions do not undo the choice
    assert!(core.on_tick(1.05, true).is_empty());
    assert_eq!(core.active_index(), Some(2));
}

#[test]
fn test_seek_intoGapAfterLine_shouldNotFlickerBackOrPause() {
    let mut core = ready_core(&[("a", 0.0, 4.0), ("b", 6.0, 8.0)]);
    core.set_auto_pause(true);
    core.on_tick(1.0, true);

    let actions = core.seek(5.0, None);
    assert_eq!(core.active_index(), None);
    assert!(core.release_seek_lock(release_generation(&actions).unwrap()));

    let settled = play_through(&mut core, &[5.01, 5.2, 5.6]);
    assert!(settled.is_empty());
    assert_eq!(core.active_index(), None);
    assert_eq!(core.last_auto_paused_id(), None);
    assert!(core.is_playing());

    assert_eq!(core.on_tick(6.1, true), vec![SyncAction::ScrollIntoView(1)]);
}

#[test]
fn test_seek_withoutReadyVideo_shouldDoNothing() {
    let mut core = SyncCore::with_subtitles(SyncConfig::default(), lines(TWO_LINES));

    assert!(core.seek(2.0, None).is_empty());
    assert!(core.next_sentence().is_empty());
    assert!(!core.is_seek_locked());
}

#[test]
fn test_seek_outsideDuration_shouldClamp() {
    let mut core = ready_core(TWO_LINES);

    let past_end = core.seek(100.0, None);
    assert!((seek_target(&past_end).unwrap() - 60.01).abs() < 1e-9);

    let before_start = core.seek(-5.0, None);
    assert!((seek_target(&before_start).unwrap() - 0.01).abs() < 1e-9);
    assert_eq!(core.active_index(), Some(0));
}

#[test]
fn test_previousSentence_atFirstLine_shouldSeekToStart() {
    let mut core = ready_core(TWO_LINES);
    core.on_tick(1.0, true);

    let actions = core.previous_sentence();

    assert!((seek_target(&actions).unwrap() - 0.01).abs() < 1e-9);
    assert_eq!(core.active_index(), Some(0));
}

#[test]
fn test_nextSentence_atLastLine_shouldDoNothing() {
    let mut core = ready_core(TWO_LINES);
    core.on_tick(5.0, true);

    assert!(core.next_sentence().is_empty());
    assert!(!core.is_seek_locked());
}

#[test]
fn test_seek_afterEnded_shouldRestartPlayback() {
    let mut core = ready_core(TWO_LINES);
    core.on_ended();
    assert_eq!(core.clock().status, VideoStatus::Ended);

    let actions = core.seek_to_line(0);

    assert!(actions.contains(&SyncAction::SetPlaying(true)));
    assert_eq!(core.clock().status, VideoStatus::Ready);
    assert!(core.is_playing());
}

// ============================================================================
// Video lifecycle and playback state
// ============================================================================

#[test]
fn test_onError_shouldRefusePlayUntilNewSource() {
    let mut core = ready_core(TWO_LINES);
    core.seek(2.0, None);

    core.on_error("MEDIA_ERR_DECODE");

    assert!(!core.is_seek_locked());
    assert!(core.play().is_empty());
    assert!(matches!(core.clock().status, VideoStatus::Failed { .. }));

    core.load_source("test://other");
    core.on_ready();
    assert_eq!(core.play(), vec![SyncAction::SetPlaying(true)]);
    assert_eq!(core.source_url(), Some("test://other"));
}

#[test]
fn test_togglePlay_shouldAlternate() {
    let mut core = ready_core(TWO_LINES);

    assert_eq!(core.toggle_play(), vec![SyncAction::SetPlaying(true)]);
    assert_eq!(core.toggle_play(), vec![SyncAction::SetPlaying(false)]);
    assert!(core.pause().is_empty());
}

#[test]
fn test_setPlaybackRate_shouldClampAndSkipNoOps() {
    let mut core = ready_core(TWO_LINES);

    assert_eq!(core.set_playback_rate(10.0), vec![SyncAction::SetPlaybackRate(4.0)]);
    assert!(core.set_playback_rate(4.0).is_empty());
    assert!(core.set_playback_rate(f64::INFINITY).is_empty());
    assert_eq!(core.set_playback_rate(0.1), vec![SyncAction::SetPlaybackRate(0.25)]);
}

#[test]
fn test_loadSource_shouldKeepPlaybackRate() {
    let mut core = ready_core(TWO_LINES);
    core.set_playback_rate(1.5);

    core.load_source("test://next");

    assert!((core.clock().playback_rate - 1.5).abs() < 1e-9);
    assert_eq!(core.clock().status, VideoStatus::Loading);
    assert!(!core.is_playing());
}

// ============================================================================
// Merge and undo
// ============================================================================

#[test]
fn test_merge_shouldJoinWithSuccessorAndKeepActiveSentence() {
    let mut core = ready_core(&[("a", 0.0, 2.0), ("b", 2.0, 4.0), ("c", 4.0, 6.0)]);
    core.on_tick(5.0, true);

    assert!(core.merge("a"));

    let subs = core.subtitles();
    assert_eq!(subs.len(), 2);
    assert_eq!(subs[0].id, "a");
    assert!((subs[0].end - 4.0).abs() < 1e-9);
    assert_eq!(subs[0].text_primary, "text a text b");
    assert_eq!(subs[0].text_secondary, "译 a 译 b");
    assert_eq!(core.active_subtitle().map(|s| s.id.as_str()), Some("c"));
}

#[test]
fn test_merge_withActiveSuccessor_shouldPointAtMergedLine() {
    let mut core = ready_core(&[("a", 0.0, 2.0), ("b", 2.0, 4.0), ("c", 4.0, 6.0)]);
    core.on_tick(3.0, true);

    assert!(core.merge("a"));
    assert_eq!(core.active_index(), Some(0));
}

#[test]
fn test_merge_lastOrUnknownLine_shouldBeNoOp() {
    let mut core = ready_core(TWO_LINES);

    assert!(!core.merge("b"));
    assert!(!core.merge("missing"));
    assert_eq!(core.subtitles().len(), 2);
    assert!(!core.can_undo());
}

#[test]
fn test_undo_afterMerge_shouldRestoreListAndRemapActive() {
    let mut core = ready_core(&[("a", 0.0, 2.0), ("b", 2.0, 4.0), ("c", 4.0, 6.0)]);
    core.on_tick(5.0, true);
    let original = core.subtitles().to_vec();

    core.merge("a");
    assert!(core.undo());

    assert_eq!(core.subtitles(), original.as_slice());
    assert_eq!(core.active_index(), Some(2));
    assert!(!core.undo());
}

#[test]
fn test_undo_withActiveMergedLine_shouldFollowTheClock() {
    let mut core = ready_core(&[("a", 0.0, 2.0), ("b", 2.0, 4.0), ("c", 4.0, 6.0)]);
    core.set_auto_pause(true);
    core.merge("b");
    core.on_tick(5.0, true);
    assert_eq!(core.active_subtitle().map(|s| s.id.as_str()), Some("b"));

    assert!(core.undo());
    assert_eq!(core.active_subtitle().map(|s| s.id.as_str()), Some("c"));

    // No pause for "b", which ended a second ago
    assert!(core.on_tick(5.05, true).is_empty());
    assert_eq!(core.active_index(), Some(2));
    assert!(core.is_playing());
}

#[test]
fn test_undo_withClockInRestoredGap_shouldKeepLineWithoutLatePause() {
    let mut core = ready_core(&[("a", 0.0, 2.0), ("b", 2.0, 4.0), ("c", 5.0, 6.0), ("d", 7.0, 8.0)]);
    core.set_auto_pause(true);
    core.merge("b");
    core.on_tick(4.5, true);

    assert!(core.undo());
    assert_eq!(core.active_index(), Some(1));
    assert_eq!(core.last_auto_paused_id(), Some("b"));

    assert!(core.on_tick(4.6, true).is_empty());
    assert_eq!(core.on_tick(5.1, true), vec![SyncAction::ScrollIntoView(2)]);
    assert!(core.is_playing());
}

#[test]
fn test_history_shouldKeepOnlyTheConfiguredSnapshots() {
    let spec: Vec<(String, f64, f64)> = (0..12)
        .map(|i| (format!("l{}", i), i as f64, i as f64 + 1.0))
        .collect();
    let spec_refs: Vec<(&str, f64, f64)> = spec.iter().map(|(id, s, e)| (id.as_str(), *s, *e)).collect();
    let mut core = ready_core(&spec_refs);

    for _ in 0..11 {
        assert!(core.merge("l0"));
    }
    assert_eq!(core.history_len(), 10);

    let mut undone = 0;
    while core.undo() {
        undone += 1;
    }
    assert_eq!(undone, 10);
    assert_eq!(core.subtitles().len(), 11);
}

#[test]
fn test_replaceSubtitles_shouldClearHistoryAndActiveLine() {
    let mut core = ready_core(&[("a", 0.0, 2.0), ("b", 2.0, 4.0), ("c", 4.0, 6.0)]);
    core.on_tick(1.0, true);
    core.merge("a");

    core.replace_subtitles(lines(TWO_LINES));

    assert!(!core.can_undo());
    assert_eq!(core.active_index(), None);
    assert_eq!(core.subtitles().len(), 2);
}

#[test]
fn test_lineStatus_shouldSplitAroundActive() {
    let mut core = ready_core(&[("a", 0.0, 2.0), ("b", 2.0, 4.0), ("c", 4.0, 6.0)]);
    core.on_tick(3.0, true);

    assert_eq!(core.line_status(0), LineStatus::Past);
    assert_eq!(core.line_status(1), LineStatus::Current);
    assert_eq!(core.line_status(2), LineStatus::Future);
}
