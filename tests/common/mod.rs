/*!
 * Common test utilities for the lingoplay test suite
 */

#![allow(dead_code)]

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use lingoplay::app_config::SyncConfig;
use lingoplay::app_controller::PlayerController;
use lingoplay::providers::mock::MockProvider;
use lingoplay::subtitle_processor::Subtitle;
use lingoplay::sync::{SyncAction, SyncCore};

/// English track used across tests
pub const PRIMARY_SRT: &str = "1
00:00:00,000 --> 00:00:04,000
Hello there.

2
00:00:04,000 --> 00:00:08,000
How are you?

3
00:00:09,000 --> 00:00:12,000
I am fine.
";

/// Chinese track with slightly shifted timing
pub const SECONDARY_SRT: &str = "1
00:00:00,200 --> 00:00:03,900
你好。

2
00:00:04,100 --> 00:00:08,200
你好吗？

3
00:00:09,100 --> 00:00:11,800
我很好。
";

/// Route `log` output to the test harness; safe to call from every test
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Build lines from (id, start, end); the text is "text <id>"
pub fn lines(spec: &[(&str, f64, f64)]) -> Vec<Subtitle> {
    spec.iter()
        .map(|(id, start, end)| Subtitle::new(*id, *start, *end, format!("text {}", id), format!("译 {}", id)))
        .collect()
}

/// Core over `spec` with a ready video and default timing
pub fn ready_core(spec: &[(&str, f64, f64)]) -> SyncCore {
    let mut core = SyncCore::with_subtitles(SyncConfig::default(), lines(spec));
    core.load_source("test://video");
    core.on_duration(60.0);
    core.on_ready();
    core
}

/// Feed playing ticks and collect every action
pub fn play_through(core: &mut SyncCore, times: &[f64]) -> Vec<SyncAction> {
    times
        .iter()
        .flat_map(|t| core.on_tick(*t, true))
        .collect()
}

/// The generation of the first lock release in `actions`
pub fn release_generation(actions: &[SyncAction]) -> Option<u64> {
    actions.iter().find_map(|action| match action {
        SyncAction::ReleaseSeekLockAfter { generation, .. } => Some(*generation),
        _ => None,
    })
}

/// Controller with the shared transcript, a ready video, an API key and a mock provider
pub fn controller_with_mock(provider: MockProvider) -> Result<PlayerController> {
    let mut controller = PlayerController::new_for_test()?;
    controller.use_mock_provider(provider);

    let mut settings = controller.settings().clone();
    settings.api_key = "test-key".to_string();
    controller.update_settings(settings)?;

    controller.import(PRIMARY_SRT, SECONDARY_SRT, Some("test://video"));
    controller.core_mut().on_duration(20.0);
    controller.core_mut().on_ready();
    Ok(controller)
}
