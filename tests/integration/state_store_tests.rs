/*!
 * Integration tests for persistence across sessions
 */

use anyhow::Result;
use lingoplay::app_config::{AiProvider, BlurMode, Config, Settings};
use lingoplay::app_controller::PlayerController;
use lingoplay::database::{StateStore, SENTENCES_KEY, SETTINGS_KEY, VOCAB_KEY};
use lingoplay::providers::mock::MockProvider;

use crate::common::{self, PRIMARY_SRT, SECONDARY_SRT};

/// Settings, words and bookmarks survive reopening the database file
#[tokio::test]
async fn test_session_reopenedFromDisk_shouldRestoreEverything() -> Result<()> {
    common::init_logging();
    let temp_dir = common::create_temp_dir()?;
    let db_path = temp_dir.path().join("state").join("lingoplay.db");

    {
        let mut controller = PlayerController::new(Config::default(), StateStore::open(&db_path)?)?;
        controller.use_mock_provider(MockProvider::working());
        controller.update_settings(Settings {
            provider: AiProvider::OpenAI,
            api_key: "sk-test".to_string(),
            model_name: "gpt-4o-mini".to_string(),
            auto_pause: true,
            ..Settings::default()
        })?;
        controller.cycle_blur_mode()?;

        controller.import(PRIMARY_SRT, SECONDARY_SRT, None);
        let line_id = controller.core().subtitles()[1].id.clone();
        controller.toggle_bookmark(&line_id)?;

        let (pending, _) = controller.begin_word_lookup("How", "How are you?")?;
        controller.complete_lookup(pending.run().await);
        assert!(controller.save_looked_up_word()?);
    }

    let reopened = PlayerController::new(Config::default(), StateStore::open(&db_path)?)?;

    assert_eq!(reopened.settings().provider, AiProvider::OpenAI);
    assert_eq!(reopened.settings().blur_mode, BlurMode::Focus);
    assert!(reopened.core().auto_pause_enabled());
    assert_eq!(reopened.notebook().words()[0].word, "How");
    assert_eq!(reopened.notebook().sentences()[0].text_primary, "How are you?");
    Ok(())
}

#[test]
fn test_controllerNew_withCorruptSettings_shouldFallBackToDefaults() -> Result<()> {
    let store = StateStore::new_in_memory()?;
    store.put_raw(SETTINGS_KEY, "{ broken")?;
    store.save(VOCAB_KEY, &Vec::<lingoplay::notebook::SavedWord>::new())?;

    let controller = PlayerController::new(Config::default(), store)?;

    assert_eq!(controller.settings(), &Settings::default());
    assert!(controller.notebook().words().is_empty());
    Ok(())
}

#[test]
fn test_stateStore_keysAndDelete_shouldTrackDocuments() -> Result<()> {
    let store = StateStore::new_in_memory()?;
    store.put_raw(VOCAB_KEY, "[]")?;
    store.put_raw(SENTENCES_KEY, "[]")?;
    store.put_raw(VOCAB_KEY, "[ ]")?;

    assert_eq!(store.keys()?, vec![SENTENCES_KEY.to_string(), VOCAB_KEY.to_string()]);
    assert_eq!(store.get_raw(VOCAB_KEY)?.as_deref(), Some("[ ]"));

    assert!(store.delete(VOCAB_KEY)?);
    assert!(!store.delete(VOCAB_KEY)?);
    assert_eq!(store.get_raw(VOCAB_KEY)?, None);
    Ok(())
}

#[test]
fn test_controllerNew_withInvalidConfig_shouldFail() -> Result<()> {
    let mut config = Config::default();
    config.sync.history_limit = 0;

    assert!(PlayerController::new(config, StateStore::new_in_memory()?).is_err());
    Ok(())
}
