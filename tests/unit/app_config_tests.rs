/*!
 * Tests for application configuration and user settings
 */

use anyhow::Result;
use lingoplay::app_config::{AiProvider, BlurMode, Config, LogLevel, Settings, SyncConfig};

use crate::common;

/// Test default configuration values
#[test]
fn test_defaultConfig_withNoParameters_shouldHaveTunedTimings() {
    let config = Config::default();

    assert!((config.sync.fire_offset_secs - 0.1).abs() < 1e-9);
    assert!((config.sync.sticky_playing_secs - 0.4).abs() < 1e-9);
    assert!((config.sync.sticky_paused_secs - 1.2).abs() < 1e-9);
    assert!((config.sync.extended_slack_secs - 1.5).abs() < 1e-9);
    assert!((config.sync.seek_epsilon_secs - 0.01).abs() < 1e-9);
    assert_eq!(config.sync.seek_settle_ms, 150);
    assert_eq!(config.sync.history_limit, 10);
    assert_eq!(config.log_level, LogLevel::Info);
    assert!(config.validate().is_ok());
}

/// Test timing validation
#[test]
fn test_syncConfigValidate_withVariousTimings_shouldValidateCorrectly() {
    let mut sync = SyncConfig::default();
    assert!(sync.validate().is_ok());

    // Sticky window shorter than the fire offset would skip every pause
    sync.sticky_playing_secs = 0.05;
    assert!(sync.validate().is_err());
    sync.sticky_playing_secs = 0.4;

    sync.extended_slack_secs = -1.0;
    assert!(sync.validate().is_err());
    sync.extended_slack_secs = f64::NAN;
    assert!(sync.validate().is_err());
    sync.extended_slack_secs = 1.5;

    sync.history_limit = 0;
    assert!(sync.validate().is_err());
}

#[test]
fn test_configValidate_withZeroTimeout_shouldFail() {
    let config = Config {
        request_timeout_secs: 0,
        ..Config::default()
    };

    assert!(config.validate().is_err());
}

#[test]
fn test_loadOrCreate_withMissingFile_shouldWriteDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("conf.json");

    let created = Config::load_or_create(&path)?;
    assert!(path.exists());

    let reloaded = Config::load_or_create(&path)?;
    assert_eq!(reloaded.sync, created.sync);
    Ok(())
}

#[test]
fn test_loadOrCreate_withPartialFile_shouldFillDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        temp_dir.path(),
        "conf.json",
        r#"{ "sync": { "sticky_paused_secs": 2.0 }, "log_level": "debug" }"#,
    )?;

    let config = Config::load_or_create(&path)?;

    assert!((config.sync.sticky_paused_secs - 2.0).abs() < 1e-9);
    assert!((config.sync.sticky_playing_secs - 0.4).abs() < 1e-9);
    assert_eq!(config.log_level, LogLevel::Debug);
    assert_eq!(config.request_timeout_secs, 60);
    Ok(())
}

#[test]
fn test_loadOrCreate_withInvalidJson_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "conf.json", "{ not json")?;

    assert!(Config::load_or_create(&path).is_err());
    Ok(())
}

#[test]
fn test_resolveDatabasePath_withConfiguredPath_shouldUseIt() -> Result<()> {
    let config = Config {
        database_path: Some("/tmp/lingoplay-test.db".to_string()),
        ..Config::default()
    };

    assert_eq!(config.resolve_database_path()?.to_string_lossy(), "/tmp/lingoplay-test.db");
    Ok(())
}

// ============================================================================
// Settings
// ============================================================================

#[test]
fn test_defaultSettings_shouldShowBothLinesWithoutKey() {
    let settings = Settings::default();

    assert_eq!(settings.provider, AiProvider::Gemini);
    assert_eq!(settings.blur_mode, BlurMode::None);
    assert!(settings.show_primary && settings.show_secondary);
    assert!(!settings.auto_pause);
    assert!(!settings.has_api_key());
    assert!(settings.validate().is_ok());
}

#[test]
fn test_settingsHasApiKey_withWhitespace_shouldBeFalse() {
    let settings = Settings {
        api_key: "   ".to_string(),
        ..Settings::default()
    };

    assert!(!settings.has_api_key());
}

#[test]
fn test_effectiveBaseUrl_shouldFallBackPerProvider() {
    let mut settings = Settings::default();
    assert_eq!(settings.effective_base_url(), "https://generativelanguage.googleapis.com");

    settings.provider = AiProvider::OpenAI;
    assert_eq!(settings.effective_base_url(), "https://api.openai.com/v1");

    settings.base_url = " http://localhost:11434/v1/ ".to_string();
    assert_eq!(settings.effective_base_url(), "http://localhost:11434/v1");
}

#[test]
fn test_settingsValidate_withBadValues_shouldFail() {
    let mut settings = Settings::default();

    settings.primary_language = "xx-invalid".to_string();
    assert!(settings.validate().is_err());
    settings.primary_language = "en".to_string();

    settings.model_name = " ".to_string();
    assert!(settings.validate().is_err());
    settings.model_name = "gpt-4o-mini".to_string();

    settings.base_url = "not a url".to_string();
    assert!(settings.validate().is_err());
}

#[test]
fn test_settingsDeserialize_withMissingFields_shouldUseDefaults() -> Result<()> {
    let settings: Settings = serde_json::from_str(r#"{ "provider": "openai", "auto_pause": true }"#)?;

    assert_eq!(settings.provider, AiProvider::OpenAI);
    assert!(settings.auto_pause);
    assert!(settings.show_secondary);
    assert_eq!(settings.model_name, Settings::default().model_name);
    Ok(())
}

#[test]
fn test_aiProviderFromStr_shouldAcceptKnownNames() {
    assert_eq!("Gemini".parse::<AiProvider>().unwrap(), AiProvider::Gemini);
    assert_eq!("openai".parse::<AiProvider>().unwrap(), AiProvider::OpenAI);
    assert!("anthropic".parse::<AiProvider>().is_err());
    assert_eq!(AiProvider::OpenAI.to_string(), "openai");
}

#[test]
fn test_blurModeCycle_shouldWrapAround() {
    assert_eq!(BlurMode::None.cycle(), BlurMode::Focus);
    assert_eq!(BlurMode::Focus.cycle(), BlurMode::All);
    assert_eq!(BlurMode::All.cycle(), BlurMode::None);
    assert_eq!(BlurMode::Focus.label(), "Blur: Focus");
}
