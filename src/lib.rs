/*!
 * # LingoPlay - dual-subtitle language-learning player
 *
 * A Rust library for watching video with a synchronized dual-language
 * transcript.
 *
 * ## Features
 *
 * - Pair two SRT tracks into a dual-language transcript
 * - Keep the active line in step with playback, with sticky hysteresis
 * - Pause once at the end of each sentence (auto-pause)
 * - Seek and sentence navigation guarded by a generation-based seek lock
 * - Merge adjacent lines with bounded undo
 * - Word and sentence analysis with AI providers:
 *   - Google Gemini
 *   - OpenAI-compatible chat completions
 * - Vocabulary notebook and sentence bookmarks persisted in SQLite
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `sync`: Synchronization state machine:
 *   - `sync::interval_index`: Interval lookup over the transcript
 *   - `sync::resolver`: Sticky resolution of the active line
 *   - `sync::auto_pause`: Once-per-sentence pause trigger
 *   - `sync::history`: Undo history for merges
 *   - `sync::core`: The `SyncCore` driven by the host
 * - `subtitle_processor`: SRT parsing and dual-track pairing
 * - `lookup_service`: Prompting and answer parsing for AI lookups
 * - `providers`: Client implementations for the LLM providers
 * - `notebook`: Saved words and bookmarked sentences
 * - `database`: SQLite key-value state store
 * - `shortcuts`: Keyboard map
 * - `app_controller`: Player session controller
 * - `app_config`: Configuration and user settings
 * - `language_utils`: ISO language code utilities
 * - `errors`: Custom error types for the application
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod database;
pub mod errors;
pub mod language_utils;
pub mod lookup_service;
pub mod notebook;
pub mod providers;
pub mod shortcuts;
pub mod subtitle_processor;
pub mod sync;

// Re-export main types for easier usage
pub use app_config::{Config, Settings, SyncConfig};
pub use app_controller::PlayerController;
pub use errors::{AppError, LookupError, ProviderError};
pub use subtitle_processor::Subtitle;
pub use sync::{SyncAction, SyncCore};
