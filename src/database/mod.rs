/*!
 * Database module for persistent application state.
 *
 * SQLite-backed storage for:
 * - User settings
 * - Saved vocabulary
 * - Bookmarked sentences
 */

pub mod connection;
pub mod repository;
pub mod schema;

// Re-export main types
pub use connection::DatabaseConnection;
pub use repository::{StateStore, SENTENCES_KEY, SETTINGS_KEY, VOCAB_KEY};
