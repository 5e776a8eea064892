/*!
 * Repository layer for persisted application state.
 *
 * Each collection is stored as one JSON document under a fixed key. Keys
 * load independently: a missing or corrupt document falls back to the
 * default value without affecting the others.
 */

use anyhow::{Context, Result};
use chrono::Utc;
use log::{debug, warn};
use rusqlite::{params, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

use super::connection::DatabaseConnection;

/// Key of the user settings document
pub const SETTINGS_KEY: &str = "settings";

/// Key of the saved words document
pub const VOCAB_KEY: &str = "vocab";

/// Key of the bookmarked sentences document
pub const SENTENCES_KEY: &str = "sentences";

/// Key/value store of JSON documents
#[derive(Clone, Debug)]
pub struct StateStore {
    db: DatabaseConnection,
}

impl StateStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Open (or create) the store at `path`
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::new(DatabaseConnection::new(path)?))
    }

    /// Create a store with an in-memory database (for testing)
    pub fn new_in_memory() -> Result<Self> {
        Ok(Self::new(DatabaseConnection::new_in_memory()?))
    }

    pub fn path(&self) -> &Path {
        self.db.path()
    }

    /// Raw JSON text stored under `key`
    pub fn get_raw(&self, key: &str) -> Result<Option<String>> {
        self.db.execute(|conn| {
            let value = conn
                .query_row(
                    "SELECT value FROM app_state WHERE key = ?1",
                    params![key],
                    |row| row.get::<_, String>(0),
                )
                .optional()
                .with_context(|| format!("Failed to read state key '{}'", key))?;
            Ok(value)
        })
    }

    /// Store raw JSON text under `key`, replacing any previous value
    pub fn put_raw(&self, key: &str, value: &str) -> Result<()> {
        let updated_at = Utc::now().to_rfc3339();
        self.db.execute(|conn| {
            conn.execute(
                r#"
                INSERT INTO app_state (key, value, updated_at) VALUES (?1, ?2, ?3)
                ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
                "#,
                params![key, value, updated_at],
            )
            .with_context(|| format!("Failed to write state key '{}'", key))?;
            Ok(())
        })
    }

    /// Remove `key`. Returns whether it existed.
    pub fn delete(&self, key: &str) -> Result<bool> {
        self.db.execute(|conn| {
            let removed = conn.execute("DELETE FROM app_state WHERE key = ?1", params![key])?;
            Ok(removed > 0)
        })
    }

    /// All stored keys, sorted
    pub fn keys(&self) -> Result<Vec<String>> {
        self.db.execute(|conn| {
            let mut stmt = conn.prepare("SELECT key FROM app_state ORDER BY key")?;
            let keys = stmt
                .query_map([], |row| row.get::<_, String>(0))?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(keys)
        })
    }

    /// Load the document under `key`, falling back to `T::default()`
    pub fn load_or_default<T>(&self, key: &str) -> T
    where
        T: DeserializeOwned + Default,
    {
        let raw = match self.get_raw(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("No stored '{}', using defaults", key);
                return T::default();
            }
            Err(e) => {
                warn!("Failed to read stored '{}', using defaults: {:#}", key, e);
                return T::default();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                warn!("Stored '{}' is corrupt, using defaults: {}", key, e);
                T::default()
            }
        }
    }

    /// Serialize `value` and store it under `key`
    pub fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let json = serde_json::to_string(value)
            .with_context(|| format!("Failed to serialize state key '{}'", key))?;
        self.put_raw(key, &json)
    }
}
