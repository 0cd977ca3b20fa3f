//! Durable key-value storage behind the overlay store.

/// Process-local shared storage.
pub mod memory;
/// SQLite-backed storage.
pub mod sqlite;

use thiserror::Error;

/// Errors raised by storage backends.
#[derive(Debug, Error)]
pub enum PersistError {
    /// SQLite driver error.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// JSON (de)serialization error.
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    /// Write would exceed the backend's byte quota.
    #[error("storage quota exceeded: {needed} bytes needed, {quota} allowed")]
    QuotaExceeded {
        /// Bytes the write would occupy.
        needed: usize,
        /// Configured quota in bytes.
        quota: usize,
    },
    /// Backend cannot be used at all.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Result alias for storage operations.
pub type PersistResult<T> = Result<T, PersistError>;

/// Durable string key-value store scoped to one client profile.
pub trait KeyValueStorage: Send {
    /// Reads `key`; `None` when it was never written.
    fn get_item(&self, key: &str) -> PersistResult<Option<String>>;
    /// Writes `value` under `key`, replacing any previous value.
    fn set_item(&mut self, key: &str, value: &str) -> PersistResult<()>;
}

impl<S: KeyValueStorage + ?Sized> KeyValueStorage for Box<S> {
    fn get_item(&self, key: &str) -> PersistResult<Option<String>> {
        (**self).get_item(key)
    }

    fn set_item(&mut self, key: &str, value: &str) -> PersistResult<()> {
        (**self).set_item(key, value)
    }
}
