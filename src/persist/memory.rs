//! Process-local key-value storage shared between store instances.

use std::sync::{Arc, Mutex, MutexGuard};

use hashbrown::HashMap;

use super::{KeyValueStorage, PersistError, PersistResult};

#[derive(Debug, Default)]
struct Inner {
    items: HashMap<String, String>,
    quota_bytes: Option<usize>,
}

/// In-memory [`KeyValueStorage`]; clones share the same backing map.
///
/// Cloning gives the behaviour of two application instances opened in one
/// client profile: a write through one is visible to a store built on the other.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStorage {
    /// Empty storage with no quota.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejects writes once keys plus values would exceed `quota_bytes`.
    pub fn with_quota(quota_bytes: usize) -> Self {
        let storage = Self::default();
        if let Ok(mut inner) = storage.inner.lock() {
            inner.quota_bytes = Some(quota_bytes);
        }
        storage
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.lock().map(|inner| inner.items.len()).unwrap_or(0)
    }

    /// Returns true when nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> PersistResult<MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|_| PersistError::Unavailable("memory storage lock poisoned".to_string()))
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> PersistResult<Option<String>> {
        Ok(self.lock()?.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> PersistResult<()> {
        let mut inner = self.lock()?;
        if let Some(quota) = inner.quota_bytes {
            let others: usize = inner
                .items
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            let needed = others + key.len() + value.len();
            if needed > quota {
                return Err(PersistError::QuotaExceeded { needed, quota });
            }
        }
        inner.items.insert(key.to_string(), value.to_string());
        Ok(())
    }}
