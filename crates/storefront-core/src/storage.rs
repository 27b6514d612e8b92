// ── Session persistence port ──
//
// The session store persists through a small key-value port so the core
// never decides *where* a token lives. The CLI injects a file or keyring
// backend; tests and `--session memory` use `MemoryStorage`.

use dashmap::DashMap;
use thiserror::Error;

/// Storage key for the bearer token.
pub const TOKEN_KEY: &str = "token";
/// Storage key for the JSON-serialized user.
pub const USER_KEY: &str = "user";

#[derive(Debug, Error)]
pub enum StorageError {
    /// The backing store cannot be reached at all (locked keyring, no
    /// writable data directory).
    #[error("session storage unavailable: {0}")]
    Unavailable(String),

    #[error("session storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("stored session data is corrupt: {0}")]
    Corrupt(String),
}

/// Durable string key-value storage for the session.
///
/// Implementations must be safe to share across tasks. Writes are
/// individually durable; the session store handles pairing.
pub trait SessionStorage: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Process-local storage. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: DashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl SessionStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).map(|v| v.value().clone()))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn memory_storage_set_get_remove() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get(TOKEN_KEY).unwrap(), None);

        storage.set(TOKEN_KEY, "abc").unwrap();
        assert_eq!(storage.get(TOKEN_KEY).unwrap().as_deref(), Some("abc"));

        storage.remove(TOKEN_KEY).unwrap();
        storage.remove(TOKEN_KEY).unwrap();
        assert!(storage.is_empty());
    }
}
