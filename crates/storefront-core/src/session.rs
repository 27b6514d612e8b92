// ── Session Store ──
//
// Sole owner of the authenticated identity. The token and user live in one
// `Session` value, so memory can never hold one without the other; the
// persistence side keeps the same pairing by writing token-then-user with
// rollback and by repairing half-written pairs on hydrate.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::model::{Session, User};
use crate::storage::{SessionStorage, StorageError, TOKEN_KEY, USER_KEY};

pub struct SessionStore {
    storage: Arc<dyn SessionStorage>,
    current: watch::Sender<Option<Arc<Session>>>,
}

impl SessionStore {
    /// Create an anonymous store. Call [`hydrate()`](Self::hydrate) to pick
    /// up a persisted session.
    pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
        let (current, _) = watch::channel(None);
        Self { storage, current }
    }

    /// Load the persisted token/user pair, if any.
    ///
    /// The token is trusted as-is; the first authenticated request finds
    /// out whether the backend still accepts it. A half-present, unparseable
    /// or corrupt pair is treated as absent and removed from storage.
    pub fn hydrate(&self) -> Option<Arc<Session>> {
        let (token, user) = match (self.storage.get(TOKEN_KEY), self.storage.get(USER_KEY)) {
            (Ok(token), Ok(user)) => (token, user),
            (Err(e @ StorageError::Corrupt(_)), _) | (_, Err(e @ StorageError::Corrupt(_))) => {
                warn!(error = %e, "persisted session is corrupt; discarding");
                self.remove_persisted();
                return None;
            }
            (Err(e), _) | (_, Err(e)) => {
                warn!(error = %e, "cannot read persisted session; starting anonymous");
                return None;
            }
        };

        let session = match (token, user) {
            (None, None) => {
                debug!("no persisted session");
                return None;
            }
            (Some(token), Some(user)) => match serde_json::from_str::<User>(&user) {
                Ok(user) => Session::new(SecretString::from(token), user),
                Err(e) => {
                    warn!(error = %e, "persisted user record is corrupt; discarding session");
                    self.remove_persisted();
                    return None;
                }
            },
            (token, _) => {
                warn!(
                    has_token = token.is_some(),
                    "persisted session is half-written; discarding"
                );
                self.remove_persisted();
                return None;
            }
        };

        let session = Arc::new(session);
        debug!(user = %session.user().email, "hydrated persisted session");
        self.current.send_replace(Some(Arc::clone(&session)));
        Some(session)
    }

    /// Persist and activate a fresh session.
    ///
    /// Writes the token first, then the user. If the user write fails the
    /// token write is undone and the in-memory session stays as it was.
    pub fn install(&self, session: Session) -> Result<Arc<Session>, StorageError> {
        let user_json = serde_json::to_string(session.user())
            .map_err(|e| StorageError::Corrupt(e.to_string()))?;

        let previous_token = self.storage.get(TOKEN_KEY).ok().flatten();
        self.storage
            .set(TOKEN_KEY, session.token().expose_secret())?;

        if let Err(e) = self.storage.set(USER_KEY, &user_json) {
            let rollback = match previous_token {
                Some(ref prev) => self.storage.set(TOKEN_KEY, prev),
                None => self.storage.remove(TOKEN_KEY),
            };
            if let Err(rb) = rollback {
                warn!(error = %rb, "failed to roll back token write");
            }
            return Err(e);
        }

        let session = Arc::new(session);
        info!(user = %session.user().email, "session installed");
        self.current.send_replace(Some(Arc::clone(&session)));
        Ok(session)
    }

    /// Drop the session from memory and storage.
    ///
    /// Memory is cleared first so observers see the logout even if the
    /// storage backend then misbehaves.
    pub fn clear(&self) {
        let previous = self.current.send_replace(None);
        self.remove_persisted();
        if let Some(prev) = previous {
            info!(user = %prev.user().email, "session cleared");
        }
    }

    // ── Observation ──────────────────────────────────────────────────

    pub fn current(&self) -> Option<Arc<Session>> {
        self.current.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.borrow().is_some()
    }

    /// `true` if `session` is the very session currently installed (not
    /// just an equal-looking one).
    pub fn is_current(&self, session: &Arc<Session>) -> bool {
        self.current
            .borrow()
            .as_ref()
            .is_some_and(|cur| Arc::ptr_eq(cur, session))
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<Session>>> {
        self.current.subscribe()
    }

    fn remove_persisted(&self) {
        for key in [TOKEN_KEY, USER_KEY] {
            if let Err(e) = self.storage.remove(key) {
                warn!(key, error = %e, "failed to remove persisted session key");
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crate::storage::MemoryStorage;

    use super::*;

    /// Storage that refuses writes to one key.
    struct FailingWrites {
        inner: MemoryStorage,
        fail_key: &'static str,
    }

    impl SessionStorage for FailingWrites {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
            if key == self.fail_key {
                return Err(StorageError::Unavailable("disk full".into()));
            }
            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) -> Result<(), StorageError> {
            self.inner.remove(key)
        }
    }

    /// Storage whose reads report corruption until something is removed.
    #[derive(Default)]
    struct CorruptUntilCleared {
        inner: MemoryStorage,
        repaired: std::sync::atomic::AtomicBool,
    }

    impl SessionStorage for CorruptUntilCleared {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            if self.repaired.load(std::sync::atomic::Ordering::SeqCst) {
                self.inner.get(key)
            } else {
                Err(StorageError::Corrupt("garbage".into()))
            }
        }

        fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) -> Result<(), StorageError> {
            self.repaired.store(true, std::sync::atomic::Ordering::SeqCst);
            self.inner.remove(key)
        }
    }

    fn ada() -> Session {
        Session::new(
            SecretString::from("tok-ada".to_string()),
            User {
                id: "u1".into(),
                name: "Ada".into(),
                email: "ada@example.com".into(),
            },
        )
    }

    #[test]
    fn install_then_hydrate_round_trips_through_storage() {
        let storage = Arc::new(MemoryStorage::new());
        let store = SessionStore::new(storage.clone());
        store.install(ada()).unwrap();

        let fresh = SessionStore::new(storage);
        let session = fresh.hydrate().unwrap();
        assert_eq!(session.token().expose_secret(), "tok-ada");
        assert_eq!(session.user().name, "Ada");
        assert!(fresh.is_authenticated());
    }

    #[test]
    fn hydrate_repairs_half_written_pair() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(TOKEN_KEY, "orphan").unwrap();

        let store = SessionStore::new(storage.clone());
        assert!(store.hydrate().is_none());
        assert!(!store.is_authenticated());
        assert!(storage.is_empty());
    }

    #[test]
    fn hydrate_repairs_corrupt_user() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(TOKEN_KEY, "tok").unwrap();
        storage.set(USER_KEY, "{not json").unwrap();

        let store = SessionStore::new(storage.clone());
        assert!(store.hydrate().is_none());
        assert!(storage.is_empty());
    }

    #[test]
    fn hydrate_repairs_corrupt_storage() {
        let storage = Arc::new(CorruptUntilCleared::default());
        let store = SessionStore::new(storage.clone());

        assert!(store.hydrate().is_none());
        assert!(storage.repaired.load(std::sync::atomic::Ordering::SeqCst));
        store.install(ada()).unwrap();
        assert!(store.is_authenticated());
    }

    #[test]
    fn failed_user_write_rolls_back_token() {
        let storage = Arc::new(FailingWrites {
            inner: MemoryStorage::new(),
            fail_key: USER_KEY,
        });
        let store = SessionStore::new(storage.clone());

        assert!(store.install(ada()).is_err());
        assert!(store.current().is_none());
        assert_eq!(storage.get(TOKEN_KEY).unwrap(), None);
    }

    #[test]
    fn failed_user_write_restores_previous_token() {
        let storage = Arc::new(FailingWrites {
            inner: MemoryStorage::new(),
            fail_key: USER_KEY,
        });
        storage.inner.set(TOKEN_KEY, "old-token").unwrap();
        let store = SessionStore::new(storage.clone());

        assert!(store.install(ada()).is_err());
        assert_eq!(storage.get(TOKEN_KEY).unwrap().as_deref(), Some("old-token"));
    }

    #[test]
    fn clear_removes_memory_and_storage() {
        let storage = Arc::new(MemoryStorage::new());
        let store = SessionStore::new(storage.clone());
        let mut rx = store.subscribe();
        store.install(ada()).unwrap();
        assert!(rx.has_changed().unwrap());
        rx.mark_unchanged();

        store.clear();
        assert!(rx.has_changed().unwrap());
        assert!(store.current().is_none());
        assert!(storage.is_empty());
    }

    #[test]
    fn is_current_uses_identity() {
        let store = SessionStore::new(Arc::new(MemoryStorage::new()));
        let first = store.install(ada()).unwrap();
        assert!(store.is_current(&first));

        let second = store.install(ada()).unwrap();
        assert!(!store.is_current(&first));
        assert!(store.is_current(&second));
    }
}
