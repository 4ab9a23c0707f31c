//! Persistence of the single session token.

use std::sync::Arc;
use tracing::warn;

use crate::error::StoreError;
use crate::models::User;

mod file;
mod keychain;
mod memory;

pub use self::file::FileBackend;
pub use self::keychain::KeyringBackend;
pub use self::memory::MemoryBackend;

/// Key the token is stored under, shared with any other reader of the same storage.
pub const TOKEN_KEY: &str = "__auth_provider_token__";

/// Durable string key-value storage underneath a [`SessionStore`].
pub trait TokenBackend: Send + Sync {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn write(&self, key: &str, value: &str) -> Result<(), StoreError>;
    /// Removing a key that is not present succeeds.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

#[derive(Clone)]
pub struct SessionStore {
    backend: Arc<dyn TokenBackend>,
}

impl SessionStore {
    pub fn new(backend: Arc<dyn TokenBackend>) -> Self {
        Self { backend }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryBackend::default()))
    }

    /// Stored token, or `None` when nothing is recorded. Backend faults read as absence.
    pub fn get_token(&self) -> Option<String> {
        match self.backend.read(TOKEN_KEY) {
            Ok(token) => token,
            Err(err) => {
                warn!(error = %err, "session token unreadable, treating as signed out");
                None
            }
        }
    }

    /// Persists `user.token`, replacing any previous token, and hands the user back.
    pub fn set_token(&self, user: User) -> Result<User, StoreError> {
        self.backend.write(TOKEN_KEY, &user.token)?;
        Ok(user)
    }

    pub fn clear_token(&self) -> Result<(), StoreError> {
        self.backend.remove(TOKEN_KEY)
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore").finish_non_exhaustive()
    }
}
