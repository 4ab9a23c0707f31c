use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::StoreError;
use crate::paths;
use crate::session::{FileBackend, KeyringBackend, MemoryBackend, SessionStore};

pub const AUTH_URL_ENV: &str = "BOOKSHELF_AUTH_URL";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthConfig {
    /// Base of `/login` and `/register`. `None` makes every request fail.
    pub base_url: Option<String>,
}

impl AuthConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            base_url: lookup(AUTH_URL_ENV).and_then(normalize_base_url),
        }
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: normalize_base_url(base_url.into()),
        }
    }

    pub fn endpoint(&self, name: &str) -> Option<String> {
        self.base_url
            .as_ref()
            .map(|base| format!("{}/{}", base, name))
    }
}

fn normalize_base_url(raw: String) -> Option<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BackendKind {
    Memory,
    #[default]
    File,
    Keyring,
}

impl BackendKind {
    /// Opens a session store on this backend. `data_dir` overrides the platform data directory.
    pub fn open(self, data_dir: Option<PathBuf>) -> Result<SessionStore, StoreError> {
        let store = match self {
            BackendKind::Memory => SessionStore::new(Arc::new(MemoryBackend::default())),
            BackendKind::File => {
                let dir = match data_dir {
                    Some(dir) => dir,
                    None => paths::data_dir()?,
                };
                SessionStore::new(Arc::new(FileBackend::new(dir.join(paths::SESSION_FILE))))
            }
            BackendKind::Keyring => SessionStore::new(Arc::new(KeyringBackend::new())),
        };
        Ok(store)
    }
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "memory" => Ok(BackendKind::Memory),
            "file" => Ok(BackendKind::File),
            "keyring" => Ok(BackendKind::Keyring),
            other => Err(format!(
                "unknown session store '{other}' (expected memory, file or keyring)"
            )),
        }
    }
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            BackendKind::Memory => "memory",
            BackendKind::File => "file",
            BackendKind::Keyring => "keyring",
        };
        f.write_str(name)
    }
}
