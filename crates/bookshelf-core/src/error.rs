use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Session file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("Keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("Cannot determine data directory")]
    NoDataDir,
}

#[derive(Debug, Error)]
pub enum AuthError {
    /// No base URL was configured, so no request can be addressed.
    #[error("auth endpoint is not configured (set BOOKSHELF_AUTH_URL)")]
    MissingBaseUrl,

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// The server answered with a non-2xx status. `payload` is the body exactly as sent.
    #[error("rejected by server ({status}): {payload}")]
    Rejected { status: StatusCode, payload: Value },

    #[error("session store error: {0}")]
    Store(#[from] StoreError),
}

impl AuthError {
    /// True for the expected failure shape (server said no), false for everything unexpected.
    pub fn is_rejection(&self) -> bool {
        matches!(self, AuthError::Rejected { .. })
    }

    pub fn payload(&self) -> Option<&Value> {
        match self {
            AuthError::Rejected { payload, .. } => Some(payload),
            _ => None,
        }
    }

    /// Server-provided `message` field, when the rejection payload has one.
    pub fn message(&self) -> Option<&str> {
        self.payload()
            .and_then(|p| p.get("message"))
            .and_then(|m| m.as_str())
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            AuthError::Rejected { status, .. } => Some(*status),
            AuthError::Transport(err) => err.status(),
            _ => None,
        }
    }
}
