use serde_json::Value;
use tracing::debug;

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::models::{Credentials, User, UserEnvelope};
use crate::session::SessionStore;

const USER_AGENT: &str = concat!("bookshelf-client/", env!("CARGO_PKG_VERSION"));

/// Login / register / logout against the auth endpoint.
///
/// Concurrent calls are not sequenced: each successful response writes the
/// store when it arrives, so the last response to land decides the token.
#[derive(Clone)]
pub struct AuthClient {
    client: reqwest::Client,
    config: AuthConfig,
    store: SessionStore,
}

impl AuthClient {
    pub fn new(config: &AuthConfig, store: SessionStore) -> Result<Self, AuthError> {
        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            client,
            config: config.clone(),
            store,
        })
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn get_token(&self) -> Option<String> {
        self.store.get_token()
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<User, AuthError> {
        self.post_credentials("login", credentials).await
    }

    pub async fn register(&self, credentials: &Credentials) -> Result<User, AuthError> {
        self.post_credentials("register", credentials).await
    }

    /// Forgets the local token. The server is not told.
    pub async fn logout(&self) -> Result<(), AuthError> {
        self.store.clear_token()?;
        Ok(())
    }

    async fn post_credentials(
        &self,
        endpoint: &str,
        credentials: &Credentials,
    ) -> Result<User, AuthError> {
        let url = self
            .config
            .endpoint(endpoint)
            .ok_or(AuthError::MissingBaseUrl)?;
        debug!(%url, username = %credentials.username, "sending auth request");

        let res = self.client.post(url).json(credentials).send().await?;
        let status = res.status();
        let body = res.bytes().await?;
        let payload: Value = serde_json::from_slice(&body)?;

        if !status.is_success() {
            debug!(%status, "auth request rejected");
            return Err(AuthError::Rejected { status, payload });
        }

        let envelope: UserEnvelope = serde_json::from_value(payload)?;
        Ok(self.store.set_token(envelope.user)?)
    }
}

impl std::fmt::Debug for AuthClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
