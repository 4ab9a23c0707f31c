//! Application-side auth state kept in step with the stored token.

use parking_lot::RwLock;
use std::sync::Arc;
use tracing::info;

use crate::client::AuthClient;
use crate::error::AuthError;
use crate::models::{Credentials, User};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthStatus {
    Authenticated { token: String },
    Anonymous,
}

impl AuthStatus {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthStatus::Authenticated { .. })
    }
}

/// Owns the client and the current user; every operation updates both together.
#[derive(Debug, Clone)]
pub struct AuthContext {
    client: AuthClient,
    user: Arc<RwLock<Option<User>>>,
}

impl AuthContext {
    pub fn new(client: AuthClient) -> Self {
        Self {
            client,
            user: Arc::new(RwLock::new(None)),
        }
    }

    pub fn client(&self) -> &AuthClient {
        &self.client
    }

    /// Startup decision between authenticated and anonymous, from the stored token alone.
    ///
    /// The user record is not restored: `current_user()` stays `None` until the next
    /// `login` or `register`, even when this reports `Authenticated`.
    pub fn bootstrap(&self) -> AuthStatus {
        match self.client.get_token() {
            Some(token) => AuthStatus::Authenticated { token },
            None => AuthStatus::Anonymous,
        }
    }

    pub fn current_user(&self) -> Option<User> {
        self.user.read().clone()
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<User, AuthError> {
        let user = self.client.login(credentials).await?;
        info!(username = %user.username, "signed in");
        *self.user.write() = Some(user.clone());
        Ok(user)
    }

    pub async fn register(&self, credentials: &Credentials) -> Result<User, AuthError> {
        let user = self.client.register(credentials).await?;
        info!(username = %user.username, "registered");
        *self.user.write() = Some(user.clone());
        Ok(user)
    }

    pub async fn logout(&self) -> Result<(), AuthError> {
        self.client.logout().await?;
        *self.user.write() = None;
        info!("signed out");
        Ok(())
    }
}
