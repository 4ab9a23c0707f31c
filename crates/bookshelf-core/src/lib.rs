//! bookshelf-core — session and authentication client for Bookshelf
//!
//! # Session model
//! A single opaque token is persisted under one well-known key. Whatever
//! wrote last wins; there is no expiry, refresh or signature check on this
//! side. The server remains the only authority on whether a token is valid.
//!
//! # Module layout
//! - `session`  — `SessionStore` over an injectable `TokenBackend` (memory, file, keyring)
//! - `client`   — `AuthClient`: login / register / logout against the auth endpoint
//! - `context`  — `AuthContext`: keeps the stored token and the logged-in user in step
//! - `retry`    — retry predicate handed to data-fetching layers
//! - `config`   — base URL and backend selection
//! - `paths`    — data directory conventions
//! - `models`   — wire types (`User`, `Credentials`, envelopes)
//! - `error`    — `AuthError` / `StoreError`

pub mod client;
pub mod config;
pub mod context;
pub mod error;
pub mod models;
pub mod paths;
pub mod retry;
pub mod session;

pub use client::AuthClient;
pub use config::{AuthConfig, BackendKind};
pub use context::{AuthContext, AuthStatus};
pub use error::{AuthError, StoreError};
pub use models::{Credentials, User};
pub use retry::RetryPolicy;
pub use session::SessionStore;
