//! Domain service for registration, login and token resolution.

use chrono::Duration;
use serde::Serialize;
use thiserror::Error;

use crate::auth::TokenError;
use crate::domain::{Forbidden, Principal};

/// Errors specific to authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("This email address is already in use")]
    DuplicateIdentity,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Could not validate credentials")]
    Unauthenticated,

    #[error(transparent)]
    Forbidden(#[from] Forbidden),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for AuthError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<TokenError> for AuthError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Generation(msg) => Self::Internal(msg),
            TokenError::Expired | TokenError::Invalid(_) => Self::Unauthenticated,
        }
    }
}

/// Token handed out by a successful login.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResult {
    pub access_token: String,
    pub token_type: String,
}

/// Domain service trait for authentication.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Creates an account. The role is derived from the email address.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::DuplicateIdentity`] if the email is already registered.
    async fn register(&self, name: &str, email: &str, password: &str)
    -> Result<Principal, AuthError>;

    /// Checks an email/password pair.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] for an unknown email or a wrong password.
    async fn authenticate(&self, email: &str, password: &str) -> Result<Principal, AuthError>;

    /// Signs a token for the principal. `None` means the default 15 minutes.
    fn issue_token(&self, principal: &Principal, ttl: Option<Duration>)
    -> Result<String, AuthError>;

    /// Authenticates and issues a token with the configured login lifetime.
    async fn login(&self, email: &str, password: &str) -> Result<LoginResult, AuthError>;

    /// Maps a token back to a principal.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Unauthenticated`] if the token is malformed, badly
    /// signed, expired, or names a user that no longer exists.
    async fn resolve_token(&self, token: &str) -> Result<Principal, AuthError>;
}
