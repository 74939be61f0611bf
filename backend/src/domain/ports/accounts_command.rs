//! Driving port for account lifecycle use-cases.
//!
//! Inbound adapters validate raw payloads into domain inputs
//! ([`Registration`], [`LoginCredentials`], [`NewPassword`]) and call this
//! port; persistence, hashing, signing and mail stay behind it.

use async_trait::async_trait;

use crate::domain::{AuthSession, Error, LoginCredentials, NewPassword, Registration, UserProfile};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountsCommand: Send + Sync {
    /// Create an unverified account and sign it in.
    async fn register(&self, registration: Registration) -> Result<AuthSession, Error>;

    /// Exchange credentials for a token pair.
    async fn login(&self, credentials: LoginCredentials) -> Result<AuthSession, Error>;

    /// Exchange a refresh token for a new token pair.
    async fn refresh(&self, refresh_token: &str) -> Result<AuthSession, Error>;

    /// Mark the account holding `token` as verified.
    async fn verify_email(&self, token: &str) -> Result<UserProfile, Error>;

    /// Start a reset; succeeds whether or not `email` is registered.
    async fn request_password_reset(&self, email: &str) -> Result<(), Error>;

    /// Finish a reset started by [`AccountsCommand::request_password_reset`].
    async fn confirm_password_reset(&self, token: &str, password: NewPassword)
    -> Result<(), Error>;
}
