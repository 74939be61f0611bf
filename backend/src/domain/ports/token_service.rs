//! Port for issuing and verifying access/refresh tokens.
//!
//! Verification fails closed: any malformed, expired, or foreign token yields
//! `None` rather than an error.

use super::define_port_error;
use crate::domain::{TokenPair, UserId};

define_port_error! {
    /// Failures raised while signing tokens.
    pub enum TokenServiceError {
        Signing { message: String } => "token signing failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
pub trait TokenService: Send + Sync {
    /// Issue a fresh access/refresh pair for `user`.
    fn issue(&self, user: &UserId) -> Result<TokenPair, TokenServiceError>;

    /// Resolve a valid access token to its subject.
    fn verify_access(&self, token: &str) -> Option<UserId>;

    /// Resolve a valid refresh token to its subject.
    fn verify_refresh(&self, token: &str) -> Option<UserId>;
}

/// Unsigned tokens of the form `access:<id>` / `refresh:<id>`, for tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureTokenService;

impl FixtureTokenService {
    fn subject(token: &str, prefix: &str) -> Option<UserId> {
        token
            .strip_prefix(prefix)
            .and_then(|raw| UserId::new(raw).ok())
    }
}

impl TokenService for FixtureTokenService {
    fn issue(&self, user: &UserId) -> Result<TokenPair, TokenServiceError> {
        Ok(TokenPair {
            access_token: format!("access:{user}"),
            refresh_token: format!("refresh:{user}"),
        })
    }

    fn verify_access(&self, token: &str) -> Option<UserId> {
        Self::subject(token, "access:")
    }

    fn verify_refresh(&self, token: &str) -> Option<UserId> {
        Self::subject(token, "refresh:")
    }
}
