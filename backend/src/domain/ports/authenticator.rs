//! Driving port resolving bearer tokens to users.

use async_trait::async_trait;

use crate::domain::{Error, UserProfile};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Resolve an access token to the profile of an existing user.
    ///
    /// Fails with `Forbidden` for invalid or expired tokens and for tokens
    /// whose subject no longer exists.
    async fn authenticate(&self, access_token: &str) -> Result<UserProfile, Error>;
}
