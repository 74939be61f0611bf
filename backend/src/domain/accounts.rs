//! Account lifecycle service: registration, login, token refresh, email
//! verification, password reset, and bearer-token authentication.
//!
//! Every mutation is one load/modify/save cycle over the users collection.
//! Mail is best effort; delivery failures are logged and never surface.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tokio::sync::OnceCell;
use tracing::{info, warn};

use crate::domain::auth::{opaque_token, reset_token_ttl};
use crate::domain::ports::{
    AccountsCommand, Authenticator, CollectionRepository, EmailKind, EmailMessage, EmailSender,
    PasswordHasher, PasswordHasherError, TokenService, Versioned,
};
use crate::domain::{
    AuthSession, EmailAddress, Error, LoginCredentials, NewPassword, Registration, Timestamp,
    TokenPair, User, UserId, UserProfile,
};

/// Message shared by every credential failure so callers cannot probe for
/// registered addresses.
pub const INVALID_CREDENTIALS: &str = "invalid email or password";

/// Plaintext behind the digest checked when no account matches, so unknown
/// emails cost one password verification like known ones.
const DUMMY_PASSWORD: &str = "no-such-account";

/// Message returned by every password reset request.
pub const RESET_REQUESTED: &str =
    "if an account exists for this email, a password reset link has been sent";

/// Builds the client-facing links embedded in account emails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountLinks {
    client_url: String,
}

impl AccountLinks {
    pub fn new(client_url: impl Into<String>) -> Self {
        let client_url = client_url.into();
        Self {
            client_url: client_url.trim_end_matches('/').to_owned(),
        }
    }

    pub fn verification(&self, token: &str) -> String {
        format!("{}/verify-email?token={token}", self.client_url)
    }

    pub fn password_reset(&self, token: &str) -> String {
        format!("{}/reset-password?token={token}", self.client_url)
    }

    pub fn home(&self) -> &str {
        self.client_url.as_str()
    }
}

/// Collaborators needed by [`AccountService`].
pub struct AccountServiceDeps<U> {
    pub users: Arc<U>,
    pub hasher: Arc<dyn PasswordHasher>,
    pub tokens: Arc<dyn TokenService>,
    pub mailer: Arc<dyn EmailSender>,
    pub clock: Arc<dyn Clock>,
    pub links: AccountLinks,
}

/// Account service implementing [`AccountsCommand`] and [`Authenticator`].
#[derive(Clone)]
pub struct AccountService<U> {
    users: Arc<U>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn TokenService>,
    mailer: Arc<dyn EmailSender>,
    clock: Arc<dyn Clock>,
    links: AccountLinks,
    dummy_digest: OnceCell<String>,
}

impl<U> AccountService<U> {
    pub fn new(deps: AccountServiceDeps<U>) -> Self {
        let AccountServiceDeps {
            users,
            hasher,
            tokens,
            mailer,
            clock,
            links,
        } = deps;
        Self {
            users,
            hasher,
            tokens,
            mailer,
            clock,
            links,
            dummy_digest: OnceCell::new(),
        }
    }
}

fn hasher_error(error: &PasswordHasherError) -> Error {
    Error::internal(format!("password hashing failed: {error}"))
}

impl<U> AccountService<U>
where
    U: CollectionRepository<User>,
{
    fn issue(&self, user: &UserId) -> Result<TokenPair, Error> {
        self.tokens
            .issue(user)
            .map_err(|err| Error::internal(format!("token issuance failed: {err}")))
    }

    async fn notify(&self, kind: EmailKind, user: &User, link: String) {
        let message = EmailMessage {
            kind,
            recipient: user.email.clone(),
            name: user.name.clone(),
            link,
        };
        if let Err(error) = self.mailer.send(&message).await {
            warn!(%error, user_id = %user.id, ?kind, "account email not delivered");
        }
    }

    /// Run one verification against a digest no password matches.
    async fn verify_against_dummy(&self, password: &str) {
        let digest = self
            .dummy_digest
            .get_or_try_init(|| self.hasher.hash(DUMMY_PASSWORD))
            .await;
        let outcome = match digest {
            Ok(digest) => self.hasher.verify(password, digest).await,
            Err(error) => Err(error),
        };
        if let Err(error) = outcome {
            warn!(%error, "dummy password verification failed");
        }
    }

    async fn password_matches(&self, user: &User, password: &str) -> bool {
        if user.password_hash.is_empty() {
            self.verify_against_dummy(password).await;
            return false;
        }
        match self.hasher.verify(password, &user.password_hash).await {
            Ok(matches) => matches,
            Err(error) => {
                warn!(%error, user_id = %user.id, "stored password digest unusable");
                false
            }
        }
    }
}

#[async_trait]
impl<U> AccountsCommand for AccountService<U>
where
    U: CollectionRepository<User>,
{
    async fn register(&self, registration: Registration) -> Result<AuthSession, Error> {
        let Registration {
            name,
            email,
            password,
        } = registration;
        let Versioned {
            data: mut users,
            version,
        } = self.users.load().await?;
        if users.iter().any(|user| email.matches(&user.email)) {
            return Err(Error::conflict("an account with this email already exists"));
        }

        let digest = self
            .hasher
            .hash(password.expose())
            .await
            .map_err(|err| hasher_error(&err))?;
        let verification_token = opaque_token();
        let user = User::register(
            UserId::random(),
            name,
            email,
            digest,
            verification_token.clone(),
            self.clock.utc(),
        );
        let tokens = self.issue(&user.id)?;
        users.push(user.clone());
        self.users.save(users, &version).await?;

        info!(user_id = %user.id, "account registered");
        self.notify(
            EmailKind::Verification,
            &user,
            self.links.verification(&verification_token),
        )
        .await;
        Ok(AuthSession {
            user: user.profile(),
            tokens,
        })
    }

    async fn login(&self, credentials: LoginCredentials) -> Result<AuthSession, Error> {
        let Versioned {
            data: mut users,
            version,
        } = self.users.load().await?;
        let Some(user) = users
            .iter_mut()
            .find(|user| user.email.trim().to_lowercase() == credentials.email())
        else {
            self.verify_against_dummy(credentials.password()).await;
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };
        if !self.password_matches(user, credentials.password()).await {
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }

        user.last_login_at = Some(self.clock.utc().into());
        let profile = user.profile();
        let tokens = self.issue(&profile.id)?;
        self.users.save(users, &version).await?;
        info!(user_id = %profile.id, "login succeeded");
        Ok(AuthSession {
            user: profile,
            tokens,
        })
    }

    async fn refresh(&self, refresh_token: &str) -> Result<AuthSession, Error> {
        let subject = self
            .tokens
            .verify_refresh(refresh_token)
            .ok_or_else(|| Error::invalid_token("invalid or expired refresh token"))?;
        let Versioned { data: users, .. } = self.users.load().await?;
        let user = users
            .iter()
            .find(|user| user.id == subject)
            .ok_or_else(|| Error::invalid_token("invalid or expired refresh token"))?;
        Ok(AuthSession {
            user: user.profile(),
            tokens: self.issue(&user.id)?,
        })
    }

    async fn verify_email(&self, token: &str) -> Result<UserProfile, Error> {
        let token = token.trim();
        if token.is_empty() {
            return Err(Error::invalid_token("invalid verification token"));
        }
        let Versioned {
            data: mut users,
            version,
        } = self.users.load().await?;
        let user = users
            .iter_mut()
            .find(|user| user.email_verification_token.as_deref() == Some(token))
            .ok_or_else(|| Error::invalid_token("invalid verification token"))?;

        user.is_email_verified = true;
        user.email_verification_token = None;
        user.updated_at = Some(self.clock.utc().into());
        let verified = user.clone();
        self.users.save(users, &version).await?;

        info!(user_id = %verified.id, "email verified");
        self.notify(EmailKind::Welcome, &verified, self.links.home().to_owned())
            .await;
        Ok(verified.profile())
    }

    async fn request_password_reset(&self, email: &str) -> Result<(), Error> {
        let Ok(email) = EmailAddress::new(email) else {
            return Ok(());
        };
        let Versioned {
            data: mut users,
            version,
        } = self.users.load().await?;
        let Some(user) = users.iter_mut().find(|user| email.matches(&user.email)) else {
            return Ok(());
        };

        let now = self.clock.utc();
        let token = opaque_token();
        user.reset_password_token = Some(token.clone());
        user.reset_password_expires = Some(Timestamp::from(now + reset_token_ttl()));
        user.updated_at = Some(now.into());
        let holder = user.clone();
        self.users.save(users, &version).await?;

        info!(user_id = %holder.id, "password reset requested");
        self.notify(
            EmailKind::PasswordReset,
            &holder,
            self.links.password_reset(&token),
        )
        .await;
        Ok(())
    }

    async fn confirm_password_reset(
        &self,
        token: &str,
        password: NewPassword,
    ) -> Result<(), Error> {
        let token = token.trim();
        let now = self.clock.utc();
        let Versioned {
            data: mut users,
            version,
        } = self.users.load().await?;
        let user = users
            .iter_mut()
            .find(|user| {
                !token.is_empty()
                    && user.reset_password_token.as_deref() == Some(token)
                    && user
                        .reset_password_expires
                        .as_ref()
                        .and_then(Timestamp::instant)
                        .is_some_and(|expires| expires > now)
            })
            .ok_or_else(|| Error::invalid_token("invalid or expired reset token"))?;

        user.password_hash = self
            .hasher
            .hash(password.expose())
            .await
            .map_err(|err| hasher_error(&err))?;
        user.reset_password_token = None;
        user.reset_password_expires = None;
        user.updated_at = Some(now.into());
        let user_id = user.id.clone();
        self.users.save(users, &version).await?;
        info!(%user_id, "password reset completed");
        Ok(())
    }
}

#[async_trait]
impl<U> Authenticator for AccountService<U>
where
    U: CollectionRepository<User>,
{
    async fn authenticate(&self, access_token: &str) -> Result<UserProfile, Error> {
        let subject = self
            .tokens
            .verify_access(access_token)
            .ok_or_else(|| Error::forbidden("invalid or expired token"))?;
        let Versioned { data: users, .. } = self.users.load().await?;
        users
            .iter()
            .find(|user| user.id == subject)
            .map(User::profile)
            .ok_or_else(|| Error::forbidden("user not found"))
    }
}

#[cfg(test)]
mod tests;
