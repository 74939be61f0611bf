//! HS256 JWT implementation of the [`TokenService`] port.
//!
//! Access and refresh tokens share a claim shape (`userId`, `iat`, `exp`) but
//! are signed with different secrets, so neither verifies as the other.

use std::sync::Arc;

use chrono::TimeDelta;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::ports::{TokenService, TokenServiceError};
use crate::domain::{TokenPair, UserId};

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    #[serde(rename = "userId")]
    user_id: String,
    iat: i64,
    exp: i64,
}

/// Token lifetimes in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenLifetimes {
    pub access_secs: u64,
    pub refresh_secs: u64,
}

struct SigningKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: TimeDelta,
}

impl SigningKeys {
    fn new(secret: &[u8], ttl_secs: u64) -> Self {
        let ttl_secs = i64::try_from(ttl_secs).unwrap_or(i64::MAX);
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl: TimeDelta::try_seconds(ttl_secs).unwrap_or(TimeDelta::MAX),
        }
    }
}

/// Signs and verifies bearer tokens.
pub struct JwtTokenService {
    access: SigningKeys,
    refresh: SigningKeys,
    validation: Validation,
    clock: Arc<dyn Clock>,
}

impl JwtTokenService {
    pub fn new(
        access_secret: &[u8],
        refresh_secret: &[u8],
        lifetimes: TokenLifetimes,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);
        Self {
            access: SigningKeys::new(access_secret, lifetimes.access_secs),
            refresh: SigningKeys::new(refresh_secret, lifetimes.refresh_secs),
            validation,
            clock,
        }
    }

    fn sign(&self, keys: &SigningKeys, user: &UserId) -> Result<String, TokenServiceError> {
        let now = self.clock.utc();
        let claims = Claims {
            user_id: user.to_string(),
            iat: now.timestamp(),
            exp: now
                .checked_add_signed(keys.ttl)
                .map_or(i64::MAX, |expiry| expiry.timestamp()),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &keys.encoding)
            .map_err(|err| TokenServiceError::signing(err.to_string()))
    }

    fn subject(&self, keys: &SigningKeys, token: &str) -> Option<UserId> {
        match decode::<Claims>(token, &keys.decoding, &self.validation) {
            Ok(data) => UserId::new(data.claims.user_id).ok(),
            Err(error) => {
                debug!(%error, "bearer token rejected");
                None
            }
        }
    }
}

impl TokenService for JwtTokenService {
    fn issue(&self, user: &UserId) -> Result<TokenPair, TokenServiceError> {
        Ok(TokenPair {
            access_token: self.sign(&self.access, user)?,
            refresh_token: self.sign(&self.refresh, user)?,
        })
    }

    fn verify_access(&self, token: &str) -> Option<UserId> {
        self.subject(&self.access, token)
    }

    fn verify_refresh(&self, token: &str) -> Option<UserId> {
        self.subject(&self.refresh, token)
    }
}
