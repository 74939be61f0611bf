//! Authentication primitives: credentials, registration input, password
//! policy, token pairs, and opaque one-time tokens.
//!
//! Payload parsing stays outside the domain; handlers hand raw strings to the
//! constructors here and receive field-tagged validation errors back.

use chrono::Duration;
use rand::RngCore;
use serde::Serialize;
use serde_json::json;
use zeroize::Zeroizing;

use super::user::{DisplayName, EmailAddress, UserProfile, UserValidationError};
use super::Error;

/// Lifetime of a password reset token, in seconds.
pub const RESET_TOKEN_TTL_SECS: i64 = 3600;

/// Lifetime of a password reset token.
pub fn reset_token_ttl() -> Duration {
    Duration::seconds(RESET_TOKEN_TTL_SECS)
}

/// Minimum password length.
pub const PASSWORD_MIN_LEN: usize = 8;

const PASSWORD_SYMBOLS: &str = "@$!%*?&";

/// Reasons a candidate password is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PasswordPolicyError {
    #[error("password must be at least {PASSWORD_MIN_LEN} characters")]
    TooShort,
    #[error("password may only contain letters, digits and @$!%*?&")]
    InvalidCharacters,
    #[error("password must contain an upper-case letter, a lower-case letter and a digit")]
    MissingCharacterClass,
}

/// Password that satisfies the account password policy.
///
/// # Examples
/// ```
/// use quizboard::domain::NewPassword;
///
/// assert!(NewPassword::new("Passw0rd").is_ok());
/// assert!(NewPassword::new("password").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPassword(Zeroizing<String>);

impl NewPassword {
    pub fn new(raw: &str) -> Result<Self, PasswordPolicyError> {
        if raw.chars().count() < PASSWORD_MIN_LEN {
            return Err(PasswordPolicyError::TooShort);
        }
        if !raw
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || PASSWORD_SYMBOLS.contains(c))
        {
            return Err(PasswordPolicyError::InvalidCharacters);
        }
        let has_lower = raw.chars().any(|c| c.is_ascii_lowercase());
        let has_upper = raw.chars().any(|c| c.is_ascii_uppercase());
        let has_digit = raw.chars().any(|c| c.is_ascii_digit());
        if !(has_lower && has_upper && has_digit) {
            return Err(PasswordPolicyError::MissingCharacterClass);
        }
        Ok(Self(Zeroizing::new(raw.to_owned())))
    }

    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

/// Field-tagged validation failure for authentication inputs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthValidationError {
    #[error("{field} is required")]
    Missing { field: &'static str },
    #[error("{source}")]
    Identity {
        field: &'static str,
        source: UserValidationError,
    },
    #[error(transparent)]
    Password(#[from] PasswordPolicyError),
}

impl AuthValidationError {
    /// Request field the failure refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Missing { field } | Self::Identity { field, .. } => field,
            Self::Password(_) => "password",
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::Missing { .. } => "missing_field",
            Self::Identity { .. } | Self::Password(_) => "invalid_value",
        }
    }
}

impl From<AuthValidationError> for Error {
    fn from(value: AuthValidationError) -> Self {
        Self::invalid_request(value.to_string())
            .with_details(json!({ "field": value.field(), "code": value.code() }))
    }
}

fn required<'a>(field: &'static str, raw: &'a str) -> Result<&'a str, AuthValidationError> {
    if raw.trim().is_empty() {
        Err(AuthValidationError::Missing { field })
    } else {
        Ok(raw)
    }
}

/// Validated login credentials.
///
/// ## Invariants
/// - `email` is trimmed and lower-cased; format is not checked so malformed
///   addresses fall through to the generic credential failure.
/// - `password` is non-empty and kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, AuthValidationError> {
        let email = required("email", email)?.trim().to_lowercase();
        if password.is_empty() {
            return Err(AuthValidationError::Missing { field: "password" });
        }
        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validated sign-up request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub name: DisplayName,
    pub email: EmailAddress,
    pub password: NewPassword,
}

impl Registration {
    /// Validate name, then email, then password; the first failure wins.
    pub fn try_from_parts(
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<Self, AuthValidationError> {
        let name = DisplayName::new(required("name", name)?).map_err(|source| {
            AuthValidationError::Identity {
                field: "name",
                source,
            }
        })?;
        let email = EmailAddress::new(required("email", email)?).map_err(|source| {
            AuthValidationError::Identity {
                field: "email",
                source,
            }
        })?;
        let password = NewPassword::new(required("password", password)?)?;
        Ok(Self {
            name,
            email,
            password,
        })
    }
}

/// Signed access/refresh token pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Result of a successful register/login/refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    pub user: UserProfile,
    pub tokens: TokenPair,
}

/// 32 random bytes, hex encoded; used for email verification and resets.
pub fn opaque_token() -> String {
    let mut bytes = [0_u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}
