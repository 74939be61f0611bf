//! Application settings loaded via OrthoConfig.
//!
//! Values come from CLI flags, `QUIZBOARD_*` environment variables and config
//! files. Accessors supply defaults so every field stays optional on input.

use std::net::SocketAddr;
use std::path::PathBuf;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use tracing::warn;
use zeroize::Zeroizing;

use crate::domain::auth::opaque_token;

const DEFAULT_DATA_DIR: &str = "data";
const DEFAULT_CLIENT_URL: &str = "http://localhost:3000";
const DEFAULT_ACCESS_TTL_SECS: u64 = 60 * 60;
const DEFAULT_REFRESH_TTL_SECS: u64 = 7 * 24 * 60 * 60;
/// Shortest signing secret accepted in release builds.
pub const JWT_SECRET_MIN_LEN: usize = 32;

/// Build mode for secret validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Debug builds fall back to generated secrets and warn.
    Debug,
    /// Release builds require explicit, distinct secrets.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use quizboard::settings::BuildMode;
    ///
    /// let mode = BuildMode::from_debug_assertions();
    /// if cfg!(debug_assertions) {
    ///     assert_eq!(mode, BuildMode::Debug);
    /// } else {
    ///     assert_eq!(mode, BuildMode::Release);
    /// }
    /// ```
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Errors raised while validating settings.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum SettingsError {
    /// A signing secret is absent.
    #[error("missing required setting: {name}")]
    MissingSecret { name: &'static str },
    /// A signing secret is too short for release builds.
    #[error("{name} too short: need >= {min_len} bytes, got {length}")]
    SecretTooShort {
        name: &'static str,
        length: usize,
        min_len: usize,
    },
    /// Access and refresh tokens must be signed with different keys.
    #[error("QUIZBOARD_JWT_SECRET and QUIZBOARD_JWT_REFRESH_SECRET must differ")]
    SharedSecret,
    /// Release builds never run on development secrets.
    #[error("QUIZBOARD_ALLOW_DEV_SECRETS must be false in release builds")]
    DevSecretsNotAllowed,
}

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "QUIZBOARD")]
pub struct AppSettings {
    /// Socket address the HTTP server binds to.
    pub bind_addr: Option<SocketAddr>,
    /// Directory holding the JSON collection files.
    pub data_dir: Option<PathBuf>,
    /// HS256 secret for access tokens.
    pub jwt_secret: Option<String>,
    /// HS256 secret for refresh tokens.
    pub jwt_refresh_secret: Option<String>,
    /// Access token lifetime in seconds.
    pub access_ttl_secs: Option<u64>,
    /// Refresh token lifetime in seconds.
    pub refresh_ttl_secs: Option<u64>,
    /// Front-end base URL used in email links.
    pub client_url: Option<String>,
    /// Acknowledges generated secrets; rejected in release builds.
    #[ortho_config(default = false)]
    pub allow_dev_secrets: bool,
}

/// Validated signing material for the token service.
pub struct JwtSecrets {
    pub access: Zeroizing<String>,
    pub refresh: Zeroizing<String>,
}

impl AppSettings {
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
            .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 8080)))
    }

    pub fn data_dir(&self) -> PathBuf {
        self.data_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
    }

    pub fn client_url(&self) -> &str {
        self.client_url.as_deref().unwrap_or(DEFAULT_CLIENT_URL)
    }

    pub fn access_ttl_secs(&self) -> u64 {
        self.access_ttl_secs.unwrap_or(DEFAULT_ACCESS_TTL_SECS)
    }

    pub fn refresh_ttl_secs(&self) -> u64 {
        self.refresh_ttl_secs.unwrap_or(DEFAULT_REFRESH_TTL_SECS)
    }

    /// Resolve signing secrets for `mode`.
    ///
    /// Debug builds replace missing secrets with random per-process values,
    /// so tokens do not survive a restart. Release builds reject missing or
    /// short secrets and refuse `allow_dev_secrets`.
    pub fn jwt_secrets(&self, mode: BuildMode) -> Result<JwtSecrets, SettingsError> {
        if self.allow_dev_secrets && !mode.is_debug() {
            return Err(SettingsError::DevSecretsNotAllowed);
        }
        let access = resolve_secret("QUIZBOARD_JWT_SECRET", self.jwt_secret.as_deref(), mode)?;
        let refresh = resolve_secret(
            "QUIZBOARD_JWT_REFRESH_SECRET",
            self.jwt_refresh_secret.as_deref(),
            mode,
        )?;
        if access == refresh {
            return Err(SettingsError::SharedSecret);
        }
        Ok(JwtSecrets { access, refresh })
    }
}

fn resolve_secret(
    name: &'static str,
    configured: Option<&str>,
    mode: BuildMode,
) -> Result<Zeroizing<String>, SettingsError> {
    match configured.map(str::trim).filter(|value| !value.is_empty()) {
        Some(value) => {
            if !mode.is_debug() && value.len() < JWT_SECRET_MIN_LEN {
                return Err(SettingsError::SecretTooShort {
                    name,
                    length: value.len(),
                    min_len: JWT_SECRET_MIN_LEN,
                });
            }
            Ok(Zeroizing::new(value.to_owned()))
        }
        None if mode.is_debug() => {
            warn!(
                setting = name,
                "signing secret not set; using generated secret (dev only)"
            );
            Ok(Zeroizing::new(opaque_token()))
        }
        None => Err(SettingsError::MissingSecret { name }),
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for settings parsing and secret validation.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 8] = [
        "QUIZBOARD_BIND_ADDR",
        "QUIZBOARD_DATA_DIR",
        "QUIZBOARD_JWT_SECRET",
        "QUIZBOARD_JWT_REFRESH_SECRET",
        "QUIZBOARD_ACCESS_TTL_SECS",
        "QUIZBOARD_REFRESH_TTL_SECS",
        "QUIZBOARD_CLIENT_URL",
        "QUIZBOARD_ALLOW_DEV_SECRETS",
    ];

    fn load_from_empty_args() -> AppSettings {
        AppSettings::load_from_iter([OsString::from("quizboard")]).expect("config should load")
    }

    fn secret(fill: char) -> String {
        std::iter::repeat_n(fill, JWT_SECRET_MIN_LEN).collect()
    }

    fn with_secrets(access: Option<String>, refresh: Option<String>) -> AppSettings {
        AppSettings {
            jwt_secret: access,
            jwt_refresh_secret: refresh,
            ..AppSettings::default()
        }
    }

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load_from_empty_args();
        assert_eq!(settings.bind_addr(), SocketAddr::from(([0, 0, 0, 0], 8080)));
        assert_eq!(settings.data_dir(), PathBuf::from(DEFAULT_DATA_DIR));
        assert_eq!(settings.client_url(), DEFAULT_CLIENT_URL);
        assert_eq!(settings.access_ttl_secs(), 3_600);
        assert_eq!(settings.refresh_ttl_secs(), 604_800);
        assert!(!settings.allow_dev_secrets);
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("QUIZBOARD_BIND_ADDR", Some("127.0.0.1:9000".to_owned())),
            ("QUIZBOARD_DATA_DIR", Some("/srv/quizboard".to_owned())),
            ("QUIZBOARD_JWT_SECRET", Some("access-secret".to_owned())),
            ("QUIZBOARD_JWT_REFRESH_SECRET", Some("refresh-secret".to_owned())),
            ("QUIZBOARD_ACCESS_TTL_SECS", Some("60".to_owned())),
            ("QUIZBOARD_REFRESH_TTL_SECS", Some("120".to_owned())),
            ("QUIZBOARD_CLIENT_URL", Some("https://quiz.example".to_owned())),
            ("QUIZBOARD_ALLOW_DEV_SECRETS", Some("true".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(settings.bind_addr(), SocketAddr::from(([127, 0, 0, 1], 9000)));
        assert_eq!(settings.data_dir(), PathBuf::from("/srv/quizboard"));
        assert_eq!(settings.jwt_secret.as_deref(), Some("access-secret"));
        assert_eq!(settings.access_ttl_secs(), 60);
        assert_eq!(settings.refresh_ttl_secs(), 120);
        assert_eq!(settings.client_url(), "https://quiz.example");
        assert!(settings.allow_dev_secrets);
    }

    #[rstest]
    fn debug_builds_generate_distinct_secrets() {
        let secrets = with_secrets(None, None)
            .jwt_secrets(BuildMode::Debug)
            .expect("debug fallback");
        assert_ne!(*secrets.access, *secrets.refresh);
        assert!(!secrets.access.is_empty());
    }

    #[rstest]
    fn release_builds_accept_explicit_secrets() {
        let secrets = with_secrets(Some(secret('a')), Some(secret('b')))
            .jwt_secrets(BuildMode::Release)
            .expect("explicit secrets");
        assert_eq!(*secrets.access, secret('a'));
        assert_eq!(*secrets.refresh, secret('b'));
    }

    #[rstest]
    #[case(None, Some(secret('b')), SettingsError::MissingSecret { name: "QUIZBOARD_JWT_SECRET" })]
    #[case(
        Some(secret('a')),
        Some("short".to_owned()),
        SettingsError::SecretTooShort {
            name: "QUIZBOARD_JWT_REFRESH_SECRET",
            length: 5,
            min_len: JWT_SECRET_MIN_LEN,
        }
    )]
    #[case(Some(secret('a')), Some(secret('a')), SettingsError::SharedSecret)]
    fn release_builds_reject_weak_configuration(
        #[case] access: Option<String>,
        #[case] refresh: Option<String>,
        #[case] expected: SettingsError,
    ) {
        let result = with_secrets(access, refresh).jwt_secrets(BuildMode::Release);
        assert_eq!(result.err(), Some(expected));
    }

    #[rstest]
    fn release_builds_refuse_dev_secret_flag() {
        let settings = AppSettings {
            allow_dev_secrets: true,
            ..AppSettings::default()
        };
        let result = settings.jwt_secrets(BuildMode::Release);
        assert_eq!(result.err(), Some(SettingsError::DevSecretsNotAllowed));
    }
}
