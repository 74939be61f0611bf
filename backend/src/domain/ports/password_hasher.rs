//! Port for one-way password hashing.

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Failures raised by hashing adapters.
    pub enum PasswordHasherError {
        /// Producing a digest failed.
        Hash { message: String } => "password hashing failed: {message}",
        /// A stored digest could not be parsed.
        MalformedDigest { message: String } => "stored password digest is malformed: {message}",
    }
}

/// Hashes and checks passwords; digests are self-describing strings.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    async fn hash(&self, password: &str) -> Result<String, PasswordHasherError>;

    /// `Ok(false)` for a mismatch; errors only for unusable digests.
    async fn verify(&self, password: &str, digest: &str) -> Result<bool, PasswordHasherError>;
}

/// Reversible stand-in for tests; never use outside them.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixturePasswordHasher;

const FIXTURE_PREFIX: &str = "fixture$";

#[async_trait]
impl PasswordHasher for FixturePasswordHasher {
    async fn hash(&self, password: &str) -> Result<String, PasswordHasherError> {
        Ok(format!("{FIXTURE_PREFIX}{password}"))
    }

    async fn verify(&self, password: &str, digest: &str) -> Result<bool, PasswordHasherError> {
        digest
            .strip_prefix(FIXTURE_PREFIX)
            .map(|stored| stored == password)
            .ok_or_else(|| PasswordHasherError::malformed_digest("missing fixture prefix"))
    }
}
