//! Port abstraction for whole-collection persistence.
//!
//! Every logical collection (users, quizzes, comments, ...) is read and
//! written as a unit. Loads return a [`CollectionVersion`] alongside the
//! records; saves must present the version they started from, giving
//! optimistic concurrency without a database.

use std::fmt;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::define_port_error;
use crate::domain::Error;

define_port_error! {
    /// Persistence errors raised by collection adapters.
    pub enum CollectionStoreError {
        /// The backing file could not be read or written.
        Io { collection: String, message: String } =>
            "collection {collection} could not be accessed: {message}",
        /// The stored bytes are not a valid collection.
        Malformed { collection: String, message: String } =>
            "collection {collection} is malformed: {message}",
        /// Records could not be encoded for writing.
        Encode { collection: String, message: String } =>
            "collection {collection} could not be encoded: {message}",
        /// The collection changed after the caller loaded it.
        VersionMismatch { collection: String } =>
            "collection {collection} changed since it was loaded",
    }
}

impl From<CollectionStoreError> for Error {
    fn from(value: CollectionStoreError) -> Self {
        match value {
            CollectionStoreError::VersionMismatch { .. } => {
                Self::conflict("the data was modified concurrently; retry the request")
            }
            CollectionStoreError::Io { .. } => {
                Self::service_unavailable("storage is temporarily unavailable")
            }
            other => Self::internal(other.to_string()),
        }
    }
}

/// Opaque fingerprint of a collection's persisted state.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CollectionVersion(String);

impl CollectionVersion {
    pub fn new(fingerprint: impl Into<String>) -> Self {
        Self(fingerprint.into())
    }
}

impl AsRef<str> for CollectionVersion {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for CollectionVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Records paired with the version they were read at.
#[derive(Debug, Clone, PartialEq)]
pub struct Versioned<T> {
    pub data: T,
    pub version: CollectionVersion,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CollectionRepository<T>: Send + Sync
where
    T: Send + Sync + 'static,
{
    /// Read every record, creating an empty collection on first access.
    async fn load(&self) -> Result<Versioned<Vec<T>>, CollectionStoreError>;

    /// Replace the collection if it is still at `expected`.
    ///
    /// Returns the new version, or [`CollectionStoreError::VersionMismatch`]
    /// without writing anything.
    async fn save(
        &self,
        records: Vec<T>,
        expected: &CollectionVersion,
    ) -> Result<CollectionVersion, CollectionStoreError>;
}

/// In-memory collection with a counter version, for tests and tooling.
#[derive(Debug)]
pub struct FixtureCollectionRepository<T> {
    name: &'static str,
    state: Mutex<(Vec<T>, u64)>,
}

impl<T> FixtureCollectionRepository<T> {
    pub fn new(name: &'static str, records: Vec<T>) -> Self {
        Self {
            name,
            state: Mutex::new((records, 0)),
        }
    }

    pub fn empty(name: &'static str) -> Self {
        Self::new(name, Vec::new())
    }
}

impl<T: Clone> FixtureCollectionRepository<T> {
    /// Current records, bypassing versioning.
    pub async fn snapshot(&self) -> Vec<T> {
        self.state.lock().await.0.clone()
    }
}

#[async_trait]
impl<T> CollectionRepository<T> for FixtureCollectionRepository<T>
where
    T: Clone + Send + Sync + 'static,
{
    async fn load(&self) -> Result<Versioned<Vec<T>>, CollectionStoreError> {
        let guard = self.state.lock().await;
        Ok(Versioned {
            data: guard.0.clone(),
            version: CollectionVersion::new(guard.1.to_string()),
        })
    }

    async fn save(
        &self,
        records: Vec<T>,
        expected: &CollectionVersion,
    ) -> Result<CollectionVersion, CollectionStoreError> {
        let mut guard = self.state.lock().await;
        if guard.1.to_string() != expected.as_ref() {
            return Err(CollectionStoreError::version_mismatch(self.name));
        }
        guard.0 = records;
        guard.1 += 1;
        Ok(CollectionVersion::new(guard.1.to_string()))
    }
}
