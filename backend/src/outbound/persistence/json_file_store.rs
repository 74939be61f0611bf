//! JSON collection files under a capability-scoped data directory.
//!
//! Each collection is one pretty-printed JSON array. Its version is the
//! SHA-256 of the file bytes, so any write (ours or external) changes it.
//! Saves re-read the file under a per-collection lock, compare versions, then
//! write a staging file and rename it into place.

use std::collections::HashMap;
use std::io;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use cap_std::{ambient_authority, fs::Dir};
use serde::Serialize;
use serde::de::DeserializeOwned;
use sha2::{Digest, Sha256};
use tokio::sync::Mutex;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::ports::{
    CollectionRepository, CollectionStoreError, CollectionVersion, Versioned,
};

const EMPTY_COLLECTION: &[u8] = b"[]";

/// The logical collections persisted by the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Users,
    Tests,
    UserTests,
    Posts,
    Comments,
    TestComments,
}

impl Collection {
    pub const ALL: [Self; 6] = [
        Self::Users,
        Self::Tests,
        Self::UserTests,
        Self::Posts,
        Self::Comments,
        Self::TestComments,
    ];

    /// Name used in logs and errors.
    pub fn name(self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Tests => "tests",
            Self::UserTests => "userTests",
            Self::Posts => "posts",
            Self::Comments => "comments",
            Self::TestComments => "testComments",
        }
    }

    pub fn file_name(self) -> &'static str {
        match self {
            Self::Users => "users.json",
            Self::Tests => "tests.json",
            Self::UserTests => "userTests.json",
            Self::Posts => "posts.json",
            Self::Comments => "comments.json",
            Self::TestComments => "testComments.json",
        }
    }
}

/// Failure to open the data directory.
#[derive(Debug, thiserror::Error)]
#[error("failed to open data directory {path}: {source}")]
pub struct StoreOpenError {
    path: PathBuf,
    #[source]
    source: io::Error,
}

/// Last successfully read bytes of a collection and their version.
#[derive(Debug)]
struct Snapshot {
    bytes: Vec<u8>,
    version: CollectionVersion,
}

type CollectionState = Arc<Mutex<Option<Snapshot>>>;

/// Handle on the data directory; hands out one repository per collection.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: Arc<Dir>,
    root: PathBuf,
    states: HashMap<Collection, CollectionState>,
}

impl JsonFileStore {
    /// Open `root`, creating it if needed.
    pub fn open(root: impl AsRef<Path>) -> Result<Self, StoreOpenError> {
        let root = root.as_ref().to_path_buf();
        let wrap = |source| StoreOpenError {
            path: root.clone(),
            source,
        };
        Dir::create_ambient_dir_all(&root, ambient_authority()).map_err(wrap)?;
        let dir = Dir::open_ambient_dir(&root, ambient_authority()).map_err(wrap)?;
        let states = Collection::ALL
            .into_iter()
            .map(|collection| (collection, CollectionState::default()))
            .collect();
        Ok(Self {
            dir: Arc::new(dir),
            root,
            states,
        })
    }

    pub fn root(&self) -> &Path {
        self.root.as_path()
    }

    /// Repository over `collection` decoding records as `T`.
    ///
    /// Repositories for the same collection share a lock and cache, however
    /// many are created.
    pub fn collection<T>(&self, collection: Collection) -> JsonCollectionRepository<T> {
        let state = self
            .states
            .get(&collection)
            .map(Arc::clone)
            .unwrap_or_default();
        JsonCollectionRepository {
            dir: Arc::clone(&self.dir),
            collection,
            state,
            records: PhantomData,
        }
    }
}

/// [`CollectionRepository`] backed by one JSON file.
#[derive(Debug)]
pub struct JsonCollectionRepository<T> {
    dir: Arc<Dir>,
    collection: Collection,
    state: CollectionState,
    records: PhantomData<fn() -> T>,
}

fn fingerprint(bytes: &[u8]) -> CollectionVersion {
    CollectionVersion::new(hex::encode(Sha256::digest(bytes)))
}

fn read_or_create(dir: &Dir, file: &str) -> io::Result<Vec<u8>> {
    match dir.read(file) {
        Ok(bytes) => Ok(bytes),
        Err(error) if error.kind() == io::ErrorKind::NotFound => {
            dir.write(file, EMPTY_COLLECTION)?;
            Ok(EMPTY_COLLECTION.to_vec())
        }
        Err(error) => Err(error),
    }
}

fn replace(dir: &Dir, file: &str, bytes: &[u8]) -> io::Result<()> {
    let staging = format!(".{file}.{}.tmp", Uuid::new_v4().simple());
    dir.write(&staging, bytes)?;
    if let Err(error) = dir.rename(&staging, dir, file) {
        let _cleanup = dir.remove_file(&staging);
        return Err(error);
    }
    Ok(())
}

impl<T> JsonCollectionRepository<T>
where
    T: DeserializeOwned,
{
    async fn blocking<R, F>(&self, operation: F) -> Result<R, CollectionStoreError>
    where
        F: FnOnce(&Dir, &'static str) -> io::Result<R> + Send + 'static,
        R: Send + 'static,
    {
        let dir = Arc::clone(&self.dir);
        let file = self.collection.file_name();
        let name = self.collection.name();
        tokio::task::spawn_blocking(move || operation(&dir, file))
            .await
            .map_err(|err| CollectionStoreError::io(name, err.to_string()))?
            .map_err(|err| CollectionStoreError::io(name, err.to_string()))
    }

    fn decode(&self, bytes: &[u8]) -> Result<Vec<T>, CollectionStoreError> {
        serde_json::from_slice(bytes)
            .map_err(|err| CollectionStoreError::malformed(self.collection.name(), err.to_string()))
    }
}

#[async_trait]
impl<T> CollectionRepository<T> for JsonCollectionRepository<T>
where
    T: Serialize + DeserializeOwned + Send + Sync + 'static,
{
    async fn load(&self) -> Result<Versioned<Vec<T>>, CollectionStoreError> {
        let mut cache = self.state.lock().await;
        let fresh = match self.blocking(read_or_create).await {
            Ok(bytes) => self.decode(&bytes).map(|records| (bytes, records)),
            Err(error) => Err(error),
        };

        match fresh {
            Ok((bytes, records)) => {
                let version = fingerprint(&bytes);
                *cache = Some(Snapshot {
                    bytes,
                    version: version.clone(),
                });
                Ok(Versioned {
                    data: records,
                    version,
                })
            }
            Err(error) => {
                let Some(snapshot) = cache.as_ref() else {
                    warn!(collection = self.collection.name(), %error, "collection unreadable");
                    return Err(error);
                };
                warn!(
                    collection = self.collection.name(),
                    %error,
                    "collection unreadable; serving last good snapshot"
                );
                Ok(Versioned {
                    data: self.decode(&snapshot.bytes)?,
                    version: snapshot.version.clone(),
                })
            }
        }
    }

    async fn save(
        &self,
        records: Vec<T>,
        expected: &CollectionVersion,
    ) -> Result<CollectionVersion, CollectionStoreError> {
        let name = self.collection.name();
        let bytes = serde_json::to_vec_pretty(&records)
            .map_err(|err| CollectionStoreError::encode(name, err.to_string()))?;

        let mut cache = self.state.lock().await;
        let current = self.blocking(read_or_create).await?;
        if fingerprint(&current) != *expected {
            debug!(collection = name, "rejecting stale save");
            return Err(CollectionStoreError::version_mismatch(name));
        }

        let staged = bytes.clone();
        self.blocking(move |dir, file| replace(dir, file, &staged))
            .await?;
        let version = fingerprint(&bytes);
        *cache = Some(Snapshot {
            bytes,
            version: version.clone(),
        });
        debug!(collection = name, records = records.len(), "collection saved");
        Ok(version)
    }
}
