//! File-backed persistence adapters.
//!
//! Collections live as JSON arrays under a single data directory opened with
//! `cap-std`, so adapters cannot touch paths outside it. Versions are content
//! hashes; see [`JsonFileStore`] for the save protocol.
//!
//! # Example
//!
//! ```no_run
//! use quizboard::domain::User;
//! use quizboard::domain::ports::CollectionRepository;
//! use quizboard::outbound::persistence::{Collection, JsonFileStore};
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let store = JsonFileStore::open("data")?;
//! let users = store.collection::<User>(Collection::Users);
//! let loaded = users.load().await?;
//! users.save(loaded.data, &loaded.version).await?;
//! # Ok(())
//! # }
//! ```

mod json_file_store;

pub use json_file_store::{Collection, JsonCollectionRepository, JsonFileStore, StoreOpenError};
