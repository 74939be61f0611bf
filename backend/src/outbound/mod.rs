//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! This module follows the hexagonal architecture pattern, providing concrete
//! implementations of domain port traits:
//!
//! - **persistence**: JSON collection files with content-hash versions
//! - **security**: Argon2id password digests and HS256 bearer tokens
//! - **email**: account mail written to the log
//!
//! Adapters are thin translators between domain types and infrastructure
//! representations. They contain no business logic.

pub mod email;
pub mod persistence;
pub mod security;
