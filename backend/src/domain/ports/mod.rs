//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (collections, hashing, tokens, mail) are implemented in
//! `outbound`; driving ports are implemented by domain services and consumed
//! by `inbound::http`.

mod macros;
pub(crate) use macros::define_port_error;

mod accounts_command;
mod authenticator;
mod collection_repository;
mod directory_query;
mod email_sender;
mod follows_command;
mod password_hasher;
mod quiz_catalogue_command;
mod quiz_catalogue_query;
mod test_comments_command;
mod test_comments_query;
mod token_service;

pub use accounts_command::AccountsCommand;
#[cfg(test)]
pub use accounts_command::MockAccountsCommand;
pub use authenticator::Authenticator;
#[cfg(test)]
pub use authenticator::MockAuthenticator;
#[cfg(test)]
pub use collection_repository::MockCollectionRepository;
pub use collection_repository::{
    CollectionRepository, CollectionStoreError, CollectionVersion, FixtureCollectionRepository,
    Versioned,
};
pub use directory_query::DirectoryQuery;
#[cfg(test)]
pub use directory_query::MockDirectoryQuery;
#[cfg(test)]
pub use email_sender::MockEmailSender;
pub use email_sender::{EmailKind, EmailMessage, EmailSender, EmailSenderError, FixtureEmailSender};
pub use follows_command::{FollowState, FollowsCommand};
#[cfg(test)]
pub use follows_command::MockFollowsCommand;
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{FixturePasswordHasher, PasswordHasher, PasswordHasherError};
#[cfg(test)]
pub use quiz_catalogue_command::MockQuizCatalogueCommand;
pub use quiz_catalogue_command::QuizCatalogueCommand;
#[cfg(test)]
pub use quiz_catalogue_query::MockQuizCatalogueQuery;
pub use quiz_catalogue_query::QuizCatalogueQuery;
#[cfg(test)]
pub use test_comments_command::MockTestCommentsCommand;
pub use test_comments_command::{AddCommentRequest, TestCommentsCommand};
#[cfg(test)]
pub use test_comments_query::MockTestCommentsQuery;
pub use test_comments_query::TestCommentsQuery;
#[cfg(test)]
pub use token_service::MockTokenService;
pub use token_service::{FixtureTokenService, TokenService, TokenServiceError};
