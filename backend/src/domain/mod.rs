//! Domain primitives, aggregates and services.
//!
//! Purpose: Define strongly typed entities used by the API and persistence
//! layers, and the services that implement the driving ports on top of the
//! collection repositories. Keep types transport agnostic; HTTP concerns live
//! in `inbound::http`.
//!
//! Public surface:
//! - Error (alias to `error::Error`): API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`): stable error identifier.
//! - User / UserProfile: stored account record and its public projection.
//! - Quiz / QuizDraft: quizzes and validated authoring input.
//! - Comment / CommentForest: nested discussion threads on quizzes.
//! - AccountService, FollowService, QuizCatalogueService,
//!   TestCommentsService, DirectoryService: port implementations.

pub mod accounts;
pub mod auth;
pub mod comments;
pub mod directory;
pub mod error;
pub mod follows;
pub mod likes;
pub mod ports;
pub mod post;
pub mod quiz;
pub mod quizzes;
pub mod timestamp;
pub mod trace_id;
pub mod user;

pub use self::accounts::{AccountLinks, AccountService, AccountServiceDeps};
pub use self::auth::{
    AuthSession, AuthValidationError, LoginCredentials, NewPassword, PasswordPolicyError,
    Registration, TokenPair,
};
pub use self::comments::{
    Comment, CommentForest, CommentId, CommentNode, ForestError, TestCommentsService,
};
pub use self::directory::DirectoryService;
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::follows::FollowService;
pub use self::likes::toggle_membership;
pub use self::post::{Post, PostComment};
pub use self::quiz::{Question, Quiz, QuizDraft, QuizId, QuizStats, QuizValidationError};
pub use self::quizzes::QuizCatalogueService;
pub use self::timestamp::Timestamp;
pub use self::trace_id::TraceId;
pub use self::user::{DisplayName, EmailAddress, User, UserId, UserProfile, UserValidationError};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use quizboard::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
