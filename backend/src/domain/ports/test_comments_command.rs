//! Driving port for mutating quiz discussion threads.
//!
//! Edits and deletes are keyed by comment id alone; any authenticated caller
//! may perform them.

use async_trait::async_trait;

use crate::domain::{Comment, CommentId, Error, QuizId, UserId};

/// Request to post a comment or a reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddCommentRequest {
    pub test_id: QuizId,
    pub author_id: UserId,
    pub body: String,
    /// `None` posts a root comment; otherwise the comment replied to.
    pub parent_id: Option<CommentId>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TestCommentsCommand: Send + Sync {
    async fn add(&self, request: AddCommentRequest) -> Result<Comment, Error>;

    /// Replace the body and stamp `updatedAt`.
    async fn edit(&self, id: &CommentId, body: &str) -> Result<Comment, Error>;

    /// Remove the comment and every reply beneath it.
    async fn delete(&self, id: &CommentId) -> Result<(), Error>;

    async fn toggle_like(&self, id: &CommentId, user: &UserId) -> Result<Comment, Error>;
}
