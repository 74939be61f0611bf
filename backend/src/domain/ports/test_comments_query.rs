//! Driving port for reading quiz discussion threads.

use async_trait::async_trait;

use crate::domain::{Comment, Error, QuizId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TestCommentsQuery: Send + Sync {
    /// Root comments on `test` with their nested replies.
    async fn list_for_test(&self, test: &QuizId) -> Result<Vec<Comment>, Error>;
}
