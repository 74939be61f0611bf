//! Driving port for authoring and liking quizzes.

use async_trait::async_trait;

use crate::domain::{Error, Quiz, QuizDraft, QuizId, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuizCatalogueCommand: Send + Sync {
    /// Publish a new user-authored quiz.
    async fn create_user_test(&self, owner: &UserId, draft: QuizDraft) -> Result<Quiz, Error>;

    /// Remove a user-authored quiz. Seed quizzes cannot be deleted.
    async fn delete_user_test(&self, id: &QuizId) -> Result<(), Error>;

    /// Flip `user`'s like on a quiz from either collection.
    async fn toggle_like(&self, id: &QuizId, user: &UserId) -> Result<Quiz, Error>;
}
