//! Driving port for reading quizzes.

use async_trait::async_trait;

use crate::domain::{Error, Quiz};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuizCatalogueQuery: Send + Sync {
    /// User-authored quizzes followed by the seed catalogue.
    async fn list_tests(&self) -> Result<Vec<Quiz>, Error>;

    /// User-authored quizzes only, newest first.
    async fn list_user_tests(&self) -> Result<Vec<Quiz>, Error>;
}
