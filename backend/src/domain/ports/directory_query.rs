//! Driving port for read-only listings: people, posts, post comments.

use async_trait::async_trait;

use crate::domain::{Error, Post, PostComment, UserId, UserProfile};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DirectoryQuery: Send + Sync {
    async fn list_users(&self) -> Result<Vec<UserProfile>, Error>;

    async fn get_user(&self, id: &UserId) -> Result<UserProfile, Error>;

    async fn list_posts(&self) -> Result<Vec<Post>, Error>;

    async fn list_post_comments(&self) -> Result<Vec<PostComment>, Error>;
}
