//! Read-only listings of people, posts and post comments.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{CollectionRepository, DirectoryQuery, Versioned};
use crate::domain::{Error, Post, PostComment, User, UserId, UserProfile};

/// Service implementing [`DirectoryQuery`].
#[derive(Clone)]
pub struct DirectoryService<U, P, C> {
    users: Arc<U>,
    posts: Arc<P>,
    post_comments: Arc<C>,
}

impl<U, P, C> DirectoryService<U, P, C> {
    pub fn new(users: Arc<U>, posts: Arc<P>, post_comments: Arc<C>) -> Self {
        Self {
            users,
            posts,
            post_comments,
        }
    }
}

#[async_trait]
impl<U, P, C> DirectoryQuery for DirectoryService<U, P, C>
where
    U: CollectionRepository<User>,
    P: CollectionRepository<Post>,
    C: CollectionRepository<PostComment>,
{
    async fn list_users(&self) -> Result<Vec<UserProfile>, Error> {
        let Versioned { data, .. } = self.users.load().await?;
        Ok(data.iter().map(User::profile).collect())
    }

    async fn get_user(&self, id: &UserId) -> Result<UserProfile, Error> {
        let Versioned { data, .. } = self.users.load().await?;
        data.iter()
            .find(|user| &user.id == id)
            .map(User::profile)
            .ok_or_else(|| Error::not_found(format!("user {id} not found")))
    }

    async fn list_posts(&self) -> Result<Vec<Post>, Error> {
        Ok(self.posts.load().await?.data)
    }

    async fn list_post_comments(&self) -> Result<Vec<PostComment>, Error> {
        Ok(self.post_comments.load().await?.data)
    }
}
