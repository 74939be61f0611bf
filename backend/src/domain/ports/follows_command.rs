//! Driving port for the follow graph.

use async_trait::async_trait;

use crate::domain::{Error, UserId, UserProfile};

/// Both ends of a follow edge after a change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FollowState {
    /// The acting user.
    pub user: UserProfile,
    /// The user being (un)followed.
    pub target: UserProfile,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FollowsCommand: Send + Sync {
    /// Make `current` follow `target`; idempotent.
    async fn follow(&self, current: &UserId, target: &UserId) -> Result<FollowState, Error>;

    /// Remove the edge from `current` to `target`; idempotent.
    async fn unfollow(&self, current: &UserId, target: &UserId) -> Result<FollowState, Error>;
}
