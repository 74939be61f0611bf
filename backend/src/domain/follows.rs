//! Follow graph maintenance over the users collection.
//!
//! Each edge is stored twice: in the follower's `following` and in the
//! target's `followers`. Both sides change in one save.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use crate::domain::likes::{insert_member, remove_member};
use crate::domain::ports::{CollectionRepository, FollowState, FollowsCommand, Versioned};
use crate::domain::{Error, User, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edge {
    Add,
    Remove,
}

/// Service implementing [`FollowsCommand`].
#[derive(Clone)]
pub struct FollowService<U> {
    users: Arc<U>,
    clock: Arc<dyn Clock>,
}

impl<U> FollowService<U> {
    pub fn new(users: Arc<U>, clock: Arc<dyn Clock>) -> Self {
        Self { users, clock }
    }
}

fn find_mut<'a>(users: &'a mut [User], id: &UserId) -> Result<&'a mut User, Error> {
    users
        .iter_mut()
        .find(|user| &user.id == id)
        .ok_or_else(|| Error::not_found(format!("user {id} not found")))
}

impl<U> FollowService<U>
where
    U: CollectionRepository<User>,
{
    async fn change(
        &self,
        current: &UserId,
        target: &UserId,
        edge: Edge,
    ) -> Result<FollowState, Error> {
        if current == target {
            return Err(Error::invalid_operation(match edge {
                Edge::Add => "you cannot follow yourself",
                Edge::Remove => "you cannot unfollow yourself",
            }));
        }

        let Versioned {
            data: mut users,
            version,
        } = self.users.load().await?;
        let now = self.clock.utc();

        let follower = find_mut(&mut users, current)?;
        match edge {
            Edge::Add => insert_member(&mut follower.following, target),
            Edge::Remove => remove_member(&mut follower.following, target),
        }
        follower.updated_at = Some(now.into());
        let user = follower.profile();

        let followed = find_mut(&mut users, target)?;
        match edge {
            Edge::Add => insert_member(&mut followed.followers, current),
            Edge::Remove => remove_member(&mut followed.followers, current),
        }
        followed.updated_at = Some(now.into());
        let state = FollowState {
            user,
            target: followed.profile(),
        };

        self.users.save(users, &version).await?;
        info!(user_id = %current, target_id = %target, ?edge, "follow graph updated");
        Ok(state)
    }
}

#[async_trait]
impl<U> FollowsCommand for FollowService<U>
where
    U: CollectionRepository<User>,
{
    async fn follow(&self, current: &UserId, target: &UserId) -> Result<FollowState, Error> {
        self.change(current, target, Edge::Add).await
    }

    async fn unfollow(&self, current: &UserId, target: &UserId) -> Result<FollowState, Error> {
        self.change(current, target, Edge::Remove).await
    }
}
