//! Comment thread service implementing the test-comment driving ports.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde_json::json;
use tracing::info;

use super::{Comment, CommentForest, CommentId, CommentNode, ForestError};
use crate::domain::ports::{
    AddCommentRequest, CollectionRepository, TestCommentsCommand, TestCommentsQuery, Versioned,
};
use crate::domain::{Error, QuizId, UserId};

/// Loads the forest, applies one operation, and saves it back with the
/// version it was loaded at.
#[derive(Clone)]
pub struct TestCommentsService<R> {
    comments: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> TestCommentsService<R> {
    pub fn new(comments: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { comments, clock }
    }
}

fn validate_body(body: &str) -> Result<(), Error> {
    if body.trim().is_empty() {
        return Err(Error::invalid_request("comment body must not be empty")
            .with_details(json!({ "field": "body", "code": "missing_field" })));
    }
    Ok(())
}

fn map_forest_error(error: ForestError) -> Error {
    match error {
        ForestError::NotFound(id) => Error::not_found(format!("comment {id} not found")),
        ForestError::TooDeep => Error::invalid_operation(error.to_string()),
    }
}

/// `tc<epoch millis>`, bumped past any id already in the forest.
fn fresh_id(forest: &CommentForest, now: DateTime<Utc>) -> CommentId {
    let mut millis = now.timestamp_millis();
    loop {
        let candidate = CommentId::new(format!("tc{millis}"));
        if !forest.contains(&candidate) {
            return candidate;
        }
        millis += 1;
    }
}

impl<R> TestCommentsService<R>
where
    R: CollectionRepository<Comment>,
{
    async fn mutate<T, F>(&self, operation: F) -> Result<T, Error>
    where
        F: FnOnce(&mut CommentForest) -> Result<T, ForestError> + Send,
        T: Send,
    {
        let Versioned { data, version } = self.comments.load().await?;
        let mut forest = CommentForest::from_roots(data);
        let outcome = operation(&mut forest).map_err(map_forest_error)?;
        self.comments.save(forest.into_roots(), &version).await?;
        Ok(outcome)
    }
}

#[async_trait]
impl<R> TestCommentsCommand for TestCommentsService<R>
where
    R: CollectionRepository<Comment>,
{
    async fn add(&self, request: AddCommentRequest) -> Result<Comment, Error> {
        validate_body(&request.body)?;
        let now = self.clock.utc();
        let AddCommentRequest {
            test_id,
            author_id,
            body,
            parent_id,
        } = request;

        let created = self
            .mutate(move |forest| {
                let id = fresh_id(forest, now);
                match parent_id {
                    None => Ok(forest.add_root(CommentNode::new(
                        id,
                        Some(test_id),
                        author_id,
                        body,
                        None,
                        now,
                    ))),
                    Some(parent) => forest.add_reply(CommentNode::new(
                        id,
                        None,
                        author_id,
                        body,
                        Some(parent),
                        now,
                    )),
                }
            })
            .await?;
        info!(comment_id = %created.id, parent_id = ?created.parent_id, "comment added");
        Ok(created)
    }

    async fn edit(&self, id: &CommentId, body: &str) -> Result<Comment, Error> {
        validate_body(body)?;
        let now = self.clock.utc();
        let body = body.to_owned();
        self.mutate(|forest| forest.edit(id, body, now)).await
    }

    async fn delete(&self, id: &CommentId) -> Result<(), Error> {
        let removed = self.mutate(|forest| forest.delete(id)).await?;
        info!(comment_id = %id, removed, "comment thread deleted");
        Ok(())
    }

    async fn toggle_like(&self, id: &CommentId, user: &UserId) -> Result<Comment, Error> {
        self.mutate(|forest| forest.toggle_like(id, user)).await
    }
}

#[async_trait]
impl<R> TestCommentsQuery for TestCommentsService<R>
where
    R: CollectionRepository<Comment>,
{
    async fn list_for_test(&self, test: &QuizId) -> Result<Vec<Comment>, Error> {
        let Versioned { data, .. } = self.comments.load().await?;
        Ok(CommentForest::from_roots(data).roots_for(test))
    }
}
