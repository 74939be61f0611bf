//! Threaded discussion on quizzes.
//!
//! Comments are persisted as a nested JSON forest (`testComments.json`):
//! root comments carry the owning quiz id, replies live inside their parent's
//! `replies` array. In memory the forest is held in an arena
//! ([`CommentForest`]) so lookups, inserts and subtree deletes never walk the
//! nested shape by hand.

mod forest;
mod service;

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{QuizId, Timestamp, UserId};

pub use forest::{CommentForest, ForestError, MAX_REPLY_DEPTH};
pub use service::TestCommentsService;

/// Opaque comment identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommentId(String);

impl CommentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl AsRef<str> for CommentId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A comment together with its nested replies, in persisted/wire shape.
///
/// Unknown fields are carried in `extra` so rewriting the forest keeps them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: CommentId,
    /// Owning quiz; only set on root comments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_id: Option<QuizId>,
    pub author_id: UserId,
    #[serde(default)]
    pub body: String,
    #[serde(default, skip_serializing_if = "Timestamp::is_absent")]
    pub created_at: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Timestamp>,
    #[serde(default)]
    pub likes: Vec<UserId>,
    #[serde(default)]
    pub parent_id: Option<CommentId>,
    #[serde(default)]
    pub replies: Vec<Comment>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A comment's own fields, without its replies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentNode {
    pub id: CommentId,
    pub test_id: Option<QuizId>,
    pub author_id: UserId,
    pub body: String,
    pub created_at: Timestamp,
    pub updated_at: Option<Timestamp>,
    pub likes: Vec<UserId>,
    pub parent_id: Option<CommentId>,
    pub extra: Map<String, Value>,
}

impl CommentNode {
    /// A fresh comment with no likes and no edits.
    pub fn new(
        id: CommentId,
        test_id: Option<QuizId>,
        author_id: UserId,
        body: String,
        parent_id: Option<CommentId>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            test_id,
            author_id,
            body,
            created_at: now.into(),
            updated_at: None,
            likes: Vec::new(),
            parent_id,
            extra: Map::new(),
        }
    }

    fn with_replies(self, replies: Vec<Comment>) -> Comment {
        Comment {
            id: self.id,
            test_id: self.test_id,
            author_id: self.author_id,
            body: self.body,
            created_at: self.created_at,
            updated_at: self.updated_at,
            likes: self.likes,
            parent_id: self.parent_id,
            replies,
            extra: self.extra,
        }
    }
}

impl Comment {
    fn split(self) -> (CommentNode, Vec<Comment>) {
        let node = CommentNode {
            id: self.id,
            test_id: self.test_id,
            author_id: self.author_id,
            body: self.body,
            created_at: self.created_at,
            updated_at: self.updated_at,
            likes: self.likes,
            parent_id: self.parent_id,
            extra: self.extra,
        };
        (node, self.replies)
    }
}
