//! Arena-backed comment forest.
//!
//! Nodes live in a slot vector and refer to each other by [`NodeIndex`]; each
//! slot records its parent and its ordered children, and an id index maps a
//! [`CommentId`] to its slot. Deleted slots are tombstoned (`None`) and never
//! reused within one forest, which is rebuilt from storage on every request.
//!
//! ## Invariants
//! - Every live slot is reachable from exactly one entry of `roots` or of its
//!   parent's `children`; cycles cannot be expressed.
//! - `index` maps each id to its first live occurrence in depth-first
//!   pre-order, so duplicate ids in legacy data resolve deterministically.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use super::{Comment, CommentId, CommentNode};
use crate::domain::{QuizId, UserId, toggle_membership};

/// Deepest reply nesting accepted; roots are depth 0.
///
/// Each level adds two JSON nesting levels, so this stays well inside the
/// recursion limit of the JSON reader.
pub const MAX_REPLY_DEPTH: usize = 40;

/// Failures raised by forest operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ForestError {
    #[error("comment {0} not found")]
    NotFound(CommentId),
    #[error("replies may be nested at most {MAX_REPLY_DEPTH} levels deep")]
    TooDeep,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct NodeIndex(usize);

#[derive(Debug, Clone)]
struct Slot {
    node: CommentNode,
    parent: Option<NodeIndex>,
    children: Vec<NodeIndex>,
}

/// In-memory forest of comments for every quiz.
///
/// # Examples
/// ```
/// use chrono::Utc;
/// use quizboard::domain::{CommentForest, CommentId, CommentNode, QuizId, UserId};
///
/// let mut forest = CommentForest::default();
/// let author = UserId::new("u1").expect("id");
/// let root = CommentNode::new(
///     CommentId::new("c1"),
///     Some(QuizId::new("t1")),
///     author.clone(),
///     "First!".into(),
///     None,
///     Utc::now(),
/// );
/// forest.add_root(root);
/// let reply = CommentNode::new(
///     CommentId::new("c2"),
///     None,
///     author,
///     "Welcome".into(),
///     Some(CommentId::new("c1")),
///     Utc::now(),
/// );
/// forest.add_reply(reply).expect("parent exists");
///
/// let thread = forest.roots_for(&QuizId::new("t1"));
/// assert_eq!(thread[0].replies[0].body, "Welcome");
/// ```
#[derive(Debug, Clone, Default)]
pub struct CommentForest {
    slots: Vec<Option<Slot>>,
    roots: Vec<NodeIndex>,
    index: HashMap<CommentId, NodeIndex>,
}

impl CommentForest {
    /// Build the arena from the persisted nested shape.
    pub fn from_roots(roots: Vec<Comment>) -> Self {
        let mut forest = Self::default();
        let mut pending: Vec<(Comment, Option<NodeIndex>)> =
            roots.into_iter().rev().map(|root| (root, None)).collect();

        // Popping from a stack seeded in reverse visits nodes in pre-order,
        // so the first insert for an id is also its first pre-order match.
        while let Some((comment, parent)) = pending.pop() {
            let (node, replies) = comment.split();
            let at = forest.push_slot(node, parent);
            pending.extend(replies.into_iter().rev().map(|reply| (reply, Some(at))));
        }
        forest
    }

    /// Rebuild the nested shape for persistence.
    pub fn into_roots(self) -> Vec<Comment> {
        self.roots
            .iter()
            .filter_map(|&root| self.build(root))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    pub fn contains(&self, id: &CommentId) -> bool {
        self.index.contains_key(id)
    }

    /// The comment `id` with its replies.
    pub fn get(&self, id: &CommentId) -> Option<Comment> {
        self.index.get(id).and_then(|&at| self.build(at))
    }

    /// Root comments on `test`, each with its replies.
    pub fn roots_for(&self, test: &QuizId) -> Vec<Comment> {
        self.roots
            .iter()
            .filter(|&&root| {
                self.slot(root)
                    .is_some_and(|slot| slot.node.test_id.as_ref() == Some(test))
            })
            .filter_map(|&root| self.build(root))
            .collect()
    }

    /// Append a root comment.
    pub fn add_root(&mut self, node: CommentNode) -> Comment {
        let created = node.clone().with_replies(Vec::new());
        self.push_slot(node, None);
        created
    }

    /// Append `node` as the last reply of the comment named by its
    /// `parent_id`; a node without a parent becomes a root.
    pub fn add_reply(&mut self, node: CommentNode) -> Result<Comment, ForestError> {
        let Some(parent_id) = node.parent_id.clone() else {
            return Ok(self.add_root(node));
        };
        let parent = self.locate(&parent_id)?;
        if self.depth(parent) + 1 > MAX_REPLY_DEPTH {
            return Err(ForestError::TooDeep);
        }
        let created = node.clone().with_replies(Vec::new());
        self.push_slot(node, Some(parent));
        Ok(created)
    }

    /// Replace a comment's body and stamp `updated_at`.
    pub fn edit(
        &mut self,
        id: &CommentId,
        body: String,
        now: DateTime<Utc>,
    ) -> Result<Comment, ForestError> {
        let at = self.locate(id)?;
        let slot = self.slot_mut(at).ok_or_else(|| ForestError::NotFound(id.clone()))?;
        slot.node.body = body;
        slot.node.updated_at = Some(now.into());
        self.build(at).ok_or_else(|| ForestError::NotFound(id.clone()))
    }

    /// Flip `user`'s like on a comment.
    pub fn toggle_like(&mut self, id: &CommentId, user: &UserId) -> Result<Comment, ForestError> {
        let at = self.locate(id)?;
        let slot = self.slot_mut(at).ok_or_else(|| ForestError::NotFound(id.clone()))?;
        toggle_membership(&mut slot.node.likes, user);
        self.build(at).ok_or_else(|| ForestError::NotFound(id.clone()))
    }

    /// Remove a comment and its whole subtree; returns how many were removed.
    pub fn delete(&mut self, id: &CommentId) -> Result<usize, ForestError> {
        let at = self.locate(id)?;
        let parent = self.slot(at).and_then(|slot| slot.parent);
        let siblings = match parent {
            Some(parent) => match self.slot_mut(parent) {
                Some(slot) => &mut slot.children,
                None => return Err(ForestError::NotFound(id.clone())),
            },
            None => &mut self.roots,
        };
        siblings.retain(|&sibling| sibling != at);

        let mut removed = 0;
        let mut doomed = vec![at];
        while let Some(next) = doomed.pop() {
            if let Some(slot) = self.slots.get_mut(next.0).and_then(Option::take) {
                removed += 1;
                doomed.extend(slot.children);
            }
        }
        self.reindex();
        Ok(removed)
    }

    fn locate(&self, id: &CommentId) -> Result<NodeIndex, ForestError> {
        self.index
            .get(id)
            .copied()
            .ok_or_else(|| ForestError::NotFound(id.clone()))
    }

    fn slot(&self, at: NodeIndex) -> Option<&Slot> {
        self.slots.get(at.0).and_then(Option::as_ref)
    }

    fn slot_mut(&mut self, at: NodeIndex) -> Option<&mut Slot> {
        self.slots.get_mut(at.0).and_then(Option::as_mut)
    }

    fn push_slot(&mut self, node: CommentNode, parent: Option<NodeIndex>) -> NodeIndex {
        let at = NodeIndex(self.slots.len());
        self.index.entry(node.id.clone()).or_insert(at);
        self.slots.push(Some(Slot {
            node,
            parent,
            children: Vec::new(),
        }));
        match parent.and_then(|parent| self.slot_mut(parent)) {
            Some(slot) => slot.children.push(at),
            None => self.roots.push(at),
        }
        at
    }

    fn depth(&self, at: NodeIndex) -> usize {
        let mut depth = 0;
        let mut cursor = self.slot(at).and_then(|slot| slot.parent);
        while let Some(parent) = cursor {
            depth += 1;
            cursor = self.slot(parent).and_then(|slot| slot.parent);
        }
        depth
    }

    /// Recompute the id index in pre-order over live nodes.
    fn reindex(&mut self) {
        let mut index = HashMap::with_capacity(self.index.len());
        let mut pending: Vec<NodeIndex> = self.roots.iter().rev().copied().collect();
        while let Some(at) = pending.pop() {
            if let Some(slot) = self.slot(at) {
                index.entry(slot.node.id.clone()).or_insert(at);
                pending.extend(slot.children.iter().rev().copied());
            }
        }
        self.index = index;
    }

    fn build(&self, at: NodeIndex) -> Option<Comment> {
        let slot = self.slot(at)?;
        let replies = slot
            .children
            .iter()
            .filter_map(|&child| self.build(child))
            .collect();
        Some(slot.node.clone().with_replies(replies))
    }
}

#[cfg(test)]
mod tests;
