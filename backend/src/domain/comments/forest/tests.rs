//! Tests for the arena comment forest.

use super::*;
use crate::domain::Timestamp;
use chrono::TimeZone;
use rstest::{fixture, rstest};
use serde_json::json;

fn at(minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 12, minute, 0)
        .single()
        .expect("valid timestamp")
}

fn user(id: &str) -> UserId {
    UserId::new(id).expect("valid user id")
}

fn reply(id: &str, parent: &str, body: &str) -> CommentNode {
    CommentNode::new(
        CommentId::new(id),
        None,
        user("author"),
        body.to_owned(),
        Some(CommentId::new(parent)),
        at(30),
    )
}

fn ids(comments: &[Comment]) -> Vec<&str> {
    comments.iter().map(|c| c.id.as_ref()).collect()
}

/// t1: a -> (b -> d), c ; t2: e
#[fixture]
fn stored() -> Vec<Comment> {
    serde_json::from_value(json!([
        {
            "id": "a", "testId": "t1", "authorId": "u1", "body": "root a",
            "createdAt": "2025-03-01T12:00:00Z", "likes": ["u2"], "parentId": null,
            "replies": [
                {
                    "id": "b", "authorId": "u2", "body": "reply b",
                    "createdAt": "2025-03-01T12:01:00Z", "parentId": "a",
                    "replies": [
                        {"id": "d", "authorId": "u1", "body": "reply d",
                         "createdAt": "2025-03-01T12:02:00Z", "parentId": "b"}
                    ]
                },
                {"id": "c", "authorId": "u3", "body": "reply c",
                 "createdAt": "2025-03-01T12:03:00Z", "parentId": "a", "replies": []}
            ]
        },
        {
            "id": "e", "testId": "t2", "authorId": "u1", "body": "root e",
            "createdAt": "2025-03-01T12:04:00Z", "parentId": null, "replies": []
        }
    ]))
    .expect("fixture forest deserialises")
}

#[fixture]
fn forest(stored: Vec<Comment>) -> CommentForest {
    CommentForest::from_roots(stored)
}

#[rstest]
fn round_trip_preserves_nested_shape(stored: Vec<Comment>) {
    let rebuilt = CommentForest::from_roots(stored.clone()).into_roots();
    assert_eq!(rebuilt, stored);
}

#[rstest]
fn missing_likes_and_replies_default_to_empty(forest: CommentForest) {
    let d = forest.get(&CommentId::new("d")).expect("d exists");
    assert!(d.likes.is_empty());
    assert!(d.replies.is_empty());
}

#[rstest]
fn roots_for_filters_roots_by_test(forest: CommentForest) {
    let thread = forest.roots_for(&QuizId::new("t1"));
    assert_eq!(ids(&thread), vec!["a"]);
    assert_eq!(ids(&thread[0].replies), vec!["b", "c"]);
    assert!(forest.roots_for(&QuizId::new("missing")).is_empty());
}

#[rstest]
fn reply_to_single_root_matches_worked_example() {
    let mut forest = CommentForest::from_roots(
        serde_json::from_value(json!([{
            "id": "1", "testId": "t", "authorId": "u", "body": "root",
            "createdAt": "2025-03-01T12:00:00Z", "parentId": null
        }]))
        .expect("deserialises"),
    );

    let created = forest.add_reply(reply("2", "1", "hi")).expect("parent exists");

    assert_eq!(created.parent_id, Some(CommentId::new("1")));
    assert_eq!(created.body, "hi");
    assert!(created.likes.is_empty());
    let root = forest.get(&CommentId::new("1")).expect("root");
    assert_eq!(root.replies, vec![created]);
}

#[rstest]
fn reply_becomes_last_child_of_deep_parent(mut forest: CommentForest) {
    forest.add_reply(reply("x", "b", "first")).expect("b exists");
    forest.add_reply(reply("y", "b", "second")).expect("b exists");

    let b = forest.get(&CommentId::new("b")).expect("b");
    assert_eq!(ids(&b.replies), vec!["d", "x", "y"]);
}

#[rstest]
fn reply_to_unknown_parent_leaves_forest_unchanged(mut forest: CommentForest, stored: Vec<Comment>) {
    let err = forest
        .add_reply(reply("x", "nope", "hello"))
        .expect_err("unknown parent");
    assert_eq!(err, ForestError::NotFound(CommentId::new("nope")));
    assert_eq!(forest.into_roots(), stored);
}

#[rstest]
fn root_comments_append_in_order(mut forest: CommentForest) {
    let node = CommentNode::new(
        CommentId::new("z"),
        Some(QuizId::new("t1")),
        user("u9"),
        "late".to_owned(),
        None,
        at(40),
    );
    forest.add_root(node);
    assert_eq!(ids(&forest.roots_for(&QuizId::new("t1"))), vec!["a", "z"]);
}

#[rstest]
fn edit_replaces_body_and_stamps_update(mut forest: CommentForest) {
    let edited = forest
        .edit(&CommentId::new("d"), "changed".to_owned(), at(50))
        .expect("d exists");
    assert_eq!(edited.body, "changed");
    assert_eq!(edited.updated_at, Some(Timestamp::from(at(50))));
    assert_eq!(edited.created_at.instant(), Some(at(2)));
}

#[rstest]
fn toggle_like_twice_restores_likes(mut forest: CommentForest) {
    let id = CommentId::new("a");
    let before = forest.get(&id).expect("a").likes;

    let liked = forest.toggle_like(&id, &user("u7")).expect("a exists");
    assert_eq!(liked.likes, vec![user("u2"), user("u7")]);
    let restored = forest.toggle_like(&id, &user("u7")).expect("a exists");
    assert_eq!(restored.likes, before);
}

#[rstest]
fn delete_removes_exactly_the_subtree(mut forest: CommentForest) {
    let removed = forest.delete(&CommentId::new("b")).expect("b exists");

    assert_eq!(removed, 2);
    assert!(!forest.contains(&CommentId::new("b")));
    assert!(!forest.contains(&CommentId::new("d")));
    for survivor in ["a", "c", "e"] {
        assert!(forest.contains(&CommentId::new(survivor)), "{survivor} survives");
    }
    assert_eq!(forest.len(), 3);
}

#[rstest]
fn delete_root_keeps_other_threads(mut forest: CommentForest) {
    forest.delete(&CommentId::new("a")).expect("a exists");
    let remaining = forest.into_roots();
    assert_eq!(ids(&remaining), vec!["e"]);
}

#[rstest]
#[case::edit("edit")]
#[case::like("like")]
#[case::delete("delete")]
fn operations_on_absent_ids_fail_without_mutation(
    mut forest: CommentForest,
    stored: Vec<Comment>,
    #[case] operation: &str,
) {
    let missing = CommentId::new("missing");
    let result = match operation {
        "edit" => forest.edit(&missing, "x".to_owned(), at(1)).map(|_| ()),
        "like" => forest.toggle_like(&missing, &user("u1")).map(|_| ()),
        _ => forest.delete(&missing).map(|_| ()),
    };
    assert_eq!(result, Err(ForestError::NotFound(missing)));
    assert_eq!(forest.into_roots(), stored);
}

#[rstest]
fn duplicate_ids_resolve_to_first_pre_order_match() {
    let mut forest = CommentForest::from_roots(
        serde_json::from_value(json!([
            {
                "id": "root", "testId": "t", "authorId": "u", "body": "r",
                "createdAt": "2025-03-01T12:00:00Z", "parentId": null,
                "replies": [{"id": "dup", "authorId": "u", "body": "nested",
                             "createdAt": "2025-03-01T12:00:00Z", "parentId": "root"}]
            },
            {
                "id": "dup", "testId": "t", "authorId": "u", "body": "later root",
                "createdAt": "2025-03-01T12:00:00Z", "parentId": null
            }
        ]))
        .expect("deserialises"),
    );

    let first = forest.get(&CommentId::new("dup")).expect("dup");
    assert_eq!(first.body, "nested");

    forest.delete(&CommentId::new("dup")).expect("dup exists");
    let next = forest.get(&CommentId::new("dup")).expect("second dup now wins");
    assert_eq!(next.body, "later root");
}

#[rstest]
fn replies_beyond_depth_limit_are_rejected() {
    let mut forest = CommentForest::default();
    forest.add_root(CommentNode::new(
        CommentId::new("0"),
        Some(QuizId::new("t")),
        user("u"),
        "root".to_owned(),
        None,
        at(0),
    ));
    for depth in 1..=MAX_REPLY_DEPTH {
        let parent = (depth - 1).to_string();
        forest
            .add_reply(reply(&depth.to_string(), &parent, "deeper"))
            .expect("within limit");
    }

    let err = forest
        .add_reply(reply("too-deep", &MAX_REPLY_DEPTH.to_string(), "x"))
        .expect_err("limit reached");
    assert_eq!(err, ForestError::TooDeep);
}

#[rstest]
fn deepest_allowed_thread_survives_json_round_trip() {
    let mut forest = CommentForest::default();
    forest.add_root(CommentNode::new(
        CommentId::new("0"),
        Some(QuizId::new("t")),
        user("u"),
        "root".to_owned(),
        None,
        at(0),
    ));
    for depth in 1..=MAX_REPLY_DEPTH {
        forest
            .add_reply(reply(&depth.to_string(), &(depth - 1).to_string(), "deeper"))
            .expect("within limit");
    }
    let roots = forest.into_roots();
    let bytes = serde_json::to_vec_pretty(&roots).expect("serialises");
    let reloaded: Vec<Comment> = serde_json::from_slice(&bytes).expect("reloads");
    assert_eq!(reloaded, roots);
}

#[rstest]
fn unknown_fields_survive_a_forest_rewrite() {
    let stored = json!([{
        "id": "a", "testId": "t1", "authorId": "u1", "body": "root",
        "createdAt": "1 March", "likes": [], "parentId": null, "pinned": true,
        "replies": [{
            "id": "b", "authorId": "", "body": "reply", "createdAt": 1_740_830_400_000_i64,
            "likes": [], "parentId": "a", "replies": [], "flags": ["spoiler"]
        }]
    }]);
    let roots: Vec<Comment> = serde_json::from_value(stored.clone()).expect("legacy forest loads");
    let mut forest = CommentForest::from_roots(roots);
    forest
        .toggle_like(&CommentId::new("a"), &user("u9"))
        .expect("a exists");
    forest
        .toggle_like(&CommentId::new("a"), &user("u9"))
        .expect("a exists");

    let rewritten = serde_json::to_value(forest.into_roots()).expect("forest serialises");
    assert_eq!(rewritten, stored);
}
