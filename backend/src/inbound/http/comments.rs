//! Quiz discussion handlers.
//!
//! ```text
//! GET /api/tests/{id}/comments
//! POST /api/tests/{id}/comments {"body":"Nice one","parentId":null}
//! PUT /api/tests/{testId}/comments/{commentId} {"body":"Edited"}
//! DELETE /api/tests/{testId}/comments/{commentId}
//! POST /api/tests/{testId}/comments/{commentId}/like
//! ```
//!
//! The author of a new comment is always the caller; edits and deletes are
//! open to any signed-in user. Comment ids are unique across quizzes, so the
//! `testId` segment of the per-comment routes is not consulted.

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::AddCommentRequest;
use crate::domain::{Comment, CommentId, QuizId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::accounts::MessageResponse;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::schemas::{CommentSchema, ErrorSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, parse_comment_id, parse_optional_comment_id, parse_quiz_id, required_text,
};

const COMMENT_DELETED: &str = "comment deleted";
const BODY: FieldName = FieldName::new("body");

#[derive(Debug, Deserialize)]
pub struct TestPath {
    id: String,
}

impl TestPath {
    fn quiz_id(self) -> ApiResult<QuizId> {
        parse_quiz_id(self.id, FieldName::new("id"))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentPath {
    comment_id: String,
}

impl CommentPath {
    fn comment_id(self) -> ApiResult<CommentId> {
        parse_comment_id(self.comment_id, FieldName::new("commentId"))
    }
}

/// New comment or reply.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewCommentRequest {
    #[schema(example = "Great quiz!")]
    pub body: Option<String>,
    /// Comment being replied to; omit or `null` for a top-level comment.
    pub parent_id: Option<String>,
}

/// Replacement comment text.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EditCommentRequest {
    pub body: Option<String>,
}

/// Top-level comments on a quiz with their nested replies.
#[utoipa::path(
    get,
    path = "/api/tests/{id}/comments",
    params(("id" = String, Path, description = "Quiz identifier")),
    responses(
        (status = 200, description = "Comment threads", body = [CommentSchema]),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["comments"],
    operation_id = "listTestComments",
    security([])
)]
#[get("/tests/{id}/comments")]
pub async fn list_comments(
    state: web::Data<HttpState>,
    path: web::Path<TestPath>,
) -> ApiResult<web::Json<Vec<Comment>>> {
    let test = path.into_inner().quiz_id()?;
    Ok(web::Json(state.comments.list_for_test(&test).await?))
}

/// Comment on a quiz, or reply to an existing comment at any depth.
#[utoipa::path(
    post,
    path = "/api/tests/{id}/comments",
    params(("id" = String, Path, description = "Quiz identifier")),
    request_body = NewCommentRequest,
    responses(
        (status = 201, description = "Comment created", body = CommentSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "No access token", body = ErrorSchema),
        (status = 403, description = "Invalid or expired token", body = ErrorSchema),
        (status = 404, description = "Parent comment not found", body = ErrorSchema),
        (status = 409, description = "Concurrent modification", body = ErrorSchema)
    ),
    tags = ["comments"],
    operation_id = "addTestComment"
)]
#[post("/tests/{id}/comments")]
pub async fn add_comment(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<TestPath>,
    payload: web::Json<NewCommentRequest>,
) -> ApiResult<HttpResponse> {
    let test_id = path.into_inner().quiz_id()?;
    let NewCommentRequest { body, parent_id } = payload.into_inner();
    let request = AddCommentRequest {
        test_id,
        author_id: user.id().clone(),
        body: required_text(body, BODY)?,
        parent_id: parse_optional_comment_id(parent_id, FieldName::new("parentId"))?,
    };
    let comment = state.comment_commands.add(request).await?;
    Ok(HttpResponse::Created().json(comment))
}

/// Replace a comment's body.
#[utoipa::path(
    put,
    path = "/api/tests/{testId}/comments/{commentId}",
    params(
        ("testId" = String, Path, description = "Quiz identifier"),
        ("commentId" = String, Path, description = "Comment identifier")
    ),
    request_body = EditCommentRequest,
    responses(
        (status = 200, description = "Updated comment", body = CommentSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "No access token", body = ErrorSchema),
        (status = 403, description = "Invalid or expired token", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 409, description = "Concurrent modification", body = ErrorSchema)
    ),
    tags = ["comments"],
    operation_id = "editTestComment"
)]
#[put("/tests/{testId}/comments/{commentId}")]
pub async fn edit_comment(
    state: web::Data<HttpState>,
    _user: AuthenticatedUser,
    path: web::Path<CommentPath>,
    payload: web::Json<EditCommentRequest>,
) -> ApiResult<web::Json<Comment>> {
    let id = path.into_inner().comment_id()?;
    let body = required_text(payload.into_inner().body, BODY)?;
    Ok(web::Json(state.comment_commands.edit(&id, &body).await?))
}

/// Delete a comment together with all of its replies.
#[utoipa::path(
    delete,
    path = "/api/tests/{testId}/comments/{commentId}",
    params(
        ("testId" = String, Path, description = "Quiz identifier"),
        ("commentId" = String, Path, description = "Comment identifier")
    ),
    responses(
        (status = 200, description = "Comment deleted", body = MessageResponse),
        (status = 401, description = "No access token", body = ErrorSchema),
        (status = 403, description = "Invalid or expired token", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 409, description = "Concurrent modification", body = ErrorSchema)
    ),
    tags = ["comments"],
    operation_id = "deleteTestComment"
)]
#[delete("/tests/{testId}/comments/{commentId}")]
pub async fn delete_comment(
    state: web::Data<HttpState>,
    _user: AuthenticatedUser,
    path: web::Path<CommentPath>,
) -> ApiResult<web::Json<MessageResponse>> {
    let id = path.into_inner().comment_id()?;
    state.comment_commands.delete(&id).await?;
    Ok(web::Json(MessageResponse::new(COMMENT_DELETED)))
}

/// Like or unlike a comment as the caller.
#[utoipa::path(
    post,
    path = "/api/tests/{testId}/comments/{commentId}/like",
    params(
        ("testId" = String, Path, description = "Quiz identifier"),
        ("commentId" = String, Path, description = "Comment identifier")
    ),
    responses(
        (status = 200, description = "Updated comment", body = CommentSchema),
        (status = 401, description = "No access token", body = ErrorSchema),
        (status = 403, description = "Invalid or expired token", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 409, description = "Concurrent modification", body = ErrorSchema)
    ),
    tags = ["comments"],
    operation_id = "toggleTestCommentLike"
)]
#[post("/tests/{testId}/comments/{commentId}/like")]
pub async fn toggle_comment_like(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<CommentPath>,
) -> ApiResult<web::Json<Comment>> {
    let id = path.into_inner().comment_id()?;
    Ok(web::Json(
        state.comment_commands.toggle_like(&id, user.id()).await?,
    ))
}
