//! Read-only community posts.
//!
//! ```text
//! GET /api/posts
//! GET /api/comments
//! ```

use actix_web::{get, web};

use crate::domain::{Post, PostComment};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, PostCommentSchema, PostSchema};
use crate::inbound::http::state::HttpState;

/// Every stored post.
#[utoipa::path(
    get,
    path = "/api/posts",
    responses(
        (status = 200, description = "Posts", body = [PostSchema]),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["posts"],
    operation_id = "listPosts",
    security([])
)]
#[get("/posts")]
pub async fn list_posts(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<Post>>> {
    Ok(web::Json(state.directory.list_posts().await?))
}

/// Every stored post comment, flat.
#[utoipa::path(
    get,
    path = "/api/comments",
    responses(
        (status = 200, description = "Post comments", body = [PostCommentSchema]),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["posts"],
    operation_id = "listPostComments",
    security([])
)]
#[get("/comments")]
pub async fn list_post_comments(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<PostComment>>> {
    Ok(web::Json(state.directory.list_post_comments().await?))
}
