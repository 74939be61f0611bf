//! User directory and follow handlers.
//!
//! ```text
//! GET /api/users
//! GET /api/users/{id}
//! POST /api/users/{id}/follow
//! DELETE /api/users/{id}/follow
//! ```

use actix_web::{delete, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::FollowState;
use crate::domain::{UserId, UserProfile};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::schemas::{ErrorSchema, UserProfileSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_user_id};

const USER_ID: FieldName = FieldName::new("id");

#[derive(Debug, Deserialize)]
pub struct UserPath {
    id: String,
}

impl UserPath {
    fn user_id(self) -> ApiResult<UserId> {
        parse_user_id(self.id, USER_ID)
    }
}

/// Both sides of a follow edge after the change.
#[derive(Debug, Serialize, ToSchema)]
pub struct FollowResponse {
    /// The caller.
    #[schema(value_type = UserProfileSchema)]
    pub user: UserProfile,
    /// The followed or unfollowed user.
    #[schema(value_type = UserProfileSchema)]
    pub target: UserProfile,
}

impl From<FollowState> for FollowResponse {
    fn from(state: FollowState) -> Self {
        Self {
            user: state.user,
            target: state.target,
        }
    }
}

/// List every user as a public profile.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use quizboard::inbound::http::users::list_users;
///
/// let app = App::new().service(list_users);
/// ```
#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "Users", body = [UserProfileSchema]),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "listUsers",
    security([])
)]
#[get("/users")]
pub async fn list_users(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<UserProfile>>> {
    Ok(web::Json(state.directory.list_users().await?))
}

/// Fetch one user's public profile.
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = String, Path, description = "User identifier")),
    responses(
        (status = 200, description = "User", body = UserProfileSchema),
        (status = 400, description = "Invalid identifier", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "getUser",
    security([])
)]
#[get("/users/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    path: web::Path<UserPath>,
) -> ApiResult<web::Json<UserProfile>> {
    let id = path.into_inner().user_id()?;
    Ok(web::Json(state.directory.get_user(&id).await?))
}

/// Follow a user.
#[utoipa::path(
    post,
    path = "/api/users/{id}/follow",
    params(("id" = String, Path, description = "User to follow")),
    responses(
        (status = 200, description = "Following", body = FollowResponse),
        (status = 400, description = "Cannot follow yourself", body = ErrorSchema),
        (status = 401, description = "No access token", body = ErrorSchema),
        (status = 403, description = "Invalid or expired token", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 409, description = "Concurrent modification", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "followUser"
)]
#[post("/users/{id}/follow")]
pub async fn follow_user(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<UserPath>,
) -> ApiResult<web::Json<FollowResponse>> {
    let target = path.into_inner().user_id()?;
    let follow = state.follows.follow(user.id(), &target).await?;
    Ok(web::Json(follow.into()))
}

/// Stop following a user.
#[utoipa::path(
    delete,
    path = "/api/users/{id}/follow",
    params(("id" = String, Path, description = "User to unfollow")),
    responses(
        (status = 200, description = "No longer following", body = FollowResponse),
        (status = 400, description = "Cannot unfollow yourself", body = ErrorSchema),
        (status = 401, description = "No access token", body = ErrorSchema),
        (status = 403, description = "Invalid or expired token", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 409, description = "Concurrent modification", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "unfollowUser"
)]
#[delete("/users/{id}/follow")]
pub async fn unfollow_user(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<UserPath>,
) -> ApiResult<web::Json<FollowResponse>> {
    let target = path.into_inner().user_id()?;
    let follow = state.follows.unfollow(user.id(), &target).await?;
    Ok(web::Json(follow.into()))
}
