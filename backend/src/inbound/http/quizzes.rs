//! Quiz catalogue handlers.
//!
//! ```text
//! GET /api/tests
//! GET /api/user-tests
//! POST /api/user-tests {"subject":"Capitals","questions":[...]}
//! DELETE /api/user-tests/{id}
//! POST /api/tests/{id}/like
//! ```

use actix_web::{HttpResponse, delete, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Question, Quiz, QuizDraft, QuizId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::accounts::MessageResponse;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::schemas::{ErrorSchema, QuestionSchema, QuizSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_quiz_id, text_or_empty};

const TEST_DELETED: &str = "test deleted";

#[derive(Debug, Deserialize)]
pub struct QuizPath {
    id: String,
}

impl QuizPath {
    fn quiz_id(self) -> ApiResult<QuizId> {
        parse_quiz_id(self.id, FieldName::new("id"))
    }
}

/// Authoring request for a new quiz.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuizRequest {
    #[schema(example = "Capitals")]
    pub subject: Option<String>,
    #[schema(value_type = Option<Vec<QuestionSchema>>)]
    pub questions: Option<Vec<Question>>,
}

/// Every quiz: user-authored first, then the built-in set.
#[utoipa::path(
    get,
    path = "/api/tests",
    responses(
        (status = 200, description = "All quizzes", body = [QuizSchema]),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["tests"],
    operation_id = "listTests",
    security([])
)]
#[get("/tests")]
pub async fn list_tests(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<Quiz>>> {
    Ok(web::Json(state.quizzes.list_tests().await?))
}

/// User-authored quizzes only, newest first.
#[utoipa::path(
    get,
    path = "/api/user-tests",
    responses(
        (status = 200, description = "User-authored quizzes", body = [QuizSchema]),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["tests"],
    operation_id = "listUserTests",
    security([])
)]
#[get("/user-tests")]
pub async fn list_user_tests(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<Quiz>>> {
    Ok(web::Json(state.quizzes.list_user_tests().await?))
}

/// Publish a quiz owned by the caller.
#[utoipa::path(
    post,
    path = "/api/user-tests",
    request_body = CreateQuizRequest,
    responses(
        (status = 201, description = "Quiz created", body = QuizSchema),
        (status = 400, description = "Invalid quiz", body = ErrorSchema),
        (status = 401, description = "No access token", body = ErrorSchema),
        (status = 403, description = "Invalid or expired token", body = ErrorSchema),
        (status = 409, description = "Concurrent modification", body = ErrorSchema)
    ),
    tags = ["tests"],
    operation_id = "createUserTest"
)]
#[post("/user-tests")]
pub async fn create_user_test(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    payload: web::Json<CreateQuizRequest>,
) -> ApiResult<HttpResponse> {
    let CreateQuizRequest { subject, questions } = payload.into_inner();
    let draft = QuizDraft::new(&text_or_empty(subject), questions.unwrap_or_default())?;
    let quiz = state.quiz_commands.create_user_test(user.id(), draft).await?;
    Ok(HttpResponse::Created().json(quiz))
}

/// Remove a user-authored quiz.
///
/// Any signed-in user may delete; built-in quizzes cannot be deleted.
#[utoipa::path(
    delete,
    path = "/api/user-tests/{id}",
    params(("id" = String, Path, description = "Quiz identifier")),
    responses(
        (status = 200, description = "Quiz deleted", body = MessageResponse),
        (status = 401, description = "No access token", body = ErrorSchema),
        (status = 403, description = "Invalid or expired token", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 409, description = "Concurrent modification", body = ErrorSchema)
    ),
    tags = ["tests"],
    operation_id = "deleteUserTest"
)]
#[delete("/user-tests/{id}")]
pub async fn delete_user_test(
    state: web::Data<HttpState>,
    _user: AuthenticatedUser,
    path: web::Path<QuizPath>,
) -> ApiResult<web::Json<MessageResponse>> {
    let id = path.into_inner().quiz_id()?;
    state.quiz_commands.delete_user_test(&id).await?;
    Ok(web::Json(MessageResponse::new(TEST_DELETED)))
}

/// Like or unlike a quiz as the caller.
#[utoipa::path(
    post,
    path = "/api/tests/{id}/like",
    params(("id" = String, Path, description = "Quiz identifier")),
    responses(
        (status = 200, description = "Updated quiz", body = QuizSchema),
        (status = 401, description = "No access token", body = ErrorSchema),
        (status = 403, description = "Invalid or expired token", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 409, description = "Concurrent modification", body = ErrorSchema)
    ),
    tags = ["tests"],
    operation_id = "toggleTestLike"
)]
#[post("/tests/{id}/like")]
pub async fn toggle_test_like(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<QuizPath>,
) -> ApiResult<web::Json<Quiz>> {
    let id = path.into_inner().quiz_id()?;
    Ok(web::Json(state.quiz_commands.toggle_like(&id, user.id()).await?))
}
