//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! specification for the REST API. It registers:
//!
//! - **Paths**: every HTTP endpoint from the inbound layer
//! - **Schemas**: domain type wrappers ([`ErrorSchema`], [`UserProfileSchema`],
//!   [`QuizSchema`], [`CommentSchema`] and friends) plus request and response
//!   bodies owned by the handlers
//! - **Security**: bearer JWT authentication scheme
//!
//! The generated specification is used by Swagger UI (debug builds) and
//! exported via `cargo run --bin openapi-dump` for external tooling.

use crate::inbound::http::accounts::{
    AuthSessionResponse, ForgotPasswordRequest, LoginRequest, MessageResponse, RefreshRequest,
    RegisterRequest, ResetPasswordRequest, VerifiedResponse, VerifyEmailRequest,
};
use crate::inbound::http::comments::{EditCommentRequest, NewCommentRequest};
use crate::inbound::http::quizzes::CreateQuizRequest;
use crate::inbound::http::schemas::{
    CommentSchema, ErrorCodeSchema, ErrorSchema, PostCommentSchema, PostSchema, QuestionSchema,
    QuizSchema, TokenPairSchema, UserProfileSchema,
};
use crate::inbound::http::users::FollowResponse;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Name of the bearer security scheme referenced by protected operations.
pub const BEARER_AUTH: &str = "BearerAuth";

/// Enrich the generated document with the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            BEARER_AUTH,
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some(
                        "Access token returned by POST /api/auth/login or /api/auth/register.",
                    ))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Quizboard backend API",
        description = "Accounts, quizzes, threaded quiz comments, follows and read-only posts."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerAuth" = [])),
    paths(
        crate::inbound::http::accounts::register,
        crate::inbound::http::accounts::login,
        crate::inbound::http::accounts::refresh,
        crate::inbound::http::accounts::verify_email,
        crate::inbound::http::accounts::forgot_password,
        crate::inbound::http::accounts::reset_password,
        crate::inbound::http::accounts::current_user,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::follow_user,
        crate::inbound::http::users::unfollow_user,
        crate::inbound::http::quizzes::list_tests,
        crate::inbound::http::quizzes::list_user_tests,
        crate::inbound::http::quizzes::create_user_test,
        crate::inbound::http::quizzes::delete_user_test,
        crate::inbound::http::quizzes::toggle_test_like,
        crate::inbound::http::comments::list_comments,
        crate::inbound::http::comments::add_comment,
        crate::inbound::http::comments::edit_comment,
        crate::inbound::http::comments::delete_comment,
        crate::inbound::http::comments::toggle_comment_like,
        crate::inbound::http::posts::list_posts,
        crate::inbound::http::posts::list_post_comments,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        UserProfileSchema,
        TokenPairSchema,
        QuestionSchema,
        QuizSchema,
        CommentSchema,
        PostSchema,
        PostCommentSchema,
        RegisterRequest,
        LoginRequest,
        RefreshRequest,
        VerifyEmailRequest,
        ForgotPasswordRequest,
        ResetPasswordRequest,
        AuthSessionResponse,
        MessageResponse,
        VerifiedResponse,
        FollowResponse,
        CreateQuizRequest,
        NewCommentRequest,
        EditCommentRequest,
    )),
    tags(
        (name = "auth", description = "Registration, login, tokens and password recovery"),
        (name = "users", description = "User directory and follows"),
        (name = "tests", description = "Quizzes and quiz likes"),
        (name = "comments", description = "Threaded quiz comments"),
        (name = "posts", description = "Read-only community posts"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
