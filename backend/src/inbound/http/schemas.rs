//! OpenAPI schema definitions for domain types.
//!
//! Domain types remain framework-agnostic by not deriving `ToSchema`. This
//! module provides the schema definitions required for OpenAPI documentation
//! using utoipa's external schema registration.
//!
//! The schema wrappers mirror the wire shape of their corresponding domain
//! types but live in the inbound adapter layer where framework concerns belong.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
///
/// Stable machine-readable error codes returned in API error responses.
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// No credentials were presented, or they did not match.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// The presented token is invalid, expired, or names an unknown user.
    #[schema(rename = "forbidden")]
    Forbidden,
    /// The requested resource does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// The request clashes with existing or concurrently modified data.
    #[schema(rename = "conflict")]
    Conflict,
    /// A one-time token is unknown, already used, or expired.
    #[schema(rename = "invalid_token")]
    InvalidToken,
    /// The operation is not allowed on the given target.
    #[schema(rename = "invalid_operation")]
    InvalidOperation,
    /// Storage is temporarily unavailable.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Error, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "missing required field: body")]
    message: String,
    /// Correlation identifier, also sent as the `Trace-Id` header.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Supplementary error details, such as the offending field.
    details: Option<serde_json::Value>,
}

/// OpenAPI schema for [`crate::domain::UserProfile`].
///
/// Public account view; never carries the password digest or one-time tokens.
#[derive(ToSchema)]
#[schema(as = crate::domain::UserProfile, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct UserProfileSchema {
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    id: String,
    #[schema(example = "Ada Lovelace")]
    name: String,
    #[schema(example = "ada@example.com")]
    email: String,
    avatar_url: Option<String>,
    is_email_verified: bool,
    #[schema(value_type = Option<String>, format = DateTime)]
    created_at: Option<String>,
    #[schema(value_type = Option<String>, format = DateTime)]
    last_login_at: Option<String>,
    /// Ids of users following this user.
    followers: Vec<String>,
    /// Ids of users this user follows.
    following: Vec<String>,
}

/// OpenAPI schema for [`crate::domain::TokenPair`].
#[derive(ToSchema)]
#[schema(as = crate::domain::TokenPair, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct TokenPairSchema {
    /// Short-lived HS256 bearer token.
    access_token: String,
    /// Long-lived token accepted only by `POST /api/auth/refresh`.
    refresh_token: String,
}

/// OpenAPI schema for [`crate::domain::Question`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Question, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct QuestionSchema {
    #[schema(example = "Capital of France?")]
    question: String,
    options: Vec<String>,
    /// Zero-based index into `options`. Records stored with `correctAnswer`
    /// keep that key instead.
    correct_index: u32,
}

/// OpenAPI schema for [`crate::domain::Quiz`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Quiz, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct QuizSchema {
    #[schema(example = "test_1717232400000_k3j9x2a")]
    id: String,
    owner_id: Option<String>,
    subject: String,
    questions: Vec<QuestionSchema>,
    questions_count: Option<u32>,
    respondents_count: Option<u32>,
    average_score: Option<f64>,
    average_correct: Option<f64>,
    /// Ids of users who liked the quiz.
    likes: Vec<String>,
    #[schema(value_type = Option<String>, format = DateTime)]
    created_at: Option<String>,
}

/// OpenAPI schema for [`crate::domain::Comment`].
///
/// Root comments carry `testId`; replies nest under `replies` and carry
/// `parentId`.
#[derive(ToSchema)]
#[schema(as = crate::domain::Comment, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct CommentSchema {
    #[schema(example = "tc1717232400000")]
    id: String,
    test_id: Option<String>,
    author_id: String,
    body: String,
    #[schema(value_type = String, format = DateTime)]
    created_at: String,
    #[schema(value_type = Option<String>, format = DateTime)]
    updated_at: Option<String>,
    likes: Vec<String>,
    parent_id: Option<String>,
    /// Nested replies with this same shape.
    #[schema(value_type = Vec<Object>)]
    replies: Vec<serde_json::Value>,
}

/// OpenAPI schema for [`crate::domain::Post`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Post, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct PostSchema {
    id: String,
    title: String,
    content: String,
    author_id: String,
    created_at: Option<String>,
}

/// OpenAPI schema for [`crate::domain::PostComment`].
#[derive(ToSchema)]
#[schema(as = crate::domain::PostComment, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct PostCommentSchema {
    id: String,
    post_id: String,
    author_id: String,
    body: String,
    created_at: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use utoipa::PartialSchema;

    fn schema_to_json<T: PartialSchema>() -> String {
        serde_json::to_string(&T::schema()).expect("schema serialises to JSON")
    }

    #[rstest]
    fn error_code_schema_lists_every_domain_code() {
        let schema_json = schema_to_json::<ErrorCodeSchema>();
        for code in [
            "invalid_request",
            "unauthorized",
            "forbidden",
            "not_found",
            "conflict",
            "invalid_token",
            "invalid_operation",
            "service_unavailable",
            "internal_error",
        ] {
            assert!(schema_json.contains(code), "missing {code}");
        }
    }

    #[rstest]
    fn schema_names_follow_domain_paths() {
        // utoipa replaces :: with . in schema names
        assert_eq!(ErrorSchema::name(), "crate.domain.Error");
        assert_eq!(UserProfileSchema::name(), "crate.domain.UserProfile");
        assert_eq!(QuizSchema::name(), "crate.domain.Quiz");
        assert_eq!(CommentSchema::name(), "crate.domain.Comment");
    }

    #[rstest]
    fn wire_field_names_are_camel_case() {
        let profile = schema_to_json::<UserProfileSchema>();
        assert!(profile.contains("isEmailVerified"));
        assert!(!profile.contains("password"));

        let error = schema_to_json::<ErrorSchema>();
        assert!(error.contains("traceId"));

        let comment = schema_to_json::<CommentSchema>();
        assert!(comment.contains("parentId"));
        assert!(comment.contains("replies"));
    }
}
