//! Account HTTP handlers.
//!
//! ```text
//! POST /api/auth/register {"name":"Ada","email":"ada@example.com","password":"Passw0rd"}
//! POST /api/auth/login {"email":"ada@example.com","password":"Passw0rd"}
//! POST /api/auth/refresh {"refreshToken":"..."}
//! POST /api/auth/verify-email {"token":"..."}
//! POST /api/auth/forgot-password {"email":"ada@example.com"}
//! POST /api/auth/reset-password {"token":"...","password":"N3wPassw0rd"}
//! GET /api/auth/me
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::accounts::RESET_REQUESTED;
use crate::domain::{
    AuthSession, AuthValidationError, LoginCredentials, NewPassword, Registration, TokenPair,
    UserProfile,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::schemas::{ErrorSchema, UserProfileSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, required_text, text_or_empty};

const EMAIL_VERIFIED: &str = "email verified";
const PASSWORD_RESET: &str = "password has been reset";

/// Sign-up request body.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[schema(example = "Ada Lovelace")]
    pub name: Option<String>,
    #[schema(example = "ada@example.com")]
    pub email: Option<String>,
    #[schema(example = "Passw0rd")]
    pub password: Option<String>,
}

/// Login request body.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Refresh request body.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: Option<String>,
}

/// Email verification request body.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerifyEmailRequest {
    pub token: Option<String>,
}

/// Password reset request body.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ForgotPasswordRequest {
    pub email: Option<String>,
}

/// Password reset confirmation body.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub token: Option<String>,
    #[serde(alias = "newPassword")]
    pub password: Option<String>,
}

/// Profile plus a fresh token pair.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthSessionResponse {
    #[schema(value_type = UserProfileSchema)]
    pub user: UserProfile,
    pub access_token: String,
    pub refresh_token: String,
}

impl From<AuthSession> for AuthSessionResponse {
    fn from(session: AuthSession) -> Self {
        let AuthSession {
            user,
            tokens:
                TokenPair {
                    access_token,
                    refresh_token,
                },
        } = session;
        Self {
            user,
            access_token,
            refresh_token,
        }
    }
}

/// Plain acknowledgement.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Acknowledgement with the affected profile.
#[derive(Debug, Serialize, ToSchema)]
pub struct VerifiedResponse {
    pub message: String,
    #[schema(value_type = UserProfileSchema)]
    pub user: UserProfile,
}

/// Create an account and sign it in.
///
/// The account starts unverified; a verification link is mailed on a best
/// effort basis.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = AuthSessionResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 409, description = "Email already registered", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "register",
    security([])
)]
#[post("/auth/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let RegisterRequest {
        name,
        email,
        password,
    } = payload.into_inner();
    let registration = Registration::try_from_parts(
        &text_or_empty(name),
        &text_or_empty(email),
        &text_or_empty(password),
    )?;
    let session = state.accounts.register(registration).await?;
    Ok(HttpResponse::Created().json(AuthSessionResponse::from(session)))
}

/// Exchange email and password for a token pair.
///
/// Unknown emails and wrong passwords are indistinguishable.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in", body = AuthSessionResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Invalid credentials", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<AuthSessionResponse>> {
    let LoginRequest { email, password } = payload.into_inner();
    let credentials =
        LoginCredentials::try_from_parts(&text_or_empty(email), &text_or_empty(password))?;
    let session = state.accounts.login(credentials).await?;
    Ok(web::Json(session.into()))
}

/// Trade a refresh token for a new token pair.
#[utoipa::path(
    post,
    path = "/api/auth/refresh",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "Tokens renewed", body = AuthSessionResponse),
        (status = 400, description = "Missing or invalid refresh token", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "refreshTokens",
    security([])
)]
#[post("/auth/refresh")]
pub async fn refresh(
    state: web::Data<HttpState>,
    payload: web::Json<RefreshRequest>,
) -> ApiResult<web::Json<AuthSessionResponse>> {
    let token = required_text(
        payload.into_inner().refresh_token,
        FieldName::new("refreshToken"),
    )?;
    let session = state.accounts.refresh(token.trim()).await?;
    Ok(web::Json(session.into()))
}

/// Confirm ownership of the account's email address.
#[utoipa::path(
    post,
    path = "/api/auth/verify-email",
    request_body = VerifyEmailRequest,
    responses(
        (status = 200, description = "Email verified", body = VerifiedResponse),
        (status = 400, description = "Missing or unknown token", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "verifyEmail",
    security([])
)]
#[post("/auth/verify-email")]
pub async fn verify_email(
    state: web::Data<HttpState>,
    payload: web::Json<VerifyEmailRequest>,
) -> ApiResult<web::Json<VerifiedResponse>> {
    let token = required_text(payload.into_inner().token, FieldName::new("token"))?;
    let user = state.accounts.verify_email(token.trim()).await?;
    Ok(web::Json(VerifiedResponse {
        message: EMAIL_VERIFIED.to_owned(),
        user,
    }))
}

/// Start a password reset.
///
/// The response is identical whether or not the email is registered.
#[utoipa::path(
    post,
    path = "/api/auth/forgot-password",
    request_body = ForgotPasswordRequest,
    responses(
        (status = 200, description = "Request accepted", body = MessageResponse),
        (status = 400, description = "Missing email", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "requestPasswordReset",
    security([])
)]
#[post("/auth/forgot-password")]
pub async fn forgot_password(
    state: web::Data<HttpState>,
    payload: web::Json<ForgotPasswordRequest>,
) -> ApiResult<web::Json<MessageResponse>> {
    let email = required_text(payload.into_inner().email, FieldName::new("email"))?;
    state.accounts.request_password_reset(&email).await?;
    Ok(web::Json(MessageResponse::new(RESET_REQUESTED)))
}

/// Finish a password reset with the emailed token.
#[utoipa::path(
    post,
    path = "/api/auth/reset-password",
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password replaced", body = MessageResponse),
        (status = 400, description = "Weak password or invalid token", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "confirmPasswordReset",
    security([])
)]
#[post("/auth/reset-password")]
pub async fn reset_password(
    state: web::Data<HttpState>,
    payload: web::Json<ResetPasswordRequest>,
) -> ApiResult<web::Json<MessageResponse>> {
    let ResetPasswordRequest { token, password } = payload.into_inner();
    let token = required_text(token, FieldName::new("token"))?;
    let password = required_text(password, FieldName::new("password"))?;
    let password = NewPassword::new(&password).map_err(AuthValidationError::from)?;
    state
        .accounts
        .confirm_password_reset(token.trim(), password)
        .await?;
    Ok(web::Json(MessageResponse::new(PASSWORD_RESET)))
}

/// Profile of the signed-in user.
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current user", body = UserProfileSchema),
        (status = 401, description = "No access token", body = ErrorSchema),
        (status = 403, description = "Invalid or expired token", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "currentUser"
)]
#[get("/auth/me")]
pub async fn current_user(user: AuthenticatedUser) -> ApiResult<web::Json<UserProfile>> {
    Ok(web::Json(user.into_profile()))
}

#[cfg(test)]
mod tests;
