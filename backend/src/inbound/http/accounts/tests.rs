//! Handler tests for the account endpoints.

use super::*;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test};
use rstest::rstest;
use serde_json::{Value, json};

use crate::domain::Error;
use crate::domain::ports::MockAccountsCommand;
use crate::inbound::http::error::json_config;
use crate::inbound::http::test_utils::{TestPorts, profile};

async fn init(
    ports: TestPorts,
) -> impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error> {
    actix_test::init_service(
        App::new()
            .app_data(ports.into_data())
            .app_data(json_config())
            .service(
                web::scope("/api")
                    .service(register)
                    .service(login)
                    .service(refresh)
                    .service(verify_email)
                    .service(forgot_password)
                    .service(reset_password)
                    .service(current_user),
            ),
    )
    .await
}

async fn post_json(ports: TestPorts, uri: &str, body: Value) -> (StatusCode, Value) {
    let app = init(ports).await;
    let request = actix_test::TestRequest::post()
        .uri(uri)
        .set_json(body)
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    let status = response.status();
    (status, actix_test::read_body_json(response).await)
}

fn session(id: &str, name: &str) -> AuthSession {
    AuthSession {
        user: profile(id, name),
        tokens: TokenPair {
            access_token: format!("access:{id}"),
            refresh_token: format!("refresh:{id}"),
        },
    }
}

#[rstest]
#[actix_web::test]
async fn register_returns_created_session_with_flat_tokens() {
    let mut accounts = MockAccountsCommand::new();
    accounts
        .expect_register()
        .withf(|registration| {
            registration.name.as_ref() == "Ada Lovelace"
                && registration.email.as_ref() == "ada@example.com"
        })
        .times(1)
        .return_once(|_| Ok(session("u1", "Ada")));

    let (status, body) = post_json(
        TestPorts::default().with_accounts(accounts),
        "/api/auth/register",
        json!({"name": " Ada Lovelace ", "email": "Ada@Example.com", "password": "Passw0rd"}),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user"]["id"], "u1");
    assert_eq!(body["accessToken"], "access:u1");
    assert_eq!(body["refreshToken"], "refresh:u1");
    assert!(body["user"].get("password").is_none());
}

#[rstest]
#[case(json!({"name": "Ada", "email": "ada@example.com", "password": "weak"}), "password", "invalid_value")]
#[case(json!({"email": "ada@example.com", "password": "Passw0rd"}), "name", "missing_field")]
#[case(json!({"name": "Ada", "email": "not-an-email", "password": "Passw0rd"}), "email", "invalid_value")]
#[actix_web::test]
async fn register_rejects_invalid_input_before_the_port(
    #[case] payload: Value,
    #[case] field: &str,
    #[case] code: &str,
) {
    let mut accounts = MockAccountsCommand::new();
    accounts.expect_register().never();

    let (status, body) = post_json(
        TestPorts::default().with_accounts(accounts),
        "/api/auth/register",
        payload,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["details"]["field"], field);
    assert_eq!(body["details"]["code"], code);
}

#[rstest]
#[actix_web::test]
async fn duplicate_registration_is_a_conflict() {
    let mut accounts = MockAccountsCommand::new();
    accounts
        .expect_register()
        .return_once(|_| Err(Error::conflict("email already registered")));

    let (status, body) = post_json(
        TestPorts::default().with_accounts(accounts),
        "/api/auth/register",
        json!({"name": "Ada", "email": "ada@example.com", "password": "Passw0rd"}),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "conflict");
}

#[rstest]
#[actix_web::test]
async fn login_passes_normalised_credentials_and_surfaces_unauthorised() {
    let mut accounts = MockAccountsCommand::new();
    accounts
        .expect_login()
        .withf(|credentials| credentials.email() == "ada@example.com")
        .return_once(|_| Err(Error::unauthorized("invalid email or password")));

    let (status, body) = post_json(
        TestPorts::default().with_accounts(accounts),
        "/api/auth/login",
        json!({"email": " ADA@example.com", "password": "nope"}),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "invalid email or password");
}

#[rstest]
#[actix_web::test]
async fn refresh_requires_a_token() {
    let mut accounts = MockAccountsCommand::new();
    accounts.expect_refresh().never();

    let (status, body) = post_json(
        TestPorts::default().with_accounts(accounts),
        "/api/auth/refresh",
        json!({}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["field"], "refreshToken");
}

#[rstest]
#[actix_web::test]
async fn refresh_returns_a_new_pair() {
    let mut accounts = MockAccountsCommand::new();
    accounts
        .expect_refresh()
        .withf(|token| token == "refresh:u1")
        .return_once(|_| Ok(session("u1", "Ada")));

    let (status, body) = post_json(
        TestPorts::default().with_accounts(accounts),
        "/api/auth/refresh",
        json!({"refreshToken": "refresh:u1"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["accessToken"], "access:u1");
}

#[rstest]
#[actix_web::test]
async fn unknown_verification_tokens_are_invalid() {
    let mut accounts = MockAccountsCommand::new();
    accounts
        .expect_verify_email()
        .return_once(|_| Err(Error::invalid_token("invalid verification token")));

    let (status, body) = post_json(
        TestPorts::default().with_accounts(accounts),
        "/api/auth/verify-email",
        json!({"token": "nope"}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_token");
}

#[rstest]
#[actix_web::test]
async fn verify_email_returns_the_profile() {
    let mut accounts = MockAccountsCommand::new();
    accounts
        .expect_verify_email()
        .withf(|token| token == "abc")
        .return_once(|_| Ok(profile("u1", "Ada")));

    let (status, body) = post_json(
        TestPorts::default().with_accounts(accounts),
        "/api/auth/verify-email",
        json!({"token": " abc "}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], EMAIL_VERIFIED);
    assert_eq!(body["user"]["isEmailVerified"], true);
}

#[rstest]
#[actix_web::test]
async fn forgot_password_always_answers_generically() {
    let mut accounts = MockAccountsCommand::new();
    accounts
        .expect_request_password_reset()
        .times(1)
        .return_once(|_| Ok(()));

    let (status, body) = post_json(
        TestPorts::default().with_accounts(accounts),
        "/api/auth/forgot-password",
        json!({"email": "nobody@example.com"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], RESET_REQUESTED);
}

#[rstest]
#[actix_web::test]
async fn reset_password_accepts_the_new_password_alias() {
    let mut accounts = MockAccountsCommand::new();
    accounts
        .expect_confirm_password_reset()
        .withf(|token, password| token == "tok" && password.expose() == "N3wPassw0rd")
        .times(1)
        .return_once(|_, _| Ok(()));

    let (status, body) = post_json(
        TestPorts::default().with_accounts(accounts),
        "/api/auth/reset-password",
        json!({"token": "tok", "newPassword": "N3wPassw0rd"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], PASSWORD_RESET);
}

#[rstest]
#[actix_web::test]
async fn reset_password_checks_policy_before_the_token() {
    let mut accounts = MockAccountsCommand::new();
    accounts.expect_confirm_password_reset().never();

    let (status, body) = post_json(
        TestPorts::default().with_accounts(accounts),
        "/api/auth/reset-password",
        json!({"token": "tok", "password": "short"}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["field"], "password");
}

#[rstest]
#[actix_web::test]
async fn malformed_json_is_an_invalid_request() {
    let app = init(TestPorts::default()).await;
    let request = actix_test::TestRequest::post()
        .uri("/api/auth/login")
        .insert_header(("content-type", "application/json"))
        .set_payload("{")
        .to_request();

    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["code"], "invalid_request");
}

#[rstest]
#[actix_web::test]
async fn me_returns_the_authenticated_profile() {
    let app = init(TestPorts::default().signed_in_as("t1", profile("u1", "Ada"))).await;

    let authorised = actix_test::TestRequest::get()
        .uri("/api/auth/me")
        .insert_header(("Authorization", "Bearer t1"))
        .to_request();
    let response = actix_test::call_service(&app, authorised).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["name"], "Ada");

    let anonymous = actix_test::TestRequest::get().uri("/api/auth/me").to_request();
    let response = actix_test::call_service(&app, anonymous).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
