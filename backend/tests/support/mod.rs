//! Shared harness: real services over a temporary data directory.
//!
//! Password hashing uses minimal Argon2 costs and account mail is captured so
//! flows can follow verification and reset links.

use std::path::Path;
use std::sync::Arc;

use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use mockable::{Clock, DefaultClock};
use quizboard::Trace;
use quizboard::domain::ports::{EmailKind, FixtureEmailSender};
use quizboard::domain::{
    AccountLinks, AccountService, AccountServiceDeps, Comment, DirectoryService, FollowService,
    Post, PostComment, Quiz, QuizCatalogueService, TestCommentsService, User,
};
use quizboard::inbound::http::error::{json_config, path_config, query_config};
use quizboard::inbound::http::state::{HttpState, HttpStatePorts};
use quizboard::inbound::http::{accounts, comments, posts, quizzes, users};
use quizboard::outbound::persistence::{Collection, JsonFileStore};
use quizboard::outbound::security::{Argon2PasswordHasher, JwtTokenService, TokenLifetimes};
use serde_json::Value;
use tempfile::TempDir;

pub const CLIENT_URL: &str = "http://client.test";

/// A data directory plus the state built over it.
pub struct Harness {
    pub dir: TempDir,
    pub mail: Arc<FixtureEmailSender>,
    pub state: web::Data<HttpState>,
}

impl Harness {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let mail = Arc::new(FixtureEmailSender::default());
        let state = build_state(dir.path(), mail.clone());
        Self { dir, mail, state }
    }

    /// Write a raw collection file before the first request.
    pub fn seed(&self, file_name: &str, contents: &Value) {
        let bytes = serde_json::to_vec_pretty(contents).expect("serialise seed");
        std::fs::write(self.dir.path().join(file_name), bytes).expect("write seed");
    }

    pub fn read(&self, file_name: &str) -> Value {
        let bytes = std::fs::read(self.dir.path().join(file_name)).expect("read collection");
        serde_json::from_slice(&bytes).expect("collection is JSON")
    }

    /// Token embedded in the most recent email of `kind`.
    pub fn last_token(&self, kind: EmailKind) -> String {
        let message = self
            .mail
            .sent()
            .into_iter()
            .rev()
            .find(|message| message.kind == kind)
            .expect("email of requested kind");
        message
            .link
            .split_once("token=")
            .map(|(_, token)| token.to_owned())
            .expect("link carries a token")
    }

    pub async fn app(
        &self,
    ) -> impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>
    {
        actix_test::init_service(
            App::new()
                .app_data(self.state.clone())
                .app_data(json_config())
                .app_data(path_config())
                .app_data(query_config())
                .wrap(Trace)
                .service(
                    web::scope("/api")
                        .service(accounts::register)
                        .service(accounts::login)
                        .service(accounts::refresh)
                        .service(accounts::verify_email)
                        .service(accounts::forgot_password)
                        .service(accounts::reset_password)
                        .service(accounts::current_user)
                        .service(users::list_users)
                        .service(users::get_user)
                        .service(users::follow_user)
                        .service(users::unfollow_user)
                        .service(quizzes::list_tests)
                        .service(quizzes::list_user_tests)
                        .service(quizzes::create_user_test)
                        .service(quizzes::delete_user_test)
                        .service(quizzes::toggle_test_like)
                        .service(comments::list_comments)
                        .service(comments::add_comment)
                        .service(comments::edit_comment)
                        .service(comments::delete_comment)
                        .service(comments::toggle_comment_like)
                        .service(posts::list_posts)
                        .service(posts::list_post_comments),
                ),
        )
        .await
    }
}

fn build_state(root: &Path, mail: Arc<FixtureEmailSender>) -> web::Data<HttpState> {
    let store = JsonFileStore::open(root).expect("open store");
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let users = Arc::new(store.collection::<User>(Collection::Users));
    let hasher = Argon2PasswordHasher::with_params(8, 1, 1).expect("argon2 params");
    let tokens = JwtTokenService::new(
        b"integration-access-secret-0123456789",
        b"integration-refresh-secret-0123456789",
        TokenLifetimes {
            access_secs: 600,
            refresh_secs: 3_600,
        },
        clock.clone(),
    );
    let accounts = Arc::new(AccountService::new(AccountServiceDeps {
        users: users.clone(),
        hasher: Arc::new(hasher),
        tokens: Arc::new(tokens),
        mailer: mail,
        clock: clock.clone(),
        links: AccountLinks::new(CLIENT_URL),
    }));
    let quizzes = Arc::new(QuizCatalogueService::new(
        Arc::new(store.collection::<Quiz>(Collection::UserTests)),
        Arc::new(store.collection::<Quiz>(Collection::Tests)),
        clock.clone(),
    ));
    let comments = Arc::new(TestCommentsService::new(
        Arc::new(store.collection::<Comment>(Collection::TestComments)),
        clock.clone(),
    ));
    web::Data::new(HttpState::new(HttpStatePorts {
        accounts: accounts.clone(),
        authenticator: accounts,
        directory: Arc::new(DirectoryService::new(
            users.clone(),
            Arc::new(store.collection::<Post>(Collection::Posts)),
            Arc::new(store.collection::<PostComment>(Collection::Comments)),
        )),
        follows: Arc::new(FollowService::new(users, clock)),
        quizzes: quizzes.clone(),
        quiz_commands: quizzes,
        comments: comments.clone(),
        comment_commands: comments,
    }))
}

/// Send a JSON request, optionally authenticated, and decode the reply.
pub async fn call<S>(
    app: &S,
    request: actix_test::TestRequest,
    token: Option<&str>,
) -> (StatusCode, Value)
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let request = match token {
        Some(token) => request.insert_header(("Authorization", format!("Bearer {token}"))),
        None => request,
    };
    let response = actix_test::call_service(app, request.to_request()).await;
    let status = response.status();
    let body = actix_test::read_body(response).await;
    let value = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).expect("JSON body")
    };
    (status, value)
}

/// Register a user and return `(id, access token)`.
pub async fn register<S>(app: &S, name: &str, email: &str) -> (String, String)
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let (status, body) = call(
        app,
        actix_test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(serde_json::json!({"name": name, "email": email, "password": "Passw0rd"})),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register {email}: {body}");
    let id = body["user"]["id"].as_str().expect("user id").to_owned();
    let token = body["accessToken"].as_str().expect("access token").to_owned();
    (id, token)
}
