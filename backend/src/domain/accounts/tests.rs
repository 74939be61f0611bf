//! Tests for the account lifecycle service.

use super::*;
use crate::domain::ErrorCode;
use crate::domain::ports::{
    EmailSenderError, FixtureCollectionRepository, FixtureEmailSender, FixturePasswordHasher,
    FixtureTokenService, MockEmailSender, MockPasswordHasher,
};
use crate::test_support::MutableClock;
use rstest::{fixture, rstest};

type Users = FixtureCollectionRepository<User>;

struct Harness {
    users: Arc<Users>,
    mailer: Arc<FixtureEmailSender>,
    clock: Arc<MutableClock>,
    service: AccountService<Users>,
}

fn build(
    mailer: Arc<dyn EmailSender>,
    users: Arc<Users>,
    clock: Arc<MutableClock>,
) -> AccountService<Users> {
    AccountService::new(AccountServiceDeps {
        users,
        hasher: Arc::new(FixturePasswordHasher),
        tokens: Arc::new(FixtureTokenService),
        mailer,
        clock,
        links: AccountLinks::new("https://quiz.example/"),
    })
}

#[fixture]
fn harness() -> Harness {
    let users = Arc::new(Users::empty("users"));
    let mailer = Arc::new(FixtureEmailSender::default());
    let clock = MutableClock::shared();
    let service = build(mailer.clone(), Arc::clone(&users), Arc::clone(&clock));
    Harness {
        users,
        mailer,
        clock,
        service,
    }
}

fn registration(email: &str) -> Registration {
    Registration::try_from_parts("Ada Lovelace", email, "Passw0rd").expect("valid registration")
}

fn login(email: &str, password: &str) -> LoginCredentials {
    LoginCredentials::try_from_parts(email, password).expect("credentials shape")
}

fn token_from(link: &str) -> String {
    link.split("token=").nth(1).expect("link carries token").to_owned()
}

impl Harness {
    async fn stored(&self, id: &UserId) -> User {
        self.users
            .snapshot()
            .await
            .into_iter()
            .find(|user| &user.id == id)
            .expect("user persisted")
    }
}

#[rstest]
#[tokio::test]
async fn register_creates_unverified_account_and_signs_in(harness: Harness) {
    let session = harness
        .service
        .register(registration("Ada@Example.com"))
        .await
        .expect("registered");

    assert!(!session.user.is_email_verified);
    assert_eq!(session.user.email, "ada@example.com");
    assert_eq!(
        harness.service.tokens.verify_access(&session.tokens.access_token),
        Some(session.user.id.clone())
    );

    let stored = harness.stored(&session.user.id).await;
    assert_ne!(stored.password_hash, "Passw0rd");
    assert!(stored.email_verification_token.is_some());
}

#[rstest]
#[tokio::test]
async fn register_sends_verification_link(harness: Harness) {
    let session = harness
        .service
        .register(registration("ada@example.com"))
        .await
        .expect("registered");

    let sent = harness.mailer.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].kind, EmailKind::Verification);
    assert_eq!(sent[0].recipient, "ada@example.com");
    assert!(sent[0].link.starts_with("https://quiz.example/verify-email?token="));
    let stored = harness.stored(&session.user.id).await;
    assert_eq!(
        stored.email_verification_token,
        Some(token_from(&sent[0].link))
    );
}

#[rstest]
#[tokio::test]
async fn duplicate_email_conflicts_case_insensitively(harness: Harness) {
    harness
        .service
        .register(registration("ada@example.com"))
        .await
        .expect("first registration");

    let err = harness
        .service
        .register(registration("ADA@example.COM"))
        .await
        .expect_err("duplicate");
    assert_eq!(err.code(), ErrorCode::Conflict);
    assert_eq!(harness.users.snapshot().await.len(), 1);
}

#[rstest]
#[tokio::test]
async fn mail_failure_does_not_fail_registration() {
    let mut mailer = MockEmailSender::new();
    mailer
        .expect_send()
        .times(1)
        .returning(|message| {
            Err(EmailSenderError::delivery(
                message.recipient.clone(),
                "smtp down",
            ))
        });
    let users = Arc::new(Users::empty("users"));
    let service = build(Arc::new(mailer), Arc::clone(&users), MutableClock::shared());

    let session = service
        .register(registration("ada@example.com"))
        .await
        .expect("registration survives mail failure");
    assert_eq!(users.snapshot().await.len(), 1);
    assert!(!session.user.is_email_verified);
}

#[rstest]
#[tokio::test]
async fn login_stamps_last_login(harness: Harness) {
    let registered = harness
        .service
        .register(registration("ada@example.com"))
        .await
        .expect("registered");
    harness.clock.advance_seconds(120);

    let session = harness
        .service
        .login(login(" ADA@example.com ", "Passw0rd"))
        .await
        .expect("login");

    assert_eq!(session.user.id, registered.user.id);
    assert_eq!(
        session.user.last_login_at,
        Some(Timestamp::from(harness.clock.utc()))
    );
}

#[rstest]
#[tokio::test]
async fn wrong_password_and_unknown_email_fail_identically(harness: Harness) {
    harness
        .service
        .register(registration("ada@example.com"))
        .await
        .expect("registered");

    let wrong_password = harness
        .service
        .login(login("ada@example.com", "Wr0ngPass"))
        .await
        .expect_err("wrong password");
    let unknown_email = harness
        .service
        .login(login("nobody@example.com", "Passw0rd"))
        .await
        .expect_err("unknown email");

    assert_eq!(wrong_password.code(), ErrorCode::Unauthorized);
    assert_eq!(unknown_email.code(), ErrorCode::Unauthorized);
    assert_eq!(wrong_password.message(), unknown_email.message());
}

#[rstest]
#[tokio::test]
async fn seed_user_without_password_cannot_log_in() {
    let seed: User = serde_json::from_value(serde_json::json!({
        "id": "1", "name": "Seed", "email": "seed@example.com"
    }))
    .expect("seed user");
    let users = Arc::new(Users::new("users", vec![seed]));
    let service = build(
        Arc::new(FixtureEmailSender::default()),
        users,
        MutableClock::shared(),
    );

    let err = service
        .login(login("seed@example.com", "Passw0rd"))
        .await
        .expect_err("seed user has no stored digest");
    assert_eq!(err.code(), ErrorCode::Unauthorized);
}

#[rstest]
#[tokio::test]
async fn refresh_issues_new_pair_for_existing_user(harness: Harness) {
    let registered = harness
        .service
        .register(registration("ada@example.com"))
        .await
        .expect("registered");

    let refreshed = harness
        .service
        .refresh(&registered.tokens.refresh_token)
        .await
        .expect("refreshed");
    assert_eq!(refreshed.user.id, registered.user.id);

    let err = harness
        .service
        .refresh(&registered.tokens.access_token)
        .await
        .expect_err("access token is not a refresh token");
    assert_eq!(err.code(), ErrorCode::InvalidToken);
}

#[rstest]
#[tokio::test]
async fn verify_email_marks_verified_and_clears_token(harness: Harness) {
    harness
        .service
        .register(registration("ada@example.com"))
        .await
        .expect("registered");
    let token = token_from(&harness.mailer.sent()[0].link);

    let profile = harness.service.verify_email(&token).await.expect("verified");

    assert!(profile.is_email_verified);
    let stored = harness.stored(&profile.id).await;
    assert!(stored.email_verification_token.is_none());
    assert_eq!(harness.mailer.sent()[1].kind, EmailKind::Welcome);

    let err = harness
        .service
        .verify_email(&token)
        .await
        .expect_err("token is single use");
    assert_eq!(err.code(), ErrorCode::InvalidToken);
}

#[rstest]
#[case("")]
#[case("not-a-token")]
#[tokio::test]
async fn unknown_verification_tokens_are_rejected(harness: Harness, #[case] token: &str) {
    let err = harness.service.verify_email(token).await.expect_err("invalid");
    assert_eq!(err.code(), ErrorCode::InvalidToken);
}

#[rstest]
#[case("nobody@example.com")]
#[case("not an email")]
#[tokio::test]
async fn reset_request_for_unknown_email_is_silent(harness: Harness, #[case] email: &str) {
    harness
        .service
        .request_password_reset(email)
        .await
        .expect("same outcome as a known email");
    assert!(harness.mailer.sent().is_empty());
}

#[rstest]
#[tokio::test]
async fn reset_flow_replaces_password(harness: Harness) {
    let registered = harness
        .service
        .register(registration("ada@example.com"))
        .await
        .expect("registered");
    harness
        .service
        .request_password_reset("Ada@Example.com")
        .await
        .expect("requested");
    let reset = harness.mailer.sent().pop().expect("reset email");
    assert_eq!(reset.kind, EmailKind::PasswordReset);
    let token = token_from(&reset.link);

    harness
        .service
        .confirm_password_reset(&token, NewPassword::new("N3wPassword").expect("strong"))
        .await
        .expect("reset");

    let stored = harness.stored(&registered.user.id).await;
    assert!(stored.reset_password_token.is_none());
    assert!(stored.reset_password_expires.is_none());
    harness
        .service
        .login(login("ada@example.com", "N3wPassword"))
        .await
        .expect("new password works");
    let old = harness
        .service
        .login(login("ada@example.com", "Passw0rd"))
        .await
        .expect_err("old password rejected");
    assert_eq!(old.code(), ErrorCode::Unauthorized);
}

#[rstest]
#[case(3_599, true)]
#[case(3_600, false)]
#[case(7_200, false)]
#[tokio::test]
async fn reset_token_expires_after_one_hour(
    harness: Harness,
    #[case] elapsed_secs: i64,
    #[case] accepted: bool,
) {
    harness
        .service
        .register(registration("ada@example.com"))
        .await
        .expect("registered");
    harness
        .service
        .request_password_reset("ada@example.com")
        .await
        .expect("requested");
    let token = token_from(&harness.mailer.sent().pop().expect("reset email").link);
    harness.clock.advance_seconds(elapsed_secs);

    let result = harness
        .service
        .confirm_password_reset(&token, NewPassword::new("N3wPassword").expect("strong"))
        .await;

    match (accepted, result) {
        (true, Ok(())) => {}
        (false, Err(err)) => assert_eq!(err.code(), ErrorCode::InvalidToken),
        (expected, other) => panic!("expected accepted={expected}, got {other:?}"),
    }
}

#[rstest]
#[tokio::test]
async fn authenticate_resolves_access_tokens(harness: Harness) {
    let session = harness
        .service
        .register(registration("ada@example.com"))
        .await
        .expect("registered");

    let profile = harness
        .service
        .authenticate(&session.tokens.access_token)
        .await
        .expect("authenticated");
    assert_eq!(profile.id, session.user.id);

    let forged = harness
        .service
        .authenticate("access:someone-else")
        .await
        .expect_err("unknown subject");
    assert_eq!(forged.code(), ErrorCode::Forbidden);
    let garbage = harness
        .service
        .authenticate("garbage")
        .await
        .expect_err("invalid token");
    assert_eq!(garbage.code(), ErrorCode::Forbidden);
}

#[rstest]
fn links_trim_trailing_slash() {
    let links = AccountLinks::new("http://localhost:3000/");
    assert_eq!(
        links.verification("abc"),
        "http://localhost:3000/verify-email?token=abc"
    );
    assert_eq!(
        links.password_reset("abc"),
        "http://localhost:3000/reset-password?token=abc"
    );
    assert_eq!(links.home(), "http://localhost:3000");
}

#[rstest]
#[tokio::test]
async fn unknown_email_still_costs_one_verification() {
    let mut hasher = MockPasswordHasher::new();
    hasher
        .expect_hash()
        .times(1)
        .returning(|_| Ok("dummy-digest".to_owned()));
    hasher
        .expect_verify()
        .withf(|password, digest| password == "Passw0rd" && digest == "dummy-digest")
        .times(2)
        .returning(|_, _| Ok(true));
    let service = AccountService::new(AccountServiceDeps {
        users: Arc::new(Users::empty("users")),
        hasher: Arc::new(hasher),
        tokens: Arc::new(FixtureTokenService),
        mailer: Arc::new(FixtureEmailSender::default()),
        clock: MutableClock::shared(),
        links: AccountLinks::new("https://quiz.example/"),
    });

    for _ in 0..2 {
        let err = service
            .login(login("nobody@example.com", "Passw0rd"))
            .await
            .expect_err("no such account");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
        assert_eq!(err.message(), INVALID_CREDENTIALS);
    }
}
