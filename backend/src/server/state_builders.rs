//! Builders wiring JSON collections and credential adapters into HTTP state.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};

use quizboard::domain::{
    AccountLinks, AccountService, AccountServiceDeps, Comment, DirectoryService, FollowService,
    Post, PostComment, Quiz, QuizCatalogueService, TestCommentsService, User,
};
use quizboard::inbound::http::state::{HttpState, HttpStatePorts};
use quizboard::outbound::email::LoggingEmailSender;
use quizboard::outbound::persistence::{Collection, JsonFileStore, StoreOpenError};
use quizboard::outbound::security::{Argon2PasswordHasher, JwtTokenService};

use super::ServerConfig;

/// Open the data directory and build every service over it.
///
/// Services that back more than one port are shared through a single `Arc`.
pub(super) fn build_http_state(
    config: &ServerConfig,
) -> Result<web::Data<HttpState>, StoreOpenError> {
    let store = JsonFileStore::open(config.data_dir())?;
    Ok(web::Data::new(build_state_over(&store, config)))
}

fn build_state_over(store: &JsonFileStore, config: &ServerConfig) -> HttpState {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let users = Arc::new(store.collection::<User>(Collection::Users));

    let tokens = Arc::new(JwtTokenService::new(
        config.secrets.access.as_bytes(),
        config.secrets.refresh.as_bytes(),
        config.lifetimes,
        clock.clone(),
    ));
    let accounts = Arc::new(AccountService::new(AccountServiceDeps {
        users: users.clone(),
        hasher: Arc::new(Argon2PasswordHasher::new()),
        tokens,
        mailer: Arc::new(LoggingEmailSender),
        clock: clock.clone(),
        links: AccountLinks::new(config.client_url.clone()),
    }));
    let directory = Arc::new(DirectoryService::new(
        users.clone(),
        Arc::new(store.collection::<Post>(Collection::Posts)),
        Arc::new(store.collection::<PostComment>(Collection::Comments)),
    ));
    let quizzes = Arc::new(QuizCatalogueService::new(
        Arc::new(store.collection::<Quiz>(Collection::UserTests)),
        Arc::new(store.collection::<Quiz>(Collection::Tests)),
        clock.clone(),
    ));
    let comments = Arc::new(TestCommentsService::new(
        Arc::new(store.collection::<Comment>(Collection::TestComments)),
        clock.clone(),
    ));

    HttpState::new(HttpStatePorts {
        accounts: accounts.clone(),
        authenticator: accounts,
        directory,
        follows: Arc::new(FollowService::new(users, clock)),
        quizzes: quizzes.clone(),
        quiz_commands: quizzes,
        comments: comments.clone(),
        comment_commands: comments,
    })
}
