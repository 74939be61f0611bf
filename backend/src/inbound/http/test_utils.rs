//! Test helpers for inbound HTTP components.
//!
//! [`TestPorts`] starts with expectation-free mocks for every port, so a
//! handler test only configures the ports it exercises; any other call panics.

use std::sync::Arc;

use actix_web::web;

use crate::domain::ports::{
    MockAccountsCommand, MockAuthenticator, MockDirectoryQuery, MockFollowsCommand,
    MockQuizCatalogueCommand, MockQuizCatalogueQuery, MockTestCommentsCommand,
    MockTestCommentsQuery,
};
use crate::domain::{UserId, UserProfile};
use crate::inbound::http::state::{HttpState, HttpStatePorts};

/// Port bundle for handler tests.
pub struct TestPorts {
    ports: HttpStatePorts,
}

impl Default for TestPorts {
    fn default() -> Self {
        Self {
            ports: HttpStatePorts {
                accounts: Arc::new(MockAccountsCommand::new()),
                authenticator: Arc::new(MockAuthenticator::new()),
                directory: Arc::new(MockDirectoryQuery::new()),
                follows: Arc::new(MockFollowsCommand::new()),
                quizzes: Arc::new(MockQuizCatalogueQuery::new()),
                quiz_commands: Arc::new(MockQuizCatalogueCommand::new()),
                comments: Arc::new(MockTestCommentsQuery::new()),
                comment_commands: Arc::new(MockTestCommentsCommand::new()),
            },
        }
    }
}

impl TestPorts {
    pub fn with_accounts(mut self, accounts: MockAccountsCommand) -> Self {
        self.ports.accounts = Arc::new(accounts);
        self
    }

    pub fn with_authenticator(mut self, authenticator: MockAuthenticator) -> Self {
        self.ports.authenticator = Arc::new(authenticator);
        self
    }

    /// Authenticator accepting exactly `token` as the caller `user`.
    pub fn signed_in_as(self, token: &'static str, user: UserProfile) -> Self {
        let mut authenticator = MockAuthenticator::new();
        authenticator
            .expect_authenticate()
            .withf(move |candidate| candidate == token)
            .returning(move |_| Ok(user.clone()));
        self.with_authenticator(authenticator)
    }

    pub fn with_directory(mut self, directory: MockDirectoryQuery) -> Self {
        self.ports.directory = Arc::new(directory);
        self
    }

    pub fn with_follows(mut self, follows: MockFollowsCommand) -> Self {
        self.ports.follows = Arc::new(follows);
        self
    }

    pub fn with_quizzes(mut self, quizzes: MockQuizCatalogueQuery) -> Self {
        self.ports.quizzes = Arc::new(quizzes);
        self
    }

    pub fn with_quiz_commands(mut self, commands: MockQuizCatalogueCommand) -> Self {
        self.ports.quiz_commands = Arc::new(commands);
        self
    }

    pub fn with_comments(mut self, comments: MockTestCommentsQuery) -> Self {
        self.ports.comments = Arc::new(comments);
        self
    }

    pub fn with_comment_commands(mut self, commands: MockTestCommentsCommand) -> Self {
        self.ports.comment_commands = Arc::new(commands);
        self
    }

    pub fn into_data(self) -> web::Data<HttpState> {
        web::Data::new(HttpState::new(self.ports))
    }
}

/// Minimal verified profile.
pub fn profile(id: &str, name: &str) -> UserProfile {
    UserProfile {
        id: UserId::new(id).expect("fixture user id"),
        name: name.to_owned(),
        email: format!("{}@example.com", name.to_lowercase()),
        avatar_url: None,
        is_email_verified: true,
        created_at: None,
        last_login_at: None,
        followers: Vec::new(),
        following: Vec::new(),
    }
}
