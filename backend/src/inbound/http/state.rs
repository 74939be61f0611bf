//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    AccountsCommand, Authenticator, DirectoryQuery, FollowsCommand, QuizCatalogueCommand,
    QuizCatalogueQuery, TestCommentsCommand, TestCommentsQuery,
};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub accounts: Arc<dyn AccountsCommand>,
    pub authenticator: Arc<dyn Authenticator>,
    pub directory: Arc<dyn DirectoryQuery>,
    pub follows: Arc<dyn FollowsCommand>,
    pub quizzes: Arc<dyn QuizCatalogueQuery>,
    pub quiz_commands: Arc<dyn QuizCatalogueCommand>,
    pub comments: Arc<dyn TestCommentsQuery>,
    pub comment_commands: Arc<dyn TestCommentsCommand>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: Arc<dyn AccountsCommand>,
    pub authenticator: Arc<dyn Authenticator>,
    pub directory: Arc<dyn DirectoryQuery>,
    pub follows: Arc<dyn FollowsCommand>,
    pub quizzes: Arc<dyn QuizCatalogueQuery>,
    pub quiz_commands: Arc<dyn QuizCatalogueCommand>,
    pub comments: Arc<dyn TestCommentsQuery>,
    pub comment_commands: Arc<dyn TestCommentsCommand>,
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}

impl HttpState {
    /// Construct state from a ports bundle.
    ///
    /// Services that implement several ports are shared by cloning the same
    /// `Arc` into each slot.
    ///
    /// # Examples
    /// ```no_run
    /// use std::sync::Arc;
    ///
    /// use mockable::DefaultClock;
    /// use quizboard::domain::ports::{
    ///     FixtureCollectionRepository, FixtureEmailSender, FixturePasswordHasher,
    ///     FixtureTokenService,
    /// };
    /// use quizboard::domain::{
    ///     AccountLinks, AccountService, AccountServiceDeps, Comment, DirectoryService,
    ///     FollowService, Post, PostComment, Quiz, QuizCatalogueService, TestCommentsService, User,
    /// };
    /// use quizboard::inbound::http::state::{HttpState, HttpStatePorts};
    ///
    /// let users = Arc::new(FixtureCollectionRepository::<User>::empty("users"));
    /// let clock = Arc::new(DefaultClock);
    /// let accounts = Arc::new(AccountService::new(AccountServiceDeps {
    ///     users: users.clone(),
    ///     hasher: Arc::new(FixturePasswordHasher),
    ///     tokens: Arc::new(FixtureTokenService),
    ///     mailer: Arc::new(FixtureEmailSender::default()),
    ///     clock: clock.clone(),
    ///     links: AccountLinks::new("http://localhost:3000"),
    /// }));
    /// let quizzes = Arc::new(QuizCatalogueService::new(
    ///     Arc::new(FixtureCollectionRepository::<Quiz>::empty("userTests")),
    ///     Arc::new(FixtureCollectionRepository::<Quiz>::empty("tests")),
    ///     clock.clone(),
    /// ));
    /// let comments = Arc::new(TestCommentsService::new(
    ///     Arc::new(FixtureCollectionRepository::<Comment>::empty("testComments")),
    ///     clock.clone(),
    /// ));
    /// let state = HttpState::new(HttpStatePorts {
    ///     accounts: accounts.clone(),
    ///     authenticator: accounts,
    ///     directory: Arc::new(DirectoryService::new(
    ///         users.clone(),
    ///         Arc::new(FixtureCollectionRepository::<Post>::empty("posts")),
    ///         Arc::new(FixtureCollectionRepository::<PostComment>::empty("comments")),
    ///     )),
    ///     follows: Arc::new(FollowService::new(users, clock)),
    ///     quizzes: quizzes.clone(),
    ///     quiz_commands: quizzes,
    ///     comments: comments.clone(),
    ///     comment_commands: comments,
    /// });
    /// let _directory = state.directory.clone();
    /// ```
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            accounts,
            authenticator,
            directory,
            follows,
            quizzes,
            quiz_commands,
            comments,
            comment_commands,
        } = ports;
        Self {
            accounts,
            authenticator,
            directory,
            follows,
            quizzes,
            quiz_commands,
            comments,
            comment_commands,
        }
    }
}
