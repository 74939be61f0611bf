//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::ServerConfig;

use state_builders::build_http_state;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use quizboard::Trace;
#[cfg(debug_assertions)]
use quizboard::doc::ApiDoc;
use quizboard::inbound::http::accounts::{
    current_user, forgot_password, login, refresh, register, reset_password, verify_email,
};
use quizboard::inbound::http::comments::{
    add_comment, delete_comment, edit_comment, list_comments, toggle_comment_like,
};
use quizboard::inbound::http::error::{json_config, path_config, query_config};
use quizboard::inbound::http::health::{HealthState, live, ready};
use quizboard::inbound::http::posts::{list_post_comments, list_posts};
use quizboard::inbound::http::quizzes::{
    create_user_test, delete_user_test, list_tests, list_user_tests, toggle_test_like,
};
use quizboard::inbound::http::state::HttpState;
use quizboard::inbound::http::users::{follow_user, get_user, list_users, unfollow_user};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

/// Mount every REST handler under `/api`.
fn api_scope() -> actix_web::Scope {
    web::scope("/api")
        .service(register)
        .service(login)
        .service(refresh)
        .service(verify_email)
        .service(forgot_password)
        .service(reset_password)
        .service(current_user)
        .service(list_users)
        .service(get_user)
        .service(follow_user)
        .service(unfollow_user)
        .service(list_tests)
        .service(list_user_tests)
        .service(create_user_test)
        .service(delete_user_test)
        .service(toggle_test_like)
        .service(list_comments)
        .service(add_comment)
        .service(edit_comment)
        .service(delete_comment)
        .service(toggle_comment_like)
        .service(list_posts)
        .service(list_post_comments)
}

pub(crate) fn build_app(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .app_data(json_config())
        .app_data(path_config())
        .app_data(query_config())
        .wrap(Trace)
        .service(api_scope())
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
    #[cfg(not(debug_assertions))]
    let app = app;

    app
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// # Parameters
/// - `health_state`: shared readiness state updated once the server is initialised.
/// - `config`: pre-built [`ServerConfig`] with the bind address, data directory and
///   signing secrets.
///
/// # Returns
/// A spawned [`Server`] that must be awaited to drive the listener.
///
/// # Errors
/// Propagates [`std::io::Error`] when the data directory cannot be opened or the
/// socket cannot be bound.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = build_http_state(&config).map_err(std::io::Error::other)?;

    let server = HttpServer::new(move || {
        build_app(server_health_state.clone(), http_state.clone())
    })
    .bind(config.bind_addr())?
    .run();

    health_state.mark_ready();
    Ok(server)
}
