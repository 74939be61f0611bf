//! Backend entry-point: loads settings, opens the data directory and serves
//! the REST API with OpenAPI docs in debug builds.

mod server;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use quizboard::inbound::http::health::HealthState;
use quizboard::outbound::security::TokenLifetimes;
use quizboard::settings::{AppSettings, BuildMode};
use server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load()
        .map_err(|e| std::io::Error::other(format!("failed to load settings: {e}")))?;
    let secrets = settings
        .jwt_secrets(BuildMode::from_debug_assertions())
        .map_err(std::io::Error::other)?;

    let config = ServerConfig::new(settings.bind_addr(), settings.data_dir(), secrets)
        .with_client_url(settings.client_url())
        .with_lifetimes(TokenLifetimes {
            access_secs: settings.access_ttl_secs(),
            refresh_secs: settings.refresh_ttl_secs(),
        });
    info!(
        bind_addr = %config.bind_addr(),
        data_dir = %config.data_dir().display(),
        "starting server"
    );

    let health_state = web::Data::new(HealthState::new());
    create_server(health_state, config)?.await
}
