//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use quizboard::outbound::security::TokenLifetimes;
use quizboard::settings::JwtSecrets;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) data_dir: PathBuf,
    pub(crate) client_url: String,
    pub(crate) secrets: JwtSecrets,
    pub(crate) lifetimes: TokenLifetimes,
}

impl ServerConfig {
    /// Construct a server configuration from validated settings.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, data_dir: PathBuf, secrets: JwtSecrets) -> Self {
        Self {
            bind_addr,
            data_dir,
            client_url: "http://localhost:3000".to_owned(),
            secrets,
            lifetimes: TokenLifetimes {
                access_secs: 60 * 60,
                refresh_secs: 7 * 24 * 60 * 60,
            },
        }
    }

    /// Front-end base URL used in account email links.
    #[must_use]
    pub fn with_client_url(mut self, client_url: impl Into<String>) -> Self {
        self.client_url = client_url.into();
        self
    }

    #[must_use]
    pub fn with_lifetimes(mut self, lifetimes: TokenLifetimes) -> Self {
        self.lifetimes = lifetimes;
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
