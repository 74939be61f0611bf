//! Bearer-token authentication for HTTP handlers.
//!
//! Handlers that need a caller take [`AuthenticatedUser`] as an argument; the
//! extractor reads `Authorization: Bearer <token>` and resolves it through the
//! [`Authenticator`](crate::domain::ports::Authenticator) port held in
//! [`HttpState`].

use std::ops::Deref;

use actix_web::http::header::{self, HeaderMap};
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::LocalBoxFuture;

use crate::domain::{Error, UserId, UserProfile};
use crate::inbound::http::state::HttpState;

const BEARER_PREFIX: &str = "Bearer ";

/// Profile of the caller identified by the request's access token.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(UserProfile);

impl AuthenticatedUser {
    pub fn id(&self) -> &UserId {
        &self.0.id
    }

    pub fn into_profile(self) -> UserProfile {
        self.0
    }
}

impl Deref for AuthenticatedUser {
    type Target = UserProfile;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Extract the bearer token, or `401 Unauthorized` when none is presented.
pub(crate) fn bearer_token(headers: &HeaderMap) -> Result<String, Error> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix(BEARER_PREFIX))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_owned)
        .ok_or_else(|| Error::unauthorized("access token required"))
}

impl FromRequest for AuthenticatedUser {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let token = bearer_token(req.headers());
        let state = req.app_data::<web::Data<HttpState>>().cloned();
        Box::pin(async move {
            let token = token?;
            let state = state
                .ok_or_else(|| Error::internal("HTTP state is not configured"))?;
            let profile = state.authenticator.authenticate(&token).await?;
            Ok(Self(profile))
        })
    }
}
