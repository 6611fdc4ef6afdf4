use std::sync::Arc;

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::CookieJar;
use oauth2::basic::BasicClient;

use crate::config::{Config, ConfigError};
use crate::misc::error::ApiError;
use crate::models::UserInfo;
use crate::session::{self, CookieStore};

/// Immutable per-process state shared by every handler through an `Extension` layer.
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<Config>,
    pub oauth: BasicClient,
    pub http: reqwest::Client,
}

impl AppContext {
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        let oauth = crate::oauth::build_oauth_client(&config)?;
        let http = reqwest::Client::builder()
            .timeout(config.upstream_timeout)
            // The token endpoint must never be followed through a redirect
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|err| ConfigError::Invalid {
                key: "UPSTREAM_TIMEOUT_SECS",
                reason: err.to_string(),
            })?;

        Ok(AppContext {
            config: Arc::new(config),
            oauth,
            http,
        })
    }

    pub fn cookies(&self) -> CookieStore {
        CookieStore::new(self.config.production)
    }
}

/// The bearer token of the signed-in user, read from the `access_token` cookie.
#[derive(Debug)]
pub struct AccessToken(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for AccessToken
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let cookies = CookieJar::from_headers(&parts.headers);

        match session::access_token(&cookies) {
            Some(token) => Ok(AccessToken(token.to_owned())),
            None => Err(ApiError::Unauthorized),
        }
    }
}

#[derive(Debug)]
pub struct CurrentUser {
    pub user: UserInfo,
    pub access_token: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AccessToken(access_token) = AccessToken::from_request_parts(parts, state).await?;
        let cookies = CookieJar::from_headers(&parts.headers);
        let user = session::user_info(&cookies).unwrap_or_else(UserInfo::placeholder);

        Ok(CurrentUser { user, access_token })
    }
}
