use axum::{http::StatusCode, response::IntoResponse, Json};

/// Failures of the login callback. Each one ends the flow with a redirect home.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Provider denied the authorization: {0}")]
    ProviderDenied(String),

    #[error("PKCE code verifier not found")]
    MissingVerifier,

    #[error("State parameter does not match the login request")]
    StateMismatch,

    #[error("Malformed callback request: {0}")]
    MalformedCallback(String),

    #[error("Failed to exchange code for token: {0}")]
    TokenExchange(String),
}

impl AuthError {
    /// Value of the `error` query parameter on the redirect home.
    pub fn indicator(&self) -> &str {
        match self {
            AuthError::ProviderDenied(code) => code.as_str(),
            AuthError::MissingVerifier => "missing_verifier",
            AuthError::StateMismatch => "invalid_state",
            AuthError::MalformedCallback(_) | AuthError::TokenExchange(_) => "auth_failed",
        }
    }
}

/// Failures of the JSON endpoints, rendered as `{ "error": ... }`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("No access token found")]
    Unauthorized,

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Upstream(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let body = serde_json::json!({ "error": self.to_string() });
        (self.status(), Json(body)).into_response()
    }
}
