use axum::{
    extract::{rejection::QueryRejection, Query},
    response::{IntoResponse, Response},
    routing::get,
    Extension, Router,
};
use axum_extra::extract::cookie::CookieJar;

use crate::{
    constants::LOGIN_CALLBACK_PATH,
    misc::error::AuthError,
    models::UserInfo,
    routes::found,
    server::AppContext,
    session,
};

pub fn microsoft_auth_router() -> Router {
    Router::new()
        .route("/login-start", get(login_start))
        .route(LOGIN_CALLBACK_PATH, get(login_callback))
}

async fn login_start(Extension(ctx): Extension<AppContext>) -> Response {
    let request = crate::oauth::authorization_request(&ctx.oauth, &ctx.config.scopes);
    tracing::info!("Redirecting to Microsoft login");

    // The verifier and state live only until the callback consumes them
    let cookies = ctx.cookies().start_login(CookieJar::new(), &request.flow);
    (cookies, found(request.url.as_str())).into_response()
}

#[derive(Debug, serde::Deserialize)]
struct AuthRequest {
    code: Option<String>,
    state: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

async fn login_callback(
    cookies: CookieJar,
    Extension(ctx): Extension<AppContext>,
    query: Result<Query<AuthRequest>, QueryRejection>,
) -> Response {
    let store = ctx.cookies();

    // A repeated or malformed parameter still ends with the error redirect
    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => {
            let err = AuthError::MalformedCallback(rejection.body_text());
            tracing::warn!("Rejected login callback: {err}");
            let location = ctx.config.home_url(Some(err.indicator()));
            return (store.clear_login(CookieJar::new()), found(&location)).into_response();
        }
    };

    if let Some(error) = query.error {
        tracing::warn!(
            "Microsoft auth error: {error} {}",
            query.error_description.as_deref().unwrap_or_default()
        );
        let err = AuthError::ProviderDenied(error);
        let location = ctx.config.home_url(Some(err.indicator()));
        return (store.clear_login(CookieJar::new()), found(&location)).into_response();
    }

    let Some(code) = query.code else {
        return login_start(Extension(ctx)).await;
    };

    match finish_login(&ctx, &cookies, code, query.state.as_deref()).await {
        Ok(access_token) => {
            tracing::info!("Microsoft login completed");
            let cookies = store.start_session(
                store.clear_login(CookieJar::new()),
                &access_token,
                &UserInfo::placeholder(),
            );
            (cookies, found(&ctx.config.home_url(None))).into_response()
        }
        Err(err) => {
            match &err {
                AuthError::TokenExchange(_) => tracing::error!("Token exchange error: {err}"),
                _ => tracing::warn!("Rejected login callback: {err}"),
            }
            let location = ctx.config.home_url(Some(err.indicator()));
            (store.clear_login(CookieJar::new()), found(&location)).into_response()
        }
    }
}

async fn finish_login(
    ctx: &AppContext,
    cookies: &CookieJar,
    code: String,
    state: Option<&str>,
) -> Result<String, AuthError> {
    let verifier = session::verifier(cookies).ok_or(AuthError::MissingVerifier)?;
    let expected_state = session::state(cookies).ok_or(AuthError::StateMismatch)?;

    if state != Some(expected_state) {
        return Err(AuthError::StateMismatch);
    }

    tracing::debug!(
        client_id = %ctx.config.client_id,
        redirect_uri = %ctx.config.redirect_uri(),
        code_verifier_length = verifier.len(),
        "Exchanging authorization code"
    );

    crate::oauth::exchange_code(&ctx.oauth, &ctx.http, code, verifier).await
}
