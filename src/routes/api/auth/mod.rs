use self::auth_microsoft::microsoft_auth_router;
use crate::{models::UserInfo, server::AppContext, server::CurrentUser};
use axum::{
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use axum_extra::extract::cookie::CookieJar;

mod auth_microsoft;

pub fn auth_router() -> Router {
    Router::new()
        .route("/api/auth/me", get(me))
        .route("/logout", post(logout))
        .merge(microsoft_auth_router())
}

pub async fn me(CurrentUser { user, .. }: CurrentUser) -> Json<UserInfo> {
    Json(user)
}

pub async fn logout(Extension(ctx): Extension<AppContext>) -> impl IntoResponse {
    let store = ctx.cookies();
    let cookies = store.clear_login(store.clear_session(CookieJar::new()));

    tracing::info!("User logged out");
    (cookies, Json(serde_json::json!({ "success": true })))
}
