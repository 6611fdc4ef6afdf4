use axum::{routing::get, Extension, Json, Router};
use serde_json::{json, Value};

use crate::server::AppContext;

/// Only mounted outside production.
pub fn debug_router() -> Router {
    Router::new()
        .route("/debug/auth", get(auth_debug))
        .route("/debug/env", get(env_debug))
}

fn is_set(value: &str) -> &'static str {
    if value.is_empty() {
        "Not Set"
    } else {
        "Set"
    }
}

fn app_env(ctx: &AppContext) -> &'static str {
    if ctx.config.production {
        "production"
    } else {
        "development"
    }
}

async fn env_debug(Extension(ctx): Extension<AppContext>) -> Json<Value> {
    let config = &ctx.config;

    Json(json!({
        "message": "Environment Variables Check",
        "environment": {
            "AZURE_CLIENT_ID": is_set(&config.client_id),
            "AZURE_CLIENT_SECRET": is_set(&config.client_secret),
            "BASE_URL": is_set(&config.base_url),
            "APP_ENV": app_env(&ctx),
        },
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

// Secrets are reported as set or not set, never echoed
async fn auth_debug(Extension(ctx): Extension<AppContext>) -> Json<Value> {
    let config = &ctx.config;

    Json(json!({
        "message": "Authentication Debug Info",
        "environment": {
            "AZURE_CLIENT_ID": is_set(&config.client_id),
            "AZURE_CLIENT_SECRET": is_set(&config.client_secret),
            "BASE_URL": config.base_url,
            "APP_ENV": app_env(&ctx),
        },
        "authorizeEndpoint": config.authorize_endpoint(),
        "redirectUri": config.redirect_uri(),
        "scopes": config.scopes,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
