mod api;
mod pages;

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Extension, Router,
};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::server::AppContext;

pub fn app(ctx: AppContext) -> Router {
    Router::new()
        .merge(api::api_router(&ctx.config))
        .merge(pages::pages_router())
        .merge(public_dir())
        .layer(Extension(ctx))
        .layer(TraceLayer::new_for_http())
}

fn public_dir() -> Router {
    Router::new().nest_service("/public", ServeDir::new("public"))
}

/// A `302 Found` redirect, which is what browsers expect after an OAuth round trip.
pub(crate) fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_owned())]).into_response()
}
