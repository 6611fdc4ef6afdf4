mod auth;
mod calendar;
mod debug;

use axum::Router;

use crate::config::Config;

pub use calendar::AvailabilityParams;

pub fn api_router(config: &Config) -> Router {
    let router = Router::new()
        .merge(auth::auth_router())
        .merge(calendar::calendar_router());

    if config.production {
        router
    } else {
        router.merge(debug::debug_router())
    }
}
