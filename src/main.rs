mod config;
mod constants;
mod graph;
mod misc;
mod models;
mod oauth;
mod pkce;
mod routes;
mod server;
mod session;

use anyhow::Context;
use dotenvy::dotenv;
use std::error::Error;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::server::AppContext;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("calendar_oauth_sample=debug,tower_http=debug")),
        )
        .init();

    // Fail before accepting any request if the credentials are incomplete
    let config = Config::from_env().context("Invalid configuration")?;
    let (host, port) = (config.host.clone(), config.port);
    let ctx = AppContext::new(config).context("Failed to create app context")?;

    let app = crate::routes::app(ctx);

    let listener = tokio::net::TcpListener::bind((host.as_str(), port))
        .await
        .context("Failed to start tcp listener")?;

    tracing::info!("Listening on: http://{host}:{port}");
    axum::serve(listener, app)
        .await
        .context("Failed to start server")?;

    Ok(())
}
