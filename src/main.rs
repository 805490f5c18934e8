mod api;
mod app;
mod auth;
mod chat;
mod config;
mod error;
mod handlers;
mod models;
mod seat;
mod tickets;
mod ui;

use tracing_subscriber::EnvFilter;

use crate::app::AppState;
use crate::config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("seatbot=info,tower_http=info")),
        )
        .init();

    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    tracing::info!("Starting server on {}", config.bind_address());

    let state = AppState::new(config.clone())?;
    tracing::info!("Using backend at {}", state.api.base_url());

    let _sweeper = state.sessions.spawn_sweeper(config.session_sweep_interval());

    let app = app::router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    tracing::info!("Server listening on http://{}", config.bind_address());

    axum::serve(listener, app).await?;

    Ok(())
}
