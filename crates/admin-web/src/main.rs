//! Admin web console for the disaster-alert service.
//!
//! Lists registered users, lets an administrator pick recipients, edit the
//! alert body and send it via HTMX + server-rendered HTML.

mod config;
mod error;
mod routes;
mod state;

use tower_http::services::ServeDir;
use tracing::info;

use crate::config::Config;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    // Load configuration
    let config = Config::from_env()?;
    info!(addr = %config.addr, api_url = %config.api_url, "Starting admin web server");

    // Build application state
    let state = AppState::from_config(&config)?;

    // Build router
    let app = routes::router()
        .nest_service("/static", ServeDir::new("static"))
        .with_state(state);

    // Start server
    info!(addr = %config.addr, "Admin web server listening");
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
