//! REST API over the device registry.
//!
//! Routes:
//! - `GET /devices?location=` list, optionally filtered by location
//! - `POST /devices` add a device
//! - `PUT /devices/{name}` replace a device
//! - `DELETE /devices/{name}` remove a device
//! - `DELETE /devices` clear the registry
//! - `GET /stats` usage statistics
//! - `GET /leaderboard` devices ranked by consumption

mod handlers;
mod types;

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, put};
use tracing::info;

use crate::registry::Registry;

pub use types::{ApiError, ErrorResponse, LeaderboardRow};

/// State shared across all request handlers.
pub struct AppState {
    pub registry: Arc<Registry>,
    /// Rate used for the monthly cost estimate.
    pub rate_per_kwh: f64,
}

/// Builds the axum router with all API routes.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/devices",
            get(handlers::list_devices)
                .post(handlers::add_device)
                .delete(handlers::clear_devices),
        )
        .route(
            "/devices/{name}",
            put(handlers::replace_device).delete(handlers::remove_device),
        )
        .route("/stats", get(handlers::get_stats))
        .route("/leaderboard", get(handlers::get_leaderboard))
        .with_state(state)
}

/// Binds to the given address and serves the API until the process stops.
///
/// # Errors
///
/// Returns an `io::Error` if the listener cannot bind or the server fails.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "API server listening");
    axum::serve(listener, app).await
}
