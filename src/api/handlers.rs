//! Request handlers for the API endpoints.
//!
//! Registry mutations write the store synchronously, so they run on the
//! blocking pool.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use super::AppState;
use super::types::{ApiError, DeviceQuery, LeaderboardRow};
use crate::devices::{Device, DeviceDraft};
use crate::registry::{Registry, RegistryError};
use crate::stats::{UsageStats, leaderboard};

async fn blocking<T, F>(state: &AppState, op: F) -> Result<T, ApiError>
where
    F: FnOnce(&Registry) -> Result<T, RegistryError> + Send + 'static,
    T: Send + 'static,
{
    let registry = Arc::clone(&state.registry);
    tokio::task::spawn_blocking(move || op(&registry))
        .await
        .map_err(|e| ApiError::Internal(format!("registry task failed: {e}")))?
        .map_err(ApiError::from)
}

/// `GET /devices` → 200 + devices ordered by name
/// `GET /devices?location=kit` → devices whose location contains "kit"
pub async fn list_devices(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DeviceQuery>,
) -> Json<Vec<Device>> {
    Json(state.registry.list(query.location.as_deref()))
}

/// `POST /devices` → 201 + stored device
pub async fn add_device(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<DeviceDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<Device>), ApiError> {
    let Json(draft) = payload?;
    let device = blocking(&state, move |r| r.add(draft)).await?;
    Ok((StatusCode::CREATED, Json(device)))
}

/// `PUT /devices/{name}` → 200 + replacement device
///
/// The body's `name` must match the path.
pub async fn replace_device(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    payload: Result<Json<DeviceDraft>, JsonRejection>,
) -> Result<Json<Device>, ApiError> {
    let Json(draft) = payload?;
    if draft.name != name {
        return Err(ApiError::BadRequest(format!(
            "body name \"{}\" does not match path \"{name}\"",
            draft.name
        )));
    }
    let device = blocking(&state, move |r| r.replace(draft)).await?;
    Ok(Json(device))
}

/// `DELETE /devices/{name}` → 204
pub async fn remove_device(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<StatusCode, ApiError> {
    blocking(&state, move |r| r.remove(&name)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /devices` → 204
pub async fn clear_devices(State(state): State<Arc<AppState>>) -> Result<StatusCode, ApiError> {
    blocking(&state, Registry::clear).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /stats` → 200 + `UsageStats`
pub async fn get_stats(State(state): State<Arc<AppState>>) -> Json<UsageStats> {
    let devices = state.registry.snapshot();
    Json(UsageStats::from_devices(&devices, state.rate_per_kwh))
}

/// `GET /leaderboard` → 200 + ranked rows
pub async fn get_leaderboard(State(state): State<Arc<AppState>>) -> Json<Vec<LeaderboardRow>> {
    let devices = state.registry.snapshot();
    Json(
        leaderboard(&devices)
            .into_iter()
            .map(LeaderboardRow::from)
            .collect(),
    )
}
