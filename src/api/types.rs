//! API request, response and error types.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::devices::FieldError;
use crate::registry::RegistryError;
use crate::stats::LeaderboardEntry;

/// Optional location filter for `GET /devices`.
#[derive(Debug, Deserialize)]
pub struct DeviceQuery {
    pub location: Option<String>,
}

/// Leaderboard entry plus its rendered text line.
#[derive(Debug, Serialize)]
pub struct LeaderboardRow {
    pub rank: usize,
    pub name: String,
    pub location: String,
    /// Consumption in kWh, unrounded.
    pub consumption: f64,
    /// `"<name> (<location>): <kWh> kWh"`.
    pub label: String,
}

impl From<LeaderboardEntry> for LeaderboardRow {
    fn from(entry: LeaderboardEntry) -> Self {
        let label = entry.to_string();
        Self {
            rank: entry.rank,
            name: entry.name,
            location: entry.location,
            consumption: entry.consumption,
            label,
        }
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Machine-readable kind, e.g. `"duplicate_name"`.
    pub kind: String,
    /// Human-readable error message.
    pub error: String,
}

/// Failure of a request handler.
#[derive(Debug)]
pub enum ApiError {
    Registry(RegistryError),
    BadRequest(String),
    Internal(String),
}

impl From<RegistryError> for ApiError {
    fn from(e: RegistryError) -> Self {
        Self::Registry(e)
    }
}

/// A body that does not decode into a draft is an invalid field like any
/// other, so clients see one error shape.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let reason = match &rejection {
            JsonRejection::JsonDataError(_) => rejection.body_text(),
            JsonRejection::JsonSyntaxError(_) => "malformed JSON".to_string(),
            JsonRejection::MissingJsonContentType(_) => {
                "expected Content-Type: application/json".to_string()
            }
            _ => rejection.body_text(),
        };
        Self::Registry(RegistryError::InvalidField(FieldError {
            field: "body",
            reason,
        }))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind, message) = match self {
            Self::Registry(e) => {
                let status = match e {
                    RegistryError::InvalidField(_) => StatusCode::BAD_REQUEST,
                    RegistryError::DuplicateName(_) => StatusCode::CONFLICT,
                    RegistryError::NotFound(_) => StatusCode::NOT_FOUND,
                    RegistryError::PersistenceFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
                };
                (status, e.kind(), e.to_string())
            }
            Self::BadRequest(message) => (StatusCode::BAD_REQUEST, "bad_request", message),
            Self::Internal(message) => {
                error!(error = %message, "request handler failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal", message)
            }
        };
        let body = ErrorResponse {
            kind: kind.to_string(),
            error: message,
        };
        (status, Json(body)).into_response()
    }
}
