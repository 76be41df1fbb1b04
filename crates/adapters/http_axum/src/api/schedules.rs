//! JSON REST handlers for schedule slots.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use acctl_app::ports::{ActuatorLine, KeyValueStore, SenseLine, TimeSource};
use acctl_domain::schedule::ScheduleRule;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for writing a slot. `target` is `1` (on) or `0` (off).
#[derive(Deserialize)]
pub struct UpsertScheduleRequest {
    pub hour: i64,
    pub minute: i64,
    pub target: i64,
}

/// Possible responses from the delete endpoint.
pub enum DeleteResponse {
    NoContent,
}

impl IntoResponse for DeleteResponse {
    fn into_response(self) -> Response {
        match self {
            Self::NoContent => StatusCode::NO_CONTENT.into_response(),
        }
    }
}

/// `GET /api/schedules`
pub async fn list<K, S, A, T>(
    State(state): State<AppState<K, S, A, T>>,
) -> Json<Vec<ScheduleRule>>
where
    K: KeyValueStore + 'static,
    S: SenseLine + 'static,
    A: ActuatorLine + 'static,
    T: TimeSource + 'static,
{
    Json(state.schedules.snapshot().await)
}

/// `PUT /api/schedules/{id}`
pub async fn upsert<K, S, A, T>(
    State(state): State<AppState<K, S, A, T>>,
    Path(id): Path<i64>,
    Json(req): Json<UpsertScheduleRequest>,
) -> Result<Json<ScheduleRule>, ApiError>
where
    K: KeyValueStore + 'static,
    S: SenseLine + 'static,
    A: ActuatorLine + 'static,
    T: TimeSource + 'static,
{
    let rule = state
        .schedules
        .upsert(id, req.hour, req.minute, req.target)
        .await?;
    Ok(Json(rule))
}

/// `DELETE /api/schedules/{id}`
pub async fn delete<K, S, A, T>(
    State(state): State<AppState<K, S, A, T>>,
    Path(id): Path<i64>,
) -> Result<DeleteResponse, ApiError>
where
    K: KeyValueStore + 'static,
    S: SenseLine + 'static,
    A: ActuatorLine + 'static,
    T: TimeSource + 'static,
{
    state.schedules.delete(id).await?;
    Ok(DeleteResponse::NoContent)
}
