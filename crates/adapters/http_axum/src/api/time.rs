//! Clock maintenance.

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use acctl_app::ports::{ActuatorLine, KeyValueStore, SenseLine, TimeSource};
use acctl_domain::time::LocalTime;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ResyncBody {
    pub synchronized: bool,
    pub now: Option<LocalTime>,
}

/// `POST /api/time/resync`
pub async fn resync<K, S, A, T>(
    State(state): State<AppState<K, S, A, T>>,
) -> Result<Json<ResyncBody>, ApiError>
where
    K: KeyValueStore + 'static,
    S: SenseLine + 'static,
    A: ActuatorLine + 'static,
    T: TimeSource + 'static,
{
    let now = state.control.request_time_resync().await?;
    Ok(Json(ResyncBody {
        synchronized: now.is_some(),
        now,
    }))
}
