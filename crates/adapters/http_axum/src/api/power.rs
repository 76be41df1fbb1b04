//! JSON handlers for the unit's power state.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use acctl_app::ports::{ActuatorLine, KeyValueStore, SenseLine, TimeSource};
use acctl_domain::actuation::ActuationOutcome;
use acctl_domain::power::PowerState;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize, Serialize)]
pub struct PowerBody {
    pub state: PowerState,
}

/// Body of a `PUT /api/power` response.
#[derive(Debug, Serialize)]
pub struct ActuationBody {
    /// The state that was requested.
    pub state: PowerState,
    pub outcome: ActuationOutcome,
}

/// Possible responses from the set endpoint.
pub enum SetResponse {
    Ok(Json<ActuationBody>),
    /// The unit did not reach the requested state within the retry budget.
    NotConfirmed(Json<ActuationBody>),
}

impl IntoResponse for SetResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
            Self::NotConfirmed(json) => (StatusCode::BAD_GATEWAY, json).into_response(),
        }
    }
}

/// `GET /api/power`
pub async fn get<K, S, A, T>(
    State(state): State<AppState<K, S, A, T>>,
) -> Result<Json<PowerBody>, ApiError>
where
    K: KeyValueStore + 'static,
    S: SenseLine + 'static,
    A: ActuatorLine + 'static,
    T: TimeSource + 'static,
{
    let power = state.control.read_power_state().await?;
    Ok(Json(PowerBody { state: power }))
}

/// `PUT /api/power`
pub async fn set<K, S, A, T>(
    State(state): State<AppState<K, S, A, T>>,
    Json(req): Json<PowerBody>,
) -> Result<SetResponse, ApiError>
where
    K: KeyValueStore + 'static,
    S: SenseLine + 'static,
    A: ActuatorLine + 'static,
    T: TimeSource + 'static,
{
    let outcome = state.control.request_state(req.state).await?;
    let body = Json(ActuationBody {
        state: req.state,
        outcome,
    });
    if outcome.is_confirmed() {
        Ok(SetResponse::Ok(body))
    } else {
        Ok(SetResponse::NotConfirmed(body))
    }
}
