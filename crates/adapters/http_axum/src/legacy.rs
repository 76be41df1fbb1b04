//! Plain-text endpoints kept from the first firmware.
//!
//! Shell scripts poll `GET /status` and expect `1` or `0` followed by a
//! newline. `PUT /on` and `PUT /off` always answer `200`, the body tells
//! whether the unit confirmed the change. Every reply is a single
//! newline-terminated line, `/off` included.

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, put};

use acctl_app::ports::{ActuatorLine, KeyValueStore, SenseLine, TimeSource};
use acctl_domain::actuation::ActuationOutcome;
use acctl_domain::power::PowerState;

use crate::error::ApiError;
use crate::state::AppState;

const ENDPOINTS: &str = "\
Available endpoints:
  GET    /status
  PUT    /on
  PUT    /off
  GET    /api/power
  PUT    /api/power
  GET    /api/schedules
  PUT    /api/schedules/{id}
  DELETE /api/schedules/{id}
  GET    /api/journal
  DELETE /api/journal
  POST   /api/time/resync
";

/// Build the legacy routes.
pub fn routes<K, S, A, T>() -> Router<AppState<K, S, A, T>>
where
    K: KeyValueStore + 'static,
    S: SenseLine + 'static,
    A: ActuatorLine + 'static,
    T: TimeSource + 'static,
{
    Router::new()
        .route("/status", get(status::<K, S, A, T>))
        .route("/on", put(turn_on::<K, S, A, T>))
        .route("/off", put(turn_off::<K, S, A, T>))
}

/// `GET /status`
#[allow(clippy::missing_errors_doc)]
pub async fn status<K, S, A, T>(
    State(state): State<AppState<K, S, A, T>>,
) -> Result<&'static str, ApiError>
where
    K: KeyValueStore + 'static,
    S: SenseLine + 'static,
    A: ActuatorLine + 'static,
    T: TimeSource + 'static,
{
    let power = state.control.read_power_state().await?;
    Ok(if power.is_on() { "1\n" } else { "0\n" })
}

/// `PUT /on`
#[allow(clippy::missing_errors_doc)]
pub async fn turn_on<K, S, A, T>(
    State(state): State<AppState<K, S, A, T>>,
) -> Result<String, ApiError>
where
    K: KeyValueStore + 'static,
    S: SenseLine + 'static,
    A: ActuatorLine + 'static,
    T: TimeSource + 'static,
{
    let outcome = state.control.request_state(PowerState::On).await?;
    Ok(render(outcome, PowerState::On))
}

/// `PUT /off`
#[allow(clippy::missing_errors_doc)]
pub async fn turn_off<K, S, A, T>(
    State(state): State<AppState<K, S, A, T>>,
) -> Result<String, ApiError>
where
    K: KeyValueStore + 'static,
    S: SenseLine + 'static,
    A: ActuatorLine + 'static,
    T: TimeSource + 'static,
{
    let outcome = state.control.request_state(PowerState::Off).await?;
    Ok(render(outcome, PowerState::Off))
}

/// Fallback for every unknown path.
pub async fn not_found() -> (StatusCode, String) {
    (StatusCode::NOT_FOUND, format!("Not Found\n\n{ENDPOINTS}"))
}

fn render(outcome: ActuationOutcome, desired: PowerState) -> String {
    match outcome {
        ActuationOutcome::AlreadyThere => format!("OK - Already {desired}\n"),
        ActuationOutcome::Succeeded { .. } => format!("OK - Turned {desired}\n"),
        ActuationOutcome::Failed { .. } => format!("OK - Failed to turn {desired}\n"),
    }
}
