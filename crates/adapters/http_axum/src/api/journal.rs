//! JSON handlers for the operational journal.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Serialize;

use acctl_app::ports::{ActuatorLine, KeyValueStore, SenseLine, TimeSource};

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct JournalBody {
    /// Oldest first.
    pub entries: Vec<String>,
}

/// `GET /api/journal`
pub async fn list<K, S, A, T>(State(state): State<AppState<K, S, A, T>>) -> Json<JournalBody>
where
    K: KeyValueStore + 'static,
    S: SenseLine + 'static,
    A: ActuatorLine + 'static,
    T: TimeSource + 'static,
{
    Json(JournalBody {
        entries: state.journal.read_all(),
    })
}

/// `DELETE /api/journal`
pub async fn clear<K, S, A, T>(State(state): State<AppState<K, S, A, T>>) -> StatusCode
where
    K: KeyValueStore + 'static,
    S: SenseLine + 'static,
    A: ActuatorLine + 'static,
    T: TimeSource + 'static,
{
    state.journal.clear();
    StatusCode::NO_CONTENT
}
