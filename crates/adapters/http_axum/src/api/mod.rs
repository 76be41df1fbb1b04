//! JSON REST API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod journal;
#[allow(clippy::missing_errors_doc)]
pub mod power;
#[allow(clippy::missing_errors_doc)]
pub mod schedules;
#[allow(clippy::missing_errors_doc)]
pub mod time;

use axum::Router;
use axum::routing::{get, post, put};

use acctl_app::ports::{ActuatorLine, KeyValueStore, SenseLine, TimeSource};

use crate::state::AppState;

/// Build the `/api` sub-router.
pub fn routes<K, S, A, T>() -> Router<AppState<K, S, A, T>>
where
    K: KeyValueStore + 'static,
    S: SenseLine + 'static,
    A: ActuatorLine + 'static,
    T: TimeSource + 'static,
{
    Router::new()
        // Power
        .route(
            "/power",
            get(power::get::<K, S, A, T>).put(power::set::<K, S, A, T>),
        )
        // Schedules
        .route("/schedules", get(schedules::list::<K, S, A, T>))
        .route(
            "/schedules/{id}",
            put(schedules::upsert::<K, S, A, T>).delete(schedules::delete::<K, S, A, T>),
        )
        // Journal
        .route(
            "/journal",
            get(journal::list::<K, S, A, T>).delete(journal::clear::<K, S, A, T>),
        )
        // Clock
        .route("/time/resync", post(time::resync::<K, S, A, T>))
}
