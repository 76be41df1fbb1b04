//! Shared application state for axum handlers.

use std::sync::Arc;

use acctl_app::ports::{ActuatorLine, KeyValueStore, SenseLine, TimeSource};
use acctl_app::services::control_service::ControlService;
use acctl_app::services::journal_service::JournalService;
use acctl_app::services::schedule_store::ScheduleStore;

/// Application state shared across all axum handlers.
///
/// Generic over the storage, hardware line and clock types to avoid dynamic
/// dispatch. `Clone` is written by hand: handlers only ever clone the `Arc`s,
/// so the services themselves never need to be `Clone`.
pub struct AppState<K, S, A, T> {
    /// Manual power commands and clock maintenance.
    pub control: Arc<ControlService<S, A, T>>,
    /// Schedule slot table.
    pub schedules: Arc<ScheduleStore<K>>,
    /// Operational journal.
    pub journal: Arc<JournalService<T>>,
}

impl<K, S, A, T> Clone for AppState<K, S, A, T> {
    fn clone(&self) -> Self {
        Self {
            control: Arc::clone(&self.control),
            schedules: Arc::clone(&self.schedules),
            journal: Arc::clone(&self.journal),
        }
    }
}

impl<K, S, A, T> AppState<K, S, A, T>
where
    K: KeyValueStore + 'static,
    S: SenseLine + 'static,
    A: ActuatorLine + 'static,
    T: TimeSource + 'static,
{
    /// Create a new application state from pre-wrapped `Arc` services.
    ///
    /// The same services are shared with the schedule engine task.
    pub fn from_arcs(
        control: Arc<ControlService<S, A, T>>,
        schedules: Arc<ScheduleStore<K>>,
        journal: Arc<JournalService<T>>,
    ) -> Self {
        Self {
            control,
            schedules,
            journal,
        }
    }
}
