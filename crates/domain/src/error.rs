//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into [`AcCtlError`]
//! via `From`. Adapter errors (`sqlx`, filesystem, …) are boxed into the
//! [`Storage`](AcCtlError::Storage) or [`Hardware`](AcCtlError::Hardware)
//! variants so this crate stays free of IO dependencies.

/// Top-level error returned by domain and application operations.
#[derive(Debug, thiserror::Error)]
pub enum AcCtlError {
    /// Input rejected before any state was touched.
    #[error("validation error")]
    Validation(#[from] ValidationError),

    /// The addressed resource does not exist.
    #[error("not found")]
    NotFound(#[from] NotFoundError),

    /// The durable key-value substrate failed.
    #[error("storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// A hardware line could not be read or driven.
    #[error("hardware error")]
    Hardware(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Reasons a schedule request is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("slot id {0} is outside 0..{max}", max = crate::schedule::SCHEDULE_CAPACITY)]
    SlotOutOfRange(i64),

    #[error("hour {0} is outside 0..24")]
    HourOutOfRange(i64),

    #[error("minute {0} is outside 0..60")]
    MinuteOutOfRange(i64),

    #[error("target {0} must be 0 (off) or 1 (on)")]
    InvalidTarget(i64),

    #[error("unknown power state {0:?}")]
    UnknownPowerState(String),
}

/// Returned when an operation addresses something that is not there.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} {id} not found")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}
