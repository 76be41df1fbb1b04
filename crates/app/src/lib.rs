//! # acctl-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement:
//!   - `SenseLine` / `ActuatorLine` — the two hardware lines
//!   - `KeyValueStore` — durable integer storage
//!   - `TimeSource` — local wall-clock time, possibly unavailable
//! - Provide the control algorithms on top of them:
//!   - `DebouncedSensor`, `PulseDriver`, `StateVerifiedActuator`
//!   - `ScheduleStore` and `ScheduleEngine`
//!   - `JournalService` and `ControlService`
//!
//! ## Dependency rule
//! Depends on `acctl-domain` only (plus `tokio` for timers and locks).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod ports;
pub mod schedule_engine;
pub mod services;

#[cfg(test)]
mod test_support;
