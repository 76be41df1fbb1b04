//! # acctl-adapter-gpio-sysfs
//!
//! Hardware lines backed by the legacy Linux sysfs GPIO interface.
//!
//! ## Responsibilities
//! - Export pins and set their direction under `/sys/class/gpio`
//! - Implement [`SenseLine`](acctl_app::ports::SenseLine) for the indicator input
//! - Implement [`ActuatorLine`](acctl_app::ports::ActuatorLine) for the button output
//! - Translate between logical "active" and the electrical level
//!
//! ## Dependency rule
//! Depends on `acctl-app` (for port traits) and `acctl-domain` (for errors).

pub mod error;
pub mod lines;
pub mod pin;

pub use lines::{SysfsActuatorLine, SysfsSenseLine};
pub use pin::{Direction, Polarity, SysfsPin};
