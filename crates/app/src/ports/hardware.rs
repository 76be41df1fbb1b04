//! Hardware ports — the two digital lines wired to the thermostat panel.
//!
//! Implementations live in adapter crates (`gpio_sysfs` for real pins,
//! `virtual` for a simulated unit). Both calls are expected to return
//! within microseconds; any waiting is done by the services in this crate.

use std::sync::Arc;

use acctl_domain::error::AcCtlError;

/// Input line carrying the unit's power indicator.
pub trait SenseLine: Send + Sync {
    /// Sample the line once. `true` means the active (powered) level.
    ///
    /// # Errors
    ///
    /// Returns [`AcCtlError::Hardware`] if the line cannot be read.
    fn is_active(&self) -> Result<bool, AcCtlError>;
}

/// Output line that emulates the panel's power button.
pub trait ActuatorLine: Send + Sync {
    /// Drive the line to its active (`true`) or idle (`false`) level.
    ///
    /// # Errors
    ///
    /// Returns [`AcCtlError::Hardware`] if the line cannot be written.
    fn set_active(&self, active: bool) -> Result<(), AcCtlError>;
}

impl<T: SenseLine + ?Sized> SenseLine for Arc<T> {
    fn is_active(&self) -> Result<bool, AcCtlError> {
        (**self).is_active()
    }
}

impl<T: ActuatorLine + ?Sized> ActuatorLine for Arc<T> {
    fn set_active(&self, active: bool) -> Result<(), AcCtlError> {
        (**self).set_active(active)
    }
}
