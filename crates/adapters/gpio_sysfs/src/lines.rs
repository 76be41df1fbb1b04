//! Port implementations on top of [`SysfsPin`].

use std::path::Path;

use acctl_app::ports::{ActuatorLine, SenseLine};
use acctl_domain::error::AcCtlError;

use crate::error::GpioError;
use crate::pin::{Direction, Polarity, SysfsPin};

/// The indicator input that reflects the unit's power state.
#[derive(Debug)]
pub struct SysfsSenseLine {
    pin: SysfsPin,
}

impl SysfsSenseLine {
    /// # Errors
    ///
    /// Returns [`GpioError`] if the pin cannot be exported or configured.
    pub fn open(root: &Path, number: u32, polarity: Polarity) -> Result<Self, GpioError> {
        SysfsPin::open(root, number, Direction::In, polarity).map(|pin| Self { pin })
    }
}

impl SenseLine for SysfsSenseLine {
    fn is_active(&self) -> Result<bool, AcCtlError> {
        Ok(self.pin.is_active()?)
    }
}

/// The output wired across the unit's button.
///
/// Opening the line configures it as an output driven to its idle level.
#[derive(Debug)]
pub struct SysfsActuatorLine {
    pin: SysfsPin,
}

impl SysfsActuatorLine {
    /// # Errors
    ///
    /// Returns [`GpioError`] if the pin cannot be exported or configured.
    pub fn open(root: &Path, number: u32) -> Result<Self, GpioError> {
        let pin = SysfsPin::open(root, number, Direction::Out, Polarity::ActiveHigh)?;
        pin.set_active(false)?;
        Ok(Self { pin })
    }
}

impl ActuatorLine for SysfsActuatorLine {
    fn set_active(&self, active: bool) -> Result<(), AcCtlError> {
        Ok(self.pin.set_active(active)?)
    }
}
