//! Power-state sensor — debounced reads of the indicator line.
//!
//! The line is sampled up to `samples` times, `sample_interval` apart. Any
//! active sample means the unit is on; only a fully inactive window reads as
//! off. This absorbs contact bounce and indicator flicker without a
//! dedicated debounce timer.
//!
//! A disconnected line reads as whatever its pull resistor resolves to, so a
//! pulled-up input on a missing wire reports `On`.

use std::time::Duration;

use acctl_domain::error::AcCtlError;
use acctl_domain::power::PowerState;

use crate::ports::SenseLine;

/// Sampling window of the sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorSettings {
    pub samples: u32,
    pub sample_interval: Duration,
}

impl Default for SensorSettings {
    fn default() -> Self {
        Self {
            samples: 8,
            sample_interval: Duration::from_millis(5),
        }
    }
}

/// Reads [`PowerState`] from a noisy [`SenseLine`].
pub struct DebouncedSensor<L> {
    line: L,
    settings: SensorSettings,
}

impl<L: SenseLine> DebouncedSensor<L> {
    pub fn new(line: L, settings: SensorSettings) -> Self {
        Self { line, settings }
    }

    /// Sample the line and return the sensed state.
    ///
    /// # Errors
    ///
    /// Returns [`AcCtlError::Hardware`] if the line cannot be read.
    pub async fn read(&self) -> Result<PowerState, AcCtlError> {
        for sample in 1..=self.settings.samples {
            if self.line.is_active()? {
                return Ok(PowerState::On);
            }
            if sample < self.settings.samples {
                tokio::time::sleep(self.settings.sample_interval).await;
            }
        }
        Ok(PowerState::Off)
    }
}
