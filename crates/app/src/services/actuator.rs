//! State-verified actuator — press until the sensed state matches.
//!
//! A press is a blind toggle: the only confirmation is a later, independent
//! read of the indicator line. The unit needs time to react (relay settle,
//! thermostat debounce), so every press is followed by a verification delay
//! and, if the state still differs, a backoff before the next press.
//!
//! If the unit already reads as the desired state nothing is pressed, since
//! a press would toggle it to the wrong state.

use std::time::Duration;

use tokio::sync::Mutex;

use acctl_domain::actuation::ActuationOutcome;
use acctl_domain::error::AcCtlError;
use acctl_domain::power::PowerState;

use crate::ports::{ActuatorLine, SenseLine};
use crate::services::driver::PulseDriver;
use crate::services::sensor::DebouncedSensor;

/// Retry budget and timing for [`StateVerifiedActuator::set_state`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    /// Wait between a press and the verification read.
    pub verify_delay: Duration,
    /// Extra wait after a press that did not take.
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            verify_delay: Duration::from_millis(500),
            backoff: Duration::from_millis(1500),
        }
    }
}

/// Drives the unit to a desired [`PowerState`] with bounded retries.
///
/// The driver is held behind an async mutex for the whole of
/// [`set_state`](Self::set_state): concurrent requests queue up and run one
/// after the other, never interleaving presses.
pub struct StateVerifiedActuator<S, A> {
    sensor: DebouncedSensor<S>,
    driver: Mutex<PulseDriver<A>>,
    policy: RetryPolicy,
}

impl<S, A> StateVerifiedActuator<S, A>
where
    S: SenseLine,
    A: ActuatorLine,
{
    pub fn new(sensor: DebouncedSensor<S>, driver: PulseDriver<A>, policy: RetryPolicy) -> Self {
        Self {
            sensor,
            driver: Mutex::new(driver),
            policy,
        }
    }

    /// Read the sensed state without touching the button.
    ///
    /// # Errors
    ///
    /// Returns [`AcCtlError::Hardware`] if the sense line cannot be read.
    pub async fn read_state(&self) -> Result<PowerState, AcCtlError> {
        self.sensor.read().await
    }

    /// Drive the button line to idle, e.g. at startup.
    ///
    /// # Errors
    ///
    /// Returns [`AcCtlError::Hardware`] if the actuator line cannot be written.
    pub async fn release(&self) -> Result<(), AcCtlError> {
        self.driver.lock().await.release()
    }

    /// Press the button until the unit reads as `desired`, at most
    /// `max_attempts` times.
    ///
    /// # Errors
    ///
    /// Returns [`AcCtlError::Hardware`] if either line fails. Running out of
    /// attempts is reported as [`ActuationOutcome::Failed`], not as an error.
    #[tracing::instrument(skip(self))]
    pub async fn set_state(&self, desired: PowerState) -> Result<ActuationOutcome, AcCtlError> {
        let driver = self.driver.lock().await;

        if self.sensor.read().await? == desired {
            tracing::debug!("already in requested state");
            return Ok(ActuationOutcome::AlreadyThere);
        }

        for attempt in 1..=self.policy.max_attempts {
            driver.pulse().await?;
            tokio::time::sleep(self.policy.verify_delay).await;

            if self.sensor.read().await? == desired {
                tracing::info!(attempt, "state confirmed");
                return Ok(ActuationOutcome::Succeeded { attempts: attempt });
            }

            tracing::debug!(attempt, "state not reached yet");
            if attempt < self.policy.max_attempts {
                tokio::time::sleep(self.policy.backoff).await;
            }
        }

        tracing::warn!(
            attempts = self.policy.max_attempts,
            "state not reached after all attempts"
        );
        Ok(ActuationOutcome::Failed {
            attempts: self.policy.max_attempts,
        })
    }
}
