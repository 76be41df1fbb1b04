//! Control service — manual power commands and clock maintenance.
//!
//! This is what the HTTP layer calls for `on`/`off`/`status`. Every manual
//! command is journaled together with its outcome.
//!
//! A power command runs on its own task. Dropping the caller (a client that
//! hangs up mid-request) does not interrupt the press sequence or its
//! journal entry.

use std::sync::Arc;

use acctl_domain::actuation::ActuationOutcome;
use acctl_domain::error::AcCtlError;
use acctl_domain::power::PowerState;
use acctl_domain::time::LocalTime;

use crate::ports::{ActuatorLine, SenseLine, TimeSource};
use crate::services::actuator::StateVerifiedActuator;
use crate::services::journal_service::JournalService;

/// Application service for manual control of the unit.
pub struct ControlService<S, A, T> {
    actuator: Arc<StateVerifiedActuator<S, A>>,
    journal: Arc<JournalService<T>>,
    clock: T,
}

impl<S, A, T> ControlService<S, A, T>
where
    S: SenseLine + 'static,
    A: ActuatorLine + 'static,
    T: TimeSource + 'static,
{
    pub fn new(
        actuator: Arc<StateVerifiedActuator<S, A>>,
        journal: Arc<JournalService<T>>,
        clock: T,
    ) -> Self {
        Self {
            actuator,
            journal,
            clock,
        }
    }

    /// Current sensed power state.
    ///
    /// # Errors
    ///
    /// Returns [`AcCtlError::Hardware`] if the sense line cannot be read.
    pub async fn read_power_state(&self) -> Result<PowerState, AcCtlError> {
        self.actuator.read_state().await
    }

    /// Drive the unit to `desired` and journal the outcome.
    ///
    /// The work runs to completion even if the returned future is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`AcCtlError::Hardware`] if a line fails; the failure is
    /// journaled as well. A panicked actuation task is reported the same way.
    #[tracing::instrument(skip(self))]
    pub async fn request_state(&self, desired: PowerState) -> Result<ActuationOutcome, AcCtlError> {
        let actuator = Arc::clone(&self.actuator);
        let journal = Arc::clone(&self.journal);
        let task = tokio::spawn(async move {
            let result = actuator.set_state(desired).await;
            match &result {
                Ok(outcome) => {
                    journal.append(format!("Manual: turn {desired} -> {}", outcome.describe(desired)));
                }
                Err(err) => journal.append(format!("Manual: turn {desired} -> error: {err}")),
            }
            result
        });
        task.await.map_err(|err| {
            tracing::error!(error = %err, "actuation task did not complete");
            AcCtlError::Hardware(Box::new(err))
        })?
    }

    /// Ask the time source to resynchronize.
    ///
    /// Returns the local time after the attempt, `None` if still unknown.
    ///
    /// # Errors
    ///
    /// Propagates the time source's failure.
    #[tracing::instrument(skip(self))]
    pub async fn request_time_resync(&self) -> Result<Option<LocalTime>, AcCtlError> {
        let now = self.clock.resync().await?;
        match now {
            Some(now) => self
                .journal
                .append(format!("Time synchronized: {}", now.format("%Y-%m-%d %H:%M:%S"))),
            None => self.journal.append("Time sync requested, clock still unavailable"),
        }
        Ok(now)
    }
}
