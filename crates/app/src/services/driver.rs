//! Actuator driver — one timed press of the emulated power button.

use std::time::Duration;

use acctl_domain::error::AcCtlError;

use crate::ports::ActuatorLine;

/// Timing of a single press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PulseSettings {
    /// How long the line is held active.
    pub press: Duration,
    /// Pause after release before the next operation.
    pub release_settle: Duration,
}

impl Default for PulseSettings {
    fn default() -> Self {
        Self {
            press: Duration::from_millis(300),
            release_settle: Duration::from_millis(100),
        }
    }
}

/// Drives an [`ActuatorLine`] in press/release pulses.
///
/// The driver has no feedback of its own; it does not know whether a press
/// changed anything. Callers must not pulse concurrently (see
/// [`StateVerifiedActuator`](super::actuator::StateVerifiedActuator)).
pub struct PulseDriver<L> {
    line: L,
    settings: PulseSettings,
}

impl<L: ActuatorLine> PulseDriver<L> {
    pub fn new(line: L, settings: PulseSettings) -> Self {
        Self { line, settings }
    }

    /// Drive the line to idle.
    ///
    /// # Errors
    ///
    /// Returns [`AcCtlError::Hardware`] if the line cannot be written.
    pub fn release(&self) -> Result<(), AcCtlError> {
        self.line.set_active(false)
    }

    /// Press, hold for the configured duration, release, then settle.
    ///
    /// If the returned future is dropped while the button is held, the line
    /// is released on drop.
    ///
    /// # Errors
    ///
    /// Returns [`AcCtlError::Hardware`] if the line cannot be written.
    pub async fn pulse(&self) -> Result<(), AcCtlError> {
        tracing::debug!(press_ms = self.settings.press.as_millis(), "pressing button");
        self.line.set_active(true)?;
        let held = HeldPress { line: Some(&self.line) };
        tokio::time::sleep(self.settings.press).await;
        held.release()?;
        tracing::debug!("button released");
        tokio::time::sleep(self.settings.release_settle).await;
        Ok(())
    }
}

/// A press in progress. Dropping it unreleased drives the line idle.
struct HeldPress<'a, L: ActuatorLine> {
    line: Option<&'a L>,
}

impl<L: ActuatorLine> HeldPress<'_, L> {
    fn release(mut self) -> Result<(), AcCtlError> {
        match self.line.take() {
            Some(line) => line.set_active(false),
            None => Ok(()),
        }
    }
}

impl<L: ActuatorLine> Drop for HeldPress<'_, L> {
    fn drop(&mut self) {
        if let Some(line) = self.line.take() {
            tracing::warn!("press interrupted, releasing button");
            if let Err(err) = line.set_active(false) {
                tracing::error!(error = %err, "failed to release interrupted press");
            }
        }
    }
}
