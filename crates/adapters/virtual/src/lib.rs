//! # acctl-adapter-virtual
//!
//! A simulated air-conditioning unit that plugs into both hardware ports.
//!
//! The unit behaves like the real thermostat interface: holding the button
//! does nothing by itself, and the power state toggles when the button is
//! released. It can be told to swallow presses (the unit was busy) or to
//! drop out a number of sense reads (a noisy indicator line), which is
//! enough to exercise every branch of the retry and debounce logic.
//!
//! ## Dependency rule
//!
//! Depends on `acctl-app` (port traits) and `acctl-domain` only.

use std::sync::{Mutex, MutexGuard, PoisonError};

use acctl_app::ports::{ActuatorLine, SenseLine};
use acctl_domain::error::AcCtlError;
use acctl_domain::power::PowerState;

#[derive(Debug)]
struct UnitState {
    power: PowerState,
    held: bool,
    ignore_presses: u32,
    sense_dropouts: u32,
    presses: u64,
}

/// Simulated unit wired to both the button and the indicator line.
#[derive(Debug)]
pub struct SimulatedAircon {
    state: Mutex<UnitState>,
}

impl Default for SimulatedAircon {
    fn default() -> Self {
        Self::new(PowerState::Off)
    }
}

impl SimulatedAircon {
    #[must_use]
    pub fn new(initial: PowerState) -> Self {
        Self {
            state: Mutex::new(UnitState {
                power: initial,
                held: false,
                ignore_presses: 0,
                sense_dropouts: 0,
                presses: 0,
            }),
        }
    }

    /// Actual power state, bypassing the indicator line.
    #[must_use]
    pub fn power(&self) -> PowerState {
        self.lock().power
    }

    /// Flip the unit by hand, as someone at the wall panel would.
    pub fn set_power(&self, power: PowerState) {
        self.lock().power = power;
    }

    /// Number of completed presses so far.
    #[must_use]
    pub fn presses(&self) -> u64 {
        self.lock().presses
    }

    /// The next `count` presses complete without changing the power state.
    pub fn ignore_next_presses(&self, count: u32) {
        self.lock().ignore_presses = count;
    }

    /// The next `count` sense reads report an inactive line.
    pub fn drop_next_sense_reads(&self, count: u32) {
        self.lock().sense_dropouts = count;
    }

    fn lock(&self) -> MutexGuard<'_, UnitState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SenseLine for SimulatedAircon {
    fn is_active(&self) -> Result<bool, AcCtlError> {
        let mut state = self.lock();
        if state.sense_dropouts > 0 {
            state.sense_dropouts -= 1;
            return Ok(false);
        }
        Ok(state.power.is_on())
    }
}

impl ActuatorLine for SimulatedAircon {
    fn set_active(&self, active: bool) -> Result<(), AcCtlError> {
        let mut state = self.lock();
        let released = state.held && !active;
        state.held = active;
        if !released {
            return Ok(());
        }

        state.presses += 1;
        if state.ignore_presses > 0 {
            state.ignore_presses -= 1;
            tracing::debug!(presses = state.presses, "simulated unit ignored press");
            return Ok(());
        }
        state.power = match state.power {
            PowerState::On => PowerState::Off,
            PowerState::Off => PowerState::On,
        };
        tracing::debug!(power = %state.power, "simulated unit toggled");
        Ok(())
    }
}
