//! Outcome of a state-verified actuation request.

use serde::Serialize;

use crate::power::PowerState;

/// What happened when the controller was asked to reach a power state.
///
/// A failed attempt is an outcome, not an error: the unit is left in
/// whatever state it ended in and the caller decides what to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum ActuationOutcome {
    /// The unit was already in the requested state; nothing was pressed.
    AlreadyThere,
    /// The unit reached the requested state after `attempts` presses.
    Succeeded { attempts: u32 },
    /// The unit still did not match after `attempts` presses.
    Failed { attempts: u32 },
}

impl ActuationOutcome {
    /// Whether the unit is confirmed to be in the requested state.
    #[must_use]
    pub fn is_confirmed(self) -> bool {
        !matches!(self, Self::Failed { .. })
    }

    /// Number of presses issued.
    #[must_use]
    pub fn presses(self) -> u32 {
        match self {
            Self::AlreadyThere => 0,
            Self::Succeeded { attempts } | Self::Failed { attempts } => attempts,
        }
    }

    /// One-line human description used in journal entries.
    #[must_use]
    pub fn describe(self, desired: PowerState) -> String {
        match self {
            Self::AlreadyThere => format!("already {desired}"),
            Self::Succeeded { attempts: 1 } => format!("turned {desired}"),
            Self::Succeeded { attempts } => {
                format!("turned {desired} after {attempts} attempts")
            }
            Self::Failed { attempts } => {
                format!("failed to turn {desired} after {attempts} attempts")
            }
        }
    }
}
