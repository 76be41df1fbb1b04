//! Power state of the air-conditioning unit, as sensed on the indicator line.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Sensed on/off state of the unit.
///
/// Never persisted: every read goes back to the sense line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerState {
    On,
    Off,
}

impl PowerState {
    /// Map a raw line level to a state (`true` is the active level).
    #[must_use]
    pub fn from_active(active: bool) -> Self {
        if active { Self::On } else { Self::Off }
    }

    #[must_use]
    pub fn is_on(self) -> bool {
        matches!(self, Self::On)
    }

    /// Numeric form used by the durable store and the legacy API (`1`/`0`).
    #[must_use]
    pub fn as_flag(self) -> i64 {
        match self {
            Self::On => 1,
            Self::Off => 0,
        }
    }
}

impl TryFrom<i64> for PowerState {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::On),
            0 => Ok(Self::Off),
            other => Err(ValidationError::InvalidTarget(other)),
        }
    }
}

impl FromStr for PowerState {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "on" | "1" => Ok(Self::On),
            "off" | "0" => Ok(Self::Off),
            _ => Err(ValidationError::UnknownPowerState(s.to_string())),
        }
    }
}

impl std::fmt::Display for PowerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::On => f.write_str("on"),
            Self::Off => f.write_str("off"),
        }
    }
}
