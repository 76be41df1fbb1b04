//! Schedule rules — fixed-capacity, time-of-day triggers for the actuator.
//!
//! A rule lives in one of [`SCHEDULE_CAPACITY`] slots. The slot index is the
//! rule's identity: writing to an occupied slot replaces the rule in place.
//!
//! Each rule carries a transient [`FireState`] so that a rule fires at most
//! once per matching minute even though the engine ticks many times within
//! that minute:
//!
//! ```text
//! Idle ──[tick at hh:mm]──▶ FiredThisMinute ──[tick at any other time]──▶ Idle
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::power::PowerState;

/// Number of schedule slots.
pub const SCHEDULE_CAPACITY: usize = 16;

/// Index of a schedule slot, guaranteed to be `< SCHEDULE_CAPACITY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct SlotId(u8);

impl SlotId {
    /// Iterate over every slot id in ascending order.
    pub fn all() -> impl Iterator<Item = Self> {
        // SCHEDULE_CAPACITY fits in a u8.
        (0..SCHEDULE_CAPACITY as u8).map(Self)
    }

    #[must_use]
    pub fn index(self) -> usize {
        usize::from(self.0)
    }
}

impl TryFrom<i64> for SlotId {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .ok()
            .filter(|v| usize::from(*v) < SCHEDULE_CAPACITY)
            .map(Self)
            .ok_or(ValidationError::SlotOutOfRange(value))
    }
}

impl From<SlotId> for i64 {
    fn from(id: SlotId) -> Self {
        i64::from(id.0)
    }
}

impl std::fmt::Display for SlotId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Wall-clock time of day at minute resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ClockTime {
    hour: u8,
    minute: u8,
}

impl ClockTime {
    /// Build a validated time of day.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::HourOutOfRange`] or
    /// [`ValidationError::MinuteOutOfRange`].
    pub fn new(hour: i64, minute: i64) -> Result<Self, ValidationError> {
        let hour = u8::try_from(hour)
            .ok()
            .filter(|h| *h < 24)
            .ok_or(ValidationError::HourOutOfRange(hour))?;
        let minute = u8::try_from(minute)
            .ok()
            .filter(|m| *m < 60)
            .ok_or(ValidationError::MinuteOutOfRange(minute))?;
        Ok(Self { hour, minute })
    }

    #[must_use]
    pub fn hour(self) -> u8 {
        self.hour
    }

    #[must_use]
    pub fn minute(self) -> u8 {
        self.minute
    }

    /// Truncate a chrono time (or date-time) to minute resolution.
    #[must_use]
    pub fn of(value: &impl chrono::Timelike) -> Self {
        // chrono guarantees hour < 24 and minute < 60.
        Self {
            hour: value.hour() as u8,
            minute: value.minute() as u8,
        }
    }
}

impl std::fmt::Display for ClockTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// Per-rule firing state. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FireState {
    #[default]
    Idle,
    FiredThisMinute,
}

/// One time-of-day trigger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleRule {
    pub id: SlotId,
    #[serde(flatten)]
    pub time: ClockTime,
    pub target: PowerState,
    #[serde(skip)]
    pub fire_state: FireState,
}

impl ScheduleRule {
    #[must_use]
    pub fn new(id: SlotId, time: ClockTime, target: PowerState) -> Self {
        Self {
            id,
            time,
            target,
            fire_state: FireState::Idle,
        }
    }

    /// Advance the firing state machine for an observed time.
    ///
    /// Returns `true` exactly when the rule transitions to
    /// [`FireState::FiredThisMinute`], i.e. when the caller must act.
    pub fn observe(&mut self, now: ClockTime) -> bool {
        match (self.fire_state, now == self.time) {
            (FireState::Idle, true) => {
                self.fire_state = FireState::FiredThisMinute;
                true
            }
            (FireState::FiredThisMinute, false) => {
                self.fire_state = FireState::Idle;
                false
            }
            _ => false,
        }
    }
}

/// The fixed-capacity slot table.
///
/// Only whole-rule operations are exposed; the table is never indexed raw.
#[derive(Debug, Clone, Default)]
pub struct ScheduleTable {
    slots: [Option<ScheduleRule>; SCHEDULE_CAPACITY],
}

impl ScheduleTable {
    #[must_use]
    pub fn get(&self, id: SlotId) -> Option<&ScheduleRule> {
        self.slots[id.index()].as_ref()
    }

    #[must_use]
    pub fn is_occupied(&self, id: SlotId) -> bool {
        self.slots[id.index()].is_some()
    }

    /// Place `rule` in its slot, replacing any previous occupant.
    pub fn insert(&mut self, rule: ScheduleRule) {
        let index = rule.id.index();
        self.slots[index] = Some(rule);
    }

    /// Empty a slot, returning the previous rule if any.
    pub fn remove(&mut self, id: SlotId) -> Option<ScheduleRule> {
        self.slots[id.index()].take()
    }

    /// Occupied rules in ascending slot order.
    pub fn occupied(&self) -> impl Iterator<Item = &ScheduleRule> {
        self.slots.iter().flatten()
    }

    /// Run every occupied rule's state machine against `now`, in slot order,
    /// returning copies of the rules that became due.
    pub fn observe(&mut self, now: ClockTime) -> Vec<ScheduleRule> {
        self.slots
            .iter_mut()
            .flatten()
            .filter_map(|rule| rule.observe(now).then(|| rule.clone()))
            .collect()
    }
}
