//! Fakes shared by the unit tests of this crate.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use acctl_domain::error::AcCtlError;
use acctl_domain::power::PowerState;
use acctl_domain::time::LocalTime;
use chrono::NaiveDate;

use crate::ports::{ActuatorLine, KeyValueStore, SenseLine, TimeSource};

/// A simulated unit: each completed press toggles the power state, unless
/// it has been told to ignore presses.
pub struct FakeUnit {
    on: AtomicBool,
    ignore: AtomicU32,
    presses: AtomicU32,
    held: AtomicU32,
    max_held: AtomicU32,
}

impl FakeUnit {
    pub fn new(initial: PowerState) -> Self {
        Self {
            on: AtomicBool::new(initial.is_on()),
            ignore: AtomicU32::new(0),
            presses: AtomicU32::new(0),
            held: AtomicU32::new(0),
            max_held: AtomicU32::new(0),
        }
    }

    pub fn ignore_next_presses(&self, count: u32) {
        self.ignore.store(count, Ordering::SeqCst);
    }

    pub fn state(&self) -> PowerState {
        PowerState::from_active(self.on.load(Ordering::SeqCst))
    }

    pub fn set_state(&self, state: PowerState) {
        self.on.store(state.is_on(), Ordering::SeqCst);
    }

    pub fn presses(&self) -> u32 {
        self.presses.load(Ordering::SeqCst)
    }

    pub fn max_concurrent_presses(&self) -> u32 {
        self.max_held.load(Ordering::SeqCst)
    }

    pub fn is_held(&self) -> bool {
        self.held.load(Ordering::SeqCst) > 0
    }
}

impl SenseLine for FakeUnit {
    fn is_active(&self) -> Result<bool, AcCtlError> {
        Ok(self.on.load(Ordering::SeqCst))
    }
}

impl ActuatorLine for FakeUnit {
    fn set_active(&self, active: bool) -> Result<(), AcCtlError> {
        if active {
            let held = self.held.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_held.fetch_max(held, Ordering::SeqCst);
            return Ok(());
        }
        if self.held.load(Ordering::SeqCst) == 0 {
            return Ok(());
        }
        self.held.fetch_sub(1, Ordering::SeqCst);
        self.presses.fetch_add(1, Ordering::SeqCst);
        let ignored = self
            .ignore
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if !ignored {
            self.on.fetch_xor(true, Ordering::SeqCst);
        }
        Ok(())
    }
}

/// Key-value store backed by a map; can be switched into a failing mode.
#[derive(Default)]
pub struct InMemoryKv {
    values: Mutex<HashMap<(String, String), i64>>,
    fail_writes: AtomicBool,
    writes_left: Mutex<Option<u32>>,
    puts: AtomicU32,
}

impl InMemoryKv {
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Accept `count` more writes, then fail every later one.
    pub fn fail_writes_after(&self, count: u32) {
        *self.writes_left.lock().unwrap() = Some(count);
    }

    pub fn value(&self, namespace: &str, key: &str) -> Option<i64> {
        self.values
            .lock()
            .unwrap()
            .get(&(namespace.to_string(), key.to_string()))
            .copied()
    }

    pub fn puts(&self) -> u32 {
        self.puts.load(Ordering::SeqCst)
    }
}

impl KeyValueStore for InMemoryKv {
    async fn get(&self, namespace: &str, key: &str) -> Result<Option<i64>, AcCtlError> {
        Ok(self.value(namespace, key))
    }

    async fn put(&self, namespace: &str, key: &str, value: i64) -> Result<(), AcCtlError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AcCtlError::Storage("disk full".into()));
        }
        if let Some(left) = self.writes_left.lock().unwrap().as_mut() {
            if *left == 0 {
                return Err(AcCtlError::Storage("disk full".into()));
            }
            *left -= 1;
        }
        self.puts.fetch_add(1, Ordering::SeqCst);
        self.values
            .lock()
            .unwrap()
            .insert((namespace.to_string(), key.to_string()), value);
        Ok(())
    }
}

/// A clock the test sets by hand.
#[derive(Default)]
pub struct ManualClock {
    now: Mutex<Option<LocalTime>>,
    resync_to: Mutex<Option<LocalTime>>,
}

impl ManualClock {
    pub fn at(hour: u32, minute: u32) -> Self {
        let clock = Self::default();
        clock.set(hour, minute);
        clock
    }

    pub fn set(&self, hour: u32, minute: u32) {
        *self.now.lock().unwrap() = Some(local(hour, minute));
    }

    pub fn unsynchronize(&self) {
        *self.now.lock().unwrap() = None;
    }

    pub fn sync_on_resync(&self, hour: u32, minute: u32) {
        *self.resync_to.lock().unwrap() = Some(local(hour, minute));
    }
}

impl TimeSource for ManualClock {
    fn now(&self) -> Option<LocalTime> {
        *self.now.lock().unwrap()
    }

    async fn resync(&self) -> Result<Option<LocalTime>, AcCtlError> {
        if let Some(time) = self.resync_to.lock().unwrap().take() {
            *self.now.lock().unwrap() = Some(time);
        }
        Ok(self.now())
    }
}

pub fn local(hour: u32, minute: u32) -> LocalTime {
    NaiveDate::from_ymd_opt(2026, 6, 1)
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap()
}
