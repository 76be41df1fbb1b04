//! System clock adapter.
//!
//! The board has no battery-backed RTC: until NTP has set the clock it
//! boots at the epoch. Any reading earlier than `min_valid_year` is
//! therefore reported as "not synchronized".

use acctl_app::ports::TimeSource;
use acctl_domain::error::AcCtlError;
use acctl_domain::time::LocalTime;
use chrono::{DateTime, Datelike, FixedOffset, Utc};

/// Local time derived from the system UTC clock and a fixed offset.
#[derive(Debug)]
pub struct SystemClock {
    offset: FixedOffset,
    min_valid_year: i32,
}

impl SystemClock {
    /// `None` if the offset is a day or more.
    #[must_use]
    pub fn new(utc_offset_minutes: i32, min_valid_year: i32) -> Option<Self> {
        let offset = FixedOffset::east_opt(utc_offset_minutes.checked_mul(60)?)?;
        Some(Self {
            offset,
            min_valid_year,
        })
    }

    fn local(&self, utc: DateTime<Utc>) -> Option<LocalTime> {
        let local = utc.with_timezone(&self.offset).naive_local();
        (local.year() >= self.min_valid_year).then_some(local)
    }
}

impl TimeSource for SystemClock {
    fn now(&self) -> Option<LocalTime> {
        self.local(Utc::now())
    }

    // The OS owns NTP; all we can do is look at the clock again.
    async fn resync(&self) -> Result<Option<LocalTime>, AcCtlError> {
        let now = self.now();
        match now {
            Some(now) => tracing::info!(%now, "system clock synchronized"),
            None => tracing::warn!("system clock not set yet"),
        }
        Ok(now)
    }
}
