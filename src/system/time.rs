//! Time keeping module for PineTime
//!
//! The wall clock is a reference time plus the uptime elapsed since the
//! reference was taken.

use chrono::{Duration, NaiveDateTime};
use embassy_time::Instant;

pub struct Clock {
    /// Local time at `instant`
    reference: NaiveDateTime,
    /// Uptime when the reference was set
    instant: Instant,
}

impl Clock {
    /// Clock at the Unix epoch, to be set on boot
    pub const fn new() -> Self {
        Self {
            reference: NaiveDateTime::UNIX_EPOCH,
            instant: Instant::from_ticks(0),
        }
    }

    /// Current local time
    pub fn now(&self) -> NaiveDateTime {
        let elapsed = Instant::now().duration_since(self.instant).as_micros() as i64;
        self.reference
            .checked_add_signed(Duration::microseconds(elapsed))
            .unwrap_or(self.reference)
    }

    /// Set the local time
    pub fn set(&mut self, time: NaiveDateTime) {
        self.reference = time;
        self.instant = Instant::now();
    }
}
