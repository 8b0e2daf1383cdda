//! Time keeping helpers
//!
//! Pure parts of the clock: decoding Current Time Service values, deriving the
//! local time from an epoch and firing the minute tick.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

/// Length of the Current Time characteristic value
pub const CTS_LEN: usize = 10;

/// Local wall-clock time for a UTC epoch and offset in seconds.
///
/// Falls back to the Unix epoch for timestamps chrono cannot represent.
pub fn local_from_epoch(epoch: i64, utc_offset_secs: i32) -> NaiveDateTime {
    DateTime::from_timestamp(epoch, 0)
        .and_then(|utc| {
            utc.naive_utc()
                .checked_add_signed(Duration::seconds(utc_offset_secs as i64))
        })
        .unwrap_or(NaiveDateTime::UNIX_EPOCH)
}

/// Decode a Bluetooth Current Time Service `Current Time` value.
///
/// Layout: year (u16 LE), month, day, hours, minutes, seconds, day of week,
/// fractions256, adjust reason.
pub fn parse_cts(bytes: &[u8]) -> Result<NaiveDateTime, Error> {
    if bytes.len() < CTS_LEN {
        return Err(Error::InvalidLength);
    }

    let year = u16::from_le_bytes([bytes[0], bytes[1]]) as i32;
    let month = bytes[2] as u32;
    let day = bytes[3] as u32;
    let hour = bytes[4] as u32;
    let minute = bytes[5] as u32;
    let second = bytes[6] as u32;
    // bytes[7] is the day of week, which chrono derives itself
    // Convert fractions_256 to milliseconds
    let milli = bytes[8] as u32 * 1000 / 256;

    let date = NaiveDate::from_ymd_opt(year, month, day).ok_or(Error::InvalidDate)?;
    let time =
        NaiveTime::from_hms_milli_opt(hour, minute, second, milli).ok_or(Error::InvalidTime)?;

    Ok(NaiveDateTime::new(date, time))
}

/// Emits one tick per wall-clock minute
#[derive(Debug, Default)]
pub struct MinuteTicker {
    last: Option<(NaiveDate, u32, u32)>,
}

impl MinuteTicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return `Some(now)` the first time a new minute is observed.
    ///
    /// The first poll always ticks. Setting the clock backwards ticks as well,
    /// since the displayed minute changes.
    pub fn poll(&mut self, now: NaiveDateTime) -> Option<NaiveDateTime> {
        let key = (now.date(), now.hour(), now.minute());
        if self.last == Some(key) {
            return None;
        }
        self.last = Some(key);
        Some(now)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    InvalidLength,
    InvalidDate,
    InvalidTime,
}
