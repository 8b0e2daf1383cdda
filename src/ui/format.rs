//! Text shown by the watchface
//!
//! Every function formats into a caller provided buffer of fixed capacity and
//! fails with [`fmt::Error`] instead of writing past it.

use chrono::{Datelike, NaiveDateTime, Timelike};
use core::fmt;

use crate::battery::BatteryInfo;

/// Shell prompt in front of every command line
pub const PROMPT: &str = "root@PC:/$";

/// Capacity of the clock line, e.g. `Thu Mar 24 01:46 PM`
pub const CLOCK_LEN: usize = 20;
/// Capacity of the time region text
pub const TIME_LEN: usize = 50;
/// Capacity of the battery value, e.g. `100%`
pub const BATTERY_VALUE_LEN: usize = 5;
/// Capacity of the battery region text
pub const BATTERY_LEN: usize = 35;
/// Capacity of the connection region text
pub const CONNECTION_LEN: usize = 16;

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Text of the connection region
pub fn connection_text(connected: bool) -> &'static str {
    if connected {
        "connected: yes"
    } else {
        "connected: no"
    }
}

/// Battery value: `N/A` while charging, the percentage otherwise
pub fn battery_value(info: BatteryInfo, buf: &mut [u8]) -> Result<&str, fmt::Error> {
    if info.charging {
        format_no_std::show(buf, format_args!("N/A"))
    } else {
        format_no_std::show(buf, format_args!("{}%", info.percent))
    }
}

/// Text of the battery region
pub fn battery_text(info: BatteryInfo, buf: &mut [u8]) -> Result<&str, fmt::Error> {
    let mut value_buf = [0u8; BATTERY_VALUE_LEN];
    let value = battery_value(info, &mut value_buf)?;

    format_no_std::show(buf, format_args!("{PROMPT} info\nbattery:   {value}"))
}

/// Clock line, `Thu Mar 24 01:46` or `Thu Mar 24 01:46 AM`
pub fn clock_text(time: NaiveDateTime, clock_24h: bool, buf: &mut [u8]) -> Result<&str, fmt::Error> {
    let weekday = time.weekday();
    let month = MONTHS[time.month0() as usize];

    if clock_24h {
        format_no_std::show(
            buf,
            format_args!(
                "{} {} {:>2} {:02}:{:02}",
                weekday,
                month,
                time.day(),
                time.hour(),
                time.minute()
            ),
        )
    } else {
        let (pm, hour) = time.hour12();
        format_no_std::show(
            buf,
            format_args!(
                "{} {} {:>2} {:02}:{:02} {}",
                weekday,
                month,
                time.day(),
                hour,
                time.minute(),
                if pm { "PM" } else { "AM" }
            ),
        )
    }
}

/// Text of the time region
pub fn time_text(time: NaiveDateTime, clock_24h: bool, buf: &mut [u8]) -> Result<&str, fmt::Error> {
    let mut clock_buf = [0u8; CLOCK_LEN];
    let clock = clock_text(time, clock_24h, &mut clock_buf)?;

    format_no_std::show(buf, format_args!("{PROMPT} date\n{clock}"))
}
