//! Watchface configuration
//!
//! Build-time values come from `build.rs`, the screen shape from the
//! `round-display` cargo feature. [`Settings`] holds the preferences that can
//! be changed at runtime over Bluetooth.

use crate::ui::layout::ScreenShape;

// Build epoch and UTC offset, generated by build.rs
include!(concat!(env!("OUT_DIR"), "/build_info.rs"));

/// Shape of the panel this firmware is built for
#[cfg(not(feature = "round-display"))]
pub const SCREEN_SHAPE: ScreenShape = ScreenShape::Rect;
/// Shape of the panel this firmware is built for
#[cfg(feature = "round-display")]
pub const SCREEN_SHAPE: ScreenShape = ScreenShape::Round;

/// Name used for BLE advertising and the GAP device name
pub const DEVICE_NAME: &str = "PineTime";

/// Backlight level after boot (0–7)
pub const BACKLIGHT_LEVEL: u8 = 2;

/// Seconds between two battery measurements
pub const BATTERY_POLL_SECS: u64 = 5;

/// Runtime preferences of the watchface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Settings {
    /// Show the time in 24-hour format instead of 12-hour with AM/PM
    pub clock_24h: bool,
    /// Blink a block cursor after the last line
    pub blink_cursor: bool,
    /// Vibrate when the phone disconnects
    pub vibrate_on_disconnect: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            clock_24h: true,
            blink_cursor: true,
            vibrate_on_disconnect: true,
        }
    }
}

impl Settings {
    /// Settings as single byte flags, as exposed over GATT
    pub fn to_bytes(&self) -> [u8; 3] {
        [
            self.clock_24h as u8,
            self.blink_cursor as u8,
            self.vibrate_on_disconnect as u8,
        ]
    }

    /// Build settings from GATT flags. Any non-zero byte is `true`.
    pub fn from_bytes(bytes: [u8; 3]) -> Self {
        Self {
            clock_24h: bytes[0] != 0,
            blink_cursor: bytes[1] != 0,
            vibrate_on_disconnect: bytes[2] != 0,
        }
    }
}
