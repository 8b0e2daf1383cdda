//! UI definitions module
//! Based on: https://github.com/lupyuen/pinetime-watchface/blob/master/src/lib.rs

use chrono::NaiveDateTime;
use core::fmt;
use embedded_graphics::{
    draw_target::DrawTarget,
    pixelcolor::{Rgb565, RgbColor},
};

use crate::battery::BatteryInfo;

pub mod format;
pub mod label;
pub mod layout;
mod terminal_watchface;

pub use label::TextRegion;
pub use layout::{Layout, ScreenShape};
pub use terminal_watchface::TerminalWatchface;

/// Color format of the display
pub type ColorMode = Rgb565;

/// Window and region background
pub const BACKGROUND_COLOR: ColorMode = Rgb565::BLACK;
/// Text color of every region
pub const TEXT_COLOR: ColorMode = Rgb565::WHITE;

pub trait WatchFace: Sized {
    /// Create new watchface with its display regions
    fn new(layout: &Layout) -> Self;

    /// Show the current time
    fn show_time(&mut self, time: NaiveDateTime, clock_24h: bool) -> Result<(), fmt::Error>;

    /// Show the battery state
    fn show_battery(&mut self, info: BatteryInfo) -> Result<(), fmt::Error>;

    /// Show the phone link state
    fn show_connection(&mut self, connected: bool) -> Result<(), fmt::Error>;

    /// Show or hide the blinking cursor
    fn set_cursor(&mut self, visible: bool);

    /// Draw everything that changed since the last call
    fn draw<D>(&mut self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = ColorMode>;
}
