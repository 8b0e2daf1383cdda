//! Terminal style watchface for the PineTime.
//!
//! This library contains the watchface logic that does not depend on the
//! nRF52832 peripherals: text formatting, layout, the window lifecycle and
//! the event handlers. The firmware binary (`main.rs`) provides the host
//! runtime (display, clock, battery and Bluetooth) and feeds events into
//! [`app::App`].
//!
//! Run the tests on the host with `cargo test`.

// Tests need std for the test harness
#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

// Must come first so the logging macros are visible in the other modules
#[macro_use]
mod fmt;

pub mod app;
pub mod battery;
pub mod config;
pub mod connection;
pub mod inbox;
pub mod time;
pub mod ui;
pub mod window;

pub use app::{Action, App, Event, Services};
pub use inbox::Inbox;
