//! Vibration motor
//!
//! Implementation based upon https://wiki.pine64.org/wiki/PineTime.

use embassy_nrf::{gpio::Output, peripherals::P0_16};
use embassy_time::Timer;
use pinetime_termface::app::PulseLength;

pub struct Vibrator {
    /// Motor enable pin (inverted)
    pin_enable: Output<'static, P0_16>,
}

impl Vibrator {
    /// Configure vibrator on boot, motor off
    pub fn init(mut enable_pin: Output<'static, P0_16>) -> Self {
        enable_pin.set_high();
        Self {
            pin_enable: enable_pin,
        }
    }

    /// Pulse the vibrator for the set amount of times and
    /// the specified pulse length.
    pub async fn pulse(&mut self, length: PulseLength, times: Option<u8>) {
        let count = times.unwrap_or(1);
        for i in 0..count {
            self.pin_enable.set_low();
            Timer::after_millis(length as u64).await;
            self.pin_enable.set_high();

            // Pause between pulses
            if i + 1 < count {
                Timer::after_millis(length as u64).await;
            }
        }
    }
}
