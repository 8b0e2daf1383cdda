//! Battery status check
//!
//! Implementation based upon https://github.com/dbrgn/pinetime-rtic/blob/master/pinetime-rtic/src/battery.rs
//! and https://wiki.pine64.org/wiki/PineTime.

use embassy_nrf::{gpio::Input, peripherals::P0_12, saadc::Saadc};
use pinetime_termface::battery::{self, BatteryInfo};

pub use pinetime_termface::battery::Error;

/// Battery API
pub struct Battery {
    /// ADC instance for battery voltage measurement
    adc: Saadc<'static, 1>,
    /// Charge indication pin:
    /// high = battery, low = charging
    pin_charge_indication: Input<'static, P0_12>,
    /// Last measured state
    info: BatteryInfo,
}

impl Battery {
    /// Configure battery and take a first measurement on boot
    pub async fn init(
        adc: Saadc<'static, 1>,
        charge_pin: Input<'static, P0_12>,
    ) -> Result<Self, Error> {
        let mut battery = Self {
            adc,
            pin_charge_indication: charge_pin,
            info: BatteryInfo::default(),
        };
        battery.info = battery.measure().await?;
        Ok(battery)
    }

    /// Charging state of the battery
    pub fn is_charging(&self) -> bool {
        self.pin_charge_indication.is_low()
    }

    /// Return the last measured state.
    ///
    /// To fetch current data, call `update()` first.
    pub fn info(&self) -> BatteryInfo {
        self.info
    }

    /// Update the battery state from the hardware. Return whether it changed.
    pub async fn update(&mut self) -> Result<bool, Error> {
        let info = self.measure().await?;
        let changed = info != self.info;
        self.info = info;
        Ok(changed)
    }

    async fn measure(&mut self) -> Result<BatteryInfo, Error> {
        let voltage = self.voltage().await?;
        Ok(BatteryInfo::new(
            battery::percent_from_millivolts(voltage),
            self.is_charging(),
        ))
    }

    /// Battery voltage in millivolts
    async fn voltage(&mut self) -> Result<u16, Error> {
        let mut buf = [0; 1];
        self.adc.sample(&mut buf).await;
        battery::millivolts_from_adc(buf[0])
    }
}
