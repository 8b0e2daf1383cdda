//! Battery model
//!
//! Conversion of raw SAADC samples into a charge percentage. Implementation based upon
//! https://github.com/dbrgn/pinetime-rtic/blob/master/pinetime-rtic/src/battery.rs
//! and https://wiki.pine64.org/wiki/PineTime.

/// Battery state as reported to the watchface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BatteryInfo {
    /// Battery percentage (0–100)
    pub percent: u8,
    /// Charging state
    pub charging: bool,
}

impl BatteryInfo {
    /// Create battery info, clamping the percentage to 100
    pub fn new(percent: u8, charging: bool) -> Self {
        Self {
            percent: percent.min(100),
            charging,
        }
    }
}

/// Convert an ADC measurement into a battery voltage in millivolts.
///
/// The SAADC runs at 12 bit resolution, so valid samples are `0..=4095`.
pub fn millivolts_from_adc(raw_measurement: i16) -> Result<u16, Error> {
    match raw_measurement {
        0..=4095 => {
            // keep as 32 bit for multiplication
            let adc_val = raw_measurement as u32;
            // multiply the ADC value by 2 * 1000 for mV and divide by (2 ^ 12 / 3.3V reference)
            Ok((adc_val * 2000 / 1241) as u16)
        }
        _ => Err(Error::InvalidMeasurement),
    }
}

/// Estimate the battery capacity in percent from its voltage.
///
/// Uses fixed data points and linear interpolation in between.
pub fn percent_from_millivolts(voltage: u16) -> u8 {
    (match voltage {
        0..=3449 => 0,
        3450..=3699 => (voltage - 3450) / 5,
        3700..=4199 => 50 + (voltage - 3700) / 10,
        _ => 100,
    }) as u8
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    InvalidMeasurement,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_is_clamped() {
        assert_eq!(BatteryInfo::new(150, false).percent, 100);
        assert_eq!(BatteryInfo::new(42, true), BatteryInfo { percent: 42, charging: true });
    }

    #[test]
    fn adc_conversion_uses_divider_and_reference() {
        assert_eq!(millivolts_from_adc(0), Ok(0));
        // Full scale is 2 * 3.3 V
        assert_eq!(millivolts_from_adc(4095), Ok(6599));
        assert_eq!(millivolts_from_adc(2482), Ok(4000));
    }

    #[test]
    fn adc_rejects_out_of_range_samples() {
        assert_eq!(millivolts_from_adc(-1), Err(Error::InvalidMeasurement));
        assert_eq!(millivolts_from_adc(4096), Err(Error::InvalidMeasurement));
    }

    #[test]
    fn discharge_curve_breakpoints() {
        assert_eq!(percent_from_millivolts(3000), 0);
        assert_eq!(percent_from_millivolts(3449), 0);
        assert_eq!(percent_from_millivolts(3450), 0);
        assert_eq!(percent_from_millivolts(3575), 25);
        assert_eq!(percent_from_millivolts(3700), 50);
        assert_eq!(percent_from_millivolts(4000), 80);
        assert_eq!(percent_from_millivolts(4199), 99);
        assert_eq!(percent_from_millivolts(4200), 100);
        assert_eq!(percent_from_millivolts(u16::MAX), 100);
    }

    #[test]
    fn discharge_curve_is_monotonic() {
        let mut last = 0;
        for mv in 3000..4400 {
            let percent = percent_from_millivolts(mv);
            assert!(percent >= last, "{mv} mV dropped to {percent}%");
            last = percent;
        }
    }
}
