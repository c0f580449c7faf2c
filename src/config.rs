//! Runtime configuration.
//!
//! Board wiring (pins, I2C address, bus speed) stays in the firmware; this is
//! only what the control loop itself needs to know.

use crate::error::{Error, Result};

/// Largest number of decimal places the rate editor can address.
pub const MAX_RATE_DIGITS: u8 = 6;

/// Control loop configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// Control cycles per second. 20 Hz gives a 50 ms cycle.
    pub tick_hz: u32,
    /// Learning rate at power-up.
    pub initial_rate: f32,
    /// Decimal places shown and editable in the rate menu.
    pub rate_digits: u8,
    /// Initial weights are drawn uniformly from `[-span, span)` hundredths.
    pub weight_init_span: i32,
}

impl Config {
    pub const DEFAULT: Self = Self {
        tick_hz: 20,
        initial_rate: 0.002,
        rate_digits: 4,
        weight_init_span: 100,
    };

    /// Reject values the control loop cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.tick_hz == 0 {
            return Err(Error::InvalidConfig("tick_hz must be non-zero"));
        }
        if self.rate_digits == 0 || self.rate_digits > MAX_RATE_DIGITS {
            return Err(Error::InvalidConfig("rate_digits must be in 1..=6"));
        }
        if !self.initial_rate.is_finite() || !(0.0..1.0).contains(&self.initial_rate) {
            return Err(Error::InvalidConfig("initial_rate must be in [0, 1)"));
        }
        if self.weight_init_span <= 0 {
            return Err(Error::InvalidConfig("weight_init_span must be positive"));
        }
        Ok(())
    }

    /// Cycle period in milliseconds.
    pub fn tick_ms(&self) -> u32 {
        1000 / self.tick_hz.max(1)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_fifty_ms_cycle() {
        let config = Config::default();
        assert_eq!(config.tick_ms(), 50);
        assert_eq!(config.initial_rate, 0.002);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_zero_tick() {
        let config = Config { tick_hz: 0, ..Config::DEFAULT };
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn rejects_out_of_range_digits() {
        for digits in [0, MAX_RATE_DIGITS + 1] {
            let config = Config { rate_digits: digits, ..Config::DEFAULT };
            assert!(config.validate().is_err(), "digits = {digits}");
        }
    }

    #[test]
    fn rejects_bad_rate() {
        let nan = Config { initial_rate: f32::NAN, ..Config::DEFAULT };
        let negative = Config { initial_rate: -0.1, ..Config::DEFAULT };
        assert!(nan.validate().is_err());
        assert!(negative.validate().is_err());
    }

    #[test]
    fn rejects_rate_the_editor_cannot_show() {
        let one = Config { initial_rate: 1.0, ..Config::DEFAULT };
        let largest = Config { initial_rate: 0.9999, ..Config::DEFAULT };
        assert!(matches!(one.validate(), Err(Error::InvalidConfig(_))));
        assert!(largest.validate().is_ok());
    }
}
