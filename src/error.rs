//! Error types for the trainer and its devices.

use thiserror::Error;

/// Result type alias for trainer operations
pub type Result<T> = core::result::Result<T, Error>;

/// Peripherals that must come up before the control loop starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Device {
    /// Shared I2C bus; nothing answered the address scan
    Bus,
    /// SSD1306 weight/status panel
    Panel,
}

/// Errors raised by the control loop or its devices.
///
/// Numeric code never fails; everything here comes from the device boundary
/// or from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// A device did not respond during bring-up. Fatal.
    #[error("device failed to initialize: {0:?}")]
    DeviceInit(Device),

    /// Drawing or flushing the panel failed
    #[error("display write failed")]
    Display,

    /// Reading key edges failed
    #[error("keypad read failed")]
    Keypad,

    /// Sampling the teach buttons failed
    #[error("button read failed")]
    Buttons,

    /// Configuration rejected by [`Config::validate`](crate::Config::validate)
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
}
