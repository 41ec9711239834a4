#![no_std]
#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod config;
pub mod device;
pub mod interface;
pub mod measurement;
pub mod registers;
pub mod sensors;
pub mod status;

// Re-export main types
pub use config::{Axis, AxisInhibit, AxisSelection, DeviceConfig, SetExecutePeriod};
pub use device::Mmc5603Driver;
pub use interface::I2cInterface;
pub use measurement::{ContinuousSamples, MeasurementMode};
pub use self_test::{DEFAULT_DEMAGNETIZE_ON_TIME_US, scale_self_test_threshold};
pub use sensors::{
    Bandwidth, DEFAULT_TEMPERATURE_COEFFICIENT, MagData, MagDataUT, RateSetting,
    resolve_update_rate, temperature_to_celsius,
};
pub use status::StatusFlags;

/// MMC5603 I2C address (fixed, the part has no address select pin)
pub const I2C_ADDRESS: u8 = 0x30;

/// Expected value of the `PRODUCT_ID` register
pub const PRODUCT_ID_VALUE: u8 = 0x10;

/// Time the sensor needs after `soft_reset` before registers can be accessed
pub const SOFT_RESET_DELAY_MS: u32 = 20;

/// Time the sensor needs to compute the measurement period after `cmm_freq_en`
pub const RATE_CALCULATION_DELAY_MS: u32 = 10;

/// Time the automatic self-test needs to complete
pub const SELF_TEST_DELAY_MS: u32 = 20;

/// Driver errors
#[derive(Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// Communication error with the device
    Bus(E),
    /// Invalid `PRODUCT_ID` register value (contains the actual value read)
    InvalidDevice(u8),
    /// A parameter was rejected before anything was written to the device
    InvalidParameter(InvalidParameter),
    /// A measurement-done flag did not come up within the polling window
    Timeout,
}

impl<E> From<E> for Error<E> {
    fn from(error: E) -> Self {
        Self::Bus(error)
    }
}

/// Parameter validation failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InvalidParameter {
    /// Update rate outside 1..=255 and not the 1000 Hz high-power rate
    UpdateRate(u16),
    /// Bandwidth selector outside 0..=3
    Bandwidth(u8),
    /// Axis string empty or containing something other than `x`, `y`, `z`
    AxisSelection,
    /// Device address other than [`I2C_ADDRESS`]
    DeviceAddress(u8),
    /// Set execute period outside 0..=7
    SetExecutePeriod(u8),
}
