//! Temperature conversion
//!
//! The on-chip temperature sensor reports an unsigned byte. 0 is -75 °C and each
//! LSB is nominally 0.8 °C.

/// Nominal temperature sensitivity in °C/LSB
pub const DEFAULT_TEMPERATURE_COEFFICIENT: f32 = 0.8;

/// Temperature at a raw reading of 0
const TEMPERATURE_OFFSET_CELSIUS: f32 = -75.0;

/// Convert a raw temperature reading to degrees Celsius
///
/// `coefficient` is the sensitivity in °C/LSB, normally
/// [`DEFAULT_TEMPERATURE_COEFFICIENT`].
#[must_use]
pub fn temperature_to_celsius(raw: u8, coefficient: f32) -> f32 {
    TEMPERATURE_OFFSET_CELSIUS + coefficient * f32::from(raw)
}
