//! Sensor data types and conversions for the MMC5603
//!
//! - Rate/bandwidth resolution for the output data rate
//! - Magnetometer (3-axis, 20-bit) sample decoding
//! - Temperature conversion
//!
//! All bus operations are performed through methods on `Mmc5603Driver`.

pub mod magnetometer;
pub mod rate;
pub mod temperature;

// Re-export main types
pub use magnetometer::{MagData, MagDataUT, axis_register_addresses, decode_raw};
pub use rate::{Bandwidth, RateSetting, resolve_update_rate};
pub use temperature::{DEFAULT_TEMPERATURE_COEFFICIENT, temperature_to_celsius};
