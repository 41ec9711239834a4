//! Magnetometer sample types and raw data decoding
//!
//! Each axis is a 20-bit unsigned value with a mid-scale offset. The two high
//! bytes live in `Xout0/Xout1`, `Yout0/Yout1`, `Zout0/Zout1` (0x00-0x05) and the
//! low nibble in the high half of `Xout2`, `Yout2`, `Zout2` (0x06-0x08).

use crate::config::Axis;

/// Mid-scale offset of the unsigned 20-bit output (2^19)
pub const ZERO_FIELD_OFFSET: i32 = 524_288;

/// Sensitivity in 20-bit mode: 0.0625 mG/LSB = 160 LSB/µT
pub const COUNTS_PER_MICROTESLA: f32 = 160.0;

/// Magnetometer data (signed 20-bit counts)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MagData {
    /// X-axis magnetic field (raw)
    pub x: i32,
    /// Y-axis magnetic field (raw)
    pub y: i32,
    /// Z-axis magnetic field (raw)
    pub z: i32,
}

impl MagData {
    /// Decode all three axes from the 9-byte `Xout0..=Zout2` block
    #[must_use]
    pub fn from_block(block: &[u8; 9]) -> Self {
        let axis = |axis: Axis| {
            let (primary, trailing) = axis_register_addresses(axis);
            let primary = usize::from(primary);
            decode_raw([
                block[primary],
                block[primary + 1],
                block[usize::from(trailing)],
            ])
        };

        Self {
            x: axis(Axis::X),
            y: axis(Axis::Y),
            z: axis(Axis::Z),
        }
    }

    /// Value for a single axis
    #[must_use]
    pub const fn axis(&self, axis: Axis) -> i32 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    /// Values as `[x, y, z]`
    #[must_use]
    pub const fn to_array(&self) -> [i32; 3] {
        [self.x, self.y, self.z]
    }

    /// Convert to microteslas
    #[must_use]
    pub fn to_microtesla(&self) -> MagDataUT {
        MagDataUT {
            x: self.x as f32 / COUNTS_PER_MICROTESLA,
            y: self.y as f32 / COUNTS_PER_MICROTESLA,
            z: self.z as f32 / COUNTS_PER_MICROTESLA,
        }
    }
}

/// Magnetometer data in microteslas (µT)
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MagDataUT {
    /// X-axis magnetic field in µT
    pub x: f32,
    /// Y-axis magnetic field in µT
    pub y: f32,
    /// Z-axis magnetic field in µT
    pub z: f32,
}

impl MagDataUT {
    /// Calculate the magnitude of the magnetic field vector
    ///
    /// Returns the magnitude in µT.
    #[must_use]
    pub fn magnitude(&self) -> f32 {
        libm::sqrtf(self.x * self.x + self.y * self.y + self.z * self.z)
    }
}

/// Convert one packed 3-byte axis sample to signed counts
///
/// `bytes` is `[out0, out1, out2]` for the axis; only the high nibble of `out2`
/// carries data.
#[must_use]
pub const fn decode_raw(bytes: [u8; 3]) -> i32 {
    let raw = ((bytes[0] as i32) << 12) | ((bytes[1] as i32) << 4) | ((bytes[2] as i32) >> 4);
    raw - ZERO_FIELD_OFFSET
}

/// Register addresses for one axis: (`out0` of the two-byte pair, `out2`)
#[must_use]
pub const fn axis_register_addresses(axis: Axis) -> (u8, u8) {
    let index = axis.index();
    (index * 2, 6 + index)
}
