//! Status register decoding
//!
//! `STATUS1` (0x18) carries four flags in its upper nibble:
//! `OTP_read_done` (4), `Sat_sensor` (5), `Meas_m_done` (6), `Meas_t_done` (7).

/// First flag bit in `STATUS1`
const STATUS_FIRST_BIT: u8 = 4;

/// Extract `N` consecutive bits of `source` starting at `first_bit`
///
/// Element 0 of the result is bit `first_bit`, element 1 the next higher bit,
/// and so on.
#[must_use]
pub const fn bit_tuple<const N: usize>(source: u8, first_bit: u8) -> [bool; N] {
    let mut bits = [false; N];
    let mut i = 0;
    while i < N {
        bits[i] = (source & (1 << (first_bit as usize + i))) != 0;
        i += 1;
    }
    bits
}

/// Decoded `STATUS1` flags
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[allow(clippy::struct_excessive_bools)]
pub struct StatusFlags {
    /// OTP memory read after power-up
    pub otp_read_done: bool,
    /// Self-test found the sensor saturated
    pub sensor_saturated: bool,
    /// Magnetic measurement done, data ready
    pub meas_m_done: bool,
    /// Temperature measurement done
    pub meas_t_done: bool,
}

impl StatusFlags {
    /// Decode from the raw `STATUS1` byte
    #[must_use]
    pub const fn from_bits(status: u8) -> Self {
        let [otp_read_done, sensor_saturated, meas_m_done, meas_t_done] =
            bit_tuple::<4>(status, STATUS_FIRST_BIT);
        Self {
            otp_read_done,
            sensor_saturated,
            meas_m_done,
            meas_t_done,
        }
    }
}
