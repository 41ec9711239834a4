//! Output data rate and bandwidth selection
//!
//! The MMC5603 bandwidth selector sets the decimation filter length, which in
//! turn limits how fast the sensor can be updated. Auto set/reset adds a coil
//! pulse to every measurement and lowers the limits of the two shortest filters.

use crate::InvalidParameter;

/// Update rate that selects the 1000 Hz high-power mode
pub const HIGH_POWER_UPDATE_RATE: u16 = 1000;

/// ODR register value used in high-power mode
const HIGH_POWER_ODR: u8 = 255;

/// Decimation filter bandwidth
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Bandwidth {
    /// 6.6 ms measurement time
    #[default]
    Bw0 = 0,
    /// 3.5 ms measurement time
    Bw1 = 1,
    /// 2.0 ms measurement time
    Bw2 = 2,
    /// 1.2 ms measurement time
    Bw3 = 3,
}

impl Bandwidth {
    /// All bandwidth settings, narrowest filter first
    pub const ALL: [Self; 4] = [Self::Bw0, Self::Bw1, Self::Bw2, Self::Bw3];

    /// Register field value
    #[must_use]
    pub const fn bits(self) -> u8 {
        self as u8
    }

    /// Measurement time for all three axes in microseconds
    #[must_use]
    pub const fn measurement_time_us(self) -> u32 {
        match self {
            Self::Bw0 => 6_600,
            Self::Bw1 => 3_500,
            Self::Bw2 => 2_000,
            Self::Bw3 => 1_200,
        }
    }

    /// Inclusive update rate limits (Hz) for this bandwidth
    #[must_use]
    pub const fn update_rate_limits(self, auto_set_reset: bool) -> (u8, u8) {
        match (self, auto_set_reset) {
            (Self::Bw0, true) => (1, 75),
            (Self::Bw0, false) => (1, 150),
            (Self::Bw1, true) => (1, 50),
            (Self::Bw1, false) | (Self::Bw2 | Self::Bw3, _) => (1, 255),
        }
    }
}

impl TryFrom<u8> for Bandwidth {
    type Error = InvalidParameter;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Bw0),
            1 => Ok(Self::Bw1),
            2 => Ok(Self::Bw2),
            3 => Ok(Self::Bw3),
            _ => Err(InvalidParameter::Bandwidth(value)),
        }
    }
}

/// Register-level settings derived from a requested update rate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RateSetting {
    /// Filter bandwidth
    pub bandwidth: Bandwidth,
    /// Value for the ODR register
    pub odr: u8,
    /// High-power (1000 Hz) mode
    pub hi_power: bool,
}

/// Resolve a requested update rate into bandwidth, ODR and high-power mode
///
/// Rates 1..=255 pick the first (narrowest) bandwidth whose limits contain the
/// rate. [`HIGH_POWER_UPDATE_RATE`] resolves to bandwidth 3, ODR 255 with
/// high-power mode enabled.
///
/// # Errors
///
/// Returns [`InvalidParameter::UpdateRate`] for any other rate.
pub fn resolve_update_rate(
    update_rate: u16,
    auto_set_reset: bool,
) -> Result<RateSetting, InvalidParameter> {
    if update_rate == HIGH_POWER_UPDATE_RATE {
        return Ok(RateSetting {
            bandwidth: Bandwidth::Bw3,
            odr: HIGH_POWER_ODR,
            hi_power: true,
        });
    }

    let odr = u8::try_from(update_rate)
        .ok()
        .filter(|&rate| rate != 0)
        .ok_or(InvalidParameter::UpdateRate(update_rate))?;

    Bandwidth::ALL
        .into_iter()
        .find(|bandwidth| {
            let (lo, hi) = bandwidth.update_rate_limits(auto_set_reset);
            (lo..=hi).contains(&odr)
        })
        .map(|bandwidth| RateSetting {
            bandwidth,
            odr,
            hi_power: false,
        })
        .ok_or(InvalidParameter::UpdateRate(update_rate))
}
