//! Driver-side configuration mirror
//!
//! Most MMC5603 control bits are write-only triggers, so the chip cannot be
//! asked what it was configured with. [`DeviceConfig`] is the driver's record
//! of the desired configuration and is written out in full by
//! `Mmc5603Driver::start_measure`.
//!
//! # Example
//!
//! ```
//! use mmc5603::{AxisSelection, Bandwidth, DeviceConfig};
//!
//! let mut config = DeviceConfig::default();
//! config.set_axis_selection("xz".parse::<AxisSelection>().unwrap());
//! config.set_update_rate(100).unwrap();
//!
//! // 100 Hz is above the Bw0/Bw1 limits with auto set/reset enabled
//! assert_eq!(config.bandwidth(), Bandwidth::Bw2);
//! assert!(config.axis_inhibit().y);
//! ```

use core::str::FromStr;

use crate::InvalidParameter;
use crate::sensors::rate::{Bandwidth, RateSetting, resolve_update_rate};

/// Measurement axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Axis {
    /// X axis
    X = 0,
    /// Y axis
    Y = 1,
    /// Z axis
    Z = 2,
}

impl Axis {
    /// All axes in register order
    pub const ALL: [Self; 3] = [Self::X, Self::Y, Self::Z];

    /// Axis index (0 = X, 1 = Y, 2 = Z)
    #[must_use]
    pub const fn index(self) -> u8 {
        self as u8
    }
}

/// Set of axes measured after `start_measure`
///
/// Parsed from strings such as `"xyz"`, `"xy"` or `"z"` (case-insensitive,
/// repeated letters are ignored).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AxisSelection {
    /// Measure the X axis
    pub x: bool,
    /// Measure the Y axis
    pub y: bool,
    /// Measure the Z axis
    pub z: bool,
}

impl AxisSelection {
    /// All three axes
    pub const XYZ: Self = Self {
        x: true,
        y: true,
        z: true,
    };

    /// Whether `axis` is selected
    #[must_use]
    pub const fn contains(&self, axis: Axis) -> bool {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    /// Number of selected axes
    #[must_use]
    pub const fn count(&self) -> u32 {
        self.x as u32 + self.y as u32 + self.z as u32
    }

    /// Channel inhibit bits for `INTERNAL_CONTROL_1`
    #[must_use]
    pub const fn inhibit(&self) -> AxisInhibit {
        AxisInhibit {
            x: !self.x,
            y: !self.y,
            z: !self.z,
        }
    }
}

impl Default for AxisSelection {
    fn default() -> Self {
        Self::XYZ
    }
}

impl FromStr for AxisSelection {
    type Err = InvalidParameter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut selection = Self {
            x: false,
            y: false,
            z: false,
        };
        for c in s.chars() {
            match c.to_ascii_lowercase() {
                'x' => selection.x = true,
                'y' => selection.y = true,
                'z' => selection.z = true,
                _ => return Err(InvalidParameter::AxisSelection),
            }
        }
        if selection.count() == 0 {
            return Err(InvalidParameter::AxisSelection);
        }
        Ok(selection)
    }
}

/// Channel inhibit bits, the complement of an [`AxisSelection`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AxisInhibit {
    /// X channel disabled
    pub x: bool,
    /// Y channel disabled
    pub y: bool,
    /// Z channel disabled
    pub z: bool,
}

/// Number of measurements between automatic SET pulses in continuous mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SetExecutePeriod(u8);

impl SetExecutePeriod {
    /// Datasheet recommendation: one SET every 25 measurements
    pub const RECOMMENDED: Self = Self(1);

    /// Create from the 3-bit `prd_set` field value
    ///
    /// # Errors
    ///
    /// Returns [`InvalidParameter::SetExecutePeriod`] for values above 7.
    pub const fn new(bits: u8) -> Result<Self, InvalidParameter> {
        if bits > 7 {
            return Err(InvalidParameter::SetExecutePeriod(bits));
        }
        Ok(Self(bits))
    }

    /// Register field value (0..=7)
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Number of measurements per SET pulse
    #[must_use]
    pub const fn measurements(self) -> u16 {
        match self.0 {
            0 => 1,
            1 => 25,
            2 => 75,
            3 => 100,
            4 => 250,
            5 => 500,
            6 => 1000,
            _ => 2000,
        }
    }
}

impl Default for SetExecutePeriod {
    fn default() -> Self {
        Self::RECOMMENDED
    }
}

impl TryFrom<u8> for SetExecutePeriod {
    type Error = InvalidParameter;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Driver view of the sensor configuration
///
/// Bandwidth, ODR register value and high-power mode are always derived from
/// the requested update rate and the auto set/reset flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceConfig {
    axis_selection: AxisSelection,
    update_rate: u16,
    rate: RateSetting,
    auto_set_reset: bool,
    periodic_set: bool,
    set_execute_period: SetExecutePeriod,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            axis_selection: AxisSelection::XYZ,
            update_rate: 10,
            rate: RateSetting {
                bandwidth: Bandwidth::Bw0,
                odr: 10,
                hi_power: false,
            },
            auto_set_reset: true,
            periodic_set: true,
            set_execute_period: SetExecutePeriod::RECOMMENDED,
        }
    }
}

impl DeviceConfig {
    /// Axes measured after `start_measure`
    #[must_use]
    pub const fn axis_selection(&self) -> AxisSelection {
        self.axis_selection
    }

    /// Select the measured axes
    pub fn set_axis_selection(&mut self, selection: AxisSelection) {
        self.axis_selection = selection;
    }

    /// Inhibit bits for the current axis selection
    #[must_use]
    pub const fn axis_inhibit(&self) -> AxisInhibit {
        self.axis_selection.inhibit()
    }

    /// Requested update rate in Hz (1000 in high-power mode)
    #[must_use]
    pub const fn update_rate(&self) -> u16 {
        self.update_rate
    }

    /// Set the update rate and re-derive bandwidth, ODR and high-power mode
    ///
    /// The configuration is left unchanged on error.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidParameter::UpdateRate`] unless the rate is 1..=255 or 1000.
    pub fn set_update_rate(&mut self, update_rate: u16) -> Result<(), InvalidParameter> {
        self.rate = resolve_update_rate(update_rate, self.auto_set_reset)?;
        self.update_rate = update_rate;
        Ok(())
    }

    /// Derived register settings
    #[must_use]
    pub const fn rate_setting(&self) -> RateSetting {
        self.rate
    }

    /// Derived bandwidth
    #[must_use]
    pub const fn bandwidth(&self) -> Bandwidth {
        self.rate.bandwidth
    }

    /// Derived high-power (1000 Hz) mode
    #[must_use]
    pub const fn hi_power(&self) -> bool {
        self.rate.hi_power
    }

    /// Automatic SET/RESET before each measurement
    #[must_use]
    pub const fn auto_set_reset(&self) -> bool {
        self.auto_set_reset
    }

    /// Enable or disable automatic SET/RESET
    ///
    /// The bandwidth limits depend on this flag, so the rate setting is
    /// re-derived.
    pub fn set_auto_set_reset(&mut self, enable: bool) {
        self.auto_set_reset = enable;
        // update_rate was validated when stored, so it always resolves
        if let Ok(rate) = resolve_update_rate(self.update_rate, enable) {
            self.rate = rate;
        }
    }

    /// Periodic SET in continuous mode (`en_prd_set`)
    #[must_use]
    pub const fn periodic_set(&self) -> bool {
        self.periodic_set
    }

    /// Enable or disable periodic SET in continuous mode
    pub fn set_periodic_set(&mut self, enable: bool) {
        self.periodic_set = enable;
    }

    /// Measurements between periodic SET pulses
    #[must_use]
    pub const fn set_execute_period(&self) -> SetExecutePeriod {
        self.set_execute_period
    }

    /// Set the number of measurements between periodic SET pulses
    pub fn set_set_execute_period(&mut self, period: SetExecutePeriod) {
        self.set_execute_period = period;
    }

    /// Time between continuous-mode samples in milliseconds, rounded up
    ///
    /// 1 ms in high-power mode.
    #[must_use]
    pub const fn sample_period_ms(&self) -> u32 {
        // update_rate is validated nonzero when stored
        1000_u32.div_ceil(self.update_rate as u32)
    }

    /// Time for one measurement cycle over the selected axes, in microseconds
    ///
    /// Each axis takes a third of the bandwidth's full measurement time.
    #[must_use]
    pub const fn conversion_cycle_time_us(&self) -> u32 {
        333 * self.axis_selection.count() * self.rate.bandwidth.measurement_time_us() / 1000
    }
}
