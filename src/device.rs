//! High-level driver API for the MMC5603
//!
//! This module provides a user-friendly interface to the MMC5603 sensor,
//! handling the register write sequences for on-request and continuous
//! measurement, and decoding of the axis and temperature data.

use device_driver::RegisterInterface;
use embedded_hal::delay::DelayNs;

use crate::config::{Axis, AxisSelection, DeviceConfig, SetExecutePeriod};
use crate::measurement::{ContinuousSamples, MeasurementMode};
use crate::registers::{AXIS_DATA_LEN, Mmc5603 as RegisterDevice, STATUS1, XOUT0};
use crate::sensors::{
    Bandwidth, DEFAULT_TEMPERATURE_COEFFICIENT, MagData, axis_register_addresses, decode_raw,
    temperature_to_celsius,
};
use crate::status::StatusFlags;
use crate::{Error, PRODUCT_ID_VALUE, RATE_CALCULATION_DELAY_MS};

/// Maximum number of status polls while waiting for a triggered measurement.
/// Continuous-mode waits add one poll per millisecond of the sample period.
const MAX_STATUS_POLLS: u32 = 10;

/// Interval between status polls
const STATUS_POLL_INTERVAL_MS: u32 = 1;

/// Main driver for the MMC5603
pub struct Mmc5603Driver<I> {
    pub(crate) device: RegisterDevice<I>,
    config: DeviceConfig,
    mode: MeasurementMode,
}

impl<I> Mmc5603Driver<I>
where
    I: RegisterInterface<AddressType = u8>,
{
    /// Create a new MMC5603 driver instance with the default configuration
    ///
    /// This verifies the `PRODUCT_ID` register but does not write anything.
    /// Call [`start_measure`](Self::start_measure) to configure the sensor.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Communication with the device fails
    /// - The `PRODUCT_ID` register contains an unexpected value
    pub fn new(interface: I) -> Result<Self, Error<I::Error>> {
        Self::with_config(interface, DeviceConfig::default())
    }

    /// Create a new driver instance with a prepared configuration
    ///
    /// # Errors
    ///
    /// Same as [`new`](Self::new).
    pub fn with_config(interface: I, config: DeviceConfig) -> Result<Self, Error<I::Error>> {
        let mut driver = Self {
            device: RegisterDevice::new(interface),
            config,
            mode: MeasurementMode::Idle,
        };

        let product_id = driver.read_product_id()?;
        if product_id != PRODUCT_ID_VALUE {
            return Err(Error::InvalidDevice(product_id));
        }

        Ok(driver)
    }

    /// Read the `PRODUCT_ID` register
    ///
    /// Should return 0x10 for a valid MMC5603
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn read_product_id(&mut self) -> Result<u8, Error<I::Error>> {
        let reg = self.device.product_id().read()?;
        Ok(reg.product_id())
    }

    /// Current configuration
    pub const fn config(&self) -> &DeviceConfig {
        &self.config
    }

    /// Replace the configuration
    ///
    /// Takes effect on the next [`start_measure`](Self::start_measure).
    pub fn set_config(&mut self, config: DeviceConfig) {
        self.config = config;
    }

    /// Current measurement mode
    pub const fn mode(&self) -> MeasurementMode {
        self.mode
    }

    /// Whether the sensor was put into continuous mode
    pub const fn is_continuous_mode(&self) -> bool {
        self.mode.is_continuous()
    }

    /// Set the update rate in Hz (1..=255, or 1000 for high-power mode)
    ///
    /// The bandwidth is derived from the rate and the auto set/reset setting.
    /// Takes effect on the next [`start_measure`](Self::start_measure).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] for unsupported rates; the previous
    /// rate is kept.
    pub fn set_update_rate(&mut self, update_rate: u16) -> Result<(), Error<I::Error>> {
        self.config
            .set_update_rate(update_rate)
            .map_err(Error::InvalidParameter)
    }

    /// Configured update rate in Hz (1000 in high-power mode)
    pub const fn update_rate(&self) -> u16 {
        self.config.update_rate()
    }

    /// Bandwidth derived from the update rate
    pub const fn bandwidth(&self) -> Bandwidth {
        self.config.bandwidth()
    }

    /// Select the axes to measure
    pub fn set_axis_selection(&mut self, selection: AxisSelection) {
        self.config.set_axis_selection(selection);
    }

    /// Select the axes to measure from a string such as `"xyz"` or `"xz"`
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] for empty strings or letters other
    /// than `x`, `y`, `z`.
    pub fn set_axis_measurement(&mut self, axes: &str) -> Result<(), Error<I::Error>> {
        let selection = axes.parse().map_err(Error::InvalidParameter)?;
        self.config.set_axis_selection(selection);
        Ok(())
    }

    /// Enable or disable periodic SET in continuous mode
    pub fn set_periodic_set(&mut self, enable: bool) {
        self.config.set_periodic_set(enable);
    }

    /// Set how many measurements run between periodic SET pulses (`prd_set`, 0..=7)
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] for values above 7.
    pub fn set_set_execute_period(&mut self, bits: u8) -> Result<(), Error<I::Error>> {
        let period = SetExecutePeriod::new(bits).map_err(Error::InvalidParameter)?;
        self.config.set_set_execute_period(period);
        Ok(())
    }

    /// Duration of one measurement over the selected axes, in microseconds
    pub const fn conversion_cycle_time_us(&self) -> u32 {
        self.config.conversion_cycle_time_us()
    }

    /// Configure the sensor and start measuring
    ///
    /// With `continuous = false` the sensor is configured for on-request
    /// measurements (see [`read_magnetometer`](Self::read_magnetometer)).
    /// With `continuous = true` it measures on its own at the configured
    /// update rate.
    ///
    /// The write order is fixed by the hardware: the ODR must be written and
    /// the period calculation (`cmm_freq_en`) must have finished before the
    /// mode bits in `INTERNAL_CONTROL_2` are written. This call blocks for
    /// [`RATE_CALCULATION_DELAY_MS`] on `delay`.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails. The mode is
    /// left unchanged in that case.
    pub fn start_measure<D>(
        &mut self,
        delay: &mut D,
        continuous: bool,
        auto_set_reset: bool,
    ) -> Result<(), Error<I::Error>>
    where
        D: DelayNs,
    {
        self.config.set_auto_set_reset(auto_set_reset);

        let rate = self.config.rate_setting();
        let inhibit = self.config.axis_inhibit();
        let periodic_set = self.config.periodic_set();
        let prd_set = self.config.set_execute_period().bits();

        self.device.odr().write(|w| {
            w.set_odr(rate.odr);
        })?;

        // Latch the ODR-derived measurement period, self-clearing
        self.device.control_0().write(|w| {
            w.set_cmm_freq_en(true);
        })?;
        delay.delay_ms(RATE_CALCULATION_DELAY_MS);

        self.device.control_0().write(|w| {
            w.set_auto_sr_en(auto_set_reset);
        })?;

        self.device.control_1().write(|w| {
            w.set_bandwidth(rate.bandwidth.bits());
            w.set_x_inhibit(inhibit.x);
            w.set_y_inhibit(inhibit.y);
            w.set_z_inhibit(inhibit.z);
        })?;

        self.device.control_2().write(|w| {
            w.set_hi_power(rate.hi_power);
            w.set_en_prd_set(periodic_set);
            w.set_cmm_en(continuous);
            w.set_prd_set(prd_set);
        })?;

        self.mode = if continuous {
            MeasurementMode::Continuous
        } else {
            MeasurementMode::OneShot
        };

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "MMC5603 measuring: mode={}, odr={}, bandwidth={}, hi_power={}",
            self.mode,
            rate.odr,
            rate.bandwidth,
            rate.hi_power
        );

        Ok(())
    }

    /// Trigger a single magnetic measurement (`tm_m`)
    ///
    /// Automatic SET/RESET is requested together with the measurement when it
    /// is enabled in the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn trigger_measurement(&mut self) -> Result<(), Error<I::Error>> {
        let auto_set_reset = self.config.auto_set_reset();
        self.device.control_0().write(|w| {
            w.set_tm_m(true);
            w.set_auto_sr_en(auto_set_reset);
        })?;
        Ok(())
    }

    /// Pulse the SET current through the sensing coils (magnetize)
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn do_set(&mut self) -> Result<(), Error<I::Error>> {
        self.device.control_0().write(|w| {
            w.set_do_set(true);
        })?;
        Ok(())
    }

    /// Pulse the RESET current through the sensing coils (demagnetize)
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn do_reset(&mut self) -> Result<(), Error<I::Error>> {
        self.device.control_0().write(|w| {
            w.set_do_reset(true);
        })?;
        Ok(())
    }

    /// Software reset, equivalent to a power cycle
    ///
    /// All registers are cleared and the OTP is reloaded. The mode returns to
    /// [`MeasurementMode::Idle`]; the driver configuration is kept and written
    /// again by the next [`start_measure`](Self::start_measure).
    ///
    /// **Important**: wait [`SOFT_RESET_DELAY_MS`](crate::SOFT_RESET_DELAY_MS)
    /// before the next register access. The driver does not wait on its own.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn soft_reset(&mut self) -> Result<(), Error<I::Error>> {
        self.device.control_1().write(|w| {
            w.set_sw_reset(true);
        })?;
        self.mode = MeasurementMode::Idle;

        #[cfg(feature = "defmt")]
        defmt::debug!("MMC5603 soft reset issued");

        Ok(())
    }

    /// Read and decode the `STATUS1` register
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn read_status(&mut self) -> Result<StatusFlags, Error<I::Error>> {
        let mut status = [0u8; 1];
        self.device.interface.read_register(STATUS1, 8, &mut status)?;
        Ok(StatusFlags::from_bits(status[0]))
    }

    /// Whether a magnetic measurement finished and data is ready
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn read_data_ready(&mut self) -> Result<bool, Error<I::Error>> {
        Ok(self.read_status()?.meas_m_done)
    }

    /// Read a single axis
    ///
    /// Uses two bus transfers: the two high bytes, then the trailing byte
    /// holding the low nibble.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn read_axis(&mut self, axis: Axis) -> Result<i32, Error<I::Error>> {
        let (primary, trailing) = axis_register_addresses(axis);
        let mut bytes = [0u8; 3];
        self.device
            .interface
            .read_register(primary, 16, &mut bytes[..2])?;
        self.device
            .interface
            .read_register(trailing, 8, &mut bytes[2..])?;
        Ok(decode_raw(bytes))
    }

    /// Read all three axes without triggering a measurement
    ///
    /// Reads the full `Xout0..=Zout2` block in one transfer.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn read_magnetometer_raw(&mut self) -> Result<MagData, Error<I::Error>> {
        let mut block = [0u8; AXIS_DATA_LEN];
        self.device
            .interface
            .read_register(XOUT0, 72, &mut block)?;
        Ok(MagData::from_block(&block))
    }

    /// Take one measurement and read all three axes
    ///
    /// Outside continuous mode a measurement is triggered and `delay` waits
    /// for the conversion time first. In continuous mode this only waits for
    /// the next sample, for up to one sample period plus the polling margin.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Timeout`] if the data-ready flag does not come up, or
    /// an error if communication with the device fails.
    pub fn read_magnetometer<D>(&mut self, delay: &mut D) -> Result<MagData, Error<I::Error>>
    where
        D: DelayNs,
    {
        let max_polls = if self.mode.is_continuous() {
            self.config.sample_period_ms() + MAX_STATUS_POLLS
        } else {
            self.trigger_measurement()?;
            delay.delay_us(self.config.conversion_cycle_time_us());
            MAX_STATUS_POLLS
        };
        self.wait_for_status(delay, max_polls, |status| status.meas_m_done)?;
        self.read_magnetometer_raw()
    }

    /// Measure the temperature and return the raw reading
    ///
    /// # Errors
    ///
    /// Returns [`Error::Timeout`] if the measurement does not finish, or an
    /// error if communication with the device fails.
    pub fn read_temperature_raw<D>(&mut self, delay: &mut D) -> Result<u8, Error<I::Error>>
    where
        D: DelayNs,
    {
        self.device.control_0().write(|w| {
            w.set_tm_t(true);
        })?;
        self.wait_for_status(delay, MAX_STATUS_POLLS, |status| status.meas_t_done)?;
        let reg = self.device.tout().read()?;
        Ok(reg.tout())
    }

    /// Measure the temperature in °C using the nominal 0.8 °C/LSB sensitivity
    ///
    /// Use [`read_temperature_raw`](Self::read_temperature_raw) with
    /// [`temperature_to_celsius`] for a calibrated coefficient.
    ///
    /// # Errors
    ///
    /// Same as [`read_temperature_raw`](Self::read_temperature_raw).
    pub fn read_temperature<D>(&mut self, delay: &mut D) -> Result<f32, Error<I::Error>>
    where
        D: DelayNs,
    {
        let raw = self.read_temperature_raw(delay)?;
        Ok(temperature_to_celsius(raw, DEFAULT_TEMPERATURE_COEFFICIENT))
    }

    /// Continuous-mode samples as a lazy iterator
    ///
    /// See [`ContinuousSamples`]. The iterator never ends; restart the sensor
    /// with [`start_measure`](Self::start_measure) to change its settings.
    pub fn continuous_samples(&mut self) -> ContinuousSamples<'_, I> {
        ContinuousSamples::new(self)
    }

    /// One step of the continuous sequence
    ///
    /// Returns `Ok(None)` without touching the bus when not in continuous
    /// mode, `Ok(None)` when no new data is ready, and the sample otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn poll_continuous_sample(&mut self) -> Result<Option<MagData>, Error<I::Error>> {
        if !self.is_continuous_mode() {
            return Ok(None);
        }
        if !self.read_data_ready()? {
            return Ok(None);
        }
        self.read_magnetometer_raw().map(Some)
    }

    /// Consume the driver and return the underlying interface
    pub fn release(self) -> I {
        self.device.interface
    }

    /// Poll `STATUS1` until `done` returns true, at most `max_polls` times
    fn wait_for_status<D, F>(
        &mut self,
        delay: &mut D,
        max_polls: u32,
        done: F,
    ) -> Result<(), Error<I::Error>>
    where
        D: DelayNs,
        F: Fn(&StatusFlags) -> bool,
    {
        for _ in 0..max_polls {
            if done(&self.read_status()?) {
                return Ok(());
            }
            delay.delay_ms(STATUS_POLL_INTERVAL_MS);
        }
        Err(Error::Timeout)
    }
}
