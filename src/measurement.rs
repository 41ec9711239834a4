//! Measurement mode tracking and the continuous sample sequence

use device_driver::RegisterInterface;

use crate::device::Mmc5603Driver;
use crate::sensors::MagData;
use crate::Error;

/// Measurement state of the driver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MeasurementMode {
    /// After construction or `soft_reset`
    #[default]
    Idle,
    /// Configured for on-request measurements
    OneShot,
    /// Sensor repeats measurements at the configured update rate
    Continuous,
}

impl MeasurementMode {
    /// Whether the sensor measures on its own
    #[must_use]
    pub const fn is_continuous(self) -> bool {
        matches!(self, Self::Continuous)
    }
}

/// Lazy, never-ending sequence of continuous-mode samples
///
/// Created by [`Mmc5603Driver::continuous_samples`]. Each step yields
/// `Ok(None)` when the driver is not in continuous mode or no new data is
/// ready, and `Ok(Some(data))` otherwise. It never blocks; pace the loop with
/// your own delay. Bus errors are yielded as `Err` and do not end the sequence.
///
/// # Example
///
/// ```ignore
/// mag.start_measure(&mut delay, true, true)?;
/// for sample in mag.continuous_samples().take(100) {
///     if let Some(data) = sample? {
///         // ...
///     }
///     delay.delay_ms(50);
/// }
/// ```
pub struct ContinuousSamples<'a, I> {
    driver: &'a mut Mmc5603Driver<I>,
}

impl<'a, I> ContinuousSamples<'a, I> {
    pub(crate) fn new(driver: &'a mut Mmc5603Driver<I>) -> Self {
        Self { driver }
    }
}

impl<I> Iterator for ContinuousSamples<'_, I>
where
    I: RegisterInterface<AddressType = u8>,
{
    type Item = Result<Option<MagData>, Error<I::Error>>;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.driver.poll_continuous_sample())
    }
}
