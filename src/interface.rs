//! Bus interface implementation for the MMC5603
//!
//! This module provides the `device-driver` register interface on top of an
//! `embedded-hal` I2C bus. The MMC5603 only answers on one address.

use crate::{I2C_ADDRESS, InvalidParameter};
use device_driver::RegisterInterface;

/// Largest single transfer the driver issues (the 9-byte axis data block)
const MAX_TRANSFER_LEN: usize = 9;

/// I2C interface for the MMC5603
pub struct I2cInterface<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C> I2cInterface<I2C> {
    /// Create a new I2C interface on the fixed MMC5603 address (0x30)
    ///
    /// # Example
    /// ```ignore
    /// let interface = I2cInterface::new(i2c);
    /// let mut mag = Mmc5603Driver::new(interface)?;
    /// ```
    pub const fn new(i2c: I2C) -> Self {
        Self {
            i2c,
            address: I2C_ADDRESS,
        }
    }

    /// Create a new I2C interface with an explicit device address
    ///
    /// Only [`I2C_ADDRESS`] is accepted.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidParameter::DeviceAddress`] for any other address.
    pub fn with_address(i2c: I2C, address: u8) -> Result<Self, InvalidParameter> {
        if address != I2C_ADDRESS {
            return Err(InvalidParameter::DeviceAddress(address));
        }
        Ok(Self { i2c, address })
    }

    /// The I2C address this interface talks to
    pub const fn address(&self) -> u8 {
        self.address
    }

    /// Consume the interface and return the I2C peripheral
    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C> RegisterInterface for I2cInterface<I2C>
where
    I2C: embedded_hal::i2c::I2c,
{
    type Error = I2C::Error;
    type AddressType = u8;

    /// Set the register pointer, then read `read_data.len()` bytes from it
    fn read_register(
        &mut self,
        address: u8,
        _size_bits: u32,
        read_data: &mut [u8],
    ) -> Result<(), Self::Error> {
        self.i2c.write_read(self.address, &[address], read_data)
    }

    /// Send the register pointer and payload in one transaction
    ///
    /// The MMC5603 auto-increments the pointer, so a multi-byte payload fills
    /// consecutive registers (used for the 0x1E..=0x20 self-test thresholds).
    fn write_register(
        &mut self,
        address: u8,
        _size_bits: u32,
        write_data: &[u8],
    ) -> Result<(), Self::Error> {
        debug_assert!(
            write_data.len() <= MAX_TRANSFER_LEN,
            "register write of {} bytes exceeds {MAX_TRANSFER_LEN}",
            write_data.len()
        );
        let len = write_data.len().min(MAX_TRANSFER_LEN);

        let mut frame = [0u8; 1 + MAX_TRANSFER_LEN];
        frame[0] = address;
        frame[1..=len].copy_from_slice(&write_data[..len]);
        self.i2c.write(self.address, &frame[..=len])
    }
}
