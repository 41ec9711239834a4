//! Register definitions for the MMC5603
//!
//! The MMC5603 has a flat 8-bit register map. The single-byte control and
//! output registers are declared here. The 20-bit axis data (0x00-0x08), the
//! self-test threshold blocks and `STATUS1` are accessed as raw transfers by the
//! driver.
//!
//! Every `write` starts from the register's reset value (all zeros), so a field
//! that is not set explicitly is written as 0.

/// First axis data register (`Xout0`)
pub const XOUT0: u8 = 0x00;

/// Number of bytes in the axis data block (`Xout0`..=`Zout2`)
pub const AXIS_DATA_LEN: usize = 9;

/// Status register (`STATUS1`), decoded by [`crate::StatusFlags`]
pub const STATUS1: u8 = 0x18;

/// First self-test threshold register (`ST_X_TH`), write side
pub const ST_X_TH: u8 = 0x1E;

/// First stored self-test set value register (`ST_X`), read side
pub const ST_X: u8 = 0x27;

device_driver::create_device!(
    device_name: Mmc5603,
    dsl: {
        config {
            type RegisterAddressType = u8;
            type DefaultByteOrder = BE;
        }

        /// TOUT - Temperature output (0x09)
        /// Unsigned, 0.8 °C/LSB with 0 = -75 °C
        register Tout {
            const ADDRESS = 0x09;
            const SIZE_BITS = 8;

            /// Raw temperature
            tout: uint = 0..8,
        },

        /// ODR - Output data rate (0x1A)
        /// 1..255 Hz, or 1000 Hz when `hi_power` is set and ODR = 255
        register Odr {
            const ADDRESS = 0x1A;
            const SIZE_BITS = 8;

            /// Update rate in Hz
            odr: uint = 0..8,
        },

        /// INTERNAL_CONTROL_0 (0x1B)
        /// All bits are self-clearing triggers
        register Control0 {
            const ADDRESS = 0x1B;
            const SIZE_BITS = 8;

            /// Take a magnetic measurement
            tm_m: bool = 0,
            /// Take a temperature measurement
            tm_t: bool = 1,
            reserved_2: uint = 2..3,
            /// SET pulse through the sensing coils
            do_set: bool = 3,
            /// RESET pulse through the sensing coils
            do_reset: bool = 4,
            /// Automatic SET/RESET before each measurement
            auto_sr_en: bool = 5,
            /// Automatic self-test against the 0x1E..0x20 thresholds
            auto_st_en: bool = 6,
            /// Start the measurement period calculation from ODR.
            /// Must be set before continuous mode is entered.
            cmm_freq_en: bool = 7,
        },

        /// INTERNAL_CONTROL_1 (0x1C)
        register Control1 {
            const ADDRESS = 0x1C;
            const SIZE_BITS = 8;

            /// Decimation filter length (0..3)
            bandwidth: uint = 0..2,
            /// Disable the X channel
            x_inhibit: bool = 2,
            /// Disable the Y channel
            y_inhibit: bool = 3,
            /// Disable the Z channel
            z_inhibit: bool = 4,
            /// Positive self-test coil current
            st_enp: bool = 5,
            /// Negative self-test coil current
            st_enm: bool = 6,
            /// Software reset, equivalent to power-on (20 ms)
            sw_reset: bool = 7,
        },

        /// INTERNAL_CONTROL_2 (0x1D)
        register Control2 {
            const ADDRESS = 0x1D;
            const SIZE_BITS = 8;

            /// Measurements between automatic SET pulses (1, 25, 75, 100, 250, 500, 1000, 2000)
            prd_set: uint = 0..3,
            /// Periodic SET in continuous mode
            en_prd_set: bool = 3,
            /// Continuous measurement mode
            cmm_en: bool = 4,
            /// Interrupt on motion detection
            int_mdt_en: bool = 5,
            /// Interrupt on measurement done
            int_meas_done_en: bool = 6,
            /// 1000 Hz high-power mode (with ODR = 255)
            hi_power: bool = 7,
        },

        /// PRODUCT_ID - Product identification (0x39)
        /// Expected value: 0x10
        register ProductId {
            const ADDRESS = 0x39;
            const SIZE_BITS = 8;

            /// Product ID (should read 0x10)
            product_id: uint = 0..8,
        }
    }
);
