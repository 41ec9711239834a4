//! Mock interface implementation for testing the MMC5603 driver

use device_driver::RegisterInterface;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::common::test_utils::encode_axis;

/// Records operations performed on the mock interface and delay
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// One read transaction
    Read {
        /// First register address
        address: u8,
        /// Bytes that were returned
        data: Vec<u8>,
    },
    /// One write transaction
    Write {
        /// First register address
        address: u8,
        /// Bytes that were written
        data: Vec<u8>,
    },
    /// A delay requested through [`MockDelay`]
    Delay {
        /// Requested duration in nanoseconds
        ns: u64,
    },
}

impl Operation {
    /// Shorthand for a single-byte register write
    pub fn write(address: u8, value: u8) -> Self {
        Self::Write {
            address,
            data: vec![value],
        }
    }

    /// Shorthand for a millisecond delay
    pub fn delay_ms(ms: u64) -> Self {
        Self::Delay { ns: ms * 1_000_000 }
    }

    /// Shorthand for a microsecond delay
    pub fn delay_us(us: u64) -> Self {
        Self::Delay { ns: us * 1_000 }
    }
}

const STATUS1: u8 = 0x18;
const CONTROL_0: u8 = 0x1B;
const CONTROL_1: u8 = 0x1C;
const PRODUCT_ID: u8 = 0x39;

const OTP_READ_DONE: u8 = 1 << 4;
const SAT_SENSOR: u8 = 1 << 5;
const MEAS_M_DONE: u8 = 1 << 6;
const MEAS_T_DONE: u8 = 1 << 7;

/// Shared state for mock interface (uses interior mutability)
#[derive(Debug)]
struct MockState {
    /// Simulated register values
    registers: HashMap<u8, u8>,

    /// Operations log for verification
    operations: Vec<Operation>,

    /// Failure injection
    fail_next_read: bool,
    /// Fail the n-th write from now (1 = next write)
    fail_write_countdown: Option<usize>,

    /// Samples published on each triggered measurement
    sample_sequence: Vec<[i32; 3]>,
    sample_sequence_idx: usize,

    /// The chip stops setting Meas_m_done / Meas_t_done
    measurements_stalled: bool,

    /// STATUS1 reads left before Meas_m_done comes up on its own
    data_ready_after_polls: Option<usize>,
}

impl MockState {
    fn new() -> Self {
        let mut state = Self {
            registers: HashMap::new(),
            operations: Vec::new(),
            fail_next_read: false,
            fail_write_countdown: None,
            sample_sequence: Vec::new(),
            sample_sequence_idx: 0,
            measurements_stalled: false,
            data_ready_after_polls: None,
        };
        state.power_on();
        state
    }

    /// Register contents after power-up or software reset
    fn power_on(&mut self) {
        self.registers.clear();
        self.registers.insert(PRODUCT_ID, 0x10);
        self.registers.insert(STATUS1, OTP_READ_DONE);
        // Zero field on all axes
        self.set_mag_data(0, 0, 0);
        // Factory self-test set values
        self.registers.insert(0x27, 0x64);
        self.registers.insert(0x28, 0x5A);
        self.registers.insert(0x29, 0x50);
    }

    fn status(&self) -> u8 {
        self.registers.get(&STATUS1).copied().unwrap_or(0)
    }

    fn set_status_bit(&mut self, bit: u8, set: bool) {
        let status = self.status();
        let status = if set { status | bit } else { status & !bit };
        self.registers.insert(STATUS1, status);
    }

    fn set_mag_data(&mut self, x: i32, y: i32, z: i32) {
        for (axis, value) in [x, y, z].into_iter().enumerate() {
            let [b0, b1, b2] = encode_axis(value);
            let axis = axis as u8;
            self.registers.insert(axis * 2, b0);
            self.registers.insert(axis * 2 + 1, b1);
            self.registers.insert(6 + axis, b2);
        }
    }

    fn advance_sample_sequence(&mut self) {
        if !self.sample_sequence.is_empty() {
            let [x, y, z] = self.sample_sequence[self.sample_sequence_idx];
            self.set_mag_data(x, y, z);
            self.sample_sequence_idx = (self.sample_sequence_idx + 1) % self.sample_sequence.len();
        }
    }

    /// Simulate the self-clearing trigger bits of INTERNAL_CONTROL_0
    fn simulate_control_0(&mut self, value: u8) {
        if self.measurements_stalled {
            return;
        }
        if value & 0x01 != 0 {
            self.advance_sample_sequence();
            self.set_status_bit(MEAS_M_DONE, true);
        }
        if value & 0x02 != 0 {
            self.set_status_bit(MEAS_T_DONE, true);
        }
    }
}

/// Mock interface for testing
#[derive(Clone)]
pub struct MockInterface {
    state: Rc<RefCell<MockState>>,
}

impl MockInterface {
    /// Create a new mock interface with power-on register values
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(MockState::new())),
        }
    }

    /// Delay provider that logs into this interface's operations log
    pub fn delay(&self) -> MockDelay {
        MockDelay {
            state: Rc::clone(&self.state),
        }
    }

    /// Set a register value
    pub fn set_register(&self, address: u8, value: u8) {
        self.state.borrow_mut().registers.insert(address, value);
    }

    /// Get a register value
    pub fn get_register(&self, address: u8) -> u8 {
        self.state
            .borrow()
            .registers
            .get(&address)
            .copied()
            .unwrap_or(0)
    }

    /// Set PRODUCT_ID register value
    pub fn set_product_id(&self, value: u8) {
        self.set_register(PRODUCT_ID, value);
    }

    /// Set magnetometer data (will be returned on next read)
    pub fn set_mag_data(&self, x: i32, y: i32, z: i32) {
        self.state.borrow_mut().set_mag_data(x, y, z);
    }

    /// Set a sequence of samples, one published per triggered measurement
    pub fn set_sample_sequence(&self, sequence: Vec<[i32; 3]>) {
        let mut state = self.state.borrow_mut();
        state.sample_sequence = sequence;
        state.sample_sequence_idx = 0;
    }

    /// Set or clear the Meas_m_done flag (new sample in continuous mode)
    pub fn set_data_ready(&self, ready: bool) {
        self.state.borrow_mut().set_status_bit(MEAS_M_DONE, ready);
    }

    /// Set or clear the Sat_sensor flag reported after a self-test
    pub fn set_saturated(&self, saturated: bool) {
        self.state.borrow_mut().set_status_bit(SAT_SENSOR, saturated);
    }

    /// Set the factory self-test values at 0x27..0x29
    pub fn set_self_test_values(&self, values: [u8; 3]) {
        for (offset, value) in values.into_iter().enumerate() {
            self.set_register(0x27 + offset as u8, value);
        }
    }

    /// Set the raw temperature output
    pub fn set_temperature(&self, raw: u8) {
        self.set_register(0x09, raw);
    }

    /// Raise Meas_m_done after `polls` STATUS1 reads have seen it clear
    ///
    /// Simulates the next continuous-mode sample arriving later.
    pub fn set_data_ready_after_polls(&self, polls: usize) {
        self.state.borrow_mut().data_ready_after_polls = Some(polls);
    }

    /// Number of STATUS1 reads
    pub fn status_read_count(&self) -> usize {
        self.operations()
            .iter()
            .filter(|op| matches!(op, Operation::Read { address: STATUS1, .. }))
            .count()
    }

    /// Stop setting measurement-done flags on triggers
    pub fn stall_measurements(&self) {
        self.state.borrow_mut().measurements_stalled = true;
    }

    /// Inject a read failure on the next read operation
    pub fn fail_next_read(&self) {
        self.state.borrow_mut().fail_next_read = true;
    }

    /// Inject a write failure on the next write operation
    pub fn fail_next_write(&self) {
        self.fail_nth_write(1);
    }

    /// Inject a write failure on the n-th write from now (1 = next)
    pub fn fail_nth_write(&self, n: usize) {
        self.state.borrow_mut().fail_write_countdown = Some(n);
    }

    /// Get the operations log
    pub fn operations(&self) -> Vec<Operation> {
        self.state.borrow().operations.clone()
    }

    /// Write operations only
    pub fn writes(&self) -> Vec<Operation> {
        self.operations()
            .into_iter()
            .filter(|op| matches!(op, Operation::Write { .. }))
            .collect()
    }

    /// Number of read transactions
    pub fn read_count(&self) -> usize {
        self.operations()
            .iter()
            .filter(|op| matches!(op, Operation::Read { .. }))
            .count()
    }

    /// Clear the operations log
    pub fn clear_operations(&self) {
        self.state.borrow_mut().operations.clear();
    }
}

/// Mock error type
#[derive(Debug, Clone, PartialEq)]
pub enum MockError {
    /// Simulated communication error
    Communication,
}

impl RegisterInterface for MockInterface {
    type Error = MockError;
    type AddressType = u8;

    fn read_register(
        &mut self,
        address: Self::AddressType,
        _size_bits: u32,
        read_data: &mut [u8],
    ) -> Result<(), Self::Error> {
        let mut state = self.state.borrow_mut();

        // Check for injected failure
        if state.fail_next_read {
            state.fail_next_read = false;
            return Err(MockError::Communication);
        }

        if address == STATUS1 {
            match state.data_ready_after_polls {
                Some(0) => {
                    state.data_ready_after_polls = None;
                    state.set_status_bit(MEAS_M_DONE, true);
                }
                Some(polls) => state.data_ready_after_polls = Some(polls - 1),
                None => {}
            }
        }

        let mut data_read = false;
        for (i, byte) in read_data.iter_mut().enumerate() {
            let reg_addr = address.wrapping_add(i as u8);
            *byte = state.registers.get(&reg_addr).copied().unwrap_or(0);
            data_read |= reg_addr <= 0x08;
        }

        state.operations.push(Operation::Read {
            address,
            data: read_data.to_vec(),
        });

        // Reading the output registers clears the done flags
        if data_read {
            state.set_status_bit(MEAS_M_DONE, false);
        }
        if address == 0x09 {
            state.set_status_bit(MEAS_T_DONE, false);
        }

        Ok(())
    }

    fn write_register(
        &mut self,
        address: Self::AddressType,
        _size_bits: u32,
        write_data: &[u8],
    ) -> Result<(), Self::Error> {
        let mut state = self.state.borrow_mut();

        // Check for injected failure
        if let Some(countdown) = state.fail_write_countdown {
            if countdown <= 1 {
                state.fail_write_countdown = None;
                return Err(MockError::Communication);
            }
            state.fail_write_countdown = Some(countdown - 1);
        }

        state.operations.push(Operation::Write {
            address,
            data: write_data.to_vec(),
        });

        match (address, write_data) {
            (CONTROL_0, [value]) => state.simulate_control_0(*value),
            (CONTROL_1, [value]) if value & 0x80 != 0 => state.power_on(),
            _ => {
                for (i, &byte) in write_data.iter().enumerate() {
                    state.registers.insert(address.wrapping_add(i as u8), byte);
                }
            }
        }

        Ok(())
    }
}

impl Default for MockInterface {
    fn default() -> Self {
        Self::new()
    }
}

/// Delay provider that records requested delays instead of sleeping
pub struct MockDelay {
    state: Rc<RefCell<MockState>>,
}

impl MockDelay {
    fn record(&mut self, ns: u64) {
        self.state
            .borrow_mut()
            .operations
            .push(Operation::Delay { ns });
    }
}

impl embedded_hal::delay::DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.record(u64::from(ns));
    }

    fn delay_us(&mut self, us: u32) {
        self.record(u64::from(us) * 1_000);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.record(u64::from(ms) * 1_000_000);
    }
}
