//! I²C transport used to reach the GPIO expander.
//!
//! The interface mirrors the classic "begin, write some bytes, end" transaction shape: every
//! byte written between [I2cBus::begin_transmission] and [I2cBus::end_transmission] goes out as
//! one write cycle to the selected address. Nothing is sent until the transaction ends.

pub mod linux;
pub mod recording;

use crate::LcdResult;
use std::fmt::Debug;

pub trait I2cBus: Debug {
    /// Prepares the bus for use. Called once, before the first transaction.
    fn begin(&mut self) -> LcdResult<()> {
        Ok(())
    }

    /// Starts a write transaction to the device at the 7-bit `address`.
    ///
    /// Any bytes queued by an unfinished transaction are discarded.
    fn begin_transmission(&mut self, address: u8);

    /// Queues a byte for the current transaction.
    fn write(&mut self, byte: u8);

    /// Sends the queued bytes as a single write cycle.
    ///
    /// # Errors
    /// - [LcdError::Nack](crate::LcdError::Nack) if the device did not acknowledge.
    /// - [LcdError::InvalidArgument](crate::LcdError::InvalidArgument) if no transaction was
    ///   started.
    /// - Any transport-specific error.
    fn end_transmission(&mut self) -> LcdResult<()>;

    /// Runs a whole transaction writing `bytes` to `address`.
    fn transmit(&mut self, address: u8, bytes: &[u8]) -> LcdResult<()> {
        self.begin_transmission(address);
        for &byte in bytes {
            self.write(byte);
        }
        self.end_transmission()
    }
}

impl<T: I2cBus + ?Sized> I2cBus for &mut T {
    fn begin(&mut self) -> LcdResult<()> {
        (**self).begin()
    }

    fn begin_transmission(&mut self, address: u8) {
        (**self).begin_transmission(address)
    }

    fn write(&mut self, byte: u8) {
        (**self).write(byte)
    }

    fn end_transmission(&mut self) -> LcdResult<()> {
        (**self).end_transmission()
    }
}
