//! Driver for HD44780 character LCDs attached through an I²C GPIO expander backpack.
//!
//! The crate is layered the same way the hardware is:
//!
//! - [i2c] and `embedded_hal::delay::DelayNs` are the platform capabilities the driver consumes;
//!   [delay] has a sleeping implementation. [i2c::linux] talks to
//!   `/dev/i2c-N`, [i2c::recording] records everything for tests.
//! - [hd44780::pins] and [hd44780::expander] describe how the display is wired to the expander.
//! - [hd44780::driver] speaks the controller's 4-bit protocol over the expander.
//! - [hd44780::display] is the user-facing [LiquidCrystalI2c](hd44780::display::LiquidCrystalI2c)
//!   handle.

pub mod delay;
pub mod hd44780;
pub mod i2c;

use i2cdev::linux::LinuxI2CError;
use thiserror::Error;

#[derive(Debug, Error, Eq, PartialEq, Clone)]
pub enum LcdError {
    #[error("no acknowledgement from device at address {address:#04x}")]
    Nack { address: u8 },
    #[error("invalid argument")]
    InvalidArgument,
    #[error("the feature is not supported on this backend")]
    NotSupported,
    #[error("IO error: {0}")]
    Io(std::io::ErrorKind),
    #[error("error: {0}")]
    Other(String),
}

impl From<std::io::Error> for LcdError {
    fn from(err: std::io::Error) -> Self {
        LcdError::Io(err.kind())
    }
}

impl From<LinuxI2CError> for LcdError {
    fn from(err: LinuxI2CError) -> Self {
        LcdError::Other(err.to_string())
    }
}

pub type LcdResult<T> = Result<T, LcdError>;
