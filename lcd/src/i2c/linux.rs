use crate::i2c::I2cBus;
use crate::{LcdError, LcdResult};
use i2cdev::core::I2CDevice;
use i2cdev::linux::LinuxI2CDevice;
use log::trace;
use std::fmt::{Debug, Formatter};
use std::path::{Path, PathBuf};

/// [I2cBus] on top of the Linux `i2c-dev` interface.
///
/// The device file is opened lazily on the first transaction, and the slave address is switched
/// whenever a transaction targets a different device.
pub struct LinuxI2cBus {
    path: PathBuf,
    device: Option<LinuxI2CDevice>,
    device_address: u8,
    pending_address: Option<u8>,
    buffer: Vec<u8>,
}

impl LinuxI2cBus {
    /// Creates a bus for `/dev/i2c-<bus>`.
    pub fn new(bus: u8) -> Self {
        Self::with_path(format!("/dev/i2c-{}", bus))
    }

    /// Creates a bus for an arbitrary `i2c-dev` device file.
    pub fn with_path(path: impl AsRef<Path>) -> Self {
        LinuxI2cBus {
            path: path.as_ref().to_path_buf(),
            device: None,
            device_address: 0,
            pending_address: None,
            buffer: Vec::new(),
        }
    }

    fn device_for(&mut self, address: u8) -> LcdResult<&mut LinuxI2CDevice> {
        if self.device.is_none() {
            trace!("Opening {} for address {:#04x}", self.path.display(), address);
            self.device = Some(LinuxI2CDevice::new(&self.path, address.into())?);
            self.device_address = address;
        }

        let device = self.device.as_mut().ok_or(LcdError::NotSupported)?;
        if self.device_address != address {
            device.set_slave_address(address.into())?;
            self.device_address = address;
        }
        Ok(device)
    }
}

impl Debug for LinuxI2cBus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "LinuxI2cBus({})", self.path.display())
    }
}

impl I2cBus for LinuxI2cBus {
    /// Fails with [std::io::ErrorKind::NotFound] when the adapter's device file is missing.
    ///
    /// Writes after [LiquidCrystalI2c::init](crate::hd44780::display::LiquidCrystalI2c::init)
    /// only log their errors, so this is where a wrong bus number surfaces as an error.
    fn begin(&mut self) -> LcdResult<()> {
        if self.path.exists() {
            Ok(())
        } else {
            Err(LcdError::Io(std::io::ErrorKind::NotFound))
        }
    }

    fn begin_transmission(&mut self, address: u8) {
        self.pending_address = Some(address);
        self.buffer.clear();
    }

    fn write(&mut self, byte: u8) {
        self.buffer.push(byte);
    }

    fn end_transmission(&mut self) -> LcdResult<()> {
        let address = self.pending_address.take().ok_or(LcdError::InvalidArgument)?;
        let bytes = std::mem::take(&mut self.buffer);
        self.device_for(address)?.write(&bytes)?;
        Ok(())
    }
}
