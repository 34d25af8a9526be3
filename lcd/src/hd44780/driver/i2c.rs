use crate::hd44780::driver::HD44780Driver;
use crate::hd44780::expander::{Expander, Pcf8574};
use crate::hd44780::pins::{BACKLIGHT, EN, RS};
use crate::i2c::I2cBus;
use crate::LcdResult;
use embedded_hal::delay::DelayNs;
use log::{trace, warn};
use std::fmt::{Debug, Formatter};
use std::marker::PhantomData;

/// Minimum wait after power-on before the controller accepts anything (datasheet says 40 ms).
const POWER_ON_MS: u32 = 50;
/// Wait after parking the expander outputs low, before synchronising.
const EXPANDER_RESET_MS: u32 = 1000;
/// Wait after the first two "function set, 8-bit" nibbles (datasheet says 4.1 ms).
const SYNC_US: u32 = 4500;
/// Wait after the third "function set, 8-bit" nibble (datasheet says 100 µs).
const SYNC_LAST_US: u32 = 150;
/// Enable high time (datasheet says 450 ns).
const ENABLE_PULSE_US: u32 = 1;
/// Wait after the falling edge for an instruction to execute (datasheet says 37 µs).
const SETTLE_US: u32 = 50;

/// HD44780 driver talking 4-bit mode through an I²C GPIO expander.
///
/// Every change of the controller's lines is one single-byte write to the expander. Writes are
/// fire-and-forget: a failed transmission is logged and the sequence carries on, since the
/// controller cannot be read back to find out what it actually received.
pub struct I2cHD44780Driver<B, D, E = Pcf8574> {
    bus: B,
    delay: D,
    address: u8,
    backlight: u8,
    expander: PhantomData<E>,
}

impl<B: I2cBus, D: DelayNs + Debug, E: Expander> I2cHD44780Driver<B, D, E> {
    /// Creates a new driver for the expander at `address`. Nothing is sent yet; the backlight
    /// starts off.
    pub fn new(bus: B, delay: D, address: u8) -> Self {
        I2cHD44780Driver {
            bus,
            delay,
            address,
            backlight: 0,
            expander: PhantomData,
        }
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    /// Prepares the bus and runs the expander's setup transmission, if it has one.
    ///
    /// This is the only transmission whose failure is reported.
    pub fn setup_expander(&mut self) -> LcdResult<()> {
        self.bus.begin()?;
        if !E::SETUP.is_empty() {
            trace!("Expander setup: {:02x?}", E::SETUP);
            self.bus.transmit(self.address, E::SETUP)?;
        }
        Ok(())
    }

    pub fn is_backlight_on(&self) -> bool {
        self.backlight != 0
    }

    /// Switches the backlight and pushes the new state out with an otherwise idle byte.
    pub fn set_backlight(&mut self, on: bool) {
        self.backlight = if on { BACKLIGHT } else { 0 };
        self.expander_write(0);
    }

    /// Writes one logical byte to the expander, with the backlight bit added and the pins
    /// remapped for the board.
    pub fn expander_write(&mut self, data: u8) {
        let physical = E::PINS.map(data | self.backlight);

        self.bus.begin_transmission(self.address);
        if let Some(register) = E::OUTPUT_REGISTER {
            self.bus.write(register);
        }
        self.bus.write(physical);

        if let Err(err) = self.bus.end_transmission() {
            warn!("Expander write {:08b} to {:#04x} failed: {}", physical, self.address, err);
        }
    }

    /// Toggles EN high then low while `data` stays on the data lines, then waits for the
    /// controller to execute.
    pub fn pulse_enable(&mut self, data: u8) {
        self.expander_write(data | EN);
        self.delay.delay_us(ENABLE_PULSE_US);

        self.expander_write(data & !EN);
        self.delay.delay_us(SETTLE_US);
    }

    /// Puts a nibble, already in the upper four bits, on D4..D7 and latches it.
    pub fn write_4bits(&mut self, value: u8) {
        self.expander_write(value);
        self.pulse_enable(value);
    }

    /// Sends a full byte as two nibbles, high nibble first. `mode` is `0` for instructions and
    /// [RS] for data.
    pub fn send(&mut self, value: u8, mode: u8) {
        trace!("Sending data: {:08b}, RS: {}", value, mode & RS != 0);

        let high_nibble = value & 0xF0;
        let low_nibble = (value << 4) & 0xF0;
        self.write_4bits(high_nibble | mode);
        self.write_4bits(low_nibble | mode);
    }

    /// Gives back the bus and the delay.
    pub fn release(self) -> (B, D) {
        (self.bus, self.delay)
    }
}

impl<B: Debug, D: Debug, E> Debug for I2cHD44780Driver<B, D, E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "I2cHD44780Driver({:?} @ {:#04x}, backlight: {})",
            self.bus,
            self.address,
            self.backlight != 0
        )
    }
}

impl<B: I2cBus, D: DelayNs + Debug, E: Expander> HD44780Driver for I2cHD44780Driver<B, D, E> {
    /// Runs the "initialisation by instruction" sequence for 4-bit interfaces (HD44780 datasheet,
    /// figure 24). Three "8-bit" nibbles get the controller out of whatever half-finished transfer
    /// it might be in, the fourth switches it to 4-bit mode.
    fn synchronize(&mut self) {
        self.delay.delay_ms(POWER_ON_MS);

        // RS and RW low, only the backlight bit set
        self.expander_write(0);
        self.delay.delay_ms(EXPANDER_RESET_MS);

        self.write_4bits(0x03 << 4);
        self.delay.delay_us(SYNC_US);

        self.write_4bits(0x03 << 4);
        self.delay.delay_us(SYNC_US);

        self.write_4bits(0x03 << 4);
        self.delay.delay_us(SYNC_LAST_US);

        self.write_4bits(0x02 << 4);
    }

    fn send_command(&mut self, command: u8) {
        self.send(command, 0)
    }

    fn send_data(&mut self, data: u8) {
        self.send(data, RS)
    }

    fn wait_us(&mut self, micros: u32) {
        self.delay.delay_us(micros)
    }
}
