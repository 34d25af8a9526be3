//! Build-time description of the GPIO expander board the display sits on.
//!
//! Wiring does not change while the program runs, so it is expressed as a type implementing
//! [Expander] and picked as a generic parameter of the driver. A custom board only needs a unit
//! struct and a few constants:
//!
//! ```
//! use i2c_lcd::hd44780::expander::Expander;
//! use i2c_lcd::hd44780::pins::PinMapping;
//!
//! #[derive(Debug)]
//! struct ReversedData;
//!
//! impl Expander for ReversedData {
//!     const PINS: PinMapping = PinMapping::new(0, 1, 2, Some(3), [7, 6, 5, 4]);
//! }
//! ```

use crate::hd44780::pins::PinMapping;
use std::fmt::Debug;

pub trait Expander: Debug {
    /// Which expander pin drives which controller line.
    const PINS: PinMapping;

    /// Register select byte sent in front of every output byte, for expanders with more than one
    /// port. `None` for single-port chips like the PCF8574.
    const OUTPUT_REGISTER: Option<u8> = None;

    /// Transmission that prepares the expander before the display is initialised, e.g. switching
    /// the port to output mode. Empty if nothing has to be sent.
    const SETUP: &'static [u8] = &[];

    /// Address the board usually ships with.
    const DEFAULT_ADDRESS: u8 = 0x27;
}

/// The common PCF8574 backpack with the conventional wiring and a switchable backlight.
#[derive(Debug, Copy, Clone, Default)]
pub struct Pcf8574;

impl Expander for Pcf8574 {
    const PINS: PinMapping = PinMapping::STANDARD;
}

/// Tianma display board with a PCA9555. The display hangs off port 1 in reverse order, port 0
/// is reserved for the board's buttons, and the backlight is hardwired on.
#[derive(Debug, Copy, Clone, Default)]
pub struct Pca9555;

impl Pca9555 {
    /// Output register of port 1.
    pub const PORT1_OUTPUT: u8 = 0x03;
    /// Configuration (direction) register of port 1.
    pub const PORT1_CONFIG: u8 = 0x07;
}

impl Expander for Pca9555 {
    const PINS: PinMapping = PinMapping::new(7, 6, 5, None, [4, 3, 2, 1]);
    const OUTPUT_REGISTER: Option<u8> = Some(Pca9555::PORT1_OUTPUT);
    const SETUP: &'static [u8] = &[Pca9555::PORT1_CONFIG, 0x00];
    const DEFAULT_ADDRESS: u8 = 0x20;
}
