//! Mapping from the controller's logical lines to the expander's physical pins.
//!
//! The driver always builds a *logical* byte with a fixed layout:
//!
//! | bit  | 0  | 1  | 2  | 3         | 4  | 5  | 6  | 7  |
//! |------|----|----|----|-----------|----|----|----|----|
//! | line | RS | RW | EN | backlight | D4 | D5 | D6 | D7 |
//!
//! Most PCF8574 backpacks are wired exactly like that, so the byte goes out unchanged. Boards
//! with other wiring describe it with a [PinMapping] and every logical byte is permuted through
//! it right before transmission.

use bitvec::prelude::*;

/// Register select. Low for instructions, high for data.
pub const RS: u8 = 0b00000001;
/// Read/write. Always low, the driver never reads.
pub const RW: u8 = 0b00000010;
/// Enable. The controller latches the data lines on its falling edge.
pub const EN: u8 = 0b00000100;
/// Backlight transistor.
pub const BACKLIGHT: u8 = 0b00001000;
/// D4..D7, the upper half of the controller's data bus.
pub const DATA: u8 = 0b11110000;

/// Expander pin (0-7) for each logical line.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct PinMapping {
    masks: [u8; 8],
}

impl PinMapping {
    /// RS=0, RW=1, EN=2, backlight=3, D4..D7=4..7.
    pub const STANDARD: PinMapping = PinMapping::new(0, 1, 2, Some(3), [4, 5, 6, 7]);

    /// Describes the wiring. `backlight` is `None` when the backlight is not switchable; the
    /// backlight bit is then dropped from every write.
    ///
    /// Panics (at compile time when used in a constant) if any pin is not in `0..8`. Mapping two
    /// lines to the same pin is a wiring error and is not detected.
    pub const fn new(rs: u8, rw: u8, en: u8, backlight: Option<u8>, data: [u8; 4]) -> Self {
        let backlight_mask = match backlight {
            Some(pin) => Self::mask(pin),
            None => 0,
        };
        PinMapping {
            masks: [
                Self::mask(rs),
                Self::mask(rw),
                Self::mask(en),
                backlight_mask,
                Self::mask(data[0]),
                Self::mask(data[1]),
                Self::mask(data[2]),
                Self::mask(data[3]),
            ],
        }
    }

    const fn mask(pin: u8) -> u8 {
        assert!(pin < 8, "expander pin out of range");
        1 << pin
    }

    /// Whether the backlight line is connected.
    pub const fn has_backlight(&self) -> bool {
        self.masks[3] != 0
    }

    /// Whether the mapping leaves every bit where it is.
    pub const fn is_identity(&self) -> bool {
        let mut i = 0;
        while i < 8 {
            if self.masks[i] != 1 << i {
                return false;
            }
            i += 1;
        }
        true
    }

    /// Converts a logical byte into the byte to put on the expander pins.
    pub fn map(&self, logical: u8) -> u8 {
        if self.is_identity() {
            return logical;
        }

        logical
            .view_bits::<Lsb0>()
            .iter_ones()
            .fold(0, |physical, line| physical | self.masks[line])
    }
}

impl Default for PinMapping {
    fn default() -> Self {
        Self::STANDARD
    }
}
