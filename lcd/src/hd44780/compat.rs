//! Names used by other character LCD libraries, so code written against them keeps working.
//!
//! The first group forwards to the regular [LiquidCrystalI2c] methods. The second group belongs
//! to hardware this driver cannot talk to (contrast control, status read-back, bar graphs,
//! keypads) and is intentionally inert: the methods do nothing and return zero.

use crate::hd44780::display::LiquidCrystalI2c;
use crate::hd44780::expander::Expander;
use crate::hd44780::GLYPH_ROWS;
use crate::i2c::I2cBus;
use embedded_hal::delay::DelayNs;
use log::warn;
use std::fmt::Debug;

impl<B: I2cBus, D: DelayNs + Debug, E: Expander> LiquidCrystalI2c<B, D, E> {
    /// Same as [Self::blink].
    pub fn blink_on(&mut self) {
        self.blink();
    }

    /// Same as [Self::no_blink].
    pub fn blink_off(&mut self) {
        self.no_blink();
    }

    /// Same as [Self::cursor].
    pub fn cursor_on(&mut self) {
        self.cursor();
    }

    /// Same as [Self::no_cursor].
    pub fn cursor_off(&mut self) {
        self.no_cursor();
    }

    /// Turns the backlight on for any non-zero `value`, off for zero.
    pub fn set_backlight(&mut self, value: u8) {
        if value != 0 {
            self.backlight();
        } else {
            self.no_backlight();
        }
    }

    /// Same as [Self::create_char], but takes a slice. Missing rows are blank, extra rows are
    /// ignored; exactly 8 rows are always sent.
    pub fn load_custom_character(&mut self, char_num: u8, rows: &[u8]) {
        if rows.len() != GLYPH_ROWS {
            warn!("Custom character {} has {} rows, expected {}", char_num, rows.len(), GLYPH_ROWS);
        }
        let mut charmap = [0u8; GLYPH_ROWS];
        for (dst, src) in charmap.iter_mut().zip(rows) {
            *dst = *src;
        }
        self.create_char(char_num, &charmap);
    }

    /// Same as [Self::print].
    pub fn printstr(&mut self, s: &str) {
        self.print(s);
    }

    // Unsupported features
    // Kept only so calls written for other displays compile. They never touch the bus.

    /// Always `0`; the controller's status cannot be read through this expander wiring.
    pub fn status(&mut self) -> u8 {
        0
    }

    /// Does nothing; contrast is set with the board's potentiometer.
    pub fn set_contrast(&mut self, _value: u8) {}

    /// Always `0`; there is no keypad on these boards.
    pub fn keypad(&mut self) -> u8 {
        0
    }

    /// Does nothing; the instruction timings are fixed.
    pub fn set_delay(&mut self, _command_delay: i32, _char_delay: i32) {}

    /// Does nothing; use [Self::display] and [Self::backlight].
    pub fn on(&mut self) {}

    /// Does nothing; use [Self::no_display] and [Self::no_backlight].
    pub fn off(&mut self) {}

    /// Always `0`; bar graphs are not implemented.
    pub fn init_bargraph(&mut self, _graph_type: u8) -> u8 {
        0
    }

    /// Does nothing; bar graphs are not implemented.
    pub fn draw_horizontal_graph(&mut self, _row: u8, _column: u8, _len: u8, _pixel_col_end: u8) {}

    /// Does nothing; bar graphs are not implemented.
    pub fn draw_vertical_graph(&mut self, _row: u8, _column: u8, _len: u8, _pixel_row_end: u8) {}
}
