//! Controller protocol: how HD44780 instructions are encoded on top of two primitives,
//! [HD44780Driver::send_command] and [HD44780Driver::send_data].
//!
//! The busy flag is never polled. Every instruction is followed by a fixed wait long enough for
//! the slowest controller of the family, so none of these methods can fail from the caller's
//! point of view.

mod i2c;

use crate::hd44780::{
    CLEAR_DISPLAY, CURSOR_SHIFT, CursorDirection, DISPLAY_CONTROL, DISPLAY_MOVE, DisplayControl,
    ENTRY_MODE_SET, EntryMode, FUNCTION_SET, FunctionSet, MOVE_RIGHT, RETURN_HOME,
    SET_CGRAM_ADDRESS, SET_DDRAM_ADDRESS,
};
pub use i2c::*;
use std::fmt::Debug;

/// Wait after clear display and return home, which take up to 1.52 ms.
pub const LONG_INSTRUCTION_US: u32 = 2000;

pub trait HD44780Driver: Debug {
    /// Brings the controller from any state into 4-bit mode. After this, instructions can be sent
    /// with [Self::send_command], starting with [Self::function_set].
    fn synchronize(&mut self);

    /// Clears the display and sets the cursor to the home position.
    fn clear_display(&mut self) {
        self.send_command(CLEAR_DISPLAY);
        self.wait_us(LONG_INSTRUCTION_US);
    }

    /// Sets the cursor to the home position and undoes any display shift.
    fn return_home(&mut self) {
        self.send_command(RETURN_HOME);
        self.wait_us(LONG_INSTRUCTION_US);
    }

    /// Sets the cursor direction and display shift applied after each write.
    fn set_entry_mode(&mut self, mode: EntryMode) {
        self.send_command(ENTRY_MODE_SET | mode.bits())
    }

    /// Sets the display on/off, cursor on/off, and blinking on/off.
    fn set_display_control(&mut self, control: DisplayControl) {
        self.send_command(DISPLAY_CONTROL | control.bits())
    }

    /// Moves the cursor or shifts the whole display, without changing DDRAM.
    fn cursor_shift(&mut self, display_shift: bool, direction: CursorDirection) {
        let mut command = CURSOR_SHIFT;
        if display_shift {
            command |= DISPLAY_MOVE;
        }
        if direction == CursorDirection::Right {
            command |= MOVE_RIGHT;
        }
        self.send_command(command)
    }

    /// Sets the interface width, number of lines and font.
    fn function_set(&mut self, function_set: FunctionSet) {
        self.send_command(FUNCTION_SET | function_set.bits())
    }

    /// Sets the CGRAM address. Only the low 6 bits are used.
    fn set_cgram_address(&mut self, address: u8) {
        self.send_command(SET_CGRAM_ADDRESS | (address & 0b00111111))
    }

    /// Sets the DDRAM address, which is where the next character lands. Only the low 7 bits are
    /// used.
    fn set_ddram_address(&mut self, address: u8) {
        self.send_command(SET_DDRAM_ADDRESS | (address & 0b01111111))
    }

    // Low-level commands
    // These raw commands are used by the high-level functions above.

    /// Sends an instruction. RS is low.
    fn send_command(&mut self, command: u8);

    /// Sends a byte to CGRAM or DDRAM, whichever was addressed last. RS is high.
    fn send_data(&mut self, data: u8);

    /// Blocks for at least `micros` microseconds.
    fn wait_us(&mut self, micros: u32);
}
