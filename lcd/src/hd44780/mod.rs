//! HD44780 controller: instruction set and the flag registers the driver keeps a copy of.
//!
//! The controller cannot be read back in this setup (R/W is held low), so the driver remembers
//! the last [FunctionSet], [DisplayControl] and [EntryMode] it sent and re-sends the whole
//! register whenever a single flag changes.

pub mod compat;
pub mod display;
pub mod driver;
pub mod expander;
pub mod pins;

// Instructions
pub const CLEAR_DISPLAY: u8 = 0b00000001;
pub const RETURN_HOME: u8 = 0b00000010;
pub const ENTRY_MODE_SET: u8 = 0b00000100;
pub const DISPLAY_CONTROL: u8 = 0b00001000;
pub const CURSOR_SHIFT: u8 = 0b00010000;
pub const FUNCTION_SET: u8 = 0b00100000;
pub const SET_CGRAM_ADDRESS: u8 = 0b01000000;
pub const SET_DDRAM_ADDRESS: u8 = 0b10000000;

// Cursor/display shift flags
pub const DISPLAY_MOVE: u8 = 0b00001000;
pub const MOVE_RIGHT: u8 = 0b00000100;

/// DDRAM address of the first cell of each row. Fixed by the controller's memory layout; rows 2
/// and 3 of a 4-line module continue rows 0 and 1.
pub const ROW_OFFSETS: [u8; 4] = [0x00, 0x40, 0x14, 0x54];

/// Number of user-definable glyphs in CGRAM.
pub const CGRAM_SLOTS: u8 = 8;

/// Number of pixel rows in a CGRAM glyph.
pub const GLYPH_ROWS: usize = 8;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum CursorDirection {
    /// Moves the cursor to the left after writing data.
    Left,
    /// Moves the cursor to the right after writing data.
    Right,
}

/// Character cell height.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum FontSize {
    /// 5x8 dots, works with any number of lines.
    #[default]
    Dots5x8,
    /// 5x10 dots, only available on single-line displays.
    Dots5x10,
}

/// Function set register: `001DNF??`.
///
/// `D` selects the 8-bit interface, `N` two display lines, `F` the 5x10 font.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct FunctionSet(u8);

impl FunctionSet {
    pub const EIGHT_BIT_MODE: u8 = 0b00010000;
    pub const TWO_LINE: u8 = 0b00001000;
    pub const FONT_5X10: u8 = 0b00000100;

    /// 4-bit interface, one line, 5x8 font.
    pub const BASE: FunctionSet = FunctionSet(0);

    /// Builds the 4-bit function set for a display with `lines` lines.
    ///
    /// The tall font is only honoured on single-line displays.
    pub fn for_geometry(lines: u8, font: FontSize) -> Self {
        let mut function_set = Self::BASE;
        if lines > 1 {
            function_set.0 |= Self::TWO_LINE;
        }
        if font == FontSize::Dots5x10 && lines == 1 {
            function_set.0 |= Self::FONT_5X10;
        }
        function_set
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn contains(self, flag: u8) -> bool {
        self.0 & flag == flag
    }
}

/// Display on/off control register: `00001DCB`.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct DisplayControl(u8);

impl DisplayControl {
    pub const DISPLAY_ON: u8 = 0b00000100;
    pub const CURSOR_ON: u8 = 0b00000010;
    pub const BLINK_ON: u8 = 0b00000001;

    /// Display on, cursor and blinking off.
    pub const DEFAULT: DisplayControl = DisplayControl(Self::DISPLAY_ON);

    pub fn from_bits(bits: u8) -> Self {
        DisplayControl(bits & 0b111)
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn contains(self, flag: u8) -> bool {
        self.0 & flag == flag
    }

    /// Sets or clears `flag`, leaving the other bits untouched.
    pub fn set(&mut self, flag: u8, on: bool) {
        if on {
            self.0 |= flag;
        } else {
            self.0 &= !flag;
        }
    }
}

/// Entry mode register: `000001IS`.
///
/// `I` moves the cursor right (text flows left to right), `S` shifts the whole display on every
/// write, which right-justifies text at the cursor.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct EntryMode(u8);

impl EntryMode {
    pub const ENTRY_LEFT: u8 = 0b00000010;
    pub const SHIFT_INCREMENT: u8 = 0b00000001;

    /// Left to right, no display shift.
    pub const DEFAULT: EntryMode = EntryMode(Self::ENTRY_LEFT);

    pub fn new(direction: CursorDirection, shift: bool) -> Self {
        let mut mode = EntryMode(0);
        mode.set(Self::ENTRY_LEFT, direction == CursorDirection::Right);
        mode.set(Self::SHIFT_INCREMENT, shift);
        mode
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn contains(self, flag: u8) -> bool {
        self.0 & flag == flag
    }

    pub fn set(&mut self, flag: u8, on: bool) {
        if on {
            self.0 |= flag;
        } else {
            self.0 &= !flag;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn function_set_two_lines_ignores_tall_font() {
        let function_set = FunctionSet::for_geometry(2, FontSize::Dots5x10);
        assert!(function_set.contains(FunctionSet::TWO_LINE));
        assert!(!function_set.contains(FunctionSet::FONT_5X10));
        assert!(!function_set.contains(FunctionSet::EIGHT_BIT_MODE));
    }

    #[test]
    fn function_set_single_line_tall_font() {
        let function_set = FunctionSet::for_geometry(1, FontSize::Dots5x10);
        assert_eq!(function_set.bits(), FunctionSet::FONT_5X10);
    }

    #[test]
    fn display_control_set_keeps_other_bits() {
        let mut control = DisplayControl::DEFAULT;
        control.set(DisplayControl::BLINK_ON, true);
        control.set(DisplayControl::CURSOR_ON, true);
        control.set(DisplayControl::BLINK_ON, false);
        assert_eq!(control.bits(), 0b110);

        control.set(DisplayControl::DISPLAY_ON, false);
        assert_eq!(control.bits(), 0b010);
    }

    #[test]
    fn entry_mode_from_direction() {
        assert_eq!(EntryMode::new(CursorDirection::Right, false), EntryMode::DEFAULT);
        assert_eq!(EntryMode::new(CursorDirection::Left, true).bits(), 0b01);
    }
}
