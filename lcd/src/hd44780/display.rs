//! The user-facing display handle.
//!
//! [LiquidCrystalI2c] keeps the controller's write-only registers mirrored in memory and turns
//! each call into a read-modify-write of one register followed by re-sending it. All calls block
//! until the controller has had time to execute them.
//!
//! ```no_run
//! use std::fmt::Write;
//! use i2c_lcd::delay::SleepDelay;
//! use i2c_lcd::hd44780::display::LiquidCrystalI2c;
//! use i2c_lcd::i2c::linux::LinuxI2cBus;
//!
//! let mut lcd: LiquidCrystalI2c<_, _> = LiquidCrystalI2c::new(LinuxI2cBus::new(1), SleepDelay, 0x27, 16, 2);
//! lcd.init()?;
//! lcd.backlight();
//! lcd.set_cursor(3, 1);
//! write!(lcd, "{}", 21).unwrap();
//! // degree sign from the character ROM
//! lcd.write_byte(0xDF);
//! lcd.print("C");
//! # Ok::<(), i2c_lcd::LcdError>(())
//! ```

use crate::hd44780::driver::{HD44780Driver, I2cHD44780Driver};
use crate::hd44780::expander::{Expander, Pcf8574};
use crate::hd44780::{
    CGRAM_SLOTS, CursorDirection, DisplayControl, EntryMode, FontSize, FunctionSet, GLYPH_ROWS,
    ROW_OFFSETS,
};
use crate::i2c::I2cBus;
use crate::LcdResult;
use embedded_hal::delay::DelayNs;
use log::{debug, warn};
use std::fmt;
use std::fmt::Debug;

/// One HD44780 character display behind an I²C expander.
///
/// There must be only one handle per physical display: the handle is the only record of the
/// controller's state, and two handles would overwrite each other's settings.
#[derive(Debug)]
pub struct LiquidCrystalI2c<B, D, E = Pcf8574> {
    driver: I2cHD44780Driver<B, D, E>,
    columns: u8,
    rows: u8,
    function_set: FunctionSet,
    display_control: DisplayControl,
    entry_mode: EntryMode,
}

impl<B: I2cBus, D: DelayNs + Debug, E: Expander> LiquidCrystalI2c<B, D, E> {
    /// Creates a handle for a `columns` x `rows` display whose expander is at `address`.
    ///
    /// Nothing is sent until [Self::init] or [Self::begin].
    pub fn new(bus: B, delay: D, address: u8, columns: u8, rows: u8) -> Self {
        LiquidCrystalI2c {
            driver: I2cHD44780Driver::new(bus, delay, address),
            columns,
            rows,
            function_set: FunctionSet::BASE,
            display_control: DisplayControl::default(),
            entry_mode: EntryMode::default(),
        }
    }

    /// Creates a handle at the address the expander board usually uses.
    pub fn with_default_address(bus: B, delay: D, columns: u8, rows: u8) -> Self {
        Self::new(bus, delay, E::DEFAULT_ADDRESS, columns, rows)
    }

    /// Prepares the expander and runs [Self::begin] with the geometry given at construction and
    /// the 5x8 font.
    ///
    /// # Errors
    /// If the bus cannot be brought up or the expander rejects its setup transmission, the error
    /// is returned and nothing else is sent. Failures later on are not reported.
    pub fn init(&mut self) -> LcdResult<()> {
        debug!("Initializing {:?}", self.driver);
        self.driver.setup_expander()?;
        self.begin(self.columns, self.rows, FontSize::Dots5x8);
        Ok(())
    }

    /// Runs the controller's power-up sequence and puts it into a known state: display on,
    /// cursor and blink off, cleared, text flowing left to right, cursor at home.
    ///
    /// The tall font only applies to single-row displays. Calling this again fully reconfigures
    /// the controller.
    pub fn begin(&mut self, columns: u8, rows: u8, font: FontSize) {
        self.columns = columns;
        self.rows = rows;
        self.function_set = FunctionSet::for_geometry(rows, font);
        debug!("Starting {}x{} display, {:?}", columns, rows, self.function_set);

        self.driver.synchronize();
        self.driver.function_set(self.function_set);

        self.display_control = DisplayControl::DEFAULT;
        self.display();

        self.clear();

        self.entry_mode = EntryMode::DEFAULT;
        self.driver.set_entry_mode(self.entry_mode);

        self.home();
    }

    pub fn address(&self) -> u8 {
        self.driver.address()
    }

    pub fn columns(&self) -> u8 {
        self.columns
    }

    pub fn rows(&self) -> u8 {
        self.rows
    }

    pub fn function_set(&self) -> FunctionSet {
        self.function_set
    }

    pub fn display_control(&self) -> DisplayControl {
        self.display_control
    }

    pub fn entry_mode(&self) -> EntryMode {
        self.entry_mode
    }

    pub fn is_backlight_on(&self) -> bool {
        self.driver.is_backlight_on()
    }

    /// Clears the display and moves the cursor to the top left corner.
    pub fn clear(&mut self) {
        self.driver.clear_display();
    }

    /// Moves the cursor to the top left corner and undoes any scrolling.
    pub fn home(&mut self) {
        self.driver.return_home();
    }

    /// Moves the cursor to `column` of `row`, both counted from 0.
    ///
    /// Rows past the last one are clamped to the last row.
    pub fn set_cursor(&mut self, column: u8, row: u8) {
        let last_row = self.rows.saturating_sub(1).min(ROW_OFFSETS.len() as u8 - 1);
        let row = row.min(last_row);
        self.driver.set_ddram_address(column.wrapping_add(ROW_OFFSETS[row as usize]));
    }

    fn update_display_control(&mut self, flag: u8, on: bool) {
        self.display_control.set(flag, on);
        self.driver.set_display_control(self.display_control);
    }

    fn update_entry_mode(&mut self, flag: u8, on: bool) {
        self.entry_mode.set(flag, on);
        self.driver.set_entry_mode(self.entry_mode);
    }

    /// Blanks the display without losing its contents.
    pub fn no_display(&mut self) {
        self.update_display_control(DisplayControl::DISPLAY_ON, false);
    }

    pub fn display(&mut self) {
        self.update_display_control(DisplayControl::DISPLAY_ON, true);
    }

    pub fn no_cursor(&mut self) {
        self.update_display_control(DisplayControl::CURSOR_ON, false);
    }

    /// Shows the underline cursor.
    pub fn cursor(&mut self) {
        self.update_display_control(DisplayControl::CURSOR_ON, true);
    }

    pub fn no_blink(&mut self) {
        self.update_display_control(DisplayControl::BLINK_ON, false);
    }

    /// Blinks the cell under the cursor.
    pub fn blink(&mut self) {
        self.update_display_control(DisplayControl::BLINK_ON, true);
    }

    /// Shifts the whole display one cell to the left without changing DDRAM.
    pub fn scroll_display_left(&mut self) {
        self.driver.cursor_shift(true, CursorDirection::Left);
    }

    pub fn scroll_display_right(&mut self) {
        self.driver.cursor_shift(true, CursorDirection::Right);
    }

    pub fn left_to_right(&mut self) {
        self.update_entry_mode(EntryMode::ENTRY_LEFT, true);
    }

    pub fn right_to_left(&mut self) {
        self.update_entry_mode(EntryMode::ENTRY_LEFT, false);
    }

    /// Shifts the display on every write, so text is right-justified at the cursor.
    pub fn autoscroll(&mut self) {
        self.update_entry_mode(EntryMode::SHIFT_INCREMENT, true);
    }

    pub fn no_autoscroll(&mut self) {
        self.update_entry_mode(EntryMode::SHIFT_INCREMENT, false);
    }

    pub fn backlight(&mut self) {
        debug!("Backlight on");
        self.driver.set_backlight(true);
    }

    pub fn no_backlight(&mut self) {
        debug!("Backlight off");
        self.driver.set_backlight(false);
    }

    /// Defines glyph `location` (0-7; higher values wrap) from 8 pixel rows, top first, 5 bits
    /// each. Write the byte `location` to show it.
    ///
    /// Leaves the controller addressing CGRAM, so call [Self::set_cursor], [Self::clear] or
    /// [Self::home] before writing text again.
    pub fn create_char(&mut self, location: u8, charmap: &[u8; GLYPH_ROWS]) {
        let location = location & (CGRAM_SLOTS - 1);
        self.driver.set_cgram_address(location << 3);
        for &row in charmap {
            self.write_byte(row);
        }
    }

    /// Sends a raw instruction byte.
    pub fn command(&mut self, value: u8) {
        self.driver.send_command(value);
    }

    /// Writes one byte at the cursor. Returns the number of bytes written, always 1.
    pub fn write_byte(&mut self, value: u8) -> usize {
        self.driver.send_data(value);
        1
    }

    /// Writes a string at the cursor. Characters outside ASCII are shown as `?`.
    pub fn print(&mut self, s: &str) -> usize {
        s.chars()
            .map(|c| {
                if c.is_ascii() {
                    self.write_byte(c as u8)
                } else {
                    warn!("Non-ASCII character: {}", c);
                    self.write_byte(b'?')
                }
            })
            .sum()
    }

    /// Gives back the bus and the delay. The display keeps showing whatever it showed.
    pub fn release(self) -> (B, D) {
        self.driver.release()
    }
}

/// Lets `write!` format straight onto the display.
impl<B: I2cBus, D: DelayNs + Debug, E: Expander> fmt::Write for LiquidCrystalI2c<B, D, E> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.print(s);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hd44780::pins::{EN, RS};
    use crate::i2c::recording::{BusEvent, RecordingBus, RecordingDelay, Timeline};
    use std::fmt::Write;

    type TestLcd = LiquidCrystalI2c<RecordingBus, RecordingDelay>;

    fn lcd(columns: u8, rows: u8) -> (Timeline, TestLcd) {
        let timeline = Timeline::new();
        let mut lcd = TestLcd::new(timeline.bus(), timeline.delay(), 0x27, columns, rows);
        lcd.init().unwrap();
        timeline.clear();
        (timeline, lcd)
    }

    /// Every wait, in order, with the transmissions left out.
    fn waits(timeline: &Timeline) -> Vec<BusEvent> {
        timeline
            .events()
            .into_iter()
            .filter(|event| !matches!(event, BusEvent::Transmission { .. }))
            .collect()
    }

    /// Waits of one nibble: enable high time, then the settle time.
    const NIBBLE: [BusEvent; 2] = [BusEvent::DelayUs(1), BusEvent::DelayUs(50)];

    /// Reassembles the bytes the controller latched, as `(rs, byte)` pairs.
    fn latched(timeline: &Timeline) -> Vec<(bool, u8)> {
        let nibbles: Vec<u8> = timeline
            .transmissions()
            .iter()
            .map(|bytes| bytes[0])
            .filter(|byte| byte & EN != 0)
            .collect();
        nibbles
            .chunks(2)
            .map(|pair| (pair[0] & RS != 0, (pair[0] & 0xF0) | (pair[1] >> 4)))
            .collect()
    }

    #[test]
    fn init_leaves_default_state() {
        let (_, lcd) = lcd(20, 4);
        assert_eq!(lcd.display_control(), DisplayControl::DEFAULT);
        assert_eq!(lcd.entry_mode(), EntryMode::DEFAULT);
        assert!(lcd.function_set().contains(FunctionSet::TWO_LINE));
        assert!(!lcd.is_backlight_on());
    }

    #[test]
    fn begin_sends_configuration_in_order() {
        let timeline = Timeline::new();
        let mut lcd = TestLcd::new(timeline.bus(), timeline.delay(), 0x27, 16, 1);
        lcd.begin(16, 1, FontSize::Dots5x10);

        let commands = latched(&timeline);
        // 0x33 and 0x32 are the synchronisation nibbles read back in pairs
        assert_eq!(
            commands,
            vec![
                (false, 0x33),
                (false, 0x32),
                (false, 0x24),
                (false, 0x0C),
                (false, 0x01),
                (false, 0x06),
                (false, 0x02),
            ]
        );
    }

    #[test]
    fn begin_waits_in_order() {
        let timeline = Timeline::new();
        let mut lcd = TestLcd::new(timeline.bus(), timeline.delay(), 0x27, 16, 2);
        lcd.begin(16, 2, FontSize::Dots5x8);

        let byte = [NIBBLE, NIBBLE].concat();
        let long = [byte.clone(), vec![BusEvent::DelayUs(2000)]].concat();
        let expected = [
            vec![BusEvent::DelayMs(50), BusEvent::DelayMs(1000)],
            NIBBLE.to_vec(),
            vec![BusEvent::DelayUs(4500)],
            NIBBLE.to_vec(),
            vec![BusEvent::DelayUs(4500)],
            NIBBLE.to_vec(),
            vec![BusEvent::DelayUs(150)],
            NIBBLE.to_vec(),
            // function set, display control
            byte.clone(),
            byte.clone(),
            // clear
            long.clone(),
            // entry mode
            byte,
            // home
            long,
        ]
        .concat();
        assert_eq!(waits(&timeline), expected);
    }

    #[test]
    fn clear_and_home_wait_for_long_instruction() {
        let (timeline, mut lcd) = lcd(16, 2);

        lcd.clear();
        let events = timeline.events();
        assert_eq!(latched(&timeline), vec![(false, 0x01)]);
        assert_eq!(events[events.len() - 2..], [BusEvent::DelayUs(50), BusEvent::DelayUs(2000)]);

        timeline.clear();
        lcd.home();
        let events = timeline.events();
        assert_eq!(latched(&timeline), vec![(false, 0x02)]);
        assert_eq!(events[events.len() - 2..], [BusEvent::DelayUs(50), BusEvent::DelayUs(2000)]);

        assert_eq!(
            waits(&timeline),
            [NIBBLE.to_vec(), NIBBLE.to_vec(), vec![BusEvent::DelayUs(2000)]].concat()
        );
    }

    #[test]
    fn toggles_resend_whole_register() {
        let (timeline, mut lcd) = lcd(16, 2);

        lcd.cursor();
        lcd.blink();
        lcd.no_display();
        lcd.no_cursor();
        lcd.display();

        assert_eq!(
            latched(&timeline),
            vec![(false, 0x0E), (false, 0x0F), (false, 0x0B), (false, 0x09), (false, 0x0D)]
        );
    }

    #[test]
    fn entry_mode_toggles() {
        let (timeline, mut lcd) = lcd(16, 2);

        lcd.autoscroll();
        lcd.right_to_left();
        lcd.no_autoscroll();
        lcd.left_to_right();

        assert_eq!(
            latched(&timeline),
            vec![(false, 0x07), (false, 0x05), (false, 0x04), (false, 0x06)]
        );
    }

    #[test]
    fn scrolling() {
        let (timeline, mut lcd) = lcd(16, 2);

        lcd.scroll_display_left();
        lcd.scroll_display_right();

        assert_eq!(latched(&timeline), vec![(false, 0x18), (false, 0x1C)]);
    }

    #[test]
    fn set_cursor_rows() {
        let (timeline, mut lcd) = lcd(20, 4);

        lcd.set_cursor(0, 0);
        lcd.set_cursor(1, 1);
        lcd.set_cursor(2, 2);
        lcd.set_cursor(3, 3);

        assert_eq!(
            latched(&timeline),
            vec![(false, 0x80), (false, 0xC1), (false, 0x96), (false, 0xD7)]
        );
    }

    #[test]
    fn set_cursor_clamps_to_offset_table() {
        let (timeline, mut lcd) = lcd(40, 8);

        lcd.set_cursor(0, 7);

        assert_eq!(latched(&timeline), vec![(false, 0x80 | 0x54)]);
    }

    #[test]
    fn create_char_masks_location() {
        let (timeline, mut lcd) = lcd(16, 2);

        lcd.create_char(9, &[1, 2, 3, 4, 5, 6, 7, 8]);

        let sent = latched(&timeline);
        assert_eq!(sent[0], (false, 0x48));
        assert_eq!(sent[1..].iter().map(|(rs, _)| *rs).collect::<Vec<_>>(), vec![true; 8]);
        assert_eq!(sent[1..].iter().map(|(_, b)| *b).collect::<Vec<_>>(), vec![1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn print_replaces_non_ascii() {
        let (timeline, mut lcd) = lcd(16, 2);

        assert_eq!(lcd.print("hé"), 2);

        assert_eq!(latched(&timeline), vec![(true, b'h'), (true, b'?')]);
    }

    #[test]
    fn formatting_writes_through() {
        let (timeline, mut lcd) = lcd(16, 2);

        write!(lcd, "{:>3}", 7).unwrap();

        assert_eq!(latched(&timeline), vec![(true, b' '), (true, b' '), (true, b'7')]);
    }
}
