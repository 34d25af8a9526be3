use dotenv::dotenv;
use i2c_lcd::delay::SleepDelay;
use i2c_lcd::hd44780::display::LiquidCrystalI2c;
use i2c_lcd::hd44780::expander::{Expander, Pcf8574};
use i2c_lcd::i2c::linux::LinuxI2cBus;
use log::{debug, info};
use std::env::var;
use std::fmt::Write;
use std::thread::sleep;
use std::time::Duration;
use sysinfo::System;
use time::macros::format_description;
use time::OffsetDateTime;

const UNKNOWN_STR: &str = "???";

const CLOCK_GLYPH: [u8; 8] = [
    0b00000,
    0b01110,
    0b10101,
    0b10111,
    0b10001,
    0b01110,
    0b00000,
    0b00000,
];

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> eyre::Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match var(name) {
        Ok(value) => Ok(value.trim().parse()?),
        Err(_) => Ok(default),
    }
}

fn parse_address(value: &str) -> eyre::Result<u8> {
    let value = value.trim();
    let address = match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16)?,
        None => value.parse()?,
    };
    if address > 0x7F {
        return Err(eyre::eyre!("I2C address {:#x} is not a 7-bit address", address));
    }
    Ok(address)
}

fn main() -> eyre::Result<()> {
    dotenv().ok();
    pretty_env_logger::init();

    info!(
        "Hello, {}!",
        System::name().as_deref().unwrap_or(UNKNOWN_STR)
    );
    info!(
        "System ver {} kernel ver {}",
        System::long_os_version().as_deref().unwrap_or(UNKNOWN_STR),
        System::kernel_version().as_deref().unwrap_or(UNKNOWN_STR),
    );
    info!("Architecture {}", System::cpu_arch());

    let bus_no: u8 = env_or("LCD_I2C_BUS", 1)?;
    let address = match var("LCD_I2C_ADDRESS") {
        Ok(value) => parse_address(&value)?,
        Err(_) => Pcf8574::DEFAULT_ADDRESS,
    };
    let columns: u8 = env_or("LCD_COLUMNS", 16)?;
    let rows: u8 = env_or("LCD_ROWS", 2)?;

    info!("LCD @ /dev/i2c-{} {:#04x}, {}x{}", bus_no, address, columns, rows);

    let mut lcd: LiquidCrystalI2c<_, _, Pcf8574> =
        LiquidCrystalI2c::new(LinuxI2cBus::new(bus_no), SleepDelay, address, columns, rows);

    lcd.init()?;
    lcd.backlight();
    debug!("{:?} initialized.", lcd);

    lcd.create_char(0, &CLOCK_GLYPH);

    lcd.set_cursor(0, 0);
    let hostname = System::host_name().unwrap_or_else(|| UNKNOWN_STR.to_string());
    lcd.print(&hostname);

    lcd.cursor();
    lcd.blink();
    sleep(Duration::from_secs(2));
    lcd.no_blink();
    lcd.no_cursor();

    let format = format_description!("[hour]:[minute]:[second]");
    let offset = time::UtcOffset::current_local_offset().unwrap_or(time::UtcOffset::UTC);

    info!("Starting clock loop...");

    loop {
        let now = OffsetDateTime::now_utc().to_offset(offset);

        lcd.set_cursor(0, 1);
        lcd.write_byte(0);
        write!(lcd, " {}", now.format(&format)?)?;

        sleep(Duration::from_millis(500));
    }
}
