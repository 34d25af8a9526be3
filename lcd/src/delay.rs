//! Blocking waits for hosts with an operating system.
//!
//! The driver only needs [DelayNs]; any `embedded-hal` 1.0 delay works. The waits are lower
//! bounds, so sleeping longer is fine.

use embedded_hal::delay::DelayNs;
use std::thread::sleep;
use std::time::Duration;

/// [DelayNs] backed by [std::thread::sleep].
#[derive(Copy, Clone, Debug, Default)]
pub struct SleepDelay;

impl DelayNs for SleepDelay {
    fn delay_ns(&mut self, ns: u32) {
        sleep(Duration::from_nanos(ns.into()));
    }

    fn delay_us(&mut self, us: u32) {
        sleep(Duration::from_micros(us.into()));
    }

    fn delay_ms(&mut self, ms: u32) {
        sleep(Duration::from_millis(ms.into()));
    }
}
