//! Fake transport and delay that record what the driver does instead of touching hardware.
//!
//! Both halves share one [Timeline], so the order of transmissions and waits can be asserted:
//!
//! ```
//! use i2c_lcd::i2c::recording::{BusEvent, Timeline};
//! use i2c_lcd::i2c::I2cBus;
//! use embedded_hal::delay::DelayNs;
//!
//! let timeline = Timeline::new();
//! let mut bus = timeline.bus();
//! let mut delay = timeline.delay();
//!
//! bus.transmit(0x27, &[0x08]).unwrap();
//! delay.delay_us(50);
//!
//! assert_eq!(timeline.events(), vec![
//!     BusEvent::Transmission { address: 0x27, bytes: vec![0x08] },
//!     BusEvent::DelayUs(50),
//! ]);
//! ```

use crate::i2c::I2cBus;
use crate::{LcdError, LcdResult};
use embedded_hal::delay::DelayNs;
use std::cell::RefCell;
use std::rc::Rc;

/// Something the driver did, in the order it happened.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum BusEvent {
    /// A completed, acknowledged write cycle.
    Transmission { address: u8, bytes: Vec<u8> },
    /// A nanosecond wait.
    DelayNs(u32),
    /// A microsecond wait.
    DelayUs(u32),
    /// A millisecond wait.
    DelayMs(u32),
}

#[derive(Debug, Default)]
struct TimelineState {
    events: Vec<BusEvent>,
    nack: bool,
}

/// Shared log of [BusEvent]s.
#[derive(Clone, Debug, Default)]
pub struct Timeline {
    state: Rc<RefCell<TimelineState>>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a bus that records into this timeline.
    pub fn bus(&self) -> RecordingBus {
        RecordingBus {
            timeline: self.clone(),
            pending: None,
        }
    }

    /// Creates a delay that records into this timeline.
    pub fn delay(&self) -> RecordingDelay {
        RecordingDelay {
            timeline: self.clone(),
        }
    }

    /// Makes every following transaction fail with [LcdError::Nack] until switched off.
    /// Failed transactions are not recorded.
    pub fn set_nack(&self, nack: bool) {
        self.state.borrow_mut().nack = nack;
    }

    /// All events so far.
    pub fn events(&self) -> Vec<BusEvent> {
        self.state.borrow().events.clone()
    }

    /// Payloads of all transmissions so far, without addresses.
    pub fn transmissions(&self) -> Vec<Vec<u8>> {
        self.state
            .borrow()
            .events
            .iter()
            .filter_map(|event| match event {
                BusEvent::Transmission { bytes, .. } => Some(bytes.clone()),
                _ => None,
            })
            .collect()
    }

    /// Forgets everything recorded so far.
    pub fn clear(&self) {
        self.state.borrow_mut().events.clear();
    }

    fn push(&self, event: BusEvent) {
        self.state.borrow_mut().events.push(event);
    }
}

/// [I2cBus] that records transmissions into a [Timeline].
#[derive(Debug)]
pub struct RecordingBus {
    timeline: Timeline,
    pending: Option<(u8, Vec<u8>)>,
}

impl I2cBus for RecordingBus {
    fn begin_transmission(&mut self, address: u8) {
        self.pending = Some((address, Vec::new()));
    }

    fn write(&mut self, byte: u8) {
        if let Some((_, bytes)) = &mut self.pending {
            bytes.push(byte);
        }
    }

    fn end_transmission(&mut self) -> LcdResult<()> {
        let (address, bytes) = self.pending.take().ok_or(LcdError::InvalidArgument)?;
        if self.timeline.state.borrow().nack {
            return Err(LcdError::Nack { address });
        }
        self.timeline.push(BusEvent::Transmission { address, bytes });
        Ok(())
    }
}

/// [DelayNs] that records waits into a [Timeline] and returns immediately.
///
/// Each wait is recorded in the unit it was requested in.
#[derive(Debug)]
pub struct RecordingDelay {
    timeline: Timeline,
}

impl DelayNs for RecordingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.timeline.push(BusEvent::DelayNs(ns));
    }

    fn delay_us(&mut self, us: u32) {
        self.timeline.push(BusEvent::DelayUs(us));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.timeline.push(BusEvent::DelayMs(ms));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_in_order() {
        let timeline = Timeline::new();
        let mut bus = timeline.bus();
        let mut delay = timeline.delay();

        delay.delay_ms(50);
        bus.transmit(0x20, &[0x03, 0x10]).unwrap();
        delay.delay_us(1);

        assert_eq!(
            timeline.events(),
            vec![
                BusEvent::DelayMs(50),
                BusEvent::Transmission { address: 0x20, bytes: vec![0x03, 0x10] },
                BusEvent::DelayUs(1),
            ]
        );
        assert_eq!(timeline.transmissions(), vec![vec![0x03, 0x10]]);
    }

    #[test]
    fn nack_fails_and_skips_recording() {
        let timeline = Timeline::new();
        let mut bus = timeline.bus();

        timeline.set_nack(true);
        assert_eq!(bus.transmit(0x27, &[0x00]), Err(LcdError::Nack { address: 0x27 }));
        assert!(timeline.events().is_empty());

        timeline.set_nack(false);
        assert_eq!(bus.transmit(0x27, &[0x00]), Ok(()));
        assert_eq!(timeline.transmissions().len(), 1);
    }

    #[test]
    fn delays_keep_their_unit() {
        let timeline = Timeline::new();
        let mut delay = timeline.delay();

        delay.delay_ns(450);
        delay.delay_us(2000);
        delay.delay_ms(2);

        assert_eq!(
            timeline.events(),
            vec![BusEvent::DelayNs(450), BusEvent::DelayUs(2000), BusEvent::DelayMs(2)]
        );
    }

    #[test]
    fn end_without_begin_is_rejected() {
        let mut bus = Timeline::new().bus();
        assert_eq!(bus.end_transmission(), Err(LcdError::InvalidArgument));
    }
}
