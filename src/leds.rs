//! Keyboard status LEDs (Num / Caps / Scroll Lock) on GPIO outputs.

use embedded_hal::digital::OutputPin;

use crate::usb::handlers::{Indicators, Led};

/// Three indicator outputs.  A `None` slot is an LED the board doesn't
/// have; updates for it are skipped.
pub struct LedBank<P> {
    pins: [Option<P>; 3],
    active_low: bool,
}

impl<P: OutputPin> LedBank<P> {
    /// `pins` is indexed by [`Led`]: Num Lock, Caps Lock, Scroll Lock.
    /// All LEDs start switched off.
    pub fn new(pins: [Option<P>; 3], active_low: bool) -> Self {
        let mut bank = Self { pins, active_low };
        for led in Led::ALL {
            bank.set_indicator(led, false);
        }
        bank
    }
}

impl<P: OutputPin> Indicators for LedBank<P> {
    fn set_indicator(&mut self, led: Led, active: bool) {
        let Some(pin) = self.pins[led.index()].as_mut() else {
            return;
        };
        let drive_high = active != self.active_low;
        let res = if drive_high {
            pin.set_high()
        } else {
            pin.set_low()
        };
        if res.is_err() {
            warn!("LED {:?} pin write failed", led);
        }
    }
}
