//! Host-facing request handlers and the shared keyboard state.
//!
//! Two contexts touch the keyboard: the reporter loop (fold + build on
//! every key event) and the USB stack's control-request callbacks
//! (GET_REPORT, SET_REPORT, GET/SET_IDLE, SET_PROTOCOL, bus state).
//! Both go through [`Keyboard`], which keeps state, the last built
//! report and the link flags behind one blocking mutex.  Every critical
//! section is a handful of field accesses; nothing awaits while locked.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;

use crate::error::Error;
use crate::events::KeyEvent;
use crate::hid::keyboard::{KeyboardReport, KEYBOARD_REPORT_SIZE};
use crate::state::{Folded, KeyboardState, Protocol};

/// Bus/interface state as seen by the reporter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkState {
    /// Interface not configured by the host.
    NotReady,
    /// Configured and running; reports go out.
    Ready,
    /// Configured but the bus is suspended; a key press should wake it.
    Suspended,
}

/// HID report type of a GET_REPORT / SET_REPORT request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReportType {
    Input,
    Output,
    Feature,
}

/// Keyboard LEDs in output-report bit order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Led {
    NumLock = 0,
    CapsLock = 1,
    ScrollLock = 2,
}

impl Led {
    pub const ALL: [Led; 3] = [Led::NumLock, Led::CapsLock, Led::ScrollLock];

    pub const fn index(self) -> usize {
        self as usize
    }

    /// Whether this LED is lit in an output report's first byte.
    pub const fn is_set(self, mask: u8) -> bool {
        mask & (1 << self as u8) != 0
    }
}

/// Something that can drive the indicator LEDs.
///
/// Implementations are expected to succeed, or silently skip an LED
/// that has no physical line.
pub trait Indicators {
    fn set_indicator(&mut self, led: Led, active: bool);
}

/// Result of folding one event under the lock.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Applied {
    pub folded: Folded,
    pub report: KeyboardReport,
    pub link: LinkState,
}

struct Shared {
    state: KeyboardState,
    report: KeyboardReport,
    ready: bool,
    suspended: bool,
}

impl Shared {
    fn link(&self) -> LinkState {
        match (self.ready, self.suspended) {
            (false, _) => LinkState::NotReady,
            (true, false) => LinkState::Ready,
            (true, true) => LinkState::Suspended,
        }
    }
}

/// Shared keyboard: state, last built report and link flags.
pub struct Keyboard {
    inner: Mutex<CriticalSectionRawMutex, RefCell<Shared>>,
}

impl Default for Keyboard {
    fn default() -> Self {
        Self::new()
    }
}

impl Keyboard {
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(Shared {
                state: KeyboardState::new(),
                report: KeyboardReport::empty(),
                ready: false,
                suspended: false,
            })),
        }
    }

    fn with<R>(&self, f: impl FnOnce(&mut Shared) -> R) -> R {
        self.inner.lock(|cell| f(&mut cell.borrow_mut()))
    }

    /// Fold a key event and rebuild the report, atomically with respect
    /// to the request handlers.
    pub fn apply(&self, event: KeyEvent) -> Applied {
        self.with(|shared| {
            let folded = shared.state.fold(event);
            shared.report = shared.state.report();
            Applied {
                folded,
                report: shared.report,
                link: shared.link(),
            }
        })
    }

    /// The most recently built report.
    pub fn report(&self) -> KeyboardReport {
        self.with(|shared| shared.report)
    }

    pub fn link_state(&self) -> LinkState {
        self.with(|shared| shared.link())
    }

    // Transport notifications

    /// Interface configured (`true`) or deconfigured by the host.
    pub fn on_interface_ready(&self, ready: bool) {
        info!("HID interface is {}", if ready { "ready" } else { "not ready" });
        self.with(|shared| shared.ready = ready);
    }

    /// Bus suspended (`true`) or resumed.
    pub fn on_suspend(&self, suspended: bool) {
        info!("USB bus {}", if suspended { "suspended" } else { "resumed" });
        self.with(|shared| shared.suspended = suspended);
    }

    /// USB bus reset: the host will enumerate again.
    ///
    /// Only the link flags and the protocol are reset.  Key state tracks
    /// the physical keys, so anything still held is reported again once
    /// the host has configured the interface.
    pub fn on_bus_reset(&self) {
        info!("USB bus reset");
        self.with(|shared| {
            shared.ready = false;
            shared.suspended = false;
            shared.state.set_protocol(Protocol::Report);
        });
    }

    // Host requests

    /// GET_REPORT.  Copies the last built report into `buf`.
    ///
    /// Only input reports are served, and only into a buffer that can
    /// hold a whole report.
    pub fn get_input_report(&self, kind: ReportType, buf: &mut [u8]) -> Result<usize, Error> {
        if kind != ReportType::Input || buf.len() < KEYBOARD_REPORT_SIZE {
            warn!(
                "Get Report not implemented, type {:?} len {}",
                kind,
                buf.len()
            );
            return Err(Error::UnsupportedRequest);
        }
        Ok(self.report().serialize(buf))
    }

    /// SET_REPORT / interrupt OUT.  Byte 0 of an output report carries
    /// the LED bits, forwarded straight to `leds` (not stored).
    pub fn set_output_report(
        &self,
        kind: ReportType,
        data: &[u8],
        leds: &mut impl Indicators,
    ) -> Result<(), Error> {
        if kind != ReportType::Output {
            warn!("Unsupported report type {:?}", kind);
            return Err(Error::UnsupportedRequest);
        }
        let Some(&mask) = data.first() else {
            warn!("Empty output report");
            return Err(Error::UnsupportedRequest);
        };

        debug!("LED output report {:#x}", mask);
        for led in Led::ALL {
            leds.set_indicator(led, led.is_set(mask));
        }
        Ok(())
    }

    /// SET_IDLE.  Stored and echoed back; the reporter does not act on it.
    pub fn set_idle(&self, duration: u32) {
        info!("Set Idle to {}", duration);
        self.with(|shared| shared.state.set_idle(duration));
    }

    /// GET_IDLE.
    pub fn idle(&self) -> u32 {
        let duration = self.with(|shared| shared.state.idle());
        info!("Get Idle {}", duration);
        duration
    }

    /// SET_PROTOCOL.  Recorded only; the report layout never changes.
    pub fn set_protocol(&self, protocol: Protocol) {
        info!("Protocol changed to {:?}", protocol);
        self.with(|shared| shared.state.set_protocol(protocol));
    }

    /// GET_PROTOCOL.
    pub fn protocol(&self) -> Protocol {
        self.with(|shared| shared.state.protocol())
    }
}
