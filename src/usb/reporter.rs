//! Reporter loop - drains the key queue and pushes reports to the host.
//!
//! One event per iteration: fold it into the shared keyboard, then
//! either submit the fresh report, skip (interface not ready), or ask
//! the host to resume the bus (suspended and a key went down).  A failed
//! submission is not retried; the next event sends a report built from
//! the current state anyway.

use crate::config;
use crate::error::Error;
use crate::events::KeyReceiver;
use crate::hid::keyboard::KEYBOARD_REPORT_SIZE;
use crate::state::Folded;
use crate::usb::handlers::{Keyboard, LinkState};

/// The HID transport as seen by the reporter.
#[allow(async_fn_in_trait)]
pub trait HidTransport {
    /// Send one input report on the interrupt IN endpoint.
    async fn submit(&mut self, report: &[u8; KEYBOARD_REPORT_SIZE]) -> Result<(), Error>;

    /// Ask the host to resume a suspended bus.
    fn request_wake(&mut self) -> Result<(), Error>;
}

/// What one [`Reporter::step`] ended up doing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Step {
    Submitted,
    /// Interface not configured; report built but not sent.
    NotReady,
    /// Bus suspended; a remote wakeup was requested.
    WakeRequested,
    /// Bus suspended; nothing sent, no wakeup asked for.
    Suspended,
    /// Submission or wakeup request failed.
    Failed(Error),
}

pub struct Reporter<'a, T> {
    keyboard: &'a Keyboard,
    events: KeyReceiver<'a>,
    transport: T,
}

impl<'a, T: HidTransport> Reporter<'a, T> {
    pub fn new(keyboard: &'a Keyboard, events: KeyReceiver<'a>, transport: T) -> Self {
        Self {
            keyboard,
            events,
            transport,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Wait for the next key event and handle it.
    pub async fn step(&mut self) -> Step {
        let event = self.events.receive().await;
        let applied = self.keyboard.apply(event);

        match applied.folded {
            Folded::Dropped(code) => warn!("6KRO limit reached, key {:#x} ignored", code),
            Folded::Unmapped(key) => debug!("Unmapped input code: {}", key),
            _ => {}
        }

        match applied.link {
            LinkState::NotReady => {
                debug!("USB HID device is not ready");
                Step::NotReady
            }
            LinkState::Suspended if event.pressed && config::USB_REMOTE_WAKEUP => {
                match self.transport.request_wake() {
                    Ok(()) => Step::WakeRequested,
                    Err(e) => {
                        error!("Remote wakeup error, {:?}", e);
                        Step::Failed(e)
                    }
                }
            }
            LinkState::Suspended => Step::Suspended,
            LinkState::Ready => match self.transport.submit(&applied.report.to_bytes()).await {
                Ok(()) => Step::Submitted,
                Err(e) => {
                    error!("HID submit report error, {:?}", e);
                    Step::Failed(e)
                }
            },
        }
    }

    /// Run for the lifetime of the firmware.
    pub async fn run(&mut self) -> ! {
        info!("Reporter started - waiting for key events");
        loop {
            let step = self.step().await;
            trace!("reporter step: {:?}", step);
        }
    }
}
