//! Key event queue between the key source and the reporter loop.
//!
//! The key source runs in its own context (GPIO edge tasks, a matrix
//! scanner, an interrupt) and must never block, so [`deliver`] uses
//! `try_send` and drops the event when the queue is full.  The reporter
//! is the single consumer and waits on `receive()`.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Channel, Receiver, Sender};

use crate::config::EVENT_QUEUE_DEPTH;
use crate::error::Error;

/// One debounced key transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyEvent {
    /// Logical key identifier (Linux input code).
    pub key: u16,
    pub pressed: bool,
}

impl KeyEvent {
    pub const fn new(key: u16, pressed: bool) -> Self {
        Self { key, pressed }
    }
}

pub type KeyChannel = Channel<CriticalSectionRawMutex, KeyEvent, EVENT_QUEUE_DEPTH>;
pub type KeySender<'a> = Sender<'a, CriticalSectionRawMutex, KeyEvent, EVENT_QUEUE_DEPTH>;
pub type KeyReceiver<'a> = Receiver<'a, CriticalSectionRawMutex, KeyEvent, EVENT_QUEUE_DEPTH>;

/// Queue a key transition without blocking.
///
/// On a full queue the event is dropped and [`Error::ChannelFull`]
/// returned; the caller may log it but must carry on.
pub fn deliver(tx: &KeySender<'_>, key: u16, pressed: bool) -> Result<(), Error> {
    let event = KeyEvent::new(key, pressed);
    tx.try_send(event).map_err(|_| {
        error!("key queue full, dropped {:?}", event);
        Error::ChannelFull
    })
}
