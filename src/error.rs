//! Unified error type for usbkbd.
//!
//! We avoid `alloc` - all error variants are fieldless so the enum stays
//! `Copy`.  Implements `defmt::Format` (with the `defmt` feature) for
//! efficient on-target logging.
//!
//! None of these are fatal: every caller logs and carries on.

use core::fmt;

/// Top-level error type used across the firmware.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    // Key pipeline
    /// Six keys are already held; the new key is not reported.
    RolloverFull,

    /// The key event queue is full; the event was dropped.
    ChannelFull,

    // Transport
    /// Host request with the wrong report type or a too-short buffer.
    UnsupportedRequest,

    /// USB stack returned an error while writing a report.
    Usb,

    /// The bus could not be asked to resume.
    WakeUnavailable,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Error::RolloverFull => "6KRO limit reached",
            Error::ChannelFull => "key event queue full",
            Error::UnsupportedRequest => "unsupported HID request",
            Error::Usb => "USB write failed",
            Error::WakeUnavailable => "remote wakeup unavailable",
        };
        f.write_str(msg)
    }
}
