//! USB side of the keyboard: shared state behind the HID class requests,
//! the reporter loop and (on target) the embassy-usb device glue.
//!
//! The nRF52840's built-in USB 2.0 Full-Speed controller is driven by
//! `embassy-usb` with a single boot-keyboard interface.

pub mod handlers;
pub mod reporter;

#[cfg(feature = "embedded")]
pub mod hid_device;
