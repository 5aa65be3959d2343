//! usbkbd - USB HID boot keyboard pipeline.
//!
//! Key events (logical key + pressed/released) flow through a bounded
//! queue into the reporter, which folds them into the keyboard state and
//! sends the 8-byte boot report to the host.
//!
//! Everything except `input` and `usb::hid_device` is hardware-free and
//! runs on the host: `cargo test --lib` or `cargo test`.
//!
//! Note: The embedded binary uses main.rs with #![no_std] and #![no_main]
//! and needs `--features embedded`.

#![cfg_attr(not(test), no_std)]

// This mod MUST go first, so that the others see its macros.
mod fmt;

pub mod config;
pub mod error;
pub mod events;
pub mod hid;
pub mod leds;
pub mod state;
pub mod usb;

#[cfg(feature = "embedded")]
pub mod input;

pub use error::Error;
pub use events::{deliver, KeyChannel, KeyEvent};
pub use hid::KeyboardReport;
pub use state::{Folded, KeyboardState, Protocol};
pub use usb::handlers::{Keyboard, LinkState};
pub use usb::reporter::{HidTransport, Reporter};
