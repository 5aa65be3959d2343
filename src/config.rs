//! Application-wide constants and compile-time configuration.
//!
//! All hardware pin assignments, timing parameters, and protocol
//! constants live here so they can be tuned in one place.

// Key pipeline

/// Depth of the key event queue between the key source and the
/// reporter loop.  Events beyond this are dropped, never blocked on.
pub const EVENT_QUEUE_DEPTH: usize = 16;

/// Simultaneously reported non-modifier keys (boot protocol 6KRO).
pub const MAX_PRESSED_KEYS: usize = 6;

// USB

/// USB VID/PID - use the "pid.codes" open-source test VID.
/// Replace with your own allocated VID/PID for production.
pub const USB_VID: u16 = 0x1209;
pub const USB_PID: u16 = 0x0002;

/// USB device strings.
pub const USB_MANUFACTURER: &str = "usbkbd";
pub const USB_PRODUCT: &str = "88-key HID Keyboard";
pub const USB_SERIAL_NUMBER: &str = "000001";

/// Bus power drawn from the host (mA).
pub const USB_MAX_POWER_MA: u16 = 100;

/// USB HID polling interval (ms). 1 ms = 1000 Hz for lowest latency.
pub const USB_HID_POLL_MS: u8 = 1;

/// Ask the host to resume the bus when a key is pressed during suspend.
pub const USB_REMOTE_WAKEUP: bool = true;

// GPIO pin assignments (nRF52840-DK defaults)
//
// These are logical names; the actual `embassy_nrf::peripherals::*`
// pins are picked in `main.rs`.  Adjust for your custom PCB.
//
//   Key 0 (Left Shift) → P0.11
//   Key 1 (A)          → P0.12
//   Key 2 (B)          → P0.24
//   Key 3 (Caps Lock)  → P0.25
//   Num Lock LED       → P0.13
//   Caps Lock LED      → P0.14
//   Scroll Lock LED    → P0.15

/// Logical key identifiers (Linux input codes) bound to the dev-kit
/// buttons, in pin order.
pub const GPIO_KEYS: [u16; 4] = [
    crate::hid::keymap::KEY_LEFTSHIFT,
    crate::hid::keymap::KEY_A,
    crate::hid::keymap::KEY_B,
    crate::hid::keymap::KEY_CAPSLOCK,
];

/// Key debounce time (ms).
pub const KEY_DEBOUNCE_MS: u64 = 20;

/// Status LEDs on the DK sink current: driving the pin low lights them.
pub const LED_ACTIVE_LOW: bool = true;
