//! HID keyboard model: key translation, the six-key rollover set and the
//! boot-protocol input report.

pub mod keyboard;
pub mod keymap;
pub mod rollover;


pub use keyboard::KeyboardReport;
pub use keymap::{translate, KeyClass};
pub use rollover::RolloverSet;
