//! Authoritative keyboard state and the event fold.
//!
//! `KeyboardState` is owned by whoever holds the shared keyboard lock
//! (see `usb::handlers`).  Every key transition goes through [`fold`],
//! the only place the modifier byte and rollover set change.
//!
//! [`fold`]: KeyboardState::fold

use crate::events::KeyEvent;
use crate::hid::keyboard::KeyboardReport;
use crate::hid::keymap::{self, KeyClass};
use crate::hid::rollover::{Removed, RolloverSet};

/// HID protocol selected by the host with SET_PROTOCOL.
///
/// Informational only: the same boot layout is sent in both modes, as
/// the report descriptor describes exactly that layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Protocol {
    Boot,
    #[default]
    Report,
}

impl From<u8> for Protocol {
    fn from(value: u8) -> Self {
        match value {
            0 => Protocol::Boot,
            _ => Protocol::Report,
        }
    }
}

/// What a single [`KeyboardState::fold`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Folded {
    /// A modifier bit was set or cleared.
    Modifier { bit: u8, pressed: bool },
    /// A key was added to the rollover set (or was already held).
    Pressed(u8),
    /// A key left the rollover set (or was not tracked).
    Released(u8),
    /// The rollover set was full; this key is not reported.
    Dropped(u8),
    /// The key has no HID usage.
    Unmapped(u16),
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KeyboardState {
    modifiers: u8,
    keys: RolloverSet,
    idle: u32,
    protocol: Protocol,
}

impl KeyboardState {
    pub const fn new() -> Self {
        Self {
            modifiers: 0,
            keys: RolloverSet::new(),
            idle: 0,
            protocol: Protocol::Report,
        }
    }

    /// Apply one key transition.  Never fails: a full rollover set or
    /// the release of an untracked key leaves the state valid.
    pub fn fold(&mut self, event: KeyEvent) -> Folded {
        match keymap::translate(event.key) {
            KeyClass::Modifier(bit) => {
                if event.pressed {
                    self.modifiers |= bit;
                } else {
                    self.modifiers &= !bit;
                }
                Folded::Modifier {
                    bit,
                    pressed: event.pressed,
                }
            }
            KeyClass::Usage(code) if event.pressed => match self.keys.insert(code) {
                Ok(_) => Folded::Pressed(code),
                Err(_) => Folded::Dropped(code),
            },
            KeyClass::Usage(code) => {
                if self.keys.remove(code) == Removed::NotPresent {
                    trace!("release of untracked usage {:#x}", code);
                }
                Folded::Released(code)
            }
            KeyClass::Unmapped => Folded::Unmapped(event.key),
        }
    }

    /// Build the boot report for the current state.
    pub fn report(&self) -> KeyboardReport {
        KeyboardReport::build(self.modifiers, self.keys.as_slice())
    }

    pub fn modifiers(&self) -> u8 {
        self.modifiers
    }

    pub fn keys(&self) -> &RolloverSet {
        &self.keys
    }

    pub fn idle(&self) -> u32 {
        self.idle
    }

    pub fn set_idle(&mut self, duration: u32) {
        self.idle = duration;
    }

    pub fn protocol(&self) -> Protocol {
        self.protocol
    }

    pub fn set_protocol(&mut self, protocol: Protocol) {
        self.protocol = protocol;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hid::keymap::*;

    fn press(key: u16) -> KeyEvent {
        KeyEvent::new(key, true)
    }

    fn release(key: u16) -> KeyEvent {
        KeyEvent::new(key, false)
    }

    #[test]
    fn fresh_state_builds_zero_report() {
        let state = KeyboardState::new();
        assert_eq!(state.report().to_bytes(), [0; 8]);
        assert_eq!(state.protocol(), Protocol::Report);
    }

    #[test]
    fn modifier_press_release_restores_mask() {
        let mut state = KeyboardState::new();
        state.fold(press(KEY_RIGHTALT));
        let before = state.modifiers();

        assert_eq!(
            state.fold(press(KEY_LEFTCTRL)),
            Folded::Modifier {
                bit: modifier::LEFT_CTRL,
                pressed: true
            }
        );
        state.fold(release(KEY_LEFTCTRL));
        assert_eq!(state.modifiers(), before);
        assert_eq!(state.modifiers(), modifier::RIGHT_ALT);
    }

    #[test]
    fn modifier_fold_is_idempotent() {
        let mut state = KeyboardState::new();
        state.fold(press(KEY_LEFTSHIFT));
        state.fold(press(KEY_LEFTSHIFT));
        assert_eq!(state.modifiers(), modifier::LEFT_SHIFT);

        state.fold(release(KEY_LEFTSHIFT));
        state.fold(release(KEY_LEFTSHIFT));
        assert_eq!(state.modifiers(), 0);
    }

    #[test]
    fn modifiers_never_enter_rollover() {
        let mut state = KeyboardState::new();
        for key in [KEY_LEFTCTRL, KEY_LEFTSHIFT, KEY_LEFTALT, KEY_LEFTMETA] {
            state.fold(press(key));
        }
        assert!(state.keys().is_empty());
        assert_eq!(state.modifiers(), 0x0F);
    }

    #[test]
    fn seventh_key_is_dropped_and_later_release_is_harmless() {
        let mut state = KeyboardState::new();
        let keys = [KEY_A, KEY_S, KEY_D, KEY_F, KEY_G, KEY_H, KEY_J];
        for &k in &keys[..6] {
            assert!(matches!(state.fold(press(k)), Folded::Pressed(_)));
        }
        assert_eq!(state.fold(press(KEY_J)), Folded::Dropped(usage::J));
        assert_eq!(state.keys().len(), 6);

        // Release of the rejected key: nothing to remove.
        assert_eq!(state.fold(release(KEY_J)), Folded::Released(usage::J));
        assert_eq!(state.keys().len(), 6);
    }

    #[test]
    fn unmapped_key_changes_nothing() {
        let mut state = KeyboardState::new();
        state.fold(press(KEY_A));
        let before = state.clone();
        assert_eq!(state.fold(press(300)), Folded::Unmapped(300));
        assert_eq!(state.fold(press(KEY_RESERVED)), Folded::Unmapped(0));
        assert_eq!(state, before);
    }

    #[test]
    fn order_matters_for_same_key() {
        let mut a = KeyboardState::new();
        a.fold(press(KEY_B));
        a.fold(release(KEY_B));
        assert!(!a.keys().contains(usage::B));

        let mut b = KeyboardState::new();
        b.fold(release(KEY_B));
        b.fold(press(KEY_B));
        assert!(b.keys().contains(usage::B));
    }

    #[test]
    fn protocol_from_wire_value() {
        assert_eq!(Protocol::from(0), Protocol::Boot);
        assert_eq!(Protocol::from(1), Protocol::Report);
    }
}
