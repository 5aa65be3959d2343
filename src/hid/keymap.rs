//! Logical key identifier → USB HID usage translation.
//!
//! Key identifiers are Linux input event codes (`KEY_*`), the numbering
//! used by Zephyr `gpio-keys` and most key-matrix drivers.  The output is
//! either a modifier bit for byte 0 of the boot report, a Keyboard/Keypad
//! page usage code for the key slots, or `Unmapped`.
//!
//! The table covers the 88-key layout: main block, F1-F12, navigation
//! cluster and the numeric keypad.

/// Result of classifying one logical key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeyClass {
    /// One of the eight modifier keys; carries its bit in the modifier byte.
    Modifier(u8),
    /// A regular key; carries its HID usage code.
    Usage(u8),
    /// No HID meaning (reserved, gap in the table, or out of range).
    Unmapped,
}

/// Modifier byte bits (HID boot keyboard, byte 0).
pub mod modifier {
    pub const LEFT_CTRL: u8 = 1 << 0;
    pub const LEFT_SHIFT: u8 = 1 << 1;
    pub const LEFT_ALT: u8 = 1 << 2;
    pub const LEFT_GUI: u8 = 1 << 3;
    pub const RIGHT_CTRL: u8 = 1 << 4;
    pub const RIGHT_SHIFT: u8 = 1 << 5;
    pub const RIGHT_ALT: u8 = 1 << 6;
    pub const RIGHT_GUI: u8 = 1 << 7;
}

/// Keyboard/Keypad usage page (0x07) codes.
pub mod usage {
    pub const A: u8 = 0x04;
    pub const B: u8 = 0x05;
    pub const C: u8 = 0x06;
    pub const D: u8 = 0x07;
    pub const E: u8 = 0x08;
    pub const F: u8 = 0x09;
    pub const G: u8 = 0x0A;
    pub const H: u8 = 0x0B;
    pub const I: u8 = 0x0C;
    pub const J: u8 = 0x0D;
    pub const K: u8 = 0x0E;
    pub const L: u8 = 0x0F;
    pub const M: u8 = 0x10;
    pub const N: u8 = 0x11;
    pub const O: u8 = 0x12;
    pub const P: u8 = 0x13;
    pub const Q: u8 = 0x14;
    pub const R: u8 = 0x15;
    pub const S: u8 = 0x16;
    pub const T: u8 = 0x17;
    pub const U: u8 = 0x18;
    pub const V: u8 = 0x19;
    pub const W: u8 = 0x1A;
    pub const X: u8 = 0x1B;
    pub const Y: u8 = 0x1C;
    pub const Z: u8 = 0x1D;
    pub const N1: u8 = 0x1E;
    pub const N2: u8 = 0x1F;
    pub const N3: u8 = 0x20;
    pub const N4: u8 = 0x21;
    pub const N5: u8 = 0x22;
    pub const N6: u8 = 0x23;
    pub const N7: u8 = 0x24;
    pub const N8: u8 = 0x25;
    pub const N9: u8 = 0x26;
    pub const N0: u8 = 0x27;
    pub const ENTER: u8 = 0x28;
    pub const ESC: u8 = 0x29;
    pub const BACKSPACE: u8 = 0x2A;
    pub const TAB: u8 = 0x2B;
    pub const SPACE: u8 = 0x2C;
    pub const MINUS: u8 = 0x2D;
    pub const EQUAL: u8 = 0x2E;
    pub const LEFTBRACE: u8 = 0x2F;
    pub const RIGHTBRACE: u8 = 0x30;
    pub const BACKSLASH: u8 = 0x31;
    pub const SEMICOLON: u8 = 0x33;
    pub const APOSTROPHE: u8 = 0x34;
    pub const GRAVE: u8 = 0x35;
    pub const COMMA: u8 = 0x36;
    pub const DOT: u8 = 0x37;
    pub const SLASH: u8 = 0x38;
    pub const CAPSLOCK: u8 = 0x39;
    pub const F1: u8 = 0x3A;
    pub const F2: u8 = 0x3B;
    pub const F3: u8 = 0x3C;
    pub const F4: u8 = 0x3D;
    pub const F5: u8 = 0x3E;
    pub const F6: u8 = 0x3F;
    pub const F7: u8 = 0x40;
    pub const F8: u8 = 0x41;
    pub const F9: u8 = 0x42;
    pub const F10: u8 = 0x43;
    pub const F11: u8 = 0x44;
    pub const F12: u8 = 0x45;
    pub const SYSRQ: u8 = 0x46;
    pub const SCROLLLOCK: u8 = 0x47;
    pub const PAUSE: u8 = 0x48;
    pub const INSERT: u8 = 0x49;
    pub const HOME: u8 = 0x4A;
    pub const PAGEUP: u8 = 0x4B;
    pub const DELETE: u8 = 0x4C;
    pub const END: u8 = 0x4D;
    pub const PAGEDOWN: u8 = 0x4E;
    pub const RIGHT: u8 = 0x4F;
    pub const LEFT: u8 = 0x50;
    pub const DOWN: u8 = 0x51;
    pub const UP: u8 = 0x52;
    pub const NUMLOCK: u8 = 0x53;
    pub const KPSLASH: u8 = 0x54;
    pub const KPASTERISK: u8 = 0x55;
    pub const KPMINUS: u8 = 0x56;
    pub const KPPLUS: u8 = 0x57;
    pub const KPENTER: u8 = 0x58;
    pub const KP1: u8 = 0x59;
    pub const KP2: u8 = 0x5A;
    pub const KP3: u8 = 0x5B;
    pub const KP4: u8 = 0x5C;
    pub const KP5: u8 = 0x5D;
    pub const KP6: u8 = 0x5E;
    pub const KP7: u8 = 0x5F;
    pub const KP8: u8 = 0x60;
    pub const KP9: u8 = 0x61;
    pub const KP0: u8 = 0x62;
    pub const KPDOT: u8 = 0x63;
    /// Application / Compose (the "menu" key).
    pub const COMPOSE: u8 = 0x65;
}

// Linux input event codes.

pub const KEY_RESERVED: u16 = 0;
pub const KEY_ESC: u16 = 1;
pub const KEY_1: u16 = 2;
pub const KEY_2: u16 = 3;
pub const KEY_3: u16 = 4;
pub const KEY_4: u16 = 5;
pub const KEY_5: u16 = 6;
pub const KEY_6: u16 = 7;
pub const KEY_7: u16 = 8;
pub const KEY_8: u16 = 9;
pub const KEY_9: u16 = 10;
pub const KEY_0: u16 = 11;
pub const KEY_MINUS: u16 = 12;
pub const KEY_EQUAL: u16 = 13;
pub const KEY_BACKSPACE: u16 = 14;
pub const KEY_TAB: u16 = 15;
pub const KEY_Q: u16 = 16;
pub const KEY_W: u16 = 17;
pub const KEY_E: u16 = 18;
pub const KEY_R: u16 = 19;
pub const KEY_T: u16 = 20;
pub const KEY_Y: u16 = 21;
pub const KEY_U: u16 = 22;
pub const KEY_I: u16 = 23;
pub const KEY_O: u16 = 24;
pub const KEY_P: u16 = 25;
pub const KEY_LEFTBRACE: u16 = 26;
pub const KEY_RIGHTBRACE: u16 = 27;
pub const KEY_ENTER: u16 = 28;
pub const KEY_LEFTCTRL: u16 = 29;
pub const KEY_A: u16 = 30;
pub const KEY_S: u16 = 31;
pub const KEY_D: u16 = 32;
pub const KEY_F: u16 = 33;
pub const KEY_G: u16 = 34;
pub const KEY_H: u16 = 35;
pub const KEY_J: u16 = 36;
pub const KEY_K: u16 = 37;
pub const KEY_L: u16 = 38;
pub const KEY_SEMICOLON: u16 = 39;
pub const KEY_APOSTROPHE: u16 = 40;
pub const KEY_GRAVE: u16 = 41;
pub const KEY_LEFTSHIFT: u16 = 42;
pub const KEY_BACKSLASH: u16 = 43;
pub const KEY_Z: u16 = 44;
pub const KEY_X: u16 = 45;
pub const KEY_C: u16 = 46;
pub const KEY_V: u16 = 47;
pub const KEY_B: u16 = 48;
pub const KEY_N: u16 = 49;
pub const KEY_M: u16 = 50;
pub const KEY_COMMA: u16 = 51;
pub const KEY_DOT: u16 = 52;
pub const KEY_SLASH: u16 = 53;
pub const KEY_RIGHTSHIFT: u16 = 54;
pub const KEY_KPASTERISK: u16 = 55;
pub const KEY_LEFTALT: u16 = 56;
pub const KEY_SPACE: u16 = 57;
pub const KEY_CAPSLOCK: u16 = 58;
pub const KEY_F1: u16 = 59;
pub const KEY_F2: u16 = 60;
pub const KEY_F3: u16 = 61;
pub const KEY_F4: u16 = 62;
pub const KEY_F5: u16 = 63;
pub const KEY_F6: u16 = 64;
pub const KEY_F7: u16 = 65;
pub const KEY_F8: u16 = 66;
pub const KEY_F9: u16 = 67;
pub const KEY_F10: u16 = 68;
pub const KEY_NUMLOCK: u16 = 69;
pub const KEY_SCROLLLOCK: u16 = 70;
pub const KEY_KP7: u16 = 71;
pub const KEY_KP8: u16 = 72;
pub const KEY_KP9: u16 = 73;
pub const KEY_KPMINUS: u16 = 74;
pub const KEY_KP4: u16 = 75;
pub const KEY_KP5: u16 = 76;
pub const KEY_KP6: u16 = 77;
pub const KEY_KPPLUS: u16 = 78;
pub const KEY_KP1: u16 = 79;
pub const KEY_KP2: u16 = 80;
pub const KEY_KP3: u16 = 81;
pub const KEY_KP0: u16 = 82;
pub const KEY_KPDOT: u16 = 83;
pub const KEY_F11: u16 = 87;
pub const KEY_F12: u16 = 88;
pub const KEY_KPENTER: u16 = 96;
pub const KEY_RIGHTCTRL: u16 = 97;
pub const KEY_KPSLASH: u16 = 98;
pub const KEY_SYSRQ: u16 = 99;
pub const KEY_RIGHTALT: u16 = 100;
pub const KEY_HOME: u16 = 102;
pub const KEY_UP: u16 = 103;
pub const KEY_PAGEUP: u16 = 104;
pub const KEY_LEFT: u16 = 105;
pub const KEY_RIGHT: u16 = 106;
pub const KEY_END: u16 = 107;
pub const KEY_DOWN: u16 = 108;
pub const KEY_PAGEDOWN: u16 = 109;
pub const KEY_INSERT: u16 = 110;
pub const KEY_DELETE: u16 = 111;
pub const KEY_PAUSE: u16 = 119;
pub const KEY_LEFTMETA: u16 = 125;
pub const KEY_RIGHTMETA: u16 = 126;
pub const KEY_COMPOSE: u16 = 127;

/// (input code, usage) pairs for every non-modifier key we report.
const KEY_USAGES: &[(u16, u8)] = &[
    (KEY_ESC, usage::ESC),
    (KEY_1, usage::N1),
    (KEY_2, usage::N2),
    (KEY_3, usage::N3),
    (KEY_4, usage::N4),
    (KEY_5, usage::N5),
    (KEY_6, usage::N6),
    (KEY_7, usage::N7),
    (KEY_8, usage::N8),
    (KEY_9, usage::N9),
    (KEY_0, usage::N0),
    (KEY_MINUS, usage::MINUS),
    (KEY_EQUAL, usage::EQUAL),
    (KEY_BACKSPACE, usage::BACKSPACE),
    (KEY_TAB, usage::TAB),
    (KEY_Q, usage::Q),
    (KEY_W, usage::W),
    (KEY_E, usage::E),
    (KEY_R, usage::R),
    (KEY_T, usage::T),
    (KEY_Y, usage::Y),
    (KEY_U, usage::U),
    (KEY_I, usage::I),
    (KEY_O, usage::O),
    (KEY_P, usage::P),
    (KEY_LEFTBRACE, usage::LEFTBRACE),
    (KEY_RIGHTBRACE, usage::RIGHTBRACE),
    (KEY_ENTER, usage::ENTER),
    (KEY_A, usage::A),
    (KEY_S, usage::S),
    (KEY_D, usage::D),
    (KEY_F, usage::F),
    (KEY_G, usage::G),
    (KEY_H, usage::H),
    (KEY_J, usage::J),
    (KEY_K, usage::K),
    (KEY_L, usage::L),
    (KEY_SEMICOLON, usage::SEMICOLON),
    (KEY_APOSTROPHE, usage::APOSTROPHE),
    (KEY_GRAVE, usage::GRAVE),
    (KEY_BACKSLASH, usage::BACKSLASH),
    (KEY_Z, usage::Z),
    (KEY_X, usage::X),
    (KEY_C, usage::C),
    (KEY_V, usage::V),
    (KEY_B, usage::B),
    (KEY_N, usage::N),
    (KEY_M, usage::M),
    (KEY_COMMA, usage::COMMA),
    (KEY_DOT, usage::DOT),
    (KEY_SLASH, usage::SLASH),
    (KEY_KPASTERISK, usage::KPASTERISK),
    (KEY_SPACE, usage::SPACE),
    (KEY_CAPSLOCK, usage::CAPSLOCK),
    (KEY_F1, usage::F1),
    (KEY_F2, usage::F2),
    (KEY_F3, usage::F3),
    (KEY_F4, usage::F4),
    (KEY_F5, usage::F5),
    (KEY_F6, usage::F6),
    (KEY_F7, usage::F7),
    (KEY_F8, usage::F8),
    (KEY_F9, usage::F9),
    (KEY_F10, usage::F10),
    (KEY_NUMLOCK, usage::NUMLOCK),
    (KEY_SCROLLLOCK, usage::SCROLLLOCK),
    (KEY_KP7, usage::KP7),
    (KEY_KP8, usage::KP8),
    (KEY_KP9, usage::KP9),
    (KEY_KPMINUS, usage::KPMINUS),
    (KEY_KP4, usage::KP4),
    (KEY_KP5, usage::KP5),
    (KEY_KP6, usage::KP6),
    (KEY_KPPLUS, usage::KPPLUS),
    (KEY_KP1, usage::KP1),
    (KEY_KP2, usage::KP2),
    (KEY_KP3, usage::KP3),
    (KEY_KP0, usage::KP0),
    (KEY_KPDOT, usage::KPDOT),
    (KEY_F11, usage::F11),
    (KEY_F12, usage::F12),
    (KEY_KPENTER, usage::KPENTER),
    (KEY_KPSLASH, usage::KPSLASH),
    (KEY_SYSRQ, usage::SYSRQ),
    (KEY_HOME, usage::HOME),
    (KEY_UP, usage::UP),
    (KEY_PAGEUP, usage::PAGEUP),
    (KEY_LEFT, usage::LEFT),
    (KEY_RIGHT, usage::RIGHT),
    (KEY_END, usage::END),
    (KEY_DOWN, usage::DOWN),
    (KEY_PAGEDOWN, usage::PAGEDOWN),
    (KEY_INSERT, usage::INSERT),
    (KEY_DELETE, usage::DELETE),
    (KEY_PAUSE, usage::PAUSE),
    (KEY_COMPOSE, usage::COMPOSE),
];

const TABLE_LEN: usize = KEY_COMPOSE as usize + 1;

/// Dense lookup indexed by input code.  Zero entries are gaps.
static USAGE_TABLE: [u8; TABLE_LEN] = build_table();

const fn build_table() -> [u8; TABLE_LEN] {
    let mut table = [0u8; TABLE_LEN];
    let mut i = 0;
    while i < KEY_USAGES.len() {
        let (key, code) = KEY_USAGES[i];
        table[key as usize] = code;
        i += 1;
    }
    table
}

/// Modifier bit for `key`, if it is one of the eight modifier keys.
pub fn modifier_bit(key: u16) -> Option<u8> {
    let bit = match key {
        KEY_LEFTCTRL => modifier::LEFT_CTRL,
        KEY_LEFTSHIFT => modifier::LEFT_SHIFT,
        KEY_LEFTALT => modifier::LEFT_ALT,
        KEY_LEFTMETA => modifier::LEFT_GUI,
        KEY_RIGHTCTRL => modifier::RIGHT_CTRL,
        KEY_RIGHTSHIFT => modifier::RIGHT_SHIFT,
        KEY_RIGHTALT => modifier::RIGHT_ALT,
        KEY_RIGHTMETA => modifier::RIGHT_GUI,
        _ => return None,
    };
    Some(bit)
}

/// Classify a logical key.  Total: never panics, whatever the input.
pub fn translate(key: u16) -> KeyClass {
    if let Some(bit) = modifier_bit(key) {
        return KeyClass::Modifier(bit);
    }

    match USAGE_TABLE.get(usize::from(key)) {
        Some(&code) if code != 0 => KeyClass::Usage(code),
        _ => KeyClass::Unmapped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letters_map_to_usage_codes() {
        assert_eq!(translate(KEY_A), KeyClass::Usage(0x04));
        assert_eq!(translate(KEY_Z), KeyClass::Usage(0x1D));
        assert_eq!(translate(KEY_Q), KeyClass::Usage(usage::Q));
    }

    #[test]
    fn modifiers_take_precedence() {
        assert_eq!(translate(KEY_LEFTCTRL), KeyClass::Modifier(0x01));
        assert_eq!(translate(KEY_LEFTSHIFT), KeyClass::Modifier(0x02));
        assert_eq!(translate(KEY_LEFTALT), KeyClass::Modifier(0x04));
        assert_eq!(translate(KEY_LEFTMETA), KeyClass::Modifier(0x08));
        assert_eq!(translate(KEY_RIGHTCTRL), KeyClass::Modifier(0x10));
        assert_eq!(translate(KEY_RIGHTSHIFT), KeyClass::Modifier(0x20));
        assert_eq!(translate(KEY_RIGHTALT), KeyClass::Modifier(0x40));
        assert_eq!(translate(KEY_RIGHTMETA), KeyClass::Modifier(0x80));
    }

    #[test]
    fn reserved_gaps_and_out_of_range_are_unmapped() {
        assert_eq!(translate(KEY_RESERVED), KeyClass::Unmapped);
        // 84 and 101 are holes in the 88-key layout.
        assert_eq!(translate(84), KeyClass::Unmapped);
        assert_eq!(translate(101), KeyClass::Unmapped);
        assert_eq!(translate(128), KeyClass::Unmapped);
        assert_eq!(translate(u16::MAX), KeyClass::Unmapped);
    }

    #[test]
    fn keypad_dot_and_compose_use_standard_usages() {
        assert_eq!(translate(KEY_KPDOT), KeyClass::Usage(0x63));
        assert_eq!(translate(KEY_COMPOSE), KeyClass::Usage(0x65));
    }

    #[test]
    fn table_has_no_duplicate_usages() {
        for (i, (_, a)) in KEY_USAGES.iter().enumerate() {
            for (_, b) in &KEY_USAGES[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn every_table_entry_round_trips_through_translate() {
        for &(key, code) in KEY_USAGES {
            assert_eq!(translate(key), KeyClass::Usage(code));
        }
    }
}
