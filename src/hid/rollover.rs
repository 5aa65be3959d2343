//! Six-key rollover set.
//!
//! Tracks the usage codes of currently held non-modifier keys in the
//! order they were pressed.  That order is the slot order in the boot
//! report, so a key keeps its slot until it (or an earlier key) is
//! released.

use heapless::Vec;

use crate::config::MAX_PRESSED_KEYS;
use crate::error::Error;

/// Outcome of a successful [`RolloverSet::insert`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Inserted {
    Added,
    AlreadyPresent,
}

/// Outcome of [`RolloverSet::remove`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Removed {
    Removed,
    NotPresent,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RolloverSet {
    keys: Vec<u8, MAX_PRESSED_KEYS>,
}

impl RolloverSet {
    pub const fn new() -> Self {
        Self { keys: Vec::new() }
    }

    /// Track a pressed key.
    ///
    /// Pressing a key that is already held is not an error.  A seventh
    /// distinct key is refused with [`Error::RolloverFull`] and the set
    /// is left untouched.
    pub fn insert(&mut self, code: u8) -> Result<Inserted, Error> {
        if self.contains(code) {
            return Ok(Inserted::AlreadyPresent);
        }
        self.keys
            .push(code)
            .map(|()| Inserted::Added)
            .map_err(|_| Error::RolloverFull)
    }

    /// Stop tracking a released key, shifting later keys down one slot.
    pub fn remove(&mut self, code: u8) -> Removed {
        match self.keys.iter().position(|&k| k == code) {
            Some(idx) => {
                self.keys.remove(idx);
                Removed::Removed
            }
            None => Removed::NotPresent,
        }
    }

    pub fn contains(&self, code: u8) -> bool {
        self.keys.contains(&code)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.keys.is_full()
    }

    /// Held keys in press order.
    pub fn as_slice(&self) -> &[u8] {
        &self.keys
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(codes: &[u8]) -> RolloverSet {
        let mut set = RolloverSet::new();
        for &c in codes {
            set.insert(c).unwrap();
        }
        set
    }

    #[test]
    fn insert_appends_in_press_order() {
        let set = filled(&[0x06, 0x04, 0x05]);
        assert_eq!(set.as_slice(), &[0x06, 0x04, 0x05]);
    }

    #[test]
    fn duplicate_insert_is_idempotent() {
        let mut set = filled(&[0x04, 0x05]);
        assert_eq!(set.insert(0x04), Ok(Inserted::AlreadyPresent));
        assert_eq!(set.as_slice(), &[0x04, 0x05]);
    }

    #[test]
    fn seventh_key_is_rejected() {
        let mut set = filled(&[0x04, 0x05, 0x06, 0x07, 0x08, 0x09]);
        assert!(set.is_full());
        assert_eq!(set.insert(0x0A), Err(Error::RolloverFull));
        assert_eq!(set.as_slice(), &[0x04, 0x05, 0x06, 0x07, 0x08, 0x09]);

        // A held key is still accepted as a no-op when full.
        assert_eq!(set.insert(0x06), Ok(Inserted::AlreadyPresent));
    }

    #[test]
    fn remove_compacts_preserving_order() {
        let mut set = filled(&[0x04, 0x05, 0x06, 0x07]);
        assert_eq!(set.remove(0x05), Removed::Removed);
        assert_eq!(set.as_slice(), &[0x04, 0x06, 0x07]);
        assert!(!set.contains(0x05));
    }

    #[test]
    fn remove_untracked_is_noop() {
        let mut set = filled(&[0x04]);
        assert_eq!(set.remove(0x2C), Removed::NotPresent);
        assert_eq!(set.as_slice(), &[0x04]);

        let mut empty = RolloverSet::new();
        assert_eq!(empty.remove(0x04), Removed::NotPresent);
        assert!(empty.is_empty());
    }

    #[test]
    fn freed_slot_can_be_reused() {
        let mut set = filled(&[0x04, 0x05, 0x06, 0x07, 0x08, 0x09]);
        set.remove(0x04);
        assert_eq!(set.insert(0x0A), Ok(Inserted::Added));
        assert_eq!(set.as_slice(), &[0x05, 0x06, 0x07, 0x08, 0x09, 0x0A]);
    }

    #[test]
    fn clear_empties_the_set() {
        let mut set = filled(&[0x04, 0x05]);
        set.clear();
        assert!(set.is_empty());
        assert_eq!(set.len(), 0);
    }
}
