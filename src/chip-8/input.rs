pub const KEY_COUNT: usize = 16;

/// A source of key states for the sixteen key hexadecimal keypad.
pub trait Input {
    fn is_key_down(&self, key: u8) -> bool;
}

impl Input for [bool; KEY_COUNT] {
    fn is_key_down(&self, key: u8) -> bool {
        self.get(usize::from(key)).copied().unwrap_or(false)
    }
}

/// The key latch, sampled once per cycle.
///
/// The snapshot from the previous cycle is kept so a wait for a key can react
/// to a key going down rather than to one that is already held.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Keypad {
    current: [bool; KEY_COUNT],
    previous: [bool; KEY_COUNT],
}

impl Keypad {
    pub fn latch(&mut self, input: &dyn Input) {
        self.previous = self.current;
        for key in 0..KEY_COUNT as u8 {
            self.current[usize::from(key)] = input.is_key_down(key);
        }
    }

    /// Level state of `key`. Values above 0xF are never down.
    pub fn is_down(&self, key: u8) -> bool {
        self.current.is_key_down(key)
    }

    /// Lowest key that went from up to down between the last two samples.
    pub fn pressed_edge(&self) -> Option<u8> {
        (0..KEY_COUNT)
            .find(|&key| self.current[key] && !self.previous[key])
            .map(|key| key as u8)
    }

    pub fn states(&self) -> &[bool; KEY_COUNT] {
        &self.current
    }
}

#[cfg(test)]
mod tests {
    use super::{Keypad, KEY_COUNT};

    fn keys(down: &[u8]) -> [bool; KEY_COUNT] {
        let mut states = [false; KEY_COUNT];
        for &key in down {
            states[key as usize] = true;
        }
        states
    }

    #[test]
    fn test_default() {
        let keypad = Keypad::default();

        assert_eq!(keypad.states(), &[false; KEY_COUNT]);
        assert_eq!(keypad.pressed_edge(), None);
    }

    #[test]
    fn test_is_down() {
        let mut keypad = Keypad::default();
        keypad.latch(&keys(&[0x3, 0xF]));

        assert!(keypad.is_down(0x3));
        assert!(keypad.is_down(0xF));
        assert!(!keypad.is_down(0x4));
        assert!(!keypad.is_down(0x13));
    }

    #[test]
    fn test_pressed_edge_reports_new_presses_only() {
        let mut keypad = Keypad::default();

        keypad.latch(&keys(&[0x5]));
        assert_eq!(keypad.pressed_edge(), Some(0x5));

        keypad.latch(&keys(&[0x5]));
        assert_eq!(keypad.pressed_edge(), None);

        keypad.latch(&keys(&[0x5, 0xA]));
        assert_eq!(keypad.pressed_edge(), Some(0xA));
    }

    #[test]
    fn test_pressed_edge_after_release() {
        let mut keypad = Keypad::default();

        keypad.latch(&keys(&[0x2]));
        keypad.latch(&keys(&[]));
        assert_eq!(keypad.pressed_edge(), None);

        keypad.latch(&keys(&[0x2]));
        assert_eq!(keypad.pressed_edge(), Some(0x2));
    }
}
