/// A timer that ticks down. This is used for the sound and delay timers by [`Cpu`](crate::Cpu).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Timer {
    value: u8,
}

impl Timer {
    pub fn current_value(&self) -> u8 {
        self.value
    }

    pub fn set_value(&mut self, new_value: u8) {
        self.value = new_value;
    }

    /// Count down by one, saturating at zero.
    ///
    /// Returns `true` only on the tick that takes the timer from 1 to 0.
    pub fn tick(&mut self) -> bool {
        if self.is_active() {
            self.value -= 1;

            return self.value == 0;
        }

        false
    }

    pub fn is_active(&self) -> bool {
        self.value > 0
    }
}

#[cfg(test)]
mod tests {
    use super::Timer;

    #[test]
    fn test_default() {
        let t = Timer::default();

        assert_eq!(t.is_active(), false);
        assert_eq!(t.current_value(), 0);
    }

    #[test]
    fn test_tick_when_value_is_zero() {
        let mut t = Timer::default();

        assert_eq!(t.tick(), false);

        assert_eq!(t.is_active(), false);
        assert_eq!(t.current_value(), 0);
    }

    #[test]
    fn test_tick_when_value_is_non_zero() {
        let mut t = Timer::default();
        t.set_value(2);

        assert_eq!(t.tick(), false);
        assert_eq!(t.is_active(), true);
        assert_eq!(t.current_value(), 1);

        assert_eq!(t.tick(), true);
        assert_eq!(t.is_active(), false);
        assert_eq!(t.current_value(), 0);

        assert_eq!(t.tick(), false);
    }
}
