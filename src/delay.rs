// src/delay.rs

use alloc::vec;
use alloc::vec::Vec;

/// A clock-enabled shift register of fixed length.
///
/// `step` returns the value pushed `len` enabled steps earlier. A disabled
/// step reads the same output but commits nothing. A zero-length line is a
/// wire.
#[derive(Debug, Clone)]
pub struct DelayLine<T> {
    slots: Vec<T>,
    head: usize,
    init: T,
}

impl<T: Copy> DelayLine<T> {
    pub fn new(len: usize, init: T) -> Self {
        Self {
            slots: vec![init; len],
            head: 0,
            init,
        }
    }

    #[inline]
    pub fn step(&mut self, value: T, enable: bool) -> T {
        if self.slots.is_empty() {
            return value;
        }
        let out = self.slots[self.head];
        if enable {
            self.slots[self.head] = value;
            self.head = (self.head + 1) % self.slots.len();
        }
        out
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn clear(&mut self) {
        let init = self.init;
        self.slots.iter_mut().for_each(|slot| *slot = init);
        self.head = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_length_is_a_wire() {
        let mut line = DelayLine::new(0, 0u32);
        assert_eq!(line.step(7, true), 7);
        assert_eq!(line.step(9, false), 9);
        assert!(line.is_empty());
    }

    #[test]
    fn test_delays_by_length() {
        let mut line = DelayLine::new(3, 0u32);
        let out: Vec<u32> = (1..=6).map(|v| line.step(v, true)).collect();
        assert_eq!(out, vec![0, 0, 0, 1, 2, 3]);
    }

    #[test]
    fn test_disabled_steps_hold_state() {
        let mut line = DelayLine::new(2, 0u32);
        assert_eq!(line.step(1, true), 0);
        assert_eq!(line.step(99, false), 0);
        assert_eq!(line.step(2, true), 0);
        assert_eq!(line.step(99, false), 1);
        assert_eq!(line.step(3, true), 1);
        assert_eq!(line.step(4, true), 2);
    }

    #[test]
    fn test_clear_restores_initial_value() {
        let mut line = DelayLine::new(2, false);
        line.step(true, true);
        line.step(true, true);
        line.clear();
        assert_eq!(line.step(false, true), false);
        assert_eq!(line.step(false, true), false);
    }
}
