//! Player input types for the simulation.
//!
//! The external input provider polls devices and hands the core one
//! [`FrameInput`] per update tick: continuous held-state for movement plus
//! discrete pressed edges for state transitions and the editor palette.

/// Held directional/action state, packed into a bitfield.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeldInput {
    pub bits: u16,
}

impl HeldInput {
    pub const UP: u16 = 1 << 0;
    pub const DOWN: u16 = 1 << 1;
    pub const LEFT: u16 = 1 << 2;
    pub const RIGHT: u16 = 1 << 3;
    pub const FIRE: u16 = 1 << 4;

    pub const fn new() -> Self {
        Self { bits: 0 }
    }

    pub const fn from_bits(bits: u16) -> Self {
        Self { bits }
    }

    #[inline]
    pub const fn is_held(&self, input: u16) -> bool {
        self.bits & input != 0
    }

    #[inline]
    pub fn set(&mut self, input: u16, held: bool) {
        if held {
            self.bits |= input;
        } else {
            self.bits &= !input;
        }
    }

    /// Horizontal axis as -1, 0, or 1. Opposing keys cancel.
    pub const fn horizontal(&self) -> i8 {
        match (self.is_held(Self::LEFT), self.is_held(Self::RIGHT)) {
            (true, false) => -1,
            (false, true) => 1,
            _ => 0,
        }
    }

    /// Vertical axis as -1, 0, or 1.
    pub const fn vertical(&self) -> i8 {
        match (self.is_held(Self::UP), self.is_held(Self::DOWN)) {
            (true, false) => -1,
            (false, true) => 1,
            _ => 0,
        }
    }

    pub const fn fire(&self) -> bool {
        self.is_held(Self::FIRE)
    }
}

/// Pressed-this-frame key edges, packed into a bitfield.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PressedKeys {
    pub bits: u16,
}

impl PressedKeys {
    pub const ENTER: u16 = 1 << 0;
    pub const ESCAPE: u16 = 1 << 1;
    pub const SPACE: u16 = 1 << 2;
    pub const TAB: u16 = 1 << 3;
    // Digits 1-6 select entity types in the external editor palette.
    pub const DIGIT_1: u16 = 1 << 4;
    pub const DIGIT_2: u16 = 1 << 5;
    pub const DIGIT_3: u16 = 1 << 6;
    pub const DIGIT_4: u16 = 1 << 7;
    pub const DIGIT_5: u16 = 1 << 8;
    pub const DIGIT_6: u16 = 1 << 9;

    pub const fn new() -> Self {
        Self { bits: 0 }
    }

    pub const fn from_bits(bits: u16) -> Self {
        Self { bits }
    }

    #[inline]
    pub const fn pressed(&self, key: u16) -> bool {
        self.bits & key != 0
    }

    #[inline]
    pub fn set(&mut self, key: u16) {
        self.bits |= key;
    }

    pub const fn enter(&self) -> bool {
        self.pressed(Self::ENTER)
    }

    pub const fn escape(&self) -> bool {
        self.pressed(Self::ESCAPE)
    }

    pub const fn space(&self) -> bool {
        self.pressed(Self::SPACE)
    }

    pub const fn tab(&self) -> bool {
        self.pressed(Self::TAB)
    }

    /// Lowest pressed digit in 1..=6, if any. The core only surfaces this;
    /// interpretation belongs to the editor collaborator.
    pub const fn digit(&self) -> Option<u8> {
        let mut n = 0;
        while n < 6 {
            if self.bits & (Self::DIGIT_1 << n) != 0 {
                return Some(n as u8 + 1);
            }
            n += 1;
        }
        None
    }
}

/// Everything the core consumes from the input provider in one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameInput {
    pub held: HeldInput,
    pub pressed: PressedKeys,
}

impl FrameInput {
    pub const fn none() -> Self {
        Self {
            held: HeldInput::new(),
            pressed: PressedKeys::new(),
        }
    }

    pub const fn with_pressed(pressed_bits: u16) -> Self {
        Self {
            held: HeldInput::new(),
            pressed: PressedKeys::from_bits(pressed_bits),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn held_axes_cancel() {
        let mut held = HeldInput::new();
        assert_eq!(held.horizontal(), 0);

        held.set(HeldInput::LEFT, true);
        assert_eq!(held.horizontal(), -1);

        held.set(HeldInput::RIGHT, true);
        assert_eq!(held.horizontal(), 0);

        held.set(HeldInput::LEFT, false);
        assert_eq!(held.horizontal(), 1);
    }

    #[test]
    fn pressed_edges() {
        let mut pressed = PressedKeys::new();
        assert!(!pressed.enter());

        pressed.set(PressedKeys::ENTER);
        pressed.set(PressedKeys::TAB);
        assert!(pressed.enter());
        assert!(pressed.tab());
        assert!(!pressed.escape());
    }

    #[test]
    fn digit_selection() {
        assert_eq!(PressedKeys::new().digit(), None);
        assert_eq!(PressedKeys::from_bits(PressedKeys::DIGIT_4).digit(), Some(4));
        // Lowest digit wins when several land on the same frame.
        let both = PressedKeys::from_bits(PressedKeys::DIGIT_2 | PressedKeys::DIGIT_6);
        assert_eq!(both.digit(), Some(2));
    }
}
