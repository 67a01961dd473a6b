//! Movement directions decoded from key presses.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use std::fmt;

use nalgebra::Vector3;

use crate::key_input::KeyPress;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A Cartesian movement direction in the robot's base frame.
///
/// Each component is -1, 0 or +1, and at most one axis is active at a time.
/// The zero direction means "no recognised jog key" and plans no motion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveDirection {
    pub x: i8,
    pub y: i8,
    pub z: i8,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl MoveDirection {
    /// The direction with no active axis.
    pub const ZERO: MoveDirection = MoveDirection { x: 0, y: 0, z: 0 };

    /// Decode a key press into a movement direction.
    ///
    /// Total over all possible key presses, any key without a jog binding
    /// decodes to [`MoveDirection::ZERO`]. Only the exact lower case
    /// characters are bound, a shifted jog key plans nothing.
    pub fn from_key(key: KeyPress) -> Self {
        match key {
            KeyPress::ArrowLeft => MoveDirection { x: 0, y: -1, z: 0 },
            KeyPress::ArrowRight => MoveDirection { x: 0, y: 1, z: 0 },
            KeyPress::ArrowUp => MoveDirection { x: -1, y: 0, z: 0 },
            KeyPress::ArrowDown => MoveDirection { x: 1, y: 0, z: 0 },
            KeyPress::Char('q') => MoveDirection { x: 0, y: 0, z: 1 },
            KeyPress::Char('a') => MoveDirection { x: 0, y: 0, z: -1 },
            _ => MoveDirection::ZERO,
        }
    }

    /// True if no axis is active.
    pub fn is_zero(&self) -> bool {
        *self == MoveDirection::ZERO
    }

    /// The Cartesian offset this direction produces for the given step size.
    ///
    /// Units: metres
    pub fn offset_m(&self, step_size_mm: f64) -> Vector3<f64> {
        Vector3::new(f64::from(self.x), f64::from(self.y), f64::from(self.z))
            * step_size_mm
            * 1.0e-3
    }
}

impl fmt::Display for MoveDirection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let axes = [("X", self.x), ("Y", self.y), ("Z", self.z)];

        for (name, value) in axes.iter() {
            match value {
                1 => return write!(f, "{}+", name),
                -1 => return write!(f, "{}-", name),
                _ => (),
            }
        }

        write!(f, "none")
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
