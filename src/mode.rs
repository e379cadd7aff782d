//! Fixture colour modes.
//!
//! The fixture steps through its modes in a fixed ring on every power
//! pulse: Yellow → White → Mix → Yellow.  There is no way to jump or go
//! backwards, so reaching a target mode means pulsing the relay
//! [`Mode::forward_distance`] times.

use core::fmt;

/// Internal cycling position of the fixture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum Mode {
    #[default]
    Yellow = 0,
    White = 1,
    Mix = 2,
}

impl Mode {
    /// Number of positions in the ring.
    pub const COUNT: u8 = 3;

    /// All modes in ring order.
    pub const ALL: [Mode; 3] = [Mode::Yellow, Mode::White, Mode::Mix];

    /// Mode reached after one power pulse.
    pub const fn next(self) -> Self {
        match self {
            Self::Yellow => Self::White,
            Self::White => Self::Mix,
            Self::Mix => Self::Yellow,
        }
    }

    /// Number of pulses needed to go from `self` to `target` (0, 1 or 2).
    pub const fn forward_distance(self, target: Mode) -> u8 {
        (target as u8 + Self::COUNT - self as u8) % Self::COUNT
    }

    /// Ring index as stored in NVS.
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Decode a stored index.  Anything outside `0..=2` is `None`.
    pub const fn from_index(idx: i32) -> Option<Self> {
        match idx {
            0 => Some(Self::Yellow),
            1 => Some(Self::White),
            2 => Some(Self::Mix),
            _ => None,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Yellow => "Yellow",
            Self::White => "White",
            Self::Mix => "Mix",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
