use core::fmt;
use serde::{Deserialize, Serialize};

/// A seat at the table. Seats are numbered 0–3 in clockwise play order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum PlayerPosition {
    North = 0,
    East = 1,
    South = 2,
    West = 3,
}

impl PlayerPosition {
    pub const LOOP: [PlayerPosition; 4] = [
        PlayerPosition::North,
        PlayerPosition::East,
        PlayerPosition::South,
        PlayerPosition::West,
    ];

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(PlayerPosition::North),
            1 => Some(PlayerPosition::East),
            2 => Some(PlayerPosition::South),
            3 => Some(PlayerPosition::West),
            _ => None,
        }
    }

    pub const fn index(self) -> usize {
        self as usize
    }

    /// The seat `steps` places further along in play order.
    pub const fn offset(self, steps: usize) -> PlayerPosition {
        match Self::from_index((self.index() + steps) % 4) {
            Some(seat) => seat,
            None => self,
        }
    }

    /// The three other seats, in play order starting after `self`.
    pub fn others(self) -> [PlayerPosition; 3] {
        [self.offset(1), self.offset(2), self.offset(3)]
    }
}

impl TryFrom<u8> for PlayerPosition {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_index(value as usize).ok_or_else(|| format!("seat {value} is outside 0-3"))
    }
}

impl From<PlayerPosition> for u8 {
    fn from(seat: PlayerPosition) -> Self {
        seat as u8
    }
}

impl fmt::Display for PlayerPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p{}", self.index())
    }
}
