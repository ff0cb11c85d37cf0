use crate::model::card::Card;
use crate::model::hand::{HAND_SLOTS, Hand};
use crate::model::player::PlayerPosition;
use std::fmt;

/// Where each seat sends its three cards. Rotates every round and every
/// fourth round is a hold round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassingDirection {
    Left,
    Across,
    Right,
    Hold,
}

impl PassingDirection {
    pub const CYCLE: [PassingDirection; 4] = [
        PassingDirection::Hold,
        PassingDirection::Left,
        PassingDirection::Across,
        PassingDirection::Right,
    ];

    /// Direction for a 1-based round number: seats pass `round % 4` places on.
    pub const fn for_round(round_number: u32) -> PassingDirection {
        Self::CYCLE[(round_number % 4) as usize]
    }

    pub const fn requires_selection(self) -> bool {
        !matches!(self, PassingDirection::Hold)
    }

    pub const fn offset(self) -> usize {
        match self {
            PassingDirection::Hold => 0,
            PassingDirection::Left => 1,
            PassingDirection::Across => 2,
            PassingDirection::Right => 3,
        }
    }

    pub const fn target(self, seat: PlayerPosition) -> PlayerPosition {
        seat.offset(self.offset())
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            PassingDirection::Left => "Left",
            PassingDirection::Right => "Right",
            PassingDirection::Across => "Across",
            PassingDirection::Hold => "Hold",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassingError {
    NotInPassingPhase,
    SlotOutOfRange { seat: PlayerPosition, slot: usize },
    EmptySlot { seat: PlayerPosition, slot: usize },
    DuplicateSlot { seat: PlayerPosition, slot: usize },
}

impl fmt::Display for PassingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PassingError::NotInPassingPhase => write!(f, "round is not in the passing phase"),
            PassingError::SlotOutOfRange { seat, slot } => {
                write!(f, "{seat} selected slot {slot}, expected 0-{}", HAND_SLOTS - 1)
            }
            PassingError::EmptySlot { seat, slot } => {
                write!(f, "{seat} selected empty slot {slot}")
            }
            PassingError::DuplicateSlot { seat, slot } => {
                write!(f, "{seat} selected slot {slot} more than once")
            }
        }
    }
}

impl std::error::Error for PassingError {}

/// Resolves three slot indices into the cards they hold without mutating the hand.
pub fn select_pass(
    seat: PlayerPosition,
    hand: &Hand,
    slots: [usize; 3],
) -> Result<[Card; 3], PassingError> {
    let mut cards = [Card::OPENING_LEAD; 3];
    for (position, &slot) in slots.iter().enumerate() {
        if slot >= HAND_SLOTS {
            return Err(PassingError::SlotOutOfRange { seat, slot });
        }
        if slots[..position].contains(&slot) {
            return Err(PassingError::DuplicateSlot { seat, slot });
        }
        cards[position] = hand
            .slot(slot)
            .ok_or(PassingError::EmptySlot { seat, slot })?;
    }
    Ok(cards)
}
