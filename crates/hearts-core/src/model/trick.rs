use crate::model::card::Card;
use crate::model::player::PlayerPosition;
use crate::model::suit::Suit;
use std::fmt;

/// Up to four cards played in seat order from `leader`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trick {
    leader: PlayerPosition,
    cards: [Option<Card>; 4],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Play {
    pub position: PlayerPosition,
    pub card: Card,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrickError {
    TrickComplete,
    OutOfTurn {
        expected: PlayerPosition,
        actual: PlayerPosition,
    },
}

impl fmt::Display for TrickError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrickError::TrickComplete => f.write_str("all four cards are already on the table"),
            TrickError::OutOfTurn { expected, actual } => {
                write!(f, "{actual} played while {expected} was due")
            }
        }
    }
}

impl std::error::Error for TrickError {}

impl Trick {
    pub fn new(leader: PlayerPosition) -> Self {
        Self {
            leader,
            cards: [None; 4],
        }
    }

    pub fn leader(&self) -> PlayerPosition {
        self.leader
    }

    /// Cards on the table in play order.
    pub fn plays(&self) -> impl Iterator<Item = Play> + '_ {
        self.cards.iter().enumerate().filter_map(|(order, card)| {
            card.map(|card| Play {
                position: self.leader.offset(order),
                card,
            })
        })
    }

    pub fn len(&self) -> usize {
        self.cards.iter().take_while(|card| card.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.cards[0].is_none()
    }

    pub fn is_complete(&self) -> bool {
        self.cards[3].is_some()
    }

    pub fn lead_suit(&self) -> Option<Suit> {
        self.cards[0].map(|card| card.suit)
    }

    /// Seat due to play next; the leader again once the trick is full.
    pub fn expected_position(&self) -> PlayerPosition {
        self.leader.offset(self.len())
    }

    pub fn play(&mut self, position: PlayerPosition, card: Card) -> Result<(), TrickError> {
        let order = self.len();
        if order == 4 {
            return Err(TrickError::TrickComplete);
        }
        let expected = self.leader.offset(order);
        if position != expected {
            return Err(TrickError::OutOfTurn {
                expected,
                actual: position,
            });
        }
        self.cards[order] = Some(card);
        Ok(())
    }

    /// Highest card of the led suit takes the trick. `None` until all four
    /// cards are down.
    pub fn winner(&self) -> Option<PlayerPosition> {
        if !self.is_complete() {
            return None;
        }
        let lead = self.lead_suit()?;
        self.plays()
            .filter(|play| play.card.suit == lead)
            .max_by_key(|play| play.card.rank)
            .map(|play| play.position)
    }

    pub fn penalty_total(&self) -> u8 {
        self.cards.iter().flatten().map(|card| card.penalty_value()).sum()
    }
}
