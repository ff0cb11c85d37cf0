use crate::model::rank::Rank;
use crate::model::suit::Suit;
use core::fmt;

/// A playing card. Its id (`suit * 13 + rank index`) is what card sets and
/// the deck order are keyed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl Card {
    /// Must open every round.
    pub const OPENING_LEAD: Card = Card::new(Rank::Two, Suit::Clubs);
    pub const QUEEN_OF_SPADES: Card = Card::new(Rank::Queen, Suit::Spades);

    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit }
    }

    pub const fn to_id(self) -> u8 {
        self.suit as u8 * 13 + self.rank.index()
    }

    pub const fn from_id(id: u8) -> Option<Self> {
        match (Suit::from_index((id / 13) as usize), Rank::from_index(id % 13)) {
            (Some(suit), Some(rank)) => Some(Card::new(rank, suit)),
            _ => None,
        }
    }

    /// Hearts and the queen of spades.
    pub const fn is_penalty(self) -> bool {
        self.penalty_value() > 0
    }

    pub const fn is_queen_of_spades(self) -> bool {
        self.to_id() == Card::QUEEN_OF_SPADES.to_id()
    }

    /// 13 for the queen of spades, 1 for a heart, otherwise 0.
    pub const fn penalty_value(self) -> u8 {
        match self.suit {
            Suit::Hearts => 1,
            Suit::Spades if matches!(self.rank, Rank::Queen) => 13,
            _ => 0,
        }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}
