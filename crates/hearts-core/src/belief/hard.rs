//! Deterministic (hard) belief updates: revealed voids and cards whose location is known.

use crate::model::card::Card;
use crate::model::card_set::CardSet;
use crate::model::player::PlayerPosition;
use crate::model::suit::Suit;

/// Public void matrix plus each seat's private knowledge of card locations.
///
/// Voids are observed from plays everyone can see, so one matrix serves all
/// seats. Entries are only ever set within a round; [`BeliefState::reset`]
/// clears everything at the next deal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BeliefState {
    voids: [SuitMask; 4],
    known: [CardSet; 4],
}

/// Facts about the table at the moment a card is committed.
#[derive(Debug, Clone, Copy)]
pub struct PlayObservation {
    pub seat: PlayerPosition,
    pub card: Card,
    pub lead_suit: Option<Suit>,
    pub first_trick: bool,
    pub hearts_broken: bool,
}

impl BeliefState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn void_mask(&self, seat: PlayerPosition) -> SuitMask {
        self.voids[seat.index()]
    }

    pub fn is_void(&self, seat: PlayerPosition, suit: Suit) -> bool {
        self.voids[seat.index()].contains(suit)
    }

    /// Cards whose current holder `seat` knows for certain.
    pub fn known(&self, seat: PlayerPosition) -> CardSet {
        self.known[seat.index()]
    }

    pub fn mark_void(&mut self, seat: PlayerPosition, suit: Suit) {
        let mask = &mut self.voids[seat.index()];
        *mask = mask.with(suit);
    }

    /// The passer knows where its three cards went.
    pub fn note_pass(&mut self, passer: PlayerPosition, cards: &[Card]) {
        for card in cards {
            self.known[passer.index()].insert(*card);
        }
    }

    /// Infers voids from a committed play. `hearts_broken` is the flag as it
    /// stood before this card.
    pub fn observe_play(&mut self, obs: PlayObservation) {
        let PlayObservation {
            seat,
            card,
            lead_suit,
            first_trick,
            hearts_broken,
        } = obs;

        match lead_suit {
            Some(lead) if card.suit != lead => {
                self.mark_void(seat, lead);
                // Sluffing points on the opening trick is only legal when the
                // hand holds nothing but hearts and the queen of spades.
                if first_trick && card.is_penalty() {
                    self.mark_void(seat, Suit::Clubs);
                    self.mark_void(seat, Suit::Diamonds);
                    if card.is_queen_of_spades() {
                        self.mark_void(seat, Suit::Spades);
                    }
                }
            }
            None if card.suit.is_heart() && !hearts_broken => {
                // Leading unbroken hearts means the hand is all hearts.
                for suit in [Suit::Clubs, Suit::Diamonds, Suit::Spades] {
                    self.mark_void(seat, suit);
                }
            }
            _ => {}
        }
    }
}

/// Bit-mask describing which suits are void for a seat.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SuitMask(u8);

impl SuitMask {
    pub const EMPTY: Self = Self(0);

    pub fn contains(self, suit: Suit) -> bool {
        let bit = 1 << suit as u8;
        self.0 & bit != 0
    }

    pub fn with(mut self, suit: Suit) -> Self {
        let bit = 1 << suit as u8;
        self.0 |= bit;
        self
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}
