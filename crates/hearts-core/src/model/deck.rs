use crate::model::card::Card;
use crate::model::hand::HAND_SLOTS;
use crate::model::rank::Rank;
use crate::model::suit::Suit;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

pub const DECK_SIZE: usize = 52;

/// The 52 cards in dealing order. Seat `n` receives positions
/// `13n..13n + 13`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deck {
    cards: [Card; DECK_SIZE],
}

impl Deck {
    /// Unshuffled, in card-id order: clubs two to ace, then diamonds,
    /// hearts and spades.
    pub fn standard() -> Self {
        let cards = std::array::from_fn(|id| {
            Card::new(Rank::ORDERED[id % HAND_SLOTS], Suit::ALL[id / HAND_SLOTS])
        });
        Self { cards }
    }

    pub fn shuffled<R: rand::Rng + ?Sized>(rng: &mut R) -> Self {
        let mut deck = Self::standard();
        deck.cards.shuffle(rng);
        deck
    }

    pub fn shuffled_with_seed(seed: u64) -> Self {
        Self::shuffled(&mut StdRng::seed_from_u64(seed))
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn deal_chunk(&self, seat_index: usize) -> &[Card] {
        let start = seat_index * HAND_SLOTS;
        &self.cards[start..start + HAND_SLOTS]
    }
}
