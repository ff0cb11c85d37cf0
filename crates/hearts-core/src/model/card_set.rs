use crate::model::card::Card;
use crate::model::suit::Suit;

/// Bit-set over the 52 card identities.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CardSet(u64);

impl CardSet {
    pub const EMPTY: Self = Self(0);
    pub const FULL: Self = Self((1u64 << 52) - 1);

    pub fn contains(self, card: Card) -> bool {
        self.0 & bit(card) != 0
    }

    pub fn insert(&mut self, card: Card) {
        self.0 |= bit(card);
    }

    pub fn remove(&mut self, card: Card) {
        self.0 &= !bit(card);
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn count_suit(self, suit: Suit) -> usize {
        let mask = ((1u64 << 13) - 1) << (suit.index() * 13);
        (self.0 & mask).count_ones() as usize
    }

    pub fn iter(self) -> impl Iterator<Item = Card> {
        (0..52u8)
            .filter(move |id| self.0 & (1u64 << id) != 0)
            .filter_map(Card::from_id)
    }
}

impl FromIterator<Card> for CardSet {
    fn from_iter<I: IntoIterator<Item = Card>>(iter: I) -> Self {
        let mut set = CardSet::EMPTY;
        for card in iter {
            set.insert(card);
        }
        set
    }
}

fn bit(card: Card) -> u64 {
    1u64 << card.to_id()
}
