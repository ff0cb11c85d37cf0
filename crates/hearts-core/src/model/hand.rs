use crate::model::card::Card;
use crate::model::suit::Suit;

pub const HAND_SLOTS: usize = 13;

/// Thirteen addressable slots; an empty slot is `None`.
///
/// Slot positions are stable for the whole round: playing or passing a card
/// empties its slot and received cards fill empty slots in ascending order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Hand {
    slots: [Option<Card>; HAND_SLOTS],
}

impl Hand {
    pub fn new() -> Self {
        Self {
            slots: [None; HAND_SLOTS],
        }
    }

    /// Fills slots in order. Extra cards beyond thirteen are ignored.
    pub fn with_cards(cards: &[Card]) -> Self {
        let mut hand = Self::new();
        for (slot, card) in hand.slots.iter_mut().zip(cards.iter()) {
            *slot = Some(*card);
        }
        hand
    }

    pub fn slot(&self, index: usize) -> Option<Card> {
        self.slots.get(index).copied().flatten()
    }

    /// Empties `index` and returns what was there.
    pub fn take(&mut self, index: usize) -> Option<Card> {
        self.slots.get_mut(index).and_then(Option::take)
    }

    /// Places `card` into `index`, returning the previous occupant.
    pub fn place(&mut self, index: usize, card: Card) -> Option<Card> {
        self.slots[index].replace(card)
    }

    /// Puts `card` into the first empty slot; returns the slot used.
    pub fn fill_first_empty(&mut self, card: Card) -> Option<usize> {
        let index = self.slots.iter().position(Option::is_none)?;
        self.slots[index] = Some(card);
        Some(index)
    }

    pub fn position(&self, card: Card) -> Option<usize> {
        self.slots.iter().position(|slot| *slot == Some(card))
    }

    pub fn contains(&self, card: Card) -> bool {
        self.position(card).is_some()
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    pub fn iter(&self) -> impl Iterator<Item = Card> + '_ {
        self.slots.iter().filter_map(|slot| *slot)
    }

    /// Occupied slots as `(index, card)` pairs.
    pub fn occupied(&self) -> impl Iterator<Item = (usize, Card)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.map(|card| (index, card)))
    }

    pub fn has_suit(&self, suit: Suit) -> bool {
        self.iter().any(|card| card.suit == suit)
    }

    /// True when every held card satisfies `allowed`.
    pub fn only(&self, allowed: impl Fn(Card) -> bool) -> bool {
        self.iter().all(allowed)
    }

    pub fn cards(&self) -> Vec<Card> {
        self.iter().collect()
    }
}
