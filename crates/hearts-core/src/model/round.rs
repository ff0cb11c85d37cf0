use crate::model::card::Card;
use crate::model::card_set::CardSet;
use crate::model::deck::Deck;
use crate::model::hand::{HAND_SLOTS, Hand};
use crate::model::passing::{PassingDirection, PassingError, select_pass};
use crate::model::player::PlayerPosition;
use crate::model::trick::{Trick, TrickError};
use std::fmt;

pub const TRICKS_PER_ROUND: u8 = 13;

/// Hands, the trick in progress and the round-scoped flags.
///
/// Plain `Copy` data: a rollout clones the whole round with a memcpy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundState {
    hands: [Hand; 4],
    current_trick: Trick,
    played: CardSet,
    tricks_completed: u8,
    hearts_broken: bool,
    passing_direction: PassingDirection,
    phase: RoundPhase,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundPhase {
    Passing,
    Playing,
    Complete,
}

impl RoundState {
    pub fn deal(deck: &Deck, passing_direction: PassingDirection) -> Self {
        let hands = std::array::from_fn(|seat| Hand::with_cards(deck.deal_chunk(seat)));
        let phase = if passing_direction.requires_selection() {
            RoundPhase::Passing
        } else {
            RoundPhase::Playing
        };
        let leader = opening_leader(&hands).unwrap_or(PlayerPosition::North);
        Self::from_hands(hands, leader, passing_direction, phase)
    }

    /// Builds a round from explicit hands with no cards played yet.
    pub fn from_hands(
        hands: [Hand; 4],
        leader: PlayerPosition,
        passing_direction: PassingDirection,
        phase: RoundPhase,
    ) -> Self {
        Self {
            hands,
            current_trick: Trick::new(leader),
            played: CardSet::EMPTY,
            tricks_completed: 0,
            hearts_broken: false,
            passing_direction,
            phase,
        }
    }

    /// Builds a mid-round position: `played` holds the cards from finished
    /// tricks and the next trick is led by `leader`.
    pub fn resume(
        hands: [Hand; 4],
        leader: PlayerPosition,
        played: CardSet,
        tricks_completed: u8,
        hearts_broken: bool,
    ) -> Self {
        Self {
            hands,
            current_trick: Trick::new(leader),
            played,
            tricks_completed,
            hearts_broken,
            passing_direction: PassingDirection::Hold,
            phase: RoundPhase::Playing,
        }
    }

    pub fn passing_direction(&self) -> PassingDirection {
        self.passing_direction
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn hand(&self, seat: PlayerPosition) -> &Hand {
        &self.hands[seat.index()]
    }

    pub(crate) fn hand_mut(&mut self, seat: PlayerPosition) -> &mut Hand {
        &mut self.hands[seat.index()]
    }

    pub fn current_trick(&self) -> &Trick {
        &self.current_trick
    }

    /// Cards from tricks already taken this round.
    pub fn played(&self) -> CardSet {
        self.played
    }

    pub fn tricks_completed(&self) -> u8 {
        self.tricks_completed
    }

    pub fn is_first_trick(&self) -> bool {
        self.tricks_completed == 0
    }

    pub fn hearts_broken(&self) -> bool {
        self.hearts_broken
    }

    pub fn leader(&self) -> PlayerPosition {
        self.current_trick.leader()
    }

    pub fn next_to_play(&self) -> PlayerPosition {
        self.current_trick.expected_position()
    }

    pub(crate) fn finish(&mut self) {
        self.phase = RoundPhase::Complete;
    }

    /// Removes each seat's three selected cards and hands them to the
    /// direction's target. Nothing moves unless all four selections are valid.
    pub fn exchange(&mut self, selections: [[usize; 3]; 4]) -> Result<[[Card; 3]; 4], PassingError> {
        if self.phase != RoundPhase::Passing {
            return Err(PassingError::NotInPassingPhase);
        }

        let mut passes = [[Card::OPENING_LEAD; 3]; 4];
        for seat in PlayerPosition::LOOP {
            passes[seat.index()] = select_pass(seat, self.hand(seat), selections[seat.index()])?;
        }

        for seat in PlayerPosition::LOOP {
            let hand = &mut self.hands[seat.index()];
            for slot in selections[seat.index()] {
                hand.take(slot);
            }
        }

        for seat in PlayerPosition::LOOP {
            let target = self.passing_direction.target(seat);
            for card in passes[seat.index()] {
                self.hands[target.index()].fill_first_empty(card);
            }
        }

        if let Some(leader) = opening_leader(&self.hands) {
            self.current_trick = Trick::new(leader);
        }
        self.phase = RoundPhase::Playing;
        Ok(passes)
    }

    /// Slots `seat` may legally play right now. Empty outside the playing
    /// phase.
    pub fn legal_slots(&self, seat: PlayerPosition) -> LegalSlots {
        if self.phase != RoundPhase::Playing {
            return LegalSlots::default();
        }
        let hand = self.hand(seat);
        match self.current_trick.lead_suit() {
            None if self.is_first_trick() && hand.contains(Card::OPENING_LEAD) => {
                LegalSlots::from_hand(hand, |card| card == Card::OPENING_LEAD)
            }
            None => {
                let only_hearts = hand.only(|card| card.suit.is_heart());
                LegalSlots::from_hand(hand, |card| {
                    self.hearts_broken || only_hearts || !card.suit.is_heart()
                })
            }
            Some(lead) if hand.has_suit(lead) => {
                LegalSlots::from_hand(hand, |card| card.suit == lead)
            }
            Some(_) if self.is_first_trick() => {
                let only_points = hand.only(Card::is_penalty);
                LegalSlots::from_hand(hand, |card| only_points || !card.is_penalty())
            }
            Some(_) => LegalSlots::from_hand(hand, |_| true),
        }
    }

    /// Commits the card in `slot` to the current trick.
    pub fn play_slot(&mut self, seat: PlayerPosition, slot: usize) -> Result<Card, PlayError> {
        if self.phase != RoundPhase::Playing {
            return Err(PlayError::NotInPlayPhase);
        }

        let expected = self.next_to_play();
        if expected != seat {
            return Err(PlayError::OutOfTurn {
                expected,
                actual: seat,
            });
        }

        if slot >= HAND_SLOTS {
            return Err(PlayError::SlotOutOfRange { seat, slot });
        }
        let card = self
            .hand(seat)
            .slot(slot)
            .ok_or(PlayError::EmptySlot { seat, slot })?;
        if !self.legal_slots(seat).contains(slot) {
            return Err(PlayError::IllegalCard { seat, card });
        }

        self.current_trick.play(seat, card).map_err(PlayError::Trick)?;
        self.hands[seat.index()].take(slot);
        if card.suit.is_heart() {
            self.hearts_broken = true;
        }
        Ok(card)
    }

    /// Closes a full trick: records its cards, hands the lead to the winner
    /// and returns `(winner, points)`. `None` while cards are still missing.
    pub fn complete_trick(&mut self) -> Option<(PlayerPosition, u8)> {
        let winner = self.current_trick.winner()?;
        let points = self.current_trick.penalty_total();
        for play in self.current_trick.plays() {
            self.played.insert(play.card);
        }
        self.current_trick = Trick::new(winner);
        self.tricks_completed += 1;
        if self.tricks_completed >= TRICKS_PER_ROUND {
            self.phase = RoundPhase::Complete;
        }
        Some((winner, points))
    }

    /// Every card either in a hand, on the table or already taken.
    pub fn accounted_cards(&self) -> usize {
        let in_hands: usize = self.hands.iter().map(Hand::len).sum();
        in_hands + self.current_trick.len() + self.played.len()
    }
}

fn opening_leader(hands: &[Hand; 4]) -> Option<PlayerPosition> {
    PlayerPosition::LOOP
        .iter()
        .copied()
        .find(|seat| hands[seat.index()].contains(Card::OPENING_LEAD))
}

/// Set of playable hand slots.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LegalSlots(u16);

impl LegalSlots {
    fn from_hand(hand: &Hand, allowed: impl Fn(Card) -> bool) -> Self {
        let mut bits = 0u16;
        for (slot, card) in hand.occupied() {
            if allowed(card) {
                bits |= 1 << slot;
            }
        }
        Self(bits)
    }

    pub fn contains(self, slot: usize) -> bool {
        slot < HAND_SLOTS && self.0 & (1 << slot) != 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = usize> {
        (0..HAND_SLOTS).filter(move |slot| self.0 & (1 << slot) != 0)
    }

    /// The `n`-th legal slot in ascending order.
    pub fn nth(self, n: usize) -> Option<usize> {
        self.iter().nth(n)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayOutcome {
    Played(Card),
    TrickCompleted {
        card: Card,
        winner: PlayerPosition,
        points: u8,
        moon_shooter: Option<PlayerPosition>,
    },
}

impl PlayOutcome {
    pub fn card(&self) -> Card {
        match self {
            PlayOutcome::Played(card) | PlayOutcome::TrickCompleted { card, .. } => *card,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayError {
    NotInPlayPhase,
    OutOfTurn {
        expected: PlayerPosition,
        actual: PlayerPosition,
    },
    SlotOutOfRange {
        seat: PlayerPosition,
        slot: usize,
    },
    EmptySlot {
        seat: PlayerPosition,
        slot: usize,
    },
    IllegalCard {
        seat: PlayerPosition,
        card: Card,
    },
    TrickIncomplete,
    Trick(TrickError),
}

impl fmt::Display for PlayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayError::NotInPlayPhase => write!(f, "round is not in the playing phase"),
            PlayError::OutOfTurn { expected, actual } => {
                write!(f, "expected {expected} to play next but got {actual}")
            }
            PlayError::SlotOutOfRange { seat, slot } => {
                write!(f, "{seat} played slot {slot}, expected 0-{}", HAND_SLOTS - 1)
            }
            PlayError::EmptySlot { seat, slot } => write!(f, "{seat} played empty slot {slot}"),
            PlayError::IllegalCard { seat, card } => write!(f, "{seat} may not play {card} now"),
            PlayError::TrickIncomplete => write!(f, "trick evaluated before four cards were played"),
            PlayError::Trick(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for PlayError {}

#[cfg(test)]
mod tests {
    use super::{PlayError, RoundPhase, RoundState};
    use crate::model::card::Card;
    use crate::model::card_set::CardSet;
    use crate::model::deck::Deck;
    use crate::model::hand::Hand;
    use crate::model::passing::{PassingDirection, PassingError};
    use crate::model::player::PlayerPosition;
    use crate::model::rank::Rank;
    use crate::model::suit::Suit;

    fn card(rank: Rank, suit: Suit) -> Card {
        Card::new(rank, suit)
    }

    #[test]
    fn dealing_distributes_thirteen_cards_per_player() {
        let deck = Deck::standard();
        let round = RoundState::deal(&deck, PassingDirection::Left);

        for seat in PlayerPosition::LOOP.iter().copied() {
            assert_eq!(round.hand(seat).len(), 13, "{seat} should have 13 cards");
        }
        assert_eq!(round.phase(), RoundPhase::Passing);
        assert_eq!(round.leader(), PlayerPosition::North);
        assert_eq!(round.accounted_cards(), 52);
    }

    #[test]
    fn hold_direction_starts_in_play_phase() {
        let deck = Deck::standard();
        let round = RoundState::deal(&deck, PassingDirection::Hold);
        assert_eq!(round.phase(), RoundPhase::Playing);
    }

    #[test]
    fn leader_follows_two_of_clubs_holder() {
        let deck = Deck::shuffled_with_seed(99);
        let round = RoundState::deal(&deck, PassingDirection::Hold);
        let expected = PlayerPosition::LOOP
            .iter()
            .copied()
            .find(|seat| round.hand(*seat).contains(Card::OPENING_LEAD))
            .expect("two of clubs is dealt");
        assert_eq!(round.leader(), expected);
    }

    #[test]
    fn passing_flow_moves_cards_and_enters_play_phase() {
        let deck = Deck::standard();
        let mut round = RoundState::deal(&deck, PassingDirection::Left);
        let passes = round.exchange([[0, 1, 2]; 4]).unwrap();

        assert_eq!(round.phase(), RoundPhase::Playing);
        for seat in PlayerPosition::LOOP {
            assert_eq!(round.hand(seat).len(), 13);
            let target = PassingDirection::Left.target(seat);
            for passed in passes[seat.index()] {
                assert!(round.hand(target).contains(passed));
            }
        }
        // North passed the two of clubs to East.
        assert_eq!(round.leader(), PlayerPosition::East);
        assert_eq!(round.accounted_cards(), 52);
    }

    #[test]
    fn invalid_selection_leaves_hands_untouched() {
        let deck = Deck::standard();
        let mut round = RoundState::deal(&deck, PassingDirection::Across);
        let before = round;
        let err = round
            .exchange([[0, 1, 2], [0, 1, 2], [0, 0, 2], [0, 1, 2]])
            .unwrap_err();
        assert_eq!(
            err,
            PassingError::DuplicateSlot {
                seat: PlayerPosition::South,
                slot: 0
            }
        );
        assert_eq!(round, before);
    }

    #[test]
    fn first_lead_must_be_two_of_clubs() {
        let deck = Deck::standard();
        let mut round = RoundState::deal(&deck, PassingDirection::Hold);
        let legal = round.legal_slots(PlayerPosition::North);
        assert_eq!(legal.len(), 1);
        assert_eq!(legal.nth(0), Some(0));
        assert!(matches!(
            round.play_slot(PlayerPosition::North, 5),
            Err(PlayError::IllegalCard { .. })
        ));
        assert_eq!(
            round.play_slot(PlayerPosition::North, 0),
            Ok(Card::OPENING_LEAD)
        );
        assert_eq!(round.current_trick().lead_suit(), Some(Suit::Clubs));
    }

    #[test]
    fn nothing_is_playable_while_passing_or_after_the_round() {
        let deck = Deck::standard();
        let round = RoundState::deal(&deck, PassingDirection::Left);
        assert_eq!(round.phase(), RoundPhase::Passing);
        for seat in PlayerPosition::LOOP {
            assert!(round.legal_slots(seat).is_empty());
        }

        let done = RoundState::from_hands(
            [Hand::new(); 4],
            PlayerPosition::North,
            PassingDirection::Hold,
            RoundPhase::Complete,
        );
        assert!(done.legal_slots(PlayerPosition::North).is_empty());
    }

    #[test]
    fn out_of_turn_and_empty_slots_are_rejected() {
        let deck = Deck::standard();
        let mut round = RoundState::deal(&deck, PassingDirection::Hold);
        assert!(matches!(
            round.play_slot(PlayerPosition::East, 0),
            Err(PlayError::OutOfTurn { .. })
        ));
        round.play_slot(PlayerPosition::North, 0).unwrap();
        assert!(matches!(
            round.play_slot(PlayerPosition::East, 13),
            Err(PlayError::SlotOutOfRange { .. })
        ));
    }

    #[test]
    fn follow_suit_is_required() {
        // Standard deck: North holds all clubs, East all diamonds.
        let deck = Deck::standard();
        let mut round = RoundState::deal(&deck, PassingDirection::Hold);
        round.play_slot(PlayerPosition::North, 0).unwrap();
        // East has no clubs and it is the first trick: only diamonds are legal
        // because East holds no penalty cards anyway.
        assert_eq!(round.legal_slots(PlayerPosition::East).len(), 13);
        round.play_slot(PlayerPosition::East, 3).unwrap();
        // South holds only hearts: the escape valve allows any of them.
        assert_eq!(round.legal_slots(PlayerPosition::South).len(), 13);
    }

    #[test]
    fn first_trick_forbids_points_when_void() {
        let north = Hand::with_cards(&[card(Rank::Two, Suit::Clubs), card(Rank::Three, Suit::Clubs)]);
        let east = Hand::with_cards(&[
            card(Rank::Ace, Suit::Hearts),
            Card::QUEEN_OF_SPADES,
            card(Rank::Four, Suit::Diamonds),
        ]);
        let south = Hand::with_cards(&[card(Rank::Five, Suit::Hearts), Card::QUEEN_OF_SPADES]);
        let west = Hand::with_cards(&[card(Rank::Six, Suit::Clubs)]);
        let mut round = RoundState::from_hands(
            [north, east, south, west],
            PlayerPosition::North,
            PassingDirection::Hold,
            RoundPhase::Playing,
        );
        round.play_slot(PlayerPosition::North, 0).unwrap();

        let legal: Vec<_> = round.legal_slots(PlayerPosition::East).iter().collect();
        assert_eq!(legal, vec![2]);

        round.play_slot(PlayerPosition::East, 2).unwrap();
        // South holds only penalty cards: everything is legal.
        assert_eq!(round.legal_slots(PlayerPosition::South).len(), 2);
    }

    #[test]
    fn cannot_lead_hearts_before_broken() {
        let north = Hand::with_cards(&[card(Rank::Two, Suit::Hearts), card(Rank::Nine, Suit::Clubs)]);
        let mut round = RoundState::resume(
            [north, Hand::new(), Hand::new(), Hand::new()],
            PlayerPosition::North,
            CardSet::EMPTY,
            3,
            false,
        );
        let legal: Vec<_> = round.legal_slots(PlayerPosition::North).iter().collect();
        assert_eq!(legal, vec![1]);

        round.hand_mut(PlayerPosition::North).take(1);
        let legal: Vec<_> = round.legal_slots(PlayerPosition::North).iter().collect();
        assert_eq!(legal, vec![0], "all-heart hand may lead hearts");
    }

    #[test]
    fn completed_trick_goes_to_highest_of_led_suit() {
        let hands = [
            Hand::with_cards(&[card(Rank::Ten, Suit::Spades)]),
            Hand::with_cards(&[card(Rank::King, Suit::Spades)]),
            Hand::with_cards(&[card(Rank::Ace, Suit::Hearts)]),
            Hand::with_cards(&[card(Rank::Jack, Suit::Spades)]),
        ];
        let mut round =
            RoundState::resume(hands, PlayerPosition::North, CardSet::EMPTY, 12, true);
        for seat in PlayerPosition::LOOP {
            round.play_slot(seat, 0).unwrap();
        }
        assert_eq!(round.complete_trick(), Some((PlayerPosition::East, 1)));
        assert_eq!(round.leader(), PlayerPosition::East);
        assert_eq!(round.phase(), RoundPhase::Complete);
        assert_eq!(round.played().len(), 4);
    }
}
