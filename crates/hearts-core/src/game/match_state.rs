use crate::belief::{BeliefState, PlayObservation};
use crate::model::card::Card;
use crate::model::deck::Deck;
use crate::model::hand::Hand;
use crate::model::passing::{PassingDirection, PassingError};
use crate::model::player::PlayerPosition;
use crate::model::round::{LegalSlots, PlayError, PlayOutcome, RoundPhase, RoundState};
use crate::model::score::ScoreBoard;
use rand::Rng;

/// One game of Hearts: the round in progress, cumulative scores and the
/// void/known-card beliefs gathered this round.
///
/// The whole state is `Copy` so decision engines can clone it per rollout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchState {
    scores: ScoreBoard,
    beliefs: BeliefState,
    round_number: u32,
    current_round: RoundState,
    places: [u8; 4],
    game_over: bool,
}

impl MatchState {
    /// A fresh game with all totals at zero and no round dealt yet.
    pub fn new() -> Self {
        let current_round = RoundState::from_hands(
            [Hand::new(); 4],
            PlayerPosition::North,
            PassingDirection::Hold,
            RoundPhase::Complete,
        );
        Self {
            scores: ScoreBoard::new(),
            beliefs: BeliefState::new(),
            round_number: 0,
            current_round,
            places: [1; 4],
            game_over: false,
        }
    }

    /// Assembles a game from an explicit position, mainly for tests and
    /// rollouts that start mid-round.
    pub fn from_parts(
        round: RoundState,
        scores: ScoreBoard,
        beliefs: BeliefState,
        round_number: u32,
    ) -> Self {
        Self {
            scores,
            beliefs,
            round_number,
            current_round: round,
            places: scores.places(),
            game_over: scores.is_game_over(),
        }
    }

    pub fn scores(&self) -> &ScoreBoard {
        &self.scores
    }

    pub fn beliefs(&self) -> &BeliefState {
        &self.beliefs
    }

    pub fn round(&self) -> &RoundState {
        &self.current_round
    }

    pub(crate) fn round_mut(&mut self) -> &mut RoundState {
        &mut self.current_round
    }

    pub fn round_number(&self) -> u32 {
        self.round_number
    }

    pub fn passing_direction(&self) -> PassingDirection {
        self.current_round.passing_direction()
    }

    /// Standings from the last [`MatchState::finish_round`].
    pub fn places(&self) -> [u8; 4] {
        self.places
    }

    /// Shuffles a new deck from `rng` and deals the next round.
    pub fn start_round<R: Rng + ?Sized>(&mut self, rng: &mut R) -> &RoundState {
        let deck = Deck::shuffled(rng);
        self.start_round_with_deck(&deck)
    }

    pub fn start_round_with_deck(&mut self, deck: &Deck) -> &RoundState {
        self.round_number += 1;
        self.scores.begin_round();
        self.beliefs.reset();
        self.current_round = RoundState::deal(deck, PassingDirection::for_round(self.round_number));
        &self.current_round
    }

    /// Applies all four seats' selections at once and records what each
    /// passer now knows.
    pub fn apply_passes(&mut self, selections: [[usize; 3]; 4]) -> Result<[[Card; 3]; 4], PassingError> {
        let passes = self.current_round.exchange(selections)?;
        for seat in PlayerPosition::LOOP {
            self.beliefs.note_pass(seat, &passes[seat.index()]);
        }
        Ok(passes)
    }

    pub fn legal_moves(&self, seat: PlayerPosition) -> LegalSlots {
        self.current_round.legal_slots(seat)
    }

    pub fn next_to_play(&self) -> PlayerPosition {
        self.current_round.next_to_play()
    }

    /// Commits `seat`'s card in `slot`. The fourth card of a trick also
    /// scores the trick.
    pub fn play_card(&mut self, seat: PlayerPosition, slot: usize) -> Result<PlayOutcome, PlayError> {
        let round = &self.current_round;
        let lead_suit = round.current_trick().lead_suit();
        let first_trick = round.is_first_trick();
        let hearts_broken = round.hearts_broken();

        let card = self.current_round.play_slot(seat, slot)?;
        self.beliefs.observe_play(PlayObservation {
            seat,
            card,
            lead_suit,
            first_trick,
            hearts_broken,
        });

        if !self.current_round.current_trick().is_complete() {
            return Ok(PlayOutcome::Played(card));
        }
        let (winner, points, moon_shooter) = self.evaluate_trick()?;
        Ok(PlayOutcome::TrickCompleted {
            card,
            winner,
            points,
            moon_shooter,
        })
    }

    /// Scores the full trick on the table. Reaching the game-over total ends
    /// the round on the spot.
    pub fn evaluate_trick(&mut self) -> Result<(PlayerPosition, u8, Option<PlayerPosition>), PlayError> {
        let (winner, points) = self
            .current_round
            .complete_trick()
            .ok_or(PlayError::TrickIncomplete)?;
        let moon_shooter = self.scores.apply_trick(winner, u32::from(points));
        if self.scores.is_game_over() {
            self.game_over = true;
            self.current_round.finish();
        }
        Ok((winner, points, moon_shooter))
    }

    pub fn is_round_over(&self) -> bool {
        self.current_round.phase() == RoundPhase::Complete
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// Refreshes the standings; returns the places, 1 being best.
    pub fn finish_round(&mut self) -> [u8; 4] {
        self.places = self.scores.places();
        self.places
    }

    pub fn round_points(&self, seat: PlayerPosition) -> u32 {
        self.scores.round_points(seat)
    }
}

impl Default for MatchState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::MatchState;
    use crate::belief::BeliefState;
    use crate::model::card::Card;
    use crate::model::card_set::CardSet;
    use crate::model::deck::Deck;
    use crate::model::hand::Hand;
    use crate::model::passing::PassingDirection;
    use crate::model::player::PlayerPosition;
    use crate::model::rank::Rank;
    use crate::model::round::{PlayOutcome, RoundState};
    use crate::model::score::ScoreBoard;
    use crate::model::suit::Suit;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn new_game_holds_no_cards() {
        let state = MatchState::new();
        assert!(state.is_round_over());
        assert!(!state.is_game_over());
        assert_eq!(state.round_number(), 0);
        assert_eq!(state.round().accounted_cards(), 0);
        for seat in PlayerPosition::LOOP {
            assert!(state.round().hand(seat).is_empty());
            assert!(state.legal_moves(seat).is_empty());
        }
    }

    #[test]
    fn rounds_rotate_passing_direction() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut state = MatchState::new();
        assert!(state.is_round_over());

        let expected = [
            PassingDirection::Left,
            PassingDirection::Across,
            PassingDirection::Right,
            PassingDirection::Hold,
            PassingDirection::Left,
        ];
        for (round, direction) in expected.into_iter().enumerate() {
            state.start_round(&mut rng);
            assert_eq!(state.round_number(), round as u32 + 1);
            assert_eq!(state.passing_direction(), direction);
        }
    }

    #[test]
    fn passes_are_recorded_as_known_cards() {
        let mut state = MatchState::new();
        state.start_round_with_deck(&Deck::standard());
        let passes = state.apply_passes([[0, 1, 2]; 4]).unwrap();
        for seat in PlayerPosition::LOOP {
            for card in passes[seat.index()] {
                assert!(state.beliefs().known(seat).contains(card));
            }
        }
    }

    #[test]
    fn off_suit_play_records_void() {
        let mut state = MatchState::new();
        // Round four holds, so play starts straight away.
        for _ in 0..4 {
            state.start_round_with_deck(&Deck::standard());
        }
        assert_eq!(state.passing_direction(), PassingDirection::Hold);

        state.play_card(PlayerPosition::North, 0).unwrap();
        state.play_card(PlayerPosition::East, 0).unwrap();
        assert!(state.beliefs().is_void(PlayerPosition::East, Suit::Clubs));
        assert!(!state.beliefs().is_void(PlayerPosition::North, Suit::Clubs));
    }

    #[test]
    fn fourth_card_scores_the_trick() {
        let hands = [
            Hand::with_cards(&[Card::new(Rank::Two, Suit::Hearts), Card::new(Rank::Three, Suit::Clubs)]),
            Hand::with_cards(&[Card::new(Rank::Nine, Suit::Hearts), Card::new(Rank::Four, Suit::Clubs)]),
            Hand::with_cards(&[Card::QUEEN_OF_SPADES, Card::new(Rank::Five, Suit::Clubs)]),
            Hand::with_cards(&[Card::new(Rank::Four, Suit::Hearts), Card::new(Rank::Six, Suit::Clubs)]),
        ];
        let round = RoundState::resume(hands, PlayerPosition::North, CardSet::EMPTY, 11, true);
        let mut state = MatchState::from_parts(round, ScoreBoard::new(), BeliefState::new(), 1);

        state.play_card(PlayerPosition::North, 0).unwrap();
        state.play_card(PlayerPosition::East, 0).unwrap();
        state.play_card(PlayerPosition::South, 0).unwrap();
        let outcome = state.play_card(PlayerPosition::West, 0).unwrap();
        assert_eq!(
            outcome,
            PlayOutcome::TrickCompleted {
                card: Card::new(Rank::Four, Suit::Hearts),
                winner: PlayerPosition::East,
                points: 16,
                moon_shooter: None,
            }
        );
        assert_eq!(state.round_points(PlayerPosition::East), 16);
        assert_eq!(state.next_to_play(), PlayerPosition::East);
        assert!(!state.is_round_over());
    }

    #[test]
    fn reaching_one_hundred_ends_round_immediately() {
        let hands = [
            Hand::with_cards(&[Card::new(Rank::Ace, Suit::Hearts), Card::new(Rank::Three, Suit::Clubs)]),
            Hand::with_cards(&[Card::new(Rank::Nine, Suit::Hearts), Card::new(Rank::Four, Suit::Clubs)]),
            Hand::with_cards(&[Card::new(Rank::Ten, Suit::Hearts), Card::new(Rank::Five, Suit::Clubs)]),
            Hand::with_cards(&[Card::new(Rank::Four, Suit::Hearts), Card::new(Rank::Six, Suit::Clubs)]),
        ];
        let round = RoundState::resume(hands, PlayerPosition::North, CardSet::EMPTY, 11, true);
        let mut scores = ScoreBoard::new();
        scores.set_totals([97, 10, 20, 30]);
        scores.begin_round();
        let mut state = MatchState::from_parts(round, scores, BeliefState::new(), 5);
        assert!(!state.is_game_over());

        for seat in PlayerPosition::LOOP {
            state.play_card(seat, 0).unwrap();
        }
        assert!(state.is_game_over());
        assert!(state.is_round_over());
        assert_eq!(state.scores().standings(), &[101, 10, 20, 30]);
        assert_eq!(state.finish_round(), [4, 1, 2, 3]);
        assert_eq!(state.places(), [4, 1, 2, 3]);
    }

    #[test]
    fn full_round_with_first_legal_moves_awards_twenty_six() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut state = MatchState::new();
        state.start_round(&mut rng);
        state.apply_passes([[0, 1, 2]; 4]).unwrap();

        while !state.is_round_over() {
            let seat = state.next_to_play();
            let slot = state.legal_moves(seat).nth(0).expect("a legal move exists");
            state.play_card(seat, slot).unwrap();
            assert_eq!(state.round().accounted_cards(), 52);
        }

        let total: u32 = state.scores().standings().iter().sum();
        assert!(total == 26 || total == 78, "unexpected total {total}");
        assert!(state.round().played().len() == 52);
    }
}
