use super::{Policy, PolicyContext, PolicyError, pick_best, random_pass};
use hearts_core::game::match_state::MatchState;
use hearts_core::model::card::Card;
use hearts_core::model::player::PlayerPosition;
use hearts_core::model::trick::Trick;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use tracing::{Level, event};

/// Single-card rules: lead low, duck under the current winner, dump the
/// queen of spades and hearts when void.
///
/// Normally the highest-scoring card is played. Once the seat has taken at
/// least `threshold` points this round while nobody else has any, it turns
/// around and plays the lowest-scoring card to try for the moon.
#[derive(Debug)]
pub struct RuleBasedPolicy {
    threshold: u32,
    rng: SmallRng,
}

impl RuleBasedPolicy {
    pub fn new(threshold: u32, seed: u64) -> Self {
        Self {
            threshold,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }
}

/// Preference score of `card` on the trick as it stands.
pub fn card_score(card: Card, trick: &Trick) -> u8 {
    match trick.lead_suit() {
        None => 13 - card.rank.index(),
        Some(lead) if card.suit == lead => {
            let ducks = trick
                .plays()
                .any(|play| play.card.suit == lead && play.card.rank > card.rank);
            if ducks { card.rank.index() } else { 0 }
        }
        Some(_) if card.is_queen_of_spades() => 14,
        Some(_) if card.suit.is_heart() => 13,
        Some(_) => 0,
    }
}

/// The seat has reached `threshold` round points and every opponent is clean.
pub fn chasing_moon(state: &MatchState, seat: PlayerPosition, threshold: u32) -> bool {
    state.round_points(seat) >= threshold
        && seat
            .others()
            .iter()
            .all(|other| state.round_points(*other) == 0)
}

impl Policy for RuleBasedPolicy {
    fn choose_pass(&mut self, ctx: &PolicyContext) -> Result<[usize; 3], PolicyError> {
        random_pass(ctx, &mut self.rng)
    }

    fn choose_play(&mut self, ctx: &PolicyContext) -> Result<usize, PolicyError> {
        let hand = ctx.hand();
        let trick = ctx.state.round().current_trick();
        let moon = chasing_moon(ctx.state, ctx.seat, self.threshold);

        let scored = ctx.legal.iter().filter_map(|slot| {
            hand.slot(slot).map(|card| (slot, card_score(card, trick)))
        });
        let chosen = if moon {
            pick_best(scored, |a, b| a < b, &mut self.rng)
        } else {
            pick_best(scored, |a, b| a > b, &mut self.rng)
        }
        .ok_or(PolicyError::NoLegalMove { seat: ctx.seat })?;

        if tracing::enabled!(Level::DEBUG) {
            event!(
                target: "hearts_bot::play",
                Level::DEBUG,
                seat = %ctx.seat,
                policy = "rule-based",
                moon,
                legal_count = ctx.legal.len(),
                chosen = ?hand.slot(chosen),
            );
        }
        Ok(chosen)
    }

    fn label(&self) -> String {
        format!("rule-based(threshold={})", self.threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::{RuleBasedPolicy, card_score};
    use crate::policy::{Policy, PolicyContext};
    use hearts_core::belief::BeliefState;
    use hearts_core::game::match_state::MatchState;
    use hearts_core::model::card::Card;
    use hearts_core::model::card_set::CardSet;
    use hearts_core::model::hand::Hand;
    use hearts_core::model::player::PlayerPosition;
    use hearts_core::model::rank::Rank;
    use hearts_core::model::round::RoundState;
    use hearts_core::model::score::ScoreBoard;
    use hearts_core::model::suit::Suit;
    use hearts_core::model::trick::Trick;

    fn card(rank: Rank, suit: Suit) -> Card {
        Card::new(rank, suit)
    }

    #[test]
    fn leading_prefers_low_cards() {
        let trick = Trick::new(PlayerPosition::North);
        assert_eq!(card_score(card(Rank::Two, Suit::Clubs), &trick), 13);
        assert_eq!(card_score(card(Rank::Ace, Suit::Clubs), &trick), 1);
    }

    #[test]
    fn following_rewards_ducking_and_sluffing_points() {
        let mut trick = Trick::new(PlayerPosition::North);
        trick.play(PlayerPosition::North, card(Rank::Ten, Suit::Spades)).unwrap();
        assert_eq!(card_score(card(Rank::Nine, Suit::Spades), &trick), 7);
        assert_eq!(card_score(card(Rank::Jack, Suit::Spades), &trick), 0);
        assert_eq!(card_score(card(Rank::Two, Suit::Hearts), &trick), 13);
        assert_eq!(card_score(Card::QUEEN_OF_SPADES, &trick), 0);
        assert_eq!(card_score(card(Rank::Five, Suit::Diamonds), &trick), 0);

        let mut trick = Trick::new(PlayerPosition::North);
        trick.play(PlayerPosition::North, card(Rank::Ten, Suit::Clubs)).unwrap();
        assert_eq!(card_score(Card::QUEEN_OF_SPADES, &trick), 14);
    }

    fn spade_trick_state(scores: ScoreBoard) -> MatchState {
        let hands = [
            Hand::with_cards(&[card(Rank::Ten, Suit::Spades), card(Rank::Two, Suit::Diamonds)]),
            Hand::with_cards(&[
                card(Rank::Nine, Suit::Spades),
                card(Rank::King, Suit::Spades),
                card(Rank::Three, Suit::Spades),
            ]),
            Hand::with_cards(&[card(Rank::Four, Suit::Diamonds), card(Rank::Five, Suit::Diamonds)]),
            Hand::with_cards(&[card(Rank::Six, Suit::Diamonds), card(Rank::Seven, Suit::Diamonds)]),
        ];
        let round = RoundState::resume(hands, PlayerPosition::North, CardSet::EMPTY, 5, false);
        let mut state = MatchState::from_parts(round, scores, BeliefState::new(), 1);
        state.play_card(PlayerPosition::North, 0).unwrap();
        state
    }

    #[test]
    fn normal_mode_ducks_with_highest_safe_card() {
        let state = spade_trick_state(ScoreBoard::new());
        let mut policy = RuleBasedPolicy::new(10, 5);
        let ctx = PolicyContext::new(PlayerPosition::East, &state);
        for _ in 0..20 {
            assert_eq!(policy.choose_play(&ctx).unwrap(), 0, "nine of spades ducks the ten");
        }
    }

    #[test]
    fn moon_mode_plays_to_win() {
        // Threshold zero with clean opponents flips the preference.
        let state = spade_trick_state(ScoreBoard::new());
        let mut policy = RuleBasedPolicy::new(0, 5);
        let ctx = PolicyContext::new(PlayerPosition::East, &state);
        for _ in 0..20 {
            assert_eq!(policy.choose_play(&ctx).unwrap(), 1, "king of spades takes the trick");
        }
    }

    #[test]
    fn opponent_points_cancel_moon_mode() {
        let mut scores = ScoreBoard::new();
        scores.add_penalty(PlayerPosition::South, 1);
        let state = spade_trick_state(scores);
        let mut policy = RuleBasedPolicy::new(0, 5);
        let ctx = PolicyContext::new(PlayerPosition::East, &state);
        assert_eq!(policy.choose_play(&ctx).unwrap(), 0);
    }

    #[test]
    fn tied_scores_break_both_ways() {
        // Leading with two aces: both score 1.
        let hands = [
            Hand::with_cards(&[card(Rank::Ace, Suit::Spades), card(Rank::Ace, Suit::Diamonds)]),
            Hand::with_cards(&[card(Rank::Two, Suit::Spades), card(Rank::Two, Suit::Diamonds)]),
            Hand::with_cards(&[card(Rank::Three, Suit::Spades), card(Rank::Three, Suit::Diamonds)]),
            Hand::with_cards(&[card(Rank::Four, Suit::Spades), card(Rank::Four, Suit::Diamonds)]),
        ];
        let round = RoundState::resume(hands, PlayerPosition::North, CardSet::EMPTY, 11, false);
        let state = MatchState::from_parts(round, ScoreBoard::new(), BeliefState::new(), 1);
        let mut policy = RuleBasedPolicy::new(26, 3);
        let ctx = PolicyContext::new(PlayerPosition::North, &state);
        let mut picks = [0usize; 2];
        for _ in 0..100 {
            picks[policy.choose_play(&ctx).unwrap()] += 1;
        }
        assert!(picks[0] > 0 && picks[1] > 0, "{picks:?}");
    }
}
