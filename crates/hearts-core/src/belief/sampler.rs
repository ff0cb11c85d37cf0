//! Determinization: deal the hidden cards anew, consistent with what a seat
//! has observed.

use super::SuitOwners;
use crate::game::match_state::MatchState;
use crate::model::card::Card;
use crate::model::player::PlayerPosition;
use rand::Rng;
use rand::seq::SliceRandom;

/// Randomized dealing attempts before the last deal is accepted as is.
pub const MAX_ATTEMPTS: usize = 100;

/// Outcome of one [`Determinizer::determinize`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Determinization {
    /// Randomized dealing attempts used; zero when nothing was left to deal
    /// after the forced pass.
    pub attempts: usize,
    /// Every attempt hit a seat with no eligible card left. The deal is
    /// complete but may put cards in a suit the holder is known to lack.
    pub exhausted: bool,
}

/// Running totals over many determinizations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeterminizeStats {
    pub determinizations: u64,
    pub attempts: u64,
    pub exhaustions: u64,
}

impl DeterminizeStats {
    pub fn record(&mut self, outcome: &Determinization) {
        self.determinizations += 1;
        self.attempts += outcome.attempts as u64;
        if outcome.exhausted {
            self.exhaustions += 1;
        }
    }

    pub fn merge(&mut self, other: &DeterminizeStats) {
        self.determinizations += other.determinizations;
        self.attempts += other.attempts;
        self.exhaustions += other.exhaustions;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Hole {
    seat: PlayerPosition,
    slot: usize,
}

#[derive(Debug, Default)]
pub struct Determinizer;

impl Determinizer {
    /// Replaces the opponents' hidden cards in `state` with a fresh guess
    /// from `viewer`'s point of view.
    ///
    /// Cards the viewer knows and cards of a suit pinned to their holder stay
    /// where they are. Everything else is pulled into a pool and dealt back
    /// into the same slots so every hand keeps its size.
    pub fn determinize<R: Rng + ?Sized>(
        state: &mut MatchState,
        viewer: PlayerPosition,
        rng: &mut R,
    ) -> Determinization {
        let beliefs = *state.beliefs();
        let owners = SuitOwners::solve(&beliefs, viewer);
        let known = beliefs.known(viewer);

        let mut pool: Vec<Card> = Vec::new();
        let mut holes: Vec<Hole> = Vec::new();
        for seat in viewer.others() {
            let hand = state.round_mut().hand_mut(seat);
            let hidden: Vec<(usize, Card)> = hand
                .occupied()
                .filter(|(_, card)| !known.contains(*card) && !owners.is_owner(seat, card.suit))
                .collect();
            for (slot, card) in hidden {
                hand.take(slot);
                pool.push(card);
                holes.push(Hole { seat, slot });
            }
        }

        let eligible = |seat: PlayerPosition, card: Card| !beliefs.is_void(seat, card.suit);

        // Forced pass: a seat with exactly as many eligible cards as open
        // slots takes all of them.
        loop {
            let mut progressed = false;
            for seat in viewer.others() {
                let open = holes.iter().filter(|hole| hole.seat == seat).count();
                if open == 0 {
                    continue;
                }
                let fits = pool.iter().filter(|card| eligible(seat, **card)).count();
                if fits != open {
                    continue;
                }
                let mut index = pool.len();
                while index > 0 {
                    index -= 1;
                    if !eligible(seat, pool[index]) {
                        continue;
                    }
                    let Some(hole_index) = holes.iter().position(|hole| hole.seat == seat) else {
                        break;
                    };
                    let hole = holes.swap_remove(hole_index);
                    let card = pool.swap_remove(index);
                    state.round_mut().hand_mut(seat).place(hole.slot, card);
                }
                progressed = true;
            }
            if !progressed {
                break;
            }
        }

        if pool.is_empty() {
            return Determinization::default();
        }

        let mut outcome = Determinization::default();
        for attempt in 1..=MAX_ATTEMPTS {
            outcome.attempts = attempt;
            let mut cards = pool.clone();
            cards.shuffle(rng);
            holes.shuffle(rng);

            let mut failed = false;
            for hole in holes.iter().rev() {
                let pick = match cards.iter().rposition(|card| eligible(hole.seat, *card)) {
                    Some(index) => index,
                    None => {
                        failed = true;
                        0
                    }
                };
                let card = cards.swap_remove(pick);
                state.round_mut().hand_mut(hole.seat).place(hole.slot, card);
            }

            if !failed {
                return outcome;
            }
        }

        outcome.exhausted = true;
        outcome
    }
}
