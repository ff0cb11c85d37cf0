use crate::policy::{PolicyError, random_legal};
use hearts_core::belief::{DeterminizeStats, Determinization, Determinizer};
use hearts_core::game::match_state::MatchState;
use hearts_core::model::player::PlayerPosition;
use hearts_core::model::round::PlayOutcome;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Tricks a rollout plays past its starting point before it is cut off.
pub const ROLLOUT_TRICK_HORIZON: u8 = 7;

/// Whether rollouts see the true hidden hands or a fresh determinization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RolloutMode {
    Determinized,
    Clairvoyant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RolloutOutcome {
    /// Points the acting seat gained over the baseline; negative after a moon.
    pub delta: i64,
    pub determinization: Option<Determinization>,
}

/// Plays uniformly random legal cards, finishing the trick on the table and
/// stopping after [`ROLLOUT_TRICK_HORIZON`] tricks, at round end or at game end.
pub fn play_out<R: Rng + ?Sized>(state: &mut MatchState, rng: &mut R) -> Result<(), PolicyError> {
    let start = state.round().tricks_completed();
    while !state.is_round_over() {
        let seat = state.next_to_play();
        let slot = random_legal(seat, state.legal_moves(seat), rng)?;
        if let PlayOutcome::TrickCompleted { .. } = state.play_card(seat, slot)? {
            if state.round().tricks_completed() - start >= ROLLOUT_TRICK_HORIZON {
                break;
            }
        }
    }
    Ok(())
}

/// Stream seed for one rollout; depends only on the decision seed and the
/// rollout's position so results do not depend on evaluation order.
pub fn rollout_seed(decision_seed: u64, candidate: usize, rollout: u32) -> u64 {
    let index = ((candidate as u64) << 32) | u64::from(rollout);
    decision_seed ^ index.wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

/// One rollout from `baseline`, the position right after the candidate move.
pub fn run_rollout(
    baseline: &MatchState,
    seat: PlayerPosition,
    mode: RolloutMode,
    seed: u64,
) -> Result<RolloutOutcome, PolicyError> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut trial = *baseline;
    let determinization = match mode {
        RolloutMode::Determinized => Some(Determinizer::determinize(&mut trial, seat, &mut rng)),
        RolloutMode::Clairvoyant => None,
    };
    play_out(&mut trial, &mut rng)?;
    let delta = i64::from(trial.scores().score(seat)) - i64::from(baseline.scores().score(seat));
    Ok(RolloutOutcome {
        delta,
        determinization,
    })
}

/// Sum of rollout deltas for one candidate. Determinization outcomes are
/// folded into `stats`.
pub fn candidate_score(
    baseline: &MatchState,
    seat: PlayerPosition,
    mode: RolloutMode,
    rollouts: u32,
    seed_of: impl Fn(u32) -> u64 + Sync,
    stats: &mut DeterminizeStats,
) -> Result<i64, PolicyError> {
    let outcomes = collect_rollouts(baseline, seat, mode, rollouts, &seed_of)?;
    let mut total = 0i64;
    for outcome in outcomes {
        total += outcome.delta;
        if let Some(determinization) = outcome.determinization {
            stats.record(&determinization);
            if determinization.exhausted {
                tracing::warn!(
                    seat = %seat,
                    attempts = determinization.attempts,
                    "determinization exhausted its attempts, rollout uses an inconsistent deal"
                );
            }
        }
    }
    Ok(total)
}

#[cfg(not(feature = "parallel"))]
fn collect_rollouts(
    baseline: &MatchState,
    seat: PlayerPosition,
    mode: RolloutMode,
    rollouts: u32,
    seed_of: &(impl Fn(u32) -> u64 + Sync),
) -> Result<Vec<RolloutOutcome>, PolicyError> {
    (0..rollouts)
        .map(|rollout| run_rollout(baseline, seat, mode, seed_of(rollout)))
        .collect()
}

#[cfg(feature = "parallel")]
fn collect_rollouts(
    baseline: &MatchState,
    seat: PlayerPosition,
    mode: RolloutMode,
    rollouts: u32,
    seed_of: &(impl Fn(u32) -> u64 + Sync),
) -> Result<Vec<RolloutOutcome>, PolicyError> {
    use rayon::prelude::*;

    (0..rollouts)
        .into_par_iter()
        .map(|rollout| run_rollout(baseline, seat, mode, seed_of(rollout)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{ROLLOUT_TRICK_HORIZON, RolloutMode, play_out, rollout_seed, run_rollout};
    use hearts_core::game::match_state::MatchState;
    use hearts_core::model::deck::Deck;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn hold_round() -> MatchState {
        let mut state = MatchState::new();
        for _ in 0..4 {
            state.start_round_with_deck(&Deck::shuffled_with_seed(21));
        }
        state
    }

    #[test]
    fn play_out_stops_at_trick_horizon() {
        let mut state = hold_round();
        let mut rng = StdRng::seed_from_u64(2);
        // Lead the first card so the rollout begins mid-trick.
        let seat = state.next_to_play();
        let slot = state.legal_moves(seat).nth(0).unwrap();
        state.play_card(seat, slot).unwrap();

        play_out(&mut state, &mut rng).unwrap();
        assert_eq!(state.round().tricks_completed(), ROLLOUT_TRICK_HORIZON);
        assert!(state.round().current_trick().is_empty());
        assert!(!state.is_round_over());

        play_out(&mut state, &mut rng).unwrap();
        assert!(state.is_round_over());
        assert_eq!(state.round().tricks_completed(), 13);
    }

    #[test]
    fn rollout_seeds_differ_by_position() {
        let base = 0xDEAD_BEEF;
        assert_ne!(rollout_seed(base, 0, 0), rollout_seed(base, 0, 1));
        assert_ne!(rollout_seed(base, 0, 1), rollout_seed(base, 1, 0));
        assert_eq!(rollout_seed(base, 2, 3), rollout_seed(base, 2, 3));
    }

    #[test]
    fn rollouts_are_reproducible_from_their_seed() {
        let state = hold_round();
        let seat = state.next_to_play();
        for mode in [RolloutMode::Determinized, RolloutMode::Clairvoyant] {
            let first = run_rollout(&state, seat, mode, 42).unwrap();
            let second = run_rollout(&state, seat, mode, 42).unwrap();
            assert_eq!(first, second);
            assert_eq!(first.determinization.is_some(), mode == RolloutMode::Determinized);
            assert!(first.delta >= 0 && first.delta <= 26);
        }
    }
}
