use super::{Policy, PolicyContext, PolicyError, pick_best, random_pass};
use crate::bot::{RolloutMode, candidate_score, rollout_seed};
use hearts_core::belief::DeterminizeStats;
use rand::rngs::SmallRng;
use rand::{RngCore, SeedableRng};
use tracing::{Level, event};

/// Flat Monte Carlo search: each legal card is played on a copy of the game,
/// followed by `rollouts` random continuations, and the card whose
/// continuations cost the seat the fewest points is chosen.
///
/// The determinized variant re-deals the hidden cards before every rollout;
/// the clairvoyant variant plays against the true hands.
#[derive(Debug)]
pub struct MonteCarloPolicy {
    rollouts: u32,
    mode: RolloutMode,
    rng: SmallRng,
    stats: DeterminizeStats,
    decisions: u64,
}

impl MonteCarloPolicy {
    pub fn determinized(rollouts: u32, seed: u64) -> Self {
        Self::new(rollouts, RolloutMode::Determinized, seed)
    }

    pub fn clairvoyant(rollouts: u32, seed: u64) -> Self {
        Self::new(rollouts, RolloutMode::Clairvoyant, seed)
    }

    fn new(rollouts: u32, mode: RolloutMode, seed: u64) -> Self {
        Self {
            rollouts,
            mode,
            rng: SmallRng::seed_from_u64(seed),
            stats: DeterminizeStats::default(),
            decisions: 0,
        }
    }

    pub fn rollouts(&self) -> u32 {
        self.rollouts
    }

    pub fn decisions(&self) -> u64 {
        self.decisions
    }
}

impl Policy for MonteCarloPolicy {
    fn choose_pass(&mut self, ctx: &PolicyContext) -> Result<[usize; 3], PolicyError> {
        random_pass(ctx, &mut self.rng)
    }

    fn choose_play(&mut self, ctx: &PolicyContext) -> Result<usize, PolicyError> {
        self.decisions += 1;
        let decision_seed = self.rng.next_u64();

        let mut scored = Vec::with_capacity(ctx.legal.len());
        for (candidate, slot) in ctx.legal.iter().enumerate() {
            let mut baseline = *ctx.state;
            baseline.play_card(ctx.seat, slot)?;
            let score = candidate_score(
                &baseline,
                ctx.seat,
                self.mode,
                self.rollouts,
                |rollout| rollout_seed(decision_seed, candidate, rollout),
                &mut self.stats,
            )?;
            scored.push((slot, score));
        }

        let chosen = pick_best(scored.iter().copied(), |a, b| a < b, &mut self.rng)
            .ok_or(PolicyError::NoLegalMove { seat: ctx.seat })?;

        if tracing::enabled!(Level::DEBUG) {
            let summary = scored
                .iter()
                .filter_map(|(slot, score)| {
                    ctx.hand().slot(*slot).map(|card| format!("{card}:{score}"))
                })
                .collect::<Vec<_>>()
                .join(",");
            event!(
                target: "hearts_bot::play",
                Level::DEBUG,
                seat = %ctx.seat,
                policy = %self.label(),
                rollouts = self.rollouts,
                candidates = %summary,
                chosen = ?ctx.hand().slot(chosen),
            );
        }
        Ok(chosen)
    }

    fn label(&self) -> String {
        match self.mode {
            RolloutMode::Determinized => format!("monte-carlo(rollouts={})", self.rollouts),
            RolloutMode::Clairvoyant => format!("clairvoyant(rollouts={})", self.rollouts),
        }
    }

    fn determinize_stats(&self) -> Option<DeterminizeStats> {
        match self.mode {
            RolloutMode::Determinized => Some(self.stats),
            RolloutMode::Clairvoyant => None,
        }
    }
}
