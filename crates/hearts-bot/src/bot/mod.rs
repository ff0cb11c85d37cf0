//! Search machinery behind the Monte Carlo policies.

mod rollout;

pub use rollout::{
    ROLLOUT_TRICK_HORIZON, RolloutMode, RolloutOutcome, candidate_score, play_out, rollout_seed,
    run_rollout,
};
