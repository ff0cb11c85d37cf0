pub mod bot;
pub mod policy;

pub use bot::{ROLLOUT_TRICK_HORIZON, RolloutMode};
pub use policy::{
    HumanPolicy, MonteCarloPolicy, Policy, PolicyContext, PolicyError, PolicyKind, RandomPolicy,
    RuleBasedPolicy,
};
