use super::{Policy, PolicyContext, PolicyError, random_legal, random_pass};
use rand::SeedableRng;
use rand::rngs::SmallRng;

/// Plays a uniformly random legal card.
#[derive(Debug)]
pub struct RandomPolicy {
    rng: SmallRng,
}

impl RandomPolicy {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl Policy for RandomPolicy {
    fn choose_pass(&mut self, ctx: &PolicyContext) -> Result<[usize; 3], PolicyError> {
        random_pass(ctx, &mut self.rng)
    }

    fn choose_play(&mut self, ctx: &PolicyContext) -> Result<usize, PolicyError> {
        random_legal(ctx.seat, ctx.legal, &mut self.rng)
    }

    fn label(&self) -> String {
        "random".to_string()
    }
}
