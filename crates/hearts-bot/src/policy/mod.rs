mod heuristic;
mod human;
mod monte_carlo;
mod random;

pub use heuristic::RuleBasedPolicy;
pub use human::HumanPolicy;
pub use monte_carlo::MonteCarloPolicy;
pub use random::RandomPolicy;

use hearts_core::belief::DeterminizeStats;
use hearts_core::game::match_state::MatchState;
use hearts_core::model::hand::Hand;
use hearts_core::model::player::PlayerPosition;
use hearts_core::model::round::{LegalSlots, PlayError};
use rand::Rng;
use rand::seq::IteratorRandom;
use std::fmt;
use std::io::{self, BufRead, BufReader, Write};

/// What a policy sees when asked for a decision.
#[derive(Debug, Clone, Copy)]
pub struct PolicyContext<'a> {
    pub seat: PlayerPosition,
    pub state: &'a MatchState,
    /// Empty unless the round is in its playing phase.
    pub legal: LegalSlots,
}

impl<'a> PolicyContext<'a> {
    pub fn new(seat: PlayerPosition, state: &'a MatchState) -> Self {
        Self {
            seat,
            state,
            legal: state.legal_moves(seat),
        }
    }

    pub fn hand(&self) -> &'a Hand {
        self.state.round().hand(self.seat)
    }
}

/// Decision-making interface shared by every seat type.
pub trait Policy: Send {
    /// Three distinct occupied slots to pass.
    fn choose_pass(&mut self, ctx: &PolicyContext) -> Result<[usize; 3], PolicyError>;

    /// One slot out of `ctx.legal`.
    fn choose_play(&mut self, ctx: &PolicyContext) -> Result<usize, PolicyError>;

    fn label(&self) -> String;

    /// Determinization counters for policies that sample hidden hands.
    fn determinize_stats(&self) -> Option<DeterminizeStats> {
        None
    }
}

#[derive(Debug)]
pub enum PolicyError {
    NoLegalMove { seat: PlayerPosition },
    TooFewCards { seat: PlayerPosition, held: usize },
    InputClosed,
    Io(io::Error),
    Engine(PlayError),
}

impl fmt::Display for PolicyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolicyError::NoLegalMove { seat } => write!(f, "{seat} has no legal move"),
            PolicyError::TooFewCards { seat, held } => {
                write!(f, "{seat} holds {held} cards, cannot pass three")
            }
            PolicyError::InputClosed => write!(f, "input closed while waiting for a choice"),
            PolicyError::Io(err) => write!(f, "terminal I/O failed: {err}"),
            PolicyError::Engine(err) => write!(f, "rollout rejected a move: {err}"),
        }
    }
}

impl std::error::Error for PolicyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PolicyError::Io(err) => Some(err),
            PolicyError::Engine(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for PolicyError {
    fn from(err: io::Error) -> Self {
        PolicyError::Io(err)
    }
}

impl From<PlayError> for PolicyError {
    fn from(err: PlayError) -> Self {
        PolicyError::Engine(err)
    }
}

/// Seat configuration; [`PolicyKind::spawn`] turns it into a live policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PolicyKind {
    #[default]
    Random,
    Human,
    RuleBased {
        threshold: u32,
    },
    MonteCarlo {
        rollouts: u32,
    },
    Clairvoyant {
        rollouts: u32,
    },
}

impl PolicyKind {
    pub fn is_human(self) -> bool {
        matches!(self, PolicyKind::Human)
    }

    /// Builds the policy with its own RNG stream. Human seats talk to the
    /// process's stdin and stdout.
    pub fn spawn(self, seed: u64) -> Box<dyn Policy> {
        self.spawn_with_io(seed, BufReader::new(io::stdin()), io::stdout())
    }

    /// Like [`PolicyKind::spawn`], but a human seat reads `input` and writes
    /// its prompts to `output`. Other kinds drop both.
    pub fn spawn_with_io<R, W>(self, seed: u64, input: R, output: W) -> Box<dyn Policy>
    where
        R: BufRead + Send + 'static,
        W: Write + Send + 'static,
    {
        match self {
            PolicyKind::Random => Box::new(RandomPolicy::new(seed)),
            PolicyKind::Human => Box::new(HumanPolicy::new(input, output)),
            PolicyKind::RuleBased { threshold } => Box::new(RuleBasedPolicy::new(threshold, seed)),
            PolicyKind::MonteCarlo { rollouts } => {
                Box::new(MonteCarloPolicy::determinized(rollouts, seed))
            }
            PolicyKind::Clairvoyant { rollouts } => {
                Box::new(MonteCarloPolicy::clairvoyant(rollouts, seed))
            }
        }
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolicyKind::Random => write!(f, "random"),
            PolicyKind::Human => write!(f, "human"),
            PolicyKind::RuleBased { threshold } => write!(f, "rule-based(threshold={threshold})"),
            PolicyKind::MonteCarlo { rollouts } => write!(f, "monte-carlo(rollouts={rollouts})"),
            PolicyKind::Clairvoyant { rollouts } => write!(f, "clairvoyant(rollouts={rollouts})"),
        }
    }
}

/// Three distinct occupied slots drawn uniformly.
pub(crate) fn random_pass<R: Rng + ?Sized>(
    ctx: &PolicyContext,
    rng: &mut R,
) -> Result<[usize; 3], PolicyError> {
    let hand = ctx.hand();
    let chosen = hand.occupied().map(|(slot, _)| slot).choose_multiple(rng, 3);
    match chosen.as_slice() {
        [a, b, c] => Ok([*a, *b, *c]),
        _ => Err(PolicyError::TooFewCards {
            seat: ctx.seat,
            held: hand.len(),
        }),
    }
}

/// A legal slot drawn uniformly.
pub(crate) fn random_legal<R: Rng + ?Sized>(
    seat: PlayerPosition,
    legal: LegalSlots,
    rng: &mut R,
) -> Result<usize, PolicyError> {
    if legal.is_empty() {
        return Err(PolicyError::NoLegalMove { seat });
    }
    legal
        .nth(rng.gen_range(0..legal.len()))
        .ok_or(PolicyError::NoLegalMove { seat })
}

/// Uniform choice among the candidates sharing the best key, where `better`
/// says whether a key strictly beats the current best.
pub(crate) fn pick_best<K, R>(
    candidates: impl IntoIterator<Item = (usize, K)>,
    better: impl Fn(&K, &K) -> bool,
    rng: &mut R,
) -> Option<usize>
where
    K: PartialEq,
    R: Rng + ?Sized,
{
    let mut best: Option<K> = None;
    let mut tied: Vec<usize> = Vec::new();
    for (slot, key) in candidates {
        match &best {
            Some(current) if better(&key, current) => {
                best = Some(key);
                tied.clear();
                tied.push(slot);
            }
            Some(current) if key == *current => tied.push(slot),
            Some(_) => {}
            None => {
                best = Some(key);
                tied.push(slot);
            }
        }
    }
    tied.into_iter().choose(rng)
}
