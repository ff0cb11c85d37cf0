//! What a seat can deduce about the hidden hands.
//!
//! - `hard`: the void matrix and known-card sets updated from observed play.
//! - `owners`: suit-ownership deduction from the void matrix.
//! - `sampler`: determinization of the hidden cards for rollouts.

mod hard;
mod owners;
mod sampler;

pub use hard::{BeliefState, PlayObservation, SuitMask};
pub use owners::SuitOwners;
pub use sampler::{Determinization, DeterminizeStats, Determinizer, MAX_ATTEMPTS};
