//! Suit-ownership deduction from the void matrix.

use super::BeliefState;
use crate::model::player::PlayerPosition;
use crate::model::suit::Suit;

/// Per-suit owner deduced for one viewpoint, or `None` when undetermined.
///
/// An owner means: among the viewer's opponents, the cards of that suit the
/// owner currently holds are pinned to the owner during determinization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SuitOwners([Option<PlayerPosition>; 4]);

impl SuitOwners {
    /// Two deductions, applied in suit/seat order with first assignment winning:
    /// a suit where exactly one opponent is not void belongs to that opponent,
    /// and an opponent void in three suits owns the remaining one.
    pub fn solve(belief: &BeliefState, viewer: PlayerPosition) -> Self {
        let mut owners = [None; 4];
        let opponents = viewer.others();

        for index in 0..4 {
            if let Some(suit) = Suit::from_index(index) {
                let holders: Vec<PlayerPosition> = opponents
                    .iter()
                    .copied()
                    .filter(|seat| !belief.is_void(*seat, suit))
                    .collect();
                if holders.len() == 1 && owners[index].is_none() {
                    owners[index] = Some(holders[0]);
                }
            }

            if let Some(seat) = PlayerPosition::from_index(index) {
                if seat == viewer {
                    continue;
                }
                let open: Vec<Suit> = Suit::ALL
                    .iter()
                    .copied()
                    .filter(|suit| !belief.is_void(seat, *suit))
                    .collect();
                if open.len() == 1 && owners[open[0].index()].is_none() {
                    owners[open[0].index()] = Some(seat);
                }
            }
        }

        Self(owners)
    }

    pub fn owner(&self, suit: Suit) -> Option<PlayerPosition> {
        self.0[suit.index()]
    }

    pub fn is_owner(&self, seat: PlayerPosition, suit: Suit) -> bool {
        self.owner(suit) == Some(seat)
    }
}
