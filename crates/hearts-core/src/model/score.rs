use crate::model::player::PlayerPosition;

/// Points available in one round: thirteen hearts plus the queen of spades.
pub const ROUND_POINTS: u32 = 26;
/// Cumulative total that ends the game.
pub const GAME_OVER_POINTS: u32 = 100;

/// Cumulative totals for one game plus the snapshot taken when the current
/// round began, so round-local points are `total - start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreBoard {
    totals: [u32; 4],
    round_start: [u32; 4],
}

impl ScoreBoard {
    pub const fn new() -> Self {
        Self {
            totals: [0; 4],
            round_start: [0; 4],
        }
    }

    pub fn add_penalty(&mut self, seat: PlayerPosition, points: u32) {
        self.totals[seat.index()] += points;
    }

    pub fn set_totals(&mut self, totals: [u32; 4]) {
        self.totals = totals;
    }

    pub fn score(&self, seat: PlayerPosition) -> u32 {
        self.totals[seat.index()]
    }

    pub fn standings(&self) -> &[u32; 4] {
        &self.totals
    }

    pub fn round_start(&self, seat: PlayerPosition) -> u32 {
        self.round_start[seat.index()]
    }

    /// Points gained since the round began.
    pub fn round_points(&self, seat: PlayerPosition) -> u32 {
        self.score(seat).saturating_sub(self.round_start(seat))
    }

    pub fn begin_round(&mut self) {
        self.round_start = self.totals;
    }

    /// Credits a finished trick to `winner`. When that brings the winner's round
    /// points to exactly 26 the moon is shot: the winner gives the 26 back and
    /// every other seat takes 26. Returns the shooter in that case.
    pub fn apply_trick(&mut self, winner: PlayerPosition, points: u32) -> Option<PlayerPosition> {
        self.add_penalty(winner, points);
        if points == 0 || self.round_points(winner) != ROUND_POINTS {
            return None;
        }
        self.totals[winner.index()] -= ROUND_POINTS;
        for seat in winner.others() {
            self.add_penalty(seat, ROUND_POINTS);
        }
        Some(winner)
    }

    pub fn is_game_over(&self) -> bool {
        self.totals.iter().any(|&total| total >= GAME_OVER_POINTS)
    }

    /// Dense ranking: fewest points is place 1 and equal totals share a place.
    pub fn places(&self) -> [u8; 4] {
        let totals = &self.totals;
        totals.map(|total| {
            // Count each distinct lower total once, at its first seat.
            let lower = (0..totals.len())
                .filter(|&i| totals[i] < total && !totals[..i].contains(&totals[i]))
                .count();
            lower as u8 + 1
        })
    }
}

impl Default for ScoreBoard {
    fn default() -> Self {
        Self::new()
    }
}
