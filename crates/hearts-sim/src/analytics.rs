use std::fmt;
use std::time::Duration;

use hearts_core::belief::DeterminizeStats;
use hearts_core::model::player::PlayerPosition;
use statrs::distribution::{ContinuousCDF, Normal};

const CONFIDENCE_LEVEL: f64 = 0.95;

/// Per-seat results accumulated over a run.
#[derive(Debug, Clone, Default)]
pub struct RunTally {
    points: [Vec<f64>; 4],
    wins: [u64; 4],
    games: u64,
}

impl RunTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one finished game's totals and places.
    pub fn record_game(&mut self, totals: &[u32; 4], places: [u8; 4]) {
        self.games += 1;
        for seat in PlayerPosition::LOOP {
            self.points[seat.index()].push(f64::from(totals[seat.index()]));
            if places[seat.index()] == 1 {
                self.wins[seat.index()] += 1;
            }
        }
    }

    pub fn games(&self) -> u64 {
        self.games
    }

    pub fn finalize(
        &self,
        labels: [String; 4],
        determinization: DeterminizeStats,
        elapsed: Duration,
    ) -> RunSummary {
        let seats = std::array::from_fn(|index| {
            let points = &self.points[index];
            let (ci_low, ci_high) = confidence_interval(points);
            SeatReport {
                label: labels[index].clone(),
                average: mean(points),
                ci_low,
                ci_high,
                wins: self.wins[index],
            }
        });
        RunSummary {
            games: self.games,
            seats,
            determinization,
            elapsed,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeatReport {
    pub label: String,
    pub average: f64,
    pub ci_low: f64,
    pub ci_high: f64,
    pub wins: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub games: u64,
    pub seats: [SeatReport; 4],
    pub determinization: DeterminizeStats,
    pub elapsed: Duration,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Average points per game session:")?;
        for (index, seat) in self.seats.iter().enumerate() {
            writeln!(
                f,
                "Player {index}: {:.2} (95% CI {:.2}-{:.2}, {} wins) [{}]",
                seat.average, seat.ci_low, seat.ci_high, seat.wins, seat.label
            )?;
        }
        if self.determinization.determinizations > 0 {
            writeln!(
                f,
                "Determinizations: {} ({} exhausted)",
                self.determinization.determinizations, self.determinization.exhaustions
            )?;
        }
        write!(f, "Time required: {:.3}s", self.elapsed.as_secs_f64())
    }
}

fn mean(points: &[f64]) -> f64 {
    if points.is_empty() {
        return 0.0;
    }
    points.iter().sum::<f64>() / points.len() as f64
}

fn z_score() -> f64 {
    Normal::new(0.0, 1.0)
        .map(|normal| normal.inverse_cdf(0.5 + CONFIDENCE_LEVEL / 2.0))
        .unwrap_or(1.96)
}

fn confidence_interval(points: &[f64]) -> (f64, f64) {
    if points.is_empty() {
        return (0.0, 0.0);
    }
    let mean = mean(points);
    if points.len() == 1 {
        return (mean, mean);
    }
    let variance = points
        .iter()
        .map(|value| (value - mean).powi(2))
        .sum::<f64>()
        / (points.len() as f64 - 1.0);
    let std_error = (variance / points.len() as f64).sqrt();
    let margin = z_score() * std_error;
    (mean - margin, mean + margin)
}
