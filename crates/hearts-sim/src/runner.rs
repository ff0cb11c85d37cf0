use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use hearts_bot::policy::{Policy, PolicyContext, PolicyError};
use hearts_core::belief::DeterminizeStats;
use hearts_core::game::match_state::MatchState;
use hearts_core::model::passing::PassingError;
use hearts_core::model::player::PlayerPosition;
use hearts_core::model::round::{PlayError, PlayOutcome};
use hearts_core::model::trick::Play;
use rand::{RngCore, SeedableRng, rngs::StdRng};
use thiserror::Error;
use tracing::{Level, event};

use crate::analytics::{RunSummary, RunTally};
use crate::config::{SimConfig, ValidationError};
use crate::transcript;

/// Plays a batch of games between four seats and writes the results log.
pub struct SimulationRunner<W: Write> {
    games: u32,
    seed: u64,
    verbose: bool,
    show_progress: bool,
    stats_path: PathBuf,
    policies: [Box<dyn Policy>; 4],
    rng: StdRng,
    out: W,
}

impl<W: Write> SimulationRunner<W> {
    /// Builds the seats described by a validated configuration.
    pub fn new(config: &SimConfig, out: W) -> Result<Self, RunnerError> {
        let seed = config.seed.unwrap_or_else(rand::random);
        // Seat streams stay independent of the deal stream.
        let mut seeder = StdRng::seed_from_u64(!seed);
        let kinds = config.seat_kinds()?;
        let policies = kinds.map(|kind| kind.spawn(seeder.next_u64()));
        Ok(Self::with_policies(config, seed, policies, out))
    }

    /// Uses the given seats as-is; `seed` drives the deals.
    pub fn with_policies(
        config: &SimConfig,
        seed: u64,
        policies: [Box<dyn Policy>; 4],
        out: W,
    ) -> Self {
        let verbose = config.verbose || config.has_human();
        Self {
            games: config.games,
            seed,
            verbose,
            show_progress: !verbose,
            stats_path: config.stats_path.clone(),
            policies,
            rng: StdRng::seed_from_u64(seed),
            out,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Plays every game, then writes the summary to the output stream.
    pub fn run(&mut self) -> Result<RunSummary, RunnerError> {
        let started = Instant::now();
        let mut stats = create_stats_file(&self.stats_path)?;
        let mut tally = RunTally::new();
        let mut progress = Progress::new(self.games, self.show_progress);

        event!(
            target: "hearts_sim::run",
            Level::INFO,
            games = self.games,
            seed = self.seed,
            seats = ?self.labels(),
            "starting run"
        );
        progress.begin(&mut self.out).map_err(RunnerError::output)?;

        for game in 0..self.games {
            let state = self.play_game()?;
            let places = state.places();
            write_result(&mut stats, places).map_err(|source| RunnerError::Io {
                context: format!("writing {}", self.stats_path.display()),
                source,
            })?;
            tally.record_game(state.scores().standings(), places);
            event!(
                target: "hearts_sim::game",
                Level::INFO,
                game = game + 1,
                rounds = state.round_number(),
                totals = ?state.scores().standings(),
                places = ?places,
                "game finished"
            );
            progress.advance(game + 1, &mut self.out).map_err(RunnerError::output)?;
        }

        progress.finish(&mut self.out).map_err(RunnerError::output)?;
        stats.flush().map_err(|source| RunnerError::Io {
            context: format!("flushing {}", self.stats_path.display()),
            source,
        })?;

        let determinization = self
            .policies
            .iter()
            .filter_map(|policy| policy.determinize_stats())
            .fold(DeterminizeStats::default(), |mut total, stats| {
                total.merge(&stats);
                total
            });
        let summary = tally.finalize(self.labels(), determinization, started.elapsed());
        writeln!(self.out, "{summary}").map_err(RunnerError::output)?;
        self.out.flush().map_err(RunnerError::output)?;
        Ok(summary)
    }

    fn labels(&self) -> [String; 4] {
        std::array::from_fn(|index| self.policies[index].label())
    }

    /// Plays one game from zero totals until someone reaches 100.
    pub fn play_game(&mut self) -> Result<MatchState, RunnerError> {
        let mut state = MatchState::new();
        while !state.is_game_over() {
            state.start_round(&mut self.rng);
            if self.verbose {
                transcript::round_start(&mut self.out, &state).map_err(RunnerError::output)?;
            }
            if state.passing_direction().requires_selection() {
                self.exchange(&mut state)?;
            }
            self.play_round(&mut state)?;
            state.finish_round();
            if self.verbose {
                transcript::round_end(&mut self.out, &state).map_err(RunnerError::output)?;
            }
        }
        Ok(state)
    }

    fn exchange(&mut self, state: &mut MatchState) -> Result<(), RunnerError> {
        let mut selections = [[0usize; 3]; 4];
        for seat in PlayerPosition::LOOP {
            let ctx = PolicyContext::new(seat, state);
            selections[seat.index()] = self.policies[seat.index()]
                .choose_pass(&ctx)
                .map_err(|source| RunnerError::Policy { seat, source })?;
        }
        let passed = state.apply_passes(selections)?;
        if self.verbose {
            transcript::passes(&mut self.out, state, &passed).map_err(RunnerError::output)?;
        }
        Ok(())
    }

    fn play_round(&mut self, state: &mut MatchState) -> Result<(), RunnerError> {
        let mut table: Vec<Play> = Vec::with_capacity(4);
        while !state.is_round_over() {
            let seat = state.next_to_play();
            if table.is_empty() && self.verbose {
                transcript::trick_leader(&mut self.out, seat).map_err(RunnerError::output)?;
            }
            let ctx = PolicyContext::new(seat, state);
            let slot = self.policies[seat.index()]
                .choose_play(&ctx)
                .map_err(|source| RunnerError::Policy { seat, source })?;
            let outcome = state.play_card(seat, slot)?;
            table.push(Play {
                position: seat,
                card: outcome.card(),
            });

            if let PlayOutcome::TrickCompleted {
                winner,
                points,
                moon_shooter,
                ..
            } = outcome
            {
                event!(
                    target: "hearts_sim::trick",
                    Level::DEBUG,
                    winner = %winner,
                    points,
                    cards = %table
                        .iter()
                        .map(|play| play.card.to_string())
                        .collect::<Vec<_>>()
                        .join(" "),
                    "trick complete"
                );
                if self.verbose {
                    transcript::trick_result(&mut self.out, &table, winner, points, moon_shooter)
                        .map_err(RunnerError::output)?;
                }
                table.clear();
            }
        }
        Ok(())
    }
}

fn create_stats_file(path: &Path) -> Result<BufWriter<File>, RunnerError> {
    if let Some(parent) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| RunnerError::Io {
            context: format!("creating {}", parent.display()),
            source,
        })?;
    }
    let file = File::create(path).map_err(|source| RunnerError::Io {
        context: format!("creating {}", path.display()),
        source,
    })?;
    Ok(BufWriter::new(file))
}

/// One record per game: `p<seat>_<place>` for each seat, then a blank line.
fn write_result<W: Write>(stats: &mut W, places: [u8; 4]) -> io::Result<()> {
    for (seat, place) in places.iter().enumerate() {
        writeln!(stats, "p{seat}_{place}")?;
    }
    writeln!(stats)
}

/// Percent-complete ticker for non-interactive runs.
struct Progress {
    total: u32,
    enabled: bool,
    shown: u32,
}

impl Progress {
    fn new(total: u32, enabled: bool) -> Self {
        Self {
            total,
            enabled,
            shown: 0,
        }
    }

    fn begin<W: Write>(&self, out: &mut W) -> io::Result<()> {
        if self.enabled {
            writeln!(out, "Progress:")?;
        }
        Ok(())
    }

    fn advance<W: Write>(&mut self, done: u32, out: &mut W) -> io::Result<()> {
        if !self.enabled || self.total == 0 {
            return Ok(());
        }
        let percent = (u64::from(done) * 100 / u64::from(self.total)) as u32;
        if percent > self.shown && percent < 100 {
            self.shown = percent;
            write!(out, "\r{percent}%")?;
            out.flush()?;
        }
        Ok(())
    }

    fn finish<W: Write>(&self, out: &mut W) -> io::Result<()> {
        if self.enabled {
            writeln!(out, "\r100%")?;
            writeln!(out)?;
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },
    #[error("seat {seat} failed to decide: {source}")]
    Policy {
        seat: PlayerPosition,
        #[source]
        source: PolicyError,
    },
    #[error("engine rejected a play: {0}")]
    Play(#[from] PlayError),
    #[error("engine rejected a pass: {0}")]
    Pass(#[from] PassingError),
    #[error(transparent)]
    Config(#[from] ValidationError),
}

impl RunnerError {
    fn output(source: io::Error) -> Self {
        RunnerError::Io {
            context: "writing output".to_string(),
            source,
        }
    }
}
