use std::io;
use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::Parser;

use hearts_core::model::player::PlayerPosition;
use hearts_sim::config::{SeatConfig, SimConfig};
use hearts_sim::logging::init_logging;
use hearts_sim::runner::SimulationRunner;

/// Simulates Hearts games between random, rule-based, search and human seats.
#[derive(Debug, Parser)]
#[command(
    name = "hearts-sim",
    author,
    version,
    about = "Hearts simulator with Monte Carlo and rule-based players"
)]
struct Cli {
    /// Number of games to simulate [default: 100].
    #[arg(value_name = "GAMES")]
    games: Option<u32>,

    /// Monte Carlo seat over sampled opponent hands.
    #[arg(long = "mc", num_args = 2, value_names = ["SEAT", "ROLLOUTS"])]
    monte_carlo: Vec<u32>,

    /// Monte Carlo seat that sees every hand.
    #[arg(long = "cv", num_args = 2, value_names = ["SEAT", "ROLLOUTS"])]
    clairvoyant: Vec<u32>,

    /// Rule-based seat; it tries to shoot the moon from THRESHOLD round points.
    #[arg(long = "rb", num_args = 2, value_names = ["SEAT", "THRESHOLD"])]
    rule_based: Vec<u32>,

    /// Seat played from the terminal (implies --verbose).
    #[arg(long = "hm", value_name = "SEAT")]
    human: Option<u32>,

    /// Print hands, passes and every trick.
    #[arg(short = 'd', long)]
    verbose: bool,

    /// Seed for deals and seat decisions [default: random].
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Where to write per-game places [default: stats.txt].
    #[arg(long, value_name = "FILE")]
    stats: Option<PathBuf>,

    /// YAML configuration; flags override its values.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Also write JSON log events to this file.
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn apply(&self, config: &mut SimConfig) -> anyhow::Result<()> {
        if let Some(games) = self.games {
            config.games = games;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(stats) = self.stats.clone() {
            config.stats_path = stats;
        }
        if let Some(log_file) = self.log_file.clone() {
            config.logging.json_file = Some(log_file);
        }
        if self.verbose {
            config.verbose = true;
        }

        for pair in self.monte_carlo.chunks_exact(2) {
            config.set_seat(SeatConfig::monte_carlo(seat("--mc", pair[0])?, rollouts("--mc", pair[1])?));
        }
        for pair in self.clairvoyant.chunks_exact(2) {
            config.set_seat(SeatConfig::clairvoyant(seat("--cv", pair[0])?, rollouts("--cv", pair[1])?));
        }
        for pair in self.rule_based.chunks_exact(2) {
            config.set_seat(SeatConfig::rule_based(seat("--rb", pair[0])?, pair[1]));
        }
        if let Some(index) = self.human {
            config.set_seat(SeatConfig::human(seat("--hm", index)?));
        }
        Ok(())
    }
}

fn seat(flag: &str, index: u32) -> anyhow::Result<PlayerPosition> {
    match PlayerPosition::from_index(index as usize) {
        Some(seat) => Ok(seat),
        None => bail!("{flag}: seat must be between 0 and 3, got {index}"),
    }
}

fn rollouts(flag: &str, count: u32) -> anyhow::Result<u32> {
    if count == 0 {
        bail!("{flag}: rollouts must be greater than zero");
    }
    Ok(count)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = match cli.config.as_deref() {
        Some(path) => SimConfig::from_path(path)?,
        None => SimConfig::default(),
    };
    cli.apply(&mut config)?;
    config.validate().context("invalid settings")?;

    let _logging_guard = init_logging(&config.logging)?;
    let mut runner = SimulationRunner::new(&config, io::stdout())?;
    println!(
        "Simulating {} game(s) with seed {}",
        config.games,
        runner.seed()
    );
    runner.run()?;
    Ok(())
}
