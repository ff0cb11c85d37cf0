use hearts_bot::PolicyKind;
use hearts_core::model::player::PlayerPosition;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::Level;

pub const DEFAULT_GAMES: u32 = 100;
pub const DEFAULT_STATS_PATH: &str = "stats.txt";

/// Run configuration, loaded from YAML and overridden by command-line flags.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SimConfig {
    #[serde(default = "default_games")]
    pub games: u32,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "default_stats_path")]
    pub stats_path: PathBuf,
    #[serde(default)]
    pub verbose: bool,
    #[serde(default)]
    pub seats: Vec<SeatConfig>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            games: DEFAULT_GAMES,
            seed: None,
            stats_path: default_stats_path(),
            verbose: false,
            seats: Vec::new(),
            logging: LoggingConfig::default(),
        }
    }
}

impl SimConfig {
    /// Load configuration from a YAML file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let path_buf = path.to_path_buf();
        let file = File::open(path).map_err(|source| ConfigError::Read {
            source,
            path: path_buf.clone(),
        })?;
        let reader = BufReader::new(file);
        let mut cfg: SimConfig =
            serde_yaml::from_reader(reader).map_err(|source| ConfigError::Parse {
                source,
                path: path_buf.clone(),
            })?;
        cfg.validate().map_err(|source| ConfigError::Invalid {
            path: path_buf,
            source,
        })?;
        Ok(cfg)
    }

    /// Validate the configuration without performing I/O.
    pub fn validate(&mut self) -> Result<(), ValidationError> {
        if self.games == 0 {
            return Err(ValidationError::InvalidField {
                field: "games".to_string(),
                message: "number of games must be greater than zero".to_string(),
            });
        }
        if self.stats_path.as_os_str().is_empty() {
            return Err(ValidationError::InvalidField {
                field: "stats_path".to_string(),
                message: "path must not be empty".to_string(),
            });
        }
        self.logging.normalize();
        if self.logging.level().is_none() {
            return Err(ValidationError::InvalidField {
                field: "logging.level".to_string(),
                message: format!("unknown level '{}'", self.logging.level),
            });
        }

        let mut seen = HashSet::new();
        for (index, seat) in self.seats.iter().enumerate() {
            if !seen.insert(seat.seat) {
                return Err(ValidationError::InvalidField {
                    field: format!("seats[{index}].seat"),
                    message: format!("seat {} configured more than once", seat.seat.index()),
                });
            }
            seat.policy_kind()
                .map_err(|message| ValidationError::InvalidField {
                    field: format!("seats[{index}]"),
                    message,
                })?;
        }
        if self.seats.iter().filter(|seat| seat.kind == SeatKind::Human).count() > 1 {
            return Err(ValidationError::InvalidField {
                field: "seats".to_string(),
                message: "at most one seat can be human".to_string(),
            });
        }
        Ok(())
    }

    /// Replaces any existing entry for the same seat.
    pub fn set_seat(&mut self, seat: SeatConfig) {
        self.seats.retain(|existing| existing.seat != seat.seat);
        self.seats.push(seat);
    }

    /// Policy per seat; unconfigured seats play randomly.
    pub fn seat_kinds(&self) -> Result<[PolicyKind; 4], ValidationError> {
        let mut kinds = [PolicyKind::Random; 4];
        for (index, seat) in self.seats.iter().enumerate() {
            kinds[seat.seat.index()] =
                seat.policy_kind()
                    .map_err(|message| ValidationError::InvalidField {
                        field: format!("seats[{index}]"),
                        message,
                    })?;
        }
        Ok(kinds)
    }

    pub fn has_human(&self) -> bool {
        self.seats.iter().any(|seat| seat.kind == SeatKind::Human)
    }
}

fn default_games() -> u32 {
    DEFAULT_GAMES
}

fn default_stats_path() -> PathBuf {
    PathBuf::from(DEFAULT_STATS_PATH)
}

/// One non-random seat.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct SeatConfig {
    pub seat: PlayerPosition,
    pub kind: SeatKind,
    #[serde(default)]
    pub rollouts: Option<u32>,
    #[serde(default)]
    pub threshold: Option<u32>,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SeatKind {
    Random,
    Human,
    RuleBased,
    MonteCarlo,
    Clairvoyant,
}

impl SeatConfig {
    pub fn monte_carlo(seat: PlayerPosition, rollouts: u32) -> Self {
        Self::with(seat, SeatKind::MonteCarlo, Some(rollouts), None)
    }

    pub fn clairvoyant(seat: PlayerPosition, rollouts: u32) -> Self {
        Self::with(seat, SeatKind::Clairvoyant, Some(rollouts), None)
    }

    pub fn rule_based(seat: PlayerPosition, threshold: u32) -> Self {
        Self::with(seat, SeatKind::RuleBased, None, Some(threshold))
    }

    pub fn human(seat: PlayerPosition) -> Self {
        Self::with(seat, SeatKind::Human, None, None)
    }

    fn with(
        seat: PlayerPosition,
        kind: SeatKind,
        rollouts: Option<u32>,
        threshold: Option<u32>,
    ) -> Self {
        Self {
            seat,
            kind,
            rollouts,
            threshold,
        }
    }

    fn policy_kind(&self) -> Result<PolicyKind, String> {
        let rollouts = || match self.rollouts {
            Some(0) => Err("rollouts must be greater than zero".to_string()),
            Some(rollouts) => Ok(rollouts),
            None => Err("rollouts is required for search seats".to_string()),
        };
        match self.kind {
            SeatKind::Random => Ok(PolicyKind::Random),
            SeatKind::Human => Ok(PolicyKind::Human),
            SeatKind::RuleBased => self
                .threshold
                .map(|threshold| PolicyKind::RuleBased { threshold })
                .ok_or_else(|| "threshold is required for rule_based seats".to_string()),
            SeatKind::MonteCarlo => rollouts().map(|rollouts| PolicyKind::MonteCarlo { rollouts }),
            SeatKind::Clairvoyant => rollouts().map(|rollouts| PolicyKind::Clairvoyant { rollouts }),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    #[serde(default = "default_tracing_level")]
    pub level: String,
    /// JSON event log, written in addition to the stderr output.
    #[serde(default)]
    pub json_file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_tracing_level(),
            json_file: None,
        }
    }
}

impl LoggingConfig {
    fn normalize(&mut self) {
        if self.level.trim().is_empty() {
            self.level = default_tracing_level();
        }
    }

    pub fn level(&self) -> Option<Level> {
        match self.level.trim().to_ascii_lowercase().as_str() {
            "trace" => Some(Level::TRACE),
            "debug" => Some(Level::DEBUG),
            "info" => Some(Level::INFO),
            "warn" | "warning" => Some(Level::WARN),
            "error" => Some(Level::ERROR),
            _ => None,
        }
    }
}

fn default_tracing_level() -> String {
    "warn".to_string()
}

/// Errors surfaced when loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        #[source]
        source: serde_yaml::Error,
        path: PathBuf,
    },
    #[error("invalid configuration in {path:?}: {source}")]
    Invalid {
        path: PathBuf,
        source: ValidationError,
    },
}

/// Validation failures captured with contextual metadata.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field}: {message}")]
    InvalidField { field: String, message: String },
}
