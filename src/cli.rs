//! CLI command implementations.

pub(crate) mod run;
pub(crate) mod show_config;
pub(crate) mod tournament;

mod output;

use std::error::Error;
use std::fmt;
use std::path::PathBuf;

use clap::ValueEnum;
use grid_conquest::driver::SourceKind;
use grid_conquest::game::PLAYER_COUNT;
use grid_conquest::{BonusPolicy, Config, ConfigError, DriverError};

/// Output format for the `run` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
    /// Final position as structured text for LLM consumption.
    Llm,
}

/// Output format for the `tournament` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum TournamentFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
    /// CSV format.
    Csv,
}

/// Game settings shared by every command that plays games.
#[derive(clap::Args, Debug, Clone)]
pub(crate) struct GameArgs {
    /// JSON config file (flags below override its values)
    #[arg(short, long)]
    pub(crate) config: Option<PathBuf>,

    /// Sources for blue, yellow, gray and green (default: greedy,random,greedy,random)
    #[arg(short, long, value_delimiter = ',')]
    pub(crate) players: Option<Vec<SourceKind>>,

    /// Random seed for the built-in sources
    #[arg(short, long)]
    pub(crate) seed: Option<u64>,

    /// Stop a game when the turn counter reaches this value
    #[arg(short = 't', long)]
    pub(crate) max_turns: Option<u32>,

    /// Who gets the resource bonus when the mover dies on the cell
    #[arg(long)]
    pub(crate) bonus_policy: Option<BonusPolicy>,

    /// Do not analyse diplomatic messages for false claims
    #[arg(long)]
    pub(crate) no_fact_check: bool,
}

const DEFAULT_LINEUP: [SourceKind; PLAYER_COUNT] = [
    SourceKind::Greedy,
    SourceKind::Random,
    SourceKind::Greedy,
    SourceKind::Random,
];

impl GameArgs {
    /// Load the config file, if any, and apply flag overrides.
    pub(crate) fn config(&self) -> Result<Config, CliError> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };
        if let Some(seed) = self.seed {
            config.driver.seed = seed;
        }
        if let Some(max_turns) = self.max_turns {
            config.driver.max_turns = max_turns;
        }
        if let Some(policy) = self.bonus_policy {
            config.engine.bonus_policy = policy;
        }
        if self.no_fact_check {
            config.driver.fact_check = false;
        }
        config.validate()?;
        Ok(config)
    }

    /// One source kind per player, in rotation order.
    pub(crate) fn lineup(&self) -> Result<[SourceKind; PLAYER_COUNT], CliError> {
        match &self.players {
            None => Ok(DEFAULT_LINEUP),
            Some(kinds) => <[SourceKind; PLAYER_COUNT]>::try_from(kinds.as_slice()).map_err(|_| {
                CliError::new(format!(
                    "--players needs exactly {PLAYER_COUNT} sources, got {}",
                    kinds.len()
                ))
            }),
        }
    }
}

/// Lowercase names of a lineup, for output.
pub(crate) fn lineup_names(lineup: &[SourceKind]) -> Vec<String> {
    lineup
        .iter()
        .map(|kind| {
            kind.to_possible_value()
                .map_or_else(|| format!("{kind:?}"), |v| v.get_name().to_string())
        })
        .collect()
}

/// CLI error type.
#[derive(Debug)]
pub(crate) struct CliError {
    message: String,
}

impl CliError {
    /// Create a new CLI error.
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for CliError {}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        Self::new(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::new(format!("JSON serialization failed: {e}"))
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<DriverError> for CliError {
    fn from(e: DriverError) -> Self {
        Self::new(e.to_string())
    }
}
