//! Error types for the conquest engine.
//!
//! Malformed moves and bad diplomacy targets are never errors: they are
//! dropped and reported as [`GameEvent`](crate::game::GameEvent)s. The types
//! here cover calls that are rejected as a whole.

use std::io;

use crate::game::{GameStatus, PlayerId};

/// Why a whole `make_move` call was refused. State is unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TurnRejected {
    /// The game is not in the running state.
    #[error("game is not running (status: {0})")]
    NotRunning(GameStatus),
    /// A player other than the current one tried to move.
    #[error("it is {expected}'s turn, not {got}'s")]
    WrongPlayer {
        /// The player whose turn it is.
        expected: PlayerId,
        /// The player that submitted the decision.
        got: PlayerId,
    },
    /// Nobody is alive to move.
    #[error("no living player can move")]
    NoLivingPlayer,
}

/// Invalid start/pause/resume request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ControlError {
    /// The requested transition is not allowed from the current status.
    #[error("cannot {action} a game that is {status}")]
    InvalidTransition {
        /// The control action that was requested.
        action: &'static str,
        /// The status the game was in.
        status: GameStatus,
    },
}

/// A player identifier that does not name one of the four players.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown player id: {0:?}")]
pub struct UnknownPlayer(pub String);

/// Configuration loading or validation failure.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config: {0}")]
    Io(#[from] io::Error),
    /// The configuration file is not valid JSON for the expected schema.
    #[error("failed to parse config: {0}")]
    Json(#[from] serde_json::Error),
    /// A value is outside its allowed range.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Errors from running a driven game.
#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    /// One decision source per player is required.
    #[error("expected 4 decision sources, got {0}")]
    WrongSourceCount(usize),
    /// The game could not be started.
    #[error(transparent)]
    Control(#[from] ControlError),
    /// The configuration was rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The claim checker patterns did not compile.
    #[error("failed to build claim checker: {0}")]
    Analyzer(#[from] regex::Error),
}
