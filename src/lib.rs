// Allow unwrap in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
//! Grid Conquest: a deterministic four-player conquest engine.
//!
//! Four players start in the corners of a 10×10 board and fight over four
//! central resource cells and each other's home corners. Each player sees
//! only the cells near its own units, can exchange diplomatic messages with
//! the others, and is eliminated when its last unit dies.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │   CLI (run, tournament, config)     │
//! ├─────────────────────────────────────┤
//! │   Driver (tickets, sources)         │
//! ├─────────────────────────────────────┤
//! │   Engine (board, combat, turns)     │
//! └─────────────────────────────────────┘
//! ```
//!
//! The engine ([`game::GameState`]) is synchronous and never asks for
//! input. The [`driver`] requests decisions from [`driver::DecisionSource`]s
//! and feeds them back in, discarding answers that arrive after the game
//! was paused or reset.

pub mod config;
pub mod driver;
pub mod error;
pub mod game;
pub mod render;

pub use config::{BonusPolicy, Config, DriverConfig, EngineConfig};
pub use error::{ConfigError, ControlError, DriverError, TurnRejected, UnknownPlayer};

// Re-export key game types at crate root for convenience
pub use game::{
    Board, Coord, DiplomaticMessage, GameEvent, GameState, GameStatus, Move, Outcome, Player,
    PlayerId, PlayerView,
};
