//! Game status and turn rotation.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ControlError;
use crate::game::{PLAYER_COUNT, PlayerId};

/// How a finished game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Exactly one player survived.
    Winner(PlayerId),
    /// Nobody survived.
    Draw,
}

impl Outcome {
    /// The winning player, if any.
    #[must_use]
    pub const fn winner(self) -> Option<PlayerId> {
        match self {
            Outcome::Winner(id) => Some(id),
            Outcome::Draw => None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Winner(id) => write!(f, "{} wins", id.name()),
            Outcome::Draw => f.write_str("draw"),
        }
    }
}

/// Lifecycle of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    /// Created, not started.
    #[default]
    Waiting,
    /// Accepting moves.
    Running,
    /// Suspended by the driver.
    Paused,
    /// Over. Terminal.
    Finished(Outcome),
}

impl GameStatus {
    /// Whether the game has ended.
    #[must_use]
    pub const fn is_finished(self) -> bool {
        matches!(self, GameStatus::Finished(_))
    }

    /// Short lowercase name of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            GameStatus::Waiting => "waiting",
            GameStatus::Running => "running",
            GameStatus::Paused => "paused",
            GameStatus::Finished(_) => "finished",
        }
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rotation over the four players plus the status state machine.
///
/// The scheduler does not know unit counts; callers pass in which players
/// are alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TurnScheduler {
    status: GameStatus,
    active: usize,
    turn: u32,
}

impl TurnScheduler {
    /// A fresh scheduler: waiting, Blue to move, turn 0.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            status: GameStatus::Waiting,
            active: 0,
            turn: 0,
        }
    }

    /// Current status.
    #[must_use]
    pub const fn status(&self) -> GameStatus {
        self.status
    }

    /// Current turn counter. Advances each time the rotation passes Blue.
    #[must_use]
    pub const fn turn(&self) -> u32 {
        self.turn
    }

    /// waiting → running.
    ///
    /// # Errors
    ///
    /// Fails from any other status.
    pub fn start(&mut self) -> Result<(), ControlError> {
        self.transition("start", GameStatus::Waiting, GameStatus::Running)
    }

    /// running → paused.
    ///
    /// # Errors
    ///
    /// Fails unless the game is running.
    pub fn pause(&mut self) -> Result<(), ControlError> {
        self.transition("pause", GameStatus::Running, GameStatus::Paused)
    }

    /// paused → running.
    ///
    /// # Errors
    ///
    /// Fails unless the game is paused.
    pub fn resume(&mut self) -> Result<(), ControlError> {
        self.transition("resume", GameStatus::Paused, GameStatus::Running)
    }

    fn transition(
        &mut self,
        action: &'static str,
        from: GameStatus,
        to: GameStatus,
    ) -> Result<(), ControlError> {
        if self.status != from {
            return Err(ControlError::InvalidTransition {
                action,
                status: self.status,
            });
        }
        self.status = to;
        Ok(())
    }

    /// End the game. Terminal; later calls are ignored.
    pub fn finish(&mut self, outcome: Outcome) {
        if !self.status.is_finished() {
            self.status = GameStatus::Finished(outcome);
        }
    }

    /// The first living player at or after the active slot.
    ///
    /// Never reports a dead player. `None` only when nobody is alive.
    #[must_use]
    pub fn current(&self, alive: [bool; PLAYER_COUNT]) -> Option<PlayerId> {
        (0..PLAYER_COUNT)
            .map(|step| (self.active + step) % PLAYER_COUNT)
            .find(|&idx| alive[idx])
            .and_then(PlayerId::from_index)
    }

    /// Move the active slot onto the player `current` reports.
    ///
    /// Skipping past Blue counts as a new turn, as in [`advance`](Self::advance).
    pub fn settle(&mut self, alive: [bool; PLAYER_COUNT]) {
        if let Some(player) = self.current(alive) {
            let idx = player.index();
            if idx < self.active {
                self.turn += 1;
            }
            self.active = idx;
        }
    }

    /// Rotate to the next living player.
    ///
    /// Returns the new player to move. When a full cycle finds nobody alive
    /// the game finishes as a draw and `None` is returned. Does nothing once
    /// the game is finished.
    pub fn advance(&mut self, alive: [bool; PLAYER_COUNT]) -> Option<PlayerId> {
        if self.status.is_finished() {
            return None;
        }
        for _ in 0..PLAYER_COUNT {
            self.active = (self.active + 1) % PLAYER_COUNT;
            if self.active == 0 {
                self.turn += 1;
            }
            if alive[self.active] {
                return PlayerId::from_index(self.active);
            }
        }
        self.finish(Outcome::Draw);
        None
    }
}
