//! Game driver for decision sources.
//!
//! The engine never asks anyone for a move. The driver does: it hands the
//! player to move a [`PlayerView`] together with a [`TurnTicket`], and
//! accepts the answer only while that ticket is still current. Pausing or
//! resetting the game invalidates every outstanding ticket, so a slow
//! source can never apply a decision to a game that moved on.
//!
//! [`run_game`] drives a whole game with one [`DecisionSource`] per player.

mod decision;
mod source;

pub use decision::Decision;
pub use source::{DecisionSource, GreedySource, PassiveSource, RandomSource, SourceKind};

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::{Config, DriverConfig};
use crate::error::{ControlError, DriverError, TurnRejected};
use crate::game::{
    ClaimChecker, EventSink, GameEvent, GameState, GameStatus, Outcome, PLAYER_COUNT, PlayerId,
    PlayerView, TurnReport,
};

/// Identifies one outstanding decision request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TurnTicket {
    /// Turn counter when the request was made.
    pub turn: u32,
    /// Player asked to move.
    pub player: PlayerId,
    /// Game epoch when the request was made.
    pub epoch: u64,
}

/// What happened to a submitted decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// The decision was applied and the rotation advanced.
    Applied(TurnReport),
    /// The engine refused the call; the rotation still advanced.
    Rejected(TurnRejected),
    /// The ticket no longer matches the game; nothing was applied.
    Stale,
}

/// Owns a game and mediates between it and decision sources.
#[derive(Debug)]
pub struct Driver {
    game: GameState,
    config: DriverConfig,
}

impl Driver {
    /// Wrap a game.
    #[must_use]
    pub const fn new(game: GameState, config: DriverConfig) -> Self {
        Self { game, config }
    }

    /// The driven game.
    #[must_use]
    pub const fn game(&self) -> &GameState {
        &self.game
    }

    /// Mutable access for control operations (start, resume, reset).
    pub const fn game_mut(&mut self) -> &mut GameState {
        &mut self.game
    }

    /// Driver settings.
    #[must_use]
    pub const fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// Give up the game.
    #[must_use]
    pub fn into_game(self) -> GameState {
        self.game
    }

    /// Ask for the next decision.
    ///
    /// Returns `None` unless the game is running with a living player to
    /// move.
    #[must_use]
    pub fn request(&self) -> Option<(TurnTicket, PlayerView)> {
        if self.game.status() != GameStatus::Running {
            return None;
        }
        let player = self.game.current_player()?;
        let ticket = TurnTicket {
            turn: self.game.current_turn(),
            player,
            epoch: self.game.epoch(),
        };
        Some((ticket, self.game.player_view(player)))
    }

    /// Whether `ticket` still describes the decision the game is waiting for.
    #[must_use]
    pub fn is_current(&self, ticket: TurnTicket) -> bool {
        self.game.status() == GameStatus::Running
            && self.game.epoch() == ticket.epoch
            && self.game.current_turn() == ticket.turn
            && self.game.current_player() == Some(ticket.player)
    }

    /// Apply a decision for `ticket` and hand the turn on.
    ///
    /// Stale tickets are dropped without touching the game. A decision the
    /// engine refuses still ends the turn.
    pub fn submit(&mut self, ticket: TurnTicket, decision: Decision) -> Submission {
        if !self.is_current(ticket) {
            debug!(player = %ticket.player, turn = ticket.turn, "discarding stale decision");
            return Submission::Stale;
        }

        let decision = decision.sanitize(ticket.player, &self.config);
        let outcome = self
            .game
            .make_move(ticket.player, &decision.moves, &decision.diplomacy);
        // Rotation advances whether or not the engine accepted the call
        self.game.advance();
        match outcome {
            Ok(report) => Submission::Applied(report),
            Err(err) => {
                warn!(player = %ticket.player, %err, "decision rejected");
                Submission::Rejected(err)
            }
        }
    }

    /// Pause the game, invalidating outstanding tickets.
    ///
    /// # Errors
    ///
    /// Fails unless the game is running.
    pub fn pause(&mut self) -> Result<(), ControlError> {
        self.game.pause()
    }
}

/// Final state of one player in a driven game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerResult {
    /// Player identifier.
    pub id: PlayerId,
    /// Source that played it.
    pub source: String,
    /// Units left at the end.
    pub units: u32,
    /// False claims counted against it.
    pub lies: u32,
    /// Turn the player lost its last unit (None if it survived).
    pub eliminated_turn: Option<u32>,
}

/// Event counts over a driven game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct GameCounters {
    /// All events emitted.
    pub events: usize,
    /// Moves carried out.
    pub moves: usize,
    /// Moves dropped by validation.
    pub rejected_moves: usize,
    /// Battles fought.
    pub battles: usize,
    /// Resource and base bonuses granted.
    pub captures: usize,
    /// Diplomatic messages delivered.
    pub messages: usize,
    /// False claims counted.
    pub lies: usize,
    /// Whole decisions refused by the engine.
    pub rejected_turns: usize,
}

impl GameCounters {
    fn record(&mut self, event: &GameEvent) {
        self.events += 1;
        match event {
            GameEvent::MoveExecuted { .. } => self.moves += 1,
            GameEvent::MoveRejected { .. } => self.rejected_moves += 1,
            GameEvent::BattleResolved { .. } => self.battles += 1,
            GameEvent::CaptureGranted { .. } => self.captures += 1,
            GameEvent::MessageSent { .. } => self.messages += 1,
            GameEvent::LieRecorded { .. } => self.lies += 1,
            _ => {}
        }
    }
}

/// Result of a driven game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameResult {
    /// Seed the sources were built from.
    pub seed: u64,
    /// How the game ended (None if stopped at the turn limit).
    pub outcome: Option<Outcome>,
    /// The winning player, if any.
    pub winner: Option<PlayerId>,
    /// Turn counter when the game stopped.
    pub turns_played: u32,
    /// Whether the game was stopped at the turn limit.
    pub hit_turn_limit: bool,
    /// Per-player results in rotation order.
    pub players: Vec<PlayerResult>,
    /// Elimination order (first eliminated is index 0).
    pub elimination_order: Vec<PlayerId>,
    /// Event counts.
    pub counters: GameCounters,
}

/// Runs one game to completion.
struct GameRunner<'a> {
    driver: Driver,
    sources: &'a mut [Box<dyn DecisionSource + Send>],
    counters: GameCounters,
    eliminated_turn: [Option<u32>; PLAYER_COUNT],
    elimination_order: Vec<PlayerId>,
}

impl GameRunner<'_> {
    fn run(mut self, sink: &mut dyn EventSink) -> (GameResult, GameState) {
        let max_turns = self.driver.config().max_turns;
        let mut hit_turn_limit = false;

        loop {
            let turn = self.driver.game().current_turn();
            self.flush(turn, sink);

            let Some((ticket, view)) = self.driver.request() else {
                break;
            };
            if ticket.turn >= max_turns {
                hit_turn_limit = true;
                break;
            }

            let decision = self.sources[ticket.player.index()].decide(&view);
            if let Submission::Rejected(_) = self.driver.submit(ticket, decision) {
                self.counters.rejected_turns += 1;
            }
            self.flush(ticket.turn, sink);
        }

        let result = self.build_result(hit_turn_limit);
        (result, self.driver.into_game())
    }

    /// Pass pending events to the sink and count them.
    fn flush(&mut self, turn: u32, sink: &mut dyn EventSink) {
        for event in self.driver.game_mut().take_events() {
            self.counters.record(&event);
            if let GameEvent::PlayerEliminated { player } = event {
                self.eliminated_turn[player.index()] = Some(turn);
                self.elimination_order.push(player);
            }
            sink.emit(&event);
        }
    }

    fn build_result(&self, hit_turn_limit: bool) -> GameResult {
        let game = self.driver.game();
        let outcome = match game.status() {
            GameStatus::Finished(outcome) => Some(outcome),
            _ => None,
        };

        let players = game
            .players()
            .iter()
            .map(|player| PlayerResult {
                id: player.id,
                source: self.sources[player.id.index()].name().to_string(),
                units: player.units,
                lies: player.lies,
                eliminated_turn: self.eliminated_turn[player.id.index()],
            })
            .collect();

        GameResult {
            seed: self.driver.config().seed,
            outcome,
            winner: outcome.and_then(Outcome::winner),
            turns_played: game.current_turn(),
            hit_turn_limit,
            players,
            elimination_order: self.elimination_order.clone(),
            counters: self.counters,
        }
    }
}

/// Play a complete game.
///
/// `sources` are indexed by rotation order: blue, yellow, gray, green.
/// Every event is passed to `sink`. The game stops when it finishes or
/// when the turn counter reaches `max_turns`; in the second case the game
/// status is left running and the result has no outcome.
///
/// # Errors
///
/// Returns an error if the config is invalid, the number of sources is not
/// four, or the claim checker cannot be built.
pub fn run_game(
    config: &Config,
    sources: &mut [Box<dyn DecisionSource + Send>],
    sink: &mut dyn EventSink,
) -> Result<GameResult, DriverError> {
    play_game(config, sources, sink).map(|(result, _)| result)
}

/// [`run_game`], also returning the final game state.
///
/// # Errors
///
/// Same as [`run_game`].
pub fn play_game(
    config: &Config,
    sources: &mut [Box<dyn DecisionSource + Send>],
    sink: &mut dyn EventSink,
) -> Result<(GameResult, GameState), DriverError> {
    config.validate()?;
    if sources.len() != PLAYER_COUNT {
        return Err(DriverError::WrongSourceCount(sources.len()));
    }

    let mut game = GameState::new(config.engine);
    if config.driver.fact_check {
        game = game.with_analyzer(Arc::new(ClaimChecker::new()?));
    }
    game.start()?;

    let runner = GameRunner {
        driver: Driver::new(game, config.driver),
        sources,
        counters: GameCounters::default(),
        eliminated_turn: [None; PLAYER_COUNT],
        elimination_order: Vec::new(),
    };
    let (result, game) = runner.run(sink);

    info!(
        seed = result.seed,
        turns = result.turns_played,
        winner = ?result.winner,
        "game finished"
    );
    Ok((result, game))
}

/// Build one source of `kind` per player, each seeded from `seed`.
#[must_use]
pub fn lineup(kinds: &[SourceKind; PLAYER_COUNT], seed: u64) -> Vec<Box<dyn DecisionSource + Send>> {
    kinds
        .iter()
        .zip(0u64..)
        .map(|(kind, offset)| kind.build(seed.wrapping_mul(31).wrapping_add(offset)))
        .collect()
}
