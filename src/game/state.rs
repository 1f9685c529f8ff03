//! Game state management.
//!
//! [`GameState`] is the authoritative engine: it owns the board, the players
//! and the rotation, and is the only thing that mutates them.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::config::EngineConfig;
use crate::error::{ControlError, TurnRejected};
use crate::game::{
    BoardView, ClaimContext, DiplomaticMessage, DiplomacyAnalyzer, EventSink, FactCheck,
    GameEvent, GameStatus, Move, Outcome, PLAYER_COUNT, Player, PlayerId, PlayerSummary,
    PlayerView, TurnScheduler, apply_captures, check_move, check_termination, diplomacy,
    invariants, process_attack, spectator_board, update_visibility, visible_board, Board,
};

/// Shared, thread-safe claim analyzer.
pub type SharedAnalyzer = Arc<dyn DiplomacyAnalyzer + Send + Sync>;

/// Summary of one accepted `make_move` call.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TurnReport {
    /// Moves carried out.
    pub moves_executed: usize,
    /// Moves dropped.
    pub moves_rejected: usize,
    /// Battles fought.
    pub battles: usize,
    /// Bonuses granted.
    pub captures: usize,
    /// Messages recorded.
    pub messages_sent: usize,
    /// Messages dropped.
    pub messages_rejected: usize,
    /// Players eliminated during the call.
    pub eliminated: Vec<PlayerId>,
    /// Set when the call ended the game.
    pub outcome: Option<Outcome>,
}

/// Complete game state.
#[derive(Clone)]
pub struct GameState {
    /// Rules this game was created with.
    config: EngineConfig,
    /// The board.
    pub(crate) board: Board,
    /// All four players in rotation order. Never shrinks.
    pub(crate) players: Vec<Player>,
    /// Status and rotation.
    scheduler: TurnScheduler,
    /// Bumped whenever outstanding decisions must be discarded.
    epoch: u64,
    /// Events not yet drained.
    events: Vec<GameEvent>,
    /// Optional claim analysis for diplomacy.
    analyzer: Option<SharedAnalyzer>,
}

impl std::fmt::Debug for GameState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameState")
            .field("config", &self.config)
            .field("status", &self.scheduler.status())
            .field("turn", &self.scheduler.turn())
            .field("epoch", &self.epoch)
            .field("players", &self.players)
            .field("pending_events", &self.events.len())
            .field("analyzer", &self.analyzer.is_some())
            .finish_non_exhaustive()
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl GameState {
    /// Create a game in the waiting state with every player on its home
    /// corner.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        let (board, players) = Self::initial_setup(&config);
        Self {
            config,
            board,
            players,
            scheduler: TurnScheduler::new(),
            epoch: 0,
            events: Vec::new(),
            analyzer: None,
        }
    }

    /// Create a waiting game from a prepared position.
    ///
    /// Unit totals are derived from the board and visibility is recomputed,
    /// so the board only needs its unit placements and flags. A later
    /// [`reset`](Self::reset) returns to the standard opening.
    #[must_use]
    pub fn from_board(config: EngineConfig, mut board: Board) -> Self {
        update_visibility(&mut board);
        let players = PlayerId::ALL
            .iter()
            .map(|&id| Player::new(id, board.total_units(id)))
            .collect();
        Self {
            config,
            board,
            players,
            scheduler: TurnScheduler::new(),
            epoch: 0,
            events: Vec::new(),
            analyzer: None,
        }
    }

    fn initial_setup(config: &EngineConfig) -> (Board, Vec<Player>) {
        let mut board = Board::new();
        let players = PlayerId::ALL
            .iter()
            .map(|&id| {
                board.set_units(id.home(), id, config.starting_units);
                Player::new(id, config.starting_units)
            })
            .collect();
        update_visibility(&mut board);
        (board, players)
    }

    /// Attach a claim analyzer for diplomatic messages.
    #[must_use]
    pub fn with_analyzer(mut self, analyzer: SharedAnalyzer) -> Self {
        self.analyzer = Some(analyzer);
        self
    }

    /// Rules this game was created with.
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The authoritative board.
    #[must_use]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// All players in rotation order.
    #[must_use]
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Get a player by ID.
    #[must_use]
    pub fn player(&self, id: PlayerId) -> &Player {
        &self.players[id.index()]
    }

    /// Current status.
    #[must_use]
    pub const fn status(&self) -> GameStatus {
        self.scheduler.status()
    }

    /// Current turn counter.
    #[must_use]
    pub const fn current_turn(&self) -> u32 {
        self.scheduler.turn()
    }

    /// Request generation. Changes on pause and reset.
    #[must_use]
    pub const fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Which players have units left, in rotation order.
    #[must_use]
    pub fn alive(&self) -> [bool; PLAYER_COUNT] {
        let mut alive = [false; PLAYER_COUNT];
        for player in &self.players {
            alive[player.id.index()] = player.is_alive();
        }
        alive
    }

    /// The living player to move. `None` only when nobody is alive.
    #[must_use]
    pub fn current_player(&self) -> Option<PlayerId> {
        self.scheduler.current(self.alive())
    }

    /// waiting → running.
    ///
    /// # Errors
    ///
    /// Fails unless the game is waiting.
    pub fn start(&mut self) -> Result<(), ControlError> {
        self.scheduler.start()?;
        self.events.push(GameEvent::GameStarted);
        Ok(())
    }

    /// running → paused. Outstanding decisions become stale.
    ///
    /// # Errors
    ///
    /// Fails unless the game is running.
    pub fn pause(&mut self) -> Result<(), ControlError> {
        self.scheduler.pause()?;
        self.epoch += 1;
        self.events.push(GameEvent::GamePaused);
        Ok(())
    }

    /// paused → running.
    ///
    /// # Errors
    ///
    /// Fails unless the game is paused.
    pub fn resume(&mut self) -> Result<(), ControlError> {
        self.scheduler.resume()?;
        self.events.push(GameEvent::GameResumed);
        Ok(())
    }

    /// Restore the initial board, players and rotation. The configuration
    /// and analyzer are kept. Outstanding decisions become stale.
    pub fn reset(&mut self) {
        let (board, players) = Self::initial_setup(&self.config);
        self.board = board;
        self.players = players;
        self.scheduler = TurnScheduler::new();
        self.epoch += 1;
        self.events.clear();
        self.events.push(GameEvent::GameReset);
    }

    /// Apply one player's decision.
    ///
    /// Moves are checked one at a time against the board left by the moves
    /// before them; invalid ones are dropped. Diplomacy to unknown players
    /// or to the sender is dropped. A decision with nothing valid is a pass.
    /// The rotation is not advanced; call [`advance`](Self::advance).
    ///
    /// # Errors
    ///
    /// Rejects the whole call, leaving state unchanged, if the game is not
    /// running or `player` is not the player to move.
    pub fn make_move(
        &mut self,
        player: PlayerId,
        moves: &[Move],
        messages: &[DiplomaticMessage],
    ) -> Result<TurnReport, TurnRejected> {
        let status = self.status();
        if status != GameStatus::Running {
            return Err(TurnRejected::NotRunning(status));
        }
        let expected = self.current_player().ok_or(TurnRejected::NoLivingPlayer)?;
        if expected != player {
            return Err(TurnRejected::WrongPlayer {
                expected,
                got: player,
            });
        }
        self.scheduler.settle(self.alive());

        let alive_before = self.alive();
        let mut report = TurnReport::default();

        for mv in moves {
            self.execute_move(player, mv, &mut report);
        }
        for message in messages {
            self.send_message(player, message, &mut report);
        }

        for id in PlayerId::ALL {
            if alive_before[id.index()] && !self.players[id.index()].is_alive() {
                report.eliminated.push(id);
                self.events.push(GameEvent::PlayerEliminated { player: id });
            }
        }

        report.outcome = self.check_end();
        invariants::assert_invariants(self);
        Ok(report)
    }

    fn execute_move(&mut self, player: PlayerId, mv: &Move, report: &mut TurnReport) {
        let valid = match check_move(&self.board, player, mv) {
            Ok(valid) => valid,
            Err(reason) => {
                debug!(%player, %reason, "dropping move");
                report.moves_rejected += 1;
                self.events.push(GameEvent::MoveRejected {
                    player,
                    mv: *mv,
                    reason,
                });
                return;
            }
        };

        let result = process_attack(&mut self.board, player, valid);
        report.moves_executed += 1;
        self.events.push(GameEvent::MoveExecuted {
            player,
            from: valid.from,
            to: valid.to,
            count: valid.count,
            units_at_destination: result.units_at_destination,
        });
        if let Some(battle) = result.battle {
            report.battles += 1;
            self.events.push(GameEvent::BattleResolved {
                at: valid.to,
                report: battle,
            });
        }

        let grants = apply_captures(
            &mut self.board,
            player,
            valid.to,
            result.units_at_destination,
            &self.config,
        );
        report.captures += grants.len();
        self.events
            .extend(grants.into_iter().map(|grant| GameEvent::CaptureGranted { grant }));

        self.sync_units();
        update_visibility(&mut self.board);
    }

    fn send_message(&mut self, from: PlayerId, message: &DiplomaticMessage, report: &mut TurnReport) {
        let to = match diplomacy::resolve_recipient(from, message) {
            Ok(to) => to,
            Err(reason) => {
                debug!(%from, %reason, "dropping message");
                report.messages_rejected += 1;
                self.events.push(GameEvent::MessageRejected { from, reason });
                return;
            }
        };

        let check = self.analyzer.as_ref().map_or_else(FactCheck::default, |analyzer| {
            let ctx = ClaimContext {
                sender: &self.players[from.index()],
                receiver: &self.players[to.index()],
                board: &self.board,
            };
            analyzer.analyze(&message.content, &ctx)
        });

        let turn = self.current_turn();
        if check.is_lie() {
            let config = self.config;
            let sender = &mut self.players[from.index()];
            if sender.can_lie(turn, config.max_lies, config.lie_cooldown) {
                sender.record_lie(turn);
                let lies = sender.lies;
                self.events.push(GameEvent::LieRecorded { player: from, lies });
            }
        }

        let record = diplomacy::deliver(&mut self.players, turn, from, to, message, check, Utc::now());
        report.messages_sent += 1;
        self.events.push(GameEvent::MessageSent {
            from,
            to,
            content: record.content,
            actually_lied: record.actually_lied,
        });
    }

    fn sync_units(&mut self) {
        for player in &mut self.players {
            player.units = self.board.total_units(player.id);
        }
    }

    fn check_end(&mut self) -> Option<Outcome> {
        if self.status().is_finished() {
            return None;
        }
        let outcome = check_termination(&self.players)?;
        self.scheduler.finish(outcome);
        self.events.push(GameEvent::GameEnded { outcome });
        Some(outcome)
    }

    /// Hand the turn to the next living player.
    ///
    /// Termination is evaluated first, so when only one player is alive the
    /// game finishes with that player as winner. When nobody is alive the
    /// game finishes as a draw. Does nothing unless the game is running.
    pub fn advance(&mut self) -> Option<PlayerId> {
        if self.status() != GameStatus::Running || self.check_end().is_some() {
            return None;
        }
        let next = self.scheduler.advance(self.alive());
        match next {
            Some(player) => {
                trace!(%player, turn = self.current_turn(), "advanced");
                self.events.push(GameEvent::TurnAdvanced {
                    turn: self.current_turn(),
                    player,
                });
            }
            None => {
                if let GameStatus::Finished(outcome) = self.status() {
                    self.events.push(GameEvent::GameEnded { outcome });
                }
            }
        }
        next
    }

    /// Take the pending events.
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Feed pending events to `sink`, oldest first.
    pub fn drain_events(&mut self, sink: &mut dyn EventSink) {
        for event in self.events.drain(..) {
            sink.emit(&event);
        }
    }

    /// The board as `player` sees it.
    #[must_use]
    pub fn visible_board(&self, player: PlayerId) -> BoardView {
        visible_board(&self.board, player)
    }

    /// The full board with nothing hidden.
    #[must_use]
    pub fn spectator_board(&self) -> BoardView {
        spectator_board(&self.board)
    }

    /// Public summary of every player.
    #[must_use]
    pub fn players_summary(&self) -> Vec<PlayerSummary> {
        self.players.iter().map(PlayerSummary::from).collect()
    }

    /// Everything `player` may know when choosing a move.
    #[must_use]
    pub fn player_view(&self, player: PlayerId) -> PlayerView {
        let me = self.player(player);
        let turn = self.current_turn();
        PlayerView {
            player_id: player,
            player_name: me.name.clone(),
            current_turn: turn,
            my_units: me.units,
            my_lies: me.lies,
            can_lie: me.can_lie(turn, self.config.max_lies, self.config.lie_cooldown),
            board: self.visible_board(player),
            diplomacy_history: me.diplomacy_history.clone(),
            players: self.players_summary(),
        }
    }
}
