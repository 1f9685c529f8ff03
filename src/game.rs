//! The conquest engine.
//!
//! Implements the rules of the game:
//! - 10×10 board with one stack slot per player per cell
//! - Fog of war recomputed from unit positions
//! - Move validation and subtraction combat
//! - One-time resource and base capture bonuses
//! - Turn rotation, diplomacy ledger and termination

mod capture;
mod combat;
mod diplomacy;
mod events;
mod factcheck;
mod invariants;
mod map;
mod moves;
mod player;
mod state;
mod termination;
mod turn;
mod view;
mod visibility;

pub use capture::{CaptureGrant, CaptureKind, apply_captures};
pub use combat::{
    BattleReport, DefenderResult, MoveResult, enter_cell, process_attack, reinforce,
    resolve_battle,
};
pub use diplomacy::{
    DiplomacyRejection, DiplomaticMessage, DiplomaticRecord, RecordKind, deliver,
    resolve_recipient,
};
pub use events::{EventSink, GameEvent, JsonLinesSink, NullSink, TracingSink};
pub use factcheck::{
    ClaimChecker, ClaimContext, DiplomacyAnalyzer, FactCheck, IMPOSSIBLE_UNIT_CLAIM,
};
pub use invariants::{InvariantViolation, assert_invariants, check_invariants};
pub use map::{BOARD_SIZE, Board, Cell, Coord, RESOURCE_CELLS};
pub use moves::{Move, MoveRejection, ValidMove, check_move, validate_moves};
pub use player::{PLAYER_COUNT, Player, PlayerId, Quadrant};
pub use state::{GameState, SharedAnalyzer, TurnReport};
pub use termination::check_termination;
pub use turn::{GameStatus, Outcome, TurnScheduler};
pub use view::{
    BoardView, PlayerSummary, PlayerView, StackView, VisibleCell, spectator_board,
    visible_board,
};
pub use visibility::update_visibility;
