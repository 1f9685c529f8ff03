//! Engine invariants.
//!
//! These should never trigger in a correctly implemented game. They are
//! checked after every accepted move in debug builds and by the property
//! tests.

use crate::game::{GameState, PlayerId, RESOURCE_CELLS};

/// A broken invariant, described for a human.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invariant violated: {message}")]
pub struct InvariantViolation {
    /// What went wrong, naming the player or cell involved.
    pub message: String,
}

/// Collect every broken invariant. An empty list means the state is sound.
#[must_use]
pub fn check_invariants(state: &GameState) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();
    let mut push = |message: String| violations.push(InvariantViolation { message });

    // Derived unit totals match the board
    for player in state.players() {
        let on_board = state.board().total_units(player.id);
        if player.units != on_board {
            push(format!(
                "{} reports {} units but holds {} on the board",
                player.id, player.units, on_board
            ));
        }
    }

    for (coord, cell) in state.board().iter() {
        // Only resource cells can be depleted
        if cell.is_depleted() && !cell.is_resource() {
            push(format!("non-resource cell {coord} is depleted"));
        }
        // Only home corners can be captured
        if cell.is_base_captured() && PlayerId::home_owner(coord).is_none() {
            push(format!("cell {coord} is not a home corner but is captured"));
        }
        // Battles never leave two players on one cell
        let stacks = cell.stacks().count();
        if stacks > 1 {
            push(format!("{stacks} players share cell {coord}"));
        }
    }

    for coord in RESOURCE_CELLS {
        if !state.board().is_resource_cell(coord) {
            push(format!("resource cell {coord} lost its resource flag"));
        }
    }

    // The player to move is alive unless everyone is dead
    let anyone_alive = state.players().iter().any(|p| p.is_alive());
    match state.current_player() {
        Some(id) if !state.player(id).is_alive() => {
            push(format!("current player {id} has no units"));
        }
        None if anyone_alive => push("no current player while players are alive".to_string()),
        _ => {}
    }

    violations
}

/// Panic if any invariant is broken. Debug builds only.
///
/// # Panics
///
/// Panics listing every violation.
#[cfg(debug_assertions)]
pub fn assert_invariants(state: &GameState) {
    let violations = check_invariants(state);
    if !violations.is_empty() {
        let messages: Vec<_> = violations.iter().map(|v| v.message.as_str()).collect();
        panic!("engine invariants broken:\n  - {}", messages.join("\n  - "));
    }
}

/// No-op in release builds.
#[cfg(not(debug_assertions))]
pub fn assert_invariants(_state: &GameState) {}
