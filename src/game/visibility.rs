//! Fog of war.
//!
//! Visibility is recomputed from scratch after every executed move and after
//! capture bonuses land. Nothing is remembered between passes, so a cell
//! falls back into fog as soon as no friendly stack is on or next to it.

use crate::game::{Board, PlayerId, RESOURCE_CELLS};

/// Recompute every player's visibility from the current occupancy.
///
/// Resource cells are visible to everyone regardless of occupancy or
/// depletion. Each stack reveals its own cell and the four orthogonal
/// neighbours to its owner.
pub fn update_visibility(board: &mut Board) {
    for cell in board.cells_mut() {
        cell.clear_visibility();
    }

    for coord in RESOURCE_CELLS {
        if let Some(cell) = board.get_mut(coord) {
            for player in PlayerId::ALL {
                cell.set_visible(player);
            }
        }
    }

    // Collect first: the board cannot be borrowed mutably while iterating.
    let occupied: Vec<_> = board
        .iter()
        .flat_map(|(coord, cell)| cell.stacks().map(move |(player, _)| (coord, player)))
        .collect();

    for (coord, player) in occupied {
        if let Some(cell) = board.get_mut(coord) {
            cell.set_visible(player);
        }
        for neighbor in coord.neighbors() {
            if let Some(cell) = board.get_mut(neighbor) {
                cell.set_visible(player);
            }
        }
    }
}
