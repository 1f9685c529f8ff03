//! Move validation.
//!
//! Invalid moves are filtered, never fatal. A batch with no valid moves is
//! a legal pass.

use serde::{Deserialize, Serialize};

use crate::game::{Board, Coord, PlayerId};

/// A proposed move, as supplied by a decision source.
///
/// Coordinates are signed so that out-of-range input can be represented and
/// rejected instead of failing to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Move {
    /// Source column.
    pub from_x: i32,
    /// Source row.
    pub from_y: i32,
    /// Destination column.
    pub to_x: i32,
    /// Destination row.
    pub to_y: i32,
    /// Number of units to move.
    pub unit_count: u32,
}

impl Move {
    /// Create a move between two board coordinates.
    #[must_use]
    pub fn new(from: Coord, to: Coord, unit_count: u32) -> Self {
        Self {
            from_x: i32::from(from.x),
            from_y: i32::from(from.y),
            to_x: i32::from(to.x),
            to_y: i32::from(to.y),
            unit_count,
        }
    }
}

/// A move that passed validation against a specific board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidMove {
    /// Source cell.
    pub from: Coord,
    /// Destination cell, one orthogonal step from `from`.
    pub to: Coord,
    /// Units leaving the source.
    pub count: u32,
}

/// Why a single move was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum MoveRejection {
    /// A coordinate is outside the board.
    #[error("coordinates out of bounds")]
    OutOfBounds,
    /// Source and destination are not one orthogonal step apart.
    #[error("not adjacent (distance {distance})")]
    NotAdjacent {
        /// Manhattan distance between the cells.
        distance: u32,
    },
    /// A move of zero units.
    #[error("unit count must be positive")]
    ZeroUnits,
    /// The player has no stack at the source.
    #[error("no units at source")]
    NoUnits,
    /// The stack at the source is too small.
    #[error("insufficient units (have {available}, requested {requested})")]
    InsufficientUnits {
        /// Units present at the source.
        available: u32,
        /// Units requested by the move.
        requested: u32,
    },
}

/// Check a single move for `player` against the current board.
///
/// # Errors
///
/// Returns the first rule the move breaks.
pub fn check_move(board: &Board, player: PlayerId, mv: &Move) -> Result<ValidMove, MoveRejection> {
    let from = Coord::from_signed(mv.from_x, mv.from_y).ok_or(MoveRejection::OutOfBounds)?;
    let to = Coord::from_signed(mv.to_x, mv.to_y).ok_or(MoveRejection::OutOfBounds)?;

    let distance = from.manhattan(to);
    if distance != 1 {
        return Err(MoveRejection::NotAdjacent { distance });
    }
    if mv.unit_count == 0 {
        return Err(MoveRejection::ZeroUnits);
    }

    let available = board.units_at(from, player);
    if available == 0 {
        return Err(MoveRejection::NoUnits);
    }
    if available < mv.unit_count {
        return Err(MoveRejection::InsufficientUnits {
            available,
            requested: mv.unit_count,
        });
    }

    Ok(ValidMove {
        from,
        to,
        count: mv.unit_count,
    })
}

/// Filter a batch down to the moves that are valid on `board` as it stands.
///
/// Every move is checked against the same board. During execution each move
/// is re-checked against the board left by the moves before it, so a batch
/// that drains one source twice loses the later move there.
#[must_use]
pub fn validate_moves(board: &Board, player: PlayerId, moves: &[Move]) -> Vec<ValidMove> {
    moves
        .iter()
        .filter_map(|mv| check_move(board, player, mv).ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_with_blue() -> Board {
        let mut board = Board::new();
        board.set_units(Coord::new(0, 0), PlayerId::Blue, 10);
        board
    }

    #[test]
    fn test_valid_move() {
        let board = board_with_blue();
        let mv = Move::new(Coord::new(0, 0), Coord::new(1, 0), 4);
        let valid = check_move(&board, PlayerId::Blue, &mv).unwrap();
        assert_eq!(valid.from, Coord::new(0, 0));
        assert_eq!(valid.to, Coord::new(1, 0));
        assert_eq!(valid.count, 4);
    }

    #[test]
    fn test_diagonal_rejected() {
        let board = board_with_blue();
        let mv = Move::new(Coord::new(0, 0), Coord::new(1, 1), 1);
        assert_eq!(
            check_move(&board, PlayerId::Blue, &mv),
            Err(MoveRejection::NotAdjacent { distance: 2 })
        );
    }

    #[test]
    fn test_stay_in_place_rejected() {
        let board = board_with_blue();
        let mv = Move::new(Coord::new(0, 0), Coord::new(0, 0), 1);
        assert_eq!(
            check_move(&board, PlayerId::Blue, &mv),
            Err(MoveRejection::NotAdjacent { distance: 0 })
        );
    }

    #[test]
    fn test_out_of_bounds_rejected() {
        let board = board_with_blue();
        let mv = Move {
            from_x: 0,
            from_y: 0,
            to_x: -1,
            to_y: 0,
            unit_count: 1,
        };
        assert_eq!(
            check_move(&board, PlayerId::Blue, &mv),
            Err(MoveRejection::OutOfBounds)
        );
    }

    #[test]
    fn test_ownership_and_sufficiency() {
        let board = board_with_blue();
        let mv = Move::new(Coord::new(0, 0), Coord::new(0, 1), 3);
        assert_eq!(
            check_move(&board, PlayerId::Green, &mv),
            Err(MoveRejection::NoUnits)
        );

        let mv = Move::new(Coord::new(0, 0), Coord::new(0, 1), 11);
        assert_eq!(
            check_move(&board, PlayerId::Blue, &mv),
            Err(MoveRejection::InsufficientUnits {
                available: 10,
                requested: 11
            })
        );

        let mv = Move::new(Coord::new(0, 0), Coord::new(0, 1), 0);
        assert_eq!(
            check_move(&board, PlayerId::Blue, &mv),
            Err(MoveRejection::ZeroUnits)
        );
    }

    #[test]
    fn test_validate_filters_without_aborting() {
        let board = board_with_blue();
        let moves = [
            Move::new(Coord::new(0, 0), Coord::new(2, 0), 1),
            Move::new(Coord::new(0, 0), Coord::new(1, 0), 2),
            Move::new(Coord::new(5, 5), Coord::new(5, 6), 1),
            Move::new(Coord::new(0, 0), Coord::new(0, 1), 3),
        ];
        let valid = validate_moves(&board, PlayerId::Blue, &moves);
        assert_eq!(valid.len(), 2);
        assert_eq!(valid[0].to, Coord::new(1, 0));
        assert_eq!(valid[1].to, Coord::new(0, 1));
    }

    #[test]
    fn test_move_parses_camel_case() {
        let json = r#"{"fromX":0,"fromY":0,"toX":1,"toY":0,"unitCount":5}"#;
        let mv: Move = serde_json::from_str(json).unwrap();
        assert_eq!(mv, Move::new(Coord::new(0, 0), Coord::new(1, 0), 5));
    }
}
