//! Battle resolution.
//!
//! Pure subtraction combat with no randomness and no defender bonus. The
//! entering stack fights each enemy stack on the cell in player order,
//! carrying its reduced strength from one fight to the next.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::game::{Board, Cell, Coord, PlayerId, ValidMove};

/// How one defending stack fared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefenderResult {
    /// Owner of the defending stack.
    pub player: PlayerId,
    /// Units before the fight.
    pub before: u32,
    /// Units left after the fight (0 means the stack was removed).
    pub after: u32,
}

/// Outcome of a stack entering an enemy-held cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleReport {
    /// The entering player.
    pub attacker: PlayerId,
    /// Strength the attacker entered with.
    pub strength: u32,
    /// Defenders that were fought, in the order they were fought.
    pub defenders: Vec<DefenderResult>,
    /// Attacker units placed in the cell afterwards.
    pub survivors: u32,
}

impl BattleReport {
    /// Whether the attacker holds the cell afterwards.
    #[must_use]
    pub const fn attacker_won(&self) -> bool {
        self.survivors > 0
    }
}

/// Resolve a battle on `cell` for `strength` entering units of `attacker`.
///
/// Per defender: a stronger attacker removes the defender and loses the
/// defender's count; a weaker attacker is destroyed and the defender loses
/// the attacker's count; equal strengths destroy both. Any surviving
/// attacker strength is placed in the cell.
pub fn resolve_battle(cell: &mut Cell, attacker: PlayerId, strength: u32) -> BattleReport {
    let enemies: Vec<(PlayerId, u32)> = cell.enemies_of(attacker).collect();
    let mut remaining = strength;
    let mut defenders = Vec::with_capacity(enemies.len());

    for (defender, count) in enemies {
        if remaining == 0 {
            break;
        }
        let after = match remaining.cmp(&count) {
            Ordering::Greater => {
                remaining -= count;
                0
            }
            Ordering::Less => {
                let left = count - remaining;
                remaining = 0;
                left
            }
            Ordering::Equal => {
                remaining = 0;
                0
            }
        };
        cell.set_units(defender, after);
        defenders.push(DefenderResult {
            player: defender,
            before: count,
            after,
        });
    }

    if remaining > 0 {
        cell.add_units(attacker, remaining);
    }

    BattleReport {
        attacker,
        strength,
        defenders,
        survivors: remaining,
    }
}

/// Move `count` units of `player` into `cell`.
///
/// Merges with an allied stack when the cell holds no enemies, otherwise
/// fights. Returns the battle report if there was a fight.
pub fn enter_cell(cell: &mut Cell, player: PlayerId, count: u32) -> Option<BattleReport> {
    if cell.has_enemies(player) {
        Some(resolve_battle(cell, player, count))
    } else {
        cell.add_units(player, count);
        None
    }
}

/// What happened when a validated move was executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveResult {
    /// The battle at the destination, if any.
    pub battle: Option<BattleReport>,
    /// Mover's units at the destination afterwards.
    pub units_at_destination: u32,
}

/// Execute a validated move: take units from the source and enter the
/// destination.
///
/// The caller must have checked the move against this board.
pub fn process_attack(board: &mut Board, player: PlayerId, mv: ValidMove) -> MoveResult {
    let available = board.units_at(mv.from, player);
    let count = mv.count.min(available);
    board.set_units(mv.from, player, available - count);

    let battle = board
        .get_mut(mv.to)
        .and_then(|cell| enter_cell(cell, player, count));

    MoveResult {
        battle,
        units_at_destination: board.units_at(mv.to, player),
    }
}

/// Place `count` bonus units on `player`'s home cell, fighting any enemy
/// stack camped there.
pub fn reinforce(board: &mut Board, player: PlayerId, count: u32) -> Option<BattleReport> {
    let home: Coord = player.home();
    board
        .get_mut(home)
        .and_then(|cell| enter_cell(cell, player, count))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell_with(stacks: &[(PlayerId, u32)]) -> Cell {
        let mut cell = Cell::default();
        for &(player, count) in stacks {
            cell.set_units(player, count);
        }
        cell
    }

    #[test]
    fn test_attacker_wins() {
        let mut cell = cell_with(&[(PlayerId::Yellow, 3)]);
        let report = resolve_battle(&mut cell, PlayerId::Blue, 5);
        assert_eq!(report.survivors, 2);
        assert!(report.attacker_won());
        assert_eq!(cell.units_of(PlayerId::Blue), 2);
        assert_eq!(cell.units_of(PlayerId::Yellow), 0);
    }

    #[test]
    fn test_equal_strength_annihilates_both() {
        let mut cell = cell_with(&[(PlayerId::Yellow, 3)]);
        let report = resolve_battle(&mut cell, PlayerId::Blue, 3);
        assert_eq!(report.survivors, 0);
        assert!(cell.is_empty());
    }

    #[test]
    fn test_defender_wins() {
        let mut cell = cell_with(&[(PlayerId::Green, 10)]);
        let report = resolve_battle(&mut cell, PlayerId::Gray, 4);
        assert!(!report.attacker_won());
        assert_eq!(cell.units_of(PlayerId::Green), 6);
        assert_eq!(cell.units_of(PlayerId::Gray), 0);
        assert_eq!(
            report.defenders,
            vec![DefenderResult {
                player: PlayerId::Green,
                before: 10,
                after: 6
            }]
        );
    }

    #[test]
    fn test_multiple_defenders_in_player_order() {
        // Yellow is fought before Green
        let mut cell = cell_with(&[(PlayerId::Green, 4), (PlayerId::Yellow, 2)]);
        let report = resolve_battle(&mut cell, PlayerId::Blue, 5);
        assert_eq!(report.defenders.len(), 2);
        assert_eq!(report.defenders[0].player, PlayerId::Yellow);
        assert_eq!(report.defenders[0].after, 0);
        assert_eq!(report.defenders[1].player, PlayerId::Green);
        assert_eq!(report.defenders[1].after, 1);
        assert_eq!(cell.units_of(PlayerId::Green), 1);
        assert_eq!(cell.units_of(PlayerId::Blue), 0);
    }

    #[test]
    fn test_resolution_stops_when_attacker_spent() {
        let mut cell = cell_with(&[(PlayerId::Yellow, 5), (PlayerId::Green, 5)]);
        let report = resolve_battle(&mut cell, PlayerId::Blue, 5);
        assert_eq!(report.defenders.len(), 1);
        assert_eq!(cell.units_of(PlayerId::Green), 5);
        assert_eq!(cell.units_of(PlayerId::Yellow), 0);
    }

    #[test]
    fn test_enter_cell_merges_with_ally() {
        let mut cell = cell_with(&[(PlayerId::Blue, 3)]);
        assert!(enter_cell(&mut cell, PlayerId::Blue, 4).is_none());
        assert_eq!(cell.units_of(PlayerId::Blue), 7);
    }

    #[test]
    fn test_process_attack_five_vs_three() {
        let mut board = Board::new();
        let from = Coord::new(3, 3);
        let to = Coord::new(4, 3);
        board.set_units(from, PlayerId::Blue, 8);
        board.set_units(to, PlayerId::Yellow, 3);

        let result = process_attack(
            &mut board,
            PlayerId::Blue,
            ValidMove { from, to, count: 5 },
        );

        assert_eq!(result.units_at_destination, 2);
        assert!(result.battle.is_some());
        assert_eq!(board.units_at(from, PlayerId::Blue), 3);
        assert_eq!(board.units_at(to, PlayerId::Blue), 2);
        assert_eq!(board.units_at(to, PlayerId::Yellow), 0);
    }

    #[test]
    fn test_process_attack_moves_whole_stack() {
        let mut board = Board::new();
        let from = Coord::new(0, 0);
        let to = Coord::new(0, 1);
        board.set_units(from, PlayerId::Blue, 10);

        let result = process_attack(
            &mut board,
            PlayerId::Blue,
            ValidMove {
                from,
                to,
                count: 10,
            },
        );

        assert!(result.battle.is_none());
        assert!(board.get(from).unwrap().is_empty());
        assert_eq!(board.units_at(to, PlayerId::Blue), 10);
    }

    #[test]
    fn test_reinforce_fights_occupier() {
        let mut board = Board::new();
        board.set_units(PlayerId::Blue.home(), PlayerId::Green, 4);

        let report = reinforce(&mut board, PlayerId::Blue, 10).unwrap();
        assert_eq!(report.survivors, 6);
        assert_eq!(board.units_at(PlayerId::Blue.home(), PlayerId::Blue), 6);
        assert_eq!(board.units_at(PlayerId::Blue.home(), PlayerId::Green), 0);
    }
}
