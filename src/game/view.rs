//! Read-only snapshots for renderers and decision sources.

use serde::{Deserialize, Serialize};

use crate::game::{Board, BOARD_SIZE, Cell, Coord, DiplomaticRecord, Player, PlayerId};

/// One player's stack as seen in a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackView {
    /// Owner.
    pub player: PlayerId,
    /// Units in the stack.
    pub count: u32,
}

/// A cell as seen by one observer.
///
/// Fogged cells carry no unit information. Resource cells are always
/// visible and always report their depletion state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibleCell {
    /// Column.
    pub x: u16,
    /// Row.
    pub y: u16,
    /// Whether the observer can see this cell.
    pub visible: bool,
    /// Stacks on the cell in player order (empty when fogged).
    pub units: Vec<StackView>,
    /// Whether this is a resource cell.
    pub resource: bool,
    /// Whether the resource was claimed (false for ordinary cells).
    pub depleted: bool,
}

impl VisibleCell {
    fn observe(coord: Coord, cell: &Cell, visible: bool) -> Self {
        let units = if visible {
            cell.stacks()
                .map(|(player, count)| StackView { player, count })
                .collect()
        } else {
            Vec::new()
        };
        Self {
            x: coord.x,
            y: coord.y,
            visible,
            units,
            resource: cell.is_resource(),
            depleted: cell.is_depleted(),
        }
    }
}

/// Rows of cells, indexed `[y][x]`.
pub type BoardView = Vec<Vec<VisibleCell>>;

fn build_view(board: &Board, mut can_see: impl FnMut(&Cell) -> bool) -> BoardView {
    let mut rows: BoardView = (0..BOARD_SIZE)
        .map(|_| Vec::with_capacity(usize::from(BOARD_SIZE)))
        .collect();
    for (coord, cell) in board.iter() {
        let visible = can_see(cell);
        rows[usize::from(coord.y)].push(VisibleCell::observe(coord, cell, visible));
    }
    rows
}

/// The board as `player` sees it.
#[must_use]
pub fn visible_board(board: &Board, player: PlayerId) -> BoardView {
    build_view(board, |cell| cell.is_visible_to(player) || cell.is_resource())
}

/// The whole board with nothing hidden.
#[must_use]
pub fn spectator_board(board: &Board) -> BoardView {
    build_view(board, |_| true)
}

/// Public per-player summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSummary {
    /// Player id.
    pub id: PlayerId,
    /// Display name.
    pub name: String,
    /// Units on the board.
    pub units: u32,
    /// Whether the player still has units.
    pub is_alive: bool,
}

impl From<&Player> for PlayerSummary {
    fn from(player: &Player) -> Self {
        Self {
            id: player.id,
            name: player.name.clone(),
            units: player.units,
            is_alive: player.is_alive(),
        }
    }
}

/// Everything a decision source may know when choosing a move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerView {
    /// The player to move.
    pub player_id: PlayerId,
    /// Its display name.
    pub player_name: String,
    /// Current turn counter.
    pub current_turn: u32,
    /// Its total units.
    pub my_units: u32,
    /// False claims counted against it.
    pub my_lies: u32,
    /// Whether another false claim would be counted now.
    pub can_lie: bool,
    /// Its fogged view of the board.
    pub board: BoardView,
    /// Its full diplomacy history.
    pub diplomacy_history: Vec<DiplomaticRecord>,
    /// Public summary of every player.
    pub players: Vec<PlayerSummary>,
}

impl PlayerView {
    /// Cell at `coord` in this view.
    #[must_use]
    pub fn cell(&self, coord: Coord) -> Option<&VisibleCell> {
        self.board
            .get(usize::from(coord.y))
            .and_then(|row| row.get(usize::from(coord.x)))
    }

    /// The viewer's own stacks.
    pub fn own_stacks(&self) -> impl Iterator<Item = (Coord, u32)> + '_ {
        let me = self.player_id;
        self.board.iter().flatten().filter_map(move |cell| {
            cell.units
                .iter()
                .find(|s| s.player == me)
                .map(|s| (Coord::new(cell.x, cell.y), s.count))
        })
    }
}
