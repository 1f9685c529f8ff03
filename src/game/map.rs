//! Board and cell types.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::game::{PLAYER_COUNT, PlayerId};

/// Width and height of the board in cells.
pub const BOARD_SIZE: u16 = 10;

/// The four central resource cells. Fixed for the whole game.
pub const RESOURCE_CELLS: [Coord; 4] = [
    Coord::new(4, 4),
    Coord::new(5, 4),
    Coord::new(4, 5),
    Coord::new(5, 5),
];

/// A coordinate on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    /// X coordinate (column).
    pub x: u16,
    /// Y coordinate (row).
    pub y: u16,
}

impl Coord {
    /// Create a new coordinate.
    #[must_use]
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }

    /// Convert signed coordinates, as supplied by a decision source, into a
    /// board coordinate. Returns `None` if either axis is off the board.
    #[must_use]
    pub fn from_signed(x: i32, y: i32) -> Option<Self> {
        let x = u16::try_from(x).ok()?;
        let y = u16::try_from(y).ok()?;
        let coord = Self::new(x, y);
        Board::in_bounds(coord).then_some(coord)
    }

    /// Manhattan distance between two coordinates.
    #[must_use]
    pub fn manhattan(self, other: Coord) -> u32 {
        u32::from(self.x.abs_diff(other.x)) + u32::from(self.y.abs_diff(other.y))
    }

    /// Get adjacent coordinates (up, down, left, right).
    ///
    /// Returns a fixed-size array and count to avoid heap allocation.
    /// The array contains valid coordinates in indices 0..count.
    #[must_use]
    #[inline]
    pub fn adjacent(&self, width: u16, height: u16) -> ([Coord; 4], u8) {
        let mut result = [Coord::new(0, 0); 4];
        let mut count = 0u8;

        if self.y > 0 {
            result[count as usize] = Coord::new(self.x, self.y - 1); // up
            count += 1;
        }
        if self.y + 1 < height {
            result[count as usize] = Coord::new(self.x, self.y + 1); // down
            count += 1;
        }
        if self.x > 0 {
            result[count as usize] = Coord::new(self.x - 1, self.y); // left
            count += 1;
        }
        if self.x + 1 < width {
            result[count as usize] = Coord::new(self.x + 1, self.y); // right
            count += 1;
        }

        (result, count)
    }

    /// Adjacent coordinates on the game board.
    pub fn neighbors(self) -> impl Iterator<Item = Coord> {
        let (adj, count) = self.adjacent(BOARD_SIZE, BOARD_SIZE);
        adj.into_iter().take(usize::from(count))
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

/// A single cell of the board.
///
/// Occupancy is one slot per player, so a player can never hold two stacks
/// on the same cell. A zero slot means the player has no stack here.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cell {
    units: [u32; PLAYER_COUNT],
    visible: [bool; PLAYER_COUNT],
    resource: bool,
    depleted: bool,
    base_captured: bool,
}

impl Cell {
    /// Create an empty resource cell.
    #[must_use]
    const fn resource() -> Self {
        Self {
            units: [0; PLAYER_COUNT],
            visible: [false; PLAYER_COUNT],
            resource: true,
            depleted: false,
            base_captured: false,
        }
    }

    /// Units `player` holds on this cell (0 if none).
    #[must_use]
    #[inline]
    pub const fn units_of(&self, player: PlayerId) -> u32 {
        self.units[player.index()]
    }

    /// Set the stack size for `player`. A count of 0 removes the stack.
    #[inline]
    pub fn set_units(&mut self, player: PlayerId, count: u32) {
        self.units[player.index()] = count;
    }

    /// Add units to `player`'s stack, creating it if needed.
    #[inline]
    pub fn add_units(&mut self, player: PlayerId, count: u32) {
        let slot = &mut self.units[player.index()];
        *slot = slot.saturating_add(count);
    }

    /// Iterate over the stacks on this cell in player order.
    pub fn stacks(&self) -> impl Iterator<Item = (PlayerId, u32)> + '_ {
        PlayerId::ALL
            .into_iter()
            .map(|p| (p, self.units[p.index()]))
            .filter(|&(_, count)| count > 0)
    }

    /// Stacks belonging to anyone other than `player`.
    pub fn enemies_of(&self, player: PlayerId) -> impl Iterator<Item = (PlayerId, u32)> + '_ {
        self.stacks().filter(move |&(p, _)| p != player)
    }

    /// Whether another player has units here.
    #[must_use]
    pub fn has_enemies(&self, player: PlayerId) -> bool {
        self.enemies_of(player).next().is_some()
    }

    /// Whether no player has units here.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.units.iter().all(|&count| count == 0)
    }

    /// Whether `player` can currently see this cell.
    #[must_use]
    #[inline]
    pub const fn is_visible_to(&self, player: PlayerId) -> bool {
        self.visible[player.index()]
    }

    pub(crate) fn set_visible(&mut self, player: PlayerId) {
        self.visible[player.index()] = true;
    }

    pub(crate) fn clear_visibility(&mut self) {
        self.visible = [false; PLAYER_COUNT];
    }

    /// Whether this is one of the central resource cells.
    #[must_use]
    pub const fn is_resource(&self) -> bool {
        self.resource
    }

    /// Whether the resource bonus has already been claimed.
    #[must_use]
    pub const fn is_depleted(&self) -> bool {
        self.depleted
    }

    /// Whether this home corner has already yielded its capture bonus.
    #[must_use]
    pub const fn is_base_captured(&self) -> bool {
        self.base_captured
    }
}

/// The game board: a fixed 10×10 grid.
///
/// Primitive storage only. The board trusts its caller; move legality is
/// checked in [`moves`](crate::game::check_move).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    /// Cells stored in row-major order.
    cells: Vec<Cell>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Create an empty board with the resource cells in place.
    #[must_use]
    pub fn new() -> Self {
        let size = usize::from(BOARD_SIZE) * usize::from(BOARD_SIZE);
        let mut board = Self {
            cells: vec![Cell::default(); size],
        };
        for coord in RESOURCE_CELLS {
            let idx = Self::index(coord);
            board.cells[idx] = Cell::resource();
        }
        board
    }

    /// Get the width of the board.
    #[must_use]
    pub const fn width(&self) -> u16 {
        BOARD_SIZE
    }

    /// Get the height of the board.
    #[must_use]
    pub const fn height(&self) -> u16 {
        BOARD_SIZE
    }

    /// Check if a coordinate is on the board.
    #[must_use]
    pub const fn in_bounds(coord: Coord) -> bool {
        coord.x < BOARD_SIZE && coord.y < BOARD_SIZE
    }

    const fn index(coord: Coord) -> usize {
        coord.y as usize * BOARD_SIZE as usize + coord.x as usize
    }

    /// Get a reference to the cell at the given coordinate.
    #[must_use]
    pub fn get(&self, coord: Coord) -> Option<&Cell> {
        Self::in_bounds(coord).then(|| &self.cells[Self::index(coord)])
    }

    /// Get a mutable reference to the cell at the given coordinate.
    #[must_use]
    pub fn get_mut(&mut self, coord: Coord) -> Option<&mut Cell> {
        if Self::in_bounds(coord) {
            Some(&mut self.cells[Self::index(coord)])
        } else {
            None
        }
    }

    /// Units `player` holds at `coord` (0 if none or off the board).
    #[must_use]
    pub fn units_at(&self, coord: Coord, player: PlayerId) -> u32 {
        self.get(coord).map_or(0, |cell| cell.units_of(player))
    }

    /// Set `player`'s stack at `coord`. A count of 0 removes the stack.
    pub fn set_units(&mut self, coord: Coord, player: PlayerId, count: u32) {
        if let Some(cell) = self.get_mut(coord) {
            cell.set_units(player, count);
        }
    }

    /// Whether `coord` is one of the central resource cells.
    #[must_use]
    pub fn is_resource_cell(&self, coord: Coord) -> bool {
        self.get(coord).is_some_and(Cell::is_resource)
    }

    /// Mark the resource at `coord` as claimed. Never reverts.
    pub fn mark_depleted(&mut self, coord: Coord) {
        if let Some(cell) = self.get_mut(coord).filter(|cell| cell.resource) {
            cell.depleted = true;
        }
    }

    /// Mark the home corner at `coord` as captured. Never reverts.
    pub fn mark_base_captured(&mut self, coord: Coord) {
        if let Some(cell) = self.get_mut(coord) {
            cell.base_captured = true;
        }
    }

    /// Get a mutable reference to the raw cells slice.
    pub(crate) fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    /// Iterate over all coordinates and cells.
    pub fn iter(&self) -> impl Iterator<Item = (Coord, &Cell)> {
        self.cells.iter().enumerate().map(|(idx, cell)| {
            #[allow(clippy::cast_possible_truncation)]
            let x = (idx % usize::from(BOARD_SIZE)) as u16;
            #[allow(clippy::cast_possible_truncation)]
            let y = (idx / usize::from(BOARD_SIZE)) as u16;
            (Coord::new(x, y), cell)
        })
    }

    /// Cells where `player` has a stack, with the stack size.
    pub fn stacks_of(&self, player: PlayerId) -> impl Iterator<Item = (Coord, u32)> + '_ {
        self.iter()
            .map(move |(coord, cell)| (coord, cell.units_of(player)))
            .filter(|&(_, count)| count > 0)
    }

    /// Sum of `player`'s units over the whole board.
    #[must_use]
    pub fn total_units(&self, player: PlayerId) -> u32 {
        self.cells
            .iter()
            .map(|cell| cell.units_of(player))
            .fold(0u32, u32::saturating_add)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coord_adjacent() {
        let coord = Coord::new(5, 5);
        let (adj, count) = coord.adjacent(10, 10);
        let adj_slice = &adj[..count as usize];
        assert_eq!(count, 4);
        assert!(adj_slice.contains(&Coord::new(5, 4))); // up
        assert!(adj_slice.contains(&Coord::new(5, 6))); // down
        assert!(adj_slice.contains(&Coord::new(4, 5))); // left
        assert!(adj_slice.contains(&Coord::new(6, 5))); // right
    }

    #[test]
    fn test_coord_adjacent_corner() {
        let coord = Coord::new(9, 9);
        let neighbors: Vec<_> = coord.neighbors().collect();
        assert_eq!(neighbors.len(), 2);
        assert!(neighbors.contains(&Coord::new(9, 8)));
        assert!(neighbors.contains(&Coord::new(8, 9)));
    }

    #[test]
    fn test_coord_from_signed() {
        assert_eq!(Coord::from_signed(3, 7), Some(Coord::new(3, 7)));
        assert_eq!(Coord::from_signed(-1, 0), None);
        assert_eq!(Coord::from_signed(0, 10), None);
        assert_eq!(Coord::from_signed(10, 0), None);
    }

    #[test]
    fn test_manhattan() {
        assert_eq!(Coord::new(0, 0).manhattan(Coord::new(1, 0)), 1);
        assert_eq!(Coord::new(2, 2).manhattan(Coord::new(3, 3)), 2);
        assert_eq!(Coord::new(4, 4).manhattan(Coord::new(4, 4)), 0);
    }

    #[test]
    fn test_resource_cells_fixed() {
        let board = Board::new();
        let resources: Vec<_> = board
            .iter()
            .filter(|(_, cell)| cell.is_resource())
            .map(|(coord, _)| coord)
            .collect();
        assert_eq!(resources.len(), 4);
        for coord in RESOURCE_CELLS {
            assert!(board.is_resource_cell(coord));
        }
        assert!(!board.is_resource_cell(Coord::new(0, 0)));
    }

    #[test]
    fn test_set_units_zero_removes_entry() {
        let mut board = Board::new();
        let coord = Coord::new(2, 3);
        board.set_units(coord, PlayerId::Blue, 4);
        assert_eq!(board.units_at(coord, PlayerId::Blue), 4);

        board.set_units(coord, PlayerId::Blue, 0);
        assert_eq!(board.units_at(coord, PlayerId::Blue), 0);
        assert!(board.get(coord).unwrap().is_empty());
    }

    #[test]
    fn test_out_of_bounds_is_ignored() {
        let mut board = Board::new();
        board.set_units(Coord::new(10, 0), PlayerId::Blue, 5);
        assert_eq!(board.units_at(Coord::new(10, 0), PlayerId::Blue), 0);
        assert_eq!(board.total_units(PlayerId::Blue), 0);
    }

    #[test]
    fn test_depleted_only_on_resource_cells() {
        let mut board = Board::new();
        board.mark_depleted(Coord::new(0, 0));
        assert!(!board.get(Coord::new(0, 0)).unwrap().is_depleted());

        board.mark_depleted(Coord::new(4, 4));
        assert!(board.get(Coord::new(4, 4)).unwrap().is_depleted());
    }

    #[test]
    fn test_stacks_and_totals() {
        let mut board = Board::new();
        board.set_units(Coord::new(0, 0), PlayerId::Blue, 3);
        board.set_units(Coord::new(1, 0), PlayerId::Blue, 4);
        board.set_units(Coord::new(1, 0), PlayerId::Green, 2);

        assert_eq!(board.total_units(PlayerId::Blue), 7);
        assert_eq!(board.stacks_of(PlayerId::Blue).count(), 2);

        let cell = board.get(Coord::new(1, 0)).unwrap();
        assert!(cell.has_enemies(PlayerId::Blue));
        assert_eq!(
            cell.stacks().collect::<Vec<_>>(),
            vec![(PlayerId::Blue, 4), (PlayerId::Green, 2)]
        );
    }
}
