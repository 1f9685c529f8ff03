//! Player state management.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::UnknownPlayer;
use crate::game::{Coord, DiplomaticRecord, RecordKind};

/// Number of players in every game.
pub const PLAYER_COUNT: usize = 4;

/// Identifier for one of the four fixed players.
///
/// Declaration order is the turn rotation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerId {
    /// Top-left corner.
    Blue,
    /// Top-right corner.
    Yellow,
    /// Bottom-left corner.
    Gray,
    /// Bottom-right corner.
    Green,
}

impl PlayerId {
    /// All players in rotation order.
    pub const ALL: [PlayerId; PLAYER_COUNT] = [
        PlayerId::Blue,
        PlayerId::Yellow,
        PlayerId::Gray,
        PlayerId::Green,
    ];

    /// Position of this player in the rotation.
    #[must_use]
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Player at a rotation index.
    #[must_use]
    pub const fn from_index(index: usize) -> Option<Self> {
        if index < PLAYER_COUNT {
            Some(Self::ALL[index])
        } else {
            None
        }
    }

    /// Wire identifier (`"blue"`, `"yellow"`, ...).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            PlayerId::Blue => "blue",
            PlayerId::Yellow => "yellow",
            PlayerId::Gray => "gray",
            PlayerId::Green => "green",
        }
    }

    /// Display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            PlayerId::Blue => "Blue",
            PlayerId::Yellow => "Yellow",
            PlayerId::Gray => "Gray",
            PlayerId::Green => "Green",
        }
    }

    /// Display color as a hex string.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            PlayerId::Blue => "#4285f4",
            PlayerId::Yellow => "#ffd700",
            PlayerId::Gray => "#6c757d",
            PlayerId::Green => "#34a853",
        }
    }

    /// Single-character board symbol.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            PlayerId::Blue => 'B',
            PlayerId::Yellow => 'Y',
            PlayerId::Gray => 'A',
            PlayerId::Green => 'G',
        }
    }

    /// Home corner: where the player starts and where bonuses arrive.
    #[must_use]
    pub const fn home(self) -> Coord {
        match self {
            PlayerId::Blue => Coord::new(0, 0),
            PlayerId::Yellow => Coord::new(9, 0),
            PlayerId::Gray => Coord::new(0, 9),
            PlayerId::Green => Coord::new(9, 9),
        }
    }

    /// Home quadrant (cosmetic).
    #[must_use]
    pub const fn quadrant(self) -> Quadrant {
        match self {
            PlayerId::Blue => Quadrant::new(Coord::new(0, 0), Coord::new(4, 4)),
            PlayerId::Yellow => Quadrant::new(Coord::new(5, 0), Coord::new(9, 4)),
            PlayerId::Gray => Quadrant::new(Coord::new(0, 5), Coord::new(4, 9)),
            PlayerId::Green => Quadrant::new(Coord::new(5, 5), Coord::new(9, 9)),
        }
    }

    /// The player whose home corner is `coord`, if any.
    #[must_use]
    pub fn home_owner(coord: Coord) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.home() == coord)
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlayerId {
    type Err = UnknownPlayer;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownPlayer(s.to_string()))
    }
}

/// Inclusive rectangular home region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quadrant {
    /// Top-left corner (inclusive).
    pub start: Coord,
    /// Bottom-right corner (inclusive).
    pub end: Coord,
}

impl Quadrant {
    /// Create a quadrant from its inclusive corners.
    #[must_use]
    pub const fn new(start: Coord, end: Coord) -> Self {
        Self { start, end }
    }

    /// Check if a coordinate lies inside this quadrant.
    #[must_use]
    pub const fn contains(&self, coord: Coord) -> bool {
        coord.x >= self.start.x
            && coord.x <= self.end.x
            && coord.y >= self.start.y
            && coord.y <= self.end.y
    }
}

/// State for a single player.
#[derive(Debug, Clone)]
pub struct Player {
    /// Unique identifier for this player.
    pub id: PlayerId,
    /// Display name.
    pub name: String,
    /// Display color.
    pub color: String,
    /// Total units on the board. Derived from the board after every move.
    pub units: u32,
    /// Fixed starting corner.
    pub start_position: Coord,
    /// Home region.
    pub quadrant: Quadrant,
    /// Every message this player sent or received, oldest first.
    pub diplomacy_history: Vec<DiplomaticRecord>,
    /// False claims counted against this player.
    pub lies: u32,
    /// Turn of the last counted false claim.
    pub last_lie_turn: Option<u32>,
}

impl Player {
    /// Create a new player with its starting units.
    #[must_use]
    pub fn new(id: PlayerId, units: u32) -> Self {
        Self {
            id,
            name: id.name().to_string(),
            color: id.color().to_string(),
            units,
            start_position: id.home(),
            quadrant: id.quadrant(),
            diplomacy_history: Vec::new(),
            lies: 0,
            last_lie_turn: None,
        }
    }

    /// Whether the player still has units on the board.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.units > 0
    }

    /// Whether another false claim would be counted this turn.
    ///
    /// At most `max_lies` are counted, and only when `cooldown` turns have
    /// passed since the last one.
    #[must_use]
    pub fn can_lie(&self, turn: u32, max_lies: u32, cooldown: u32) -> bool {
        let rested = self
            .last_lie_turn
            .is_none_or(|last| turn.saturating_sub(last) >= cooldown);
        self.lies < max_lies && rested
    }

    /// Count a false claim made on `turn`.
    pub fn record_lie(&mut self, turn: u32) {
        self.lies += 1;
        self.last_lie_turn = Some(turn);
    }

    /// Messages this player sent.
    pub fn sent(&self) -> impl Iterator<Item = &DiplomaticRecord> {
        self.diplomacy_history
            .iter()
            .filter(|r| r.kind == RecordKind::Sent)
    }

    /// Messages this player received.
    pub fn received(&self) -> impl Iterator<Item = &DiplomaticRecord> {
        self.diplomacy_history
            .iter()
            .filter(|r| r.kind == RecordKind::Received)
    }
}
