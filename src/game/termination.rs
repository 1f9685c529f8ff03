//! Win and draw detection.

use crate::game::{Outcome, Player};

/// Decide whether the game is over.
///
/// Must run after battles and capture bonuses have settled unit totals.
/// Returns `None` while two or more players are alive.
#[must_use]
pub fn check_termination(players: &[Player]) -> Option<Outcome> {
    let mut alive = players.iter().filter(|p| p.is_alive());
    match (alive.next(), alive.next()) {
        (None, _) => Some(Outcome::Draw),
        (Some(last), None) => Some(Outcome::Winner(last.id)),
        (Some(_), Some(_)) => None,
    }
}
