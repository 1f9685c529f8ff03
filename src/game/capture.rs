//! One-time capture bonuses.
//!
//! Bonus units always arrive on the capturing player's home corner, never
//! on the captured cell.

use serde::{Deserialize, Serialize};

use crate::config::{BonusPolicy, EngineConfig};
use crate::game::{Board, Coord, PlayerId, combat};

/// Which kind of bonus was granted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CaptureKind {
    /// First entry into a central resource cell.
    Resource,
    /// First enemy occupation of another player's home corner.
    Base {
        /// Owner of the captured corner.
        owner: PlayerId,
    },
}

/// A bonus granted after a move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureGrant {
    /// Player receiving the bonus.
    pub player: PlayerId,
    /// Kind of capture.
    pub kind: CaptureKind,
    /// The captured cell.
    pub at: Coord,
    /// Units added at the player's home corner.
    pub bonus: u32,
    /// Units that actually stayed on the home corner after any fight there.
    pub landed: u32,
}

/// Grant any bonuses earned by `player` entering `to`.
///
/// `survivors` is the mover's stack on `to` after battle. Resource bonuses
/// follow `config.bonus_policy`; base bonuses always need a survivor.
pub fn apply_captures(
    board: &mut Board,
    player: PlayerId,
    to: Coord,
    survivors: u32,
    config: &EngineConfig,
) -> Vec<CaptureGrant> {
    let mut grants = Vec::new();
    let Some(cell) = board.get(to).copied() else {
        return grants;
    };

    let resource_eligible = match config.bonus_policy {
        BonusPolicy::EnteringMover => true,
        BonusPolicy::SurvivorOnly => survivors > 0,
    };
    if cell.is_resource() && !cell.is_depleted() && resource_eligible {
        board.mark_depleted(to);
        let landed = grant(board, player, config.resource_bonus);
        grants.push(CaptureGrant {
            player,
            kind: CaptureKind::Resource,
            at: to,
            bonus: config.resource_bonus,
            landed,
        });
    }

    let enemy_base = PlayerId::home_owner(to)
        .filter(|&owner| owner != player && !cell.is_base_captured() && survivors > 0);
    if let Some(owner) = enemy_base {
        board.mark_base_captured(to);
        let landed = grant(board, player, config.base_bonus);
        grants.push(CaptureGrant {
            player,
            kind: CaptureKind::Base { owner },
            at: to,
            bonus: config.base_bonus,
            landed,
        });
    }

    grants
}

fn grant(board: &mut Board, player: PlayerId, bonus: u32) -> u32 {
    match combat::reinforce(board, player, bonus) {
        Some(battle) => battle.survivors,
        None => bonus,
    }
}
