//! Structured game events and their observers.
//!
//! The engine never logs or prints directly. Every state change pushes a
//! [`GameEvent`] onto an internal queue which the caller drains into an
//! [`EventSink`].

use std::fmt;
use std::io::Write;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::game::{
    BattleReport, CaptureGrant, CaptureKind, Coord, DiplomacyRejection, Move, MoveRejection,
    Outcome, PlayerId,
};

/// Something that happened in the game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    /// waiting → running.
    GameStarted,
    /// running → paused.
    GamePaused,
    /// paused → running.
    GameResumed,
    /// Board, players and rotation restored to their initial state.
    GameReset,
    /// A move was dropped from a batch.
    MoveRejected {
        /// Acting player.
        player: PlayerId,
        /// The move as submitted.
        #[serde(rename = "move")]
        mv: Move,
        /// Rule it broke.
        reason: MoveRejection,
    },
    /// A move was carried out.
    MoveExecuted {
        /// Acting player.
        player: PlayerId,
        /// Source cell.
        from: Coord,
        /// Destination cell.
        to: Coord,
        /// Units moved.
        count: u32,
        /// Mover's units on the destination afterwards.
        units_at_destination: u32,
    },
    /// A stack fought its way into an occupied cell.
    BattleResolved {
        /// Cell the battle took place on.
        at: Coord,
        /// Fight details.
        report: BattleReport,
    },
    /// A resource or base bonus was granted.
    CaptureGranted {
        /// The bonus.
        grant: CaptureGrant,
    },
    /// A diplomatic message was recorded.
    MessageSent {
        /// Sender.
        from: PlayerId,
        /// Recipient.
        to: PlayerId,
        /// Message body.
        content: String,
        /// Whether analysis found a false claim.
        actually_lied: bool,
    },
    /// A diplomatic message was dropped.
    MessageRejected {
        /// Sender.
        from: PlayerId,
        /// Why it was dropped.
        reason: DiplomacyRejection,
    },
    /// A false claim was counted against a player.
    LieRecorded {
        /// The player who lied.
        player: PlayerId,
        /// Lies counted so far.
        lies: u32,
    },
    /// A player lost its last unit.
    PlayerEliminated {
        /// The eliminated player.
        player: PlayerId,
    },
    /// The rotation moved on.
    TurnAdvanced {
        /// Turn counter after the move.
        turn: u32,
        /// Player now to move.
        player: PlayerId,
    },
    /// The game finished.
    GameEnded {
        /// Final result.
        outcome: Outcome,
    },
}

impl fmt::Display for GameEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameEvent::GameStarted => f.write_str("game started"),
            GameEvent::GamePaused => f.write_str("game paused"),
            GameEvent::GameResumed => f.write_str("game resumed"),
            GameEvent::GameReset => f.write_str("game reset"),
            GameEvent::MoveRejected { player, mv, reason } => write!(
                f,
                "{player}: move ({},{})->({},{}) x{} rejected: {reason}",
                mv.from_x, mv.from_y, mv.to_x, mv.to_y, mv.unit_count
            ),
            GameEvent::MoveExecuted {
                player,
                from,
                to,
                count,
                ..
            } => write!(f, "{player}: {count} units {from} -> {to}"),
            GameEvent::BattleResolved { at, report } => {
                write!(
                    f,
                    "battle at {at}: {} ({}) vs",
                    report.attacker, report.strength
                )?;
                for (i, d) in report.defenders.iter().enumerate() {
                    let sep = if i == 0 { " " } else { ", " };
                    write!(f, "{sep}{} ({})", d.player, d.before)?;
                }
                write!(f, "; {} survive", report.survivors)
            }
            GameEvent::CaptureGranted { grant } => match grant.kind {
                CaptureKind::Resource => write!(
                    f,
                    "{} claims resource {} (+{})",
                    grant.player, grant.at, grant.bonus
                ),
                CaptureKind::Base { owner } => write!(
                    f,
                    "{} captures {owner}'s base (+{})",
                    grant.player, grant.bonus
                ),
            },
            GameEvent::MessageSent {
                from, to, content, ..
            } => write!(f, "{from} -> {to}: {content:?}"),
            GameEvent::MessageRejected { from, reason } => {
                write!(f, "{from}: message dropped: {reason}")
            }
            GameEvent::LieRecorded { player, lies } => {
                write!(f, "{player} caught lying ({lies} total)")
            }
            GameEvent::PlayerEliminated { player } => write!(f, "{player} eliminated"),
            GameEvent::TurnAdvanced { turn, player } => {
                write!(f, "turn {turn}: {player} to move")
            }
            GameEvent::GameEnded { outcome } => write!(f, "game over: {outcome}"),
        }
    }
}

/// Observer for game events.
pub trait EventSink {
    /// Handle one event.
    fn emit(&mut self, event: &GameEvent);
}

impl EventSink for Vec<GameEvent> {
    fn emit(&mut self, event: &GameEvent) {
        self.push(event.clone());
    }
}

/// Sink that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: &GameEvent) {}
}

/// Sink that forwards events to `tracing`.
///
/// Rejections and diplomacy go to `debug`, everything else to `info`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&mut self, event: &GameEvent) {
        match event {
            GameEvent::MoveRejected { player, reason, .. } => {
                debug!(%player, %reason, "{event}");
            }
            GameEvent::MessageSent { from, to, .. } => debug!(%from, %to, "{event}"),
            GameEvent::MessageRejected { from, .. } => debug!(%from, "{event}"),
            GameEvent::MoveExecuted { player, .. } => debug!(%player, "{event}"),
            GameEvent::TurnAdvanced { turn, player } => info!(turn, %player, "{event}"),
            _ => info!("{event}"),
        }
    }
}

/// Sink that writes one JSON object per line.
///
/// Write errors are counted rather than propagated so a broken output never
/// interrupts a game.
#[derive(Debug)]
pub struct JsonLinesSink<W: Write> {
    writer: W,
    failures: usize,
}

impl<W: Write> JsonLinesSink<W> {
    /// Wrap a writer.
    pub const fn new(writer: W) -> Self {
        Self {
            writer,
            failures: 0,
        }
    }

    /// Number of events that could not be written.
    #[must_use]
    pub const fn failures(&self) -> usize {
        self.failures
    }

    /// Recover the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> EventSink for JsonLinesSink<W> {
    fn emit(&mut self, event: &GameEvent) {
        let written = serde_json::to_writer(&mut self.writer, event)
            .map_err(std::io::Error::from)
            .and_then(|()| self.writer.write_all(b"\n"));
        if written.is_err() {
            self.failures += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec_sink_collects() {
        let mut sink: Vec<GameEvent> = Vec::new();
        sink.emit(&GameEvent::GameStarted);
        sink.emit(&GameEvent::PlayerEliminated {
            player: PlayerId::Gray,
        });
        assert_eq!(sink.len(), 2);
    }

    #[test]
    fn test_event_json_is_tagged() {
        let event = GameEvent::TurnAdvanced {
            turn: 3,
            player: PlayerId::Yellow,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "turn_advanced");
        assert_eq!(json["player"], "yellow");
    }

    #[test]
    fn test_json_lines_sink() {
        let mut sink = JsonLinesSink::new(Vec::new());
        sink.emit(&GameEvent::GameStarted);
        sink.emit(&GameEvent::GameEnded {
            outcome: Outcome::Draw,
        });
        assert_eq!(sink.failures(), 0);

        let out = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        let back: GameEvent = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(
            back,
            GameEvent::GameEnded {
                outcome: Outcome::Draw
            }
        );
    }

    #[test]
    fn test_display_battle() {
        let event = GameEvent::BattleResolved {
            at: Coord::new(4, 3),
            report: BattleReport {
                attacker: PlayerId::Blue,
                strength: 5,
                defenders: vec![crate::game::DefenderResult {
                    player: PlayerId::Yellow,
                    before: 3,
                    after: 0,
                }],
                survivors: 2,
            },
        };
        assert_eq!(
            event.to_string(),
            "battle at (4,3): blue (5) vs yellow (3); 2 survive"
        );
    }
}
