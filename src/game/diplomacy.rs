//! Diplomacy ledger.
//!
//! Append-only. Every accepted message produces one `sent` record in the
//! sender's history and one `received` record in the recipient's history,
//! identical apart from their kind.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::game::{FactCheck, Player, PlayerId};

/// An outbound message as supplied by a decision source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiplomaticMessage {
    /// Recipient player id as text (`"yellow"`, ...).
    pub to: String,
    /// Free-form message body.
    pub content: String,
    /// Whether the sender says it is bluffing. Informational only.
    #[serde(default)]
    pub is_lie: bool,
}

impl DiplomaticMessage {
    /// Create an honest message.
    #[must_use]
    pub fn new(to: PlayerId, content: impl Into<String>) -> Self {
        Self {
            to: to.as_str().to_string(),
            content: content.into(),
            is_lie: false,
        }
    }
}

/// Which side of an exchange a record describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    /// The owner of the history sent this message.
    Sent,
    /// The owner of the history received this message.
    Received,
}

/// One entry in a player's diplomacy history. Never mutated once stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiplomaticRecord {
    /// Turn the message was sent on.
    pub turn: u32,
    /// Sender.
    pub from: PlayerId,
    /// Recipient.
    pub to: PlayerId,
    /// Message body.
    pub content: String,
    /// Time the exchange was recorded.
    pub timestamp: DateTime<Utc>,
    /// Sent or received.
    #[serde(rename = "type")]
    pub kind: RecordKind,
    /// What the sender claimed about its own honesty.
    pub claimed_lie: bool,
    /// Whether claim analysis found a false statement.
    pub actually_lied: bool,
    /// Human-readable description of each false statement found.
    pub detected_lies: Vec<String>,
}

/// Why a diplomatic message was dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(tag = "reason", content = "to", rename_all = "snake_case")]
pub enum DiplomacyRejection {
    /// The recipient does not name a player.
    #[error("unknown recipient {0:?}")]
    UnknownRecipient(String),
    /// The sender addressed itself.
    #[error("message addressed to sender")]
    SelfAddressed,
}

/// Resolve the recipient of `message` sent by `from`.
///
/// # Errors
///
/// Returns why the message cannot be delivered.
pub fn resolve_recipient(
    from: PlayerId,
    message: &DiplomaticMessage,
) -> Result<PlayerId, DiplomacyRejection> {
    let to: PlayerId = message
        .to
        .parse()
        .map_err(|_| DiplomacyRejection::UnknownRecipient(message.to.clone()))?;
    if to == from {
        return Err(DiplomacyRejection::SelfAddressed);
    }
    Ok(to)
}

/// Append both sides of an exchange to the players' histories.
///
/// `players` is indexed by rotation order. Returns the `sent` record.
pub fn deliver(
    players: &mut [Player],
    turn: u32,
    from: PlayerId,
    to: PlayerId,
    message: &DiplomaticMessage,
    check: FactCheck,
    timestamp: DateTime<Utc>,
) -> DiplomaticRecord {
    let sent = DiplomaticRecord {
        turn,
        from,
        to,
        content: message.content.clone(),
        timestamp,
        kind: RecordKind::Sent,
        claimed_lie: message.is_lie,
        actually_lied: check.is_lie(),
        detected_lies: check.detected_lies,
    };
    let received = DiplomaticRecord {
        kind: RecordKind::Received,
        ..sent.clone()
    };

    if let Some(sender) = players.get_mut(from.index()) {
        sender.diplomacy_history.push(sent.clone());
    }
    if let Some(recipient) = players.get_mut(to.index()) {
        recipient.diplomacy_history.push(received);
    }
    sent
}

#[cfg(test)]
mod tests {
    use super::*;

    fn players() -> Vec<Player> {
        PlayerId::ALL.iter().map(|&id| Player::new(id, 10)).collect()
    }

    #[test]
    fn test_symmetric_records() {
        let mut players = players();
        let message = DiplomaticMessage::new(PlayerId::Gray, "truce?");
        let now = Utc::now();

        deliver(
            &mut players,
            3,
            PlayerId::Blue,
            PlayerId::Gray,
            &message,
            FactCheck::default(),
            now,
        );

        let blue = &players[PlayerId::Blue.index()];
        let gray = &players[PlayerId::Gray.index()];
        assert_eq!(blue.diplomacy_history.len(), 1);
        assert_eq!(gray.diplomacy_history.len(), 1);
        assert_eq!(blue.sent().count(), 1);
        assert_eq!(gray.received().count(), 1);

        let sent = &blue.diplomacy_history[0];
        let received = &gray.diplomacy_history[0];
        assert_eq!(sent.turn, received.turn);
        assert_eq!(sent.content, received.content);
        assert_eq!(sent.timestamp, received.timestamp);
        assert_eq!(sent.kind, RecordKind::Sent);
        assert_eq!(received.kind, RecordKind::Received);

        // Uninvolved players see nothing
        assert!(players[PlayerId::Yellow.index()].diplomacy_history.is_empty());
    }

    #[test]
    fn test_resolve_recipient() {
        let msg = DiplomaticMessage::new(PlayerId::Green, "hi");
        assert_eq!(resolve_recipient(PlayerId::Blue, &msg), Ok(PlayerId::Green));
        assert_eq!(
            resolve_recipient(PlayerId::Green, &msg),
            Err(DiplomacyRejection::SelfAddressed)
        );

        let msg = DiplomaticMessage {
            to: "red".to_string(),
            content: "hi".to_string(),
            is_lie: false,
        };
        assert_eq!(
            resolve_recipient(PlayerId::Blue, &msg),
            Err(DiplomacyRejection::UnknownRecipient("red".to_string()))
        );
    }

    #[test]
    fn test_record_serializes_kind_as_type() {
        let mut players = players();
        let record = deliver(
            &mut players,
            0,
            PlayerId::Yellow,
            PlayerId::Blue,
            &DiplomaticMessage::new(PlayerId::Blue, "hello"),
            FactCheck::default(),
            Utc::now(),
        );
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["type"], "sent");
        assert_eq!(json["from"], "yellow");
        assert_eq!(json["actuallyLied"], false);
    }
}
