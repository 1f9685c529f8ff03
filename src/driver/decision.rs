//! Per-turn decisions and their consumer-side limits.

use serde::{Deserialize, Serialize};

use crate::config::DriverConfig;
use crate::game::{DiplomaticMessage, Move, PlayerId};

/// What a player wants to do on its turn.
///
/// Both lists may be empty; an empty decision is a pass.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Decision {
    /// Moves in the order they should be executed.
    #[serde(default)]
    pub moves: Vec<Move>,
    /// Outbound diplomatic messages.
    #[serde(default)]
    pub diplomacy: Vec<DiplomaticMessage>,
    /// Free-form explanation from the source. Never interpreted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
}

impl Decision {
    /// A decision that does nothing.
    #[must_use]
    pub fn pass() -> Self {
        Self::default()
    }

    /// Parse a decision from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if `json` is not a decision object.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Apply the diplomacy limits for a decision by `from`.
    ///
    /// Drops self-addressed messages and repeated recipients, truncates
    /// bodies to `max_message_len` characters and keeps at most
    /// `max_messages` messages. Moves are left to the engine.
    #[must_use]
    pub fn sanitize(mut self, from: PlayerId, config: &DriverConfig) -> Self {
        let mut seen: Vec<String> = Vec::with_capacity(config.max_messages);
        let mut kept = Vec::with_capacity(config.max_messages);

        for mut message in self.diplomacy {
            if kept.len() == config.max_messages {
                break;
            }
            let recipient = message.to.trim().to_ascii_lowercase();
            if recipient == from.as_str() || seen.contains(&recipient) {
                continue;
            }
            if message.content.chars().count() > config.max_message_len {
                message.content = message.content.chars().take(config.max_message_len).collect();
            }
            seen.push(recipient);
            kept.push(message);
        }

        self.diplomacy = kept;
        self
    }
}
