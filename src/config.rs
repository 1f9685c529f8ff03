//! Engine and driver configuration.
//!
//! Every field has a default, so a config file only needs the values it
//! changes. Files are JSON.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Who receives a resource bonus when the entering stack dies in battle on
/// the resource cell.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum BonusPolicy {
    /// The first player to enter gets the bonus whatever the battle outcome.
    #[default]
    EnteringMover,
    /// Only a mover with units left on the cell gets the bonus.
    SurvivorOnly,
}

/// Rules of the game itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Units each player starts with on its home corner.
    pub starting_units: u32,
    /// Units granted for claiming a resource cell.
    pub resource_bonus: u32,
    /// Units granted for capturing an enemy base.
    pub base_bonus: u32,
    /// Resource bonus eligibility.
    pub bonus_policy: BonusPolicy,
    /// False claims counted per player over the whole game.
    pub max_lies: u32,
    /// Turns that must pass between two counted false claims.
    pub lie_cooldown: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            starting_units: 10,
            resource_bonus: 1,
            base_bonus: 10,
            bonus_policy: BonusPolicy::EnteringMover,
            max_lies: 1,
            lie_cooldown: 10,
        }
    }
}

impl EngineConfig {
    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.starting_units == 0 {
            return Err(ConfigError::Invalid(
                "starting_units must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Settings for driving games with decision sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    /// Turn counter value at which a driven game is stopped.
    pub max_turns: u32,
    /// Diplomatic messages accepted per decision.
    pub max_messages: usize,
    /// Characters kept of each message body.
    pub max_message_len: usize,
    /// Seed for built-in decision sources.
    pub seed: u64,
    /// Run claim analysis on diplomatic messages.
    pub fact_check: bool,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            max_turns: 200,
            max_messages: 2,
            max_message_len: 1000,
            seed: 0,
            fact_check: true,
        }
    }
}

impl DriverConfig {
    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_turns == 0 {
            return Err(ConfigError::Invalid("max_turns must be at least 1".to_string()));
        }
        if self.max_message_len == 0 {
            return Err(ConfigError::Invalid(
                "max_message_len must be at least 1".to_string(),
            ));
        }
        // One message per other player at most.
        if self.max_messages > 3 {
            return Err(ConfigError::Invalid(format!(
                "max_messages must be at most 3, got {}",
                self.max_messages
            )));
        }
        Ok(())
    }
}

/// Complete configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Game rules.
    pub engine: EngineConfig,
    /// Driver settings.
    pub driver: DriverConfig,
}

impl Config {
    /// Parse and validate a JSON config.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or a value is out of range.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is invalid.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Check all value ranges.
    ///
    /// # Errors
    ///
    /// Returns the first validation failure.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.engine.validate()?;
        self.driver.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.engine.starting_units, 10);
        assert_eq!(config.engine.resource_bonus, 1);
        assert_eq!(config.engine.base_bonus, 10);
        assert_eq!(config.engine.bonus_policy, BonusPolicy::EnteringMover);
        assert_eq!(config.driver.max_messages, 2);
        assert_eq!(config.driver.max_message_len, 1000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config =
            Config::from_json(r#"{"engine":{"bonus_policy":"survivor_only"},"driver":{"seed":7}}"#)
                .unwrap();
        assert_eq!(config.engine.bonus_policy, BonusPolicy::SurvivorOnly);
        assert_eq!(config.engine.starting_units, 10);
        assert_eq!(config.driver.seed, 7);
        assert_eq!(config.driver.max_turns, 200);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = Config::from_json(r#"{"engine":{"starting_units":0}}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = Config::from_json(r#"{"driver":{"max_messages":4}}"#).unwrap_err();
        assert!(err.to_string().contains("max_messages"));

        let err = Config::from_json(r#"{"driver":{"max_message_len":0}}"#).unwrap_err();
        assert!(err.to_string().contains("max_message_len"));
    }

    #[test]
    fn test_malformed_json() {
        let err = Config::from_json("{not json").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"driver":{{"max_turns":50}}}}"#).unwrap();
        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.driver.max_turns, 50);

        let missing = Config::load(Path::new("/nonexistent/config.json")).unwrap_err();
        assert!(matches!(missing, ConfigError::Io(_)));
    }
}
