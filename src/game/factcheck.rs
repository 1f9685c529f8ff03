//! Claim analysis for diplomatic messages.
//!
//! Analysis is read-only: it inspects the board and the players but never
//! changes them. The only state it feeds is the sender's lie counter, which
//! the engine updates from the result.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::game::{Board, Coord, Player};

/// Claimed unit counts above this are impossible in a normal game.
pub const IMPOSSIBLE_UNIT_CLAIM: u64 = 50;

/// Result of analysing one message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactCheck {
    /// One entry per false statement found.
    pub detected_lies: Vec<String>,
}

impl FactCheck {
    /// Whether any false statement was found.
    #[must_use]
    pub fn is_lie(&self) -> bool {
        !self.detected_lies.is_empty()
    }
}

/// What an analyzer may look at when checking a message.
#[derive(Debug, Clone, Copy)]
pub struct ClaimContext<'a> {
    /// Author of the message.
    pub sender: &'a Player,
    /// Recipient of the message.
    pub receiver: &'a Player,
    /// Authoritative board, including visibility flags.
    pub board: &'a Board,
}

/// Pluggable analysis of diplomatic messages.
pub trait DiplomacyAnalyzer {
    /// Find false statements in `content`.
    fn analyze(&self, content: &str, ctx: &ClaimContext<'_>) -> FactCheck;
}

/// Pattern-based checker for simple factual claims.
///
/// Recognises claims about the sender's own unit count, about whether a
/// cell the receiver can see is occupied, about the sender having been
/// eliminated, and implausibly large unit counts.
#[derive(Debug, Clone)]
pub struct ClaimChecker {
    unit_count: Regex,
    position: Regex,
    eliminated: Regex,
    large_count: Regex,
}

impl ClaimChecker {
    /// Compile the claim patterns.
    ///
    /// # Errors
    ///
    /// Returns an error if a pattern fails to compile.
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            unit_count: Regex::new(
                r"(?i)\b(?:i have|i've got|i command|we have)\s+(\d+)\s+(?:units?|divisions?|troops)\b",
            )?,
            position: Regex::new(
                r"(?i)\(?\s*(\d)\s*,\s*(\d)\s*\)?\s+(?:is|are|was|stands?)\s+(empty|clear|unoccupied|abandoned|occupied|held|guarded|defended)\b",
            )?,
            eliminated: Regex::new(
                r"(?i)\b(?:i am|i'm|i was|i have been|i've been)\s+(?:eliminated|destroyed|dead|defeated|wiped out)\b",
            )?,
            large_count: Regex::new(r"(?i)\b(\d{2,})\s*(?:units|divisions|troops)\b")?,
        })
    }

    fn check_unit_count(&self, content: &str, sender: &Player, lies: &mut Vec<String>) {
        let Some(caps) = self.unit_count.captures(content) else {
            return;
        };
        let claimed = caps[1].parse::<u64>().unwrap_or(u64::MAX);
        if claimed != u64::from(sender.units) {
            lies.push(format!(
                "claimed {claimed} units but has {}",
                sender.units
            ));
        }
    }

    fn check_position(&self, content: &str, ctx: &ClaimContext<'_>, lies: &mut Vec<String>) {
        let Some(caps) = self.position.captures(content) else {
            return;
        };
        let (Ok(x), Ok(y)) = (caps[1].parse::<u16>(), caps[2].parse::<u16>()) else {
            return;
        };
        let coord = Coord::new(x, y);
        let Some(cell) = ctx.board.get(coord) else {
            return;
        };
        // Only claims the receiver could verify count.
        if !cell.is_visible_to(ctx.receiver.id) {
            return;
        }

        let claims_occupied = matches!(
            caps[3].to_ascii_lowercase().as_str(),
            "occupied" | "held" | "guarded" | "defended"
        );
        let occupied = !cell.is_empty();
        if claims_occupied && !occupied {
            lies.push(format!("claimed units at {coord} but it is empty"));
        } else if !claims_occupied && occupied {
            lies.push(format!("claimed {coord} is empty but units are there"));
        }
    }

    fn check_eliminated(&self, content: &str, sender: &Player, lies: &mut Vec<String>) {
        if sender.is_alive() && self.eliminated.is_match(content) {
            lies.push(format!(
                "claimed to be eliminated but has {} units",
                sender.units
            ));
        }
    }

    fn check_large_count(&self, content: &str, lies: &mut Vec<String>) {
        let Some(caps) = self.large_count.captures(content) else {
            return;
        };
        let claimed = caps[1].parse::<u64>().unwrap_or(u64::MAX);
        if claimed > IMPOSSIBLE_UNIT_CLAIM {
            lies.push(format!("claimed {claimed} units, which is impossible"));
        }
    }
}

impl DiplomacyAnalyzer for ClaimChecker {
    fn analyze(&self, content: &str, ctx: &ClaimContext<'_>) -> FactCheck {
        let mut lies = Vec::new();
        self.check_unit_count(content, ctx.sender, &mut lies);
        self.check_position(content, ctx, &mut lies);
        self.check_eliminated(content, ctx.sender, &mut lies);
        self.check_large_count(content, &mut lies);
        FactCheck {
            detected_lies: lies,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{PlayerId, update_visibility};

    struct Fixture {
        board: Board,
        blue: Player,
        yellow: Player,
    }

    impl Fixture {
        fn new() -> Self {
            let mut board = Board::new();
            board.set_units(Coord::new(0, 0), PlayerId::Blue, 10);
            board.set_units(Coord::new(9, 0), PlayerId::Yellow, 7);
            board.set_units(Coord::new(8, 1), PlayerId::Yellow, 3);
            update_visibility(&mut board);
            Self {
                board,
                blue: Player::new(PlayerId::Blue, 10),
                yellow: Player::new(PlayerId::Yellow, 10),
            }
        }

        fn check(&self, content: &str) -> FactCheck {
            let checker = ClaimChecker::new().unwrap();
            let ctx = ClaimContext {
                sender: &self.blue,
                receiver: &self.yellow,
                board: &self.board,
            };
            checker.analyze(content, &ctx)
        }
    }

    #[test]
    fn test_truthful_unit_claim() {
        let fx = Fixture::new();
        assert!(!fx.check("I have 10 units, let's be friends").is_lie());
    }

    #[test]
    fn test_false_unit_claim() {
        let fx = Fixture::new();
        let result = fx.check("Careful, I have 7 divisions at the ready");
        assert!(result.is_lie());
        assert_eq!(result.detected_lies.len(), 1);
    }

    #[test]
    fn test_position_claim_visible_to_receiver() {
        let fx = Fixture::new();
        // (9,1) is next to Yellow's stacks and empty
        assert!(fx.check("(9,1) is guarded by my army").is_lie());
        assert!(!fx.check("(9,1) is empty").is_lie());
        // (8,1) holds Yellow units
        assert!(fx.check("(8,1) is clear, move in").is_lie());
    }

    #[test]
    fn test_position_claim_in_fog_is_not_checked() {
        let fx = Fixture::new();
        // Yellow cannot see (2,7)
        assert!(!fx.check("(2,7) is occupied").is_lie());
    }

    #[test]
    fn test_false_elimination_claim() {
        let fx = Fixture::new();
        assert!(fx.check("I am defeated, leave me be").is_lie());
    }

    #[test]
    fn test_impossible_count() {
        let fx = Fixture::new();
        let result = fx.check("My allies bring 99 troops");
        assert!(result.is_lie());
        assert!(!fx.check("My allies bring 12 troops").is_lie());
    }

    #[test]
    fn test_plain_message_has_no_claims() {
        let fx = Fixture::new();
        assert_eq!(fx.check("Shall we split the centre?"), FactCheck::default());
    }
}
