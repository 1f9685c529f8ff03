//! Structured text for language-model players.
//!
//! Everything here comes from a [`PlayerView`], so the text never reveals
//! more than the player is allowed to know.

use super::Palette;
use super::ascii::render_grid;
use crate::game::{Coord, PlayerView, RecordKind};

/// Number of most recent diplomacy records included.
pub const DIPLOMACY_WINDOW: usize = 10;

/// Render a player's view as a prompt-ready summary.
///
/// Output format:
/// ```text
/// === TURN 12 | YOU ARE BLUE ===
///
/// YOUR UNITS: 14 total
/// - (0,0): 1
/// - (3,4): 13
/// LIES: 0 used, another lie would be counted: yes
///
/// BOARD (B=blue Y=yellow A=gray G=green, ?=fog, *=resource, o=claimed):
/// ...
///
/// PLAYERS:
/// - Blue: 14 units (you)
/// - Yellow: eliminated
///
/// RESOURCES:
/// - (4,4): claimed
///
/// DIPLOMACY (last 10):
/// - [turn 11] Gray -> you: "Truce?"
/// ```
#[must_use]
pub fn render_llm(view: &PlayerView) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "=== TURN {} | YOU ARE {} ===\n\n",
        view.current_turn,
        view.player_name.to_uppercase()
    ));

    render_units(&mut output, view);

    output.push_str("BOARD (B=blue Y=yellow A=gray G=green, ?=fog, *=resource, o=claimed):\n");
    output.push_str(&render_grid(&view.board, Palette::Plain));
    output.push('\n');

    render_players(&mut output, view);
    render_resources(&mut output, view);
    render_diplomacy(&mut output, view);

    output
}

fn render_units(output: &mut String, view: &PlayerView) {
    output.push_str(&format!("YOUR UNITS: {} total\n", view.my_units));
    for (coord, count) in view.own_stacks() {
        output.push_str(&format!("- {coord}: {count}\n"));
    }
    let can_lie = if view.can_lie { "yes" } else { "no" };
    output.push_str(&format!(
        "LIES: {} used, another lie would be counted: {can_lie}\n\n",
        view.my_lies
    ));
}

fn render_players(output: &mut String, view: &PlayerView) {
    output.push_str("PLAYERS:\n");
    for player in &view.players {
        let you = if player.id == view.player_id { " (you)" } else { "" };
        if player.is_alive {
            output.push_str(&format!("- {}: {} units{you}\n", player.name, player.units));
        } else {
            output.push_str(&format!("- {}: eliminated{you}\n", player.name));
        }
    }
    output.push('\n');
}

fn render_resources(output: &mut String, view: &PlayerView) {
    output.push_str("RESOURCES:\n");
    for cell in view.board.iter().flatten().filter(|c| c.resource) {
        let state = if cell.depleted { "claimed" } else { "available" };
        output.push_str(&format!("- {}: {state}\n", Coord::new(cell.x, cell.y)));
    }
    output.push('\n');
}

fn render_diplomacy(output: &mut String, view: &PlayerView) {
    output.push_str(&format!("DIPLOMACY (last {DIPLOMACY_WINDOW}):\n"));
    let history = &view.diplomacy_history;
    if history.is_empty() {
        output.push_str("- none\n");
        return;
    }

    let skip = history.len().saturating_sub(DIPLOMACY_WINDOW);
    for record in &history[skip..] {
        let (from, to) = match record.kind {
            RecordKind::Sent => ("you".to_string(), record.to.name().to_string()),
            RecordKind::Received => (record.from.name().to_string(), "you".to_string()),
        };
        output.push_str(&format!(
            "- [turn {}] {from} -> {to}: {:?}\n",
            record.turn, record.content
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{DiplomaticMessage, GameState, Move, PlayerId};

    #[test]
    fn test_initial_view() {
        let mut game = GameState::default();
        game.start().unwrap();
        let text = render_llm(&game.player_view(PlayerId::Yellow));

        assert!(text.starts_with("=== TURN 0 | YOU ARE YELLOW ===\n"));
        assert!(text.contains("YOUR UNITS: 10 total\n- (9,0): 10\n"));
        assert!(text.contains("another lie would be counted: yes"));
        assert!(text.contains("- Yellow: 10 units (you)\n"));
        assert!(text.contains("- (4,4): available\n"));
        assert!(text.contains("DIPLOMACY (last 10):\n- none\n"));
        // Blue's home is fogged for yellow
        assert!(!text.contains("B10"));
    }

    #[test]
    fn test_diplomacy_window() {
        let mut game = GameState::default();
        game.start().unwrap();
        for round in 0..12 {
            let message = [DiplomaticMessage::new(PlayerId::Yellow, format!("note {round}"))];
            game.make_move(PlayerId::Blue, &[], &message).unwrap();
            for _ in 0..4 {
                game.advance();
            }
        }

        let text = render_llm(&game.player_view(PlayerId::Yellow));
        assert!(!text.contains("\"note 1\""));
        assert!(text.contains("- [turn 2] Blue -> you: \"note 2\"\n"));
        assert!(text.contains("\"note 11\""));
    }

    #[test]
    fn test_claimed_resource_and_own_moves() {
        let mut game = GameState::default();
        game.start().unwrap();
        game.board.set_units(Coord::new(0, 0), PlayerId::Blue, 0);
        game.board.set_units(Coord::new(4, 3), PlayerId::Blue, 10);
        game.make_move(PlayerId::Blue, &[Move::new(Coord::new(4, 3), Coord::new(4, 4), 10)], &[])
            .unwrap();

        let text = render_llm(&game.player_view(PlayerId::Blue));
        assert!(text.contains("- (4,4): claimed\n"));
        assert!(text.contains("YOUR UNITS: 11 total\n"));
    }
}
