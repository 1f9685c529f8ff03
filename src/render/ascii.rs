//! Grid renderer for terminals.

use crate::game::{BOARD_SIZE, BoardView, GameState, GameStatus, PlayerId, VisibleCell};

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";

/// Whether to emit ANSI colour codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Palette {
    /// Plain text.
    #[default]
    Plain,
    /// ANSI colours per player.
    Ansi,
}

impl Palette {
    const fn player(self, player: PlayerId) -> &'static str {
        match self {
            Self::Plain => "",
            Self::Ansi => match player {
                PlayerId::Blue => "\x1b[34m",
                PlayerId::Yellow => "\x1b[33m",
                PlayerId::Gray => "\x1b[37m",
                PlayerId::Green => "\x1b[32m",
            },
        }
    }

    const fn dim(self) -> &'static str {
        match self {
            Self::Plain => "",
            Self::Ansi => DIM,
        }
    }

    const fn bold(self) -> &'static str {
        match self {
            Self::Plain => "",
            Self::Ansi => BOLD,
        }
    }

    const fn reset(self) -> &'static str {
        match self {
            Self::Plain => "",
            Self::Ansi => RESET,
        }
    }
}

/// Render the whole board with nothing hidden.
///
/// Output format:
/// ```text
/// Turn 3 | running | blue to move
///       0   1   2   3   4   5   6   7   8   9
///   0 B10   .   .   .   .   .   .   .   . Y10
///   ...
///   4   .   .   .   .   *   *   .   .   .   .
///   ...
///
/// Legend: B=blue Y=yellow A=gray G=green  *=resource  o=claimed resource
/// blue: 10 units, 0 lies
/// ```
#[must_use]
pub fn render_ascii(state: &GameState) -> String {
    render_ascii_with(state, Palette::Plain)
}

/// [`render_ascii`] with a choice of palette.
#[must_use]
pub fn render_ascii_with(state: &GameState, palette: Palette) -> String {
    let mut output = String::new();
    render_header(&mut output, state, None);
    output.push_str(&render_grid(&state.spectator_board(), palette));
    render_footer(&mut output, state, palette);
    output
}

/// Render the board as `player` sees it.
///
/// Fogged cells are `?`. Resource cells are always shown.
#[must_use]
pub fn render_fog(state: &GameState, player: PlayerId) -> String {
    render_fog_with(state, player, Palette::Plain)
}

/// [`render_fog`] with a choice of palette.
#[must_use]
pub fn render_fog_with(state: &GameState, player: PlayerId, palette: Palette) -> String {
    let mut output = String::new();
    render_header(&mut output, state, Some(player));
    output.push_str(&render_grid(&state.visible_board(player), palette));
    render_footer(&mut output, state, palette);
    output
}

fn render_header(output: &mut String, state: &GameState, viewer: Option<PlayerId>) {
    output.push_str(&format!("Turn {} | {}", state.current_turn(), state.status()));
    if let Some(player) = state.current_player()
        && !state.status().is_finished()
    {
        output.push_str(&format!(" | {player} to move"));
    }
    if let Some(viewer) = viewer {
        output.push_str(&format!(" | view of {viewer}"));
    }
    output.push('\n');
}

/// Render the grid of a snapshot, one row per line with a coordinate frame.
pub(crate) fn render_grid(board: &BoardView, palette: Palette) -> String {
    let mut output = String::from("    ");
    for x in 0..BOARD_SIZE {
        output.push_str(&format!("{x:>4}"));
    }
    output.push('\n');

    for (y, row) in board.iter().enumerate() {
        output.push_str(&format!("{y:>4}"));
        for cell in row {
            render_cell(&mut output, cell, palette);
        }
        output.push('\n');
    }
    output
}

fn render_cell(output: &mut String, cell: &VisibleCell, palette: Palette) {
    if !cell.visible {
        output.push_str(&format!("{}{:>4}{}", palette.dim(), '?', palette.reset()));
        return;
    }
    if let Some(stack) = cell.units.first() {
        let count = if stack.count > 99 {
            "++".to_string()
        } else {
            stack.count.to_string()
        };
        let token = format!("{}{count}", stack.player.symbol());
        output.push_str(&format!(
            "{}{token:>4}{}",
            palette.player(stack.player),
            palette.reset()
        ));
        return;
    }
    let symbol = match (cell.resource, cell.depleted) {
        (true, false) => '*',
        (true, true) => 'o',
        _ => '.',
    };
    output.push_str(&format!("{symbol:>4}"));
}

fn render_footer(output: &mut String, state: &GameState, palette: Palette) {
    output.push_str("\nLegend: B=blue Y=yellow A=gray G=green  *=resource  o=claimed resource\n");
    for player in state.players() {
        let color = palette.player(player.id);
        let reset = palette.reset();
        if player.is_alive() {
            output.push_str(&format!(
                "{color}{}{reset}: {} units, {} lies\n",
                player.id, player.units, player.lies
            ));
        } else {
            output.push_str(&format!("{color}{}{reset}: eliminated\n", player.id));
        }
    }
    if let GameStatus::Finished(outcome) = state.status() {
        output.push_str(&format!("{}{outcome}{}\n", palette.bold(), palette.reset()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Coord, Move};

    #[test]
    fn test_initial_board() {
        let game = GameState::default();
        let text = render_ascii(&game);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Turn 0 | waiting | blue to move");
        assert_eq!(lines[2], "   0 B10   .   .   .   .   .   .   .   . Y10");
        assert_eq!(lines[6], "   4   .   .   .   .   *   *   .   .   .   .");
        assert_eq!(lines[11], "   9 A10   .   .   .   .   .   .   .   . G10");
        assert!(text.contains("gray: 10 units, 0 lies"));
        assert!(!text.contains('\x1b'));
    }

    #[test]
    fn test_fog_hides_enemies() {
        let game = GameState::default();
        let text = render_fog(&game, PlayerId::Blue);
        let lines: Vec<&str> = text.lines().collect();

        assert!(lines[0].ends_with("view of blue"));
        assert_eq!(lines[2], "   0 B10   .   ?   ?   ?   ?   ?   ?   ?   ?");
        // Resources show through the fog
        assert!(lines[6].contains('*'));
        assert!(!text.contains("Y10"));
    }

    #[test]
    fn test_depleted_resource_marker() {
        let mut game = GameState::default();
        game.board.mark_depleted(Coord::new(4, 4));
        let text = render_ascii(&game);
        assert_eq!(
            text.lines().nth(6),
            Some("   4   .   .   .   .   o   *   .   .   .   .")
        );
    }

    #[test]
    fn test_ansi_palette() {
        let mut game = GameState::default();
        game.start().unwrap();
        game.make_move(PlayerId::Blue, &[Move::new(Coord::new(0, 0), Coord::new(1, 0), 2)], &[])
            .unwrap();
        let text = render_ascii_with(&game, Palette::Ansi);
        assert!(text.contains("\x1b[34m  B8\x1b[0m"));
        assert!(text.contains("\x1b[34m  B2\x1b[0m"));
    }
}
