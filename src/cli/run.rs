//! Run command implementation.

use std::fs::File;
use std::io::{BufWriter, IsTerminal, Write};
use std::path::Path;

use grid_conquest::driver::{GameResult, lineup, play_game};
use grid_conquest::game::{EventSink, GameEvent, JsonLinesSink, TracingSink};
use grid_conquest::render::{Palette, render_ascii_with, render_fog_with, render_llm};
use grid_conquest::{GameState, PlayerId};
use tracing::warn;

use super::output::format_text;
use super::{CliError, GameArgs, OutputFormat, lineup_names};

/// Logs every event and optionally records it as JSON lines.
struct CliSink {
    log: TracingSink,
    file: Option<JsonLinesSink<BufWriter<File>>>,
}

impl EventSink for CliSink {
    fn emit(&mut self, event: &GameEvent) {
        self.log.emit(event);
        if let Some(file) = &mut self.file {
            file.emit(event);
        }
    }
}

/// Execute the run command.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, the event file cannot
/// be written or the result cannot be serialized.
pub(crate) fn execute(
    args: &GameArgs,
    format: OutputFormat,
    view: Option<PlayerId>,
    events: Option<&Path>,
    quiet: bool,
) -> Result<(), CliError> {
    let config = args.config()?;
    let kinds = args.lineup()?;
    let names = lineup_names(&kinds);

    let file = match events {
        Some(path) => {
            let file = File::create(path).map_err(|e| {
                CliError::new(format!("Failed to create {}: {e}", path.display()))
            })?;
            Some(JsonLinesSink::new(BufWriter::new(file)))
        }
        None => None,
    };
    let mut sink = CliSink {
        log: TracingSink,
        file,
    };

    if !quiet && format == OutputFormat::Text {
        println!("Running game with seed {}...", config.driver.seed);
        println!("Players: {}", names.join(", "));
        println!();
    }

    let mut sources = lineup(&kinds, config.driver.seed);
    let (result, game) = play_game(&config, &mut sources, &mut sink)?;

    if let Some(file) = sink.file {
        if file.failures() > 0 {
            warn!(failures = file.failures(), "some events could not be recorded");
        }
        file.into_inner().flush()?;
    }

    match format {
        OutputFormat::Text => print_text(&result, &game, view, quiet),
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        OutputFormat::Llm => {
            let player = view
                .or(result.winner)
                .or_else(|| game.current_player())
                .unwrap_or(PlayerId::Blue);
            println!("{}", render_llm(&game.player_view(player)));
        }
    }

    Ok(())
}

fn print_text(result: &GameResult, game: &GameState, view: Option<PlayerId>, quiet: bool) {
    if !quiet {
        let palette = if std::io::stdout().is_terminal() {
            Palette::Ansi
        } else {
            Palette::Plain
        };
        let board = match view {
            Some(player) => render_fog_with(game, player, palette),
            None => render_ascii_with(game, palette),
        };
        println!("{board}");
    }
    print!("{}", format_text(result));
}
