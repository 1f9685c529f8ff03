//! Tournament command implementation.

#![allow(clippy::cast_precision_loss)]

use std::time::Instant;

use grid_conquest::driver::{lineup, run_game};
use grid_conquest::game::NullSink;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use tracing::warn;

use super::output::{
    JsonTournamentResult, TournamentStats, format_tournament_csv, format_tournament_text,
};
use super::{CliError, GameArgs, TournamentFormat, lineup_names};

/// Execute the tournament command.
///
/// Game `i` uses seed `base + i`, so any game can be replayed on its own
/// with `run --seed`.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or the result cannot
/// be serialized.
pub(crate) fn execute(
    args: &GameArgs,
    games: u64,
    threads: Option<usize>,
    format: TournamentFormat,
    progress: bool,
) -> Result<(), CliError> {
    let config = args.config()?;
    let kinds = args.lineup()?;
    let names = lineup_names(&kinds);

    // Set thread pool size if specified
    if let Some(num_threads) = threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .ok(); // Ignore error if already initialized
    }

    let pb = if progress {
        let pb = ProgressBar::new(games);
        let style = ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} games ({per_sec})",
            )
            .map_err(|e| CliError::new(format!("invalid progress template: {e}")))?
            .progress_chars("=>-");
        pb.set_style(style);
        Some(pb)
    } else {
        None
    };

    let start = Instant::now();
    let base_seed = config.driver.seed;

    // Each thread accumulates its own stats, merged at the end
    let stats = (0..games)
        .into_par_iter()
        .fold(TournamentStats::default, |mut local, i| {
            let mut game_config = config;
            game_config.driver.seed = base_seed.wrapping_add(i);
            let mut sources = lineup(&kinds, game_config.driver.seed);

            match run_game(&game_config, &mut sources, &mut NullSink) {
                Ok(result) => local.add_result(&result),
                Err(err) => {
                    warn!(seed = game_config.driver.seed, %err, "game failed");
                    local.errors += 1;
                }
            }
            if let Some(pb) = &pb {
                pb.inc(1);
            }
            local
        })
        .reduce(TournamentStats::default, |mut a, b| {
            a.merge(&b);
            a
        });

    if let Some(pb) = pb {
        pb.finish_with_message("done");
    }

    let duration = start.elapsed();
    let games_per_sec = if duration.as_secs_f64() > 0.0 {
        stats.games_played as f64 / duration.as_secs_f64()
    } else {
        0.0
    };

    match format {
        TournamentFormat::Text => {
            println!();
            print!("{}", format_tournament_text(&stats, &names));
            println!();
            println!(
                "Duration: {:.2}s ({:.0} games/sec)",
                duration.as_secs_f64(),
                games_per_sec
            );
        }
        TournamentFormat::Json => {
            let json_result = JsonTournamentResult::from_stats(&stats, &names);
            println!("{}", serde_json::to_string_pretty(&json_result)?);
        }
        TournamentFormat::Csv => {
            print!("{}", format_tournament_csv(&stats, &names));
        }
    }

    Ok(())
}
