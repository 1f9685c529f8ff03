//! Grid Conquest CLI - play games between built-in decision sources.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod cli;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};
use grid_conquest::PlayerId;
use tracing_subscriber::EnvFilter;

/// Grid Conquest - a four-player conquest game with fog of war and diplomacy
#[derive(Parser, Debug)]
#[command(name = "grid-conquest")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Play a single game
    Run {
        #[command(flatten)]
        game: cli::GameArgs,

        /// Output format: text, json, or llm
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,

        /// Show the final board from one player's point of view
        #[arg(long)]
        view: Option<PlayerId>,

        /// Record every game event to this file as JSON lines
        #[arg(long)]
        events: Option<PathBuf>,

        /// Only print the result
        #[arg(short, long)]
        quiet: bool,
    },

    /// Run many games in parallel and aggregate statistics
    Tournament {
        #[command(flatten)]
        game: cli::GameArgs,

        /// Number of games to run
        #[arg(short, long, default_value = "1000")]
        games: u64,

        /// Parallel threads (default: CPU count)
        #[arg(short = 'j', long)]
        threads: Option<usize>,

        /// Output format: text, json, or csv
        #[arg(short, long, default_value = "text")]
        format: cli::TournamentFormat,

        /// Show progress bar
        #[arg(long)]
        progress: bool,
    },

    /// Print the effective configuration as JSON
    ShowConfig {
        #[command(flatten)]
        game: cli::GameArgs,
    },
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    let result = match args.command {
        Commands::Run {
            game,
            format,
            view,
            events,
            quiet,
        } => cli::run::execute(&game, format, view, events.as_deref(), quiet),

        Commands::Tournament {
            game,
            games,
            threads,
            format,
            progress,
        } => cli::tournament::execute(&game, games, threads, format, progress),

        Commands::ShowConfig { game } => cli::show_config::execute(&game),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
