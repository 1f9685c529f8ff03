//! Output formatting utilities for CLI.

#![allow(clippy::cast_precision_loss)]

use grid_conquest::driver::GameResult;
use grid_conquest::game::PLAYER_COUNT;
use grid_conquest::{Outcome, PlayerId};
use serde::Serialize;

/// Format a game result as human-readable text.
pub(super) fn format_text(result: &GameResult) -> String {
    let mut output = String::new();

    output.push_str(&format!("Game Result (seed: {})\n", result.seed));
    match result.outcome {
        Some(Outcome::Winner(winner)) => {
            output.push_str(&format!("  Winner: {}\n", winner.name()));
        }
        Some(Outcome::Draw) => output.push_str("  Result: Draw (nobody survived)\n"),
        None => output.push_str("  Result: stopped at the turn limit\n"),
    }
    output.push_str(&format!("  Turns: {}\n\n", result.turns_played));

    for player in &result.players {
        output.push_str(&format!(
            "  {:<7} {:>4} units, {} lies ({})",
            player.id.name(),
            player.units,
            player.lies,
            player.source
        ));
        if let Some(turn) = player.eliminated_turn {
            output.push_str(&format!(" [eliminated turn {turn}]"));
        }
        output.push('\n');
    }

    let c = &result.counters;
    output.push_str(&format!(
        "\n  {} moves ({} rejected), {} battles, {} captures, {} messages, {} lies\n",
        c.moves, c.rejected_moves, c.battles, c.captures, c.messages, c.lies
    ));

    output
}

/// Tournament statistics for aggregated results.
#[derive(Debug, Default, Clone)]
pub(super) struct TournamentStats {
    /// Total games played.
    pub(super) games_played: u64,
    /// Games that failed to run.
    pub(super) errors: u64,
    /// Win count per player.
    pub(super) wins: [u64; PLAYER_COUNT],
    /// Games where nobody survived.
    pub(super) draws: u64,
    /// Games stopped at the turn limit.
    pub(super) unfinished: u64,
    /// Units left at the end, summed per player.
    total_units: [u64; PLAYER_COUNT],
    /// Eliminations per player.
    eliminations: [u64; PLAYER_COUNT],
    /// Total turns across all games.
    total_turns: u64,
    /// Total battles across all games.
    total_battles: u64,
    /// Total counted lies across all games.
    total_lies: u64,
}

impl TournamentStats {
    /// Add a game result to the stats.
    pub(super) fn add_result(&mut self, result: &GameResult) {
        self.games_played += 1;
        self.total_turns += u64::from(result.turns_played);
        self.total_battles += result.counters.battles as u64;
        self.total_lies += result.counters.lies as u64;

        match result.outcome {
            Some(Outcome::Winner(winner)) => self.wins[winner.index()] += 1,
            Some(Outcome::Draw) => self.draws += 1,
            None => self.unfinished += 1,
        }

        for player in &result.players {
            let idx = player.id.index();
            self.total_units[idx] += u64::from(player.units);
            if player.eliminated_turn.is_some() {
                self.eliminations[idx] += 1;
            }
        }
    }

    /// Merge stats gathered on another thread.
    pub(super) fn merge(&mut self, other: &Self) {
        self.games_played += other.games_played;
        self.errors += other.errors;
        self.draws += other.draws;
        self.unfinished += other.unfinished;
        self.total_turns += other.total_turns;
        self.total_battles += other.total_battles;
        self.total_lies += other.total_lies;
        for (mine, theirs) in [
            (&mut self.wins, &other.wins),
            (&mut self.total_units, &other.total_units),
            (&mut self.eliminations, &other.eliminations),
        ] {
            for (a, b) in mine.iter_mut().zip(theirs) {
                *a += b;
            }
        }
    }

    fn per_game(&self, total: u64) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        total as f64 / self.games_played as f64
    }

    /// Win rate for a player (0.0-1.0).
    pub(super) fn win_rate(&self, player: PlayerId) -> f64 {
        self.per_game(self.wins[player.index()])
    }

    /// Average units left at the end of a game.
    pub(super) fn avg_units(&self, player: PlayerId) -> f64 {
        self.per_game(self.total_units[player.index()])
    }

    /// Fraction of games in which the player was eliminated.
    pub(super) fn elimination_rate(&self, player: PlayerId) -> f64 {
        self.per_game(self.eliminations[player.index()])
    }

    /// Average game length.
    pub(super) fn avg_turns(&self) -> f64 {
        self.per_game(self.total_turns)
    }
}

/// JSON-serializable tournament result.
#[derive(Debug, Serialize)]
pub(super) struct JsonTournamentResult {
    games_played: u64,
    errors: u64,
    draws: u64,
    unfinished: u64,
    avg_turns: f64,
    avg_battles: f64,
    avg_lies: f64,
    players: Vec<JsonTournamentPlayer>,
}

/// JSON-serializable per-player tournament stats.
#[derive(Debug, Serialize)]
pub(super) struct JsonTournamentPlayer {
    player: PlayerId,
    source: String,
    wins: u64,
    win_rate: f64,
    avg_units: f64,
    elimination_rate: f64,
}

impl JsonTournamentResult {
    /// Create from stats and source names.
    pub(super) fn from_stats(stats: &TournamentStats, sources: &[String]) -> Self {
        let players = PlayerId::ALL
            .iter()
            .map(|&id| JsonTournamentPlayer {
                player: id,
                source: sources.get(id.index()).cloned().unwrap_or_default(),
                wins: stats.wins[id.index()],
                win_rate: stats.win_rate(id),
                avg_units: stats.avg_units(id),
                elimination_rate: stats.elimination_rate(id),
            })
            .collect();

        Self {
            games_played: stats.games_played,
            errors: stats.errors,
            draws: stats.draws,
            unfinished: stats.unfinished,
            avg_turns: stats.avg_turns(),
            avg_battles: stats.per_game(stats.total_battles),
            avg_lies: stats.per_game(stats.total_lies),
            players,
        }
    }
}

/// Format tournament stats as human-readable text.
pub(super) fn format_tournament_text(stats: &TournamentStats, sources: &[String]) -> String {
    let mut output = String::new();

    output.push_str(&format!("Tournament Results ({} games)\n", stats.games_played));
    output.push_str("========================================\n\n");

    output.push_str("Win Rates:\n");
    for id in PlayerId::ALL {
        let name = sources.get(id.index()).map_or("unknown", String::as_str);
        output.push_str(&format!(
            "  {:<7} ({name}): {:.1}% ({} wins), avg {:.1} units, eliminated in {:.1}%\n",
            id.name(),
            stats.win_rate(id) * 100.0,
            stats.wins[id.index()],
            stats.avg_units(id),
            stats.elimination_rate(id) * 100.0
        ));
    }
    output.push_str(&format!(
        "  Draws: {} ({:.1}%)\n  Turn limit reached: {} ({:.1}%)\n\n",
        stats.draws,
        stats.per_game(stats.draws) * 100.0,
        stats.unfinished,
        stats.per_game(stats.unfinished) * 100.0
    ));

    output.push_str(&format!("Average Game Length: {:.0} turns\n", stats.avg_turns()));
    output.push_str(&format!(
        "Average Battles: {:.1}, Average Lies: {:.2}\n",
        stats.per_game(stats.total_battles),
        stats.per_game(stats.total_lies)
    ));
    if stats.errors > 0 {
        output.push_str(&format!("Failed games: {}\n", stats.errors));
    }

    output
}

/// Format tournament stats as CSV.
pub(super) fn format_tournament_csv(stats: &TournamentStats, sources: &[String]) -> String {
    let mut output = String::new();

    output.push_str("player,source,wins,win_rate,avg_units,elimination_rate\n");
    for id in PlayerId::ALL {
        output.push_str(&format!(
            "{},{},{},{:.4},{:.2},{:.4}\n",
            id,
            sources.get(id.index()).map_or("unknown", String::as_str),
            stats.wins[id.index()],
            stats.win_rate(id),
            stats.avg_units(id),
            stats.elimination_rate(id)
        ));
    }

    output
}
