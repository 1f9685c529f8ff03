#![no_main]

//! Full game turn fuzzer.
//!
//! Drives a game from the standard opening with arbitrary moves and
//! messages, exercising validation, combat, captures, fog, diplomacy and
//! termination together. Catches integration bugs the combat fuzzer misses.

use std::sync::Arc;

use arbitrary::Arbitrary;
use grid_conquest::game::{ClaimChecker, check_invariants};
use grid_conquest::{DiplomaticMessage, GameState, Move};
use libfuzzer_sys::fuzz_target;

/// A fuzzer-generated move with possibly hostile coordinates.
#[derive(Arbitrary, Debug, Clone, Copy)]
struct FuzzMove {
    from_x: i8,
    from_y: i8,
    to_x: i8,
    to_y: i8,
    count: u8,
}

/// A fuzzer-generated message.
#[derive(Arbitrary, Debug, Clone)]
struct FuzzMessage {
    to: String,
    content: String,
}

/// One player's turn.
#[derive(Arbitrary, Debug)]
struct FuzzTurn {
    moves: Vec<FuzzMove>,
    messages: Vec<FuzzMessage>,
    /// Pause and resume before moving.
    pause: bool,
}

fuzz_target!(|turns: Vec<FuzzTurn>| {
    let Ok(checker) = ClaimChecker::new() else {
        return;
    };
    let mut game = GameState::default().with_analyzer(Arc::new(checker));
    if game.start().is_err() {
        return;
    }

    for turn in turns.into_iter().take(64) {
        let Some(player) = game.current_player() else {
            break;
        };
        if turn.pause {
            game.pause().unwrap();
            game.resume().unwrap();
        }

        let moves: Vec<Move> = turn
            .moves
            .iter()
            .take(10)
            .map(|m| Move {
                from_x: i32::from(m.from_x),
                from_y: i32::from(m.from_y),
                to_x: i32::from(m.to_x),
                to_y: i32::from(m.to_y),
                unit_count: u32::from(m.count),
            })
            .collect();
        let messages: Vec<DiplomaticMessage> = turn
            .messages
            .into_iter()
            .take(4)
            .map(|m| DiplomaticMessage {
                to: m.to,
                content: m.content,
                is_lie: false,
            })
            .collect();

        let report = game.make_move(player, &moves, &messages).unwrap();
        assert_eq!(report.moves_executed + report.moves_rejected, moves.len());

        let violations = check_invariants(&game);
        assert!(violations.is_empty(), "invariants violated: {violations:?}");
        game.take_events();

        if game.advance().is_none() {
            break;
        }
    }
});
