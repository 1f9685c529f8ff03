//! Benchmarks for the engine primitives.

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use std::hint::black_box;

use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use grid_conquest::EngineConfig;
use grid_conquest::game::{
    Board, ClaimChecker, ClaimContext, Coord, DiplomacyAnalyzer, GameState, Move, PlayerId,
    update_visibility, visible_board,
};
use grid_conquest::render::render_llm;

/// A crowded mid-game position: every player holds a line of stacks, blue
/// facing yellow and gray facing green.
fn crowded_board() -> Board {
    let mut board = Board::new();
    for (player, row) in PlayerId::ALL.into_iter().zip([2, 3, 6, 7]) {
        for x in 0..10 {
            board.set_units(Coord::new(x, row), player, 5 + u32::from(x));
        }
    }
    board
}

fn bench_visibility(c: &mut Criterion) {
    let mut board = crowded_board();
    c.bench_function("update_visibility", |b| {
        b.iter(|| update_visibility(black_box(&mut board)));
    });
}

fn bench_player_view(c: &mut Criterion) {
    let game = GameState::from_board(EngineConfig::default(), crowded_board());
    c.bench_function("player_view", |b| {
        b.iter(|| black_box(game.player_view(black_box(PlayerId::Gray))));
    });
    c.bench_function("visible_board", |b| {
        b.iter(|| black_box(visible_board(game.board(), black_box(PlayerId::Green))));
    });
    let view = game.player_view(PlayerId::Blue);
    c.bench_function("render_llm", |b| {
        b.iter(|| black_box(render_llm(black_box(&view))));
    });
}

fn bench_make_move(c: &mut Criterion) {
    // Blue's whole line steps down into yellow's line
    let moves: Vec<Move> = (0..10)
        .map(|x| Move::new(Coord::new(x, 2), Coord::new(x, 3), 5 + u32::from(x)))
        .collect();

    c.bench_function("make_move_10_battles", |b| {
        b.iter_batched(
            || {
                let mut game = GameState::from_board(EngineConfig::default(), crowded_board());
                game.start().unwrap();
                game
            },
            |mut game| {
                let report = game.make_move(PlayerId::Blue, black_box(&moves), &[]);
                black_box(report)
            },
            BatchSize::SmallInput,
        );
    });
}

fn bench_claim_checker(c: &mut Criterion) {
    let checker = ClaimChecker::new().unwrap();
    let game = GameState::default();
    let ctx = ClaimContext {
        sender: game.player(PlayerId::Blue),
        receiver: game.player(PlayerId::Yellow),
        board: game.board(),
    };
    let message = "I have 25 units. (5,5) is empty, come and take it. We have 80 troops waiting.";

    c.bench_function("claim_checker", |b| {
        b.iter(|| black_box(checker.analyze(black_box(message), &ctx)));
    });
}

criterion_group!(
    benches,
    bench_visibility,
    bench_player_view,
    bench_make_move,
    bench_claim_checker
);
criterion_main!(benches);
