#![no_main]

use arbitrary::Arbitrary;
use grid_conquest::game::{
    Board, Coord, PlayerId, apply_captures, process_attack, reinforce, validate_moves,
};
use grid_conquest::{EngineConfig, Move};
use libfuzzer_sys::fuzz_target;

/// Structured input for combat fuzzing.
#[derive(Arbitrary, Debug)]
struct CombatInput {
    /// Attacker stack size.
    attacker: u32,
    /// Defender stack sizes, one per other player.
    defenders: [u32; 3],
    /// Units to send.
    attack_count: u32,
    /// Attacker cell (for boundary testing).
    x: u8,
    /// Attacker cell (for boundary testing).
    y: u8,
    /// Bonus reinforcing the attacker's home afterwards.
    reinforcement: u16,
}

fuzz_target!(|input: CombatInput| {
    let attacker = input.attacker.min(1_000_000);
    let attack_count = input.attack_count.min(attacker);
    if attack_count == 0 {
        return;
    }

    let from = Coord::new(u16::from(input.x % 9), u16::from(input.y % 10));
    let to = Coord::new(from.x + 1, from.y);

    let mut board = Board::new();
    board.set_units(from, PlayerId::Blue, attacker);
    let enemies = [PlayerId::Yellow, PlayerId::Gray, PlayerId::Green];
    for (player, count) in enemies.into_iter().zip(input.defenders) {
        board.set_units(to, player, count.min(1_000_000));
    }
    let before: u64 = PlayerId::ALL
        .iter()
        .map(|&p| u64::from(board.total_units(p)))
        .sum();

    let valid = validate_moves(&board, PlayerId::Blue, &[Move::new(from, to, attack_count)]);
    assert_eq!(valid.len(), 1, "adjacent move with enough units must validate");
    let result = process_attack(&mut board, PlayerId::Blue, valid[0]);

    assert_eq!(board.units_at(from, PlayerId::Blue), attacker - attack_count);
    assert_eq!(board.units_at(to, PlayerId::Blue), result.units_at_destination);
    let cell = board.get(to).unwrap();
    assert!(cell.stacks().count() <= 1, "two players left on {to}");

    let after: u64 = PlayerId::ALL
        .iter()
        .map(|&p| u64::from(board.total_units(p)))
        .sum();
    assert!(after <= before, "combat created units: {before} -> {after}");

    let grants = apply_captures(
        &mut board,
        PlayerId::Blue,
        to,
        result.units_at_destination,
        &EngineConfig::default(),
    );
    for grant in &grants {
        assert!(grant.landed <= grant.bonus);
    }

    let _ = reinforce(&mut board, PlayerId::Blue, u32::from(input.reinforcement));
    let home = board.get(PlayerId::Blue.home()).unwrap();
    assert!(home.stacks().count() <= 1);
});
