//! Extended fuzzing tests for untrusted input at the decision boundary.
//!
//! Run with: PROPTEST_CASES=100000 cargo test --release fuzz_driver

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use proptest::prelude::*;

use grid_conquest::driver::{Decision, Driver, Submission};
use grid_conquest::game::{
    ClaimChecker, ClaimContext, DiplomacyAnalyzer, PLAYER_COUNT, check_invariants,
};
use grid_conquest::render::{render_ascii, render_fog, render_llm};
use grid_conquest::{Config, Coord, DiplomaticMessage, DriverConfig, GameState, Move, PlayerId};

fn any_move() -> impl Strategy<Value = Move> {
    (-3i32..13, -3i32..13, -3i32..13, -3i32..13, 0u32..30).prop_map(
        |(from_x, from_y, to_x, to_y, unit_count)| Move {
            from_x,
            from_y,
            to_x,
            to_y,
            unit_count,
        },
    )
}

fn any_message() -> impl Strategy<Value = DiplomaticMessage> {
    (
        prop_oneof![
            Just("blue".to_string()),
            Just("Yellow".to_string()),
            Just(" gray ".to_string()),
            Just("green".to_string()),
            "[a-z]{0,8}",
        ],
        ".{0,300}",
        any::<bool>(),
    )
        .prop_map(|(to, content, is_lie)| DiplomaticMessage { to, content, is_lie })
}

fn any_decision() -> impl Strategy<Value = Decision> {
    (
        prop::collection::vec(any_move(), 0..8),
        prop::collection::vec(any_message(), 0..8),
    )
        .prop_map(|(moves, diplomacy)| Decision {
            moves,
            diplomacy,
            reasoning: None,
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(2000))]

    /// Arbitrary text never panics the decision parser.
    #[test]
    fn fuzz_decision_json(json in ".{0,200}") {
        let _ = Decision::from_json(&json);
    }

    /// Structurally valid JSON with hostile values parses or fails cleanly.
    #[test]
    fn fuzz_decision_fields(
        from_x in any::<i64>(),
        to_y in any::<i64>(),
        count in any::<i64>(),
        to in "[a-zA-Z ]{0,10}",
    ) {
        let json = format!(
            r#"{{"moves":[{{"fromX":{from_x},"fromY":0,"toX":1,"toY":{to_y},"unitCount":{count}}}],
               "diplomacy":[{{"to":"{to}","content":"hi"}}]}}"#
        );
        if let Ok(decision) = Decision::from_json(&json) {
            prop_assert_eq!(decision.moves.len(), 1);
            prop_assert!(count >= 0);
        }
    }

    /// Sanitizing always respects the message limits.
    #[test]
    fn fuzz_sanitize_limits(
        decision in any_decision(),
        max_messages in 0usize..5,
        max_message_len in 0usize..50,
        from in 0usize..PLAYER_COUNT,
    ) {
        let config = DriverConfig {
            max_messages,
            max_message_len,
            ..DriverConfig::default()
        };
        let from = PlayerId::from_index(from).unwrap();
        let moves = decision.moves.len();
        let clean = decision.sanitize(from, &config);

        prop_assert_eq!(clean.moves.len(), moves);
        prop_assert!(clean.diplomacy.len() <= max_messages);
        for message in &clean.diplomacy {
            prop_assert!(message.content.chars().count() <= max_message_len);
            prop_assert!(!message.to.trim().eq_ignore_ascii_case(from.as_str()));
        }
    }

    /// Hostile decisions submitted through the driver keep the engine sound.
    #[test]
    fn fuzz_driver_submissions(decisions in prop::collection::vec(any_decision(), 1..40)) {
        let mut game = GameState::default();
        game.start().unwrap();
        let mut driver = Driver::new(game, DriverConfig::default());

        for decision in decisions {
            let Some((ticket, _)) = driver.request() else {
                break;
            };
            let submission = driver.submit(ticket, decision);
            prop_assert!(!matches!(submission, Submission::Stale));

            let violations = check_invariants(driver.game());
            prop_assert!(violations.is_empty(), "{:?}", violations);
        }

        // Rendering any reachable state never panics
        let game = driver.game();
        let _ = render_ascii(game);
        for player in PlayerId::ALL {
            let _ = render_fog(game, player);
            let _ = render_llm(&game.player_view(player));
        }
    }

    /// The claim checker handles arbitrary text.
    #[test]
    fn fuzz_claim_checker(content in ".{0,400}") {
        let checker = ClaimChecker::new().unwrap();
        let game = GameState::default();
        let ctx = ClaimContext {
            sender: game.player(PlayerId::Blue),
            receiver: game.player(PlayerId::Green),
            board: game.board(),
        };
        let check = checker.analyze(&content, &ctx);
        prop_assert_eq!(check.is_lie(), !check.detected_lies.is_empty());
    }

    /// Arbitrary config files load or fail with an error.
    #[test]
    fn fuzz_config_json(
        starting in any::<i64>(),
        bonus in any::<i64>(),
        max_turns in any::<i64>(),
        policy in "[a-z_]{0,15}",
    ) {
        let json = format!(
            r#"{{"engine":{{"starting_units":{starting},"resource_bonus":{bonus},"bonus_policy":"{policy}"}},
               "driver":{{"max_turns":{max_turns}}}}}"#
        );
        if let Ok(config) = Config::from_json(&json) {
            prop_assert!(config.validate().is_ok());
        }
    }

    /// Neighbours of board cells stay on the board and one step away.
    #[test]
    fn fuzz_coord_neighbors(x in 0u16..10, y in 0u16..10) {
        let coord = Coord::new(x, y);
        let neighbors: Vec<_> = coord.neighbors().collect();

        let expected = usize::from(x > 0) + usize::from(x < 9) + usize::from(y > 0) + usize::from(y < 9);
        prop_assert_eq!(neighbors.len(), expected);
        for n in neighbors {
            prop_assert!(n.x < 10 && n.y < 10);
            prop_assert_eq!(coord.manhattan(n), 1);
        }
    }

    /// Signed coordinates convert only when on the board.
    #[test]
    fn fuzz_coord_from_signed(x in any::<i32>(), y in any::<i32>()) {
        let on_board = (0..10).contains(&x) && (0..10).contains(&y);
        prop_assert_eq!(Coord::from_signed(x, y).is_some(), on_board);
    }
}
