//! Built-in decision sources.
//!
//! Sources only see the [`PlayerView`] they are handed, so they play under
//! the same fog of war as any external agent would.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::Decision;
use crate::game::{
    Coord, DiplomaticMessage, Move, PLAYER_COUNT, PlayerId, PlayerView, VisibleCell,
};

/// Anything that can choose a decision for the player to move.
pub trait DecisionSource {
    /// Short name used in results and logs.
    fn name(&self) -> &str;

    /// Choose a decision from what the player can see.
    fn decide(&mut self, view: &PlayerView) -> Decision;
}

/// Built-in source kinds selectable from the command line.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Random legal-looking moves and occasional chatter.
    Random,
    /// Deterministic attacker that goes for weak stacks, resources and bases.
    Greedy,
    /// Never moves.
    Passive,
}

impl SourceKind {
    /// Instantiate a source of this kind.
    #[must_use]
    pub fn build(self, seed: u64) -> Box<dyn DecisionSource + Send> {
        match self {
            Self::Random => Box::new(RandomSource::new(seed)),
            Self::Greedy => Box::new(GreedySource),
            Self::Passive => Box::new(PassiveSource),
        }
    }
}

/// Always passes.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassiveSource;

impl DecisionSource for PassiveSource {
    fn name(&self) -> &str {
        "passive"
    }

    fn decide(&mut self, _view: &PlayerView) -> Decision {
        Decision::pass()
    }
}

const CHATTER: [&str; 4] = [
    "Let us keep our borders quiet for now.",
    "I am watching the center closely.",
    "An alliance against the strongest player would serve us both.",
    "Stay out of my quadrant and I will stay out of yours.",
];

/// Moves random stacks to random neighbours.
///
/// Now and then it also tells another player how many units it has, and
/// inflates the number when a lie would still be counted.
#[derive(Debug, Clone)]
pub struct RandomSource {
    rng: StdRng,
}

impl RandomSource {
    /// Create a source with a fixed seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn message(&mut self, view: &PlayerView) -> Option<DiplomaticMessage> {
        let others: Vec<PlayerId> = view
            .players
            .iter()
            .filter(|p| p.is_alive && p.id != view.player_id)
            .map(|p| p.id)
            .collect();
        let &to = others.choose(&mut self.rng)?;

        if self.rng.gen_bool(0.5) {
            let &line = CHATTER.choose(&mut self.rng)?;
            return Some(DiplomaticMessage::new(to, line));
        }

        let bluff = view.can_lie && self.rng.gen_bool(0.3);
        let claimed = if bluff {
            view.my_units + self.rng.gen_range(5..=15)
        } else {
            view.my_units
        };
        let mut message = DiplomaticMessage::new(to, format!("I have {claimed} units."));
        message.is_lie = bluff;
        Some(message)
    }
}

impl DecisionSource for RandomSource {
    fn name(&self) -> &str {
        "random"
    }

    fn decide(&mut self, view: &PlayerView) -> Decision {
        let mut decision = Decision::pass();

        for (from, count) in view.own_stacks().collect::<Vec<_>>() {
            if !self.rng.gen_bool(0.6) {
                continue;
            }
            let neighbors: Vec<Coord> = from.neighbors().collect();
            let Some(&to) = neighbors.choose(&mut self.rng) else {
                continue;
            };
            let moved = self.rng.gen_range(1..=count);
            decision.moves.push(Move::new(from, to, moved));
        }

        if self.rng.gen_bool(0.15) {
            decision.diplomacy.extend(self.message(view));
        }
        decision
    }
}

/// Deterministic greedy attacker.
///
/// Every stack steps to its best neighbour: a weaker enemy stack first, then
/// an undefended enemy home, then an unclaimed resource, otherwise one step
/// closer to the nearest of those targets. One unit always stays home.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedySource;

const ATTACK_SCORE: u32 = 1000;
const BASE_SCORE: u32 = 900;
const RESOURCE_SCORE: u32 = 800;
const APPROACH_SCORE: u32 = 100;

impl GreedySource {
    fn enemy_strength(cell: &VisibleCell, me: PlayerId) -> u32 {
        cell.units
            .iter()
            .filter(|s| s.player != me)
            .map(|s| s.count)
            .sum()
    }

    fn targets(view: &PlayerView) -> Vec<Coord> {
        let me = view.player_id;
        let resources = view
            .board
            .iter()
            .flatten()
            .filter(|cell| cell.resource && !cell.depleted)
            .map(|cell| Coord::new(cell.x, cell.y));
        let homes = view
            .players
            .iter()
            .filter(|p| p.is_alive && p.id != me)
            .map(|p| p.id.home());
        resources.chain(homes).collect()
    }

    fn score(
        view: &PlayerView,
        from: Coord,
        to: Coord,
        strength: u32,
        targets: &[Coord],
    ) -> Option<u32> {
        let me = view.player_id;
        let cell = view.cell(to)?;
        let enemies = Self::enemy_strength(cell, me);
        if enemies > 0 {
            // Prefer the weakest stack we can beat
            return (strength > enemies).then(|| ATTACK_SCORE - enemies.min(99));
        }
        if PlayerId::home_owner(to).is_some_and(|owner| owner != me) {
            return Some(BASE_SCORE);
        }
        if cell.resource && !cell.depleted {
            return Some(RESOURCE_SCORE);
        }

        let nearest = |at: Coord| targets.iter().map(|t| at.manhattan(*t)).min();
        match (nearest(from), nearest(to)) {
            (Some(before), Some(after)) if after < before => {
                Some(APPROACH_SCORE - after.min(APPROACH_SCORE - 1))
            }
            _ => None,
        }
    }

    fn truce(view: &PlayerView) -> Option<DiplomaticMessage> {
        let me = view.player_id;
        let next = (1..=3)
            .filter_map(|step| PlayerId::from_index((me.index() + step) % PLAYER_COUNT))
            .find(|id| view.players.iter().any(|p| p.id == *id && p.is_alive))?;
        Some(DiplomaticMessage::new(
            next,
            format!(
                "{} proposes a truce with {}. Let us both look elsewhere.",
                me.name(),
                next.name()
            ),
        ))
    }
}

impl DecisionSource for GreedySource {
    fn name(&self) -> &str {
        "greedy"
    }

    fn decide(&mut self, view: &PlayerView) -> Decision {
        let me = view.player_id;
        let targets = Self::targets(view);
        let mut decision = Decision::pass();

        for (from, count) in view.own_stacks() {
            let strength = if from == me.home() { count - 1 } else { count };
            if strength == 0 {
                continue;
            }

            let mut best: Option<(u32, Coord)> = None;
            for to in from.neighbors() {
                if let Some(score) = Self::score(view, from, to, strength, &targets)
                    && best.is_none_or(|(top, _)| score > top)
                {
                    best = Some((score, to));
                }
            }
            if let Some((_, to)) = best {
                decision.moves.push(Move::new(from, to, strength));
            }
        }

        if view.current_turn > 0 && view.current_turn.is_multiple_of(5) {
            decision.diplomacy.extend(Self::truce(view));
        }
        decision
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GameState;

    fn view_for(game: &mut GameState, player: PlayerId) -> PlayerView {
        game.start().unwrap();
        game.player_view(player)
    }

    #[test]
    fn test_passive_passes() {
        let mut game = GameState::default();
        let view = view_for(&mut game, PlayerId::Blue);
        assert_eq!(PassiveSource.decide(&view), Decision::pass());
    }

    #[test]
    fn test_random_source_is_seeded() {
        let mut game = GameState::default();
        let view = view_for(&mut game, PlayerId::Yellow);
        let mut a = RandomSource::new(42);
        let mut b = RandomSource::new(42);
        for _ in 0..20 {
            assert_eq!(a.decide(&view), b.decide(&view));
        }
    }

    #[test]
    fn test_random_moves_start_on_own_stacks() {
        let mut game = GameState::default();
        let view = view_for(&mut game, PlayerId::Green);
        let mut source = RandomSource::new(3);
        for _ in 0..50 {
            for mv in source.decide(&view).moves {
                assert_eq!((mv.from_x, mv.from_y), (9, 9));
                assert!((1..=10).contains(&mv.unit_count));
            }
        }
    }

    #[test]
    fn test_greedy_keeps_one_unit_home() {
        let mut game = GameState::default();
        let view = view_for(&mut game, PlayerId::Blue);
        let decision = GreedySource.decide(&view);
        assert_eq!(decision.moves.len(), 1);
        let mv = decision.moves[0];
        assert_eq!((mv.from_x, mv.from_y), (0, 0));
        assert_eq!(mv.unit_count, 9);
        assert!(decision.diplomacy.is_empty());
    }

    #[test]
    fn test_greedy_attacks_weaker_neighbour() {
        let mut game = GameState::default();
        game.board.set_units(Coord::new(1, 0), PlayerId::Yellow, 3);
        game.players[PlayerId::Yellow.index()].units = 13;
        crate::game::update_visibility(&mut game.board);

        let view = view_for(&mut game, PlayerId::Blue);
        let decision = GreedySource.decide(&view);
        let mv = decision.moves[0];
        assert_eq!((mv.to_x, mv.to_y), (1, 0));
    }

    #[test]
    fn test_source_kind_names() {
        for (kind, name) in [
            (SourceKind::Random, "random"),
            (SourceKind::Greedy, "greedy"),
            (SourceKind::Passive, "passive"),
        ] {
            assert_eq!(kind.build(0).name(), name);
        }
    }
}
