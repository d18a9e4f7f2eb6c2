// ═══════════════════════════════════════════════════════════════════════
// Random Agent — picks uniformly among its legal actions.
// Serves as a sparring baseline and for engine stability testing.
// ═══════════════════════════════════════════════════════════════════════

use crate::agent::{legal_actions, Agent};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tactics_engine::engine::Action;
use tactics_engine::types::*;

pub struct RandomAgent {
    faction: Faction,
    rng: ChaCha8Rng,
}

impl RandomAgent {
    pub fn new(faction: Faction, seed: u64) -> Self {
        RandomAgent {
            faction,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl Agent for RandomAgent {
    fn name(&self) -> &str { "Random" }
    fn faction(&self) -> Faction { self.faction }

    fn decide(&mut self, roster: &[PositionedCharacter]) -> Action {
        legal_actions(roster, self.faction)
            .choose(&mut self.rng)
            .copied()
            .unwrap_or(Action::Pass)
    }
}
