// ═══════════════════════════════════════════════════════════════════════
// Agent Trait — interface that all AI agents must implement
//
// KEY DESIGN PRINCIPLE:
//   Agents receive the roster only, never the mutable GameState. They
//   answer with an `Action` for their own faction; the engine validates
//   and resolves it. An agent with nothing legal to do answers `Pass`.
// ═══════════════════════════════════════════════════════════════════════

use tactics_engine::engine::Action;
use tactics_engine::navigation;
use tactics_engine::types::*;

pub trait Agent: Send + Sync {
    /// Human-readable name for this agent (e.g., "Scoring", "Random").
    fn name(&self) -> &str;

    /// The side this agent plays.
    fn faction(&self) -> Faction;

    /// Pick one action for `self.faction()` on the given roster.
    fn decide(&mut self, roster: &[PositionedCharacter]) -> Action;
}

/// Every legal move and attack for `faction`, in roster order; for each
/// piece its moves come before its attacks.
pub fn legal_actions(roster: &[PositionedCharacter], faction: Faction) -> Vec<Action> {
    let mut actions = Vec::new();
    for pc in navigation::faction_members(roster, faction) {
        let from = pc.position();
        actions.extend(navigation::move_cells(roster, from).into_iter().map(|to| Action::Move { from, to }));
        actions.extend(
            navigation::attack_cells(roster, from)
                .into_iter()
                .map(|target| Action::Attack { attacker: from, target }),
        );
    }
    actions
}
