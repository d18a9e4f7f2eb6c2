// ═══════════════════════════════════════════════════════════════════════
// Scoring Agent — the computer opponent.
//
// Attack first: every (attacker, target) pair in range is scored
//
//   priority = attack×0.6 − target.health×0.3 + damage − |Δindex|×0.2
//              + 10 if the hit is lethal
//
// and the highest wins (first encountered on ties). With nothing in
// range, close in: each piece finds its nearest enemy by Manhattan
// distance and its move cell closest to that enemy; the piece that ends
// up closest overall moves.
// ═══════════════════════════════════════════════════════════════════════

use crate::agent::Agent;
use tactics_engine::board;
use tactics_engine::combat::damage;
use tactics_engine::engine::Action;
use tactics_engine::navigation;
use tactics_engine::types::*;

pub const ATTACK_WEIGHT: f64 = 0.6;
pub const TARGET_HEALTH_WEIGHT: f64 = 0.3;
pub const DAMAGE_WEIGHT: f64 = 1.0;
pub const DISTANCE_WEIGHT: f64 = 0.2;
pub const FINISH_BONUS: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttackCandidate {
    pub attacker: usize,
    pub target: usize,
    pub priority: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveCandidate {
    pub from: usize,
    pub to: usize,
    /// Manhattan distance from `to` to the piece's nearest enemy.
    pub distance: usize,
}

pub fn attack_priority(attacker: &PositionedCharacter, target: &PositionedCharacter) -> f64 {
    let a = attacker.character();
    let t = target.character();
    let dealt = damage(a, t);
    let finish = if dealt >= t.health { FINISH_BONUS } else { 0.0 };
    let distance = board::linear_distance(attacker.position(), target.position()) as f64;

    a.attack * ATTACK_WEIGHT - t.health * TARGET_HEALTH_WEIGHT + dealt * DAMAGE_WEIGHT
        - distance * DISTANCE_WEIGHT
        + finish
}

/// Highest-priority attack available to `faction`, if any.
pub fn select_best_attack(roster: &[PositionedCharacter], faction: Faction) -> Option<AttackCandidate> {
    let enemies = navigation::faction_members(roster, faction.opponent());
    let mut best: Option<AttackCandidate> = None;

    for attacker in navigation::faction_members(roster, faction) {
        let cells = navigation::attack_cells(roster, attacker.position());
        for target in enemies.iter().filter(|t| cells.contains(&t.position())) {
            let priority = attack_priority(attacker, target);
            if best.map_or(true, |b| priority > b.priority) {
                best = Some(AttackCandidate { attacker: attacker.position(), target: target.position(), priority });
            }
        }
    }
    best
}

/// Move that brings one of `faction`'s pieces closest to an enemy.
/// `None` without enemies or without any free move cell.
pub fn find_best_move(roster: &[PositionedCharacter], faction: Faction) -> Option<MoveCandidate> {
    let enemies = navigation::faction_members(roster, faction.opponent());
    if enemies.is_empty() {
        return None;
    }
    let mut best: Option<MoveCandidate> = None;

    for piece in navigation::faction_members(roster, faction) {
        let from = piece.position();
        let cells = navigation::move_cells(roster, from);
        if cells.is_empty() {
            continue;
        }

        let mut nearest = enemies[0].position();
        for enemy in &enemies[1..] {
            if board::manhattan_distance(enemy.position(), from, BOARD_SIZE)
                < board::manhattan_distance(nearest, from, BOARD_SIZE)
            {
                nearest = enemy.position();
            }
        }

        let mut to = cells[0];
        let mut distance = board::manhattan_distance(to, nearest, BOARD_SIZE);
        for &cell in &cells[1..] {
            let d = board::manhattan_distance(cell, nearest, BOARD_SIZE);
            if d < distance {
                to = cell;
                distance = d;
            }
        }

        if best.map_or(true, |b| distance < b.distance) {
            best = Some(MoveCandidate { from, to, distance });
        }
    }
    best
}

pub struct ScoringAgent {
    faction: Faction,
}

impl ScoringAgent {
    pub fn new(faction: Faction) -> Self {
        ScoringAgent { faction }
    }
}

impl Default for ScoringAgent {
    fn default() -> Self {
        ScoringAgent::new(Faction::Computer)
    }
}

impl Agent for ScoringAgent {
    fn name(&self) -> &str { "Scoring" }
    fn faction(&self) -> Faction { self.faction }

    fn decide(&mut self, roster: &[PositionedCharacter]) -> Action {
        if let Some(best) = select_best_attack(roster, self.faction) {
            log::debug!("{} attack {} → {} (priority {:.2})", self.faction, best.attacker, best.target, best.priority);
            return Action::Attack { attacker: best.attacker, target: best.target };
        }
        if let Some(best) = find_best_move(roster, self.faction) {
            log::debug!("{} closes in {} → {} (distance {})", self.faction, best.from, best.to, best.distance);
            return Action::Move { from: best.from, to: best.to };
        }
        Action::Pass
    }
}
