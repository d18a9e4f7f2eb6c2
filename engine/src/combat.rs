// ═══════════════════════════════════════════════════════════════════════
// Combat — damage formula and health mutation
// ═══════════════════════════════════════════════════════════════════════

use crate::error::ActionError;
use crate::navigation::find_at;
use crate::types::*;

/// Share of attack that always gets through, whatever the defense.
pub const MIN_DAMAGE_RATIO: f64 = 0.1;

/// `max(attack − defense, attack × 0.1)`.
pub fn damage(attacker: &Character, target: &Character) -> f64 {
    (attacker.attack - target.defense).max(attacker.attack * MIN_DAMAGE_RATIO)
}

/// What a single attack did. Health values are unclamped.
#[derive(Debug, Clone, PartialEq)]
pub struct AttackOutcome {
    pub attacker: usize,
    pub target: usize,
    pub damage: f64,
    pub health_before: f64,
    pub health_after: f64,
    /// The removed character, when the hit was lethal.
    pub killed: Option<Character>,
}

impl AttackOutcome {
    pub fn is_kill(&self) -> bool {
        self.killed.is_some()
    }
}

/// Apply one attack between two occupied cells. The target's health may
/// go negative; a target at or below zero leaves the roster immediately.
/// Range and faction legality are the caller's concern.
pub fn resolve_attack(
    roster: &mut Vec<PositionedCharacter>,
    attacker: usize,
    target: usize,
) -> Result<AttackOutcome, ActionError> {
    let attacker_char = find_at(roster, attacker)
        .ok_or(ActionError::EmptyCell(attacker))?
        .character()
        .clone();
    let idx = roster
        .iter()
        .position(|pc| pc.position() == target)
        .ok_or(ActionError::EmptyCell(target))?;

    let victim = roster[idx].character_mut();
    let dealt = damage(&attacker_char, victim);
    let health_before = victim.health;
    victim.health -= dealt;
    let health_after = victim.health;

    let killed = if health_after <= 0.0 {
        Some(roster.remove(idx).into_character())
    } else {
        None
    };

    log::debug!(
        "{} at {} hits {} for {:.1} ({:.1} → {:.1}){}",
        attacker_char.kind(), attacker, target, dealt, health_before, health_after,
        if killed.is_some() { ", killed" } else { "" }
    );

    Ok(AttackOutcome {
        attacker,
        target,
        damage: dealt,
        health_before,
        health_after,
        killed,
    })
}
