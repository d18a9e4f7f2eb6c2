// ═══════════════════════════════════════════════════════════════════════
// Progression — wave transitions and the two growth curves
//
// Player pieces grow from their remaining health:
//   health = min(health + 80, 100); coef = (80 + health) / 100
//   attack/defense = max(x, round(x × coef))
// Computer pieces grow from a persisted per-type record, so AI strength
// keeps climbing across waves no matter which instances existed before:
//   attack  × U(1.1, 2.3), defense × U(1.1, 1.9), never lowered.
// ═══════════════════════════════════════════════════════════════════════

use crate::config::GameConfig;
use crate::error::SetupError;
use crate::setup;
use crate::state::GameState;
use crate::storage::KeyValueStore;
use crate::types::*;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Key holding the per-type AI stat record.
pub const AI_STATS_KEY: &str = "aiCharacterStats";

/// Health restored to each surviving player piece per wave.
pub const WAVE_HEAL: f64 = 80.0;

pub const AI_ATTACK_GROWTH: (f64, f64) = (1.7, 0.6);
pub const AI_DEFENSE_GROWTH: (f64, f64) = (1.5, 0.4);

/// Last known stats of one computer class.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AiStatRecord {
    pub level: u32,
    pub attack: f64,
    pub defense: f64,
}

/// Lowercase type name → record.
pub type AiStatTable = BTreeMap<String, AiStatRecord>;

/// What a wave transition did.
#[derive(Debug, Clone, PartialEq)]
pub struct WaveReport {
    pub theme: Theme,
    pub survivors: usize,
    pub spawned: usize,
    pub max_player_level: u32,
}

// ── Player growth ──────────────────────────────────────────────────────

/// Level one player character. Dead characters are left alone.
pub fn level_up_player(character: &mut Character) {
    if character.health <= 0.0 {
        return;
    }
    character.level += 1;
    character.health = (character.health + WAVE_HEAL).min(MAX_HEALTH).round();
    let coef = (WAVE_HEAL + character.health) / 100.0;
    character.attack = character.attack.max((character.attack * coef).round());
    character.defense = character.defense.max((character.defense * coef).round());
}

/// Level every player-side piece on the roster exactly once.
pub fn level_up_player_team(roster: &mut [PositionedCharacter]) {
    for pc in roster.iter_mut().filter(|pc| pc.is_player()) {
        level_up_player(pc.character_mut());
    }
}

// ── Computer growth ────────────────────────────────────────────────────

/// Uniform sample from `[base - spread, base + spread]`.
pub fn random_multiplier(rng: &mut impl Rng, base: f64, spread: f64) -> f64 {
    if spread <= 0.0 {
        return base;
    }
    rng.gen_range((base - spread)..=(base + spread))
}

/// Hydrate `character` from its type's record (if any), level it once,
/// and write the result back into the table.
pub fn level_up_computer(character: &mut Character, table: &mut AiStatTable, rng: &mut impl Rng) {
    let key = character.kind().name();
    if let Some(saved) = table.get(key) {
        character.level = saved.level;
        character.attack = saved.attack;
        character.defense = saved.defense;
    }

    character.level += 1;
    let attack_mul = random_multiplier(rng, AI_ATTACK_GROWTH.0, AI_ATTACK_GROWTH.1);
    let defense_mul = random_multiplier(rng, AI_DEFENSE_GROWTH.0, AI_DEFENSE_GROWTH.1);
    character.attack = character.attack.max(character.attack * attack_mul).round();
    character.defense = character.defense.max(character.defense * defense_mul).round();

    table.insert(
        key.to_string(),
        AiStatRecord { level: character.level, attack: character.attack, defense: character.defense },
    );
}

/// Stored table, or an empty one if it is missing or unreadable.
pub fn load_ai_stats(store: &impl KeyValueStore) -> AiStatTable {
    let raw = match store.get(AI_STATS_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return AiStatTable::new(),
        Err(e) => {
            log::warn!("could not read AI stats, using defaults: {}", e);
            return AiStatTable::new();
        }
    };
    serde_json::from_str(&raw).unwrap_or_else(|e| {
        log::warn!("ignoring unreadable AI stats: {}", e);
        AiStatTable::new()
    })
}

/// Write the table back. Failures are logged and dropped.
pub fn save_ai_stats(store: &mut impl KeyValueStore, table: &AiStatTable) {
    let text = match serde_json::to_string(table) {
        Ok(text) => text,
        Err(e) => {
            log::warn!("could not encode AI stats: {}", e);
            return;
        }
    };
    if let Err(e) = store.set(AI_STATS_KEY, &text) {
        log::warn!("could not store AI stats: {}", e);
    }
}

/// Level a freshly spawned computer team against the persisted record.
pub fn level_up_computer_team(
    pieces: &mut [PositionedCharacter],
    store: &mut impl KeyValueStore,
    rng: &mut impl Rng,
) {
    let mut table = load_ai_stats(&*store);
    for pc in pieces.iter_mut() {
        level_up_computer(pc.character_mut(), &mut table, rng);
    }
    save_ai_stats(store, &table);
}

// ── Wave transition ────────────────────────────────────────────────────

/// Clear the current wave: level survivors, redeploy them, spawn and
/// level a new computer team, advance the theme and give the turn back
/// to the player. On error the state is left as it was.
pub fn start_next_wave(
    state: &mut GameState,
    config: &GameConfig,
    store: &mut impl KeyValueStore,
    rng: &mut impl Rng,
) -> Result<WaveReport, SetupError> {
    let mut survivors: Vec<PositionedCharacter> = state
        .positioned_characters
        .iter()
        .filter(|pc| pc.is_player() && pc.character().is_alive())
        .cloned()
        .collect();
    level_up_player_team(&mut survivors);

    let mut roster = setup::redeploy(rng, survivors, &config.player_columns)?;
    let mut opponents = setup::spawn_opponent_wave(rng, config)?;
    level_up_computer_team(&mut opponents, store, rng);

    let survivors = roster.len();
    let spawned = opponents.len();
    roster.extend(opponents);
    state.positioned_characters = roster;

    let max_player_level = state.max_player_level();
    state.statistics.record_level_completed();
    state.statistics.update_max_level(max_player_level);
    state.current_theme = state.current_theme.next();
    state.is_player_turn = true;
    state.selected_cell_index = None;

    log::info!(
        "wave cleared: {} survivors, {} new opponents, theme {}",
        survivors, spawned, state.current_theme
    );
    Ok(WaveReport { theme: state.current_theme, survivors, spawned, max_player_level })
}
