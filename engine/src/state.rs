// ═══════════════════════════════════════════════════════════════════════
// GameState — the single authoritative snapshot, and its save format
//
// Wire shape (camelCase JSON object):
//   { isPlayerTurn, positionedCharacters: [{character: {level, type,
//     attack, defense, health}, position}], currentTheme, gameOver,
//     statistics }
// The selected cell is UI-transient and is never written.
// ═══════════════════════════════════════════════════════════════════════

use crate::error::StateError;
use crate::navigation;
use crate::types::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub is_player_turn: bool,
    pub positioned_characters: Vec<PositionedCharacter>,
    pub selected_cell_index: Option<usize>,
    pub current_theme: Theme,
    pub game_over: bool,
    pub statistics: StatRecord,
}

impl Default for GameState {
    fn default() -> Self {
        GameState {
            is_player_turn: true,
            positioned_characters: Vec::new(),
            selected_cell_index: None,
            current_theme: Theme::Prairie,
            game_over: false,
            statistics: StatRecord::default(),
        }
    }
}

/// Borrowed serialization view of a [`GameState`].
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SavedStateRef<'a> {
    is_player_turn: bool,
    positioned_characters: &'a [PositionedCharacter],
    current_theme: Theme,
    game_over: bool,
    statistics: &'a StatRecord,
}

/// Lenient deserialization target: anything missing takes its default.
#[derive(Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct SavedState {
    is_player_turn: bool,
    positioned_characters: Vec<PositionedCharacter>,
    current_theme: Theme,
    game_over: bool,
    #[serde(deserialize_with = "lenient_statistics")]
    statistics: StatRecord,
}

impl Default for SavedState {
    fn default() -> Self {
        SavedState {
            is_player_turn: true,
            positioned_characters: Vec::new(),
            current_theme: Theme::Prairie,
            game_over: false,
            statistics: StatRecord::default(),
        }
    }
}

fn lenient_statistics<'de, D: serde::Deserializer<'de>>(deserializer: D) -> Result<StatRecord, D::Error> {
    Ok(Option::<StatRecord>::deserialize(deserializer)?.unwrap_or_default())
}

impl GameState {
    pub fn new() -> Self {
        GameState::default()
    }

    pub fn with_roster(roster: Vec<PositionedCharacter>) -> Self {
        GameState { positioned_characters: roster, ..GameState::default() }
    }

    // ── Queries ────────────────────────────────────────────────────────

    pub fn character_at(&self, index: usize) -> Option<&PositionedCharacter> {
        navigation::find_at(&self.positioned_characters, index)
    }

    pub fn faction_count(&self, faction: Faction) -> usize {
        navigation::faction_count(&self.positioned_characters, faction)
    }

    pub fn player_characters(&self) -> Vec<&PositionedCharacter> {
        navigation::faction_members(&self.positioned_characters, Faction::Player)
    }

    pub fn computer_characters(&self) -> Vec<&PositionedCharacter> {
        navigation::faction_members(&self.positioned_characters, Faction::Computer)
    }

    /// Highest level among player-side pieces, 0 if none.
    pub fn max_player_level(&self) -> u32 {
        self.player_characters()
            .iter()
            .map(|pc| pc.character().level)
            .max()
            .unwrap_or(0)
    }

    // ── Serialization ──────────────────────────────────────────────────

    fn saved_ref(&self) -> SavedStateRef<'_> {
        SavedStateRef {
            is_player_turn: self.is_player_turn,
            positioned_characters: &self.positioned_characters,
            current_theme: self.current_theme,
            game_over: self.game_over,
            statistics: &self.statistics,
        }
    }

    /// Flat JSON object with exactly the persisted fields.
    pub fn to_object(&self) -> Value {
        // Serializing plain data into a Value cannot fail.
        serde_json::to_value(self.saved_ref()).unwrap_or(Value::Null)
    }

    pub fn to_json(&self) -> Result<String, StateError> {
        Ok(serde_json::to_string(&self.saved_ref())?)
    }

    /// Rebuild a state from its object form. Missing fields and null
    /// statistics default; an invalid roster is rejected.
    pub fn from_object(object: &Value) -> Result<Self, StateError> {
        let saved = SavedState::deserialize(object)?;
        Self::from_saved(saved)
    }

    pub fn from_json(text: &str) -> Result<Self, StateError> {
        let saved: SavedState = serde_json::from_str(text)?;
        Self::from_saved(saved)
    }

    fn from_saved(saved: SavedState) -> Result<Self, StateError> {
        validate_roster(&saved.positioned_characters)?;
        Ok(GameState {
            is_player_turn: saved.is_player_turn,
            positioned_characters: saved.positioned_characters,
            selected_cell_index: None,
            current_theme: saved.current_theme,
            game_over: saved.game_over,
            statistics: saved.statistics,
        })
    }
}

/// Positions on the board and pairwise distinct; every piece alive.
pub fn validate_roster(roster: &[PositionedCharacter]) -> Result<(), StateError> {
    let mut seen = HashSet::new();
    for pc in roster {
        if !pc.character().is_alive() {
            return Err(StateError::InvalidRoster(format!(
                "dead {} at position {}",
                pc.character().kind(),
                pc.position()
            )));
        }
        if pc.position() >= CELL_COUNT {
            return Err(StateError::InvalidRoster(format!("position {} is off the board", pc.position())));
        }
        if !seen.insert(pc.position()) {
            return Err(StateError::InvalidRoster(format!("position {} is used twice", pc.position())));
        }
    }
    Ok(())
}
