// ═══════════════════════════════════════════════════════════════════════
// Game configuration — team sizes, deployment columns, generation limits
// ═══════════════════════════════════════════════════════════════════════

use crate::types::*;
use serde::{Deserialize, Serialize};

/// Tunable setup parameters. Every field falls back to its default when
/// absent from a config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GameConfig {
    /// Columns the player team deploys into at every wave.
    pub player_columns: Vec<usize>,
    /// Columns the computer team deploys into at every wave.
    pub opponent_columns: Vec<usize>,
    /// Highest starting level for generated characters.
    pub max_level: u32,
    pub player_team_size: usize,
    pub opponent_team_size: usize,
    /// Class limited to one member per generated team.
    pub restricted_type: Option<CharacterType>,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            player_columns: vec![0, 1],
            opponent_columns: vec![6, 7],
            max_level: MAX_START_LEVEL,
            player_team_size: 2,
            opponent_team_size: 2,
            restricted_type: Some(CharacterType::Magician),
        }
    }
}

impl GameConfig {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}
