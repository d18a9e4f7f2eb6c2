// ═══════════════════════════════════════════════════════════════════════
// Core types — characters, factions, themes, roster entries, statistics
// ═══════════════════════════════════════════════════════════════════════

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Side length of the square board.
pub const BOARD_SIZE: usize = 8;

/// Number of cells on the board (`BOARD_SIZE²`).
pub const CELL_COUNT: usize = BOARD_SIZE * BOARD_SIZE;

/// Health ceiling for every character.
pub const MAX_HEALTH: f64 = 100.0;

/// Highest level a freshly generated character can start at.
pub const MAX_START_LEVEL: u32 = 4;

// ── Enums ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Faction {
    Player,
    Computer,
}

impl Faction {
    pub fn opponent(self) -> Faction {
        match self {
            Faction::Player => Faction::Computer,
            Faction::Computer => Faction::Player,
        }
    }
}

impl fmt::Display for Faction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Faction::Player => write!(f, "player"),
            Faction::Computer => write!(f, "computer"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CharacterType {
    Swordsman,
    Bowman,
    Magician,
    Vampire,
    Undead,
    Demon,
}

/// Player-aligned classes, in generation order.
pub const PLAYER_TYPES: [CharacterType; 3] = [
    CharacterType::Bowman,
    CharacterType::Swordsman,
    CharacterType::Magician,
];

/// Computer-aligned classes, in generation order.
pub const COMPUTER_TYPES: [CharacterType; 3] = [
    CharacterType::Demon,
    CharacterType::Undead,
    CharacterType::Vampire,
];

/// Default combat stats for a class at level 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BaseStats {
    pub attack: f64,
    pub defense: f64,
    pub health: f64,
}

impl CharacterType {
    pub const ALL: [CharacterType; 6] = [
        CharacterType::Swordsman,
        CharacterType::Bowman,
        CharacterType::Magician,
        CharacterType::Vampire,
        CharacterType::Undead,
        CharacterType::Demon,
    ];

    /// Faction is fixed by class: membership in `PLAYER_TYPES`.
    pub fn faction(self) -> Faction {
        if PLAYER_TYPES.contains(&self) {
            Faction::Player
        } else {
            Faction::Computer
        }
    }

    pub fn is_player(self) -> bool {
        self.faction() == Faction::Player
    }

    /// Maximum number of queen-line steps this class may move.
    pub fn move_distance(self) -> usize {
        match self {
            CharacterType::Swordsman | CharacterType::Undead => 4,
            CharacterType::Bowman | CharacterType::Vampire => 2,
            CharacterType::Magician | CharacterType::Demon => 1,
        }
    }

    /// Maximum number of queen-line steps this class may attack across.
    pub fn attack_distance(self) -> usize {
        match self {
            CharacterType::Swordsman | CharacterType::Undead => 1,
            CharacterType::Bowman | CharacterType::Vampire => 2,
            CharacterType::Magician | CharacterType::Demon => 4,
        }
    }

    pub fn base_stats(self) -> BaseStats {
        let (attack, defense) = match self {
            CharacterType::Swordsman => (40.0, 10.0),
            CharacterType::Bowman => (25.0, 25.0),
            CharacterType::Magician => (10.0, 40.0),
            CharacterType::Undead => (40.0, 10.0),
            CharacterType::Vampire => (25.0, 25.0),
            CharacterType::Demon => (10.0, 10.0),
        };
        BaseStats { attack, defense, health: MAX_HEALTH }
    }

    /// Lowercase wire name, also used as the AI stat record key.
    pub fn name(self) -> &'static str {
        match self {
            CharacterType::Swordsman => "swordsman",
            CharacterType::Bowman => "bowman",
            CharacterType::Magician => "magician",
            CharacterType::Vampire => "vampire",
            CharacterType::Undead => "undead",
            CharacterType::Demon => "demon",
        }
    }

    /// Strict lookup. Accepts the legacy `daemon` spelling.
    pub fn from_name(name: &str) -> Option<CharacterType> {
        match name.to_ascii_lowercase().as_str() {
            "swordsman" => Some(CharacterType::Swordsman),
            "bowman" => Some(CharacterType::Bowman),
            "magician" => Some(CharacterType::Magician),
            "vampire" => Some(CharacterType::Vampire),
            "undead" => Some(CharacterType::Undead),
            "demon" | "daemon" => Some(CharacterType::Demon),
            _ => None,
        }
    }
}

impl fmt::Display for CharacterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CharacterType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CharacterType::from_name(s).ok_or_else(|| format!("unknown character type '{}'", s))
    }
}

// Saves written by older builds may carry types we no longer know;
// those load as swordsmen instead of failing the whole save.
impl<'de> Deserialize<'de> for CharacterType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(CharacterType::from_name(&raw).unwrap_or_else(|| {
            log::warn!("unknown character type '{}', loading as swordsman", raw);
            CharacterType::Swordsman
        }))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Prairie,
    Desert,
    Arctic,
    Mountain,
}

impl Theme {
    pub const ALL: [Theme; 4] = [Theme::Prairie, Theme::Desert, Theme::Arctic, Theme::Mountain];

    /// Prairie → Desert → Arctic → Mountain → Prairie.
    pub fn next(self) -> Theme {
        match self {
            Theme::Prairie => Theme::Desert,
            Theme::Desert => Theme::Arctic,
            Theme::Arctic => Theme::Mountain,
            Theme::Mountain => Theme::Prairie,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Theme::Prairie => "prairie",
            Theme::Desert => "desert",
            Theme::Arctic => "arctic",
            Theme::Mountain => "mountain",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Theme {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Theme::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(&raw))
            .unwrap_or_else(|| {
                log::warn!("unknown theme '{}', falling back to prairie", raw);
                Theme::Prairie
            }))
    }
}

/// Display band for a health bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthLevel {
    Critical,
    Normal,
    High,
}

impl HealthLevel {
    pub fn of(health: f64) -> HealthLevel {
        if health < 15.0 {
            HealthLevel::Critical
        } else if health < 50.0 {
            HealthLevel::Normal
        } else {
            HealthLevel::High
        }
    }
}

// ── Character ──────────────────────────────────────────────────────────

/// A single combatant. The class tag is fixed at creation; the factory
/// functions are the only way to build one outside this crate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub level: u32,
    #[serde(rename = "type")]
    kind: CharacterType,
    pub attack: f64,
    pub defense: f64,
    pub health: f64,
}

impl Character {
    /// Level-1 character with the class's default stats.
    pub fn new(kind: CharacterType) -> Self {
        Character::at_level(kind, 1)
    }

    pub fn at_level(kind: CharacterType, level: u32) -> Self {
        let base = kind.base_stats();
        Character {
            level,
            kind,
            attack: base.attack,
            defense: base.defense,
            health: base.health,
        }
    }

    /// Character with explicit stats, as restored from a save.
    pub fn with_stats(kind: CharacterType, level: u32, attack: f64, defense: f64, health: f64) -> Self {
        Character { level, kind, attack, defense, health }
    }

    pub fn kind(&self) -> CharacterType {
        self.kind
    }

    pub fn faction(&self) -> Faction {
        self.kind.faction()
    }

    pub fn is_player(&self) -> bool {
        self.kind.is_player()
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    /// Tooltip text: `🎖level ⚔attack 🛡defense ❤health`.
    pub fn info(&self) -> String {
        format!(
            "\u{1F396}{} \u{2694}{} \u{1F6E1}{} \u{2764}{}",
            self.level, self.attack, self.defense, self.health
        )
    }
}

// ── Positioned character ───────────────────────────────────────────────

/// A character placed on a board cell. Moving produces a new value;
/// the position of an existing entry never changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionedCharacter {
    character: Character,
    position: usize,
}

impl PositionedCharacter {
    pub fn new(character: Character, position: usize) -> Self {
        PositionedCharacter { character, position }
    }

    pub fn character(&self) -> &Character {
        &self.character
    }

    pub fn character_mut(&mut self) -> &mut Character {
        &mut self.character
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn faction(&self) -> Faction {
        self.character.faction()
    }

    pub fn is_player(&self) -> bool {
        self.character.is_player()
    }

    /// Consume this entry and return the same character at `position`.
    pub fn moved_to(self, position: usize) -> Self {
        PositionedCharacter { character: self.character, position }
    }

    pub fn into_character(self) -> Character {
        self.character
    }
}

// ── Team ───────────────────────────────────────────────────────────────

/// Unpositioned group of characters used while building a roster.
/// Members are owned, so one character can never sit in a team twice.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Team {
    members: Vec<Character>,
}

impl Team {
    pub fn new() -> Self {
        Team::default()
    }

    pub fn from_members(members: Vec<Character>) -> Self {
        Team { members }
    }

    pub fn add(&mut self, character: Character) {
        self.members.push(character);
    }

    pub fn add_all(&mut self, characters: impl IntoIterator<Item = Character>) {
        self.members.extend(characters);
    }

    /// Remove the member at `index`. Out-of-range indices are ignored.
    pub fn remove(&mut self, index: usize) -> Option<Character> {
        if index < self.members.len() {
            Some(self.members.remove(index))
        } else {
            None
        }
    }

    pub fn members(&self) -> &[Character] {
        &self.members
    }

    pub fn into_members(self) -> Vec<Character> {
        self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn count_of(&self, kind: CharacterType) -> usize {
        self.members.iter().filter(|c| c.kind() == kind).count()
    }
}

// ── Statistics ─────────────────────────────────────────────────────────

/// Lifetime counters. Only `reset` ever lowers them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatRecord {
    #[serde(default, deserialize_with = "null_as_zero")]
    pub player_defeats: u32,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub enemies_killed: u32,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub total_levels_completed: u32,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub max_level_reached: u32,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub save_usage_count: u32,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub load_usage_count: u32,
}

fn null_as_zero<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    Ok(Option::<u32>::deserialize(deserializer)?.unwrap_or(0))
}
