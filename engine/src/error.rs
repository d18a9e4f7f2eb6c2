// ═══════════════════════════════════════════════════════════════════════
// Errors — one enum per concern, all user-reportable
// ═══════════════════════════════════════════════════════════════════════

use crate::types::Faction;
use thiserror::Error;

/// An action the rules do not allow. Never mutates state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("the game is over")]
    GameOver,
    #[error("it is the computer's turn")]
    NotPlayerTurn,
    #[error("cell {0} is outside the board")]
    OutOfBoard(usize),
    #[error("cell {0} is empty")]
    EmptyCell(usize),
    #[error("the character at cell {cell} belongs to the {faction} side")]
    WrongFaction { cell: usize, faction: Faction },
    #[error("cell {to} cannot be reached from cell {from}")]
    NotInMoveRange { from: usize, to: usize },
    #[error("cell {to} cannot be attacked from cell {from}")]
    NotInAttackRange { from: usize, to: usize },
}

/// Roster construction failures. Fatal for the generation call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SetupError {
    #[error("no character types allowed for a team of {count}")]
    NoAllowedTypes { count: usize },
    #[error("team generation gave up after {attempts} attempts")]
    Exhausted { attempts: usize },
    #[error("cannot place {count} characters in {available} free cells")]
    NotEnoughCells { count: usize, available: usize },
}

/// Failure of the raw key-value medium.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Failures while saving or loading the game state.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("saved game is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
    #[error("saved game has an invalid roster: {0}")]
    InvalidRoster(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
