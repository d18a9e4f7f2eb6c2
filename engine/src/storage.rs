// ═══════════════════════════════════════════════════════════════════════
// Storage — key-value seam and the game-state save slot on top of it
// ═══════════════════════════════════════════════════════════════════════

use crate::error::{StateError, StorageError};
use crate::state::GameState;
use crate::types::StatRecord;
use std::collections::HashMap;

/// Key holding the serialized game state.
pub const STATE_KEY: &str = "state";

/// Raw string key-value medium (browser-style local storage, SQLite, …).
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &mut S {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

/// Process-local store. Used by tests and batch simulation.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Save slot for the whole game state.
#[derive(Debug)]
pub struct GameStateService<S> {
    store: S,
}

impl<S: KeyValueStore> GameStateService<S> {
    pub fn new(store: S) -> Self {
        GameStateService { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn save(&mut self, state: &GameState) -> Result<(), StateError> {
        let text = state.to_json()?;
        self.store.set(STATE_KEY, &text)?;
        log::info!("game saved ({} pieces)", state.positioned_characters.len());
        Ok(())
    }

    /// `Ok(None)` when nothing has been saved yet.
    pub fn load(&self) -> Result<Option<GameState>, StateError> {
        match self.store.get(STATE_KEY)? {
            None => Ok(None),
            Some(text) => GameState::from_json(&text).map(Some),
        }
    }

    /// Saved state, or a fresh default one when the slot is empty.
    pub fn load_or_default(&self) -> Result<GameState, StateError> {
        Ok(self.load()?.unwrap_or_default())
    }

    /// Write `stats` into the saved slot, keeping the rest of the save.
    /// A missing or unreadable save is replaced by a default state.
    pub fn persist_statistics(&mut self, stats: &StatRecord) -> Result<(), StateError> {
        let mut saved = match self.load() {
            Ok(Some(state)) => state,
            Ok(None) => GameState::default(),
            Err(StateError::Storage(e)) => return Err(StateError::Storage(e)),
            Err(e) => {
                log::warn!("replacing unreadable save while storing statistics: {}", e);
                GameState::default()
            }
        };
        saved.statistics = *stats;
        self.store.set(STATE_KEY, &saved.to_json()?)?;
        Ok(())
    }

    pub fn clear(&mut self) -> Result<(), StateError> {
        self.store.remove(STATE_KEY)?;
        Ok(())
    }
}
