// ═══════════════════════════════════════════════════════════════════════
// Database — SQLite-backed key-value store for saves and AI stats
// ═══════════════════════════════════════════════════════════════════════

use rusqlite::{params, Connection, OptionalExtension};
use tactics_engine::error::StorageError;
use tactics_engine::storage::KeyValueStore;

pub struct SqliteStore {
    conn: Connection,
}

fn backend(e: rusqlite::Error) -> StorageError {
    StorageError::Backend(e.to_string())
}

impl SqliteStore {
    /// Open (or create) a database at the given path.
    pub fn open(path: &str) -> Result<Self, StorageError> {
        let conn = Connection::open(path).map_err(backend)?;
        let store = SqliteStore { conn };
        store.create_schema()?;
        Ok(store)
    }

    /// In-memory database (useful for tests).
    pub fn in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory().map_err(backend)?;
        let store = SqliteStore { conn };
        store.create_schema()?;
        Ok(store)
    }

    fn create_schema(&self) -> Result<(), StorageError> {
        self.conn
            .execute_batch(
                "
            CREATE TABLE IF NOT EXISTS kv (
                key         TEXT PRIMARY KEY,
                value       TEXT NOT NULL,
                updated_at  TEXT NOT NULL DEFAULT (datetime('now'))
            );
        ",
            )
            .map_err(backend)
    }

    /// All stored keys, sorted.
    pub fn keys(&self) -> Result<Vec<String>, StorageError> {
        let mut stmt = self.conn.prepare("SELECT key FROM kv ORDER BY key").map_err(backend)?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0)).map_err(backend)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(backend)
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| row.get(0))
            .optional()
            .map_err(backend)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.conn
            .execute(
                "INSERT OR REPLACE INTO kv (key, value, updated_at) VALUES (?1, ?2, datetime('now'))",
                params![key, value],
            )
            .map_err(backend)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.conn.execute("DELETE FROM kv WHERE key = ?1", params![key]).map_err(backend)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tactics_engine::storage::{GameStateService, STATE_KEY};
    use tactics_engine::types::*;
    use tactics_engine::GameState;

    #[test]
    fn test_set_get_remove() {
        let mut store = SqliteStore::in_memory().unwrap();
        assert_eq!(store.get("missing").unwrap(), None);

        store.set("a", "1").unwrap();
        store.set("a", "2").unwrap();
        assert_eq!(store.get("a").unwrap().as_deref(), Some("2"));
        assert_eq!(store.keys().unwrap(), vec!["a".to_string()]);

        store.remove("a").unwrap();
        assert_eq!(store.get("a").unwrap(), None);
    }

    #[test]
    fn test_save_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("saves.db");
        let path = path.to_str().unwrap();

        let mut state = GameState::with_roster(vec![PositionedCharacter::new(
            Character::new(CharacterType::Magician),
            17,
        )]);
        state.current_theme = Theme::Mountain;

        {
            let mut service = GameStateService::new(SqliteStore::open(path).unwrap());
            service.save(&state).unwrap();
        }

        let service = GameStateService::new(SqliteStore::open(path).unwrap());
        assert!(service.store().get(STATE_KEY).unwrap().is_some());
        let loaded = service.load().unwrap().unwrap();
        assert_eq!(loaded, state);
    }
}
