pub mod types;
pub mod board;
pub mod error;
pub mod config;
pub mod navigation;
pub mod combat;
pub mod setup;
pub mod state;
pub mod statistics;
pub mod storage;
pub mod progression;
pub mod engine;

mod tests;

pub use types::*;
pub use config::GameConfig;
pub use error::{ActionError, SetupError, StateError, StorageError};
pub use state::GameState;
pub use storage::{GameStateService, KeyValueStore, MemoryStore};
