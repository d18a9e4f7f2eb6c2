pub mod view;
pub mod controller;
pub mod database;
pub mod runner;

pub use controller::GameController;
pub use database::SqliteStore;
pub use runner::{play_game, run_batch, run_game, BatchSummary, GameResult, Outcome, PlayerPolicy, RunError};
pub use view::{BoardView, Cursor, Highlight, NullView};
