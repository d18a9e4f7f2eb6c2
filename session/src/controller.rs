// ═══════════════════════════════════════════════════════════════════════
// Game Controller — drives one game between a board view and the engine
//
// Ownership:
//   The controller owns the GameState, the save slot and the computer
//   agent. The engine decides what is legal; the controller turns clicks
//   into actions, awaits the view's animations, runs the computer's
//   answer and handles wave transitions, defeat and persistence.
//
// Ordering (single-threaded, cooperative):
//   player action → await animations → computer action → await
//   animations → player's turn again. `turn_in_progress` keeps the
//   computer turn from being entered twice.
// ═══════════════════════════════════════════════════════════════════════

use crate::view::{BoardView, Cursor, Highlight};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tactics_agents::Agent;
use tactics_engine::config::GameConfig;
use tactics_engine::engine::{self, Action, ActionReport, BoardStatus, ClickOutcome, Resolution};
use tactics_engine::error::{ActionError, SetupError};
use tactics_engine::navigation;
use tactics_engine::progression;
use tactics_engine::setup;
use tactics_engine::state::GameState;
use tactics_engine::storage::{GameStateService, KeyValueStore};
use tactics_engine::types::*;

pub struct GameController<V, S, A> {
    state: GameState,
    config: GameConfig,
    view: V,
    saves: GameStateService<S>,
    opponent: A,
    rng: ChaCha8Rng,
    // `&mut self` already rules out re-entry; the flag only makes a running
    // computer turn observable through `is_turn_in_progress`.
    turn_in_progress: bool,
}

impl<V: BoardView, S: KeyValueStore, A: Agent> GameController<V, S, A> {
    pub fn new(view: V, store: S, opponent: A, config: GameConfig, seed: u64) -> Self {
        GameController {
            state: GameState::default(),
            config,
            view,
            saves: GameStateService::new(store),
            opponent,
            rng: ChaCha8Rng::seed_from_u64(seed),
            turn_in_progress: false,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn into_view(self) -> V {
        self.view
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        self.saves.store()
    }

    pub fn statistics(&self) -> &StatRecord {
        &self.state.statistics
    }

    pub fn is_turn_in_progress(&self) -> bool {
        self.turn_in_progress
    }

    // ── Lifecycle ──────────────────────────────────────────────────────

    /// Start a fresh game on the Prairie, carrying over any persisted
    /// statistics.
    pub fn init(&mut self) -> Result<(), SetupError> {
        self.state.statistics = match self.saves.load() {
            Ok(Some(saved)) => saved.statistics,
            Ok(None) => StatRecord::default(),
            Err(e) => {
                log::warn!("ignoring unreadable save while reading statistics: {}", e);
                StatRecord::default()
            }
        };
        self.start_fresh()
    }

    /// Throw away the current board and deal a new one. Statistics stay.
    pub fn new_game(&mut self) -> Result<(), SetupError> {
        self.start_fresh()?;
        self.view.show_message("New game started");
        Ok(())
    }

    fn start_fresh(&mut self) -> Result<(), SetupError> {
        let roster = match setup::create_initial_roster(&mut self.rng, &self.config) {
            Ok(roster) => roster,
            Err(e) => {
                self.view.show_error(&format!("Could not set up the board: {}", e));
                return Err(e);
            }
        };
        self.state = GameState {
            positioned_characters: roster,
            statistics: self.state.statistics,
            ..GameState::default()
        };
        self.turn_in_progress = false;
        self.redraw();
        log::info!("new game: {} pieces", self.state.positioned_characters.len());
        Ok(())
    }

    fn redraw(&mut self) {
        self.view.draw_board(self.state.current_theme);
        self.view.render_roster(&self.state.positioned_characters);
    }

    /// Write the whole state to the save slot.
    pub fn save_game(&mut self) {
        self.state.statistics.record_save();
        match self.saves.save(&self.state) {
            Ok(()) => self.view.show_message("Game saved"),
            Err(e) => {
                log::warn!("save failed: {}", e);
                self.view.show_error(&format!("Failed to save the game: {}", e));
            }
        }
    }

    /// Replace the in-memory state with the saved one. A corrupt save is
    /// reported and leaves the current game untouched.
    pub fn load_game(&mut self) {
        let loaded = match self.saves.load() {
            Ok(Some(loaded)) if !loaded.positioned_characters.is_empty() => loaded,
            Ok(_) => {
                self.view.show_message("No saved game");
                return;
            }
            Err(e) => {
                log::warn!("load failed: {}", e);
                self.view.show_error(&format!("Failed to load the game: {}", e));
                return;
            }
        };

        self.state = loaded;
        if !self.state.game_over && engine::board_status(&self.state) == BoardStatus::PlayerDefeated {
            log::warn!("loaded save has no player pieces left, ending the game");
            self.state.game_over = true;
        }
        self.state.statistics.record_load();
        self.turn_in_progress = false;
        self.persist_statistics();
        self.redraw();
        self.view.show_message("Game loaded");
    }

    pub fn reset_statistics(&mut self) {
        self.state.statistics.reset();
        self.persist_statistics();
    }

    fn persist_statistics(&mut self) {
        if let Err(e) = self.saves.persist_statistics(&self.state.statistics) {
            log::warn!("could not persist statistics: {}", e);
        }
    }

    // ── Input ──────────────────────────────────────────────────────────

    pub async fn on_cell_click(&mut self, index: usize) {
        match engine::interpret_click(&self.state, index) {
            ClickOutcome::Ignored => {}
            ClickOutcome::ComputerTurn => self.view.show_error("It is the computer's turn"),
            ClickOutcome::Select { previous, index } => {
                if let Some(previous) = previous {
                    self.view.clear_highlight(previous);
                }
                self.state.selected_cell_index = Some(index);
                self.view.highlight_cell(index, Highlight::Yellow);
                self.view.set_cursor(Cursor::Pointer);
            }
            ClickOutcome::Perform(action) => {
                if let Some(selected) = self.state.selected_cell_index {
                    self.view.clear_highlight(selected);
                }
                match action {
                    Action::Attack { target, .. } => {
                        self.view.highlight_cell(target, Highlight::Red);
                        self.view.set_cursor(Cursor::Crosshair);
                    }
                    Action::Move { to, .. } => {
                        self.view.highlight_cell(to, Highlight::Green);
                        self.view.set_cursor(Cursor::Pointer);
                    }
                    Action::Pass => {}
                }
                if let Err(e) = self.play_turn(action).await {
                    self.view.show_error(&e.to_string());
                }
            }
            ClickOutcome::Invalid => {
                self.view.set_cursor(Cursor::NotAllowed);
                self.view.show_error("Invalid action");
            }
        }
    }

    pub fn on_cell_enter(&mut self, index: usize) {
        let hovered = self.state.character_at(index).cloned();
        if let Some(pc) = &hovered {
            self.view.show_tooltip(&pc.character().info(), index);
        }
        let own_piece = hovered.as_ref().is_some_and(|pc| pc.is_player());

        let Some(selected) = self.state.selected_cell_index else {
            self.view.set_cursor(if own_piece { Cursor::Pointer } else { Cursor::NotAllowed });
            return;
        };
        let roster = &self.state.positioned_characters;
        if navigation::find_at(roster, selected).is_none() {
            self.view.set_cursor(Cursor::NotAllowed);
        } else if own_piece {
            self.view.set_cursor(Cursor::Pointer);
        } else if navigation::can_move(roster, selected, index) {
            self.view.set_cursor(Cursor::Pointer);
            self.view.highlight_cell(index, Highlight::Green);
        } else if navigation::can_attack(roster, selected, index) {
            self.view.set_cursor(Cursor::Crosshair);
            self.view.highlight_cell(index, Highlight::Red);
        } else {
            self.view.set_cursor(Cursor::NotAllowed);
        }
    }

    pub fn on_cell_leave(&mut self, index: usize) {
        self.view.set_cursor(Cursor::NotAllowed);
        self.view.clear_highlight(index);
        self.view.hide_tooltip(index);
    }

    // ── Turns ──────────────────────────────────────────────────────────

    /// Play a player action, then let the computer answer if the turn
    /// passed to it.
    pub async fn play_turn(&mut self, action: Action) -> Result<ActionReport, ActionError> {
        if !self.state.is_player_turn {
            return Err(ActionError::NotPlayerTurn);
        }
        let report = self.perform(action).await?;
        if report.status == BoardStatus::Ongoing {
            self.run_computer_turn().await;
        }
        Ok(report)
    }

    /// Let the opponent agent take its single action. Returns false when
    /// it is not the computer's turn or a computer turn is already running.
    pub async fn run_computer_turn(&mut self) -> bool {
        if self.turn_in_progress || self.state.game_over || self.state.is_player_turn {
            return false;
        }
        self.turn_in_progress = true;

        let action = self.opponent.decide(&self.state.positioned_characters);
        if let Err(e) = self.perform(action).await {
            log::warn!("{} agent chose an illegal action {:?}: {}", self.opponent.name(), action, e);
            if let Err(e) = self.perform(Action::Pass).await {
                log::warn!("computer could not pass: {}", e);
            }
        }

        self.turn_in_progress = false;
        true
    }

    /// Resolve one action for the side to move, play its animations and
    /// handle the board status it leaves behind.
    async fn perform(&mut self, action: Action) -> Result<ActionReport, ActionError> {
        let stats_before = self.state.statistics;
        let report = engine::apply_action(&mut self.state, action)?;

        match &report.resolution {
            Resolution::Attacked(outcome) => {
                self.view
                    .animate_health(outcome.target, outcome.health_before, outcome.health_after)
                    .await;
                self.view.show_damage_number(outcome.target, outcome.damage).await;
                self.view.clear_highlight(outcome.target);
                self.view.render_roster(&self.state.positioned_characters);
            }
            Resolution::Moved { from, to } => {
                self.view.clear_highlight(*from);
                self.view.clear_highlight(*to);
                self.view.render_roster(&self.state.positioned_characters);
            }
            Resolution::Passed => {}
        }

        match report.status {
            BoardStatus::Ongoing => {}
            BoardStatus::PlayerDefeated => {
                self.view.show_message("You lost! Game over.");
            }
            BoardStatus::WaveCleared => self.advance_wave(),
        }

        if self.state.statistics != stats_before {
            self.persist_statistics();
        }
        Ok(report)
    }

    fn advance_wave(&mut self) {
        let result = progression::start_next_wave(
            &mut self.state,
            &self.config,
            self.saves.store_mut(),
            &mut self.rng,
        );
        match result {
            Ok(report) => {
                self.redraw();
                self.view.show_message(&format!(
                    "Wave {} cleared! Next stop: {}",
                    self.state.statistics.total_levels_completed, report.theme
                ));
            }
            Err(e) => {
                log::warn!("could not start the next wave: {}", e);
                self.view.show_error(&format!("Could not start the next wave: {}", e));
            }
        }
    }
}
