// ═══════════════════════════════════════════════════════════════════════
// Game Runner — headless autoplay and parallel batch simulation
//
// The player side is played by an agent through the same click path a
// human uses (select the piece, then click the destination or target);
// the computer side is the controller's ScoringAgent. Each game runs on
// its own current-thread runtime, so batches parallelise cleanly.
// ═══════════════════════════════════════════════════════════════════════

use crate::controller::GameController;
use crate::view::{BoardView, NullView};
use rayon::prelude::*;
use std::fmt;
use tactics_agents::{Agent, RandomAgent, ScoringAgent};
use tactics_engine::config::GameConfig;
use tactics_engine::engine::Action;
use tactics_engine::error::SetupError;
use tactics_engine::storage::{KeyValueStore, MemoryStore};
use tactics_engine::types::*;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RunError {
    #[error("game setup failed: {0}")]
    Setup(#[from] SetupError),
    #[error("could not start the async runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Every player piece was killed.
    Defeat,
    /// The turn limit ran out with player pieces still standing.
    TurnLimit,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Defeat => write!(f, "defeat"),
            Outcome::TurnLimit => write!(f, "turn limit"),
        }
    }
}

/// Result of a completed headless game.
#[derive(Debug, Clone)]
pub struct GameResult {
    pub seed: u64,
    pub player_agent: String,
    pub turns: u32,
    pub waves_cleared: u32,
    pub outcome: Outcome,
    pub final_theme: Theme,
    pub statistics: StatRecord,
}

/// Which agent plays the player side in simulations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerPolicy {
    Scoring,
    Random,
}

impl PlayerPolicy {
    pub fn agent(self, seed: u64) -> Box<dyn Agent> {
        match self {
            PlayerPolicy::Scoring => Box::new(ScoringAgent::new(Faction::Player)),
            PlayerPolicy::Random => Box::new(RandomAgent::new(Faction::Player, seed)),
        }
    }
}

/// Play one game in `view` until the player side is wiped out or
/// `max_turns` player turns have been played. Statistics are persisted
/// into `store` as the game goes.
pub async fn play_game<V: BoardView, S: KeyValueStore>(
    view: V,
    store: S,
    player: &mut dyn Agent,
    seed: u64,
    config: &GameConfig,
    max_turns: u32,
) -> Result<(GameResult, V), RunError> {
    let mut controller = GameController::new(
        view,
        store,
        ScoringAgent::new(Faction::Computer),
        config.clone(),
        seed,
    );
    controller.init()?;

    let mut turns = 0;
    while !controller.state().game_over && turns < max_turns {
        let action = player.decide(&controller.state().positioned_characters);
        match action {
            Action::Move { from, to } => {
                controller.on_cell_click(from).await;
                controller.on_cell_click(to).await;
            }
            Action::Attack { attacker, target } => {
                controller.on_cell_click(attacker).await;
                controller.on_cell_click(target).await;
            }
            Action::Pass => {
                if let Err(e) = controller.play_turn(Action::Pass).await {
                    log::warn!("player pass rejected: {}", e);
                }
            }
        }
        turns += 1;
    }

    let state = controller.state();
    let result = GameResult {
        seed,
        player_agent: player.name().to_string(),
        turns,
        waves_cleared: state.statistics.total_levels_completed,
        outcome: if state.game_over { Outcome::Defeat } else { Outcome::TurnLimit },
        final_theme: state.current_theme,
        statistics: state.statistics,
    };
    log::info!(
        "seed {}: {} after {} turns, {} waves cleared",
        seed, result.outcome, result.turns, result.waves_cleared
    );
    Ok((result, controller.into_view()))
}

/// Blocking, headless single game.
pub fn run_game(
    seed: u64,
    config: &GameConfig,
    policy: PlayerPolicy,
    max_turns: u32,
) -> Result<GameResult, RunError> {
    let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
    let mut player = policy.agent(seed);
    let game = play_game(NullView, MemoryStore::new(), player.as_mut(), seed, config, max_turns);
    let (result, _) = runtime.block_on(game)?;
    Ok(result)
}

/// Run one game per seed on the rayon pool.
pub fn run_batch(
    seeds: &[u64],
    config: &GameConfig,
    policy: PlayerPolicy,
    max_turns: u32,
) -> Vec<Result<GameResult, RunError>> {
    seeds
        .par_iter()
        .map(|&seed| run_game(seed, config, policy, max_turns))
        .collect()
}

/// Aggregate numbers over a batch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchSummary {
    pub games: usize,
    pub defeats: usize,
    pub turn_limits: usize,
    pub total_waves: u32,
    pub best_waves: u32,
    pub enemies_killed: u32,
    pub highest_level: u32,
}

impl BatchSummary {
    pub fn from_results<'a>(results: impl IntoIterator<Item = &'a GameResult>) -> Self {
        let mut summary = BatchSummary::default();
        for r in results {
            summary.games += 1;
            match r.outcome {
                Outcome::Defeat => summary.defeats += 1,
                Outcome::TurnLimit => summary.turn_limits += 1,
            }
            summary.total_waves += r.waves_cleared;
            summary.best_waves = summary.best_waves.max(r.waves_cleared);
            summary.enemies_killed += r.statistics.enemies_killed;
            summary.highest_level = summary.highest_level.max(r.statistics.max_level_reached);
        }
        summary
    }

    pub fn average_waves(&self) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            self.total_waves as f64 / self.games as f64
        }
    }
}
