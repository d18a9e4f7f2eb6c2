// ═══════════════════════════════════════════════════════════════════════
// Runner — CLI entry point for playing, simulating and inspecting saves
// ═══════════════════════════════════════════════════════════════════════

use clap::{Parser, Subcommand, ValueEnum};
use std::error::Error;
use std::time::Duration;
use tactics_engine::board::TileKind;
use tactics_engine::config::GameConfig;
use tactics_engine::storage::GameStateService;
use tactics_engine::types::*;
use tactics_session::view::display_health;
use tactics_session::{
    play_game, run_batch, BatchSummary, BoardView, Cursor, Highlight, PlayerPolicy, SqliteStore,
};

#[derive(Parser)]
#[command(name = "tactics-runner", about = "Turn-based 8x8 tactics")]
struct Cli {
    /// JSON file with game configuration overrides
    #[arg(short, long, global = true)]
    config: Option<String>,
    /// SQLite file holding the save slot and AI stats
    #[arg(long, global = true, default_value = "tactics.db")]
    db: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Let an agent play the player side and print the board as it goes
    Play {
        #[arg(short, long, default_value_t = 42)]
        seed: u64,
        #[arg(short, long, value_enum, default_value_t = AgentKind::Scoring)]
        agent: AgentKind,
        #[arg(short, long, default_value_t = 200)]
        max_turns: u32,
        /// Pause for every animation, in milliseconds
        #[arg(long, default_value_t = 0)]
        delay_ms: u64,
    },
    /// Run many headless games in parallel and summarise them
    Simulate {
        #[arg(short, long, default_value_t = 100)]
        games: u32,
        #[arg(short, long, default_value_t = 42)]
        seed: u64,
        #[arg(short, long, value_enum, default_value_t = AgentKind::Scoring)]
        agent: AgentKind,
        #[arg(short, long, default_value_t = 500)]
        max_turns: u32,
    },
    /// Show lifetime statistics from the save slot
    Stats,
    /// Zero the lifetime statistics
    ResetStats,
    /// Print the saved game as JSON
    Show,
}

#[derive(Clone, Copy, ValueEnum)]
enum AgentKind {
    Scoring,
    Random,
}

impl From<AgentKind> for PlayerPolicy {
    fn from(kind: AgentKind) -> Self {
        match kind {
            AgentKind::Scoring => PlayerPolicy::Scoring,
            AgentKind::Random => PlayerPolicy::Random,
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => GameConfig::from_json(&std::fs::read_to_string(path)?)?,
        None => GameConfig::default(),
    };

    match cli.command {
        Commands::Play { seed, agent, max_turns, delay_ms } => {
            cmd_play(&cli.db, &config, seed, agent.into(), max_turns, delay_ms)
        }
        Commands::Simulate { games, seed, agent, max_turns } => {
            cmd_simulate(&config, games, seed, agent.into(), max_turns);
            Ok(())
        }
        Commands::Stats => cmd_stats(&cli.db),
        Commands::ResetStats => cmd_reset_stats(&cli.db),
        Commands::Show => cmd_show(&cli.db),
    }
}

fn cmd_play(
    db_path: &str,
    config: &GameConfig,
    seed: u64,
    policy: PlayerPolicy,
    max_turns: u32,
    delay_ms: u64,
) -> Result<(), Box<dyn Error>> {
    println!("=== Tactics: seed={}, max turns={} ===\n", seed, max_turns);

    let store = SqliteStore::open(db_path)?;
    let view = TerminalView::new(Duration::from_millis(delay_ms));
    let mut player = policy.agent(seed);
    let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
    let (result, _) = runtime.block_on(play_game(view, store, player.as_mut(), seed, config, max_turns))?;

    println!("\nGame finished: {}", result.outcome);
    println!("  Turns played:   {}", result.turns);
    println!("  Waves cleared:  {}", result.waves_cleared);
    println!("  Final theme:    {}", result.final_theme);
    print_statistics(&result.statistics);
    Ok(())
}

fn cmd_simulate(config: &GameConfig, games: u32, seed: u64, policy: PlayerPolicy, max_turns: u32) {
    println!("=== Simulating {} games from seed {} ===\n", games, seed);

    let seeds: Vec<u64> = (0..games as u64).map(|g| seed + g * 1000).collect();
    let results = run_batch(&seeds, config, policy, max_turns);

    let mut finished = Vec::with_capacity(results.len());
    for (seed, result) in seeds.iter().zip(results) {
        match result {
            Ok(r) => finished.push(r),
            Err(e) => eprintln!("seed {}: ERROR -- {}", seed, e),
        }
    }

    let summary = BatchSummary::from_results(&finished);
    println!("--- Summary ({} games, {} errors) ---", summary.games, seeds.len() - summary.games);
    println!("  Defeats:          {:>6}", summary.defeats);
    println!("  Turn limit hit:   {:>6}", summary.turn_limits);
    println!("  Waves (avg/best): {:>6.2} / {}", summary.average_waves(), summary.best_waves);
    println!("  Enemies killed:   {:>6}", summary.enemies_killed);
    println!("  Highest level:    {:>6}", summary.highest_level);
}

fn cmd_stats(db_path: &str) -> Result<(), Box<dyn Error>> {
    let service = GameStateService::new(SqliteStore::open(db_path)?);
    let state = service.load_or_default()?;
    if !state.statistics.has_saved_statistics() {
        println!("No statistics recorded yet.");
        return Ok(());
    }
    print_statistics(&state.statistics);
    Ok(())
}

fn cmd_reset_stats(db_path: &str) -> Result<(), Box<dyn Error>> {
    let mut service = GameStateService::new(SqliteStore::open(db_path)?);
    service.persist_statistics(&StatRecord::default())?;
    println!("Statistics reset.");
    Ok(())
}

fn cmd_show(db_path: &str) -> Result<(), Box<dyn Error>> {
    let service = GameStateService::new(SqliteStore::open(db_path)?);
    match service.load()? {
        Some(state) => println!("{}", serde_json::to_string_pretty(&state.to_object())?),
        None => println!("No saved game."),
    }
    Ok(())
}

fn print_statistics(stats: &StatRecord) {
    println!("\n  Statistics:");
    println!("    Player defeats:     {}", stats.player_defeats);
    println!("    Enemies killed:     {}", stats.enemies_killed);
    println!("    Levels completed:   {}", stats.total_levels_completed);
    println!("    Max level reached:  {}", stats.max_level_reached);
    println!("    Saves / loads:      {} / {}", stats.save_usage_count, stats.load_usage_count);
}

// ── Terminal view ──────────────────────────────────────────────────────

/// Prints the board after every roster change. Highlights, cursors and
/// tooltips have no terminal counterpart.
struct TerminalView {
    delay: Duration,
}

impl TerminalView {
    fn new(delay: Duration) -> Self {
        TerminalView { delay }
    }

    async fn pause(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}

fn glyph(pc: &PositionedCharacter) -> char {
    let c = match pc.character().kind() {
        CharacterType::Swordsman => 's',
        CharacterType::Bowman => 'b',
        CharacterType::Magician => 'm',
        CharacterType::Vampire => 'v',
        CharacterType::Undead => 'u',
        CharacterType::Demon => 'd',
    };
    if pc.is_player() {
        c.to_ascii_uppercase()
    } else {
        c
    }
}

fn empty_cell(index: usize) -> char {
    match TileKind::of(index, BOARD_SIZE) {
        TileKind::TopLeft | TileKind::TopRight | TileKind::BottomLeft | TileKind::BottomRight => '+',
        TileKind::Top | TileKind::Bottom => '-',
        TileKind::Left | TileKind::Right => '|',
        TileKind::Center => '.',
    }
}

fn band(health: f64) -> &'static str {
    match HealthLevel::of(health) {
        HealthLevel::Critical => "critical",
        HealthLevel::Normal => "normal",
        HealthLevel::High => "high",
    }
}

impl BoardView for TerminalView {
    fn draw_board(&mut self, theme: Theme) {
        println!("\n--- {} ---", theme);
    }

    fn render_roster(&mut self, roster: &[PositionedCharacter]) {
        for row in 0..BOARD_SIZE {
            let line: String = (0..BOARD_SIZE)
                .map(|col| {
                    roster
                        .iter()
                        .find(|pc| pc.position() == row * BOARD_SIZE + col)
                        .map_or_else(|| empty_cell(row * BOARD_SIZE + col), glyph)
                })
                .collect();
            println!("  {}", line);
        }
        println!();
    }

    fn highlight_cell(&mut self, _index: usize, _color: Highlight) {}
    fn clear_highlight(&mut self, _index: usize) {}
    fn set_cursor(&mut self, _cursor: Cursor) {}
    fn show_tooltip(&mut self, _text: &str, _index: usize) {}
    fn hide_tooltip(&mut self, _index: usize) {}

    async fn animate_health(&mut self, index: usize, from: f64, to: f64) {
        self.pause().await;
        println!(
            "  cell {:>2}: health {} -> {} ({})",
            index,
            display_health(from),
            display_health(to),
            band(to)
        );
    }

    async fn show_damage_number(&mut self, index: usize, amount: f64) {
        self.pause().await;
        println!("  cell {:>2}: -{:.1}", index, amount);
    }

    fn show_message(&mut self, text: &str) {
        println!("{}", text);
    }

    fn show_error(&mut self, text: &str) {
        eprintln!("{}", text);
    }
}
