// ═══════════════════════════════════════════════════════════════════════
// Statistics — lifetime counters carried inside the game state
// ═══════════════════════════════════════════════════════════════════════

use crate::types::StatRecord;

impl StatRecord {
    pub fn record_player_defeat(&mut self) {
        self.player_defeats += 1;
    }

    pub fn record_enemy_killed(&mut self) {
        self.enemies_killed += 1;
    }

    pub fn record_level_completed(&mut self) {
        self.total_levels_completed += 1;
    }

    /// Raise `max_level_reached` to `level`; never lowers it.
    pub fn update_max_level(&mut self, level: u32) {
        self.max_level_reached = self.max_level_reached.max(level);
    }

    pub fn record_save(&mut self) {
        self.save_usage_count += 1;
    }

    pub fn record_load(&mut self) {
        self.load_usage_count += 1;
    }

    pub fn reset(&mut self) {
        *self = StatRecord::default();
    }

    /// True once any counter has moved off zero.
    pub fn has_saved_statistics(&self) -> bool {
        *self != StatRecord::default()
    }
}
