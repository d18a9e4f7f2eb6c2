// ═══════════════════════════════════════════════════════════════════════
// Board View — callbacks the controller drives on the rendering layer
//
// The two animation callbacks are async: the controller awaits each one
// before evaluating the next step of the turn, so a renderer can hold the
// game until a health bar or damage number has finished playing.
// ═══════════════════════════════════════════════════════════════════════

use tactics_engine::types::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Highlight {
    /// Selected own piece.
    Yellow,
    /// Legal move destination.
    Green,
    /// Legal attack target.
    Red,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cursor {
    Auto,
    Pointer,
    Crosshair,
    NotAllowed,
}

#[allow(async_fn_in_trait)]
pub trait BoardView {
    fn draw_board(&mut self, theme: Theme);
    fn render_roster(&mut self, roster: &[PositionedCharacter]);
    fn highlight_cell(&mut self, index: usize, color: Highlight);
    fn clear_highlight(&mut self, index: usize);
    fn set_cursor(&mut self, cursor: Cursor);
    fn show_tooltip(&mut self, text: &str, index: usize);
    fn hide_tooltip(&mut self, index: usize);

    /// Play a health bar change. Values are unclamped model health.
    async fn animate_health(&mut self, index: usize, from: f64, to: f64);
    async fn show_damage_number(&mut self, index: usize, amount: f64);

    fn show_message(&mut self, text: &str);
    fn show_error(&mut self, text: &str);
}

/// Renders nothing. Used by headless games.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullView;

impl BoardView for NullView {
    fn draw_board(&mut self, _theme: Theme) {}
    fn render_roster(&mut self, _roster: &[PositionedCharacter]) {}
    fn highlight_cell(&mut self, _index: usize, _color: Highlight) {}
    fn clear_highlight(&mut self, _index: usize) {}
    fn set_cursor(&mut self, _cursor: Cursor) {}
    fn show_tooltip(&mut self, _text: &str, _index: usize) {}
    fn hide_tooltip(&mut self, _index: usize) {}
    async fn animate_health(&mut self, _index: usize, _from: f64, _to: f64) {}
    async fn show_damage_number(&mut self, _index: usize, _amount: f64) {}
    fn show_message(&mut self, text: &str) {
        log::debug!("message: {}", text);
    }
    fn show_error(&mut self, text: &str) {
        log::debug!("error: {}", text);
    }
}

/// Clamp model health into the displayable 0..=100 band.
pub fn display_health(health: f64) -> f64 {
    health.clamp(0.0, MAX_HEALTH)
}
