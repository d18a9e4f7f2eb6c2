// ═══════════════════════════════════════════════════════════════════════
// Turn Engine — turn phases, action validation and resolution
//
// Architecture:
//   The engine is a pure state machine. It never does I/O, never awaits
//   and never asks an agent anything. Callers (the session controller,
//   the headless runner, tests) decide what to do, submit it through
//   `apply_action()`, and read back an `ActionReport` describing what
//   happened and what the board looks like afterwards.
//
// Flow:
//   1. Player input is turned into an `Action` by `interpret_click()`
//   2. `apply_action()` validates it against the Action Range Service and
//      mutates the roster (move or attack)
//   3. The report's `BoardStatus` tells the caller whether to hand over
//      the turn, start the next wave, or stop (game over)
//   4. The computer side answers with its own `Action` (or `Pass`)
// ═══════════════════════════════════════════════════════════════════════

use crate::combat::{self, AttackOutcome};
use crate::error::ActionError;
use crate::navigation;
use crate::state::GameState;
use crate::types::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnPhase {
    PlayerTurn,
    ComputerTurnRunning,
    GameOver,
}

pub fn phase(state: &GameState) -> TurnPhase {
    if state.game_over {
        TurnPhase::GameOver
    } else if state.is_player_turn {
        TurnPhase::PlayerTurn
    } else {
        TurnPhase::ComputerTurnRunning
    }
}

/// Faction whose pieces may act right now.
pub fn acting_faction(state: &GameState) -> Faction {
    if state.is_player_turn {
        Faction::Player
    } else {
        Faction::Computer
    }
}

/// Anything a side can do on its turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Move { from: usize, to: usize },
    Attack { attacker: usize, target: usize },
    /// End the turn without acting (no legal move available).
    Pass,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Moved { from: usize, to: usize },
    Attacked(AttackOutcome),
    Passed,
}

/// Board situation after an action has been resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardStatus {
    /// Both sides still have pieces; the turn has been handed over.
    Ongoing,
    /// The computer side is empty. The caller starts the next wave.
    WaveCleared,
    /// The player side is empty. The game is over.
    PlayerDefeated,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActionReport {
    pub faction: Faction,
    pub resolution: Resolution,
    pub status: BoardStatus,
}

// ── Validation ─────────────────────────────────────────────────────────

fn own_piece(state: &GameState, index: usize) -> Result<&PositionedCharacter, ActionError> {
    if index >= CELL_COUNT {
        return Err(ActionError::OutOfBoard(index));
    }
    let piece = state.character_at(index).ok_or(ActionError::EmptyCell(index))?;
    let faction = acting_faction(state);
    if piece.faction() != faction {
        return Err(ActionError::WrongFaction { cell: index, faction: piece.faction() });
    }
    Ok(piece)
}

/// Check an action against the current state without touching it.
pub fn validate_action(state: &GameState, action: Action) -> Result<(), ActionError> {
    if state.game_over {
        return Err(ActionError::GameOver);
    }
    match action {
        Action::Pass => Ok(()),
        Action::Move { from, to } => {
            own_piece(state, from)?;
            if !navigation::can_move(&state.positioned_characters, from, to) {
                return Err(ActionError::NotInMoveRange { from, to });
            }
            Ok(())
        }
        Action::Attack { attacker, target } => {
            own_piece(state, attacker)?;
            if !navigation::can_attack(&state.positioned_characters, attacker, target) {
                return Err(ActionError::NotInAttackRange { from: attacker, to: target });
            }
            Ok(())
        }
    }
}

// ── Resolution ─────────────────────────────────────────────────────────

/// Validate and resolve one action for the side whose turn it is.
/// An invalid action leaves the state untouched.
pub fn apply_action(state: &mut GameState, action: Action) -> Result<ActionReport, ActionError> {
    validate_action(state, action)?;
    let faction = acting_faction(state);

    let resolution = match action {
        Action::Pass => {
            log::debug!("{} passes", faction);
            Resolution::Passed
        }
        Action::Move { from, to } => {
            move_piece(&mut state.positioned_characters, from, to)?;
            log::debug!("{} moves {} → {}", faction, from, to);
            Resolution::Moved { from, to }
        }
        Action::Attack { attacker, target } => {
            let outcome = combat::resolve_attack(&mut state.positioned_characters, attacker, target)?;
            if outcome.killed.as_ref().is_some_and(|c| !c.is_player()) {
                state.statistics.record_enemy_killed();
            }
            Resolution::Attacked(outcome)
        }
    };

    if !matches!(resolution, Resolution::Passed) {
        state.selected_cell_index = None;
    }
    let status = settle(state);
    Ok(ActionReport { faction, resolution, status })
}

/// Replace the entry at `from` with a new one at `to`, keeping roster order.
fn move_piece(roster: &mut [PositionedCharacter], from: usize, to: usize) -> Result<(), ActionError> {
    let slot = roster
        .iter_mut()
        .find(|pc| pc.position() == from)
        .ok_or(ActionError::EmptyCell(from))?;
    let moved = PositionedCharacter::new(slot.character().clone(), to);
    *slot = moved;
    Ok(())
}

/// Faction emptiness check, without side effects.
pub fn board_status(state: &GameState) -> BoardStatus {
    if state.faction_count(Faction::Player) == 0 {
        BoardStatus::PlayerDefeated
    } else if state.faction_count(Faction::Computer) == 0 {
        BoardStatus::WaveCleared
    } else {
        BoardStatus::Ongoing
    }
}

/// Evaluate the board after an action and advance the turn accordingly.
fn settle(state: &mut GameState) -> BoardStatus {
    let status = board_status(state);
    match status {
        BoardStatus::PlayerDefeated => {
            state.game_over = true;
            state.statistics.record_player_defeat();
            log::info!("player side wiped out, game over");
        }
        BoardStatus::WaveCleared => {
            log::debug!("computer side empty, wave cleared");
        }
        BoardStatus::Ongoing => {
            state.is_player_turn = !state.is_player_turn;
        }
    }
    status
}

// ── Player input ───────────────────────────────────────────────────────

/// What a click on a cell means in the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Nothing happens (game over, same cell, nothing selected).
    Ignored,
    /// The click came during the computer's turn.
    ComputerTurn,
    /// Selection moves to an own piece.
    Select { previous: Option<usize>, index: usize },
    /// A legal move or attack from the selected piece.
    Perform(Action),
    /// A selection exists but the cell is neither reachable nor attackable.
    Invalid,
}

/// Decode a click on `index` against the current selection.
pub fn interpret_click(state: &GameState, index: usize) -> ClickOutcome {
    if state.game_over {
        return ClickOutcome::Ignored;
    }
    if !state.is_player_turn {
        return ClickOutcome::ComputerTurn;
    }
    let selected = state.selected_cell_index;
    if selected == Some(index) {
        return ClickOutcome::Ignored;
    }
    if state.character_at(index).is_some_and(|pc| pc.is_player()) {
        return ClickOutcome::Select { previous: selected, index };
    }
    let Some(from) = selected else {
        return ClickOutcome::Ignored;
    };

    let roster = &state.positioned_characters;
    if navigation::can_move(roster, from, index) {
        ClickOutcome::Perform(Action::Move { from, to: index })
    } else if navigation::can_attack(roster, from, index) {
        ClickOutcome::Perform(Action::Attack { attacker: from, target: index })
    } else {
        ClickOutcome::Invalid
    }
}

/// Select an own piece during the player's turn.
pub fn select_cell(state: &mut GameState, index: usize) -> Result<(), ActionError> {
    if state.game_over {
        return Err(ActionError::GameOver);
    }
    if !state.is_player_turn {
        return Err(ActionError::NotPlayerTurn);
    }
    own_piece(state, index)?;
    state.selected_cell_index = Some(index);
    Ok(())
}
