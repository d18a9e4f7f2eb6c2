// ═══════════════════════════════════════════════════════════════════════
// Navigation — legal move and attack cells for a piece on the roster
//
// Movement ignores blockers on the way (pieces jump), but the landing
// cell must be empty. Attacks only land on cells held by the opposing
// faction. A stale index with nobody on it yields no cells.
// ═══════════════════════════════════════════════════════════════════════

use crate::board;
use crate::types::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeMode {
    Move,
    Attack,
}

/// Find the roster entry standing on `index`.
pub fn find_at(roster: &[PositionedCharacter], index: usize) -> Option<&PositionedCharacter> {
    roster.iter().find(|pc| pc.position() == index)
}

pub fn is_occupied(roster: &[PositionedCharacter], index: usize) -> bool {
    find_at(roster, index).is_some()
}

/// Class distance for a mode.
pub fn max_distance(kind: CharacterType, mode: RangeMode) -> usize {
    match mode {
        RangeMode::Move => kind.move_distance(),
        RangeMode::Attack => kind.attack_distance(),
    }
}

/// Legal cells for the piece at `origin` in the given mode.
pub fn range_from(roster: &[PositionedCharacter], origin: usize, mode: RangeMode) -> Vec<usize> {
    let Some(piece) = find_at(roster, origin) else {
        return Vec::new();
    };
    let kind = piece.character().kind();
    let faction = kind.faction();
    let reach = board::cells_in_range(origin, max_distance(kind, mode), BOARD_SIZE);

    let cells: Vec<usize> = match mode {
        RangeMode::Move => reach
            .into_iter()
            .filter(|&cell| !is_occupied(roster, cell))
            .collect(),
        RangeMode::Attack => reach
            .into_iter()
            .filter(|&cell| {
                find_at(roster, cell).is_some_and(|target| target.faction() != faction)
            })
            .collect(),
    };
    log::trace!("{:?} range from {} ({}): {:?}", mode, origin, kind, cells);
    cells
}

pub fn move_cells(roster: &[PositionedCharacter], origin: usize) -> Vec<usize> {
    range_from(roster, origin, RangeMode::Move)
}

pub fn attack_cells(roster: &[PositionedCharacter], origin: usize) -> Vec<usize> {
    range_from(roster, origin, RangeMode::Attack)
}

pub fn can_move(roster: &[PositionedCharacter], from: usize, to: usize) -> bool {
    move_cells(roster, from).contains(&to)
}

pub fn can_attack(roster: &[PositionedCharacter], from: usize, to: usize) -> bool {
    attack_cells(roster, from).contains(&to)
}

/// All pieces of one faction, in roster order.
pub fn faction_members(roster: &[PositionedCharacter], faction: Faction) -> Vec<&PositionedCharacter> {
    roster.iter().filter(|pc| pc.faction() == faction).collect()
}

pub fn faction_count(roster: &[PositionedCharacter], faction: Faction) -> usize {
    roster.iter().filter(|pc| pc.faction() == faction).count()
}
