// ═══════════════════════════════════════════════════════════════════════
// Board geometry — index ↔ row/column, queen-line reach, distances
// Pure functions; no roster knowledge.
// ═══════════════════════════════════════════════════════════════════════

/// The 8 queen directions as (row delta, column delta).
pub const DIRECTIONS: [(isize, isize); 8] = [
    (-1, -1), (-1, 0), (-1, 1),
    (0, -1),           (0, 1),
    (1, -1),  (1, 0),  (1, 1),
];

/// Split a linear cell index into `(row, column)`.
pub fn to_row_col(index: usize, board_size: usize) -> (usize, usize) {
    (index / board_size, index % board_size)
}

pub fn to_index(row: usize, col: usize, board_size: usize) -> usize {
    row * board_size + col
}

pub fn is_on_board(index: usize, board_size: usize) -> bool {
    index < board_size * board_size
}

/// Cells reachable from `origin` along the 8 queen lines within
/// `max_distance` steps, sorted ascending. Never includes `origin`.
///
/// Walks each direction outward: O(directions × max_distance).
pub fn cells_in_range(origin: usize, max_distance: usize, board_size: usize) -> Vec<usize> {
    if !is_on_board(origin, board_size) || max_distance == 0 {
        return Vec::new();
    }
    // no line on the board is longer than board_size - 1 steps
    let max_distance = max_distance.min(board_size.saturating_sub(1));
    let (row, col) = to_row_col(origin, board_size);
    let size = board_size as isize;
    let mut cells = Vec::with_capacity(DIRECTIONS.len() * max_distance);

    for &(dr, dc) in &DIRECTIONS {
        let mut r = row as isize;
        let mut c = col as isize;
        for _ in 0..max_distance {
            r += dr;
            c += dc;
            if r < 0 || c < 0 || r >= size || c >= size {
                break;
            }
            cells.push(to_index(r as usize, c as usize, board_size));
        }
    }

    cells.sort_unstable();
    cells
}

/// Same set as [`cells_in_range`], computed by scanning every cell and
/// keeping those on a straight or diagonal line within Chebyshev range.
/// O(board_size²); kept as an independent reference.
pub fn scan_cells_in_range(origin: usize, max_distance: usize, board_size: usize) -> Vec<usize> {
    if !is_on_board(origin, board_size) {
        return Vec::new();
    }
    let (row, col) = to_row_col(origin, board_size);
    let mut cells = Vec::new();

    for r in 0..board_size {
        for c in 0..board_size {
            let dr = r.abs_diff(row);
            let dc = c.abs_diff(col);
            let on_line = r == row || c == col || dr == dc;
            let distance = dr.max(dc);
            if on_line && distance != 0 && distance <= max_distance {
                cells.push(to_index(r, c, board_size));
            }
        }
    }
    cells
}

/// |Δrow| + |Δcol| on the 2-D grid.
pub fn manhattan_distance(a: usize, b: usize, board_size: usize) -> usize {
    let (ra, ca) = to_row_col(a, board_size);
    let (rb, cb) = to_row_col(b, board_size);
    ra.abs_diff(rb) + ca.abs_diff(cb)
}

/// Plain difference of linear indices, as used by AI attack scoring.
pub fn linear_distance(a: usize, b: usize) -> usize {
    a.abs_diff(b)
}

/// Where a cell sits relative to the board edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileKind {
    TopLeft,
    Top,
    TopRight,
    Left,
    Center,
    Right,
    BottomLeft,
    Bottom,
    BottomRight,
}

impl TileKind {
    pub fn of(index: usize, board_size: usize) -> TileKind {
        // 0 = first, 1 = middle, 2 = last along one axis
        let edge = |p: usize| {
            if p == 0 {
                0
            } else if p + 1 == board_size {
                2
            } else {
                1
            }
        };
        let (row, col) = to_row_col(index, board_size);
        match (edge(row), edge(col)) {
            (0, 0) => TileKind::TopLeft,
            (0, 1) => TileKind::Top,
            (0, _) => TileKind::TopRight,
            (1, 0) => TileKind::Left,
            (1, 1) => TileKind::Center,
            (1, _) => TileKind::Right,
            (_, 0) => TileKind::BottomLeft,
            (_, 1) => TileKind::Bottom,
            _ => TileKind::BottomRight,
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            TileKind::TopLeft => "top-left",
            TileKind::Top => "top",
            TileKind::TopRight => "top-right",
            TileKind::Left => "left",
            TileKind::Center => "center",
            TileKind::Right => "right",
            TileKind::BottomLeft => "bottom-left",
            TileKind::Bottom => "bottom",
            TileKind::BottomRight => "bottom-right",
        }
    }
}
