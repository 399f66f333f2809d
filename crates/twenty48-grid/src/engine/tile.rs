use std::fmt;

use serde::{Deserialize, Serialize};

/// Cells per side of the grid.
pub const SIDE: usize = 4;
/// Total cell count.
pub const CELLS: usize = SIDE * SIDE;

/// A direction to move/merge tiles.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Move {
    Up,
    Right,
    Down,
    Left,
}

impl Move {
    /// All four directions, handy for exhaustive scans.
    pub const ALL: [Move; 4] = [Move::Up, Move::Right, Move::Down, Move::Left];
}

/// Identity of a tile, allocated monotonically per grid and stable for the
/// tile's whole lifetime (frontends key animations on it).
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, Default,
)]
pub struct TileId(pub u64);

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}

/// Lifecycle phase of a tile.
///
/// A tile consumed by a merge is not deleted immediately: it stays in the
/// tile set as `PendingRemoval` (snapped onto its merge target) for one
/// more update so renderers can show the coincident pair, and is swept at
/// the start of the next move.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Phase {
    Live,
    PendingRemoval,
}

/// A single occupied cell.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tile {
    /// Row, 0..4 top to bottom.
    pub row: u8,
    /// Column, 0..4 left to right.
    pub col: u8,
    /// Power of two, minimum 2.
    pub value: u32,
    pub id: TileId,
    pub phase: Phase,
}

impl Tile {
    /// Row-major cell index, `row * 4 + col`.
    #[inline]
    pub fn cell(&self) -> usize {
        self.row as usize * SIDE + self.col as usize
    }

    #[inline]
    pub fn is_live(&self) -> bool {
        self.phase == Phase::Live
    }

    /// Base-2 exponent of the value (2 -> 1, 4 -> 2, ...).
    #[inline]
    pub fn exponent(&self) -> u8 {
        self.value.trailing_zeros() as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_cell_index_is_row_major() {
        let t = Tile {
            row: 2,
            col: 3,
            value: 8,
            id: TileId(0),
            phase: Phase::Live,
        };
        assert_eq!(t.cell(), 11);
        assert_eq!(t.exponent(), 3);
    }

    #[test]
    fn it_orders_ids_by_allocation() {
        assert!(TileId(1) < TileId(2));
        assert_eq!(TileId(7).to_string(), "t7");
    }
}
