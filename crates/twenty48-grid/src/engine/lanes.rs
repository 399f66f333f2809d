use super::tile::Move;

/// Scan-order tables for the four directions.
///
/// Why: a move processes the grid as 4 independent lanes (rows or columns),
/// each collapsing toward the lane's first cell. Encoding the cell order as
/// const data keeps the merge walk itself direction-agnostic; no
/// per-direction branching survives past the table lookup.
///
/// Layout: `lanes(dir)[k]` lists the row-major cell indices of lane `k`,
/// ordered from the edge tiles collapse toward.
const LANES_UP: [[usize; 4]; 4] = [[0, 4, 8, 12], [1, 5, 9, 13], [2, 6, 10, 14], [3, 7, 11, 15]];
const LANES_RIGHT: [[usize; 4]; 4] = [[3, 2, 1, 0], [7, 6, 5, 4], [11, 10, 9, 8], [15, 14, 13, 12]];
const LANES_DOWN: [[usize; 4]; 4] = [[12, 8, 4, 0], [13, 9, 5, 1], [14, 10, 6, 2], [15, 11, 7, 3]];
const LANES_LEFT: [[usize; 4]; 4] = [[0, 1, 2, 3], [4, 5, 6, 7], [8, 9, 10, 11], [12, 13, 14, 15]];

#[inline]
pub(crate) fn lanes(direction: Move) -> &'static [[usize; 4]; 4] {
    match direction {
        Move::Up => &LANES_UP,
        Move::Right => &LANES_RIGHT,
        Move::Down => &LANES_DOWN,
        Move::Left => &LANES_LEFT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::tile::CELLS;

    #[test]
    fn it_maps_directions_to_lanes() {
        assert_eq!(lanes(Move::Up)[0], [0, 4, 8, 12]);
        assert_eq!(lanes(Move::Right)[1], [7, 6, 5, 4]);
        assert_eq!(lanes(Move::Down)[2], [14, 10, 6, 2]);
        assert_eq!(lanes(Move::Left)[3], [12, 13, 14, 15]);
    }

    #[test]
    fn it_covers_every_cell_exactly_once() {
        for dir in Move::ALL {
            let mut seen = [false; CELLS];
            for lane in lanes(dir) {
                for &cell in lane {
                    assert!(!seen[cell], "{dir:?} visits cell {cell} twice");
                    seen[cell] = true;
                }
            }
            assert!(seen.iter().all(|&s| s), "{dir:?} misses cells");
        }
    }
}
