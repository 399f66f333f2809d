use std::collections::BTreeMap;
use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::lanes::lanes;
use super::observer::Observer;
use super::tile::{Move, Phase, Tile, TileId, CELLS, SIDE};

/// First tile value that counts as winning the game.
pub const GOAL_TILE: u32 = 2048;

/// Largest exponent a 4x4 game can produce (131072).
const MAX_EXPONENT: u8 = 17;

/// Resumable rest-state form: 16 base-2 exponents in row-major order,
/// 0 for an empty cell (so a cell's value is `2^exponent`).
pub type Snapshot = [u8; CELLS];

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotError {
    #[error("snapshot must have 16 cells, got {0}")]
    BadLength(usize),
    #[error("snapshot cell {cell}: exponent {exponent} out of range")]
    BadExponent { cell: usize, exponent: u8 },
}

/// Validate a raw byte sequence into a [`Snapshot`]: exactly 16 entries,
/// each either 0 (empty) or an exponent no larger than the largest
/// reachable tile.
pub fn parse_snapshot(raw: &[u8]) -> Result<Snapshot, SnapshotError> {
    let snapshot: Snapshot = raw
        .try_into()
        .map_err(|_| SnapshotError::BadLength(raw.len()))?;
    for (cell, &exponent) in snapshot.iter().enumerate() {
        if exponent > MAX_EXPONENT {
            return Err(SnapshotError::BadExponent { cell, exponent });
        }
    }
    Ok(snapshot)
}

/// The grid engine: owns the tile set, the win/terminal flags, the RNG and
/// the observer. `make_move` is the only mutating operation.
///
/// Tiles are keyed by their monotonically allocated [`TileId`] in a
/// `BTreeMap`, so iteration (and every notification payload) is in
/// allocation order and fully deterministic for a given RNG.
pub struct Grid<R: Rng, O: Observer> {
    tiles: BTreeMap<TileId, Tile>,
    next_id: u64,
    game_over: bool,
    won: bool,
    rng: R,
    observer: O,
}

impl<O: Observer> Grid<StdRng, O> {
    /// Start a fresh grid: spawns two tiles, then notifies `state_changed`
    /// (the new resumable state) and `tiles_changed`.
    ///
    /// ```
    /// use twenty48_grid::engine::Grid;
    /// let grid = Grid::new(());
    /// assert_eq!(grid.tiles().len(), 2);
    /// ```
    pub fn new(observer: O) -> Self {
        Self::with_rng(StdRng::from_entropy(), observer)
    }

    /// Restore a grid from a serialized snapshot (16 row-major exponents).
    ///
    /// Notifies `tiles_changed` only; the given state is already known to
    /// whoever persisted it, so no `state_changed` fires. A restored tile
    /// at or above [`GOAL_TILE`] marks the game as already won, which keeps
    /// the win notification from ever firing again.
    ///
    /// ```
    /// use twenty48_grid::engine::Grid;
    /// let mut state = [0u8; 16];
    /// state[0] = 1; // a 2 in the corner
    /// let grid = Grid::restore(&state, ()).unwrap();
    /// assert_eq!(grid.state(), Some(state));
    /// ```
    pub fn restore(raw: &[u8], observer: O) -> Result<Self, SnapshotError> {
        Self::restore_with_rng(raw, StdRng::from_entropy(), observer)
    }
}

impl<R: Rng, O: Observer> Grid<R, O> {
    /// Like [`Grid::new`] with an explicit RNG, for deterministic play.
    pub fn with_rng(rng: R, observer: O) -> Self {
        let mut grid = Self::empty(rng, observer);
        grid.spawn_tile();
        grid.spawn_tile();
        let state = grid.state();
        grid.observer.state_changed(state.as_ref());
        grid.emit_tiles();
        grid
    }

    /// Like [`Grid::restore`] with an explicit RNG.
    pub fn restore_with_rng(raw: &[u8], rng: R, observer: O) -> Result<Self, SnapshotError> {
        let snapshot = parse_snapshot(raw)?;
        let mut grid = Self::empty(rng, observer);
        for (cell, &exponent) in snapshot.iter().enumerate() {
            if exponent == 0 {
                continue;
            }
            let value = 1u32 << exponent;
            grid.insert_tile(cell, value);
            if value >= GOAL_TILE {
                grid.won = true;
            }
        }
        grid.emit_tiles();
        Ok(grid)
    }

    fn empty(rng: R, observer: O) -> Self {
        Self {
            tiles: BTreeMap::new(),
            next_id: 0,
            game_over: false,
            won: false,
            rng,
            observer,
        }
    }

    /// Slide and merge toward `direction`, spawn one tile if anything
    /// shifted, and fire the observer callbacks in their fixed order.
    /// A no-op after the grid is terminal, and fully silent when nothing
    /// can shift.
    pub fn make_move(&mut self, direction: Move) {
        if self.game_over {
            return;
        }
        // Tiles merged away on the previous move have been visible for one
        // update; drop them before computing the rest-state view.
        self.sweep_merged();
        let occupancy = self.occupancy();

        let mut moved = false;
        let mut won_now = false;
        let mut score_added: u32 = 0;
        let mut largest_merge: u32 = 0;

        for lane in lanes(direction) {
            // `anchor` is the most recently placed tile in the compacted
            // lane; `slot` indexes the next free target cell.
            let mut anchor: Option<TileId> = None;
            let mut slot = 0usize;
            for &cell in lane {
                let Some(id) = occupancy[cell] else { continue };
                let value = self.tiles[&id].value;
                match anchor {
                    Some(anchor_id) if self.tiles[&anchor_id].value == value => {
                        // Merge: the anchor doubles, the arriving tile is
                        // snapped onto it and scheduled for removal.
                        // Clearing the anchor stops a third equal tile from
                        // cascading into the same cell this move.
                        let (row, col) = {
                            let anchor_tile = &self.tiles[&anchor_id];
                            (anchor_tile.row, anchor_tile.col)
                        };
                        let loser = self.tiles.get_mut(&id).expect("tile in occupancy");
                        loser.phase = Phase::PendingRemoval;
                        loser.row = row;
                        loser.col = col;
                        let merged = {
                            let winner = self.tiles.get_mut(&anchor_id).expect("anchor tile");
                            winner.value *= 2;
                            winner.value
                        };
                        score_added += merged;
                        largest_merge = largest_merge.max(merged);
                        moved = true;
                        if merged == GOAL_TILE && !self.won {
                            self.won = true;
                            won_now = true;
                        }
                        anchor = None;
                    }
                    _ => {
                        let target = lane[slot];
                        if cell != target {
                            let tile = self.tiles.get_mut(&id).expect("tile in occupancy");
                            tile.row = (target / SIDE) as u8;
                            tile.col = (target % SIDE) as u8;
                            moved = true;
                        }
                        anchor = Some(id);
                        slot += 1;
                    }
                }
            }
        }

        let mut locked = false;
        if moved {
            locked = self.spawn_tile();
            self.emit_tiles();
        }
        if score_added > 0 {
            self.observer.score_added(score_added);
        }
        if largest_merge > 0 {
            self.observer.largest_merge(largest_merge);
        }
        if locked && !won_now {
            self.observer.game_over();
        }
        if won_now {
            self.observer.goal_reached(locked);
        }
        if moved {
            let state = self.state();
            self.observer.state_changed(state.as_ref());
        }
    }

    /// Serialized rest state, or `None` once the grid is terminal
    /// (terminal grids are not resumable).
    pub fn state(&self) -> Option<Snapshot> {
        if self.game_over {
            return None;
        }
        let mut out = [0u8; CELLS];
        for tile in self.tiles.values().filter(|t| t.is_live()) {
            out[tile.cell()] = tile.exponent();
        }
        Some(out)
    }

    /// All current tiles in allocation order, pending-removal ones included.
    pub fn tiles(&self) -> Vec<Tile> {
        self.tiles.values().copied().collect()
    }

    /// True once no legal move remains. Terminal is permanent.
    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// True once any tile has reached [`GOAL_TILE`]. Monotonic.
    pub fn has_won(&self) -> bool {
        self.won
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    /// Consume the grid, handing the observer back (e.g. to rewire it into
    /// a fresh grid for a new game).
    pub fn into_observer(self) -> O {
        self.observer
    }

    /// Live-tile view of the 16 cells.
    fn occupancy(&self) -> [Option<TileId>; CELLS] {
        let mut cells = [None; CELLS];
        for tile in self.tiles.values().filter(|t| t.is_live()) {
            cells[tile.cell()] = Some(tile.id);
        }
        cells
    }

    fn sweep_merged(&mut self) {
        self.tiles.retain(|_, tile| tile.is_live());
    }

    fn insert_tile(&mut self, cell: usize, value: u32) -> TileId {
        let id = TileId(self.next_id);
        self.next_id += 1;
        self.tiles.insert(
            id,
            Tile {
                row: (cell / SIDE) as u8,
                col: (cell % SIDE) as u8,
                value,
                id,
                phase: Phase::Live,
            },
        );
        id
    }

    /// Spawn a 2 (90%) or 4 (10%) on a uniformly random empty cell.
    /// Returns whether this spawn filled the grid AND left it stuck.
    ///
    /// Callers must guarantee at least one empty cell; every internal call
    /// site does (a move that shifted anything always frees or keeps one).
    fn spawn_tile(&mut self) -> bool {
        let occupancy = self.occupancy();
        let empties: Vec<usize> = (0..CELLS).filter(|&c| occupancy[c].is_none()).collect();
        debug_assert!(!empties.is_empty(), "spawn_tile needs an empty cell");
        let cell = empties[self.rng.gen_range(0..empties.len())];
        let value = if self.rng.gen_range(0..10) < 9 { 2 } else { 4 };
        self.insert_tile(cell, value);
        if empties.len() == 1 {
            self.detect_stuck()
        } else {
            false
        }
    }

    /// Terminal check over the rest-state view; only meaningful on a full
    /// grid. A cell keeps the game alive if it is empty or its neighbor
    /// below or to the right is empty or equal (merges are symmetric, so
    /// two of the four directions suffice). Sets and returns the terminal
    /// flag.
    fn detect_stuck(&mut self) -> bool {
        let mut values = [0u32; CELLS];
        for tile in self.tiles.values().filter(|t| t.is_live()) {
            values[tile.cell()] = tile.value;
        }
        let mut stuck = true;
        'scan: for row in 0..SIDE {
            for col in 0..SIDE {
                let value = values[row * SIDE + col];
                let below = (row + 1 < SIDE).then(|| values[(row + 1) * SIDE + col]);
                let right = (col + 1 < SIDE).then(|| values[row * SIDE + col + 1]);
                if value == 0
                    || below.is_some_and(|v| v == 0 || v == value)
                    || right.is_some_and(|v| v == 0 || v == value)
                {
                    stuck = false;
                    break 'scan;
                }
            }
        }
        self.game_over = stuck;
        stuck
    }

    fn emit_tiles(&mut self) {
        let tiles = self.tiles();
        self.observer.tiles_changed(&tiles);
    }
}

impl<R: Rng, O: Observer> fmt::Display for Grid<R, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut values = [0u32; CELLS];
        for tile in self.tiles.values().filter(|t| t.is_live()) {
            values[tile.cell()] = tile.value;
        }
        for row in 0..SIDE {
            if row > 0 {
                writeln!(f, "{}", "-".repeat(SIDE * 8))?;
            }
            let cells: Vec<String> = (0..SIDE)
                .map(|col| match values[row * SIDE + col] {
                    0 => " ".repeat(7),
                    v => format!("{v:^7}"),
                })
                .collect();
            writeln!(f, "{}", cells.join("|"))?;
        }
        Ok(())
    }
}
