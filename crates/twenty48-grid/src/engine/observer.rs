use super::grid::Snapshot;
use super::tile::Tile;

/// Callbacks fired synchronously by [`Grid`](super::Grid) while a move (or
/// construction) resolves. All methods default to no-ops; implement the
/// ones you care about.
///
/// For a move the firing order is fixed: `tiles_changed`, `score_added`,
/// `largest_merge`, `game_over`/`goal_reached`, `state_changed`. A move
/// that shifts nothing fires nothing.
///
/// Callbacks run before `make_move` returns; the engine is non-reentrant,
/// so do not call back into the grid from inside them.
pub trait Observer {
    /// Full current tile list, including pending-removal tiles snapped onto
    /// their merge targets. Render sync point.
    fn tiles_changed(&mut self, _tiles: &[Tile]) {}

    /// Points earned this move (sum of merged values).
    fn score_added(&mut self, _points: u32) {}

    /// Largest merge produced this move; drives cue selection.
    fn largest_merge(&mut self, _value: u32) {}

    /// The grid has become terminal (and the goal was not reached on the
    /// same move).
    fn game_over(&mut self) {}

    /// A tile reached the goal value for the first time ever;
    /// `terminal` reports whether the grid locked on the same move.
    fn goal_reached(&mut self, _terminal: bool) {}

    /// New resumable state, or `None` once the grid is terminal.
    fn state_changed(&mut self, _state: Option<&Snapshot>) {}
}

/// Null observer.
impl Observer for () {}
