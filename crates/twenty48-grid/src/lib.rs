//! twenty48-grid: the 4x4 sliding-tile merge engine
//!
//! This crate provides:
//! - A `Grid` that owns all game state (tiles with stable identities,
//!   win/terminal flags) and exposes one mutating operation, `make_move`
//! - An `Observer` trait fired synchronously as moves resolve (render
//!   sync, score, audio cue selection, persistence)
//! - A compact `Snapshot` form (16 exponents, row-major) for resuming games
//!
//! Quick start:
//! ```
//! use rand::{rngs::StdRng, SeedableRng};
//! use twenty48_grid::engine::{Grid, Move};
//!
//! // Deterministic grid with a seeded RNG and no observer
//! let mut grid = Grid::with_rng(StdRng::seed_from_u64(42), ());
//! grid.make_move(Move::Left);
//! assert!(!grid.is_game_over());
//! ```
//!
//! Note: `Grid::new` seeds from entropy; prefer `with_rng`/`restore_with_rng`
//! when you need determinism.

pub mod engine;
