//! Core sandpile logic.
//!
//! This module contains the grid store, the toppling rule, the tile executor
//! and the sweep strategies. The FFI layer in `ffi/` calls into these through
//! [`crate::Sandpile`].

pub mod grid;
pub mod observer;
pub mod parallel;
pub mod sequential;
pub mod stepping;
pub mod tile;
pub mod toppling;

pub use grid::{Grid, MIN_DIM};
pub use observer::{NoopObserver, TileObserver, TracingObserver};
pub use parallel::Parallel;
pub use sequential::{Sequential, TiledSequential};
pub use stepping::{run, ConvergenceFlag, Outcome, Strategy};
pub use tile::{LatticeTile, Mode, Phase, Tile, TileLattice, MIN_TILE};
pub use toppling::{topple, THRESHOLD};
