//! Single-threaded sweeps.

use std::sync::Arc;

use super::grid::Grid;
use super::observer::{NoopObserver, TileObserver};
use super::stepping::{ConvergenceFlag, Strategy};
use super::tile::{process_tile, Mode, Tile, TileLattice};
use crate::error::Result;

/// Whole interior as one big tile, row by row.
pub struct Sequential {
    observer: Arc<dyn TileObserver>,
}

impl Sequential {
    pub fn new() -> Self {
        Sequential {
            observer: Arc::new(NoopObserver),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn TileObserver>) -> Self {
        self.observer = observer;
        self
    }
}

impl Default for Sequential {
    fn default() -> Self {
        Self::new()
    }
}

impl Strategy for Sequential {
    fn name(&self) -> &'static str {
        "sequential"
    }

    fn sweep(&self, grid: &mut Grid) -> bool {
        let dim = grid.dim();
        let tile = Tile::new(1, 1, dim - 2, dim - 2);
        // SAFETY: exclusive borrow, single thread.
        unsafe { process_tile(grid.shared(), &tile, Mode::Whole, 0, &*self.observer) }
    }
}

/// Tile lattice visited in row-major order, each tile processed whole.
pub struct TiledSequential {
    lattice: TileLattice,
    tiles: Vec<Tile>,
    observer: Arc<dyn TileObserver>,
}

impl TiledSequential {
    pub fn new(dim: usize, tile_width: usize, tile_height: usize) -> Result<Self> {
        let lattice = TileLattice::new(dim, tile_width, tile_height)?;
        let tiles = lattice.tiles();
        Ok(TiledSequential {
            lattice,
            tiles,
            observer: Arc::new(NoopObserver),
        })
    }

    pub fn with_observer(mut self, observer: Arc<dyn TileObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn lattice(&self) -> &TileLattice {
        &self.lattice
    }
}

impl Strategy for TiledSequential {
    fn name(&self) -> &'static str {
        "tiled"
    }

    fn dim(&self) -> Option<usize> {
        Some(self.lattice.dim())
    }

    fn sweep(&self, grid: &mut Grid) -> bool {
        assert_eq!(
            grid.dim(),
            self.lattice.dim(),
            "tiled strategy used on a grid of the wrong size"
        );
        let cells = grid.shared();
        let mut changed = ConvergenceFlag::default();
        for tile in &self.tiles {
            // SAFETY: exclusive borrow, single thread, tile inside the interior.
            changed.fold(unsafe { process_tile(cells, tile, Mode::Whole, 0, &*self.observer) });
        }
        changed.changed()
    }
}
