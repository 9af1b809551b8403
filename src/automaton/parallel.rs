//! Phased parallel sweep over a tile lattice.
//!
//! One sweep runs five fork-join steps on a rayon pool:
//!
//! 1. border mode on tiles with (even row, even col)
//! 2. border mode on (odd, even)
//! 3. border mode on (even, odd)
//! 4. border mode on (odd, odd)
//! 5. interior mode on every tile
//!
//! Tiles inside one border step are never lattice-adjacent, so their writes
//! never alias; interior writes never leave their own tile. Each `par_iter`
//! returns only after all of its tiles are done, which is the barrier between
//! steps. No locks are taken on the grid.
//!
//! Because nothing within a step aliases, the result of a sweep does not depend
//! on how tiles are spread across workers.

use std::sync::Arc;

use rayon::prelude::*;
use tracing::debug;

use super::grid::{Grid, SharedCells};
use super::observer::{NoopObserver, TileObserver};
use super::stepping::{ConvergenceFlag, Strategy};
use super::tile::{process_tile, Mode, Phase, Tile, TileLattice};
use crate::error::Result;

pub struct Parallel {
    lattice: TileLattice,
    border_phases: [Vec<Tile>; 4],
    tiles: Vec<Tile>,
    thread_pool: rayon::ThreadPool,
    observer: Arc<dyn TileObserver>,
}

impl Parallel {
    /// Build a parallel strategy for a `dim x dim` grid with its own pool of
    /// `workers` threads. A worker count of 0 is treated as 1.
    pub fn new(dim: usize, tile_width: usize, tile_height: usize, workers: usize) -> Result<Self> {
        let lattice = TileLattice::new(dim, tile_width, tile_height)?;
        debug_assert!(
            lattice.phases_are_disjoint(),
            "border phases alias for tile {tile_width}x{tile_height} on {dim}x{dim}"
        );

        let workers = workers.max(1);
        let thread_pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("sandpile-worker-{i}"))
            .build()?;
        debug!(dim, tile_width, tile_height, workers, "parallel sweep pool ready");

        let border_phases = Phase::BORDER_ORDER.map(|phase| lattice.phase(phase));
        let tiles = lattice.tiles();
        Ok(Parallel {
            lattice,
            border_phases,
            tiles,
            thread_pool,
            observer: Arc::new(NoopObserver),
        })
    }

    pub fn with_observer(mut self, observer: Arc<dyn TileObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn workers(&self) -> usize {
        self.thread_pool.current_num_threads()
    }

    pub fn lattice(&self) -> &TileLattice {
        &self.lattice
    }
}

impl Strategy for Parallel {
    fn name(&self) -> &'static str {
        "parallel"
    }

    fn dim(&self) -> Option<usize> {
        Some(self.lattice.dim())
    }

    fn sweep(&self, grid: &mut Grid) -> bool {
        assert_eq!(
            grid.dim(),
            self.lattice.dim(),
            "parallel strategy used on a grid of the wrong size"
        );
        let cells = grid.shared();
        let observer = &*self.observer;

        self.thread_pool.install(|| {
            let mut changed = ConvergenceFlag::default();
            for tiles in &self.border_phases {
                changed.fold(run_phase(cells, tiles, Mode::Border, observer));
            }
            changed.fold(run_phase(cells, &self.tiles, Mode::Interior, observer));
            changed.changed()
        })
    }
}

/// Process `tiles` concurrently; returns once every tile is done.
fn run_phase(cells: SharedCells<'_>, tiles: &[Tile], mode: Mode, observer: &dyn TileObserver) -> bool {
    tiles
        .par_iter()
        .map(|tile| {
            let worker = rayon::current_thread_index().unwrap_or(0);
            // SAFETY: tiles within one border phase have disjoint write sets and
            // interior passes stay inside their own tile, so no two tasks of
            // this call touch the same cell.
            unsafe { process_tile(cells, tile, mode, worker, observer) }
        })
        // Not `any`: it would stop scheduling tiles after the first change.
        .reduce(|| false, |a, b| a | b)
}
