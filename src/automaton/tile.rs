//! Tile geometry and the tile executor.
//!
//! The grid is cut into a lattice of `tile_width x tile_height` tiles, clipped
//! to the interior `[1, dim - 1)` on both axes. A tile can be processed whole,
//! or split into its outer ring (border mode) and everything inside it
//! (interior mode):
//!
//! ```text
//!  B B B B
//!  B i i B     B: border mode, may write into adjacent tiles
//!  B i i B     i: interior mode, writes stay inside this tile
//!  B B B B
//! ```
//!
//! Border writes reach at most one cell into an adjacent tile, so border
//! passes over tiles whose lattice coordinates share a parity class never
//! alias as long as tiles are at least 2 cells wide and high.

use std::collections::HashSet;

use super::grid::SharedCells;
use super::observer::TileObserver;
use super::toppling::topple_shared;
use crate::error::{Result, SandpileError};

/// Smallest tile edge for which same-parity border passes cannot alias.
pub const MIN_TILE: usize = 2;

/// Rectangular scheduling unit. Has no storage of its own.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Tile {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl Tile {
    pub fn new(x: usize, y: usize, width: usize, height: usize) -> Self {
        Tile {
            x,
            y,
            width,
            height,
        }
    }

    /// Cells on the outer ring, each exactly once, in processing order.
    pub fn border_cells(&self) -> Vec<(usize, usize)> {
        let mut out = Vec::with_capacity(2 * (self.width + self.height));
        let (top, bottom) = (self.y, self.y + self.height - 1);
        let (left, right) = (self.x, self.x + self.width - 1);

        out.extend((left..=right).map(|x| (top, x)));
        if bottom != top {
            out.extend((left..=right).map(|x| (bottom, x)));
        }
        for y in top + 1..bottom {
            out.push((y, left));
            if right != left {
                out.push((y, right));
            }
        }
        out
    }
}

/// Which cells of a tile the executor visits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Every cell, row by row.
    Whole,
    /// Cells strictly inside the tile's outer ring.
    Interior,
    /// The outer ring only.
    Border,
}

/// Parity class of lattice coordinates used by one border pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    EvenRowEvenCol,
    OddRowEvenCol,
    EvenRowOddCol,
    OddRowOddCol,
}

impl Phase {
    /// Order in which a parallel sweep runs the border passes.
    pub const BORDER_ORDER: [Phase; 4] = [
        Phase::EvenRowEvenCol,
        Phase::OddRowEvenCol,
        Phase::EvenRowOddCol,
        Phase::OddRowOddCol,
    ];

    pub fn of(row: usize, col: usize) -> Phase {
        match (row % 2, col % 2) {
            (0, 0) => Phase::EvenRowEvenCol,
            (1, 0) => Phase::OddRowEvenCol,
            (0, _) => Phase::EvenRowOddCol,
            _ => Phase::OddRowOddCol,
        }
    }
}

/// A tile together with its lattice coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LatticeTile {
    pub row: usize,
    pub col: usize,
    pub tile: Tile,
}

/// Fixed partition of a grid's interior into tiles.
#[derive(Clone, Debug)]
pub struct TileLattice {
    dim: usize,
    tile_width: usize,
    tile_height: usize,
    tiles: Vec<LatticeTile>,
}

impl TileLattice {
    /// Check that a tile size can be used on a `dim x dim` grid.
    pub fn check_tile_size(dim: usize, tile_width: usize, tile_height: usize) -> Result<()> {
        let fits = |edge: usize| (MIN_TILE..=dim).contains(&edge);
        if !fits(tile_width) || !fits(tile_height) {
            return Err(SandpileError::invalid_tile(tile_width, tile_height, dim));
        }
        Ok(())
    }

    /// Build the lattice. Tile sizes need not divide `dim`; the last row and
    /// column of tiles are then narrower.
    pub fn new(dim: usize, tile_width: usize, tile_height: usize) -> Result<Self> {
        if dim < super::grid::MIN_DIM {
            return Err(SandpileError::DimensionTooSmall {
                dim,
                min: super::grid::MIN_DIM,
            });
        }
        Self::check_tile_size(dim, tile_width, tile_height)?;

        let rows = dim.div_ceil(tile_height);
        let cols = dim.div_ceil(tile_width);
        let mut tiles = Vec::with_capacity(rows * cols);

        for row in 0..rows {
            // Clip to the interior: the sink layer is never handed to a tile.
            let y_start = (row * tile_height).max(1);
            let y_end = ((row + 1) * tile_height).min(dim - 1);
            for col in 0..cols {
                let x_start = (col * tile_width).max(1);
                let x_end = ((col + 1) * tile_width).min(dim - 1);
                if y_end <= y_start || x_end <= x_start {
                    continue;
                }
                tiles.push(LatticeTile {
                    row,
                    col,
                    tile: Tile::new(x_start, y_start, x_end - x_start, y_end - y_start),
                });
            }
        }

        Ok(TileLattice {
            dim,
            tile_width,
            tile_height,
            tiles,
        })
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn tile_size(&self) -> (usize, usize) {
        (self.tile_width, self.tile_height)
    }

    pub fn lattice_tiles(&self) -> &[LatticeTile] {
        &self.tiles
    }

    /// All tiles in row-major lattice order.
    pub fn tiles(&self) -> Vec<Tile> {
        self.tiles.iter().map(|t| t.tile).collect()
    }

    /// Tiles belonging to one parity class.
    pub fn phase(&self, phase: Phase) -> Vec<Tile> {
        self.tiles
            .iter()
            .filter(|t| Phase::of(t.row, t.col) == phase)
            .map(|t| t.tile)
            .collect()
    }

    /// Linear indices of every cell a border pass over `tile` may read or write:
    /// the ring itself plus each ring cell's four neighbours.
    pub fn border_write_set(&self, tile: &Tile) -> HashSet<usize> {
        let dim = self.dim;
        let mut set = HashSet::new();
        for (y, x) in tile.border_cells() {
            let idx = y * dim + x;
            set.extend([idx, idx - 1, idx + 1, idx - dim, idx + dim]);
        }
        set
    }

    /// True if, within every phase, no two tiles' border write sets intersect.
    pub fn phases_are_disjoint(&self) -> bool {
        Phase::BORDER_ORDER.iter().all(|&phase| {
            let mut seen = HashSet::new();
            self.phase(phase).iter().all(|tile| {
                self.border_write_set(tile)
                    .into_iter()
                    .all(|idx| seen.insert(idx))
            })
        })
    }
}

/// Apply the toppling rule over the cells of `tile` selected by `mode`.
///
/// Returns `true` if any of those cells toppled.
///
/// # Safety
/// `tile` must lie inside the grid's interior, and for the duration of the
/// call no other thread may access the cells this `mode` reads or writes.
/// For [`Mode::Interior`] that is the tile itself; for the other modes it also
/// includes the one-cell ring around the tile.
pub(crate) unsafe fn process_tile(
    cells: SharedCells<'_>,
    tile: &Tile,
    mode: Mode,
    worker: usize,
    observer: &dyn TileObserver,
) -> bool {
    debug_assert!(
        tile.x >= 1
            && tile.y >= 1
            && tile.x + tile.width < cells.dim()
            && tile.y + tile.height < cells.dim(),
        "tile {tile:?} reaches into the sink layer"
    );

    observer.tile_started(tile, worker);
    let changed = match mode {
        Mode::Whole => whole(cells, tile),
        Mode::Interior => interior(cells, tile),
        Mode::Border => border(cells, tile),
    };
    observer.tile_finished(tile, worker);
    changed
}

unsafe fn whole(cells: SharedCells<'_>, tile: &Tile) -> bool {
    let mut changed = false;
    for y in tile.y..tile.y + tile.height {
        for x in tile.x..tile.x + tile.width {
            changed |= topple_shared(cells, y, x);
        }
    }
    changed
}

unsafe fn interior(cells: SharedCells<'_>, tile: &Tile) -> bool {
    let mut changed = false;
    for y in tile.y + 1..tile.y + tile.height - 1 {
        for x in tile.x + 1..tile.x + tile.width - 1 {
            changed |= topple_shared(cells, y, x);
        }
    }
    changed
}

// Same order as Tile::border_cells, without the allocation.
unsafe fn border(cells: SharedCells<'_>, tile: &Tile) -> bool {
    let (top, bottom) = (tile.y, tile.y + tile.height - 1);
    let (left, right) = (tile.x, tile.x + tile.width - 1);
    let mut changed = false;

    for x in left..=right {
        changed |= topple_shared(cells, top, x);
    }
    if bottom != top {
        for x in left..=right {
            changed |= topple_shared(cells, bottom, x);
        }
    }
    for y in top + 1..bottom {
        changed |= topple_shared(cells, y, left);
        if right != left {
            changed |= topple_shared(cells, y, right);
        }
    }
    changed
}
