//! Grid storage and bounds-checked cell access.

use std::marker::PhantomData;

use super::toppling::THRESHOLD;
use crate::error::{Result, SandpileError};

/// Smallest grid with at least one interior cell.
pub const MIN_DIM: usize = 3;

/// Square grid of grain counts.
///
/// Rows and columns `0` and `dim - 1` form the sink layer: they collect grains
/// pushed out of the interior but are never toppled themselves.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    dim: usize,
    cells: Vec<u32>, // row-major, y * dim + x
}

impl Grid {
    /// Allocate a zero-filled `dim x dim` grid.
    ///
    /// Fails instead of aborting when the cell buffer cannot be allocated.
    pub fn new(dim: usize) -> Result<Self> {
        let count = cell_count(dim)?;
        let mut cells = Vec::new();
        cells.try_reserve_exact(count)?;
        cells.resize(count, 0);
        Ok(Grid { dim, cells })
    }

    /// Build a grid from an existing row-major buffer.
    pub fn from_cells(dim: usize, cells: Vec<u32>) -> Result<Self> {
        let count = cell_count(dim)?;
        if cells.len() != count {
            return Err(SandpileError::CellCount {
                expected: count,
                actual: cells.len(),
            });
        }
        Ok(Grid { dim, cells })
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Linear index of `(y, x)`. No bounds check.
    #[inline]
    pub fn index_of(&self, y: usize, x: usize) -> usize {
        y * self.dim + x
    }

    #[inline]
    pub fn in_bounds(&self, y: usize, x: usize) -> bool {
        y < self.dim && x < self.dim
    }

    /// True for cells that the toppling rule may be applied to.
    #[inline]
    pub fn is_interior(&self, y: usize, x: usize) -> bool {
        y >= 1 && x >= 1 && y < self.dim - 1 && x < self.dim - 1
    }

    pub fn get(&self, y: usize, x: usize) -> Result<u32> {
        if !self.in_bounds(y, x) {
            return Err(SandpileError::out_of_bounds(y, x, self.dim));
        }
        Ok(self.cells[self.index_of(y, x)])
    }

    pub fn set(&mut self, y: usize, x: usize, value: u32) -> Result<()> {
        if !self.in_bounds(y, x) {
            return Err(SandpileError::out_of_bounds(y, x, self.dim));
        }
        let idx = self.index_of(y, x);
        self.cells[idx] = value;
        Ok(())
    }

    /// Row-major view of every cell, sink layer included.
    pub fn cells(&self) -> &[u32] {
        &self.cells
    }

    /// Mutable row-major view, for bulk initial configuration.
    pub fn cells_mut(&mut self) -> &mut [u32] {
        &mut self.cells
    }

    /// Grains held anywhere on the grid. Unchanged by toppling.
    pub fn total_mass(&self) -> u64 {
        self.cells.iter().map(|&v| v as u64).sum()
    }

    /// Grains still taking part in the simulation.
    pub fn interior_mass(&self) -> u64 {
        let inner = 1..self.dim - 1;
        self.cells
            .chunks_exact(self.dim)
            .skip(1)
            .take(self.dim - 2)
            .map(|row| row[inner.clone()].iter().map(|&v| v as u64).sum::<u64>())
            .sum()
    }

    /// Grains absorbed by the sink layer.
    pub fn sink_mass(&self) -> u64 {
        self.total_mass() - self.interior_mass()
    }

    /// No interior cell can topple.
    pub fn is_stable(&self) -> bool {
        let inner = 1..self.dim - 1;
        inner
            .clone()
            .all(|y| inner.clone().all(|x| self.cells[self.index_of(y, x)] < THRESHOLD))
    }

    pub(crate) fn shared(&mut self) -> SharedCells<'_> {
        SharedCells {
            ptr: self.cells.as_mut_ptr(),
            dim: self.dim,
            _grid: PhantomData,
        }
    }
}

fn cell_count(dim: usize) -> Result<usize> {
    if dim < MIN_DIM {
        return Err(SandpileError::DimensionTooSmall { dim, min: MIN_DIM });
    }
    dim.checked_mul(dim).ok_or(SandpileError::DimensionTooLarge { dim })
}

/// Raw view of a grid's cells that can be handed to several workers at once.
///
/// Holding one does not make concurrent access safe: callers must ensure that
/// no two threads touch the same cell between synchronization points. The tile
/// lattice's parity phases provide that guarantee for the parallel sweep.
#[derive(Clone, Copy)]
pub(crate) struct SharedCells<'a> {
    ptr: *mut u32,
    dim: usize,
    _grid: PhantomData<&'a mut Grid>,
}

unsafe impl Send for SharedCells<'_> {}
unsafe impl Sync for SharedCells<'_> {}

impl SharedCells<'_> {
    #[inline]
    pub(crate) fn dim(self) -> usize {
        self.dim
    }

    /// Raw pointer to the cell at linear index `idx`.
    ///
    /// # Safety
    /// `idx` must be below `dim * dim`.
    #[inline]
    pub(crate) unsafe fn cell(self, idx: usize) -> *mut u32 {
        unsafe { self.ptr.add(idx) }
    }
}
