//! The chip-firing rule.
//!
//! A cell holding `v >= 4` grains sends `v / 4` to each of its four axis
//! neighbours and keeps `v % 4`. Only the cell and those four neighbours are
//! touched, which is what makes tile-level parallelism possible.

use super::grid::{Grid, SharedCells};

/// Grains needed for a cell to topple.
pub const THRESHOLD: u32 = 4;

/// Apply the toppling rule to `(y, x)`.
///
/// Returns `true` if the cell toppled.
///
/// Cell values are unbounded `u32`s. A neighbour pushed past `u32::MAX`
/// wraps around modulo 2^32; mass conservation only holds while no cell
/// overflows.
///
/// # Panics
/// If `(y, x)` is not an interior cell.
pub fn topple(grid: &mut Grid, y: usize, x: usize) -> bool {
    assert!(
        grid.is_interior(y, x),
        "cell ({y}, {x}) is not inside a {d}x{d} grid's interior",
        d = grid.dim()
    );
    // SAFETY: exclusive borrow of the grid, and (y, x) is interior so all
    // four neighbours are in bounds.
    unsafe { topple_shared(grid.shared(), y, x) }
}

/// Raw form of [`topple`] used by the tile executor.
///
/// # Safety
/// - `(y, x)` must be an interior cell of the grid behind `cells`
/// - no other thread may access `(y, x)` or its four neighbours during the call
#[inline]
pub(crate) unsafe fn topple_shared(cells: SharedCells<'_>, y: usize, x: usize) -> bool {
    let dim = cells.dim();
    let idx = y * dim + x;
    let centre = cells.cell(idx);
    let value = *centre;
    if value < THRESHOLD {
        return false;
    }

    let share = value / THRESHOLD;
    for neighbour in [idx - 1, idx + 1, idx - dim, idx + dim] {
        let cell = cells.cell(neighbour);
        *cell = (*cell).wrapping_add(share);
    }
    *centre = value % THRESHOLD;
    true
}
