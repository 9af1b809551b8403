//! Running a sandpile to stabilization.
//!
//! Every entry point returns the 1-based iteration index of the first sweep
//! that changed nothing, `0` if the budget ran out first, or [`SP_INVALID`]
//! if the handle is null or the tiling parameters are rejected.

use tracing::error;

use crate::automaton::Outcome;
use crate::error::Result;
use crate::state::Sandpile;

/// Returned when the run could not start.
pub const SP_INVALID: u32 = u32::MAX;

fn encode(result: Result<Outcome>, entry: &str) -> u32 {
    match result {
        Ok(outcome) => outcome.as_raw(),
        Err(err) => {
            error!(%err, entry, "run rejected");
            SP_INVALID
        }
    }
}

/// Sweeps the whole interior row by row.
///
/// # Safety
/// - `ptr` must be a valid pointer to a Sandpile, or null
#[no_mangle]
pub unsafe extern "C" fn sp_run_seq(ptr: *mut Sandpile, max_iterations: u32) -> u32 {
    if ptr.is_null() {
        return SP_INVALID;
    }

    (*ptr).run_sequential(max_iterations).as_raw()
}

/// Sweeps tile by tile on the calling thread.
///
/// # Safety
/// - `ptr` must be a valid pointer to a Sandpile, or null
#[no_mangle]
pub unsafe extern "C" fn sp_run_tiled(
    ptr: *mut Sandpile,
    max_iterations: u32,
    tile_width: u32,
    tile_height: u32,
) -> u32 {
    if ptr.is_null() {
        return SP_INVALID;
    }

    let pile = &mut *ptr;
    encode(
        pile.run_tiled(max_iterations, tile_width as usize, tile_height as usize),
        "sp_run_tiled",
    )
}

/// Sweeps with the phased parallel scheduler on `workers` threads (0 means 1).
///
/// # Safety
/// - `ptr` must be a valid pointer to a Sandpile, or null
#[no_mangle]
pub unsafe extern "C" fn sp_run_parallel(
    ptr: *mut Sandpile,
    max_iterations: u32,
    tile_width: u32,
    tile_height: u32,
    workers: u32,
) -> u32 {
    if ptr.is_null() {
        return SP_INVALID;
    }

    let pile = &mut *ptr;
    encode(
        pile.run_parallel(
            max_iterations,
            tile_width as usize,
            tile_height as usize,
            workers as usize,
        ),
        "sp_run_parallel",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ffi::grid::{sp_get_cell, sp_set_cell};
    use crate::ffi::lifecycle::{sp_create, sp_destroy, sp_get_sweeps};
    use std::ptr;

    #[test]
    fn test_run_single_pile() {
        let runs: [fn(*mut Sandpile) -> u32; 3] = [
            |p| unsafe { sp_run_seq(p, 10) },
            |p| unsafe { sp_run_tiled(p, 10, 2, 2) },
            |p| unsafe { sp_run_parallel(p, 10, 2, 2, 2) },
        ];
        unsafe {
            for run in runs {
                let pile = sp_create(5);
                sp_set_cell(pile, 2, 2, 8);

                assert_eq!(run(pile), 2);
                assert_eq!(sp_get_sweeps(pile), 2);
                assert_eq!(sp_get_cell(pile, 2, 2), 0);
                assert_eq!(sp_get_cell(pile, 2, 3), 2);

                sp_destroy(pile);
            }
        }
    }

    #[test]
    fn test_run_zero_budget() {
        unsafe {
            let pile = sp_create(5);
            assert_eq!(sp_run_seq(pile, 0), 0);
            assert_eq!(sp_run_tiled(pile, 0, 2, 2), 0);
            assert_eq!(sp_run_parallel(pile, 0, 2, 2, 1), 0);
            sp_destroy(pile);
        }
    }

    #[test]
    fn test_run_invalid_tile() {
        unsafe {
            let pile = sp_create(8);
            assert_eq!(sp_run_tiled(pile, 10, 1, 1), SP_INVALID);
            assert_eq!(sp_run_parallel(pile, 10, 16, 2, 2), SP_INVALID);
            assert_eq!(sp_get_sweeps(pile), 0);
            sp_destroy(pile);
        }
    }

    #[test]
    fn test_null_pointer_handling() {
        unsafe {
            assert_eq!(sp_run_seq(ptr::null_mut(), 10), SP_INVALID);
            assert_eq!(sp_run_tiled(ptr::null_mut(), 10, 2, 2), SP_INVALID);
            assert_eq!(sp_run_parallel(ptr::null_mut(), 10, 2, 2, 1), SP_INVALID);
        }
    }
}
