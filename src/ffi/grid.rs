//! Cell access and initial configuration.

use std::ffi::{c_char, CStr};

use tracing::error;

use crate::presets::Preset;
use crate::state::Sandpile;

/// Sets the grain count of a cell.
///
/// # Safety
/// - `ptr` must be a valid pointer to a Sandpile, or null
///
/// # Returns
/// 0 on success, 1 on failure (null pointer or out-of-bounds coordinates).
#[no_mangle]
pub unsafe extern "C" fn sp_set_cell(ptr: *mut Sandpile, y: u32, x: u32, value: u32) -> i32 {
    if ptr.is_null() {
        return 1;
    }

    let pile = &mut *ptr;
    match pile.set_cell(y as usize, x as usize, value) {
        Ok(()) => 0,
        Err(err) => {
            error!(%err, "sp_set_cell rejected");
            1
        }
    }
}

/// Gets the grain count of a cell.
///
/// # Safety
/// - `ptr` must be a valid pointer to a Sandpile, or null
///
/// # Returns
/// The grain count, or 0 if out of bounds or null pointer.
#[no_mangle]
pub unsafe extern "C" fn sp_get_cell(ptr: *const Sandpile, y: u32, x: u32) -> u32 {
    if ptr.is_null() {
        return 0;
    }

    (*ptr).get_cell(y as usize, x as usize).unwrap_or(0)
}

/// Applies a named initial configuration (`uniform`, `lattice`, `random`, `middle`).
///
/// # Safety
/// - `ptr` must be a valid pointer to a Sandpile, or null
/// - `name` must be a NUL-terminated string, or null
///
/// # Returns
/// 0 on success, 1 on failure (null pointer, invalid UTF-8, unknown name).
#[no_mangle]
pub unsafe extern "C" fn sp_apply_preset(ptr: *mut Sandpile, name: *const c_char, seed: u64) -> i32 {
    if ptr.is_null() || name.is_null() {
        return 1;
    }

    let preset = CStr::from_ptr(name)
        .to_str()
        .map_err(|err| err.to_string())
        .and_then(|name| name.parse::<Preset>().map_err(|err| err.to_string()));
    match preset {
        Ok(preset) => {
            (*ptr).apply_preset(preset, seed);
            0
        }
        Err(err) => {
            error!(%err, "sp_apply_preset rejected");
            1
        }
    }
}
