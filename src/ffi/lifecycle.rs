//! Handle creation, destruction, and queries.

use tracing::error;

use crate::state::Sandpile;

/// Creates a zero-filled `dim x dim` sandpile and returns an opaque pointer.
///
/// # Returns
/// A pointer to a new Sandpile, or null if `dim` is below 3 or the grid
/// cannot be allocated.
///
/// # Safety
/// The returned pointer must eventually be freed with `sp_destroy()`.
#[no_mangle]
pub extern "C" fn sp_create(dim: u32) -> *mut Sandpile {
    match Sandpile::new(dim as usize) {
        Ok(pile) => Box::into_raw(Box::new(pile)),
        Err(err) => {
            error!(%err, "sp_create rejected");
            std::ptr::null_mut()
        }
    }
}

/// Destroys a sandpile and frees its grid.
///
/// # Safety
/// - `ptr` must be a valid pointer returned by `sp_create()`, or null
/// - `ptr` must not be used after this call
#[no_mangle]
pub unsafe extern "C" fn sp_destroy(ptr: *mut Sandpile) {
    if !ptr.is_null() {
        drop(Box::from_raw(ptr));
    }
}

/// Grid dimension, or 0 if ptr is null.
///
/// # Safety
/// - `ptr` must be a valid pointer to a Sandpile, or null
#[no_mangle]
pub unsafe extern "C" fn sp_dim(ptr: *const Sandpile) -> u32 {
    if ptr.is_null() {
        return 0;
    }
    (*ptr).dim() as u32
}

/// Total sweeps run on this sandpile, or 0 if ptr is null.
///
/// # Safety
/// - `ptr` must be a valid pointer to a Sandpile, or null
#[no_mangle]
pub unsafe extern "C" fn sp_get_sweeps(ptr: *const Sandpile) -> u64 {
    if ptr.is_null() {
        return 0;
    }
    (*ptr).sweeps()
}
