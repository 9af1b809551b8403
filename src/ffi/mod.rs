//! C FFI layer for host integration.
//!
//! This module exports C ABI functions for hosts that own the display and
//! the command line. All functions are marked with `#[no_mangle]` and use
//! `extern "C"`.
//!
//! The actual logic is in the `automaton` module. These functions are thin wrappers
//! that handle null checks, pointer safety, and C-to-Rust conversions.

pub mod grid;
pub mod lifecycle;
pub mod run;

pub use grid::{sp_apply_preset, sp_get_cell, sp_set_cell};
pub use lifecycle::{sp_create, sp_destroy, sp_dim, sp_get_sweeps};
pub use run::{sp_run_parallel, sp_run_seq, sp_run_tiled, SP_INVALID};
