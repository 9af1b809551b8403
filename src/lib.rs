//! Sandpile - Abelian Sandpile Solver
//!
//! Stabilizes the chip-firing model on a square grid with an absorbing edge,
//! using a plain sequential sweep, a tiled sequential sweep, or a phased
//! tile-parallel sweep on a rayon pool. All three reach the same fixed point.
//!
//! Rust callers use [`Sandpile`]; C hosts use the `sp_*` functions in [`ffi`].

pub mod automaton;
pub mod config;
pub mod error;
pub mod ffi;
pub mod presets;
pub mod state;

#[cfg(test)]
mod tests;

pub use automaton::{Grid, Outcome, Strategy, TileObserver};
pub use config::{SolverConfig, StrategyKind};
pub use error::{Result, SandpileError};
pub use presets::Preset;
pub use state::Sandpile;
