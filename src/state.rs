//! Host-facing simulation handle.

use tracing::{debug, info};

use crate::automaton::{run, Grid, Outcome, Parallel, Sequential, Strategy, TiledSequential};
use crate::config::SolverConfig;
use crate::error::{Result, SandpileError};
use crate::presets::Preset;

/// A sandpile grid plus the number of sweeps run on it so far.
///
/// Dropping the handle releases the grid.
#[derive(Clone, Debug)]
pub struct Sandpile {
    grid: Grid,
    sweeps: u64,
}

impl Sandpile {
    /// Allocate a zero-filled `dim x dim` sandpile.
    pub fn new(dim: usize) -> Result<Self> {
        Ok(Self::from_grid(Grid::new(dim)?))
    }

    pub fn from_grid(grid: Grid) -> Self {
        Sandpile { grid, sweeps: 0 }
    }

    pub fn into_grid(self) -> Grid {
        self.grid
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    pub fn dim(&self) -> usize {
        self.grid.dim()
    }

    /// Sweeps performed across every run on this handle.
    pub fn sweeps(&self) -> u64 {
        self.sweeps
    }

    pub fn set_cell(&mut self, y: usize, x: usize, value: u32) -> Result<()> {
        self.grid.set(y, x, value)
    }

    pub fn get_cell(&self, y: usize, x: usize) -> Result<u32> {
        self.grid.get(y, x)
    }

    pub fn apply_preset(&mut self, preset: Preset, seed: u64) {
        debug!(preset = preset.name(), seed, "applying initial configuration");
        preset.apply(&mut self.grid, seed);
    }

    pub fn run_sequential(&mut self, max_iterations: u32) -> Outcome {
        self.run_checked(&Sequential::new(), max_iterations)
    }

    pub fn run_tiled(
        &mut self,
        max_iterations: u32,
        tile_width: usize,
        tile_height: usize,
    ) -> Result<Outcome> {
        let strategy = TiledSequential::new(self.dim(), tile_width, tile_height)?;
        Ok(self.run_checked(&strategy, max_iterations))
    }

    pub fn run_parallel(
        &mut self,
        max_iterations: u32,
        tile_width: usize,
        tile_height: usize,
        workers: usize,
    ) -> Result<Outcome> {
        let strategy = Parallel::new(self.dim(), tile_width, tile_height, workers)?;
        Ok(self.run_checked(&strategy, max_iterations))
    }

    pub fn run_with(&mut self, config: &SolverConfig) -> Result<Outcome> {
        let strategy = config.build_strategy(self.dim())?;
        Ok(self.run_checked(strategy.as_ref(), config.max_iterations))
    }

    /// Run any strategy, including ones supplied by the host.
    pub fn run_strategy(&mut self, strategy: &dyn Strategy, max_iterations: u32) -> Result<Outcome> {
        if let Some(expected) = strategy.dim() {
            if expected != self.dim() {
                return Err(SandpileError::DimensionMismatch {
                    expected,
                    actual: self.dim(),
                });
            }
        }
        Ok(self.run_checked(strategy, max_iterations))
    }

    fn run_checked(&mut self, strategy: &dyn Strategy, max_iterations: u32) -> Outcome {
        debug!(
            strategy = strategy.name(),
            dim = self.dim(),
            max_iterations,
            "starting run"
        );

        let outcome = run(&mut self.grid, strategy, max_iterations);
        self.sweeps += u64::from(outcome.iteration().unwrap_or(max_iterations));

        match outcome {
            Outcome::Stable { iteration } => info!(
                strategy = strategy.name(),
                iteration,
                sink_mass = self.grid.sink_mass(),
                "sandpile stabilized"
            ),
            Outcome::NotConverged => info!(
                strategy = strategy.name(),
                max_iterations, "sandpile not stable within budget"
            ),
        }
        outcome
    }
}
