//! Solver configuration.
//!
//! Hosts pick a strategy and its tiling once, typically from a config file,
//! and hand the result to [`crate::Sandpile::run_with`].

use serde::{Deserialize, Serialize};

use crate::automaton::{Grid, Parallel, Sequential, Strategy, TileLattice, TiledSequential};
use crate::error::Result;

pub const DEFAULT_TILE: usize = 32;
pub const DEFAULT_MAX_ITERATIONS: u32 = 10_000;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    Sequential,
    Tiled,
    #[default]
    Parallel,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    pub strategy: StrategyKind,
    pub tile_width: usize,
    pub tile_height: usize,
    /// Worker threads for the parallel strategy; 0 means 1.
    pub workers: usize,
    pub max_iterations: u32,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            strategy: StrategyKind::default(),
            tile_width: DEFAULT_TILE,
            tile_height: DEFAULT_TILE,
            workers: 1,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl SolverConfig {
    /// Check the configuration against a `dim x dim` grid without building anything.
    pub fn validate(&self, dim: usize) -> Result<()> {
        match self.strategy {
            StrategyKind::Sequential => Grid::new(dim).map(|_| ()),
            StrategyKind::Tiled | StrategyKind::Parallel => {
                TileLattice::new(dim, self.tile_width, self.tile_height).map(|_| ())
            }
        }
    }

    pub fn build_strategy(&self, dim: usize) -> Result<Box<dyn Strategy>> {
        let strategy: Box<dyn Strategy> = match self.strategy {
            StrategyKind::Sequential => Box::new(Sequential::new()),
            StrategyKind::Tiled => {
                Box::new(TiledSequential::new(dim, self.tile_width, self.tile_height)?)
            }
            StrategyKind::Parallel => Box::new(Parallel::new(
                dim,
                self.tile_width,
                self.tile_height,
                self.workers,
            )?),
        };
        Ok(strategy)
    }
}
