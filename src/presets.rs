//! Initial grain configurations.
//!
//! Each preset is resolved once by name and then applied to a grid. None of
//! them are part of the solver's correctness contract; they only give hosts
//! and tests something interesting to stabilize.

use std::fmt;
use std::str::FromStr;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::automaton::Grid;
use crate::error::SandpileError;

/// Grains dropped on the centre cell by [`Preset::Middle`].
pub const MIDDLE_PILE: u32 = 10_000;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Preset {
    /// Every interior cell holds 4 grains.
    #[default]
    Uniform,
    /// Piles of `y * x / 4` grains on a lattice with spacing `dim / 4`.
    Lattice,
    /// `dim / 8` piles of 1000 to 4999 grains at random interior cells.
    Random,
    /// One large pile in the centre.
    Middle,
}

type Generator = fn(&mut Grid, u64);

static REGISTRY: [(&str, Preset, Generator); 4] = [
    ("uniform", Preset::Uniform, uniform),
    ("lattice", Preset::Lattice, lattice),
    ("random", Preset::Random, random),
    ("middle", Preset::Middle, middle),
];

impl Preset {
    pub const ALL: [Preset; 4] = [Preset::Uniform, Preset::Lattice, Preset::Random, Preset::Middle];

    pub fn name(self) -> &'static str {
        self.entry().0
    }

    /// Write this configuration onto `grid`. Cells the preset does not mention
    /// keep their value. `seed` only matters for [`Preset::Random`].
    pub fn apply(self, grid: &mut Grid, seed: u64) {
        (self.entry().2)(grid, seed)
    }

    fn entry(self) -> &'static (&'static str, Preset, Generator) {
        // Every variant has exactly one registry entry.
        &REGISTRY[self as usize]
    }
}

impl FromStr for Preset {
    type Err = SandpileError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        REGISTRY
            .iter()
            .find(|(entry, _, _)| *entry == name)
            .map(|&(_, preset, _)| preset)
            .ok_or_else(|| SandpileError::UnknownPreset(name.to_string()))
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn put(grid: &mut Grid, y: usize, x: usize, value: u32) {
    let idx = grid.index_of(y, x);
    grid.cells_mut()[idx] = value;
}

fn uniform(grid: &mut Grid, _seed: u64) {
    let dim = grid.dim();
    for y in 1..dim - 1 {
        for x in 1..dim - 1 {
            put(grid, y, x, 4);
        }
    }
}

fn lattice(grid: &mut Grid, _seed: u64) {
    let dim = grid.dim();
    let step = dim / 4;
    if step == 0 {
        return;
    }
    for y in (step..dim - 1).step_by(step) {
        for x in (step..dim - 1).step_by(step) {
            put(grid, y, x, (y * x / 4) as u32);
        }
    }
}

fn random(grid: &mut Grid, seed: u64) {
    let dim = grid.dim();
    let mut rng = StdRng::seed_from_u64(seed);
    // Coordinates may repeat; a later pile simply replaces an earlier one.
    for _ in 0..dim / 8 {
        let y = rng.gen_range(1..dim - 1);
        let x = rng.gen_range(1..dim - 1);
        let grains = rng.gen_range(1000..5000);
        put(grid, y, x, grains);
    }
}

fn middle(grid: &mut Grid, _seed: u64) {
    let centre = grid.dim() / 2;
    put(grid, centre, centre, MIDDLE_PILE);
}
