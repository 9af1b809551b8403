//! Iteration driver and convergence tracking.
//!
//! A [`Strategy`] performs one sweep over the grid and reports whether any
//! cell toppled. [`run`] repeats sweeps until one reports no change or the
//! iteration budget is spent.

use std::fmt;

use tracing::trace;

use super::grid::Grid;

/// One way of sweeping the toppling rule over a grid.
///
/// Implementations may use any visiting order and any amount of parallelism,
/// but a sweep must apply the rule to every interior cell exactly once and
/// must leave no data race behind. Accelerator back ends plug in here.
pub trait Strategy: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Grid dimension this strategy was built for, if it is tied to one.
    fn dim(&self) -> Option<usize> {
        None
    }

    /// Run one sweep. Returns `true` if any cell toppled.
    fn sweep(&self, grid: &mut Grid) -> bool;
}

/// Result of a bounded run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The sweep with this 1-based index was the first to change nothing.
    Stable { iteration: u32 },
    /// Every sweep in the budget still toppled something.
    NotConverged,
}

impl Outcome {
    /// Raw encoding of [`Outcome::NotConverged`]; never a valid iteration index.
    pub const NOT_CONVERGED_RAW: u32 = 0;

    /// Iteration index, or `0` when the run did not converge.
    pub fn as_raw(self) -> u32 {
        match self {
            Outcome::Stable { iteration } => iteration,
            Outcome::NotConverged => Self::NOT_CONVERGED_RAW,
        }
    }

    pub fn iteration(self) -> Option<u32> {
        match self {
            Outcome::Stable { iteration } => Some(iteration),
            Outcome::NotConverged => None,
        }
    }

    pub fn is_stable(self) -> bool {
        matches!(self, Outcome::Stable { .. })
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Stable { iteration } => write!(f, "stable at iteration {iteration}"),
            Outcome::NotConverged => write!(f, "not converged"),
        }
    }
}

/// Logical OR of per-tile change flags for one sweep.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ConvergenceFlag(bool);

impl ConvergenceFlag {
    #[inline]
    pub fn fold(&mut self, changed: bool) {
        self.0 |= changed;
    }

    #[inline]
    pub fn changed(self) -> bool {
        self.0
    }
}

/// Sweep until stable or until `max_iterations` sweeps have run.
pub fn run<S: Strategy + ?Sized>(grid: &mut Grid, strategy: &S, max_iterations: u32) -> Outcome {
    for iteration in 1..=max_iterations {
        if !strategy.sweep(grid) {
            return Outcome::Stable { iteration };
        }
        trace!(strategy = strategy.name(), iteration, "sweep toppled cells");
    }
    Outcome::NotConverged
}
