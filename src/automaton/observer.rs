//! Tile-level instrumentation hooks.

use tracing::trace;

use super::tile::Tile;

/// Notified around every tile the executor processes.
///
/// Purely observational: implementations must not touch the grid. Both hooks
/// default to no-ops.
pub trait TileObserver: Send + Sync {
    fn tile_started(&self, _tile: &Tile, _worker: usize) {}

    fn tile_finished(&self, _tile: &Tile, _worker: usize) {}
}

/// Observer that does nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl TileObserver for NoopObserver {}

/// Emits a `trace` event for every finished tile.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingObserver;

impl TileObserver for TracingObserver {
    fn tile_finished(&self, tile: &Tile, worker: usize) {
        trace!(
            x = tile.x,
            y = tile.y,
            width = tile.width,
            height = tile.height,
            worker,
            "tile processed"
        );
    }
}
