use std::fmt::Debug;
use std::hash::Hash;

use glam::Vec2;

use crate::types::*;

/// Ray and sweep primitives.
pub trait SweepApi {
    /// Slab test of a ray against `target`. `dir` is not normalized; the hit
    /// time is a fraction of it. Hits whose exit lies behind the origin are
    /// rejected, so a ray starting inside `target` reports a negative time.
    fn ray_vs_rect(&self, origin: Vec2, dir: Vec2, target: Rect) -> Option<RayHit>;

    /// First contact of `rect` moving at `velocity` for `dt` with the static
    /// `target`. Only contacts with `0 <= time < 1` are reported.
    fn swept_rect_vs_rect(&self, velocity: Vec2, rect: Rect, dt: f32, target: Rect) -> Option<RayHit>;
}

/// Read access to a room's collision tiles.
pub trait TileSource {
    /// `TileCode::OutOfBounds` outside `[0, width) x [0, height)`.
    fn tile_at(&self, col: i32, row: i32) -> TileCode;
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    /// Edge length of a square cell, in world units.
    fn tile_size(&self) -> f32;

    /// World footprint of a cell.
    fn tile_rect(&self, col: i32, row: i32) -> Rect {
        let ts = self.tile_size();
        Rect::new(col as f32 * ts, row as f32 * ts, ts, ts)
    }
}

/// Anything a quadtree can hold: a stable identity plus its current box.
pub trait SpatialItem {
    type Id: Copy + Eq + Hash + Debug;

    fn id(&self) -> Self::Id;
    fn rect(&self) -> Rect;
}
