use glam::Vec2;
use log::trace;

use crate::api::{SweepApi, TileSource};
use crate::narrowphase::Narrowphase;
use crate::types::*;

/// How a mover treats `TileCode::OneWay` cells.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum OneWayMode {
    /// One-way tiles block like solid ones.
    #[default]
    Block,
    /// Entering a one-way tile through its bottom face leaves the velocity
    /// untouched and ends the scan.
    PassFromBelow,
}

/// The tile a scan last collided with.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TileContact {
    pub col: i32,
    pub row: i32,
    pub code: TileCode,
    pub hit: RayHit,
}

/// Output of [`TileResolver::resolve`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TileResolution {
    /// Velocity that keeps the box out of blocking tiles this step.
    pub velocity: Vec2,
    /// Code of the last tile hit, `TileCode::Empty` if none.
    pub last_tile: TileCode,
    pub contact: Option<TileContact>,
    /// Blocking tiles that went through the sweep test.
    pub tiles_tested: usize,
}

impl TileResolution {
    fn untouched(velocity: Vec2) -> Self {
        Self { velocity, last_tile: TileCode::Empty, contact: None, tiles_tested: 0 }
    }

    pub fn hit_anything(&self) -> bool {
        self.contact.is_some()
    }
}

/// Inclusive cell range along one axis, walked in the direction of travel.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AxisRange {
    pub first: i32,
    pub last: i32,
    pub dir: Direction,
}

impl AxisRange {
    /// Ascending unless moving backward on this axis. Empty when `last < first`.
    pub fn walk(self) -> impl Iterator<Item = i32> {
        let (first, last) = (i64::from(self.first), i64::from(self.last));
        let backward = self.dir == Direction::Backward;
        (0..self.len() as i64).map(move |i| (if backward { last - i } else { first + i }) as i32)
    }

    pub fn len(&self) -> usize {
        (i64::from(self.last) - i64::from(self.first) + 1).max(0) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Cells a box can reach in one step.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CandidateRange {
    pub cols: AxisRange,
    pub rows: AxisRange,
}

impl CandidateRange {
    /// Visiting order of the scan: columns outer, rows inner.
    pub fn cells(self) -> impl Iterator<Item = (i32, i32)> {
        let rows = self.rows;
        self.cols.walk().flat_map(move |c| rows.walk().map(move |r| (c, r)))
    }
}

/// Sweeps a moving box against the blocking tiles of a grid and cancels the
/// part of its velocity that would cross them.
#[derive(Clone, Debug, Default)]
pub struct TileResolver {
    cfg: SweepConfig,
    narrowphase: Narrowphase,
}

impl TileResolver {
    pub fn new(cfg: SweepConfig) -> Self {
        let narrowphase = Narrowphase::new(&cfg);
        Self { cfg, narrowphase }
    }

    pub fn config(&self) -> &SweepConfig {
        &self.cfg
    }

    pub fn narrowphase(&self) -> &Narrowphase {
        &self.narrowphase
    }

    /// Cells overlapped by the union of `rect` now and `rect` after
    /// `velocity * dt`, each axis ordered away from the current position.
    /// Cut to the grid: cells outside it never block. An axis whose swept
    /// extent misses the grid entirely comes back empty.
    pub fn candidate_range<G: TileSource + ?Sized>(
        &self,
        rect: Rect,
        velocity: Vec2,
        dt: f32,
        grid: &G,
    ) -> CandidateRange {
        // Corners taken directly: `x + w` of a huge swept union cancels out.
        let moved = rect.translated(velocity * dt);
        let (lo, hi) = (rect.min().min(moved.min()), rect.max().max(moved.max()));
        let ts = grid.tile_size();
        let cell = |v: f32| (v / ts).floor() as i32;
        let last_cell = |n: u32| i32::try_from(n).unwrap_or(i32::MAX) - 1;
        let (max_col, max_row) = (last_cell(grid.width()), last_cell(grid.height()));
        let (dir_x, dir_y) = Direction::of_velocity(velocity, self.cfg.direction_dead_zone);
        CandidateRange {
            cols: AxisRange {
                first: cell(lo.x).max(0),
                last: cell(hi.x).min(max_col),
                dir: dir_x,
            },
            rows: AxisRange {
                first: cell(lo.y).max(0),
                last: cell(hi.y).min(max_row),
                dir: dir_y,
            },
        }
    }

    /// Resolves `velocity` for one step of `rect` through `grid`.
    ///
    /// Each hit adds `normal * |velocity| * (1 - time)` to the velocity used by
    /// the remaining cells, so motion into a face is cancelled and motion along
    /// it survives. Position is never touched; integrate the returned velocity.
    /// Boxes already overlapping a tile are not pushed out.
    pub fn resolve<G: TileSource + ?Sized>(
        &self,
        rect: Rect,
        velocity: Vec2,
        dt: f32,
        grid: &G,
        one_way: OneWayMode,
    ) -> TileResolution {
        debug_assert!(rect.is_valid(), "moving box must be finite with non-negative size");
        debug_assert!(grid.width() > 0 && grid.height() > 0, "tile grid has zero dimensions");

        let range = self.candidate_range(rect, velocity, dt, grid);
        let mut out = TileResolution::untouched(velocity);
        let mut velocity = velocity;

        for (col, row) in range.cells() {
            let code = grid.tile_at(col, row);
            if !code.is_blocking() {
                continue;
            }
            out.tiles_tested += 1;

            let tile = grid.tile_rect(col, row);
            let Some(hit) = self.narrowphase.swept_rect_vs_rect(velocity, rect, dt, tile) else {
                continue;
            };
            out.last_tile = code;
            out.contact = Some(TileContact { col, row, code, hit });

            if one_way == OneWayMode::PassFromBelow && code == TileCode::OneWay && hit.normal.y > 0.0 {
                trace!("resolve: passing up through one-way tile ({col}, {row})");
                out.velocity = velocity;
                return out;
            }

            velocity += hit.normal * velocity.abs() * (1.0 - hit.time);
        }

        trace!(
            "resolve: cols {}..={} rows {}..={} tested={} vel {:?} -> {:?}",
            range.cols.first,
            range.cols.last,
            range.rows.first,
            range.rows.last,
            out.tiles_tested,
            out.velocity,
            velocity
        );
        out.velocity = velocity;
        out
    }
}
