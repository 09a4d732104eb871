use std::fmt;

use glam::Vec2;

/// Axis-aligned rectangle, top-left origin, y grows downward.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        Self::new(center.x - size.x * 0.5, center.y - size.y * 0.5, size.x, size.y)
    }

    pub fn from_min_max(min: Vec2, max: Vec2) -> Self {
        Self::new(min.x, min.y, max.x - min.x, max.y - min.y)
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        Vec2::new(self.right(), self.bottom())
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.w, self.h)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w * 0.5, self.y + self.h * 0.5)
    }

    /// Finite coordinates and a non-negative size.
    pub fn is_valid(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.w.is_finite()
            && self.h.is_finite()
            && self.w >= 0.0
            && self.h >= 0.0
    }

    pub fn translated(&self, offset: Vec2) -> Self {
        Self::new(self.x + offset.x, self.y + offset.y, self.w, self.h)
    }

    /// Same size, moved so its center sits on `center`.
    pub fn centered_on(&self, center: Vec2) -> Self {
        Self::from_center(center, self.size())
    }

    /// Smallest rectangle covering both.
    pub fn union(&self, other: &Rect) -> Self {
        Self::from_min_max(self.min().min(other.min()), self.max().max(other.max()))
    }

    /// Grows every side by `half_extents` (Minkowski sum with a centered box).
    pub fn expanded(&self, half_extents: Vec2) -> Self {
        Self::new(
            self.x - half_extents.x,
            self.y - half_extents.y,
            self.w + half_extents.x * 2.0,
            self.h + half_extents.y * 2.0,
        )
    }

    /// True if `other` lies fully inside, shared edges included.
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x < self.right() && p.y >= self.y && p.y < self.bottom()
    }

    /// Strict overlap: rectangles that only share an edge do not overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Top-left, top-right, bottom-left, bottom-right. The four quarters tile
    /// `self` exactly: each right/bottom half takes whatever the left/top half
    /// leaves so the outer edges are reproduced.
    pub fn quadrants(&self) -> [Rect; 4] {
        let hw = self.w * 0.5;
        let hh = self.h * 0.5;
        let (mx, my) = (self.x + hw, self.y + hh);
        let (rw, bh) = (self.right() - mx, self.bottom() - my);
        [
            Rect::new(self.x, self.y, hw, hh),
            Rect::new(mx, self.y, rw, hh),
            Rect::new(self.x, my, hw, bh),
            Rect::new(mx, my, rw, bh),
        ]
    }

    /// Moves `self` so it lies inside `bounds`. On an axis where `self` is larger
    /// than `bounds` it is centered on `bounds` instead.
    pub fn clamped_within(&self, bounds: &Rect) -> Self {
        let clamp_axis = |pos: f32, len: f32, lo: f32, blen: f32| {
            if len >= blen {
                lo + (blen - len) * 0.5
            } else {
                pos.clamp(lo, lo + blen - len)
            }
        };
        Self::new(
            clamp_axis(self.x, self.w, bounds.x, bounds.w),
            clamp_axis(self.y, self.h, bounds.y, bounds.h),
            self.w,
            self.h,
        )
    }
}

/// Result of a ray or sweep test.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RayHit {
    /// Entry time as a fraction of the direction vector. Negative when the ray
    /// starts inside the target.
    pub time: f32,
    /// Ray origin advanced to `time`. For sweeps this is the moving box's
    /// center at first contact.
    pub point: Vec2,
    /// Surface normal at entry; points back toward the ray origin.
    pub normal: Vec2,
}

/// Collision class of one grid cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TileCode {
    /// `'0'`: air.
    #[default]
    Empty,
    /// `'1'`: blocks from every side.
    Solid,
    /// `'2'`: thin platform; movers may opt to pass through it from below.
    OneWay,
    /// Any other gameplay code. Blocks like `Solid`.
    Other(char),
    /// Lookup outside the grid. Never blocks.
    OutOfBounds,
}

impl TileCode {
    pub fn from_char(c: char) -> Self {
        match c {
            '0' => TileCode::Empty,
            '1' => TileCode::Solid,
            '2' => TileCode::OneWay,
            other => TileCode::Other(other),
        }
    }

    /// Whether movers collide with this cell at all.
    pub fn is_blocking(self) -> bool {
        !matches!(self, TileCode::Empty | TileCode::OutOfBounds)
    }
}

impl fmt::Display for TileCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TileCode::Empty => f.write_str("0"),
            TileCode::Solid => f.write_str("1"),
            TileCode::OneWay => f.write_str("2"),
            TileCode::Other(c) => write!(f, "{c}"),
            TileCode::OutOfBounds => f.write_str("-1"),
        }
    }
}

/// Per-axis direction of travel.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Backward,
    Still,
    Forward,
}

impl Direction {
    /// Components within `dead_zone` of zero count as no movement.
    pub fn of(component: f32, dead_zone: f32) -> Self {
        if component.abs() <= dead_zone {
            Direction::Still
        } else if component > 0.0 {
            Direction::Forward
        } else {
            Direction::Backward
        }
    }

    pub fn of_velocity(velocity: Vec2, dead_zone: f32) -> (Self, Self) {
        (Self::of(velocity.x, dead_zone), Self::of(velocity.y, dead_zone))
    }
}

/// Normal reported when a ray enters exactly through a corner, i.e. both axes
/// produce the same entry time.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CornerPolicy {
    /// Report the vertical face.
    #[default]
    PreferVertical,
    /// Report the horizontal face.
    PreferHorizontal,
    /// Report both axes, e.g. `(-1, -1)`.
    Diagonal,
}

/// Tuning for the narrowphase and the tile resolver.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SweepConfig {
    /// Direction components with a smaller magnitude are treated as parallel
    /// to that axis (reciprocal replaced by a signed infinity).
    pub ray_epsilon: f32,
    /// Velocity components within this of zero count as "not moving" when
    /// ordering candidate tiles.
    pub direction_dead_zone: f32,
    pub corner_policy: CornerPolicy,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            ray_epsilon: 1e-5,
            direction_dead_zone: 0.01,
            corner_policy: CornerPolicy::default(),
        }
    }
}

/// Quadtree tuning.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct QuadtreeConfig {
    /// Number of levels including the root. A node at depth `d` only gets
    /// children while `d + 1 < max_depth`.
    pub max_depth: u32,
}

impl Default for QuadtreeConfig {
    fn default() -> Self {
        Self { max_depth: 8 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_union_and_expand() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, -5.0, 10.0, 10.0);
        assert_eq!(a.union(&b), Rect::new(0.0, -5.0, 15.0, 15.0));
        assert_eq!(a.expanded(Vec2::new(1.0, 2.0)), Rect::new(-1.0, -2.0, 12.0, 14.0));
    }

    #[test]
    fn test_overlap_is_strict_and_contains_is_inclusive() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let touching = Rect::new(10.0, 0.0, 5.0, 5.0);
        assert!(!a.overlaps(&touching));
        assert!(a.overlaps(&Rect::new(9.5, 9.5, 5.0, 5.0)));
        assert!(a.contains_rect(&Rect::new(0.0, 0.0, 10.0, 10.0)));
        assert!(!a.contains_rect(&Rect::new(0.0, 0.0, 10.5, 10.0)));
        assert!(a.contains_point(Vec2::ZERO));
        assert!(!a.contains_point(Vec2::new(10.0, 5.0)));
        assert_eq!(Rect::from_center(Vec2::new(5.0, 5.0), Vec2::splat(10.0)), a);
    }

    #[test]
    fn test_quadrants_partition_parent() {
        let r = Rect::new(3.0, 7.0, 801.0, 599.0);
        let q = r.quadrants();
        assert_eq!(q[0].min(), r.min());
        assert_eq!(q[3].max(), r.max());
        assert_eq!(q[0].right(), q[1].left());
        assert_eq!(q[0].bottom(), q[2].top());
        let area: f32 = q.iter().map(|c| c.w * c.h).sum();
        assert!((area - r.w * r.h).abs() < 1e-2);
        for (i, a) in q.iter().enumerate() {
            for b in q.iter().skip(i + 1) {
                assert!(!a.overlaps(b));
            }
        }
    }

    #[test]
    fn test_clamped_within() {
        let room = Rect::new(0.0, 0.0, 100.0, 50.0);
        let cam = Rect::new(-10.0, 40.0, 30.0, 20.0).clamped_within(&room);
        assert_eq!(cam, Rect::new(0.0, 30.0, 30.0, 20.0));
        let wide = Rect::new(5.0, 0.0, 120.0, 10.0).clamped_within(&room);
        assert_eq!(wide.x, -10.0);
    }

    #[test]
    fn test_tile_code_parsing() {
        assert_eq!(TileCode::from_char('0'), TileCode::Empty);
        assert_eq!(TileCode::from_char('2'), TileCode::OneWay);
        assert_eq!(TileCode::from_char('d'), TileCode::Other('d'));
        assert!(TileCode::Other('d').is_blocking());
        assert!(!TileCode::OutOfBounds.is_blocking());
        assert_eq!(TileCode::OutOfBounds.to_string(), "-1");
    }

    #[test]
    fn test_direction_dead_zone() {
        assert_eq!(Direction::of(0.005, 0.01), Direction::Still);
        assert_eq!(Direction::of(-0.5, 0.01), Direction::Backward);
        assert_eq!(Direction::of(0.5, 0.01), Direction::Forward);
    }
}
