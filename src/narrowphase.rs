use glam::Vec2;

use crate::api::SweepApi;
use crate::types::*;

/// Ray-vs-rect and swept rect-vs-rect tests.
#[derive(Copy, Clone, Debug)]
pub struct Narrowphase {
    pub ray_epsilon: f32,
    pub corner_policy: CornerPolicy,
}

impl Default for Narrowphase {
    fn default() -> Self {
        Self::new(&SweepConfig::default())
    }
}

impl Narrowphase {
    pub fn new(cfg: &SweepConfig) -> Self {
        Self {
            ray_epsilon: cfg.ray_epsilon,
            corner_policy: cfg.corner_policy,
        }
    }

    /// `1 / d`, or a signed infinity when `d` is within epsilon of zero.
    /// Zero counts as positive.
    fn reciprocal(&self, d: f32) -> f32 {
        if d.abs() < self.ray_epsilon {
            if d < 0.0 { f32::NEG_INFINITY } else { f32::INFINITY }
        } else {
            1.0 / d
        }
    }

    fn entry_normal(&self, t_near: Vec2, inv: Vec2) -> Vec2 {
        // Entering a face while travelling negatively means the face looks positive.
        let nx = if inv.x < 0.0 { 1.0 } else { -1.0 };
        let ny = if inv.y < 0.0 { 1.0 } else { -1.0 };
        if t_near.x > t_near.y {
            Vec2::new(nx, 0.0)
        } else if t_near.x < t_near.y {
            Vec2::new(0.0, ny)
        } else {
            match self.corner_policy {
                CornerPolicy::PreferVertical => Vec2::new(0.0, ny),
                CornerPolicy::PreferHorizontal => Vec2::new(nx, 0.0),
                CornerPolicy::Diagonal => Vec2::new(nx, ny),
            }
        }
    }

    /// Top-left placement of `rect` at the moment described by `hit`.
    pub fn rect_at_impact(rect: Rect, velocity: Vec2, dt: f32, hit: &RayHit) -> Rect {
        rect.translated(velocity * dt * hit.time)
    }
}

impl SweepApi for Narrowphase {
    fn ray_vs_rect(&self, origin: Vec2, dir: Vec2, target: Rect) -> Option<RayHit> {
        if dir.x.abs() < self.ray_epsilon && dir.y.abs() < self.ray_epsilon {
            return None;
        }
        let inv = Vec2::new(self.reciprocal(dir.x), self.reciprocal(dir.y));

        let mut t_near = (target.min() - origin) * inv;
        let mut t_far = (target.max() - origin) * inv;
        // 0 * inf: parallel to an axis and lying exactly on one of its faces.
        // That only grazes the box.
        if t_near.is_nan() || t_far.is_nan() {
            return None;
        }

        if t_near.x > t_far.x {
            core::mem::swap(&mut t_near.x, &mut t_far.x);
        }
        if t_near.y > t_far.y {
            core::mem::swap(&mut t_near.y, &mut t_far.y);
        }

        if t_near.x > t_far.y || t_near.y > t_far.x {
            return None;
        }

        let t_hit_near = t_near.x.max(t_near.y);
        let t_hit_far = t_far.x.min(t_far.y);
        if t_hit_far < 0.0 {
            return None;
        }

        Some(RayHit {
            time: t_hit_near,
            point: origin + dir * t_hit_near,
            normal: self.entry_normal(t_near, inv),
        })
    }

    fn swept_rect_vs_rect(&self, velocity: Vec2, rect: Rect, dt: f32, target: Rect) -> Option<RayHit> {
        debug_assert!(dt.is_finite() && dt >= 0.0, "time step must be finite and non-negative");
        if velocity.abs().max_element() <= f32::EPSILON {
            return None;
        }
        let expanded = target.expanded(rect.size() * 0.5);
        let hit = self.ray_vs_rect(rect.center(), velocity * dt, expanded)?;
        if hit.time >= 0.0 && hit.time < 1.0 {
            Some(hit)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn np() -> Narrowphase {
        Narrowphase::default()
    }

    fn unit_box() -> Rect {
        Rect::new(-1.0, -1.0, 2.0, 2.0)
    }

    #[test]
    fn test_ray_hit_from_left() {
        let hit = np()
            .ray_vs_rect(Vec2::new(-5.0, 0.0), Vec2::new(10.0, 0.0), unit_box())
            .unwrap();
        assert!((hit.time - 0.4).abs() < 1e-6);
        assert_eq!(hit.normal, Vec2::new(-1.0, 0.0));
        assert!((hit.point.x + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_ray_negative_direction_flips_normal() {
        let hit = np()
            .ray_vs_rect(Vec2::new(0.0, 6.0), Vec2::new(0.0, -10.0), unit_box())
            .unwrap();
        assert!((hit.time - 0.5).abs() < 1e-6);
        assert_eq!(hit.normal, Vec2::new(0.0, 1.0));
    }

    #[test]
    fn test_ray_parallel_miss() {
        assert!(np()
            .ray_vs_rect(Vec2::new(-5.0, 2.0), Vec2::new(1.0, 0.0), unit_box())
            .is_none());
    }

    #[test]
    fn test_ray_box_behind_origin() {
        assert!(np()
            .ray_vs_rect(Vec2::new(5.0, 0.0), Vec2::new(1.0, 0.0), unit_box())
            .is_none());
    }

    #[test]
    fn test_ray_from_inside_reports_negative_time() {
        let hit = np()
            .ray_vs_rect(Vec2::ZERO, Vec2::new(1.0, 0.0), unit_box())
            .unwrap();
        assert!(hit.time < 0.0);
    }

    #[test]
    fn test_ray_zero_direction_is_no_hit() {
        assert!(np().ray_vs_rect(Vec2::ZERO, Vec2::ZERO, unit_box()).is_none());
        assert!(np()
            .ray_vs_rect(Vec2::new(-5.0, 0.0), Vec2::new(1e-7, 0.0), unit_box())
            .is_none());
    }

    #[test]
    fn test_ray_grazing_face_is_no_hit() {
        // Travels along the top face.
        assert!(np()
            .ray_vs_rect(Vec2::new(-5.0, -1.0), Vec2::new(10.0, 0.0), unit_box())
            .is_none());
    }

    #[test]
    fn test_near_zero_component_keeps_half_plane() {
        let hit = np()
            .ray_vs_rect(Vec2::new(-5.0, 0.5), Vec2::new(10.0, 1e-7), unit_box())
            .unwrap();
        assert_eq!(hit.normal, Vec2::new(-1.0, 0.0));
        let hit = np()
            .ray_vs_rect(Vec2::new(-5.0, 0.5), Vec2::new(10.0, -1e-7), unit_box())
            .unwrap();
        assert_eq!(hit.normal, Vec2::new(-1.0, 0.0));
    }

    #[test]
    fn test_corner_policies() {
        let origin = Vec2::new(-2.0, -2.0);
        let dir = Vec2::new(4.0, 4.0);
        let mut n = np();
        assert_eq!(n.ray_vs_rect(origin, dir, unit_box()).unwrap().normal, Vec2::new(0.0, -1.0));
        n.corner_policy = CornerPolicy::PreferHorizontal;
        assert_eq!(n.ray_vs_rect(origin, dir, unit_box()).unwrap().normal, Vec2::new(-1.0, 0.0));
        n.corner_policy = CornerPolicy::Diagonal;
        let hit = n.ray_vs_rect(origin, dir, unit_box()).unwrap();
        assert_eq!(hit.normal, Vec2::new(-1.0, -1.0));
        assert!((hit.time - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_rays_at_center_land_on_boundary() {
        let target = Rect::new(10.0, 20.0, 30.0, 15.0);
        let c = target.center();
        for i in 0..64 {
            let a = i as f32 / 64.0 * std::f32::consts::TAU;
            let origin = c + Vec2::new(a.cos(), a.sin()) * 100.0;
            let hit = np().ray_vs_rect(origin, c - origin, target).unwrap();
            assert!(hit.time > 0.0);
            let on_x = (hit.point.x - target.left()).abs() < 1e-3 || (hit.point.x - target.right()).abs() < 1e-3;
            let on_y = (hit.point.y - target.top()).abs() < 1e-3 || (hit.point.y - target.bottom()).abs() < 1e-3;
            assert!(on_x || on_y, "contact {:?} not on boundary", hit.point);
            assert!(target.expanded(Vec2::splat(1e-3)).contains_rect(&Rect::new(hit.point.x, hit.point.y, 0.0, 0.0)));
        }
    }

    #[test]
    fn test_translation_along_ray_keeps_normal() {
        let origin = Vec2::new(0.0, 0.0);
        let dir = Vec2::new(3.0, 1.0);
        let near = Rect::new(6.0, 0.0, 4.0, 4.0);
        let far = near.translated(dir * 50.0);
        let a = np().ray_vs_rect(origin, dir, near).unwrap();
        let b = np().ray_vs_rect(origin, dir, far).unwrap();
        assert_eq!(a.normal, b.normal);
        assert!((b.time - a.time - 50.0).abs() < 1e-3);
    }

    #[test]
    fn test_sweep_stationary_never_hits() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        for target in [Rect::new(10.0, 0.0, 10.0, 10.0), Rect::new(5.0, 5.0, 10.0, 10.0)] {
            assert!(np().swept_rect_vs_rect(Vec2::ZERO, rect, 16.0, target).is_none());
        }
    }

    #[test]
    fn test_sweep_head_on() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        let target = Rect::new(15.0, 0.0, 10.0, 10.0);
        let vel = Vec2::new(1.0, 0.0);
        let hit = np().swept_rect_vs_rect(vel, rect, 10.0, target).unwrap();
        assert!((hit.time - 0.5).abs() < 1e-6);
        assert_eq!(hit.normal, Vec2::new(-1.0, 0.0));
        let rest = Narrowphase::rect_at_impact(rect, vel, 10.0, &hit);
        assert!((rest.right() - target.left()).abs() < 1e-5);
    }

    #[test]
    fn test_sweep_out_of_reach_this_step() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        let target = Rect::new(15.0, 0.0, 10.0, 10.0);
        // Exactly touches at the end of the step: time == 1 is not this step.
        assert!(np().swept_rect_vs_rect(Vec2::new(1.0, 0.0), rect, 5.0, target).is_none());
        assert!(np().swept_rect_vs_rect(Vec2::new(1.0, 0.0), rect, 4.0, target).is_none());
        let hit = np().swept_rect_vs_rect(Vec2::new(1.0, 0.0), rect, 5.5, target).unwrap();
        assert!(hit.time >= 0.0 && hit.time < 1.0);
    }

    #[test]
    fn test_sweep_moving_away_from_contact() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        let target = Rect::new(10.0, 0.0, 10.0, 10.0);
        assert!(np().swept_rect_vs_rect(Vec2::new(-1.0, 0.0), rect, 5.0, target).is_none());
        let hit = np().swept_rect_vs_rect(Vec2::new(1.0, 0.0), rect, 5.0, target).unwrap();
        assert_eq!(hit.time, 0.0);
    }
}
