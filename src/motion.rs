use glam::Vec2;

use crate::api::TileSource;
use crate::resolve::{OneWayMode, TileResolution, TileResolver};
use crate::types::*;

/// Framerate-independent approach of `a` toward `b`.
pub fn exp_decay(a: f32, b: f32, decay: f32, dt: f32) -> f32 {
    b + (a - b) * (-decay * dt).exp()
}

/// Camera of the same size re-centered on `target` and kept inside `room`.
pub fn follow_camera(camera: Rect, target: Rect, room: Rect) -> Rect {
    camera.centered_on(target.center()).clamped_within(&room)
}

/// A box that moves through the tile grid: the player, a walking enemy, a
/// bouncing particle.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Mover {
    pub rect: Rect,
    pub velocity: Vec2,
    pub one_way: OneWayMode,
}

impl Mover {
    pub fn new(rect: Rect) -> Self {
        Self { rect, velocity: Vec2::ZERO, one_way: OneWayMode::Block }
    }

    pub fn with_one_way(mut self, one_way: OneWayMode) -> Self {
        self.one_way = one_way;
        self
    }

    /// Eases the velocity toward `target` on both axes.
    pub fn steer(&mut self, target: Vec2, decay: f32, dt: f32) {
        self.velocity = Vec2::new(
            exp_decay(self.velocity.x, target.x, decay, dt),
            exp_decay(self.velocity.y, target.y, decay, dt),
        );
    }

    pub fn clamp_to(&mut self, room: &Rect) {
        self.rect = self.rect.clamped_within(room);
    }
}

/// One tick for one mover: resolve against the grid, then integrate.
pub fn advance<G: TileSource + ?Sized>(
    mover: &mut Mover,
    dt: f32,
    grid: &G,
    resolver: &TileResolver,
) -> TileResolution {
    let res = resolver.resolve(mover.rect, mover.velocity, dt, grid, mover.one_way);
    mover.velocity = res.velocity;
    mover.rect = mover.rect.translated(res.velocity * dt);
    res
}
