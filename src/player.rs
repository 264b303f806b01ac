use std::f32::consts::TAU;

use glam::Vec2;

use crate::config::{PLAYER_MOVE_DELTA, SPAWN_ANGLE, SPAWN_POS};

pub struct PlayerState {
    pub pos: Vec2,    // world px, always inside an open cell
    pub angle: f32,   // radians in [0, 2pi), 0 faces +x, pi/2 faces up the screen
    pub delta: Vec2,  // per-step move vector, y not yet flipped to screen space
}

impl PlayerState {
    pub fn new(pos: Vec2, angle: f32) -> Self {
        let angle = wrap_angle(angle);
        Self {
            pos,
            angle,
            delta: move_delta(angle),
        }
    }

    pub fn spawn() -> Self {
        Self::new(Vec2::from(SPAWN_POS), SPAWN_ANGLE)
    }

    /// Rotate by `by` radians (positive is counter-clockwise) and refresh the move vector.
    pub fn turn(&mut self, by: f32) {
        self.angle = wrap_angle(self.angle + by);
        self.delta = move_delta(self.angle);
    }

    /// Facing direction in screen space, where y grows downward.
    #[inline]
    pub fn heading(&self) -> Vec2 {
        Vec2::new(self.angle.cos(), -self.angle.sin())
    }
}

#[inline]
fn move_delta(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin()) * PLAYER_MOVE_DELTA
}

/// Wrap into [0, 2pi).
#[inline]
pub fn wrap_angle(a: f32) -> f32 {
    let w = a.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if w >= TAU { 0.0 } else { w }
}
