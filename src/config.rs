use std::f32::consts::{PI, TAU};
use std::time::Duration;

// Internal framebuffer, stretched to the window on present
pub const DISPLAY_WIDTH: usize = 1024;
pub const DISPLAY_HEIGHT: usize = 512;

pub const CELL_SIZE: f32 = 64.0;

pub const PLAYER_VIEW_ANGLE: f32 = PI / 3.0; // 60 degrees
pub const PLAYER_MOVE_DELTA: f32 = 2.5; // world px per step
pub const PLAYER_ANGLE_DELTA: f32 = TAU / 120.0; // 3 degrees per step
pub const PLAYER_SIZE: i32 = 8;

pub const MINIMAP_WIDTH_RATIO: f32 = 0.25;
pub const MINIMAP_HEIGHT_RATIO: f32 = 0.25;

/// Input is applied at a fixed rate, independent of how fast frames are presented.
pub const TICK: Duration = Duration::from_micros(16_667);
pub const MAX_FRAME_TIME: Duration = Duration::from_millis(100);

pub const LEVEL_WIDTH: usize = 8;
pub const LEVEL_HEIGHT: usize = 8;

#[rustfmt::skip]
pub const LEVEL: [u8; LEVEL_WIDTH * LEVEL_HEIGHT] = [
    1, 1, 1, 1, 1, 1, 1, 1,
    1, 0, 2, 0, 0, 0, 0, 1,
    1, 0, 2, 0, 0, 3, 0, 1,
    1, 0, 2, 0, 0, 0, 0, 1,
    1, 0, 0, 0, 0, 0, 0, 1,
    1, 0, 0, 0, 0, 4, 0, 1,
    1, 0, 0, 0, 0, 0, 0, 1,
    1, 1, 1, 1, 1, 1, 1, 1,
];

pub const SPAWN_POS: [f32; 2] = [200.0, 300.0];
pub const SPAWN_ANGLE: f32 = PI / 2.0;
