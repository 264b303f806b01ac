use glam::Vec2;

use crate::config::{DISPLAY_HEIGHT, DISPLAY_WIDTH, PLAYER_VIEW_ANGLE};
use crate::map::GridMap;
use crate::player::{PlayerState, wrap_angle};

// Below this |sin| (or |cos|) the ray counts as parallel to that family of grid lines
const PARALLEL_EPS: f32 = 1e-6;
const MIN_DISTANCE: f32 = 1.0;

/// Which family of grid lines the ray crossed when it hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WallSide {
    Horizontal, // y = k * cell_size
    Vertical,   // x = k * cell_size
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub point: Vec2,
    pub distance: f32, // radial, from the ray origin
    pub side: WallSide,
    pub wall: u8,
}

/// One vertical wall strip of the 3D view. Rows `top..bottom`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slice {
    pub column: usize,
    pub top: i32,
    pub bottom: i32,
    pub height: f32,
    pub distance: f32, // after fisheye correction
    pub side: WallSide,
    pub wall: u8,
}

/// Screen the rays are cast for.
#[derive(Debug, Clone, Copy)]
pub struct View {
    pub width: usize,
    pub height: usize,
    pub fov: f32,
}

impl Default for View {
    fn default() -> Self {
        Self {
            width: DISPLAY_WIDTH,
            height: DISPLAY_HEIGHT,
            fov: PLAYER_VIEW_ANGLE,
        }
    }
}

impl View {
    /// Column 0 is the left edge, i.e. facing + fov/2.
    #[inline]
    pub fn ray_angle(&self, facing: f32, column: usize) -> f32 {
        let step = self.fov / self.width as f32;
        wrap_angle(facing + 0.5 * self.fov - column as f32 * step)
    }
}

/// Nearest wall on a horizontal grid line (y = k * cell_size) along angle `ra`.
pub fn cast_horizontal(map: &GridMap, origin: Vec2, ra: f32) -> Option<RayHit> {
    let (sin, cos) = ra.sin_cos();
    if sin.abs() < PARALLEL_EPS {
        return None;
    }
    let s = map.cell_size();
    let inv_tan = cos / sin;

    // sin > 0 points toward smaller y: cross the top edge of our row, check the row above it
    let up = sin > 0.0;
    let first = (origin.y / s).floor() as i32;
    let (mut line, step, row_offset) = if up { (first, -1, -1) } else { (first + 1, 1, 0) };

    for _ in 0..=map.height() {
        let y = line as f32 * s;
        let x = (origin.y - y) * inv_tan + origin.x;
        let col = (x / s).floor() as i32;
        match map.cell(col, line + row_offset)? {
            0 => line += step,
            wall => {
                let point = Vec2::new(x, y);
                return Some(RayHit {
                    point,
                    distance: origin.distance(point),
                    side: WallSide::Horizontal,
                    wall,
                });
            }
        }
    }
    None
}

/// Nearest wall on a vertical grid line (x = k * cell_size) along angle `ra`.
pub fn cast_vertical(map: &GridMap, origin: Vec2, ra: f32) -> Option<RayHit> {
    let (sin, cos) = ra.sin_cos();
    if cos.abs() < PARALLEL_EPS {
        return None;
    }
    let s = map.cell_size();
    let tan = sin / cos;

    let left = cos < 0.0;
    let first = (origin.x / s).floor() as i32;
    let (mut line, step, col_offset) = if left { (first, -1, -1) } else { (first + 1, 1, 0) };

    for _ in 0..=map.width() {
        let x = line as f32 * s;
        let y = (origin.x - x) * tan + origin.y;
        let row = (y / s).floor() as i32;
        match map.cell(line + col_offset, row)? {
            0 => line += step,
            wall => {
                let point = Vec2::new(x, y);
                return Some(RayHit {
                    point,
                    distance: origin.distance(point),
                    side: WallSide::Vertical,
                    wall,
                });
            }
        }
    }
    None
}

/// The horizontal hit only wins when strictly closer.
#[inline]
pub fn nearer(h: Option<RayHit>, v: Option<RayHit>) -> Option<RayHit> {
    match (h, v) {
        (Some(h), Some(v)) => Some(if h.distance < v.distance { h } else { v }),
        (h, v) => h.or(v),
    }
}

pub fn cast_ray(map: &GridMap, origin: Vec2, ra: f32) -> Option<RayHit> {
    nearer(cast_horizontal(map, origin, ra), cast_vertical(map, origin, ra))
}

/// Radial distance to camera-plane distance, never below `MIN_DISTANCE`.
#[inline]
pub fn correct_fisheye(raw: f32, facing: f32, ra: f32) -> f32 {
    (raw * wrap_angle(facing - ra).cos()).max(MIN_DISTANCE)
}

/// Wall height on screen for a corrected distance, capped at the screen height.
#[inline]
pub fn slice_height(distance: f32, cell_size: f32, screen_h: usize) -> f32 {
    let screen_h = screen_h as f32;
    (screen_h * cell_size / distance).min(screen_h)
}

pub fn cast_column(map: &GridMap, player: &PlayerState, view: &View, column: usize) -> Option<Slice> {
    let ra = view.ray_angle(player.angle, column);
    let hit = cast_ray(map, player.pos, ra)?;

    let distance = correct_fisheye(hit.distance, player.angle, ra);
    let height = slice_height(distance, map.cell_size(), view.height);
    let top = ((view.height as f32 - height) * 0.5).round() as i32;
    let bottom = (top + height.round() as i32).min(view.height as i32);

    Some(Slice {
        column,
        top,
        bottom,
        height,
        distance,
        side: hit.side,
        wall: hit.wall,
    })
}

/// One entry per screen column, left to right. `None` where the ray left the map
/// without hitting anything; those columns are drawn as background.
pub fn cast_view(map: &GridMap, player: &PlayerState, view: &View) -> Vec<Option<Slice>> {
    (0..view.width)
        .map(|column| cast_column(map, player, view, column))
        .collect()
}
