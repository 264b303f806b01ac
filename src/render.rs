use glam::IVec2;

use crate::minimap::{Minimap, Rect};
use crate::raycaster::{Slice, WallSide};

const CLEAR: u32 = pack_rgb(115, 115, 115);
const SKY: u32 = pack_rgb(30, 30, 70);
const GROUND: u32 = pack_rgb(40, 40, 40);

const PANEL: u32 = pack_rgb(61, 61, 92);
const MAP_WALL: u32 = pack_rgb(0, 0, 0);
const MAP_EMPTY: u32 = pack_rgb(255, 255, 255);
const PLAYER: u32 = pack_rgb(255, 0, 255);
const HEADING_WIDTH: i32 = 3;

#[inline]
pub const fn pack_rgb(r: u8, g: u8, b: u8) -> u32 {
    // BGRA8 in little-endian memory
    (b as u32) | ((g as u32) << 8) | ((r as u32) << 16)
    // Alpha at 0
}

/// Halve each channel; used for walls struck on their vertical faces.
#[inline]
fn shade(c: u32) -> u32 {
    (c >> 1) & 0x007F7F7F
}

fn wall_color(wall: u8, side: WallSide) -> u32 {
    let palette = [
        pack_rgb(200, 200, 200),
        pack_rgb(180, 180, 250),
        pack_rgb(250, 180, 180),
        pack_rgb(180, 250, 180),
    ];
    let base = palette[(wall.saturating_sub(1)) as usize % palette.len()];
    match side {
        WallSide::Horizontal => base,
        WallSide::Vertical => shade(base),
    }
}

/// Fixed-size software frame. Origin top-left, one `u32` per pixel.
pub struct Framebuffer {
    pub pixels: Vec<u32>,
    pub width: usize,
    pub height: usize,
}

impl Framebuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            pixels: vec![0; width * height],
            width,
            height,
        }
    }

    pub fn clear(&mut self) {
        self.pixels.fill(CLEAR);
    }

    #[cfg(test)]
    pub fn get(&self, x: usize, y: usize) -> u32 {
        self.pixels[y * self.width + x]
    }

    /// Fill a half-open rectangle, clipped to the frame.
    pub fn fill_rect(&mut self, r: Rect, color: u32) {
        let x0 = r.x.clamp(0, self.width as i32) as usize;
        let x1 = (r.x + r.w).clamp(0, self.width as i32) as usize;
        let y0 = r.y.clamp(0, self.height as i32) as usize;
        let y1 = (r.y + r.h).clamp(0, self.height as i32) as usize;
        if x0 >= x1 {
            return;
        }
        for y in y0..y1 {
            let row = y * self.width;
            self.pixels[row + x0..row + x1].fill(color);
        }
    }

    /// Square point of `size` pixels centred on `p`.
    pub fn point(&mut self, p: IVec2, size: i32, color: u32) {
        let half = size / 2;
        self.fill_rect(
            Rect {
                x: p.x - half,
                y: p.y - half,
                w: size,
                h: size,
            },
            color,
        );
    }

    /// Bresenham segment from `a` to `b` inclusive, `width` pixels thick.
    pub fn line(&mut self, a: IVec2, b: IVec2, width: i32, color: u32) {
        let d = (b - a).abs();
        let sx = if a.x < b.x { 1 } else { -1 };
        let sy = if a.y < b.y { 1 } else { -1 };
        let mut err = d.x - d.y;
        let mut p = a;
        loop {
            self.point(p, width, color);
            if p == b {
                break;
            }
            let e2 = 2 * err;
            if e2 > -d.y {
                err -= d.y;
                p.x += sx;
            }
            if e2 < d.x {
                err += d.x;
                p.y += sy;
            }
        }
    }
}

/// Sky and ground halves, then one vertical strip per hit column.
pub fn draw_view(fb: &mut Framebuffer, slices: &[Option<Slice>]) {
    let (w, h) = (fb.width as i32, fb.height as i32);
    let mid = h / 2;
    fb.fill_rect(Rect { x: 0, y: 0, w, h: mid }, SKY);
    fb.fill_rect(Rect { x: 0, y: mid, w, h: h - mid }, GROUND);

    for slice in slices.iter().flatten() {
        let strip = Rect {
            x: slice.column as i32,
            y: slice.top,
            w: 1,
            h: slice.bottom - slice.top,
        };
        fb.fill_rect(strip, wall_color(slice.wall, slice.side));
    }
}

pub fn draw_minimap(fb: &mut Framebuffer, minimap: &Minimap, player_size: i32) {
    fb.fill_rect(minimap.panel, PANEL);
    for cell in &minimap.cells {
        let color = if cell.wall { MAP_WALL } else { MAP_EMPTY };
        fb.fill_rect(cell.rect, color);
    }
    fb.point(minimap.player, player_size, PLAYER);
    fb.line(minimap.player, minimap.heading_end, HEADING_WIDTH, PLAYER);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slice(column: usize, top: i32, bottom: i32, side: WallSide) -> Slice {
        Slice {
            column,
            top,
            bottom,
            height: (bottom - top) as f32,
            distance: 10.0,
            side,
            wall: 1,
        }
    }

    #[test]
    fn fill_rect_clips_to_frame() {
        let mut fb = Framebuffer::new(4, 3);
        fb.fill_rect(Rect { x: -2, y: 1, w: 4, h: 10 }, 7);
        assert_eq!(fb.get(0, 1), 7);
        assert_eq!(fb.get(1, 2), 7);
        assert_eq!(fb.get(2, 1), 0);
        assert_eq!(fb.get(0, 0), 0);

        // Entirely outside is a no-op
        fb.fill_rect(Rect { x: 10, y: 10, w: 2, h: 2 }, 9);
        assert!(!fb.pixels.contains(&9));
    }

    #[test]
    fn view_draws_strips_over_background() {
        let mut fb = Framebuffer::new(3, 10);
        fb.clear();
        let slices = [
            Some(slice(0, 2, 8, WallSide::Horizontal)),
            None,
            Some(slice(2, 4, 6, WallSide::Vertical)),
        ];
        draw_view(&mut fb, &slices);

        let lit = wall_color(1, WallSide::Horizontal);
        let dark = wall_color(1, WallSide::Vertical);
        assert_ne!(lit, dark);

        assert_eq!(fb.get(0, 1), SKY);
        assert_eq!(fb.get(0, 2), lit);
        assert_eq!(fb.get(0, 7), lit);
        assert_eq!(fb.get(0, 8), GROUND);

        // Missed column keeps the background
        assert_eq!(fb.get(1, 4), SKY);
        assert_eq!(fb.get(1, 5), GROUND);

        assert_eq!(fb.get(2, 3), SKY);
        assert_eq!(fb.get(2, 4), dark);
        assert_eq!(fb.get(2, 6), GROUND);
    }

    #[test]
    fn line_reaches_both_ends() {
        let mut fb = Framebuffer::new(20, 20);
        fb.line(IVec2::new(2, 3), IVec2::new(15, 9), 1, 5);
        assert_eq!(fb.get(2, 3), 5);
        assert_eq!(fb.get(15, 9), 5);
        // One pixel per step along the major axis
        assert_eq!(fb.pixels.iter().filter(|&&p| p == 5).count(), 14);
    }

    #[test]
    fn minimap_draws_cells_and_player() {
        let map = crate::map::GridMap::from_rows(&[&[1, 0]], 64.0).unwrap();
        let player = crate::player::PlayerState::new(glam::Vec2::new(96.0, 32.0), 0.0);
        let mut fb = Framebuffer::new(200, 100);
        fb.clear();
        let m = crate::minimap::layout(&map, &player, fb.width, fb.height);
        draw_minimap(&mut fb, &m, 4);

        // Panel is 50x25 starting at x = 150
        assert_eq!(fb.get(150, 0), PANEL);
        assert_eq!(fb.get(155, 5), MAP_WALL);
        assert_eq!(fb.get(185, 8), PLAYER); // heading line
        assert_eq!(fb.get(m.player.x as usize, m.player.y as usize), PLAYER);
        assert_eq!(fb.get(180, 14), MAP_EMPTY);
        assert_eq!(fb.get(140, 10), CLEAR);
    }
}
