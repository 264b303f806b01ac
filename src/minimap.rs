use glam::IVec2;

use crate::config::{MINIMAP_HEIGHT_RATIO, MINIMAP_WIDTH_RATIO};
use crate::map::GridMap;
use crate::player::PlayerState;

const HEADING_LENGTH: f32 = 20.0;

/// Half-open pixel rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinimapCell {
    pub rect: Rect,
    pub wall: bool,
}

/// Everything the minimap draws, in framebuffer pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct Minimap {
    pub panel: Rect,
    pub cells: Vec<MinimapCell>,
    pub player: IVec2,
    pub heading_end: IVec2,
}

/// Scaled top-down view anchored to the top-right corner of a `screen_w` x `screen_h` frame.
pub fn layout(map: &GridMap, player: &PlayerState, screen_w: usize, screen_h: usize) -> Minimap {
    let w = (screen_w as f32 * MINIMAP_WIDTH_RATIO) as i32;
    let h = (screen_h as f32 * MINIMAP_HEIGHT_RATIO) as i32;
    let panel = Rect {
        x: screen_w as i32 - w,
        y: 0,
        w,
        h,
    };

    let ox = (map.cell_size() * MINIMAP_WIDTH_RATIO) as i32;
    let oy = (map.cell_size() * MINIMAP_HEIGHT_RATIO) as i32;
    // 1px gutter between cells
    let cells = map
        .cells()
        .map(|(col, row, v)| MinimapCell {
            rect: Rect {
                x: panel.x + col as i32 * ox + 1,
                y: panel.y + row as i32 * oy + 1,
                w: (ox - 2).max(1),
                h: (oy - 2).max(1),
            },
            wall: v != 0,
        })
        .collect();

    let scaled = player.pos * glam::Vec2::new(MINIMAP_WIDTH_RATIO, MINIMAP_HEIGHT_RATIO);
    let player_px = IVec2::new(panel.x, panel.y) + scaled.as_ivec2();
    let heading_end = player_px + (player.heading() * HEADING_LENGTH).as_ivec2();

    Minimap {
        panel,
        cells,
        player: player_px,
        heading_end,
    }
}
