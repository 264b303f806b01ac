use std::collections::HashSet;

use glam::Vec2;
use log::trace;
use winit::keyboard::KeyCode;

use crate::config::PLAYER_ANGLE_DELTA;
use crate::map::GridMap;
use crate::player::PlayerState;

/// The four keys the game reacts to, sampled once per step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyState {
    pub forward: bool,
    pub backward: bool,
    pub turn_left: bool,
    pub turn_right: bool,
}

impl KeyState {
    pub fn from_pressed(keys: &HashSet<KeyCode>) -> Self {
        Self {
            forward: keys.contains(&KeyCode::KeyW),
            backward: keys.contains(&KeyCode::KeyS),
            turn_left: keys.contains(&KeyCode::KeyA),
            turn_right: keys.contains(&KeyCode::KeyD),
        }
    }
}

/// Apply one step of input. Movement uses the delta from before any turn in the same step.
pub fn handle_input(player: &mut PlayerState, map: &GridMap, keys: KeyState) {
    // World y grows downward, so "forward" subtracts the delta's y
    if keys.forward {
        try_move(player, map, Vec2::new(player.delta.x, -player.delta.y));
    } else if keys.backward {
        try_move(player, map, Vec2::new(-player.delta.x, player.delta.y));
    }

    if keys.turn_left {
        player.turn(PLAYER_ANGLE_DELTA);
    } else if keys.turn_right {
        player.turn(-PLAYER_ANGLE_DELTA);
    }
}

/// Commit `player.pos + step` only if it lands on an empty in-bounds cell.
fn try_move(player: &mut PlayerState, map: &GridMap, step: Vec2) -> bool {
    let target = player.pos + step;
    if !map.is_open(target) {
        trace!("blocked move to ({:.1}, {:.1})", target.x, target.y);
        return false;
    }
    player.pos = target;
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PLAYER_MOVE_DELTA;
    use std::f32::consts::{FRAC_PI_2, PI, TAU};

    fn corridor() -> GridMap {
        GridMap::from_rows(&[&[0, 0, 1], &[0, 0, 0]], 10.0).unwrap()
    }

    const FORWARD: KeyState = KeyState {
        forward: true,
        backward: false,
        turn_left: false,
        turn_right: false,
    };

    #[test]
    fn forward_and_backward_follow_the_heading() {
        let map = GridMap::level().unwrap();
        let mut p = PlayerState::new(Vec2::new(200.0, 300.0), FRAC_PI_2);

        handle_input(&mut p, &map, FORWARD);
        assert!((p.pos - Vec2::new(200.0, 300.0 - PLAYER_MOVE_DELTA)).length() < 1e-4);

        let back = KeyState {
            backward: true,
            ..Default::default()
        };
        handle_input(&mut p, &map, back);
        assert!((p.pos - Vec2::new(200.0, 300.0)).length() < 1e-4);
    }

    #[test]
    fn blocked_move_leaves_position_untouched() {
        let map = corridor();
        // One step short of the wall at column 2, row 0
        let start = Vec2::new(19.0, 5.0);
        let mut p = PlayerState::new(start, 0.0);
        handle_input(&mut p, &map, FORWARD);
        assert_eq!(p.pos, start);
        handle_input(&mut p, &map, FORWARD);
        assert_eq!(p.pos, start);
    }

    #[test]
    fn cannot_walk_off_the_grid() {
        let map = corridor();
        let start = Vec2::new(1.0, 15.0);
        let mut p = PlayerState::new(start, PI);
        handle_input(&mut p, &map, FORWARD);
        assert_eq!(p.pos, start);

        let mut p = PlayerState::new(Vec2::new(15.0, 19.0), 1.5 * PI);
        handle_input(&mut p, &map, FORWARD);
        assert_eq!(p.pos, Vec2::new(15.0, 19.0));
    }

    #[test]
    fn full_turn_returns_to_start() {
        let map = corridor();
        let mut p = PlayerState::new(Vec2::new(5.0, 5.0), 0.7);
        let left = KeyState {
            turn_left: true,
            ..Default::default()
        };
        let steps = (TAU / PLAYER_ANGLE_DELTA).round() as usize;
        for _ in 0..steps {
            handle_input(&mut p, &map, left);
            assert!((0.0..TAU).contains(&p.angle));
        }
        let diff = (p.angle - 0.7).abs();
        assert!(diff.min(TAU - diff) < 1e-3, "angle drifted to {}", p.angle);
        assert_eq!(p.pos, Vec2::new(5.0, 5.0));
    }

    #[test]
    fn turning_right_wraps_below_zero() {
        let map = corridor();
        let mut p = PlayerState::new(Vec2::new(5.0, 5.0), 0.0);
        let right = KeyState {
            turn_right: true,
            ..Default::default()
        };
        handle_input(&mut p, &map, right);
        assert!((p.angle - (TAU - PLAYER_ANGLE_DELTA)).abs() < 1e-5);
        let expected = Vec2::new(p.angle.cos(), p.angle.sin()) * PLAYER_MOVE_DELTA;
        assert!((p.delta - expected).length() < 1e-5);
    }

    #[test]
    fn one_action_per_axis_forward_and_left_win() {
        let map = corridor();
        let mut p = PlayerState::new(Vec2::new(5.0, 15.0), 0.0);
        let all = KeyState {
            forward: true,
            backward: true,
            turn_left: true,
            turn_right: true,
        };
        handle_input(&mut p, &map, all);
        // Moved with the pre-turn delta, then turned left
        assert!((p.pos - Vec2::new(5.0 + PLAYER_MOVE_DELTA, 15.0)).length() < 1e-4);
        assert!((p.angle - PLAYER_ANGLE_DELTA).abs() < 1e-6);
    }

    #[test]
    fn keys_map_to_wasd() {
        let pressed: HashSet<KeyCode> = [KeyCode::KeyW, KeyCode::KeyD, KeyCode::KeyQ].into();
        let keys = KeyState::from_pressed(&pressed);
        assert_eq!(
            keys,
            KeyState {
                forward: true,
                backward: false,
                turn_left: false,
                turn_right: true,
            }
        );
        assert_eq!(KeyState::from_pressed(&HashSet::new()), KeyState::default());
    }
}
