//! Idle/demo mode driver
//!
//! Produces the input a cautious player would give: shoot whatever is in
//! line, and when something gets close anyway, drift toward the lane whose
//! nearest obstacle is farthest away.

use std::cmp::Ordering;

use super::state::GameState;
use super::tick::TickInput;

/// Choose this frame's input from the current state
pub fn drive(state: &GameState) -> TickInput {
    let vehicle = state.vehicle.rect();
    let lanes = state.tuning.lane_count as usize;

    // Obstacles above this line are left to the guns
    let danger_line = vehicle.top() - vehicle.size.y * 2.0;

    // Bottom edge of the closest threatening obstacle per lane
    let mut nearest = vec![f32::NEG_INFINITY; lanes];
    for obstacle in state.obstacles.iter().filter(|o| !o.destroyed) {
        let rect = obstacle.rect();
        if rect.bottom() <= danger_line || rect.bottom() > vehicle.bottom() {
            continue;
        }
        let lane = lane_of(state, rect.center().x);
        nearest[lane] = nearest[lane].max(rect.bottom());
    }

    let current = lane_of(state, vehicle.center().x);
    let target = (0..lanes)
        .min_by(|&a, &b| {
            nearest[a]
                .partial_cmp(&nearest[b])
                .unwrap_or(Ordering::Equal)
                .then(a.abs_diff(current).cmp(&b.abs_diff(current)))
        })
        .unwrap_or(current);

    let dx = state.lane_center(target as u32) - vehicle.center().x;
    let dead_zone = state.vehicle.speed / 2.0;

    let in_line = state.obstacles.iter().any(|o| {
        let rect = o.rect();
        !o.destroyed
            && rect.bottom() <= vehicle.top()
            && rect.left() < vehicle.right()
            && rect.right() > vehicle.left()
    });

    TickInput {
        left: dx < -dead_zone,
        right: dx > dead_zone,
        fire: (in_line && state.can_fire).then_some(2),
        ..Default::default()
    }
}

fn lane_of(state: &GameState, x: f32) -> usize {
    let lanes = state.tuning.lane_count as usize;
    let lane = ((x - state.road_left()) / state.tuning.lane_width()).floor();
    (lane.max(0.0) as usize).min(lanes.saturating_sub(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Obstacle, Viewport};
    use crate::sim::tick::tick;
    use crate::tuning::Tuning;
    use glam::Vec2;

    fn new_state() -> GameState {
        GameState::new(4242, Viewport::new(800.0, 600.0), Tuning::default())
    }

    #[test]
    fn test_holds_lane_when_road_is_clear() {
        let input = drive(&new_state());
        assert!(!input.left && !input.right);
        assert_eq!(input.fire, None);
    }

    #[test]
    fn test_shoots_distant_obstacle_without_swerving() {
        let mut state = new_state();
        state
            .obstacles
            .push(Obstacle::new(Vec2::new(370.0, -100.0), Vec2::new(60.0, 120.0)));

        let input = drive(&state);
        assert_eq!(input.fire, Some(2));
        assert!(!input.left && !input.right);
    }

    #[test]
    fn test_shoots_and_dodges_obstacle_in_line() {
        let mut state = new_state();
        state
            .obstacles
            .push(Obstacle::new(Vec2::new(370.0, 100.0), Vec2::new(60.0, 120.0)));

        let input = drive(&state);
        assert_eq!(input.fire, Some(2));
        assert!(input.left ^ input.right);
    }

    #[test]
    fn test_no_fire_while_reloading() {
        let mut state = new_state();
        state
            .obstacles
            .push(Obstacle::new(Vec2::new(370.0, 100.0), Vec2::new(60.0, 120.0)));
        state.can_fire = false;
        state.reload_timer = 3;
        assert_eq!(drive(&state).fire, None);
    }

    #[test]
    fn test_autopilot_scores() {
        let mut state = new_state();
        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };
        for _ in 0..3_000 {
            tick(&mut state, &input);
            if state.game_over {
                break;
            }
        }
        assert!(state.score > 0);
    }
}
