//! Scene building for the 2D canvas
//!
//! `build_scene` turns a `GameState` into a flat list of draw commands in
//! paint order. It only reads the state; painting happens elsewhere.

use glam::Vec2;

use crate::sim::{GameState, Rect};

/// RGBA color, components in [0, 1]
pub type Color = [f32; 4];

/// Colors for game elements
pub mod colors {
    use super::Color;

    pub const BACKGROUND: Color = [0.267, 0.267, 0.267, 1.0]; // #444
    pub const ROAD: Color = [0.533, 0.533, 0.533, 1.0]; // #888
    pub const LANE_MARKER: Color = [1.0, 1.0, 1.0, 1.0];
    pub const VEHICLE: Color = [1.0, 0.267, 0.267, 1.0]; // #ff4444
    pub const OBSTACLE: Color = [0.0, 0.667, 1.0, 1.0]; // #00aaff
    pub const BLAST: Color = [1.0, 1.0, 0.0, 1.0];
    pub const PROJECTILE: Color = [1.0, 1.0, 0.0, 1.0];
    pub const RELOAD_TRACK: Color = [0.133, 0.133, 0.133, 1.0]; // #222
    pub const RELOAD_FILL: Color = [1.0, 1.0, 0.0, 1.0];
    pub const OUTLINE: Color = [1.0, 1.0, 1.0, 1.0];
    pub const TEXT: Color = [1.0, 1.0, 1.0, 1.0];
}

/// Vehicle blast: circle base radius and fade length
const VEHICLE_BLAST_RADIUS: f32 = 80.0;
const VEHICLE_FADE_FRAMES: f32 = 20.0;
/// Frames the vehicle flash stays opaque before fading
const VEHICLE_FLASH_HOLD: f32 = 10.0;
/// Obstacle blast: circle base radius and frames to double in size
const OBSTACLE_BLAST_RADIUS: f32 = 60.0;
const OBSTACLE_BLAST_GROWTH_FRAMES: f32 = 10.0;

const RELOAD_BAR_SIZE: Vec2 = Vec2::new(100.0, 10.0);
const RELOAD_BAR_MARGIN: f32 = 20.0;
const SCORE_POS: Vec2 = Vec2::new(30.0, 50.0);
const SCORE_FONT_PX: f32 = 32.0;
const GAME_OVER_FONT_PX: f32 = 64.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
}

/// One canvas drawing operation
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    FillRect {
        rect: Rect,
        color: Color,
    },
    StrokeRect {
        rect: Rect,
        color: Color,
        line_width: f32,
    },
    FillCircle {
        center: Vec2,
        radius: f32,
        color: Color,
    },
    /// Bold text; `pos` is the baseline anchor
    Text {
        text: String,
        pos: Vec2,
        size_px: f32,
        align: TextAlign,
        color: Color,
    },
}

fn with_alpha(color: Color, alpha: f32) -> Color {
    [color[0], color[1], color[2], color[3] * alpha.clamp(0.0, 1.0)]
}

/// Build the full frame for the current state
pub fn build_scene(state: &GameState) -> Vec<DrawCommand> {
    let mut out = Vec::with_capacity(16 + state.obstacles.len() + state.projectiles.len());
    let viewport = state.viewport;

    out.push(DrawCommand::FillRect {
        rect: Rect::new(Vec2::ZERO, Vec2::new(viewport.width, viewport.height)),
        color: colors::BACKGROUND,
    });

    road(state, &mut out);
    vehicle(state, &mut out);

    for obstacle in &state.obstacles {
        if obstacle.destroyed {
            let t = obstacle.blast_timer as f32;
            let fade = state.tuning.obstacle_blast_frames.max(1) as f32;
            out.push(DrawCommand::FillCircle {
                center: obstacle.rect().center(),
                radius: OBSTACLE_BLAST_RADIUS * (1.0 + t / OBSTACLE_BLAST_GROWTH_FRAMES),
                color: with_alpha(colors::BLAST, 1.0 - t / fade),
            });
        } else {
            out.push(DrawCommand::FillRect {
                rect: obstacle.rect(),
                color: colors::OBSTACLE,
            });
        }
    }

    for projectile in &state.projectiles {
        out.push(DrawCommand::FillRect {
            rect: projectile.rect(),
            color: colors::PROJECTILE,
        });
    }

    if !state.can_fire {
        reload_bar(state, &mut out);
    }

    if state.game_over {
        out.push(DrawCommand::Text {
            text: "Game Over".to_string(),
            pos: Vec2::new(viewport.width / 2.0, viewport.height / 2.0),
            size_px: GAME_OVER_FONT_PX,
            align: TextAlign::Center,
            color: colors::TEXT,
        });
    }

    out.push(DrawCommand::Text {
        text: format!("Score: {}", state.score),
        pos: SCORE_POS,
        size_px: SCORE_FONT_PX,
        align: TextAlign::Left,
        color: colors::TEXT,
    });

    out
}

/// Road surface and scrolling lane markers
fn road(state: &GameState, out: &mut Vec<DrawCommand>) {
    let tuning = &state.tuning;
    let left = state.road_left();
    let height = state.viewport.height;

    out.push(DrawCommand::FillRect {
        rect: Rect::new(Vec2::new(left, 0.0), Vec2::new(tuning.road_width, height)),
        color: colors::ROAD,
    });

    let period = tuning.marker_period();
    let marker = Vec2::new(tuning.lane_marker_width, tuning.lane_marker_height);
    for lane in 1..tuning.lane_count {
        let x = left + tuning.lane_width() * lane as f32 - marker.x / 2.0;
        let mut y = -state.road.offset;
        while y < height {
            out.push(DrawCommand::FillRect {
                rect: Rect::new(Vec2::new(x, y), marker),
                color: colors::LANE_MARKER,
            });
            y += period;
        }
    }
}

fn vehicle(state: &GameState, out: &mut Vec<DrawCommand>) {
    let vehicle = &state.vehicle;
    if !vehicle.destroyed {
        out.push(DrawCommand::FillRect {
            rect: vehicle.rect(),
            color: colors::VEHICLE,
        });
        return;
    }

    let t = vehicle.blast_timer as f32;
    out.push(DrawCommand::FillRect {
        rect: vehicle.rect(),
        color: with_alpha(colors::VEHICLE, 1.0 - (t / VEHICLE_FADE_FRAMES).min(1.0)),
    });
    let flash = 1.0 - ((t - VEHICLE_FLASH_HOLD) / (VEHICLE_FADE_FRAMES - VEHICLE_FLASH_HOLD)).max(0.0);
    out.push(DrawCommand::FillCircle {
        center: vehicle.rect().center(),
        radius: VEHICLE_BLAST_RADIUS * (1.0 + t / VEHICLE_FADE_FRAMES),
        color: with_alpha(colors::BLAST, flash),
    });
}

/// Reload progress indicator in the top-right corner
fn reload_bar(state: &GameState, out: &mut Vec<DrawCommand>) {
    let pos = Vec2::new(
        state.viewport.width - RELOAD_BAR_SIZE.x - RELOAD_BAR_MARGIN,
        RELOAD_BAR_MARGIN,
    );
    let track = Rect::new(pos, RELOAD_BAR_SIZE);
    out.push(DrawCommand::FillRect {
        rect: track,
        color: colors::RELOAD_TRACK,
    });
    out.push(DrawCommand::FillRect {
        rect: Rect::new(
            pos,
            Vec2::new(RELOAD_BAR_SIZE.x * state.reload_progress(), RELOAD_BAR_SIZE.y),
        ),
        color: colors::RELOAD_FILL,
    });
    out.push(DrawCommand::StrokeRect {
        rect: track,
        color: colors::OUTLINE,
        line_width: 1.0,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Obstacle, Viewport, fire};
    use crate::tuning::Tuning;

    fn new_state() -> GameState {
        GameState::new(1, Viewport::new(800.0, 600.0), Tuning::default())
    }

    fn texts(scene: &[DrawCommand]) -> Vec<&str> {
        scene
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    fn circles(scene: &[DrawCommand]) -> Vec<(f32, f32)> {
        scene
            .iter()
            .filter_map(|c| match c {
                DrawCommand::FillCircle { radius, color, .. } => Some((*radius, color[3])),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_fresh_scene() {
        let state = new_state();
        let scene = build_scene(&state);

        assert!(matches!(
            scene[0],
            DrawCommand::FillRect { color, .. } if color == colors::BACKGROUND
        ));
        assert_eq!(texts(&scene), vec!["Score: 0"]);
        assert!(circles(&scene).is_empty());
        // Two interior lane boundaries, markers every 70px over 600px
        let markers = scene
            .iter()
            .filter(|c| matches!(c, DrawCommand::FillRect { color, .. } if *color == colors::LANE_MARKER))
            .count();
        assert_eq!(markers, 2 * 9);
    }

    #[test]
    fn test_reload_bar_only_while_reloading() {
        let mut state = new_state();
        let has_bar = |s: &GameState| {
            build_scene(s)
                .iter()
                .any(|c| matches!(c, DrawCommand::StrokeRect { .. }))
        };
        assert!(!has_bar(&state));
        fire(&mut state, 1);
        assert!(has_bar(&state));
        assert_eq!(state.reload_progress(), 0.0);
    }

    #[test]
    fn test_game_over_label() {
        let mut state = new_state();
        state.game_over = true;
        state.score = 12;
        let scene = build_scene(&state);
        assert_eq!(texts(&scene), vec!["Game Over", "Score: 12"]);
    }

    #[test]
    fn test_blast_effects() {
        let mut state = new_state();
        let mut obstacle = Obstacle::new(Vec2::new(370.0, 100.0), Vec2::new(60.0, 120.0));
        obstacle.destroyed = true;
        obstacle.blast_timer = 5;
        state.obstacles.push(obstacle);
        state.vehicle.destroyed = true;
        state.vehicle.blast_timer = 15;

        let found = circles(&build_scene(&state));
        assert_eq!(found.len(), 2);
        // Vehicle first (paint order), then the obstacle
        assert!((found[0].0 - 80.0 * 1.75).abs() < 1e-4);
        assert!((found[0].1 - 0.5).abs() < 1e-4);
        assert!((found[1].0 - 60.0 * 1.5).abs() < 1e-4);
        assert!((found[1].1 - (1.0 - 5.0 / 15.0)).abs() < 1e-4);
    }

    #[test]
    fn test_scene_leaves_state_untouched() {
        let mut state = new_state();
        fire(&mut state, 2);
        let before = format!("{state:?}");
        let _ = build_scene(&state);
        assert_eq!(format!("{state:?}"), before);
    }
}
