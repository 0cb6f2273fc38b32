//! Per-frame simulation step
//!
//! Core game loop that advances the run by exactly one display frame, plus
//! the external actions (fire, restart, resize) that the edge adapters
//! trigger between frames.

use glam::Vec2;
use rand::Rng;

use super::autopilot;
use super::state::{GameState, Obstacle, Projectile, Viewport};

/// Input commands for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Steer left (held)
    pub left: bool,
    /// Steer right (held)
    pub right: bool,
    /// Fire request with a shot count (only 1 and 2 are honoured)
    pub fire: Option<u8>,
    /// Restart button pressed
    pub restart: bool,
    /// Drawing surface was resized
    pub resize: Option<Viewport>,
    /// Demo mode - the autopilot drives and shoots
    pub autopilot: bool,
}

/// Apply pending one-shot actions, then advance the run by one frame
pub fn tick(state: &mut GameState, input: &TickInput) {
    if let Some(viewport) = input.resize {
        resize(state, viewport);
    }
    if input.restart {
        restart(state);
    }

    let driven;
    let input = if input.autopilot {
        driven = autopilot::drive(state);
        &driven
    } else {
        input
    };

    if let Some(count) = input.fire {
        fire(state, count);
    }
    update(state, input);
}

/// Advance the game state by one frame
pub fn update(state: &mut GameState, input: &TickInput) {
    if state.game_over {
        if state.vehicle.destroyed {
            state.vehicle.blast_timer = state.vehicle.blast_timer.saturating_add(1);
        }
        return;
    }

    state.frames_elapsed += 1;
    state.obstacle_speed = GameState::speed_for_frames(&state.tuning, state.frames_elapsed);

    steer_vehicle(state, input);

    let period = state.tuning.marker_period();
    state.road.advance(state.tuning.road_speed, period);

    update_projectiles(state);
    update_reload(state);
    update_spawner(state);
    update_obstacles(state);
}

/// Fire `count` projectiles spread across the vehicle's width
///
/// Ignored while reloading, after game over, or for counts other than 1 and 2.
pub fn fire(state: &mut GameState, count: u8) {
    if !state.can_fire || state.game_over {
        return;
    }
    if count != 1 && count != 2 {
        return;
    }

    state.can_fire = false;
    state.reload_timer = state.tuning.reload_frames;

    let vehicle = &state.vehicle;
    let size = Vec2::new(state.tuning.projectile_width, state.tuning.projectile_height);
    let vel = Vec2::new(0.0, -state.tuning.projectile_speed);
    let spacing = vehicle.size.x / (count as f32 + 1.0);
    for i in 0..count {
        let x = vehicle.pos.x + spacing * (i as f32 + 1.0) - size.x / 2.0;
        state.projectiles.push(Projectile {
            pos: Vec2::new(x, vehicle.pos.y),
            size,
            vel,
        });
    }
}

/// Reset the run to its starting state
pub fn restart(state: &mut GameState) {
    state.game_over = false;
    state.vehicle.destroyed = false;
    state.vehicle.blast_timer = 0;
    state.obstacles.clear();
    state.projectiles.clear();
    state.score = 0;
    state.can_fire = true;
    state.reload_timer = 0;
    state.reset_vehicle_position();
    state.frames_elapsed = 0;
    state.spawn_timer = 0;
    state.obstacle_speed = state.tuning.obstacle_speed_base;
    log::info!("Run restarted");
}

/// Adopt a new drawing surface size and re-centre the vehicle
pub fn resize(state: &mut GameState, viewport: Viewport) {
    state.viewport = viewport;
    state.reset_vehicle_position();
}

/// Spawn one obstacle above the viewport in a random lane
pub fn spawn_obstacle(state: &mut GameState) {
    let lane = state.rng.random_range(0..state.tuning.lane_count);
    let size = Vec2::new(state.tuning.obstacle_width, state.tuning.obstacle_height);
    let x = state.lane_center(lane) - size.x / 2.0;
    state.obstacles.push(Obstacle::new(Vec2::new(x, -size.y), size));
    log::debug!("Spawned obstacle in lane {lane}");
}

fn steer_vehicle(state: &mut GameState, input: &TickInput) {
    let mut x = state.vehicle.pos.x;
    if input.left {
        x -= state.vehicle.speed;
    }
    if input.right {
        x += state.vehicle.speed;
    }
    let (min_x, max_x) = state.vehicle_x_bounds();
    state.vehicle.pos.x = x.min(max_x).max(min_x);
}

fn update_projectiles(state: &mut GameState) {
    for projectile in &mut state.projectiles {
        projectile.pos += projectile.vel;
    }
    let Viewport { width, height } = state.viewport;
    state
        .projectiles
        .retain(|p| !p.rect().is_outside(width, height));
}

fn update_reload(state: &mut GameState) {
    if !state.can_fire {
        state.reload_timer = state.reload_timer.saturating_sub(1);
        if state.reload_timer == 0 {
            state.can_fire = true;
        }
    }
}

fn update_spawner(state: &mut GameState) {
    state.spawn_timer += 1;
    if state.spawn_timer >= state.tuning.spawn_interval_frames {
        state.spawn_timer = 0;
        spawn_obstacle(state);
    }
}

/// Move obstacles and resolve projectile and vehicle collisions
///
/// Scans newest to oldest so removals never disturb unvisited indices. Each
/// live obstacle consumes at most one projectile per frame.
fn update_obstacles(state: &mut GameState) {
    let hit_threshold = state.tuning.obstacle_hits;
    let blast_frames = state.tuning.obstacle_blast_frames;
    let speed = state.obstacle_speed;
    let height = state.viewport.height;

    let mut i = state.obstacles.len();
    while i > 0 {
        i -= 1;
        let obstacle = &mut state.obstacles[i];

        if obstacle.destroyed {
            obstacle.blast_timer += 1;
            if obstacle.blast_timer > blast_frames {
                state.obstacles.remove(i);
                state.score += 1;
                log::debug!("Obstacle cleared, score {}", state.score);
            }
            continue;
        }

        obstacle.pos.y += speed;
        if obstacle.pos.y > height {
            state.obstacles.remove(i);
            continue;
        }

        let rect = obstacle.rect();
        if let Some(j) = state
            .projectiles
            .iter()
            .rposition(|p| p.rect().overlaps(&rect))
        {
            state.projectiles.remove(j);
            obstacle.absorb_hit(hit_threshold);
        }

        if !obstacle.destroyed
            && !state.vehicle.destroyed
            && state.vehicle.rect().overlaps(&rect)
        {
            state.vehicle.destroyed = true;
            state.vehicle.blast_timer = 0;
            state.game_over = true;
            log::info!(
                "Game over after {} frames, score {}",
                state.frames_elapsed,
                state.score
            );
        }
    }
}
