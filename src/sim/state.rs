//! Game state and core simulation types
//!
//! One `GameState` owns everything a run needs. It is advanced by
//! [`super::tick::update`] and read by the renderer.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::collision::Rect;
use crate::tuning::Tuning;

/// Size of the drawing surface in canvas pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// The player's car
#[derive(Debug, Clone)]
pub struct Vehicle {
    pub pos: Vec2,
    pub size: Vec2,
    /// Lateral speed (px/frame)
    pub speed: f32,
    /// Destruction animation running
    pub destroyed: bool,
    /// Frames since destruction
    pub blast_timer: u32,
}

impl Vehicle {
    fn new(tuning: &Tuning) -> Self {
        Self {
            pos: Vec2::ZERO,
            size: Vec2::new(tuning.vehicle_width, tuning.vehicle_height),
            speed: tuning.vehicle_speed,
            destroyed: false,
            blast_timer: 0,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }

    /// Centre horizontally, rest near the bottom of the viewport
    pub fn reset_position(&mut self, viewport: Viewport, bottom_margin: f32) {
        self.pos = Vec2::new(
            viewport.width / 2.0 - self.size.x / 2.0,
            viewport.height - self.size.y - bottom_margin,
        );
    }
}

/// A shot travelling straight up
#[derive(Debug, Clone)]
pub struct Projectile {
    pub pos: Vec2,
    pub size: Vec2,
    /// Velocity (px/frame), fixed at creation
    pub vel: Vec2,
}

impl Projectile {
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }
}

/// A descending block in one of the lanes
#[derive(Debug, Clone)]
pub struct Obstacle {
    pub pos: Vec2,
    pub size: Vec2,
    /// Projectiles absorbed so far
    pub hits: u32,
    /// Destruction animation running (no longer collides)
    pub destroyed: bool,
    pub blast_timer: u32,
}

impl Obstacle {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            pos,
            size,
            hits: 0,
            destroyed: false,
            blast_timer: 0,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }

    /// Absorb one projectile. Returns true if this hit destroyed the obstacle.
    pub fn absorb_hit(&mut self, threshold: u32) -> bool {
        if self.destroyed {
            return false;
        }
        self.hits += 1;
        if self.hits >= threshold {
            self.destroyed = true;
            self.blast_timer = 0;
            return true;
        }
        false
    }
}

/// Scrolling lane markers (cosmetic)
#[derive(Debug, Clone, Default)]
pub struct RoadAnimation {
    pub offset: f32,
}

impl RoadAnimation {
    /// Scroll by `speed`, wrapping to zero past one marker period
    pub fn advance(&mut self, speed: f32, period: f32) {
        self.offset += speed;
        if self.offset > period {
            self.offset = 0.0;
        }
    }
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub tuning: Tuning,
    pub viewport: Viewport,
    pub vehicle: Vehicle,
    /// Live projectiles, oldest first
    pub projectiles: Vec<Projectile>,
    /// Live obstacles, oldest first
    pub obstacles: Vec<Obstacle>,
    pub road: RoadAnimation,
    pub score: u64,
    pub game_over: bool,
    /// Frames simulated since the run started
    pub frames_elapsed: u64,
    /// Current obstacle speed (px/frame)
    pub obstacle_speed: f32,
    pub spawn_timer: u32,
    /// Reload gate: false while a reload is in flight
    pub can_fire: bool,
    pub reload_timer: u32,
    pub(crate) rng: Pcg32,
}

impl GameState {
    /// Create a new run with the given seed
    pub fn new(seed: u64, viewport: Viewport, tuning: Tuning) -> Self {
        let mut state = Self {
            seed,
            vehicle: Vehicle::new(&tuning),
            viewport,
            projectiles: Vec::new(),
            obstacles: Vec::new(),
            road: RoadAnimation::default(),
            score: 0,
            game_over: false,
            frames_elapsed: 0,
            obstacle_speed: tuning.obstacle_speed_base,
            spawn_timer: 0,
            can_fire: true,
            reload_timer: 0,
            rng: Pcg32::seed_from_u64(seed),
            tuning,
        };
        state.reset_vehicle_position();
        state
    }

    /// Left edge of the (horizontally centred) road
    pub fn road_left(&self) -> f32 {
        self.viewport.width / 2.0 - self.tuning.road_width / 2.0
    }

    /// Range the vehicle's x may take
    pub fn vehicle_x_bounds(&self) -> (f32, f32) {
        let left = self.road_left();
        (left, left + self.tuning.road_width - self.vehicle.size.x)
    }

    /// Horizontal centre of a lane
    pub fn lane_center(&self, lane: u32) -> f32 {
        let lane_width = self.tuning.lane_width();
        self.road_left() + lane_width * lane as f32 + lane_width / 2.0
    }

    pub fn reset_vehicle_position(&mut self) {
        self.vehicle
            .reset_position(self.viewport, self.tuning.vehicle_bottom_margin);
    }

    /// Obstacle speed for a given number of elapsed frames
    pub fn speed_for_frames(tuning: &Tuning, frames: u64) -> f32 {
        (tuning.obstacle_speed_base + frames as f32 * tuning.obstacle_speed_increment)
            .min(tuning.obstacle_speed_max)
    }

    /// Reload progress in [0, 1] (1 = ready)
    pub fn reload_progress(&self) -> f32 {
        if self.can_fire || self.tuning.reload_frames == 0 {
            return 1.0;
        }
        (1.0 - self.reload_timer as f32 / self.tuning.reload_frames as f32).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> GameState {
        GameState::new(7, Viewport::new(800.0, 600.0), Tuning::default())
    }

    #[test]
    fn test_new_state_vehicle_position() {
        let state = state();
        assert_eq!(state.vehicle.pos, Vec2::new(370.0, 450.0));
        assert_eq!(state.road_left(), 200.0);
        assert_eq!(state.vehicle_x_bounds(), (200.0, 540.0));
        assert!(state.can_fire);
        assert_eq!(state.obstacle_speed, 4.0);
    }

    #[test]
    fn test_lane_centers() {
        let state = state();
        let lane_width = 400.0 / 3.0;
        for lane in 0..3 {
            let expected = 200.0 + lane_width * lane as f32 + lane_width / 2.0;
            assert!((state.lane_center(lane) - expected).abs() < 1e-3);
        }
    }

    #[test]
    fn test_obstacle_hits_only_count_while_live() {
        let mut obstacle = Obstacle::new(Vec2::ZERO, Vec2::new(60.0, 120.0));
        assert!(!obstacle.absorb_hit(3));
        assert!(!obstacle.absorb_hit(3));
        assert!(obstacle.absorb_hit(3));
        assert!(obstacle.destroyed);
        assert!(!obstacle.absorb_hit(3));
        assert_eq!(obstacle.hits, 3);
    }

    #[test]
    fn test_road_animation_wraps() {
        let mut road = RoadAnimation::default();
        for _ in 0..8 {
            road.advance(8.0, 70.0);
        }
        assert_eq!(road.offset, 64.0);
        road.advance(8.0, 70.0);
        assert_eq!(road.offset, 0.0);
    }

    #[test]
    fn test_speed_ramp_caps() {
        let tuning = Tuning::default();
        assert_eq!(GameState::speed_for_frames(&tuning, 0), 4.0);
        assert!((GameState::speed_for_frames(&tuning, 100) - 5.0).abs() < 1e-4);
        assert_eq!(GameState::speed_for_frames(&tuning, 1_000_000), 18.0);
    }
}
