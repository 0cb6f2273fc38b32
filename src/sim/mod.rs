//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One step per display frame, all speeds in px/frame
//! - Seeded RNG only
//! - Stable iteration order (insertion order)
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod state;
pub mod tick;

pub use collision::Rect;
pub use state::{GameState, Obstacle, Projectile, RoadAnimation, Vehicle, Viewport};
pub use tick::{TickInput, fire, resize, restart, spawn_obstacle, tick, update};
