//! Road Blaster - a lane-based arcade driving and shooting game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, spawning, collisions, run state)
//! - `renderer`: Scene building and Canvas 2D painting
//! - `platform`: Browser input adapters
//! - `tuning`: Data-driven game balance

pub mod platform;
pub mod renderer;
pub mod sim;
pub mod tuning;

pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Viewport used before the real surface size is known (and by the headless run)
    pub const DEFAULT_VIEWPORT_WIDTH: f32 = 1280.0;
    pub const DEFAULT_VIEWPORT_HEIGHT: f32 = 720.0;

    /// Frames simulated by the native headless demo (one minute at 60 Hz)
    pub const HEADLESS_FRAMES: u64 = 60 * 60;
}
