//! Data-driven game balance
//!
//! Every gameplay constant lives here. Values are per-frame (one simulation
//! step per display refresh) and in canvas pixels. A JSON object stored in
//! LocalStorage may override any subset of fields.

use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};

/// Gameplay constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Road ===
    pub road_width: f32,
    pub lane_count: u32,
    /// Lane marker dimensions (one scroll period = height + gap)
    pub lane_marker_width: f32,
    pub lane_marker_height: f32,
    pub lane_marker_gap: f32,
    /// Road scroll speed (px/frame)
    pub road_speed: f32,

    // === Vehicle ===
    pub vehicle_width: f32,
    pub vehicle_height: f32,
    /// Lateral speed (px/frame)
    pub vehicle_speed: f32,
    /// Gap between vehicle bottom and viewport bottom
    pub vehicle_bottom_margin: f32,

    // === Projectiles ===
    pub projectile_width: f32,
    pub projectile_height: f32,
    pub projectile_speed: f32,
    /// Frames before the reload gate reopens
    pub reload_frames: u32,

    // === Obstacles ===
    pub obstacle_width: f32,
    pub obstacle_height: f32,
    pub obstacle_speed_base: f32,
    pub obstacle_speed_increment: f32,
    pub obstacle_speed_max: f32,
    pub spawn_interval_frames: u32,
    /// Hits needed to destroy an obstacle
    pub obstacle_hits: u32,
    /// Obstacle is removed once its blast timer exceeds this
    pub obstacle_blast_frames: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            road_width: 400.0,
            lane_count: 3,
            lane_marker_width: 8.0,
            lane_marker_height: 40.0,
            lane_marker_gap: 30.0,
            road_speed: 8.0,

            vehicle_width: 60.0,
            vehicle_height: 120.0,
            vehicle_speed: 8.0,
            vehicle_bottom_margin: 30.0,

            projectile_width: 10.0,
            projectile_height: 30.0,
            projectile_speed: 15.0,
            reload_frames: 7,

            obstacle_width: 60.0,
            obstacle_height: 120.0,
            obstacle_speed_base: 4.0,
            obstacle_speed_increment: 0.01,
            obstacle_speed_max: 18.0,
            spawn_interval_frames: 60,
            obstacle_hits: 3,
            obstacle_blast_frames: 15,
        }
    }
}

impl Tuning {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "road_blaster_tuning";

    /// Parse a (possibly partial) JSON override on top of the defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let tuning: Self = serde_json::from_str(json).context("Failed to parse tuning JSON")?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<()> {
        ensure!(self.lane_count >= 1, "lane_count must be at least 1");
        ensure!(self.obstacle_hits >= 1, "obstacle_hits must be at least 1");
        ensure!(
            self.spawn_interval_frames >= 1,
            "spawn_interval_frames must be at least 1"
        );
        for (name, value) in [
            ("road_width", self.road_width),
            ("vehicle_width", self.vehicle_width),
            ("vehicle_height", self.vehicle_height),
            ("projectile_width", self.projectile_width),
            ("projectile_height", self.projectile_height),
            ("projectile_speed", self.projectile_speed),
            ("obstacle_width", self.obstacle_width),
            ("obstacle_height", self.obstacle_height),
            ("lane_marker_height", self.lane_marker_height),
        ] {
            ensure!(value > 0.0, "{name} must be positive (got {value})");
        }
        ensure!(
            self.lane_marker_gap >= 0.0,
            "lane_marker_gap must not be negative"
        );
        ensure!(
            self.road_width >= self.vehicle_width,
            "road_width ({}) is narrower than the vehicle ({})",
            self.road_width,
            self.vehicle_width
        );
        ensure!(
            self.obstacle_speed_base >= 0.0 && self.obstacle_speed_increment >= 0.0,
            "obstacle speed base and increment must not be negative"
        );
        ensure!(
            self.obstacle_speed_max >= self.obstacle_speed_base,
            "obstacle_speed_max ({}) is below obstacle_speed_base ({})",
            self.obstacle_speed_max,
            self.obstacle_speed_base
        );
        Ok(())
    }

    /// Width of one spawn lane
    pub fn lane_width(&self) -> f32 {
        self.road_width / self.lane_count as f32
    }

    /// Distance after which the lane markers repeat
    pub fn marker_period(&self) -> f32 {
        self.lane_marker_height + self.lane_marker_gap
    }

    /// Load tuning overrides from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(tuning) => {
                        log::info!("Loaded tuning overrides from LocalStorage");
                        return tuning;
                    }
                    Err(e) => log::warn!("Ignoring stored tuning: {e:#}"),
                }
            }
        }

        log::info!("Using default tuning");
        Self::default()
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "lane_count": 4, "reload_frames": 12 }"#).unwrap();
        assert_eq!(tuning.lane_count, 4);
        assert_eq!(tuning.reload_frames, 12);
        assert_eq!(tuning.road_width, 400.0);
        assert_eq!(tuning.obstacle_hits, 3);
        assert!((tuning.lane_width() - 100.0).abs() < 1e-4);
    }

    #[test]
    fn test_empty_object_is_default() {
        assert_eq!(Tuning::from_json("{}").unwrap(), Tuning::default());
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = Tuning::from_json("{ lane_count: ").unwrap_err();
        assert!(format!("{err:#}").contains("Failed to parse tuning JSON"));
    }

    #[test]
    fn test_rejects_invalid_values() {
        assert!(Tuning::from_json(r#"{ "lane_count": 0 }"#).is_err());
        assert!(Tuning::from_json(r#"{ "obstacle_hits": 0 }"#).is_err());
        assert!(Tuning::from_json(r#"{ "road_width": 40.0 }"#).is_err());
        assert!(Tuning::from_json(r#"{ "obstacle_speed_max": 2.0 }"#).is_err());
        assert!(Tuning::from_json(r#"{ "projectile_speed": -1.0 }"#).is_err());
    }

    #[test]
    fn test_marker_period() {
        assert_eq!(Tuning::default().marker_period(), 70.0);
    }
}
