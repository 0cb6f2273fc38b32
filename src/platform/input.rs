//! Input intent collected from browser events
//!
//! Event listeners only write into an `InputIntent`; the frame loop turns it
//! into a `TickInput` once per frame and then clears the one-shot requests.

use crate::sim::{TickInput, Viewport};

#[derive(Debug, Clone, Default)]
pub struct InputIntent {
    /// Held steering flags
    pub left: bool,
    pub right: bool,
    /// First fire request since the last frame
    pub fire: Option<u8>,
    pub restart: bool,
    /// Latest surface size since the last frame
    pub resize: Option<Viewport>,
    /// Demo mode toggle (sticky)
    pub autopilot: bool,
}

fn is_left_key(key: &str) -> bool {
    matches!(key, "ArrowLeft" | "a" | "A")
}

fn is_right_key(key: &str) -> bool {
    matches!(key, "ArrowRight" | "d" | "D")
}

/// Shot count requested by a numeric keypad key (`Numpad1`..`Numpad9`)
pub fn numpad_shots(code: &str) -> Option<u8> {
    code.strip_prefix("Numpad")
        .and_then(|digit| digit.parse::<u8>().ok())
        .filter(|n| (1..=9).contains(n))
}

impl InputIntent {
    /// Key pressed. Ignored entirely once the run is over.
    pub fn key_down(&mut self, key: &str, code: &str, game_over: bool) {
        if game_over {
            return;
        }
        if is_left_key(key) {
            self.left = true;
        }
        if is_right_key(key) {
            self.right = true;
        }
        if let Some(shots) = numpad_shots(code) {
            self.fire.get_or_insert(shots);
        }
        if matches!(key, "i" | "I") {
            self.autopilot = !self.autopilot;
            log::info!("Autopilot: {}", self.autopilot);
        }
    }

    pub fn key_up(&mut self, key: &str) {
        if is_left_key(key) {
            self.left = false;
        }
        if is_right_key(key) {
            self.right = false;
        }
    }

    /// First touch point: left half steers left, right half steers right
    pub fn touch_start(&mut self, x: f32, surface_width: f32) {
        if x < surface_width / 2.0 {
            self.left = true;
        } else {
            self.right = true;
        }
    }

    pub fn touch_end(&mut self) {
        self.left = false;
        self.right = false;
    }

    pub fn request_restart(&mut self) {
        self.restart = true;
    }

    pub fn request_resize(&mut self, viewport: Viewport) {
        self.resize = Some(viewport);
    }

    /// Input for this frame's tick
    pub fn tick_input(&self) -> TickInput {
        TickInput {
            left: self.left,
            right: self.right,
            fire: self.fire,
            restart: self.restart,
            resize: self.resize,
            autopilot: self.autopilot,
        }
    }

    /// Clear one-shot requests after they have been ticked
    pub fn end_frame(&mut self) {
        self.fire = None;
        self.restart = false;
        self.resize = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_steering_keys() {
        let mut intent = InputIntent::default();
        intent.key_down("ArrowLeft", "ArrowLeft", false);
        intent.key_down("d", "KeyD", false);
        assert!(intent.left && intent.right);

        intent.key_up("a");
        assert!(!intent.left && intent.right);
        intent.key_up("D");
        assert!(!intent.right);
    }

    #[test]
    fn test_numpad_requests_fire() {
        assert_eq!(numpad_shots("Numpad1"), Some(1));
        assert_eq!(numpad_shots("Numpad9"), Some(9));
        assert_eq!(numpad_shots("Numpad0"), None);
        assert_eq!(numpad_shots("NumpadEnter"), None);
        assert_eq!(numpad_shots("Digit1"), None);

        let mut intent = InputIntent::default();
        intent.key_down("2", "Numpad2", false);
        intent.key_down("1", "Numpad1", false);
        assert_eq!(intent.tick_input().fire, Some(2));

        intent.end_frame();
        assert_eq!(intent.tick_input().fire, None);
    }

    #[test]
    fn test_keys_ignored_after_game_over() {
        let mut intent = InputIntent::default();
        intent.key_down("ArrowRight", "ArrowRight", true);
        intent.key_down("1", "Numpad1", true);
        assert!(!intent.right);
        assert_eq!(intent.fire, None);
    }

    #[test]
    fn test_touch_halves() {
        let mut intent = InputIntent::default();
        intent.touch_start(100.0, 800.0);
        assert!(intent.left && !intent.right);
        intent.touch_end();
        intent.touch_start(400.0, 800.0);
        assert!(!intent.left && intent.right);
        intent.touch_end();
        assert!(!intent.left && !intent.right);
    }

    #[test]
    fn test_one_shots_clear_but_held_flags_persist() {
        let mut intent = InputIntent::default();
        intent.key_down("a", "KeyA", false);
        intent.key_down("I", "KeyI", false);
        intent.request_restart();
        intent.request_resize(Viewport::new(320.0, 480.0));

        let input = intent.tick_input();
        assert!(input.restart && input.left && input.autopilot);
        assert_eq!(input.resize, Some(Viewport::new(320.0, 480.0)));

        intent.end_frame();
        let input = intent.tick_input();
        assert!(!input.restart && input.left && input.autopilot);
        assert_eq!(input.resize, None);
    }
}
