//! Platform abstraction layer
//!
//! Translates browser events (keys, touches, resizes, button clicks) into
//! simulation input without touching game state.

pub mod input;

pub use input::InputIntent;
