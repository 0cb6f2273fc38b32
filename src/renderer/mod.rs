//! Canvas 2D rendering module
//!
//! `scene` builds a frame as plain draw commands; `canvas` paints them in the
//! browser.

#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod scene;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasPainter;
pub use scene::{Color, DrawCommand, TextAlign, build_scene, colors};
