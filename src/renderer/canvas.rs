//! Canvas 2D backend
//!
//! Paints a list of `DrawCommand`s onto an HTML canvas.

use std::f64::consts::TAU;

use anyhow::{Context, Result, anyhow};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::scene::{Color, DrawCommand, TextAlign};

pub struct CanvasPainter {
    ctx: CanvasRenderingContext2d,
}

impl CanvasPainter {
    pub fn new(canvas: &HtmlCanvasElement) -> Result<Self> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|e| anyhow!("get_context failed: {e:?}"))?
            .context("Canvas has no 2d context")?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| anyhow!("2d context has unexpected type"))?;
        Ok(Self { ctx })
    }

    /// Paint one frame
    pub fn paint(&self, commands: &[DrawCommand]) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        for command in commands {
            match command {
                DrawCommand::FillRect { rect, color } => {
                    self.set_fill(color);
                    ctx.fill_rect(
                        rect.pos.x as f64,
                        rect.pos.y as f64,
                        rect.size.x as f64,
                        rect.size.y as f64,
                    );
                }
                DrawCommand::StrokeRect {
                    rect,
                    color,
                    line_width,
                } => {
                    ctx.set_global_alpha(color[3] as f64);
                    ctx.set_stroke_style_str(&css_rgb(color));
                    ctx.set_line_width(*line_width as f64);
                    ctx.stroke_rect(
                        rect.pos.x as f64,
                        rect.pos.y as f64,
                        rect.size.x as f64,
                        rect.size.y as f64,
                    );
                }
                DrawCommand::FillCircle {
                    center,
                    radius,
                    color,
                } => {
                    self.set_fill(color);
                    ctx.begin_path();
                    ctx.arc(
                        center.x as f64,
                        center.y as f64,
                        radius.max(0.0) as f64,
                        0.0,
                        TAU,
                    )?;
                    ctx.fill();
                }
                DrawCommand::Text {
                    text,
                    pos,
                    size_px,
                    align,
                    color,
                } => {
                    self.set_fill(color);
                    ctx.set_font(&format!("bold {size_px}px Arial"));
                    ctx.set_text_align(match align {
                        TextAlign::Left => "left",
                        TextAlign::Center => "center",
                    });
                    ctx.fill_text(text, pos.x as f64, pos.y as f64)?;
                }
            }
        }
        ctx.set_global_alpha(1.0);
        Ok(())
    }

    fn set_fill(&self, color: &Color) {
        self.ctx.set_global_alpha(color[3] as f64);
        self.ctx.set_fill_style_str(&css_rgb(color));
    }
}

fn css_rgb(color: &Color) -> String {
    let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    format!(
        "rgb({}, {}, {})",
        channel(color[0]),
        channel(color[1]),
        channel(color[2])
    )
}
