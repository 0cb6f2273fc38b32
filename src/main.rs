//! Road Blaster entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use anyhow::{Context, Result, anyhow};
    use wasm_bindgen::prelude::*;
    use web_sys::{Element, HtmlCanvasElement, KeyboardEvent, TouchEvent, Window};

    use road_blaster::Tuning;
    use road_blaster::consts::*;
    use road_blaster::platform::InputIntent;
    use road_blaster::renderer::{CanvasPainter, build_scene};
    use road_blaster::sim::{GameState, Viewport, tick};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        painter: CanvasPainter,
        input: InputIntent,
        restart_btn: Option<Element>,
        /// Last visibility applied to the restart button
        restart_visible: bool,
    }

    impl Game {
        /// Run one simulation step with the input gathered since last frame
        fn update(&mut self) {
            let input = self.input.tick_input();
            tick(&mut self.state, &input);
            self.input.end_frame();
        }

        /// Render the current frame
        fn render(&self) {
            let scene = build_scene(&self.state);
            if let Err(e) = self.painter.paint(&scene) {
                log::warn!("Render error: {:?}", e);
            }
        }

        /// Show the restart button only while the run is over
        fn update_restart_button(&mut self) {
            let visible = self.state.game_over;
            if visible == self.restart_visible {
                return;
            }
            self.restart_visible = visible;
            if let Some(btn) = &self.restart_btn {
                let _ = btn.set_attribute("class", if visible { "" } else { "hidden" });
            }
        }
    }

    /// Current window size in CSS pixels
    fn window_viewport(window: &Window) -> Viewport {
        let dimension = |value: Result<JsValue, JsValue>, fallback: f32| {
            value
                .ok()
                .and_then(|v| v.as_f64())
                .map_or(fallback, |v| v as f32)
        };
        Viewport::new(
            dimension(window.inner_width(), DEFAULT_VIEWPORT_WIDTH),
            dimension(window.inner_height(), DEFAULT_VIEWPORT_HEIGHT),
        )
    }

    fn size_canvas(canvas: &HtmlCanvasElement, viewport: Viewport) {
        canvas.set_width(viewport.width as u32);
        canvas.set_height(viewport.height as u32);
    }

    pub fn run() -> Result<()> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).context("Failed to init logger")?;

        log::info!("Road Blaster starting...");

        let window = web_sys::window().context("no window")?;
        let document = window.document().context("no document")?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .context("no canvas")?
            .dyn_into()
            .map_err(|_| anyhow!("#canvas is not a canvas"))?;

        let viewport = window_viewport(&window);
        size_canvas(&canvas, viewport);
        let painter = CanvasPainter::new(&canvas)?;

        let seed = js_sys::Date::now() as u64;
        let state = GameState::new(seed, viewport, Tuning::load());
        log::info!("Game initialized with seed: {}", seed);

        let restart_btn = document.get_element_by_id("restart-btn");
        if restart_btn.is_none() {
            log::warn!("No #restart-btn element, restart is unavailable");
        }

        let game = Rc::new(RefCell::new(Game {
            state,
            painter,
            input: InputIntent::default(),
            restart_btn,
            // Forces the first frame to hide the button
            restart_visible: true,
        }));

        setup_input_handlers(&window, &canvas, game.clone());
        setup_resize_handler(&window, canvas, game.clone());
        setup_restart_button(&document, game.clone());

        // Start game loop
        request_animation_frame(game);

        log::info!("Road Blaster running!");
        Ok(())
    }

    fn setup_input_handlers(window: &Window, canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Key down: steering, numpad fire, autopilot toggle
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                let game_over = g.state.game_over;
                g.input.key_down(&event.key(), &event.code(), game_over);
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key up: release steering
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                game.borrow_mut().input.key_up(&event.key());
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start: steer toward the touched half
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let rect = canvas_clone.get_bounding_client_rect();
                    let x = touch.client_x() as f32 - rect.left() as f32;
                    let width = canvas_clone.client_width() as f32;
                    game.borrow_mut().input.touch_start(x, width);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch end: release steering
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: TouchEvent| {
                game.borrow_mut().input.touch_end();
            });
            let _ = canvas
                .add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize_handler(window: &Window, canvas: HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let window_clone = window.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let viewport = window_viewport(&window_clone);
            size_canvas(&canvas, viewport);
            game.borrow_mut().input.request_resize(viewport);
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_restart_button(document: &web_sys::Document, game: Rc<RefCell<Game>>) {
        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                game.borrow_mut().input.request_restart();
                log::info!("Restart requested");
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            log::error!("Window vanished, stopping game loop");
            return;
        };
        let closure = Closure::once(move |_time: f64| {
            game_loop(game);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>) {
        {
            let mut g = game.borrow_mut();
            g.update();
            g.render();
            g.update_restart_button();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    if let Err(e) = wasm_game::run() {
        log::error!("Road Blaster failed to start: {e:#}");
        web_sys::console::error_1(&format!("Road Blaster failed to start: {e:#}").into());
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use road_blaster::Tuning;
    use road_blaster::consts::*;
    use road_blaster::renderer::build_scene;
    use road_blaster::sim::{GameState, TickInput, Viewport, tick};

    env_logger::init();
    log::info!("Road Blaster (native) starting...");
    log::info!("Native mode runs a headless autopilot demo - run with `trunk serve` for the web version");

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse::<u64>().ok())
        .unwrap_or(1);
    let viewport = Viewport::new(DEFAULT_VIEWPORT_WIDTH, DEFAULT_VIEWPORT_HEIGHT);
    let mut state = GameState::new(seed, viewport, Tuning::load());

    let input = TickInput {
        autopilot: true,
        ..Default::default()
    };
    for _ in 0..HEADLESS_FRAMES {
        tick(&mut state, &input);
        if state.game_over {
            break;
        }
    }
    log::debug!("Final frame: {} draw commands", build_scene(&state).len());

    println!(
        "Seed {}: {} after {} frames, score {}",
        seed,
        if state.game_over { "crashed" } else { "survived" },
        state.frames_elapsed,
        state.score
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
