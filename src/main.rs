//! Neon Runner entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{AddEventListenerOptions, Document, EventTarget, HtmlCanvasElement};

    use neon_runner::audio::AudioManager;
    use neon_runner::platform::{Button, InputState};
    use neon_runner::renderer::CanvasRenderer;
    use neon_runner::sim::GameState;
    use neon_runner::{FrameOutcome, GameLoop, RenderSink, Settings, Tuning, Viewport};

    /// LocalStorage key for an optional balance override
    const TUNING_KEY: &str = "neon_runner_tuning";

    /// Game instance holding all state
    struct Game {
        game_loop: GameLoop,
        renderer: CanvasRenderer,
        audio: AudioManager,
        input: InputState,
        settings: Settings,
        /// Whether an animation frame is scheduled
        looping: bool,
    }

    impl Game {
        fn frame(&mut self, time: f64) -> FrameOutcome {
            self.input.write_into(&mut self.game_loop.input);
            self.game_loop
                .frame(time, &mut self.renderer, &mut self.audio)
        }

        /// Step to the next quality preset and persist it
        fn cycle_quality(&mut self) {
            let next = self.settings.quality.next();
            self.settings.apply_preset(next);
            self.renderer.settings = self.settings.clone();
            self.settings.save();
            log::info!("Quality: {}", next.as_str());
        }

        fn fit(&mut self, canvas: &HtmlCanvasElement) {
            let viewport = fit_viewport(canvas);
            self.renderer.resize(viewport);
            self.game_loop.state.resize(viewport);
            // Redraw immediately when halted behind an overlay
            if !self.looping {
                self.renderer.render(&self.game_loop.state);
            }
        }
    }

    fn fit_viewport(canvas: &HtmlCanvasElement) -> Viewport {
        canvas
            .parent_element()
            .map(|parent| {
                let rect = parent.get_bounding_client_rect();
                Viewport::fit(rect.width() as f32, rect.height() as f32)
            })
            .filter(|vp| vp.width > 0.0 && vp.height > 0.0)
            .unwrap_or_default()
    }

    fn load_tuning() -> Tuning {
        let stored = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .and_then(|storage| storage.get_item(TUNING_KEY).ok().flatten());

        match stored {
            Some(json) => match Tuning::from_json(&json) {
                Ok(tuning) => {
                    log::info!("Loaded tuning override");
                    tuning
                }
                Err(e) => {
                    log::warn!("Ignoring tuning override: {}", e);
                    Tuning::default()
                }
            },
            None => Tuning::default(),
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Neon Runner starting...");

        let Some(window) = web_sys::window() else {
            log::error!("No window");
            return;
        };
        let Some(document) = window.document() else {
            log::error!("No document");
            return;
        };
        let Some(canvas) = document
            .get_element_by_id("gameCanvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("No #gameCanvas element");
            return;
        };

        let settings = Settings::load();
        let viewport = fit_viewport(&canvas);
        let Some(renderer) = CanvasRenderer::new(canvas.clone(), settings.clone()) else {
            log::error!("Canvas 2D context unavailable");
            return;
        };
        renderer.resize(viewport);

        let seed = js_sys::Date::now() as u64;
        let state = GameState::with_config(seed, load_tuning(), viewport);
        log::info!("Game initialized with seed: {}", seed);

        let game = Rc::new(RefCell::new(Game {
            game_loop: GameLoop::new(state),
            renderer,
            audio: AudioManager::new(&settings),
            input: InputState::new(),
            settings,
            looping: false,
        }));

        setup_keyboard(&document, game.clone());
        for (id, button) in [
            ("jumpBtn", Button::Jump),
            ("slideBtn", Button::Slide),
            ("leftBtn", Button::Left),
            ("rightBtn", Button::Right),
        ] {
            setup_control_button(&document, id, button, game.clone());
        }
        setup_overlay_buttons(&document, game.clone());
        setup_resize(&canvas, game.clone());
        setup_focus_handling(&document, game.clone());
        prevent_touch_scroll(&document);

        resume(game);
        log::info!("Neon Runner running!");
    }

    fn non_passive() -> AddEventListenerOptions {
        let options = AddEventListenerOptions::new();
        options.set_passive(false);
        options
    }

    fn listen<E, F>(target: &EventTarget, event: &str, passive: bool, handler: F)
    where
        E: wasm_bindgen::convert::FromWasmAbi + 'static,
        F: FnMut(E) + 'static,
    {
        let closure = Closure::<dyn FnMut(E)>::new(handler);
        let _ = if passive {
            target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
        } else {
            target.add_event_listener_with_callback_and_add_event_listener_options(
                event,
                closure.as_ref().unchecked_ref(),
                &non_passive(),
            )
        };
        closure.forget();
    }

    fn setup_keyboard(document: &Document, game: Rc<RefCell<Game>>) {
        {
            let game = game.clone();
            listen(document, "keydown", true, move |event: web_sys::KeyboardEvent| {
                let key = event.key();
                let mut g = game.borrow_mut();
                g.audio.resume();
                if key == "q" || key == "Q" {
                    g.cycle_quality();
                } else if g.input.key_down(&key) {
                    event.prevent_default();
                }
            });
        }

        listen(document, "keyup", true, move |event: web_sys::KeyboardEvent| {
            game.borrow_mut().input.key_up(&event.key());
        });
    }

    fn setup_control_button(
        document: &Document,
        id: &str,
        button: Button,
        game: Rc<RefCell<Game>>,
    ) {
        let Some(el) = document.get_element_by_id(id) else {
            log::warn!("Missing control button #{}", id);
            return;
        };

        {
            let game = game.clone();
            listen(&el, "touchstart", false, move |event: web_sys::TouchEvent| {
                event.prevent_default();
                let mut g = game.borrow_mut();
                g.audio.resume();
                g.input.press(button);
            });
        }
        {
            let game = game.clone();
            listen(&el, "touchend", false, move |event: web_sys::TouchEvent| {
                event.prevent_default();
                game.borrow_mut().input.release(button);
            });
        }
        {
            let game = game.clone();
            listen(&el, "mousedown", true, move |_event: web_sys::MouseEvent| {
                let mut g = game.borrow_mut();
                g.audio.resume();
                g.input.press(button);
            });
        }
        for event in ["mouseup", "mouseleave"] {
            let game = game.clone();
            listen(&el, event, true, move |_event: web_sys::MouseEvent| {
                game.borrow_mut().input.release(button);
            });
        }
    }

    fn setup_overlay_buttons(document: &Document, game: Rc<RefCell<Game>>) {
        if let Some(btn) = document.get_element_by_id("nextStageBtn") {
            let game = game.clone();
            listen(&btn, "click", true, move |_event: web_sys::MouseEvent| {
                let resumed = {
                    let mut g = game.borrow_mut();
                    g.audio.resume();
                    g.game_loop.continue_to_next_stage()
                };
                if resumed {
                    resume(game.clone());
                }
            });
        }

        if let Some(btn) = document.get_element_by_id("restartBtn") {
            listen(&btn, "click", true, move |_event: web_sys::MouseEvent| {
                let restarted = {
                    let mut g = game.borrow_mut();
                    g.audio.resume();
                    g.game_loop.restart()
                };
                if let Some(stage) = restarted {
                    log::info!("Game restarted at stage {}", stage);
                    resume(game.clone());
                }
            });
        }
    }

    fn setup_resize(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        for event in ["resize", "orientationchange"] {
            let game = game.clone();
            let canvas = canvas.clone();
            listen(&window, event, true, move |_event: web_sys::Event| {
                game.borrow_mut().fit(&canvas);
            });
        }
    }

    fn setup_focus_handling(document: &Document, game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            listen(document, "visibilitychange", true, move |_event: web_sys::Event| {
                let hidden = document_clone.visibility_state() == web_sys::VisibilityState::Hidden;
                let mut g = game.borrow_mut();
                if hidden {
                    g.input.clear();
                }
                if g.settings.mute_on_blur {
                    g.audio.set_muted(hidden);
                }
            });
        }

        // Window blur (click outside): drop held keys so nothing sticks
        {
            let game = game.clone();
            listen(&window, "blur", true, move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                g.input.clear();
                if g.settings.mute_on_blur {
                    g.audio.set_muted(true);
                    log::info!("Muted (window blur)");
                }
            });
        }

        listen(&window, "focus", true, move |_event: web_sys::FocusEvent| {
            game.borrow_mut().audio.set_muted(false);
        });
    }

    fn prevent_touch_scroll(document: &Document) {
        listen(document, "touchmove", false, move |event: web_sys::TouchEvent| {
            event.prevent_default();
        });
    }

    /// Schedule frames again unless already looping
    fn resume(game: Rc<RefCell<Game>>) {
        {
            let mut g = game.borrow_mut();
            if g.looping {
                return;
            }
            g.looping = true;
        }
        request_animation_frame(game);
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        let outcome = game.borrow_mut().frame(time);
        match outcome {
            FrameOutcome::Continue => request_animation_frame(game),
            FrameOutcome::Halt => {
                let mut g = game.borrow_mut();
                g.looping = false;
                log::info!("Loop halted: {:?}", g.game_loop.state.phase);
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless autopilot run: `neon-runner [seed] [ticks] [tuning.json]`
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use neon_runner::consts::SIM_DT_MS;
    use neon_runner::renderer::build_scene;
    use neon_runner::sim::{GamePhase, GameState};
    use neon_runner::{FrameOutcome, GameLoop, RenderSink, Settings, Tuning, Viewport};

    /// Builds every frame's draw list without presenting it
    struct HeadlessRender {
        settings: Settings,
        draw_calls: usize,
    }

    impl RenderSink for HeadlessRender {
        fn render(&mut self, state: &GameState) {
            self.draw_calls += build_scene(state, &self.settings).len();
        }
    }

    env_logger::init();
    log::info!("Neon Runner (native) starting...");

    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(42u64);
    let max_ticks = args.next().and_then(|s| s.parse().ok()).unwrap_or(60 * 60 * 5u64);
    let tuning = match args.next() {
        Some(path) => match std::fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|json| Tuning::from_json(&json).map_err(|e| e.to_string()))
        {
            Ok(tuning) => tuning,
            Err(e) => {
                log::error!("Failed to load tuning from {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => Tuning::default(),
    };

    let mut game = GameLoop::new(GameState::with_config(seed, tuning, Viewport::default()));
    game.input.autopilot = true;
    let mut render = HeadlessRender {
        settings: Settings::default(),
        draw_calls: 0,
    };
    let mut audio = neon_runner::driver::SilentAudio;

    let mut now_ms = 0.0f64;
    while game.state.time_ticks < max_ticks {
        now_ms += SIM_DT_MS as f64;
        if game.frame(now_ms, &mut render, &mut audio) == FrameOutcome::Continue {
            continue;
        }
        match game.state.phase {
            GamePhase::StageClear => {
                game.continue_to_next_stage();
            }
            _ => break,
        }
    }

    let hud = game.hud();
    log::info!(
        "Finished after {} ticks ({} draw commands)",
        game.state.time_ticks,
        render.draw_calls
    );
    match serde_json::to_string(&hud) {
        Ok(json) => println!("{}", json),
        Err(e) => log::error!("Failed to serialize result: {}", e),
    }
}
