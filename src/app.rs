//! Browser shell: wires the canvas, DOM overlays, input listeners, sound and
//! settings around a `Runner` and drives it from `requestAnimationFrame`.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlElement, KeyboardEvent, TouchEvent,
    Window, window,
};

use crate::audio::SoundBoard;
use crate::config::GameConfig;
use crate::error::{GameError, Result};
use crate::render::Renderer;
use crate::runner::clock::FrameClock;
use crate::runner::{GameEvent, GameState, Input, Runner};
use crate::storage::Settings;

const CANVAS_ID: &str = "gameCanvas";
const SCORE_ID: &str = "score-board";
const MESSAGE_ID: &str = "start-message";
const HIGH_SCORE_ID: &str = "high-score";

const GAME_OVER_TEXT: &str = "Game Over! Tap to Restart";

/// Optional text overlays; the game runs without any of them.
struct Hud {
    score: Option<HtmlElement>,
    message: Option<HtmlElement>,
    high_score: Option<HtmlElement>,
}

impl Hud {
    fn find(doc: &Document) -> Self {
        let get = |id: &str| {
            doc.get_element_by_id(id)
                .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        };
        Self {
            score: get(SCORE_ID),
            message: get(MESSAGE_ID),
            high_score: get(HIGH_SCORE_ID),
        }
    }

    fn set_score(&self, score: u32) {
        if let Some(el) = &self.score {
            el.set_text_content(Some(&format!("Score: {score}")));
        }
    }

    fn set_high_score(&self, best: u32) {
        if let Some(el) = &self.high_score {
            el.set_text_content(Some(&format!("Best: {best}")));
        }
    }

    fn show_message(&self, text: Option<&str>) {
        let Some(el) = &self.message else { return };
        if let Some(text) = text {
            el.set_text_content(Some(text));
        }
        let display = if text.is_some() { "block" } else { "none" };
        if let Err(e) = el.style().set_property("display", display) {
            log::warn!("could not toggle message: {e:?}");
        }
    }
}

struct App {
    canvas: HtmlCanvasElement,
    renderer: Renderer,
    hud: Hud,
    runner: Runner,
    clock: FrameClock,
    sounds: SoundBoard,
    settings: Settings,
}

impl App {
    fn resize(&mut self, win: &Window) {
        let width = win
            .inner_width()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(800.0);
        let height = win
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(400.0);
        self.canvas.set_width(width.max(1.0) as u32);
        self.canvas.set_height(height.max(1.0) as u32);
        let logical_height = self.runner.config().world.logical_height;
        self.runner
            .set_viewport_width(self.renderer.logical_width(logical_height));
    }

    fn input(&mut self, input: Input) {
        self.runner.handle_input(input);
        self.dispatch_events();
    }

    fn toggle_mute(&mut self) -> bool {
        let muted = !self.sounds.muted();
        self.sounds.set_muted(muted);
        self.settings.save_muted(muted);
        if !muted && self.runner.state() == GameState::Playing {
            self.sounds.start_music();
        }
        log::info!("sound {}", if muted { "muted" } else { "on" });
        muted
    }

    fn tick(&mut self, now: f64) {
        for _ in 0..self.clock.advance(now) {
            self.runner.step();
        }
        self.dispatch_events();
        self.renderer.draw(&self.runner);
    }

    fn dispatch_events(&mut self) {
        for event in self.runner.drain_events() {
            match event {
                GameEvent::Started => {
                    self.hud.show_message(None);
                    self.hud.set_score(0);
                    self.sounds.start_music();
                }
                GameEvent::Jumped => self.sounds.jump(),
                GameEvent::ObstacleCleared | GameEvent::CoinCollected => {
                    self.hud.set_score(self.runner.score());
                }
                GameEvent::NewHighScore(best) => {
                    self.hud.set_high_score(best);
                    self.settings.save_high_score(best);
                }
                GameEvent::GameOver { score } => {
                    self.hud.set_score(score);
                    self.hud.show_message(Some(GAME_OVER_TEXT));
                    self.sounds.game_over();
                }
                GameEvent::ShieldCollected | GameEvent::ShieldBroken | GameEvent::LifeLost => {}
            }
        }
    }
}

thread_local! {
    static APP: RefCell<Option<App>> = const { RefCell::new(None) };
}

fn with_app<T>(f: impl FnOnce(&mut App) -> T) -> Option<T> {
    APP.with(|cell| cell.borrow_mut().as_mut().map(f))
}

pub fn start(config: GameConfig) -> Result<()> {
    crate::logger::init(config.level_filter());

    let already_running = APP.with(|cell| cell.borrow().is_some());
    if already_running {
        log::warn!("start_game called twice; ignoring");
        return Ok(());
    }

    let win = window().ok_or(GameError::MissingElement("window"))?;
    let doc = win.document().ok_or(GameError::MissingElement("document"))?;

    let canvas: HtmlCanvasElement = doc
        .get_element_by_id(CANVAS_ID)
        .ok_or(GameError::MissingElement(CANVAS_ID))?
        .dyn_into()
        .map_err(|_| GameError::Dom(format!("#{CANVAS_ID} is not a canvas")))?;
    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")?
        .ok_or_else(|| GameError::Dom("2d context unavailable".into()))?
        .dyn_into()
        .map_err(|_| GameError::Dom("unexpected 2d context type".into()))?;

    let settings = Settings::open();
    let best = settings.high_score();
    let muted = settings.muted();

    let hud = Hud::find(&doc);
    hud.set_high_score(best);

    let mut app = App {
        canvas: canvas.clone(),
        renderer: Renderer::new(canvas.clone(), ctx),
        hud,
        runner: Runner::new(config, best),
        clock: FrameClock::new(),
        sounds: SoundBoard::new(muted),
        settings,
    };
    app.resize(&win);
    APP.with(|cell| *cell.borrow_mut() = Some(app));
    log::info!("ninja runner ready (best {best}, muted {muted})");

    install_listeners(&win, &doc, &canvas)?;
    start_loop();
    Ok(())
}

pub fn toggle_mute() -> Option<bool> {
    with_app(App::toggle_mute)
}

pub fn is_muted() -> Option<bool> {
    with_app(|app| app.sounds.muted())
}

fn key_input(code: &str, pressed: bool) -> Option<Input> {
    match (code, pressed) {
        ("Space" | "ArrowUp", true) => Some(Input::JumpPressed),
        ("Space" | "ArrowUp", false) => Some(Input::JumpReleased),
        ("ArrowDown", true) => Some(Input::DuckPressed),
        ("ArrowDown", false) => Some(Input::DuckReleased),
        _ => None,
    }
}

/// Left half of the screen jumps, right half ducks.
fn touch_input(touch_x: f64, screen_width: f64) -> Input {
    if touch_x < screen_width / 2.0 {
        Input::JumpPressed
    } else {
        Input::DuckPressed
    }
}

fn install_listeners(win: &Window, doc: &Document, canvas: &HtmlCanvasElement) -> Result<()> {
    // Keyboard
    {
        let closure = Closure::wrap(Box::new(move |evt: KeyboardEvent| {
            if evt.repeat() {
                return;
            }
            let code = evt.code();
            if code == "KeyM" {
                with_app(App::toggle_mute);
                return;
            }
            if let Some(input) = key_input(&code, true) {
                evt.prevent_default();
                with_app(|app| app.input(input));
            }
        }) as Box<dyn FnMut(_)>);
        doc.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    {
        let closure = Closure::wrap(Box::new(move |evt: KeyboardEvent| {
            if let Some(input) = key_input(&evt.code(), false) {
                with_app(|app| app.input(input));
            }
        }) as Box<dyn FnMut(_)>);
        doc.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // Touch
    {
        let closure = Closure::wrap(Box::new(move |evt: TouchEvent| {
            let Some(touch) = evt.touches().get(0) else { return };
            evt.prevent_default();
            let screen_width = window()
                .and_then(|w| w.inner_width().ok())
                .and_then(|v| v.as_f64())
                .unwrap_or(0.0);
            let input = touch_input(touch.client_x() as f64, screen_width);
            with_app(|app| app.input(input));
        }) as Box<dyn FnMut(_)>);
        canvas.add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    {
        let closure = Closure::wrap(Box::new(move |_evt: TouchEvent| {
            with_app(|app| {
                app.input(Input::JumpReleased);
                app.input(Input::DuckReleased);
            });
        }) as Box<dyn FnMut(_)>);
        canvas.add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // Resize
    {
        let closure = Closure::wrap(Box::new(move |_evt: web_sys::Event| {
            if let Some(win) = window() {
                with_app(|app| app.resize(&win));
            }
        }) as Box<dyn FnMut(_)>);
        win.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    Ok(())
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

fn start_loop() {
    let f: FrameCallback = Rc::new(RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
        with_app(|app| app.tick(ts));
        request_frame(&f);
    }) as Box<dyn FnMut(f64)>));
    request_frame(&g);
}

fn request_frame(cb: &FrameCallback) {
    let Some(w) = window() else { return };
    if let Some(closure) = cb.borrow().as_ref() {
        if let Err(e) = w.request_animation_frame(closure.as_ref().unchecked_ref()) {
            log::error!("requestAnimationFrame failed: {e:?}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyboard_mapping() {
        assert_eq!(key_input("Space", true), Some(Input::JumpPressed));
        assert_eq!(key_input("ArrowUp", false), Some(Input::JumpReleased));
        assert_eq!(key_input("ArrowDown", true), Some(Input::DuckPressed));
        assert_eq!(key_input("ArrowDown", false), Some(Input::DuckReleased));
        assert_eq!(key_input("KeyA", true), None);
    }

    #[test]
    fn touch_halves() {
        assert_eq!(touch_input(10.0, 800.0), Input::JumpPressed);
        assert_eq!(touch_input(399.9, 800.0), Input::JumpPressed);
        assert_eq!(touch_input(400.0, 800.0), Input::DuckPressed);
    }
}
