//! Best-effort sound effects and background music. Browsers reject `play()`
//! before the first user gesture and may fail to load a file; both cases are
//! logged and otherwise ignored.

use wasm_bindgen::JsValue;
use wasm_bindgen::prelude::Closure;
use web_sys::HtmlAudioElement;

use crate::offline::{GAME_OVER_SOUND, JUMP_SOUND, MUSIC};

const MUSIC_VOLUME: f64 = 0.4;

pub struct SoundBoard {
    jump: Option<HtmlAudioElement>,
    game_over: Option<HtmlAudioElement>,
    music: Option<HtmlAudioElement>,
    muted: bool,
    // Shared rejection handler so repeated plays don't allocate closures.
    on_reject: Closure<dyn FnMut(JsValue)>,
}

impl SoundBoard {
    pub fn new(muted: bool) -> Self {
        let music = load(MUSIC);
        if let Some(m) = &music {
            m.set_loop(true);
            m.set_volume(MUSIC_VOLUME);
        }
        Self {
            jump: load(JUMP_SOUND),
            game_over: load(GAME_OVER_SOUND),
            music,
            muted,
            on_reject: Closure::wrap(Box::new(|err: JsValue| {
                log::warn!("audio playback rejected: {err:?}");
            }) as Box<dyn FnMut(JsValue)>),
        }
    }

    pub fn muted(&self) -> bool {
        self.muted
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        if muted {
            self.stop_music();
        }
    }

    pub fn jump(&self) {
        self.play_from_start(self.jump.as_ref());
    }

    pub fn game_over(&self) {
        self.stop_music();
        self.play_from_start(self.game_over.as_ref());
    }

    pub fn start_music(&self) {
        if self.muted {
            return;
        }
        if let Some(m) = &self.music {
            m.set_current_time(0.0);
            self.play(m);
        }
    }

    pub fn stop_music(&self) {
        if let Some(m) = &self.music {
            if let Err(e) = m.pause() {
                log::warn!("pausing music failed: {e:?}");
            }
        }
    }

    fn play_from_start(&self, el: Option<&HtmlAudioElement>) {
        if self.muted {
            return;
        }
        if let Some(el) = el {
            el.set_current_time(0.0);
            self.play(el);
        }
    }

    fn play(&self, el: &HtmlAudioElement) {
        match el.play() {
            Ok(promise) => {
                let _ = promise.catch(&self.on_reject);
            }
            Err(e) => log::warn!("audio playback failed: {e:?}"),
        }
    }
}

fn load(src: &str) -> Option<HtmlAudioElement> {
    match HtmlAudioElement::new_with_src(src) {
        Ok(el) => Some(el),
        Err(e) => {
            log::warn!("could not load {src}: {e:?}");
            None
        }
    }
}
