//! Ninja Runner core crate.
//!
//! An endless runner drawn on a `<canvas>`: jump and duck past spikes and
//! shuriken, grab coins and shields, survive as long as the lives last. The
//! simulation in [`runner`] is browser-free and tested natively; the shell in
//! `app` wires it to the DOM. [`offline`] provides the asset manifest and the
//! service-worker handlers for offline play.

use wasm_bindgen::prelude::*;

mod app;
mod audio;
pub mod config;
pub mod error;
mod logger;
pub mod offline;
mod render;
pub mod runner;
pub mod storage;

pub use config::GameConfig;
pub use error::GameError;
pub use runner::{GameEvent, GameState, Input, Runner};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

// -----------------------------------------------------------------------------
// Entry points
// -----------------------------------------------------------------------------

/// Start the game on `#gameCanvas` with the default tuning.
#[wasm_bindgen]
pub fn start_game() -> Result<(), JsValue> {
    app::start(GameConfig::default())?;
    Ok(())
}

/// Start the game with a JSON config; omitted fields keep their defaults.
#[wasm_bindgen]
pub fn start_game_with_config(json: &str) -> Result<(), JsValue> {
    let config = GameConfig::from_json(json)?;
    app::start(config)?;
    Ok(())
}

/// Flip the persisted mute preference. Returns the new state (false before
/// the game has started).
#[wasm_bindgen]
pub fn toggle_mute() -> bool {
    app::toggle_mute().unwrap_or(false)
}

#[wasm_bindgen]
pub fn is_muted() -> bool {
    app::is_muted().unwrap_or(false)
}
