//! The two persisted settings: best score and mute preference, kept in
//! `localStorage`. Storage may be missing (private mode, file://) or throw; every
//! failure degrades to the default and is logged.

use web_sys::{Storage, window};

pub const HIGH_SCORE_KEY: &str = "ninjaHighScore";
pub const MUTED_KEY: &str = "ninjaMuted";

pub struct Settings {
    storage: Option<Storage>,
}

impl Settings {
    pub fn open() -> Self {
        let storage = match window().map(|w| w.local_storage()) {
            Some(Ok(Some(s))) => Some(s),
            Some(Err(e)) => {
                log::warn!("localStorage unavailable: {e:?}");
                None
            }
            _ => {
                log::warn!("localStorage unavailable");
                None
            }
        };
        Self { storage }
    }

    fn get(&self, key: &str) -> Option<String> {
        let storage = self.storage.as_ref()?;
        match storage.get_item(key) {
            Ok(v) => v,
            Err(e) => {
                log::warn!("reading {key} failed: {e:?}");
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) {
        if let Some(storage) = &self.storage {
            if let Err(e) = storage.set_item(key, value) {
                log::warn!("writing {key} failed: {e:?}");
            }
        }
    }

    pub fn high_score(&self) -> u32 {
        parse_high_score(self.get(HIGH_SCORE_KEY).as_deref())
    }

    pub fn save_high_score(&self, score: u32) {
        self.set(HIGH_SCORE_KEY, &score.to_string());
    }

    pub fn muted(&self) -> bool {
        parse_muted(self.get(MUTED_KEY).as_deref())
    }

    pub fn save_muted(&self, muted: bool) {
        self.set(MUTED_KEY, if muted { "true" } else { "false" });
    }
}

/// Leading-digits integer parse: `"42abc"` is 42, anything unparsable is 0.
pub fn parse_high_score(raw: Option<&str>) -> u32 {
    let Some(raw) = raw else { return 0 };
    let trimmed = raw.trim_start();
    let trimmed = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let digits: String = trimmed.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().unwrap_or(0)
}

pub fn parse_muted(raw: Option<&str>) -> bool {
    matches!(raw.map(str::trim), Some("true") | Some("1"))
}
