//! Tunable game constants. Defaults reproduce the shipped game; a JSON blob
//! handed to `start_game_with_config` may override any subset of fields.

use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};

/// World geometry and pacing (logical units, per-frame speeds).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// The world is computed on this height; screen scale = canvas height / this.
    pub logical_height: f64,
    /// Width of one parallax strip before it repeats.
    pub layer_width: f64,
    pub ground_y: f64,
    pub initial_speed: f64,
    /// Added to the scroll speed each time an obstacle is cleared.
    pub speed_increment: f64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            logical_height: 600.0,
            layer_width: 1200.0,
            ground_y: 450.0,
            initial_speed: 3.5,
            speed_increment: 0.03,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub x: f64,
    pub width: f64,
    pub height: f64,
    pub jump_force: f64,
    pub gravity: f64,
    /// Gravity multiplier while rising with the jump key released.
    pub release_gravity_multiplier: f64,
    pub max_jumps: u32,
    /// Radians added per airborne frame.
    pub spin_per_frame: f64,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            x: 80.0,
            width: 30.0,
            height: 80.0,
            jump_force: 18.0,
            gravity: 0.6,
            release_gravity_multiplier: 2.5,
            max_jumps: 2,
            spin_per_frame: 0.15,
        }
    }
}

/// Spawn timers, in frames. Each interval is `min + floor(rand * spread)`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    pub first_obstacle_delay: i32,
    pub obstacle_interval_min: i32,
    pub obstacle_interval_spread: i32,
    pub coin_interval_min: i32,
    pub coin_interval_spread: i32,
    pub shield_interval_min: i32,
    pub shield_interval_spread: i32,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            first_obstacle_delay: 40,
            obstacle_interval_min: 80,
            obstacle_interval_spread: 40,
            coin_interval_min: 90,
            coin_interval_spread: 120,
            shield_interval_min: 900,
            shield_interval_spread: 600,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    pub max_lives: u32,
    pub max_shields: u32,
    pub invulnerable_frames: u32,
    pub coin_value: u32,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            max_lives: 3,
            max_shields: 3,
            invulnerable_frames: 90,
            coin_value: 5,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub world: WorldConfig,
    pub player: PlayerConfig,
    pub spawn: SpawnConfig,
    pub rules: RulesConfig,
    /// One of `off`, `error`, `warn`, `info`, `debug`, `trace`.
    pub log_level: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            world: WorldConfig::default(),
            player: PlayerConfig::default(),
            spawn: SpawnConfig::default(),
            rules: RulesConfig::default(),
            log_level: "info".to_string(),
        }
    }
}

impl GameConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let w = &self.world;
        let p = &self.player;
        let s = &self.spawn;
        if w.logical_height <= 0.0 || w.layer_width <= 0.0 {
            return invalid("world dimensions must be positive");
        }
        if w.ground_y <= 0.0 || w.ground_y > w.logical_height {
            return invalid("ground_y must lie inside the logical height");
        }
        if w.initial_speed <= 0.0 {
            return invalid("initial_speed must be positive");
        }
        if p.gravity <= 0.0 || p.jump_force <= 0.0 {
            return invalid("gravity and jump_force must be positive");
        }
        if p.width <= 0.0 || p.height <= 0.0 {
            return invalid("player dimensions must be positive");
        }
        if p.max_jumps == 0 {
            return invalid("max_jumps must be at least 1");
        }
        if s.obstacle_interval_min <= 0 || s.coin_interval_min <= 0 || s.shield_interval_min <= 0 {
            return invalid("spawn intervals must be positive");
        }
        if s.obstacle_interval_spread < 0
            || s.coin_interval_spread < 0
            || s.shield_interval_spread < 0
        {
            return invalid("spawn spreads must not be negative");
        }
        let intervals = [
            (s.obstacle_interval_min, s.obstacle_interval_spread),
            (s.coin_interval_min, s.coin_interval_spread),
            (s.shield_interval_min, s.shield_interval_spread),
        ];
        if intervals
            .iter()
            .any(|(min, spread)| min.checked_add(*spread).is_none())
        {
            return invalid("spawn interval min + spread overflows");
        }
        if self.rules.max_lives == 0 {
            return invalid("max_lives must be at least 1");
        }
        Ok(())
    }

    pub fn level_filter(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or(log::LevelFilter::Info)
    }
}

fn invalid(msg: &str) -> Result<()> {
    Err(GameError::InvalidConfig(msg.to_string()))
}
