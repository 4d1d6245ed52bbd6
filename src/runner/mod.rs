//! Endless-runner simulation. Nothing in here touches the browser: the shell
//! feeds `Input`s, calls `step()` once per fixed frame and drains `GameEvent`s
//! to drive sound, persistence and the DOM.

pub mod clock;
pub mod collision;
pub mod ninja;
pub mod obstacle;
pub mod parallax;
pub mod particles;
pub mod pickup;

use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::config::GameConfig;

use collision::ninja_hits;
use ninja::Ninja;
use obstacle::{Obstacle, ObstacleKind, next_interval};
use parallax::ParallaxLayer;
use particles::Particle;
use pickup::{Pickup, PickupKind};

const COIN_BURST: usize = 10;
const SHIELD_BURST: usize = 16;
const HIT_BURST: usize = 24;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameState {
    Start,
    Playing,
    GameOver,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Input {
    JumpPressed,
    JumpReleased,
    DuckPressed,
    DuckReleased,
}

impl Input {
    fn is_press(self) -> bool {
        matches!(self, Input::JumpPressed | Input::DuckPressed)
    }
}

/// Things that happened during a step that the shell may want to react to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameEvent {
    Started,
    Jumped,
    ObstacleCleared,
    CoinCollected,
    ShieldCollected,
    ShieldBroken,
    LifeLost,
    NewHighScore(u32),
    GameOver { score: u32 },
}

pub struct Runner {
    config: GameConfig,
    rng: SmallRng,
    state: GameState,
    score: u32,
    high_score: u32,
    coins: u32,
    lives: u32,
    shields: u32,
    speed: f64,
    frame: u64,
    viewport_width: f64,
    obstacle_timer: i32,
    coin_timer: i32,
    shield_timer: i32,
    invulnerable: u32,
    ninja: Ninja,
    obstacles: Vec<Obstacle>,
    pickups: Vec<Pickup>,
    particles: Vec<Particle>,
    layers: Vec<ParallaxLayer>,
    events: Vec<GameEvent>,
}

impl Runner {
    pub fn new(config: GameConfig, high_score: u32) -> Self {
        Self::with_rng(config, high_score, SmallRng::from_entropy())
    }

    /// Deterministic spawns, for tests and replays.
    pub fn with_seed(config: GameConfig, high_score: u32, seed: u64) -> Self {
        Self::with_rng(config, high_score, SmallRng::seed_from_u64(seed))
    }

    fn with_rng(config: GameConfig, high_score: u32, mut rng: SmallRng) -> Self {
        let ninja = Ninja::new(&config.player, config.world.ground_y);
        let spawn = config.spawn.clone();
        let coin_timer = next_interval(&mut rng, spawn.coin_interval_min, spawn.coin_interval_spread);
        let shield_timer =
            next_interval(&mut rng, spawn.shield_interval_min, spawn.shield_interval_spread);
        Self {
            state: GameState::Start,
            score: 0,
            high_score,
            coins: 0,
            lives: config.rules.max_lives,
            shields: 0,
            speed: config.world.initial_speed,
            frame: 0,
            viewport_width: config.world.layer_width,
            obstacle_timer: spawn.first_obstacle_delay,
            coin_timer,
            shield_timer,
            invulnerable: 0,
            ninja,
            obstacles: Vec::new(),
            pickups: Vec::new(),
            particles: Vec::new(),
            layers: parallax::default_layers(),
            events: Vec::new(),
            rng,
            config,
        }
    }

    // --- Accessors ------------------------------------------------------------

    pub fn config(&self) -> &GameConfig {
        &self.config
    }
    pub fn state(&self) -> GameState {
        self.state
    }
    pub fn score(&self) -> u32 {
        self.score
    }
    pub fn high_score(&self) -> u32 {
        self.high_score
    }
    pub fn coins(&self) -> u32 {
        self.coins
    }
    pub fn lives(&self) -> u32 {
        self.lives
    }
    pub fn shields(&self) -> u32 {
        self.shields
    }
    pub fn speed(&self) -> f64 {
        self.speed
    }
    pub fn frame(&self) -> u64 {
        self.frame
    }
    pub fn viewport_width(&self) -> f64 {
        self.viewport_width
    }
    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable > 0
    }
    /// Remaining invulnerability frames, used for the blink effect.
    pub fn invulnerable_frames(&self) -> u32 {
        self.invulnerable
    }
    pub fn ninja(&self) -> &Ninja {
        &self.ninja
    }
    /// Direct access to the player, for tests and replays.
    #[doc(hidden)]
    pub fn ninja_mut(&mut self) -> &mut Ninja {
        &mut self.ninja
    }
    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }
    pub fn pickups(&self) -> &[Pickup] {
        &self.pickups
    }
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }
    pub fn layers(&self) -> &[ParallaxLayer] {
        &self.layers
    }

    /// Place an obstacle directly, bypassing the spawn timer. Test and replay hook.
    #[doc(hidden)]
    pub fn push_obstacle(&mut self, obstacle: Obstacle) {
        self.obstacles.push(obstacle);
    }

    /// Place a pickup directly, bypassing the spawn timer. Test and replay hook.
    #[doc(hidden)]
    pub fn push_pickup(&mut self, pickup: Pickup) {
        self.pickups.push(pickup);
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    // --- Control --------------------------------------------------------------

    /// Logical width of the visible area; new entities appear at its right edge.
    pub fn set_viewport_width(&mut self, width: f64) {
        if width.is_finite() && width > 0.0 {
            self.viewport_width = width;
        }
    }

    pub fn handle_input(&mut self, input: Input) {
        if self.state != GameState::Playing {
            // Any press (re)starts; it is not also applied as a jump or duck.
            if input.is_press() {
                self.reset();
            }
            return;
        }
        match input {
            Input::JumpPressed => {
                if self.ninja.press_jump(&self.config.player) {
                    self.events.push(GameEvent::Jumped);
                }
            }
            Input::JumpReleased => self.ninja.release_jump(),
            Input::DuckPressed => self.ninja.set_ducking(true),
            Input::DuckReleased => self.ninja.set_ducking(false),
        }
    }

    pub fn reset(&mut self) {
        let spawn = &self.config.spawn;
        self.score = 0;
        self.coins = 0;
        self.lives = self.config.rules.max_lives;
        self.shields = 0;
        self.speed = self.config.world.initial_speed;
        self.frame = 0;
        self.obstacle_timer = spawn.first_obstacle_delay;
        self.coin_timer =
            next_interval(&mut self.rng, spawn.coin_interval_min, spawn.coin_interval_spread);
        self.shield_timer =
            next_interval(&mut self.rng, spawn.shield_interval_min, spawn.shield_interval_spread);
        self.invulnerable = 0;
        self.ninja = Ninja::new(&self.config.player, self.config.world.ground_y);
        self.obstacles.clear();
        self.pickups.clear();
        self.particles.clear();
        self.state = GameState::Playing;
        self.events.push(GameEvent::Started);
        log::debug!("run started (best {})", self.high_score);
    }

    // --- Frame ----------------------------------------------------------------

    pub fn step(&mut self) {
        let playing = self.state == GameState::Playing;
        let scroll = if playing { self.speed } else { 0.0 };

        if playing {
            let strip = self.config.world.layer_width;
            for layer in &mut self.layers {
                layer.update(self.speed, strip);
            }
        }
        particles::update_all(&mut self.particles, scroll);

        if !playing {
            return;
        }

        self.ninja
            .update(&self.config.player, self.config.world.ground_y);
        self.frame += 1;
        self.spawn_obstacle();
        self.spawn_pickups();

        self.update_obstacles();
        if self.state != GameState::Playing {
            return;
        }
        self.update_pickups();

        self.invulnerable = self.invulnerable.saturating_sub(1);
    }

    fn spawn_obstacle(&mut self) {
        if self.obstacle_timer <= 0 {
            let kind = ObstacleKind::random(&mut self.rng);
            self.obstacles.push(Obstacle::new(
                kind,
                self.viewport_width,
                self.config.world.ground_y,
            ));
            let spawn = &self.config.spawn;
            self.obstacle_timer = next_interval(
                &mut self.rng,
                spawn.obstacle_interval_min,
                spawn.obstacle_interval_spread,
            );
        }
        self.obstacle_timer -= 1;
    }

    fn spawn_pickups(&mut self) {
        let ground = self.config.world.ground_y;
        let spawn = &self.config.spawn;

        if self.coin_timer <= 0 {
            let coin = Pickup::coin(&mut self.rng, self.viewport_width, ground);
            self.pickups.push(coin);
            self.coin_timer =
                next_interval(&mut self.rng, spawn.coin_interval_min, spawn.coin_interval_spread);
        }
        self.coin_timer -= 1;

        if self.shield_timer <= 0 {
            if self.shields < self.config.rules.max_shields {
                self.pickups.push(Pickup::shield(self.viewport_width, ground));
            }
            self.shield_timer = next_interval(
                &mut self.rng,
                spawn.shield_interval_min,
                spawn.shield_interval_spread,
            );
        }
        self.shield_timer -= 1;
    }

    fn update_obstacles(&mut self) {
        let mut i = 0;
        while i < self.obstacles.len() {
            self.obstacles[i].update(self.speed);

            if ninja_hits(&self.ninja, &self.obstacles[i]) && self.invulnerable == 0 {
                let hit = self.obstacles.remove(i);
                self.on_hit(&hit);
                if self.state != GameState::Playing {
                    return;
                }
                continue;
            }

            if self.obstacles[i].is_past() {
                self.obstacles.remove(i);
                self.speed += self.config.world.speed_increment;
                self.events.push(GameEvent::ObstacleCleared);
                self.add_score(1);
                continue;
            }
            i += 1;
        }
    }

    fn on_hit(&mut self, obstacle: &Obstacle) {
        let cx = obstacle.x + obstacle.width / 2.0;
        let cy = obstacle.y + obstacle.height / 2.0;

        if self.shields > 0 {
            self.shields -= 1;
            self.events.push(GameEvent::ShieldBroken);
            particles::burst(
                &mut self.particles,
                &mut self.rng,
                cx,
                cy,
                SHIELD_BURST,
                particles::SHIELD_COLOR,
            );
            log::debug!("shield absorbed a hit, {} left", self.shields);
            return;
        }

        self.lives = self.lives.saturating_sub(1);
        particles::burst(
            &mut self.particles,
            &mut self.rng,
            cx,
            cy,
            HIT_BURST,
            particles::HIT_COLOR,
        );
        if self.lives == 0 {
            self.state = GameState::GameOver;
            self.events.push(GameEvent::GameOver { score: self.score });
            log::info!("game over at {} (best {})", self.score, self.high_score);
        } else {
            self.invulnerable = self.config.rules.invulnerable_frames;
            self.events.push(GameEvent::LifeLost);
            log::debug!("life lost, {} left", self.lives);
        }
    }

    fn update_pickups(&mut self) {
        let body = self.ninja.bounds();
        let mut i = 0;
        while i < self.pickups.len() {
            self.pickups[i].update(self.speed);

            if self.pickups[i].bounds().overlaps(&body) {
                let pickup = self.pickups.remove(i);
                self.collect(&pickup);
                continue;
            }
            if self.pickups[i].is_past() {
                self.pickups.remove(i);
                continue;
            }
            i += 1;
        }
    }

    fn collect(&mut self, pickup: &Pickup) {
        let (cx, cy) = pickup.center();
        match pickup.kind {
            PickupKind::Coin => {
                self.coins += 1;
                self.events.push(GameEvent::CoinCollected);
                particles::burst(
                    &mut self.particles,
                    &mut self.rng,
                    cx,
                    cy,
                    COIN_BURST,
                    particles::COIN_COLOR,
                );
                self.add_score(self.config.rules.coin_value);
            }
            PickupKind::Shield => {
                self.shields = (self.shields + 1).min(self.config.rules.max_shields);
                self.events.push(GameEvent::ShieldCollected);
                particles::burst(
                    &mut self.particles,
                    &mut self.rng,
                    cx,
                    cy,
                    SHIELD_BURST,
                    particles::SHIELD_COLOR,
                );
            }
        }
    }

    fn add_score(&mut self, points: u32) {
        self.score += points;
        if self.score > self.high_score {
            self.high_score = self.score;
            self.events.push(GameEvent::NewHighScore(self.score));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn playing(seed: u64) -> Runner {
        let mut r = Runner::with_seed(GameConfig::default(), 0, seed);
        r.handle_input(Input::JumpPressed);
        r.drain_events();
        r
    }

    #[test]
    fn starts_idle_and_press_starts_without_jumping() {
        let mut r = Runner::with_seed(GameConfig::default(), 12, 1);
        assert_eq!(r.state(), GameState::Start);
        r.handle_input(Input::JumpReleased);
        assert_eq!(r.state(), GameState::Start);
        r.handle_input(Input::JumpPressed);
        assert_eq!(r.state(), GameState::Playing);
        assert!(r.ninja().grounded);
        assert_eq!(r.drain_events(), vec![GameEvent::Started]);
        assert_eq!(r.high_score(), 12);
    }

    #[test]
    fn idle_world_does_not_move() {
        let mut r = Runner::with_seed(GameConfig::default(), 0, 1);
        for _ in 0..200 {
            r.step();
        }
        assert_eq!(r.frame(), 0);
        assert!(r.obstacles().is_empty());
        assert!(r.layers().iter().all(|l| l.x == 0.0));
    }

    #[test]
    fn first_obstacle_arrives_after_delay_at_right_edge() {
        let mut r = playing(2);
        r.set_viewport_width(1500.0);
        for _ in 0..40 {
            r.step();
        }
        assert!(r.obstacles().is_empty());
        r.step();
        assert_eq!(r.obstacles().len(), 1);
        let o = &r.obstacles()[0];
        assert!((o.x - (1500.0 - r.speed())).abs() < 1e-9);
    }

    #[test]
    fn jump_emits_event_only_when_it_happens() {
        let mut r = playing(3);
        r.handle_input(Input::JumpPressed);
        r.handle_input(Input::JumpPressed);
        r.handle_input(Input::JumpPressed);
        assert_eq!(r.drain_events(), vec![GameEvent::Jumped, GameEvent::Jumped]);
    }

    #[test]
    fn cleared_obstacle_scores_and_speeds_up() {
        let mut r = playing(4);
        r.ninja_mut().y = -10_000.0;
        r.ninja_mut().dy = 0.0;
        let mut o = Obstacle::new(ObstacleKind::Spikes, 0.0, 450.0);
        o.x = -99.0;
        r.push_obstacle(o);
        r.step();
        assert_eq!(r.score(), 1);
        assert!((r.speed() - 3.53).abs() < 1e-9);
        let events = r.drain_events();
        assert!(events.contains(&GameEvent::ObstacleCleared));
        assert!(events.contains(&GameEvent::NewHighScore(1)));
    }

    #[test]
    fn no_high_score_event_below_best() {
        let mut r = Runner::with_seed(GameConfig::default(), 50, 5);
        r.handle_input(Input::DuckPressed);
        r.ninja_mut().y = -10_000.0;
        let mut o = Obstacle::new(ObstacleKind::Spikes, 0.0, 450.0);
        o.x = -99.0;
        r.push_obstacle(o);
        r.step();
        assert_eq!(r.score(), 1);
        assert_eq!(r.high_score(), 50);
        assert!(
            !r.drain_events()
                .iter()
                .any(|e| matches!(e, GameEvent::NewHighScore(_)))
        );
    }

    fn obstacle_on_ninja(r: &Runner) -> Obstacle {
        let mut o = Obstacle::new(ObstacleKind::Spikes, 0.0, 450.0);
        o.x = r.ninja().x - 30.0 + r.speed();
        o
    }

    #[test]
    fn hit_costs_a_life_then_grants_invulnerability() {
        let mut r = playing(6);
        let o = obstacle_on_ninja(&r);
        r.push_obstacle(o);
        r.step();
        assert_eq!(r.lives(), 2);
        assert!(r.is_invulnerable());
        assert!(r.obstacles().is_empty());
        assert!(r.drain_events().contains(&GameEvent::LifeLost));

        let o = obstacle_on_ninja(&r);
        r.push_obstacle(o);
        r.step();
        assert_eq!(r.lives(), 2);
        assert_eq!(r.state(), GameState::Playing);
    }

    #[test]
    fn shield_absorbs_a_hit() {
        let mut r = playing(7);
        r.shields = 1;
        let o = obstacle_on_ninja(&r);
        r.push_obstacle(o);
        r.step();
        assert_eq!(r.shields(), 0);
        assert_eq!(r.lives(), 3);
        assert!(!r.is_invulnerable());
        assert_eq!(r.drain_events(), vec![GameEvent::ShieldBroken]);
    }

    #[test]
    fn last_life_ends_the_run() {
        let mut r = playing(8);
        r.lives = 1;
        r.score = 9;
        let o = obstacle_on_ninja(&r);
        r.push_obstacle(o);
        r.step();
        assert_eq!(r.state(), GameState::GameOver);
        assert_eq!(r.lives(), 0);
        assert!(r.drain_events().contains(&GameEvent::GameOver { score: 9 }));

        let frame = r.frame();
        r.step();
        assert_eq!(r.frame(), frame);
    }

    #[test]
    fn coin_and_shield_pickups() {
        let mut r = playing(9);
        let (nx, ny) = (r.ninja().x, r.ninja().y);
        let mut coin = Pickup::shield(0.0, 450.0);
        coin.kind = PickupKind::Coin;
        coin.x = nx + r.speed();
        coin.base_y = ny + 20.0;
        r.push_pickup(coin);
        let mut shield = Pickup::shield(0.0, 450.0);
        shield.x = nx + r.speed();
        shield.base_y = ny + 40.0;
        r.push_pickup(shield);
        r.step();
        assert_eq!(r.coins(), 1);
        assert_eq!(r.score(), 5);
        assert_eq!(r.shields(), 1);
        assert!(r.pickups().is_empty());
        assert!(!r.particles().is_empty());
    }

    #[test]
    fn shields_are_capped() {
        let mut r = playing(10);
        r.shields = 3;
        let mut shield = Pickup::shield(0.0, 450.0);
        shield.x = r.ninja().x + r.speed();
        shield.base_y = r.ninja().y + 40.0;
        r.push_pickup(shield);
        r.step();
        assert_eq!(r.shields(), 3);
    }

    #[test]
    fn restart_after_game_over_resets_the_run() {
        let mut r = playing(11);
        r.lives = 1;
        r.score = 4;
        let o = obstacle_on_ninja(&r);
        r.push_obstacle(o);
        r.step();
        assert_eq!(r.state(), GameState::GameOver);
        r.handle_input(Input::DuckReleased);
        assert_eq!(r.state(), GameState::GameOver);
        r.handle_input(Input::DuckPressed);
        assert_eq!(r.state(), GameState::Playing);
        assert_eq!(r.score(), 0);
        assert_eq!(r.lives(), 3);
        assert_eq!(r.speed(), 3.5);
        assert!(r.obstacles().is_empty() && r.particles().is_empty());
        assert!(!r.ninja().ducking);
    }

    fn playing_with(spawn: impl FnOnce(&mut crate::config::SpawnConfig), seed: u64) -> Runner {
        let mut cfg = GameConfig::default();
        cfg.spawn.first_obstacle_delay = 10_000;
        cfg.spawn.coin_interval_min = 10_000;
        cfg.spawn.shield_interval_min = 10_000;
        spawn(&mut cfg.spawn);
        let mut r = Runner::with_seed(cfg, 0, seed);
        r.handle_input(Input::JumpPressed);
        r.drain_events();
        r
    }

    fn count(r: &Runner, kind: PickupKind) -> usize {
        r.pickups().iter().filter(|p| p.kind == kind).count()
    }

    #[test]
    fn shields_spawn_at_the_right_edge() {
        let mut r = playing_with(
            |s| {
                s.shield_interval_min = 1;
                s.shield_interval_spread = 0;
            },
            13,
        );
        r.set_viewport_width(1500.0);
        r.step();
        assert_eq!(count(&r, PickupKind::Shield), 0);
        r.step();
        assert_eq!(count(&r, PickupKind::Shield), 1);
        let shield = &r.pickups()[0];
        assert!((shield.x - (1500.0 - r.speed())).abs() < 1e-9);
        assert_eq!(shield.base_y, 450.0 - 150.0);
    }

    #[test]
    fn no_shield_spawns_while_at_max() {
        let mut r = playing_with(
            |s| {
                s.shield_interval_min = 1;
                s.shield_interval_spread = 0;
            },
            14,
        );
        r.shields = r.config().rules.max_shields;
        for _ in 0..50 {
            r.step();
        }
        assert_eq!(count(&r, PickupKind::Shield), 0);

        r.shields -= 1;
        for _ in 0..2 {
            r.step();
        }
        assert!(count(&r, PickupKind::Shield) > 0);
    }

    #[test]
    fn coins_follow_their_interval() {
        let mut r = playing_with(
            |s| {
                s.coin_interval_min = 10;
                s.coin_interval_spread = 5;
            },
            15,
        );
        r.set_viewport_width(1500.0);
        let mut spawn_frames = Vec::new();
        let mut seen = 0;
        for _ in 0..200 {
            r.step();
            r.ninja_mut().y = -1.0e9;
            r.ninja_mut().dy = 0.0;
            let coins = count(&r, PickupKind::Coin);
            if coins > seen {
                spawn_frames.push(r.frame());
                let newest = &r.pickups()[r.pickups().len() - 1];
                assert!((newest.x - (1500.0 - r.speed())).abs() < 1e-9);
            }
            seen = coins;
        }
        assert!(spawn_frames.len() > 10);
        assert!((11..=15).contains(&spawn_frames[0]));
        assert!(spawn_frames.windows(2).all(|w| (10..15).contains(&(w[1] - w[0]))));
    }

    #[test]
    fn spawn_spacing_respects_minimum_interval() {
        let mut r = playing(12);
        r.ninja_mut().y = -1.0e9;
        let mut spawn_frames = Vec::new();
        let mut seen = 0;
        for _ in 0..3000 {
            r.step();
            // Keep the ninja out of harm's way.
            r.ninja_mut().y = -1.0e9;
            r.ninja_mut().dy = 0.0;
            let total = r.obstacles().len() as u64 + r.score() as u64;
            if total > seen {
                spawn_frames.push(r.frame());
                seen = total;
            }
        }
        assert!(spawn_frames.len() > 10);
        assert!(spawn_frames.windows(2).all(|w| (80..=120).contains(&(w[1] - w[0]))));
    }
}
