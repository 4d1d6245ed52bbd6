//! Short-lived particle bursts for pickups and hits.

use rand::Rng;

const GRAVITY: f64 = 0.2;
const MAX_PARTICLES: usize = 256;

pub const COIN_COLOR: &str = "#f1c40f";
pub const SHIELD_COLOR: &str = "#3498db";
pub const HIT_COLOR: &str = "#000000";

#[derive(Clone, Debug)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub dx: f64,
    pub dy: f64,
    pub size: f64,
    pub life: u32,
    pub max_life: u32,
    pub color: &'static str,
}

impl Particle {
    pub fn update(&mut self, scroll: f64) {
        self.dy += GRAVITY;
        self.x += self.dx - scroll;
        self.y += self.dy;
        self.life = self.life.saturating_sub(1);
    }

    pub fn alive(&self) -> bool {
        self.life > 0
    }

    /// 1.0 when fresh, fading to 0.0.
    pub fn alpha(&self) -> f64 {
        if self.max_life == 0 {
            return 0.0;
        }
        self.life as f64 / self.max_life as f64
    }
}

/// Spray `count` particles from (x, y). Oldest particles make room past the cap.
pub fn burst<R: Rng + ?Sized>(
    particles: &mut Vec<Particle>,
    rng: &mut R,
    x: f64,
    y: f64,
    count: usize,
    color: &'static str,
) {
    for _ in 0..count {
        let life = rng.gen_range(30..=50);
        particles.push(Particle {
            x,
            y,
            dx: rng.gen_range(-3.0..3.0),
            dy: rng.gen_range(-6.0..-1.0),
            size: rng.gen_range(2.0..5.0),
            life,
            max_life: life,
            color,
        });
    }
    if particles.len() > MAX_PARTICLES {
        let excess = particles.len() - MAX_PARTICLES;
        particles.drain(..excess);
    }
}

pub fn update_all(particles: &mut Vec<Particle>, scroll: f64) {
    for p in particles.iter_mut() {
        p.update(scroll);
    }
    particles.retain(Particle::alive);
}
