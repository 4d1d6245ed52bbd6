//! Scrolling obstacles: ground spikes to jump over, flying shuriken to duck under.

use rand::Rng;

use super::collision::Aabb;

const SPIN_PER_FRAME: f64 = 0.2;
/// Top edge of a shuriken, measured up from the ground line.
const SHURIKEN_ALTITUDE: f64 = 75.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ObstacleKind {
    /// Low: sits on the ground, must be jumped.
    Spikes,
    /// High: flies at head height, must be ducked under.
    Shuriken,
}

impl ObstacleKind {
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        if rng.gen_bool(0.5) {
            ObstacleKind::Spikes
        } else {
            ObstacleKind::Shuriken
        }
    }

    pub fn size(self) -> (f64, f64) {
        match self {
            ObstacleKind::Spikes => (100.0, 60.0),
            ObstacleKind::Shuriken => (120.0, 30.0),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Obstacle {
    pub kind: ObstacleKind,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub rotation: f64,
}

impl Obstacle {
    pub fn new(kind: ObstacleKind, spawn_x: f64, ground_y: f64) -> Self {
        let (width, height) = kind.size();
        let y = match kind {
            ObstacleKind::Spikes => ground_y - height,
            ObstacleKind::Shuriken => ground_y - SHURIKEN_ALTITUDE,
        };
        Self {
            kind,
            x: spawn_x,
            y,
            width,
            height,
            rotation: 0.0,
        }
    }

    pub fn update(&mut self, speed: f64) {
        self.x -= speed;
        if self.kind == ObstacleKind::Shuriken {
            self.rotation += SPIN_PER_FRAME;
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.x, self.y, self.width, self.height)
    }

    /// Right edge has scrolled past the left side of the screen.
    pub fn is_past(&self) -> bool {
        self.x + self.width < 0.0
    }
}

/// Frames until the next spawn: `min + floor(rand * spread)`.
pub fn next_interval<R: Rng + ?Sized>(rng: &mut R, min: i32, spread: i32) -> i32 {
    if spread <= 0 {
        return min;
    }
    min.saturating_add(rng.gen_range(0..spread))
}
