//! Axis-aligned boxes and the forgiving hitboxes used for obstacle hits.

use super::ninja::Ninja;
use super::obstacle::Obstacle;

// Ninja is only vulnerable in the central part of the body.
const NINJA_HIT_WIDTH: f64 = 0.5;
const NINJA_HIT_HEIGHT_STANDING: f64 = 0.7;
const NINJA_HIT_TOP_STANDING: f64 = 0.15;
const NINJA_HIT_HEIGHT_DUCKING: f64 = 0.3;
const NINJA_HIT_TOP_DUCKING: f64 = 0.7;

const OBSTACLE_HIT_SCALE: f64 = 0.8;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Aabb {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    /// Strict overlap: boxes that only touch along an edge do not collide.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.x < other.x + other.w
            && self.x + self.w > other.x
            && self.y < other.y + other.h
            && self.y + self.h > other.y
    }

    /// Box scaled by `sx`/`sy` around its own center.
    pub fn shrunk(&self, sx: f64, sy: f64) -> Aabb {
        let w = self.w * sx;
        let h = self.h * sy;
        Aabb {
            x: self.x + (self.w - w) / 2.0,
            y: self.y + (self.h - h) / 2.0,
            w,
            h,
        }
    }
}

pub fn ninja_hitbox(n: &Ninja) -> Aabb {
    let w = n.width * NINJA_HIT_WIDTH;
    let x = n.x + (n.width - w) / 2.0;
    if n.ducking {
        Aabb::new(
            x,
            n.y + n.height * NINJA_HIT_TOP_DUCKING,
            w,
            n.height * NINJA_HIT_HEIGHT_DUCKING,
        )
    } else {
        Aabb::new(
            x,
            n.y + n.height * NINJA_HIT_TOP_STANDING,
            w,
            n.height * NINJA_HIT_HEIGHT_STANDING,
        )
    }
}

pub fn obstacle_hitbox(o: &Obstacle) -> Aabb {
    o.bounds().shrunk(OBSTACLE_HIT_SCALE, OBSTACLE_HIT_SCALE)
}

pub fn ninja_hits(n: &Ninja, o: &Obstacle) -> bool {
    ninja_hitbox(n).overlaps(&obstacle_hitbox(o))
}
