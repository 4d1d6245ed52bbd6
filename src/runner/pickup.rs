//! Collectibles: coins for points, shields that absorb one hit each.

use rand::Rng;

use super::collision::Aabb;

const BOB_STEP: f64 = 0.1;
const BOB_AMPLITUDE: f64 = 4.0;

const COIN_RADIUS: f64 = 12.0;
const COIN_MIN_ALTITUDE: f64 = 40.0;
const COIN_MAX_ALTITUDE: f64 = 200.0;

const SHIELD_RADIUS: f64 = 16.0;
const SHIELD_ALTITUDE: f64 = 150.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PickupKind {
    Coin,
    Shield,
}

#[derive(Clone, Debug)]
pub struct Pickup {
    pub kind: PickupKind,
    /// Left edge.
    pub x: f64,
    /// Resting center height; the drawn/collided center bobs around it.
    pub base_y: f64,
    pub radius: f64,
    pub bob: f64,
}

impl Pickup {
    pub fn coin<R: Rng + ?Sized>(rng: &mut R, spawn_x: f64, ground_y: f64) -> Self {
        let altitude = rng.gen_range(COIN_MIN_ALTITUDE..=COIN_MAX_ALTITUDE);
        Self {
            kind: PickupKind::Coin,
            x: spawn_x,
            base_y: ground_y - altitude,
            radius: COIN_RADIUS,
            bob: 0.0,
        }
    }

    pub fn shield(spawn_x: f64, ground_y: f64) -> Self {
        Self {
            kind: PickupKind::Shield,
            x: spawn_x,
            base_y: ground_y - SHIELD_ALTITUDE,
            radius: SHIELD_RADIUS,
            bob: 0.0,
        }
    }

    pub fn update(&mut self, speed: f64) {
        self.x -= speed;
        self.bob += BOB_STEP;
    }

    pub fn center(&self) -> (f64, f64) {
        (
            self.x + self.radius,
            self.base_y + self.bob.sin() * BOB_AMPLITUDE,
        )
    }

    pub fn bounds(&self) -> Aabb {
        let (cx, cy) = self.center();
        Aabb::new(
            cx - self.radius,
            cy - self.radius,
            self.radius * 2.0,
            self.radius * 2.0,
        )
    }

    pub fn is_past(&self) -> bool {
        self.x + self.radius * 2.0 < 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn coins_float_within_reach() {
        let mut rng = SmallRng::seed_from_u64(3);
        for _ in 0..200 {
            let c = Pickup::coin(&mut rng, 900.0, 450.0);
            assert!(c.base_y >= 250.0 && c.base_y <= 410.0);
            assert_eq!(c.kind, PickupKind::Coin);
        }
    }

    #[test]
    fn pickups_scroll_and_bob() {
        let mut s = Pickup::shield(500.0, 450.0);
        let (_, y0) = s.center();
        for _ in 0..10 {
            s.update(4.0);
        }
        assert_eq!(s.x, 460.0);
        let (_, y1) = s.center();
        assert!((y1 - y0).abs() <= BOB_AMPLITUDE);
        assert!((y1 - y0).abs() > 0.0);
    }

    #[test]
    fn off_screen_after_full_width() {
        let mut c = Pickup::shield(0.0, 450.0);
        c.x = -32.0;
        assert!(!c.is_past());
        c.x = -32.5;
        assert!(c.is_past());
    }
}
