//! Player character physics: gravity, variable jump height, double jump, ducking.

use crate::config::PlayerConfig;

use super::collision::Aabb;

const STRIDE_STEP: f64 = 0.2;

#[derive(Clone, Debug)]
pub struct Ninja {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Vertical velocity, positive is down.
    pub dy: f64,
    pub rotation: f64,
    /// Jump key is still held since the last jump.
    pub jump_held: bool,
    pub grounded: bool,
    pub ducking: bool,
    pub jump_count: u32,
    /// Drives the headband flutter while running.
    pub stride: f64,
}

impl Ninja {
    pub fn new(cfg: &PlayerConfig, ground_y: f64) -> Self {
        Self {
            x: cfg.x,
            y: ground_y - cfg.height,
            width: cfg.width,
            height: cfg.height,
            dy: 0.0,
            rotation: 0.0,
            jump_held: false,
            grounded: true,
            ducking: false,
            jump_count: 0,
            stride: 0.0,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.x, self.y, self.width, self.height)
    }

    pub fn update(&mut self, cfg: &PlayerConfig, ground_y: f64) {
        // Releasing the jump key while rising cuts the jump short.
        let mut gravity = cfg.gravity;
        if self.dy < 0.0 && !self.jump_held {
            gravity *= cfg.release_gravity_multiplier;
        }
        self.dy += gravity;
        self.y += self.dy;

        if self.grounded {
            self.rotation = 0.0;
        } else {
            self.rotation += cfg.spin_per_frame;
        }

        if self.y + self.height > ground_y {
            self.y = ground_y - self.height;
            self.dy = 0.0;
            self.grounded = true;
            self.jump_count = 0;
            self.rotation = 0.0;
        }

        if self.grounded && !self.ducking {
            self.stride += STRIDE_STEP;
        }
    }

    /// Start a jump (or a mid-air jump). Returns whether the jump happened.
    pub fn press_jump(&mut self, cfg: &PlayerConfig) -> bool {
        if self.ducking || !(self.grounded || self.jump_count < cfg.max_jumps) {
            return false;
        }
        self.dy = -cfg.jump_force;
        self.grounded = false;
        self.jump_held = true;
        self.jump_count += 1;
        true
    }

    pub fn release_jump(&mut self) {
        self.jump_held = false;
    }

    pub fn set_ducking(&mut self, ducking: bool) {
        self.ducking = ducking;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GROUND: f64 = 450.0;

    fn setup() -> (PlayerConfig, Ninja) {
        let cfg = PlayerConfig::default();
        let n = Ninja::new(&cfg, GROUND);
        (cfg, n)
    }

    fn frames_until_landed(n: &mut Ninja, cfg: &PlayerConfig) -> (u32, f64) {
        let mut apex = n.y;
        let mut frames = 0;
        loop {
            n.update(cfg, GROUND);
            frames += 1;
            apex = apex.min(n.y);
            if n.grounded || frames > 500 {
                return (frames, apex);
            }
        }
    }

    #[test]
    fn starts_standing_on_the_ground() {
        let (cfg, mut n) = setup();
        assert_eq!(n.y, GROUND - 80.0);
        n.update(&cfg, GROUND);
        assert!(n.grounded);
        assert_eq!(n.y, GROUND - 80.0);
        assert_eq!(n.dy, 0.0);
    }

    #[test]
    fn held_jump_goes_higher_than_tapped_jump() {
        let (cfg, mut held) = setup();
        assert!(held.press_jump(&cfg));
        let (_, held_apex) = frames_until_landed(&mut held, &cfg);

        let (cfg, mut tapped) = setup();
        assert!(tapped.press_jump(&cfg));
        tapped.release_jump();
        let (_, tapped_apex) = frames_until_landed(&mut tapped, &cfg);

        // Smaller y is higher on screen.
        assert!(held_apex < tapped_apex);
        assert!(held.grounded && tapped.grounded);
    }

    #[test]
    fn double_jump_then_no_more() {
        let (cfg, mut n) = setup();
        assert!(n.press_jump(&cfg));
        n.update(&cfg, GROUND);
        assert!(n.press_jump(&cfg));
        assert_eq!(n.jump_count, 2);
        assert_eq!(n.dy, -cfg.jump_force);
        n.update(&cfg, GROUND);
        assert!(!n.press_jump(&cfg));
    }

    #[test]
    fn landing_resets_jumps_and_rotation() {
        let (cfg, mut n) = setup();
        n.press_jump(&cfg);
        n.update(&cfg, GROUND);
        assert!(n.rotation > 0.0);
        frames_until_landed(&mut n, &cfg);
        assert_eq!(n.jump_count, 0);
        assert_eq!(n.rotation, 0.0);
        assert_eq!(n.y + n.height, GROUND);
    }

    #[test]
    fn cannot_jump_while_ducking() {
        let (cfg, mut n) = setup();
        n.set_ducking(true);
        assert!(!n.press_jump(&cfg));
        assert!(n.grounded);
        n.set_ducking(false);
        assert!(n.press_jump(&cfg));
    }
}
