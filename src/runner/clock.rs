//! FrameClock turns `requestAnimationFrame` timestamps into fixed 60 Hz steps.

pub const STEP_MS: f64 = 1000.0 / 60.0;
/// After a long stall (hidden tab) don't try to catch up more than this.
const MAX_STEPS_PER_FRAME: u32 = 5;

pub struct FrameClock {
    last_ms: Option<f64>,
    accumulator_ms: f64,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            last_ms: None,
            accumulator_ms: 0.0,
        }
    }

    /// Number of simulation steps to run for the frame at `now`.
    pub fn advance(&mut self, now: f64) -> u32 {
        let Some(last) = self.last_ms.replace(now) else {
            return 1;
        };
        self.accumulator_ms += (now - last).max(0.0);
        let mut steps = 0;
        while self.accumulator_ms >= STEP_MS && steps < MAX_STEPS_PER_FRAME {
            self.accumulator_ms -= STEP_MS;
            steps += 1;
        }
        if steps == MAX_STEPS_PER_FRAME {
            self.accumulator_ms = self.accumulator_ms.min(STEP_MS);
        }
        steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_frame_runs_one_step() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.advance(1234.0), 1);
    }

    #[test]
    fn sixty_hz_display_runs_one_step_per_frame() {
        let mut clock = FrameClock::new();
        let mut t = 0.0;
        clock.advance(t);
        let mut total = 0;
        for _ in 0..600 {
            t += STEP_MS;
            total += clock.advance(t);
        }
        assert!((599..=600).contains(&total));
    }

    #[test]
    fn high_refresh_display_is_not_faster() {
        let mut clock = FrameClock::new();
        let mut t = 0.0;
        clock.advance(t);
        let mut total = 0;
        for _ in 0..1200 {
            t += 1000.0 / 120.0;
            total += clock.advance(t);
        }
        assert!((599..=600).contains(&total));
    }

    #[test]
    fn long_stall_is_clamped() {
        let mut clock = FrameClock::new();
        clock.advance(0.0);
        assert_eq!(clock.advance(10_000.0), MAX_STEPS_PER_FRAME);
        assert!(clock.advance(10_000.0 + STEP_MS) <= 2);
    }

    #[test]
    fn time_going_backwards_is_ignored() {
        let mut clock = FrameClock::new();
        clock.advance(500.0);
        assert_eq!(clock.advance(100.0), 0);
    }
}
