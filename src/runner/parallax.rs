//! Background parallax strips. Each layer is a mountain-ridge polyline across one
//! strip width that repeats horizontally.

/// One ridge point: `x` along the strip, `h` height above the ground line.
#[derive(Clone, Copy, Debug)]
pub struct Peak {
    pub x: f64,
    pub h: f64,
}

/// Immutable layer descriptor.
pub struct LayerDesc {
    pub name: &'static str,
    /// Fraction of world speed this layer scrolls at.
    pub speed_modifier: f64,
    pub color: &'static str,
    pub peaks: &'static [Peak],
}

const fn p(x: f64, h: f64) -> Peak {
    Peak { x, h }
}

pub static CLOUDS: LayerDesc = LayerDesc {
    name: "clouds",
    speed_modifier: 0.05,
    color: "rgba(0, 0, 0, 0.02)",
    peaks: &[p(0.0, 50.0), p(400.0, 80.0), p(800.0, 40.0), p(1200.0, 50.0)],
};

pub static FAR_MOUNTAINS: LayerDesc = LayerDesc {
    name: "far mountains",
    speed_modifier: 0.1,
    color: "#f1f2f6",
    peaks: &[
        p(0.0, 150.0),
        p(300.0, 250.0),
        p(600.0, 180.0),
        p(900.0, 320.0),
        p(1200.0, 150.0),
    ],
};

pub static NEAR_HILLS: LayerDesc = LayerDesc {
    name: "near hills",
    speed_modifier: 0.2,
    color: "#f5f6fa",
    peaks: &[
        p(0.0, 80.0),
        p(250.0, 150.0),
        p(550.0, 100.0),
        p(850.0, 200.0),
        p(1200.0, 80.0),
    ],
};

/// Back to front.
pub static LAYERS: [&LayerDesc; 3] = [&CLOUDS, &FAR_MOUNTAINS, &NEAR_HILLS];

pub struct ParallaxLayer {
    pub desc: &'static LayerDesc,
    /// Strip offset, always in `(-strip_width, 0]`.
    pub x: f64,
}

impl ParallaxLayer {
    pub fn new(desc: &'static LayerDesc) -> Self {
        Self { desc, x: 0.0 }
    }

    pub fn update(&mut self, speed: f64, strip_width: f64) {
        self.x -= speed * self.desc.speed_modifier;
        if self.x <= -strip_width {
            self.x += strip_width;
        }
    }

    /// Strip copies needed to cover `view_width`, plus one for the wrap seam.
    pub fn copies(view_width: f64, strip_width: f64) -> usize {
        (view_width / strip_width).ceil() as usize + 1
    }
}

pub fn default_layers() -> Vec<ParallaxLayer> {
    LAYERS.iter().map(|d| ParallaxLayer::new(*d)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layers_are_ordered_back_to_front() {
        let speeds: Vec<f64> = LAYERS.iter().map(|l| l.speed_modifier).collect();
        assert!(speeds.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn ridges_span_exactly_one_strip() {
        for layer in LAYERS {
            assert_eq!(layer.peaks.first().map(|p| p.x), Some(0.0), "{}", layer.name);
            assert_eq!(layer.peaks.last().map(|p| p.x), Some(1200.0), "{}", layer.name);
        }
    }

    #[test]
    fn offset_wraps_around() {
        let mut layer = ParallaxLayer::new(&NEAR_HILLS);
        layer.x = -1199.5;
        layer.update(5.0, 1200.0);
        assert!((layer.x - (-0.5)).abs() < 1e-9);
    }

    #[test]
    fn enough_copies_for_wide_screens() {
        assert_eq!(ParallaxLayer::copies(1200.0, 1200.0), 2);
        assert_eq!(ParallaxLayer::copies(2500.0, 1200.0), 4);
    }
}
