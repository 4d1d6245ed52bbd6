//! Canvas rendering of a `Runner` snapshot. Everything is drawn in logical
//! units under a single `scale(s, s)` where `s = canvas height / logical height`.

use std::f64::consts::{FRAC_PI_2, TAU};

use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::runner::ninja::Ninja;
use crate::runner::obstacle::{Obstacle, ObstacleKind};
use crate::runner::parallax::ParallaxLayer;
use crate::runner::pickup::{Pickup, PickupKind};
use crate::runner::{GameState, Runner};

const INK: &str = "#000000";
const GROUND_COLOR: &str = "#2d3436";
const HEADBAND_COLOR: &str = "#e74c3c";
const EYE_COLOR: &str = "#ecf0f1";
const SHIELD_AURA: &str = "rgba(52, 152, 219, 0.55)";
const HEART_COLOR: &str = "#e74c3c";
const HEART_EMPTY_COLOR: &str = "#b2bec3";
const HUD_COLOR: &str = "#2d3436";
/// Frames per on/off phase of the invulnerability blink.
const BLINK_FRAMES: u32 = 6;

pub struct Renderer {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl Renderer {
    pub fn new(canvas: HtmlCanvasElement, ctx: CanvasRenderingContext2d) -> Self {
        Self { canvas, ctx }
    }

    /// Screen pixels per logical unit.
    pub fn scale(&self, logical_height: f64) -> f64 {
        let h = self.canvas.height() as f64;
        if h <= 0.0 { 1.0 } else { h / logical_height }
    }

    /// Visible width in logical units.
    pub fn logical_width(&self, logical_height: f64) -> f64 {
        self.canvas.width() as f64 / self.scale(logical_height)
    }

    pub fn draw(&self, runner: &Runner) {
        let ctx = &self.ctx;
        let world = &runner.config().world;
        let scale = self.scale(world.logical_height);
        let view_w = self.logical_width(world.logical_height);
        let ground = world.ground_y;

        ctx.clear_rect(
            0.0,
            0.0,
            self.canvas.width() as f64,
            self.canvas.height() as f64,
        );
        ctx.save();
        ctx.scale(scale, scale).ok();

        ctx.set_stroke_style_str(GROUND_COLOR);
        ctx.set_line_width(2.0 / scale);
        ctx.begin_path();
        ctx.move_to(0.0, ground);
        ctx.line_to(view_w, ground);
        ctx.stroke();

        for layer in runner.layers() {
            draw_layer(ctx, layer, ground, view_w, world.layer_width);
        }

        let blink_off = runner.is_invulnerable()
            && (runner.invulnerable_frames() / BLINK_FRAMES) % 2 == 1;
        if !blink_off {
            let running = runner.state() == GameState::Playing;
            draw_ninja(ctx, runner.ninja(), running);
        }
        if runner.shields() > 0 {
            draw_shield_aura(ctx, runner.ninja());
        }

        for o in runner.obstacles() {
            draw_obstacle(ctx, o);
        }
        for p in runner.pickups() {
            draw_pickup(ctx, p);
        }

        for p in runner.particles() {
            ctx.set_global_alpha(p.alpha());
            ctx.set_fill_style_str(p.color);
            ctx.fill_rect(p.x - p.size / 2.0, p.y - p.size / 2.0, p.size, p.size);
        }
        ctx.set_global_alpha(1.0);

        draw_hud(ctx, runner, view_w);
        ctx.restore();
    }
}

fn draw_layer(
    ctx: &CanvasRenderingContext2d,
    layer: &ParallaxLayer,
    ground: f64,
    view_w: f64,
    strip: f64,
) {
    ctx.set_fill_style_str(layer.desc.color);
    for i in 0..ParallaxLayer::copies(view_w, strip) {
        let offset = layer.x + i as f64 * strip;
        ctx.begin_path();
        ctx.move_to(offset, ground);
        for peak in layer.desc.peaks {
            ctx.line_to(offset + peak.x, ground - peak.h);
        }
        ctx.line_to(offset + strip, ground);
        ctx.fill();
    }
}

fn draw_ninja(ctx: &CanvasRenderingContext2d, n: &Ninja, running: bool) {
    let w = n.width;
    let h = n.height;

    ctx.save();
    // Spin around the body center, then draw relative to the feet.
    ctx.translate(n.x + w / 2.0, n.y + h / 2.0).ok();
    ctx.rotate(n.rotation).ok();
    ctx.translate(0.0, h / 2.0).ok();

    ctx.set_fill_style_str(INK);
    if n.ducking {
        disc(ctx, 0.0, -h * 0.4, w * 0.25);
        ctx.fill_rect(-w * 0.35, -h * 0.25, w * 0.7, h * 0.25);
        ctx.fill_rect(-w * 0.5, -h * 0.2, w * 0.15, h * 0.2);
    } else {
        disc(ctx, 0.0, -h * 0.85, w * 0.3);
        // neck, torso
        ctx.fill_rect(-w * 0.08, -h * 0.75, w * 0.16, h * 0.05);
        ctx.fill_rect(-w * 0.25, -h * 0.7, w * 0.5, h * 0.4);
        // legs
        ctx.fill_rect(-w * 0.25, -h * 0.3, w * 0.15, h * 0.3);
        ctx.fill_rect(w * 0.1, -h * 0.3, w * 0.15, h * 0.3);
        // arms
        ctx.fill_rect(-w * 0.4, -h * 0.65, w * 0.12, h * 0.35);
        ctx.fill_rect(w * 0.28, -h * 0.65, w * 0.12, h * 0.35);
    }

    if running && n.grounded && !n.ducking {
        let knot_x = -w * 0.1;
        let knot_y = -h * 0.85;
        ctx.set_stroke_style_str(HEADBAND_COLOR);
        ctx.set_line_width(2.0);
        ctx.begin_path();
        ctx.move_to(knot_x, knot_y);
        ctx.line_to(
            knot_x - 20.0 - n.stride.sin() * 5.0,
            knot_y + n.stride.cos() * 5.0,
        );
        ctx.stroke();
    }

    ctx.set_fill_style_str(EYE_COLOR);
    let eye_y = if n.ducking { -h * 0.42 } else { -h * 0.87 };
    ctx.fill_rect(w * 0.1, eye_y, 6.0, 2.0);

    ctx.restore();
}

fn draw_shield_aura(ctx: &CanvasRenderingContext2d, n: &Ninja) {
    let cx = n.x + n.width / 2.0;
    let (cy, r) = if n.ducking {
        (n.y + n.height * 0.8, n.height * 0.35)
    } else {
        (n.y + n.height / 2.0, n.height * 0.65)
    };
    ctx.set_stroke_style_str(SHIELD_AURA);
    ctx.set_line_width(3.0);
    ctx.begin_path();
    ctx.arc(cx, cy, r, 0.0, TAU).ok();
    ctx.stroke();
}

fn draw_obstacle(ctx: &CanvasRenderingContext2d, o: &Obstacle) {
    let hw = o.width / 2.0;
    let hh = o.height / 2.0;
    ctx.save();
    ctx.translate(o.x + hw, o.y + hh).ok();
    ctx.set_fill_style_str(INK);
    match o.kind {
        ObstacleKind::Spikes => {
            ctx.begin_path();
            ctx.move_to(-hw, hh);
            ctx.line_to(-hw / 2.0, -hh);
            ctx.line_to(0.0, hh / 2.0);
            ctx.line_to(hw / 2.0, -hh);
            ctx.line_to(hw, hh);
            ctx.fill();
        }
        ObstacleKind::Shuriken => {
            ctx.rotate(o.rotation).ok();
            for _ in 0..4 {
                ctx.rotate(FRAC_PI_2).ok();
                ctx.fill_rect(-2.0, -hh, 4.0, o.height);
                ctx.begin_path();
                ctx.move_to(0.0, -hh);
                ctx.line_to(10.0, -hh / 2.0);
                ctx.line_to(0.0, 0.0);
                ctx.fill();
            }
        }
    }
    ctx.restore();
}

fn draw_pickup(ctx: &CanvasRenderingContext2d, p: &Pickup) {
    let (cx, cy) = p.center();
    match p.kind {
        PickupKind::Coin => {
            ctx.set_fill_style_str("#f1c40f");
            disc(ctx, cx, cy, p.radius);
            ctx.set_fill_style_str("#f9e79f");
            disc(ctx, cx - p.radius * 0.2, cy - p.radius * 0.2, p.radius * 0.45);
        }
        PickupKind::Shield => {
            ctx.set_fill_style_str("rgba(52, 152, 219, 0.25)");
            disc(ctx, cx, cy, p.radius);
            ctx.set_stroke_style_str("#3498db");
            ctx.set_line_width(3.0);
            ctx.begin_path();
            ctx.arc(cx, cy, p.radius, 0.0, TAU).ok();
            ctx.stroke();
            // Small crest in the middle.
            ctx.set_fill_style_str("#3498db");
            ctx.begin_path();
            ctx.move_to(cx - p.radius * 0.4, cy - p.radius * 0.4);
            ctx.line_to(cx + p.radius * 0.4, cy - p.radius * 0.4);
            ctx.line_to(cx, cy + p.radius * 0.5);
            ctx.fill();
        }
    }
}

fn draw_hud(ctx: &CanvasRenderingContext2d, runner: &Runner, view_w: f64) {
    let max_lives = runner.config().rules.max_lives;
    let right = view_w - 20.0;
    let top = 40.0;

    ctx.set_font("24px sans-serif");
    ctx.set_text_align("right");

    let mut x = right;
    for i in (0..max_lives).rev() {
        let filled = i < runner.lives();
        ctx.set_fill_style_str(if filled { HEART_COLOR } else { HEART_EMPTY_COLOR });
        ctx.fill_text(if filled { "♥" } else { "♡" }, x, top).ok();
        x -= 26.0;
    }

    ctx.set_font("18px sans-serif");
    ctx.set_fill_style_str(HUD_COLOR);
    let line = format!("◈ {}   ● {}", runner.shields(), runner.coins());
    ctx.fill_text(&line, right, top + 28.0).ok();
}

fn disc(ctx: &CanvasRenderingContext2d, x: f64, y: f64, r: f64) {
    ctx.begin_path();
    ctx.arc(x, y, r, 0.0, TAU).ok();
    ctx.fill();
}
