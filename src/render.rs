// render.rs
//
// the drawing and input seams between the playback loop and the window
// macroquad backs them when running, tests use recording fakes

use colorsys::{Hsl, Rgb};
use macroquad::prelude::*;
use macroquad::window::{next_frame, request_new_screen_size, screen_height, screen_width};

use crate::config::{Style, WindowConfig};
use crate::error::{Result, SimError};

/// Integer pixel position on the drawing surface. May lie off-surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ScreenPoint {
    pub x: i32,
    pub y: i32,
}

impl ScreenPoint {
    pub fn new(x: i32, y: i32) -> ScreenPoint {
        ScreenPoint { x, y }
    }
}

pub trait Canvas {
    fn clear(&mut self, color: Color);
    fn draw_line(&mut self, from: ScreenPoint, to: ScreenPoint, thickness: f32, color: Color);
    fn draw_disc(&mut self, center: ScreenPoint, radius: f32, color: Color);
    // `at` is the left end of the text baseline
    fn draw_text(&mut self, text: &str, at: ScreenPoint, size: f32, color: Color);
}

pub trait EventSource {
    // polled once per tick, must not block
    fn quit_requested(&mut self) -> bool;

    fn restart_requested(&mut self) -> bool {
        false
    }
}

/// Color of trail segment `i` out of `n`, oldest first.
///
/// Lightness and alpha move linearly from the style's faint end (oldest) to
/// its bright end (newest), along a fixed hue.
pub fn trail_color(style: &Style, i: usize, n: usize) -> Color {
    let frac = if n <= 1 { 1.0 } else { i as f64 / (n - 1) as f64 };
    let (l_old, l_new) = style.trail_lightness;
    let (a_old, a_new) = style.trail_alpha;

    let lightness = l_old + (l_new - l_old) * frac;
    let alpha = a_old + (a_new - a_old) * frac as f32;

    let c = Rgb::from(Hsl::new(style.trail_hue, style.trail_saturation, lightness, None));
    Color::new(
        c.red() as f32 / 255.0,
        c.green() as f32 / 255.0,
        c.blue() as f32 / 255.0,
        alpha,
    )
}

// immediate mode drawing onto the macroquad window
pub struct MacroquadCanvas {
    width: u32,
    height: u32,
}

impl MacroquadCanvas {
    // the window itself is opened by macroquad before main runs, this sizes it
    // and checks that a usable surface came back
    pub async fn create(window: &WindowConfig) -> Result<MacroquadCanvas> {
        request_new_screen_size(window.width as f32, window.height as f32);
        next_frame().await;

        let (w, h) = (screen_width(), screen_height());
        if !(w >= 1.0 && h >= 1.0) {
            return Err(SimError::SurfaceCreationFailure {
                width: window.width,
                height: window.height,
                reason: format!("window reported a {}x{} surface", w, h),
            });
        }

        Ok(MacroquadCanvas { width: w as u32, height: h as u32 })
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

impl Canvas for MacroquadCanvas {
    fn clear(&mut self, color: Color) {
        clear_background(color);
    }

    fn draw_line(&mut self, from: ScreenPoint, to: ScreenPoint, thickness: f32, color: Color) {
        draw_line(from.x as f32, from.y as f32, to.x as f32, to.y as f32, thickness, color);
    }

    fn draw_disc(&mut self, center: ScreenPoint, radius: f32, color: Color) {
        draw_circle(center.x as f32, center.y as f32, radius, color);
    }

    fn draw_text(&mut self, text: &str, at: ScreenPoint, size: f32, color: Color) {
        draw_text(text, at.x as f32, at.y as f32, size, color);
    }
}

// Escape or Q quits, R restarts the replay
pub struct MacroquadEvents;

impl EventSource for MacroquadEvents {
    fn quit_requested(&mut self) -> bool {
        is_key_pressed(KeyCode::Escape) || is_key_pressed(KeyCode::Q)
    }

    fn restart_requested(&mut self) -> bool {
        is_key_pressed(KeyCode::R)
    }
}
