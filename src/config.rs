// config.rs
//
// compiled-in settings for the simulation and the replay window
// every struct defaults to the values the program runs with

use std::f64::consts::FRAC_PI_2;

use macroquad::color::{Color, BLACK, BLUE, RED, WHITE};

use crate::dynamics::State;
use crate::error::{Result, SimError};

/// Physical constants of the double pendulum, fixed for the process lifetime.
///
/// Lengths are in world units, which the mapper scales to pixels. The masses
/// only enter the dynamics as a ratio, and double as disc radii when drawing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Parameters {
    pub g: f64,
    pub l1: f64,
    pub l2: f64,
    pub m1: f64,
    pub m2: f64,
}

impl Default for Parameters {
    fn default() -> Parameters {
        Parameters { g: 9.81, l1: 150.0, l2: 120.0, m1: 10.0, m2: 10.0 }
    }
}

/// The integration window `[0, t_end]` and how many evenly spaced samples
/// to keep from it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeSpan {
    pub t_end: f64,
    pub samples: usize,
}

impl TimeSpan {
    // time of sample i, the last sample lands exactly on t_end
    pub fn sample_time(&self, i: usize) -> f64 {
        if self.samples < 2 {
            0.0
        } else if i + 1 == self.samples {
            self.t_end
        } else {
            self.t_end * (i as f64) / ((self.samples - 1) as f64)
        }
    }

    pub fn sample_times(&self) -> Vec<f64> {
        (0..self.samples).map(|i| self.sample_time(i)).collect()
    }
}

impl Default for TimeSpan {
    fn default() -> TimeSpan {
        TimeSpan { t_end: 100.0, samples: 5000 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerances {
    pub rtol: f64,
    pub atol: f64,
    // attempted steps (accepted + rejected) before giving up
    pub max_steps: u64,
}

impl Default for Tolerances {
    fn default() -> Tolerances {
        Tolerances { rtol: 1e-8, atol: 1e-8, max_steps: 1_000_000 }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
}

impl Default for WindowConfig {
    fn default() -> WindowConfig {
        WindowConfig { width: 800, height: 600, title: "Double Pendulum".to_string() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackConfig {
    pub trail_len: usize,
    pub fps: u32,
    // world units to pixels
    pub scale: f64,
    pub show_overlay: bool,
}

impl PlaybackConfig {
    pub fn frame_interval_secs(&self) -> f64 {
        1.0 / self.fps as f64
    }
}

impl Default for PlaybackConfig {
    fn default() -> PlaybackConfig {
        PlaybackConfig { trail_len: 500, fps: 60, scale: 1.0, show_overlay: true }
    }
}

/// Colors and stroke sizes used by the playback loop.
///
/// The trail is drawn along an HSL ramp with a fixed hue: the oldest segment
/// gets `trail_lightness.0` / `trail_alpha.0`, the newest gets the `.1` ends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Style {
    pub background: Color,
    pub rod_color: Color,
    pub rod_thickness: f32,
    pub pivot_color: Color,
    pub pivot_radius: f32,
    pub mass1_color: Color,
    pub mass2_color: Color,
    // disc radius in pixels per unit of mass
    pub disc_scale: f32,
    pub trail_hue: f64,
    pub trail_saturation: f64,
    pub trail_lightness: (f64, f64),
    pub trail_alpha: (f32, f32),
    pub trail_thickness: f32,
    pub text_color: Color,
}

impl Default for Style {
    fn default() -> Style {
        Style {
            background: WHITE,
            rod_color: BLACK,
            rod_thickness: 2.0,
            pivot_color: BLACK,
            pivot_radius: 5.0,
            mass1_color: RED,
            mass2_color: BLUE,
            disc_scale: 1.0,
            trail_hue: 120.0,
            trail_saturation: 100.0,
            trail_lightness: (85.0, 35.0),
            trail_alpha: (0.1, 1.0),
            trail_thickness: 2.0,
            text_color: BLACK,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    pub params: Parameters,
    pub initial: State,
    pub span: TimeSpan,
    pub tolerances: Tolerances,
    pub window: WindowConfig,
    pub playback: PlaybackConfig,
    pub style: Style,
}

impl Default for SimConfig {
    fn default() -> SimConfig {
        SimConfig {
            params: Parameters::default(),
            // both arms held out horizontally, at rest
            initial: State::new(FRAC_PI_2, 0.0, FRAC_PI_2, 0.0),
            span: TimeSpan::default(),
            tolerances: Tolerances::default(),
            window: WindowConfig::default(),
            playback: PlaybackConfig::default(),
            style: Style::default(),
        }
    }
}

fn require(ok: bool, msg: &str) -> Result<()> {
    if ok {
        Ok(())
    } else {
        Err(SimError::invalid(msg))
    }
}

impl SimConfig {
    // checks everything the dynamics and the integrator assume
    // nan fails every comparison below, so it is rejected too
    pub fn validate(&self) -> Result<()> {
        let p = &self.params;
        require(p.g.is_finite(), "gravity must be finite")?;
        require(p.l1 > 0.0 && p.l1.is_finite(), "arm length l1 must be positive")?;
        require(p.l2 > 0.0 && p.l2.is_finite(), "arm length l2 must be positive")?;
        require(p.m1 > 0.0 && p.m1.is_finite(), "mass m1 must be positive")?;
        require(p.m2 > 0.0 && p.m2.is_finite(), "mass m2 must be positive")?;

        require(self.initial.is_finite(), "initial state must be finite")?;

        require(
            self.span.t_end > 0.0 && self.span.t_end.is_finite(),
            "time span end must be positive",
        )?;
        require(self.span.samples > 0, "sample count must be at least 1")?;

        let tol = &self.tolerances;
        require(tol.rtol > 0.0, "relative tolerance must be positive")?;
        require(tol.atol > 0.0, "absolute tolerance must be positive")?;
        require(tol.max_steps > 0, "step budget must be at least 1")?;

        require(
            self.window.width > 0 && self.window.height > 0,
            "window must have a non-zero size",
        )?;
        require(self.playback.fps > 0, "frame rate must be at least 1")?;
        require(self.playback.scale > 0.0, "scale must be positive")?;

        Ok(())
    }
}
