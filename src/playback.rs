// playback.rs
//
// replays the precomputed trajectory one sample per frame and loops forever

use log::{debug, info};
use macroquad::window::next_frame;

use crate::config::{Parameters, PlaybackConfig, SimConfig, Style};
use crate::dynamics::{kinetic_energy, potential_energy};
use crate::fps::{FramePacer, FPS};
use crate::integrator::Trajectory;
use crate::mapper::CoordinateMapper;
use crate::render::{trail_color, Canvas, EventSource, ScreenPoint};
use crate::trail::TrailBuffer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    // the cursor points at a sample that has not been shown yet
    Playing,
    // every sample has been shown, the next tick rewinds
    WrapPending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Drawn,
    Wrapped,
    Terminated,
}

/// Everything the replay needs, owned in one place: the physical parameters,
/// the trajectory, the trail and the cursor into the trajectory.
pub struct PlaybackLoop {
    params: Parameters,
    trajectory: Trajectory,
    mapper: CoordinateMapper,
    trail: TrailBuffer,
    cursor: usize,
    style: Style,
}

impl PlaybackLoop {
    pub fn new(
        params: Parameters,
        trajectory: Trajectory,
        mapper: CoordinateMapper,
        trail_len: usize,
        style: Style,
    ) -> PlaybackLoop {
        PlaybackLoop { params, trajectory, mapper, trail: TrailBuffer::new(trail_len), cursor: 0, style }
    }

    pub fn from_config(config: &SimConfig, trajectory: Trajectory, width: u32, height: u32) -> PlaybackLoop {
        let mapper = CoordinateMapper::for_surface(&config.params, config.playback.scale, width, height);
        PlaybackLoop::new(config.params, trajectory, mapper, config.playback.trail_len, config.style)
    }

    pub fn phase(&self) -> Phase {
        if self.cursor < self.trajectory.len() {
            Phase::Playing
        } else {
            Phase::WrapPending
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn trail(&self) -> &TrailBuffer {
        &self.trail
    }

    pub fn trajectory(&self) -> &Trajectory {
        &self.trajectory
    }

    /// Runs one frame of the replay, up to but not including presenting it.
    ///
    /// A quit request ends the replay before anything is drawn. Otherwise the
    /// surface is cleared and either the next sample is drawn, or, once every
    /// sample has been shown (or a restart was requested), the cursor and the
    /// trail are reset together and nothing else is drawn this frame.
    pub fn tick<C: Canvas, E: EventSource>(&mut self, canvas: &mut C, events: &mut E) -> TickOutcome {
        if events.quit_requested() {
            return TickOutcome::Terminated;
        }

        canvas.clear(self.style.background);

        if events.restart_requested() {
            debug!("restart requested at frame {}", self.cursor);
            self.rewind();
            return TickOutcome::Wrapped;
        }

        match self.phase() {
            Phase::Playing => {
                self.draw_frame(canvas);
                self.cursor += 1;
                TickOutcome::Drawn
            }
            Phase::WrapPending => {
                info!("replay of {} frames finished, starting over", self.trajectory.len());
                self.rewind();
                TickOutcome::Wrapped
            }
        }
    }

    fn rewind(&mut self) {
        self.cursor = 0;
        self.trail.clear();
    }

    fn draw_frame<C: Canvas>(&mut self, canvas: &mut C) {
        let state = self.trajectory.states()[self.cursor];
        let pivot = self.mapper.pivot();
        let (joint1, joint2) = self.mapper.joints(&state);
        let style = &self.style;

        canvas.draw_line(pivot, joint1, style.rod_thickness, style.rod_color);
        canvas.draw_line(joint1, joint2, style.rod_thickness, style.rod_color);

        self.trail.push(joint2);
        let n = self.trail.len().saturating_sub(1);
        for (i, (a, b)) in self.trail.segments().enumerate() {
            canvas.draw_line(a, b, style.trail_thickness, trail_color(style, i, n));
        }

        canvas.draw_disc(pivot, style.pivot_radius, style.pivot_color);
        canvas.draw_disc(joint1, self.params.m1 as f32 * style.disc_scale, style.mass1_color);
        canvas.draw_disc(joint2, self.params.m2 as f32 * style.disc_scale, style.mass2_color);
    }

    // text readout for the frame the last tick drew
    pub fn draw_overlay<C: Canvas>(&self, canvas: &mut C, fps: usize) {
        let shown = match self.cursor.checked_sub(1) {
            Some(i) => i,
            None => return,
        };
        let state = self.trajectory.states()[shown];
        let kinetic = kinetic_energy(&self.params, state);
        let potential = potential_energy(&self.params, state);

        let lines = [
            format!("Frame: {}/{}", shown + 1, self.trajectory.len()),
            format!("t = {:.2} s", self.trajectory.sample_time(shown)),
            format!("KE {:.0}  PE {:.0}  E {:.0}", kinetic, potential, kinetic + potential),
            format!("FPS: {}", fps),
            "R to restart, ESC to quit".to_string(),
        ];
        for (i, line) in lines.iter().enumerate() {
            let at = ScreenPoint::new(10, 20 + 20 * i as i32);
            canvas.draw_text(line, at, 20.0, self.style.text_color);
        }
    }
}

/// Drives the replay until quit is requested: tick, overlay, present, then
/// wait out the rest of the frame interval.
pub async fn run<C: Canvas, E: EventSource>(
    mut playback: PlaybackLoop,
    canvas: &mut C,
    events: &mut E,
    config: &PlaybackConfig,
) {
    let mut pacer = FramePacer::new(config.frame_interval_secs());
    let mut fps_counter = FPS::new(64);

    loop {
        pacer.begin_tick();
        let outcome = playback.tick(canvas, events);
        if outcome == TickOutcome::Terminated {
            info!("quit requested, stopping replay");
            return;
        }

        fps_counter.update();
        if outcome == TickOutcome::Drawn && config.show_overlay {
            playback.draw_overlay(canvas, fps_counter.fps());
        }

        next_frame().await;
        pacer.wait();
    }
}
