// fps.rs
//
// frame pacing for the replay and the frame rate readout

use std::collections::VecDeque;
use std::thread;
use std::time::{Duration, Instant};

// keeps every tick at least `interval` long, measured from when the tick began
// so the replay runs at the same speed regardless of how fast the host draws
pub struct FramePacer {
    interval: Duration,
    tick_start: Instant,
}

impl FramePacer {
    pub fn new(interval_secs: f64) -> FramePacer {
        FramePacer { interval: Duration::from_secs_f64(interval_secs), tick_start: Instant::now() }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn begin_tick(&mut self) {
        self.tick_start = Instant::now();
    }

    // time left in the current tick
    pub fn remaining(&self) -> Duration {
        self.interval.saturating_sub(self.tick_start.elapsed())
    }

    // blocks until the interval has passed since begin_tick
    // not interruptible, quit is only checked at the top of the next tick
    pub fn wait(&mut self) {
        let left = self.remaining();
        if !left.is_zero() {
            thread::sleep(left);
        }
    }
}

// FPS counter struct
pub struct FPS {
    frame_times: VecDeque<Instant>,
    max_frames: usize,
    frame: usize,
}

impl FPS {
    pub fn new(max_frames: usize) -> FPS {
        FPS { frame_times: VecDeque::with_capacity(max_frames + 1), max_frames: max_frames.max(2), frame: 0 }
    }

    // add the current frame time and remove the oldest frame if there are
    // too many
    // should be called every frame as well as before fps
    pub fn update(&mut self) {
        self.record(Instant::now());
    }

    fn record(&mut self, at: Instant) {
        self.frame_times.push_back(at);
        if self.frame_times.len() > self.max_frames {
            self.frame_times.pop_front();
        }
        self.frame += 1;
    }

    // frames per second over the window, counting the intervals between
    // the oldest and newest recorded frame
    pub fn fps(&self) -> usize {
        match (self.frame_times.front(), self.frame_times.back()) {
            (Some(first), Some(last)) if self.frame_times.len() >= 2 => {
                let diff = last.duration_since(*first).as_secs_f64();
                if diff == 0.0 {
                    0
                } else {
                    ((self.frame_times.len() - 1) as f64 / diff).round() as usize
                }
            }
            _ => 0,
        }
    }

    // returns the current frame
    pub fn frame(&self) -> usize {
        self.frame
    }
}
