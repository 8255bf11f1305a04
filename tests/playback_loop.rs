// drives the replay headless through a recording canvas

use std::collections::VecDeque;

use chaos_replay::config::{SimConfig, TimeSpan};
use chaos_replay::{integrate, Canvas, EventSource, Phase, PlaybackLoop, ScreenPoint, TickOutcome};
use macroquad::color::Color;

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Clear,
    Line(ScreenPoint, ScreenPoint),
    Disc(ScreenPoint, f32),
    Text(String),
}

#[derive(Default)]
struct Recorder {
    calls: Vec<Call>,
}

impl Recorder {
    fn take(&mut self) -> Vec<Call> {
        std::mem::take(&mut self.calls)
    }
}

impl Canvas for Recorder {
    fn clear(&mut self, _color: Color) {
        self.calls.push(Call::Clear);
    }
    fn draw_line(&mut self, from: ScreenPoint, to: ScreenPoint, _thickness: f32, _color: Color) {
        self.calls.push(Call::Line(from, to));
    }
    fn draw_disc(&mut self, center: ScreenPoint, radius: f32, _color: Color) {
        self.calls.push(Call::Disc(center, radius));
    }
    fn draw_text(&mut self, text: &str, _at: ScreenPoint, _size: f32, _color: Color) {
        self.calls.push(Call::Text(text.to_string()));
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Input {
    Nothing,
    Quit,
    Restart,
}

// hands out one scripted input per tick, then nothing
#[derive(Default)]
struct Script {
    inputs: VecDeque<Input>,
    current: Option<Input>,
}

impl Script {
    fn new(inputs: &[Input]) -> Script {
        Script { inputs: inputs.iter().copied().collect(), current: None }
    }
}

impl EventSource for Script {
    fn quit_requested(&mut self) -> bool {
        self.current = self.inputs.pop_front();
        self.current == Some(Input::Quit)
    }

    fn restart_requested(&mut self) -> bool {
        self.current == Some(Input::Restart)
    }
}

fn config(samples: usize, trail_len: usize) -> SimConfig {
    let mut config = SimConfig::default();
    config.span = TimeSpan { t_end: 2.0, samples };
    config.playback.trail_len = trail_len;
    config
}

fn player(config: &SimConfig) -> PlaybackLoop {
    let trajectory = integrate(&config.params, config.initial, config.span, &config.tolerances).unwrap();
    PlaybackLoop::from_config(config, trajectory, config.window.width, config.window.height)
}

#[test]
fn wraps_after_the_last_sample() {
    let config = config(30, 500);
    let mut p = player(&config);
    let mut canvas = Recorder::default();
    let mut events = Script::default();

    for _ in 0..30 {
        assert_eq!(p.tick(&mut canvas, &mut events), TickOutcome::Drawn);
    }
    assert_eq!(p.cursor(), 30);
    assert_eq!(p.phase(), Phase::WrapPending);
    assert_eq!(p.trail().len(), 30);

    canvas.take();
    assert_eq!(p.tick(&mut canvas, &mut events), TickOutcome::Wrapped);
    assert_eq!(p.cursor(), 0);
    assert!(p.trail().is_empty());
    // the reset frame is cleared and left blank
    assert_eq!(canvas.take(), vec![Call::Clear]);
}

#[test]
fn draws_a_fresh_trail_after_wrapping() {
    let config = config(12, 500);
    let mut p = player(&config);
    let mut canvas = Recorder::default();
    let mut events = Script::default();

    for _ in 0..13 {
        p.tick(&mut canvas, &mut events);
    }
    assert_eq!(p.cursor(), 0);

    canvas.take();
    assert_eq!(p.tick(&mut canvas, &mut events), TickOutcome::Drawn);
    assert_eq!(p.trail().len(), 1);
    assert_eq!(p.cursor(), 1);

    // the first sample again: two rods, no trail segments, three discs
    let calls = canvas.take();
    assert_eq!(calls.iter().filter(|c| matches!(c, Call::Line(..))).count(), 2);
    assert_eq!(calls.iter().filter(|c| matches!(c, Call::Disc(..))).count(), 3);
}

#[test]
fn replays_identically_on_every_pass() {
    let config = config(8, 500);
    let mut p = player(&config);
    let mut canvas = Recorder::default();
    let mut events = Script::default();

    for _ in 0..8 {
        p.tick(&mut canvas, &mut events);
    }
    let first_pass = canvas.take();
    p.tick(&mut canvas, &mut events);
    canvas.take();
    for _ in 0..8 {
        p.tick(&mut canvas, &mut events);
    }
    assert_eq!(canvas.take(), first_pass);
}

#[test]
fn trail_stays_bounded_across_passes() {
    let config = config(25, 7);
    let mut p = player(&config);
    let mut canvas = Recorder::default();
    let mut events = Script::default();

    for _ in 0..100 {
        let outcome = p.tick(&mut canvas, &mut events);
        assert!(p.trail().len() <= 7);
        if outcome == TickOutcome::Wrapped {
            assert_eq!(p.trail().len(), 0);
        }
    }
}

#[test]
fn first_frame_geometry() {
    let config = config(4, 500);
    let mut p = player(&config);
    let mut canvas = Recorder::default();
    let mut events = Script::default();
    p.tick(&mut canvas, &mut events);

    // both arms start horizontal, to the right of the pivot at (400, 150)
    let pivot = ScreenPoint::new(400, 150);
    let joint1 = ScreenPoint::new(550, 150);
    let joint2 = ScreenPoint::new(670, 150);
    assert_eq!(
        canvas.take(),
        vec![
            Call::Clear,
            Call::Line(pivot, joint1),
            Call::Line(joint1, joint2),
            Call::Disc(pivot, 5.0),
            Call::Disc(joint1, 10.0),
            Call::Disc(joint2, 10.0),
        ]
    );
}

#[test]
fn quit_stops_before_drawing() {
    let config = config(10, 500);
    let mut p = player(&config);
    let mut canvas = Recorder::default();
    let mut events = Script::new(&[Input::Nothing, Input::Nothing, Input::Quit]);

    assert_eq!(p.tick(&mut canvas, &mut events), TickOutcome::Drawn);
    assert_eq!(p.tick(&mut canvas, &mut events), TickOutcome::Drawn);
    canvas.take();
    assert_eq!(p.tick(&mut canvas, &mut events), TickOutcome::Terminated);
    assert!(canvas.take().is_empty());
    assert_eq!(p.cursor(), 2);
}

#[test]
fn restart_resets_like_a_wrap() {
    let config = config(10, 500);
    let mut p = player(&config);
    let mut canvas = Recorder::default();
    let mut events = Script::new(&[Input::Nothing, Input::Nothing, Input::Nothing, Input::Restart]);

    for _ in 0..3 {
        p.tick(&mut canvas, &mut events);
    }
    assert_eq!(p.trail().len(), 3);

    canvas.take();
    assert_eq!(p.tick(&mut canvas, &mut events), TickOutcome::Wrapped);
    assert_eq!(p.cursor(), 0);
    assert!(p.trail().is_empty());
    assert_eq!(canvas.take(), vec![Call::Clear]);
}

#[test]
fn overlay_reports_the_drawn_frame() {
    let config = config(10, 500);
    let mut p = player(&config);
    let mut canvas = Recorder::default();
    let mut events = Script::default();

    p.tick(&mut canvas, &mut events);
    canvas.take();
    p.draw_overlay(&mut canvas, 60);

    let texts: Vec<String> = canvas
        .take()
        .into_iter()
        .filter_map(|c| match c {
            Call::Text(t) => Some(t),
            _ => None,
        })
        .collect();
    assert_eq!(texts[0], "Frame: 1/10");
    assert_eq!(texts[1], "t = 0.00 s");
    assert_eq!(texts[3], "FPS: 60");
}
