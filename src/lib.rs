// lib.rs
//
// double pendulum: integrate once up front, then replay the motion with a
// fading trail behind the outer mass

pub mod config;
pub mod dynamics;
pub mod error;
pub mod fps;
pub mod integrator;
pub mod mapper;
pub mod playback;
pub mod render;
pub mod trail;

pub use config::{Parameters, SimConfig, TimeSpan, Tolerances};
pub use dynamics::State;
pub use error::{DivergenceReason, Result, SimError};
pub use integrator::{integrate, Trajectory};
pub use mapper::CoordinateMapper;
pub use playback::{Phase, PlaybackLoop, TickOutcome};
pub use render::{Canvas, EventSource, ScreenPoint};
pub use trail::TrailBuffer;
