// mapper.rs

use crate::config::Parameters;
use crate::dynamics::State;
use crate::render::ScreenPoint;

// turns pendulum angles into joint positions, first in world units relative
// to the pivot, then in pixels
// x grows to the right and y grows downward, so an angle of zero hangs straight down
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateMapper {
    l1: f64,
    l2: f64,
    scale: f64,
    origin: (f64, f64),
}

impl CoordinateMapper {
    pub fn new(params: &Parameters, scale: f64, origin: (f64, f64)) -> CoordinateMapper {
        CoordinateMapper { l1: params.l1, l2: params.l2, scale, origin }
    }

    // pivot in the horizontal middle, a quarter of the way down
    pub fn for_surface(params: &Parameters, scale: f64, width: u32, height: u32) -> CoordinateMapper {
        CoordinateMapper::new(params, scale, (width as f64 / 2.0, height as f64 / 4.0))
    }

    // returns (x1, y1, x2, y2)
    pub fn polar_to_cartesian(&self, theta1: f64, theta2: f64) -> (f64, f64, f64, f64) {
        let x1 = self.l1 * theta1.sin();
        let y1 = self.l1 * theta1.cos();
        let x2 = x1 + self.l2 * theta2.sin();
        let y2 = y1 + self.l2 * theta2.cos();
        (x1, y1, x2, y2)
    }

    // no clipping, points off the surface are left for the renderer to deal with
    pub fn world_to_screen(&self, x: f64, y: f64) -> ScreenPoint {
        ScreenPoint::new(
            (self.origin.0 + self.scale * x).round() as i32,
            (self.origin.1 + self.scale * y).round() as i32,
        )
    }

    pub fn pivot(&self) -> ScreenPoint {
        self.world_to_screen(0.0, 0.0)
    }

    pub fn joints(&self, state: &State) -> (ScreenPoint, ScreenPoint) {
        let (x1, y1, x2, y2) = self.polar_to_cartesian(state.theta1, state.theta2);
        (self.world_to_screen(x1, y1), self.world_to_screen(x2, y2))
    }
}
