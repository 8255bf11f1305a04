// dynamics.rs
//
// equations of motion of the double pendulum
// https://en.wikipedia.org/wiki/Double_pendulum
// https://www.myphysicslab.com/pendulum/double-pendulum-en.html

use macroquad::math::DVec4;

use crate::config::Parameters;

/// Instantaneous configuration of the pendulum.
///
/// Angles are measured from the downward vertical in radians, angular
/// velocities in radians per second.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct State {
    pub theta1: f64,
    pub omega1: f64,
    pub theta2: f64,
    pub omega2: f64,
}

impl State {
    pub const REST: State = State { theta1: 0.0, omega1: 0.0, theta2: 0.0, omega2: 0.0 };

    pub fn new(theta1: f64, omega1: f64, theta2: f64, omega2: f64) -> State {
        State { theta1, omega1, theta2, omega2 }
    }

    pub fn is_finite(&self) -> bool {
        self.theta1.is_finite()
            && self.omega1.is_finite()
            && self.theta2.is_finite()
            && self.omega2.is_finite()
    }

    pub fn to_array(self) -> [f64; 4] {
        [self.theta1, self.omega1, self.theta2, self.omega2]
    }
}

// x, y, z, w = theta1, omega1, theta2, omega2
impl From<DVec4> for State {
    fn from(v: DVec4) -> State {
        State::new(v.x, v.y, v.z, v.w)
    }
}

impl From<State> for DVec4 {
    fn from(s: State) -> DVec4 {
        DVec4::new(s.theta1, s.omega1, s.theta2, s.omega2)
    }
}

/// Time derivative `(omega1, alpha1, omega2, alpha2)` of `state`.
///
/// Both accelerations share the denominator `2*m1 + m2 - m2*cos(2*(theta1 - theta2))`.
/// It is bounded below by `2*m1`, so it only vanishes for a massless inner
/// bob. Config validation rejects `m1 <= 0`, nothing here guards against it.
pub fn derivative(p: &Parameters, state: State) -> State {
    let State { theta1, omega1, theta2, omega2 } = state;
    let (g, l1, l2, m1, m2) = (p.g, p.l1, p.l2, p.m1, p.m2);

    let delta = theta1 - theta2;
    let (sin_d, cos_d) = delta.sin_cos();
    let den = 2.0 * m1 + m2 - m2 * (2.0 * delta).cos();

    let alpha1 = (-g * (2.0 * m1 + m2) * theta1.sin()
        - m2 * g * (theta1 - 2.0 * theta2).sin()
        - 2.0 * sin_d * m2 * (omega2 * omega2 * l2 + omega1 * omega1 * l1 * cos_d))
        / (l1 * den);

    let alpha2 = (2.0
        * sin_d
        * (omega1 * omega1 * l1 * (m1 + m2)
            + g * (m1 + m2) * theta1.cos()
            + omega2 * omega2 * l2 * m2 * cos_d))
        / (l2 * den);

    State::new(omega1, alpha1, omega2, alpha2)
}

// same as derivative, in the vector form the integrator works with
pub fn derivative_vec(p: &Parameters, y: DVec4) -> DVec4 {
    derivative(p, State::from(y)).into()
}

pub fn kinetic_energy(p: &Parameters, s: State) -> f64 {
    let v1 = p.l1 * s.omega1;
    let v2 = p.l2 * s.omega2;
    0.5 * p.m1 * v1 * v1
        + 0.5 * p.m2 * (v1 * v1 + v2 * v2 + 2.0 * v1 * v2 * (s.theta1 - s.theta2).cos())
}

// zero at the pivot, y grows downward so hanging masses sit below zero
pub fn potential_energy(p: &Parameters, s: State) -> f64 {
    -(p.m1 + p.m2) * p.g * p.l1 * s.theta1.cos() - p.m2 * p.g * p.l2 * s.theta2.cos()
}

/// Total mechanical energy. Conserved by the exact dynamics, so its drift
/// measures integrator error.
pub fn energy(p: &Parameters, s: State) -> f64 {
    kinetic_energy(p, s) + potential_energy(p, s)
}
