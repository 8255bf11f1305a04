// integrator.rs
//
// adaptive Dormand-Prince 5(4) with dense output, used once at startup to
// precompute the whole trajectory on a fixed sample grid
// https://en.wikipedia.org/wiki/Dormand%E2%80%93Prince_method
// Hairer, Norsett & Wanner, Solving Ordinary Differential Equations I, II.4-II.6

use log::{debug, info};
use macroquad::math::DVec4;

use crate::config::{Parameters, TimeSpan, Tolerances};
use crate::dynamics::{derivative_vec, State};
use crate::error::{DivergenceReason, Result, SimError};

// nodes
const C2: f64 = 1.0 / 5.0;
const C3: f64 = 3.0 / 10.0;
const C4: f64 = 4.0 / 5.0;
const C5: f64 = 8.0 / 9.0;

// stage coefficients
const A21: f64 = 1.0 / 5.0;
const A31: f64 = 3.0 / 40.0;
const A32: f64 = 9.0 / 40.0;
const A41: f64 = 44.0 / 45.0;
const A42: f64 = -56.0 / 15.0;
const A43: f64 = 32.0 / 9.0;
const A51: f64 = 19372.0 / 6561.0;
const A52: f64 = -25360.0 / 2187.0;
const A53: f64 = 64448.0 / 6561.0;
const A54: f64 = -212.0 / 729.0;
const A61: f64 = 9017.0 / 3168.0;
const A62: f64 = -355.0 / 33.0;
const A63: f64 = 46732.0 / 5247.0;
const A64: f64 = 49.0 / 176.0;
const A65: f64 = -5103.0 / 18656.0;

// fifth order weights, the last stage is evaluated at the new point (FSAL)
const B1: f64 = 35.0 / 384.0;
const B3: f64 = 500.0 / 1113.0;
const B4: f64 = 125.0 / 192.0;
const B5: f64 = -2187.0 / 6784.0;
const B6: f64 = 11.0 / 84.0;

// difference between the fifth and fourth order weights
const E1: f64 = -71.0 / 57600.0;
const E3: f64 = 71.0 / 16695.0;
const E4: f64 = -71.0 / 1920.0;
const E5: f64 = 17253.0 / 339200.0;
const E6: f64 = -22.0 / 525.0;
const E7: f64 = 1.0 / 40.0;

// quartic continuous extension, row j gives the coefficients of x, x^2, x^3, x^4
// for stage j (stage 2 does not contribute)
const DENSE: [[f64; 4]; 7] = [
    [
        1.0,
        -8048581381.0 / 2820520608.0,
        8663915743.0 / 2820520608.0,
        -12715105075.0 / 11282082432.0,
    ],
    [0.0, 0.0, 0.0, 0.0],
    [
        0.0,
        131558114200.0 / 32700410799.0,
        -68118460800.0 / 10900136933.0,
        87487479700.0 / 32700410799.0,
    ],
    [
        0.0,
        -1754552775.0 / 470086768.0,
        14199869525.0 / 1410260304.0,
        -10690763975.0 / 1880347072.0,
    ],
    [
        0.0,
        127303824393.0 / 49829197408.0,
        -318862633887.0 / 49829197408.0,
        701980252875.0 / 199316789632.0,
    ],
    [
        0.0,
        -282668133.0 / 205662961.0,
        2019193451.0 / 616988883.0,
        -1453857185.0 / 822651844.0,
    ],
    [
        0.0,
        40617522.0 / 29380423.0,
        -110615467.0 / 29380423.0,
        69997945.0 / 29380423.0,
    ],
];

// step size controller
const SAFETY: f64 = 0.9;
const MIN_FACTOR: f64 = 0.2;
const MAX_FACTOR: f64 = 10.0;
// 1 / (order of the error estimate + 1)
const EXPONENT: f64 = 1.0 / 5.0;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Stats {
    pub fn_evals: u64,
    pub accepted: u64,
    pub rejected: u64,
}

// one accepted step, enough to interpolate anywhere inside it
struct Step {
    t: f64,
    h: f64,
    y: DVec4,
    k: [DVec4; 7],
}

impl Step {
    fn interpolate(&self, t: f64) -> DVec4 {
        let x = (t - self.t) / self.h;
        let powers = [x, x * x, x * x * x, x * x * x * x];

        let mut acc = DVec4::ZERO;
        for (k, row) in self.k.iter().zip(DENSE.iter()) {
            let q: f64 = row.iter().zip(powers.iter()).map(|(c, p)| c * p).sum();
            acc += q * *k;
        }
        self.y + self.h * acc
    }
}

pub struct DormandPrince {
    tol: Tolerances,
    pub stats: Stats,
}

impl DormandPrince {
    pub fn new(tol: Tolerances) -> DormandPrince {
        DormandPrince { tol, stats: Stats::default() }
    }

    // rms of v measured against the mixed absolute/relative scale
    fn norm(&self, v: DVec4, scale: DVec4) -> f64 {
        let r = v / scale;
        (r.dot(r) / 4.0).sqrt()
    }

    fn scale(&self, a: DVec4, b: DVec4) -> DVec4 {
        DVec4::splat(self.tol.atol) + self.tol.rtol * a.abs().max(b.abs())
    }

    // starting step from the local behaviour of f, see Hairer I, II.4
    fn initial_step<F>(&mut self, f: &F, t0: f64, y0: DVec4, f0: DVec4, h_max: f64) -> f64
    where
        F: Fn(f64, DVec4) -> DVec4,
    {
        let scale = self.scale(y0, y0);
        let d0 = self.norm(y0, scale);
        let d1 = self.norm(f0, scale);
        let h0 = if d0 < 1e-5 || d1 < 1e-5 { 1e-6 } else { 0.01 * d0 / d1 };
        let h0 = h0.min(h_max);

        let f1 = f(t0 + h0, y0 + h0 * f0);
        self.stats.fn_evals += 1;
        let d2 = self.norm(f1 - f0, scale) / h0;

        let h1 = if d1.max(d2) <= 1e-15 {
            (h0 * 1e-3).max(1e-6)
        } else {
            (0.01 / d1.max(d2)).powf(EXPONENT)
        };

        (100.0 * h0).min(h1).min(h_max)
    }

    /// Integrates `y' = f(t, y)` from `(t0, y0)` up to the last entry of
    /// `sample_times` and returns the solution at every sample time.
    ///
    /// `sample_times` must be sorted ascending and start no earlier than `t0`.
    /// Samples falling inside an accepted step are filled in from the
    /// continuous extension, so the grid never constrains the step size.
    pub fn solve_dense<F>(&mut self, f: F, t0: f64, y0: DVec4, sample_times: &[f64]) -> Result<Vec<DVec4>>
    where
        F: Fn(f64, DVec4) -> DVec4,
    {
        let mut out = Vec::with_capacity(sample_times.len());
        let t_end = match sample_times.last() {
            Some(&t) => t,
            None => return Ok(out),
        };

        if !y0.is_finite() {
            return Err(SimError::divergence(t0, DivergenceReason::NonFinite));
        }

        let mut next = 0;
        while next < sample_times.len() && sample_times[next] <= t0 {
            out.push(y0);
            next += 1;
        }

        let mut t = t0;
        let mut y = y0;
        let mut k1 = f(t, y);
        self.stats.fn_evals += 1;
        if !k1.is_finite() {
            return Err(SimError::divergence(t, DivergenceReason::NonFinite));
        }

        let span = t_end - t0;
        let mut h = if span > 0.0 { self.initial_step(&f, t, y, k1, span) } else { 0.0 };
        let mut steps = 0u64;

        while t < t_end {
            steps += 1;
            if steps > self.tol.max_steps {
                return Err(SimError::divergence(
                    t,
                    DivergenceReason::StepBudgetExhausted { max_steps: self.tol.max_steps },
                ));
            }

            let h_min = 16.0 * f64::EPSILON * t.abs().max(1.0);
            if h < h_min {
                return Err(SimError::divergence(
                    t,
                    DivergenceReason::StepSizeCollapse { h, h_min },
                ));
            }

            let last = t + h >= t_end;
            if last {
                h = t_end - t;
            }

            let k2 = f(t + C2 * h, y + h * (A21 * k1));
            let k3 = f(t + C3 * h, y + h * (A31 * k1 + A32 * k2));
            let k4 = f(t + C4 * h, y + h * (A41 * k1 + A42 * k2 + A43 * k3));
            let k5 = f(t + C5 * h, y + h * (A51 * k1 + A52 * k2 + A53 * k3 + A54 * k4));
            let k6 = f(t + h, y + h * (A61 * k1 + A62 * k2 + A63 * k3 + A64 * k4 + A65 * k5));
            let y_new = y + h * (B1 * k1 + B3 * k3 + B4 * k4 + B5 * k5 + B6 * k6);
            let t_new = if last { t_end } else { t + h };
            let k7 = f(t_new, y_new);
            self.stats.fn_evals += 6;

            if !y_new.is_finite() || !k7.is_finite() {
                return Err(SimError::divergence(t_new, DivergenceReason::NonFinite));
            }

            let err = h * (E1 * k1 + E3 * k3 + E4 * k4 + E5 * k5 + E6 * k6 + E7 * k7);
            let err_norm = self.norm(err, self.scale(y, y_new));

            if err_norm > 1.0 {
                self.stats.rejected += 1;
                h *= (SAFETY * err_norm.powf(-EXPONENT)).max(MIN_FACTOR);
                continue;
            }
            self.stats.accepted += 1;

            let step = Step { t, h, y, k: [k1, k2, k3, k4, k5, k6, k7] };
            while next < sample_times.len() && sample_times[next] <= t_new {
                let ts = sample_times[next];
                let ys = if ts == t_new { y_new } else { step.interpolate(ts) };
                if !ys.is_finite() {
                    return Err(SimError::divergence(ts, DivergenceReason::NonFinite));
                }
                out.push(ys);
                next += 1;
            }

            let factor = if err_norm == 0.0 {
                MAX_FACTOR
            } else {
                (SAFETY * err_norm.powf(-EXPONENT)).clamp(MIN_FACTOR, MAX_FACTOR)
            };

            t = t_new;
            y = y_new;
            k1 = k7;
            h *= factor;
        }

        Ok(out)
    }
}

/// The precomputed motion: one state per evenly spaced sample time over
/// `[0, span.t_end]`. Never modified after integration.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    states: Vec<State>,
    span: TimeSpan,
}

impl Trajectory {
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn get(&self, i: usize) -> Option<&State> {
        self.states.get(i)
    }

    pub fn states(&self) -> &[State] {
        &self.states
    }

    pub fn span(&self) -> TimeSpan {
        self.span
    }

    pub fn sample_time(&self, i: usize) -> f64 {
        self.span.sample_time(i)
    }
}

/// Integrates the pendulum from `initial` and samples it `span.samples`
/// times over `[0, span.t_end]`.
pub fn integrate(p: &Parameters, initial: State, span: TimeSpan, tol: &Tolerances) -> Result<Trajectory> {
    let times = span.sample_times();
    let mut solver = DormandPrince::new(*tol);
    let ys = solver.solve_dense(|_t, y| derivative_vec(p, y), 0.0, initial.into(), &times)?;

    let stats = solver.stats;
    info!(
        "integrated {} samples over {} s: {} steps accepted, {} rejected, {} evaluations",
        ys.len(),
        span.t_end,
        stats.accepted,
        stats.rejected,
        stats.fn_evals
    );
    if stats.rejected > stats.accepted / 2 {
        debug!("high rejection rate, rtol = {:e}, atol = {:e}", tol.rtol, tol.atol);
    }

    Ok(Trajectory { states: ys.into_iter().map(State::from).collect(), span })
}
