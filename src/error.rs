// error.rs

use std::fmt;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SimError>;

// everything that can stop the program before or at startup
// none of these are recoverable, main logs them and exits
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("integration diverged at t = {t:.6} s: {reason}")]
    IntegrationDivergence { t: f64, reason: DivergenceReason },

    #[error("could not create a {width}x{height} drawing surface: {reason}")]
    SurfaceCreationFailure { width: u32, height: u32, reason: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

// why the integrator gave up
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DivergenceReason {
    // the step size needed to meet tolerance fell below the floor
    StepSizeCollapse { h: f64, h_min: f64 },
    StepBudgetExhausted { max_steps: u64 },
    NonFinite,
}

impl fmt::Display for DivergenceReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DivergenceReason::StepSizeCollapse { h, h_min } => {
                write!(f, "step size {:e} fell below minimum {:e}", h, h_min)
            }
            DivergenceReason::StepBudgetExhausted { max_steps } => {
                write!(f, "exceeded the budget of {} steps", max_steps)
            }
            DivergenceReason::NonFinite => write!(f, "state became NaN or infinite"),
        }
    }
}

impl SimError {
    pub fn divergence(t: f64, reason: DivergenceReason) -> SimError {
        SimError::IntegrationDivergence { t, reason }
    }

    pub fn invalid(msg: impl Into<String>) -> SimError {
        SimError::InvalidConfig(msg.into())
    }
}
