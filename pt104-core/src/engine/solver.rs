//! Callendar-Van Dusen temperature solver for platinum RTDs
//!
//! Converts between temperature and the normalized resistance ratio
//! `r(T) = R(T) / R0` of a PT100/PT1000 element.
//!
//! # How It Works
//!
//! 1. **Forward**: the characteristic curve is evaluated in closed form. Above
//!    0°C it is quadratic, below 0°C a quartic correction term is added.
//!
//! 2. **Inverse**: the curve has no convenient closed-form inverse below 0°C,
//!    so the temperature is found by Newton-Raphson iteration on
//!    `f(T) = r(T) - ratio`. The branch of `f'` follows the sign of the
//!    current iterate, the same boundary the forward curve uses.
//!
//! 3. **Seeding**: every converged temperature is cached and used as the
//!    starting point of the next solve. Successive readings of one sensor are
//!    close together, so this usually saves most iterations. A failed solve
//!    resets the seed to 0°C.

use tracing::trace;

use crate::constants::{cvd, solver as solver_const};
use crate::error::SolverError;

/// Normalized resistance ratio `R(T)/R0` at a temperature in °C
///
/// Total for every finite input; only [-200, 850]°C is physically meaningful.
pub fn resistance_ratio(temperature: f64) -> f64 {
    if temperature < 0.0 {
        lower_branch(temperature)
    } else {
        upper_branch(temperature)
    }
}

fn upper_branch(t: f64) -> f64 {
    1.0 + cvd::A * t + cvd::B * t * t
}

fn lower_branch(t: f64) -> f64 {
    upper_branch(t) + cvd::C * (t - 100.0) * t.powi(3)
}

/// Derivative of [`resistance_ratio`] with respect to temperature
fn slope(t: f64) -> f64 {
    let mut value = cvd::A + 2.0 * cvd::B * t;
    if t < 0.0 {
        value += cvd::C * (4.0 * t - 300.0) * t * t;
    }
    value
}

/// Result of a solve with its iteration statistics
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Solution {
    pub temperature: f64,
    /// Newton steps taken, including the converging one
    pub iterations: u32,
    /// Size of the final step (°C)
    pub last_step: f64,
}

/// Newton-Raphson inverse of the Callendar-Van Dusen equation
///
/// Holds its tolerance, iteration budget and the cached seed. The seed is
/// per-instance mutable state, so give every channel its own solver.
#[derive(Debug, Clone)]
pub struct TemperatureSolver {
    tolerance: f64,
    max_iterations: u32,
    seed: f64,
}

impl Default for TemperatureSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl TemperatureSolver {
    /// Create a solver with the default tolerance (1e-7) and budget (100)
    pub fn new() -> Self {
        Self {
            tolerance: solver_const::DEFAULT_TOLERANCE,
            max_iterations: solver_const::DEFAULT_MAX_ITERATIONS,
            seed: solver_const::DEFAULT_SEED,
        }
    }

    /// Set the convergence threshold on the step size (°C)
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Set the iteration budget
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    pub fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    /// Starting point of the next solve
    pub fn seed(&self) -> f64 {
        self.seed
    }

    pub fn reset_seed(&mut self) {
        self.seed = solver_const::DEFAULT_SEED;
    }

    /// Resistance in ohms of a sensor with nominal resistance `r0`
    pub fn resistance(temperature: f64, r0: f64) -> f64 {
        r0 * resistance_ratio(temperature)
    }

    /// Temperature for a normalized resistance ratio, seeded from the cache
    pub fn temperature_from_ratio(&mut self, ratio: f64) -> Result<f64, SolverError> {
        self.solve(ratio, self.tolerance, self.max_iterations, None)
            .map(|solution| solution.temperature)
    }

    /// Temperature for a measured resistance and a nominal resistance `r0`
    pub fn temperature_from_resistance(&mut self, ohms: f64, r0: f64) -> Result<f64, SolverError> {
        self.temperature_from_ratio(ohms / r0)
    }

    /// Run Newton-Raphson with explicit parameters
    ///
    /// `seed` overrides the cached starting point for this call only. On
    /// success the converged temperature becomes the new cached seed; on any
    /// failure the cache is reset to 0°C.
    pub fn solve(
        &mut self,
        ratio: f64,
        tolerance: f64,
        max_iterations: u32,
        seed: Option<f64>,
    ) -> Result<Solution, SolverError> {
        if !ratio.is_finite() {
            return Err(SolverError::InvalidRatio(ratio));
        }

        let mut temperature = seed.unwrap_or(self.seed);

        for iteration in 1..=max_iterations {
            let derivative = slope(temperature);
            if derivative.abs() < solver_const::DERIVATIVE_EPSILON {
                self.reset_seed();
                return Err(SolverError::DerivativeUnderflow { temperature, ratio });
            }

            let next = temperature - (resistance_ratio(temperature) - ratio) / derivative;
            if !next.is_finite() {
                break;
            }

            let step = next - temperature;
            trace!("ratio {} iteration {}: T = {} (step {})", ratio, iteration, next, step);

            if step.abs() < tolerance {
                self.seed = next;
                return Ok(Solution {
                    temperature: next,
                    iterations: iteration,
                    last_step: step,
                });
            }
            temperature = next;
        }

        self.reset_seed();
        Err(SolverError::DidNotConverge {
            ratio,
            iterations: max_iterations,
        })
    }
}
