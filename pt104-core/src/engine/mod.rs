//! Conversion engine modules
//!
//! Contains the Callendar-Van Dusen temperature solver.

mod solver;

pub use solver::{resistance_ratio, Solution, TemperatureSolver};
