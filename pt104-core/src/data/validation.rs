//! Input validation for solver settings and channel assignments
//!
//! Configuration read from disk passes through these checks before it is
//! allowed near the scanner.

use std::collections::HashSet;

use crate::data::ChannelIndex;
use crate::error::{Pt104Error, Result};

/// Validates a Newton-Raphson step tolerance (finite and strictly positive)
pub fn validate_tolerance(tolerance: f64) -> Result<f64> {
    if !tolerance.is_finite() || tolerance <= 0.0 {
        return Err(Pt104Error::invalid_config(
            "solver.tolerance",
            format!("{} is not a positive finite number", tolerance),
        ));
    }
    Ok(tolerance)
}

/// Validates a Newton-Raphson iteration budget
pub fn validate_max_iterations(max_iterations: u32) -> Result<u32> {
    if max_iterations == 0 {
        return Err(Pt104Error::invalid_config(
            "solver.max_iterations",
            "must be at least 1",
        ));
    }
    Ok(max_iterations)
}

/// Validates a nominal sensor resistance in ohms
pub fn validate_reference_resistance(r0: f64) -> Result<f64> {
    if !r0.is_finite() || r0 <= 0.0 {
        return Err(Pt104Error::invalid_config(
            "r0",
            format!("{} is not a positive resistance", r0),
        ));
    }
    Ok(r0)
}

/// Validates a list of channel numbers: each within 1..=4, none repeated
pub fn validate_channel_assignments(numbers: &[u8]) -> Result<Vec<ChannelIndex>> {
    let mut seen = HashSet::new();
    let mut channels = Vec::with_capacity(numbers.len());

    for &number in numbers {
        let channel = ChannelIndex::new(number).map_err(|e| {
            Pt104Error::invalid_config("channels", e.to_string())
        })?;
        if !seen.insert(channel) {
            return Err(Pt104Error::invalid_config(
                "channels",
                format!("channel {} is configured more than once", number),
            ));
        }
        channels.push(channel);
    }

    Ok(channels)
}
