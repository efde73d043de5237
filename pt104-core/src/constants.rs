//! Constants and configuration values for the PT-104 toolkit
//!
//! Centralizes all magic numbers: Callendar-Van Dusen coefficients, solver
//! defaults, scan-cycle timing, and device limits.

use std::time::Duration;

/// Callendar-Van Dusen coefficients (IEC 60751 platinum, alpha = 0.00385)
pub mod cvd {
    /// Linear coefficient
    pub const A: f64 = 3.9083e-3;

    /// Quadratic coefficient
    pub const B: f64 = -5.7750e-7;

    /// Quartic coefficient, only applied below 0°C
    pub const C: f64 = -4.1830e-12;

    /// Nominal PT100 resistance at 0°C (ohms)
    pub const PT100_R0: f64 = 100.0;

    /// Nominal PT1000 resistance at 0°C (ohms)
    pub const PT1000_R0: f64 = 1000.0;

    /// Lower end of the physically meaningful sensor range (°C)
    pub const MIN_TEMPERATURE: f64 = -200.0;

    /// Upper end of the physically meaningful sensor range (°C)
    pub const MAX_TEMPERATURE: f64 = 850.0;
}

/// Newton-Raphson defaults
pub mod solver {
    /// Convergence threshold on the step size (°C)
    pub const DEFAULT_TOLERANCE: f64 = 1e-7;

    /// Iteration budget before giving up
    pub const DEFAULT_MAX_ITERATIONS: u32 = 100;

    /// Starting point when no previous solution is cached
    pub const DEFAULT_SEED: f64 = 0.0;

    /// Derivatives with a smaller magnitude are treated as degenerate
    pub const DERIVATIVE_EPSILON: f64 = 1e-12;
}

/// Device limits
pub mod device {
    /// First channel index
    pub const FIRST_CHANNEL: u8 = 1;

    /// Number of measurement channels on a PT-104
    pub const CHANNEL_COUNT: u8 = 4;
}

/// Scan-cycle timing
///
/// The device converts active channels round-robin through a single ADC, so
/// every delay below scales with the number of active channels.
pub mod timing {
    use super::*;

    /// Minimum settle time after (re)configuring a channel
    pub const ACTIVATION_MIN_SETTLE: Duration = Duration::from_millis(3000);

    /// Settle time contributed by each active channel after (re)configuration
    pub const ACTIVATION_PER_CHANNEL: Duration = Duration::from_millis(1700);

    /// Steady-state conversion time per active channel
    pub const CONVERSION_PER_CHANNEL: Duration = Duration::from_millis(750);

    /// Delay before the first read after activation
    pub fn activation_delay(active_channels: usize) -> Duration {
        ACTIVATION_MIN_SETTLE.max(ACTIVATION_PER_CHANNEL * active_channels as u32)
    }

    /// Delay between consecutive reads of the same channel
    pub fn conversion_interval(active_channels: usize) -> Duration {
        CONVERSION_PER_CHANNEL * active_channels as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activation_delay_has_floor() {
        assert_eq!(timing::activation_delay(0), Duration::from_secs(3));
        assert_eq!(timing::activation_delay(1), Duration::from_secs(3));
        assert_eq!(timing::activation_delay(2), Duration::from_millis(3400));
    }

    #[test]
    fn test_activation_delay_scales_with_channels() {
        assert_eq!(timing::activation_delay(4), Duration::from_millis(6800));
        assert_eq!(timing::activation_delay(3), Duration::from_millis(5100));
    }

    #[test]
    fn test_conversion_interval() {
        assert_eq!(timing::conversion_interval(1), Duration::from_millis(750));
        assert_eq!(timing::conversion_interval(2), Duration::from_millis(1500));
        assert_eq!(timing::conversion_interval(4), Duration::from_secs(3));
    }
}
