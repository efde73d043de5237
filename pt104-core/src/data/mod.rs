//! Data types and validation modules
//!
//! Contains the device's vocabulary (sensor types, wiring, channel indices)
//! and the checks applied to user-provided settings.

mod types;
mod validation;

pub use types::{
    ChannelIndex, MainsFrequency, PhysicalValue, SensorType, UnitInfo, WireConfiguration,
};
pub use validation::{
    validate_channel_assignments, validate_max_iterations, validate_reference_resistance,
    validate_tolerance,
};
