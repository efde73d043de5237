//! PT-104 Core Library
//!
//! Acquisition and conversion logic for the PT-104 four-channel RTD data logger.
//!
//! # Features
//!
//! - **Temperature Solver**: Newton-Raphson inverse of the Callendar-Van Dusen
//!   equation for PT100/PT1000 elements, seeded from the previous reading
//! - **Channel Scanner**: Per-channel activation state and scan-cycle timing so
//!   every read returns a fresh conversion
//! - **Transport Abstraction**: The device is reached through [`DeviceTransport`];
//!   an in-process [`SimulatedTransport`] is included
//!
//! # Module Structure
//!
//! - `hw/` - Transport, clock, channel state and scanner
//! - `data/` - Sensor types, channel indices, validation
//! - `engine/` - Callendar-Van Dusen solver
//!
//! # Example
//!
//! ```
//! use pt104_core::{
//!     ChannelIndex, ChannelScanner, ManualClock, SensorType, SimulatedInput,
//!     SimulatedTransport, WireConfiguration,
//! };
//!
//! let ch1 = ChannelIndex::new(1).unwrap();
//! let transport = SimulatedTransport::new().with_input(ch1, SimulatedInput::Temperature(21.0));
//! let mut scanner = ChannelScanner::with_clock(transport, ManualClock::new());
//!
//! scanner.configure(ch1, SensorType::Pt100, WireConfiguration::FourWire);
//! scanner.activate(ch1).unwrap();
//! let reading = scanner.read(ch1).unwrap();
//! assert!((reading.value - 21.0).abs() < 0.01);
//! ```

// Grouped modules
pub mod data;
pub mod engine;
pub mod hw;

// Standalone modules
pub mod constants;
pub mod display;
pub mod error;

// Re-export primary types from data/
pub use data::{
    ChannelIndex, MainsFrequency, PhysicalValue, SensorType, UnitInfo, WireConfiguration,
};

// Re-export validation functions from data/
pub use data::{
    validate_channel_assignments, validate_max_iterations, validate_reference_resistance,
    validate_tolerance,
};

// Re-export error types
pub use error::{ChannelError, Pt104Error, ReadError, Result, SolverError, TransportError};

// Re-export engine types
pub use engine::{resistance_ratio, Solution, TemperatureSolver};

// Re-export hardware types from hw/
pub use hw::{
    CallLog, Channel, ChannelScanner, ChannelState, Clock, DeviceTransport, ManualClock,
    MonotonicClock, SimulatedInput, SimulatedTransport, TransportCall,
};

// Re-export display formatting functions
pub use display::{
    celsius_to_fahrenheit, celsius_to_kelvin, format_temperature, format_value, TemperatureUnit,
};
