//! Per-channel configuration and acquisition state
//!
//! A channel moves `Inactive -> Activating -> Active`. Activation starts the
//! settle timer; the first successful read moves it to `Active`;
//! deactivation returns it to `Inactive` from either state.

use std::time::Instant;

use serde::Serialize;

use crate::data::{ChannelIndex, SensorType, WireConfiguration};
use crate::engine::TemperatureSolver;
use crate::error::SolverError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelState {
    Inactive,
    /// Configured on the device, waiting for its first conversion
    Activating,
    Active,
}

#[derive(Debug, Clone)]
pub struct Channel {
    index: ChannelIndex,
    sensor_type: SensorType,
    /// Sensor type the device is converting with; set on activation
    device_sensor_type: SensorType,
    wiring: WireConfiguration,
    low_pass_filter: bool,
    state: ChannelState,
    next_eligible_read_time: Option<Instant>,
    solver: TemperatureSolver,
}

impl Channel {
    pub(crate) fn new(index: ChannelIndex, solver: TemperatureSolver) -> Self {
        Self {
            index,
            sensor_type: SensorType::Off,
            device_sensor_type: SensorType::Off,
            wiring: WireConfiguration::default(),
            low_pass_filter: false,
            state: ChannelState::Inactive,
            next_eligible_read_time: None,
            solver,
        }
    }

    pub fn index(&self) -> ChannelIndex {
        self.index
    }

    pub fn sensor_type(&self) -> SensorType {
        self.sensor_type
    }

    /// Sensor type last sent to the device; `Off` while inactive
    pub fn device_sensor_type(&self) -> SensorType {
        self.device_sensor_type
    }

    pub fn wiring(&self) -> WireConfiguration {
        self.wiring
    }

    pub fn low_pass_filter(&self) -> bool {
        self.low_pass_filter
    }

    pub fn state(&self) -> ChannelState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state != ChannelState::Inactive
    }

    /// Earliest instant a read may fetch a fresh conversion
    pub fn next_eligible_read_time(&self) -> Option<Instant> {
        self.next_eligible_read_time
    }

    pub fn units(&self) -> &'static str {
        self.sensor_type.units()
    }

    pub(crate) fn set_sensor_type(&mut self, sensor_type: SensorType) {
        self.sensor_type = sensor_type;
    }

    pub(crate) fn set_wiring(&mut self, wiring: WireConfiguration) {
        self.wiring = wiring;
    }

    pub(crate) fn set_low_pass_filter(&mut self, enabled: bool) {
        self.low_pass_filter = enabled;
    }

    pub(crate) fn mark_activated(&mut self, settle_deadline: Instant) {
        self.state = ChannelState::Activating;
        self.device_sensor_type = self.sensor_type;
        self.next_eligible_read_time = Some(settle_deadline);
        self.solver.reset_seed();
    }

    pub(crate) fn mark_deactivated(&mut self) {
        self.state = ChannelState::Inactive;
        self.device_sensor_type = SensorType::Off;
        self.next_eligible_read_time = None;
    }

    pub(crate) fn rearm(&mut self, next_read: Instant) {
        self.state = ChannelState::Active;
        self.next_eligible_read_time = Some(next_read);
    }

    /// Scale raw counts and, for platinum sensors, solve for temperature
    ///
    /// Uses the mode the device is converting in, not a pending change.
    pub(crate) fn convert(&mut self, raw_counts: i64) -> Result<f64, SolverError> {
        let sensor_type = self.device_sensor_type;
        let scaled = raw_counts as f64 * sensor_type.scale_factor();
        match sensor_type.reference_resistance() {
            Some(r0) => self.solver.temperature_from_resistance(scaled, r0),
            None => Ok(scaled),
        }
    }
}
