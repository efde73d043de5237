//! In-process stand-in for a PT-104 unit
//!
//! Produces raw counts from configured inputs so the full acquisition path
//! can run without hardware: a fixed count value, or a temperature that is
//! turned into the counts a platinum sensor at that temperature would read.
//!
//! Every call is appended to a shared [`CallLog`], which outlives the
//! transport so teardown can be inspected after the scanner is gone.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::device;
use crate::data::{ChannelIndex, SensorType, UnitInfo, WireConfiguration};
use crate::engine::TemperatureSolver;
use crate::error::TransportError;
use crate::hw::transport::DeviceTransport;

/// What a simulated channel is measuring
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimulatedInput {
    /// Element temperature in °C; only valid for platinum sensor types
    Temperature(f64),
    /// Raw counts returned as-is
    Counts(i64),
}

#[derive(Debug, Clone, PartialEq)]
pub enum TransportCall {
    Configure {
        channel: ChannelIndex,
        sensor_type: SensorType,
        wiring: WireConfiguration,
    },
    ReadRaw {
        channel: ChannelIndex,
        low_pass_filter: bool,
    },
    SetMains {
        is_sixty_hertz: bool,
    },
    UnitInfo,
    Close,
}

/// Shared record of transport calls
#[derive(Debug, Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<TransportCall>>>);

impl CallLog {
    fn push(&self, call: TransportCall) {
        self.0.lock().push(call);
    }

    pub fn calls(&self) -> Vec<TransportCall> {
        self.0.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.0.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.lock().is_empty()
    }
}

#[derive(Debug)]
pub struct SimulatedTransport {
    inputs: BTreeMap<ChannelIndex, SimulatedInput>,
    configured: [(SensorType, WireConfiguration); device::CHANNEL_COUNT as usize],
    sixty_hertz: bool,
    open: bool,
    info: UnitInfo,
    log: CallLog,
}

impl Default for SimulatedTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedTransport {
    pub fn new() -> Self {
        Self {
            inputs: BTreeMap::new(),
            configured: [(SensorType::Off, WireConfiguration::default()); device::CHANNEL_COUNT as usize],
            sixty_hertz: false,
            open: true,
            info: UnitInfo {
                driver_version: "simulated".to_string(),
                variant_info: "PT104".to_string(),
                batch_and_serial: "SIM00/000".to_string(),
                ..UnitInfo::default()
            },
            log: CallLog::default(),
        }
    }

    pub fn with_input(mut self, channel: ChannelIndex, input: SimulatedInput) -> Self {
        self.set_input(channel, input);
        self
    }

    pub fn with_unit_info(mut self, info: UnitInfo) -> Self {
        self.info = info;
        self
    }

    pub fn set_input(&mut self, channel: ChannelIndex, input: SimulatedInput) {
        self.inputs.insert(channel, input);
    }

    /// Handle to the call log that stays valid after the transport is dropped
    pub fn call_log(&self) -> CallLog {
        self.log.clone()
    }

    /// Sensor type and wiring last sent for `channel`
    pub fn configured(&self, channel: ChannelIndex) -> (SensorType, WireConfiguration) {
        self.configured[channel.slot()]
    }

    pub fn is_sixty_hertz(&self) -> bool {
        self.sixty_hertz
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    fn ensure_open(&self) -> Result<(), TransportError> {
        if self.open {
            Ok(())
        } else {
            Err(TransportError::NotConnected)
        }
    }
}

impl DeviceTransport for SimulatedTransport {
    fn configure_channel(
        &mut self,
        channel: ChannelIndex,
        sensor_type: SensorType,
        wiring: WireConfiguration,
    ) -> Result<(), TransportError> {
        self.log.push(TransportCall::Configure { channel, sensor_type, wiring });
        self.ensure_open()?;
        self.configured[channel.slot()] = (sensor_type, wiring);
        Ok(())
    }

    fn read_raw(&mut self, channel: ChannelIndex, low_pass_filter: bool) -> Result<i64, TransportError> {
        self.log.push(TransportCall::ReadRaw { channel, low_pass_filter });
        self.ensure_open()?;

        let (sensor_type, _) = self.configured[channel.slot()];
        let input = match self.inputs.get(&channel) {
            Some(input) if sensor_type != SensorType::Off => *input,
            _ => return Err(TransportError::NoSamplesAvailable { channel: channel.get() }),
        };

        let counts = match input {
            SimulatedInput::Counts(counts) => counts,
            SimulatedInput::Temperature(celsius) => {
                let r0 = sensor_type.reference_resistance().ok_or_else(|| {
                    TransportError::Other(format!(
                        "{channel} is configured as {sensor_type}, cannot simulate a temperature"
                    ))
                })?;
                let ohms = TemperatureSolver::resistance(celsius, r0);
                (ohms / sensor_type.scale_factor()).round() as i64
            }
        };
        debug!("Simulated {} -> {} counts", channel, counts);
        Ok(counts)
    }

    fn set_mains_frequency(&mut self, is_sixty_hertz: bool) -> Result<(), TransportError> {
        self.log.push(TransportCall::SetMains { is_sixty_hertz });
        self.ensure_open()?;
        self.sixty_hertz = is_sixty_hertz;
        Ok(())
    }

    fn unit_info(&mut self) -> Result<UnitInfo, TransportError> {
        self.log.push(TransportCall::UnitInfo);
        self.ensure_open()?;
        Ok(self.info.clone())
    }

    fn close(&mut self) -> Result<(), TransportError> {
        self.log.push(TransportCall::Close);
        self.open = false;
        Ok(())
    }
}
