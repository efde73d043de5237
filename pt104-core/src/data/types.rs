//! Core data types for the PT-104 toolkit
//!
//! Defines the closed set of sensor types and wiring modes the device
//! understands, the validated channel index, and the value a read produces.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{cvd, device};
use crate::error::ChannelError;

/// Measurement mode of a channel
///
/// Each variant carries a fixed scale factor from device counts to its
/// physical unit (see [`SensorType::scale_factor`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SensorType {
    #[default]
    #[serde(rename = "off")]
    Off,
    #[serde(rename = "pt100")]
    Pt100,
    #[serde(rename = "pt1000")]
    Pt1000,
    #[serde(rename = "resistance_375")]
    Resistance375,
    #[serde(rename = "resistance_10k")]
    Resistance10k,
    #[serde(rename = "differential_115mv")]
    DifferentialVoltage115mV,
    #[serde(rename = "differential_2500mv")]
    DifferentialVoltage2500mV,
    #[serde(rename = "single_ended_115mv")]
    SingleEndedVoltage115mV,
    #[serde(rename = "single_ended_2500mv")]
    SingleEndedVoltage2500mV,
}

impl SensorType {
    pub const ALL: [SensorType; 9] = [
        SensorType::Off,
        SensorType::Pt100,
        SensorType::Pt1000,
        SensorType::Resistance375,
        SensorType::Resistance10k,
        SensorType::DifferentialVoltage115mV,
        SensorType::DifferentialVoltage2500mV,
        SensorType::SingleEndedVoltage115mV,
        SensorType::SingleEndedVoltage2500mV,
    ];

    /// Multiplier from raw device counts to the physical unit
    ///
    /// For the platinum types the result is a resistance in ohms that still
    /// has to be normalized and solved for temperature.
    pub const fn scale_factor(self) -> f64 {
        match self {
            SensorType::Off => 0.0,
            SensorType::Pt100 | SensorType::Pt1000 | SensorType::Resistance375 => 1e-3,
            SensorType::Resistance10k => 1.0,
            SensorType::DifferentialVoltage115mV | SensorType::SingleEndedVoltage115mV => 1e-9,
            SensorType::DifferentialVoltage2500mV | SensorType::SingleEndedVoltage2500mV => 1e-8,
        }
    }

    /// Display unit of a value read in this mode
    pub const fn units(self) -> &'static str {
        match self {
            SensorType::Off => "",
            SensorType::Pt100 | SensorType::Pt1000 => "°C",
            SensorType::Resistance375 | SensorType::Resistance10k => "mΩ",
            SensorType::DifferentialVoltage115mV
            | SensorType::DifferentialVoltage2500mV
            | SensorType::SingleEndedVoltage115mV
            | SensorType::SingleEndedVoltage2500mV => "mV",
        }
    }

    /// Nominal resistance at 0°C for the platinum types
    pub const fn reference_resistance(self) -> Option<f64> {
        match self {
            SensorType::Pt100 => Some(cvd::PT100_R0),
            SensorType::Pt1000 => Some(cvd::PT1000_R0),
            _ => None,
        }
    }

    /// True when reads are routed through the temperature solver
    pub const fn is_temperature(self) -> bool {
        matches!(self, SensorType::Pt100 | SensorType::Pt1000)
    }

    /// Numeric code the vendor driver uses for this mode
    pub const fn code(self) -> u8 {
        match self {
            SensorType::Off => 0,
            SensorType::Pt100 => 1,
            SensorType::Pt1000 => 2,
            SensorType::Resistance375 => 3,
            SensorType::Resistance10k => 4,
            SensorType::DifferentialVoltage115mV => 5,
            SensorType::DifferentialVoltage2500mV => 6,
            SensorType::SingleEndedVoltage115mV => 7,
            SensorType::SingleEndedVoltage2500mV => 8,
        }
    }
}

impl TryFrom<u8> for SensorType {
    type Error = u8;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        SensorType::ALL
            .into_iter()
            .find(|t| t.code() == code)
            .ok_or(code)
    }
}

impl fmt::Display for SensorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SensorType::Off => "off",
            SensorType::Pt100 => "PT100",
            SensorType::Pt1000 => "PT1000",
            SensorType::Resistance375 => "resistance to 375Ω",
            SensorType::Resistance10k => "resistance to 10kΩ",
            SensorType::DifferentialVoltage115mV => "differential to 115mV",
            SensorType::DifferentialVoltage2500mV => "differential to 2500mV",
            SensorType::SingleEndedVoltage115mV => "single ended to 115mV",
            SensorType::SingleEndedVoltage2500mV => "single ended to 2500mV",
        };
        f.write_str(name)
    }
}

/// Lead-wire configuration of a resistive sensor
///
/// Only the transport's lead compensation depends on this; the scanner
/// passes it through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WireConfiguration {
    #[default]
    TwoWire,
    ThreeWire,
    FourWire,
}

impl WireConfiguration {
    pub const fn wire_count(self) -> u8 {
        match self {
            WireConfiguration::TwoWire => 2,
            WireConfiguration::ThreeWire => 3,
            WireConfiguration::FourWire => 4,
        }
    }
}

impl TryFrom<u8> for WireConfiguration {
    type Error = u8;

    fn try_from(wires: u8) -> Result<Self, Self::Error> {
        match wires {
            2 => Ok(WireConfiguration::TwoWire),
            3 => Ok(WireConfiguration::ThreeWire),
            4 => Ok(WireConfiguration::FourWire),
            other => Err(other),
        }
    }
}

/// Local mains frequency, used by the device's noise filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MainsFrequency {
    #[default]
    FiftyHertz,
    SixtyHertz,
}

impl MainsFrequency {
    pub const fn is_sixty_hertz(self) -> bool {
        matches!(self, MainsFrequency::SixtyHertz)
    }
}

/// Channel number on the device, always within 1..=4
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct ChannelIndex(u8);

impl ChannelIndex {
    /// Create a channel index, rejecting numbers outside 1..=4
    pub fn new(number: u8) -> Result<Self, ChannelError> {
        if (device::FIRST_CHANNEL..device::FIRST_CHANNEL + device::CHANNEL_COUNT).contains(&number) {
            Ok(Self(number))
        } else {
            Err(ChannelError::InvalidChannel(number))
        }
    }

    /// Every channel of the device in ascending order
    pub fn all() -> impl Iterator<Item = ChannelIndex> {
        (device::FIRST_CHANNEL..device::FIRST_CHANNEL + device::CHANNEL_COUNT).map(ChannelIndex)
    }

    pub const fn get(self) -> u8 {
        self.0
    }

    /// Zero-based slot for array storage
    pub(crate) const fn slot(self) -> usize {
        (self.0 - device::FIRST_CHANNEL) as usize
    }

    /// Inverse of `slot`; callers guarantee `slot < CHANNEL_COUNT`
    pub(crate) const fn from_slot(slot: usize) -> Self {
        Self(slot as u8 + device::FIRST_CHANNEL)
    }
}

impl TryFrom<u8> for ChannelIndex {
    type Error = ChannelError;

    fn try_from(number: u8) -> Result<Self, Self::Error> {
        ChannelIndex::new(number)
    }
}

impl From<ChannelIndex> for u8 {
    fn from(index: ChannelIndex) -> u8 {
        index.0
    }
}

impl fmt::Display for ChannelIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CH{}", self.0)
    }
}

/// A calibrated value read from a channel
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PhysicalValue {
    pub channel: ChannelIndex,
    pub sensor_type: SensorType,
    /// Counts as returned by the transport
    pub raw_counts: i64,
    /// Value in [`PhysicalValue::units`]
    pub value: f64,
}

impl PhysicalValue {
    pub fn units(&self) -> &'static str {
        self.sensor_type.units()
    }
}

/// Identification strings reported by the device driver
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitInfo {
    pub driver_version: String,
    pub usb_version: String,
    pub hardware_version: String,
    pub variant_info: String,
    pub batch_and_serial: String,
    pub cal_date: String,
    pub kernel_driver_version: String,
}
